use nimlab::{
    board::{Board, Move},
    game::{GameConfig, Seat, play, play_many},
    impartial::{GrundyTable, ImpartialGame},
    search::{Minimax, TieBreak, Value},
    strategy::{
        Strategy, expert::ExpertPlayer, minimax::MinimaxPlayer, random::RandomPlayer,
        reinforcement::Agent,
    },
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn expert_beats_random_from_winning_start() {
    let mut rng = StdRng::seed_from_u64(31);
    for rows in 2..=6 {
        let board = Board::new(rows, None);
        if board.is_balanced() {
            continue;
        }
        for _ in 0..20 {
            let record = play(
                &mut board.clone(),
                [&mut ExpertPlayer::new(), &mut RandomPlayer::new()],
                Seat::First,
                &mut rng,
            );
            assert_eq!(record.winner, Seat::First, "rows: {}", rows);
        }
    }
}

#[test]
fn full_depth_minimax_agrees_with_expert() {
    let mut rng = StdRng::seed_from_u64(5);
    let searcher = Minimax::full_depth(TieBreak::FirstFound);
    let stats = play_many(
        &GameConfig::new(3, None),
        40,
        [
            &mut MinimaxPlayer::new(searcher),
            &mut ExpertPlayer::new(),
        ],
        &mut rng,
        |record| {
            let board = GameConfig::new(3, None).board();
            let expected = if board.is_balanced() {
                record.starter.opposite()
            } else {
                record.starter
            };
            assert_eq!(record.winner, expected);
        },
    );
    assert_eq!(stats.games, 40);
}

#[test]
fn search_value_matches_grundy_value() {
    let mut table = GrundyTable::new();
    for piles in [vec![1, 3, 5], vec![2, 2], vec![4, 1, 6], vec![0, 7]] {
        let mut board = Board::from_piles(piles, None);
        let result = Minimax::full_depth(TieBreak::ShallowestWin).search(&mut board);
        let expected = if board.is_p_position(&mut table) {
            Value::Loss
        } else {
            Value::Win
        };
        assert_eq!(result.value, expected, "{}", board);
    }
}

#[test]
fn trained_agent_only_plays_legal_moves() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut agent = Agent::default();
    let config = GameConfig::new(4, Some(4));
    play_many(
        &config,
        200,
        [&mut agent, &mut RandomPlayer::new()],
        &mut rng,
        |record| {
            let taken = record
                .logs
                .iter()
                .flat_map(|log| log.moves())
                .inspect(|m: &&Move| assert!(m.count < 4))
                .map(|m| m.count)
                .sum::<u32>();
            assert_eq!(taken, 16);
        },
    );
    assert_eq!(agent.name(), "RL system");
}
