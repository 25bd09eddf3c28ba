//! Utilities for genetic search

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use std::num::NonZeroUsize;

#[cfg(feature = "rayon")]
use rayon::prelude::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefMutIterator, ParallelIterator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Object with score attached
pub struct Scored<Object, Score> {
    /// Object under inspection
    pub object: Object,

    /// Score after running evaluation function
    pub score: Score,
}

/// Definition of a genetic algorithm
pub trait Algorithm<Object, Score> {
    /// Mutate object in place
    fn mutate(&self, object: &mut Object, rng: &mut StdRng);

    /// Combine two objects into one
    fn cross(&self, lhs: &Object, rhs: &Object, rng: &mut StdRng) -> Object;

    /// Get the lowest possible score, used for initial setup
    fn lowest_score(&self) -> Score;

    /// Evaluate fitness of an object. Algorithm will try to maximize this value according to [`Ord`]
    fn score(&self, object: &Object, rng: &mut StdRng) -> Score;

    /// Create a totally random object, used for initial population
    fn random(&self, rng: &mut StdRng) -> Object;
}

/// Genetic algorithm runner
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm<Alg, Object, Score> {
    specimen: Vec<Scored<Object, Score>>,
    generation: usize,
    algorithm: Alg,
    rng: StdRng,
}

impl<Alg, Object, Score> GeneticAlgorithm<Alg, Object, Score>
where
    Alg: Algorithm<Object, Score> + Sync,
    Score: Clone + Ord + Send,
    Object: Clone + Send + Sync,
{
    /// Create new instance with given population size and random population
    pub fn new(size: NonZeroUsize, algorithm: Alg, rng: StdRng) -> Self {
        Self::with_specimen(Vec::new(), size, algorithm, rng)
    }

    /// Like [`Self::new`] but will use initial population. If initial population is smaller than
    /// generation size rest will be filled with random objects, if it is larger it is truncated
    pub fn with_specimen(
        mut specimen: Vec<Object>,
        size: NonZeroUsize,
        algorithm: Alg,
        mut rng: StdRng,
    ) -> Self {
        specimen.truncate(size.get());
        let to_generate = size.get() - specimen.len();
        specimen.extend((0..to_generate).map(|_| algorithm.random(&mut rng)));
        let specimen = specimen
            .into_iter()
            .map(|object| Scored {
                object,
                score: algorithm.lowest_score(),
            })
            .collect::<Vec<_>>();

        let mut s = Self {
            specimen,
            generation: 0,
            algorithm,
            rng,
        };
        s.score();
        s
    }

    /// Get object with highest fitness
    pub fn highest_score(&self) -> &Scored<Object, Score> {
        self.specimen.last().expect("unreachable")
    }

    fn score(&mut self) {
        // Every specimen gets its own generator so the outcome does not depend on scheduling
        let seeds = (0..self.specimen.len())
            .map(|_| self.rng.random::<u64>())
            .collect::<Vec<_>>();
        let algorithm = &self.algorithm;

        #[cfg(feature = "rayon")]
        self.specimen
            .par_iter_mut()
            .zip(seeds.into_par_iter())
            .for_each(|(spec, seed)| {
                spec.score = algorithm.score(&spec.object, &mut StdRng::seed_from_u64(seed));
            });

        #[cfg(not(feature = "rayon"))]
        self.specimen
            .iter_mut()
            .zip(seeds)
            .for_each(|(spec, seed)| {
                spec.score = algorithm.score(&spec.object, &mut StdRng::seed_from_u64(seed));
            });

        self.specimen
            .sort_by(|lhs, rhs| Ord::cmp(&lhs.score, &rhs.score));
    }

    fn cross(&mut self) {
        let generation_size = self.specimen.len();
        let mid_point = generation_size / 2;
        let mut new_specimen = Vec::with_capacity(generation_size);
        let top_half = &self.specimen[mid_point..];
        new_specimen.extend_from_slice(top_half);
        for _ in new_specimen.len()..generation_size {
            let lhs = self.specimen.choose(&mut self.rng).expect("unreachable");
            let rhs = self.specimen.choose(&mut self.rng).expect("unreachable");
            let mut object = self.algorithm.cross(&lhs.object, &rhs.object, &mut self.rng);
            self.algorithm.mutate(&mut object, &mut self.rng);
            new_specimen.push(Scored {
                object,
                score: self.algorithm.lowest_score(),
            });
        }
        self.specimen = new_specimen;
    }

    /// Perform one generation step
    pub fn step_generation(&mut self) {
        self.cross();
        self.score();
        self.generation += 1;
    }

    /// Get number of finished (scored) generations
    pub const fn generation(&self) -> usize {
        self.generation
    }

    /// Get underlying algorithm
    pub const fn algorithm(&self) -> &Alg {
        &self.algorithm
    }

    /// Get scored specimen, ordered by their score
    pub fn specimen(&self) -> &[Scored<Object, Score>] {
        &self.specimen
    }
}
