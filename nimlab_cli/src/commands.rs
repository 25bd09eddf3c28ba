pub mod common;
pub mod genetic;
pub mod play;
pub mod search;
pub mod train;
