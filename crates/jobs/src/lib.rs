pub mod runner;
pub mod stats_poll;

pub use runner::JobRunner;
pub use stats_poll::{PollState, StatsPollJob};
