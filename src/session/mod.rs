pub mod aggregate;
pub mod state;

pub use aggregate::{percentages, select_best, summarize, SessionMeta, SessionSummary};
pub use state::{AccumulatorStatus, SessionAccumulator, SessionCounters};
