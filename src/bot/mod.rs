pub mod metrics;
pub mod orchestrator;
pub mod scheduler;

pub use metrics::BotMetrics;
pub use orchestrator::{SwapBot, TickOutcome};
pub use scheduler::{SchedulerState, TickHandler, TickScheduler};
