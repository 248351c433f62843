pub mod calculator;
pub mod executor;
pub mod quoter;
pub mod resolver;

pub use calculator::{output_amount_decimal, should_execute};
pub use executor::SwapExecutor;
pub use quoter::RouteQuoter;
pub use resolver::{possible_pairs, resolve_pair};
