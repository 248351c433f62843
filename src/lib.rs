pub mod blockchain;
pub mod bot;
pub mod config;
pub mod dex;
pub mod error;
pub mod swap;
pub mod types;
pub mod wallet;

pub use config::Config;
pub use error::*;
pub use types::*;
