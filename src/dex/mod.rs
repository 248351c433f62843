pub mod jupiter;
pub mod route_cache;
pub mod token_list;
pub mod traits;

pub use jupiter::JupiterClient;
pub use route_cache::RouteCache;
pub use token_list::TokenListClient;
pub use traits::*;
