//! Market prices supplied by an external price feed.

mod price_refresh;
mod quotes_errors;
mod quotes_model;
mod quotes_traits;


pub use price_refresh::*;
pub use quotes_errors::*;
pub use quotes_model::*;
pub use quotes_traits::*;
