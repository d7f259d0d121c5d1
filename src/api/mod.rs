//! Data bridges API payload handling
//!
//! Transport-agnostic pieces of the remote API: the shapes a response can
//! take, the page-collection loop over any [`PageSource`], and the query
//! parameters derived from caller input.

pub mod pagination;
pub mod query;
pub mod response;

pub use pagination::{PageSource, StopRule, collect_pages};
pub use query::{AccessType, price_window_start};
pub use response::ApiResponse;
