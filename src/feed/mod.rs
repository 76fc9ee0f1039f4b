//! Travel feed core
//!
//! Post data model, the owned post repository, the search/filter engine
//! and query highlighting.

pub mod filter;
pub mod highlight;
pub mod repository;
pub mod types;

pub use filter::{
    category_tab, filter, matches_category, matches_query, CategoryTab, FilterState,
    ALL_CATEGORIES, CATEGORY_TABS,
};
pub use highlight::{highlight, Highlighter};
pub use repository::{PostRepository, SharePayload};
pub use types::{LocationsResponse, Post};
