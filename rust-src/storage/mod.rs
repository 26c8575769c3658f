//! Storage layer for traffic records and the editor allow-list.

mod database;
mod editors;
mod traffic;

pub use database::Database;
#[allow(unused_imports)]
pub use traffic::{Page, PageQuery, SortOrder};
