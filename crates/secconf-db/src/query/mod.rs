//! Statement building.
//!
//! Reads are assembled from [`Clause`]s; writes are single-table statements
//! whose table and column names are checked before they reach the SQL text.

pub mod clause;
pub mod insert;
pub mod select;
pub mod update;

pub use clause::{destination_name, Clause, Filter, Fragment, Order, Projection, Source};
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;
