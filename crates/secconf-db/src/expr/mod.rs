//! Expression types for building SQL conditions.
//!
//! This module contains the building blocks of query filters and orderings.

pub mod column;
pub mod ops;

pub use column::{Col, Raw};
pub use ops::{BinaryOp, CaseOp, Conjunction, DaysFromToday, Grouped, InOp, LikeOp, LogicalOp, NullOp};
