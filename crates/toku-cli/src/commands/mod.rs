//! CLI command implementations for ToKu.

pub mod check;
pub mod link;
pub mod token;
