//! Aggregation query construction

pub mod builder;
pub mod types;

pub use builder::{build_aggregation_query, MAX_TERMS_SIZE};
pub use types::{Aggregation, NestedAgg, ReverseNested, TermFilter, TermsAgg};
