//! Search layer facade.
//!
//! - **[`fuzzy`]**: subsequence matching, scoring, and the filter index the
//!   session keeps in sync with the store snapshot.

pub mod fuzzy;

pub use fuzzy::{FuzzyIndex, filter_identities, fuzzy_score};
