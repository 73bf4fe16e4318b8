//! Text analysis shared by indexing and querying
//!
//! Every token that reaches the index or a query passes through the same
//! [`Analyzer`], so token equality is decided in exactly one place.

mod normalizer;

pub use normalizer::{fold, is_diacritic, Analyzer};
