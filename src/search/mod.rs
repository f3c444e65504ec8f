//! Text and category filtering over a collection.
//!
//! Pure functions: no mutation, no I/O. Filtering subsets the collection
//! and never reorders it.

mod filter;

pub use filter::{categories, filter, matches_text, CatalogQuery};
