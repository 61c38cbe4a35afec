//! Faceted catalog filtering.
//!
//! `FilterState` records the selected values per dimension, `apply` computes
//! the visible subset of a catalog, and `FilterView` memoizes that subset for
//! a `ContentStore`. Evaluation is pure and never mutates the catalog.

pub mod evaluator;
pub mod state;
pub mod view;

pub use evaluator::{apply, matches};
pub use state::{FilterDimension, FilterState, FilterValue};
pub use view::FilterView;
