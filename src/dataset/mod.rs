//! Workout dataset loading

pub mod loader;
pub mod table;

pub use loader::{Dataset, DatasetLoader};
pub use table::Table;
