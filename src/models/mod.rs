pub mod category;
pub mod columns;

pub use category::{Category, CategoryRules, DedupKey};
pub use columns::{ColumnMap, Field};
