pub mod sort;

pub use sort::{SortBy, SortOptions, SortOrder};
