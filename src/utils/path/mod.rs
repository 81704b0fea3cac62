//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects beyond
//! existence checks in `find_upward` and `normalize_path`.

pub mod fs;

pub use fs::{clean_path, find_upward, normalize_path, to_slash};
