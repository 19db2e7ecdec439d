pub mod chunk;
pub mod diff_cache;
pub mod section;
