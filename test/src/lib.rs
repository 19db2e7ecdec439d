pub mod helpers;
pub mod test_content;

pub use helpers::*;
pub use test_content::TestContent;
