pub mod dates;
pub mod input;
pub mod output;

pub use dates::DateIndex;
pub use input::{read_issue, read_raw, read_tagged};
pub use output::{write_articles, write_csv, ArticleRecord};
