pub mod article;
pub mod issue;
pub mod line;
pub mod pattern;

pub use article::*;
pub use issue::*;
pub use line::*;
pub use pattern::*;
