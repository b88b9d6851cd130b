pub mod body;
pub mod byline;
pub mod headline;
pub mod jump;
pub mod junk;
pub mod publication;
pub mod segment;

pub use body::BodyConfig;
pub use headline::HeadlineConfig;
pub use jump::JumpConfig;
pub use junk::SmoothConfig;
pub use publication::{PublicationConfig, PublicationResult};
pub use segment::{SegmentConfig, SegmentResult};

use thiserror::Error;

use crate::models::{FunctionTag, Issue};

/// Typed failures a tagging stage can return. The caller decides
/// whether a failed stage is fatal for the issue; it never takes the
/// rest of a batch down.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("stage '{stage}' requires roles missing from the issue: {missing:?}")]
    MissingRoles {
        stage: &'static str,
        missing: Vec<FunctionTag>,
    },
    #[error("article {article} has non-contiguous paragraph numbering: {found:?}")]
    MalformedArticle { article: u32, found: Vec<u32> },
}

/// Check a stage's upstream role vocabulary before it runs.
pub fn require_roles(
    issue: &Issue,
    stage: &'static str,
    roles: &[FunctionTag],
) -> Result<(), StageError> {
    let missing = issue.missing_roles(roles);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StageError::MissingRoles { stage, missing })
    }
}

/// Line counts a tagging stage reports back to the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStats {
    /// Lines whose role this stage assigned.
    pub lines_tagged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;

    #[test]
    fn test_require_roles() {
        let mut issue = Issue::new(vec![Line::new(1, "a")]);
        issue.set_role(0, FunctionTag::Headline);
        assert!(require_roles(&issue, "test", &[FunctionTag::Headline]).is_ok());
        let err = require_roles(&issue, "test", &[FunctionTag::Byline]).unwrap_err();
        assert!(matches!(err, StageError::MissingRoles { .. }));
    }
}
