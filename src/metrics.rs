//! Accuracy metrics against hand-tagged reference issues. Noise roles
//! are folded into junk on both sides before comparison, since the
//! distinctions between noise kinds are not what the pipeline is
//! scored on.

use anyhow::{bail, Result};

use crate::models::{Issue, Jump};
use crate::taggers::junk;

/// Line-level agreement between a reference issue and a predicted one.
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    pub role_total: usize,
    pub role_correct: usize,
    pub jump_total: usize,
    pub jump_correct: usize,
}

impl Accuracy {
    pub fn role_accuracy(&self) -> f64 {
        if self.role_total == 0 {
            return 0.0;
        }
        self.role_correct as f64 / self.role_total as f64
    }

    pub fn jump_accuracy(&self) -> f64 {
        if self.jump_total == 0 {
            return 0.0;
        }
        self.jump_correct as f64 / self.jump_total as f64
    }

    /// Fold another issue's counts into this one, for batch-level
    /// accuracy.
    pub fn absorb(&mut self, other: &Accuracy) {
        self.role_total += other.role_total;
        self.role_correct += other.role_correct;
        self.jump_total += other.jump_total;
        self.jump_correct += other.jump_correct;
    }
}

/// Score `predicted` against `reference`. Both issues must describe
/// the same scan, line for line.
pub fn evaluate(reference: &Issue, predicted: &Issue) -> Result<Accuracy> {
    if reference.len() != predicted.len() {
        bail!(
            "Line count mismatch: reference has {}, predicted has {}",
            reference.len(),
            predicted.len()
        );
    }

    let mut reference = reference.clone();
    let mut predicted = predicted.clone();
    junk::tag_junk(&mut reference, true);
    junk::tag_junk(&mut predicted, true);

    let mut accuracy = Accuracy::default();
    for (index, expected) in reference.lines() {
        let Some(actual) = predicted.get(index) else {
            continue;
        };
        accuracy.role_total += 1;
        if expected.function == actual.function {
            accuracy.role_correct += 1;
        }
        if expected.jump != Jump::None {
            accuracy.jump_total += 1;
            if expected.jump == actual.jump {
                accuracy.jump_correct += 1;
            }
        }
    }
    Ok(accuracy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FunctionTag, Line};

    fn line(role: FunctionTag) -> Line {
        let mut line = Line::new(1, "text");
        line.function = role;
        line
    }

    #[test]
    fn test_noise_roles_fold_together() {
        let reference = Issue::new(vec![
            line(FunctionTag::Advertisement),
            line(FunctionTag::BodyText),
        ]);
        let predicted = Issue::new(vec![
            line(FunctionTag::Unintelligible),
            line(FunctionTag::BodyText),
        ]);
        let accuracy = evaluate(&reference, &predicted).unwrap();
        assert_eq!(accuracy.role_correct, 2);
        assert_eq!(accuracy.role_total, 2);
    }

    #[test]
    fn test_jump_agreement() {
        let mut reference = Issue::new(vec![line(FunctionTag::BodyText)]);
        reference.set_jump(0, Jump::Page(5));
        let mut right = reference.clone();
        right.set_jump(0, Jump::Page(5));
        let mut wrong = reference.clone();
        wrong.set_jump(0, Jump::Page(-3));

        assert_eq!(evaluate(&reference, &right).unwrap().jump_correct, 1);
        let accuracy = evaluate(&reference, &wrong).unwrap();
        assert_eq!(accuracy.jump_total, 1);
        assert_eq!(accuracy.jump_correct, 0);
    }

    #[test]
    fn test_absorb_accumulates() {
        let mut total = Accuracy {
            role_total: 10,
            role_correct: 8,
            jump_total: 2,
            jump_correct: 1,
        };
        total.absorb(&Accuracy {
            role_total: 10,
            role_correct: 10,
            jump_total: 0,
            jump_correct: 0,
        });
        assert_eq!(total.role_correct, 18);
        assert!((total.role_accuracy() - 0.9).abs() < 1e-9);
        assert_eq!(total.jump_total, 2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let reference = Issue::new(vec![line(FunctionTag::BodyText)]);
        let predicted = Issue::new(vec![]);
        assert!(evaluate(&reference, &predicted).is_err());
    }
}
