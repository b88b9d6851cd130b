pub mod features;
pub mod lexicon;

pub use features::*;
pub use lexicon::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::FunctionTag;

/// The pretrained binary-classifier capability the junk tagger
/// consumes. A model answers one question ("is this line an ad?") from
/// a set of named binary features; training is out of scope here.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureSet) -> bool;
}

/// Per-feature likelihoods for a Naive Bayes model: the probability
/// the feature is present given each label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureLikelihood {
    pub p_given_positive: f64,
    pub p_given_negative: f64,
}

/// A Naive Bayes model deserialized from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    pub prior_positive: f64,
    pub likelihoods: HashMap<String, FeatureLikelihood>,
}

/// Probability floor so absent or degenerate likelihoods never zero
/// out a whole product.
const PROB_FLOOR: f64 = 1e-6;

impl Classifier for NaiveBayesModel {
    fn classify(&self, features: &FeatureSet) -> bool {
        let prior = self.prior_positive.clamp(PROB_FLOOR, 1.0 - PROB_FLOOR);
        let mut log_positive = prior.ln();
        let mut log_negative = (1.0 - prior).ln();

        for (name, &value) in features {
            let Some(likelihood) = self.likelihoods.get(name) else {
                continue;
            };
            let p_pos = likelihood.p_given_positive.clamp(PROB_FLOOR, 1.0 - PROB_FLOOR);
            let p_neg = likelihood.p_given_negative.clamp(PROB_FLOOR, 1.0 - PROB_FLOOR);
            if value {
                log_positive += p_pos.ln();
                log_negative += p_neg.ln();
            } else {
                log_positive += (1.0 - p_pos).ln();
                log_negative += (1.0 - p_neg).ln();
            }
        }

        log_positive > log_negative
    }
}

impl NaiveBayesModel {
    /// Load a model by name from the model directory. A missing file
    /// is not an error: the stage using the model is skipped.
    pub fn load(dir: &Path, name: &str) -> Result<Option<Self>> {
        let path = dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read classifier model: {:?}", path))?;
        let model: NaiveBayesModel = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse classifier model: {:?}", path))?;
        Ok(Some(model))
    }
}

/// Which feature families a classifier sees. Each pretrained model
/// expects the families it was trained with, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Advertisement,
    Unintelligible,
    Other,
    Header,
}

/// Assemble the feature set for one line of text under a feature kind.
pub fn extract_features(
    kind: FeatureKind,
    text: &str,
    lexicon: &Lexicon,
    masthead: &str,
) -> FeatureSet {
    let mut features = FeatureSet::new();
    match kind {
        FeatureKind::Advertisement => {
            alphabetic_features(&mut features, text);
            uppercase_features(&mut features, text);
            dictionary_features(&mut features, text, lexicon);
            numeral_features(&mut features, text);
            non_alphabetic_features(&mut features, text);
            positional_features(&mut features, text, lexicon);
            word_pattern_features(&mut features, text, masthead);
            pattern_features(&mut features, text);
        }
        FeatureKind::Unintelligible => {
            alphabetic_features(&mut features, text);
            name_features(&mut features, text, lexicon);
            uppercase_features(&mut features, text);
            numeral_features(&mut features, text);
            non_alphabetic_features(&mut features, text);
            positional_features(&mut features, text, lexicon);
            word_pattern_features(&mut features, text, masthead);
            pattern_features(&mut features, text);
        }
        FeatureKind::Other => {
            uppercase_features(&mut features, text);
            non_alphabetic_features(&mut features, text);
            positional_features(&mut features, text, lexicon);
            word_pattern_features(&mut features, text, masthead);
            pattern_features(&mut features, text);
        }
        FeatureKind::Header => {
            name_features(&mut features, text, lexicon);
            uppercase_features(&mut features, text);
            pattern_features(&mut features, text);
        }
    }
    features
}

/// One entry of the ordered classifier configuration: which model
/// file, which feature families, and which role a positive result
/// assigns.
#[derive(Debug, Clone)]
pub struct ClassifierSpec {
    pub model_file: &'static str,
    pub features: FeatureKind,
    pub assigns: FunctionTag,
}

/// Ordered classifier configuration injected into the junk tagger.
/// Earlier entries claim lines first; each only touches still-Unset
/// lines.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_dir: PathBuf,
    pub specs: Vec<ClassifierSpec>,
}

impl ClassifierConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            specs: vec![
                ClassifierSpec {
                    model_file: "masthead_naive_bayes.json",
                    features: FeatureKind::Header,
                    assigns: FunctionTag::MastheadContinuation,
                },
                ClassifierSpec {
                    model_file: "credit_naive_bayes.json",
                    features: FeatureKind::Header,
                    assigns: FunctionTag::MastheadContinuation,
                },
                ClassifierSpec {
                    model_file: "unintelligible_naive_bayes.json",
                    features: FeatureKind::Unintelligible,
                    assigns: FunctionTag::Unintelligible,
                },
                ClassifierSpec {
                    model_file: "other_naive_bayes.json",
                    features: FeatureKind::Other,
                    assigns: FunctionTag::Junk,
                },
                ClassifierSpec {
                    model_file: "advertisement_naive_bayes.json",
                    features: FeatureKind::Advertisement,
                    assigns: FunctionTag::Advertisement,
                },
            ],
        }
    }

    /// Load every configured model, skipping the missing ones with a
    /// warning. Order is preserved.
    pub fn load_models(&self) -> Result<Vec<(ClassifierSpec, NaiveBayesModel)>> {
        let mut loaded = Vec::new();
        for spec in &self.specs {
            match NaiveBayesModel::load(&self.model_dir, spec.model_file)? {
                Some(model) => loaded.push((spec.clone(), model)),
                None => warn!(
                    "Classifier model {} not found in {:?}; skipping",
                    spec.model_file, self.model_dir
                ),
            }
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(feature: &str, p_pos: f64, p_neg: f64) -> NaiveBayesModel {
        let mut likelihoods = HashMap::new();
        likelihoods.insert(
            feature.to_string(),
            FeatureLikelihood {
                p_given_positive: p_pos,
                p_given_negative: p_neg,
            },
        );
        NaiveBayesModel {
            prior_positive: 0.5,
            likelihoods,
        }
    }

    #[test]
    fn test_naive_bayes_follows_likelihoods() {
        let model = model_with("has_money", 0.9, 0.1);
        let mut features = FeatureSet::new();
        features.insert("has_money".to_string(), true);
        assert!(model.classify(&features));
        features.insert("has_money".to_string(), false);
        assert!(!model.classify(&features));
    }

    #[test]
    fn test_unknown_features_ignored() {
        let model = model_with("has_money", 0.9, 0.1);
        let mut features = FeatureSet::new();
        features.insert("something_else".to_string(), true);
        // Only the prior remains; a 0.5 prior cannot go positive.
        assert!(!model.classify(&features));
    }

    #[test]
    fn test_missing_model_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClassifierConfig::new(dir.path());
        let loaded = config.load_models().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_model_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let model = model_with("has_money", 0.8, 0.2);
        let path = dir.path().join("advertisement_naive_bayes.json");
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();
        let loaded = NaiveBayesModel::load(dir.path(), "advertisement_naive_bayes.json")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.likelihoods.len(), 1);
    }
}
