use serde::{Deserialize, Serialize};

/// Role assigned to one OCR text row.
///
/// Once a stage assigns a non-`Unset` role it is only revised by the
/// smoothing pass in the junk tagger; every other stage touches
/// `Unset` lines exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionTag {
    /// Publication metadata: masthead, volume/issue markers, page
    /// numbers, the date banner.
    PublicationInfo,
    Headline,
    Byline,
    /// Article body paragraph.
    BodyText,
    Advertisement,
    /// OCR noise with no recoverable content.
    Unintelligible,
    /// Recurring section name ("Sports", "Opinion", ...).
    SectionHeader,
    /// Short continuation marker left behind by a page jump.
    MastheadContinuation,
    /// Catch-all for lines no stage claimed.
    Junk,
    /// No role assigned yet.
    Unset,
}

impl FunctionTag {
    /// Mnemonic used in the tagged-CSV format.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            FunctionTag::PublicationInfo => "PI",
            FunctionTag::Headline => "HL",
            FunctionTag::Byline => "BL",
            FunctionTag::BodyText => "TXT",
            FunctionTag::Advertisement => "AT",
            FunctionTag::Unintelligible => "N",
            FunctionTag::SectionHeader => "SH",
            FunctionTag::MastheadContinuation => "MH",
            FunctionTag::Junk => "JNK",
            FunctionTag::Unset => "",
        }
    }

    /// Parse a tagged-CSV mnemonic. Unknown or empty mnemonics map to
    /// `Unset` rather than failing; hand-tagged files contain strays.
    pub fn from_mnemonic(s: &str) -> Self {
        match s.trim() {
            "PI" => FunctionTag::PublicationInfo,
            "HL" => FunctionTag::Headline,
            "BL" => FunctionTag::Byline,
            "TXT" => FunctionTag::BodyText,
            "AT" => FunctionTag::Advertisement,
            "N" => FunctionTag::Unintelligible,
            "SH" => FunctionTag::SectionHeader,
            // "ME" appears in older hand-tagged files.
            "MH" | "ME" => FunctionTag::MastheadContinuation,
            // Hand-tagged files mark blank rows "B"; they carry no
            // content either way.
            "JNK" | "B" => FunctionTag::Junk,
            _ => FunctionTag::Unset,
        }
    }

    /// Roles that never carry article content. Used by the smoothing
    /// pass and by `tag_junk` in `replace_all` mode.
    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            FunctionTag::Advertisement
                | FunctionTag::Unintelligible
                | FunctionTag::SectionHeader
                | FunctionTag::MastheadContinuation
                | FunctionTag::Junk
        )
    }
}

/// Page-jump annotation on a line.
///
/// `Page` is signed: negative means this line continues an article
/// *from* that page, positive means the article *continues to* it.
/// "front"/"back" references stay literal rather than being coerced
/// to a page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jump {
    None,
    Page(i32),
    Target(String),
}

impl Jump {
    pub fn page(&self) -> Option<i32> {
        match self {
            Jump::Page(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Jump::None)
    }
}

impl Default for Jump {
    fn default() -> Self {
        Jump::None
    }
}

/// One OCR text row. Owned by the Issue that contains it and mutated
/// in place by each pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Physical page number (1-based; 0 means unknown).
    pub page: u32,
    /// Article this line was assigned to by the segmenter.
    pub article: Option<u32>,
    /// Current role.
    pub function: FunctionTag,
    /// Paragraph number within the article (1-based).
    pub paragraph: Option<u32>,
    /// Page-jump annotation.
    pub jump: Jump,
    /// Whether this line sits inside advertisement space.
    pub is_ad: bool,
    /// Raw OCR text. `None` for rows the scan produced no text for.
    pub text: Option<String>,
}

impl Line {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            article: None,
            function: FunctionTag::Unset,
            paragraph: None,
            jump: Jump::None,
            is_ad: false,
            text: Some(text.into()),
        }
    }

    pub fn blank(page: u32) -> Self {
        Self {
            page,
            article: None,
            function: FunctionTag::Unset,
            paragraph: None,
            jump: Jump::None,
            is_ad: false,
            text: None,
        }
    }

    /// Text with surrounding whitespace and tabs normalized away.
    pub fn clean_text(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(|t| t.trim().replace('\t', " "))
            .filter(|t| !t.is_empty())
    }

    /// Whether the row carries any visible text.
    pub fn is_blank(&self) -> bool {
        self.clean_text().is_none()
    }

    pub fn word_count(&self) -> usize {
        self.text
            .as_deref()
            .map(|t| t.split_whitespace().count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_round_trip() {
        for tag in [
            FunctionTag::PublicationInfo,
            FunctionTag::Headline,
            FunctionTag::Byline,
            FunctionTag::BodyText,
            FunctionTag::Advertisement,
            FunctionTag::Unintelligible,
            FunctionTag::SectionHeader,
            FunctionTag::MastheadContinuation,
            FunctionTag::Junk,
        ] {
            assert_eq!(FunctionTag::from_mnemonic(tag.mnemonic()), tag);
        }
        assert_eq!(FunctionTag::from_mnemonic("???"), FunctionTag::Unset);
    }

    #[test]
    fn test_masthead_continuation_mnemonic() {
        assert_eq!(FunctionTag::MastheadContinuation.mnemonic(), "MH");
        assert_eq!(
            FunctionTag::from_mnemonic("ME"),
            FunctionTag::MastheadContinuation
        );
    }

    #[test]
    fn test_blank_detection() {
        assert!(Line::blank(1).is_blank());
        assert!(Line::new(1, " \t ").is_blank());
        assert!(!Line::new(1, "text").is_blank());
    }

    #[test]
    fn test_jump_page() {
        assert_eq!(Jump::Page(-3).page(), Some(-3));
        assert_eq!(Jump::Target("front".to_string()).page(), None);
        assert!(Jump::None.is_none());
    }
}
