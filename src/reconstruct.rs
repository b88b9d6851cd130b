//! Article reconstruction: the final stage that folds every line
//! sharing an article number back into one output record.

use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{Article, FunctionTag, IdAllocator, Issue};
use crate::taggers::StageError;

/// Configuration for reconstruction.
#[derive(Debug, Clone, Default)]
pub struct ReconstructConfig {
    /// Fail on non-contiguous paragraph numbering instead of sorting
    /// and carrying on.
    pub strict: bool,
}

/// Build output articles from a segmented issue, in article-number
/// order. Articles that ended up with no body text are dropped.
pub fn reconstruct(
    issue: &Issue,
    config: &ReconstructConfig,
    ids: &IdAllocator,
) -> Result<Vec<Article>, StageError> {
    let mut grouped: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, line) in issue.lines() {
        if let Some(article) = line.article.filter(|a| *a > 0) {
            grouped.entry(article).or_default().push(index);
        }
    }

    let publication = issue.publication_id().unwrap_or_default();
    let mut articles = Vec::new();

    for (number, indices) in grouped {
        let mut body: Vec<(u32, usize)> = indices
            .iter()
            .filter_map(|&i| {
                let line = issue.get(i)?;
                (line.function == FunctionTag::BodyText)
                    .then_some(line.paragraph.map(|p| (p, i)))
                    .flatten()
            })
            .collect();
        if body.is_empty() {
            warn!(article = number, "Dropping article with no body text");
            continue;
        }

        let mut paragraphs: Vec<u32> = body.iter().map(|(p, _)| *p).collect();
        paragraphs.sort_unstable();
        let contiguous = paragraphs
            .iter()
            .enumerate()
            .all(|(i, &p)| p == i as u32 + 1);
        if !contiguous {
            if config.strict {
                return Err(StageError::MalformedArticle {
                    article: number,
                    found: paragraphs,
                });
            }
            warn!(
                article = number,
                ?paragraphs,
                "Non-contiguous paragraph numbering; sorting"
            );
        }
        body.sort_unstable_by_key(|(p, _)| *p);

        let headlines: Vec<&str> = indices
            .iter()
            .filter_map(|&i| issue.get(i))
            .filter(|l| l.function == FunctionTag::Headline)
            .filter_map(|l| l.text.as_deref())
            .collect();
        let byline = indices
            .iter()
            .filter_map(|&i| issue.get(i))
            .find(|l| l.function == FunctionTag::Byline)
            .and_then(|l| l.clean_text());

        let text = body
            .iter()
            .filter_map(|&(_, i)| issue.get(i).and_then(|l| l.clean_text()))
            .collect::<Vec<_>>()
            .join("\n");

        let mut pages: Vec<u32> = indices
            .iter()
            .filter_map(|&i| issue.get(i))
            .map(|l| l.page)
            .collect();
        pages.sort_unstable();
        pages.dedup();

        articles.push(Article {
            id: ids.next_id(),
            number,
            headline: headlines.first().map(|h| h.trim().to_string()),
            byline,
            subheading: headlines.get(1).map(|h| h.trim().to_string()),
            text,
            pages,
            paragraph_count: body.len(),
            date: issue.date.clone(),
            publication: publication.clone(),
        });
    }
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;
    use crate::taggers::{segment, SegmentConfig};

    fn line(page: u32, role: FunctionTag, text: &str) -> Line {
        let mut line = Line::new(page, text);
        line.function = role;
        line
    }

    #[test]
    fn test_single_page_article() {
        let mut issue = Issue::with_filename(
            vec![
                line(1, FunctionTag::PublicationInfo, "Mustang Daily"),
                line(1, FunctionTag::Headline, "Students Win Regional Award"),
                line(1, FunctionTag::Byline, "By Jane Doe"),
                line(1, FunctionTag::BodyText, "the team took first place"),
                line(1, FunctionTag::BodyText, "judges praised the design"),
                line(1, FunctionTag::Advertisement, "buy two get one free"),
            ],
            "1111-22-333_19910514.txt",
        );
        issue.date = Some("1991-05-14".to_string());
        segment::tag(&mut issue, &SegmentConfig::default()).unwrap();

        let ids = IdAllocator::new();
        let articles = reconstruct(&issue, &ReconstructConfig::default(), &ids).unwrap();
        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.number, 1);
        assert_eq!(
            article.headline.as_deref(),
            Some("Students Win Regional Award")
        );
        assert_eq!(article.byline.as_deref(), Some("By Jane Doe"));
        assert_eq!(article.paragraph_count, 2);
        assert_eq!(article.pages, vec![1]);
        assert_eq!(article.publication, "1111-22-333");
        assert_eq!(article.date.as_deref(), Some("1991-05-14"));
        assert!(article.text.contains("first place"));
    }

    #[test]
    fn test_subheading_from_second_headline() {
        let mut issue = Issue::new(vec![
            line(1, FunctionTag::Headline, "Election Results Delayed"),
            line(1, FunctionTag::Headline, "Recount Expected This Week"),
            line(1, FunctionTag::BodyText, "officials cited a printing error"),
        ]);
        segment::tag(&mut issue, &SegmentConfig::default()).unwrap();
        let ids = IdAllocator::new();
        let articles = reconstruct(&issue, &ReconstructConfig::default(), &ids).unwrap();
        assert_eq!(
            articles[0].subheading.as_deref(),
            Some("Recount Expected This Week")
        );
    }

    #[test]
    fn test_strict_rejects_paragraph_gap() {
        let mut issue = Issue::new(vec![
            line(1, FunctionTag::BodyText, "first paragraph"),
            line(1, FunctionTag::BodyText, "third paragraph"),
        ]);
        issue.set_article(0, 1, 1);
        issue.set_article(1, 1, 3);
        let ids = IdAllocator::new();
        let err = reconstruct(&issue, &ReconstructConfig { strict: true }, &ids).unwrap_err();
        assert!(matches!(err, StageError::MalformedArticle { article: 1, .. }));
    }

    #[test]
    fn test_permissive_sorts_out_of_order_paragraphs() {
        let mut issue = Issue::new(vec![
            line(2, FunctionTag::BodyText, "second paragraph"),
            line(1, FunctionTag::BodyText, "first paragraph"),
        ]);
        issue.set_article(0, 1, 2);
        issue.set_article(1, 1, 1);
        let ids = IdAllocator::new();
        let articles = reconstruct(&issue, &ReconstructConfig::default(), &ids).unwrap();
        assert_eq!(articles[0].text, "first paragraph\nsecond paragraph");
        assert_eq!(articles[0].pages, vec![1, 2]);
    }

    #[test]
    fn test_headline_only_article_dropped() {
        let mut issue = Issue::new(vec![line(1, FunctionTag::Headline, "Orphan Headline")]);
        if let Some(l) = issue.get_mut(0) {
            l.article = Some(1);
        }
        let ids = IdAllocator::new();
        let articles = reconstruct(&issue, &ReconstructConfig::default(), &ids).unwrap();
        assert!(articles.is_empty());
    }
}
