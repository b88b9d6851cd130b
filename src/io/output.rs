use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Article, Issue, Jump};

/// On-disk article record, one JSON file per article. Field names
/// match the downstream archive loader.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    pub id: u64,
    pub publication: String,
    pub article_date: Option<String>,
    pub article_headline: Option<String>,
    pub page_number: Vec<u32>,
    pub author: Option<String>,
    pub article_number: u32,
    pub article_text: String,
    pub article_subheading: Option<String>,
    pub number_of_paragraphs: usize,
    pub link_image: Option<String>,
    pub link_article: Option<String>,
}

impl From<&Article> for ArticleRecord {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            publication: article.publication.clone(),
            article_date: article.date.clone(),
            article_headline: article.headline.clone(),
            page_number: article.pages.clone(),
            author: article.byline.clone(),
            article_number: article.number,
            article_text: article.text.clone(),
            article_subheading: article.subheading.clone(),
            number_of_paragraphs: article.paragraph_count,
            link_image: None,
            link_article: None,
        }
    }
}

/// Write one JSON file per article into `dir`, named
/// `{publication}_{articleNumber}.json`.
pub fn write_articles(articles: &[Article], dir: &Path) -> Result<()> {
    for article in articles {
        let publication = if article.publication.is_empty() {
            "unknown"
        } else {
            &article.publication
        };
        let path = dir.join(format!("{}_{}.json", publication, article.number));
        let record = ArticleRecord::from(article);
        let json = serde_json::to_string_pretty(&record)
            .context("Failed to serialize article record")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write article file: {:?}", path))?;
    }
    Ok(())
}

/// Write an issue back out in the tagged-CSV format.
pub fn write_csv(issue: &Issue, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create tagged file: {:?}", path))?;
    writer
        .write_record(["page", "article", "function", "paragraph", "jump", "ad", "text"])
        .context("Failed to write header")?;

    for (_, line) in issue.lines() {
        let jump = match &line.jump {
            Jump::None => String::new(),
            Jump::Page(page) => page.to_string(),
            Jump::Target(target) => target.clone(),
        };
        writer
            .write_record([
                line.page.to_string(),
                line.article.map(|a| a.to_string()).unwrap_or_default(),
                line.function.mnemonic().to_string(),
                line.paragraph.map(|p| p.to_string()).unwrap_or_default(),
                jump,
                if line.is_ad { "1" } else { "0" }.to_string(),
                line.text.clone().unwrap_or_default(),
            ])
            .context("Failed to write row")?;
    }
    writer.flush().context("Failed to flush tagged file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::input::read_tagged;
    use crate::models::{FunctionTag, Line};

    fn sample_article() -> Article {
        Article {
            id: 7,
            number: 2,
            headline: Some("Big Headline".to_string()),
            byline: Some("By Jane Doe".to_string()),
            subheading: None,
            text: "first paragraph\nsecond paragraph".to_string(),
            pages: vec![1, 4],
            paragraph_count: 2,
            date: Some("1991-05-14".to_string()),
            publication: "1111-22-333".to_string(),
        }
    }

    #[test]
    fn test_article_file_name_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_articles(&[sample_article()], dir.path()).unwrap();

        let path = dir.path().join("1111-22-333_2.json");
        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["article_headline"], "Big Headline");
        assert_eq!(value["author"], "By Jane Doe");
        assert_eq!(value["number_of_paragraphs"], 2);
        assert_eq!(value["page_number"][1], 4);
        assert!(value["link_image"].is_null());
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issue.csv");

        let mut line = Line::new(3, "continued text");
        line.function = FunctionTag::BodyText;
        line.article = Some(1);
        line.paragraph = Some(2);
        line.jump = Jump::Page(-1);
        let issue = Issue::new(vec![line, Line::blank(3)]);

        write_csv(&issue, &path).unwrap();
        let loaded = read_tagged(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let first = loaded.get(0).unwrap();
        assert_eq!(first.function, FunctionTag::BodyText);
        assert_eq!(first.jump, Jump::Page(-1));
        assert_eq!(first.paragraph, Some(2));
        assert_eq!(loaded.get(1).unwrap().function, FunctionTag::Unset);
    }
}
