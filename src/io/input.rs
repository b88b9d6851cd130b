use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{FunctionTag, Issue, Jump, Line};

/// Read an issue from disk, picking the reader by extension: `.csv`
/// is the tagged format, anything else is raw OCR text.
pub fn read_issue(path: &Path) -> Result<Issue> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_tagged(path),
        _ => read_raw(path),
    }
}

/// Read a raw OCR text file. One line per row; page boundaries are
/// not recoverable from raw text, so every row lands on page one.
pub fn read_raw(path: &Path) -> Result<Issue> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let lines: Vec<Line> = content.lines().map(|text| Line::new(1, text)).collect();
    Ok(issue_named(lines, path))
}

/// One row of the tagged-CSV format.
#[derive(Debug, Deserialize)]
struct TaggedRow {
    page: u32,
    article: Option<u32>,
    #[serde(default)]
    function: String,
    paragraph: Option<u32>,
    #[serde(default)]
    jump: String,
    #[serde(default)]
    ad: Option<u8>,
    text: Option<String>,
}

/// Read a hand-tagged CSV issue: columns `page, article, function,
/// paragraph, jump, ad, text`.
pub fn read_tagged(path: &Path) -> Result<Issue> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open tagged file: {:?}", path))?;

    let mut lines = Vec::new();
    for (row_index, row) in reader.deserialize().enumerate() {
        let row: TaggedRow =
            row.with_context(|| format!("Malformed row {} in {:?}", row_index + 2, path))?;
        lines.push(Line {
            page: row.page,
            article: row.article.filter(|a| *a > 0),
            function: FunctionTag::from_mnemonic(&row.function),
            paragraph: row.paragraph.filter(|p| *p > 0),
            jump: parse_jump(&row.jump),
            is_ad: row.ad.unwrap_or(0) != 0,
            text: row.text,
        });
    }
    Ok(issue_named(lines, path))
}

fn issue_named(lines: Vec<Line>, path: &Path) -> Issue {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => Issue::with_filename(lines, name),
        None => Issue::new(lines),
    }
}

/// Jump cells are either empty, a signed page number, or a literal
/// target like "front"/"back".
fn parse_jump(cell: &str) -> Jump {
    let cell = cell.trim();
    if cell.is_empty() || cell == "0" {
        return Jump::None;
    }
    match cell.parse::<i32>() {
        Ok(page) => Jump::Page(page),
        Err(_) => Jump::Target(cell.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1111-22-333_19910514.txt");
        std::fs::write(&path, "first line\n\nthird line\n").unwrap();
        let issue = read_raw(&path).unwrap();
        assert_eq!(issue.len(), 3);
        assert!(issue.get(1).unwrap().is_blank());
        assert_eq!(issue.pages(), vec![1]);
        assert_eq!(issue.issue_id().as_deref(), Some("19910514"));
    }

    #[test]
    fn test_read_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issue.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "page,article,function,paragraph,jump,ad,text").unwrap();
        writeln!(file, "1,,PI,,,0,Mustang Daily").unwrap();
        writeln!(file, "1,1,HL,,,0,Big Headline").unwrap();
        writeln!(file, "2,1,TXT,1,-1,0,continued text here").unwrap();
        writeln!(file, "2,,JNK,,front,1,").unwrap();
        drop(file);

        let issue = read_issue(&path).unwrap();
        assert_eq!(issue.len(), 4);
        assert_eq!(
            issue.get(0).unwrap().function,
            FunctionTag::PublicationInfo
        );
        assert_eq!(issue.get(2).unwrap().jump, Jump::Page(-1));
        assert_eq!(issue.get(2).unwrap().article, Some(1));
        assert_eq!(
            issue.get(3).unwrap().jump,
            Jump::Target("front".to_string())
        );
        assert!(issue.get(3).unwrap().is_ad);
    }

    #[test]
    fn test_unknown_mnemonic_maps_to_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issue.csv");
        std::fs::write(&path, "page,article,function,paragraph,jump,ad,text\n1,,XX,,,0,hm\n")
            .unwrap();
        let issue = read_tagged(&path).unwrap();
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Unset);
    }
}
