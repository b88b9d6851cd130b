use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{FunctionTag, Jump, Line};

/// One scanned issue: the canonical ordered sequence of lines plus
/// issue-level metadata. Reading order is physical layout order.
///
/// All pipeline stages operate through this store; every mutation a
/// stage makes is visible to the stages after it. Issues share no
/// state with each other, so a batch of issues can be processed on
/// independent workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    lines: Vec<Line>,
    /// Source filename, used to derive publication and issue ids.
    pub filename: Option<String>,
    /// Publication date, once known (ISO `YYYY-MM-DD`).
    pub date: Option<String>,
    /// (volume, issue) numbers from the masthead, once known.
    pub edition: Option<(u32, u32)>,
}

impl Issue {
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            filename: None,
            date: None,
            edition: None,
        }
    }

    pub fn with_filename(lines: Vec<Line>, filename: impl Into<String>) -> Self {
        Self {
            lines,
            filename: Some(filename.into()),
            date: None,
            edition: None,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }

    /// Line at a relative offset from `index`, or `None` when the
    /// offset falls outside the issue.
    pub fn neighbor(&self, index: usize, offset: isize) -> Option<&Line> {
        let target = index.checked_add_signed(offset)?;
        self.lines.get(target)
    }

    /// Role of the line at a relative offset; out-of-range neighbors
    /// read as `Unset`.
    pub fn neighbor_role(&self, index: usize, offset: isize) -> FunctionTag {
        self.neighbor(index, offset)
            .map(|l| l.function)
            .unwrap_or(FunctionTag::Unset)
    }

    /// Restartable iteration over `(index, line)` in reading order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &Line)> {
        self.lines.iter().enumerate()
    }

    pub fn set_role(&mut self, index: usize, role: FunctionTag) {
        if let Some(line) = self.lines.get_mut(index) {
            line.function = role;
        }
    }

    pub fn set_jump(&mut self, index: usize, jump: Jump) {
        if let Some(line) = self.lines.get_mut(index) {
            line.jump = jump;
        }
    }

    pub fn set_article(&mut self, index: usize, article: u32, paragraph: u32) {
        if let Some(line) = self.lines.get_mut(index) {
            line.article = Some(article);
            line.paragraph = Some(paragraph);
        }
    }

    /// Whether every role in `roles` appears somewhere in the issue.
    /// Stages use this as their upstream-vocabulary precondition.
    pub fn roles_present(&self, roles: &[FunctionTag]) -> bool {
        let present: HashSet<FunctionTag> = self.lines.iter().map(|l| l.function).collect();
        roles.iter().all(|r| present.contains(r))
    }

    /// Roles missing from the issue, for error reporting.
    pub fn missing_roles(&self, roles: &[FunctionTag]) -> Vec<FunctionTag> {
        let present: HashSet<FunctionTag> = self.lines.iter().map(|l| l.function).collect();
        roles
            .iter()
            .filter(|r| !present.contains(r))
            .copied()
            .collect()
    }

    /// Distinct page numbers in reading order.
    pub fn pages(&self) -> Vec<u32> {
        let mut pages = Vec::new();
        for line in &self.lines {
            if line.page > 0 && !pages.contains(&line.page) {
                pages.push(line.page);
            }
        }
        pages
    }

    pub fn count_role(&self, role: FunctionTag) -> usize {
        self.lines.iter().filter(|l| l.function == role).count()
    }

    /// Eight-digit issue identifier embedded in the source filename
    /// (`...YYYYMMDD.txt`), when present.
    pub fn issue_id(&self) -> Option<String> {
        let name = self.filename.as_deref()?;
        let stem = name.strip_suffix(".txt").or_else(|| name.strip_suffix(".csv"))?;
        let digits: String = stem
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if digits.len() >= 8 {
            Some(digits[digits.len() - 8..].to_string())
        } else {
            None
        }
    }

    /// Publication identifier of the form `XXXX-XX-XXX` embedded in
    /// the source filename.
    pub fn publication_id(&self) -> Option<String> {
        let name = self.filename.as_deref()?;
        let chars: Vec<char> = name.chars().collect();
        // Pattern: 4 digits, '-', 2 digits, '-', 3 digits.
        let shape = [4usize, 2, 3];
        'outer: for start in 0..chars.len() {
            let mut pos = start;
            for (i, &run) in shape.iter().enumerate() {
                for _ in 0..run {
                    if pos >= chars.len() || !chars[pos].is_ascii_digit() {
                        continue 'outer;
                    }
                    pos += 1;
                }
                if i + 1 < shape.len() {
                    if pos >= chars.len() || chars[pos] != '-' {
                        continue 'outer;
                    }
                    pos += 1;
                }
            }
            return Some(chars[start..pos].iter().collect());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_of(texts: &[&str]) -> Issue {
        Issue::new(texts.iter().map(|t| Line::new(1, *t)).collect())
    }

    #[test]
    fn test_neighbor_out_of_range() {
        let issue = issue_of(&["a", "b", "c"]);
        assert!(issue.neighbor(0, -1).is_none());
        assert!(issue.neighbor(2, 1).is_none());
        assert_eq!(
            issue.neighbor(1, 1).and_then(|l| l.text.clone()),
            Some("c".to_string())
        );
        assert_eq!(issue.neighbor_role(0, -2), FunctionTag::Unset);
    }

    #[test]
    fn test_roles_present() {
        let mut issue = issue_of(&["a", "b"]);
        issue.set_role(0, FunctionTag::Headline);
        assert!(issue.roles_present(&[FunctionTag::Headline]));
        assert!(!issue.roles_present(&[FunctionTag::Headline, FunctionTag::Byline]));
        assert_eq!(
            issue.missing_roles(&[FunctionTag::Headline, FunctionTag::Byline]),
            vec![FunctionTag::Byline]
        );
    }

    #[test]
    fn test_pages_in_order() {
        let mut lines = vec![Line::new(1, "a"), Line::new(1, "b")];
        lines.push(Line::new(2, "c"));
        lines.push(Line::new(1, "d"));
        let issue = Issue::new(lines);
        assert_eq!(issue.pages(), vec![1, 2]);
    }

    #[test]
    fn test_issue_id_from_filename() {
        let issue = Issue::with_filename(vec![], "mustang-daily-1991-05-003-19910514.txt");
        assert_eq!(issue.issue_id(), Some("19910514".to_string()));
        assert_eq!(issue.publication_id(), Some("1991-05-003".to_string()));
    }
}
