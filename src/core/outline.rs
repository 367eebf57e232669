// outline module - document headings for the sidebar
use std::sync::LazyLock;

use regex::Regex;

static ATX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").unwrap());

static SETEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}(=+|-+)[ \t]*$").unwrap());

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}(```|~~~)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Char offset of the heading line.
    pub position: usize,
}

pub fn headings(text: &str) -> Vec<Heading> {
    let mut result = Vec::new();
    let mut fence: Option<&str> = None;
    let mut offset = 0;
    // previous line, if it could be the text of a setext heading
    let mut candidate: Option<(&str, usize)> = None;

    for line in text.split('\n') {
        let line_chars = line.chars().count();
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(caps) = FENCE_RE.captures(line) {
            let marker = caps.get(1).map_or("", |m| m.as_str());
            match fence {
                None => fence = Some(marker),
                Some(open) if open == marker => fence = None,
                Some(_) => {}
            }
            candidate = None;
        } else if fence.is_some() {
            candidate = None;
        } else if let Some(caps) = ATX_RE.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let title = caps.get(2).map_or("", |m| m.as_str()).trim();
            result.push(Heading {
                level,
                text: title.to_string(),
                position: offset,
            });
            candidate = None;
        } else if let (Some((title, position)), Some(caps)) = (candidate, SETEXT_RE.captures(line)) {
            let level = if caps[1].starts_with('=') { 1 } else { 2 };
            result.push(Heading {
                level,
                text: title.trim().to_string(),
                position,
            });
            candidate = None;
        } else if line.trim().is_empty() {
            candidate = None;
        } else {
            candidate = Some((line, offset));
        }

        offset += line_chars + 1;
    }

    result
}

/// The heading the cursor is under, as an index into `headings`.
pub fn current_heading(headings: &[Heading], cursor: usize) -> Option<usize> {
    headings.iter().rposition(|h| h.position <= cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_headings() {
        let found = headings("# One\ntext\n### Three ###\n####### not a heading");
        assert_eq!(
            found,
            vec![
                Heading { level: 1, text: "One".into(), position: 0 },
                Heading { level: 3, text: "Three".into(), position: 11 },
            ]
        );
    }

    #[test]
    fn setext_headings() {
        let found = headings("Title\n=====\n\nSub\n---\n");
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].level, found[0].text.as_str(), found[0].position), (1, "Title", 0));
        assert_eq!((found[1].level, found[1].text.as_str(), found[1].position), (2, "Sub", 13));
    }

    #[test]
    fn rule_after_blank_line_is_not_a_heading() {
        assert!(headings("para\n\n---\n").is_empty());
    }

    #[test]
    fn code_blocks_are_skipped() {
        let found = headings("```\n# comment\n```\n# Real\n~~~\n```\n# still code\n~~~\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Real");
    }

    #[test]
    fn hash_without_space_is_text() {
        assert!(headings("#hashtag").is_empty());
        assert_eq!(headings("#")[0].text, "");
    }

    #[test]
    fn cursor_maps_to_heading() {
        let found = headings("# A\nbody\n# B\nmore");
        assert_eq!(current_heading(&found, 0), Some(0));
        assert_eq!(current_heading(&found, 6), Some(0));
        assert_eq!(current_heading(&found, 11), Some(1));
        assert_eq!(current_heading(&[], 3), None);
    }
}
