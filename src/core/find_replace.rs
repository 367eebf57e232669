// find_replace module - search over the document text
use regex::{NoExpand, Regex, RegexBuilder};

use crate::core::selection::{byte_offset, char_count, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub match_case: bool,
    pub whole_word: bool,
    pub regex: bool,
    pub wrap: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            match_case: false,
            whole_word: false,
            regex: false,
            wrap: true,
        }
    }
}

/// A match in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found {
    pub start: usize,
    pub end: usize,
    /// The search went past the end (or start) of the document.
    pub wrapped: bool,
}

impl Found {
    pub fn selection(&self) -> Selection {
        Selection::range(self.start, self.end)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindReplace {
    pub query: String,
    pub replacement: String,
    pub options: FindOptions,
}

impl FindReplace {
    pub fn new(query: impl Into<String>, options: FindOptions) -> Self {
        Self {
            query: query.into(),
            replacement: String::new(),
            options,
        }
    }

    /// `None` for an empty query.
    fn regex(&self) -> Result<Option<Regex>, regex::Error> {
        if self.query.is_empty() {
            return Ok(None);
        }

        let mut pattern = if self.options.regex {
            self.query.clone()
        } else {
            regex::escape(&self.query)
        };
        if self.options.whole_word {
            pattern = format!(r"\b(?:{pattern})\b");
        }

        RegexBuilder::new(&pattern)
            .case_insensitive(!self.options.match_case)
            .multi_line(true)
            .build()
            .map(Some)
    }

    fn to_found(text: &str, start: usize, end: usize, wrapped: bool) -> Found {
        let start_char = char_count(&text[..start]);
        Found {
            start: start_char,
            end: start_char + char_count(&text[start..end]),
            wrapped,
        }
    }

    pub fn find_all(&self, text: &str) -> Result<Vec<Found>, regex::Error> {
        let Some(regex) = self.regex()? else {
            return Ok(Vec::new());
        };
        Ok(regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| Self::to_found(text, m.start(), m.end(), false))
            .collect())
    }

    /// First match starting at or after char offset `from`.
    pub fn find_next(&self, text: &str, from: usize) -> Result<Option<Found>, regex::Error> {
        let Some(regex) = self.regex()? else {
            return Ok(None);
        };
        let from_byte = byte_offset(text, from);

        if let Some(m) = regex
            .find_iter(text)
            .find(|m| !m.is_empty() && m.start() >= from_byte)
        {
            return Ok(Some(Self::to_found(text, m.start(), m.end(), false)));
        }

        if !self.options.wrap {
            return Ok(None);
        }
        let wrapped = regex
            .find_iter(text)
            .find(|m| !m.is_empty() && m.start() < from_byte)
            .map(|m| Self::to_found(text, m.start(), m.end(), true));
        Ok(wrapped)
    }

    /// Last match ending at or before char offset `before`.
    pub fn find_previous(&self, text: &str, before: usize) -> Result<Option<Found>, regex::Error> {
        let Some(regex) = self.regex()? else {
            return Ok(None);
        };
        let before_byte = byte_offset(text, before);
        let matches: Vec<_> = regex.find_iter(text).filter(|m| !m.is_empty()).collect();

        if let Some(m) = matches.iter().rev().find(|m| m.end() <= before_byte) {
            return Ok(Some(Self::to_found(text, m.start(), m.end(), false)));
        }

        if !self.options.wrap {
            return Ok(None);
        }
        Ok(matches
            .last()
            .filter(|m| m.end() > before_byte)
            .map(|m| Self::to_found(text, m.start(), m.end(), true)))
    }

    /// Replaces the selection when it is exactly a match. Returns the new
    /// text and the replaced range.
    pub fn replace_current(
        &self,
        text: &str,
        selection: Selection,
    ) -> Result<Option<(String, Selection)>, regex::Error> {
        let Some(regex) = self.regex()? else {
            return Ok(None);
        };
        let (start, end) = selection.get_range();
        let start_byte = byte_offset(text, start);
        let end_byte = byte_offset(text, end);

        let Some(caps) = regex.captures_at(text, start_byte) else {
            return Ok(None);
        };
        let Some(whole) = caps.get(0) else {
            return Ok(None);
        };
        if whole.start() != start_byte || whole.end() != end_byte || whole.is_empty() {
            return Ok(None);
        }

        let mut replacement = String::new();
        if self.options.regex {
            caps.expand(&self.replacement, &mut replacement);
        } else {
            replacement.push_str(&self.replacement);
        }

        let mut out = String::with_capacity(text.len());
        out.push_str(&text[..start_byte]);
        out.push_str(&replacement);
        out.push_str(&text[end_byte..]);
        Ok(Some((out, Selection::range(start, start + char_count(&replacement)))))
    }

    /// Returns the new text and the number of replacements.
    pub fn replace_all(&self, text: &str) -> Result<(String, usize), regex::Error> {
        let Some(regex) = self.regex()? else {
            return Ok((text.to_string(), 0));
        };
        let count = regex.find_iter(text).filter(|m| !m.is_empty()).count();
        if count == 0 {
            return Ok((text.to_string(), 0));
        }

        let replaced = if self.options.regex {
            regex.replace_all(text, self.replacement.as_str())
        } else {
            regex.replace_all(text, NoExpand(&self.replacement))
        };
        tracing::debug!("replaced {count} occurrences of {:?}", self.query);
        Ok((replaced.into_owned(), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder(query: &str) -> FindReplace {
        FindReplace::new(query, FindOptions::default())
    }

    #[test]
    fn case_insensitive_by_default() {
        let found = finder("cat").find_all("Cat cat CAT").unwrap();
        assert_eq!(found.len(), 3);

        let mut exact = finder("cat");
        exact.options.match_case = true;
        assert_eq!(exact.find_all("Cat cat CAT").unwrap().len(), 1);
    }

    #[test]
    fn whole_word() {
        let mut find = finder("cat");
        find.options.whole_word = true;
        let found = find.find_all("cat concat cat.").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].start, 11);
    }

    #[test]
    fn literal_query_escapes_regex_syntax() {
        assert_eq!(finder("a.b").find_all("a.b axb").unwrap().len(), 1);
    }

    #[test]
    fn next_wraps_around() {
        let find = finder("x");
        let text = "x..x..";
        assert_eq!(find.find_next(text, 1).unwrap(), Some(Found { start: 3, end: 4, wrapped: false }));
        assert_eq!(find.find_next(text, 4).unwrap(), Some(Found { start: 0, end: 1, wrapped: true }));

        let mut no_wrap = finder("x");
        no_wrap.options.wrap = false;
        assert_eq!(no_wrap.find_next(text, 4).unwrap(), None);
    }

    #[test]
    fn previous_wraps_around() {
        let find = finder("x");
        let text = "x..x..";
        assert_eq!(find.find_previous(text, 3).unwrap().map(|f| f.start), Some(0));
        let wrapped = find.find_previous(text, 0).unwrap().unwrap();
        assert_eq!((wrapped.start, wrapped.wrapped), (3, true));
    }

    #[test]
    fn offsets_are_chars() {
        let found = finder("wörld").find_next("héllo wörld", 0).unwrap().unwrap();
        assert_eq!((found.start, found.end), (6, 11));
    }

    #[test]
    fn replace_current_only_on_match() {
        let mut find = finder("cat");
        find.replacement = "dog".into();
        let text = "a cat sat";

        assert_eq!(find.replace_current(text, Selection::range(0, 1)).unwrap(), None);
        let (replaced, selection) = find.replace_current(text, Selection::range(2, 5)).unwrap().unwrap();
        assert_eq!(replaced, "a dog sat");
        assert_eq!(selection, Selection::range(2, 5));
    }

    #[test]
    fn regex_replacement_expands_groups() {
        let mut find = finder(r"(\w+)@(\w+)");
        find.options.regex = true;
        find.replacement = "$2 at $1".into();
        let (text, count) = find.replace_all("me@home you@work").unwrap();
        assert_eq!(text, "home at me work at you");
        assert_eq!(count, 2);
    }

    #[test]
    fn literal_replacement_is_not_expanded() {
        let mut find = finder("price");
        find.replacement = "$5".into();
        assert_eq!(find.replace_all("price").unwrap(), ("$5".to_string(), 1));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let mut find = finder("(unclosed");
        find.options.regex = true;
        assert!(find.find_all("x").is_err());
    }

    #[test]
    fn empty_query_finds_nothing() {
        assert!(finder("").find_all("abc").unwrap().is_empty());
        assert_eq!(finder("").replace_all("abc").unwrap().1, 0);
    }
}
