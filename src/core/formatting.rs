// formatting module - Markdown editing commands over text and selection
use std::sync::LazyLock;

use regex::Regex;

use crate::core::selection::{char_count, line_end, line_start, Selection};
use crate::core::settings::AppSettings;

// indentation, then an optional list marker (task marker before plain bullet)
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?P<marker>[*+-] \[[ xX]\] |[*+-] |\d+[.)] )?").unwrap()
});

static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<prefix>[ \t]*[*+-] \[)(?P<state>[ xX])(?P<suffix>\] )").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletMarker {
    Asterisk,
    Minus,
    Plus,
}

impl BulletMarker {
    pub fn as_char(self) -> char {
        match self {
            BulletMarker::Asterisk => '*',
            BulletMarker::Minus => '-',
            BulletMarker::Plus => '+',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMarker {
    Period,
    Parenthesis,
}

impl NumberMarker {
    pub fn as_char(self) -> char {
        match self {
            NumberMarker::Period => '.',
            NumberMarker::Parenthesis => ')',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Strikethrough,
    HtmlComment,
    Indent,
    Unindent,
    BlockQuote,
    StripBlockQuote,
    BulletList(BulletMarker),
    NumberedList(NumberMarker),
    TaskList,
    ToggleTaskComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub underline_emphasis: bool,
    pub indent: String,
    pub tab_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            underline_emphasis: false,
            indent: "\t".to_string(),
            tab_width: 4,
        }
    }
}

impl From<&AppSettings> for FormatOptions {
    fn from(settings: &AppSettings) -> Self {
        Self {
            underline_emphasis: settings.use_underline_for_emphasis,
            indent: settings.indent_unit(),
            tab_width: settings.tab_width,
        }
    }
}

/// Result of a command: the new text and where the selection ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

pub fn apply(command: FormatCommand, text: &str, selection: Selection, options: &FormatOptions) -> Edit {
    let emphasis = if options.underline_emphasis { "_" } else { "*" };
    let strong = if options.underline_emphasis { "__" } else { "**" };

    match command {
        FormatCommand::Bold => toggle_wrap(text, selection, strong, strong),
        FormatCommand::Italic => toggle_wrap(text, selection, emphasis, emphasis),
        FormatCommand::Strikethrough => toggle_wrap(text, selection, "~~", "~~"),
        FormatCommand::HtmlComment => toggle_wrap(text, selection, "<!-- ", " -->"),
        FormatCommand::Indent => map_lines(text, selection, |line| format!("{}{line}", options.indent)),
        FormatCommand::Unindent => map_lines(text, selection, |line| unindent(line, options.tab_width)),
        FormatCommand::BlockQuote => map_lines(text, selection, |line| format!("> {line}")),
        FormatCommand::StripBlockQuote => map_lines(text, selection, |line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix("> ").or_else(|| trimmed.strip_prefix('>')) {
                Some(rest) => rest.to_string(),
                None => line.to_string(),
            }
        }),
        FormatCommand::BulletList(marker) => {
            let prefix = format!("{} ", marker.as_char());
            map_lines(text, selection, |line| set_list_marker(line, &prefix))
        }
        FormatCommand::NumberedList(marker) => {
            let mut number = 0;
            map_lines(text, selection, |line| {
                number += 1;
                set_list_marker(line, &format!("{number}{} ", marker.as_char()))
            })
        }
        FormatCommand::TaskList => map_lines(text, selection, |line| set_list_marker(line, "- [ ] ")),
        FormatCommand::ToggleTaskComplete => map_lines(text, selection, toggle_task),
    }
}

/// Replaces the selection with an image link, using the selected text as
/// the alternate text.
pub fn insert_image(text: &str, selection: Selection, url: &str) -> Edit {
    let alt = selection.selected_text(text);
    let link = format!("![{alt}]({url})");
    let (start, _) = selection.get_range();
    let end = start + char_count(&link);
    Edit {
        text: replace_range(text, selection, &link),
        selection: Selection::new(end),
    }
}

/// Closing character typed along with `open` when auto-match is on.
pub fn matching_close(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        '"' | '\'' | '*' | '_' | '`' => Some(open),
        _ => None,
    }
}

/// Types `open` with its closing character, around the selection if there
/// is one. `None` when `open` has no pair.
pub fn auto_match(text: &str, selection: Selection, open: char) -> Option<Edit> {
    let close = matching_close(open)?;
    let selection = selection.clamp(char_count(text));
    let (start, end) = selection.get_range();
    let inner = selection.selected_text(text);

    Some(Edit {
        text: replace_range(text, selection, &format!("{open}{inner}{close}")),
        selection: Selection::range(start + 1, end + 1),
    })
}

fn replace_range(text: &str, selection: Selection, replacement: &str) -> String {
    let (start, end) = selection.get_range();
    let mut out: String = text.chars().take(start).collect();
    out.push_str(replacement);
    out.extend(text.chars().skip(end));
    out
}

fn toggle_wrap(text: &str, selection: Selection, open: &str, close: &str) -> Edit {
    let selection = selection.clamp(char_count(text));
    let (start, end) = selection.get_range();
    let chars: Vec<char> = text.chars().collect();
    let open_len = char_count(open);
    let close_len = char_count(close);

    let slice = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };

    // markers just outside the selection
    if start >= open_len
        && end + close_len <= chars.len()
        && slice(start - open_len, start) == open
        && slice(end, end + close_len) == close
    {
        let mut out = slice(0, start - open_len);
        out.push_str(&slice(start, end));
        out.push_str(&slice(end + close_len, chars.len()));
        return Edit {
            text: out,
            selection: Selection::range(start - open_len, end - open_len),
        };
    }

    // markers inside the selection
    let inner = slice(start, end);
    if end - start >= open_len + close_len && inner.starts_with(open) && inner.ends_with(close) {
        let stripped: String = inner
            .chars()
            .skip(open_len)
            .take(end - start - open_len - close_len)
            .collect();
        let stripped_len = char_count(&stripped);
        return Edit {
            text: replace_range(text, selection, &stripped),
            selection: Selection::range(start, start + stripped_len),
        };
    }

    let wrapped = format!("{open}{inner}{close}");
    Edit {
        text: replace_range(text, selection, &wrapped),
        selection: Selection::range(start + open_len, end + open_len),
    }
}

/// Rewrites every line the selection touches. An active selection ends up
/// covering the rewritten block; a caret keeps its place in its line.
fn map_lines<F>(text: &str, selection: Selection, mut f: F) -> Edit
where
    F: FnMut(&str) -> String,
{
    let selection = selection.clamp(char_count(text));
    let (start, end) = selection.get_range();
    let block_start = line_start(text, start);
    let block_end = line_end(text, end);

    let chars: Vec<char> = text.chars().collect();
    let block: String = chars[block_start..block_end].iter().collect();

    let mut first_delta: isize = 0;
    let lines: Vec<String> = block
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let new_line = f(line);
            if i == 0 {
                first_delta = char_count(&new_line) as isize - char_count(line) as isize;
            }
            new_line
        })
        .collect();
    let new_block = lines.join("\n");

    let mut out: String = chars[..block_start].iter().collect();
    out.push_str(&new_block);
    out.extend(chars[block_end..].iter());

    let selection = if selection.is_active() {
        Selection::range(block_start, block_start + char_count(&new_block))
    } else {
        let moved = (start as isize + first_delta).max(block_start as isize) as usize;
        Selection::new(moved)
    };

    Edit { text: out, selection }
}

fn unindent(line: &str, tab_width: usize) -> String {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest.to_string();
    }
    let spaces = line.chars().take(tab_width).take_while(|c| *c == ' ').count();
    line[spaces..].to_string()
}

/// Replaces whatever list marker the line has with `prefix`, or removes it
/// when the line already carries exactly that marker.
fn set_list_marker(line: &str, prefix: &str) -> String {
    let Some(caps) = LIST_ITEM_RE.captures(line) else {
        return line.to_string();
    };
    let indent = caps.name("indent").map_or("", |m| m.as_str());
    let (marker, rest_start) = match caps.name("marker") {
        Some(m) => (m.as_str(), m.end()),
        None => ("", indent.len()),
    };
    let rest = &line[rest_start..];

    if marker == prefix {
        format!("{indent}{rest}")
    } else {
        format!("{indent}{prefix}{rest}")
    }
}

fn toggle_task(line: &str) -> String {
    match TASK_RE.captures(line) {
        Some(caps) => {
            let state = if &caps["state"] == " " { "x" } else { " " };
            let end = caps.get(0).map_or(0, |m| m.end());
            format!("{}{state}{}{}", &caps["prefix"], &caps["suffix"], &line[end..])
        }
        None => line.to_string(),
    }
}
