// sidebar module - tab model and the Markdown cheat sheet

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Outline,
    SessionStatistics,
    DocumentStatistics,
    CheatSheet,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 4] = [
        SidebarTab::Outline,
        SidebarTab::SessionStatistics,
        SidebarTab::DocumentStatistics,
        SidebarTab::CheatSheet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SidebarTab::Outline => "Outline",
            SidebarTab::SessionStatistics => "Session Statistics",
            SidebarTab::DocumentStatistics => "Document Statistics",
            SidebarTab::CheatSheet => "Cheat Sheet",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Saved indexes outside the tab range fall back to the first tab.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Syntax reminders shown in the Cheat Sheet tab.
pub const CHEAT_SHEET: &[(&str, &str)] = &[
    ("# Heading 1", "Top level heading"),
    ("## Heading 2", "Second level heading"),
    ("*Emphasis* _Emphasis_", "Italic text"),
    ("**Strong** __Strong__", "Bold text"),
    ("~~Strikethrough~~", "Struck out text"),
    ("1. Numbered List", "Ordered list item"),
    ("* Bullet List", "Unordered list item"),
    ("- [x] Task List", "Checklist item"),
    ("[Link](http://url.com)", "Inline link"),
    ("![Image](http://url.com)", "Inline image"),
    ("> Block Quote", "Quoted paragraph"),
    ("`Code`", "Inline code"),
    ("```", "Fenced code block"),
    ("Table | Column", "Pipe table row"),
    ("---", "Horizontal rule"),
    ("<!-- Comment -->", "Hidden from output"),
];
