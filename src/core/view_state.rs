// view_state module - layout rules of the main window
use unicode_segmentation::UnicodeSegmentation;

use crate::core::selection::{byte_offset, char_count, line_end, line_start};
use crate::core::settings::{AppSettings, FocusMode};

/// A change the window has to make through the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    EnterFullScreen,
    /// Leave full screen, back to maximized or normal.
    LeaveFullScreen { maximized: bool },
}

#[derive(Debug, Clone)]
pub struct ViewState {
    full_screen: bool,
    maximized: bool,
    was_maximized: bool,
    focus_mode: bool,
    sidebar_hidden_for_resize: bool,
    menu_bar_shown: bool,
    menu_open: bool,

    pub hide_menu_bar_in_full_screen: bool,
    pub display_time_in_full_screen: bool,
    pub sidebar_enabled: bool,
    pub preview_visible: bool,
}

impl ViewState {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            full_screen: false,
            maximized: false,
            was_maximized: false,
            focus_mode: false,
            sidebar_hidden_for_resize: false,
            menu_bar_shown: true,
            menu_open: false,
            hide_menu_bar_in_full_screen: settings.hide_menu_bar_in_full_screen,
            display_time_in_full_screen: settings.display_time_in_full_screen,
            sidebar_enabled: settings.sidebar_visible,
            preview_visible: settings.html_preview_visible,
        }
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn is_focus_mode(&self) -> bool {
        self.focus_mode
    }

    /// Follows the window's real state while not in full screen.
    pub fn observe_window(&mut self, maximized: bool) {
        if !self.full_screen {
            self.maximized = maximized;
        }
    }

    pub fn set_full_screen(&mut self, on: bool) -> Option<WindowCommand> {
        if on == self.full_screen {
            return None;
        }
        self.full_screen = on;

        if on {
            self.was_maximized = self.maximized;
            self.menu_bar_shown = !self.hide_menu_bar_in_full_screen;
            Some(WindowCommand::EnterFullScreen)
        } else {
            self.menu_bar_shown = true;
            self.menu_open = false;
            Some(WindowCommand::LeaveFullScreen {
                maximized: self.was_maximized,
            })
        }
    }

    /// Whether Escape should toggle full screen off.
    pub fn escape_leaves_full_screen(&self) -> bool {
        self.full_screen
    }

    fn auto_hiding(&self) -> bool {
        self.full_screen && self.hide_menu_bar_in_full_screen
    }

    pub fn set_hide_menu_bar_in_full_screen(&mut self, hide: bool) {
        self.hide_menu_bar_in_full_screen = hide;
        if self.full_screen {
            self.menu_bar_shown = !hide;
        }
    }

    pub fn alt_pressed(&mut self) {
        if self.auto_hiding() {
            self.menu_bar_shown = !self.menu_bar_shown;
        }
    }

    /// A menu from the bar is open; the bar stays until it closes.
    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    /// Shows the bar when the pointer reaches the top edge and hides it
    /// once the pointer leaves it with no menu open.
    pub fn pointer_moved(&mut self, at_top_edge: bool, over_menu_bar: bool) {
        if !self.auto_hiding() {
            return;
        }
        if at_top_edge {
            self.menu_bar_shown = true;
        } else if self.menu_bar_shown && !over_menu_bar && !self.menu_open {
            self.menu_bar_shown = false;
        }
    }

    pub fn window_deactivated(&mut self) {
        if self.auto_hiding() {
            self.menu_bar_shown = false;
            self.menu_open = false;
        }
    }

    pub fn menu_bar_visible(&self) -> bool {
        !self.auto_hiding() || self.menu_bar_shown
    }

    pub fn time_visible(&self) -> bool {
        self.full_screen && self.display_time_in_full_screen
    }

    /// Hides the sidebar while the window is narrower than half the screen.
    pub fn window_resized(&mut self, width: f32, screen_width: f32) {
        self.sidebar_hidden_for_resize = screen_width > 0.0 && width < 0.5 * screen_width;
    }

    pub fn set_focus_mode(&mut self, on: bool) {
        self.focus_mode = on;
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_enabled && !self.focus_mode && !self.sidebar_hidden_for_resize
    }

    /// The preview takes at most half of what the sidebar leaves.
    pub fn preview_max_width(&self, window_width: f32, sidebar_width: f32) -> f32 {
        let sidebar = if self.sidebar_visible() { sidebar_width } else { 0.0 };
        ((window_width - sidebar) / 2.0).max(0.0)
    }
}

/// Clock text shown in full screen.
pub fn time_label() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

/// Char range left undimmed around `cursor` in focus mode.
/// Typewriter mode only keeps the cursor line centered, so nothing dims.
pub fn focus_range(text: &str, cursor: usize, mode: FocusMode) -> (usize, usize) {
    let cursor = cursor.min(char_count(text));
    match mode {
        FocusMode::Typewriter => (0, char_count(text)),
        FocusMode::Line => (line_start(text, cursor), line_end(text, cursor)),
        FocusMode::Paragraph => paragraph_range(text, cursor),
        FocusMode::Sentence => sentence_range(text, cursor),
    }
}

fn paragraph_range(text: &str, cursor: usize) -> (usize, usize) {
    let total = char_count(text);
    let mut start = line_start(text, cursor);
    let mut end = line_end(text, cursor);

    while start > 0 {
        let previous = line_start(text, start - 1);
        if is_blank(text, previous, start - 1) {
            break;
        }
        start = previous;
    }
    while end < total {
        let next_end = line_end(text, end + 1);
        if is_blank(text, end + 1, next_end) {
            break;
        }
        end = next_end;
    }
    (start, end)
}

fn is_blank(text: &str, start: usize, end: usize) -> bool {
    text[byte_offset(text, start)..byte_offset(text, end)]
        .trim()
        .is_empty()
}

fn sentence_range(text: &str, cursor: usize) -> (usize, usize) {
    let byte = byte_offset(text, cursor);
    let mut last = (char_count(text), char_count(text));

    for (i, sentence) in text.split_sentence_bound_indices() {
        let end = i + sentence.len();
        let range = (char_count(&text[..i]), char_count(&text[..end]));
        if byte < end {
            return range;
        }
        last = range;
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewState {
        ViewState::new(&AppSettings::default())
    }

    #[test]
    fn full_screen_restores_maximized() {
        let mut view = view();
        view.observe_window(true);
        assert_eq!(view.set_full_screen(true), Some(WindowCommand::EnterFullScreen));
        // eframe reports not maximized while in full screen
        view.observe_window(false);
        assert_eq!(
            view.set_full_screen(false),
            Some(WindowCommand::LeaveFullScreen { maximized: true })
        );
    }

    #[test]
    fn full_screen_restores_normal() {
        let mut view = view();
        view.set_full_screen(true);
        assert_eq!(view.set_full_screen(true), None);
        assert_eq!(
            view.set_full_screen(false),
            Some(WindowCommand::LeaveFullScreen { maximized: false })
        );
        assert_eq!(view.set_full_screen(false), None);
    }

    #[test]
    fn menu_bar_auto_hides_in_full_screen() {
        let mut view = view();
        assert!(view.menu_bar_visible());

        view.set_full_screen(true);
        assert!(!view.menu_bar_visible());

        view.alt_pressed();
        assert!(view.menu_bar_visible());
        view.alt_pressed();
        assert!(!view.menu_bar_visible());

        view.pointer_moved(true, false);
        assert!(view.menu_bar_visible());
        view.set_menu_open(true);
        view.pointer_moved(false, false);
        assert!(view.menu_bar_visible());
        view.set_menu_open(false);
        view.pointer_moved(false, false);
        assert!(!view.menu_bar_visible());

        view.set_full_screen(false);
        assert!(view.menu_bar_visible());
    }

    #[test]
    fn menu_bar_stays_when_hiding_disabled() {
        let mut view = view();
        view.set_hide_menu_bar_in_full_screen(false);
        view.set_full_screen(true);
        view.alt_pressed();
        view.pointer_moved(false, false);
        assert!(view.menu_bar_visible());

        view.set_hide_menu_bar_in_full_screen(true);
        assert!(!view.menu_bar_visible());
    }

    #[test]
    fn time_only_in_full_screen() {
        let mut view = view();
        assert!(!view.time_visible());
        view.set_full_screen(true);
        assert!(view.time_visible());
        view.display_time_in_full_screen = false;
        assert!(!view.time_visible());
    }

    #[test]
    fn escape_only_matters_in_full_screen() {
        let mut view = view();
        assert!(!view.escape_leaves_full_screen());
        view.set_full_screen(true);
        assert!(view.escape_leaves_full_screen());
    }

    #[test]
    fn sidebar_visibility_rule() {
        let mut view = view();
        assert!(view.sidebar_visible());

        view.window_resized(800.0, 1920.0);
        assert!(!view.sidebar_visible());
        view.window_resized(1200.0, 1920.0);
        assert!(view.sidebar_visible());

        view.set_focus_mode(true);
        assert!(!view.sidebar_visible());
        view.set_focus_mode(false);

        view.sidebar_enabled = false;
        assert!(!view.sidebar_visible());
    }

    #[test]
    fn preview_width_is_capped() {
        let mut view = view();
        assert_eq!(view.preview_max_width(1200.0, 200.0), 500.0);
        view.sidebar_enabled = false;
        assert_eq!(view.preview_max_width(1200.0, 200.0), 600.0);
    }

    #[test]
    fn focus_on_line() {
        let text = "one\ntwo three\nfour";
        assert_eq!(focus_range(text, 6, FocusMode::Line), (4, 13));
    }

    #[test]
    fn focus_on_paragraph() {
        let text = "a\nb\n\nc\nd\n\ne";
        assert_eq!(focus_range(text, 0, FocusMode::Paragraph), (0, 3));
        assert_eq!(focus_range(text, 7, FocusMode::Paragraph), (5, 8));
        assert_eq!(focus_range(text, 11, FocusMode::Paragraph), (10, 11));
    }

    #[test]
    fn focus_on_sentence() {
        let text = "First one. Second one. Third.";
        let (start, end) = focus_range(text, 13, FocusMode::Sentence);
        assert_eq!(&text[start..end], "Second one. ");
        assert_eq!(focus_range(text, 100, FocusMode::Sentence).1, text.len());
    }

    #[test]
    fn typewriter_dims_nothing() {
        assert_eq!(focus_range("abc\ndef", 2, FocusMode::Typewriter), (0, 7));
    }
}
