// src/gui/editor.rs - the Markdown text area and its find/replace bar
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use egui::text::{CCursor, CCursorRange, LayoutJob};
use egui::text_edit::TextEditState;
use egui::{Event, Galley, Key, TextBuffer, Ui};
use egui_extras::syntax_highlighting::{highlight, CodeTheme};

use super::state::{find_status, EditorState};
use crate::core::selection::{byte_offset, Selection};
use crate::core::settings::{AppSettings, FocusMode};
use crate::core::view_state::focus_range;

const DIMMED: f32 = 0.35;

pub fn editor_id() -> egui::Id {
    egui::Id::new("markwrite_editor")
}

pub struct EditorPanel<'a> {
    state: &'a mut EditorState,
    settings: &'a AppSettings,
    focus_mode: bool,
}

impl<'a> EditorPanel<'a> {
    pub fn new(state: &'a mut EditorState, settings: &'a AppSettings, focus_mode: bool) -> Self {
        Self {
            state,
            settings,
            focus_mode,
        }
    }

    /// Returns a message for the status bar, if any.
    pub fn show(&mut self, ui: &mut Ui) -> Option<String> {
        let mut status = None;
        if self.state.search_active {
            status = self.show_search_bar(ui);
        }

        egui::ScrollArea::vertical()
            .id_salt("editor_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| self.show_text_edit(ui));
            });

        status
    }

    fn show_text_edit(&mut self, ui: &mut Ui) {
        let id = editor_id();
        let has_focus = ui.memory(|m| m.has_focus(id));
        if has_focus {
            self.filter_input(ui);
        }

        let pending = self.state.pending_selection.take();
        if let Some(selection) = pending {
            let mut text_state = TextEditState::load(ui.ctx(), id).unwrap_or_default();
            text_state.cursor.set_char_range(Some(CCursorRange::two(
                CCursor::new(selection.anchor),
                CCursor::new(selection.cursor),
            )));
            text_state.store(ui.ctx(), id);
        }

        let width = match self.settings.editor_width.max_width() {
            Some(max) => ui.available_width().min(max),
            None => ui.available_width(),
        };
        let focus = self
            .focus_mode
            .then_some((self.settings.focus_mode, self.state.selection.cursor));

        let mut layouter = |ui: &Ui, buffer: &dyn TextBuffer, wrap_width: f32| -> Arc<Galley> {
            let text = buffer.as_str();
            let theme = CodeTheme::from_style(ui.style());
            let mut job = highlight(ui.ctx(), ui.style(), &theme, text, "md");
            job.wrap.max_width = wrap_width;
            if let Some((mode, cursor)) = focus {
                if mode != FocusMode::Typewriter {
                    let (start, end) = focus_range(text, cursor, mode);
                    dim_outside(&mut job, byte_offset(text, start)..byte_offset(text, end));
                }
            }
            ui.painter().layout_job(job)
        };

        let output = egui::TextEdit::multiline(self.state.workspace.document_mut().text_mut())
            .id(id)
            .font(egui::TextStyle::Monospace)
            .desired_width(width)
            .desired_rows(30)
            .frame(false)
            .lock_focus(true)
            .layouter(&mut layouter)
            .show(ui);

        if let Some(range) = output.cursor_range {
            self.state.set_selection(Selection {
                anchor: range.secondary.index,
                cursor: range.primary.index,
            });
        }
        if output.response.changed() {
            self.state.text_changed(Instant::now());
        }

        if let Some(selection) = pending {
            output.response.request_focus();
            let cursor = output.galley.pos_from_cursor(CCursor::new(selection.cursor));
            let rect = cursor.translate(output.galley_pos.to_vec2());
            ui.scroll_to_rect(rect, Some(egui::Align::Center));
        }
    }

    /// Editing rules the widget does not know about: Hemingway mode,
    /// auto-matched pairs and space indentation.
    fn filter_input(&mut self, ui: &mut Ui) {
        let hemingway = self.state.hemingway;
        let spaces = !self.state.selection.is_active() && self.state.format.indent != "\t";
        let mut typed = Vec::new();
        let mut tab = false;

        ui.input_mut(|i| {
            let modifiers = i.modifiers;
            i.events.retain(|event| match event {
                Event::Key {
                    key: Key::Backspace | Key::Delete,
                    pressed: true,
                    ..
                } if hemingway => false,
                Event::Key {
                    key: Key::Tab,
                    pressed: true,
                    modifiers,
                    ..
                } if spaces && modifiers.is_none() => {
                    tab = true;
                    false
                }
                Event::Text(text) if !modifiers.command => {
                    let mut chars = text.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) if self.settings.auto_match_enabled(c) => {
                            typed.push(c);
                            false
                        }
                        _ => true,
                    }
                }
                _ => true,
            });
        });

        for c in typed {
            if !self.state.auto_match(c) {
                self.state.insert_text(&c.to_string());
            }
        }
        if tab {
            let indent = self.state.format.indent.clone();
            self.state.insert_text(&indent);
        }
    }

    fn show_search_bar(&mut self, ui: &mut Ui) -> Option<String> {
        let mut status = None;
        let state = &mut *self.state;

        ui.horizontal(|ui| {
            ui.label("🔍");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.find.query)
                    .hint_text("Find")
                    .desired_width(240.0),
            );
            if state.focus_find {
                response.request_focus();
                state.focus_find = false;
            }

            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            let shift = ui.input(|i| i.modifiers.shift);
            if enter {
                let result = if shift {
                    state.find_previous()
                } else {
                    state.find_next()
                };
                status = find_status(&state.find.query, result);
                response.request_focus();
            }

            if ui.button("Next").clicked() {
                status = find_status(&state.find.query.clone(), state.find_next());
            }
            if ui.button("Prev").clicked() {
                status = find_status(&state.find.query.clone(), state.find_previous());
            }

            ui.checkbox(&mut state.find.options.match_case, "Aa")
                .on_hover_text("Match case");
            ui.checkbox(&mut state.find.options.whole_word, "Word")
                .on_hover_text("Whole words only");
            ui.checkbox(&mut state.find.options.regex, ".*")
                .on_hover_text("Regular expression");

            if ui.button("✕").clicked() || ui.input(|i| i.key_pressed(Key::Escape)) {
                state.close_search();
            }
        });

        if state.replace_active {
            ui.horizontal(|ui| {
                ui.label("⇄");
                ui.add(
                    egui::TextEdit::singleline(&mut state.find.replacement)
                        .hint_text("Replace with")
                        .desired_width(240.0),
                );
                if ui.button("Replace").clicked() {
                    status = find_status(&state.find.query.clone(), state.replace());
                }
                if ui.button("Replace All").clicked() {
                    status = Some(match state.replace_all() {
                        Ok(count) => format!("Replaced {count} occurrences"),
                        Err(e) => format!("Invalid pattern: {e}"),
                    });
                }
            });
        }

        ui.separator();
        status
    }
}

/// Fades every section outside `focus`, splitting sections at its edges.
fn dim_outside(job: &mut LayoutJob, focus: Range<usize>) {
    let mut sections = Vec::with_capacity(job.sections.len() + 2);

    for section in job.sections.drain(..) {
        let range = section.byte_range.clone();
        let cuts = [
            range.start,
            focus.start.clamp(range.start, range.end),
            focus.end.clamp(range.start, range.end),
            range.end,
        ];

        for pair in cuts.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if start >= end {
                continue;
            }
            let mut part = section.clone();
            if start != range.start {
                part.leading_space = 0.0;
            }
            part.byte_range = start..end;
            if end <= focus.start || start >= focus.end {
                part.format.color = part.format.color.gamma_multiply(DIMMED);
            }
            sections.push(part);
        }
    }

    job.sections = sections;
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::text::TextFormat;
    use egui::Color32;

    #[test]
    fn dims_around_focus() {
        let mut job = LayoutJob::default();
        let format = TextFormat {
            color: Color32::WHITE,
            ..Default::default()
        };
        job.append("one two three", 0.0, format);

        dim_outside(&mut job, 4..7);

        let ranges: Vec<_> = job.sections.iter().map(|s| s.byte_range.clone()).collect();
        assert_eq!(ranges, vec![0..4, 4..7, 7..13]);
        assert_eq!(job.sections[1].format.color, Color32::WHITE);
        assert_ne!(job.sections[0].format.color, Color32::WHITE);
        assert_ne!(job.sections[2].format.color, Color32::WHITE);
    }
}
