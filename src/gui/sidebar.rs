// sidebar - outline, statistics and cheat sheet tabs
use std::time::Instant;

use egui::{RichText, Ui};

use super::state::EditorState;
use crate::core::default_actions as ids;
use crate::core::sidebar::{SidebarTab, CHEAT_SHEET};
use crate::core::statistics::{format_duration, grade_label, DocumentStatistics};

#[derive(Debug, Default)]
pub struct SidebarOutput {
    /// Char offset to move the cursor to.
    pub jump_to: Option<usize>,
    /// Settings entries picked from the popup.
    pub invoked: Vec<&'static str>,
}

const SETTINGS_ENTRIES: [(&str, &str); 5] = [
    ("Themes...", ids::SHOW_THEMES),
    ("Font...", ids::SHOW_FONTS),
    ("Application Language...", ids::SHOW_APP_LANGUAGES),
    ("Preview Options...", ids::SHOW_PREVIEW_OPTIONS),
    ("Preferences...", ids::SHOW_PREFERENCES),
];

/// `shortcuts` are (action, key sequence) rows listed under the cheat sheet.
pub fn show(
    ui: &mut Ui,
    tab: &mut SidebarTab,
    state: &EditorState,
    shortcuts: &[(String, String)],
) -> SidebarOutput {
    let mut output = SidebarOutput::default();

    ui.horizontal_wrapped(|ui| {
        for candidate in SidebarTab::ALL {
            ui.selectable_value(tab, candidate, candidate.label());
        }
    });
    ui.separator();

    let footer = ui.spacing().interact_size.y + ui.spacing().item_spacing.y * 2.0;
    egui::ScrollArea::vertical()
        .id_salt("sidebar_scroll")
        .max_height((ui.available_height() - footer).max(0.0))
        .auto_shrink([false, false])
        .show(ui, |ui| match *tab {
            SidebarTab::Outline => outline(ui, state, &mut output),
            SidebarTab::SessionStatistics => session_statistics(ui, state),
            SidebarTab::DocumentStatistics => match &state.selection_stats {
                Some(selection) => {
                    ui.label(RichText::new("Selection").strong());
                    document_statistics(ui, selection);
                }
                None => document_statistics(ui, &state.document_stats),
            },
            SidebarTab::CheatSheet => cheat_sheet(ui, shortcuts),
        });

    ui.separator();
    ui.menu_button("⚙", |ui| {
        for (label, id) in SETTINGS_ENTRIES {
            if ui.button(label).clicked() {
                output.invoked.push(id);
                ui.close();
            }
        }
    });

    output
}

fn outline(ui: &mut Ui, state: &EditorState, output: &mut SidebarOutput) {
    if state.headings.is_empty() {
        ui.weak("No headings");
        return;
    }

    let current = state.current_heading();
    for (index, heading) in state.headings.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.add_space(f32::from(heading.level.saturating_sub(1)) * 12.0);
            let title = if heading.text.is_empty() {
                "(untitled)"
            } else {
                heading.text.as_str()
            };
            if ui.selectable_label(current == Some(index), title).clicked() {
                output.jump_to = Some(heading.position);
            }
        });
    }
}

fn rows(ui: &mut Ui, id: &str, rows: &[(&str, String)]) {
    egui::Grid::new(id).num_columns(2).striped(true).show(ui, |ui| {
        for (name, value) in rows {
            ui.label(*name);
            ui.label(value);
            ui.end_row();
        }
    });
}

fn session_statistics(ui: &mut Ui, state: &EditorState) {
    let now = Instant::now();
    let session = &state.session_stats;
    rows(
        ui,
        "session_statistics",
        &[
            ("Words Written", session.words_written().to_string()),
            ("Pages Written", session.pages_written().to_string()),
            ("Average WPM", session.words_per_minute(now).to_string()),
            ("Total Time", format_duration(session.writing_time(now))),
            ("Idle Time", format!("{}%", session.idle_percentage(now))),
        ],
    );
}

fn document_statistics(ui: &mut Ui, stats: &DocumentStatistics) {
    rows(
        ui,
        "document_statistics",
        &[
            ("Words", stats.words.to_string()),
            ("Characters", stats.characters.to_string()),
            ("Sentences", stats.sentences.to_string()),
            ("Paragraphs", stats.paragraphs.to_string()),
            ("Pages", stats.pages().to_string()),
            ("Complex Words", format!("{}%", stats.complex_words_percentage())),
            ("Reading Time", format_duration(stats.reading_time())),
            ("Reading Ease", stats.reading_ease().label().to_string()),
            ("Grade Level", grade_label(stats.readability_grade())),
        ],
    );
}

fn cheat_sheet(ui: &mut Ui, shortcuts: &[(String, String)]) {
    egui::Grid::new("cheat_sheet").num_columns(2).striped(true).show(ui, |ui| {
        for (syntax, meaning) in CHEAT_SHEET {
            ui.monospace(*syntax);
            ui.weak(*meaning);
            ui.end_row();
        }
    });

    if shortcuts.is_empty() {
        return;
    }
    ui.add_space(8.0);
    ui.label(RichText::new("Keyboard Shortcuts").strong());
    egui::Grid::new("shortcut_sheet").num_columns(2).striped(true).show(ui, |ui| {
        for (action, keys) in shortcuts {
            ui.label(action);
            ui.monospace(keys);
            ui.end_row();
        }
    });
}
