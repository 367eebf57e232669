// status_bar - document name, messages, view toggles and the statistic indicator
use std::time::{Duration, Instant};

use egui::Ui;

use crate::core::action_button::ActionButton;
use crate::core::actions::ActionRegistry;
use crate::core::default_actions as ids;
use crate::core::selection::TextPosition;
use crate::error::ActionError;

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(6);

/// What the status bar shows for the current frame.
pub struct StatusInfo {
    pub title: String,
    pub modified: bool,
    pub read_only: bool,
    pub position: TextPosition,
    /// One label per statistic, in indicator order.
    pub statistics: Vec<String>,
    pub favorite: usize,
    pub time: Option<String>,
}

pub struct StatusBar {
    buttons: Vec<(ActionButton, &'static str)>,
    message: Option<(String, Instant)>,
    operation: Option<String>,
}

impl StatusBar {
    pub fn new(registry: &mut ActionRegistry) -> Result<Self, ActionError> {
        let buttons = vec![
            (ActionButton::bind(registry, ids::TOGGLE_HTML_PREVIEW)?, "👁"),
            (ActionButton::bind(registry, ids::TOGGLE_HEMINGWAY_MODE)?, "✍"),
            (ActionButton::bind(registry, ids::TOGGLE_SIDEBAR)?, "☰"),
            (ActionButton::bind(registry, ids::TOGGLE_DISTRACTION_FREE_MODE)?, "⛶"),
        ];
        Ok(Self {
            buttons,
            message: None,
            operation: None,
        })
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.message = Some((message, Instant::now()));
    }

    pub fn set_operation(&mut self, operation: Option<String>) {
        self.operation = operation;
    }

    fn current_message(&self, now: Instant) -> Option<&str> {
        if let Some(operation) = &self.operation {
            return Some(operation);
        }
        self.message
            .as_ref()
            .filter(|(_, at)| now.duration_since(*at) < MESSAGE_TIMEOUT)
            .map(|(message, _)| message.as_str())
    }

    /// Returns the newly chosen favorite statistic, if it changed.
    pub fn show(&mut self, ui: &mut Ui, registry: &mut ActionRegistry, info: &StatusInfo) -> Option<usize> {
        let mut favorite = info.favorite.min(info.statistics.len().saturating_sub(1));
        let mut clicked = None;

        ui.horizontal(|ui| {
            let dirty = if info.modified { "*" } else { "" };
            ui.label(format!("{}{}", info.title, dirty));
            if info.read_only {
                ui.label("(read only)");
            }

            ui.separator();
            ui.label(format!(
                "Ln {}, Col {}",
                info.position.line + 1,
                info.position.column + 1
            ));

            if let Some(message) = self.current_message(Instant::now()) {
                ui.separator();
                ui.label(message);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for (index, (button, icon)) in self.buttons.iter().enumerate().rev() {
                    let tooltip = registry
                        .action(button.action_id())
                        .map(|a| a.tooltip())
                        .unwrap_or_default();
                    let response = ui
                        .add(egui::Button::new(*icon).selected(button.is_checked()))
                        .on_hover_text(tooltip);
                    if response.clicked() {
                        clicked = Some(index);
                    }
                }

                ui.separator();
                if let Some(selected) = info.statistics.get(favorite) {
                    egui::ComboBox::from_id_salt("favorite_statistic")
                        .selected_text(selected.as_str())
                        .show_ui(ui, |ui| {
                            for (index, label) in info.statistics.iter().enumerate() {
                                ui.selectable_value(&mut favorite, index, label.as_str());
                            }
                        });
                }

                if let Some(time) = &info.time {
                    ui.separator();
                    ui.label(time.as_str());
                }
            });
        });

        if let Some(index) = clicked {
            let (button, _) = &self.buttons[index];
            if let Err(e) = button.click(registry) {
                tracing::warn!("Status bar toggle failed: {e}");
            }
        }

        (favorite != info.favorite).then_some(favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_actions::register_default_actions;

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        register_default_actions(&mut registry).unwrap();
        registry
    }

    #[test]
    fn buttons_follow_their_actions() {
        let mut registry = registry();
        let bar = StatusBar::new(&mut registry).unwrap();

        registry.set_checked(ids::TOGGLE_SIDEBAR, true).unwrap();
        let (sidebar, _) = &bar.buttons[2];
        assert!(sidebar.is_checked());

        sidebar.click(&mut registry).unwrap();
        assert!(!registry.is_checked(ids::TOGGLE_SIDEBAR));
        assert!(!sidebar.is_checked());
    }

    #[test]
    fn messages_expire_but_operations_stay() {
        let mut registry = registry();
        let mut bar = StatusBar::new(&mut registry).unwrap();
        let start = Instant::now();

        bar.set_message("Saved");
        assert_eq!(bar.current_message(start), Some("Saved"));
        assert_eq!(bar.current_message(start + MESSAGE_TIMEOUT * 2), None);

        bar.set_operation(Some("Exporting...".into()));
        assert_eq!(bar.current_message(start + MESSAGE_TIMEOUT * 2), Some("Exporting..."));
    }
}
