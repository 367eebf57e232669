// menu_bar - renders the menu model; clicks come back as action ids
use egui::Ui;

use crate::core::actions::{strip_mnemonic, ActionRegistry};
use crate::core::default_actions::OPEN_RECENT;
use crate::core::menu::{Menu, MenuItem, RecentFilesMenu};

pub struct MenuBarOutput {
    /// Actions clicked this frame, to be invoked through the registry.
    pub invoked: Vec<String>,
    pub menu_open: bool,
    pub hovered: bool,
}

pub fn show(
    ui: &mut Ui,
    menus: &[Menu],
    registry: &ActionRegistry,
    recent: &RecentFilesMenu,
    enabled: &dyn Fn(&str) -> bool,
) -> MenuBarOutput {
    let mut invoked = Vec::new();
    let mut menu_open = false;

    let response = egui::MenuBar::new()
        .ui(ui, |ui| {
            for menu in menus {
                let open = ui
                    .menu_button(strip_mnemonic(menu.title), |ui| {
                        show_items(ui, &menu.items, registry, recent, enabled, &mut invoked);
                    })
                    .inner
                    .is_some();
                menu_open |= open;
            }
        })
        .response;

    MenuBarOutput {
        invoked,
        menu_open,
        hovered: response.hovered(),
    }
}

fn show_items(
    ui: &mut Ui,
    items: &[MenuItem],
    registry: &ActionRegistry,
    recent: &RecentFilesMenu,
    enabled: &dyn Fn(&str) -> bool,
    invoked: &mut Vec<String>,
) {
    for item in items {
        match item {
            MenuItem::Action(id) => action_button(ui, id, registry, enabled, invoked),
            MenuItem::Separator => {
                ui.separator();
            }
            MenuItem::Submenu(menu) => {
                ui.menu_button(strip_mnemonic(menu.title), |ui| {
                    show_items(ui, &menu.items, registry, recent, enabled, invoked);
                });
            }
            MenuItem::RecentFiles => {
                for (slot, id) in OPEN_RECENT.iter().enumerate() {
                    if !recent.is_visible(slot) {
                        continue;
                    }
                    let Some(label) = recent.slot_label(slot) else {
                        continue;
                    };
                    let text = format!("{}. {}", slot + 1, strip_mnemonic(&label));
                    if ui.button(text).clicked() {
                        invoked.push(id.to_string());
                        ui.close();
                    }
                }
                if recent.files().is_empty() {
                    ui.add_enabled(false, egui::Button::new("No recent files"));
                }
            }
        }
    }
}

fn action_button(
    ui: &mut Ui,
    id: &str,
    registry: &ActionRegistry,
    enabled: &dyn Fn(&str) -> bool,
    invoked: &mut Vec<String>,
) {
    let Ok(action) = registry.action(id) else {
        return;
    };

    let label = if action.is_checkable() {
        let mark = if action.is_checked() { "✔ " } else { "   " };
        format!("{mark}{}", action.plain_label())
    } else {
        action.plain_label()
    };
    let mut button = egui::Button::new(label);
    if let Some(shortcut) = action.shortcut() {
        button = button.shortcut_text(shortcut.to_string());
    }

    let response = ui
        .add_enabled(enabled(id), button)
        .on_hover_text(action.tooltip());
    if response.clicked() {
        invoked.push(id.to_string());
        ui.close();
    }
}
