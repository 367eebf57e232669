// core - toolkit independent editor logic
pub mod action_button;
pub mod actions;
pub mod default_actions;
pub mod dispatch;
pub mod edit_history;
pub mod export;
pub mod find_replace;
pub mod formatting;
pub mod history;
pub mod menu;
pub mod outline;
pub mod selection;
pub mod settings;
pub mod shortcuts;
pub mod sidebar;
pub mod startup;
pub mod statistics;
pub mod view_state;
pub mod window_settings;
pub mod workspace;
