#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod browser_args;
mod cli;
mod desktop_bridge_commands;
mod external_url;
mod game_window;
mod location;
mod logging;
mod navigation;
mod runtime_paths;
mod settings;
mod settings_window;
mod shortcut_handler;
mod shortcuts;
mod startup_task;
mod swap;
mod updater;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AppSettingsState, AutoUpdateMode, BridgeResult, GameWindowCounter, LaunchState,
};
pub(crate) use logging::{
    append_desktop_log, append_error_log, append_startup_log, append_swap_error_log,
    append_swap_log, append_update_log,
};
pub(crate) use settings::Settings;

fn main() {
    app_runtime::run();
}
