use std::cell::RefCell;

use tauri::{
    ipc::CapabilityBuilder, webview::PageLoadEvent, AppHandle, Manager, RunEvent, WindowEvent,
};
use url::Url;

use crate::{
    append_desktop_log, append_error_log, append_startup_log, append_swap_error_log,
    append_swap_log, cli::LaunchOptions, game_window, logging, runtime_paths, settings,
    startup_task,
    swap::{self, SwapRegistry},
    AppSettingsState, GameWindowCounter, LaunchState, Settings, GAME_WINDOW_LABEL_PREFIX,
    SPLASH_WINDOW_LABEL, SWAP_SCHEME,
};

const GAME_REMOTE_CAPABILITY: &str = "game-remote";

/// Loads settings before the log subscriber exists and replays whatever the
/// loader reported once logging is up.
fn load_startup_settings(app_root_dir: Option<&std::path::Path>) -> (Settings, Vec<String>) {
    let pending = RefCell::new(Vec::new());
    let settings = runtime_paths::settings_path(app_root_dir)
        .map(|path| {
            settings::load_settings(&path, |message| {
                pending.borrow_mut().push(message.to_string())
            })
        })
        .unwrap_or_default();
    (settings, pending.into_inner())
}

/// Origins whose pages may reach the IPC bridge from inside a game window.
fn game_remote_urls(domain: &str) -> Vec<String> {
    let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    vec![format!("https://{domain}/*"), format!("https://*.{domain}/*")]
}

/// Grants game windows IPC access for the configured game domain only.
fn add_game_remote_capability(app_handle: &AppHandle) -> Result<(), String> {
    let domain = app_handle.state::<AppSettingsState>().snapshot().game_domain;
    let capability = game_remote_urls(&domain).into_iter().fold(
        CapabilityBuilder::new(GAME_REMOTE_CAPABILITY)
            .window(format!("{GAME_WINDOW_LABEL_PREFIX}-*"))
            .permission("core:event:default"),
        CapabilityBuilder::remote,
    );
    app_handle
        .add_capability(capability)
        .map_err(|error| format!("Failed to grant IPC access to {domain}: {error}"))
}

pub(crate) fn run() {
    let options = LaunchOptions::from_env();
    let app_root_dir = runtime_paths::default_app_root_dir();
    let (settings, pending_messages) = load_startup_settings(app_root_dir.as_deref());
    let launch = LaunchState::resolve(&settings, &options);

    let log_dir = runtime_paths::log_dir(app_root_dir.as_deref());
    let _log_guard = match logging::init_logging(&log_dir, launch.debug) {
        Ok(guard) => Some(guard),
        Err(error) => {
            eprintln!("{error}");
            None
        }
    };
    for message in &pending_messages {
        append_startup_log(message);
    }

    append_startup_log("desktop process starting");
    append_startup_log(&format!("desktop log directory: {}", log_dir.display()));
    append_startup_log(&format!(
        "launch: debug={} update_mode={} game_url={}",
        launch.debug,
        launch.update_mode.as_str(),
        settings.game_url()
    ));

    let settings_path = runtime_paths::settings_path(app_root_dir.as_deref());
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _argv, _cwd| {
            append_desktop_log("second instance started, focusing existing window");
            if !game_window::focus_game_window(app_handle) {
                if let Some(splash) = app_handle.get_webview_window(SPLASH_WINDOW_LABEL) {
                    let _ = splash.set_focus();
                }
            }
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppSettingsState::new(settings_path, settings))
        .manage(launch)
        .manage(GameWindowCounter::default())
        .manage(SwapRegistry::default())
        .manage(startup_task::StartupState::default())
        .register_asynchronous_uri_scheme_protocol(SWAP_SCHEME, |ctx, request, responder| {
            let interceptor = ctx
                .app_handle()
                .state::<SwapRegistry>()
                .get(ctx.webview_label());
            let raw_uri = request.uri().to_string();

            tauri::async_runtime::spawn_blocking(move || {
                let response = match Url::parse(&raw_uri) {
                    Ok(url) => swap::handle_scheme_request(
                        SWAP_SCHEME,
                        interceptor.as_deref(),
                        &url,
                        append_swap_error_log,
                    ),
                    Err(error) => {
                        append_swap_error_log(&format!(
                            "unparseable swap request {raw_uri}: {error}"
                        ));
                        swap::bad_request_response()
                    }
                };
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_shortcut,
            crate::desktop_bridge_commands::desktop_get_settings,
            crate::desktop_bridge_commands::desktop_set_setting,
            crate::desktop_bridge_commands::desktop_open_external_url,
        ])
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                let registry = window.app_handle().state::<SwapRegistry>();
                if registry.remove(window.label()) {
                    append_swap_log(&format!("released swap rules of {}", window.label()));
                }
            }
        })
        .on_page_load(|webview, payload| {
            if !matches!(payload.event(), PageLoadEvent::Finished) {
                return;
            }
            append_desktop_log(&format!(
                "page-load finished in {}: {}",
                webview.label(),
                payload.url()
            ));

            let app_handle = webview.app_handle();
            if let Some(window) = app_handle.get_webview_window(webview.label()) {
                let settings = app_handle.state::<AppSettingsState>().snapshot();
                game_window::reveal_window(&window, &settings);
            }
            if webview.label() == SPLASH_WINDOW_LABEL {
                startup_task::spawn_startup_task(app_handle.clone());
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = add_game_remote_capability(&app_handle) {
                append_error_log(&error);
            }
            if let Err(error) = startup_task::open_splash_window(&app_handle) {
                append_error_log(&error);
                startup_task::spawn_startup_task(app_handle);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| {
            if let RunEvent::Exit = event {
                append_desktop_log("desktop process exiting");
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_startup_settings_defaults_without_app_root() {
        let (settings, messages) = load_startup_settings(None);
        assert_eq!(settings, Settings::default());
        assert!(messages.is_empty());
    }

    #[test]
    fn load_startup_settings_collects_loader_messages() {
        let temp = tempfile::tempdir().expect("create temp dir");
        std::fs::write(temp.path().join(crate::SETTINGS_FILE), "{ not json")
            .expect("write broken settings");

        let (settings, messages) = load_startup_settings(Some(temp.path()));

        assert_eq!(settings, Settings::default());
        assert!(!messages.is_empty());
    }

    #[test]
    fn game_remote_urls_cover_configured_domain_and_subdomains() {
        assert_eq!(
            game_remote_urls("Krunker.io"),
            vec!["https://krunker.io/*", "https://*.krunker.io/*"]
        );
        assert_eq!(
            game_remote_urls("example.org."),
            vec!["https://example.org/*", "https://*.example.org/*"]
        );
    }
}
