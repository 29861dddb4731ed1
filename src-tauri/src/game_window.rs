use tauri::{
    webview::NewWindowResponse, AppHandle, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use url::Url;

use crate::{
    append_desktop_log, append_swap_error_log, append_swap_log, browser_args, external_url,
    location::{location_type, LocationType},
    navigation::{decide_navigation, decide_new_window, NavigationDecision},
    runtime_paths, shortcuts,
    swap::{self, SwapRegistry},
    window_actions, AppSettingsState, GameWindowCounter, LaunchState, Settings,
    GAME_WINDOW_HEIGHT, GAME_WINDOW_WIDTH,
};

const GAME_WINDOW_TITLE: &str = "idkr";

/// Creates a hidden game window for `raw_url`. It is shown once its first
/// page finishes loading, see [`reveal_window`].
///
/// The resource swapper is scanned here, before the webview exists, so the
/// page never issues a request without the window's full rule set in place.
pub fn open_game_window(app_handle: &AppHandle, raw_url: &str) -> Result<WebviewWindow, String> {
    let url = Url::parse(raw_url)
        .map_err(|error| format!("Invalid game window url {raw_url}: {error}"))?;
    let settings = app_handle.state::<AppSettingsState>().snapshot();
    let launch = *app_handle.state::<LaunchState>();
    let label = app_handle.state::<GameWindowCounter>().next_label();

    let bindings = shortcuts::key_bindings(cfg!(target_os = "macos"), true);
    let mut builder = WebviewWindowBuilder::new(app_handle, &label, WebviewUrl::External(url))
        .title(GAME_WINDOW_TITLE)
        .inner_size(GAME_WINDOW_WIDTH, GAME_WINDOW_HEIGHT)
        .visible(false)
        .initialization_script(&shortcuts::shortcut_listener_script(&bindings));

    if let Some(shim) = install_resource_swapper(app_handle, &label, &settings) {
        builder = builder.initialization_script(&shim);
    }

    let navigation_app = app_handle.clone();
    let navigation_label = label.clone();
    let domain = settings.game_domain.clone();
    builder = builder.on_navigation(move |target| {
        handle_navigation(&navigation_app, &navigation_label, &domain, target)
    });

    let popup_app = app_handle.clone();
    let popup_label = label.clone();
    let popup_domain = settings.game_domain.clone();
    builder = builder.on_new_window(move |target, _features| {
        let decision = decide_new_window(&target, &popup_domain);
        apply_decision(&popup_app, decision, || {
            append_desktop_log(&format!("blocked popup from {popup_label} to {target}"));
        });
        NewWindowResponse::Deny
    });

    let window = browser_args::apply_browser_args(builder, &settings)
        .build()
        .map_err(|error| {
            app_handle.state::<SwapRegistry>().remove(&label);
            format!("Failed to create game window {label}: {error}")
        })?;

    if let Err(error) = window.remove_menu() {
        append_desktop_log(&format!("failed to remove menu from {label}: {error}"));
    }
    if launch.debug {
        window.open_devtools();
    }

    append_desktop_log(&format!("opened game window {label}: {raw_url}"));
    Ok(window)
}

/// Opens a game window off the current call stack; window creation from
/// inside webview callbacks can deadlock on Windows.
pub fn spawn_game_window(app_handle: &AppHandle, url: String) {
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(error) = open_game_window(&app_handle, &url) {
            append_desktop_log(&error);
        }
    });
}

fn install_resource_swapper(
    app_handle: &AppHandle,
    label: &str,
    settings: &Settings,
) -> Option<String> {
    let documents_dir = runtime_paths::accessible_documents_dir();
    let config = settings.swap_config(documents_dir.as_deref(), append_swap_log)?;
    let interceptor = match swap::build_interceptor(&config, append_swap_log) {
        Ok(interceptor) => interceptor?,
        Err(error) => {
            append_swap_error_log(&format!("resource swapper disabled for {label}: {error}"));
            return None;
        }
    };
    let shim = swap::request_shim_script(&interceptor, &config.scheme);
    app_handle
        .state::<SwapRegistry>()
        .insert(label, interceptor);
    Some(shim)
}

fn handle_navigation(app_handle: &AppHandle, label: &str, domain: &str, target: &Url) -> bool {
    let current_url = app_handle
        .get_webview_window(label)
        .map(|window| window_actions::current_url(&window))
        .unwrap_or_default();

    let decision = decide_navigation(&current_url, target, domain);
    apply_decision(app_handle, decision, || {
        append_desktop_log(&format!("blocked navigation from {current_url} to {target}"));
    })
}

/// Carries out a navigation decision; returns whether the webview may proceed.
fn apply_decision(
    app_handle: &AppHandle,
    decision: NavigationDecision,
    on_deny: impl FnOnce(),
) -> bool {
    match decision {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternal(url) => {
            if let Err(error) = external_url::open_url_with_system_browser(&url) {
                append_desktop_log(&format!("failed to open external url {url}: {error}"));
            }
            false
        }
        NavigationDecision::OpenInNewWindow(url) => {
            spawn_game_window(app_handle, url.to_string());
            false
        }
        NavigationDecision::Deny => {
            on_deny();
            false
        }
    }
}

/// Shows a window that is still hidden after a page load, restoring the
/// saved fullscreen state when the page is the game itself.
pub fn reveal_window(window: &WebviewWindow, settings: &Settings) {
    if window.is_visible().unwrap_or(true) {
        return;
    }

    let on_game_page = location_type(&window_actions::current_url(window), &settings.game_domain)
        == LocationType::Game;
    if on_game_page {
        if let Err(error) = window.set_fullscreen(settings.full_screen) {
            append_desktop_log(&format!("failed to restore fullscreen: {error}"));
        }
    }
    if let Err(error) = window.show() {
        append_desktop_log(&format!(
            "failed to show window {}: {error}",
            window.label()
        ));
    }
}

/// Brings the first open game window to the front.
pub fn focus_game_window(app_handle: &AppHandle) -> bool {
    let mut game_windows: Vec<WebviewWindow> = app_handle
        .webview_windows()
        .into_values()
        .filter(|window| crate::app_types::is_game_window_label(window.label()))
        .collect();
    game_windows.sort_by(|a, b| a.label().cmp(b.label()));

    let Some(window) = game_windows.first() else {
        return false;
    };
    if let Ok(true) = window.is_minimized() {
        let _ = window.unminimize();
    }
    let _ = window.show();
    window.set_focus().is_ok()
}
