use serde::Serialize;

pub const SHORTCUT_TOGGLE_DEVTOOLS: &str = "toggle_devtools";
pub const SHORTCUT_GO_BACK: &str = "go_back";
pub const SHORTCUT_GO_FORWARD: &str = "go_forward";
pub const SHORTCUT_CLEAR_CACHE: &str = "clear_cache";
pub const SHORTCUT_OPEN_SETTINGS: &str = "open_settings";
pub const SHORTCUT_EXIT_POINTER_LOCK: &str = "exit_pointer_lock";
pub const SHORTCUT_RELOAD_GAME: &str = "reload_game";
pub const SHORTCUT_RELOAD: &str = "reload";
pub const SHORTCUT_HARD_RELOAD: &str = "hard_reload";
pub const SHORTCUT_TOGGLE_FULLSCREEN: &str = "toggle_fullscreen";
pub const SHORTCUT_COPY_URL: &str = "copy_url";
pub const SHORTCUT_NEW_WINDOW: &str = "new_window";
pub const SHORTCUT_DUPLICATE_WINDOW: &str = "duplicate_window";
pub const SHORTCUT_RELAUNCH: &str = "relaunch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    ToggleDevtools,
    GoBack,
    GoForward,
    ClearCacheAndRelaunch,
    OpenSettings,
    ExitPointerLock,
    ReloadGame,
    Reload,
    HardReload,
    ToggleFullscreen,
    CopyUrl,
    NewWindow,
    DuplicateWindow,
    Relaunch,
}

pub fn action_from_shortcut_id(shortcut_id: &str) -> Option<ShortcutAction> {
    match shortcut_id {
        SHORTCUT_TOGGLE_DEVTOOLS => Some(ShortcutAction::ToggleDevtools),
        SHORTCUT_GO_BACK => Some(ShortcutAction::GoBack),
        SHORTCUT_GO_FORWARD => Some(ShortcutAction::GoForward),
        SHORTCUT_CLEAR_CACHE => Some(ShortcutAction::ClearCacheAndRelaunch),
        SHORTCUT_OPEN_SETTINGS => Some(ShortcutAction::OpenSettings),
        SHORTCUT_EXIT_POINTER_LOCK => Some(ShortcutAction::ExitPointerLock),
        SHORTCUT_RELOAD_GAME => Some(ShortcutAction::ReloadGame),
        SHORTCUT_RELOAD => Some(ShortcutAction::Reload),
        SHORTCUT_HARD_RELOAD => Some(ShortcutAction::HardReload),
        SHORTCUT_TOGGLE_FULLSCREEN => Some(ShortcutAction::ToggleFullscreen),
        SHORTCUT_COPY_URL => Some(ShortcutAction::CopyUrl),
        SHORTCUT_NEW_WINDOW => Some(ShortcutAction::NewWindow),
        SHORTCUT_DUPLICATE_WINDOW => Some(ShortcutAction::DuplicateWindow),
        SHORTCUT_RELAUNCH => Some(ShortcutAction::Relaunch),
        _ => None,
    }
}

/// A concrete key chord as seen by a DOM `keydown` listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBinding {
    pub code: &'static str,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub id: &'static str,
    pub prevent_default: bool,
}

#[derive(Clone, Copy)]
enum Modifier {
    /// Cmd on macOS, Ctrl elsewhere.
    Primary,
    Ctrl,
    Alt,
    Shift,
    Meta,
}

fn chord(
    code: &'static str,
    modifiers: &[Modifier],
    id: &'static str,
    is_mac: bool,
) -> KeyBinding {
    let mut binding = KeyBinding {
        code,
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
        id,
        prevent_default: id != SHORTCUT_EXIT_POINTER_LOCK,
    };
    for modifier in modifiers {
        match modifier {
            Modifier::Primary if is_mac => binding.meta = true,
            Modifier::Primary | Modifier::Ctrl => binding.ctrl = true,
            Modifier::Alt => binding.alt = true,
            Modifier::Shift => binding.shift = true,
            Modifier::Meta => binding.meta = true,
        }
    }
    binding
}

/// Shortcuts for a window. Web windows (the game and other site pages) get
/// navigation and window management keys on top of the common set.
pub fn key_bindings(is_mac: bool, web_window: bool) -> Vec<KeyBinding> {
    use Modifier::{Alt, Ctrl, Meta, Primary, Shift};

    let mut bindings = if is_mac {
        vec![
            chord("KeyI", &[Meta, Alt], SHORTCUT_TOGGLE_DEVTOOLS, is_mac),
            chord("ArrowLeft", &[Meta], SHORTCUT_GO_BACK, is_mac),
            chord("ArrowRight", &[Meta], SHORTCUT_GO_FORWARD, is_mac),
        ]
    } else {
        vec![
            chord("KeyI", &[Ctrl, Shift], SHORTCUT_TOGGLE_DEVTOOLS, is_mac),
            chord("ArrowLeft", &[Alt], SHORTCUT_GO_BACK, is_mac),
            chord("ArrowRight", &[Alt], SHORTCUT_GO_FORWARD, is_mac),
        ]
    };
    bindings.extend([
        chord("Delete", &[Primary, Shift], SHORTCUT_CLEAR_CACHE, is_mac),
        chord("KeyF", &[Primary, Alt], SHORTCUT_OPEN_SETTINGS, is_mac),
        chord("Escape", &[], SHORTCUT_EXIT_POINTER_LOCK, is_mac),
    ]);

    if web_window {
        bindings.extend([
            chord("F6", &[], SHORTCUT_RELOAD_GAME, is_mac),
            chord("F5", &[], SHORTCUT_RELOAD, is_mac),
            chord("F5", &[Shift], SHORTCUT_HARD_RELOAD, is_mac),
            chord("F11", &[], SHORTCUT_TOGGLE_FULLSCREEN, is_mac),
            chord("KeyL", &[Primary], SHORTCUT_COPY_URL, is_mac),
            chord("KeyN", &[Primary], SHORTCUT_NEW_WINDOW, is_mac),
            chord("KeyN", &[Primary, Shift], SHORTCUT_DUPLICATE_WINDOW, is_mac),
            chord("KeyR", &[Primary, Alt], SHORTCUT_RELAUNCH, is_mac),
        ]);
    }

    bindings
}

/// Page script forwarding matching `keydown` chords to `desktop_shortcut`.
pub fn shortcut_listener_script(bindings: &[KeyBinding]) -> String {
    let bindings_json = serde_json::to_string(bindings).unwrap_or_else(|_| "[]".to_string());
    LISTENER_TEMPLATE.replace("__SHORTCUT_BINDINGS__", &bindings_json)
}

const LISTENER_TEMPLATE: &str = r#"(() => {
  if (window.__idkrShortcutsInstalled) return;
  window.__idkrShortcutsInstalled = true;
  const bindings = __SHORTCUT_BINDINGS__;
  window.addEventListener("keydown", (event) => {
    const binding = bindings.find((candidate) =>
      candidate.code === event.code &&
      candidate.ctrl === event.ctrlKey &&
      candidate.alt === event.altKey &&
      candidate.shift === event.shiftKey &&
      candidate.meta === event.metaKey);
    if (!binding) return;
    if (binding.preventDefault) event.preventDefault();
    const invoke = window.__TAURI_INTERNALS__ && window.__TAURI_INTERNALS__.invoke;
    if (invoke) invoke("desktop_shortcut", { id: binding.id }).catch(() => {});
  }, true);
})();
"#;
