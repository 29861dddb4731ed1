pub const DEFAULT_GAME_DOMAIN: &str = "krunker.io";
pub const SWAP_SCHEME: &str = "idkr";

pub const SPLASH_WINDOW_LABEL: &str = "splash";
pub const SETTINGS_WINDOW_LABEL: &str = "settings";
pub const GAME_WINDOW_LABEL_PREFIX: &str = "game";

pub const GAME_WINDOW_WIDTH: f64 = 1600.0;
pub const GAME_WINDOW_HEIGHT: f64 = 900.0;
pub const SPLASH_WINDOW_WIDTH: f64 = 600.0;
pub const SPLASH_WINDOW_HEIGHT: f64 = 300.0;
pub const SETTINGS_WINDOW_WIDTH: f64 = 600.0;
pub const SETTINGS_WINDOW_HEIGHT: f64 = 600.0;
pub const SPLASH_CLOSE_DELAY_MS: u64 = 2000;

pub const SPLASH_PAGE: &str = "splash.html";
pub const SETTINGS_PAGE: &str = "settings.html";
pub const SPLASH_MESSAGE_EVENT: &str = "splash-message";

pub const SETTINGS_FILE: &str = "config.json";
pub const DESKTOP_LOG_PREFIX: &str = "idkr.log";
pub const SWAP_DIR_NAME: &str = "swap";
pub const APP_DOCUMENTS_DIR: &str = "idkr";
