use tauri::{Manager, Runtime, WebviewWindowBuilder};

use crate::Settings;

/// WebView2 keeps these disabled by default; overriding the argument list
/// must carry them over.
const WEBVIEW2_DEFAULT_ARGS: &str =
    "--disable-features=msWebOOUI,msPdfOOUI,msSmartScreenProtection";

/// Chromium switches derived from the graphics settings.
pub(crate) fn browser_switches(settings: &Settings) -> Vec<String> {
    let mut switches = vec!["--autoplay-policy=no-user-gesture-required".to_string()];

    if !settings.accelerated_canvas {
        switches.push("--disable-accelerated-2d-canvas".to_string());
    }
    if settings.disable_frame_rate_limit {
        switches.push("--disable-frame-rate-limit".to_string());
    }
    if let Some(backend) = non_default(&settings.angle_backend) {
        switches.push(format!("--use-angle={backend}"));
    }
    if let Some(profile) = non_default(&settings.color_profile) {
        switches.push(format!("--force-color-profile={profile}"));
    }

    switches
}

/// Full argument string for `additional_browser_args`.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn additional_browser_args(settings: &Settings) -> String {
    let mut args = vec![WEBVIEW2_DEFAULT_ARGS.to_string()];
    args.extend(browser_switches(settings));
    args.join(" ")
}

/// Every window must share the same WebView2 arguments, so all builders go
/// through here. Other platforms have no per-window browser switches.
pub(crate) fn apply_browser_args<'a, R, M>(
    builder: WebviewWindowBuilder<'a, R, M>,
    settings: &Settings,
) -> WebviewWindowBuilder<'a, R, M>
where
    R: Runtime,
    M: Manager<R>,
{
    #[cfg(windows)]
    let builder = builder.additional_browser_args(&additional_browser_args(settings));
    #[cfg(not(windows))]
    let _ = settings;

    builder
}

fn non_default(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == "default" || value.contains(char::is_whitespace) {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_switches_for_default_settings() {
        assert_eq!(
            browser_switches(&Settings::default()),
            vec![
                "--autoplay-policy=no-user-gesture-required",
                "--disable-frame-rate-limit",
            ]
        );
    }

    #[test]
    fn browser_switches_reflect_graphics_settings() {
        let settings = Settings {
            accelerated_canvas: false,
            disable_frame_rate_limit: false,
            angle_backend: "d3d9".to_string(),
            color_profile: "srgb".to_string(),
            ..Settings::default()
        };

        assert_eq!(
            browser_switches(&settings),
            vec![
                "--autoplay-policy=no-user-gesture-required",
                "--disable-accelerated-2d-canvas",
                "--use-angle=d3d9",
                "--force-color-profile=srgb",
            ]
        );
    }

    #[test]
    fn browser_switches_ignore_values_with_whitespace() {
        let settings = Settings {
            angle_backend: "gl --no-sandbox".to_string(),
            ..Settings::default()
        };
        assert!(!browser_switches(&settings)
            .iter()
            .any(|switch| switch.starts_with("--use-angle")));
    }

    #[test]
    fn additional_browser_args_keeps_webview2_defaults_first() {
        let args = additional_browser_args(&Settings::default());
        assert!(args.starts_with(WEBVIEW2_DEFAULT_ARGS));
        assert!(args.ends_with("--disable-frame-rate-limit"));
    }
}
