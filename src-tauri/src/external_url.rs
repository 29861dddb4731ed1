use std::process::{Command, Stdio};

use url::Url;

/// Accepts only http(s) URLs for hand-off to the system browser.
pub(crate) fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

#[cfg(target_os = "macos")]
fn system_open_command(url: &str) -> Option<Command> {
    let mut command = Command::new("open");
    command.arg(url);
    Some(command)
}

#[cfg(target_os = "windows")]
fn system_open_command(url: &str) -> Option<Command> {
    let mut command = Command::new("rundll32");
    command.args(["url.dll,FileProtocolHandler", url]);
    Some(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn system_open_command(url: &str) -> Option<Command> {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    Some(command)
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn system_open_command(_url: &str) -> Option<Command> {
    None
}

pub(crate) fn open_url_with_system_browser(url: &Url) -> Result<(), String> {
    let Some(mut command) = system_open_command(url.as_str()) else {
        return Err("Opening external URLs is not supported on this platform.".to_string());
    };
    let program = command.get_program().to_string_lossy().into_owned();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run '{program}': {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_openable_url_accepts_web_urls() {
        let url = parse_openable_url("  https://discord.gg/krunker ").expect("parse url");
        assert_eq!(url.as_str(), "https://discord.gg/krunker");
    }

    #[test]
    fn parse_openable_url_rejects_empty_and_non_web_urls() {
        assert!(parse_openable_url("   ").is_err());
        assert!(parse_openable_url("file:///etc/passwd")
            .unwrap_err()
            .contains("Unsupported URL scheme 'file'"));
        assert!(parse_openable_url("no scheme").is_err());
    }
}
