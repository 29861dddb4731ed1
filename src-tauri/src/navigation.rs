use url::Url;

use crate::location::{location_type, LocationType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NavigationDecision {
    /// Let the webview navigate.
    Allow,
    /// Block and hand the URL to the system browser.
    OpenExternal(Url),
    /// Block and open the URL in a new game window.
    OpenInNewWindow(Url),
    /// Block without opening anything.
    Deny,
}

/// Decides an in-place navigation of a window currently showing `current_url`.
///
/// External pages always leave the app; leaving the game page for another
/// site page opens a second window so the running match survives.
pub(crate) fn decide_navigation(
    current_url: &str,
    target: &Url,
    domain: &str,
) -> NavigationDecision {
    match location_type(target.as_str(), domain) {
        LocationType::External if is_web_url(target) => {
            NavigationDecision::OpenExternal(target.clone())
        }
        LocationType::External => NavigationDecision::Allow,
        LocationType::Game => NavigationDecision::Allow,
        _ if location_type(current_url, domain) != LocationType::Game => NavigationDecision::Allow,
        LocationType::Unknown => NavigationDecision::Deny,
        _ => NavigationDecision::OpenInNewWindow(target.clone()),
    }
}

/// Decides a popup request (`window.open`, `target="_blank"`). The webview
/// never creates the popup itself.
pub(crate) fn decide_new_window(target: &Url, domain: &str) -> NavigationDecision {
    match location_type(target.as_str(), domain) {
        LocationType::External if is_web_url(target) => {
            NavigationDecision::OpenExternal(target.clone())
        }
        LocationType::External | LocationType::Unknown => NavigationDecision::Deny,
        _ => NavigationDecision::OpenInNewWindow(target.clone()),
    }
}

fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
