use url::Url;

/// What a URL points at, relative to the wrapped game site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationType {
    Game,
    Social,
    Viewer,
    Editor,
    Docs,
    External,
    Unknown,
}

pub(crate) fn location_type(raw_url: &str, domain: &str) -> LocationType {
    let Ok(url) = Url::parse(raw_url) else {
        return LocationType::Unknown;
    };
    let Some(host) = url.host_str() else {
        return LocationType::External;
    };
    if !is_game_host(host, domain) {
        return LocationType::External;
    }

    let path = url.path();
    if is_docs_path(path) {
        return LocationType::Docs;
    }
    match path {
        "/" => LocationType::Game,
        "/social.html" => LocationType::Social,
        "/viewer.html" => LocationType::Viewer,
        "/editor.html" => LocationType::Editor,
        _ => LocationType::Unknown,
    }
}

fn is_game_host(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain || host == format!("www.{domain}") || host == format!("comp.{domain}")
}

fn is_docs_path(path: &str) -> bool {
    path.strip_prefix("/docs/")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .is_some_and(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "krunker.io";

    #[test]
    fn location_type_classifies_game_pages() {
        assert_eq!(location_type("https://krunker.io/", DOMAIN), LocationType::Game);
        assert_eq!(
            location_type("https://krunker.io/?game=FRA:abc", DOMAIN),
            LocationType::Game
        );
        assert_eq!(location_type("https://comp.krunker.io/", DOMAIN), LocationType::Game);
        assert_eq!(
            location_type("https://www.krunker.io/social.html?p=profile", DOMAIN),
            LocationType::Social
        );
        assert_eq!(
            location_type("https://krunker.io/viewer.html", DOMAIN),
            LocationType::Viewer
        );
        assert_eq!(
            location_type("https://krunker.io/editor.html", DOMAIN),
            LocationType::Editor
        );
        assert_eq!(
            location_type("https://krunker.io/docs/versions.txt", DOMAIN),
            LocationType::Docs
        );
    }

    #[test]
    fn location_type_marks_unknown_game_paths_and_bad_urls() {
        assert_eq!(
            location_type("https://krunker.io/docs/.txt", DOMAIN),
            LocationType::Unknown
        );
        assert_eq!(
            location_type("https://krunker.io/store.html", DOMAIN),
            LocationType::Unknown
        );
        assert_eq!(location_type("not a url", DOMAIN), LocationType::Unknown);
        assert_eq!(location_type("", DOMAIN), LocationType::Unknown);
    }

    #[test]
    fn location_type_treats_other_hosts_as_external() {
        assert_eq!(
            location_type("https://discord.gg/krunker", DOMAIN),
            LocationType::External
        );
        assert_eq!(
            location_type("https://assets.krunker.io/", DOMAIN),
            LocationType::External
        );
        assert_eq!(
            location_type("https://example.org/", "example.org"),
            LocationType::Game
        );
    }
}
