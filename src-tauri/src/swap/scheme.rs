use std::{
    fs, io,
    path::{Path, PathBuf},
};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tauri::http::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
    HeaderValue, Response, StatusCode,
};
use url::Url;

use super::{SwapError, SwapInterceptor};

/// Everything but RFC 3986 unreserved characters, so separators and drive
/// colons survive as a single opaque path segment.
const FILE_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const INTERCEPT_QUERY_KEY: &str = "url";

/// Builds `<scheme>://localhost/<percent-encoded absolute path>`.
pub(crate) fn scheme_url_for_path(scheme: &str, path: &Path) -> Result<Url, SwapError> {
    let Some(raw) = path.to_str() else {
        return Err(SwapError::InvalidSchemeUrl {
            url: path.display().to_string(),
            reason: "path is not valid UTF-8".to_string(),
        });
    };
    let encoded = utf8_percent_encode(raw, FILE_PATH);
    let candidate = format!("{scheme}://localhost/{encoded}");
    Url::parse(&candidate).map_err(|error| SwapError::InvalidSchemeUrl {
        url: candidate,
        reason: error.to_string(),
    })
}

/// Inverse of [`scheme_url_for_path`]. No existence or sandbox checks.
///
/// Windows webviews expose custom schemes as `http://<scheme>.localhost/`, so
/// that form is accepted too.
pub(crate) fn resolve_scheme_url(scheme: &str, url: &Url) -> Result<PathBuf, SwapError> {
    if !is_scheme_url(scheme, url) {
        return Err(SwapError::InvalidSchemeUrl {
            url: url.to_string(),
            reason: format!("expected {scheme} scheme"),
        });
    }

    let encoded = url.path().trim_start_matches('/');
    let decoded = percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|error| SwapError::InvalidSchemeUrl {
            url: url.to_string(),
            reason: error.to_string(),
        })?;
    if decoded.is_empty() {
        return Err(SwapError::InvalidSchemeUrl {
            url: url.to_string(),
            reason: "missing file path".to_string(),
        });
    }

    Ok(PathBuf::from(decoded.as_ref()))
}

fn is_scheme_url(scheme: &str, url: &Url) -> bool {
    if url.scheme() == scheme {
        return true;
    }
    matches!(url.scheme(), "http" | "https")
        && url.host_str() == Some(format!("{scheme}.localhost").as_str())
}

/// Origin under which the webview exposes `scheme` to page scripts.
pub(crate) fn scheme_base_url(scheme: &str) -> String {
    if cfg!(any(windows, target_os = "android")) {
        format!("http://{scheme}.localhost/")
    } else {
        format!("{scheme}://localhost/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemeRoute {
    /// A request rewritten in the page; the window's interceptor decides the file.
    Intercept(Url),
    /// A direct file URL produced by [`scheme_url_for_path`].
    File(PathBuf),
}

impl SchemeRoute {
    pub(crate) fn parse(scheme: &str, url: &Url) -> Result<Self, SwapError> {
        if url.path() == "/" {
            let original = url
                .query_pairs()
                .find(|(key, _)| key == INTERCEPT_QUERY_KEY)
                .map(|(_, value)| value.into_owned())
                .ok_or_else(|| SwapError::InvalidSchemeUrl {
                    url: url.to_string(),
                    reason: "missing intercepted url".to_string(),
                })?;
            let original = Url::parse(&original).map_err(|error| SwapError::InvalidSchemeUrl {
                url: original.clone(),
                reason: error.to_string(),
            })?;
            return Ok(Self::Intercept(original));
        }

        resolve_scheme_url(scheme, url).map(Self::File)
    }
}

/// Serves one synthetic-scheme request.
///
/// Direct file URLs are only served from the requesting window's swap root.
/// Never fails: unknown routes and missing files become plain error responses
/// and the reason is passed to `log`.
pub(crate) fn handle_scheme_request<F>(
    scheme: &str,
    interceptor: Option<&SwapInterceptor>,
    request_url: &Url,
    log: F,
) -> Response<Vec<u8>>
where
    F: Fn(&str),
{
    let path = match SchemeRoute::parse(scheme, request_url) {
        Ok(SchemeRoute::File(path)) => {
            if !interceptor.is_some_and(|interceptor| interceptor.serves_path(&path)) {
                log(&format!(
                    "refused swap file outside the window's swap root: {}",
                    path.display()
                ));
                return text_response(StatusCode::FORBIDDEN, "path outside swap root");
            }
            path
        }
        Ok(SchemeRoute::Intercept(original)) => {
            let redirect = interceptor.and_then(|interceptor| interceptor.redirect_url(&original));
            let Some(redirect) = redirect else {
                log(&format!("swap request without matching rule: {original}"));
                return text_response(StatusCode::NOT_FOUND, "no swap rule for request");
            };
            match resolve_scheme_url(scheme, &redirect) {
                Ok(path) => path,
                Err(error) => {
                    log(&error.to_string());
                    return text_response(StatusCode::BAD_REQUEST, "invalid swap redirect");
                }
            }
        }
        Err(error) => {
            log(&error.to_string());
            return text_response(StatusCode::BAD_REQUEST, "invalid swap url");
        }
    };

    match fs::read(&path) {
        Ok(bytes) => file_response(&path, bytes),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            log(&SwapError::FileNotFoundOnResolve { path }.to_string());
            text_response(StatusCode::NOT_FOUND, "file not found")
        }
        Err(error) => {
            log(&format!("failed to read swapped file {}: {error}", path.display()));
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to read file")
        }
    }
}

/// Response for a request URL that could not be parsed at all.
pub(crate) fn bad_request_response() -> Response<Vec<u8>> {
    text_response(StatusCode::BAD_REQUEST, "invalid swap url")
}

fn file_response(path: &Path, bytes: Vec<u8>) -> Response<Vec<u8>> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    build_response(StatusCode::OK, mime.essence_str(), bytes)
}

fn text_response(status: StatusCode, message: &str) -> Response<Vec<u8>> {
    build_response(status, "text/plain", message.as_bytes().to_vec())
}

fn build_response(status: StatusCode, content_type: &str, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::swap::{build_rules, walk_swap_root, SwapMode};

    const SCHEME: &str = "idkr";

    /// Same rewrite the page shim performs for an intercepted request.
    fn intercept_url(scheme_base: &str, original: &str) -> String {
        let encoded = utf8_percent_encode(original, FILE_PATH);
        format!("{scheme_base}?{INTERCEPT_QUERY_KEY}={encoded}")
    }

    #[test]
    fn scheme_url_round_trips_absolute_paths() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("models").join("weird name #1?.json");

        let url = scheme_url_for_path(SCHEME, &path).expect("build scheme url");

        assert_eq!(url.scheme(), SCHEME);
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(resolve_scheme_url(SCHEME, &url).expect("resolve"), path);
    }

    #[test]
    fn resolve_scheme_url_accepts_windows_localhost_form() {
        let url = Url::parse("http://idkr.localhost/%2Fswap%2Fmaps%2Ffoo.js").expect("url");
        assert_eq!(
            resolve_scheme_url(SCHEME, &url).expect("resolve"),
            PathBuf::from("/swap/maps/foo.js")
        );
    }

    #[test]
    fn resolve_scheme_url_rejects_foreign_schemes_and_empty_paths() {
        let foreign = Url::parse("https://krunker.io/%2Fetc%2Fpasswd").expect("url");
        assert!(resolve_scheme_url(SCHEME, &foreign).is_err());

        let empty = Url::parse("idkr://localhost/").expect("url");
        assert!(resolve_scheme_url(SCHEME, &empty).is_err());
    }

    #[test]
    fn scheme_route_parses_intercepted_requests() {
        let raw = intercept_url("idkr://localhost/", "https://krunker.io/maps/foo.js?v=1&x=2");
        let url = Url::parse(&raw).expect("intercept url");

        assert_eq!(
            SchemeRoute::parse(SCHEME, &url).expect("parse route"),
            SchemeRoute::Intercept(
                Url::parse("https://krunker.io/maps/foo.js?v=1&x=2").expect("url")
            )
        );
    }

    #[test]
    fn handle_scheme_request_serves_intercepted_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("textures")).expect("create textures dir");
        fs::write(temp.path().join("textures").join("a.png"), b"png-bytes").expect("write file");
        let entries = walk_swap_root(temp.path()).expect("walk");
        let rules = build_rules(&entries, SwapMode::Normal, temp.path(), "krunker.io");
        let interceptor =
            SwapInterceptor::new(rules, SwapMode::Normal, temp.path().to_path_buf(), SCHEME);
        let url = Url::parse(&intercept_url(
            "idkr://localhost/",
            "https://assets.krunker.io/textures/a.png?build=abc",
        ))
        .expect("intercept url");

        let response = handle_scheme_request(SCHEME, Some(&interceptor), &url, |_| {});

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_slice(), b"png-bytes");
        assert_eq!(
            response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
    }

    #[test]
    fn handle_scheme_request_reports_missing_files_as_not_found() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let interceptor =
            SwapInterceptor::new(Vec::new(), SwapMode::Normal, temp.path().to_path_buf(), SCHEME);
        let url = scheme_url_for_path(SCHEME, &temp.path().join("gone.png")).expect("url");
        let messages = RefCell::new(Vec::new());

        let response = handle_scheme_request(SCHEME, Some(&interceptor), &url, |message| {
            messages.borrow_mut().push(message.to_string())
        });

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(messages.borrow().len(), 1);
        assert!(messages.borrow()[0].contains("gone.png"));
    }

    #[test]
    fn handle_scheme_request_rejects_intercepts_without_interceptor() {
        let url = Url::parse(&intercept_url("idkr://localhost/", "https://krunker.io/a.js"))
            .expect("intercept url");
        let response = handle_scheme_request(SCHEME, None, &url, |_| {});
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn handle_scheme_request_refuses_files_outside_swap_root() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let swap_root = temp.path().join("swap");
        fs::create_dir_all(&swap_root).expect("create swap root");
        let secret = temp.path().join("secret.txt");
        fs::write(&secret, b"private").expect("write secret");
        let interceptor =
            SwapInterceptor::new(Vec::new(), SwapMode::Normal, swap_root.clone(), SCHEME);
        let url = scheme_url_for_path(SCHEME, &secret).expect("url");

        let response = handle_scheme_request(SCHEME, Some(&interceptor), &url, |_| {});
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_ne!(response.body().as_slice(), b"private");

        let escaped = scheme_url_for_path(SCHEME, &swap_root.join("..").join("secret.txt"))
            .expect("url");
        let response = handle_scheme_request(SCHEME, Some(&interceptor), &escaped, |_| {});
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = handle_scheme_request(SCHEME, None, &url, |_| {});
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
