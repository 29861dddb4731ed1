use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use url::Url;

use super::{
    pattern::decode_path_segment, scheme_url_for_path, MatchPattern, SwapMode, SwapRule,
};

/// One window's immutable swap rule set.
///
/// Patterns decide *whether* a request is swapped; the file it is swapped
/// for is always recomputed from the request's own host and path, since a
/// single pattern family covers many distinct files.
#[derive(Debug)]
pub(crate) struct SwapInterceptor {
    rules: Vec<SwapRule>,
    mode: SwapMode,
    swap_root: PathBuf,
    scheme: String,
    /// Advanced mode: lowercase request host to the hostname directory as
    /// spelled on disk.
    host_dirs: HashMap<String, String>,
}

impl SwapInterceptor {
    pub(crate) fn new(
        rules: Vec<SwapRule>,
        mode: SwapMode,
        swap_root: PathBuf,
        scheme: &str,
    ) -> Self {
        let host_dirs = match mode {
            SwapMode::Advanced => host_directories(&rules, &swap_root),
            SwapMode::Normal => HashMap::new(),
        };
        Self {
            rules,
            mode,
            swap_root,
            scheme: scheme.to_string(),
            host_dirs,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn patterns(&self) -> impl Iterator<Item = &MatchPattern> {
        self.rules.iter().map(|rule| &rule.pattern)
    }

    pub(crate) fn matches(&self, url: &Url) -> bool {
        self.rules.iter().any(|rule| rule.pattern.is_match(url))
    }

    /// True for plain paths inside this window's swap root.
    pub(crate) fn serves_path(&self, path: &Path) -> bool {
        path.strip_prefix(&self.swap_root).is_ok_and(|relative| {
            !relative.as_os_str().is_empty()
                && relative
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)))
        })
    }

    /// Local file for `url`, or `None` when the request should go to the network.
    pub(crate) fn redirect_target(&self, url: &Url) -> Option<PathBuf> {
        if !self.matches(url) {
            return None;
        }
        match url.host_str().and_then(|host| self.host_dirs.get(host)) {
            Some(dir) => join_request_path(self.swap_root.join(dir), url),
            None => redirect_target_for(url, self.mode, &self.swap_root),
        }
    }

    /// Synthetic-scheme URL the request is redirected to.
    pub(crate) fn redirect_url(&self, url: &Url) -> Option<Url> {
        let target = self.redirect_target(url)?;
        scheme_url_for_path(&self.scheme, &target).ok()
    }
}

fn host_directories(rules: &[SwapRule], swap_root: &Path) -> HashMap<String, String> {
    rules
        .iter()
        .filter_map(|rule| {
            let relative = rule.target.strip_prefix(swap_root).ok()?;
            let Some(Component::Normal(dir)) = relative.components().next() else {
                return None;
            };
            Some((
                rule.pattern.host().to_string(),
                dir.to_string_lossy().into_owned(),
            ))
        })
        .collect()
}

/// Maps a request URL onto the swap root.
///
/// Normal mode keeps only the path; advanced mode nests the path under the
/// request hostname. Returns `None` for URLs whose decoded path could step
/// outside the swap root or has empty segments.
pub(crate) fn redirect_target_for(url: &Url, mode: SwapMode, swap_root: &Path) -> Option<PathBuf> {
    let base = match mode {
        SwapMode::Normal => swap_root.to_path_buf(),
        SwapMode::Advanced => swap_root.join(url.host_str()?),
    };
    join_request_path(base, url)
}

fn join_request_path(mut target: PathBuf, url: &Url) -> Option<PathBuf> {
    for segment in url.path_segments()? {
        let decoded = decode_path_segment(segment);
        if decoded.is_empty()
            || decoded == "."
            || decoded == ".."
            || decoded.contains(['/', '\\'])
        {
            return None;
        }
        target.push(decoded.as_ref());
    }

    Some(target)
}
