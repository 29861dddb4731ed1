use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use super::{build_rules, ensure_dirs, walk_swap_root, SwapError, SwapInterceptor, SwapMode};

/// Inputs the swap subsystem reads once per window initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SwapConfig {
    pub(crate) swap_root: PathBuf,
    pub(crate) mode: SwapMode,
    pub(crate) domain: String,
    pub(crate) scheme: String,
}

/// Scans the swap root and builds a fresh interceptor.
///
/// Returns `Ok(None)` when the root holds no swappable files and an error
/// when any part of it cannot be read; either way the window then loads
/// without request rewriting.
pub(crate) fn build_interceptor<F>(
    config: &SwapConfig,
    log: F,
) -> Result<Option<SwapInterceptor>, SwapError>
where
    F: Fn(&str),
{
    ensure_dirs([config.swap_root.as_path()], &log);

    let entries = walk_swap_root(&config.swap_root)?;

    let rules = build_rules(&entries, config.mode, &config.swap_root, &config.domain);
    let interceptor = SwapInterceptor::new(
        rules,
        config.mode,
        config.swap_root.clone(),
        &config.scheme,
    );
    if interceptor.is_empty() {
        log(&format!(
            "resource swapper found nothing to swap in {} (mode={})",
            config.swap_root.display(),
            config.mode.as_str()
        ));
        return Ok(None);
    }

    log(&format!(
        "resource swapper loaded {} files as {} patterns from {} (mode={})",
        entries.len(),
        interceptor.len(),
        config.swap_root.display(),
        config.mode.as_str()
    ));
    Ok(Some(interceptor))
}

/// Interceptors of the live windows, keyed by webview label.
#[derive(Debug, Default)]
pub(crate) struct SwapRegistry {
    interceptors: Mutex<HashMap<String, Arc<SwapInterceptor>>>,
}

impl SwapRegistry {
    pub(crate) fn insert(&self, label: &str, interceptor: SwapInterceptor) -> Arc<SwapInterceptor> {
        let interceptor = Arc::new(interceptor);
        if let Ok(mut guard) = self.interceptors.lock() {
            guard.insert(label.to_string(), Arc::clone(&interceptor));
        }
        interceptor
    }

    pub(crate) fn get(&self, label: &str) -> Option<Arc<SwapInterceptor>> {
        self.interceptors
            .lock()
            .ok()
            .and_then(|guard| guard.get(label).cloned())
    }

    pub(crate) fn remove(&self, label: &str) -> bool {
        self.interceptors
            .lock()
            .map(|mut guard| guard.remove(label).is_some())
            .unwrap_or(false)
    }
}
