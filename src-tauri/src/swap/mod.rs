//! Resource swapping: local files served in place of matching game requests.
//!
//! A swap root is scanned once per window. Every file found becomes one or
//! more [`SwapRule`]s, the window gets its own [`SwapInterceptor`], and the
//! synthetic scheme handler serves the redirected files from disk.

mod error;
mod install;
mod interceptor;
mod path;
mod pattern;
mod rules;
mod scheme;
mod shim;
mod walker;

pub(crate) use error::SwapError;
pub(crate) use install::{build_interceptor, SwapConfig, SwapRegistry};
pub(crate) use interceptor::SwapInterceptor;
pub(crate) use path::{ensure_dirs, is_valid_path};
pub(crate) use pattern::MatchPattern;
pub(crate) use rules::{build_rules, SwapMode, SwapRule};
pub(crate) use scheme::{bad_request_response, handle_scheme_request, scheme_url_for_path};
pub(crate) use shim::request_shim_script;
pub(crate) use walker::{walk_swap_root, SwapEntry};
