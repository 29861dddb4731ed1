use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{pattern::encode_path_segment, MatchPattern, SwapEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SwapMode {
    /// Paths are served on the game's own hosts.
    #[default]
    Normal,
    /// The first directory under the swap root names the host.
    Advanced,
}

impl SwapMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SwapRule {
    pub(crate) pattern: MatchPattern,
    pub(crate) target: PathBuf,
}

pub(crate) fn build_rules(
    entries: &[SwapEntry],
    mode: SwapMode,
    swap_root: &Path,
    domain: &str,
) -> Vec<SwapRule> {
    entries
        .iter()
        .flat_map(|entry| rules_for_entry(entry, mode, swap_root, domain))
        .collect()
}

fn rules_for_entry(
    entry: &SwapEntry,
    mode: SwapMode,
    swap_root: &Path,
    domain: &str,
) -> Vec<SwapRule> {
    let (hosts, path_segments) = match mode {
        SwapMode::Normal if entry.is_asset => {
            (vec![format!("assets.{domain}")], entry.segments.as_slice())
        }
        SwapMode::Normal => (
            vec![domain.to_string(), format!("comp.{domain}")],
            entry.segments.as_slice(),
        ),
        SwapMode::Advanced => match entry.segments.split_first() {
            Some((hostname, rest)) if !rest.is_empty() => (vec![hostname.clone()], rest),
            _ => return Vec::new(),
        },
    };

    let encoded_path: String = path_segments
        .iter()
        .map(|segment| format!("/{}", encode_path_segment(segment)))
        .collect();
    let target = entry.absolute_path(swap_root);

    hosts
        .iter()
        .flat_map(|host| {
            [false, true].map(|any_query| MatchPattern::new(host, &encoded_path, any_query))
        })
        .map(|pattern| SwapRule {
            pattern,
            target: target.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const DOMAIN: &str = "krunker.io";

    fn entry(path: &str) -> SwapEntry {
        SwapEntry::new(path.split('/').map(str::to_string).collect())
    }

    fn patterns(rules: &[SwapRule]) -> Vec<&str> {
        rules.iter().map(|rule| rule.pattern.as_str()).collect()
    }

    #[test]
    fn normal_mode_maps_assets_to_assets_host_only() {
        let root = Path::new("swap");
        let rules = build_rules(&[entry("models/foo.json")], SwapMode::Normal, root, DOMAIN);

        assert_eq!(
            patterns(&rules),
            vec![
                "*://assets.krunker.io/models/foo.json",
                "*://assets.krunker.io/models/foo.json?*",
            ]
        );
        assert!(rules
            .iter()
            .all(|rule| rule.target == root.join("models").join("foo.json")));
    }

    #[test]
    fn normal_mode_maps_other_files_to_apex_and_comp_hosts() {
        let root = Path::new("swap");
        let rules = build_rules(&[entry("maps/foo.js")], SwapMode::Normal, root, DOMAIN);

        assert_eq!(
            patterns(&rules),
            vec![
                "*://krunker.io/maps/foo.js",
                "*://krunker.io/maps/foo.js?*",
                "*://comp.krunker.io/maps/foo.js",
                "*://comp.krunker.io/maps/foo.js?*",
            ]
        );
        assert!(rules
            .iter()
            .all(|rule| rule.target == root.join("maps").join("foo.js")));
    }

    #[test]
    fn normal_mode_uses_configured_domain() {
        let rules = build_rules(
            &[entry("textures/a.png"), entry("index.html")],
            SwapMode::Normal,
            Path::new("swap"),
            "example.org",
        );

        let hosts: HashSet<&str> = rules.iter().map(|rule| rule.pattern.host()).collect();
        assert_eq!(
            hosts,
            HashSet::from(["assets.example.org", "example.org", "comp.example.org"])
        );
    }

    #[test]
    fn advanced_mode_uses_first_segment_as_hostname() {
        let root = Path::new("swap");
        let rules = build_rules(&[entry("example.com/a/b.json")], SwapMode::Advanced, root, DOMAIN);

        assert_eq!(
            patterns(&rules),
            vec!["*://example.com/a/b.json", "*://example.com/a/b.json?*"]
        );
        assert!(rules.iter().all(|rule| rule.pattern.host() == "example.com"));
        assert!(rules
            .iter()
            .all(|rule| rule.target == root.join("example.com").join("a").join("b.json")));
    }

    #[test]
    fn advanced_mode_keeps_deeper_paths_on_the_first_hostname() {
        let rules = build_rules(
            &[entry("cdn.example.com/x/y/z/w.js")],
            SwapMode::Advanced,
            Path::new("swap"),
            DOMAIN,
        );

        assert_eq!(
            patterns(&rules),
            vec![
                "*://cdn.example.com/x/y/z/w.js",
                "*://cdn.example.com/x/y/z/w.js?*",
            ]
        );
    }

    #[test]
    fn advanced_mode_skips_files_directly_under_root() {
        let rules = build_rules(
            &[entry("stray.txt")],
            SwapMode::Advanced,
            Path::new("swap"),
            DOMAIN,
        );
        assert!(rules.is_empty());
    }

    #[test]
    fn build_rules_is_idempotent() {
        let entries = vec![
            entry("models/foo.json"),
            entry("maps/foo.js"),
            entry("textures/skins/bar.png"),
        ];
        let root = Path::new("swap");

        let first: HashSet<SwapRule> =
            build_rules(&entries, SwapMode::Normal, root, DOMAIN).into_iter().collect();
        let second: HashSet<SwapRule> =
            build_rules(&entries, SwapMode::Normal, root, DOMAIN).into_iter().collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2 + 4 + 2);
    }

    #[test]
    fn build_rules_is_empty_without_entries() {
        assert!(build_rules(&[], SwapMode::Normal, Path::new("swap"), DOMAIN).is_empty());
        assert!(build_rules(&[], SwapMode::Advanced, Path::new("swap"), DOMAIN).is_empty());
    }

    #[test]
    fn swap_mode_deserializes_lowercase_names() {
        let mode: SwapMode = serde_json::from_str("\"advanced\"").expect("parse mode");
        assert_eq!(mode, SwapMode::Advanced);
        assert_eq!(SwapMode::default().as_str(), "normal");
    }
}
