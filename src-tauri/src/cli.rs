use clap::Parser;

use crate::AutoUpdateMode;

/// Command line switches. Values given here win over the stored settings.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "idkr", version, about = "Desktop shell for the Krunker browser game")]
pub(crate) struct LaunchOptions {
    /// Open devtools in every window and log at debug level.
    #[arg(long)]
    pub(crate) debug: bool,

    /// Auto update behaviour for this launch.
    #[arg(long, value_enum)]
    pub(crate) update: Option<AutoUpdateMode>,
}

impl LaunchOptions {
    /// Parses the process arguments. Arguments that do not parse fall back to
    /// no overrides instead of aborting startup.
    pub(crate) fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_options_parse_debug_and_update_mode() {
        let options = LaunchOptions::try_parse_from(["idkr", "--debug", "--update", "skip"])
            .expect("parse launch options");
        assert!(options.debug);
        assert_eq!(options.update, Some(AutoUpdateMode::Skip));
    }

    #[test]
    fn launch_options_default_to_no_overrides() {
        let options = LaunchOptions::try_parse_from(["idkr"]).expect("parse launch options");
        assert!(!options.debug);
        assert_eq!(options.update, None);
    }

    #[test]
    fn launch_options_reject_unknown_update_modes() {
        assert!(LaunchOptions::try_parse_from(["idkr", "--update", "later"]).is_err());
    }
}
