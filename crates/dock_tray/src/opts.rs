use clap::{Parser, Subcommand};

/// Struct that gets generated from `RawOpt`.
#[derive(Debug, PartialEq, Eq)]
pub struct Opt {
    pub log_debug: bool,
    pub config_path: Option<std::path::PathBuf>,
    pub action: Action,
}

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub(super) struct RawOpt {
    /// Write out debug logs.
    #[arg(long = "debug", global = true)]
    log_debug: bool,

    /// Override path to configuration directory (directory that contains config.json and containers.json)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Action {
    /// Generate a shell completion script
    ShellCompletions {
        #[arg(short, long)]
        shell: clap_complete::Shell,
    },

    /// Run the system tray. Prints the current icons as a JSON line whenever they change.
    #[command(name = "run", alias = "r")]
    Run,

    /// Show whether an icon is kept in the container, or change it.
    #[command(name = "container")]
    Container {
        /// Key of the tray icon, e.g. `x:62914566`
        key: String,

        /// Put the icon's application into the container (true) or take it out (false)
        #[arg(long)]
        set: Option<bool>,
    },
}

impl Opt {
    pub fn from_env() -> Self {
        let raw: RawOpt = RawOpt::parse();
        raw.into()
    }
}

impl From<RawOpt> for Opt {
    fn from(other: RawOpt) -> Self {
        let RawOpt { action, log_debug, config } = other;
        Opt { action, log_debug, config_path: config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Opt {
        RawOpt::try_parse_from(std::iter::once("dock-tray").chain(args.iter().copied())).unwrap().into()
    }

    #[test]
    fn test_parse_run() {
        assert_eq!(Opt { log_debug: true, config_path: None, action: Action::Run }, parse(&["run", "--debug"]));
    }

    #[test]
    fn test_parse_container() {
        assert_eq!(
            Opt {
                log_debug: false,
                config_path: Some("/tmp/tray".into()),
                action: Action::Container { key: "x:42".to_string(), set: Some(true) },
            },
            parse(&["-c", "/tmp/tray", "container", "x:42", "--set", "true"])
        );
        assert_eq!(Action::Container { key: "sni:/a".to_string(), set: None }, parse(&["container", "sni:/a"]).action);
    }
}
