use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "campuschat")]
#[command(
    about = "Terminal chat assistant for UTAR Kampar campus life",
    long_about = "Terminal chat assistant for UTAR Kampar campus life\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/campuschat/config.toml\n    2. ~/.config/campuschat/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log redacted HTTP requests and responses to stderr.
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn parse_defaults() {
        let args = CliArgs::try_parse_from(["campuschat"]).expect("should parse");
        assert_eq!(args.config, None);
        assert!(!args.verbose);
    }

    #[test]
    fn parse_config_flag() {
        let args = CliArgs::try_parse_from(["campuschat", "--config", "/tmp/custom.toml"])
            .expect("parse");
        assert_eq!(
            args.config.as_deref(),
            Some(std::path::Path::new("/tmp/custom.toml"))
        );
    }

    #[test]
    fn parse_verbose_flag() {
        let args = CliArgs::try_parse_from(["campuschat", "--verbose"]).expect("parse");
        assert!(args.verbose);
    }
}
