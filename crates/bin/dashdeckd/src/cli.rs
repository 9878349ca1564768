//! Command-line flags, applied on top of the config file and environment.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(name = "dashdeckd")]
#[command(version, about = "Self-hosted modular dashboard server")]
pub struct Cli {
    /// Config file [default: $DASHDECK_CONFIG, then dashdeck.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to, overriding the config file
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port, overriding the config file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Load and validate the configuration, then exit
    #[arg(long)]
    pub check_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_short_and_long_flags() {
        let cli = Cli::try_parse_from(["dashdeckd", "-c", "office.toml", "--host", "10.0.0.5", "-p", "8080"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("office.toml")));
        assert_eq!(cli.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(cli.port, Some(8080));
        assert!(!cli.check_config);
    }

    #[test]
    fn should_parse_check_config_flag() {
        let cli = Cli::try_parse_from(["dashdeckd", "--check-config"]).unwrap();
        assert!(cli.check_config);
        assert!(cli.config.is_none());
    }

    #[test]
    fn should_reject_out_of_range_port() {
        assert!(Cli::try_parse_from(["dashdeckd", "--port", "70000"]).is_err());
    }
}
