//! CLI module for the SheSafe monitor
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `alerts`, `alert`, `screenshots`, `stats` - Inspect detected alerts
//! - `delete`, `clear` - Remove alerts (asks for confirmation)
//! - `download` - Save an alert's frame to disk
//! - `count`, `gestures`, `watch` - Live views driven by polling
//! - `health` - Probe the backend
//! - `cameras` - List configured cameras
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Live dashboard against a remote backend
//! shesafe watch --backend-url http://192.168.1.20:5000
//!
//! # Delete an alert without prompting
//! shesafe delete 42 --yes
//! ```

pub mod alerts;
pub mod cameras;
pub mod completions;
pub mod config;
pub mod health;
pub mod live;
pub mod output;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::api::{AlertType, SheSafeApi};
use crate::config::MonitorConfig;
use crate::poll::PollOptions;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Result type shared by command handlers.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// SheSafe - terminal monitor for the SheSafe detection backend
#[derive(Parser, Debug)]
#[command(
    name = "shesafe",
    version,
    about = "Terminal monitor for the SheSafe safety-detection backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recent alerts
    Alerts(ListArgs),
    /// Show one alert in detail
    Alert(AlertArgs),
    /// Delete one alert
    Delete(DeleteArgs),
    /// Delete every alert
    Clear(ClearArgs),
    /// Save an alert's frame to disk
    Download(DownloadArgs),
    /// List recent alerts that have a captured frame
    Screenshots(ListArgs),
    /// Alert counts by type and gesture
    Stats(JsonArgs),
    /// Current male/female headcount
    Count(JsonArgs),
    /// Follow live gesture detection
    Gestures(FollowArgs),
    /// Live dashboard of headcount, alerts and backend health
    Watch(FollowArgs),
    /// Check backend reachability
    Health(JsonArgs),
    /// List configured cameras
    Cameras(JsonArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that talks to the backend.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "shesafe.toml")]
    pub config: PathBuf,

    /// Override backend URL
    #[arg(short = 'u', long)]
    pub backend_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only show alerts of this type
    #[arg(short = 't', long = "type", value_enum)]
    pub alert_type: Option<AlertTypeArg>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Alert types accepted by `--type`, spelled as the backend stores them.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTypeArg {
    #[value(name = "distress")]
    Distress,
    #[value(name = "lone_woman_night")]
    LoneWomanNight,
    #[value(name = "woman_surrounded")]
    WomanSurrounded,
    #[value(name = "woman_surrounded_spatial")]
    WomanSurroundedSpatial,
}

impl From<AlertTypeArg> for AlertType {
    fn from(arg: AlertTypeArg) -> Self {
        match arg {
            AlertTypeArg::Distress => AlertType::Distress,
            AlertTypeArg::LoneWomanNight => AlertType::LoneWomanNight,
            AlertTypeArg::WomanSurrounded => AlertType::WomanSurrounded,
            AlertTypeArg::WomanSurroundedSpatial => AlertType::WomanSurroundedSpatial,
        }
    }
}

#[derive(Args, Debug)]
pub struct AlertArgs {
    /// Alert ID
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Alert ID
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Alert ID
    pub id: i64,

    /// Output file (default: ./alert_<id>.jpg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct FollowArgs {
    /// Stop after this many updates (default: run until Ctrl-C)
    #[arg(short = 'n', long)]
    pub ticks: Option<u32>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "shesafe.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Resolve configuration for a command.
///
/// A missing config file falls back to defaults; an unreadable or invalid
/// one is an error. Environment overrides apply on top of the file, and
/// `--backend-url` on top of both.
pub fn load_config(args: &ConnectionArgs) -> CliResult<MonitorConfig> {
    let config = if args.config.exists() {
        MonitorConfig::load(Some(&args.config))?
    } else {
        tracing::debug!(path = %args.config.display(), "Config file not found, using defaults");
        MonitorConfig::default()
    };

    let mut config = config.with_env_overrides();
    if let Some(url) = &args.backend_url {
        config.backend.base_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Build the backend client for a resolved configuration.
pub fn connect(config: &MonitorConfig) -> CliResult<SheSafeApi> {
    Ok(SheSafeApi::new(&config.backend)?)
}

/// Poll options for an interval, bounded by the configured fetch timeout.
pub fn poll_options(config: &MonitorConfig, interval_ms: u64) -> PollOptions {
    PollOptions::every_ms(interval_ms).with_timeout(config.polling.fetch_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_alerts_defaults() {
        let cli = Cli::try_parse_from(["shesafe", "alerts"]).unwrap();
        match cli.command {
            Commands::Alerts(args) => {
                assert!(!args.json);
                assert!(args.alert_type.is_none());
                assert_eq!(args.connection.config, PathBuf::from("shesafe.toml"));
                assert!(args.connection.backend_url.is_none());
            }
            _ => panic!("Expected Alerts command"),
        }
    }

    #[test]
    fn test_cli_parse_delete_yes() {
        let cli = Cli::try_parse_from(["shesafe", "delete", "42", "--yes"]).unwrap();
        match cli.command {
            Commands::Delete(args) => {
                assert_eq!(args.id, 42);
                assert!(args.yes);
            }
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_cli_parse_download_output() {
        let cli = Cli::try_parse_from(["shesafe", "download", "7", "-o", "frame.jpg"]).unwrap();
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.id, 7);
                assert_eq!(args.output, Some(PathBuf::from("frame.jpg")));
            }
            _ => panic!("Expected Download command"),
        }
    }

    #[test]
    fn test_cli_parse_watch_ticks_and_url() {
        let cli = Cli::try_parse_from([
            "shesafe",
            "watch",
            "--ticks",
            "3",
            "-u",
            "http://10.0.0.5:5000",
        ])
        .unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.ticks, Some(3));
                assert_eq!(
                    args.connection.backend_url.as_deref(),
                    Some("http://10.0.0.5:5000")
                );
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_alert_type_filter() {
        let cli =
            Cli::try_parse_from(["shesafe", "screenshots", "-t", "lone_woman_night"]).unwrap();
        match cli.command {
            Commands::Screenshots(args) => {
                assert_eq!(args.alert_type, Some(AlertTypeArg::LoneWomanNight));
                assert_eq!(
                    args.alert_type.map(AlertType::from),
                    Some(AlertType::LoneWomanNight)
                );
            }
            _ => panic!("Expected Screenshots command"),
        }
        assert!(Cli::try_parse_from(["shesafe", "alerts", "--type", "meteor"]).is_err());
    }

    #[test]
    fn test_cli_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["shesafe", "alert", "latest"]).is_err());
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let args = ConnectionArgs {
            config: PathBuf::from("/nonexistent/shesafe.toml"),
            backend_url: Some("http://example.test:5000".to_string()),
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.backend.base_url, "http://example.test:5000");
    }

    #[test]
    fn test_load_config_rejects_bad_url_override() {
        let args = ConnectionArgs {
            config: PathBuf::from("/nonexistent/shesafe.toml"),
            backend_url: Some("ftp://example.test".to_string()),
        };
        assert!(load_config(&args).is_err());
    }
}
