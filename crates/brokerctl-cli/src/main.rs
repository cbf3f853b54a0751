//! brokerctl - edit and bootstrap a broker's `redpanda.yaml`.
//!
//! `brokerctl config set <KEY> <VALUE>` changes one field by path, and
//! `brokerctl config bootstrap` prepares a node to join a cluster.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use brokerctl_config::{BootstrapFlags, SystemInterfaces};
use brokerctl_telemetry::{LogConfig, LogFormat};
use clap::{Parser, Subcommand};

mod commands;
mod theme;

use commands::config;
use theme::Theme;

/// brokerctl - broker configuration tool
#[derive(Parser)]
#[command(name = "brokerctl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to redpanda.yaml
    #[arg(long, global = true, env = "BROKERCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Log format: pretty, compact, json, or full
    #[arg(long, global = true, env = "BROKERCTL_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit the broker configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a configuration field
    ///
    /// KEY is a dotted path with optional indices, e.g.
    /// `redpanda.kafka_api[0].port`. VALUE is parsed as YAML (or JSON) and
    /// converted to the field's type; structures and lists can be set whole.
    Set {
        /// Path of the field to set
        key: String,

        /// New value
        value: String,
    },

    /// Initialize the configuration to bootstrap a cluster
    ///
    /// Listen addresses still at the 0.0.0.0 default are replaced with this
    /// node's address; by default the machine's single private IPv4 address.
    Bootstrap {
        /// Comma-separated seed servers (ip, ip:port, or hostname)
        #[arg(long, value_delimiter = ',')]
        ips: Vec<String>,

        /// IP address to listen on; empty or absent picks the private address
        #[arg(long = "self", value_name = "IP")]
        self_address: Option<String>,

        /// This node's ID; negative leaves it unset
        #[arg(long, default_value_t = -1, allow_negative_numbers = true, hide = true)]
        id: i32,
    },
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose { "debug" } else { "warn" };
    let log_config = LogConfig::new(level).with_format(cli.log_format);
    if let Err(e) = brokerctl_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config { command } => handle_config(command, cli.config.as_deref()),
    }
}

/// Map the raw bootstrap flags: an empty `--self` means discover, a negative
/// `--id` means unset.
fn bootstrap_flags(ips: Vec<String>, self_address: Option<String>, id: i32) -> BootstrapFlags {
    BootstrapFlags {
        self_address: self_address.filter(|s| !s.trim().is_empty()),
        seeds: ips,
        node_id: (id >= 0).then_some(id),
    }
}

fn handle_config(command: ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    let path = config::config_path(explicit)?;
    match command {
        ConfigCommands::Set { key, value } => config::run_set(&path, &key, &value),
        ConfigCommands::Bootstrap {
            ips,
            self_address,
            id,
        } => {
            let flags = bootstrap_flags(ips, self_address, id);
            config::run_bootstrap(&path, &flags, &SystemInterfaces)
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set() {
        let cli = Cli::try_parse_from([
            "brokerctl",
            "config",
            "set",
            "redpanda.rpc_server.port",
            "9999",
        ])
        .unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Set { key, value },
            } => {
                assert_eq!(key, "redpanda.rpc_server.port");
                assert_eq!(value, "9999");
            },
            Commands::Config { .. } => panic!("expected set"),
        }
    }

    #[test]
    fn test_parse_bootstrap() {
        let cli = Cli::try_parse_from([
            "brokerctl",
            "--config",
            "/tmp/redpanda.yaml",
            "config",
            "bootstrap",
            "--ips",
            "node1:33145,node2",
            "--self",
            "10.0.0.5",
            "--id",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/redpanda.yaml")));
        match cli.command {
            Commands::Config {
                command:
                    ConfigCommands::Bootstrap {
                        ips,
                        self_address,
                        id,
                    },
            } => {
                assert_eq!(ips, vec!["node1:33145", "node2"]);
                assert_eq!(self_address.as_deref(), Some("10.0.0.5"));
                assert_eq!(id, 3);
            },
            Commands::Config { .. } => panic!("expected bootstrap"),
        }
    }

    #[test]
    fn test_bootstrap_defaults() {
        let cli = Cli::try_parse_from(["brokerctl", "config", "bootstrap", "--id", "-1"]).unwrap();
        match cli.command {
            Commands::Config {
                command:
                    ConfigCommands::Bootstrap {
                        ips,
                        self_address,
                        id,
                    },
            } => {
                assert!(ips.is_empty());
                assert!(self_address.is_none());
                assert_eq!(id, -1);
            },
            Commands::Config { .. } => panic!("expected bootstrap"),
        }
    }

    #[test]
    fn test_empty_self_means_discover() {
        let flags = bootstrap_flags(vec![], Some(String::new()), -1);
        assert!(flags.self_address.is_none());
        assert!(flags.node_id.is_none());

        let flags = bootstrap_flags(vec!["node1".to_owned()], Some("10.0.0.5".to_owned()), 0);
        assert_eq!(flags.self_address.as_deref(), Some("10.0.0.5"));
        assert_eq!(flags.node_id, Some(0));
        assert_eq!(flags.seeds, vec!["node1"]);
    }

    #[test]
    fn test_parse_empty_self() {
        let cli = Cli::try_parse_from(["brokerctl", "config", "bootstrap", "--self", ""]).unwrap();
        match cli.command {
            Commands::Config {
                command:
                    ConfigCommands::Bootstrap {
                        ips,
                        self_address,
                        id,
                    },
            } => {
                let flags = bootstrap_flags(ips, self_address, id);
                assert!(flags.self_address.is_none());
            },
            Commands::Config { .. } => panic!("expected bootstrap"),
        }
    }

    #[test]
    fn test_log_format_flag() {
        let cli =
            Cli::try_parse_from(["brokerctl", "--log-format", "json", "config", "set", "a", "b"])
                .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["brokerctl", "--log-format", "xml", "config", "set", "a", "b"]).is_err());
    }
}
