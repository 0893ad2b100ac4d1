use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dahu-fixtures",
    version,
    about = "Start, stop and inspect the Docker fixtures used by the Dahu integration suite."
)]
pub(crate) struct Cli {
    /// Docker API version to pin
    /// (empty: DAHU_FIXTURES_DOCKER_API_VERSION, DOCKER_API_VERSION, or negotiate)
    #[arg(long = "api-version", global = true, default_value = "")]
    pub(crate) api_version: String,

    /// Print docker commands before running them
    #[arg(long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Start the Gogs git server fixture and print its container id
    Gogs,
    /// Start the Docker registry fixture and print its container id
    Registry,
    /// Force-remove a container and its anonymous volumes
    Stop {
        /// Container id or name
        id: String,
    },
    /// Print a container's IP address (or full network details with --json)
    Inspect {
        /// Container id or name
        id: String,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Named volume helpers
    Volume {
        #[command(subcommand)]
        cmd: VolumeCmd,
    },
    /// Wait until a TCP port accepts connections
    Wait {
        /// Host port to dial
        port: u16,
        /// Host to dial (default: configured wait host)
        #[arg(long)]
        host: Option<String>,
        /// Number of dial attempts
        #[arg(long)]
        attempts: Option<u32>,
        /// Pause between failed attempts, in milliseconds
        #[arg(long = "interval-ms")]
        interval_ms: Option<u64>,
    },
    /// Run diagnostics to check environment and configuration
    Doctor,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum VolumeCmd {
    /// Exit 0 when the volume exists, 1 otherwise
    Exists { name: String },
    /// Force-remove the volume
    Clean { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dahu-fixtures",
            "inspect",
            "abc",
            "--json",
            "--api-version",
            "1.41",
        ])
        .expect("parse");
        assert_eq!(cli.api_version, "1.41");
        match cli.command {
            Command::Inspect { id, json } => {
                assert_eq!(id, "abc");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_volume_subcommands() {
        let cli = Cli::try_parse_from(["dahu-fixtures", "volume", "exists", "dahu-data"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Volume { cmd: VolumeCmd::Exists { ref name } } if name == "dahu-data"
        ));
    }

    #[test]
    fn wait_requires_numeric_port() {
        assert!(Cli::try_parse_from(["dahu-fixtures", "wait", "http"]).is_err());
        let cli = Cli::try_parse_from(["dahu-fixtures", "wait", "5000", "--attempts", "2"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Wait { port: 5000, attempts: Some(2), .. }
        ));
    }
}
