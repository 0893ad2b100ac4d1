use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dahu_fixtures::{
    container_runtime_path, display_for_fixture_error, exit_code_for_fixture_error,
    wait_for_service, DockerClient, FixtureConfig, FixtureError, Fixtures,
};

mod cli;

use cli::{Cli, Command, VolumeCmd};

fn main() -> ExitCode {
    // Optional .env next to the suite; absence is fine
    let _ = dotenvy::dotenv();
    dahu_fixtures::init_logging();

    let cli = Cli::parse();

    let mut config = FixtureConfig::from_env();
    if cli.verbose {
        config.verbose = true;
    }

    match run(&cli, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("dahu-fixtures: {}", display_for_fixture_error(&e));
            ExitCode::from(exit_code_for_fixture_error(&e))
        }
    }
}

fn run(cli: &Cli, mut config: FixtureConfig) -> Result<ExitCode, FixtureError> {
    let fixtures = |config: FixtureConfig| -> Result<Fixtures, FixtureError> {
        let client = DockerClient::with_config(&cli.api_version, &config)?;
        Ok(Fixtures::with_client(client, config))
    };

    match &cli.command {
        Command::Doctor => run_doctor(&cli.api_version, &config),
        Command::Wait {
            port,
            host,
            attempts,
            interval_ms,
        } => {
            if let Some(h) = host {
                config.wait.host = h.clone();
            }
            if let Some(n) = attempts {
                config.wait.attempts = (*n).max(1);
            }
            if let Some(ms) = interval_ms {
                config.wait.interval = Duration::from_millis(*ms);
            }
            wait_for_service(*port, &config.wait)?;
            println!("{}:{} reachable", config.wait.host, port);
        }
        Command::Gogs => {
            let id = fixtures(config)?.start_gogs()?;
            println!("{id}");
        }
        Command::Registry => {
            let id = fixtures(config)?.start_docker_registry()?;
            println!("{id}");
        }
        Command::Stop { id } => fixtures(config)?.stop_container(id)?,
        Command::Inspect { id, json } => {
            let detail = fixtures(config)?.find_container_details(id)?;
            if *json {
                let s = serde_json::to_string_pretty(&detail).map_err(|e| {
                    FixtureError::Message(format!("failed to render container details: {e}"))
                })?;
                println!("{s}");
            } else {
                println!("{}", detail.ip);
            }
        }
        Command::Volume { cmd } => match cmd {
            VolumeCmd::Exists { name } => {
                let exists = fixtures(config)?.volume_exists(name)?;
                println!("{}", if exists { "yes" } else { "no" });
                if !exists {
                    return Ok(ExitCode::from(1));
                }
            }
            VolumeCmd::Clean { name } => fixtures(config)?.clean_volume(name)?,
        },
    }
    Ok(ExitCode::from(0))
}

/// Diagnostics only; never fails.
fn run_doctor(api_version: &str, config: &FixtureConfig) {
    eprintln!("dahu-fixtures doctor");
    eprintln!("  version: v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "  build: {} ({}, {}, {})",
        env!("DAHU_FIXTURES_BUILD_DATE"),
        env!("DAHU_FIXTURES_BUILD_TARGET"),
        env!("DAHU_FIXTURES_BUILD_PROFILE"),
        env!("DAHU_FIXTURES_BUILD_RUSTC")
    );
    eprintln!("  host: {} / {}", std::env::consts::OS, std::env::consts::ARCH);

    match container_runtime_path() {
        Ok(p) => {
            eprintln!("  docker: {}", p.display());
            let client = DockerClient::from_parts(
                p,
                config.effective_api_version(api_version),
                Duration::from_secs(10),
                false,
            );
            match client.output(&[
                "version".to_string(),
                "--format".to_string(),
                "{{.Server.Version}}".to_string(),
            ]) {
                Ok(v) => eprintln!("  docker server: {v}"),
                Err(e) => eprintln!("  docker server: unavailable ({e})"),
            }
        }
        Err(e) => {
            eprintln!("  docker: not found ({e})");
        }
    }

    eprintln!(
        "  api version: {}",
        config
            .effective_api_version(api_version)
            .as_deref()
            .unwrap_or("(negotiated)")
    );
    eprintln!("  pull policy: {}", config.pull_policy.as_str());
    eprintln!(
        "  readiness: {} x{} every {:?}",
        config.wait.host, config.wait.attempts, config.wait.interval
    );
    eprintln!("  replace stale containers: {}", config.replace_existing);
    eprintln!("  lock dir: {}", config.lock_dir.display());

    eprintln!("doctor: completed diagnostics.");
}
