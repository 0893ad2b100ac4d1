/*!
Test support helpers shared across integration tests.

- FakeDocker: a shell script standing in for the docker CLI. It appends
  `api=<DOCKER_API_VERSION> <argv>` to a log file and answers the subcommands
  the fixtures use with canned output.
- docker_available(): true when a real docker runtime is usable.

These helpers do not print skip messages themselves so tests can keep their
own "skipping: ..." outputs.
*/
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

/// Serializes tests that write and exec fake runtimes (avoids ETXTBSY on exec).
pub static FAKE_DOCKER_LOCK: Mutex<()> = Mutex::new(());

pub const SAMPLE_NETWORK_SETTINGS: &str = r#"{"Bridge":"","Gateway":"172.17.0.1","IPAddress":"172.17.0.3","MacAddress":"02:42:ac:11:00:03","Networks":{"bridge":{"NetworkID":"n1","Gateway":"172.17.0.1","IPAddress":"172.17.0.3","MacAddress":"02:42:ac:11:00:03"}},"Ports":{"5000/tcp":[{"HostIp":"0.0.0.0","HostPort":"5000"}]}}"#;

#[derive(Debug, Clone)]
pub struct FakeDockerBehavior {
    pub image_present: bool,
    pub container_present: bool,
    /// Reported by `container inspect --format {{.State.Running}}`.
    pub container_running: bool,
    /// First argv word that should fail with a daemon-style error.
    pub fail_on: Option<String>,
    pub create_output: String,
    pub inspect_json: String,
    pub volumes: Vec<String>,
}

impl Default for FakeDockerBehavior {
    fn default() -> Self {
        Self {
            image_present: false,
            container_present: false,
            container_running: false,
            fail_on: None,
            create_output: "4f2c9e1d0a7b".to_string(),
            inspect_json: SAMPLE_NETWORK_SETTINGS.to_string(),
            volumes: Vec::new(),
        }
    }
}

pub struct FakeDocker {
    pub dir: tempfile::TempDir,
    pub script: PathBuf,
    pub log: PathBuf,
}

impl FakeDocker {
    #[cfg(unix)]
    pub fn new(behavior: &FakeDockerBehavior) -> FakeDocker {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join("calls.log");
        let inspect = dir.path().join("inspect.json");
        let volumes = dir.path().join("volumes.txt");
        let create = dir.path().join("create.txt");
        fs::write(&log, "").expect("write log");
        fs::write(&inspect, &behavior.inspect_json).expect("write inspect");
        let mut vols = behavior.volumes.join("\n");
        vols.push('\n');
        fs::write(&volumes, vols).expect("write volumes");
        fs::write(&create, format!("{}\n", behavior.create_output)).expect("write create");

        let fail = behavior.fail_on.clone().unwrap_or_else(|| "__never__".to_string());
        let image_rc = if behavior.image_present { 0 } else { 1 };
        let container_rc = if behavior.container_present { 0 } else { 1 };
        let running = if behavior.container_running { "true" } else { "false" };

        let body = format!(
            r#"#!/bin/sh
printf 'api=%s %s\n' "${{DOCKER_API_VERSION:-}}" "$*" >> '{log}'
if [ "$1" = '{fail}' ]; then
  echo "Error response from daemon: $1 failed" >&2
  exit 1
fi
case "$1" in
  pull) echo "Status: Downloaded newer image for $2"; exit 0 ;;
  image) exit {image_rc} ;;
  container)
    if [ {container_rc} -eq 0 ]; then echo {running}; fi
    exit {container_rc}
    ;;
  create) cat '{create}'; exit 0 ;;
  start) echo "$2"; exit 0 ;;
  rm) echo "$4"; exit 0 ;;
  inspect) cat '{inspect}'; exit 0 ;;
  volume)
    case "$2" in
      ls) cat '{volumes}'; exit 0 ;;
      rm) echo "$4"; exit 0 ;;
    esac
    ;;
  version) echo "24.0.7"; exit 0 ;;
esac
echo "unknown command: $*" >&2
exit 1
"#,
            log = log.display(),
            fail = fail,
            image_rc = image_rc,
            container_rc = container_rc,
            running = running,
            create = create.display(),
            inspect = inspect.display(),
            volumes = volumes.display(),
        );

        let script = dir.path().join("docker");
        fs::write(&script, body).expect("write fake docker");
        let mut perms = fs::metadata(&script).expect("stat").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("chmod");

        FakeDocker { dir, script, log }
    }

    /// Logged invocations, one per line, in call order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    pub fn lock_dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Return true if docker is on PATH and the daemon answers.
pub fn docker_available() -> bool {
    let Ok(runtime) = dahu_fixtures::container_runtime_path() else {
        return false;
    };
    Command::new(runtime)
        .args(["version", "--format", "{{.Server.Version}}"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
