mod support;

use std::net::TcpListener;
use std::process::Command;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dahu-fixtures"));
    // keep host configuration out of the way
    for k in [
        "DAHU_FIXTURES_DOCKER",
        "DAHU_FIXTURES_SKIP_DOCKER",
        "DAHU_FIXTURES_PULL",
        "DAHU_FIXTURES_DOCKER_API_VERSION",
        "DOCKER_API_VERSION",
        "DAHU_FIXTURES_WAIT_HOST",
        "DOCKER_HOST",
    ] {
        cmd.env_remove(k);
    }
    cmd
}

#[test]
fn test_cli_doctor_exits_zero_without_docker() {
    let _g = support::FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let out = bin()
        .arg("doctor")
        .env("DAHU_FIXTURES_SKIP_DOCKER", "1")
        .output()
        .expect("failed to run dahu-fixtures doctor");
    assert!(
        out.status.success(),
        "dahu-fixtures doctor exited non-zero: {:?}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("docker: not found"), "{err}");
    assert!(err.contains("pull policy: always"), "{err}");
    assert!(err.contains("doctor: completed diagnostics."), "{err}");
}

#[test]
fn test_cli_missing_runtime_exits_127() {
    let _g = support::FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let out = bin()
        .args(["stop", "abc"])
        .env("DAHU_FIXTURES_SKIP_DOCKER", "1")
        .output()
        .expect("failed to run dahu-fixtures stop");
    assert_eq!(out.status.code(), Some(127));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Docker disabled"), "{err}");
}

#[test]
fn test_cli_wait_reachable() {
    let _g = support::FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let l = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = l.local_addr().expect("addr").port();
    let out = bin()
        .args(["wait", &port.to_string(), "--attempts", "2", "--interval-ms", "10"])
        .output()
        .expect("failed to run dahu-fixtures wait");
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        format!("127.0.0.1:{port} reachable")
    );
}

#[test]
fn test_cli_wait_unreachable_exits_one() {
    let _g = support::FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").expect("bind");
        l.local_addr().expect("addr").port()
    };
    let out = bin()
        .args(["wait", &port.to_string(), "--attempts", "2", "--interval-ms", "10"])
        .output()
        .expect("failed to run dahu-fixtures wait");
    assert_eq!(out.status.code(), Some(1));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("unreachable after 2 attempts"), "{err}");
}

#[cfg(unix)]
mod with_fake_docker {
    use super::support::{FakeDocker, FakeDockerBehavior, FAKE_DOCKER_LOCK};
    use super::bin;

    #[test]
    fn test_cli_inspect_prints_ip_and_json() {
        let _g = FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fake = FakeDocker::new(&FakeDockerBehavior::default());

        let out = bin()
            .args(["inspect", "abc", "--api-version", "1.41"])
            .env("DAHU_FIXTURES_DOCKER", &fake.script)
            .output()
            .expect("run inspect");
        assert!(out.status.success(), "{:?}", out);
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "172.17.0.3");

        let out = bin()
            .args(["inspect", "abc", "--json"])
            .env("DAHU_FIXTURES_DOCKER", &fake.script)
            .output()
            .expect("run inspect --json");
        assert!(out.status.success(), "{:?}", out);
        let v: serde_json::Value =
            serde_json::from_slice(&out.stdout).expect("inspect --json emits JSON");
        assert_eq!(v["ip"], "172.17.0.3");
        assert_eq!(v["networks"]["bridge"]["network_id"], "n1");

        let calls = fake.calls();
        assert!(calls[0].starts_with("api=1.41 inspect "), "{calls:?}");
        assert!(calls[1].starts_with("api= inspect "), "{calls:?}");
    }

    #[test]
    fn test_cli_volume_exists_exit_codes() {
        let _g = FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fake = FakeDocker::new(&FakeDockerBehavior {
            volumes: vec!["dahu-data".to_string()],
            ..FakeDockerBehavior::default()
        });

        let out = bin()
            .args(["volume", "exists", "dahu-data"])
            .env("DAHU_FIXTURES_DOCKER", &fake.script)
            .output()
            .expect("run volume exists");
        assert_eq!(out.status.code(), Some(0));
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "yes");

        let out = bin()
            .args(["volume", "exists", "dahu"])
            .env("DAHU_FIXTURES_DOCKER", &fake.script)
            .output()
            .expect("run volume exists");
        assert_eq!(out.status.code(), Some(1));
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "no");
    }

    #[test]
    fn test_cli_verbose_prints_docker_preview() {
        let _g = FAKE_DOCKER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let fake = FakeDocker::new(&FakeDockerBehavior::default());

        let out = bin()
            .args(["--verbose", "volume", "clean", "dahu-data"])
            .env("DAHU_FIXTURES_DOCKER", &fake.script)
            .output()
            .expect("run volume clean");
        assert!(out.status.success(), "{:?}", out);
        let err = String::from_utf8_lossy(&out.stderr);
        assert!(
            err.contains("dahu-fixtures: docker: docker volume rm -f dahu-data"),
            "{err}"
        );
    }
}
