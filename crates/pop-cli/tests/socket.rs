//! Daemon round trip over a real Unix socket.

use std::thread;
use std::time::{Duration, Instant};

use pop_cli::cli::{client, daemon, is_daemon_running};
use pop_core::models::ThoughtKind;
use pop_core::protocol::MessageAction;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn daemon_serves_requests_until_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_path_buf();

    let daemon_dir = data_dir.clone();
    let handle = thread::spawn(move || {
        daemon::run_daemon(daemon_dir, "http://localhost:0/dashboard".into()).unwrap();
    });

    let started = Instant::now();
    while !is_daemon_running(&data_dir) {
        assert!(started.elapsed() < STARTUP_TIMEOUT, "daemon did not come up");
        thread::sleep(Duration::from_millis(50));
    }

    let dashboard = "http://localhost:0/dashboard";

    let response = client::request(
        MessageAction::SaveThought { text: "ship it".into(), kind: ThoughtKind::Actionable },
        &data_dir,
        dashboard,
    )
    .unwrap();
    let result = response.result.expect("save thought result");
    assert_eq!(result["success"], true);
    assert_eq!(result["thought"]["text"], "ship it");

    // The daemon seeded defaults on first run, so settings come back whole.
    let response = client::request(MessageAction::GetSettings, &data_dir, dashboard).unwrap();
    let settings = response.result.expect("settings result");
    assert_eq!(settings["flowCheckInterval"], 30);
    assert_eq!(settings["utilities"]["tabSnoozer"]["enabled"], true);

    let response = client::request(MessageAction::Status, &data_dir, dashboard).unwrap();
    assert_eq!(response.result.expect("status result")["status"], "running");

    let response = client::request(MessageAction::Shutdown, &data_dir, dashboard).unwrap();
    assert_eq!(
        response.result.expect("shutdown result")["status"],
        "shutting_down"
    );

    handle.join().expect("daemon thread exits cleanly");
    assert!(!daemon::socket_path(&data_dir).exists());
}
