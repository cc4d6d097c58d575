//! Privileged surface actions: opening URLs and the dashboard.
//!
//! The host may refuse or fail any of these; callers treat that as a no-op
//! and continue.

use parking_lot::Mutex;
use tracing::debug;

pub trait TabOpener: Send + Sync {
    fn open_url(&self, url: &str);
    fn open_dashboard(&self, anchor: Option<&str>);
}

/// Production opener: hands the URL to the OS and ignores failures.
pub struct ShellOpener {
    dashboard_url: String,
}

impl ShellOpener {
    pub fn new(dashboard_url: String) -> Self {
        Self { dashboard_url }
    }

    fn launch(&self, url: &str) {
        #[cfg(target_os = "macos")]
        let program = "open";
        #[cfg(not(target_os = "macos"))]
        let program = "xdg-open";

        match std::process::Command::new(program)
            .arg(url)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
        {
            Ok(_) => debug!(url, "opened"),
            Err(err) => debug!(url, %err, "open failed, ignoring"),
        }
    }
}

impl TabOpener for ShellOpener {
    fn open_url(&self, url: &str) {
        self.launch(url);
    }

    fn open_dashboard(&self, anchor: Option<&str>) {
        match anchor {
            Some(anchor) => self.launch(&format!("{}#{}", self.dashboard_url, anchor)),
            None => self.launch(&self.dashboard_url),
        }
    }
}

/// Test double that records every open.
#[derive(Default)]
pub struct RecordingOpener {
    pub urls: Mutex<Vec<String>>,
    pub dashboards: Mutex<Vec<Option<String>>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabOpener for RecordingOpener {
    fn open_url(&self, url: &str) {
        self.urls.lock().push(url.to_string());
    }

    fn open_dashboard(&self, anchor: Option<&str>) {
        self.dashboards.lock().push(anchor.map(str::to_string));
    }
}
