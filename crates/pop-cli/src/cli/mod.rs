pub mod client;
pub mod daemon;

pub use client::{is_daemon_running, send_action, watch};
pub use daemon::{default_data_dir, run_daemon, socket_path};
