use std::path::PathBuf;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};

use pop_cli::cli::{is_daemon_running, run_daemon, send_action, socket_path, watch};
use pop_core::commands::Command;
use pop_core::constants::DEFAULT_DASHBOARD_URL;
use pop_core::coordinator::Alarm;
use pop_core::models::{SiteCategory, ThoughtKind};
use pop_core::protocol::MessageAction;
use pop_core::tracing_setup::init_tracing;

#[derive(Parser)]
#[command(name = "pop")]
#[command(about = "Personal productivity coordinator")]
struct Cli {
    /// Data directory (default ~/.pop)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Dashboard URL opened for dashboard commands
    #[arg(long, global = true)]
    dashboard_url: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the background daemon in the foreground
    Daemon,

    /// Capture a thought
    Capture {
        /// Thought text
        text: String,
        /// Save as reference instead of actionable
        #[arg(long, short)]
        reference: bool,
    },

    /// Print the merged settings document
    Settings,

    /// Categorize a site as deep or shallow
    Categorize {
        domain: String,
        /// "deep" or "shallow"
        category: String,
    },

    /// Add minutes to today's deep/shallow log
    LogTime {
        /// "deep" or "shallow"
        category: String,
        minutes: f64,
    },

    /// Open the dashboard, optionally at a panel anchor
    Open {
        anchor: Option<String>,
    },

    /// Snooze a tab for some hours (default 24)
    Snooze {
        url: String,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },

    /// Save a link to the tab snoozer with an immediate wake
    SaveLink {
        url: String,
        #[arg(long, short)]
        title: Option<String>,
    },

    /// Forward selected text to the overlay surface for tagging
    CaptureSelection {
        text: String,
    },

    /// Dispatch a global-shortcut command by name
    Command {
        /// e.g. "cognitive-offload", "flow-check", "time-log"
        name: String,
        /// Active site domain, consulted by time-log
        #[arg(long, short)]
        domain: Option<String>,
    },

    /// Fire a periodic check now, with its normal guards
    CheckNow {
        /// "flow", "tabs", or "review"
        alarm: String,
    },

    /// Route a notification button press
    NotifyAction {
        id: String,
        button: usize,
    },

    /// Export a feature document to CSV
    Export {
        key: String,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a feature document from a CSV file
    Import {
        key: String,
        file: PathBuf,
        /// Merge into the existing document instead of replacing it
        #[arg(long)]
        merge: bool,
    },

    /// Run the interactive overlay surface
    Watch {
        /// URL of the page this surface stands in for
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },

    /// Get daemon status
    Status {
        /// Quick check without auto-starting the daemon
        #[arg(long)]
        running: bool,
    },

    /// Shut the daemon down
    Shutdown,
}

fn main() {
    let cli = Cli::parse();
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(pop_cli::cli::default_data_dir);
    let dashboard_url = cli
        .dashboard_url
        .clone()
        .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());

    if matches!(cli.command, Commands::Daemon) {
        init_tracing("pop-daemon");
        if let Err(err) = run_daemon(data_dir, dashboard_url) {
            eprintln!("Daemon error: {err}");
            std::process::exit(1);
        }
        return;
    }

    let action = match cli.command {
        Commands::Daemon => return,

        Commands::Capture { text, reference } => MessageAction::SaveThought {
            text,
            kind: if reference { ThoughtKind::Reference } else { ThoughtKind::Actionable },
        },

        Commands::Settings => MessageAction::GetSettings,

        Commands::Categorize { domain, category } => MessageAction::CategorizeSite {
            domain,
            category: parse_category(&category),
        },

        Commands::LogTime { category, minutes } => MessageAction::LogTime {
            category: parse_category(&category),
            minutes,
        },

        Commands::Open { anchor } => MessageAction::OpenDashboard { hash: anchor },

        Commands::Snooze { url, title, hours } => {
            let title = title.unwrap_or_else(|| url.clone());
            MessageAction::SnoozeTab {
                url,
                title,
                wake_at: Utc::now() + Duration::hours(hours),
            }
        }

        Commands::SaveLink { url, title } => MessageAction::SaveLink { url, title },

        Commands::CaptureSelection { text } => MessageAction::CaptureSelection { text },

        Commands::Command { name, domain } => match Command::parse(&name) {
            Some(command) => MessageAction::Command { command, domain },
            None => {
                eprintln!("Unknown command: {name}");
                std::process::exit(1);
            }
        },

        Commands::CheckNow { alarm } => MessageAction::CheckNow { alarm: parse_alarm(&alarm) },

        Commands::NotifyAction { id, button } => {
            MessageAction::NotifyAction { id, button_index: button }
        }

        Commands::Export { key, output } => {
            let response = match pop_cli::cli::client::request(
                MessageAction::ExportCsv { key },
                &data_dir,
                &dashboard_url,
            ) {
                Ok(response) => response,
                Err(err) => {
                    eprintln!("Error: {err}");
                    std::process::exit(1);
                }
            };
            if let Some(error) = response.error {
                eprintln!("Error [{}]: {}", error.code, error.message);
                std::process::exit(1);
            }
            let csv = response
                .result
                .as_ref()
                .and_then(|r| r.get("csv"))
                .and_then(|c| c.as_str())
                .unwrap_or_default()
                .to_string();
            match output {
                Some(path) => {
                    if let Err(err) = std::fs::write(&path, csv) {
                        eprintln!("Error: {err}");
                        std::process::exit(1);
                    }
                    eprintln!("Exported to {}", path.display());
                }
                None => print!("{csv}"),
            }
            return;
        }

        Commands::Import { key, file, merge } => {
            let csv = match std::fs::read_to_string(&file) {
                Ok(csv) => csv,
                Err(err) => {
                    eprintln!("Failed to read {}: {err}", file.display());
                    std::process::exit(1);
                }
            };
            MessageAction::ImportCsv { key, csv, merge }
        }

        Commands::Watch { url, title } => {
            if let Err(err) = watch(&data_dir, &dashboard_url, url, title) {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
            return;
        }

        Commands::Status { running } => {
            if running {
                let alive = is_daemon_running(&data_dir);
                let path = socket_path(&data_dir);
                println!(
                    "{}",
                    serde_json::json!({
                        "running": alive,
                        "socketPath": path.display().to_string(),
                    })
                );
                std::process::exit(if alive { 0 } else { 1 });
            }
            MessageAction::Status
        }

        Commands::Shutdown => MessageAction::Shutdown,
    };

    if let Err(err) = send_action(action, cli.pretty, &data_dir, &dashboard_url) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn parse_category(category: &str) -> SiteCategory {
    match category {
        "deep" => SiteCategory::Deep,
        "shallow" => SiteCategory::Shallow,
        other => {
            eprintln!("Unknown category: {other} (expected \"deep\" or \"shallow\")");
            std::process::exit(1);
        }
    }
}

fn parse_alarm(alarm: &str) -> Alarm {
    match alarm {
        "flow" => Alarm::FlowCheck,
        "tabs" => Alarm::TabSnoozeCheck,
        "review" => Alarm::WeeklyReviewCheck,
        other => {
            eprintln!("Unknown check: {other} (expected \"flow\", \"tabs\", or \"review\")");
            std::process::exit(1);
        }
    }
}
