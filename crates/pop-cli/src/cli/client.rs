//! Client side: one-shot requests, daemon auto-spawn, and the interactive
//! watch surface that plays the content script's part.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tokio::sync::mpsc;

use pop_core::models::{flow_thermometer, SiteCategory, TabSnoozer, ThoughtKind};
use pop_core::overlay::{
    drive_idle_tracker, snooze_until_tomorrow, IdleEvent, IdleTracker, OverlayController,
    OverlayId, ShowOutcome, TriageChoice,
};
use pop_core::protocol::{ContentPush, MessageAction, Request, Response};
use pop_core::{Clock, SystemClock};

use super::daemon::socket_path;

const MAX_WAIT_SECONDS: u64 = 10;
const POLL_INTERVAL_MS: u64 = 100;

/// Connect to the daemon, auto-spawning it if needed.
fn connect_to_daemon(data_dir: &Path, dashboard_url: &str) -> Result<UnixStream> {
    let socket = socket_path(data_dir);

    if let Ok(stream) = UnixStream::connect(&socket) {
        return Ok(stream);
    }

    eprintln!("Daemon not running, starting...");
    spawn_daemon(data_dir, dashboard_url)?;

    let start = std::time::Instant::now();
    while start.elapsed().as_secs() < MAX_WAIT_SECONDS {
        if socket.exists() {
            if let Ok(stream) = UnixStream::connect(&socket) {
                return Ok(stream);
            }
        }
        thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }

    bail!("Timed out waiting for daemon to start")
}

/// Spawn the daemon as a detached background process.
fn spawn_daemon(data_dir: &Path, dashboard_url: &str) -> Result<()> {
    let exe_path = std::env::current_exe().context("Failed to get executable path")?;

    Command::new(&exe_path)
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--dashboard-url")
        .arg(dashboard_url)
        .arg("daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .context("Failed to spawn daemon")?;

    Ok(())
}

/// Send one action and return the daemon's response.
pub fn request(action: MessageAction, data_dir: &Path, dashboard_url: &str) -> Result<Response> {
    let stream = connect_to_daemon(data_dir, dashboard_url)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    let request = Request { id: 1, action };
    writeln!(writer, "{}", serde_json::to_string(&request)?)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(serde_json::from_str(&line)?)
}

/// Send one action and print the result.
pub fn send_action(
    action: MessageAction,
    pretty: bool,
    data_dir: &Path,
    dashboard_url: &str,
) -> Result<()> {
    let response = request(action, data_dir, dashboard_url)?;

    if let Some(error) = response.error {
        eprintln!("Error [{}]: {}", error.code, error.message);
        std::process::exit(1);
    }

    if let Some(result) = response.result {
        if pretty {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    Ok(())
}

/// Check whether the daemon is reachable without auto-starting it.
pub fn is_daemon_running(data_dir: &Path) -> bool {
    let socket = socket_path(data_dir);
    socket.exists() && UnixStream::connect(&socket).is_ok()
}

// ============================================================================
// Watch surface
// ============================================================================

/// What the surface is waiting for the user to answer.
enum Pending {
    Capture,
    FlowCheck,
    Categorize { domain: String },
    Selection { text: String },
}

/// Run the interactive overlay surface: subscribe to pushes, render them as
/// terminal prompts, and track idle time toward the tab-triage prompt.
pub fn watch(
    data_dir: &Path,
    dashboard_url: &str,
    page_url: Option<String>,
    page_title: Option<String>,
) -> Result<()> {
    // Make sure the daemon is up before entering the async loop.
    drop(connect_to_daemon(data_dir, dashboard_url)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_loop(data_dir, page_url, page_title))
}

async fn watch_loop(
    data_dir: &Path,
    page_url: Option<String>,
    page_title: Option<String>,
) -> Result<()> {
    let socket = socket_path(data_dir);
    let stream = tokio::net::UnixStream::connect(&socket).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut push_lines = tokio::io::BufReader::new(read_half).lines();

    let subscribe = Request { id: 1, action: MessageAction::SubscribeOverlays };
    write_half
        .write_all(format!("{}\n", serde_json::to_string(&subscribe)?).as_bytes())
        .await?;
    push_lines.next_line().await?; // subscription ack

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    // The content surface uses the same idle threshold the snoozer document
    // defaults to.
    let threshold = TabSnoozer::default().idle_threshold_minutes;
    let tracker = IdleTracker::new(threshold, clock.now());
    let (activity_tx, activity_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(16);
    let driver = tokio::spawn(drive_idle_tracker(
        tracker,
        Arc::clone(&clock),
        activity_rx,
        event_tx,
    ));

    let mut overlays = OverlayController::new();
    let mut pending: Option<Pending> = None;
    let mut stdin_lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Watching for overlay pushes. Ctrl-D quits.");

    loop {
        tokio::select! {
            line = push_lines.next_line() => match line? {
                Some(text) if text.trim().is_empty() => {}
                Some(text) => {
                    match serde_json::from_str::<ContentPush>(&text) {
                        Ok(push) => handle_push(&push, &mut overlays, &mut pending),
                        Err(err) => eprintln!("Unreadable push: {err}"),
                    }
                }
                None => {
                    eprintln!("Daemon closed the connection");
                    break;
                }
            },
            line = stdin_lines.next_line() => match line? {
                Some(input) => {
                    let outcome = handle_input(
                        input.trim(),
                        &mut overlays,
                        &mut pending,
                        clock.as_ref(),
                        data_dir,
                        page_url.as_deref(),
                        page_title.as_deref(),
                    )
                    .await;
                    match outcome {
                        InputOutcome::Continue => {
                            let _ = activity_tx.send(()).await;
                        }
                        InputOutcome::Consumed => {}
                        InputOutcome::CloseSurface => break,
                    }
                }
                None => break,
            },
            event = event_rx.recv() => match event {
                Some(IdleEvent::Prompt) => {
                    if overlays.show(OverlayId::TabIndicator, None) == ShowOutcome::Mounted {
                        eprintln!("⏰ Tab idle: [d]o it now, [s]nooze for tomorrow, [t]rash it");
                    }
                }
                Some(IdleEvent::Dismissed) => {
                    if overlays.close(OverlayId::TabIndicator) {
                        eprintln!("(idle indicator dismissed)");
                    }
                }
                None => break,
            },
        }
    }

    driver.abort();
    Ok(())
}

fn handle_push(
    push: &ContentPush,
    overlays: &mut OverlayController,
    pending: &mut Option<Pending>,
) {
    let outcome = overlays.apply(push);
    if outcome == ShowOutcome::Ignored {
        return;
    }

    match push {
        ContentPush::ShowQuickCapture => {
            *pending = Some(Pending::Capture);
            eprintln!("Quick Capture: type a thought (prefix 'r ' for reference, blank cancels):");
        }
        ContentPush::ShowFlowCheck => match outcome {
            ShowOutcome::PanelToggled(visible) => {
                eprintln!("Flow panel {}", if visible { "opened" } else { "closed" });
                if visible {
                    *pending = Some(Pending::FlowCheck);
                }
            }
            _ => {
                *pending = Some(Pending::FlowCheck);
                eprintln!("Flow State Check: enter 'difficulty skill' (1-10 each):");
            }
        },
        ContentPush::ShowTruthBadge { category, domain } => {
            let label = match category {
                SiteCategory::Deep => "🎯 Deep Work",
                SiteCategory::Shallow => "📧 Shallow",
            };
            eprintln!("{label}: {domain}");
        }
        ContentPush::CategorizeSite { domain } => {
            *pending = Some(Pending::Categorize { domain: domain.clone() });
            eprintln!("Categorize {domain}: [d]eep work or [s]hallow?");
        }
        ContentPush::CaptureSelection { text } => {
            let preview: String = text.chars().take(160).collect();
            *pending = Some(Pending::Selection { text: text.clone() });
            eprintln!("Save selection \"{preview}\": [a]ctionable or [r]eference?");
        }
    }
}

enum InputOutcome {
    /// Plain activity; feeds the idle tracker.
    Continue,
    /// Input answered a prompt.
    Consumed,
    /// The surface closes (snooze or trash).
    CloseSurface,
}

async fn handle_input(
    input: &str,
    overlays: &mut OverlayController,
    pending: &mut Option<Pending>,
    clock: &dyn Clock,
    data_dir: &Path,
    page_url: Option<&str>,
    page_title: Option<&str>,
) -> InputOutcome {
    // Triage answers win while the idle indicator is up; anything else is
    // activity and dismisses it.
    if overlays.is_open(OverlayId::TabIndicator) {
        let choice = match input {
            "d" => Some(TriageChoice::DoNow),
            "s" => Some(TriageChoice::SnoozeTomorrow),
            "t" => Some(TriageChoice::Trash),
            _ => None,
        };
        match choice {
            Some(TriageChoice::DoNow) => {
                overlays.close(OverlayId::TabIndicator);
                eprintln!("Do it now!");
                return InputOutcome::Consumed;
            }
            Some(TriageChoice::SnoozeTomorrow) => {
                overlays.close(OverlayId::TabIndicator);
                let Some(url) = page_url else {
                    eprintln!("No page URL to snooze");
                    return InputOutcome::Consumed;
                };
                let action = MessageAction::SnoozeTab {
                    url: url.to_string(),
                    title: page_title.unwrap_or(url).to_string(),
                    wake_at: snooze_until_tomorrow(clock),
                };
                report(send_async(data_dir, action).await, "Tab snoozed until tomorrow");
                return InputOutcome::CloseSurface;
            }
            Some(TriageChoice::Trash) => {
                eprintln!("Moving on!");
                return InputOutcome::CloseSurface;
            }
            None => return InputOutcome::Continue,
        }
    }

    let Some(current) = pending.take() else {
        return InputOutcome::Continue;
    };

    match current {
        Pending::Capture => {
            overlays.close(OverlayId::QuickCapture);
            if input.is_empty() {
                return InputOutcome::Continue;
            }
            let (kind, text) = match input.strip_prefix("r ") {
                Some(rest) => (ThoughtKind::Reference, rest.to_string()),
                None => (ThoughtKind::Actionable, input.to_string()),
            };
            let action = MessageAction::SaveThought { text, kind };
            report(send_async(data_dir, action).await, "Thought captured!");
        }
        Pending::FlowCheck => {
            let mut parts = input.split_whitespace();
            let difficulty = parts.next().and_then(|p| p.parse::<i32>().ok());
            let skill = parts.next().and_then(|p| p.parse::<i32>().ok());
            match (difficulty, skill) {
                (Some(difficulty), Some(skill)) => {
                    let line = match flow_thermometer::flow_state(difficulty, skill) {
                        flow_thermometer::FlowState::Anxiety => "😰 Anxiety Zone - Break it down!",
                        flow_thermometer::FlowState::Boredom => "😴 Boredom Zone - Add challenge!",
                        flow_thermometer::FlowState::Flow => "🎯 Flow State - Keep going!",
                    };
                    eprintln!("{line}");
                }
                _ => eprintln!("Expected two numbers, e.g. '7 5'"),
            }
        }
        Pending::Categorize { domain } => {
            overlays.close(OverlayId::CategorizeSite);
            let category = match input {
                "d" => Some(SiteCategory::Deep),
                "s" => Some(SiteCategory::Shallow),
                _ => None,
            };
            let Some(category) = category else {
                return InputOutcome::Continue;
            };
            let action = MessageAction::CategorizeSite { domain: domain.clone(), category };
            report(
                send_async(data_dir, action).await,
                &format!("{domain} marked as {input}"),
            );
            handle_push(
                &ContentPush::ShowTruthBadge { category, domain },
                overlays,
                pending,
            );
        }
        Pending::Selection { text } => {
            overlays.close(OverlayId::CaptureSelection);
            let kind = match input {
                "a" => Some(ThoughtKind::Actionable),
                "r" => Some(ThoughtKind::Reference),
                _ => None,
            };
            let Some(kind) = kind else {
                return InputOutcome::Continue;
            };
            let action = MessageAction::SaveThought { text, kind };
            report(send_async(data_dir, action).await, "Selection captured!");
        }
    }

    InputOutcome::Consumed
}

/// One-shot request over a fresh connection, async flavor for the watch loop.
async fn send_async(data_dir: &Path, action: MessageAction) -> Result<Response> {
    let stream = tokio::net::UnixStream::connect(socket_path(data_dir)).await?;
    let (read_half, mut write_half) = stream.into_split();
    let request = Request { id: 1, action };
    write_half
        .write_all(format!("{}\n", serde_json::to_string(&request)?).as_bytes())
        .await?;

    let mut lines = tokio::io::BufReader::new(read_half).lines();
    let line = lines
        .next_line()
        .await?
        .context("daemon closed the connection")?;
    Ok(serde_json::from_str(&line)?)
}

fn report(result: Result<Response>, toast: &str) {
    match result {
        Ok(response) if response.error.is_none() => eprintln!("{toast}"),
        Ok(response) => {
            if let Some(error) = response.error {
                eprintln!("Error [{}]: {}", error.code, error.message);
            }
        }
        Err(err) => eprintln!("Error: {err}"),
    }
}
