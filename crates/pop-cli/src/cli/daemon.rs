//! The daemon: binds the Unix socket, registers the alarms, and serves
//! request/response plus overlay-push subscriptions.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio::sync::Notify;
use tracing::{info, warn};

use pop_core::constants::{PID_FILE, SOCKET_NAME};
use pop_core::coordinator::{alarms, Coordinator, DesktopNotifier, ShellOpener};
use pop_core::models;
use pop_core::protocol::{MessageAction, Request, Response};
use pop_core::router;
use pop_core::store::SqliteStore;
use pop_core::SystemClock;

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pop")
}

pub fn socket_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SOCKET_NAME)
}

fn pid_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PID_FILE)
}

/// Run the daemon in the foreground until a shutdown request arrives.
///
/// The coordinator is event-driven, so a single-threaded runtime is enough:
/// every handler returns promptly and nothing blocks.
pub fn run_daemon(data_dir: PathBuf, dashboard_url: String) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    runtime.block_on(run(data_dir, dashboard_url))
}

async fn run(data_dir: PathBuf, dashboard_url: String) -> Result<()> {
    info!(data_dir = %data_dir.display(), "starting pop daemon");
    fs::create_dir_all(&data_dir)?;

    // Bind early so clients can connect while we initialize; a stale socket
    // from an unclean exit is removed first.
    let socket = socket_path(&data_dir);
    if socket.exists() {
        fs::remove_file(&socket)?;
    }
    let listener = UnixListener::bind(&socket)
        .with_context(|| format!("failed to bind {}", socket.display()))?;
    fs::write(pid_path(&data_dir), std::process::id().to_string())?;

    let store = Arc::new(SqliteStore::open(&data_dir)?);
    if models::seed_defaults(store.as_ref())? {
        info!("first run, seeded default documents");
    }

    let coordinator = Arc::new(Coordinator::new(
        store,
        Arc::new(SystemClock),
        Arc::new(DesktopNotifier),
        Arc::new(ShellOpener::new(dashboard_url)),
    ));
    let alarm_tasks = alarms::register_alarms(&coordinator);

    let started_at = Instant::now();
    let shutdown = Arc::new(Notify::new());

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => {
                    let coordinator = Arc::clone(&coordinator);
                    let shutdown = Arc::clone(&shutdown);
                    tokio::spawn(async move {
                        if let Err(err) =
                            handle_connection(coordinator, stream, started_at, shutdown).await
                        {
                            warn!(%err, "connection ended with error");
                        }
                    });
                }
                Err(err) => warn!(%err, "accept failed"),
            },
        }
    }

    for task in alarm_tasks {
        task.abort();
    }
    fs::remove_file(&socket).ok();
    fs::remove_file(pid_path(&data_dir)).ok();
    info!("daemon stopped");
    Ok(())
}

async fn handle_connection(
    coordinator: Arc<Coordinator>,
    stream: UnixStream,
    started_at: Instant,
    shutdown: Arc<Notify>,
) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                send_line(&mut write_half, &Response::error(0, "PARSE_ERROR", &err.to_string()))
                    .await?;
                continue;
            }
        };

        // A subscription upgrades the connection to a push stream.
        if request.action == MessageAction::SubscribeOverlays {
            let ack = Response::success(request.id, serde_json::json!({ "subscribed": true }));
            send_line(&mut write_half, &ack).await?;
            return stream_pushes(&coordinator, write_half, lines).await;
        }

        let routed = router::handle_request(&coordinator, request, started_at);
        send_line(&mut write_half, &routed.response).await?;

        if routed.shutdown {
            shutdown.notify_one();
            break;
        }
    }

    Ok(())
}

/// Forward overlay pushes until the subscriber hangs up.
async fn stream_pushes(
    coordinator: &Coordinator,
    mut write_half: OwnedWriteHalf,
    mut lines: Lines<BufReader<OwnedReadHalf>>,
) -> Result<()> {
    let mut pushes = coordinator.subscribe_pushes();
    loop {
        tokio::select! {
            push = pushes.recv() => match push {
                Ok(push) => {
                    let text = serde_json::to_string(&push)?;
                    write_half.write_all(text.as_bytes()).await?;
                    write_half.write_all(b"\n").await?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "overlay subscriber lagged, pushes dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            line = lines.next_line() => match line {
                // Subscribers have nothing further to say; drain and wait
                // for the hangup.
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => break,
            },
        }
    }
    Ok(())
}

async fn send_line(write_half: &mut OwnedWriteHalf, response: &Response) -> Result<()> {
    let text = serde_json::to_string(response)?;
    write_half.write_all(text.as_bytes()).await?;
    write_half.write_all(b"\n").await?;
    Ok(())
}
