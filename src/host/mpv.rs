//! mpv JSON IPC client.
//!
//! Talks to an mpv instance started with `--input-ipc-server=<socket>`.
//! Requests are newline-delimited JSON carrying a `request_id`; replies are
//! matched back to the waiting caller by that id. Events (key presses routed
//! through `script-message`, shutdown) are forwarded on a channel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use crate::host::{PlayerError, PlayerQuery};
use crate::notify::{Notice, NotificationSurface};

/// `script-message` name the hotkey is bound to
pub const MARK_MESSAGE: &str = "clipmark-mark";

/// Events pushed by mpv that the client cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MpvEvent {
    /// A `script-message` broadcast; the first argument is the message name
    ClientMessage(Vec<String>),
    /// mpv is quitting, or the connection closed
    Shutdown,
}

impl MpvEvent {
    /// Whether this is a press of the clip hotkey
    pub fn is_mark_press(&self) -> bool {
        matches!(self, MpvEvent::ClientMessage(args) if args.first().map(String::as_str) == Some(MARK_MESSAGE))
    }
}

type Reply = Result<Value, String>;
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;

/// Connection to one mpv instance
pub struct MpvClient {
    outgoing: mpsc::UnboundedSender<String>,
    pending: Pending,
    closed: Arc<AtomicBool>,
    next_id: AtomicU64,
}

impl MpvClient {
    /// Connect to mpv's IPC socket
    #[cfg(unix)]
    pub async fn connect(socket: &Path) -> Result<(Self, mpsc::UnboundedReceiver<MpvEvent>), PlayerError> {
        let stream = tokio::net::UnixStream::connect(socket).await?;
        log::info!("Connected to mpv at {:?}", socket);
        Ok(Self::from_stream(stream))
    }

    #[cfg(not(unix))]
    pub async fn connect(socket: &Path) -> Result<(Self, mpsc::UnboundedReceiver<MpvEvent>), PlayerError> {
        Err(PlayerError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("mpv IPC over {:?} needs a Unix socket", socket),
        )))
    }

    /// Run the protocol over an already-open stream.
    /// Spawns a reader and a writer task; must be called inside a tokio runtime.
    pub fn from_stream<S>(stream: S) -> (Self, mpsc::UnboundedReceiver<MpvEvent>)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, mut write_half) = tokio::io::split(stream);
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(async move {
            while let Some(line) = outgoing_rx.recv().await {
                let written = async {
                    write_half.write_all(line.as_bytes()).await?;
                    write_half.write_all(b"\n").await?;
                    write_half.flush().await
                };
                if let Err(e) = written.await {
                    log::warn!("mpv IPC write failed: {}", e);
                    break;
                }
            }
        });

        let reader_pending = Arc::clone(&pending);
        let reader_closed = Arc::clone(&closed);
        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => dispatch(&line, &reader_pending, &events_tx),
                    Ok(None) => break,
                    Err(e) => {
                        log::warn!("mpv IPC read failed: {}", e);
                        break;
                    }
                }
            }
            log::info!("mpv IPC connection closed");
            // dropping the senders wakes every waiter with Disconnected
            let mut waiters = lock(&reader_pending);
            reader_closed.store(true, Ordering::SeqCst);
            waiters.clear();
            drop(waiters);
            let _ = events_tx.send(MpvEvent::Shutdown);
        });

        let client = Self {
            outgoing,
            pending,
            closed,
            next_id: AtomicU64::new(1),
        };
        (client, events_rx)
    }

    /// Send a command and wait for its reply data
    pub async fn request(&self, command: Vec<Value>) -> Result<Value, PlayerError> {
        let name = command
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        {
            let mut waiters = lock(&self.pending);
            if self.closed.load(Ordering::SeqCst) {
                return Err(PlayerError::Disconnected);
            }
            waiters.insert(id, tx);
        }

        let message = json!({ "command": command, "request_id": id }).to_string();
        if self.outgoing.send(message).is_err() {
            lock(&self.pending).remove(&id);
            return Err(PlayerError::Disconnected);
        }

        match rx.await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(reason)) if reason == "property unavailable" => Err(PlayerError::NothingPlaying),
            Ok(Err(reason)) => Err(PlayerError::Rejected { command: name, reason }),
            Err(_) => Err(PlayerError::Disconnected),
        }
    }

    /// Send a command without waiting for the reply
    pub fn command(&self, command: Vec<Value>) {
        let message = json!({ "command": command }).to_string();
        if self.outgoing.send(message).is_err() {
            log::debug!("mpv IPC closed, dropping command");
        }
    }

    pub async fn get_property(&self, name: &str) -> Result<Value, PlayerError> {
        self.request(vec![json!("get_property"), json!(name)]).await
    }

    async fn get_string(&self, name: &str) -> Result<String, PlayerError> {
        match self.get_property(name).await? {
            Value::String(s) => Ok(s),
            _ => Err(PlayerError::UnexpectedReply(name.to_string())),
        }
    }

    /// Route presses of `key` to [`MARK_MESSAGE`], overriding any
    /// default binding of the same key.
    pub async fn bind_hotkey(&self, key: &str) -> Result<(), PlayerError> {
        let binding = format!("script-message {}", MARK_MESSAGE);
        self.request(vec![json!("keybind"), json!(key), json!(binding)]).await?;
        log::info!("Bound {} to clip marking", key);
        Ok(())
    }
}

fn lock(pending: &Pending) -> std::sync::MutexGuard<'_, HashMap<u64, oneshot::Sender<Reply>>> {
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn dispatch(line: &str, pending: &Pending, events: &mpsc::UnboundedSender<MpvEvent>) {
    let message: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("Ignoring malformed mpv message ({}): {}", e, line);
            return;
        }
    };

    if let Some(event) = message.get("event").and_then(Value::as_str) {
        match event {
            "client-message" => {
                let args = message
                    .get("args")
                    .and_then(Value::as_array)
                    .map(|args| args.iter().filter_map(|a| a.as_str().map(str::to_string)).collect())
                    .unwrap_or_default();
                let _ = events.send(MpvEvent::ClientMessage(args));
            }
            "shutdown" => {
                let _ = events.send(MpvEvent::Shutdown);
            }
            _ => {}
        }
        return;
    }

    let Some(id) = message.get("request_id").and_then(Value::as_u64) else {
        return;
    };
    let Some(waiter) = lock(pending).remove(&id) else {
        return;
    };

    let status = message.get("error").and_then(Value::as_str).unwrap_or("success");
    let reply = if status == "success" {
        Ok(message.get("data").cloned().unwrap_or(Value::Null))
    } else {
        Err(status.to_string())
    };
    let _ = waiter.send(reply);
}

fn is_url(path: &str) -> bool {
    match path.find("://") {
        Some(idx) => {
            idx > 0
                && path[..idx]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}

#[async_trait]
impl PlayerQuery for MpvClient {
    async fn position_seconds(&self) -> Result<f64, PlayerError> {
        self.get_property("time-pos")
            .await?
            .as_f64()
            .ok_or_else(|| PlayerError::UnexpectedReply("time-pos".to_string()))
    }

    async fn source_path(&self) -> Result<PathBuf, PlayerError> {
        let path = self.get_string("path").await?;
        if is_url(&path) {
            return Err(PlayerError::NotLocal(path));
        }

        let path = PathBuf::from(path);
        if path.is_absolute() {
            return Ok(path);
        }
        let cwd = self.get_string("working-directory").await?;
        Ok(Path::new(&cwd).join(path))
    }

    async fn source_filename(&self) -> Result<String, PlayerError> {
        self.get_string("filename").await
    }
}

impl NotificationSurface for MpvClient {
    fn show(&self, notice: &Notice) {
        let text = if notice.is_error {
            format!("⚠ {}", notice.text())
        } else {
            notice.text()
        };
        self.command(vec![json!("show-text"), json!(text), json!(notice.duration_ms)]);
    }

    fn hide(&self) {
        self.command(vec![json!("show-text"), json!(""), json!(1)]);
    }
}
