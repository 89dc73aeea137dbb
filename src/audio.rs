//! Audio output backed by rodio
//!
//! The engine lives on its own OS thread because the rodio output stream must
//! stay on the thread that opened it. Commands arrive over a std channel and
//! engine events go back to the async side over a tokio channel.

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::model::{PlaybackCommand, PlaybackSink};

const DEVICE_NAME: &str = "saavn-rs";
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Reported by the engine thread
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A stream was decoded and started. The decoder may not know its length.
    Started { url: String, duration_ms: Option<u64> },
    Finished { url: String },
    Error(String),
}

enum EngineMessage {
    Command(PlaybackCommand),
    Shutdown,
}

/// Handle to the audio engine thread
pub struct AudioBackend {
    command_tx: Sender<EngineMessage>,
    thread: Option<JoinHandle<()>>,
}

impl AudioBackend {
    pub fn start() -> Result<(Self, UnboundedReceiver<EngineEvent>)> {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = unbounded_channel();

        let thread = std::thread::Builder::new()
            .name("audio-engine".into())
            .spawn(move || Engine::new(event_tx).run(command_rx))?;

        tracing::info!(device = %Self::get_device_id(), "Audio engine started");

        Ok((Self { command_tx, thread: Some(thread) }, event_rx))
    }

    fn get_device_id() -> String {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        format!("{}-{}", DEVICE_NAME, hostname)
    }

    pub fn get_device_name() -> &'static str {
        DEVICE_NAME
    }
}

impl PlaybackSink for AudioBackend {
    fn send(&self, command: PlaybackCommand) {
        if self.command_tx.send(EngineMessage::Command(command)).is_err() {
            tracing::warn!("Audio engine is gone, dropping command");
        }
    }
}

impl Drop for AudioBackend {
    fn drop(&mut self) {
        let _ = self.command_tx.send(EngineMessage::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Audio engine thread panicked");
            }
        }
    }
}

/// Collect `first` and every command already waiting behind it. `None` means
/// a shutdown was requested.
fn drain_pending(
    first: PlaybackCommand,
    command_rx: &Receiver<EngineMessage>,
) -> Option<Vec<PlaybackCommand>> {
    let mut batch = vec![first];
    loop {
        match command_rx.try_recv() {
            Ok(EngineMessage::Command(command)) => batch.push(command),
            Ok(EngineMessage::Shutdown) => return None,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Some(batch),
        }
    }
}

/// Drop everything before the last `Load` or `Stop`. Both replace the
/// current sink, so earlier commands would only download or seek tracks
/// that are about to be discarded.
fn coalesce(mut batch: Vec<PlaybackCommand>) -> Vec<PlaybackCommand> {
    let start = batch
        .iter()
        .rposition(|c| matches!(c, PlaybackCommand::Load { .. } | PlaybackCommand::Stop))
        .unwrap_or(0);
    if start > 0 {
        tracing::debug!(skipped = start, "Skipping superseded engine commands");
    }
    batch.split_off(start)
}

struct Engine {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    current_url: Option<String>,
    http: Option<reqwest::blocking::Client>,
    event_tx: UnboundedSender<EngineEvent>,
}

impl Engine {
    fn new(event_tx: UnboundedSender<EngineEvent>) -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                tracing::error!(error = %e, "No audio output device");
                let _ = event_tx.send(EngineEvent::Error(format!("No audio output: {e}")));
                None
            }
        };

        let http = match reqwest::blocking::Client::builder().timeout(DOWNLOAD_TIMEOUT).build() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build download client");
                None
            }
        };

        Self { stream, sink: None, current_url: None, http, event_tx }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }

    fn run(mut self, command_rx: Receiver<EngineMessage>) {
        loop {
            match command_rx.recv_timeout(POLL_INTERVAL) {
                Ok(EngineMessage::Command(command)) => {
                    let Some(batch) = drain_pending(command, &command_rx) else {
                        break;
                    };
                    for command in coalesce(batch) {
                        self.handle_command(command);
                    }
                }
                Ok(EngineMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.check_finished();
        }

        self.stop();
        tracing::info!("Audio engine stopped");
    }

    fn handle_command(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Load { url, title, .. } => {
                tracing::info!(%title, "Engine loading track");
                if let Err(e) = self.load(&url) {
                    tracing::error!(%title, error = %e, "Playback failed");
                    self.emit(EngineEvent::Error(format!("Cannot play \"{title}\": {e}")));
                }
            }
            PlaybackCommand::Play => {
                if let Some(sink) = &self.sink {
                    sink.play();
                }
            }
            PlaybackCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
            }
            PlaybackCommand::Toggle => {
                if let Some(sink) = &self.sink {
                    if sink.is_paused() {
                        sink.play();
                    } else {
                        sink.pause();
                    }
                }
            }
            PlaybackCommand::SeekAbsolute(ms) => self.seek(Duration::from_millis(ms)),
            PlaybackCommand::SeekRelative(delta) => {
                if let Some(sink) = &self.sink {
                    let position = sink.get_pos().as_millis() as i64;
                    let target = (position + delta).max(0) as u64;
                    self.seek(Duration::from_millis(target));
                }
            }
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::Next | PlaybackCommand::Previous => {
                tracing::debug!(?command, "Queue navigation is handled by the player");
            }
        }
    }

    fn load(&mut self, url: &str) -> Result<()> {
        self.stop();

        let Some(stream) = &self.stream else {
            anyhow::bail!("no audio output device");
        };
        let Some(http) = &self.http else {
            anyhow::bail!("no download client");
        };

        let bytes = http.get(url).send()?.error_for_status()?.bytes()?;
        tracing::debug!(bytes = bytes.len(), "Downloaded stream");

        let decoder = Decoder::new(Cursor::new(bytes.to_vec()))?;
        let duration_ms = decoder.total_duration().map(|d| d.as_millis() as u64);

        let sink = Sink::connect_new(stream.mixer());
        sink.append(decoder);
        sink.play();

        self.sink = Some(sink);
        self.current_url = Some(url.to_string());
        self.emit(EngineEvent::Started { url: url.to_string(), duration_ms });
        Ok(())
    }

    fn seek(&self, position: Duration) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.try_seek(position) {
                tracing::warn!(error = %e, ?position, "Seek failed");
            }
        }
    }

    fn check_finished(&mut self) {
        let finished = self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            if let Some(url) = self.current_url.take() {
                tracing::debug!(%url, "Track drained");
                self.emit(EngineEvent::Finished { url });
            }
            self.sink = None;
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current_url = None;
    }
}
