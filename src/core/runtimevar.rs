//! Polling runtime variables.
//!
//! A [`Variable`] owns a background task that asks its [`Watcher`] for the
//! current raw value every `wait_time`, decodes it, and publishes a new
//! state only when the value or the failure changes. Readers either take the
//! last good value ([`Variable::latest`]) or wait for the next change
//! ([`Variable::watch`]).

use crate::domain::model::{RawValue, Snapshot, WatchOptions};
use crate::domain::ports::Watcher;
use crate::utils::error::{GuestbookError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Turns raw variable bytes into a typed value.
pub type Decoder<T> = fn(&[u8]) -> Result<T>;

pub fn string_decoder(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| GuestbookError::DecodeError {
        message: format!("value is not valid UTF-8: {}", e),
    })
}

pub fn bytes_decoder(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(bytes.to_vec())
}

pub fn json_decoder<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| GuestbookError::DecodeError {
        message: format!("value is not valid JSON: {}", e),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    NotFound,
    Decode(String),
    Other(String),
}

impl Failure {
    fn from_error(error: &GuestbookError) -> Self {
        match error {
            GuestbookError::VariableNotFoundError { .. } => Failure::NotFound,
            GuestbookError::DecodeError { message } => Failure::Decode(message.clone()),
            GuestbookError::VariableError { message, .. } => Failure::Other(message.clone()),
            other => Failure::Other(other.to_string()),
        }
    }

    fn into_error(self, name: &str) -> GuestbookError {
        match self {
            Failure::NotFound => GuestbookError::VariableNotFoundError {
                name: name.to_string(),
            },
            Failure::Decode(message) => GuestbookError::DecodeError { message },
            Failure::Other(message) => GuestbookError::VariableError {
                name: name.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct State<T> {
    latest: Option<Snapshot<T>>,
    // Set when the most recent change was a failure; cleared by the next good value.
    failure: Option<Failure>,
    updates: u64,
}

fn closed_error(name: &str) -> GuestbookError {
    GuestbookError::VariableClosedError {
        name: name.to_string(),
    }
}

pub struct Variable<T> {
    name: String,
    wait_time: Duration,
    rx: watch::Receiver<State<T>>,
    poller: JoinHandle<()>,
    closed: AtomicBool,
}

impl<T> Variable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Starts polling `watcher`. Must be called from within a Tokio runtime.
    ///
    /// Only the name is checked here; a missing value surfaces on the first read.
    pub fn open<W>(name: &str, watcher: W, decoder: Decoder<T>, options: WatchOptions) -> Result<Self>
    where
        W: Watcher + 'static,
    {
        validate_non_empty_string("variable name", name)?;

        let wait_time = options.effective_wait_time();
        let (tx, rx) = watch::channel(State {
            latest: None,
            failure: None,
            updates: 0,
        });
        let poller = tokio::spawn(poll(name.to_string(), watcher, decoder, wait_time, tx));

        tracing::debug!(variable = name, ?wait_time, "Opened runtime variable");

        Ok(Self {
            name: name.to_string(),
            wait_time,
            rx,
            poller,
            closed: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Returns the last good value, waiting for the first poll if needed.
    /// If no good value has ever been seen, returns the latest failure.
    /// The returned state counts as seen, so a following [`Variable::watch`]
    /// waits for the next change.
    pub async fn latest(&mut self) -> Result<Snapshot<T>> {
        self.ensure_open()?;

        let state = self
            .rx
            .wait_for(|state| state.updates > 0)
            .await
            .map_err(|_| closed_error(&self.name))?;

        let result = match (&state.latest, &state.failure) {
            (Some(snapshot), _) => Ok(snapshot.clone()),
            (None, Some(failure)) => Err(failure.clone().into_error(&self.name)),
            (None, None) => Err(closed_error(&self.name)),
        };
        result
    }

    /// Waits for the next unseen change. The first call returns the first
    /// polled state unless [`Variable::latest`] already saw it.
    pub async fn watch(&mut self) -> Result<Snapshot<T>> {
        self.ensure_open()?;

        self.rx
            .changed()
            .await
            .map_err(|_| closed_error(&self.name))?;

        let state = self.rx.borrow_and_update();
        let result = match &state.failure {
            Some(failure) => Err(failure.clone().into_error(&self.name)),
            None => state
                .latest
                .clone()
                .ok_or_else(|| closed_error(&self.name)),
        };
        result
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.poller.abort();
            tracing::debug!(variable = %self.name, "Closed runtime variable");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(closed_error(&self.name));
        }
        Ok(())
    }
}

impl<T> Drop for Variable<T> {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

impl<T> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("wait_time", &self.wait_time)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

async fn poll<T, W>(
    name: String,
    watcher: W,
    decoder: Decoder<T>,
    wait_time: Duration,
    tx: watch::Sender<State<T>>,
) where
    T: Clone + Send + Sync + 'static,
    W: Watcher,
{
    let mut last_raw: Option<RawValue> = None;
    let mut last_failure: Option<Failure> = None;

    loop {
        match watcher.fetch().await {
            Ok(raw) if last_raw.as_ref() == Some(&raw) => {}
            Ok(raw) => {
                match decoder(&raw.bytes) {
                    Ok(value) => {
                        tracing::info!(variable = %name, version = ?raw.version, "Runtime variable updated");
                        let snapshot = Snapshot {
                            value,
                            update_time: Utc::now(),
                            version: raw.version.clone(),
                        };
                        tx.send_modify(|state| {
                            state.latest = Some(snapshot);
                            state.failure = None;
                            state.updates += 1;
                        });
                        last_failure = None;
                    }
                    Err(e) => publish_failure(&name, &tx, &mut last_failure, &e),
                }
                last_raw = Some(raw);
            }
            Err(e) => {
                // Forget the last value so a recovery republishes it.
                last_raw = None;
                publish_failure(&name, &tx, &mut last_failure, &e);
            }
        }

        if tx.is_closed() {
            break;
        }
        tokio::time::sleep(wait_time).await;
    }
}

fn publish_failure<T>(
    name: &str,
    tx: &watch::Sender<State<T>>,
    last_failure: &mut Option<Failure>,
    error: &GuestbookError,
) {
    let failure = Failure::from_error(error);
    if last_failure.as_ref() == Some(&failure) {
        return;
    }

    tracing::warn!(variable = %name, error = %error, "Runtime variable poll failed");
    *last_failure = Some(failure.clone());
    tx.send_modify(|state| {
        state.failure = Some(failure);
        state.updates += 1;
    });
}
