// Producer and Consumer roles
//
// Sequential loops around one shared BoundedChannel. A role that is interrupted
// while blocked or pausing stops its own loop; whatever it already handed off stays
// handed off.

use crate::application::cancel::CancelToken;
use crate::application::channel::BoundedChannel;
use crate::port::{Pacer, ProgressEvent, ProgressSink};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Item type carried between the roles
pub type Item = i64;

/// What one role did during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleReport {
    pub role: String,
    /// Items sent (producer) or received (consumer), in order
    pub items: Vec<Item>,
    pub interrupted: bool,
}

impl RoleReport {
    pub fn handled(&self) -> usize {
        self.items.len()
    }
}

/// Sends successive values into the channel
pub struct Producer {
    name: String,
    channel: Arc<BoundedChannel<Item>>,
    pacer: Arc<dyn Pacer>,
    progress: Arc<dyn ProgressSink>,
}

impl Producer {
    pub fn new(
        name: impl Into<String>,
        channel: Arc<BoundedChannel<Item>>,
        pacer: Arc<dyn Pacer>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            pacer,
            progress,
        }
    }

    /// Produce `0..n`
    pub async fn run(&self, n: usize, cancel: &CancelToken) -> RoleReport {
        let end = Item::try_from(n).unwrap_or(Item::MAX);
        self.run_values(0..end, cancel).await
    }

    /// Produce an arbitrary sequence of values, in order
    pub async fn run_values(
        &self,
        values: impl IntoIterator<Item = Item>,
        cancel: &CancelToken,
    ) -> RoleReport {
        let mut sent = Vec::new();
        let mut values = values.into_iter().peekable();

        while let Some(item) = values.next() {
            self.progress.emit(ProgressEvent::AboutToProduce {
                role: self.name.clone(),
                item,
            });

            if let Err(e) = self.channel.send(item, cancel).await {
                return interrupted(&self.name, self.progress.as_ref(), sent, &e);
            }
            sent.push(item);
            self.progress.emit(ProgressEvent::Produced {
                role: self.name.clone(),
                item,
                len: self.channel.len(),
            });

            // No pause after the last hand-off
            if values.peek().is_some() && !pause(self.pacer.as_ref(), cancel).await {
                return interrupted(&self.name, self.progress.as_ref(), sent, &PAUSE_INTERRUPTED);
            }
        }

        finished(&self.name, self.progress.as_ref(), sent)
    }
}

/// Receives a fixed number of values from the channel
pub struct Consumer {
    name: String,
    channel: Arc<BoundedChannel<Item>>,
    pacer: Arc<dyn Pacer>,
    progress: Arc<dyn ProgressSink>,
}

impl Consumer {
    pub fn new(
        name: impl Into<String>,
        channel: Arc<BoundedChannel<Item>>,
        pacer: Arc<dyn Pacer>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            pacer,
            progress,
        }
    }

    /// Consume `n` values; the report lists them in receive order
    pub async fn run(&self, n: usize, cancel: &CancelToken) -> RoleReport {
        let mut received = Vec::with_capacity(n);

        for i in 0..n {
            self.progress.emit(ProgressEvent::AboutToConsume {
                role: self.name.clone(),
            });

            let item = match self.channel.receive(cancel).await {
                Ok(item) => item,
                Err(e) => return interrupted(&self.name, self.progress.as_ref(), received, &e),
            };
            received.push(item);
            self.progress.emit(ProgressEvent::Consumed {
                role: self.name.clone(),
                item,
                len: self.channel.len(),
            });

            if i + 1 < n && !pause(self.pacer.as_ref(), cancel).await {
                return interrupted(
                    &self.name,
                    self.progress.as_ref(),
                    received,
                    &PAUSE_INTERRUPTED,
                );
            }
        }

        finished(&self.name, self.progress.as_ref(), received)
    }
}

const PAUSE_INTERRUPTED: &str = "Interrupted while pausing";

/// Sleep for the next pacing interval; false if cancelled first
async fn pause(pacer: &dyn Pacer, cancel: &CancelToken) -> bool {
    let pause = pacer.next_pause();
    if pause.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(pause) => true,
    }
}

fn finished(role: &str, progress: &dyn ProgressSink, items: Vec<Item>) -> RoleReport {
    debug!(role = %role, handled = items.len(), "Role loop complete");
    progress.emit(ProgressEvent::RoleFinished {
        role: role.to_string(),
        handled: items.len(),
    });
    RoleReport {
        role: role.to_string(),
        items,
        interrupted: false,
    }
}

fn interrupted(
    role: &str,
    progress: &dyn ProgressSink,
    items: Vec<Item>,
    cause: &dyn std::fmt::Display,
) -> RoleReport {
    warn!(role = %role, handled = items.len(), cause = %cause, "Role interrupted");
    progress.emit(ProgressEvent::RoleInterrupted {
        role: role.to_string(),
        handled: items.len(),
    });
    RoleReport {
        role: role.to_string(),
        items,
        interrupted: true,
    }
}
