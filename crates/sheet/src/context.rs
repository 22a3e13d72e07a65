//! Application context for scheduling messages.
//!
//! `App::on_mount` receives an `AppContext`. The demo uses it to grow the
//! sheet's content on a timer while the sheet is open, which is the case the
//! height loop exists for: content that changes size with nobody touching it.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::message::MessageEnvelope;

/// Handle for posting messages back into the event loop.
///
/// Clone it to share with spawned tasks; the channel is thread-safe.
#[derive(Clone)]
pub struct AppContext<M> {
    sender: mpsc::UnboundedSender<MessageEnvelope<M>>,
}

impl<M> AppContext<M> {
    pub fn new(sender: mpsc::UnboundedSender<MessageEnvelope<M>>) -> Self {
        Self { sender }
    }
}

impl<M: Send + 'static> AppContext<M> {
    /// Post a message to be processed in the next event loop tick.
    pub fn post(&self, message: M) {
        let envelope = MessageEnvelope::new(message, "AppContext");
        if self.sender.send(envelope).is_err() {
            log::debug!("message posted after the event loop stopped");
        }
    }

    /// Set a one-shot timer that fires a message after a delay.
    ///
    /// Must be called from inside the tokio runtime.
    pub fn set_timer(&self, delay: Duration, message: M) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(MessageEnvelope::new(message, "Timer"));
        });
    }

    /// Set a repeating interval that fires a message periodically.
    ///
    /// The first message is sent after one full period. Dropping the
    /// returned handle cancels the interval.
    pub fn set_interval<F>(&self, period: Duration, message_fn: F) -> IntervalHandle
    where
        F: Fn() -> M + Send + 'static,
    {
        let sender = self.sender.clone();
        let (cancel_tx, mut cancel_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let envelope = MessageEnvelope::new(message_fn(), "Interval");
                        if sender.send(envelope).is_err() {
                            break;
                        }
                    }
                    _ = &mut cancel_rx => break,
                }
            }
        });

        IntervalHandle {
            cancel_tx: Some(cancel_tx),
        }
    }
}

/// Handle to a running interval. Cancels the interval when dropped.
pub struct IntervalHandle {
    cancel_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl IntervalHandle {
    /// Stop further messages from being sent.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel_tx.is_some()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
