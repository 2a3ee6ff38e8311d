use tokio::sync::mpsc;

/// Forwards human-readable step messages to whoever renders progress.
/// Without a channel, reports are dropped.
pub struct ProgressReporter(Option<mpsc::UnboundedSender<String>>);

impl ProgressReporter {
    pub fn new(tx: Option<mpsc::UnboundedSender<String>>) -> Self {
        Self(tx)
    }

    pub fn silent() -> Self {
        Self(None)
    }

    pub fn report(&self, message: impl Into<String>) {
        if let Some(tx) = &self.0 {
            let _ = tx.send(message.into());
        }
    }
}
