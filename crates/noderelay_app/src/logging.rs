// SPDX-License-Identifier: MIT OR Apache-2.0
//! Log setup and the bridge that feeds the panel's status log.

use std::sync::mpsc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "noderelay_app=info,noderelay_interchange=info,noderelay_graph=warn";

/// A log event captured by the [`StatusBridge`] layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Severity
    pub level: Level,
    /// Formatted message
    pub message: String,
    /// Module path the event came from
    pub target: String,
}

/// A `tracing_subscriber::Layer` that forwards events over an `mpsc` channel
/// so the panel can show them.
pub struct StatusBridge {
    sender: mpsc::Sender<StatusEvent>,
    min_level: Level,
}

impl StatusBridge {
    /// Create a bridge forwarding `INFO` and above, and return `(layer, receiver)`
    pub fn new() -> (Self, mpsc::Receiver<StatusEvent>) {
        Self::with_level(Level::INFO)
    }

    /// Create a bridge forwarding events at `min_level` or more severe
    pub fn with_level(min_level: Level) -> (Self, mpsc::Receiver<StatusEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender, min_level }, receiver)
    }
}

impl<S> tracing_subscriber::Layer<S> for StatusBridge
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        // Levels compare by verbosity: ERROR is the smallest.
        if *meta.level() > self.min_level {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        // The receiver may be gone once the panel is closed.
        let _ = self.sender.send(StatusEvent {
            level: *meta.level(),
            message: visitor.finish(),
            target: meta.target().to_string(),
        });
    }
}

/// Collects the `message` field and any other fields as `name = value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if name == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{name} = {value}"));
        }
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.join(", "),
            (false, false) => format!("{} ({})", self.message, self.fields.join(", ")),
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push_field(field.name(), &format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push_field(field.name(), &value);
    }
}

/// Install the global subscriber: an env filter, the fmt layer and a
/// [`StatusBridge`].
///
/// Returns the receiving end of the bridge for the panel.
pub fn init() -> Result<mpsc::Receiver<StatusEvent>, TryInitError> {
    let (bridge, receiver) = StatusBridge::new();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(bridge)
        .try_init()?;

    tracing::debug!("Logging initialized");
    Ok(receiver)
}
