//! Event types for the PromptCart event system
//!
//! Every observable change of the studio session is published as a
//! [`StudioEvent`] on the [`EventBus`]. Connected UIs receive them over SSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Remote enrichment operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentOperation {
    /// Machine translation of the prompt text
    Translate,
    /// AI prompt optimization
    Optimize,
}

impl EnrichmentOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentOperation::Translate => "translate",
            EnrichmentOperation::Optimize => "optimize",
        }
    }
}

impl std::fmt::Display for EnrichmentOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Studio event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StudioEvent {
    /// Selected tags changed (toggle or clear)
    SelectionChanged {
        /// Selected tag ids in selection order
        tag_ids: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Visible prompt text changed
    PromptTextChanged {
        /// Current prompt text
        text: String,
        /// True when the text no longer tracks the selection
        detached: bool,
        timestamp: DateTime<Utc>,
    },

    /// Display language switched
    LanguageChanged {
        /// Language code ("zh" or "en")
        language: String,
        timestamp: DateTime<Utc>,
    },

    /// Theme switched
    ThemeChanged {
        /// Theme name ("light" or "dark")
        theme: String,
        timestamp: DateTime<Utc>,
    },

    /// Confirmation dialog opened (or its pending request replaced)
    DialogOpened {
        title: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Confirmation dialog closed
    DialogClosed {
        /// True if the user confirmed, false if cancelled
        confirmed: bool,
        timestamp: DateTime<Utc>,
    },

    /// UI should show the settings panel
    ///
    /// Emitted when an operation needs a credential that is not configured.
    SettingsRequested { timestamp: DateTime<Utc> },

    /// Credential or endpoint changed
    SettingsChanged {
        /// Whether a credential is configured (the value is never broadcast)
        has_credential: bool,
        endpoint: String,
        timestamp: DateTime<Utc>,
    },

    /// In-flight state of an enrichment operation changed
    ///
    /// The UI disables the operation's trigger while `in_flight` is true.
    EnrichmentStateChanged {
        operation: EnrichmentOperation,
        in_flight: bool,
        timestamp: DateTime<Utc>,
    },
}

impl StudioEvent {
    /// Event type name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            StudioEvent::SelectionChanged { .. } => "SelectionChanged",
            StudioEvent::PromptTextChanged { .. } => "PromptTextChanged",
            StudioEvent::LanguageChanged { .. } => "LanguageChanged",
            StudioEvent::ThemeChanged { .. } => "ThemeChanged",
            StudioEvent::DialogOpened { .. } => "DialogOpened",
            StudioEvent::DialogClosed { .. } => "DialogClosed",
            StudioEvent::SettingsRequested { .. } => "SettingsRequested",
            StudioEvent::SettingsChanged { .. } => "SettingsChanged",
            StudioEvent::EnrichmentStateChanged { .. } => "EnrichmentStateChanged",
        }
    }
}

/// Event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StudioEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: StudioEvent,
    ) -> Result<usize, broadcast::error::SendError<StudioEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: StudioEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
