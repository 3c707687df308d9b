//! Confirmation gate
//!
//! Single-slot dialog state machine: `closed -> open -> closed`. A request
//! carries a title, a message and an action to run on confirm. A new request
//! while open replaces the pending one. The gate does not know what the
//! action does; its owner runs the action returned by [`ConfirmationGate::confirm`].

use serde::Serialize;

/// Deferred action executed against the gate owner on confirm
pub type ConfirmAction<C> = Box<dyn FnOnce(&mut C) + Send + 'static>;

/// What the UI renders while the gate is open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogView {
    pub title: String,
    pub message: String,
}

struct PendingRequest<C> {
    view: DialogView,
    action: ConfirmAction<C>,
}

/// Gate guarding actions of type `FnOnce(&mut C)`
pub struct ConfirmationGate<C> {
    pending: Option<PendingRequest<C>>,
}

impl<C> Default for ConfirmationGate<C> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<C> std::fmt::Debug for ConfirmationGate<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationGate")
            .field("pending", &self.pending.as_ref().map(|p| &p.view))
            .finish()
    }
}

impl<C> ConfirmationGate<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate with an action to run on confirm
    ///
    /// Returns true if a pending request was replaced.
    pub fn request<F>(&mut self, title: impl Into<String>, message: impl Into<String>, action: F) -> bool
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        let replaced = self.pending.is_some();
        self.pending = Some(PendingRequest {
            view: DialogView {
                title: title.into(),
                message: message.into(),
            },
            action: Box::new(action),
        });
        replaced
    }

    /// Open the gate as a dismissible alert (confirm does nothing)
    pub fn alert(&mut self, title: impl Into<String>, message: impl Into<String>) -> bool {
        self.request(title, message, |_: &mut C| {})
    }

    /// Close the gate, handing back the pending action
    ///
    /// Returns None when the gate is already closed.
    pub fn confirm(&mut self) -> Option<ConfirmAction<C>> {
        self.pending.take().map(|p| p.action)
    }

    /// Close the gate, discarding the pending action
    ///
    /// Returns false when the gate is already closed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> Option<&DialogView> {
        self.pending.as_ref().map(|p| &p.view)
    }
}
