//! Studio session
//!
//! The single owner of UI-relevant mutable state: selection, prompt text,
//! confirmation gate, preferences and the settings panel flag. Every change
//! is published on the [`EventBus`].

use crate::gate::{ConfirmationGate, DialogView};
use crate::i18n::{strings, UiStrings};
use crate::language::{DisplayLanguage, Theme};
use crate::preferences::{PreferenceStore, Preferences};
use crate::selection::{SelectionStore, ToggleOutcome};
use crate::taxonomy::Tag;
use chrono::Utc;
use promptcart_common::events::{EventBus, StudioEvent};
use promptcart_common::Result;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Session shared between HTTP handlers and the enrichment orchestrator
///
/// Never hold the lock across a remote call.
pub type SharedSession = Arc<Mutex<Session>>;

/// Point-in-time view of the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub tag_ids: Vec<String>,
    pub prompt_text: String,
    pub detached: bool,
    pub language: DisplayLanguage,
    pub theme: Theme,
    pub dialog: Option<DialogView>,
    pub settings_open: bool,
    pub has_credential: bool,
    pub endpoint: String,
    pub strings: &'static UiStrings,
}

pub struct Session {
    selection: SelectionStore,
    gate: ConfirmationGate<Session>,
    preferences: Preferences,
    settings_open: bool,
    events: EventBus,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("selection", &self.selection)
            .field("gate", &self.gate)
            .field("preferences", &self.preferences)
            .field("settings_open", &self.settings_open)
            .finish()
    }
}

impl Session {
    /// New session using the persisted display language
    pub fn new(preferences: Preferences, events: EventBus) -> Self {
        Self {
            selection: SelectionStore::new(preferences.language()),
            gate: ConfirmationGate::new(),
            preferences,
            settings_open: false,
            events,
        }
    }

    /// Load preferences from `store` and start a session
    pub async fn load(store: Arc<dyn PreferenceStore>, events: EventBus) -> Result<Self> {
        let preferences = Preferences::load(store).await?;
        Ok(Self::new(preferences, events))
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Selection and prompt text
    // ------------------------------------------------------------------

    pub fn toggle_tag(&mut self, tag: Arc<Tag>) -> ToggleOutcome {
        let id = tag.id.clone();
        let outcome = self.selection.toggle(tag);
        debug!(tag_id = %id, outcome = ?outcome, "Tag toggled");
        self.publish_selection();
        outcome
    }

    /// Ask for consent before clearing the selection
    pub fn request_clear(&mut self) {
        let s = self.strings();
        self.open_dialog(s.clear_title, s.clear_message, |session: &mut Session| {
            session.clear_selection()
        });
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        info!("Selection cleared");
        self.publish_selection();
    }

    /// Manual edit of the prompt text
    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        self.selection.set_prompt_text(text);
        self.publish_prompt();
    }

    /// Overwrite the prompt text with a remote result
    pub fn apply_enrichment_result(&mut self, text: impl Into<String>) {
        self.set_prompt_text(text);
    }

    pub fn prompt_text(&self) -> Cow<'_, str> {
        self.selection.prompt_text()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    // ------------------------------------------------------------------
    // Confirmation dialog
    // ------------------------------------------------------------------

    fn open_dialog<F>(&mut self, title: &str, message: &str, action: F)
    where
        F: FnOnce(&mut Session) + Send + 'static,
    {
        if self.gate.request(title, message, action) {
            debug!(title = title, "Pending dialog replaced");
        }
        self.events.emit_lossy(StudioEvent::DialogOpened {
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Open a dismissible alert
    pub fn show_alert(&mut self, title: &str, message: &str) {
        self.open_dialog(title, message, |_: &mut Session| {});
    }

    /// Close the dialog and run its action
    ///
    /// Returns false if no dialog was open.
    pub fn confirm_dialog(&mut self) -> bool {
        let Some(action) = self.gate.confirm() else {
            return false;
        };
        self.events.emit_lossy(StudioEvent::DialogClosed {
            confirmed: true,
            timestamp: Utc::now(),
        });
        action(self);
        true
    }

    /// Close the dialog without running its action
    pub fn cancel_dialog(&mut self) -> bool {
        if !self.gate.cancel() {
            return false;
        }
        self.events.emit_lossy(StudioEvent::DialogClosed {
            confirmed: false,
            timestamp: Utc::now(),
        });
        true
    }

    pub fn dialog(&self) -> Option<&DialogView> {
        self.gate.view()
    }

    // ------------------------------------------------------------------
    // Language and theme
    // ------------------------------------------------------------------

    pub fn language(&self) -> DisplayLanguage {
        self.selection.language()
    }

    pub fn strings(&self) -> &'static UiStrings {
        strings(self.language())
    }

    /// Switch display language (persisted)
    ///
    /// Returns false if the language was already active.
    pub async fn set_language(&mut self, language: DisplayLanguage) -> Result<bool> {
        if self.language() == language {
            return Ok(false);
        }

        self.preferences.set_language(language).await?;
        self.selection.set_language(language);

        info!(language = language.code(), "Display language changed");
        self.events.emit_lossy(StudioEvent::LanguageChanged {
            language: language.code().to_string(),
            timestamp: Utc::now(),
        });
        self.publish_prompt();
        Ok(true)
    }

    pub async fn toggle_language(&mut self) -> Result<DisplayLanguage> {
        let next = self.language().toggled();
        self.set_language(next).await?;
        Ok(next)
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    pub async fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.preferences.theme().toggled();
        self.preferences.set_theme(next).await?;

        debug!(theme = next.as_str(), "Theme changed");
        self.events.emit_lossy(StudioEvent::ThemeChanged {
            theme: next.as_str().to_string(),
            timestamp: Utc::now(),
        });
        Ok(next)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
        self.events.emit_lossy(StudioEvent::SettingsRequested {
            timestamp: Utc::now(),
        });
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    /// Save credential and endpoint, then close the settings panel
    pub async fn update_settings(&mut self, credential: &str, endpoint: &str) -> Result<()> {
        self.preferences.set_credential(credential).await?;
        self.preferences.set_endpoint(endpoint).await?;
        self.settings_open = false;

        info!(
            has_credential = self.preferences.has_credential(),
            endpoint = %endpoint,
            "Settings saved"
        );
        self.events.emit_lossy(StudioEvent::SettingsChanged {
            has_credential: self.preferences.has_credential(),
            endpoint: endpoint.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tag_ids: self.selection.tag_ids(),
            prompt_text: self.prompt_text().into_owned(),
            detached: self.selection.is_detached(),
            language: self.language(),
            theme: self.theme(),
            dialog: self.gate.view().cloned(),
            settings_open: self.settings_open,
            has_credential: self.preferences.has_credential(),
            endpoint: self.preferences.endpoint().to_string(),
            strings: self.strings(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn publish_selection(&self) {
        self.events.emit_lossy(StudioEvent::SelectionChanged {
            tag_ids: self.selection.tag_ids(),
            timestamp: Utc::now(),
        });
        self.publish_prompt();
    }

    fn publish_prompt(&self) {
        self.events.emit_lossy(StudioEvent::PromptTextChanged {
            text: self.prompt_text().into_owned(),
            detached: self.selection.is_detached(),
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{MemoryPreferenceStore, PreferenceKey};
    use crate::taxonomy::tag;

    async fn session() -> (Session, Arc<MemoryPreferenceStore>) {
        let store = Arc::new(MemoryPreferenceStore::new());
        let session = Session::load(store.clone(), EventBus::new(64)).await.unwrap();
        (session, store)
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let (mut session, _) = session().await;
        session.toggle_tag(tag("a", "猫", "cat"));
        session.toggle_tag(tag("b", "狗", "dog"));

        session.request_clear();
        assert_eq!(session.selection().len(), 2);
        assert_eq!(session.dialog().unwrap().title, "清空标签");

        assert!(session.confirm_dialog());
        assert!(session.selection().is_empty());
        assert_eq!(session.prompt_text(), "");
        assert!(session.dialog().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_clear_keeps_selection_and_edit() {
        let (mut session, _) = session().await;
        session.toggle_tag(tag("a", "猫", "cat"));
        session.set_prompt_text("edited");

        session.request_clear();
        assert!(session.cancel_dialog());

        assert_eq!(session.selection().tag_ids(), vec!["a"]);
        assert_eq!(session.prompt_text(), "edited");
        assert!(!session.confirm_dialog());
    }

    #[tokio::test]
    async fn test_alert_replaces_pending_clear() {
        let (mut session, _) = session().await;
        session.toggle_tag(tag("a", "猫", "cat"));

        session.request_clear();
        session.show_alert("AI Error", "Request failed.");
        session.confirm_dialog();

        // The clear action was replaced, so the selection survives
        assert_eq!(session.selection().len(), 1);
    }

    #[tokio::test]
    async fn test_language_toggle_persists_and_rederives() {
        let (mut session, store) = session().await;
        session.toggle_tag(tag("a", "猫", "cat"));
        session.toggle_tag(tag("b", "狗", "dog"));
        session.set_prompt_text("edited");

        assert_eq!(session.toggle_language().await.unwrap(), DisplayLanguage::Secondary);

        assert_eq!(session.prompt_text(), "cat, dog");
        assert_eq!(session.strings().clear, "Clear");
        assert_eq!(store.get(PreferenceKey::Language).await.unwrap().as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_session_starts_in_persisted_language() {
        let store = Arc::new(MemoryPreferenceStore::with_values([(
            PreferenceKey::Language,
            "en".to_string(),
        )]));
        let mut session = Session::load(store, EventBus::new(8)).await.unwrap();
        session.toggle_tag(tag("a", "猫", "cat"));
        assert_eq!(session.prompt_text(), "cat");
    }

    #[tokio::test]
    async fn test_theme_toggle_persists() {
        let (mut session, store) = session().await;
        assert_eq!(session.toggle_theme().await.unwrap(), Theme::Dark);
        assert_eq!(store.get(PreferenceKey::Theme).await.unwrap().as_deref(), Some("dark"));
        assert_eq!(session.toggle_theme().await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn test_update_settings_closes_panel() {
        let (mut session, store) = session().await;
        session.open_settings();
        assert!(session.settings_open());

        session.update_settings("key-123", "https://proxy.example/").await.unwrap();

        assert!(!session.settings_open());
        assert!(session.preferences().has_credential());
        assert_eq!(
            store.get(PreferenceKey::Credential).await.unwrap().as_deref(),
            Some("key-123")
        );
    }

    #[tokio::test]
    async fn test_events_follow_mutations() {
        let (mut session, _) = session().await;
        let mut rx = session.events().subscribe();

        session.toggle_tag(tag("a", "猫", "cat"));

        match rx.recv().await.unwrap() {
            StudioEvent::SelectionChanged { tag_ids, .. } => assert_eq!(tag_ids, vec!["a"]),
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.recv().await.unwrap() {
            StudioEvent::PromptTextChanged { text, detached, .. } => {
                assert_eq!(text, "猫");
                assert!(!detached);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_hides_credential() {
        let (mut session, _) = session().await;
        session.update_settings("secret-key", "https://x").await.unwrap();

        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(json.contains("\"has_credential\":true"));
    }
}
