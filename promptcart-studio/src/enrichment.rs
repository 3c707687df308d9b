//! Enrichment orchestrator
//!
//! Runs Translate and Optimize against the session's prompt text. Each
//! operation has its own in-flight flag: a second request for the same
//! operation while one is pending is rejected, never queued. Translate and
//! Optimize may run concurrently.
//!
//! The session lock is released for the duration of the remote call and
//! re-acquired to apply the result. There is no staleness check: a late
//! result overwrites whatever the prompt text is when it resolves.

use crate::i18n::strings;
use crate::language::DisplayLanguage;
use crate::services::{OptimizationError, OptimizationService, TranslationService};
use crate::session::SharedSession;
use chrono::Utc;
use promptcart_common::events::{EnrichmentOperation, EventBus, StudioEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed instruction prepended to every optimizer request
pub const OPTIMIZER_INSTRUCTION: &str = include_str!("../data/optimizer_instruction.txt");

/// Full optimizer request text for a prompt
pub fn optimizer_prompt(text: &str) -> String {
    format!(
        "{}\n\nInput: \"{}\"\n\nOutput (Prompt only):",
        OPTIMIZER_INSTRUCTION.trim_end(),
        text
    )
}

// ============================================================================
// In-flight flag
// ============================================================================

/// Per-operation busy flag
pub struct InFlight {
    operation: EnrichmentOperation,
    flag: Arc<AtomicBool>,
    events: EventBus,
}

impl InFlight {
    pub fn new(operation: EnrichmentOperation, events: EventBus) -> Self {
        Self {
            operation,
            flag: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    /// Set the flag if idle
    ///
    /// Returns None if the operation is already in flight.
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        self.events.emit_lossy(StudioEvent::EnrichmentStateChanged {
            operation: self.operation,
            in_flight: true,
            timestamp: Utc::now(),
        });

        Some(InFlightGuard {
            operation: self.operation,
            flag: Arc::clone(&self.flag),
            events: self.events.clone(),
        })
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag when dropped
pub struct InFlightGuard {
    operation: EnrichmentOperation,
    flag: Arc<AtomicBool>,
    events: EventBus,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.events.emit_lossy(StudioEvent::EnrichmentStateChanged {
            operation: self.operation,
            in_flight: false,
            timestamp: Utc::now(),
        });
    }
}

// ============================================================================
// Translation direction
// ============================================================================

/// Translation direction chosen from the text's script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationDirection {
    ZhToEn,
    EnToZh,
}

impl TranslationDirection {
    /// `zh|en` if the text contains any CJK unified ideograph, else `en|zh`
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| ('\u{4E00}'..='\u{9FA5}').contains(&c)) {
            TranslationDirection::ZhToEn
        } else {
            TranslationDirection::EnToZh
        }
    }

    pub fn langpair(&self) -> &'static str {
        match self {
            TranslationDirection::ZhToEn => "zh|en",
            TranslationDirection::EnToZh => "en|zh",
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// A translation is already in flight
    Busy,
    /// Prompt text was empty; nothing sent
    Skipped,
    /// Prompt text replaced with the translation
    Applied(String),
    /// Request failed; prompt text unchanged
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeOutcome {
    /// An optimization is already in flight
    Busy,
    /// No credential configured; settings panel opened
    SettingsRequired,
    /// Prompt text was empty; nothing sent
    Skipped,
    /// Prompt text replaced with the optimized text
    Applied(String),
    /// Request failed; alert opened with this message
    Failed(String),
}

/// Localized alert body for a failed optimization
pub fn optimize_failure_message(language: DisplayLanguage, err: &OptimizationError) -> String {
    let s = strings(language);
    if err.is_transport() {
        format!("{}{}", s.request_failed, s.connection_hint)
    } else {
        format!("{} ({})", s.request_failed, err)
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

pub struct EnrichmentOrchestrator {
    translator: Arc<dyn TranslationService>,
    optimizer: Arc<dyn OptimizationService>,
    translating: InFlight,
    optimizing: InFlight,
}

impl EnrichmentOrchestrator {
    pub fn new(
        translator: Arc<dyn TranslationService>,
        optimizer: Arc<dyn OptimizationService>,
        events: EventBus,
    ) -> Self {
        Self {
            translator,
            optimizer,
            translating: InFlight::new(EnrichmentOperation::Translate, events.clone()),
            optimizing: InFlight::new(EnrichmentOperation::Optimize, events),
        }
    }

    pub fn is_translating(&self) -> bool {
        self.translating.is_set()
    }

    pub fn is_optimizing(&self) -> bool {
        self.optimizing.is_set()
    }

    /// Translate the current prompt text
    ///
    /// Failures are logged and swallowed; the prompt text stays as it was.
    pub async fn translate(&self, session: &SharedSession) -> TranslateOutcome {
        let (guard, text) = {
            let session = session.lock().await;
            if self.translating.is_set() {
                return TranslateOutcome::Busy;
            }
            let text = session.prompt_text().into_owned();
            if text.is_empty() {
                return TranslateOutcome::Skipped;
            }
            let Some(guard) = self.translating.try_acquire() else {
                return TranslateOutcome::Busy;
            };
            (guard, text)
        };

        let direction = TranslationDirection::detect(&text);
        debug!(langpair = direction.langpair(), "Translation started");

        let outcome = match self.translator.translate(&text, direction.langpair()).await {
            Ok(translated) => {
                session.lock().await.apply_enrichment_result(translated.clone());
                info!(langpair = direction.langpair(), "Translation applied");
                TranslateOutcome::Applied(translated)
            }
            Err(e) => {
                warn!(error = %e, langpair = direction.langpair(), "Translation failed");
                TranslateOutcome::Failed(e.to_string())
            }
        };

        drop(guard);
        outcome
    }

    /// Optimize the current prompt text
    ///
    /// A missing credential opens the settings panel without any request.
    /// Failures open an alert through the session's confirmation gate.
    pub async fn optimize(&self, session: &SharedSession) -> OptimizeOutcome {
        let (guard, text, credential, endpoint, language) = {
            let mut session = session.lock().await;
            if self.optimizing.is_set() {
                return OptimizeOutcome::Busy;
            }

            let Some(credential) = session.preferences().credential().map(str::to_string) else {
                info!("Optimize requested without credential; opening settings");
                session.open_settings();
                return OptimizeOutcome::SettingsRequired;
            };

            let text = session.prompt_text().into_owned();
            if text.is_empty() {
                return OptimizeOutcome::Skipped;
            }

            let Some(guard) = self.optimizing.try_acquire() else {
                return OptimizeOutcome::Busy;
            };

            let endpoint = session.preferences().effective_endpoint().to_string();
            (guard, text, credential, endpoint, session.language())
        };

        debug!(endpoint = %endpoint, "Optimization started");

        let result = self
            .optimizer
            .generate(&endpoint, &credential, &optimizer_prompt(&text))
            .await;

        let outcome = match result {
            Ok(optimized) => {
                session.lock().await.apply_enrichment_result(optimized.clone());
                info!("Optimization applied");
                OptimizeOutcome::Applied(optimized)
            }
            Err(e) => {
                warn!(error = %e, transport = e.is_transport(), "Optimization failed");
                let message = optimize_failure_message(language, &e);
                let title = strings(language).ai_error_title;
                session.lock().await.show_alert(title, &message);
                OptimizeOutcome::Failed(message)
            }
        };

        drop(guard);
        outcome
    }
}
