//! Shared test fixtures: scripted remote services and an in-memory app

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use promptcart_common::events::EventBus;
use promptcart_studio::enrichment::EnrichmentOrchestrator;
use promptcart_studio::preferences::{MemoryPreferenceStore, PreferenceKey};
use promptcart_studio::services::{
    OptimizationError, OptimizationService, TranslationError, TranslationService,
};
use promptcart_studio::session::Session;
use promptcart_studio::taxonomy::Taxonomy;
use promptcart_studio::AppState;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted reply of a fake service
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    ServiceError(String),
    Transport,
    Empty,
}

/// Call recorder with an optional release latch
///
/// When `hold` is set, each call signals `started` and then waits on
/// `release` before replying.
#[derive(Default)]
struct Script {
    reply: Mutex<Option<Reply>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
    hold: bool,
    started: Notify,
    release: Notify,
}

impl Script {
    async fn run(&self, request: String) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        if self.hold {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Reply::Empty)
    }
}

pub struct FakeTranslator(Script);

impl FakeTranslator {
    pub fn replying(reply: Reply) -> Self {
        Self(Script {
            reply: Mutex::new(Some(reply)),
            ..Default::default()
        })
    }

    pub fn held(reply: Reply) -> Self {
        Self(Script {
            reply: Mutex::new(Some(reply)),
            hold: true,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }

    /// `langpair` of every request, in order
    pub fn langpairs(&self) -> Vec<String> {
        self.0.requests.lock().unwrap().clone()
    }

    pub async fn started(&self) {
        self.0.started.notified().await
    }

    pub fn release(&self) {
        self.0.release.notify_one()
    }
}

#[async_trait]
impl TranslationService for FakeTranslator {
    async fn translate(&self, _text: &str, langpair: &str) -> Result<String, TranslationError> {
        match self.0.run(langpair.to_string()).await {
            Reply::Text(text) => Ok(text),
            Reply::ServiceError(_) => Err(TranslationError::Api(500)),
            Reply::Transport => Err(TranslationError::Transport("connection refused".into())),
            Reply::Empty => Err(TranslationError::MissingText),
        }
    }
}

pub struct FakeOptimizer(Script);

impl FakeOptimizer {
    pub fn replying(reply: Reply) -> Self {
        Self(Script {
            reply: Mutex::new(Some(reply)),
            ..Default::default()
        })
    }

    pub fn held(reply: Reply) -> Self {
        Self(Script {
            reply: Mutex::new(Some(reply)),
            hold: true,
            ..Default::default()
        })
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.0.reply.lock().unwrap() = Some(reply);
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }

    /// Full prompt text of every request, in order
    pub fn prompts(&self) -> Vec<String> {
        self.0.requests.lock().unwrap().clone()
    }

    pub async fn started(&self) {
        self.0.started.notified().await
    }

    pub fn release(&self) {
        self.0.release.notify_one()
    }
}

#[async_trait]
impl OptimizationService for FakeOptimizer {
    async fn generate(
        &self,
        _endpoint: &str,
        _credential: &str,
        prompt: &str,
    ) -> Result<String, OptimizationError> {
        match self.0.run(prompt.to_string()).await {
            Reply::Text(text) => Ok(text.trim().to_string()),
            Reply::ServiceError(message) => Err(OptimizationError::Api {
                status: 400,
                message,
            }),
            Reply::Transport => Err(OptimizationError::Transport("connection refused".into())),
            Reply::Empty => Err(OptimizationError::EmptyResponse),
        }
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryPreferenceStore>,
    pub translator: Arc<FakeTranslator>,
    pub optimizer: Arc<FakeOptimizer>,
}

impl TestApp {
    pub async fn new(translator: FakeTranslator, optimizer: FakeOptimizer) -> Self {
        Self::with_preferences(translator, optimizer, Vec::new()).await
    }

    /// App whose stored credential is already configured
    pub async fn with_credential(translator: FakeTranslator, optimizer: FakeOptimizer) -> Self {
        Self::with_preferences(
            translator,
            optimizer,
            vec![(PreferenceKey::Credential, "test-key".to_string())],
        )
        .await
    }

    pub async fn with_preferences(
        translator: FakeTranslator,
        optimizer: FakeOptimizer,
        preferences: Vec<(PreferenceKey, String)>,
    ) -> Self {
        let store = Arc::new(MemoryPreferenceStore::with_values(preferences));
        let translator = Arc::new(translator);
        let optimizer = Arc::new(optimizer);
        let event_bus = EventBus::new(256);

        let session = Session::load(store.clone(), event_bus.clone())
            .await
            .expect("session loads")
            .into_shared();
        let orchestrator = Arc::new(EnrichmentOrchestrator::new(
            translator.clone(),
            optimizer.clone(),
            event_bus.clone(),
        ));
        let taxonomy = Arc::new(Taxonomy::sample().expect("sample taxonomy is valid"));

        Self {
            state: AppState::new(session, orchestrator, taxonomy, event_bus),
            store,
            translator,
            optimizer,
        }
    }

    pub fn router(&self) -> axum::Router {
        promptcart_studio::build_router(self.state.clone())
    }

    /// Toggle tags by id directly on the session
    pub async fn select(&self, ids: &[&str]) {
        let mut session = self.state.session.lock().await;
        for id in ids {
            let tag = self.state.taxonomy.find_tag(id).expect("tag in sample taxonomy");
            session.toggle_tag(tag);
        }
    }

    pub async fn prompt_text(&self) -> String {
        self.state.session.lock().await.prompt_text().into_owned()
    }
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
