//! The render capability boundary
//!
//! The core never launches or configures a browser. It consumes a
//! `render(url) → Document` capability through the [`Renderer`] and
//! [`RenderSession`] traits: a session is opened once per source fetch and
//! closed unconditionally at the end, on success and failure paths alike.
//!
//! Two implementations ship in-crate: [`HttpRenderer`], a plain HTTP client
//! for sources that serve usable HTML without script execution, and
//! [`StaticRenderer`], a fixture-backed renderer for deterministic tests.
//! A headless-browser engine plugs in through the same traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::RenderError;

/// Desktop user agent presented to sources
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default per-page render timeout
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a rendering engine should wait before considering a page loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Wait until network activity quiets down
    NetworkIdle,
    /// Wait for the DOM only; combine with a settle delay for pages that
    /// hydrate their listings client-side
    DomContentLoaded,
}

/// Render options, fixed per deployment rather than per request
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub user_agent: String,
    /// Viewport as (width, height)
    pub viewport: (u32, u32),
    pub wait: WaitStrategy,
    /// Selector whose appearance signals the listings are present; engines
    /// that cannot honor it ignore it
    pub wait_for_selector: Option<String>,
    /// Extra delay after load for client-side hydration
    pub settle: Option<Duration>,
    pub timeout: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            viewport: (1920, 1080),
            wait: WaitStrategy::NetworkIdle,
            wait_for_selector: None,
            settle: None,
            timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }
}

/// Factory for render sessions
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a session for one source fetch
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// One scoped rendering session
///
/// Callers must call [`close`](RenderSession::close) on every exit path;
/// the fetch orchestrator does so unconditionally after its page loop.
#[async_trait]
pub trait RenderSession: Send {
    /// Turn a URL into a parsed document
    async fn render(&mut self, url: &str, options: &RenderOptions)
        -> Result<Document, RenderError>;

    /// Release the session's resources
    async fn close(&mut self);
}

/// Render sessions backed by plain HTTP requests
///
/// Serves sources whose listing markup arrives server-rendered. Viewport,
/// wait strategy and settle delay have no meaning here and are ignored; the
/// user agent and timeout are honored.
#[derive(Clone, Default)]
pub struct HttpRenderer {
    client: reqwest::Client,
}

impl HttpRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
        }))
    }
}

struct HttpSession {
    client: reqwest::Client,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn render(
        &mut self,
        url: &str,
        options: &RenderOptions,
    ) -> Result<Document, RenderError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, options.user_agent.as_str())
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout {
                        url: url.to_string(),
                        seconds: options.timeout.as_secs(),
                    }
                } else {
                    RenderError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("HTTP status {status}"),
            });
        }

        let body = response.text().await.map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Document::parse(&body))
    }

    async fn close(&mut self) {}
}

/// Fixture-backed renderer for deterministic tests
///
/// Serves canned documents by exact URL, injects failures for URLs
/// containing a configured fragment, and keeps accounting of rendered URLs
/// and opened/closed sessions so tests can assert the session lifecycle,
/// including release on failure paths.
#[derive(Default)]
pub struct StaticRenderer {
    pages: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<Vec<String>>>,
    rendered: Arc<Mutex<Vec<String>>>,
    sessions_opened: Arc<AtomicUsize>,
    sessions_closed: Arc<AtomicUsize>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned document for an exact URL
    pub fn add_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.into(), html.into());
    }

    /// Builder-style [`add_page`](Self::add_page)
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.add_page(url, html);
        self
    }

    /// Make every URL containing `fragment` fail with a navigation error
    pub fn fail_matching(&self, fragment: impl Into<String>) {
        self.failing.lock().unwrap().push(fragment.into());
    }

    /// Builder-style [`fail_matching`](Self::fail_matching)
    pub fn with_failure(self, fragment: impl Into<String>) -> Self {
        self.fail_matching(fragment);
        self
    }

    /// URLs requested so far, in request order
    pub fn rendered_urls(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.sessions_closed.load(Ordering::SeqCst)
    }
}

impl Clone for StaticRenderer {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            failing: Arc::clone(&self.failing),
            rendered: Arc::clone(&self.rendered),
            sessions_opened: Arc::clone(&self.sessions_opened),
            sessions_closed: Arc::clone(&self.sessions_closed),
        }
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticSession {
            renderer: self.clone(),
        }))
    }
}

struct StaticSession {
    renderer: StaticRenderer,
}

#[async_trait]
impl RenderSession for StaticSession {
    async fn render(
        &mut self,
        url: &str,
        _options: &RenderOptions,
    ) -> Result<Document, RenderError> {
        self.renderer.rendered.lock().unwrap().push(url.to_string());

        let failing = self.renderer.failing.lock().unwrap();
        if failing.iter().any(|fragment| url.contains(fragment)) {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: "injected failure".to_string(),
            });
        }
        drop(failing);

        match self.renderer.pages.lock().unwrap().get(url) {
            Some(html) => Ok(Document::parse(html)),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                message: "no fixture registered for URL".to_string(),
            }),
        }
    }

    async fn close(&mut self) {
        self.renderer.sessions_closed.fetch_add(1, Ordering::SeqCst);
    }
}
