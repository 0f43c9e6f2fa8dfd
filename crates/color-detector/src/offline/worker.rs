//! Offline worker lifecycle and fetch policy.
//!
//! An [`OfflineWorker`] is one generation of the app's offline layer. It
//! precaches the static shell on install, sweeps out older generations on
//! activate, and answers intercepted requests:
//!
//! - live media and foreign origins pass through untouched
//! - navigations go to the network first and fall back to the cache
//! - everything else is served from the cache first

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::cache::CacheStorage;
use super::http::{parse_url, FetchRequest, FetchResponse, Network, RequestMode};
use crate::config::OfflineConfig;
use crate::error::{Error, Result};

const NOTIFICATION_ICON: &str = "/icons.png";
const NOTIFICATION_BADGE: &str = "/badge.png";
const NOTIFICATION_VIBRATE: [u32; 3] = [100, 50, 100];

/// Lifecycle state of a worker generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, not yet installing.
    Parsed,
    /// Precaching.
    Installing,
    /// Precache complete, waiting to activate.
    Installed,
    /// Sweeping old caches.
    Activating,
    /// Controlling clients.
    Activated,
    /// Install failed or superseded.
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Fetched from the network.
    Network,
    /// Matched in the cache.
    Cache,
    /// The cached app shell, served for an uncached navigation.
    ShellFallback,
}

/// Result of intercepting a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not handled; the request goes straight to the network.
    PassThrough,
    /// Answered by the worker.
    Respond(FetchResponse, ResponseSource),
}

/// A message posted to the worker by a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Activate the waiting worker now.
    SkipWaiting,
    /// Any other message type.
    #[serde(other)]
    Unknown,
}

/// A notification shown in response to a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Icon path.
    pub icon: String,
    /// Badge path.
    pub badge: String,
    /// Vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    title: String,
    #[serde(default)]
    body: String,
}

/// A window controlled by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    /// Opaque client id.
    pub id: String,
    /// The window's current URL.
    pub url: Url,
}

/// What a notification click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Focused an existing window.
    Focused(String),
    /// Opened a new window.
    Opened(Url),
}

/// The windows and notification surface the worker talks to.
#[async_trait]
pub trait Clients: Send + Sync {
    /// Take control of all open windows.
    async fn claim(&self);

    /// List open windows.
    async fn windows(&self) -> Vec<WindowClient>;

    /// Focus a window. Returns false if it is gone.
    async fn focus(&self, id: &str) -> bool;

    /// Open a new window.
    async fn open_window(&self, url: &Url);

    /// Display a notification.
    async fn show_notification(&self, notification: &Notification);
}

/// One generation of the offline layer.
pub struct OfflineWorker {
    cache_name: String,
    cache_prefix: String,
    origin: Url,
    precache: Vec<String>,
    passthrough_markers: Vec<String>,
    caches: CacheStorage,
    network: Arc<dyn Network>,
    clients: Arc<dyn Clients>,
    state: WorkerState,
    skip_waiting: bool,
}

impl fmt::Debug for OfflineWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineWorker")
            .field("cache_name", &self.cache_name)
            .field("origin", &self.origin.as_str())
            .field("state", &self.state)
            .field("skip_waiting", &self.skip_waiting)
            .finish_non_exhaustive()
    }
}

impl OfflineWorker {
    /// Create a worker generation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the configured origin doesn't parse.
    pub fn new(
        config: &OfflineConfig,
        caches: CacheStorage,
        network: Arc<dyn Network>,
        clients: Arc<dyn Clients>,
    ) -> Result<Self> {
        Ok(Self {
            cache_name: config.cache_name(),
            cache_prefix: config.cache_prefix.clone(),
            origin: parse_url(&config.origin)?,
            precache: config.precache.clone(),
            passthrough_markers: config.passthrough_markers.clone(),
            caches,
            network,
            clients,
            state: WorkerState::Parsed,
            skip_waiting: false,
        })
    }

    /// Name of this generation's cache.
    #[must_use]
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Check whether this worker asked to activate without waiting.
    #[must_use]
    pub fn is_skip_waiting(&self) -> bool {
        self.skip_waiting
    }

    fn set_state(&mut self, state: WorkerState) {
        if self.state != state {
            debug!(cache = %self.cache_name, from = %self.state, to = %state, "Worker state");
            self.state = state;
        }
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.origin.join(path).map_err(|source| Error::InvalidUrl {
            value: path.to_string(),
            source,
        })
    }

    /// Precache the app shell.
    ///
    /// Every asset must succeed; otherwise nothing is stored and the worker
    /// becomes [`WorkerState::Redundant`].
    ///
    /// # Errors
    ///
    /// Returns the first asset failure.
    pub async fn install(&mut self) -> Result<()> {
        self.set_state(WorkerState::Installing);
        self.skip_waiting = true;

        match self.fetch_precache().await {
            Ok(responses) => {
                self.caches.open(&self.cache_name);
                for (request, response) in responses {
                    self.caches.put(&self.cache_name, &request, response);
                }
                info!(cache = %self.cache_name, assets = self.precache.len(), "Precache complete");
                self.set_state(WorkerState::Installed);
                Ok(())
            }
            Err(e) => {
                warn!(cache = %self.cache_name, error = %e, "Precache failed");
                self.set_state(WorkerState::Redundant);
                Err(e)
            }
        }
    }

    async fn fetch_precache(&self) -> Result<Vec<(FetchRequest, FetchResponse)>> {
        let mut responses = Vec::with_capacity(self.precache.len());
        for path in &self.precache {
            let request = FetchRequest {
                url: self.resolve(path)?,
                mode: RequestMode::SameOrigin,
            };
            let response = self.network.fetch(&request).await?;
            if !response.is_success() {
                return Err(Error::network(format!(
                    "precache of {} returned status {}",
                    request.url, response.status
                )));
            }
            responses.push((request, response));
        }
        Ok(responses)
    }

    /// Delete older generations and take control of open windows.
    ///
    /// Returns the names of the deleted caches. Caches that don't share the
    /// prefix are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] unless the worker is installed.
    pub async fn activate(&mut self) -> Result<Vec<String>> {
        if self.state != WorkerState::Installed {
            return Err(Error::internal(format!(
                "cannot activate worker in state {}",
                self.state
            )));
        }
        self.set_state(WorkerState::Activating);

        let mut deleted = Vec::new();
        for name in self.caches.keys() {
            if name.starts_with(&self.cache_prefix) && name != self.cache_name {
                info!(cache = %name, "Deleting old cache");
                self.caches.delete(&name);
                deleted.push(name);
            }
        }

        self.clients.claim().await;
        self.set_state(WorkerState::Activated);
        Ok(deleted)
    }

    /// Mark this generation as replaced.
    pub fn retire(&mut self) {
        self.set_state(WorkerState::Redundant);
    }

    fn passes_through(&self, request: &FetchRequest) -> bool {
        let url = request.url.as_str();
        self.passthrough_markers.iter().any(|m| url.contains(m.as_str()))
            || request.url.origin() != self.origin.origin()
    }

    /// Answer an intercepted request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheMiss`] for a navigation with no network and
    /// nothing cached, or [`Error::Network`] for an uncached asset with no
    /// network.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        if self.passes_through(request) {
            debug!(url = %request.url, "Passing through");
            return Ok(FetchOutcome::PassThrough);
        }

        if request.is_navigation() {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }

    async fn network_first(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        match self.network.fetch(request).await {
            Ok(response) => {
                self.caches.put(&self.cache_name, request, response.clone());
                Ok(FetchOutcome::Respond(response, ResponseSource::Network))
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "Navigation offline, using cache");
                if let Some(hit) = self.caches.match_any(request) {
                    return Ok(FetchOutcome::Respond(hit.response, ResponseSource::Cache));
                }
                let shell = FetchRequest::get(self.resolve("/")?.as_str())?;
                match self.caches.match_any(&shell) {
                    Some(hit) => Ok(FetchOutcome::Respond(
                        hit.response,
                        ResponseSource::ShellFallback,
                    )),
                    None => Err(Error::cache_miss(request.url.as_str())),
                }
            }
        }
    }

    async fn cache_first(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        if let Some(hit) = self.caches.match_any(request) {
            return Ok(FetchOutcome::Respond(hit.response, ResponseSource::Cache));
        }

        let response = self.network.fetch(request).await?;
        if response.is_cacheable() {
            self.caches.put(&self.cache_name, request, response.clone());
        }
        Ok(FetchOutcome::Respond(response, ResponseSource::Network))
    }

    /// Handle a JSON message posted by a page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the message has no string `type` field.
    pub fn on_message(&mut self, raw: &str) -> Result<WorkerMessage> {
        let message: WorkerMessage = serde_json::from_str(raw)?;
        match message {
            WorkerMessage::SkipWaiting => {
                info!(cache = %self.cache_name, "Skip waiting requested");
                self.skip_waiting = true;
            }
            WorkerMessage::Unknown => debug!(raw, "Ignoring message"),
        }
        Ok(message)
    }

    /// Show a notification for a push payload.
    ///
    /// An absent payload shows nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the payload isn't `{title, body}` JSON.
    pub async fn on_push(&self, payload: Option<&[u8]>) -> Result<Option<Notification>> {
        let Some(data) = payload.filter(|d| !d.is_empty()) else {
            return Ok(None);
        };

        let push: PushPayload = serde_json::from_slice(data)?;
        let notification = Notification {
            title: push.title,
            body: push.body,
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            vibrate: NOTIFICATION_VIBRATE.to_vec(),
        };
        self.clients.show_notification(&notification).await;
        Ok(Some(notification))
    }

    /// Bring the app to the front after a notification click.
    ///
    /// Focuses a window already showing the root page, else opens one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the root can't be resolved.
    pub async fn on_notification_click(&self) -> Result<ClickAction> {
        let root = self.resolve("/")?;
        for window in self.clients.windows().await {
            if window.url == root && self.clients.focus(&window.id).await {
                return Ok(ClickAction::Focused(window.id));
            }
        }

        self.clients.open_window(&root).await;
        Ok(ClickAction::Opened(root))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub(crate) const ORIGIN: &str = "http://localhost:3000";

    /// Serves a fixed set of paths; everything else is 404.
    #[derive(Default)]
    pub(crate) struct FakeNetwork {
        pub(crate) offline: AtomicBool,
        pub(crate) calls: AtomicU32,
        routes: Mutex<HashMap<String, FetchResponse>>,
    }

    impl FakeNetwork {
        pub(crate) fn with_shell() -> Self {
            let network = Self::default();
            for path in OfflineConfig::default().precache {
                network.route(&path, FetchResponse::ok("text/plain", path.clone()));
            }
            network
        }

        pub(crate) fn route(&self, path: &str, response: FetchResponse) {
            self.routes
                .lock()
                .unwrap()
                .insert(format!("{ORIGIN}{path}"), response);
        }

        pub(crate) fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Network for FakeNetwork {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(Error::network("offline"));
            }
            Ok(self
                .routes
                .lock()
                .unwrap()
                .get(&request.cache_key())
                .cloned()
                .unwrap_or_else(|| FetchResponse::status(404)))
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeClients {
        pub(crate) claims: AtomicU32,
        pub(crate) windows: Mutex<Vec<WindowClient>>,
        pub(crate) focused: Mutex<Vec<String>>,
        pub(crate) opened: Mutex<Vec<Url>>,
        pub(crate) shown: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Clients for FakeClients {
        async fn claim(&self) {
            self.claims.fetch_add(1, Ordering::SeqCst);
        }

        async fn windows(&self) -> Vec<WindowClient> {
            self.windows.lock().unwrap().clone()
        }

        async fn focus(&self, id: &str) -> bool {
            self.focused.lock().unwrap().push(id.to_string());
            true
        }

        async fn open_window(&self, url: &Url) {
            self.opened.lock().unwrap().push(url.clone());
        }

        async fn show_notification(&self, notification: &Notification) {
            self.shown.lock().unwrap().push(notification.clone());
        }
    }

    fn worker_with(
        config: &OfflineConfig,
        caches: &CacheStorage,
        network: &Arc<FakeNetwork>,
        clients: &Arc<FakeClients>,
    ) -> OfflineWorker {
        OfflineWorker::new(
            config,
            caches.clone(),
            Arc::clone(network) as Arc<dyn Network>,
            Arc::clone(clients) as Arc<dyn Clients>,
        )
        .unwrap()
    }

    fn setup() -> (OfflineWorker, CacheStorage, Arc<FakeNetwork>, Arc<FakeClients>) {
        let caches = CacheStorage::new();
        let network = Arc::new(FakeNetwork::with_shell());
        let clients = Arc::new(FakeClients::default());
        let worker = worker_with(&OfflineConfig::default(), &caches, &network, &clients);
        (worker, caches, network, clients)
    }

    fn get(path: &str) -> FetchRequest {
        FetchRequest::get(&format!("{ORIGIN}{path}")).unwrap()
    }

    fn navigate(path: &str) -> FetchRequest {
        FetchRequest::navigate(&format!("{ORIGIN}{path}")).unwrap()
    }

    fn body(outcome: &FetchOutcome) -> &[u8] {
        match outcome {
            FetchOutcome::Respond(response, _) => &response.body,
            FetchOutcome::PassThrough => panic!("expected a response"),
        }
    }

    fn source(outcome: &FetchOutcome) -> ResponseSource {
        match outcome {
            FetchOutcome::Respond(_, source) => *source,
            FetchOutcome::PassThrough => panic!("expected a response"),
        }
    }

    #[tokio::test]
    async fn test_install_precaches_shell() {
        let (mut worker, caches, _, _) = setup();
        assert_eq!(worker.state(), WorkerState::Parsed);

        worker.install().await.unwrap();

        assert_eq!(worker.state(), WorkerState::Installed);
        assert!(worker.is_skip_waiting());
        assert_eq!(caches.entry_count("color-detector-cache-v1.2.1"), 8);
        assert!(caches.get(worker.cache_name(), &get("/splash.png")).is_some());
    }

    #[tokio::test]
    async fn test_install_fails_on_missing_asset() {
        let caches = CacheStorage::new();
        let network = Arc::new(FakeNetwork::with_shell());
        let clients = Arc::new(FakeClients::default());
        let mut config = OfflineConfig::default();
        config.precache.push("/missing.png".to_string());
        let mut worker = worker_with(&config, &caches, &network, &clients);

        let err = worker.install().await.unwrap_err();

        assert!(err.to_string().contains("404"));
        assert_eq!(worker.state(), WorkerState::Redundant);
        assert_eq!(caches.entry_count(worker.cache_name()), 0);
    }

    #[tokio::test]
    async fn test_install_fails_offline() {
        let (mut worker, _, network, _) = setup();
        network.set_offline(true);

        assert!(worker.install().await.is_err());
        assert_eq!(worker.state(), WorkerState::Redundant);
    }

    #[tokio::test]
    async fn test_activate_sweeps_old_generations() {
        let (mut worker, caches, _, clients) = setup();
        caches.open("color-detector-cache-v1.0.0");
        caches.open("color-detector-cache-v1.2.0");
        caches.open("unrelated-cache");

        worker.install().await.unwrap();
        let deleted = worker.activate().await.unwrap();

        assert_eq!(
            deleted,
            vec![
                "color-detector-cache-v1.0.0".to_string(),
                "color-detector-cache-v1.2.0".to_string()
            ]
        );
        assert!(caches.has("unrelated-cache"));
        assert!(caches.has("color-detector-cache-v1.2.1"));
        assert_eq!(worker.state(), WorkerState::Activated);
        assert_eq!(clients.claims.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_activate_requires_install() {
        let (mut worker, _, _, clients) = setup();
        assert!(worker.activate().await.is_err());
        assert_eq!(clients.claims.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_passthrough_for_media_and_foreign_origin() {
        let (worker, _, network, _) = setup();

        let media = get("/stream?getUserMedia=1");
        assert_eq!(worker.fetch(&media).await.unwrap(), FetchOutcome::PassThrough);

        let foreign = FetchRequest::get("https://cdn.example.com/font.woff2").unwrap();
        assert_eq!(worker.fetch(&foreign).await.unwrap(), FetchOutcome::PassThrough);

        assert_eq!(network.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_precached_asset_served_offline() {
        let (mut worker, _, network, _) = setup();
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        network.set_offline(true);

        let outcome = worker.fetch(&get("/icons.png")).await.unwrap();
        assert_eq!(body(&outcome), b"/icons.png");
        assert_eq!(source(&outcome), ResponseSource::Cache);
    }

    #[tokio::test]
    async fn test_cache_first_skips_network_on_hit() {
        let (mut worker, _, network, _) = setup();
        worker.install().await.unwrap();
        let before = network.calls.load(Ordering::SeqCst);

        worker.fetch(&get("/manifest.json")).await.unwrap();

        assert_eq!(network.calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_cache_first_stores_only_ok_basic() {
        let (worker, caches, network, _) = setup();
        network.route("/late.js", FetchResponse::ok("text/javascript", "late"));

        let outcome = worker.fetch(&get("/late.js")).await.unwrap();
        assert_eq!(source(&outcome), ResponseSource::Network);
        assert!(caches.get(worker.cache_name(), &get("/late.js")).is_some());

        let outcome = worker.fetch(&get("/nope.js")).await.unwrap();
        assert_eq!(source(&outcome), ResponseSource::Network);
        assert!(caches.get(worker.cache_name(), &get("/nope.js")).is_none());
    }

    #[tokio::test]
    async fn test_uncached_asset_offline_is_network_error() {
        let (worker, _, network, _) = setup();
        network.set_offline(true);

        let err = worker.fetch(&get("/late.js")).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_navigation_network_first_updates_cache() {
        let (mut worker, caches, network, _) = setup();
        worker.install().await.unwrap();
        network.route("/", FetchResponse::ok("text/html", "fresh"));

        let outcome = worker.fetch(&navigate("/")).await.unwrap();

        assert_eq!(source(&outcome), ResponseSource::Network);
        let cached = caches.get(worker.cache_name(), &get("/")).unwrap();
        assert_eq!(cached.response.body, b"fresh");
    }

    #[tokio::test]
    async fn test_navigation_offline_falls_back() {
        let (mut worker, _, network, _) = setup();
        worker.install().await.unwrap();
        network.set_offline(true);

        let outcome = worker.fetch(&navigate("/index.html")).await.unwrap();
        assert_eq!(source(&outcome), ResponseSource::Cache);
        assert_eq!(body(&outcome), b"/index.html");

        let outcome = worker.fetch(&navigate("/about")).await.unwrap();
        assert_eq!(source(&outcome), ResponseSource::ShellFallback);
        assert_eq!(body(&outcome), b"/");
    }

    #[tokio::test]
    async fn test_navigation_offline_without_cache() {
        let (worker, _, network, _) = setup();
        network.set_offline(true);

        let err = worker.fetch(&navigate("/about")).await.unwrap_err();
        assert!(err.is_cache_miss());
    }

    #[tokio::test]
    async fn test_on_message() {
        let (mut worker, _, _, _) = setup();

        assert_eq!(
            worker.on_message(r#"{"type":"PING"}"#).unwrap(),
            WorkerMessage::Unknown
        );
        assert!(!worker.is_skip_waiting());

        assert_eq!(
            worker.on_message(r#"{"type":"SKIP_WAITING"}"#).unwrap(),
            WorkerMessage::SkipWaiting
        );
        assert!(worker.is_skip_waiting());

        assert!(worker.on_message("not json").is_err());
    }

    #[test]
    fn test_message_serializes_with_type_tag() {
        let json = serde_json::to_string(&WorkerMessage::SkipWaiting).unwrap();
        assert_eq!(json, r#"{"type":"SKIP_WAITING"}"#);
    }

    #[tokio::test]
    async fn test_on_push() {
        let (worker, _, _, clients) = setup();

        assert_eq!(worker.on_push(None).await.unwrap(), None);
        assert_eq!(worker.on_push(Some(b"")).await.unwrap(), None);

        let notification = worker
            .on_push(Some(br#"{"title":"New palette","body":"Check it out"}"#))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(notification.title, "New palette");
        assert_eq!(notification.body, "Check it out");
        assert_eq!(notification.icon, "/icons.png");
        assert_eq!(notification.badge, "/badge.png");
        assert_eq!(notification.vibrate, vec![100, 50, 100]);
        assert_eq!(clients.shown.lock().unwrap().len(), 1);

        assert!(worker.on_push(Some(b"{oops")).await.is_err());
    }

    #[tokio::test]
    async fn test_notification_click_focuses_root_window() {
        let (worker, _, _, clients) = setup();
        clients.windows.lock().unwrap().extend([
            WindowClient {
                id: "a".to_string(),
                url: Url::parse("http://localhost:3000/about").unwrap(),
            },
            WindowClient {
                id: "b".to_string(),
                url: Url::parse("http://localhost:3000/").unwrap(),
            },
        ]);

        let action = worker.on_notification_click().await.unwrap();

        assert_eq!(action, ClickAction::Focused("b".to_string()));
        assert!(clients.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_click_opens_window() {
        let (worker, _, _, clients) = setup();

        let action = worker.on_notification_click().await.unwrap();

        let root = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(action, ClickAction::Opened(root.clone()));
        assert_eq!(*clients.opened.lock().unwrap(), vec![root]);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(WorkerState::Installed.to_string(), "installed");
        assert_eq!(WorkerState::Redundant.to_string(), "redundant");
    }
}
