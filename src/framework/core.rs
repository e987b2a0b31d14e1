//! # Keyed Fetch Cache
//!
//! This module defines the building blocks of the read path.
//!
//! ## Key Types
//!
//! - [`Resource`]: The trait every fetchable resource shape implements.
//! - [`ResourceKey`]: The path that identifies one cached request.
//! - [`FetchActor`]: The actor that owns the cache and de-duplicates requests.
//! - [`FetchClient`]: The cloneable handle used to subscribe and post.
//! - [`Subscription`]: A typed, reference-counted view over one cache entry.
//! - [`FetchState`]: The `{is_loading, error, data}` projection callers render from.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::error::FetchError;
use super::transport::Transport;

/// Identifier meaning "no resource assigned". Treated exactly like a missing id.
pub const NIL_ID: &str = "00000000-0000-0000-0000-000000000000";

// =============================================================================
// 1. KEYS, POLICIES AND THE RESOURCE CONTRACT
// =============================================================================

/// Path that uniquely identifies a fetchable resource, e.g. `/api/events/e1`.
///
/// The cache is keyed by the exact string, so two keys that differ in any
/// character never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Key for a collection endpoint that takes no identifier.
    pub fn collection(path: &str) -> Self {
        Self(path.to_string())
    }

    /// Key for a single member of `base`.
    ///
    /// Returns `None` for a missing, blank or [`NIL_ID`] identifier so callers
    /// short-circuit without issuing a request.
    pub fn member(base: &str, id: Option<&str>) -> Option<Self> {
        let id = id?.trim();
        if id.is_empty() || id == NIL_ID {
            return None;
        }
        Some(Self(format!("{base}/{id}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-resource revalidation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Re-request the resource when the application regains focus.
    pub revalidate_on_focus: bool,
}

impl FetchPolicy {
    /// Policy for resources whose identity never changes once fetched.
    pub const STABLE: Self = Self {
        revalidate_on_focus: false,
    };
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            revalidate_on_focus: true,
        }
    }
}

/// Trait that any fetchable resource shape must implement.
///
/// # Architecture Note
/// The cache itself stores raw JSON so that one entry can be shared by every
/// observer of a key. `Resource` is the typed lens each observer reads it
/// through: it names where the resource lives, how it revalidates, and what
/// counts as "usable" data (an empty list or an image without a path is a
/// successful request with nothing to show).
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path prefix the resource is served under, e.g. `/api/events`.
    const BASE_PATH: &'static str;

    fn policy() -> FetchPolicy {
        FetchPolicy::default()
    }

    /// Whether decoded data carries something worth rendering.
    fn is_usable(&self) -> bool {
        true
    }

    fn key(id: Option<&str>) -> Option<ResourceKey> {
        ResourceKey::member(Self::BASE_PATH, id)
    }
}

// =============================================================================
// 2. FETCH STATE
// =============================================================================

/// Loading/error/data projection for one resource key.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// No data has arrived yet and a request is in flight.
    pub is_loading: bool,
    /// A request (initial or revalidation) is in flight.
    pub is_validating: bool,
    pub error: Option<FetchError>,
    pub data: Option<T>,
}

impl<T> FetchState<T> {
    /// The all-false-empty state of a key that is not being fetched.
    pub fn idle() -> Self {
        Self {
            is_loading: false,
            is_validating: false,
            error: None,
            data: None,
        }
    }

    fn loading() -> Self {
        Self {
            is_loading: true,
            is_validating: true,
            ..Self::idle()
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading && !self.is_validating
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

/// Untyped state stored in the cache and broadcast to observers.
pub type RawState = FetchState<Arc<Value>>;

/// Snapshot of the cache, mostly useful for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub in_flight: usize,
    pub subscribers: usize,
}

// =============================================================================
// 3. MESSAGES
// =============================================================================

/// Messages sent from [`FetchClient`] and [`Subscription`] to the [`FetchActor`].
#[derive(Debug)]
pub enum FetchRequest {
    /// Join (or create) the entry for `key` and receive its state channel.
    Subscribe {
        key: ResourceKey,
        policy: FetchPolicy,
        respond_to: oneshot::Sender<watch::Receiver<RawState>>,
    },
    /// Drop one reference to `key`; the entry is destroyed at zero.
    Release { key: ResourceKey },
    /// The application regained focus.
    Focus,
    Stats {
        respond_to: oneshot::Sender<CacheStats>,
    },
}

/// Result of one network request, tagged with the generation it was issued for.
struct Completion {
    key: ResourceKey,
    generation: u64,
    result: Result<Value, FetchError>,
}

struct CacheEntry {
    refs: usize,
    generation: u64,
    in_flight: bool,
    policy: FetchPolicy,
    state: watch::Sender<RawState>,
}

// =============================================================================
// 4. THE ACTOR
// =============================================================================

/// The actor that owns the keyed cache.
///
/// # Architecture Note
/// All cache bookkeeping happens inside one task, processing messages
/// sequentially, so the map needs no lock. Network requests run in their own
/// tasks and report back through a completion channel.
///
/// **De-duplication**: a key has at most one entry, and an entry has at most
/// one request in flight. A second subscriber to a live key joins the existing
/// entry and receives the same state channel.
///
/// **Stale results**: every request carries the generation of the entry it
/// was issued for. A completion whose key was released, or whose entry has
/// since been recreated or revalidated, is discarded.
pub struct FetchActor {
    receiver: mpsc::Receiver<FetchRequest>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    entries: HashMap<ResourceKey, CacheEntry>,
    transport: Arc<dyn Transport>,
    next_generation: u64,
}

impl FetchActor {
    pub fn new(buffer_size: usize, transport: Arc<dyn Transport>) -> (Self, FetchClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            completions_tx,
            completions,
            entries: HashMap::new(),
            transport: Arc::clone(&transport),
            next_generation: 0,
        };
        let client = FetchClient::new(sender, transport);
        (actor, client)
    }

    /// Runs the actor's event loop until every client and subscription is dropped.
    pub async fn run(mut self) {
        info!("Fetch actor started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                Some(done) = self.completions.recv() => self.complete(done),
            }
        }

        info!(size = self.entries.len(), "Shutdown");
    }

    fn handle(&mut self, msg: FetchRequest) {
        match msg {
            FetchRequest::Subscribe {
                key,
                policy,
                respond_to,
            } => {
                let next_generation = &mut self.next_generation;
                let (receiver, created) = match self.entries.entry(key.clone()) {
                    Entry::Occupied(occupied) => {
                        let entry = occupied.into_mut();
                        entry.refs += 1;
                        debug!(%key, refs = entry.refs, "Joined");
                        (entry.state.subscribe(), false)
                    }
                    Entry::Vacant(vacant) => {
                        *next_generation += 1;
                        let generation = *next_generation;
                        let (state, receiver) = watch::channel(RawState::loading());
                        vacant.insert(CacheEntry {
                            refs: 1,
                            generation,
                            in_flight: false,
                            policy,
                            state,
                        });
                        (receiver, true)
                    }
                };
                if created {
                    info!(%key, size = self.entries.len(), "Created");
                    self.dispatch(&key);
                }
                let _ = respond_to.send(receiver);
            }
            FetchRequest::Release { key } => {
                let Some(entry) = self.entries.get_mut(&key) else {
                    warn!(%key, "Release for unknown key");
                    return;
                };
                entry.refs = entry.refs.saturating_sub(1);
                debug!(%key, refs = entry.refs, "Release");
                if entry.refs == 0 {
                    self.entries.remove(&key);
                    info!(%key, size = self.entries.len(), "Destroyed");
                }
            }
            FetchRequest::Focus => {
                let stale: Vec<ResourceKey> = self
                    .entries
                    .iter()
                    .filter(|(_, entry)| entry.policy.revalidate_on_focus && !entry.in_flight)
                    .map(|(key, _)| key.clone())
                    .collect();
                debug!(count = stale.len(), "Focus revalidation");
                for key in stale {
                    let generation = self.bump_generation();
                    if let Some(entry) = self.entries.get_mut(&key) {
                        entry.generation = generation;
                        entry.state.send_modify(|state| {
                            state.is_validating = true;
                            state.is_loading = state.data.is_none();
                        });
                    }
                    self.dispatch(&key);
                }
            }
            FetchRequest::Stats { respond_to } => {
                let stats = CacheStats {
                    entries: self.entries.len(),
                    in_flight: self.entries.values().filter(|e| e.in_flight).count(),
                    subscribers: self.entries.values().map(|e| e.refs).sum(),
                };
                let _ = respond_to.send(stats);
            }
        }
    }

    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Issues the network request for `key` on a separate task.
    fn dispatch(&mut self, key: &ResourceKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.in_flight = true;

        let generation = entry.generation;
        let transport = Arc::clone(&self.transport);
        let completions = self.completions_tx.clone();
        let key = key.clone();
        debug!(%key, generation, "Dispatch");

        tokio::spawn(async move {
            let result = transport.get(key.as_str()).await;
            let _ = completions.send(Completion {
                key,
                generation,
                result,
            });
        });
    }

    fn complete(&mut self, done: Completion) {
        let Completion {
            key,
            generation,
            result,
        } = done;

        let Some(entry) = self.entries.get_mut(&key) else {
            debug!(%key, generation, "Discarded completion for released key");
            return;
        };
        if entry.generation != generation {
            debug!(%key, generation, current = entry.generation, "Discarded stale completion");
            return;
        }
        entry.in_flight = false;

        match result {
            Ok(value) => {
                info!(%key, "Fetched");
                entry.state.send_replace(FetchState {
                    is_loading: false,
                    is_validating: false,
                    error: None,
                    data: Some(Arc::new(value)),
                });
            }
            Err(error) => {
                warn!(%key, error = %error, "Fetch failed");
                // A failed revalidation keeps the data observers already have.
                entry.state.send_modify(|state| {
                    state.is_loading = false;
                    state.is_validating = false;
                    state.error = Some(error);
                });
            }
        }
    }
}

// =============================================================================
// 5. THE CLIENT
// =============================================================================

/// Cloneable handle to a running [`FetchActor`], plus the write path.
#[derive(Clone)]
pub struct FetchClient {
    sender: mpsc::Sender<FetchRequest>,
    transport: Arc<dyn Transport>,
}

impl FetchClient {
    pub fn new(sender: mpsc::Sender<FetchRequest>, transport: Arc<dyn Transport>) -> Self {
        Self { sender, transport }
    }

    /// Subscribes to `key`, de-duplicated against every other live subscriber.
    ///
    /// A `None` key yields an idle subscription without contacting the actor.
    /// If the actor is gone the subscription carries the error instead of
    /// failing, so callers always get something to render.
    pub async fn watch<T: Resource>(&self, key: Option<ResourceKey>) -> Subscription<T> {
        let Some(key) = key else {
            return Subscription::idle();
        };

        let (respond_to, response) = oneshot::channel();
        let request = FetchRequest::Subscribe {
            key: key.clone(),
            policy: T::policy(),
            respond_to,
        };
        if self.sender.send(request).await.is_err() {
            return Subscription::detached(key, FetchError::ActorClosed);
        }
        match response.await {
            Ok(receiver) => Subscription {
                source: Source::Live(Lease {
                    key,
                    receiver,
                    sender: self.sender.clone(),
                }),
                _resource: PhantomData,
            },
            Err(_) => Subscription::detached(key, FetchError::ActorDropped),
        }
    }

    /// Revalidates every live entry whose policy allows it.
    pub async fn focus(&self) -> Result<(), FetchError> {
        self.sender
            .send(FetchRequest::Focus)
            .await
            .map_err(|_| FetchError::ActorClosed)
    }

    pub async fn stats(&self) -> Result<CacheStats, FetchError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(FetchRequest::Stats { respond_to })
            .await
            .map_err(|_| FetchError::ActorClosed)?;
        response.await.map_err(|_| FetchError::ActorDropped)
    }

    /// Write path: POST `body` to `path` and decode the reply.
    ///
    /// Writes are never cached or de-duplicated.
    pub async fn send<B, R>(&self, path: &str, body: &B) -> Result<R, FetchError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        let reply = self.transport.post(path, body).await?;
        serde_json::from_value(reply).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

// =============================================================================
// 6. SUBSCRIPTIONS
// =============================================================================

/// One reference to a live cache entry. Dropping it releases the reference.
struct Lease {
    key: ResourceKey,
    receiver: watch::Receiver<RawState>,
    sender: mpsc::Sender<FetchRequest>,
}

impl Drop for Lease {
    fn drop(&mut self) {
        let release = FetchRequest::Release {
            key: self.key.clone(),
        };
        if let Err(mpsc::error::TrySendError::Full(release)) = self.sender.try_send(release) {
            let sender = self.sender.clone();
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = sender.send(release).await;
                });
            }
        }
    }
}

enum Source {
    Idle,
    Detached(ResourceKey, FetchError),
    Live(Lease),
}

/// Typed view over one cache entry, owned by the component that declared the key.
///
/// Changing the key means dropping this subscription and creating a new one;
/// the old entry's late results can never reach the new subscription.
pub struct Subscription<T: Resource> {
    source: Source,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> Subscription<T> {
    /// A subscription for an absent key: never loads, never errors, no data.
    pub fn idle() -> Self {
        Self {
            source: Source::Idle,
            _resource: PhantomData,
        }
    }

    fn detached(key: ResourceKey, error: FetchError) -> Self {
        Self {
            source: Source::Detached(key, error),
            _resource: PhantomData,
        }
    }

    pub fn key(&self) -> Option<&ResourceKey> {
        match &self.source {
            Source::Idle => None,
            Source::Detached(key, _) => Some(key),
            Source::Live(lease) => Some(&lease.key),
        }
    }

    /// Whether a request was (or will be) attempted for this subscription.
    pub fn should_fetch(&self) -> bool {
        !matches!(self.source, Source::Idle)
    }

    /// Current state, decoded through `T`.
    pub fn state(&self) -> FetchState<T> {
        match &self.source {
            Source::Idle => FetchState::idle(),
            Source::Detached(_, error) => FetchState {
                error: Some(error.clone()),
                ..FetchState::idle()
            },
            Source::Live(lease) => project(&lease.receiver.borrow()),
        }
    }

    /// Waits for the next state change. Returns `false` if none can ever come.
    pub async fn changed(&mut self) -> bool {
        match &mut self.source {
            Source::Live(lease) => lease.receiver.changed().await.is_ok(),
            _ => false,
        }
    }

    /// Waits until no request is in flight and returns the resulting state.
    pub async fn settled(&mut self) -> FetchState<T> {
        if let Source::Live(lease) = &mut self.source {
            let _ = lease.receiver.wait_for(|state| state.is_settled()).await;
        }
        self.state()
    }
}

impl<T: Resource> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key())
            .field("should_fetch", &self.should_fetch())
            .finish()
    }
}

/// Decodes the shared raw state into `T`.
///
/// A body that does not decode is a transport failure; a body that decodes
/// but is not usable is an empty result.
fn project<T: Resource>(raw: &RawState) -> FetchState<T> {
    let mut state = FetchState {
        is_loading: raw.is_loading,
        is_validating: raw.is_validating,
        error: raw.error.clone(),
        data: None,
    };

    if let Some(value) = &raw.data {
        match <T as serde::Deserialize>::deserialize(&**value) {
            Ok(item) => state.data = Some(item).filter(T::is_usable),
            Err(e) => {
                if state.error.is_none() {
                    state.error = Some(FetchError::Decode(e.to_string()));
                }
            }
        }
    }

    state
}

// =============================================================================
// 7. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::render::{select, Branch};
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    struct Thing {
        id: String,
        #[serde(default)]
        name: String,
    }

    impl Resource for Thing {
        const BASE_PATH: &'static str = "/api/things";

        fn is_usable(&self) -> bool {
            !self.name.is_empty()
        }
    }

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    struct Fixed {
        id: String,
    }

    impl Resource for Fixed {
        const BASE_PATH: &'static str = "/api/fixed";

        fn policy() -> FetchPolicy {
            FetchPolicy::STABLE
        }
    }

    fn start(transport: Arc<MockTransport>) -> FetchClient {
        let (actor, client) = FetchActor::new(16, transport);
        tokio::spawn(actor.run());
        client
    }

    #[test]
    fn test_member_key_rejects_guard_and_blank_ids() {
        assert_eq!(ResourceKey::member("/api/things", None), None);
        assert_eq!(ResourceKey::member("/api/things", Some("")), None);
        assert_eq!(ResourceKey::member("/api/things", Some("  ")), None);
        assert_eq!(ResourceKey::member("/api/things", Some(NIL_ID)), None);
        assert_eq!(
            ResourceKey::member("/api/things", Some("t1")).map(|k| k.to_string()),
            Some("/api/things/t1".to_string())
        );
    }

    #[tokio::test]
    async fn test_none_key_never_contacts_transport() {
        let transport = Arc::new(MockTransport::new());
        let client = start(transport.clone());

        let mut sub = client.watch::<Thing>(Thing::key(Some(NIL_ID))).await;
        assert!(!sub.should_fetch());
        assert_eq!(sub.settled().await, FetchState::idle());
        assert!(transport.calls().is_empty());
        assert_eq!(client.stats().await.unwrap().entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_subscribers_share_one_request() {
        let transport = Arc::new(MockTransport::new().with_latency(Duration::from_millis(50)));
        transport
            .expect_get("/api/things/t1")
            .return_ok(json!({ "id": "t1", "name": "First" }));
        let client = start(transport.clone());

        let (mut a, mut b) = tokio::join!(
            client.watch::<Thing>(Thing::key(Some("t1"))),
            client.watch::<Thing>(Thing::key(Some("t1"))),
        );
        assert!(a.state().is_loading);

        let (state_a, state_b) = tokio::join!(a.settled(), b.settled());
        assert_eq!(state_a, state_b);
        assert_eq!(state_a.data.map(|t| t.name), Some("First".to_string()));
        assert_eq!(transport.call_count("/api/things/t1"), 1);

        let stats = client.stats().await.unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.subscribers, 2);
        transport.verify();
    }

    #[tokio::test]
    async fn test_transport_error_becomes_state_error() {
        let transport = Arc::new(MockTransport::new());
        transport
            .expect_get("/api/things/t1")
            .return_err(FetchError::Status(500));
        let client = start(transport);

        let mut sub = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        let state = sub.settled().await;
        assert!(!state.is_loading);
        assert_eq!(state.error, Some(FetchError::Status(500)));
        assert_eq!(state.data, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error_and_unusable_body_is_empty() {
        let transport = Arc::new(MockTransport::new());
        transport.expect_get("/api/things/bad").return_ok(json!({ "name": 3 }));
        transport.expect_get("/api/things/blank").return_ok(json!({ "id": "blank" }));
        let client = start(transport);

        let mut bad = client.watch::<Thing>(Thing::key(Some("bad"))).await;
        assert!(matches!(bad.settled().await.error, Some(FetchError::Decode(_))));

        let mut blank = client.watch::<Thing>(Thing::key(Some("blank"))).await;
        let state = blank.settled().await;
        assert_eq!(state.error, None);
        assert_eq!(state.data, None);
    }

    #[tokio::test]
    async fn test_last_release_destroys_entry_and_next_watch_refetches() {
        let transport = Arc::new(MockTransport::new());
        transport.expect_get("/api/things/t1").return_ok(json!({ "id": "t1", "name": "A" }));
        transport.expect_get("/api/things/t1").return_ok(json!({ "id": "t1", "name": "B" }));
        let client = start(transport.clone());

        let mut first = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        assert_eq!(first.settled().await.data.unwrap().name, "A");
        drop(first);

        let mut second = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        assert_eq!(second.settled().await.data.unwrap().name, "B");
        assert_eq!(transport.call_count("/api/things/t1"), 2);
        transport.verify();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_for_released_key_is_discarded() {
        let transport = Arc::new(MockTransport::new().with_latency(Duration::from_millis(100)));
        transport.expect_get("/api/things/old").return_ok(json!({ "id": "old", "name": "Old" }));
        transport.expect_get("/api/things/new").return_ok(json!({ "id": "new", "name": "New" }));
        let client = start(transport);

        let old = client.watch::<Thing>(Thing::key(Some("old"))).await;
        drop(old);
        let mut new = client.watch::<Thing>(Thing::key(Some("new"))).await;

        let state = new.settled().await;
        assert_eq!(state.data.unwrap().name, "New");
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(client.stats().await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn test_focus_revalidates_only_policies_that_allow_it() {
        let transport = Arc::new(MockTransport::new());
        transport.expect_get("/api/things/t1").return_ok(json!({ "id": "t1", "name": "A" }));
        transport.expect_get("/api/things/t1").return_ok(json!({ "id": "t1", "name": "B" }));
        transport.expect_get("/api/fixed/f1").return_ok(json!({ "id": "f1" }));
        let client = start(transport.clone());

        let mut thing = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        let mut fixed = client.watch::<Fixed>(Fixed::key(Some("f1"))).await;
        thing.settled().await;
        fixed.settled().await;

        client.focus().await.unwrap();
        assert!(thing.changed().await);
        let state = thing.settled().await;
        assert_eq!(state.data.unwrap().name, "B");
        assert_eq!(transport.call_count("/api/fixed/f1"), 1);
        transport.verify();
    }

    #[tokio::test]
    async fn test_failed_revalidation_keeps_previous_data() {
        let transport = Arc::new(MockTransport::new());
        transport.expect_get("/api/things/t1").return_ok(json!({ "id": "t1", "name": "A" }));
        transport
            .expect_get("/api/things/t1")
            .return_err(FetchError::Transport("offline".into()));
        let client = start(transport);

        let mut thing = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        thing.settled().await;
        client.focus().await.unwrap();
        assert!(thing.changed().await);

        let state = thing.settled().await;
        assert_eq!(state.data.map(|t| t.name), Some("A".to_string()));
        assert_eq!(state.error, Some(FetchError::Transport("offline".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_retry_without_data_is_loading() {
        let transport = Arc::new(MockTransport::new().with_latency(Duration::from_millis(50)));
        transport
            .expect_get("/api/things/t1")
            .return_err(FetchError::Status(500));
        transport
            .expect_get("/api/things/t1")
            .return_ok(json!({ "id": "t1", "name": "Back" }));
        let client = start(transport.clone());

        let mut thing = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        let failed = thing.settled().await;
        assert_eq!(select(&failed, thing.should_fetch()).branch(), Branch::Error);

        client.focus().await.unwrap();
        assert!(thing.changed().await);
        let retrying = thing.state();
        assert!(retrying.is_loading);
        assert!(retrying.is_validating);
        assert_eq!(select(&retrying, thing.should_fetch()).branch(), Branch::Loading);

        let state = thing.settled().await;
        assert_eq!(state.error, None);
        assert_eq!(select(&state, thing.should_fetch()).branch(), Branch::Success);
        transport.verify();
    }

    #[tokio::test]
    async fn test_joining_a_live_key_keeps_its_generation() {
        let transport = Arc::new(MockTransport::new());
        transport.expect_get("/api/things/t1").return_ok(json!({ "id": "t1", "name": "A" }));
        let client = start(transport.clone());

        let mut first = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        let mut second = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        let (a, b) = tokio::join!(first.settled(), second.settled());
        assert_eq!(a.data.map(|t| t.name), Some("A".to_string()));
        assert_eq!(b.data.map(|t| t.name), Some("A".to_string()));
        assert_eq!(transport.call_count("/api/things/t1"), 1);
    }

    #[tokio::test]
    async fn test_watch_after_actor_shutdown_yields_error_state() {
        let transport = Arc::new(MockTransport::new());
        let (actor, client) = FetchActor::new(4, transport);
        drop(actor);

        let sub = client.watch::<Thing>(Thing::key(Some("t1"))).await;
        assert!(sub.should_fetch());
        assert_eq!(sub.state().error, Some(FetchError::ActorClosed));
    }
}
