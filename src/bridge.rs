//! Map bridge: the typed host API over a fire-and-forget script renderer.
//!
//! ARCHITECTURE
//! ============
//! Commands go out through a [`Renderer`], which evaluates them and returns
//! nothing. Operations that need an answer register a continuation with the
//! [`CallbackRegistry`] and send its token along. The renderer answers later
//! through [`MapBridge::invoke_callback`].
//!
//! Everything coming back from the renderer (replies and pushed events) is
//! posted as a job onto one dispatch queue. A single [`Dispatcher`] drains it,
//! so listeners and continuations never run concurrently with each other.
//!
//! DESIGN
//! ======
//! - Listener and registry locks are released before any user code runs.
//! - Malformed replies and events are logged with their error code and the
//!   affected dispatch is abandoned. The continuation is dropped without
//!   running; async callers observe `None`.
//! - A renderer `null` or missing reply is a typed negative (`None`/`false`).
//! - Ready is processed once. A ready listener set afterwards runs at once
//!   on the caller's thread.
//! - Listeners receive the bridge as an argument. Listeners that capture a
//!   clone of it keep the dispatch queue open forever.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::callbacks::CallbackRegistry;
use crate::command::{Command, CommandEncoder};
use crate::config::BridgeConfig;
use crate::entity::Entity;
use crate::error::{BridgeError, DecodeError, ErrorCode};
use crate::event::{EventKind, EventPayload, MapClickEvent, MapDragEvent, MapEvent, MapTouchEvent};
use crate::geo::{Coordinates, Rectangle};
use crate::layer::{GeoJsonLayerDescriptor, Layer, VectorLayer};
use crate::registry::EntityRegistry;
use crate::transaction::{CommitCallback, EntityManager, EntityTransaction};

// =============================================================================
// RENDERER
// =============================================================================

/// Outbound side of the boundary. Implementations hand the command to the
/// embedded script engine and return without waiting for it to run.
pub trait Renderer: Send + Sync {
    fn evaluate(&self, command: &Command);
}

// =============================================================================
// DISPATCHER
// =============================================================================

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Consumer end of the dispatch queue.
pub struct Dispatcher {
    jobs: mpsc::UnboundedReceiver<Job>,
}

impl Dispatcher {
    /// Run jobs in order until every bridge handle is dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.jobs.recv().await {
            job();
        }
        debug!("dispatcher: queue closed");
    }

    /// Run every job queued so far on the current thread. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.jobs.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

/// Spawn the dispatcher on the current tokio runtime. Returns a handle for shutdown.
pub fn spawn_dispatcher(dispatcher: Dispatcher) -> JoinHandle<()> {
    tokio::spawn(dispatcher.run())
}

// =============================================================================
// LISTENERS
// =============================================================================

type ReadyListener = Arc<dyn Fn(&MapBridge) + Send + Sync>;
type Listener<E> = Arc<dyn Fn(&MapBridge, &E) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    ready: bool,
    on_ready: Option<ReadyListener>,
    on_click: Option<Listener<MapClickEvent>>,
    on_long_click: Option<Listener<MapClickEvent>>,
    on_drag: Option<Listener<MapDragEvent>>,
    on_touch: Option<Listener<MapTouchEvent>>,
}

// =============================================================================
// BRIDGE
// =============================================================================

struct Inner {
    renderer: Arc<dyn Renderer>,
    config: BridgeConfig,
    encoder: CommandEncoder,
    callbacks: CallbackRegistry,
    entities: EntityRegistry,
    jobs: mpsc::UnboundedSender<Job>,
    listeners: Mutex<Listeners>,
}

/// Host-side handle to one renderer instance. Cheap to clone.
#[derive(Clone)]
pub struct MapBridge {
    inner: Arc<Inner>,
}

impl MapBridge {
    /// Create a bridge with fresh registries. The returned [`Dispatcher`] must
    /// be driven (see [`spawn_dispatcher`]) for replies and events to arrive.
    pub fn new(renderer: Arc<dyn Renderer>, config: BridgeConfig) -> (Self, Dispatcher) {
        Self::with_registries(renderer, config, CallbackRegistry::new(), EntityRegistry::new())
    }

    /// Create a bridge around existing registries.
    pub fn with_registries(
        renderer: Arc<dyn Renderer>,
        config: BridgeConfig,
        callbacks: CallbackRegistry,
        entities: EntityRegistry,
    ) -> (Self, Dispatcher) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            renderer,
            encoder: CommandEncoder::new(&config),
            config,
            callbacks,
            entities,
            jobs: tx,
            listeners: Mutex::new(Listeners::default()),
        };
        (Self { inner: Arc::new(inner) }, Dispatcher { jobs: rx })
    }

    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.inner.callbacks
    }

    #[must_use]
    pub fn entities(&self) -> &EntityRegistry {
        &self.inner.entities
    }

    /// Whether the renderer has signalled ready and the signal was dispatched.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.listeners().ready
    }

    fn check_ready(&self) -> Result<(), BridgeError> {
        if self.inner.config.require_ready && !self.is_ready() {
            return Err(BridgeError::NotReady);
        }
        Ok(())
    }
}

// =============================================================================
// LISTENER REGISTRATION
// =============================================================================

impl MapBridge {
    /// Replaces any previous ready listener. Runs it immediately if the map is
    /// already ready.
    pub fn set_on_map_ready_listener(&self, listener: impl Fn(&MapBridge) + Send + Sync + 'static) {
        let listener: ReadyListener = Arc::new(listener);
        let already_ready = {
            let mut listeners = self.inner.listeners();
            listeners.on_ready = Some(Arc::clone(&listener));
            listeners.ready
        };
        if already_ready {
            listener(self);
        }
    }

    pub fn set_on_click_listener(&self, listener: impl Fn(&MapBridge, &MapClickEvent) + Send + Sync + 'static) {
        self.inner.listeners().on_click = Some(Arc::new(listener));
    }

    pub fn set_on_long_click_listener(&self, listener: impl Fn(&MapBridge, &MapClickEvent) + Send + Sync + 'static) {
        self.inner.listeners().on_long_click = Some(Arc::new(listener));
    }

    pub fn set_on_drag_listener(&self, listener: impl Fn(&MapBridge, &MapDragEvent) + Send + Sync + 'static) {
        self.inner.listeners().on_drag = Some(Arc::new(listener));
    }

    pub fn set_on_touch_listener(&self, listener: impl Fn(&MapBridge, &MapTouchEvent) + Send + Sync + 'static) {
        self.inner.listeners().on_touch = Some(Arc::new(listener));
    }

    /// Clear the listener for `kind`; later events of that kind are dropped.
    pub fn clear_listener(&self, kind: EventKind) {
        let mut listeners = self.inner.listeners();
        match kind {
            EventKind::Ready => listeners.on_ready = None,
            EventKind::Click => listeners.on_click = None,
            EventKind::LongClick => listeners.on_long_click = None,
            EventKind::Drag => listeners.on_drag = None,
            EventKind::Touch => listeners.on_touch = None,
        }
    }
}

// =============================================================================
// INBOUND
// =============================================================================

impl MapBridge {
    /// Entry point for the renderer's reply to a token-carrying command.
    ///
    /// Returns `false` (and does nothing) for unknown or already used tokens.
    pub fn invoke_callback(&self, token: &str, payload: Option<String>) -> bool {
        let Some(continuation) = self.inner.callbacks.take(token) else {
            debug!(%token, "bridge: reply for unknown token");
            return false;
        };
        self.inner.post(Box::new(move || continuation(payload)));
        true
    }

    pub fn fire_on_map_ready(&self) {
        self.post_event(EventKind::Ready, None);
    }

    pub fn fire_on_click(&self, json: &str) {
        self.post_event(EventKind::Click, Some(json.to_owned()));
    }

    pub fn fire_on_long_click(&self, json: &str) {
        self.post_event(EventKind::LongClick, Some(json.to_owned()));
    }

    pub fn fire_on_drag(&self, json: &str) {
        self.post_event(EventKind::Drag, Some(json.to_owned()));
    }

    pub fn fire_on_touch(&self, json: &str) {
        self.post_event(EventKind::Touch, Some(json.to_owned()));
    }

    /// Route an event by its wire name (`ready`, `click`, `longClick`, `drag`, `touch`).
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvent` for any other name. Payload errors surface
    /// later, on the dispatch queue, as a logged warning.
    pub fn handle_event(&self, kind: &str, json: Option<&str>) -> Result<(), DecodeError> {
        let kind: EventKind = kind.parse().inspect_err(|e: &DecodeError| {
            warn!(code = e.error_code(), error = %e, "bridge: dropping event");
        })?;
        self.post_event(kind, json.map(str::to_owned));
        Ok(())
    }

    fn post_event(&self, kind: EventKind, json: Option<String>) {
        let bridge = self.clone();
        self.inner.post(Box::new(move || bridge.dispatch_event(kind, json.as_deref())));
    }

    fn dispatch_event(&self, kind: EventKind, json: Option<&str>) {
        let event = match EventPayload::decode(kind, json).and_then(|payload| payload.hydrate(&self.inner.entities)) {
            Ok(event) => event,
            Err(e) => {
                warn!(%kind, code = e.error_code(), error = %e, "bridge: dropping malformed event");
                return;
            }
        };

        match event {
            MapEvent::Ready => self.deliver_ready(),
            MapEvent::Click(e) => {
                let listener = self.inner.listeners().on_click.clone();
                self.deliver(listener, &e);
            }
            MapEvent::LongClick(e) => {
                let listener = self.inner.listeners().on_long_click.clone();
                self.deliver(listener, &e);
            }
            MapEvent::Drag(e) => {
                let listener = self.inner.listeners().on_drag.clone();
                self.deliver(listener, &e);
            }
            MapEvent::Touch(e) => {
                let listener = self.inner.listeners().on_touch.clone();
                self.deliver(listener, &e);
            }
        }
    }

    fn deliver_ready(&self) {
        let listener = {
            let mut listeners = self.inner.listeners();
            if listeners.ready {
                warn!("bridge: repeated map ready ignored");
                return;
            }
            listeners.ready = true;
            listeners.on_ready.clone()
        };
        info!("bridge: map ready");
        if let Some(listener) = listener {
            listener(self);
        }
    }

    fn deliver<E>(&self, listener: Option<Listener<E>>, event: &E) {
        if let Some(listener) = listener {
            listener(self, event);
        }
    }
}

impl Inner {
    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn post(&self, job: Job) {
        if self.jobs.send(job).is_err() {
            warn!("bridge: dispatcher stopped, dropping job");
        }
    }

    fn send(&self, command: &Command) {
        debug!(function = %command.function, token = ?command.token(), "bridge: sending command");
        self.renderer.evaluate(command);
    }
}

/// `Some(value)` for a usable reply, where `value` is `None` for a `null` or
/// missing payload. `None` when the payload is malformed.
#[allow(clippy::option_option)]
fn decode_reply<T: DeserializeOwned>(reply: &'static str, payload: Option<String>) -> Option<Option<T>> {
    let Some(payload) = payload else {
        return Some(None);
    };
    match serde_json::from_str::<Option<T>>(&payload) {
        Ok(value) => Some(value),
        Err(e) => {
            let err = DecodeError::from(e);
            warn!(reply, code = err.error_code(), error = %err, "bridge: dropping malformed reply");
            None
        }
    }
}

fn is_success(payload: Option<&str>) -> bool {
    payload.map(str::trim) == Some("true")
}

// =============================================================================
// OUTBOUND
// =============================================================================

impl MapBridge {
    /// Register `continuation`, build the command with its token, and send it.
    fn request(
        &self,
        continuation: impl FnOnce(Option<String>) + Send + 'static,
        build: impl FnOnce(&CommandEncoder, &str) -> Result<Command, serde_json::Error>,
    ) -> Result<(), BridgeError> {
        self.check_ready()?;
        let token = self.inner.callbacks.register(continuation);
        let command = match build(&self.inner.encoder, &token) {
            Ok(command) => command,
            Err(e) => {
                self.inner.callbacks.cancel(&token);
                return Err(e.into());
            }
        };
        self.arm_timeout(&token);
        self.inner.send(&command);
        Ok(())
    }

    fn arm_timeout(&self, token: &str) {
        let Some(timeout) = self.inner.config.reply_timeout else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%token, "bridge: no tokio runtime, reply timeout not armed");
            return;
        };
        let inner = Arc::downgrade(&self.inner);
        let token = token.to_owned();
        runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            if let Some(continuation) = inner.callbacks.take(&token) {
                warn!(%token, ?timeout, "bridge: reply timed out");
                inner.post(Box::new(move || continuation(None)));
            }
        });
    }

    /// Move the camera to `location`.
    ///
    /// # Errors
    ///
    /// `NotReady` in strict mode before ready; `Encode` if the argument
    /// cannot be serialized.
    pub fn focus_on_location(&self, location: &Coordinates) -> Result<(), BridgeError> {
        self.check_ready()?;
        let command = self.inner.encoder.focus_on_location(location)?;
        self.inner.send(&command);
        Ok(())
    }

    /// Fit the camera to `extent`.
    ///
    /// # Errors
    ///
    /// `NotReady` in strict mode before ready; `Encode` if the argument
    /// cannot be serialized.
    pub fn focus_on_extent(&self, extent: &Rectangle) -> Result<(), BridgeError> {
        self.check_ready()?;
        let command = self.inner.encoder.focus_on_extent(extent)?;
        self.inner.send(&command);
        Ok(())
    }

    /// # Errors
    ///
    /// `NotReady` in strict mode before ready.
    pub fn focus_on_layer(&self, layer: &(impl Layer + ?Sized)) -> Result<(), BridgeError> {
        self.focus_on_id(layer.id())
    }

    /// # Errors
    ///
    /// `NotReady` in strict mode before ready.
    pub fn focus_on_entity(&self, entity: &Entity) -> Result<(), BridgeError> {
        self.focus_on_id(entity.id())
    }

    fn focus_on_id(&self, id: &str) -> Result<(), BridgeError> {
        self.check_ready()?;
        self.inner.send(&self.inner.encoder.focus_on_id(id));
        Ok(())
    }

    /// Ask for the visible extent. `callback` gets `None` if the renderer
    /// could not compute one.
    ///
    /// # Errors
    ///
    /// `NotReady` in strict mode before ready.
    pub fn get_view_extent(
        &self,
        callback: impl FnOnce(Option<Rectangle>) + Send + 'static,
    ) -> Result<(), BridgeError> {
        self.request(
            move |payload| {
                if let Some(extent) = decode_reply("view extent", payload) {
                    callback(extent);
                }
            },
            |encoder, token| Ok(encoder.get_view_extent(token)),
        )
    }

    /// Load a GeoJSON layer. On success its entities are registered before
    /// `callback` receives the layer; a failed load yields `None`.
    ///
    /// # Errors
    ///
    /// `NotReady` in strict mode before ready; `Encode` if the descriptor
    /// cannot be serialized.
    pub fn load(
        &self,
        descriptor: &GeoJsonLayerDescriptor,
        callback: impl FnOnce(Option<VectorLayer>) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let entities = self.inner.entities.clone();
        self.request(
            move |payload| {
                let Some(layer) = decode_reply::<VectorLayer>("layer", payload) else {
                    return;
                };
                if let Some(layer) = &layer {
                    entities.insert_all(layer.iter().cloned());
                    info!(layer_id = %layer.id(), entities = layer.len(), "bridge: layer loaded");
                }
                callback(layer);
            },
            |encoder, token| encoder.add_layer(descriptor, token),
        )
    }

    /// Remove a loaded layer. On success its entities are evicted before
    /// `callback` receives `true`.
    ///
    /// # Errors
    ///
    /// `NotReady` in strict mode before ready.
    pub fn remove(
        &self,
        layer: &(impl Layer + ?Sized),
        callback: impl FnOnce(bool) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let entities = self.inner.entities.clone();
        let layer_id = layer.id().to_owned();
        let entity_ids: Vec<String> = layer.entities().iter().map(|e| e.id().to_owned()).collect();
        self.request(
            move |payload| {
                let removed = is_success(payload.as_deref());
                if removed {
                    entities.remove_ids(entity_ids.iter().map(String::as_str));
                    info!(%layer_id, "bridge: layer removed");
                } else {
                    debug!(%layer_id, "bridge: renderer refused layer removal");
                }
                callback(removed);
            },
            |encoder, token| Ok(encoder.remove_layer(layer.id(), token)),
        )
    }

    fn commit_with(
        &self,
        tx: EntityTransaction,
        callback: impl FnOnce(bool) + Send + 'static,
    ) -> Result<(), BridgeError> {
        if tx.is_empty() {
            self.inner.post(Box::new(move || callback(true)));
            return Ok(());
        }
        let entities = self.inner.entities.clone();
        let removed = tx.removals().to_vec();
        self.request(
            move |payload| {
                let applied = is_success(payload.as_deref());
                if applied {
                    entities.remove_ids(removed.iter().map(String::as_str));
                }
                callback(applied);
            },
            |encoder, token| encoder.commit_transaction(&tx, token),
        )
    }
}

impl EntityManager for MapBridge {
    fn entity(&self, id: &str) -> Option<Arc<Entity>> {
        self.inner.entities.lookup(id)
    }

    /// An empty transaction resolves with `true` without contacting the renderer.
    fn commit_transaction(&self, tx: EntityTransaction, callback: Option<CommitCallback>) -> Result<(), BridgeError> {
        self.commit_with(tx, move |applied| {
            if let Some(callback) = callback {
                callback(applied);
            }
        })
    }
}

// =============================================================================
// ASYNC
// =============================================================================

impl MapBridge {
    /// # Errors
    ///
    /// Same as [`MapBridge::get_view_extent`].
    pub async fn view_extent(&self) -> Result<Option<Rectangle>, BridgeError> {
        let (tx, rx) = oneshot::channel();
        self.get_view_extent(move |extent| {
            let _ = tx.send(extent);
        })?;
        Ok(rx.await.ok().flatten())
    }

    /// # Errors
    ///
    /// Same as [`MapBridge::load`].
    pub async fn load_layer(&self, descriptor: &GeoJsonLayerDescriptor) -> Result<Option<VectorLayer>, BridgeError> {
        let (tx, rx) = oneshot::channel();
        self.load(descriptor, move |layer| {
            let _ = tx.send(layer);
        })?;
        Ok(rx.await.ok().flatten())
    }

    /// # Errors
    ///
    /// Same as [`MapBridge::remove`].
    pub async fn remove_layer(&self, layer: &(impl Layer + ?Sized)) -> Result<bool, BridgeError> {
        let (tx, rx) = oneshot::channel();
        self.remove(layer, move |removed| {
            let _ = tx.send(removed);
        })?;
        Ok(rx.await.unwrap_or(false))
    }

    /// # Errors
    ///
    /// Same as [`EntityManager::commit_transaction`].
    pub async fn commit(&self, tx: EntityTransaction) -> Result<bool, BridgeError> {
        let (done, rx) = oneshot::channel();
        self.commit_with(tx, move |applied| {
            let _ = done.send(applied);
        })?;
        Ok(rx.await.unwrap_or(false))
    }
}

#[cfg(test)]
#[path = "bridge_test.rs"]
mod tests;
