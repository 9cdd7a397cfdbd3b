//! The cross-context sync bus.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use eduportal_core::types::id::ContextId;

use crate::message::codec;
use crate::message::types::SyncMessage;

use super::registry::{HandlerRegistry, Topic};
use super::subscription::SubscriptionHandle;
use super::transport::{NoopTransport, Transport, WireFrame};

/// One execution context's connection to the shared sync channel.
///
/// Cheap to clone; all clones share the same context identity, handler
/// registry, and transport. Posting never fails and never invokes the
/// posting context's own handlers; delivery to sibling contexts is
/// asynchronous and at most once.
#[derive(Debug, Clone)]
pub struct SyncBus {
    inner: Arc<BusInner>,
}

#[derive(Debug)]
struct BusInner {
    context_id: ContextId,
    transport: Arc<dyn Transport>,
    registry: Arc<HandlerRegistry>,
    closed: AtomicBool,
    dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl SyncBus {
    /// Connects a new context to the channel served by `transport`.
    ///
    /// When the transport can deliver, this spawns a dispatch task on the
    /// current tokio runtime. When it cannot (see
    /// [`NoopTransport`]), no task is spawned, nothing arrives, and no
    /// runtime is required: the bus degrades to local-only effect.
    pub fn connect(transport: Arc<dyn Transport>) -> Self {
        let context_id = ContextId::new();
        let registry = Arc::new(HandlerRegistry::new());

        let dispatch = match transport.subscribe() {
            Some(rx) => {
                debug!(
                    channel = transport.channel_name(),
                    context = %context_id,
                    "sync bus attached"
                );
                Some(tokio::spawn(dispatch_loop(
                    rx,
                    context_id,
                    Arc::clone(&registry),
                )))
            }
            None => {
                warn!(
                    channel = transport.channel_name(),
                    "sync transport unavailable; cross-context delivery disabled"
                );
                None
            }
        };

        Self {
            inner: Arc::new(BusInner {
                context_id,
                transport,
                registry,
                closed: AtomicBool::new(false),
                dispatch: Mutex::new(dispatch),
            }),
        }
    }

    /// Connects a bus with no cross-context delivery at all.
    pub fn disconnected() -> Self {
        Self::connect(Arc::new(NoopTransport))
    }

    /// Identity of this context on the channel.
    pub fn context_id(&self) -> ContextId {
        self.inner.context_id
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Posts a message to every sibling context.
    ///
    /// Fire-and-forget: encoding failures are logged and dropped, posting
    /// with no sibling listening succeeds, and a closed bus ignores the
    /// call entirely.
    pub fn post(&self, msg: &SyncMessage) {
        if self.is_closed() {
            trace!(kind = %msg.kind(), "post on closed bus ignored");
            return;
        }
        match codec::encode_message(msg) {
            Ok(body) => {
                self.inner.transport.publish(WireFrame {
                    origin: self.inner.context_id,
                    body,
                });
                trace!(kind = %msg.kind(), "posted");
            }
            Err(e) => {
                warn!(kind = %msg.kind(), error = %e, "failed to encode message; dropped");
            }
        }
    }

    /// Registers a handler for a topic and returns a handle that undoes
    /// the registration.
    ///
    /// Pass a [`MessageKind`](crate::message::MessageKind) to receive one
    /// kind, or [`Topic::All`] to receive everything. Registering the same
    /// callback twice yields two independent registrations. On a closed
    /// bus this registers nothing and returns an inert handle.
    pub fn on<T, F>(&self, topic: T, handler: F) -> SubscriptionHandle
    where
        T: Into<Topic>,
        F: Fn(&SyncMessage) + Send + Sync + 'static,
    {
        let topic = topic.into();
        if self.is_closed() {
            return SubscriptionHandle::inert(topic);
        }
        let id = self.inner.registry.add(topic, Arc::new(handler));
        SubscriptionHandle::new(Arc::downgrade(&self.inner.registry), topic, id)
    }

    /// Closes this context's connection. Idempotent.
    ///
    /// Stops the dispatch task, drops every registration, and turns
    /// [`post`](Self::post) and [`on`](Self::on) into no-ops. Sibling
    /// contexts on the same transport are unaffected.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let handle = self
            .inner
            .dispatch
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.inner.registry.clear();
        debug!(context = %self.inner.context_id, "sync bus closed");
    }
}

impl Drop for BusInner {
    fn drop(&mut self) {
        let dispatch = self.dispatch.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = dispatch.take() {
            handle.abort();
        }
    }
}

/// Receives frames from the transport, drops this context's own frames,
/// decodes the rest, and hands them to the registry.
async fn dispatch_loop(
    mut rx: broadcast::Receiver<WireFrame>,
    context_id: ContextId,
    registry: Arc<HandlerRegistry>,
) {
    loop {
        match rx.recv().await {
            Ok(frame) => {
                if frame.origin == context_id {
                    continue;
                }
                match codec::decode_message(&frame.body) {
                    Ok(msg) => registry.dispatch(&msg),
                    Err(e) => {
                        // Unknown tag or malformed payload, e.g. a frame
                        // from a newer portal version. Drop it.
                        trace!(origin = %frame.origin, error = %e, "ignoring undecodable frame");
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "sync receiver lagged; frames dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::transport::MemoryTransport;
    use crate::message::types::MessageKind;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn make_transport() -> Arc<MemoryTransport> {
        Arc::new(MemoryTransport::named("eduportal.test", 64))
    }

    fn marker(tag: &str) -> SyncMessage {
        SyncMessage::StoreUpdated {
            store: tag.to_string(),
            detail: None,
        }
    }

    fn counting(count: &Arc<AtomicUsize>) -> impl Fn(&SyncMessage) + Send + Sync + 'static {
        let count = Arc::clone(count);
        move |_msg| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn wait_until(what: &str, condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(condition(), "timed out waiting for {what}");
    }

    #[tokio::test]
    async fn test_post_reaches_sibling_context() {
        let transport = make_transport();
        let poster = SyncBus::connect(transport.clone());
        let receiver = SyncBus::connect(transport);

        let seen = Arc::new(AtomicUsize::new(0));
        let _sub = receiver.on(MessageKind::StoreUpdated, counting(&seen));

        poster.post(&marker("grades"));
        wait_until("sibling delivery", || seen.load(Ordering::SeqCst) == 1).await;
    }

    #[tokio::test]
    async fn test_own_handlers_never_fire_for_own_post() {
        let transport = make_transport();
        let poster = SyncBus::connect(transport.clone());
        let sibling = SyncBus::connect(transport);

        let own = Arc::new(AtomicUsize::new(0));
        let siblings = Arc::new(AtomicUsize::new(0));
        let _own_sub = poster.on(Topic::All, counting(&own));
        let _sib_sub = sibling.on(Topic::All, counting(&siblings));

        poster.post(&marker("first"));
        poster.post(&marker("second"));

        wait_until("sibling saw both", || siblings.load(Ordering::SeqCst) == 2).await;
        assert_eq!(own.load(Ordering::SeqCst), 0, "no echo to the poster");
    }

    #[tokio::test]
    async fn test_wildcard_receives_every_kind() {
        let transport = make_transport();
        let poster = SyncBus::connect(transport.clone());
        let receiver = SyncBus::connect(transport);

        let seen = Arc::new(AtomicUsize::new(0));
        let _sub = receiver.on(Topic::All, counting(&seen));

        poster.post(&SyncMessage::NotificationsReadAll);
        poster.post(&SyncMessage::NotificationsCleared);
        poster.post(&marker("library"));

        wait_until("wildcard saw all three", || {
            seen.load(Ordering::SeqCst) == 3
        })
        .await;
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let transport = make_transport();
        let poster = SyncBus::connect(transport.clone());
        let receiver = SyncBus::connect(transport);

        let muted = Arc::new(AtomicUsize::new(0));
        let live = Arc::new(AtomicUsize::new(0));
        let muted_sub = receiver.on(MessageKind::StoreUpdated, counting(&muted));
        let _live_sub = receiver.on(MessageKind::NotificationsCleared, counting(&live));

        muted_sub.unsubscribe();
        muted_sub.unsubscribe(); // second call is a no-op

        // FIFO per sender: once the second message arrives, the first has
        // already been dispatched.
        poster.post(&marker("muted should not see this"));
        poster.post(&SyncMessage::NotificationsCleared);

        wait_until("live handler fired", || live.load(Ordering::SeqCst) == 1).await;
        assert_eq!(muted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_posts_arrive_in_order() {
        let transport = make_transport();
        let poster = SyncBus::connect(transport.clone());
        let receiver = SyncBus::connect(transport);

        let collected = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&collected);
        let _sub = receiver.on(MessageKind::StoreUpdated, move |msg| {
            if let SyncMessage::StoreUpdated { store, .. } = msg {
                sink.lock().unwrap().push(store.clone());
            }
        });

        let total = 50;
        for i in 0..total {
            poster.post(&marker(&i.to_string()));
        }

        wait_until("all frames delivered", || {
            collected.lock().unwrap().len() == total
        })
        .await;
        let seen = collected.lock().unwrap();
        let expected: Vec<String> = (0..total).map(|i| i.to_string()).collect();
        assert_eq!(*seen, expected);
    }

    #[tokio::test]
    async fn test_undecodable_frame_is_ignored() {
        let transport = make_transport();
        let receiver = SyncBus::connect(transport.clone());

        let seen = Arc::new(AtomicUsize::new(0));
        let _sub = receiver.on(Topic::All, counting(&seen));

        // A tag from some future portal version, then garbage, then a
        // frame this version understands.
        transport.publish(WireFrame {
            origin: ContextId::new(),
            body: r#"{"type":"seating_chart_updated","payload":{"room":"4B"}}"#.to_string(),
        });
        transport.publish(WireFrame {
            origin: ContextId::new(),
            body: "not json".to_string(),
        });
        let poster = SyncBus::connect(transport);
        poster.post(&marker("known"));

        wait_until("known frame delivered", || seen.load(Ordering::SeqCst) >= 1).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1, "unknown frames dropped");
    }

    #[tokio::test]
    async fn test_close_silences_only_that_context() {
        let transport = make_transport();
        let closed = SyncBus::connect(transport.clone());
        let poster = SyncBus::connect(transport.clone());
        let bystander = SyncBus::connect(transport);

        let closed_seen = Arc::new(AtomicUsize::new(0));
        let bystander_seen = Arc::new(AtomicUsize::new(0));
        let _closed_sub = closed.on(Topic::All, counting(&closed_seen));
        let _bystander_sub = bystander.on(Topic::All, counting(&bystander_seen));

        closed.close();
        closed.close(); // idempotent
        assert!(closed.is_closed());

        poster.post(&marker("after close"));
        wait_until("bystander delivery", || {
            bystander_seen.load(Ordering::SeqCst) == 1
        })
        .await;
        assert_eq!(closed_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_closed_bus_ignores_post_and_on() {
        let transport = make_transport();
        let closed = SyncBus::connect(transport.clone());
        let prober = SyncBus::connect(transport.clone());
        let observer = SyncBus::connect(transport);

        let observer_seen = Arc::new(AtomicUsize::new(0));
        let _obs = observer.on(Topic::All, counting(&observer_seen));

        closed.close();
        closed.post(&marker("from a closed bus"));

        let late = Arc::new(AtomicUsize::new(0));
        let late_sub = closed.on(Topic::All, counting(&late));
        late_sub.unsubscribe(); // inert handle, still safe

        // The transport serializes sends, so had the closed post gone
        // out it would arrive before this probe.
        prober.post(&marker("probe"));
        wait_until("probe delivered", || {
            observer_seen.load(Ordering::SeqCst) >= 1
        })
        .await;
        assert_eq!(observer_seen.load(Ordering::SeqCst), 1);
        assert_eq!(late.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disconnected_bus_needs_no_runtime() {
        // Plain #[test]: no tokio runtime exists here.
        let bus = SyncBus::disconnected();
        let seen = Arc::new(AtomicUsize::new(0));

        let sub = bus.on(Topic::All, counting(&seen));
        bus.post(&SyncMessage::NotificationsCleared);
        sub.unsubscribe();
        bus.close();
        bus.post(&SyncMessage::NotificationsCleared);

        // Nothing arrives and nothing panics.
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clones_share_close_state() {
        let bus = SyncBus::disconnected();
        let clone = bus.clone();
        clone.close();
        assert!(bus.is_closed());
    }
}
