//! Long-lived presence gateway client.
//!
//! A single driver task owns the socket, the heartbeat, and the reconnect
//! timer. [`PresenceClient`] handles read the state, register observers
//! and ask the driver to stop.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use folio_core::config::PresenceConfig;

use crate::connection::heartbeat::Heartbeat;
use crate::connection::timer::Timer;
use crate::connection::transport::{GatewayConnection, GatewayConnector, TransportEvent};
use crate::message::types::{GatewayFrame, OutboundFrame};
use crate::observer::{ObserverRegistry, Subscription};
use crate::presence::state::{ConnectionState, PresenceState};

/// State shared between the handles and the driver.
#[derive(Debug)]
struct Shared {
    /// Current state and its revision, bumped on every change.
    state: RwLock<(PresenceState, u64)>,
    observers: Arc<ObserverRegistry>,
}

impl Shared {
    fn current(&self) -> (PresenceState, u64) {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `change` and run a notification round with the result.
    fn update(&self, change: impl FnOnce(&PresenceState) -> PresenceState) {
        let (next, revision) = {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = change(&guard.0);
            guard.0 = next.clone();
            guard.1 += 1;
            (next, guard.1)
        };
        self.observers.notify(&next, revision);
    }

    fn set_connection(&self, connection: ConnectionState) {
        self.update(|state| state.with_connection(connection));
    }
}

struct Inner {
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to the presence feed. Cheap to clone.
#[derive(Clone)]
pub struct PresenceClient {
    inner: Arc<Inner>,
}

impl PresenceClient {
    /// Start the client and begin connecting immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: PresenceConfig, connector: Arc<dyn GatewayConnector>) -> Self {
        let shared = Arc::new(Shared {
            state: RwLock::new((PresenceState::default(), 1)),
            observers: Arc::new(ObserverRegistry::default()),
        });
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            url = %config.gateway_url,
            user_id = %config.user_id,
            "Starting presence client"
        );

        let driver = Driver {
            config,
            connector,
            shared: shared.clone(),
            shutdown: shutdown_rx,
            heartbeat: Heartbeat::new(),
            reconnect: Timer::new(),
        };
        let handle = tokio::spawn(driver.run());

        Self {
            inner: Arc::new(Inner {
                shared,
                shutdown: shutdown_tx,
                driver: Mutex::new(Some(handle)),
            }),
        }
    }

    /// The latest state.
    pub fn current(&self) -> PresenceState {
        self.inner.shared.current().0
    }

    /// Register `observer`; it is called with the current state before this
    /// returns, then once per change in registration order.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&PresenceState) + Send + Sync + 'static,
    {
        let shared = &self.inner.shared;
        shared
            .observers
            .subscribe(Box::new(observer), || shared.current())
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.shared.observers.len()
    }

    /// Close the socket, stop all timers, and drop every observer.
    ///
    /// Idempotent; waits for the driver task to finish.
    pub async fn shutdown(&self) {
        self.inner.shutdown.send_replace(true);

        let handle = self
            .inner
            .driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Presence driver task ended abnormally");
            }
            info!("Presence client shut down");
        }

        self.inner.shared.observers.clear();
    }
}

impl fmt::Debug for PresenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenceClient")
            .field("connection", &self.current().connection)
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// How a connection ended.
enum ConnectionEnd {
    Lost,
    Shutdown,
}

enum Step {
    Event(TransportEvent),
    Heartbeat,
    Shutdown,
}

/// Resolves once shutdown is requested or every handle is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

struct Driver {
    config: PresenceConfig,
    connector: Arc<dyn GatewayConnector>,
    shared: Arc<Shared>,
    shutdown: watch::Receiver<bool>,
    heartbeat: Heartbeat,
    reconnect: Timer,
}

impl Driver {
    async fn run(mut self) {
        loop {
            self.shared.set_connection(ConnectionState::Connecting);
            debug!(url = %self.config.gateway_url, "Connecting to presence gateway");

            let attempt = tokio::select! {
                _ = shutdown_requested(&mut self.shutdown) => None,
                result = self.connector.connect(&self.config.gateway_url) => Some(result),
            };

            match attempt {
                None => break,
                Some(Err(e)) => warn!(error = %e, "Failed to connect to presence gateway"),
                Some(Ok(conn)) => {
                    if let ConnectionEnd::Shutdown = self.run_connection(conn).await {
                        break;
                    }
                }
            }

            self.heartbeat.stop();
            self.shared.set_connection(ConnectionState::Disconnected);

            let delay = self.config.reconnect_delay();
            info!(
                delay_ms = delay.as_millis() as u64,
                "Presence gateway disconnected, reconnect scheduled"
            );
            self.reconnect.schedule(delay);

            let stop = tokio::select! {
                _ = shutdown_requested(&mut self.shutdown) => true,
                _ = self.reconnect.expired() => false,
            };
            self.reconnect.cancel();
            if stop {
                break;
            }
        }

        self.heartbeat.stop();
        self.reconnect.cancel();
        if self.shared.current().0.connection != ConnectionState::Disconnected {
            self.shared.set_connection(ConnectionState::Disconnected);
        }
        debug!("Presence driver stopped");
    }

    async fn run_connection(&mut self, mut conn: Box<dyn GatewayConnection>) -> ConnectionEnd {
        self.shared.set_connection(ConnectionState::Connected);
        info!(user_id = %self.config.user_id, "Connected to presence gateway");

        let init = OutboundFrame::Initialize {
            subscribe_to_id: self.config.user_id.clone(),
        };
        if let Err(e) = conn.send_text(init.encode()).await {
            warn!(error = %e, "Failed to send subscribe frame");
            conn.close().await;
            return ConnectionEnd::Lost;
        }

        loop {
            let step = tokio::select! {
                _ = shutdown_requested(&mut self.shutdown) => Step::Shutdown,
                event = conn.next_event() => Step::Event(event),
                _ = self.heartbeat.due() => Step::Heartbeat,
            };

            match step {
                Step::Shutdown => {
                    conn.close().await;
                    return ConnectionEnd::Shutdown;
                }
                Step::Heartbeat => {
                    trace!("Sending heartbeat");
                    if let Err(e) = conn.send_text(OutboundFrame::Heartbeat.encode()).await {
                        warn!(error = %e, "Failed to send heartbeat");
                        conn.close().await;
                        return ConnectionEnd::Lost;
                    }
                    self.heartbeat.reschedule();
                }
                Step::Event(TransportEvent::Message(text)) => self.handle_frame(&text),
                Step::Event(TransportEvent::Closed) => {
                    info!("Presence gateway closed the connection");
                    return ConnectionEnd::Lost;
                }
                Step::Event(TransportEvent::Error(reason)) => {
                    warn!(%reason, "Presence gateway connection failed");
                    conn.close().await;
                    return ConnectionEnd::Lost;
                }
            }
        }
    }

    fn handle_frame(&mut self, text: &str) {
        match GatewayFrame::parse(text) {
            Ok(GatewayFrame::Hello { heartbeat_interval }) => {
                debug!(
                    interval_ms = heartbeat_interval.as_millis() as u64,
                    previous_ms = self.heartbeat.interval().map(|d| d.as_millis() as u64),
                    "Heartbeat interval received"
                );
                self.heartbeat.start(heartbeat_interval);
            }
            Ok(GatewayFrame::Dispatch { event, presence }) => {
                debug!(
                    event = event.as_str(),
                    status = presence.status.as_str(),
                    activities = presence.activities.len(),
                    "Presence snapshot received"
                );
                self.shared.update(|state| state.with_presence(presence));
            }
            Ok(GatewayFrame::Unrecognized { op, event }) => {
                debug!(op, ?event, "Ignoring gateway frame");
            }
            Err(e) => warn!(error = %e, "Dropping malformed gateway frame"),
        }
    }
}
