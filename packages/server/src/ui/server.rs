//! Server execution logic.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use hearth_shared::time::Clock;
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify, watch},
    task::JoinHandle,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{ConnectionRegistry, MessageHistory},
    infrastructure::{
        history::{InMemoryMessageHistory, spawn_sweeper},
        hub::BroadcastHub,
        registry::WebSocketConnectionRegistry,
    },
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetHistoryUseCase, SendMessageUseCase,
    },
};

use super::{
    error::ServerError,
    handler::{get_history, health_check, websocket_handler},
    state::{AppState, ServerState},
};

/// How long `stop` waits for the listener to finish in-flight requests
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket broadcast server
///
/// Owns the message history, the connection registry and the broadcast hub
/// for the lifetime of the process.
///
/// # Example
///
/// ```ignore
/// let server = Arc::new(Server::new(config, Arc::new(SystemClock)));
/// tokio::spawn({
///     let server = server.clone();
///     async move {
///         shutdown_signal().await;
///         server.stop().await
///     }
/// });
/// server.start().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    history: Arc<dyn MessageHistory>,
    registry: Arc<dyn ConnectionRegistry>,
    hub: Arc<BroadcastHub>,
    app_state: Arc<AppState>,
    lifecycle: watch::Sender<ServerState>,
    shutdown: Arc<Notify>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// Dependencies are wired in order: history, registry, hub, use cases.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated server configuration
    /// * `clock` - Time source for history expiry and message timestamps
    pub fn new(config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        // 1. History (in-memory, bounded by count and age)
        let history: Arc<dyn MessageHistory> =
            Arc::new(InMemoryMessageHistory::new(config.history(), clock.clone()));

        // 2. Connection registry
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(WebSocketConnectionRegistry::new());

        // 3. Broadcast hub
        let hub = Arc::new(BroadcastHub::new(registry.clone()));

        // 4. UseCases
        let (lifecycle, lifecycle_rx) = watch::channel(ServerState::Created);
        let app_state = Arc::new(AppState {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                registry.clone(),
                history.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(registry.clone())),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                history.clone(),
                hub.clone(),
                clock,
            )),
            get_history_usecase: Arc::new(GetHistoryUseCase::new(history.clone())),
            lifecycle: lifecycle_rx,
        });

        Self {
            config,
            history,
            registry,
            hub,
            app_state,
            lifecycle,
            shutdown: Arc::new(Notify::new()),
            sweeper: Mutex::new(None),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ServerState {
        *self.lifecycle.borrow()
    }

    /// Number of currently registered connections
    pub async fn connection_count(&self) -> usize {
        self.registry.count().await
    }

    /// Bind the configured address and serve until [`Server::stop`] is called
    ///
    /// # Errors
    ///
    /// Returns an error if the server was already started, fails to bind to
    /// the configured address, or fails while serving. A failed bind leaves
    /// the server startable again.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.begin_running()?;

        let addr = self.config.listen_addr();
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(source) => {
                self.lifecycle.send_modify(|state| {
                    *state = match *state {
                        ServerState::Running => ServerState::Created,
                        // stop() raced the bind and is waiting for Stopped
                        _ => ServerState::Stopped,
                    }
                });
                return Err(ServerError::Bind { addr, source });
            }
        };
        self.run(listener).await
    }

    /// Serve on an already bound listener until [`Server::stop`] is called
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        self.begin_running()?;
        self.run(listener).await
    }

    /// `Created → Running`, or [`ServerError::AlreadyStarted`]
    fn begin_running(&self) -> Result<(), ServerError> {
        let started = self.lifecycle.send_if_modified(|state| {
            if *state == ServerState::Created {
                *state = ServerState::Running;
                true
            } else {
                false
            }
        });
        if started {
            Ok(())
        } else {
            Err(ServerError::AlreadyStarted)
        }
    }

    async fn run(&self, listener: TcpListener) -> Result<(), ServerError> {
        self.hub.start().await;
        if let Some(interval) = self.config.sweep_interval() {
            *self.sweeper.lock().await = Some(spawn_sweeper(self.history.clone(), interval));
        }

        match listener.local_addr() {
            Ok(addr) => {
                tracing::info!("WebSocket broadcast server listening on {}", addr);
                tracing::info!("Connect to: ws://{}/ws", addr);
            }
            Err(e) => tracing::warn!("Failed to read listener address: {}", e),
        }

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/history", get(get_history))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone());

        let shutdown = self.shutdown.clone();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await;

        // Serving ended without stop(): tear the hub down here
        if self.lifecycle.send_replace(ServerState::Stopped) == ServerState::Running {
            self.teardown().await;
        }
        tracing::info!("Server shutdown complete");

        result.map_err(ServerError::Serve)
    }

    /// Stop the server
    ///
    /// Closes the distribution queue, then closes and removes every
    /// connection, then shuts the listener down gracefully.
    ///
    /// # Errors
    ///
    /// * [`ServerError::NotRunning`] if the server was never started
    /// * [`ServerError::AlreadyStopped`] on any call after the first
    /// * [`ServerError::ShutdownTimeout`] if the listener does not finish in time
    pub async fn stop(&self) -> Result<(), ServerError> {
        let mut previous = ServerState::Created;
        self.lifecycle.send_if_modified(|state| {
            previous = *state;
            if *state == ServerState::Running {
                *state = ServerState::Stopping;
                true
            } else {
                false
            }
        });
        match previous {
            ServerState::Running => {}
            ServerState::Created => return Err(ServerError::NotRunning),
            ServerState::Stopping | ServerState::Stopped => {
                return Err(ServerError::AlreadyStopped);
            }
        }
        tracing::info!("Stopping server");

        self.teardown().await;
        self.shutdown.notify_one();

        let mut lifecycle = self.lifecycle.subscribe();
        let stopped = async move {
            lifecycle
                .wait_for(|state| *state == ServerState::Stopped)
                .await
                .map(|_| ())
        };
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, stopped).await {
            Ok(_) => Ok(()),
            Err(_) => Err(ServerError::ShutdownTimeout(SHUTDOWN_TIMEOUT)),
        }
    }

    async fn teardown(&self) {
        // The queue closes before connections so the fan-out loop ends cleanly
        self.hub.close().await;

        let closed = self.registry.close_all().await;
        tracing::info!("Closed {} connection(s)", closed);

        if let Some(sweeper) = self.sweeper.lock().await.take() {
            sweeper.abort();
        }
    }
}
