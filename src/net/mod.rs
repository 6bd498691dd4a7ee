//! # Net Module
//!
//! The background command listener: accepts one client at a time, reads its
//! byte stream, and applies decoded commands to the shared intent.
//!
//! The listener runs a current-thread tokio runtime on its own OS thread so it
//! never blocks the host's tick loop. A watch channel wired to
//! [`CommandListener::shutdown`] interrupts both the accept and the read.

pub mod framing;
pub mod session;

pub use framing::*;
pub use session::*;

use crate::{decode, GestureError, GestureResult, ListenerConfig, SharedIntent};
use log::{debug, error, info, trace, warn};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct ListenerCounters {
    connections_accepted: AtomicU64,
    chunks_read: AtomicU64,
    commands_applied: AtomicU64,
    unknown_tokens: AtomicU64,
}

/// Point-in-time copy of the listener's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListenerStats {
    pub connections_accepted: u64,
    pub chunks_read: u64,
    pub commands_applied: u64,
    pub unknown_tokens: u64,
}

/// How a client session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    Shutdown,
}

/// Owned handle to a running command listener.
///
/// Dropping the handle shuts the listener down.
#[derive(Debug)]
pub struct CommandListener {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    worker: Option<JoinHandle<()>>,
    counters: Arc<ListenerCounters>,
}

impl CommandListener {
    /// Binds the configured address and spawns the listener thread.
    ///
    /// A bind failure is returned here and is not retried.
    pub fn start(config: ListenerConfig, intent: SharedIntent) -> GestureResult<Self> {
        config.validate()?;

        let addr = config.socket_addr();
        let std_listener = std::net::TcpListener::bind(addr)
            .map_err(|source| GestureError::Bind { addr, source })?;
        std_listener.set_nonblocking(true)?;
        let local_addr = std_listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let counters = Arc::new(ListenerCounters::default());
        let worker_counters = Arc::clone(&counters);

        let worker = std::thread::Builder::new()
            .name("gesture-listener".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = match TcpListener::from_std(std_listener) {
                        Ok(listener) => listener,
                        Err(err) => {
                            error!("Failed to register command listener: {}", err);
                            return;
                        }
                    };
                    accept_loop(listener, config, intent, worker_counters, shutdown_rx).await;
                });
            })?;

        info!("Command listener accepting on {}", local_addr);

        Ok(Self {
            local_addr,
            shutdown_tx,
            worker: Some(worker),
            counters,
        })
    }

    /// The address actually bound, with the real port when 0 was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the listener thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    pub fn stats(&self) -> ListenerStats {
        ListenerStats {
            connections_accepted: self.counters.connections_accepted.load(Ordering::Relaxed),
            chunks_read: self.counters.chunks_read.load(Ordering::Relaxed),
            commands_applied: self.counters.commands_applied.load(Ordering::Relaxed),
            unknown_tokens: self.counters.unknown_tokens.load(Ordering::Relaxed),
        }
    }

    /// Stops accepting, closes the active connection, and joins the thread.
    ///
    /// Calling this more than once is a no-op.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        // Fails only when the worker already exited and dropped its receiver.
        let _ = self.shutdown_tx.send(true);
        if worker.join().is_err() {
            error!("Command listener thread panicked");
        }
        info!("Command listener on {} shut down", self.local_addr);
    }
}

impl Drop for CommandListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Resolves once shutdown is signalled or the handle is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    config: ListenerConfig,
    intent: SharedIntent,
    counters: Arc<ListenerCounters>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let accepted = tokio::select! {
            biased;
            _ = shutdown_requested(&mut shutdown) => break,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                counters.connections_accepted.fetch_add(1, Ordering::Relaxed);
                let mut session = ConnectionSession::new(stream, peer, &config);
                info!("Gesture client {} connected (session {})", peer, session.id);

                let end = serve_session(&mut session, &intent, &counters, &mut shutdown).await;
                if end == SessionEnd::Shutdown {
                    break;
                }
            }
            Err(err) => {
                warn!("Error accepting gesture client: {}", err);
                tokio::select! {
                    biased;
                    _ = shutdown_requested(&mut shutdown) => break,
                    _ = tokio::time::sleep(ACCEPT_BACKOFF) => {}
                }
            }
        }
    }
    debug!("Command listener accept loop exited");
}

async fn serve_session(
    session: &mut ConnectionSession,
    intent: &SharedIntent,
    counters: &ListenerCounters,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    loop {
        let read = tokio::select! {
            biased;
            _ = shutdown_requested(shutdown) => {
                info!("Closing session {} for shutdown", session.id);
                return SessionEnd::Shutdown;
            }
            read = session.read_tokens() => read,
        };

        match read {
            Ok(Some(tokens)) => {
                counters.chunks_read.fetch_add(1, Ordering::Relaxed);
                trace!("Session {} read tokens {:?}", session.id, tokens);
                for token in &tokens {
                    apply_token(session, token, intent, counters);
                }
            }
            Ok(None) => {
                if let Some(token) = session.finish() {
                    apply_token(session, &token, intent, counters);
                }
                info!("Gesture client {} disconnected", session.peer);
                return SessionEnd::Closed;
            }
            Err(err) => {
                warn!(
                    "Read error from gesture client {}, dropping connection: {}",
                    session.peer, err
                );
                return SessionEnd::Closed;
            }
        }
    }
}

fn apply_token(
    session: &ConnectionSession,
    token: &str,
    intent: &SharedIntent,
    counters: &ListenerCounters,
) {
    let command = decode(token);
    if command.is_known() {
        intent.apply(command);
        counters.commands_applied.fetch_add(1, Ordering::Relaxed);
        debug!("Session {} applied {}", session.id, command);
    } else {
        counters.unknown_tokens.fetch_add(1, Ordering::Relaxed);
        debug!("Session {} ignored unknown token {:?}", session.id, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_bind_conflict_is_reported() {
        let first = CommandListener::start(ListenerConfig::for_testing(), SharedIntent::new())
            .unwrap();

        let mut config = ListenerConfig::for_testing();
        config.port = first.local_addr().port();
        let second = CommandListener::start(config, SharedIntent::new());

        match second {
            Err(GestureError::Bind { addr, .. }) => assert_eq!(addr.port(), first.local_addr().port()),
            other => panic!("expected bind failure, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_chunk_size_is_rejected_before_binding() {
        let mut config = ListenerConfig::for_testing();
        config.read_chunk_size = 0;

        let result = CommandListener::start(config, SharedIntent::new());
        assert!(matches!(result, Err(GestureError::InvalidConfig(_))));
    }

    #[test]
    fn test_small_residual_cap_is_rejected_in_delimited_mode() {
        let mut config = ListenerConfig::for_testing();
        config.token_mode = crate::TokenMode::Delimited;
        config.max_residual_bytes = config.read_chunk_size - 1;

        let result = CommandListener::start(config, SharedIntent::new());
        assert!(matches!(result, Err(GestureError::InvalidConfig(_))));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut listener =
            CommandListener::start(ListenerConfig::for_testing(), SharedIntent::new()).unwrap();
        assert!(listener.is_running());

        listener.shutdown();
        assert!(!listener.is_running());
        listener.shutdown();
    }

    #[test]
    fn test_shutdown_interrupts_idle_client() {
        let mut listener =
            CommandListener::start(ListenerConfig::for_testing(), SharedIntent::new()).unwrap();
        let _client = std::net::TcpStream::connect(listener.local_addr()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while listener.stats().connections_accepted == 0 {
            assert!(Instant::now() < deadline, "client was never accepted");
            std::thread::sleep(Duration::from_millis(5));
        }

        let started = Instant::now();
        listener.shutdown();
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_start_stop_cycles_release_port() {
        let mut listener =
            CommandListener::start(ListenerConfig::for_testing(), SharedIntent::new()).unwrap();
        let port = listener.local_addr().port();
        listener.shutdown();

        let mut config = ListenerConfig::for_testing();
        config.port = port;
        let mut again = CommandListener::start(config, SharedIntent::new()).unwrap();
        assert_eq!(again.local_addr().port(), port);
        again.shutdown();
    }
}
