//! Observable auth-service readiness.
//!
//! Views that depend on authentication need to know whether the auth
//! service is reachable before offering login at all. `AuthContext`
//! starts in `Loading`, probes the service once at startup, and on
//! failure publishes `Error` and retries after a fixed delay until the
//! probe succeeds. Subscribers watch the phase instead of probing
//! themselves.

use std::time::Duration;

use tokio::sync::watch;

use super::AuthClient;

/// Delay before retrying a failed initialization probe.
pub const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Auth-service readiness phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    /// Initial state; the first probe has not completed yet.
    Loading,
    /// The auth service answered its health probe.
    Ready,
    /// The last probe failed; a retry is scheduled.
    Error(String),
}

/// Observable readiness store for the auth service.
///
/// Cheaply cloneable; all clones observe the same phase.
#[derive(Clone)]
pub struct AuthContext {
    rx: watch::Receiver<AuthPhase>,
}

impl AuthContext {
    /// Spawn the initialization task and return the observable handle.
    ///
    /// The task probes the auth service, publishing `Ready` on success.
    /// On failure it publishes `Error`, sleeps `retry_delay`, and probes
    /// again; only a successful probe ends the loop.
    #[must_use]
    pub fn start(client: AuthClient, retry_delay: Duration) -> Self {
        let (tx, rx) = watch::channel(AuthPhase::Loading);

        tokio::spawn(async move {
            loop {
                match client.health().await {
                    Ok(()) => {
                        tracing::info!("auth service ready");
                        let _ = tx.send(AuthPhase::Ready);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "auth service init failed, will retry");
                        if tx.send(AuthPhase::Error(e.to_string())).is_err() {
                            // All handles dropped; stop retrying
                            break;
                        }
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        });

        Self { rx }
    }

    /// The current phase.
    #[must_use]
    pub fn current(&self) -> AuthPhase {
        self.rx.borrow().clone()
    }

    /// Whether the auth service has answered its probe.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.current(), AuthPhase::Ready)
    }

    /// Subscribe to phase changes.
    ///
    /// The receiver yields the current phase immediately and every change
    /// after it.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthPhase> {
        self.rx.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> AuthClient {
        AuthClient::new(&crate::config::AuthServiceConfig {
            base_url: server.uri(),
            api_key: SecretString::from("test-key"),
        })
    }

    #[tokio::test]
    async fn test_reaches_ready_when_service_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let context = AuthContext::start(client_for(&server), Duration::from_millis(5));
        let mut rx = context.subscribe();

        while *rx.borrow() != AuthPhase::Ready {
            rx.changed().await.unwrap();
        }
        assert!(context.is_ready());
    }

    #[tokio::test]
    async fn test_retries_after_error_until_ready() {
        let server = MockServer::start().await;
        // First probe fails, every later probe succeeds
        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let context = AuthContext::start(client_for(&server), Duration::from_millis(5));
        let mut rx = context.subscribe();

        let mut saw_error = false;
        loop {
            let phase = rx.borrow_and_update().clone();
            match phase {
                AuthPhase::Error(_) => saw_error = true,
                AuthPhase::Ready => break,
                AuthPhase::Loading => {}
            }
            rx.changed().await.unwrap();
        }
        assert!(saw_error, "should pass through Error before Ready");
    }

    #[tokio::test]
    async fn test_starts_in_loading() {
        // Unroutable port: the probe will hang/fail, so the phase stays
        // Loading or moves to Error, never Ready
        let context = AuthContext::start(
            AuthClient::new(&crate::config::AuthServiceConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: SecretString::from("test-key"),
            }),
            Duration::from_secs(60),
        );
        assert!(!context.is_ready());
    }
}
