// ABOUTME: Asynchronous connectivity probe run off the wizard's update path
// Tester trait for injection, sqlx-backed production tester, and timeout-bounded orchestration

use async_trait::async_trait;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::state::{ProbeOutcome, ProbeRequest, WizardMsg};
use crate::models::ConnectionConfig;

/// Default wall-clock bound for one probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),
}

/// Checks that a server accepts connections for a config.
/// Production code uses [`PgTester`]; tests inject stubs or mocks.
#[async_trait]
pub trait ConnectionTester: Send + Sync {
    /// Returns a short server description on success
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<String, ProbeError>;
}

/// Connects with sqlx and asks the server for its version
#[derive(Debug, Default, Clone, Copy)]
pub struct PgTester;

#[async_trait]
impl ConnectionTester for PgTester {
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<String, ProbeError> {
        let url = match config.connection_string() {
            Some(raw) => raw.to_string(),
            None => config
                .to_url()
                .map_err(|e| ProbeError::Connect(e.to_string()))?
                .to_string(),
        };

        let mut conn = PgConnection::connect(&url)
            .await
            .map_err(|e| ProbeError::Connect(e.to_string()))?;

        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&mut conn)
            .await
            .map_err(|e| ProbeError::Query(e.to_string()))?;

        if let Err(e) = conn.close().await {
            debug!(error = %e, "Error closing probe connection");
        }

        Ok(short_version(&version))
    }
}

/// `PostgreSQL 16.2 on x86_64-pc-linux-gnu, compiled by ...` becomes `PostgreSQL 16.2 on x86_64-pc-linux-gnu`
pub fn short_version(version: &str) -> String {
    match version.find(',') {
        Some(idx) if idx > 0 => version[..idx].to_string(),
        _ => version.to_string(),
    }
}

/// Run one probe against the request's management database.
///
/// Non-standard auth methods are not verified here since the wizard has no cloud
/// credentials, so they report a synthetic success without calling the tester.
///
/// A raw connection string is tested as typed: [`PgTester`] connects with the URI
/// verbatim, so for that form the check reaches the database named in the URI rather
/// than the management database.
pub async fn run_probe(
    tester: &dyn ConnectionTester,
    request: &ProbeRequest,
    limit: Duration,
) -> ProbeOutcome {
    let auth = request.config.auth_method;
    if !auth.is_standard() {
        return ProbeOutcome::Connected {
            info: format!("Configuration ready for {auth} authentication"),
        };
    }

    let target = request.config.with_database(&request.management_database);
    let result = match timeout(limit, tester.test_connection(&target)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(limit)),
    };

    match result {
        Ok(info) => ProbeOutcome::Connected { info },
        Err(e) => ProbeOutcome::Failed {
            error: e.to_string(),
        },
    }
}

/// Spawn the probe on the runtime; it reports back with exactly one `ProbeFinished`
pub fn spawn_probe(
    tester: Arc<dyn ConnectionTester>,
    request: ProbeRequest,
    limit: Duration,
    tx: UnboundedSender<WizardMsg>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            target_db = %request.config.target_label(),
            management_db = %request.management_database,
            "Probe started"
        );
        let outcome = run_probe(tester.as_ref(), &request, limit).await;
        if tx.send(WizardMsg::ProbeFinished(outcome)).is_err() {
            warn!("Wizard closed before probe finished");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthMethod;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Records the database it was asked to connect to
    #[derive(Default)]
    struct RecordingTester {
        calls: AtomicU32,
        seen_database: Mutex<Option<String>>,
    }

    #[async_trait]
    impl ConnectionTester for RecordingTester {
        async fn test_connection(&self, config: &ConnectionConfig) -> Result<String, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_database.lock().unwrap() = Some(config.database.clone());
            Ok("PostgreSQL 16.2".to_string())
        }
    }

    struct SlowTester;

    #[async_trait]
    impl ConnectionTester for SlowTester {
        async fn test_connection(&self, _config: &ConnectionConfig) -> Result<String, ProbeError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("never".to_string())
        }
    }

    struct FailingTester;

    #[async_trait]
    impl ConnectionTester for FailingTester {
        async fn test_connection(&self, _config: &ConnectionConfig) -> Result<String, ProbeError> {
            Err(ProbeError::Connect("connection refused".to_string()))
        }
    }

    fn request(auth_method: AuthMethod) -> ProbeRequest {
        ProbeRequest {
            config: ConnectionConfig {
                host: "localhost".to_string(),
                port: 5432,
                database: "app".to_string(),
                auth_method,
                ..ConnectionConfig::default()
            },
            management_database: "postgres".to_string(),
        }
    }

    #[tokio::test]
    async fn test_probe_targets_management_database() {
        let tester = RecordingTester::default();
        let outcome = run_probe(&tester, &request(AuthMethod::Standard), DEFAULT_PROBE_TIMEOUT).await;

        assert!(outcome.is_ok());
        assert_eq!(
            tester.seen_database.lock().unwrap().as_deref(),
            Some("postgres")
        );
    }

    #[tokio::test]
    async fn test_non_standard_auth_short_circuits() {
        let tester = RecordingTester::default();
        for method in [AuthMethod::AzureEntraId, AuthMethod::AwsIam, AuthMethod::GoogleIam] {
            let outcome = run_probe(&tester, &request(method), DEFAULT_PROBE_TIMEOUT).await;
            assert_eq!(
                outcome,
                ProbeOutcome::Connected {
                    info: format!("Configuration ready for {method} authentication")
                }
            );
        }
        assert_eq!(tester.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let outcome = run_probe(&SlowTester, &request(AuthMethod::Standard), Duration::from_millis(50)).await;
        let ProbeOutcome::Failed { error } = outcome else {
            panic!("expected failure");
        };
        assert!(error.contains("timed out"), "{error}");
    }

    #[tokio::test]
    async fn test_tester_error_becomes_failed_outcome() {
        let outcome = run_probe(&FailingTester, &request(AuthMethod::Standard), DEFAULT_PROBE_TIMEOUT).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Failed {
                error: "failed to connect: connection refused".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_spawn_probe_sends_exactly_one_message() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = spawn_probe(
            Arc::new(RecordingTester::default()),
            request(AuthMethod::Standard),
            DEFAULT_PROBE_TIMEOUT,
            tx,
        );
        handle.await.unwrap();

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, WizardMsg::ProbeFinished(ProbeOutcome::Connected { .. })));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_short_version_trims_at_first_comma() {
        assert_eq!(
            short_version("PostgreSQL 16.2 on x86_64-pc-linux-gnu, compiled by gcc"),
            "PostgreSQL 16.2 on x86_64-pc-linux-gnu"
        );
        assert_eq!(short_version("PostgreSQL 16.2"), "PostgreSQL 16.2");
        assert_eq!(short_version(",odd"), ",odd");
    }
}
