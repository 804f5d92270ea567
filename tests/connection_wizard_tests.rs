// ABOUTME: End-to-end connection wizard flows driven by key events with a mocked connection tester

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockall::mock;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use pgmi_wizard::app::EventHandler;
use pgmi_wizard::components::connection_wizard::{
    ConnectionTester, ConnectionWizard, FormVariant, ProbeError, ProbeOutcome, ProbeStatus,
    WizardMsg, WizardStep,
};
use pgmi_wizard::models::{AuthMethod, ConnectionConfig};

mock! {
    pub Tester {}

    #[async_trait]
    impl ConnectionTester for Tester {
        async fn test_connection(&self, config: &ConnectionConfig) -> Result<String, ProbeError>;
    }
}

/// Drives a ConnectionWizard the way the runtime loop does
struct WizardHarness {
    wizard: ConnectionWizard,
    events: EventHandler,
}

impl WizardHarness {
    fn new(tester: impl ConnectionTester + 'static) -> Self {
        Self::with_timeout(tester, Duration::from_secs(5))
    }

    fn with_timeout(tester: impl ConnectionTester + 'static, limit: Duration) -> Self {
        let events = EventHandler::detached();
        let wizard = ConnectionWizard::new(Arc::new(tester), limit, events.sender());
        Self { wizard, events }
    }

    fn press(&mut self, code: KeyCode) -> bool {
        self.wizard
            .handle(WizardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl_c(&mut self) -> bool {
        self.wizard.handle(WizardMsg::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Wait for the probe to report back and feed the result to the wizard
    async fn finish_probe(&mut self) {
        let msg = timeout(Duration::from_secs(5), self.events.next())
            .await
            .expect("probe did not report back")
            .expect("channel closed");
        assert!(matches!(msg, WizardMsg::ProbeFinished(_)), "unexpected message {msg:?}");
        self.wizard.handle(msg);
    }

    fn step(&self) -> WizardStep {
        self.wizard.state().step()
    }
}

/// Local provider, database "app", submit with defaults everywhere else
fn fill_local_form(h: &mut WizardHarness) {
    h.press(KeyCode::Enter);
    assert_eq!(h.step(), WizardStep::InputForm(FormVariant::Host));
    h.press(KeyCode::Tab);
    h.press(KeyCode::Tab);
    h.type_str("app");
    // Enter walks to the last field, then submits
    for _ in 0..4 {
        h.press(KeyCode::Enter);
    }
}

#[tokio::test]
async fn test_successful_local_connection() {
    let mut tester = MockTester::new();
    tester
        .expect_test_connection()
        .withf(|config| {
            config.database == "postgres" && config.host == "localhost" && config.port == 5432
        })
        .times(1)
        .returning(|_| Ok("PostgreSQL 16.2".to_string()));

    let mut h = WizardHarness::new(tester);
    fill_local_form(&mut h);
    assert_eq!(h.step(), WizardStep::TestConnection);
    assert!(h.wizard.state().is_testing());

    h.finish_probe().await;
    assert_eq!(h.wizard.state().test_ok(), Some(true));
    assert_eq!(
        h.wizard.state().probe(),
        &ProbeStatus::Finished(ProbeOutcome::Connected {
            info: "PostgreSQL 16.2".to_string()
        })
    );

    assert!(h.press(KeyCode::Enter));
    let result = h.wizard.into_result();
    assert!(!result.cancelled);
    assert!(result.tested);
    assert_eq!(result.config.database, "app");
    assert_eq!(result.config.username, "postgres");
    assert_eq!(result.config.auth_method, AuthMethod::Standard);
    assert_eq!(result.management_database, "postgres");
}

#[tokio::test]
async fn test_probe_uses_typed_management_database() {
    let mut tester = MockTester::new();
    tester
        .expect_test_connection()
        .withf(|config| config.database == "admin")
        .times(1)
        .returning(|_| Ok("PostgreSQL 15.4".to_string()));

    let mut h = WizardHarness::new(tester);
    h.press(KeyCode::Enter);
    h.press(KeyCode::Tab);
    h.press(KeyCode::Tab);
    h.type_str("app");
    h.press(KeyCode::Tab);
    // Replace the default management database
    for _ in 0.."postgres".len() {
        h.press(KeyCode::Backspace);
    }
    h.type_str("admin");
    for _ in 0..3 {
        h.press(KeyCode::Enter);
    }

    h.finish_probe().await;
    assert_eq!(h.wizard.state().test_ok(), Some(true));
    assert_eq!(h.wizard.state().result().management_database, "admin");
    assert_eq!(h.wizard.state().result().config.database, "app");
}

#[tokio::test]
async fn test_failed_probe_returns_to_fresh_form() {
    let mut tester = MockTester::new();
    tester
        .expect_test_connection()
        .times(1)
        .returning(|_| Err(ProbeError::Connect("connection refused".to_string())));

    let mut h = WizardHarness::new(tester);
    fill_local_form(&mut h);
    h.finish_probe().await;

    assert_eq!(h.wizard.state().test_ok(), Some(false));
    match h.wizard.state().probe() {
        ProbeStatus::Finished(ProbeOutcome::Failed { error }) => {
            assert!(error.contains("connection refused"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    assert!(!h.press(KeyCode::Enter));
    assert_eq!(h.step(), WizardStep::InputForm(FormVariant::Host));
    assert_eq!(h.wizard.state().inputs().value(2), "");
    assert_eq!(h.wizard.state().focus_index(), 0);
    assert_eq!(h.wizard.state().probe(), &ProbeStatus::Idle);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    struct Hanging;

    #[async_trait]
    impl ConnectionTester for Hanging {
        async fn test_connection(&self, _config: &ConnectionConfig) -> Result<String, ProbeError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("never".to_string())
        }
    }

    let mut h = WizardHarness::with_timeout(Hanging, Duration::from_millis(50));
    fill_local_form(&mut h);
    h.finish_probe().await;

    match h.wizard.state().probe() {
        ProbeStatus::Finished(ProbeOutcome::Failed { error }) => {
            assert!(error.contains("timed out"));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_keys_ignored_while_probe_runs_and_cancel_aborts_it() {
    struct Slow;

    #[async_trait]
    impl ConnectionTester for Slow {
        async fn test_connection(&self, _config: &ConnectionConfig) -> Result<String, ProbeError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("late".to_string())
        }
    }

    let mut h = WizardHarness::new(Slow);
    fill_local_form(&mut h);
    assert!(h.wizard.is_probe_in_flight());

    assert!(!h.press(KeyCode::Enter));
    assert!(!h.press(KeyCode::Esc));
    assert_eq!(h.step(), WizardStep::TestConnection);
    assert!(h.wizard.state().is_testing());

    assert!(h.ctrl_c());
    assert!(!h.wizard.is_probe_in_flight());
    let result = h.wizard.into_result();
    assert!(result.cancelled);
    assert!(!result.tested);
}

#[tokio::test]
async fn test_cloud_iam_never_calls_tester() {
    let mut tester = MockTester::new();
    tester.expect_test_connection().never();

    let mut h = WizardHarness::new(tester);
    h.press(KeyCode::Down);
    h.press(KeyCode::Enter);
    assert_eq!(h.step(), WizardStep::SelectAuth);
    h.press(KeyCode::Enter);
    assert_eq!(h.step(), WizardStep::InputForm(FormVariant::AzureEntra));

    h.type_str("srv.postgres.database.azure.com");
    h.press(KeyCode::Tab);
    h.type_str("app");
    h.press(KeyCode::Tab);
    h.type_str("me@srv");
    h.press(KeyCode::Enter);

    h.finish_probe().await;
    assert_eq!(h.wizard.state().test_ok(), Some(true));
    assert!(h.press(KeyCode::Enter));

    let result = h.wizard.into_result();
    assert_eq!(result.config.auth_method, AuthMethod::AzureEntraId);
    assert_eq!(result.config.ssl_mode, "require");
    assert_eq!(result.config.host, "srv.postgres.database.azure.com");
    assert!(result.tested);
}

#[tokio::test]
async fn test_connection_string_reaches_tester_unchanged() {
    const URI: &str = "postgresql://u:p@db.example.com:5432/app";

    let mut tester = MockTester::new();
    tester
        .expect_test_connection()
        .withf(|config| config.connection_string() == Some(URI))
        .times(1)
        .returning(|_| Ok("PostgreSQL 16.1".to_string()));

    let mut h = WizardHarness::new(tester);
    for _ in 0..4 {
        h.press(KeyCode::Down);
    }
    h.press(KeyCode::Enter);
    assert_eq!(h.step(), WizardStep::InputForm(FormVariant::ConnectionString));

    h.type_str(URI);
    h.press(KeyCode::Enter);
    h.finish_probe().await;
    assert_eq!(h.wizard.state().test_ok(), Some(true));
}

#[tokio::test]
async fn test_empty_database_blocks_submission() {
    let mut tester = MockTester::new();
    tester.expect_test_connection().never();

    let mut h = WizardHarness::new(tester);
    h.press(KeyCode::Enter);
    for _ in 0..6 {
        h.press(KeyCode::Enter);
    }

    assert_eq!(h.step(), WizardStep::InputForm(FormVariant::Host));
    assert!(h.wizard.state().validation_error().is_some());
    assert!(!h.wizard.is_probe_in_flight());

    h.press(KeyCode::Char('x'));
    assert!(h.wizard.state().validation_error().is_none());
}

#[tokio::test]
async fn test_escape_from_form_goes_back_by_provider_shape() {
    let mut h = WizardHarness::new(MockTester::new());

    // Multi-auth provider returns to the auth list
    h.press(KeyCode::Down);
    h.press(KeyCode::Down);
    h.press(KeyCode::Enter);
    h.press(KeyCode::Enter);
    assert_eq!(h.step(), WizardStep::InputForm(FormVariant::AwsIam));
    h.type_str("mydb.rds.amazonaws.com");
    h.press(KeyCode::Esc);
    assert_eq!(h.step(), WizardStep::SelectAuth);

    // Entering again starts from empty fields
    h.press(KeyCode::Enter);
    assert_eq!(h.wizard.state().inputs().value(0), "");

    h.press(KeyCode::Esc);
    h.press(KeyCode::Esc);
    assert_eq!(h.step(), WizardStep::SelectProvider);
}
