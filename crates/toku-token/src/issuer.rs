//! Token issuance for authenticated principals.
//!
//! The issuer is the only place the signing secret is used. It checks, in
//! order, that both credentials are configured and that a principal is
//! signed in, then builds a fresh signing client and mints a token whose
//! validity window follows the configured policy. Each call is independent:
//! nothing is cached, stored, or retried.

use crate::claims::TokenWindow;
use crate::client::{SigningClient, SigningClientFactory, StreamClientFactory};
use crate::error::{IssueError, SignerError};
use chrono::{DateTime, Utc};
use std::time::Duration;
use toku_core::{ApiCredentials, Principal, TokuConfig};

/// Subject used for credential self-tests.
pub const PROBE_USER_ID: &str = "test-user";

/// Validity of a self-test token.
const PROBE_VALIDITY_SECS: i64 = 60 * 60;

/// Everything the issuer needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub credentials: ApiCredentials,
    pub validity: Duration,
}

impl IssuerConfig {
    pub fn new(credentials: ApiCredentials, validity: Duration) -> Self {
        Self {
            credentials,
            validity,
        }
    }

    /// Resolve credentials from the environment and take the validity
    /// window from `config`.
    pub fn from_config(config: &TokuConfig) -> Result<Self, std::io::Error> {
        Ok(Self::new(
            config.stream.resolve_credentials()?,
            config.token.validity,
        ))
    }
}

/// Mints Stream access tokens for signed-in principals.
pub struct TokenIssuer<F = StreamClientFactory> {
    config: IssuerConfig,
    factory: F,
}

impl TokenIssuer {
    /// Create an issuer that signs with [`crate::StreamClient`].
    pub fn new(config: IssuerConfig) -> Self {
        Self::with_factory(config, StreamClientFactory)
    }
}

impl<F: SigningClientFactory> TokenIssuer<F> {
    /// Create an issuer with a custom signing client factory.
    pub fn with_factory(config: IssuerConfig, factory: F) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Issue a token for `principal` as of now.
    pub fn issue(&self, principal: Option<&Principal>) -> Result<String, IssueError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token for `principal` as if generated at `now`.
    ///
    /// Failures are logged once here, with their kind, and returned
    /// unchanged.
    pub fn issue_at(
        &self,
        principal: Option<&Principal>,
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        self.try_issue(principal, now).inspect_err(|err| {
            log_failure(err);
        })
    }

    /// Mint a one-hour token for [`PROBE_USER_ID`] to check that the
    /// configured credentials can sign. The token carries no issued-at
    /// claim.
    pub fn probe(&self) -> Result<String, IssueError> {
        self.try_probe(Utc::now()).inspect_err(|err| {
            log_failure(err);
        })
    }

    fn try_issue(
        &self,
        principal: Option<&Principal>,
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        tracing::debug!("starting token generation");
        self.require_credentials()?;

        let user_id = match principal {
            Some(p) if p.is_valid() => p.id.as_str(),
            _ => return Err(IssueError::AuthenticationRequired),
        };

        let client = self.connect()?;
        let window = TokenWindow::starting_at(now, self.config.validity);
        let token = client
            .create_token(user_id, Some(window.expires_at), Some(window.issued_at))
            .map_err(IssueError::Signing)?;
        if token.is_empty() {
            return Err(IssueError::Signing(SignerError::EmptyToken));
        }

        tracing::info!(
            user_id,
            validity_secs = window.length_secs(),
            "token generated"
        );
        Ok(token)
    }

    fn try_probe(&self, now: DateTime<Utc>) -> Result<String, IssueError> {
        self.require_credentials()?;
        let client = self.connect()?;
        let token = client
            .create_token(PROBE_USER_ID, Some(now.timestamp() + PROBE_VALIDITY_SECS), None)
            .map_err(IssueError::Signing)?;
        if token.is_empty() {
            return Err(IssueError::Signing(SignerError::EmptyToken));
        }
        Ok(token)
    }

    fn require_credentials(&self) -> Result<(), IssueError> {
        let status = self.config.credentials.status();
        if status.config_complete {
            Ok(())
        } else {
            Err(IssueError::CredentialsMissing {
                api_key_present: status.api_key_exists,
                api_secret_present: status.api_secret_exists,
            })
        }
    }

    fn connect(&self) -> Result<F::Client, IssueError> {
        let credentials = &self.config.credentials;
        self.factory
            .connect(credentials.api_key(), credentials.api_secret())
            .map_err(IssueError::Signing)
    }
}

fn log_failure(err: &IssueError) {
    match err {
        IssueError::CredentialsMissing {
            api_key_present,
            api_secret_present,
        } => tracing::error!(
            kind = err.kind().as_str(),
            api_key_present,
            api_secret_present,
            "token generation failed: {err}"
        ),
        _ => tracing::error!(kind = err.kind().as_str(), "token generation failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::token::TokenVerifier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    const HOUR: Duration = Duration::from_secs(3600);

    fn config(api_key: &str, api_secret: &str) -> IssuerConfig {
        IssuerConfig::new(ApiCredentials::new(api_key, api_secret), HOUR)
    }

    fn user() -> Principal {
        Principal::new("user_2abc")
    }

    #[derive(Clone, Copy)]
    enum Behaviour {
        Sign,
        Fail,
        Empty,
        ConnectFail,
    }

    type Call = (String, Option<i64>, Option<i64>);

    /// Factory whose clients record every signing call.
    struct MockFactory {
        behaviour: Behaviour,
        connects: AtomicUsize,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl MockFactory {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                connects: AtomicUsize::new(0),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    struct MockClient {
        behaviour: Behaviour,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl SigningClientFactory for MockFactory {
        type Client = MockClient;

        fn connect(&self, _api_key: &str, _api_secret: &str) -> Result<MockClient, SignerError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if let Behaviour::ConnectFail = self.behaviour {
                return Err(SignerError::InvalidSecret("unreachable".to_string()));
            }
            Ok(MockClient {
                behaviour: self.behaviour,
                calls: self.calls.clone(),
            })
        }
    }

    impl SigningClient for MockClient {
        fn create_token(
            &self,
            user_id: &str,
            expires_at: Option<i64>,
            issued_at: Option<i64>,
        ) -> Result<String, SignerError> {
            self.calls
                .lock()
                .unwrap()
                .push((user_id.to_string(), expires_at, issued_at));
            match self.behaviour {
                Behaviour::Sign => Ok(format!("token-for-{user_id}")),
                Behaviour::Fail => Err(SignerError::InvalidSecret("rejected".to_string())),
                Behaviour::Empty | Behaviour::ConnectFail => Ok(String::new()),
            }
        }
    }

    fn mock_issuer(
        api_key: &str,
        api_secret: &str,
        behaviour: Behaviour,
    ) -> TokenIssuer<MockFactory> {
        TokenIssuer::with_factory(config(api_key, api_secret), MockFactory::new(behaviour))
    }

    /// Counts ERROR-level events.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_errors<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let counter = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(counter.clone()));
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, counter.load(Ordering::SeqCst))
    }

    #[test]
    fn test_issues_verifiable_token() {
        let issuer = TokenIssuer::new(config("key", "secret"));
        let token = issuer.issue(Some(&user())).unwrap();
        assert!(!token.is_empty());

        let verified = TokenVerifier::new("secret").unwrap().verify(&token).unwrap();
        assert_eq!(verified.user_id, "user_2abc");
        assert_eq!(verified.validity_secs(), Some(3600));
    }

    #[test]
    fn test_missing_credentials_skip_signing() {
        for (key, secret) in [("", "secret"), ("key", ""), ("", "")] {
            let issuer = mock_issuer(key, secret, Behaviour::Sign);
            let err = issuer.issue(Some(&user())).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert_eq!(err.to_string(), "Stream API credentials missing.");
            assert_eq!(issuer.factory.connects.load(Ordering::SeqCst), 0);
            assert!(issuer.factory.calls.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn test_configuration_checked_before_principal() {
        let issuer = mock_issuer("", "", Behaviour::Sign);
        let err = issuer.issue(None).unwrap_err();
        assert!(matches!(
            err,
            IssueError::CredentialsMissing {
                api_key_present: false,
                api_secret_present: false,
            }
        ));
    }

    #[test]
    fn test_unauthenticated_skips_signing() {
        let issuer = mock_issuer("key", "secret", Behaviour::Sign);

        for principal in [None, Some(Principal::new(""))] {
            let err = issuer.issue(principal.as_ref()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authentication);
            assert_eq!(err.to_string(), "Authentication required. Please sign in again.");
        }
        assert_eq!(issuer.factory.connects.load(Ordering::SeqCst), 0);
        assert!(issuer.factory.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_window_matches_policy() {
        let issuer = mock_issuer("key", "secret", Behaviour::Sign);
        let call_time = Utc::now().timestamp();
        issuer.issue(Some(&user())).unwrap();

        let calls = issuer.factory.calls.lock().unwrap();
        let (subject, expires_at, issued_at) = calls[0].clone();
        let (expires_at, issued_at) = (expires_at.unwrap(), issued_at.unwrap());

        assert_eq!(subject, "user_2abc");
        assert_eq!(expires_at - issued_at, 3600);
        assert!(issued_at <= call_time - 59);
        assert!(issued_at >= call_time - 61);
    }

    #[test]
    fn test_extended_window() {
        let mut cfg = config("key", "secret");
        cfg.validity = Duration::from_secs(24 * 3600);
        let issuer = TokenIssuer::with_factory(cfg, MockFactory::new(Behaviour::Sign));
        issuer.issue(Some(&user())).unwrap();

        let calls = issuer.factory.calls.lock().unwrap();
        let (expires_at, issued_at) = (calls[0].1.unwrap(), calls[0].2.unwrap());
        assert_eq!(expires_at - issued_at, 86_400);
    }

    #[test]
    fn test_fresh_token_per_call() {
        let issuer = TokenIssuer::new(config("key", "secret"));
        let now = Utc::now();
        let first = issuer.issue_at(Some(&user()), now).unwrap();
        let second = issuer
            .issue_at(Some(&user()), now + chrono::Duration::seconds(1))
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_client_built_per_call() {
        let issuer = mock_issuer("key", "secret", Behaviour::Sign);
        issuer.issue(Some(&user())).unwrap();
        issuer.issue(Some(&user())).unwrap();
        assert_eq!(issuer.factory.connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_signer_failure_wraps_cause_and_logs_once() {
        let issuer = mock_issuer("key", "secret", Behaviour::Fail);
        let (result, errors) = count_errors(|| issuer.issue(Some(&user())));

        let err = result.unwrap_err();
        let cause = SignerError::InvalidSecret("rejected".to_string()).to_string();
        assert_eq!(err.kind(), ErrorKind::Signing);
        assert_ne!(err.to_string(), cause);
        assert!(err.to_string().contains(&cause));
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_connect_failure_is_signing_error() {
        let issuer = mock_issuer("key", "secret", Behaviour::ConnectFail);
        let (result, errors) = count_errors(|| issuer.issue(Some(&user())));

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signing);
        assert!(matches!(err, IssueError::Signing(SignerError::InvalidSecret(_))));
        assert_eq!(issuer.factory.connects.load(Ordering::SeqCst), 1);
        assert!(issuer.factory.calls.lock().unwrap().is_empty());
        assert_eq!(errors, 1);

        let (result, errors) = count_errors(|| issuer.probe());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Signing);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_empty_token_is_signing_error() {
        let issuer = mock_issuer("key", "secret", Behaviour::Empty);
        let (result, errors) = count_errors(|| issuer.issue(Some(&user())));

        assert!(matches!(result, Err(IssueError::Signing(SignerError::EmptyToken))));
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_every_failure_logged_once() {
        let unconfigured = mock_issuer("", "", Behaviour::Sign);
        let (_, errors) = count_errors(|| unconfigured.issue(Some(&user())));
        assert_eq!(errors, 1);

        let configured = mock_issuer("key", "secret", Behaviour::Sign);
        let (_, errors) = count_errors(|| configured.issue(None));
        assert_eq!(errors, 1);

        let (_, errors) = count_errors(|| configured.issue(Some(&user())));
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_probe_token() {
        let issuer = TokenIssuer::new(config("key", "secret"));
        let token = issuer.probe().unwrap();

        let verified = TokenVerifier::new("secret").unwrap().verify(&token).unwrap();
        assert_eq!(verified.user_id, PROBE_USER_ID);
        assert_eq!(verified.issued_at, None);
        assert!(verified.expires_at.is_some());
    }

    #[test]
    fn test_probe_requires_credentials() {
        let issuer = TokenIssuer::new(config("key", ""));
        let err = issuer.probe().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
