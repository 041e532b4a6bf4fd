//! Flow trait, registry, and shared store keys

pub mod auth;
pub mod users;

use crate::error::{ProbeError, Result};
use crate::http::ApiClient;
use crate::store::ConfigStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;

/// Store keys shared between flows
pub mod keys {
    /// Short-lived API credential, refreshed by login/register/refresh
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Long-lived credential used by logout and refresh
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Id of the account that registered/logged in
    pub const MY_USER_ID: &str = "my_user_id";
    /// Id of the user created for CRUD manipulation
    pub const TARGET_USER_ID: &str = "target_user_id";
}

/// Outcome of a single flow run
#[derive(Debug, Clone)]
pub struct FlowReport {
    /// Flow name
    pub flow: String,
    /// HTTP status of the one request this flow issued
    pub status: StatusCode,
    /// Whether the flow considers the run successful
    pub success: bool,
    /// Store keys persisted during this run
    pub saved_keys: Vec<String>,
}

impl FlowReport {
    /// Builds a report for a flow that persisted nothing
    pub fn new(flow: impl Into<String>, status: StatusCode) -> Self {
        Self {
            flow: flow.into(),
            success: status.is_success(),
            status,
            saved_keys: Vec::new(),
        }
    }

    /// Records a persisted store key
    pub fn with_saved(mut self, key: &str) -> Self {
        self.saved_keys.push(key.to_string());
        self
    }
}

/// Trait that every probe flow implements
///
/// A flow issues exactly one request: it reads its prerequisites from the
/// store, calls the API, and writes any derived state back.
#[async_trait]
pub trait Flow: Send + Sync {
    /// Returns the flow name (also the output file stem)
    fn name(&self) -> &str;

    /// Returns a description of the request this flow issues
    fn description(&self) -> &str;

    /// Executes the flow against the target API
    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport>;
}

/// Fetches a prerequisite key from the store, failing before any request
pub(crate) fn require<'a>(store: &'a ConfigStore, key: &str, hint: &str) -> Result<&'a str> {
    store
        .get(key)
        .ok_or_else(|| ProbeError::MissingState(format!("no {key} found. {hint}")))
}

/// Registry of all known flows
pub struct FlowEngine {
    flows: Vec<Arc<dyn Flow>>,
}

impl FlowEngine {
    /// Creates a new FlowEngine with no registered flows
    pub fn new() -> Self {
        Self { flows: Vec::new() }
    }

    /// Creates a FlowEngine with all default flows registered
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(auth::RegisterFlow::default()));
        engine.register(Arc::new(auth::LoginFlow::default()));
        engine.register(Arc::new(auth::LogoutFlow));
        engine.register(Arc::new(auth::RefreshFlow));
        engine.register(Arc::new(auth::ForgotPasswordFlow::default()));
        engine.register(Arc::new(auth::ResetPasswordFlow::default()));
        engine.register(Arc::new(auth::SendVerificationFlow));
        engine.register(Arc::new(auth::VerifyEmailFlow::default()));
        engine.register(Arc::new(users::CreateUserFlow::default()));
        engine.register(Arc::new(users::ListUsersFlow::default()));
        engine.register(Arc::new(users::GetUserFlow::default()));
        engine.register(Arc::new(users::UpdateUserFlow::default()));
        engine.register(Arc::new(users::DeleteUserFlow::default()));
        engine
    }

    /// Registers a new flow
    pub fn register(&mut self, flow: Arc<dyn Flow>) {
        self.flows.push(flow);
    }

    /// Returns information about all registered flows
    pub fn list_flows(&self) -> Vec<(&str, &str)> {
        self.flows
            .iter()
            .map(|f| (f.name(), f.description()))
            .collect()
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new()
    }
}
