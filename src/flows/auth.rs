//! Authentication flows: register, login, logout, token refresh,
//! password reset, and email verification

use super::{keys, require, Flow, FlowReport};
use crate::error::Result;
use crate::http::{bearer, ApiClient};
use crate::models::{AuthEnvelope, TokenPair};
use crate::store::ConfigStore;
use async_trait::async_trait;
use colored::Colorize;
use reqwest::Method;
use serde_json::json;

fn print_header(action: &str) {
    println!("  {}", format!("--- {action} ---").cyan().bold());
}

fn print_success(message: &str) {
    println!("\n  {} {message}", "[SUCCESS]".green().bold());
}

fn print_failure(message: &str) {
    println!("\n  {} {message}", "[FAILED]".red().bold());
}

/// Persists both tokens and the caller's user id from an auth envelope
fn save_session(store: &mut ConfigStore, envelope: &AuthEnvelope) -> Result<()> {
    store.set(keys::ACCESS_TOKEN, envelope.tokens.access.token.as_str())?;
    store.set(keys::REFRESH_TOKEN, envelope.tokens.refresh.token.as_str())?;
    store.set(keys::MY_USER_ID, envelope.user.id.to_string())?;
    Ok(())
}

/// Registers a new account and captures the issued token pair
#[derive(Debug, Clone)]
pub struct RegisterFlow {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for RegisterFlow {
    fn default() -> Self {
        Self {
            name: "User Example".to_string(),
            email: "user.example@example.com".to_string(),
            password: "password123".to_string(),
        }
    }
}

#[async_trait]
impl Flow for RegisterFlow {
    fn name(&self) -> &str {
        "register"
    }

    fn description(&self) -> &str {
        "POST /auth/register, persists access/refresh tokens and user id"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        print_header(&format!("Registering User: {}", self.email));

        let body = json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
        });
        let exchange = client
            .send(
                Method::POST,
                client.url("auth/register")?,
                &[],
                Some(&body),
                self.name(),
            )
            .await?;

        if exchange.status.as_u16() == 201 {
            let envelope: AuthEnvelope = exchange.parse()?;
            save_session(store, &envelope)?;
            print_success("User registered and tokens saved.");
            Ok(FlowReport::new(self.name(), exchange.status)
                .with_saved(keys::ACCESS_TOKEN)
                .with_saved(keys::REFRESH_TOKEN)
                .with_saved(keys::MY_USER_ID))
        } else {
            print_failure("Registration failed.");
            Ok(FlowReport::new(self.name(), exchange.status))
        }
    }
}

/// Logs in and overwrites any previously stored token pair
#[derive(Debug, Clone)]
pub struct LoginFlow {
    pub email: String,
    pub password: String,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: "password123".to_string(),
        }
    }
}

#[async_trait]
impl Flow for LoginFlow {
    fn name(&self) -> &str {
        "login"
    }

    fn description(&self) -> &str {
        "POST /auth/login, persists access/refresh tokens and user id"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        print_header(&format!("Logging in User: {}", self.email));

        let body = json!({
            "email": self.email,
            "password": self.password,
        });
        let exchange = client
            .send(
                Method::POST,
                client.url("auth/login")?,
                &[],
                Some(&body),
                self.name(),
            )
            .await?;

        if exchange.is_success() {
            let envelope: AuthEnvelope = exchange.parse()?;
            save_session(store, &envelope)?;
            print_success("Login successful. Tokens updated.");
            Ok(FlowReport::new(self.name(), exchange.status)
                .with_saved(keys::ACCESS_TOKEN)
                .with_saved(keys::REFRESH_TOKEN)
                .with_saved(keys::MY_USER_ID))
        } else {
            print_failure("Login failed.");
            Ok(FlowReport::new(self.name(), exchange.status))
        }
    }
}

/// Invalidates the stored refresh token server-side
#[derive(Debug, Clone, Default)]
pub struct LogoutFlow;

#[async_trait]
impl Flow for LogoutFlow {
    fn name(&self) -> &str {
        "logout"
    }

    fn description(&self) -> &str {
        "POST /auth/logout with the stored refresh token"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let refresh_token =
            require(store, keys::REFRESH_TOKEN, "Run login or register first.")?.to_string();

        print_header("Logging Out");

        let body = json!({ "refreshToken": refresh_token });
        let exchange = client
            .send(
                Method::POST,
                client.url("auth/logout")?,
                &[],
                Some(&body),
                self.name(),
            )
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Exchanges the stored refresh token for a fresh token pair
#[derive(Debug, Clone, Default)]
pub struct RefreshFlow;

#[async_trait]
impl Flow for RefreshFlow {
    fn name(&self) -> &str {
        "refresh"
    }

    fn description(&self) -> &str {
        "POST /auth/refresh-tokens, persists the new token pair"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let refresh_token =
            require(store, keys::REFRESH_TOKEN, "Run login or register first.")?.to_string();

        print_header("Refreshing Tokens");

        let body = json!({ "refreshToken": refresh_token });
        let exchange = client
            .send(
                Method::POST,
                client.url("auth/refresh-tokens")?,
                &[],
                Some(&body),
                self.name(),
            )
            .await?;

        if exchange.is_success() {
            // Refresh responses carry the pair at the top level, unlike
            // register/login which nest it under "tokens".
            let pair: TokenPair = exchange.parse()?;
            store.set(keys::ACCESS_TOKEN, pair.access.token.as_str())?;
            store.set(keys::REFRESH_TOKEN, pair.refresh.token.as_str())?;
            print_success("Tokens refreshed and saved.");
            Ok(FlowReport::new(self.name(), exchange.status)
                .with_saved(keys::ACCESS_TOKEN)
                .with_saved(keys::REFRESH_TOKEN))
        } else {
            print_failure("Refresh failed.");
            Ok(FlowReport::new(self.name(), exchange.status))
        }
    }
}

/// Requests a password-reset email for an account
#[derive(Debug, Clone)]
pub struct ForgotPasswordFlow {
    pub email: String,
}

impl Default for ForgotPasswordFlow {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
        }
    }
}

#[async_trait]
impl Flow for ForgotPasswordFlow {
    fn name(&self) -> &str {
        "forgot-password"
    }

    fn description(&self) -> &str {
        "POST /auth/forgot-password for the given email"
    }

    async fn run(&self, client: &ApiClient, _store: &mut ConfigStore) -> Result<FlowReport> {
        print_header(&format!("Requesting Password Reset for {}", self.email));

        let body = json!({ "email": self.email });
        let exchange = client
            .send(
                Method::POST,
                client.url("auth/forgot-password")?,
                &[],
                Some(&body),
                self.name(),
            )
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Sets a new password using a reset token from the email channel
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordFlow {
    /// Reset token delivered out of band (email link)
    pub token: String,
    pub password: String,
}

#[async_trait]
impl Flow for ResetPasswordFlow {
    fn name(&self) -> &str {
        "reset-password"
    }

    fn description(&self) -> &str {
        "POST /auth/reset-password?token= with a new password"
    }

    async fn run(&self, client: &ApiClient, _store: &mut ConfigStore) -> Result<FlowReport> {
        print_header("Resetting Password");

        let url = client.url_with("auth/reset-password", &[("token", &self.token)])?;
        let body = json!({ "password": self.password });
        let exchange = client
            .send(Method::POST, url, &[], Some(&body), self.name())
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Asks the API to send a verification email to the logged-in account
#[derive(Debug, Clone, Default)]
pub struct SendVerificationFlow;

#[async_trait]
impl Flow for SendVerificationFlow {
    fn name(&self) -> &str {
        "send-verification"
    }

    fn description(&self) -> &str {
        "POST /auth/send-verification-email (authenticated)"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let access_token = require(store, keys::ACCESS_TOKEN, "Run login first.")?.to_string();

        print_header("Sending Verification Email");

        let exchange = client
            .send(
                Method::POST,
                client.url("auth/send-verification-email")?,
                &[bearer(&access_token)],
                None,
                self.name(),
            )
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Confirms an email address using a verification token
#[derive(Debug, Clone, Default)]
pub struct VerifyEmailFlow {
    /// Verification token delivered out of band (email link)
    pub token: String,
}

#[async_trait]
impl Flow for VerifyEmailFlow {
    fn name(&self) -> &str {
        "verify-email"
    }

    fn description(&self) -> &str {
        "POST /auth/verify-email?token="
    }

    async fn run(&self, client: &ApiClient, _store: &mut ConfigStore) -> Result<FlowReport> {
        print_header("Verifying Email");

        let url = client.url_with("auth/verify-email", &[("token", &self.token)])?;
        let exchange = client
            .send(Method::POST, url, &[], None, self.name())
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}
