//! User CRUD flows (admin endpoints)

use super::{keys, require, Flow, FlowReport};
use crate::error::{ProbeError, Result};
use crate::http::{bearer, ApiClient};
use crate::models::UserRecord;
use crate::store::ConfigStore;
use async_trait::async_trait;
use colored::Colorize;
use reqwest::Method;
use serde_json::{json, Map, Value};

fn print_header(action: &str) {
    println!("  {}", format!("--- {action} ---").cyan().bold());
}

fn print_success(message: &str) {
    println!("\n  {} {message}", "[SUCCESS]".green().bold());
}

fn print_failure(message: &str) {
    println!("\n  {} {message}", "[FAILED]".red().bold());
}

/// Resolves the user id a flow should operate on: an explicit CLI id wins,
/// otherwise fall back to the target id stored by `user-create`.
fn resolve_user_id(explicit: &Option<String>, store: &ConfigStore) -> Result<String> {
    if let Some(id) = explicit {
        return Ok(id.clone());
    }
    require(
        store,
        keys::TARGET_USER_ID,
        "Run user-create first or pass --id.",
    )
    .map(str::to_string)
}

/// Creates a user as admin and stores its id for later manipulation
#[derive(Debug, Clone)]
pub struct CreateUserFlow {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Default for CreateUserFlow {
    fn default() -> Self {
        Self {
            name: "Target User".to_string(),
            email: "target@example.com".to_string(),
            password: "password123".to_string(),
            role: "user".to_string(),
        }
    }
}

#[async_trait]
impl Flow for CreateUserFlow {
    fn name(&self) -> &str {
        "user-create"
    }

    fn description(&self) -> &str {
        "POST /users (admin), persists the new user id"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let access_token = require(store, keys::ACCESS_TOKEN, "Run login first.")?.to_string();

        print_header("Creating New User (by Admin)");

        let body = json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
            "role": self.role,
        });
        let exchange = client
            .send(
                Method::POST,
                client.url("users")?,
                &[bearer(&access_token)],
                Some(&body),
                self.name(),
            )
            .await?;

        if exchange.status.as_u16() == 201 {
            let user: UserRecord = exchange.parse()?;
            store.set(keys::TARGET_USER_ID, user.id.to_string())?;
            print_success(&format!("Created User ID: {}", user.id));
            Ok(FlowReport::new(self.name(), exchange.status).with_saved(keys::TARGET_USER_ID))
        } else {
            print_failure("Could not create user.");
            Ok(FlowReport::new(self.name(), exchange.status))
        }
    }
}

/// Lists users with pagination
#[derive(Debug, Clone)]
pub struct ListUsersFlow {
    pub limit: u32,
    pub page: u32,
    pub sort_by: Option<String>,
}

impl Default for ListUsersFlow {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 1,
            sort_by: None,
        }
    }
}

#[async_trait]
impl Flow for ListUsersFlow {
    fn name(&self) -> &str {
        "user-list"
    }

    fn description(&self) -> &str {
        "GET /users?limit=&page= (authenticated)"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let access_token = require(store, keys::ACCESS_TOKEN, "Run login first.")?.to_string();

        print_header("Getting All Users");

        let limit = self.limit.to_string();
        let page = self.page.to_string();
        let mut params = vec![("limit", limit.as_str()), ("page", page.as_str())];
        if let Some(ref sort_by) = self.sort_by {
            params.push(("sortBy", sort_by.as_str()));
        }
        let url = client.url_with("users", &params)?;

        let exchange = client
            .send(Method::GET, url, &[bearer(&access_token)], None, self.name())
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Fetches a single user by id
#[derive(Debug, Clone, Default)]
pub struct GetUserFlow {
    pub id: Option<String>,
}

#[async_trait]
impl Flow for GetUserFlow {
    fn name(&self) -> &str {
        "user-get"
    }

    fn description(&self) -> &str {
        "GET /users/{id} (authenticated)"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let access_token = require(store, keys::ACCESS_TOKEN, "Run login first.")?.to_string();
        let user_id = resolve_user_id(&self.id, store)?;

        print_header(&format!("Getting User ID: {user_id}"));

        let exchange = client
            .send(
                Method::GET,
                client.url(&format!("users/{user_id}"))?,
                &[bearer(&access_token)],
                None,
                self.name(),
            )
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Partially updates a user
#[derive(Debug, Clone)]
pub struct UpdateUserFlow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Default for UpdateUserFlow {
    fn default() -> Self {
        Self {
            id: None,
            name: Some("Updated Target Name".to_string()),
            email: None,
            password: None,
        }
    }
}

#[async_trait]
impl Flow for UpdateUserFlow {
    fn name(&self) -> &str {
        "user-update"
    }

    fn description(&self) -> &str {
        "PATCH /users/{id} with the provided fields"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let access_token = require(store, keys::ACCESS_TOKEN, "Run login first.")?.to_string();
        let user_id = resolve_user_id(&self.id, store)?;

        let mut fields = Map::new();
        if let Some(ref name) = self.name {
            fields.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(ref email) = self.email {
            fields.insert("email".to_string(), Value::String(email.clone()));
        }
        if let Some(ref password) = self.password {
            fields.insert("password".to_string(), Value::String(password.clone()));
        }
        if fields.is_empty() {
            return Err(ProbeError::Config(
                "user-update needs at least one of --name, --email, --password".to_string(),
            ));
        }

        print_header(&format!("Updating User ID: {user_id}"));

        let exchange = client
            .send(
                Method::PATCH,
                client.url(&format!("users/{user_id}"))?,
                &[bearer(&access_token)],
                Some(&Value::Object(fields)),
                self.name(),
            )
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}

/// Deletes a user
#[derive(Debug, Clone, Default)]
pub struct DeleteUserFlow {
    pub id: Option<String>,
}

#[async_trait]
impl Flow for DeleteUserFlow {
    fn name(&self) -> &str {
        "user-delete"
    }

    fn description(&self) -> &str {
        "DELETE /users/{id} (authenticated)"
    }

    async fn run(&self, client: &ApiClient, store: &mut ConfigStore) -> Result<FlowReport> {
        let access_token = require(store, keys::ACCESS_TOKEN, "Run login first.")?.to_string();
        let user_id = resolve_user_id(&self.id, store)?;

        print_header(&format!("Deleting User ID: {user_id}"));

        let exchange = client
            .send(
                Method::DELETE,
                client.url(&format!("users/{user_id}"))?,
                &[bearer(&access_token)],
                None,
                self.name(),
            )
            .await?;

        Ok(FlowReport::new(self.name(), exchange.status))
    }
}
