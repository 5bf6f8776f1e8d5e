use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use email_address::EmailAddress;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Request to provision a login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub user_type: String,
    pub send_welcome_email: bool,
    pub roles: Vec<String>,
}

/// A provisioned login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account key. The directory keys accounts by email address.
    pub name: String,
    pub email: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub user_type: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}

/// Account directory the student lifecycle provisions into.
///
/// Role assignment and the welcome-email request are folded into account
/// creation; the whole call either persists a complete account or fails.
#[async_trait]
pub trait UserAccountService: Send + Sync {
    /// Create and persist a new account. Queues a welcome email when the
    /// request asks for one.
    async fn create_account(&self, account: NewAccount) -> AppResult<UserAccount>;

    /// Start a password-reset flow for an account; returns the reset link.
    async fn reset_password(&self, name: &str) -> AppResult<String>;
}

#[derive(Debug, Default)]
struct DirectoryInner {
    accounts: HashMap<String, UserAccount>,
    welcome_emails: Vec<String>,
    reset_tokens: HashMap<String, String>,
}

/// In-memory implementation of [`UserAccountService`].
///
/// Stands in for the deployment's real user directory in tests and
/// embedded setups. Welcome-email requests are recorded rather than sent.
#[derive(Debug)]
pub struct DirectoryAccountService {
    portal_url: String,
    inner: Mutex<DirectoryInner>,
}

impl DirectoryAccountService {
    pub fn new(portal_url: impl Into<String>) -> Self {
        Self {
            portal_url: portal_url.into(),
            inner: Mutex::new(DirectoryInner::default()),
        }
    }

    /// Recipient addresses of all queued welcome emails.
    pub fn welcome_emails(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.welcome_emails.clone())
            .unwrap_or_default()
    }

    pub fn account(&self, name: &str) -> Option<UserAccount> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.accounts.get(name).cloned())
    }
}

impl Default for DirectoryAccountService {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[async_trait]
impl UserAccountService for DirectoryAccountService {
    async fn create_account(&self, account: NewAccount) -> AppResult<UserAccount> {
        if EmailAddress::from_str(&account.email).is_err() {
            return Err(AppError::AccountCreation(format!(
                "invalid email address: {}",
                account.email
            )));
        }

        let mut inner = self.inner.lock()?;
        if inner.accounts.contains_key(&account.email) {
            return Err(AppError::AccountCreation(format!(
                "User {} already exists",
                account.email
            )));
        }

        let created = UserAccount {
            name: account.email.clone(),
            email: account.email.clone(),
            first_name: account.first_name,
            last_name: account.last_name,
            gender: account.gender,
            user_type: account.user_type,
            roles: account.roles,
            enabled: true,
        };
        inner
            .accounts
            .insert(created.name.clone(), created.clone());

        if account.send_welcome_email {
            inner.welcome_emails.push(created.email.clone());
        }

        debug!(account = %created.name, "account created");
        Ok(created)
    }

    async fn reset_password(&self, name: &str) -> AppResult<String> {
        let mut inner = self.inner.lock()?;
        if !inner.accounts.contains_key(name) {
            return Err(AppError::NotFound {
                doctype: "User".to_string(),
                name: name.to_string(),
            });
        }

        let mut key_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key_bytes);
        let token = URL_SAFE_NO_PAD.encode(key_bytes);
        inner.reset_tokens.insert(name.to_string(), token.clone());

        Ok(format!("{}/update-password?key={}", self.portal_url, token))
    }
}
