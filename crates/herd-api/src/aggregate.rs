//! Cross-account aggregation: concurrent fan-out, merge, deterministic order.

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::credentials::CredentialRegistry;
use crate::gateway::{ApiGateway, GatewayError};

#[derive(Debug, Error)]
/// Enumerates aggregation failures. Any one account failing fails the whole
/// operation; there is no partial-result mode.
pub enum AggregateError {
    #[error("listing apps for account {account} failed: {source}")]
    AccountFailed {
        account: String,
        #[source]
        source: GatewayError,
    },
    #[error("apps endpoint returned a non-array body for account {account}")]
    UnexpectedShape { account: String },
}

#[derive(Debug, Clone, Serialize)]
/// One application as reported by the service, annotated with its owning
/// credential. Both derived fields are set before the record is exposed.
pub struct AppRecord {
    #[serde(flatten)]
    pub app: Value,
    pub heroku_token: String,
    pub heroku_name: String,
    /// Zero-based position of `heroku_name` in the registry's sorted
    /// display-name sequence.
    pub heroku_index: usize,
}

impl AppRecord {
    pub fn app_name(&self) -> &str {
        self.app.get("name").and_then(Value::as_str).unwrap_or("")
    }
}

#[async_trait]
/// Seam over the per-account application listing, so aggregation logic can be
/// exercised against scripted sources.
pub trait AppsSource: Send + Sync {
    /// Returns the raw JSON body of one account's application list.
    async fn fetch_apps(&self, token: &str) -> Result<Value, GatewayError>;
}

#[async_trait]
impl AppsSource for ApiGateway {
    async fn fetch_apps(&self, token: &str) -> Result<Value, GatewayError> {
        self.get("apps", Some(token)).await
    }
}

/// Lists one account's applications, annotating each record with the issuing
/// token, the account display name, and the account index.
pub async fn list_account_apps<S: AppsSource + ?Sized>(
    source: &S,
    registry: &CredentialRegistry,
    token: &str,
) -> Result<Vec<AppRecord>, AggregateError> {
    let account = registry
        .display_name_for_token(token)
        .unwrap_or_default()
        .to_string();
    let body = source
        .fetch_apps(token)
        .await
        .map_err(|source| AggregateError::AccountFailed {
            account: account.clone(),
            source,
        })?;
    let Value::Array(apps) = body else {
        return Err(AggregateError::UnexpectedShape { account });
    };
    let index = registry.account_index(&account).unwrap_or(0);

    Ok(apps
        .into_iter()
        .map(|app| AppRecord {
            app,
            heroku_token: token.to_string(),
            heroku_name: account.clone(),
            heroku_index: index,
        })
        .collect())
}

/// Lists applications across every credential in the registry. Per-account
/// calls run concurrently; the merged list is sorted by account display name,
/// then by application name, so arrival order never shows through.
pub async fn list_all_apps<S: AppsSource + ?Sized>(
    source: &S,
    registry: &CredentialRegistry,
) -> Result<Vec<AppRecord>, AggregateError> {
    let tokens: Vec<&str> = registry.tokens().collect();
    tracing::debug!(accounts = tokens.len(), "fanning out application listing");

    let per_account = try_join_all(
        tokens
            .iter()
            .map(|token| list_account_apps(source, registry, *token)),
    )
    .await?;

    let mut apps: Vec<AppRecord> = per_account.into_iter().flatten().collect();
    apps.sort_by(|a, b| {
        a.heroku_name
            .cmp(&b.heroku_name)
            .then_with(|| a.app_name().cmp(b.app_name()))
    });
    Ok(apps)
}
