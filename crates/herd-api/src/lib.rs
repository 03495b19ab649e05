//! Multi-account surface over the Heroku platform API.
//!
//! This crate provides credential discovery from the process environment, an
//! authenticated JSON gateway, typed application operations, log-session
//! decoding, and an aggregator that fans out across every configured account
//! and merges the results into one deterministically ordered list.

mod aggregate;
mod apps;
mod credentials;
mod gateway;
mod logs;

pub use aggregate::{list_account_apps, list_all_apps, AggregateError, AppRecord, AppsSource};
pub use apps::DEFAULT_LOG_LINES;
pub use credentials::{CredentialRegistry, DEFAULT_TOKEN_VAR, TOKEN_ENV_PREFIX};
pub use gateway::{ApiGateway, GatewayConfig, GatewayError, API_BASE_URL, HEROKU_ACCEPT};
pub use logs::{
    augment_session, decode_log_session, parse_log_text, LogDecodeError, LogEntry,
    LogSessionResult,
};
