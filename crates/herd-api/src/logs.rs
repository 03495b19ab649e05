//! Log session decoding: plain-text retrieval plus line-pattern parsing.
//!
//! Decoding never propagates an error past this module. Any retrieval or
//! pattern failure is folded into the returned [`LogSessionResult`] as an
//! error marker with empty line and entry sequences, while the original
//! session descriptor fields stay intact.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::gateway::{ApiGateway, GatewayError};

fn log_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([^ ]+) ([^ ]+): (.*)").expect("log line pattern must compile")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One parsed log line: `<time> <dyno>: <content>`.
pub struct LogEntry {
    pub time: String,
    pub dyno: String,
    pub content: String,
}

#[derive(Debug, Error)]
/// Enumerates log decode failure causes. These never cross the module
/// boundary as `Err`; they become the result's error marker.
pub enum LogDecodeError {
    #[error("session descriptor has no logplex_url")]
    MissingDeliveryUrl,
    #[error("error fetching log text: {0}")]
    Fetch(#[from] GatewayError),
    #[error("log line does not match `<time> <dyno>: <content>`: {0}")]
    Pattern(String),
}

#[derive(Debug, Serialize)]
/// Session descriptor augmented with the decoded log payload.
pub struct LogSessionResult {
    #[serde(flatten)]
    pub session: Value,
    pub log_text: String,
    pub log_lines: Vec<String>,
    pub log_items: Vec<LogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn parse_log_line(line: &str) -> Result<LogEntry, LogDecodeError> {
    let captures = log_line_pattern()
        .captures(line)
        .ok_or_else(|| LogDecodeError::Pattern(line.to_string()))?;
    Ok(LogEntry {
        time: captures[1].to_string(),
        dyno: captures[2].to_string(),
        content: captures[3].to_string(),
    })
}

/// Normalizes line endings, drops empty lines, and parses every remaining
/// line. One non-matching line fails the whole payload.
pub fn parse_log_text(text: &str) -> Result<(Vec<String>, Vec<LogEntry>), LogDecodeError> {
    let normalized = text.replace('\r', "");
    let lines: Vec<String> = normalized
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let items = lines
        .iter()
        .map(|line| parse_log_line(line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((lines, items))
}

/// Folds a fetched (or failed) text payload into the session descriptor.
/// The soft-fail arm mirrors the success shape with empty sequences so the
/// descriptor is always returned to the caller.
pub fn augment_session(
    session: Value,
    fetched: Result<String, LogDecodeError>,
) -> LogSessionResult {
    let decoded = fetched
        .and_then(|text| parse_log_text(&text).map(|(lines, items)| (text, lines, items)));
    match decoded {
        Ok((text, lines, items)) => LogSessionResult {
            session,
            log_text: text,
            log_lines: lines,
            log_items: items,
            error: None,
        },
        Err(error) => {
            let message = error.to_string();
            tracing::debug!(error = %message, "log session decode soft-failed");
            LogSessionResult {
                session,
                log_text: message.clone(),
                log_lines: Vec::new(),
                log_items: Vec::new(),
                error: Some(message),
            }
        }
    }
}

/// Fetches the session's delivery URL as plain text and decodes it. Never
/// returns an error; see the module contract.
pub async fn decode_log_session(gateway: &ApiGateway, session: Value) -> LogSessionResult {
    let fetched = match session.get("logplex_url").and_then(Value::as_str) {
        Some(url) => {
            let url = url.to_string();
            gateway
                .fetch_text(&url)
                .await
                .map_err(LogDecodeError::from)
        }
        None => Err(LogDecodeError::MissingDeliveryUrl),
    };
    augment_session(session, fetched)
}
