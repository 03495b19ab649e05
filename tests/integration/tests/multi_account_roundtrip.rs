//! End-to-end scenarios over the aggregation and log-decoding pipeline using
//! scripted application sources instead of live HTTP.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use herd_api::{
    augment_session, list_all_apps, AggregateError, AppsSource, CredentialRegistry, GatewayError,
    LogDecodeError,
};

struct ScriptedFleet {
    bodies: HashMap<String, Value>,
    failing_tokens: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedFleet {
    fn new(bodies: &[(&str, Value)]) -> Self {
        Self {
            bodies: bodies
                .iter()
                .map(|(token, body)| (token.to_string(), body.clone()))
                .collect(),
            failing_tokens: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_on(mut self, token: &str) -> Self {
        self.failing_tokens.push(token.to_string());
        self
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AppsSource for ScriptedFleet {
    async fn fetch_apps(&self, token: &str) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failing_tokens.iter().any(|failing| failing == token) {
            return Err(GatewayError::MissingToken);
        }
        Ok(self.bodies.get(token).cloned().unwrap_or_else(|| json!([])))
    }
}

fn registry_from(pairs: &[(&str, &str)]) -> CredentialRegistry {
    CredentialRegistry::from_vars(
        pairs
            .iter()
            .map(|(var, token)| (var.to_string(), token.to_string())),
    )
}

#[tokio::test]
async fn aggregates_three_accounts_into_one_ordered_list() {
    let registry = registry_from(&[
        ("HEROKU_TOKEN_US", "token-us"),
        ("HEROKU_TOKEN_APAC", "token-apac"),
        ("HEROKU_TOKEN_EU", "token-eu"),
    ]);
    let fleet = ScriptedFleet::new(&[
        ("token-us", json!([{ "name": "billing" }, { "name": "api" }])),
        ("token-apac", json!([{ "name": "edge" }])),
        ("token-eu", json!([{ "name": "api" }])),
    ]);

    let apps = list_all_apps(&fleet, &registry).await.expect("must aggregate");

    let summary: Vec<(String, String, usize)> = apps
        .iter()
        .map(|record| {
            (
                record.heroku_name.clone(),
                record.app_name().to_string(),
                record.heroku_index,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("APAC".to_string(), "edge".to_string(), 0),
            ("EU".to_string(), "api".to_string(), 1),
            ("US".to_string(), "api".to_string(), 2),
            ("US".to_string(), "billing".to_string(), 2),
        ]
    );
    assert_eq!(fleet.call_count(), 3);
}

#[tokio::test]
async fn one_failing_account_yields_no_partial_list() {
    let registry = registry_from(&[
        ("HEROKU_TOKEN_A", "token-a"),
        ("HEROKU_TOKEN_B", "token-b"),
        ("HEROKU_TOKEN_C", "token-c"),
    ]);
    let fleet = ScriptedFleet::new(&[
        ("token-a", json!([{ "name": "one" }])),
        ("token-c", json!([{ "name": "three" }])),
    ])
    .failing_on("token-b");

    let error = list_all_apps(&fleet, &registry)
        .await
        .expect_err("aggregate must fail as a whole");

    assert!(matches!(
        error,
        AggregateError::AccountFailed { account, .. } if account == "B"
    ));
}

#[tokio::test]
async fn empty_environment_aggregates_to_empty_list_without_calls() {
    let registry = registry_from(&[("NOT_A_TOKEN", "x")]);
    let fleet = ScriptedFleet::new(&[]);

    let apps = list_all_apps(&fleet, &registry).await.expect("must aggregate");

    assert!(apps.is_empty());
    assert_eq!(fleet.call_count(), 0);
}

#[test]
fn decoded_session_round_trips_through_json_output() {
    let session = json!({
        "id": "af3c-1",
        "logplex_url": "https://logs.example.test/sessions/af3c-1",
    });
    let payload = "2024-01-01T00:00:00 web.1: hello\n\n2024-01-01T00:00:01 web.1: world\n";

    let result = augment_session(session, Ok(payload.to_string()));
    let rendered = serde_json::to_value(&result).expect("result must serialize");

    assert_eq!(rendered["id"], "af3c-1");
    assert_eq!(rendered["log_lines"].as_array().map(Vec::len), Some(2));
    assert_eq!(rendered["log_items"][0]["dyno"], "web.1");
    assert_eq!(rendered["log_items"][1]["content"], "world");
    assert!(rendered.get("error").is_none());
}

#[test]
fn malformed_log_payload_soft_fails_but_keeps_the_descriptor() {
    let session = json!({ "id": "af3c-2", "logplex_url": "https://logs.example.test/x" });

    let result = augment_session(session, Ok("this line has no source marker".to_string()));

    assert_eq!(result.session["id"], "af3c-2");
    assert!(result.error.is_some());
    assert!(result.log_lines.is_empty());
    assert!(result.log_items.is_empty());
}

#[test]
fn fetch_failure_soft_fails_the_same_way() {
    let session = json!({ "id": "af3c-3" });

    let result = augment_session(session, Err(LogDecodeError::MissingDeliveryUrl));

    assert_eq!(result.session["id"], "af3c-3");
    assert!(result.error.is_some());
    assert!(result.log_items.is_empty());
}
