//! Typed application operations over the gateway, one per remote endpoint.

use serde_json::{json, Value};

use crate::gateway::{ApiGateway, GatewayError};

/// Line count requested for a log session when the caller does not specify one.
pub const DEFAULT_LOG_LINES: u32 = 100;

impl ApiGateway {
    pub async fn create_app(
        &self,
        name: &str,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.post("apps", Some(&json!({ "name": name })), token)
            .await
    }

    pub async fn delete_app(
        &self,
        name: &str,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.delete(&format!("apps/{name}"), token).await
    }

    /// Starts a build from a source tarball URL.
    pub async fn build_app(
        &self,
        name: &str,
        source_url: &str,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.post(
            &format!("apps/{name}/builds"),
            Some(&build_source_payload(source_url)),
            token,
        )
        .await
    }

    /// Restarts every dyno of an application by deleting the dyno set.
    pub async fn restart_all_dynos(
        &self,
        name: &str,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.delete(&format!("apps/{name}/dynos"), token).await
    }

    pub async fn get_config(
        &self,
        name: &str,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.get(&format!("apps/{name}/config-vars"), token).await
    }

    pub async fn set_config(
        &self,
        name: &str,
        vars: &Value,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.patch(&format!("apps/{name}/config-vars"), Some(vars), token)
            .await
    }

    pub async fn get_builds(
        &self,
        name: &str,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.get(&format!("apps/{name}/builds"), token).await
    }

    /// Fetches the platform API's own JSON schema document.
    pub async fn get_schema(&self) -> Result<Value, GatewayError> {
        self.get("schema", None).await
    }

    /// Opens a log session and returns the raw session descriptor, including
    /// the delivery URL the decoder fetches afterwards.
    pub async fn open_log_session(
        &self,
        name: &str,
        lines: u32,
        tail: bool,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        self.post(
            &format!("apps/{name}/log-sessions"),
            Some(&json!({ "lines": lines, "tail": tail })),
            token,
        )
        .await
    }
}

fn build_source_payload(url: &str) -> Value {
    json!({
        "source_blob": {
            "checksum": null,
            "url": url,
            "version": null,
        }
    })
}
