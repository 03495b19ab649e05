//! Dispatcher: maps one parsed command to one library call and renders the
//! resulting JSON. The library stays a pure value-returning API; all printing
//! happens here.

use anyhow::{Context, Result};
use serde_json::{json, Value};

use herd_api::{
    decode_log_session, list_account_apps, list_all_apps, ApiGateway, CredentialRegistry,
    GatewayConfig, DEFAULT_TOKEN_VAR, TOKEN_ENV_PREFIX,
};

use crate::cli_args::{Cli, Command};

const SCHEMA_DUMP_PATH: &str = "schema.json";

/// Name of the variable supplying the default token: plain `HEROKU_TOKEN`, or
/// `HEROKU_TOKEN_<ACCOUNT>` when an account suffix is selected.
pub fn default_token_var(account: Option<&str>) -> String {
    match account {
        Some(account) => format!("{}{}", TOKEN_ENV_PREFIX, account.to_uppercase()),
        None => DEFAULT_TOKEN_VAR.to_string(),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let token_var = default_token_var(cli.token.as_deref());
    let default_token = std::env::var(&token_var).ok();
    tracing::debug!(token_var, "resolved default credential variable");

    let gateway = ApiGateway::new(GatewayConfig {
        api_base: cli.api_base,
        default_token: default_token.clone(),
    })?;

    let output = match cli.command {
        Command::Create { name } => gateway.create_app(&name, None).await?,
        Command::Del { name } => gateway.delete_app(&name, None).await?,
        Command::Build { name, url } => gateway.build_app(&name, &url, None).await?,
        Command::Schema => {
            let schema = gateway.get_schema().await?;
            let rendered = serde_json::to_string_pretty(&schema)?;
            std::fs::write(SCHEMA_DUMP_PATH, rendered)
                .with_context(|| format!("failed to write {SCHEMA_DUMP_PATH}"))?;
            json!({ "written": SCHEMA_DUMP_PATH })
        }
        Command::GetConfig { name } => gateway.get_config(&name, None).await?,
        Command::SetConfig { name, vars } => {
            let payload = Value::Object(
                vars.into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            );
            gateway.set_config(&name, &payload, None).await?
        }
        Command::GetApps => {
            let registry = CredentialRegistry::discover();
            let token = default_token.with_context(|| {
                format!("no credential in environment; set {token_var} or pass --token")
            })?;
            let records = list_account_apps(&gateway, &registry, &token).await?;
            serde_json::to_value(records)?
        }
        Command::GetAllApps => {
            let registry = CredentialRegistry::discover();
            let records = list_all_apps(&gateway, &registry).await?;
            serde_json::to_value(records)?
        }
        Command::GetTokens => serde_json::to_value(CredentialRegistry::discover())?,
        Command::GetLogs { name, lines, tail } => {
            let session = gateway.open_log_session(&name, lines, tail, None).await?;
            let result = decode_log_session(&gateway, session).await;
            serde_json::to_value(result)?
        }
        Command::GetBuilds { name } => gateway.get_builds(&name, None).await?,
        Command::RestartAll { name } => gateway.restart_all_dynos(&name, None).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
