//! Credential discovery from `HEROKU_TOKEN_*` environment variables.

use std::collections::BTreeMap;

use serde::Serialize;

/// Variable holding the fallback token used when no account is selected.
pub const DEFAULT_TOKEN_VAR: &str = "HEROKU_TOKEN";

/// Prefix of per-account token variables, e.g. `HEROKU_TOKEN_STAGING`.
pub const TOKEN_ENV_PREFIX: &str = "HEROKU_TOKEN_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Lookup tables over every account credential found in the environment.
///
/// The three maps and the sorted name sequence always share one key set:
/// each matching environment variable contributes exactly one entry to each.
/// The registry is rebuilt from the environment on every aggregation call,
/// never cached.
pub struct CredentialRegistry {
    /// Full variable name -> token value.
    pub tokens_by_var: BTreeMap<String, String>,
    /// Token value -> full variable name.
    pub vars_by_token: BTreeMap<String, String>,
    /// Full variable name -> account display name.
    pub names_by_var: BTreeMap<String, String>,
    /// Account display names, sorted lexicographically ascending.
    pub account_names: Vec<String>,
}

impl CredentialRegistry {
    /// Scans the current process environment. Zero matching variables yields
    /// an empty registry, never an error.
    pub fn discover() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Pure core of [`discover`](Self::discover): builds the tables from any
    /// `(name, value)` pairs.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut registry = Self::default();
        for (var, token) in vars {
            if !var.starts_with(TOKEN_ENV_PREFIX) {
                continue;
            }
            // The display name is the third underscore-delimited segment, so
            // HEROKU_TOKEN_EU_BACKUP is displayed as "EU".
            let Some(name) = var.split('_').nth(2) else {
                continue;
            };
            registry.account_names.push(name.to_string());
            registry.names_by_var.insert(var.clone(), name.to_string());
            registry.vars_by_token.insert(token.clone(), var.clone());
            registry.tokens_by_var.insert(var, token);
        }
        registry.account_names.sort();
        registry
    }

    pub fn is_empty(&self) -> bool {
        self.tokens_by_var.is_empty()
    }

    /// Zero-based position of a display name within the sorted name sequence.
    pub fn account_index(&self, name: &str) -> Option<usize> {
        self.account_names.iter().position(|known| known == name)
    }

    /// Resolves a token value back to its account display name.
    pub fn display_name_for_token(&self, token: &str) -> Option<&str> {
        let var = self.vars_by_token.get(token)?;
        self.names_by_var.get(var).map(String::as_str)
    }

    /// All known token values, in deterministic (variable-name) order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens_by_var.values().map(String::as_str)
    }
}
