use clap::{Parser, Subcommand};
use herd_api::{API_BASE_URL, DEFAULT_LOG_LINES};

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(key, val)| (key.to_string(), val.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{value}`"))
}

#[derive(Debug, Parser)]
#[command(
    name = "herdctl",
    about = "Heroku application operations across every account configured in the environment",
    version
)]
pub struct Cli {
    #[arg(
        long,
        env = "HEROKU_API_BASE",
        default_value = API_BASE_URL,
        help = "Base URL of the Heroku platform API"
    )]
    pub api_base: String,

    #[arg(
        long,
        help = "Account suffix selecting HEROKU_TOKEN_<ACCOUNT> as the default credential instead of HEROKU_TOKEN"
    )]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Create an application.
    Create {
        #[arg(long)]
        name: String,
    },
    /// Delete an application.
    Del {
        #[arg(long)]
        name: String,
    },
    /// Start a build of an application from a source tarball URL.
    Build {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    /// Dump the platform API JSON schema to schema.json.
    Schema,
    /// Print an application's config vars.
    GetConfig {
        #[arg(long)]
        name: String,
    },
    /// Patch config vars on an application.
    SetConfig {
        #[arg(long)]
        name: String,
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,
    },
    /// List the selected account's applications.
    GetApps,
    /// List applications across every configured account, grouped by account.
    GetAllApps,
    /// Print the credential tables discovered from the environment.
    GetTokens,
    /// Open a log session and print its decoded entries.
    GetLogs {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = DEFAULT_LOG_LINES)]
        lines: u32,
        #[arg(long)]
        tail: bool,
    },
    /// List an application's builds.
    GetBuilds {
        #[arg(long)]
        name: String,
    },
    /// Restart every dyno of an application.
    RestartAll {
        #[arg(long)]
        name: String,
    },
}
