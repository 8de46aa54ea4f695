use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Schema-driven data management UI host
#[derive(Parser, Debug, Clone)]
#[command(name = "infraview", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "INFRAVIEW_CONFIG", default_value = "infraview.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "INFRAVIEW_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "INFRAVIEW_PORT")]
    pub port: Option<u16>,

    /// Upstream GraphQL endpoint
    #[arg(long, env = "INFRAVIEW_GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// Upstream schema endpoint
    #[arg(long, env = "INFRAVIEW_SCHEMA_URL")]
    pub schema_url: Option<String>,

    /// Branch used for queries when none is selected
    #[arg(long, env = "INFRAVIEW_BRANCH")]
    pub branch: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the UI and proxy the upstream API (default)
    Serve,
    /// Fetch the schema and list its kinds
    Schema,
    /// Print one page of objects of a kind
    List {
        /// Node kind, e.g. InfraDevice
        kind: String,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Print the form fields derived for a kind as JSON
    Form {
        /// Node kind, e.g. InfraDevice
        kind: String,
        /// Existing object whose values pre-fill the form
        #[arg(long)]
        id: Option<String>,
    },
    /// Create or delete a branch
    #[command(subcommand)]
    Branch(BranchCommand),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BranchCommand {
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Keep the branch in sync with git repositories
        #[arg(long)]
        sync_with_git: bool,
    },
    Delete {
        name: String,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["infraview"]);
        assert_eq!(cli.config, PathBuf::from("infraview.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.graphql_url.is_none());
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "infraview",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--graphql-url",
            "http://api:8000/graphql",
            "--branch",
            "dev",
            "schema",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.graphql_url.as_deref(), Some("http://api:8000/graphql"));
        assert_eq!(cli.branch.as_deref(), Some("dev"));
        assert_eq!(cli.command(), Command::Schema);
    }

    #[test]
    fn test_list_command() {
        let cli = Cli::parse_from(["infraview", "list", "InfraDevice", "--page", "2"]);
        assert_eq!(
            cli.command(),
            Command::List {
                kind: "InfraDevice".to_string(),
                page: 2,
            }
        );
    }

    #[test]
    fn test_form_command() {
        let cli = Cli::parse_from(["infraview", "form", "InfraDevice", "--id", "d1"]);
        assert_eq!(
            cli.command(),
            Command::Form {
                kind: "InfraDevice".to_string(),
                id: Some("d1".to_string()),
            }
        );
    }

    #[test]
    fn test_branch_commands() {
        let cli = Cli::parse_from(["infraview", "branch", "create", "test-branch", "--sync-with-git"]);
        assert_eq!(
            cli.command(),
            Command::Branch(BranchCommand::Create {
                name: "test-branch".to_string(),
                description: None,
                sync_with_git: true,
            })
        );

        let cli = Cli::parse_from(["infraview", "branch", "delete", "test-branch"]);
        assert_eq!(
            cli.command(),
            Command::Branch(BranchCommand::Delete {
                name: "test-branch".to_string()
            })
        );
    }
}
