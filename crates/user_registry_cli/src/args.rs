//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use user_registry_core::{UserCandidate, UserId};

/// Manage user records (name, email, phone) stored in SQLite.
#[derive(Parser, Debug)]
#[command(name = "user-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides USER_REGISTRY_DB_PATH)
    #[arg(long, global = true, conflicts_with = "in_memory")]
    pub db: Option<PathBuf>,

    /// Use a throwaway in-process store instead of SQLite
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// trace|debug|info|warn|error (overrides USER_REGISTRY_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides USER_REGISTRY_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every user
    List,
    /// Show one user by id
    Get {
        #[arg(allow_negative_numbers = true)]
        id: UserId,
    },
    /// Show one user by email
    Find { email: String },
    /// Report whether an email is already registered
    Exists { email: String },
    /// Register a new user
    Create(UserFields),
    /// Replace name, email and phone of a user
    Update {
        #[arg(allow_negative_numbers = true)]
        id: UserId,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: UserId,
    },
}

impl Command {
    /// Resource path reported in error bodies.
    pub fn path(&self) -> String {
        match self {
            Self::List | Self::Create(_) => "/api/users".to_string(),
            Self::Get { id } | Self::Update { id, .. } | Self::Delete { id } => {
                format!("/api/users/{id}")
            }
            Self::Find { email } => format!("/api/users/email/{}", email.trim()),
            Self::Exists { email } => format!("/api/users/exists/{}", email.trim()),
        }
    }

    /// Short command name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get { .. } => "get",
            Self::Find { .. } => "find",
            Self::Exists { .. } => "exists",
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Candidate fields; omitted flags stay `None` so validation reports them.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

impl From<&UserFields> for UserCandidate {
    fn from(fields: &UserFields) -> Self {
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
        }
    }
}
