//! Group CLI commands.

use clap::{Parser, Subcommand};
use roster_core::roster::SortOrder;

/// Group management commands.
#[derive(Debug, Parser)]
pub struct GroupsCommand {
    #[command(subcommand)]
    pub action: GroupsAction,
}

/// Available group actions.
#[derive(Debug, Subcommand)]
pub enum GroupsAction {
    /// List groups.
    List {
        /// Only groups whose name contains this text.
        #[arg(long)]
        name: Option<String>,
        /// Sort by name (asc or desc).
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Get group by ID.
    Get {
        /// Group ID.
        id: i64,
    },
    /// Get group by name.
    GetByName {
        /// Group name.
        name: String,
    },
    /// Create a new group.
    Create {
        /// Group name.
        #[arg(long)]
        name: String,
        /// Student to move into the group (repeatable).
        #[arg(long = "student")]
        student_ids: Vec<i64>,
    },
    /// Delete group by ID.
    Delete {
        /// Group ID.
        id: i64,
    },
    /// Delete group by name.
    DeleteByName {
        /// Group name.
        name: String,
    },
}
