//! Subject CLI commands.

use clap::{Parser, Subcommand};
use roster_core::roster::SortOrder;

/// Subject management commands.
#[derive(Debug, Parser)]
pub struct SubjectsCommand {
    #[command(subcommand)]
    pub action: SubjectsAction,
}

/// Available subject actions.
#[derive(Debug, Subcommand)]
pub enum SubjectsAction {
    /// List subjects.
    List {
        /// Only subjects whose name contains this text.
        #[arg(long)]
        name: Option<String>,
        /// Sort by name (asc or desc).
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Get subject by ID.
    Get {
        /// Subject ID.
        id: i64,
    },
    /// Get subject by name.
    GetByName {
        /// Subject name.
        name: String,
    },
    /// Check whether a subject exists.
    Exists {
        /// Subject name.
        name: String,
    },
    /// Create a new subject.
    Create {
        /// Subject name.
        #[arg(long)]
        name: String,
    },
    /// Delete subject by ID.
    Delete {
        /// Subject ID.
        id: i64,
    },
    /// Delete subject by name.
    DeleteByName {
        /// Subject name.
        name: String,
    },
}
