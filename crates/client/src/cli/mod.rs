//! CLI command definitions.

pub mod enrollments;
pub mod groups;
pub mod marks;
pub mod students;
pub mod subjects;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI client for the roster API.
#[derive(Debug, Parser)]
#[command(name = "roster-client")]
#[command(about = "CLI client for the roster API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long = "url", env = "ROSTER_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Student management.
    Students(students::StudentsCommand),
    /// Group management.
    Groups(groups::GroupsCommand),
    /// Subject management.
    Subjects(subjects::SubjectsCommand),
    /// Marks and averages.
    Marks(marks::MarksCommand),
    /// Student-subject enrollments.
    Enrollments(enrollments::EnrollmentsCommand),
    /// Check that the server is alive.
    Health,
}
