//! Mark CLI commands.

use clap::{Parser, Subcommand};

/// Mark commands.
#[derive(Debug, Parser)]
pub struct MarksCommand {
    #[command(subcommand)]
    pub action: MarksAction,
}

/// Available mark actions.
#[derive(Debug, Subcommand)]
pub enum MarksAction {
    /// List marks.
    List {
        /// Only marks of this student.
        #[arg(long)]
        student_id: Option<i64>,
        /// Only marks in this subject.
        #[arg(long)]
        subject_id: Option<i64>,
    },
    /// List marks with an exact value.
    ByValue {
        /// Mark value (1-10).
        value: i32,
    },
    /// Average mark of a student.
    StudentAverage {
        /// Student ID.
        id: i64,
    },
    /// Average mark of a subject.
    SubjectAverage {
        /// Subject ID.
        id: i64,
    },
    /// Record a mark.
    Create {
        /// Mark value (1-10).
        #[arg(long)]
        value: i32,
        /// Student ID.
        #[arg(long)]
        student_id: i64,
        /// Subject ID.
        #[arg(long)]
        subject_id: i64,
    },
    /// Delete mark by ID.
    Delete {
        /// Mark ID.
        id: i64,
    },
    /// Delete marks matching a student, subject name and value.
    DeleteMatching {
        /// Student ID.
        #[arg(long)]
        student_id: i64,
        /// Subject name.
        #[arg(long)]
        subject_name: String,
        /// Mark value.
        #[arg(long)]
        value: i32,
        /// Restrict to a single mark ID.
        #[arg(long)]
        id: Option<i64>,
    },
}
