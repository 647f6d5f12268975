//! Enrollment CLI commands.

use clap::{Parser, Subcommand};

/// Student-subject enrollment commands.
#[derive(Debug, Parser)]
pub struct EnrollmentsCommand {
    #[command(subcommand)]
    pub action: EnrollmentsAction,
}

/// Available enrollment actions.
#[derive(Debug, Subcommand)]
pub enum EnrollmentsAction {
    /// Enroll a student in a subject.
    Add {
        /// Student ID.
        student_id: i64,
        /// Subject ID.
        subject_id: i64,
    },
    /// Remove a student from a subject.
    Remove {
        /// Student ID.
        student_id: i64,
        /// Subject ID.
        subject_id: i64,
    },
    /// Subjects a student is enrolled in.
    Subjects {
        /// Student ID.
        student_id: i64,
    },
    /// Students enrolled in a subject.
    Students {
        /// Subject ID.
        subject_id: i64,
    },
    /// A student together with their subjects.
    StudentView {
        /// Student ID.
        student_id: i64,
    },
    /// A subject together with its students.
    SubjectView {
        /// Subject ID.
        subject_id: i64,
    },
}
