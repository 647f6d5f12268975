//! Student CLI commands.

use clap::{Parser, Subcommand};
use roster_core::roster::{NewStudentMark, SortOrder};

/// Student management commands.
#[derive(Debug, Parser)]
pub struct StudentsCommand {
    #[command(subcommand)]
    pub action: StudentsAction,
}

/// Available student actions.
#[derive(Debug, Subcommand)]
pub enum StudentsAction {
    /// List students.
    List {
        /// Only students of this age.
        #[arg(long)]
        age: Option<i32>,
        /// Sort by name (asc or desc).
        #[arg(long)]
        sort: Option<SortOrder>,
        /// Only the student with this ID.
        #[arg(long)]
        id: Option<i64>,
    },
    /// Get student by ID.
    Get {
        /// Student ID.
        id: i64,
    },
    /// List the students of a group.
    ByGroup {
        /// Group ID.
        group_id: i64,
    },
    /// Create a new student.
    Create {
        /// Student name.
        #[arg(long)]
        name: String,
        /// Student age.
        #[arg(long)]
        age: i32,
        /// Group to place the student in.
        #[arg(long)]
        group_id: Option<i64>,
        /// Subject to enroll in (repeatable).
        #[arg(long = "subject")]
        subject_ids: Vec<i64>,
        /// Initial mark as SUBJECT_ID:VALUE (repeatable).
        #[arg(long = "mark", value_parser = parse_mark)]
        marks: Vec<NewStudentMark>,
    },
    /// Update a student's name or age.
    Update {
        /// Student ID.
        id: i64,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New age.
        #[arg(long)]
        age: Option<i32>,
    },
    /// Delete student by ID.
    Delete {
        /// Student ID.
        id: i64,
    },
}

/// Parses `SUBJECT_ID:VALUE`.
fn parse_mark(raw: &str) -> Result<NewStudentMark, String> {
    let (subject, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SUBJECT_ID:VALUE, got {raw}"))?;

    Ok(NewStudentMark {
        subject_id: subject
            .trim()
            .parse()
            .map_err(|_| format!("invalid subject id: {subject}"))?,
        value: value
            .trim()
            .parse()
            .map_err(|_| format!("invalid mark value: {value}"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mark() {
        assert_eq!(
            parse_mark("3:9").unwrap(),
            NewStudentMark {
                subject_id: 3,
                value: 9
            }
        );
        assert!(parse_mark("3").is_err());
        assert!(parse_mark("x:9").is_err());
        assert!(parse_mark("3:nine").is_err());
    }
}
