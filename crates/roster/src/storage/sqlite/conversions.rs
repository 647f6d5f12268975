//! SQLite row conversion functions.
//!
//! Each function expects the column order of the matching `SELECT` in
//! `schema.rs`.

use rusqlite::Row;

use roster_core::roster::{Group, Mark, Student, Subject};

/// Expected columns: id, name, age, group_id
pub fn row_to_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        group_id: row.get(3)?,
    })
}

/// Expected columns: id, name
pub fn row_to_group(row: &Row) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Expected columns: id, name
pub fn row_to_subject(row: &Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Expected columns: id, value, student_id, subject_id
pub fn row_to_mark(row: &Row) -> rusqlite::Result<Mark> {
    Ok(Mark {
        id: row.get(0)?,
        value: row.get(1)?,
        student_id: row.get(2)?,
        subject_id: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_row_to_student_with_null_group() {
        let conn = Connection::open_in_memory().unwrap();
        let student = conn
            .query_row("SELECT 1, 'Ada', 20, NULL", [], row_to_student)
            .unwrap();

        assert_eq!(student, Student::new(1, "Ada", 20));
    }

    #[test]
    fn test_row_to_mark() {
        let conn = Connection::open_in_memory().unwrap();
        let mark = conn
            .query_row("SELECT 4, 9, 1, 2", [], row_to_mark)
            .unwrap();

        assert_eq!(
            mark,
            Mark {
                id: 4,
                value: 9,
                student_id: 1,
                subject_id: 2,
            }
        );
    }

    #[test]
    fn test_row_to_subject() {
        let conn = Connection::open_in_memory().unwrap();
        let subject = conn
            .query_row("SELECT 3, 'Art'", [], row_to_subject)
            .unwrap();
        assert_eq!(subject, Subject::new(3, "Art"));
    }
}
