//! SQLite schema definitions and SQL query constants.
//!
//! Pure data plus a few pure functions that pick the right listing query.

use roster_core::roster::{NameQuery, SortOrder};

/// SQL statement to create all tables.
///
/// `student_subjects.student_id` has no cascade: a student's enrollments are
/// removed explicitly before the student row is deleted.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS student_groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    group_id INTEGER,
    FOREIGN KEY (group_id) REFERENCES student_groups(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS student_subjects (
    student_id INTEGER NOT NULL,
    subject_id INTEGER NOT NULL,
    PRIMARY KEY (student_id, subject_id),
    FOREIGN KEY (student_id) REFERENCES students(id),
    FOREIGN KEY (subject_id) REFERENCES subjects(id)
);

CREATE TABLE IF NOT EXISTS marks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    value INTEGER NOT NULL,
    student_id INTEGER NOT NULL,
    subject_id INTEGER NOT NULL,
    FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE,
    FOREIGN KEY (subject_id) REFERENCES subjects(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_students_group_id ON students(group_id);
CREATE INDEX IF NOT EXISTS idx_students_age ON students(age);
CREATE INDEX IF NOT EXISTS idx_student_subjects_subject_id ON student_subjects(subject_id);
CREATE INDEX IF NOT EXISTS idx_marks_student_id ON marks(student_id);
CREATE INDEX IF NOT EXISTS idx_marks_subject_id ON marks(subject_id);
"#;

// Student queries
pub const SELECT_STUDENT_BY_ID: &str = r#"
SELECT id, name, age, group_id
FROM students
WHERE id = ?1
"#;

pub const SELECT_STUDENTS_BY_GROUP: &str = r#"
SELECT id, name, age, group_id
FROM students
WHERE group_id = ?1
ORDER BY id
"#;

pub const INSERT_STUDENT: &str = r#"
INSERT INTO students (name, age, group_id)
VALUES (?1, ?2, ?3)
"#;

pub const UPDATE_STUDENT: &str = r#"
UPDATE students
SET name = ?1, age = ?2
WHERE id = ?3
"#;

pub const UPDATE_STUDENT_GROUP: &str = r#"
UPDATE students
SET group_id = ?1
WHERE id = ?2
"#;

pub const DELETE_STUDENT: &str = r#"
DELETE FROM students
WHERE id = ?1
"#;

// Group queries
pub const SELECT_GROUP_BY_ID: &str = r#"
SELECT id, name
FROM student_groups
WHERE id = ?1
"#;

pub const SELECT_GROUP_BY_NAME: &str = r#"
SELECT id, name
FROM student_groups
WHERE name = ?1
"#;

pub const INSERT_GROUP: &str = r#"
INSERT INTO student_groups (name)
VALUES (?1)
"#;

pub const CLEAR_GROUP_MEMBERSHIP: &str = r#"
UPDATE students
SET group_id = NULL
WHERE group_id = ?1
"#;

pub const DELETE_GROUP: &str = r#"
DELETE FROM student_groups
WHERE id = ?1
"#;

// Subject queries
pub const SELECT_SUBJECT_BY_ID: &str = r#"
SELECT id, name
FROM subjects
WHERE id = ?1
"#;

pub const SELECT_SUBJECT_BY_NAME: &str = r#"
SELECT id, name
FROM subjects
WHERE name = ?1
"#;

pub const SELECT_SUBJECT_EXISTS_BY_NAME: &str = r#"
SELECT EXISTS(SELECT 1 FROM subjects WHERE name = ?1)
"#;

pub const INSERT_SUBJECT: &str = r#"
INSERT INTO subjects (name)
VALUES (?1)
"#;

pub const DELETE_SUBJECT: &str = r#"
DELETE FROM subjects
WHERE id = ?1
"#;

// Mark queries
pub const SELECT_MARKS: &str = r#"
SELECT id, value, student_id, subject_id
FROM marks
WHERE (?1 IS NULL OR student_id = ?1)
  AND (?2 IS NULL OR subject_id = ?2)
ORDER BY id
"#;

pub const SELECT_MARKS_BY_VALUE: &str = r#"
SELECT id, value, student_id, subject_id
FROM marks
WHERE value = ?1
ORDER BY id
"#;

pub const SELECT_AVERAGE_FOR_STUDENT: &str = r#"
SELECT AVG(value)
FROM marks
WHERE student_id = ?1
"#;

pub const SELECT_AVERAGE_FOR_SUBJECT: &str = r#"
SELECT AVG(value)
FROM marks
WHERE subject_id = ?1
"#;

pub const INSERT_MARK: &str = r#"
INSERT INTO marks (value, student_id, subject_id)
VALUES (?1, ?2, ?3)
"#;

/// Inserts only while the enrollment exists; zero changed rows means it does not.
pub const INSERT_ENROLLED_MARK: &str = r#"
INSERT INTO marks (value, student_id, subject_id)
SELECT ?1, ?2, ?3
WHERE EXISTS (
    SELECT 1 FROM student_subjects
    WHERE student_id = ?2 AND subject_id = ?3
)
"#;

pub const DELETE_MARK: &str = r#"
DELETE FROM marks
WHERE id = ?1
"#;

pub const DELETE_MARKS_MATCHING: &str = r#"
DELETE FROM marks
WHERE student_id = ?1
  AND subject_id IN (SELECT id FROM subjects WHERE name = ?2)
  AND value = ?3
  AND (?4 IS NULL OR id = ?4)
"#;

pub const DELETE_MARKS_BY_STUDENT: &str = r#"
DELETE FROM marks
WHERE student_id = ?1
"#;

pub const DELETE_MARKS_BY_SUBJECT: &str = r#"
DELETE FROM marks
WHERE subject_id = ?1
"#;

// Enrollment queries
pub const INSERT_STUDENT_SUBJECT: &str = r#"
INSERT OR IGNORE INTO student_subjects (student_id, subject_id)
VALUES (?1, ?2)
"#;

pub const DELETE_STUDENT_SUBJECT: &str = r#"
DELETE FROM student_subjects
WHERE student_id = ?1 AND subject_id = ?2
"#;

pub const SELECT_STUDENT_SUBJECT_EXISTS: &str = r#"
SELECT EXISTS(
    SELECT 1 FROM student_subjects WHERE student_id = ?1 AND subject_id = ?2
)
"#;

pub const DELETE_STUDENT_SUBJECTS_BY_STUDENT: &str = r#"
DELETE FROM student_subjects
WHERE student_id = ?1
"#;

pub const DELETE_STUDENT_SUBJECTS_BY_SUBJECT: &str = r#"
DELETE FROM student_subjects
WHERE subject_id = ?1
"#;

pub const SELECT_SUBJECTS_FOR_STUDENT: &str = r#"
SELECT s.id, s.name
FROM subjects s
INNER JOIN student_subjects ss ON ss.subject_id = s.id
WHERE ss.student_id = ?1
ORDER BY s.id
"#;

pub const SELECT_STUDENTS_FOR_SUBJECT: &str = r#"
SELECT st.id, st.name, st.age, st.group_id
FROM students st
INNER JOIN student_subjects ss ON ss.student_id = st.id
WHERE ss.subject_id = ?1
ORDER BY st.id
"#;

fn order_by_name(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Asc => "ORDER BY name ASC, id ASC",
        SortOrder::Desc => "ORDER BY name DESC, id ASC",
    }
}

/// Builds the student listing query. With an age filter, `?1` is the age.
pub fn student_listing_sql(with_age: bool, sort: Option<SortOrder>) -> String {
    let filter = if with_age { "WHERE age = ?1" } else { "" };
    let order = sort.map_or("ORDER BY id", order_by_name);
    format!("SELECT id, name, age, group_id FROM students {filter} {order}")
}

/// Builds a listing query for a `(id, name)` table.
///
/// A name filter takes precedence over ordering and binds to `?1`.
/// `instr` keeps the match case-sensitive, unlike `LIKE`.
pub fn name_listing_sql(table: &str, query: &NameQuery) -> String {
    let (filter, order) = match (&query.name, query.sort) {
        (Some(_), _) => ("WHERE instr(name, ?1) > 0", "ORDER BY id"),
        (None, Some(sort)) => ("", order_by_name(sort)),
        (None, None) => ("", "ORDER BY id"),
    };
    format!("SELECT id, name FROM {table} {filter} {order}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_contains_all_tables() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS students"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS student_groups"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS subjects"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS student_subjects"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS marks"));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        assert!(CREATE_TABLES.contains("PRAGMA foreign_keys = ON"));
    }

    #[test]
    fn test_conditional_mark_delete_matches_every_field() {
        assert!(DELETE_MARKS_MATCHING.contains("student_id = ?1"));
        assert!(DELETE_MARKS_MATCHING.contains("name = ?2"));
        assert!(DELETE_MARKS_MATCHING.contains("value = ?3"));
        assert!(DELETE_MARKS_MATCHING.contains("?4 IS NULL OR id = ?4"));
    }

    #[test]
    fn test_student_listing_sql() {
        let sql = student_listing_sql(true, Some(SortOrder::Desc));
        assert!(sql.contains("WHERE age = ?1"));
        assert!(sql.contains("ORDER BY name DESC"));

        let sql = student_listing_sql(false, None);
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY id"));
    }

    #[test]
    fn test_name_listing_filter_wins() {
        let query = NameQuery {
            name: Some("A".to_string()),
            sort: Some(SortOrder::Asc),
        };
        let sql = name_listing_sql("subjects", &query);
        assert!(sql.contains("instr(name, ?1)"));
        assert!(!sql.contains("ORDER BY name"));
    }

    #[test]
    fn test_name_listing_sorted() {
        let query = NameQuery {
            name: None,
            sort: Some(SortOrder::Asc),
        };
        let sql = name_listing_sql("student_groups", &query);
        assert!(sql.contains("FROM student_groups"));
        assert!(sql.contains("ORDER BY name ASC"));
    }
}
