//! Cache key construction.
//!
//! Every key lives in one region and reads `"{region}:{rest}"`. Each read
//! operation renders its full parameter tuple into the key; absent parameters
//! render as a fixed placeholder so distinct tuples never share a key.

use std::fmt::Display;

use crate::roster::{MarkQuery, NameQuery, SortOrder};

pub const STUDENTS: &str = "students";
pub const GROUPS: &str = "groups";
pub const SUBJECTS: &str = "subjects";
pub const MARKS: &str = "marks";
pub const STUDENT_SUBJECTS: &str = "student_subjects";

/// All cache regions.
pub const REGIONS: [&str; 5] = [STUDENTS, GROUPS, SUBJECTS, MARKS, STUDENT_SUBJECTS];

fn or_placeholder<T: Display>(value: Option<T>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), |v| v.to_string())
}

/// Names are quoted so a filter on the literal text "null" differs from no filter.
fn name_filter(name: Option<&str>) -> String {
    name.map_or_else(|| "null".to_string(), |n| format!("{n:?}"))
}

/// Returns the pattern that matches every key in a region.
pub fn region_pattern(region: &str) -> String {
    format!("{region}:*")
}

pub fn student_key(id: i64) -> String {
    format!("{STUDENTS}:{id}")
}

/// Key for a filtered student listing: `students:list:{age}-{sort}-{id}`.
pub fn student_list_key(age: Option<i32>, sort: Option<SortOrder>, id: Option<i64>) -> String {
    format!(
        "{STUDENTS}:list:{}-{}-{}",
        or_placeholder(age, "null"),
        or_placeholder(sort, "null"),
        or_placeholder(id, "null")
    )
}

pub fn student_list_pattern() -> String {
    format!("{STUDENTS}:list:*")
}

pub fn students_by_group_key(group_id: i64) -> String {
    format!("{STUDENTS}:group-{group_id}")
}

pub fn group_key(id: i64) -> String {
    format!("{GROUPS}:{id}")
}

pub fn group_name_key(name: &str) -> String {
    format!("{GROUPS}:name_{name}")
}

pub fn group_list_key(query: &NameQuery) -> String {
    format!(
        "{GROUPS}:list:{}-{}",
        name_filter(query.name.as_deref()),
        or_placeholder(query.sort, "null")
    )
}

pub fn group_list_pattern() -> String {
    format!("{GROUPS}:list:*")
}

pub fn subject_key(id: i64) -> String {
    format!("{SUBJECTS}:{id}")
}

pub fn subject_name_key(name: &str) -> String {
    format!("{SUBJECTS}:name_{name}")
}

/// Key for the cached existence check of a subject name.
pub fn subject_exists_key(name: &str) -> String {
    format!("{SUBJECTS}:exists-{name}")
}

pub fn subject_list_key(query: &NameQuery) -> String {
    format!(
        "{SUBJECTS}:list:{}-{}",
        name_filter(query.name.as_deref()),
        or_placeholder(query.sort, "default")
    )
}

pub fn subject_list_pattern() -> String {
    format!("{SUBJECTS}:list:*")
}

/// Key for a mark listing: `marks:marks-{studentId|all}-{subjectId|all}`.
pub fn mark_list_key(query: &MarkQuery) -> String {
    format!(
        "{MARKS}:marks-{}-{}",
        or_placeholder(query.student_id, "all"),
        or_placeholder(query.subject_id, "all")
    )
}

pub fn marks_by_value_key(value: i32) -> String {
    format!("{MARKS}:value-{value}")
}

pub fn student_average_key(student_id: i64) -> String {
    format!("{MARKS}:avg-student-{student_id}")
}

pub fn subject_average_key(subject_id: i64) -> String {
    format!("{MARKS}:avg-subject-{subject_id}")
}

/// Key for the subjects a student is enrolled in.
pub fn student_subjects_key(student_id: i64) -> String {
    format!("{STUDENT_SUBJECTS}:subjects-{student_id}")
}

/// Key for the students enrolled in a subject.
pub fn subject_students_key(subject_id: i64) -> String {
    format!("{STUDENT_SUBJECTS}:students-{subject_id}")
}

pub fn student_with_subjects_key(student_id: i64) -> String {
    format!("{STUDENT_SUBJECTS}:student-with-subjects-{student_id}")
}

pub fn subject_with_students_key(subject_id: i64) -> String {
    format!("{STUDENT_SUBJECTS}:subject-with-students-{subject_id}")
}
