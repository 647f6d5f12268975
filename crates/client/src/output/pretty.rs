//! Pretty output formatting.

use roster_core::roster::{Group, Mark, Student, StudentWithSubjects, Subject, SubjectWithStudents};

/// Format a student for display.
pub fn format_student(student: &Student) -> String {
    let mut output = format!(
        "{} (age {})\n  ID: {}",
        student.name, student.age, student.id
    );
    if let Some(group_id) = student.group_id {
        output.push_str(&format!("\n  Group: {}", group_id));
    }
    output
}

/// Format students for display.
pub fn format_students(students: &[Student]) -> String {
    format_list("STUDENTS", "No students found.", students, format_student)
}

/// Format a group for display.
pub fn format_group(group: &Group) -> String {
    format!("{}\n  ID: {}", group.name, group.id)
}

/// Format groups for display.
pub fn format_groups(groups: &[Group]) -> String {
    format_list("GROUPS", "No groups found.", groups, format_group)
}

/// Format a subject for display.
pub fn format_subject(subject: &Subject) -> String {
    format!("{}\n  ID: {}", subject.name, subject.id)
}

/// Format subjects for display.
pub fn format_subjects(subjects: &[Subject]) -> String {
    format_list("SUBJECTS", "No subjects found.", subjects, format_subject)
}

/// Format a mark for display.
pub fn format_mark(mark: &Mark) -> String {
    format!(
        "{}\n  ID: {}\n  Student: {}\n  Subject: {}",
        mark.value, mark.id, mark.student_id, mark.subject_id
    )
}

/// Format marks for display.
pub fn format_marks(marks: &[Mark]) -> String {
    format_list("MARKS", "No marks found.", marks, format_mark)
}

/// Format an average, which is absent when nothing has been marked yet.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("Average: {:.2}", value),
        None => "No marks recorded.".to_string(),
    }
}

pub fn format_student_with_subjects(view: &StudentWithSubjects) -> String {
    let mut output = format_student(&view.student);
    output.push_str(&format!("\n  Subjects ({}):", view.subjects.len()));
    for subject in &view.subjects {
        output.push_str(&format!("\n    - {} ({})", subject.name, subject.id));
    }
    output
}

pub fn format_subject_with_students(view: &SubjectWithStudents) -> String {
    let mut output = format_subject(&view.subject);
    output.push_str(&format!("\n  Students ({}):", view.students.len()));
    for student in &view.students {
        output.push_str(&format!("\n    - {} ({})", student.name, student.id));
    }
    output
}

fn format_list<T>(title: &str, empty: &str, items: &[T], format: fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{} ({})\n", title, items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n{}", format(item)));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Student {
        Student {
            id: 1,
            name: "Ada".to_string(),
            age: 20,
            group_id: Some(4),
        }
    }

    #[test]
    fn test_format_student_includes_group() {
        assert_eq!(format_student(&ada()), "Ada (age 20)\n  ID: 1\n  Group: 4");
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_students(&[]), "No students found.");
        assert_eq!(format_marks(&[]), "No marks found.");
    }

    #[test]
    fn test_list_header_counts_items() {
        let output = format_groups(&[
            Group {
                id: 1,
                name: "A-1".to_string(),
            },
            Group {
                id: 2,
                name: "B-2".to_string(),
            },
        ]);

        assert!(output.starts_with("GROUPS (2)\n"));
        assert!(output.contains("B-2\n  ID: 2"));
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(7.5)), "Average: 7.50");
        assert_eq!(format_average(None), "No marks recorded.");
    }

    #[test]
    fn test_format_student_with_subjects() {
        let view = StudentWithSubjects {
            student: ada(),
            subjects: vec![Subject {
                id: 3,
                name: "Math".to_string(),
            }],
        };

        assert!(format_student_with_subjects(&view).ends_with("Subjects (1):\n    - Math (3)"));
    }
}
