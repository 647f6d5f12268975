use serde::{Deserialize, Serialize};

/// A student enrolled in the school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i32,
    /// The group this student belongs to, if any.
    #[serde(default)]
    pub group_id: Option<i64>,
}

impl Student {
    /// Creates a student without a group.
    pub fn new(id: i64, name: impl Into<String>, age: i32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            group_id: None,
        }
    }

    /// Places the student in a group.
    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

/// A named group of students. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

impl Group {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A subject students can be enrolled in. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

impl Subject {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A mark given to a student for a subject they are enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub id: i64,
    pub value: i32,
    pub student_id: i64,
    pub subject_id: i64,
}

/// A student together with every subject they are enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWithSubjects {
    #[serde(flatten)]
    pub student: Student,
    pub subjects: Vec<Subject>,
}

/// A subject together with every student enrolled in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWithStudents {
    #[serde(flatten)]
    pub subject: Subject,
    pub students: Vec<Student>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_serializes_camel_case() {
        let student = Student::new(1, "Ada", 20).with_group(3);
        let json = serde_json::to_value(&student).unwrap();

        assert_eq!(json["groupId"], 3);
        assert_eq!(json["name"], "Ada");
    }

    #[test]
    fn test_student_without_group_deserializes() {
        let student: Student = serde_json::from_str(r#"{"id":2,"name":"Bo","age":19}"#).unwrap();
        assert_eq!(student.group_id, None);
    }

    #[test]
    fn test_student_with_subjects_is_flattened() {
        let view = StudentWithSubjects {
            student: Student::new(1, "Ada", 20),
            subjects: vec![Subject::new(7, "Math")],
        };
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["subjects"][0]["name"], "Math");
    }
}
