//! Request and query types shared between the server and the client.
//!
//! Pure data with validation hooks; the HTTP layer deserializes into these
//! and rejects anything that fails `Validate` before a service is called.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::operations::{validate_age, validate_mark_value, validate_name, validate_positive_id};

/// Types that can check their own invariants at the API boundary.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Ordering applied to name-sorted listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::InvalidSort(s.to_string())),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Filters for the student listing. An `id` short-circuits to a single student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Validate for StudentQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.id {
            validate_positive_id("id", id)?;
        }
        Ok(())
    }
}

/// Name-contains filter or name ordering for group and subject listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl Validate for NameQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Filters for the mark listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
}

impl Validate for MarkQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.student_id {
            validate_positive_id("studentId", id)?;
        }
        if let Some(id) = self.subject_id {
            validate_positive_id("subjectId", id)?;
        }
        Ok(())
    }
}

/// Criteria for deleting a mark without knowing its id up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCriteria {
    pub student_id: i64,
    pub subject_name: String,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Validate for MarkCriteria {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_positive_id("studentId", self.student_id)?;
        validate_name(&self.subject_name)?;
        if let Some(id) = self.id {
            validate_positive_id("id", id)?;
        }
        Ok(())
    }
}

/// A mark attached to a student at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentMark {
    pub value: i32,
    pub subject_id: i64,
}

/// Payload for creating a student together with its subjects and marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub subject_ids: Vec<i64>,
    #[serde(default)]
    pub marks: Vec<NewStudentMark>,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
            group_id: None,
            subject_ids: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_subjects(mut self, subject_ids: impl IntoIterator<Item = i64>) -> Self {
        self.subject_ids = subject_ids.into_iter().collect();
        self
    }

    pub fn with_mark(mut self, subject_id: i64, value: i32) -> Self {
        self.marks.push(NewStudentMark { value, subject_id });
        self
    }
}

impl Validate for NewStudent {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_age(self.age)?;
        if let Some(group_id) = self.group_id {
            validate_positive_id("groupId", group_id)?;
        }
        for id in &self.subject_ids {
            validate_positive_id("subjectIds", *id)?;
        }
        for mark in &self.marks {
            validate_positive_id("subjectId", mark.subject_id)?;
            validate_mark_value(mark.value)?;
            if !self.subject_ids.contains(&mark.subject_id) {
                return Err(ValidationError::MarkForUnlistedSubject(mark.subject_id));
            }
        }
        Ok(())
    }
}

/// Partial update of a student. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

impl Validate for StudentUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }
}

/// Payload for creating a group, optionally moving existing students into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}

impl Validate for NewGroup {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        for id in &self.student_ids {
            validate_positive_id("studentIds", *id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
}

impl Validate for NewSubject {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

/// Payload for recording a mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMark {
    pub value: i32,
    pub student_id: i64,
    pub subject_id: i64,
}

impl Validate for NewMark {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_mark_value(self.value)?;
        validate_positive_id("studentId", self.student_id)?;
        validate_positive_id("subjectId", self.subject_id)
    }
}
