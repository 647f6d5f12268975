use std::collections::HashSet;

use super::error::ValidationError;
use super::requests::{MarkQuery, NameQuery, SortOrder};
use super::types::{Mark, Student};

const MAX_NAME_LEN: usize = 100;

/// Rejects identifiers that are zero or negative.
pub fn validate_positive_id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveId { field, value });
    }
    Ok(())
}

/// Validates a student, group, or subject name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), ValidationError> {
    if !(1..=150).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }
    Ok(())
}

pub fn validate_mark_value(value: i32) -> Result<(), ValidationError> {
    if !(1..=10).contains(&value) {
        return Err(ValidationError::MarkValueOutOfRange(value));
    }
    Ok(())
}

/// Sorts items by name in the given order. Ties keep ascending id order.
pub fn sort_by_name<T>(
    items: &mut [T],
    order: SortOrder,
    name_of: impl Fn(&T) -> &str,
    id_of: impl Fn(&T) -> i64,
) {
    items.sort_by(|a, b| {
        let by_name = name_of(a).cmp(name_of(b));
        let by_name = match order {
            SortOrder::Asc => by_name,
            SortOrder::Desc => by_name.reverse(),
        };
        by_name.then_with(|| id_of(a).cmp(&id_of(b)))
    });
}

/// Applies the age filter and name ordering of a student listing.
///
/// Without a sort order students come back in id order.
pub fn filter_students(
    students: impl IntoIterator<Item = Student>,
    age: Option<i32>,
    sort: Option<SortOrder>,
) -> Vec<Student> {
    let mut result: Vec<Student> = students
        .into_iter()
        .filter(|s| age.is_none_or(|age| s.age == age))
        .collect();

    match sort {
        Some(order) => sort_by_name(&mut result, order, |s| &s.name, |s| s.id),
        None => result.sort_by_key(|s| s.id),
    }
    result
}

/// Lists named entities: a name filter takes precedence over ordering.
///
/// The name filter is a case-sensitive substring match.
pub fn list_by_name<T>(
    items: impl IntoIterator<Item = T>,
    query: &NameQuery,
    name_of: impl Fn(&T) -> &str,
    id_of: impl Fn(&T) -> i64,
) -> Vec<T> {
    let mut result: Vec<T> = items.into_iter().collect();

    if let Some(pattern) = &query.name {
        result.retain(|item| name_of(item).contains(pattern.as_str()));
        result.sort_by_key(&id_of);
    } else if let Some(order) = query.sort {
        sort_by_name(&mut result, order, name_of, id_of);
    } else {
        result.sort_by_key(&id_of);
    }
    result
}

pub fn filter_marks(marks: impl IntoIterator<Item = Mark>, query: &MarkQuery) -> Vec<Mark> {
    let mut result: Vec<Mark> = marks
        .into_iter()
        .filter(|m| {
            query.student_id.is_none_or(|id| m.student_id == id)
                && query.subject_id.is_none_or(|id| m.subject_id == id)
        })
        .collect();
    result.sort_by_key(|m| m.id);
    result
}

/// Returns the requested ids that are absent from `found`, in request order.
pub fn find_missing_ids(requested: &[i64], found: &[i64]) -> Vec<i64> {
    let found: HashSet<i64> = found.iter().copied().collect();
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id) && seen.insert(*id))
        .collect()
}
