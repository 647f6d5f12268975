mod error;
mod operations;
mod requests;
mod types;

pub use error::{ServiceError, ValidationError};
pub use operations::{
    filter_marks, filter_students, find_missing_ids, list_by_name, sort_by_name,
    validate_age, validate_mark_value, validate_name, validate_positive_id,
};
pub use requests::{
    MarkCriteria, MarkQuery, NameQuery, NewGroup, NewMark, NewStudent, NewStudentMark, NewSubject,
    SortOrder, StudentQuery, StudentUpdate, Validate,
};
pub use types::{Group, Mark, Student, StudentWithSubjects, Subject, SubjectWithStudents};
