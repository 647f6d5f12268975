mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    group_key, group_list_key, group_list_pattern, group_name_key, mark_list_key,
    marks_by_value_key, region_pattern, student_average_key, student_key, student_list_key,
    student_list_pattern, student_subjects_key, student_with_subjects_key, students_by_group_key,
    subject_average_key, subject_exists_key, subject_key, subject_list_key, subject_list_pattern,
    subject_name_key, subject_students_key, subject_with_students_key, GROUPS, MARKS, REGIONS,
    STUDENTS, STUDENT_SUBJECTS, SUBJECTS,
};
pub use patterns::{pattern_matches, region_of};
pub use serialization::{deserialize, serialize, SerializationError};
pub use traits::Cache;
