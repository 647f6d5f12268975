pub mod error;
pub mod extract;
pub mod groups;
pub mod health;
pub mod marks;
pub mod student_subjects;
pub mod students;
pub mod subjects;

pub use error::AppError;
