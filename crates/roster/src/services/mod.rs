//! Cache-aware roster services.
//!
//! Each service wraps the storage traits with cache-aside reads and
//! write paths that evict every key a read could have populated.

mod cache_layer;
mod groups;
mod marks;
mod student_subjects;
mod students;
mod subjects;

#[cfg(all(test, feature = "inmemory", feature = "memory"))]
pub(crate) mod testing;

use std::future::Future;
use std::time::Instant;

use roster_core::roster::ServiceError;

pub use cache_layer::CacheLayer;
pub use groups::GroupService;
pub use marks::MarkService;
pub use student_subjects::StudentSubjectService;
pub use students::StudentService;
pub use subjects::SubjectService;

/// Service result type.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Runs a service operation and logs how long it took.
async fn timed<T>(operation: &'static str, fut: impl Future<Output = Result<T>>) -> Result<T> {
    let start = Instant::now();
    let result = fut.await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::info!(operation, elapsed_ms, "Execution time"),
        Err(err) => tracing::info!(operation, elapsed_ms, error = %err, "Operation failed"),
    }

    result
}

#[cfg(all(test, feature = "inmemory", feature = "memory"))]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use roster_core::roster::{NewStudent, NewSubject};
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::testing::Fixture;

    /// Collects the `operation` field of every event.
    #[derive(Clone, Default)]
    struct Operations(Arc<Mutex<Vec<String>>>);

    struct OperationVisitor<'a>(&'a Mutex<Vec<String>>);

    impl Visit for OperationVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "operation" {
                self.0.lock().unwrap().push(value.to_string());
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
    }

    impl<S: tracing::Subscriber> Layer<S> for Operations {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            event.record(&mut OperationVisitor(&self.0));
        }
    }

    #[tokio::test]
    async fn test_operations_log_elapsed_time() {
        let operations = Operations::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(operations.clone()));

        let fx = Fixture::new();
        let math = fx
            .subjects
            .create(&NewSubject {
                name: "Math".to_string(),
            })
            .await
            .unwrap();
        fx.subjects.get_by_name("Math").await.unwrap();
        fx.subjects.exists("Math").await.unwrap();
        let ada = fx.students.create(&NewStudent::new("Ada", 20)).await.unwrap();
        fx.enrollments.add(ada.id, math.id).await.unwrap();
        fx.marks.by_value(5).await.unwrap();
        fx.marks.student_average(ada.id).await.unwrap();
        fx.enrollments.remove(ada.id, math.id).await.unwrap();
        fx.students.delete(ada.id).await.unwrap();
        fx.subjects.delete_by_name("Math").await.unwrap();

        let recorded = operations.0.lock().unwrap().clone();
        for operation in [
            "add_subject",
            "find_subject_by_name",
            "subject_exists",
            "add_student",
            "add_subject_to_student",
            "marks_by_value",
            "student_average",
            "remove_subject_from_student",
            "delete_student",
            "delete_subject_by_name",
        ] {
            assert!(
                recorded.iter().any(|r| r == operation),
                "{operation} was not timed: {recorded:?}"
            );
        }
    }
}
