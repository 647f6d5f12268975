//! SQLite repository implementation.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use roster_core::roster::{
    Group, Mark, MarkCriteria, MarkQuery, NameQuery, NewMark, NewStudent, SortOrder, Student,
    Subject,
};
use roster_core::storage::{
    GroupRepository, MarkRepository, RepositoryError, Result, StudentRepository,
    StudentSubjectRepository, SubjectRepository,
};

use super::conversions::{row_to_group, row_to_mark, row_to_student, row_to_subject};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Turns "no rows changed" into `QueryReturnedNoRows` so it maps to `NotFound`.
fn require_changed(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// Runs a query and collects every mapped row.
fn query_all<T, P>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> std::result::Result<Vec<T>, tokio_rusqlite::Error>
where
    P: rusqlite::Params,
{
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    let rows = stmt.query_map(params, map).map_err(wrap_err)?;
    rows.collect::<rusqlite::Result<Vec<T>>>().map_err(wrap_err)
}

/// Runs a query expected to return at most one mapped row.
fn query_optional<T, P>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> std::result::Result<Option<T>, tokio_rusqlite::Error>
where
    P: rusqlite::Params,
{
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    stmt.query_row(params, map).optional().map_err(wrap_err)
}

/// SQLite-based repository implementation.
///
/// Implements every roster repository trait over one connection.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// StudentRepository implementation
// ============================================================================

#[async_trait]
impl StudentRepository for SqliteRepository {
    async fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_STUDENT_BY_ID, [id], row_to_student)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Student", id))
    }

    async fn get_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        self.conn
            .call(move |conn| {
                let mut students = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Some(student) =
                        query_optional(conn, schema::SELECT_STUDENT_BY_ID, [id], row_to_student)?
                    {
                        students.push(student);
                    }
                }
                Ok(students)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Student"))
    }

    async fn list_students(
        &self,
        age: Option<i32>,
        sort: Option<SortOrder>,
    ) -> Result<Vec<Student>> {
        let sql = schema::student_listing_sql(age.is_some(), sort);

        self.conn
            .call(move |conn| match age {
                Some(age) => query_all(conn, &sql, [age], row_to_student),
                None => query_all(conn, &sql, [], row_to_student),
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Student"))
    }

    async fn get_students_by_group(&self, group_id: i64) -> Result<Vec<Student>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_STUDENTS_BY_GROUP, [group_id], row_to_student)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Student"))
    }

    async fn create_student(&self, student: &NewStudent) -> Result<Student> {
        let student = student.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                // 1. Bare student row
                tx.execute(
                    schema::INSERT_STUDENT,
                    params![student.name, student.age, student.group_id],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();

                // 2. Enrollments, one at a time
                for subject_id in &student.subject_ids {
                    tx.execute(schema::INSERT_STUDENT_SUBJECT, params![id, subject_id])
                        .map_err(wrap_err)?;
                }

                // 3. Marks bound to the new id
                for mark in &student.marks {
                    tx.execute(schema::INSERT_MARK, params![mark.value, id, mark.subject_id])
                        .map_err(wrap_err)?;
                }

                tx.commit().map_err(wrap_err)?;

                Ok(Student {
                    id,
                    name: student.name,
                    age: student.age,
                    group_id: student.group_id,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Student"))
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        let id = student.id;
        let name = student.name.clone();
        let age = student.age;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_STUDENT, params![name, age, id])
                    .map_err(wrap_err)?;
                require_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Student", id))
    }

    async fn delete_student(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                tx.execute(schema::DELETE_STUDENT_SUBJECTS_BY_STUDENT, [id])
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_MARKS_BY_STUDENT, [id])
                    .map_err(wrap_err)?;
                let rows = tx.execute(schema::DELETE_STUDENT, [id]).map_err(wrap_err)?;
                require_changed(rows)?;

                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Student", id))
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for SqliteRepository {
    async fn get_group(&self, id: i64) -> Result<Option<Group>> {
        self.conn
            .call(move |conn| query_optional(conn, schema::SELECT_GROUP_BY_ID, [id], row_to_group))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", id))
    }

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_GROUP_BY_NAME, [&name], row_to_group)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Group"))
    }

    async fn list_groups(&self, query: &NameQuery) -> Result<Vec<Group>> {
        let sql = schema::name_listing_sql("student_groups", query);
        let name = query.name.clone();

        self.conn
            .call(move |conn| match name {
                Some(name) => query_all(conn, &sql, [name], row_to_group),
                None => query_all(conn, &sql, [], row_to_group),
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Group"))
    }

    async fn create_group(&self, name: &str, student_ids: &[i64]) -> Result<Group> {
        let name = name.to_string();
        let group_name = name.clone();
        let student_ids = student_ids.to_vec();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                tx.execute(schema::INSERT_GROUP, [&name]).map_err(wrap_err)?;
                let id = tx.last_insert_rowid();

                for student_id in &student_ids {
                    let rows = tx
                        .execute(schema::UPDATE_STUDENT_GROUP, params![id, student_id])
                        .map_err(wrap_err)?;
                    if rows == 0 {
                        // Dropping the transaction rolls the group back.
                        return Ok(Err(RepositoryError::not_found("Student", student_id)));
                    }
                }

                tx.commit().map_err(wrap_err)?;
                Ok(Ok(Group { id, name }))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", group_name))?
    }

    async fn delete_group(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                tx.execute(schema::CLEAR_GROUP_MEMBERSHIP, [id])
                    .map_err(wrap_err)?;
                let rows = tx.execute(schema::DELETE_GROUP, [id]).map_err(wrap_err)?;
                require_changed(rows)?;

                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", id))
    }
}

// ============================================================================
// SubjectRepository implementation
// ============================================================================

#[async_trait]
impl SubjectRepository for SqliteRepository {
    async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_SUBJECT_BY_ID, [id], row_to_subject)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Subject", id))
    }

    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_SUBJECT_BY_NAME, [&name], row_to_subject)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subject"))
    }

    async fn get_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        self.conn
            .call(move |conn| {
                let mut subjects = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Some(subject) =
                        query_optional(conn, schema::SELECT_SUBJECT_BY_ID, [id], row_to_subject)?
                    {
                        subjects.push(subject);
                    }
                }
                Ok(subjects)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subject"))
    }

    async fn list_subjects(&self, query: &NameQuery) -> Result<Vec<Subject>> {
        let sql = schema::name_listing_sql("subjects", query);
        let name = query.name.clone();

        self.conn
            .call(move |conn| match name {
                Some(name) => query_all(conn, &sql, [name], row_to_subject),
                None => query_all(conn, &sql, [], row_to_subject),
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subject"))
    }

    async fn create_subject(&self, name: &str) -> Result<Subject> {
        let name = name.to_string();
        let subject_name = name.clone();

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_SUBJECT, [&name])
                    .map_err(wrap_err)?;
                Ok(Subject {
                    id: conn.last_insert_rowid(),
                    name,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Subject", subject_name))
    }

    async fn delete_subject(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                tx.execute(schema::DELETE_STUDENT_SUBJECTS_BY_SUBJECT, [id])
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_MARKS_BY_SUBJECT, [id])
                    .map_err(wrap_err)?;
                let rows = tx.execute(schema::DELETE_SUBJECT, [id]).map_err(wrap_err)?;
                require_changed(rows)?;

                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Subject", id))
    }

    async fn subject_exists_by_name(&self, name: &str) -> Result<bool> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_SUBJECT_EXISTS_BY_NAME, [&name], |row| {
                    row.get(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subject"))
    }
}

// ============================================================================
// MarkRepository implementation
// ============================================================================

#[async_trait]
impl MarkRepository for SqliteRepository {
    async fn list_marks(&self, query: &MarkQuery) -> Result<Vec<Mark>> {
        let student_id = query.student_id;
        let subject_id = query.subject_id;

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_MARKS,
                    params![student_id, subject_id],
                    row_to_mark,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Mark"))
    }

    async fn get_marks_by_value(&self, value: i32) -> Result<Vec<Mark>> {
        self.conn
            .call(move |conn| query_all(conn, schema::SELECT_MARKS_BY_VALUE, [value], row_to_mark))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Mark"))
    }

    async fn average_for_student(&self, student_id: i64) -> Result<Option<f64>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_AVERAGE_FOR_STUDENT, [student_id], |row| {
                    row.get(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Mark"))
    }

    async fn average_for_subject(&self, subject_id: i64) -> Result<Option<f64>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_AVERAGE_FOR_SUBJECT, [subject_id], |row| {
                    row.get(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Mark"))
    }

    async fn create_mark(&self, mark: &NewMark) -> Result<Mark> {
        let mark = mark.clone();

        let (student_id, subject_id) = (mark.student_id, mark.subject_id);

        let created = self
            .conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::INSERT_ENROLLED_MARK,
                        params![mark.value, mark.student_id, mark.subject_id],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Ok(None);
                }
                Ok(Some(Mark {
                    id: conn.last_insert_rowid(),
                    value: mark.value,
                    student_id: mark.student_id,
                    subject_id: mark.subject_id,
                }))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Mark"))?;

        created.ok_or(RepositoryError::NotEnrolled {
            student_id,
            subject_id,
        })
    }

    async fn delete_mark(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_MARK, [id]).map_err(wrap_err)?;
                require_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Mark", id))
    }

    async fn delete_marks_matching(&self, criteria: &MarkCriteria) -> Result<u64> {
        let criteria = criteria.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::DELETE_MARKS_MATCHING,
                        params![
                            criteria.student_id,
                            criteria.subject_name,
                            criteria.value,
                            criteria.id
                        ],
                    )
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Mark"))
    }
}

// ============================================================================
// StudentSubjectRepository implementation
// ============================================================================

#[async_trait]
impl StudentSubjectRepository for SqliteRepository {
    async fn add_subject(&self, student_id: i64, subject_id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_STUDENT_SUBJECT, params![student_id, subject_id])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StudentSubject"))
    }

    async fn remove_subject(&self, student_id: i64, subject_id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_STUDENT_SUBJECT, params![student_id, subject_id])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StudentSubject"))
    }

    async fn has_subject(&self, student_id: i64, subject_id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_STUDENT_SUBJECT_EXISTS,
                    params![student_id, subject_id],
                    |row| row.get(0),
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "StudentSubject"))
    }

    async fn subjects_for_student(&self, student_id: i64) -> Result<Vec<Subject>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_SUBJECTS_FOR_STUDENT,
                    [student_id],
                    row_to_subject,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Subject"))
    }

    async fn students_for_subject(&self, subject_id: i64) -> Result<Vec<Student>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_STUDENTS_FOR_SUBJECT,
                    [subject_id],
                    row_to_student,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Student"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> SqliteRepository {
        SqliteRepository::new_in_memory()
            .await
            .expect("Failed to create in-memory repository")
    }

    // ==================== Student Tests ====================

    #[tokio::test]
    async fn test_student_create_with_enrollments_and_marks() {
        let repo = setup().await;
        let math = repo.create_subject("Math").await.unwrap();

        let student = repo
            .create_student(
                &NewStudent::new("Ada", 20)
                    .with_subjects([math.id])
                    .with_mark(math.id, 9),
            )
            .await
            .unwrap();

        assert_eq!(repo.get_student(student.id).await.unwrap(), Some(student.clone()));
        assert!(repo.has_subject(student.id, math.id).await.unwrap());
        assert_eq!(repo.average_for_student(student.id).await.unwrap(), Some(9.0));
    }

    #[tokio::test]
    async fn test_student_create_rolls_back_on_unknown_subject() {
        let repo = setup().await;

        let result = repo
            .create_student(&NewStudent::new("Ada", 20).with_subjects([404]))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.list_students(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_student_update_and_missing() {
        let repo = setup().await;
        let student = repo
            .create_student(&NewStudent::new("Ada", 20))
            .await
            .unwrap();

        let mut changed = student.clone();
        changed.age = 21;
        repo.update_student(&changed).await.unwrap();
        assert_eq!(repo.get_student(student.id).await.unwrap().unwrap().age, 21);

        let result = repo.update_student(&Student::new(999, "Ghost", 30)).await;
        assert_eq!(result, Err(RepositoryError::not_found("Student", 999)));
    }

    #[tokio::test]
    async fn test_student_delete_detaches_enrollments() {
        let repo = setup().await;
        let math = repo.create_subject("Math").await.unwrap();
        let student = repo
            .create_student(
                &NewStudent::new("Ada", 20)
                    .with_subjects([math.id])
                    .with_mark(math.id, 7),
            )
            .await
            .unwrap();

        repo.delete_student(student.id).await.unwrap();

        assert!(repo.get_student(student.id).await.unwrap().is_none());
        assert!(repo.students_for_subject(math.id).await.unwrap().is_empty());
        assert_eq!(repo.average_for_subject(math.id).await.unwrap(), None);
        assert!(matches!(
            repo.delete_student(student.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_students_sorted_by_age() {
        let repo = setup().await;
        repo.create_student(&NewStudent::new("Carla", 20)).await.unwrap();
        repo.create_student(&NewStudent::new("Alan", 21)).await.unwrap();
        repo.create_student(&NewStudent::new("Bea", 20)).await.unwrap();

        let students = repo
            .list_students(Some(20), Some(SortOrder::Desc))
            .await
            .unwrap();
        let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Carla", "Bea"]);

        assert_eq!(repo.list_students(None, None).await.unwrap().len(), 3);
    }

    // ==================== Group Tests ====================

    #[tokio::test]
    async fn test_group_create_is_all_or_nothing() {
        let repo = setup().await;
        let ada = repo
            .create_student(&NewStudent::new("Ada", 20))
            .await
            .unwrap();

        let result = repo.create_group("A-1", &[ada.id, 77]).await;

        assert_eq!(result, Err(RepositoryError::not_found("Student", 77)));
        assert!(repo.get_group_by_name("A-1").await.unwrap().is_none());
        assert_eq!(repo.get_student(ada.id).await.unwrap().unwrap().group_id, None);
    }

    #[tokio::test]
    async fn test_group_create_and_delete() {
        let repo = setup().await;
        let ada = repo
            .create_student(&NewStudent::new("Ada", 20))
            .await
            .unwrap();

        let group = repo.create_group("A-1", &[ada.id]).await.unwrap();
        assert_eq!(repo.get_students_by_group(group.id).await.unwrap().len(), 1);

        repo.delete_group(group.id).await.unwrap();
        assert!(repo.get_group(group.id).await.unwrap().is_none());
        assert_eq!(repo.get_student(ada.id).await.unwrap().unwrap().group_id, None);
    }

    #[tokio::test]
    async fn test_group_duplicate_name() {
        let repo = setup().await;
        repo.create_group("A-1", &[]).await.unwrap();

        let result = repo.create_group("A-1", &[]).await;
        assert_eq!(result, Err(RepositoryError::already_exists("Group", "A-1")));
    }

    #[tokio::test]
    async fn test_list_groups_filter_and_sort() {
        let repo = setup().await;
        repo.create_group("B-2", &[]).await.unwrap();
        repo.create_group("A-1", &[]).await.unwrap();
        repo.create_group("b-3", &[]).await.unwrap();

        let filtered = repo
            .list_groups(&NameQuery {
                name: Some("B".to_string()),
                sort: None,
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);

        let sorted = repo
            .list_groups(&NameQuery {
                name: None,
                sort: Some(SortOrder::Asc),
            })
            .await
            .unwrap();
        assert_eq!(sorted[0].name, "A-1");
    }

    // ==================== Subject Tests ====================

    #[tokio::test]
    async fn test_subject_delete_cascades() {
        let repo = setup().await;
        let math = repo.create_subject("Math").await.unwrap();
        let ada = repo
            .create_student(
                &NewStudent::new("Ada", 20)
                    .with_subjects([math.id])
                    .with_mark(math.id, 6),
            )
            .await
            .unwrap();

        repo.delete_subject(math.id).await.unwrap();

        assert!(!repo.subject_exists_by_name("Math").await.unwrap());
        assert!(repo.subjects_for_student(ada.id).await.unwrap().is_empty());
        assert_eq!(repo.average_for_student(ada.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_subject_lookup_by_ids_skips_unknown() {
        let repo = setup().await;
        let math = repo.create_subject("Math").await.unwrap();

        let found = repo.get_subjects_by_ids(&[math.id, 50, math.id]).await.unwrap();
        assert_eq!(found, vec![math]);
    }

    // ==================== Mark Tests ====================

    #[tokio::test]
    async fn test_mark_insert_requires_enrollment() {
        let repo = setup().await;
        let math = repo.create_subject("Math").await.unwrap();
        let ada = repo
            .create_student(&NewStudent::new("Ada", 20).with_subjects([math.id]))
            .await
            .unwrap();
        repo.remove_subject(ada.id, math.id).await.unwrap();

        let result = repo
            .create_mark(&NewMark {
                value: 6,
                student_id: ada.id,
                subject_id: math.id,
            })
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::NotEnrolled {
                student_id: ada.id,
                subject_id: math.id,
            })
        );
        assert!(repo.get_marks_by_value(6).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_marks_filters_and_conditional_delete() {
        let repo = setup().await;
        let math = repo.create_subject("Math").await.unwrap();
        let ada = repo
            .create_student(&NewStudent::new("Ada", 20).with_subjects([math.id]))
            .await
            .unwrap();
        let mark = repo
            .create_mark(&NewMark {
                value: 4,
                student_id: ada.id,
                subject_id: math.id,
            })
            .await
            .unwrap();

        let by_subject = repo
            .list_marks(&MarkQuery {
                student_id: None,
                subject_id: Some(math.id),
            })
            .await
            .unwrap();
        assert_eq!(by_subject, vec![mark.clone()]);
        assert_eq!(repo.get_marks_by_value(4).await.unwrap().len(), 1);

        let criteria = MarkCriteria {
            student_id: ada.id,
            subject_name: "Physics".to_string(),
            value: 4,
            id: None,
        };
        assert_eq!(repo.delete_marks_matching(&criteria).await.unwrap(), 0);

        let criteria = MarkCriteria {
            subject_name: "Math".to_string(),
            id: Some(mark.id),
            ..criteria
        };
        assert_eq!(repo.delete_marks_matching(&criteria).await.unwrap(), 1);
        assert!(repo.list_marks(&MarkQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_mark_missing() {
        let repo = setup().await;
        assert_eq!(
            repo.delete_mark(3).await,
            Err(RepositoryError::not_found("Mark", 3))
        );
    }

    // ==================== Enrollment Tests ====================

    #[tokio::test]
    async fn test_enrollment_roundtrip() {
        let repo = setup().await;
        let art = repo.create_subject("Art").await.unwrap();
        let ada = repo
            .create_student(&NewStudent::new("Ada", 20))
            .await
            .unwrap();

        repo.add_subject(ada.id, art.id).await.unwrap();
        repo.add_subject(ada.id, art.id).await.unwrap();
        assert_eq!(repo.subjects_for_student(ada.id).await.unwrap(), vec![art.clone()]);
        assert_eq!(repo.students_for_subject(art.id).await.unwrap(), vec![ada.clone()]);

        repo.remove_subject(ada.id, art.id).await.unwrap();
        assert!(!repo.has_subject(ada.id, art.id).await.unwrap());
    }
}
