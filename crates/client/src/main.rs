//! roster-client CLI entry point.

use clap::Parser;
use roster_client::cli::enrollments::EnrollmentsAction;
use roster_client::cli::groups::GroupsAction;
use roster_client::cli::marks::MarksAction;
use roster_client::cli::students::StudentsAction;
use roster_client::cli::subjects::SubjectsAction;
use roster_client::cli::{Cli, Commands, OutputFormat};
use roster_client::client::RosterClient;
use roster_client::output::{format_output, pretty};
use roster_core::roster::{
    MarkCriteria, MarkQuery, NameQuery, NewGroup, NewMark, NewStudent, NewSubject, StudentQuery,
    StudentUpdate,
};
use serde::Serialize;

/// Print a value in the selected format.
fn emit<T: Serialize>(value: &T, format: OutputFormat, label: &str, pretty: impl Fn(&T) -> String) {
    match format {
        OutputFormat::Json => println!("{}", format_output(value, format)),
        OutputFormat::Pretty if label.is_empty() => println!("{}", pretty(value)),
        OutputFormat::Pretty => println!("{}:\n{}", label, pretty(value)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = RosterClient::new(&cli.base_url);
    let format = cli.format;

    match cli.command {
        Commands::Students(cmd) => match cmd.action {
            StudentsAction::List { age, sort, id } => {
                let students = client
                    .list_students(&StudentQuery { age, sort, id })
                    .await?;
                emit(&students, format, "", |s| pretty::format_students(s));
            }
            StudentsAction::Get { id } => {
                let student = client.get_student(id).await?;
                emit(&student, format, "", pretty::format_student);
            }
            StudentsAction::ByGroup { group_id } => {
                let students = client.students_by_group(group_id).await?;
                emit(&students, format, "", |s| pretty::format_students(s));
            }
            StudentsAction::Create {
                name,
                age,
                group_id,
                subject_ids,
                marks,
            } => {
                let student = client
                    .create_student(&NewStudent {
                        name,
                        age,
                        group_id,
                        subject_ids,
                        marks,
                    })
                    .await?;
                emit(&student, format, "Created", pretty::format_student);
            }
            StudentsAction::Update { id, name, age } => {
                let student = client
                    .update_student(id, &StudentUpdate { name, age })
                    .await?;
                emit(&student, format, "Updated", pretty::format_student);
            }
            StudentsAction::Delete { id } => {
                client.delete_student(id).await?;
                if !cli.quiet {
                    println!("Deleted student {}", id);
                }
            }
        },
        Commands::Groups(cmd) => match cmd.action {
            GroupsAction::List { name, sort } => {
                let groups = client.list_groups(&NameQuery { name, sort }).await?;
                emit(&groups, format, "", |g| pretty::format_groups(g));
            }
            GroupsAction::Get { id } => {
                let group = client.get_group(id).await?;
                emit(&group, format, "", pretty::format_group);
            }
            GroupsAction::GetByName { name } => {
                let group = client.get_group_by_name(&name).await?;
                emit(&group, format, "", pretty::format_group);
            }
            GroupsAction::Create { name, student_ids } => {
                let group = client
                    .create_group(&NewGroup { name, student_ids })
                    .await?;
                emit(&group, format, "Created", pretty::format_group);
            }
            GroupsAction::Delete { id } => {
                client.delete_group(id).await?;
                if !cli.quiet {
                    println!("Deleted group {}", id);
                }
            }
            GroupsAction::DeleteByName { name } => {
                client.delete_group_by_name(&name).await?;
                if !cli.quiet {
                    println!("Deleted group {}", name);
                }
            }
        },
        Commands::Subjects(cmd) => match cmd.action {
            SubjectsAction::List { name, sort } => {
                let subjects = client.list_subjects(&NameQuery { name, sort }).await?;
                emit(&subjects, format, "", |s| pretty::format_subjects(s));
            }
            SubjectsAction::Get { id } => {
                let subject = client.get_subject(id).await?;
                emit(&subject, format, "", pretty::format_subject);
            }
            SubjectsAction::GetByName { name } => {
                let subject = client.get_subject_by_name(&name).await?;
                emit(&subject, format, "", pretty::format_subject);
            }
            SubjectsAction::Exists { name } => {
                let exists = client.subject_exists(&name).await?;
                emit(&exists, format, "", |e| format!("{}", e));
            }
            SubjectsAction::Create { name } => {
                let subject = client.create_subject(&NewSubject { name }).await?;
                emit(&subject, format, "Created", pretty::format_subject);
            }
            SubjectsAction::Delete { id } => {
                client.delete_subject(id).await?;
                if !cli.quiet {
                    println!("Deleted subject {}", id);
                }
            }
            SubjectsAction::DeleteByName { name } => {
                client.delete_subject_by_name(&name).await?;
                if !cli.quiet {
                    println!("Deleted subject {}", name);
                }
            }
        },
        Commands::Marks(cmd) => match cmd.action {
            MarksAction::List {
                student_id,
                subject_id,
            } => {
                let marks = client
                    .list_marks(&MarkQuery {
                        student_id,
                        subject_id,
                    })
                    .await?;
                emit(&marks, format, "", |m| pretty::format_marks(m));
            }
            MarksAction::ByValue { value } => {
                let marks = client.marks_by_value(value).await?;
                emit(&marks, format, "", |m| pretty::format_marks(m));
            }
            MarksAction::StudentAverage { id } => {
                let average = client.student_average(id).await?;
                emit(&average, format, "", |a| pretty::format_average(*a));
            }
            MarksAction::SubjectAverage { id } => {
                let average = client.subject_average(id).await?;
                emit(&average, format, "", |a| pretty::format_average(*a));
            }
            MarksAction::Create {
                value,
                student_id,
                subject_id,
            } => {
                let mark = client
                    .create_mark(&NewMark {
                        value,
                        student_id,
                        subject_id,
                    })
                    .await?;
                emit(&mark, format, "Created", pretty::format_mark);
            }
            MarksAction::Delete { id } => {
                client.delete_mark(id).await?;
                if !cli.quiet {
                    println!("Deleted mark {}", id);
                }
            }
            MarksAction::DeleteMatching {
                student_id,
                subject_name,
                value,
                id,
            } => {
                client
                    .delete_marks_matching(&MarkCriteria {
                        student_id,
                        subject_name,
                        value,
                        id,
                    })
                    .await?;
                if !cli.quiet {
                    println!("Deleted matching marks for student {}", student_id);
                }
            }
        },
        Commands::Enrollments(cmd) => match cmd.action {
            EnrollmentsAction::Add {
                student_id,
                subject_id,
            } => {
                client.enroll(student_id, subject_id).await?;
                if !cli.quiet {
                    println!("Enrolled student {} in subject {}", student_id, subject_id);
                }
            }
            EnrollmentsAction::Remove {
                student_id,
                subject_id,
            } => {
                client.unenroll(student_id, subject_id).await?;
                if !cli.quiet {
                    println!("Removed student {} from subject {}", student_id, subject_id);
                }
            }
            EnrollmentsAction::Subjects { student_id } => {
                let subjects = client.subjects_for_student(student_id).await?;
                emit(&subjects, format, "", |s| pretty::format_subjects(s));
            }
            EnrollmentsAction::Students { subject_id } => {
                let students = client.students_for_subject(subject_id).await?;
                emit(&students, format, "", |s| pretty::format_students(s));
            }
            EnrollmentsAction::StudentView { student_id } => {
                let view = client.student_with_subjects(student_id).await?;
                emit(&view, format, "", pretty::format_student_with_subjects);
            }
            EnrollmentsAction::SubjectView { subject_id } => {
                let view = client.subject_with_students(subject_id).await?;
                emit(&view, format, "", pretty::format_subject_with_students);
            }
        },
        Commands::Health => {
            client.livez().await?;
            if !cli.quiet {
                println!("Server at {} is alive", client.base_url());
            }
        }
    }

    Ok(())
}
