//! Terminal front end for the subject list screen.
//!
//! Every command opens the store, loads the list through
//! `SubjectListController`, and renders the resulting state.

mod commands;

use clap::Parser;
use commands::{Cli, Commands};
use log::{error, info};
use std::error::Error;
use studytrack_core::db::open_db;
use studytrack_core::{
    default_log_level, init_logging, SqliteSubjectRepository, Subject, SubjectId,
    SubjectListController,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("event=cli_command module=cli status=error error={e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    if let Commands::Ping = cli.command {
        println!("studytrack_core ping={}", studytrack_core::ping());
        println!("studytrack_core version={}", studytrack_core::core_version());
        return Ok(());
    }

    let repo = SqliteSubjectRepository::new(open_db(&cli.db)?);
    let controller = SubjectListController::open(repo).await?;

    match cli.command {
        Commands::List(args) => {
            if let Some(query) = args.query {
                controller.set_query(query);
            }
            let subjects = controller.filtered_list();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&subjects)?);
            } else {
                print_subjects(&subjects);
            }
        }
        Commands::Add(args) => match controller.add_subject(&args.title).await? {
            Some(subject) => println!("added {}", format_subject(&subject)),
            None => println!("nothing added: title is empty"),
        },
        Commands::Edit(args) => {
            let subject = find_subject(&controller.full_list(), args.id)?;
            match controller.edit_subject(&subject, &args.title).await? {
                Some(updated) => println!("updated {}", format_subject(&updated)),
                None => println!("nothing changed: title is empty"),
            }
        }
        Commands::Delete(args) => match delete_by_id(&controller, args.id).await? {
            Some(subject) => println!("deleted {}", format_subject(&subject)),
            None => println!("nothing deleted: no subject with id {}", args.id),
        },
        Commands::Ping => {}
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}

/// Deletes the subject with `id`, returning it when it was listed.
///
/// An absent id still goes through storage and succeeds as a no-op.
async fn delete_by_id(
    controller: &SubjectListController<SqliteSubjectRepository>,
    id: SubjectId,
) -> CliResult<Option<Subject>> {
    let listed = find_subject(&controller.full_list(), id).ok();
    let target = listed
        .clone()
        .unwrap_or_else(|| Subject::new(id, String::new()));
    controller.delete_subject(&target).await?;
    Ok(listed)
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List(_) => "list",
        Commands::Add(_) => "add",
        Commands::Edit(_) => "edit",
        Commands::Delete(_) => "delete",
        Commands::Ping => "ping",
    }
}

fn find_subject(subjects: &[Subject], id: SubjectId) -> CliResult<Subject> {
    subjects
        .iter()
        .find(|subject| subject.id == id)
        .cloned()
        .ok_or_else(|| format!("no subject with id {id}").into())
}

fn print_subjects(subjects: &[Subject]) {
    if subjects.is_empty() {
        println!("no subjects");
        return;
    }
    for subject in subjects {
        println!("{}", format_subject(subject));
    }
}

fn format_subject(subject: &Subject) -> String {
    format!("#{:<4} {}", subject.id, subject.title)
}

#[cfg(test)]
mod tests {
    use super::{command_name, delete_by_id, find_subject, format_subject};
    use crate::commands::{Commands, DeleteArgs};
    use studytrack_core::db::open_db_in_memory;
    use studytrack_core::{SqliteSubjectRepository, Subject, SubjectListController, SubjectRepository};

    #[test]
    fn find_subject_reports_missing_id() {
        let subjects = vec![Subject::new(1, "Algebra")];
        assert_eq!(find_subject(&subjects, 1).unwrap().title, "Algebra");
        let err = find_subject(&subjects, 2).unwrap_err();
        assert_eq!(err.to_string(), "no subject with id 2");
    }

    #[tokio::test]
    async fn delete_by_id_treats_absent_id_as_no_op() {
        let repo = SqliteSubjectRepository::new(open_db_in_memory().unwrap());
        repo.add_subject(&Subject::new(1, "Algebra")).unwrap();
        let controller = SubjectListController::open(repo).await.unwrap();

        let missing = delete_by_id(&controller, 42).await.unwrap();
        assert_eq!(missing, None);
        assert_eq!(controller.full_list(), vec![Subject::new(1, "Algebra")]);

        let removed = delete_by_id(&controller, 1).await.unwrap();
        assert_eq!(removed, Some(Subject::new(1, "Algebra")));
        assert!(controller.full_list().is_empty());
    }

    #[test]
    fn command_name_is_stable_for_log_events() {
        assert_eq!(command_name(&Commands::Ping), "ping");
        assert_eq!(command_name(&Commands::Delete(DeleteArgs { id: 3 })), "delete");
    }

    #[test]
    fn format_subject_pads_id_column() {
        assert_eq!(format_subject(&Subject::new(7, "Physics")), "#7    Physics");
    }
}
