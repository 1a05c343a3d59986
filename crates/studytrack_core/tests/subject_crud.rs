use studytrack_core::db::open_db_in_memory;
use studytrack_core::{
    RepoError, SqliteSubjectRepository, Subject, SubjectRepository, SubjectValidationError,
};

fn setup() -> SqliteSubjectRepository {
    SqliteSubjectRepository::new(open_db_in_memory().unwrap())
}

#[test]
fn add_and_list_roundtrip_orders_by_id() {
    let repo = setup();

    repo.add_subject(&Subject::new(2, "Biology")).unwrap();
    repo.add_subject(&Subject::new(1, "Algebra")).unwrap();

    let all = repo.get_all_subjects().unwrap();
    assert_eq!(
        all,
        vec![Subject::new(1, "Algebra"), Subject::new(2, "Biology")]
    );
}

#[test]
fn max_id_is_none_for_empty_store() {
    let repo = setup();
    assert_eq!(repo.get_max_subject_id().unwrap(), None);

    repo.add_subject(&Subject::new(5, "Chemistry")).unwrap();
    repo.add_subject(&Subject::new(3, "Physics")).unwrap();
    assert_eq!(repo.get_max_subject_id().unwrap(), Some(5));
}

#[test]
fn add_with_existing_id_fails() {
    let repo = setup();
    repo.add_subject(&Subject::new(1, "Algebra")).unwrap();

    let err = repo.add_subject(&Subject::new(1, "Geometry")).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(repo.get_all_subjects().unwrap(), vec![Subject::new(1, "Algebra")]);
}

#[test]
fn add_rejects_invalid_subject_before_sql() {
    let repo = setup();

    let err = repo.add_subject(&Subject::new(1, "")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(SubjectValidationError::EmptyTitle)
    ));
    let err = repo.add_subject(&Subject::new(-4, "Negative")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(SubjectValidationError::NonPositiveId(-4))
    ));
}

#[test]
fn update_rewrites_title() {
    let repo = setup();
    repo.add_subject(&Subject::new(3, "Calculus")).unwrap();

    repo.update_subject(&Subject::new(3, "Calculus II")).unwrap();

    assert_eq!(
        repo.get_all_subjects().unwrap(),
        vec![Subject::new(3, "Calculus II")]
    );
}

#[test]
fn update_missing_subject_returns_not_found() {
    let repo = setup();

    let err = repo.update_subject(&Subject::new(9, "Ghost")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(9)));
}

#[test]
fn delete_is_idempotent() {
    let repo = setup();
    let subject = Subject::new(1, "Algebra");
    repo.add_subject(&subject).unwrap();

    repo.delete_subject(&subject).unwrap();
    repo.delete_subject(&subject).unwrap();

    assert!(repo.get_all_subjects().unwrap().is_empty());
}

#[test]
fn clones_share_one_connection() {
    let repo = setup();
    let other = repo.clone();

    repo.add_subject(&Subject::new(1, "Algebra")).unwrap();
    assert_eq!(other.get_max_subject_id().unwrap(), Some(1));
}

#[test]
fn invalid_persisted_row_is_reported() {
    let conn = open_db_in_memory().unwrap();
    // Bypass the CHECK constraint to simulate a foreign writer.
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO subjects (id, title) VALUES (1, '');",
    )
    .unwrap();
    let repo = SqliteSubjectRepository::new(conn);

    let err = repo.get_all_subjects().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
