//! Authentication gate tests.

use salesdesk_core::{
    credential::{CredentialStore, MarketerCredential},
    error::{AuthError, DeskError},
    session::authenticate,
};

fn credentials() -> CredentialStore {
    CredentialStore::new(vec![
        MarketerCredential { name: "Alice".into(), password: "correct".into() },
        MarketerCredential { name: "Bob".into(),   password: "hunter2".into() },
    ])
}

/// An exact name/password pair yields an identity bound to that name.
#[test]
fn exact_pair_authenticates() {
    let id = authenticate(&credentials(), "Alice", "correct").unwrap();
    assert_eq!(id.name(), "Alice");
}

/// Unknown names fail with NotFound, not BadPassword.
#[test]
fn unknown_name_is_not_found() {
    let err = authenticate(&credentials(), "Carol", "correct").unwrap_err();
    assert_eq!(err, AuthError::NotFound { name: "Carol".into() });
}

/// A known name with the wrong password fails with BadPassword.
#[test]
fn wrong_password_is_bad_password() {
    let err = authenticate(&credentials(), "Alice", "hunter2").unwrap_err();
    assert_eq!(err, AuthError::BadPassword { name: "Alice".into() });
}

/// Matching is case-sensitive on both the name and the password.
#[test]
fn matching_is_case_sensitive() {
    assert!(matches!(
        authenticate(&credentials(), "alice", "correct"),
        Err(AuthError::NotFound { .. })
    ));
    assert!(matches!(
        authenticate(&credentials(), "Alice", "Correct"),
        Err(AuthError::BadPassword { .. })
    ));
    assert!(matches!(
        authenticate(&credentials(), "Alice ", "correct"),
        Err(AuthError::NotFound { .. })
    ));
}

/// Authentication succeeds iff the pair matches a row, for every row and
/// every cross-pairing of names and passwords.
#[test]
fn succeeds_iff_pair_matches_a_row() {
    let store = credentials();
    for m in store.marketers() {
        for p in store.marketers() {
            let ok = authenticate(&store, &m.name, &p.password).is_ok();
            assert_eq!(ok, m.password == p.password, "{} / {}", m.name, p.password);
        }
    }
}

/// Duplicate names resolve to the first row of the table.
#[test]
fn duplicate_names_use_first_row() {
    let store = CredentialStore::new(vec![
        MarketerCredential { name: "Dup".into(), password: "first".into() },
        MarketerCredential { name: "Dup".into(), password: "second".into() },
    ]);
    assert!(authenticate(&store, "Dup", "first").is_ok());
    assert!(authenticate(&store, "Dup", "second").is_err());
}

/// Both auth failures show the same message in the UI.
#[test]
fn auth_failures_share_user_message() {
    let not_found: DeskError = AuthError::NotFound { name: "x".into() }.into();
    let bad_pw: DeskError = AuthError::BadPassword { name: "x".into() }.into();
    assert_eq!(not_found.user_message(), "Invalid login credentials!");
    assert_eq!(not_found.user_message(), bad_pw.user_message());
}

/// The credential table loads from a Name,Password CSV file.
#[test]
fn credential_table_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marketers.csv");
    std::fs::write(&path, "Name,Password\nAlice,correct\nBob,12345\n").unwrap();

    let store = CredentialStore::load(path.to_str().unwrap()).unwrap();
    assert_eq!(store.marketers().len(), 2);
    assert!(authenticate(&store, "Bob", "12345").is_ok());
}

/// A missing credential table is a read failure.
#[test]
fn missing_credential_table_is_read_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = CredentialStore::load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        DeskError::Io(salesdesk_core::error::IoError::ReadFailed { .. })
    ));
}
