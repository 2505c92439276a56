//! End-to-end desk tests: config, login, add, flush, reload, views, exports.

use chrono::NaiveDate;
use salesdesk_core::{
    config::DeskConfig,
    customer::{NewCustomer, ProductSold},
    desk::Desk,
    error::{DeskError, IoError, ValidationError},
    export::{CUSTOMERS_EXPORT_NAME, MARKETERS_EXPORT_NAME},
    types::{LedgerBackend, EXPORT_MIME_TYPE},
};
use std::path::Path;

fn write_tables(dir: &Path) {
    std::fs::write(dir.join("marketers.csv"), "Name,Password\nAlice,correct\nBob,builder\n").unwrap();
    std::fs::write(
        dir.join("customers.csv"),
        "Company Name,Next Meeting,Rating,Product Sold,Product Name,Product Quantity,Marketer\n\
         Acme,2024-05-02,4,No,,0,Alice\n\
         Globex,2024-05-03,2,Yes,Gizmo,6,Bob\n",
    )
    .unwrap();
}

fn open_desk(dir: &Path) -> Desk {
    let _ = env_logger::builder().is_test(true).try_init();
    Desk::open(DeskConfig::defaults_in(dir.to_str().unwrap())).expect("open desk")
}

fn beta() -> NewCustomer {
    NewCustomer {
        company_name: "Beta".into(),
        next_meeting: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        rating: 5,
        product_sold: ProductSold::Yes,
        product_name: "Widget".into(),
        product_quantity: 3,
    }
}

/// Login, add Beta, see it in the scoped list and in the rollup.
#[test]
fn login_add_and_view() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let mut desk = open_desk(dir.path());

    let alice = desk.login("Alice", "correct").unwrap();
    assert_eq!(desk.customers_for(&alice).len(), 1);

    let added = desk.add_customer(&alice, beta()).unwrap();
    assert_eq!(added.marketer, "Alice");
    assert!(!desk.is_dirty());

    let mine: Vec<_> = desk.customers_for(&alice).iter().map(|r| r.company_name.clone()).collect();
    assert_eq!(mine, vec!["Acme", "Beta"]);

    let perf = desk.performance();
    assert_eq!(perf.len(), 2);
    assert_eq!(perf[0].marketer, "Alice");
    assert_eq!(perf[0].total_customers, 2);
    assert_eq!(perf[0].total_sales, 3);
    assert!((perf[0].average_rating - 4.5).abs() < 1e-9);
    assert_eq!(perf[1].marketer, "Bob");
    assert_eq!(perf[1].total_sales, 6);

    // A second desk on the same files sees the persisted row.
    let reopened = open_desk(dir.path());
    assert_eq!(reopened.ledger().len(), 3);
}

/// Wrong credentials give the shared message and no identity.
#[test]
fn bad_login_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let desk = open_desk(dir.path());

    let err = desk.login("Alice", "wrong").unwrap_err();
    assert_eq!(err.user_message(), "Invalid login credentials!");
    assert!(desk.login("Mallory", "correct").is_err());
}

/// Invalid rating is rejected and nothing is written.
#[test]
fn invalid_form_leaves_ledger_and_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let before = std::fs::read_to_string(dir.path().join("customers.csv")).unwrap();
    let mut desk = open_desk(dir.path());
    let alice = desk.login("Alice", "correct").unwrap();

    let mut form = beta();
    form.rating = 6;
    let err = desk.add_customer(&alice, form).unwrap_err();
    assert!(matches!(
        err,
        DeskError::Validation(ValidationError::RatingOutOfRange { rating: 6 })
    ));
    assert_eq!(desk.ledger().len(), 2);
    assert_eq!(std::fs::read_to_string(dir.path().join("customers.csv")).unwrap(), before);
}

/// Stale session: persist is refused, reload replays the pending row, flush saves it.
#[test]
fn stale_session_recovers_with_reload() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let mut first = open_desk(dir.path());
    let mut second = open_desk(dir.path());

    let bob = second.login("Bob", "builder").unwrap();
    let mut form = beta();
    form.company_name = "Bobco".into();
    second.add_customer(&bob, form).unwrap();

    let alice = first.login("Alice", "correct").unwrap();
    let err = first.add_customer(&alice, beta()).unwrap_err();
    assert!(matches!(err, DeskError::Io(IoError::StaleWrite { .. })));
    assert!(first.is_dirty());
    assert_eq!(first.ledger().len(), 3);

    first.reload().unwrap();
    assert_eq!(first.ledger().len(), 4);
    assert!(first.is_dirty());
    first.flush().unwrap();
    assert!(!first.is_dirty());

    let names: Vec<_> = open_desk(dir.path())
        .ledger()
        .records()
        .iter()
        .map(|r| r.company_name.clone())
        .collect();
    assert_eq!(names, vec!["Acme", "Globex", "Bobco", "Beta"]);
}

/// flush on a clean desk is a no-op.
#[test]
fn flush_clean_desk_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let mut desk = open_desk(dir.path());
    desk.flush().unwrap();
    assert!(!desk.is_dirty());
}

/// Exports carry the fixed file names, the MIME type and the full tables.
#[test]
fn exports_cover_full_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let desk = open_desk(dir.path());

    let marketers = desk.export_marketers().unwrap();
    assert_eq!(marketers.file_name, MARKETERS_EXPORT_NAME);
    assert_eq!(marketers.file_name, "marketers_data.xlsx");
    assert_eq!(marketers.mime_type, EXPORT_MIME_TYPE);
    assert_eq!(marketers.mime_type, "application/vnd.ms-excel");
    let text = String::from_utf8(marketers.bytes).unwrap();
    assert_eq!(text, "Name,Password\nAlice,correct\nBob,builder\n");

    let customers = desk.export_customers().unwrap();
    assert_eq!(customers.file_name, CUSTOMERS_EXPORT_NAME);
    assert_eq!(customers.file_name, "updated_customers.xlsx");
    let text = String::from_utf8(customers.bytes).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("Globex,2024-05-03,2,Yes,Gizmo,6,Bob"));
}

/// Chart datasets are derived from the same rollup as performance().
#[test]
fn charts_match_performance() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let desk = open_desk(dir.path());

    let charts = desk.charts();
    assert_eq!(charts.activity.categories, vec!["Alice", "Bob"]);
    assert_eq!(charts.activity.series[1].values, vec![0.0, 6.0]);
    assert_eq!(charts.rating.series[0].values, vec![4.0, 2.0]);
}

/// Missing tables stop the desk from opening.
#[test]
fn missing_tables_fail_startup() {
    let dir = tempfile::tempdir().unwrap();
    let err = Desk::open(DeskConfig::defaults_in(dir.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, DeskError::Io(IoError::ReadFailed { .. })));
}

/// desk.json picks the backend and resolves relative paths against the data dir.
#[test]
fn config_loads_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_str().unwrap();
    std::fs::write(
        dir.path().join("desk.json"),
        r#"{ "credentials_file": "team.csv", "ledger_file": "ledger.db", "backend": "sqlite" }"#,
    )
    .unwrap();

    let config = DeskConfig::load(data_dir).unwrap();
    assert_eq!(config.backend, LedgerBackend::Sqlite);
    assert_eq!(config.credentials_path, format!("{data_dir}/team.csv"));
    assert_eq!(config.ledger_path, format!("{data_dir}/ledger.db"));
    assert_eq!(config.date_format, "%Y-%m-%d");
}

/// An unusable date format is caught when the config loads.
#[test]
fn config_rejects_bad_date_format() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("desk.json"), r#"{ "date_format": "%Y-%" }"#).unwrap();
    assert!(DeskConfig::load(dir.path().to_str().unwrap()).is_err());
}

/// Missing desk.json is an error from load().
#[test]
fn config_missing_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(DeskConfig::load(dir.path().to_str().unwrap()).is_err());
}

/// A desk on the SQLite backend starts empty and persists through the database.
#[test]
fn sqlite_backed_desk() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let data_dir = dir.path().to_str().unwrap();
    std::fs::write(
        dir.path().join("desk.json"),
        r#"{ "ledger_file": "ledger.db", "backend": "sqlite" }"#,
    )
    .unwrap();

    let config = DeskConfig::load(data_dir).unwrap();
    let mut desk = Desk::open(config.clone()).unwrap();
    assert!(desk.ledger().is_empty());
    let alice = desk.login("Alice", "correct").unwrap();
    desk.add_customer(&alice, beta()).unwrap();

    let reopened = Desk::open(config).unwrap();
    assert_eq!(reopened.ledger().len(), 1);
    assert_eq!(reopened.performance()[0].total_sales, 3);
}

/// Test defaults point at the standard table names in the working directory.
#[test]
fn default_test_config_uses_standard_names() {
    let config = DeskConfig::default_test();
    assert_eq!(config.credentials_path, "./marketers.csv");
    assert_eq!(config.ledger_path, "./customers.csv");
    assert_eq!(config.backend, LedgerBackend::Tabular);
}
