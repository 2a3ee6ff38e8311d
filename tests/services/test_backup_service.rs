use std::{path::PathBuf, sync::Arc};

use chrono::{Local, SubsecRound};
use tempfile::TempDir;
use twig::{
    config::{BackupConfig, Settings},
    errors::PipelineError,
    services::{AppServices, BackupMode, BackupOutcome},
    types::{ObjectKind, ScriptFolder},
    utils::ProgressReporter,
};

use crate::common::{
    FakeConnector, FakeDatabase, FakeScripterRunner, database_config, fakes::at, object,
    proc_object, test_settings,
};

fn catalog() -> FakeScripterRunner {
    FakeScripterRunner::with_catalog(&[
        ("StoredProcedure", "dbo.usp_GetOrders"),
        ("View", "dbo.vw_Orders"),
    ])
}

fn source() -> Arc<FakeDatabase> {
    Arc::new(FakeDatabase::with_objects(vec![
        proc_object("dbo.usp_GetOrders", at(6, 12)),
        object("dbo.vw_Orders", ObjectKind::View, at(2, 9)),
    ]))
}

fn services(settings: &Settings, runner: Arc<FakeScripterRunner>) -> AppServices {
    AppServices::with_components(
        settings,
        runner,
        Arc::new(FakeConnector::default().with("Northwind_Beta", source())),
        None,
    )
}

#[tokio::test]
async fn test_first_backup_scripts_everything_and_records_marker() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let runner = Arc::new(catalog());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();
    let backup = &services.backup_service;

    assert_eq!(backup.last_run_marker(database).unwrap(), None);

    let outcome = backup
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap();

    let expected_root = root.path().join("backups").join("db1_Northwind_Beta");
    match outcome {
        BackupOutcome::Completed {
            root,
            objects,
            artifacts,
            marker,
        } => {
            assert_eq!(root, expected_root);
            assert_eq!(objects, 2);
            assert_eq!(artifacts.len(), 2);
            assert_eq!(backup.last_run_marker(database).unwrap(), Some(marker));
        }
        other => panic!("expected Completed, got {:?}", other),
    }

    for folder in ScriptFolder::ALL {
        assert!(expected_root.join(folder.dir_name()).is_dir());
    }
    assert!(
        expected_root
            .join("procedures")
            .join("dbo.usp_GetOrders.StoredProcedure.sql")
            .is_file()
    );

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| !c.args.contains(&"--include-objects".to_string())));
}

#[tokio::test]
async fn test_backup_after_marker_only_scripts_newer_objects() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let runner = Arc::new(catalog());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();
    let backup = &services.backup_service;

    backup
        .run_log(database)
        .record_run(at(5, 0), "full backup db1/Northwind_Beta 2 objects")
        .unwrap();

    let outcome = backup
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap();

    assert!(matches!(outcome, BackupOutcome::Completed { objects: 1, .. }));
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].args.contains(&"[dbo].[usp_GetOrders]".to_string()));
    assert!(!calls[0].args.contains(&"[dbo].[vw_Orders]".to_string()));
}

#[tokio::test]
async fn test_no_changes_since_marker() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let runner = Arc::new(catalog());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();
    let backup = &services.backup_service;

    let first = backup
        .run(database, BackupMode::Full, &ProgressReporter::silent())
        .await
        .unwrap();
    assert!(matches!(first, BackupOutcome::Completed { .. }));

    let second = backup
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap();
    assert!(matches!(second, BackupOutcome::NoChanges { since: Some(_) }));
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn test_scripting_failure_keeps_marker() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let services = services(&settings, Arc::new(FakeScripterRunner::failing()));
    let database = settings.database("beta").unwrap();
    let backup = &services.backup_service;

    backup
        .run_log(database)
        .record_run(at(1, 0), "full backup db1/Northwind_Beta 2 objects")
        .unwrap();

    let err = backup
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ScriptingTool(_)));
    assert_eq!(backup.last_run_marker(database).unwrap(), Some(at(1, 0)));
}

#[tokio::test]
async fn test_missing_marker_can_be_required() {
    let root = TempDir::new().unwrap();
    let mut settings = test_settings(root.path());
    settings.backup.full_on_missing_marker = false;
    let runner = Arc::new(catalog());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();

    let err = services
        .backup_service
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Config(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_unreachable_database() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let services = AppServices::with_components(
        &settings,
        Arc::new(catalog()),
        Arc::new(FakeConnector::default()),
        None,
    );
    let database = settings.database("beta").unwrap();

    let err = services
        .backup_service
        .run(database, BackupMode::Full, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Connection { .. }));
    assert_eq!(
        services.backup_service.last_run_marker(database).unwrap(),
        None
    );
}

#[test]
fn test_backup_root_reuses_folder_named_after_database() {
    let root = TempDir::new().unwrap();
    let mut settings = test_settings(root.path());
    let base = root.path().join("northwind_beta");
    settings.backup = BackupConfig {
        path: base.to_string_lossy().into_owned(),
        ..BackupConfig::default()
    };
    let services = services(&settings, Arc::new(catalog()));

    assert_eq!(
        services
            .backup_service
            .backup_root(&database_config("db1", "Northwind_Beta", None)),
        base
    );
    assert_eq!(
        services
            .backup_service
            .backup_root(&database_config("db2", "Northwind", None)),
        PathBuf::from(&base).join("db2_Northwind")
    );
}

#[tokio::test]
async fn test_backup_without_output_keeps_objects_pending() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let database = settings.database("beta").unwrap();

    let empty = services(&settings, Arc::new(FakeScripterRunner::writing_nothing()));
    let err = empty
        .backup_service
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ScriptingTool(_)));
    assert_eq!(empty.backup_service.last_run_marker(database).unwrap(), None);

    let working = services(&settings, Arc::new(catalog()));
    let retry = working
        .backup_service
        .run(database, BackupMode::Changed, &ProgressReporter::silent())
        .await
        .unwrap();
    assert!(matches!(retry, BackupOutcome::Completed { objects: 2, .. }));
}

#[tokio::test]
async fn test_changes_since_last_run_follows_marker() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let services = services(&settings, Arc::new(catalog()));
    let database = settings.database("beta").unwrap();
    let backup = &services.backup_service;
    let client = services.connector.connect(database).await.unwrap();

    let all = backup
        .changes_since_last_run(client.as_ref(), database)
        .await
        .unwrap();
    assert_eq!(all.since, None);
    assert_eq!(all.objects.len(), 2);

    let now = Local::now().naive_local().trunc_subsecs(0);
    backup
        .run_log(database)
        .record_run(now, "backup db1/Northwind_Beta 2 objects")
        .unwrap();

    let none = backup
        .changes_since_last_run(client.as_ref(), database)
        .await
        .unwrap();
    assert_eq!(none.since, Some(now));
    assert!(none.objects.is_empty());
}
