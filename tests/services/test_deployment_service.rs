use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use tempfile::TempDir;
use twig::{
    errors::PipelineError,
    services::AppServices,
    types::{DeploymentState, ObjectKind, ObjectName, RunOutcome},
    utils::ProgressReporter,
    vcs::VersionControl,
};

use crate::common::{
    FakeConnector, FakeDatabase, FakeScripterRunner, FakeVcs, fakes::at, object, proc_object,
    test_settings,
};

struct Harness {
    root: TempDir,
    services: AppServices,
    vcs: Arc<FakeVcs>,
    runner: Arc<FakeScripterRunner>,
    destination: Arc<FakeDatabase>,
}

fn source_database() -> Arc<FakeDatabase> {
    Arc::new(FakeDatabase::with_objects(vec![
        proc_object("dbo.usp_GetOrders", at(5, 10)),
        object("dbo.vw_Orders", ObjectKind::View, at(4, 9)),
        object("dbo.Orders", ObjectKind::Table, at(2, 8)),
    ]))
}

fn harness(vcs: FakeVcs, destination_reachable: bool) -> Harness {
    harness_with_runner(vcs, destination_reachable, FakeScripterRunner::default())
}

fn harness_with_runner(
    vcs: FakeVcs,
    destination_reachable: bool,
    runner: FakeScripterRunner,
) -> Harness {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let vcs = Arc::new(vcs);
    let runner = Arc::new(runner);
    let destination = Arc::new(FakeDatabase::default());

    let mut connector = FakeConnector::default().with("Northwind_Beta", source_database());
    if destination_reachable {
        connector = connector.with("Northwind", destination.clone());
    }

    let services = AppServices::with_components(
        &settings,
        runner.clone(),
        Arc::new(connector),
        Some(vcs.clone() as Arc<dyn VersionControl>),
    );

    Harness {
        root,
        services,
        vcs,
        runner,
        destination,
    }
}

/// Leaves an old script for the procedure in the destination's folder.
fn seed_stale_script(root: &Path) -> PathBuf {
    let path = root
        .join("repo/Northwind/procedures")
        .join("dbo.usp_GetOrders.StoredProcedure.sql");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "OLD VERSION").unwrap();
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH)
        .unwrap();
    path
}

fn names(input: &[&str]) -> Vec<ObjectName> {
    input.iter().map(|n| ObjectName::parse(n).unwrap()).collect()
}

#[tokio::test]
async fn test_deploy_scripts_commits_pushes_and_executes() {
    let h = harness(FakeVcs::dirty(), true);
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare("STABLE", names(&["dbo.usp_GetOrders", "[dbo].[vw_Orders]"]))
        .unwrap();
    assert!(run.working_tree.ends_with("repo/Northwind"));

    service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap();

    assert_eq!(run.state(), DeploymentState::Succeeded);
    assert_eq!(run.outcome(), Some(RunOutcome::Succeeded));
    assert!(run.committed);
    assert!(run.pushed);
    assert_eq!(run.artifacts.len(), 2);
    assert_eq!(run.executed_scripts.len(), 2);
    assert!(run.ended_at.is_some());

    let calls = h.vcs.calls();
    assert_eq!(&calls[..4], &["reset", "pull", "checkout master", "status"]);
    assert_eq!(calls[4], "add");
    assert!(calls[5].starts_with("commit "));
    assert!(calls[5].ends_with(" - dbo.usp_GetOrders dbo.vw_Orders"));
    assert_eq!(calls[6], "push origin master");

    let scripter_calls = h.runner.calls();
    assert_eq!(scripter_calls.len(), 2);
    assert!(scripter_calls.iter().all(|c| c.args.contains(&"--include-objects".to_string())));
    assert!(scripter_calls.iter().all(|c| !c.display().contains("s3cret")));

    assert_eq!(
        h.destination.executed(),
        vec![
            "CREATE StoredProcedure dbo.usp_GetOrders",
            "CREATE View dbo.vw_Orders"
        ]
    );
}

#[tokio::test]
async fn test_missing_objects_abort_before_commit() {
    let h = harness(FakeVcs::dirty(), true);
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare(
            "stable",
            names(&["dbo.usp_GetOrders", "dbo.usp_Nope", "dbo.usp_Gone"]),
        )
        .unwrap();

    let err = service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert_eq!(err.state, DeploymentState::Scripting);
    match err.source {
        PipelineError::MissingObjects { names } => {
            assert_eq!(names, vec!["dbo.usp_Gone", "dbo.usp_Nope"]);
        }
        other => panic!("expected MissingObjects, got {:?}", other),
    }

    assert_eq!(run.state(), DeploymentState::Aborted);
    assert_eq!(run.aborted_in(), Some(DeploymentState::Scripting));
    assert_eq!(run.outcome(), Some(RunOutcome::Aborted));
    assert_eq!(h.vcs.calls(), vec!["reset", "pull", "checkout master"]);
    assert!(h.runner.calls().is_empty());
    assert!(h.destination.executed().is_empty());
}

#[tokio::test]
async fn test_clean_tree_skips_commit_but_pushes() {
    let h = harness(FakeVcs::default(), true);
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare("stable", names(&["dbo.usp_GetOrders"]))
        .unwrap();
    service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap();

    assert!(!run.committed);
    assert!(run.pushed);
    let calls = h.vcs.calls();
    assert!(!calls.iter().any(|c| c.starts_with("commit")));
    assert!(calls.contains(&"push origin master".to_string()));
    assert_eq!(h.destination.executed().len(), 1);
}

#[tokio::test]
async fn test_unreachable_destination_leaves_push_in_place() {
    let h = harness(FakeVcs::dirty(), false);
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare("stable", names(&["dbo.usp_GetOrders"]))
        .unwrap();
    let err = service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert_eq!(err.state, DeploymentState::Deploying);
    assert!(matches!(err.source, PipelineError::Connection { .. }));
    assert!(run.committed);
    assert!(run.pushed);
    assert!(run.executed_scripts.is_empty());
    assert_eq!(run.outcome(), Some(RunOutcome::PartialFailure));
    assert_eq!(
        h.vcs.calls().iter().filter(|c| c.starts_with("push")).count(),
        1
    );
}

#[tokio::test]
async fn test_reset_failure_stops_everything() {
    let h = harness(
        FakeVcs {
            fail_on: Some("reset"),
            ..FakeVcs::dirty()
        },
        true,
    );
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare("stable", names(&["dbo.usp_GetOrders"]))
        .unwrap();
    let err = service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert_eq!(err.state, DeploymentState::ResettingRepo);
    assert!(matches!(err.source, PipelineError::VersionControl { .. }));
    assert_eq!(h.vcs.calls(), vec!["reset"]);
    assert!(h.runner.calls().is_empty());
}

#[tokio::test]
async fn test_execution_error_names_the_script() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let destination = Arc::new(FakeDatabase {
        fail_execute: true,
        ..Default::default()
    });
    let connector = FakeConnector::default()
        .with("Northwind_Beta", source_database())
        .with("Northwind", destination);
    let services = AppServices::with_components(
        &settings,
        Arc::new(FakeScripterRunner::default()),
        Arc::new(connector),
        Some(Arc::new(FakeVcs::dirty()) as Arc<dyn VersionControl>),
    );
    let service = &services.deployment_service;

    let (mut run, targets) = service
        .prepare("stable", names(&["dbo.usp_GetOrders"]))
        .unwrap();
    let err = service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert_eq!(err.state, DeploymentState::Deploying);
    match err.source {
        PipelineError::Execution(message) => {
            assert!(message.contains("dbo.usp_GetOrders.StoredProcedure.sql"));
            assert!(message.contains("ORA-00942"));
        }
        other => panic!("expected Execution, got {:?}", other),
    }
    assert_eq!(run.outcome(), Some(RunOutcome::PartialFailure));
}

#[test]
fn test_prepare_rejects_bad_requests() {
    let h = harness(FakeVcs::default(), true);
    let service = &h.services.deployment_service;

    assert!(matches!(
        service.prepare("stable", Vec::new()),
        Err(PipelineError::Config(_))
    ));
    assert!(matches!(
        service.prepare("nightly", names(&["dbo.usp_GetOrders"])),
        Err(PipelineError::Config(_))
    ));

    let (run, _) = service
        .prepare(
            "stable",
            names(&["dbo.usp_GetOrders", "DBO.USP_GETORDERS"]),
        )
        .unwrap();
    assert_eq!(run.objects.len(), 1);
    assert_eq!(run.state(), DeploymentState::Idle);
}

#[tokio::test]
async fn test_stale_script_is_never_deployed() {
    let h = harness_with_runner(FakeVcs::dirty(), true, FakeScripterRunner::writing_nothing());
    seed_stale_script(h.root.path());
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare("stable", names(&["dbo.usp_GetOrders"]))
        .unwrap();
    let err = service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap_err();

    assert_eq!(err.state, DeploymentState::Scripting);
    match err.source {
        PipelineError::ScriptingTool(message) => {
            assert!(message.contains("dbo.usp_GetOrders"));
        }
        other => panic!("expected ScriptingTool, got {:?}", other),
    }
    assert_eq!(run.outcome(), Some(RunOutcome::Aborted));
    assert!(!h.vcs.calls().iter().any(|c| c.starts_with("commit")));
    assert!(h.destination.executed().is_empty());
}

#[tokio::test]
async fn test_rescripted_file_replaces_stale_one() {
    let h = harness(FakeVcs::dirty(), true);
    let stale = seed_stale_script(h.root.path());
    let service = &h.services.deployment_service;

    let (mut run, targets) = service
        .prepare("stable", names(&["dbo.usp_GetOrders"]))
        .unwrap();
    service
        .run(&mut run, &targets, &ProgressReporter::silent())
        .await
        .unwrap();

    assert_eq!(run.executed_scripts, vec![stale]);
    assert_eq!(
        h.destination.executed(),
        vec!["CREATE StoredProcedure dbo.usp_GetOrders"]
    );
}
