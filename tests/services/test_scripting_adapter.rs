use std::sync::Arc;

use chrono::Local;
use tempfile::TempDir;
use twig::{
    config::Settings,
    db::DatabaseConnector,
    errors::PipelineError,
    process::Invocation,
    scripting::{
        ScriptOptions,
        ddl::{DdlRequest, connection_config, write_ddl},
        single_file_name,
    },
    services::AppServices,
    types::{ObjectKind, ObjectName, ScriptFolder},
    utils::read_script_batches,
};

use crate::common::{
    FakeConnector, FakeDatabase, FakeScripterRunner, fakes::at, object, proc_object,
    test_settings,
};

fn services(settings: &Settings, runner: Arc<FakeScripterRunner>) -> AppServices {
    let source = Arc::new(FakeDatabase::with_objects(vec![
        proc_object("dbo.usp_GetOrders", at(6, 12)),
        object("dbo.vw_Orders", ObjectKind::View, at(4, 9)),
        object("dbo.Orders", ObjectKind::Table, at(2, 8)),
    ]));
    AppServices::with_components(
        settings,
        runner,
        Arc::new(FakeConnector::default().with("Northwind_Beta", source)),
        None,
    )
}

fn names(input: &[&str]) -> Vec<ObjectName> {
    input.iter().map(|n| ObjectName::parse(n).unwrap()).collect()
}

fn flag_value<'a>(call: &'a Invocation, flag: &str) -> &'a str {
    let at = call.args.iter().position(|a| a == flag).unwrap();
    &call.args[at + 1]
}

#[tokio::test]
async fn test_single_file_per_folder() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let runner = Arc::new(FakeScripterRunner::default());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();
    let client = services.connector.connect(database).await.unwrap();
    let target = root.path().join("out");

    let options = ScriptOptions {
        file_per_object: false,
        ..ScriptOptions::from_config(services.scripting.config())
    };
    let artifacts = services
        .scripting
        .script_objects(
            client.as_ref(),
            database,
            &names(&["dbo.vw_Orders", "dbo.usp_GetOrders"]),
            &target,
            &options,
        )
        .await
        .unwrap();

    let file_name = single_file_name(database, 1, Local::now().date_naive());
    assert!(file_name.starts_with("db1_Northwind_Beta_1-Objects_"));

    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].folder, ScriptFolder::Views);
    assert_eq!(artifacts[0].path, target.join("views").join(&file_name));
    assert_eq!(artifacts[0].objects, names(&["dbo.vw_Orders"]));
    assert_eq!(artifacts[1].folder, ScriptFolder::Procedures);
    assert_eq!(artifacts[1].path, target.join("procedures").join(&file_name));
    assert!(artifacts.iter().all(|a| a.path.is_file()));

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(
        calls
            .iter()
            .all(|c| !c.args.contains(&"--file-per-object".to_string()))
    );
    assert!(flag_value(&calls[0], "--file-path").ends_with(&file_name));
}

#[tokio::test]
async fn test_single_file_not_written_is_an_error() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let services = services(&settings, Arc::new(FakeScripterRunner::writing_nothing()));
    let database = settings.database("beta").unwrap();
    let client = services.connector.connect(database).await.unwrap();

    let options = ScriptOptions {
        file_per_object: false,
        ..ScriptOptions::from_config(services.scripting.config())
    };
    let err = services
        .scripting
        .script_objects(
            client.as_ref(),
            database,
            &names(&["dbo.Orders"]),
            &root.path().join("out"),
            &options,
        )
        .await
        .unwrap_err();

    match err {
        PipelineError::ScriptingTool(message) => assert!(message.contains("was not produced")),
        other => panic!("expected ScriptingTool, got {:?}", other),
    }
}

#[tokio::test]
async fn test_kind_filters_decide_which_folders_reach_the_tool() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let runner = Arc::new(FakeScripterRunner::default());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();
    let client = services.connector.connect(database).await.unwrap();

    let options = ScriptOptions {
        include_kinds: vec![ObjectKind::View, ObjectKind::Procedure],
        exclude_kinds: vec![ObjectKind::Procedure],
        ..ScriptOptions::from_config(services.scripting.config())
    };
    let artifacts = services
        .scripting
        .script_objects(
            client.as_ref(),
            database,
            &names(&["dbo.usp_GetOrders", "dbo.vw_Orders", "dbo.Orders"]),
            &root.path().join("out"),
            &options,
        )
        .await
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(flag_value(&calls[0], "--include-types"), "View");
    assert_eq!(flag_value(&calls[0], "--include-objects"), "[dbo].[vw_Orders]");
    assert!(!calls[0].args.contains(&"[dbo].[usp_GetOrders]".to_string()));

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].objects, names(&["dbo.vw_Orders"]));
}

#[tokio::test]
async fn test_unknown_names_fail_before_the_tool_runs() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let runner = Arc::new(FakeScripterRunner::default());
    let services = services(&settings, runner.clone());
    let database = settings.database("beta").unwrap();
    let client = services.connector.connect(database).await.unwrap();

    let err = services
        .scripting
        .script_objects(
            client.as_ref(),
            database,
            &names(&["dbo.vw_Orders", "dbo.vw_Missing"]),
            &root.path().join("out"),
            &ScriptOptions::from_config(services.scripting.config()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::MissingObjects { .. }));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_ddl_scripter_writes_requested_types() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(FakeDatabase::with_objects(vec![
        proc_object("hr.add_job", at(6, 12)),
        object("hr.emp_v", ObjectKind::View, at(4, 9)),
    ]));
    source.define(
        "hr.add_job",
        "CREATE OR REPLACE PROCEDURE \"HR\".\"ADD_JOB\" AS\nBEGIN\n  NULL;\nEND;",
    );
    let connector = FakeConnector::default().with("ORCLPDB1", source);
    let database = connection_config("db1", "ORCLPDB1", "hr", "s3cret").unwrap();
    let client = connector.connect(&database).await.unwrap();

    let output = root.path().join("procedures");
    let written = write_ddl(
        client.as_ref(),
        &DdlRequest {
            drop_create: true,
            check_for_existence: true,
            file_per_object: true,
            exclude_headers: true,
            include_types: vec!["StoredProcedure".to_string()],
            output: output.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(written, vec![output.join("hr.add_job.StoredProcedure.sql")]);
    let batches = read_script_batches(&written[0]).unwrap();
    assert_eq!(batches.len(), 2);
    assert!(batches[0].contains("DROP PROCEDURE \"hr\".\"add_job\""));
    assert!(batches[1].ends_with("END;"));
}

#[tokio::test]
async fn test_ddl_scripter_rejects_objects_without_ddl() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(FakeDatabase::with_objects(vec![object(
        "hr.jobs",
        ObjectKind::Table,
        at(2, 8),
    )]));
    let connector = FakeConnector::default().with("ORCLPDB1", source);
    let database = connection_config("db1:1522", "ORCLPDB1", "hr", "").unwrap();
    let client = connector.connect(&database).await.unwrap();

    let err = write_ddl(
        client.as_ref(),
        &DdlRequest {
            objects: names(&["[hr].[jobs]"]),
            output: root.path().join("tables"),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::ScriptingTool(_)));
    assert!(!root.path().join("tables").exists());
}
