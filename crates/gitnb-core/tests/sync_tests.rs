//! Tests for the SyncEngine

use gitnb_content::{Cell, DocumentCodec, Notebook};
use gitnb_core::{Error, Project, SyncEngine};
use gitnb_fs::NormalizedPath;
use gitnb_test_utils::{NotebookBuilder, TestProject};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn open(test: &TestProject) -> Project {
    Project::open(test.root()).unwrap().without_stager()
}

#[test]
fn test_three_cell_scenario() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    let project = open(&test);

    let outcome = project.add("a.ipynb", None).unwrap();
    assert_eq!(outcome.mirror.as_str(), "nbpy/a.nbpy.py");

    let mirror = test.read("nbpy/a.nbpy.py");
    let headers: Vec<&str> = mirror
        .lines()
        .filter(|l| l.starts_with("#nbpy: cell"))
        .collect();
    assert_eq!(
        headers,
        vec!["#nbpy: cell code", "#nbpy: cell markdown", "#nbpy: cell code"]
    );

    let engine = SyncEngine::new(&project);
    let report = engine.update_all().unwrap();
    assert!(report.changed.is_empty());
    assert_eq!(report.unchanged, vec![NormalizedPath::new("nbpy/a.nbpy.py")]);

    // Edit the markdown cell
    let mut edited = Notebook::read(&NormalizedPath::new(test.path("a.ipynb"))).unwrap();
    edited.cells[1].set_source("# New title");
    edited.write(&NormalizedPath::new(test.path("a.ipynb"))).unwrap();

    let report = engine.update_all().unwrap();
    assert_eq!(report.changed, vec![NormalizedPath::new("nbpy/a.nbpy.py")]);
    assert!(report.is_success());

    let decoded = DocumentCodec::parse(&test.read("nbpy/a.nbpy.py")).unwrap();
    assert_eq!(decoded, edited);
    assert_eq!(decoded.cells[1], Cell::markdown("# New title"));
}

#[test]
fn test_second_update_reports_nothing() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    test.write_three_cell_notebook("b.ipynb");
    let project = open(&test);
    project.add("a.ipynb", None).unwrap();
    project.add("b.ipynb", None).unwrap();

    // Stale mirror
    test.write("nbpy/b.nbpy.py", "#nbpy: format 1\n");

    let engine = SyncEngine::new(&project);
    assert_eq!(
        engine.update_all().unwrap().changed,
        vec![NormalizedPath::new("nbpy/b.nbpy.py")]
    );
    assert!(engine.update_all().unwrap().changed.is_empty());
}

#[test]
fn test_unchanged_mirror_is_not_rewritten() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    let project = open(&test);
    project.add("a.ipynb", None).unwrap();

    let before = fs::metadata(test.path("nbpy/a.nbpy.py"))
        .unwrap()
        .modified()
        .unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));

    SyncEngine::new(&project).update_all().unwrap();

    let after = fs::metadata(test.path("nbpy/a.nbpy.py"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_update_continues_past_deleted_notebook() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    test.write_three_cell_notebook("b.ipynb");
    let project = open(&test);
    project.add("a.ipynb", None).unwrap();
    project.add("b.ipynb", None).unwrap();

    fs::remove_file(test.path("a.ipynb")).unwrap();
    test.write("nbpy/b.nbpy.py", "stale\n");

    let report = SyncEngine::new(&project).update_all().unwrap();

    assert_eq!(report.changed, vec![NormalizedPath::new("nbpy/b.nbpy.py")]);
    assert_eq!(report.errors.len(), 1);
    match &report.errors[0] {
        Error::Sync { document, source } => {
            assert_eq!(document.to_str(), Some("a.ipynb"));
            assert!(matches!(**source, Error::NotFound { .. }));
        }
        other => panic!("expected a sync error, got {other:?}"),
    }
}

#[test]
fn test_update_reports_unparseable_notebook() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    let project = open(&test);
    project.add("a.ipynb", None).unwrap();

    test.write("a.ipynb", "{ broken");

    let report = SyncEngine::new(&project).update_all().unwrap();
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].is_parse());
}

#[test]
fn test_update_without_ledger_is_empty() {
    let test = TestProject::new();
    let project = open(&test);

    let report = SyncEngine::new(&project).update_all().unwrap();
    assert!(report.changed.is_empty());
    assert!(report.unchanged.is_empty());
    assert!(report.is_success());
}

#[test]
fn test_shared_mirror_is_refused_and_updates_settle() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    test.write("b.ipynb", &NotebookBuilder::new().code("print(2)").build());
    let project = open(&test);

    project.add("a.ipynb", Some(Path::new("shared.nbpy.py"))).unwrap();
    let mirror_before = test.read("shared.nbpy.py");

    let err = project.add("b.ipynb", Some(Path::new("shared.nbpy.py"))).unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
    assert!(err.to_string().contains("already the mirror of a.ipynb"));
    assert_eq!(test.read("shared.nbpy.py"), mirror_before);
    assert_eq!(project.list_tracked().unwrap(), vec![NormalizedPath::new("a.ipynb")]);

    // Re-adding the owner with the same mirror is still allowed
    project.add("a.ipynb", Some(Path::new("shared.nbpy.py"))).unwrap();

    let engine = SyncEngine::new(&project);
    assert!(engine.update_all().unwrap().changed.is_empty());
    assert!(engine.update_all().unwrap().changed.is_empty());
}
