//! End-to-end tests across the gitnb crates
//!
//! These follow a notebook from discovery through tracking, editing,
//! mirror updates, staging and conversion back to a notebook.

use std::path::{Path, PathBuf};

use gitnb_content::{Cell, DocumentCodec, Notebook};
use gitnb_core::{GitignoreOutcome, Project, SyncEngine, add_path, diff_against_mirror, gitignore, tonb};
use gitnb_fs::NormalizedPath;
use gitnb_git::RecordingStager;
use gitnb_test_utils::git::staged_paths;
use gitnb_test_utils::{NotebookBuilder, TestProject};
use pretty_assertions::assert_eq;

fn open(fixture: &TestProject) -> Project {
    let project = Project::open(fixture.root()).unwrap();
    project.init().unwrap();
    project
}

fn mirror_notebook(fixture: &TestProject, mirror: &str) -> Notebook {
    DocumentCodec::parse(&fixture.read(mirror)).unwrap()
}

#[test]
fn test_tracked_notebook_follows_edits() {
    let fixture = TestProject::new();
    fixture.write_three_cell_notebook("analysis.ipynb");
    let project = open(&fixture).without_stager();

    let outcome = project.add("analysis.ipynb", None).unwrap();
    assert_eq!(outcome.mirror.as_str(), "nbpy/analysis.nbpy.py");

    let script = fixture.read("nbpy/analysis.nbpy.py");
    let headers: Vec<&str> = script
        .lines()
        .filter(|line| line.starts_with("#nbpy: cell"))
        .collect();
    assert_eq!(
        headers,
        vec!["#nbpy: cell code", "#nbpy: cell markdown", "#nbpy: cell code"]
    );

    let engine = SyncEngine::new(&project);
    assert!(engine.update_all().unwrap().changed.is_empty());

    let edited = NotebookBuilder::new()
        .code("print(1)")
        .markdown("# Results")
        .code("")
        .build();
    fixture.write("analysis.ipynb", &edited);

    let report = engine.update_all().unwrap();
    assert_eq!(report.changed, vec![NormalizedPath::new("nbpy/analysis.nbpy.py")]);
    assert!(report.is_success());

    let expected = Notebook::from_json(&edited).unwrap();
    let mirrored = mirror_notebook(&fixture, "nbpy/analysis.nbpy.py");
    assert_eq!(mirrored.cells, expected.cells);
}

#[test]
fn test_diff_tracks_unsynced_edits_until_update() {
    let fixture = TestProject::new();
    fixture.write_three_cell_notebook("a.ipynb");
    let project = open(&fixture).without_stager();
    project.add("a.ipynb", None).unwrap();

    assert!(diff_against_mirror(&project, "a.ipynb").unwrap().is_clean());

    fixture.write(
        "a.ipynb",
        &NotebookBuilder::new()
            .code("print(1)")
            .markdown("# Title")
            .code("x = 2")
            .build(),
    );
    let diff = diff_against_mirror(&project, "a.ipynb").unwrap();
    assert!(!diff.is_clean());
    assert_eq!(diff.diff.insertions(), 1);
    assert!(diff.diff.unified.contains("+x = 2\n"));

    SyncEngine::new(&project).update_all().unwrap();
    assert!(diff_against_mirror(&project, "a.ipynb").unwrap().is_clean());
}

#[test]
fn test_hand_edited_mirror_converts_back() {
    let fixture = TestProject::new();
    fixture.write_three_cell_notebook("a.ipynb");
    let project = open(&fixture).without_stager();
    project.add("a.ipynb", None).unwrap();

    let script = fixture
        .read("nbpy/a.nbpy.py")
        .replace("print(1)\n", "print(1)\nprint(2)\n");
    fixture.write("nbpy/a.nbpy.py", &script);

    let report = tonb(&project, "nbpy/a.nbpy.py", None).unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded[0].destination.as_str(), "nbpy_nb/a.ipynb");

    let notebook = Notebook::from_json(&fixture.read("nbpy_nb/a.ipynb")).unwrap();
    assert_eq!(notebook.cells[0].source_text(), "print(1)\nprint(2)");
    assert_eq!(notebook.metadata["kernelspec"]["name"], "python3");

    // The generated notebook is excluded from discovery
    assert_eq!(
        project.list_untracked().unwrap(),
        Vec::<NormalizedPath>::new()
    );
}

#[test]
fn test_directory_add_skips_excluded_and_tracked() {
    let fixture = TestProject::new();
    fixture.write_three_cell_notebook("work/a.ipynb");
    fixture.write_three_cell_notebook("work/sub/b.ipynb");
    fixture.write_three_cell_notebook("work/.ipynb_checkpoints/a-checkpoint.ipynb");
    let stager = std::sync::Arc::new(RecordingStager::new());
    let project = open(&fixture).with_stager(stager.clone());

    let report = add_path(&project, "work", None).unwrap();
    assert!(report.is_success());
    assert_eq!(
        project.list_tracked().unwrap(),
        vec![
            NormalizedPath::new("work/a.ipynb"),
            NormalizedPath::new("work/sub/b.ipynb"),
        ]
    );
    assert_eq!(
        stager.staged(),
        vec![
            NormalizedPath::new("nbpy/work/a.nbpy.py"),
            NormalizedPath::new("nbpy/work/sub/b.nbpy.py"),
        ]
    );
    assert!(project.list_untracked().unwrap().is_empty());
}

#[test]
fn test_git_workflow_stages_mirrors_and_ignores_notebooks() {
    let fixture = TestProject::with_git();
    fixture.write_three_cell_notebook("a.ipynb");
    let project = open(&fixture);

    assert_eq!(gitignore::apply(&project).unwrap(), GitignoreOutcome::Created);
    let outcome = project.add("a.ipynb", None).unwrap();
    assert!(outcome.staged);

    assert_eq!(staged_paths(fixture.root()), vec![PathBuf::from("nbpy/a.nbpy.py")]);

    let repo = git2::Repository::open(fixture.root()).unwrap();
    assert!(repo.is_path_ignored(Path::new("a.ipynb")).unwrap());
    assert!(repo.is_path_ignored(Path::new(".gitnb/notebooks")).unwrap());
    assert!(!repo.is_path_ignored(Path::new("nbpy/a.nbpy.py")).unwrap());
}

#[test]
fn test_ledger_survives_manual_edits() {
    let fixture = TestProject::new();
    fixture.write_three_cell_notebook("a.ipynb");
    fixture.write_three_cell_notebook("b.ipynb");
    let project = open(&fixture).without_stager();
    project.add("a.ipynb", None).unwrap();

    let hand_edited = format!(
        "# tracked notebooks\n\n{}b.ipynb  scripts/b.py\n",
        fixture.read(".gitnb/notebooks")
    );
    fixture.write(".gitnb/notebooks", &hand_edited);

    let report = SyncEngine::new(&project).update_all().unwrap();
    assert_eq!(report.changed, vec![NormalizedPath::new("scripts/b.py")]);
    assert_eq!(report.unchanged, vec![NormalizedPath::new("nbpy/a.nbpy.py")]);

    project.remove("a.ipynb").unwrap();
    assert_eq!(fixture.read(".gitnb/notebooks"), "b.ipynb\tscripts/b.py\n");
    fixture.assert_file_exists("nbpy/a.nbpy.py");
}

#[test]
fn test_cell_attributes_survive_the_mirror() {
    let fixture = TestProject::new();
    let notebook = Notebook::new()
        .with_cell(Cell::code("import os").with_id("setup"))
        .with_cell(Cell::markdown("#nbpy: cell code\nnot a header"));
    fixture.write("a.ipynb", &notebook.to_json().unwrap());
    let project = open(&fixture).without_stager();
    project.add("a.ipynb", None).unwrap();

    assert_eq!(mirror_notebook(&fixture, "nbpy/a.nbpy.py"), notebook);
}
