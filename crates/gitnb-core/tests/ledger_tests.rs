//! Ledger persistence and tracking laws

use std::fs;
use std::path::Path;

use gitnb_core::{GitnbConfig, Ledger, Project, TrackedEntry};
use gitnb_fs::{NormalizedPath, io};
use gitnb_test_utils::TestProject;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn open(test: &TestProject) -> Project {
    Project::open(test.root()).unwrap().without_stager()
}

#[test]
fn test_add_twice_keeps_one_entry_second_destination_wins() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    let project = open(&test);

    project.add("a.ipynb", Some(Path::new("first.nbpy.py"))).unwrap();
    project.add("a.ipynb", Some(Path::new("second.nbpy.py"))).unwrap();

    let ledger = project.load_ledger().unwrap();
    assert_eq!(
        ledger.entries(),
        [TrackedEntry::new("a.ipynb", "second.nbpy.py")]
    );
    // The earlier mirror is left alone
    test.assert_file_exists("first.nbpy.py");
}

#[test]
fn test_remove_untracked_leaves_ledger_byte_identical() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    let project = open(&test);
    project.init().unwrap();
    project.add("a.ipynb", None).unwrap();
    test.write(
        ".gitnb/notebooks",
        "# hand-edited\na.ipynb   nbpy/a.nbpy.py\n\n",
    );
    let before = fs::read(test.path(".gitnb/notebooks")).unwrap();

    let removed = project.remove("never-tracked.ipynb").unwrap();

    assert!(removed.is_none());
    assert_eq!(fs::read(test.path(".gitnb/notebooks")).unwrap(), before);
}

#[test]
fn test_remove_keeps_files_on_disk() {
    let test = TestProject::new();
    test.write_three_cell_notebook("a.ipynb");
    let project = open(&test);
    project.add("a.ipynb", None).unwrap();

    let removed = project.remove("a.ipynb").unwrap();

    assert_eq!(removed, Some(TrackedEntry::new("a.ipynb", "nbpy/a.nbpy.py")));
    assert!(project.list_tracked().unwrap().is_empty());
    test.assert_file_exists("a.ipynb");
    test.assert_file_exists("nbpy/a.nbpy.py");
}

#[test]
fn test_failed_ledger_write_leaves_previous_ledger_intact() {
    let test = TestProject::new();
    let path = NormalizedPath::new(test.path(".gitnb/notebooks"));

    let mut ledger = Ledger::new();
    ledger.upsert(TrackedEntry::new("a.ipynb", "nbpy/a.nbpy.py"));
    ledger.save(&path).unwrap();
    let before = fs::read_to_string(path.to_native()).unwrap();

    // Occupy the temp location so the write fails before the rename
    let temp = io::temp_path_for(&path.to_native());
    fs::create_dir(&temp).unwrap();

    let mut changed = ledger.clone();
    changed.upsert(TrackedEntry::new("b.ipynb", "nbpy/b.nbpy.py"));
    assert!(changed.save(&path).is_err());

    assert_eq!(fs::read_to_string(path.to_native()).unwrap(), before);
    assert_eq!(Ledger::load(&path, "#").unwrap(), ledger);
}

#[test]
fn test_corrupt_ledger_line_is_reported() {
    let test = TestProject::new();
    test.write(".gitnb/notebooks", "a.ipynb\tnbpy/a.nbpy.py\nstray\n");
    let project = open(&test);

    let err = project.list_tracked().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Ledger error at line 2: expected 'document<TAB>mirror', found 'stray'"
    );
}

#[test]
fn test_custom_comment_prefix_from_config() {
    let test = TestProject::new();
    test.write(".gitnb/config.toml", "ledger_comment_prefix = \"//\"\n");
    test.write(".gitnb/notebooks", "// comment line here\na.ipynb\tb.py\n");

    let project = open(&test);
    assert_eq!(project.config().ledger_comment_prefix, "//");
    assert_eq!(project.list_tracked().unwrap(), vec![NormalizedPath::new("a.ipynb")]);
}

#[test]
fn test_untracked_follows_discovery_order() {
    let test = TestProject::new();
    for nb in ["z.ipynb", "a.ipynb", "sub/m.ipynb", ".ipynb_checkpoints/a.ipynb"] {
        test.write_three_cell_notebook(nb);
    }
    let project = open(&test);
    project.add("sub/m.ipynb", None).unwrap();

    assert_eq!(
        project.list_untracked().unwrap(),
        vec![NormalizedPath::new("a.ipynb"), NormalizedPath::new("z.ipynb")]
    );
    assert_eq!(
        project.list_mirrors().unwrap(),
        vec![NormalizedPath::new("nbpy/sub/m.nbpy.py")]
    );
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![(0..5usize).prop_map(Op::Add), (0..6usize).prop_map(Op::Remove)],
        0..12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn untracked_is_discovered_minus_tracked(ops in arb_ops()) {
        let test = TestProject::new();
        let names: Vec<String> = (0..5).map(|i| format!("nb{}.ipynb", i)).collect();
        for name in &names {
            test.write_three_cell_notebook(name);
        }
        let project = Project::new(
            NormalizedPath::new(test.root()),
            GitnbConfig { git_add_on_add: false, ..Default::default() },
        );

        for op in &ops {
            match op {
                Op::Add(i) => { project.add(&names[*i], None).unwrap(); }
                // Index 5 names a notebook that was never written
                Op::Remove(i) => {
                    let name = names.get(*i).cloned().unwrap_or_else(|| "ghost.ipynb".into());
                    project.remove(&name).unwrap();
                }
            }
        }

        let tracked = project.list_tracked().unwrap();
        let expected: Vec<NormalizedPath> = names
            .iter()
            .map(NormalizedPath::new)
            .filter(|p| !tracked.contains(p))
            .collect();
        prop_assert_eq!(project.list_untracked().unwrap(), expected);
    }
}
