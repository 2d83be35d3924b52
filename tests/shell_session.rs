use std::{fs, io::Cursor, path::PathBuf};

use gradebook::{
    RecordStore,
    events::{MemorySink, StoreEvent},
    shell::{Flow, Shell},
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("gradebook-shell-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn run(script: &str) -> (RecordStore<MemorySink>, String) {
    let mut shell = Shell::new(RecordStore::with_sink(MemorySink::new()), Vec::new());
    shell.run(Cursor::new(script)).unwrap();
    let (store, out) = shell.into_parts();
    (store, String::from_utf8(out).unwrap())
}

#[test]
fn add_update_delete_round() {
    let (store, out) = run("add Alice 90\nupdate Alice 70\nadd Bob 60\ndelete Bob\n");

    assert_eq!(
        out,
        "Added Alice with grade 90\nUpdated Alice with new grade 70\nAdded Bob with grade \
         60\nDeleted Bob\n"
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("Alice").map(|g| g.value()), Some(70));
}

#[test]
fn failures_are_reported_and_the_session_goes_on() {
    let (store, out) = run("add Alice ninety\nupdate Bob 50\ndelete Bob\nadd Alice 90\n");
    let lines: Vec<_> = out.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("warning: Grade must be between 0 to 100"));
    assert_eq!(lines[1], "error: Student `Bob` not found.");
    assert_eq!(lines[2], "error: Student `Bob` not found.");
    assert_eq!(lines[3], "Added Alice with grade 90");
    assert_eq!(store.len(), 1);

    // the bad grade is only a warning on screen, but the store still logged it
    let rejected = store
        .sink()
        .events()
        .iter()
        .filter(|e| matches!(e, StoreEvent::Rejected { .. }))
        .count();
    assert_eq!(rejected, 3);
}

#[test]
fn empty_fields_never_reach_the_store() {
    let (store, out) = run("add\nadd Alice\nupdate \"\" 40\ndelete\n");

    assert_eq!(
        out,
        "warning: Student name cannot be empty.\nwarning: Grade cannot be empty.\nwarning: \
         Student name cannot be empty.\nwarning: Student name cannot be empty.\n"
    );
    assert!(store.is_empty());
    assert!(store.sink().events().is_empty());
}

#[test]
fn view_lists_students_or_says_there_are_none() {
    let (_, out) = run("view\n");
    assert_eq!(out, "No students found.\n");

    let (_, out) = run("add \"Mary Ann\" 88\nadd Bob 7\nview\n");
    assert!(out.contains("Mary Ann"));
    assert!(out.contains("88"));
    assert!(out.contains("2 student(s)"));
    let mary = out.find("Mary Ann").unwrap();
    let bob = out.rfind("Bob").unwrap();
    assert!(mary < bob);
}

#[test]
fn view_json_is_a_list_of_records() {
    let (_, out) = run("add Alice 90\nview --json\n");
    let json_start = out.find('[').unwrap();
    let value: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
    assert_eq!(value, serde_json::json!([{ "Student_name": "Alice", "Grade": 90 }]));
}

#[test]
fn export_uses_given_or_default_path() {
    let root = temp_root();
    let default = root.join("default.csv");
    let explicit = root.join("explicit.csv");

    let mut shell = Shell::new(RecordStore::with_sink(MemorySink::new()), Vec::new())
        .with_export_path(&default);
    let script = format!("add Alice 90\nexport\nexport {}\n", explicit.display());
    shell.run(Cursor::new(script)).unwrap();
    let (store, out) = shell.into_parts();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains(&format!("Exported student data to {}", default.display())));
    assert!(out.contains(&format!("Exported student data to {}", explicit.display())));
    assert_eq!(fs::read(&default).unwrap(), fs::read(&explicit).unwrap());

    let exports = store
        .sink()
        .events()
        .iter()
        .filter(|e| matches!(e, StoreEvent::Exported { .. }))
        .count();
    assert_eq!(exports, 2);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn exit_stops_reading() {
    let (store, _) = run("add Alice 90\nexit\nadd Bob 60\n");
    assert_eq!(store.len(), 1);

    let mut shell = Shell::new(RecordStore::with_sink(MemorySink::new()), Vec::new());
    assert_eq!(shell.execute("quit").unwrap(), Flow::Exit);
    assert_eq!(shell.execute("").unwrap(), Flow::Continue);
}
