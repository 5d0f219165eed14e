mod common;

use common::BoardTest;

#[test]
fn test_init_creates_default_columns() {
    let test = BoardTest::new();
    let output = test.run_success(&["init"]);
    assert!(output.contains("Created board 'default' with columns: To do, In progress, Done"));
    assert!(test.temp_dir.path().join("boards").join("default.json").exists());

    let err = test.run_failure(&["init"]);
    assert!(err.contains("already exists"));
}

#[test]
fn test_commands_need_an_initialized_board() {
    let test = BoardTest::new();
    let err = test.run_failure(&["show", "--project", "nowhere"]);
    assert!(err.contains("run 'taskboard init' first"));
}

#[test]
fn test_add_move_and_show_round_trip() {
    let test = BoardTest::new();
    test.run_success(&["init", "--column", "Backlog", "--column", "Done"]);

    let created = test.run_json(&["add", "Write docs", "-d", "user guide"]);
    let id = created["id"].as_str().unwrap().to_string();
    test.run_json(&["add", "Cut release", "--column", "backlog"]);

    let moved = test.run_json(&["mv", &id, "done"]);
    assert_eq!(moved["action"], "moved");
    assert_eq!(moved["index"], 0);

    let view = test.run_json(&["show"]);
    let columns = view["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0]["cards"][0]["title"], "Cut release");
    assert_eq!(columns[1]["cards"][0]["title"], "Write docs");
    assert_eq!(columns[1]["cards"][0]["description"], "user guide");

    let text = test.run_success(&["show", "--search", "release"]);
    assert!(text.contains("Backlog (1/1)"));
    assert!(!text.contains("Write docs"));
}

#[test]
fn test_moving_to_the_same_slot_writes_nothing() {
    let test = BoardTest::new();
    test.run_success(&["init"]);
    let created = test.run_json(&["add", "Only task"]);
    let id = created["id"].as_str().unwrap().to_string();

    let output = test.run_success(&["mv", &id, "To do", "--index", "0"]);
    assert!(output.contains("Nothing to change"));
}

#[test]
fn test_column_preferences_survive_between_runs() {
    let test = BoardTest::new();
    test.run_success(&["init"]);
    test.run_success(&["column", "hide", "in progress"]);
    test.run_success(&["column", "collapse", "Done"]);

    let stats = test.run_json(&["stats"]);
    assert_eq!(stats["total_columns"], 3);
    assert_eq!(stats["rendered_columns"], 2);
    assert_eq!(stats["hidden_columns"], 1);
    assert_eq!(stats["collapsed_columns"], 1);

    test.run_success(&["column", "show", "In progress"]);
    let stats = test.run_json(&["stats"]);
    assert_eq!(stats["hidden_columns"], 0);
}

#[test]
fn test_column_add_rename_and_move() {
    let test = BoardTest::new();
    test.run_success(&["init", "--column", "A", "--column", "B"]);

    let created = test.run_json(&["column", "add", "Review"]);
    assert_eq!(created["title"], "Review");
    test.run_success(&["column", "rename", "review", "QA"]);
    test.run_success(&["column", "move", "QA", "left"]);

    let listing = test.run_json(&["column", "ls"]);
    let titles: Vec<&str> = listing["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "QA", "B"]);

    let err = test.run_failure(&["column", "add", "qa"]);
    assert!(err.contains("already exists"));
}

#[test]
fn test_edit_label_and_remove_task() {
    let test = BoardTest::new();
    test.run_success(&["init"]);
    let created = test.run_json(&["add", "Draft"]);
    let id = created["id"].as_str().unwrap().to_string();

    let edited = test.run_json(&["edit", &id, "--title", "Final", "-d", "notes"]);
    assert_eq!(edited["title"], "Final");
    assert_eq!(edited["description"], "notes");

    let labelled = test.run_json(&["label", &id, "urgent"]);
    assert_eq!(labelled["labels"][0], "urgent");
    let found = test.run_json(&["show", "--search", "URGENT"]);
    assert_eq!(found["visible_tasks"], 1);

    test.run_success(&["rm", &id, "--yes"]);
    let stats = test.run_json(&["stats"]);
    assert_eq!(stats["total_tasks"], 0);
}
