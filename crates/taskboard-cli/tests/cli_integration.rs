use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

fn taskboard() -> Command {
    let mut cmd = Command::cargo_bin("taskboard").unwrap();
    cmd.env_remove("TASKBOARD_FILE");
    cmd
}

fn parse_json_output(output: &str) -> Value {
    serde_json::from_str(output).expect("Failed to parse JSON output")
}

fn extract_id(json: &Value) -> String {
    json["data"]["id"].as_str().unwrap().to_string()
}

fn run_ok(file: &Path, args: &[&str]) -> Value {
    let output = taskboard()
        .arg("--file")
        .arg(file)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = parse_json_output(&String::from_utf8_lossy(&output));
    assert!(json["success"].as_bool().unwrap());
    json
}

fn create_project(file: &Path) -> String {
    let json = run_ok(file, &["project", "create", "--name", "Roadmap"]);
    extract_id(&json)
}

fn column_ids(file: &Path, project_id: &str) -> Vec<String> {
    let json = run_ok(file, &["column", "list", "--project-id", project_id]);
    json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

fn create_task(file: &Path, project_id: &str, column_id: &str, title: &str) -> String {
    let json = run_ok(
        file,
        &[
            "task",
            "create",
            "--project-id",
            project_id,
            "--column-id",
            column_id,
            "--title",
            title,
        ],
    );
    extract_id(&json)
}

fn titles_in(file: &Path, project_id: &str, column_id: &str) -> Vec<String> {
    let json = run_ok(
        file,
        &[
            "task",
            "list",
            "--project-id",
            project_id,
            "--column-id",
            column_id,
        ],
    );
    json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

mod project_tests {
    use super::*;

    #[test]
    fn test_project_create_seeds_default_columns() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        let project_id = create_project(&file);
        let json = run_ok(&file, &["column", "list", "--project-id", &project_id]);

        assert_eq!(json["data"]["count"], 3);
        assert_eq!(json["data"]["items"][0]["name"], "To Do");
        assert_eq!(json["data"]["items"][1]["position"], 1);
        assert_eq!(json["data"]["items"][2]["name"], "Done");
    }

    #[test]
    fn test_project_list_empty() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        let json = run_ok(&file, &["project", "list"]);
        assert_eq!(json["data"]["count"], 0);
        assert!(!file.exists());
    }

    #[test]
    fn test_file_from_env() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        Command::cargo_bin("taskboard")
            .unwrap()
            .env("TASKBOARD_FILE", &file)
            .args(["project", "create", "--name", "From env"])
            .assert()
            .success();

        let json = run_ok(&file, &["project", "list"]);
        assert_eq!(json["data"]["items"][0]["name"], "From env");
    }
}

mod column_tests {
    use super::*;

    #[test]
    fn test_column_create_appends() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);

        let json = run_ok(
            &file,
            &[
                "column",
                "create",
                "--project-id",
                &project_id,
                "--name",
                "Review",
                "--color",
                "#f59e0b",
            ],
        );
        assert_eq!(json["data"]["position"], 3);
        assert_eq!(json["data"]["color"], "#f59e0b");
    }

    #[test]
    fn test_column_move() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);

        let json = run_ok(
            &file,
            &["column", "move", "--id", &columns[2], "--over", &columns[0]],
        );
        assert_eq!(json["data"]["changed"], true);
        assert_eq!(
            json["data"]["plan"]["updates"].as_array().unwrap().len(),
            3
        );

        let reordered = column_ids(&file, &project_id);
        assert_eq!(
            reordered,
            vec![columns[2].clone(), columns[0].clone(), columns[1].clone()]
        );
    }

    #[test]
    fn test_column_move_onto_itself_is_noop() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);

        let json = run_ok(
            &file,
            &["column", "move", "--id", &columns[1], "--over", &columns[1]],
        );
        assert_eq!(json["data"]["changed"], false);
    }

    #[test]
    fn test_column_delete_moves_tasks_to_first_column() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);
        create_task(&file, &project_id, &columns[0], "a");
        create_task(&file, &project_id, &columns[1], "x");

        run_ok(&file, &["column", "delete", "--id", &columns[1]]);

        assert_eq!(titles_in(&file, &project_id, &columns[0]), vec!["a", "x"]);
        assert_eq!(column_ids(&file, &project_id).len(), 2);
    }

    #[test]
    fn test_column_update_renames() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);

        let json = run_ok(
            &file,
            &["column", "update", "--id", &columns[0], "--name", "Backlog"],
        );
        assert_eq!(json["data"]["name"], "Backlog");
        assert_eq!(json["data"]["position"], 0);
    }
}

mod task_tests {
    use super::*;

    struct Board {
        file: std::path::PathBuf,
        project_id: String,
        columns: Vec<String>,
        _dir: tempfile::TempDir,
    }

    fn board_with_tasks() -> (Board, Vec<String>) {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);
        let tasks = ["a", "b", "c"]
            .iter()
            .map(|t| create_task(&file, &project_id, &columns[0], t))
            .collect();
        (
            Board {
                file,
                project_id,
                columns,
                _dir: dir,
            },
            tasks,
        )
    }

    #[test]
    fn test_task_create_appends_order_index() {
        let (board, _) = board_with_tasks();
        let json = run_ok(
            &board.file,
            &[
                "task",
                "list",
                "--project-id",
                &board.project_id,
                "--column-id",
                &board.columns[0],
            ],
        );
        let indices: Vec<i64> = json["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["order_index"].as_i64().unwrap())
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_task_move_within_column() {
        let (board, tasks) = board_with_tasks();

        let json = run_ok(
            &board.file,
            &["task", "move", "--id", &tasks[0], "--onto-task", &tasks[2]],
        );
        assert_eq!(json["data"]["changed"], true);
        assert_eq!(json["data"]["plan"]["new_order_index"], 2);

        assert_eq!(
            titles_in(&board.file, &board.project_id, &board.columns[0]),
            vec!["b", "c", "a"]
        );
    }

    #[test]
    fn test_task_move_to_other_column() {
        let (board, tasks) = board_with_tasks();

        let json = run_ok(
            &board.file,
            &[
                "task",
                "move",
                "--id",
                &tasks[1],
                "--onto-column",
                &board.columns[2],
            ],
        );
        assert_eq!(json["data"]["plan"]["new_column_id"], board.columns[2]);
        assert_eq!(json["data"]["plan"]["new_order_index"], 0);

        let source = run_ok(
            &board.file,
            &[
                "task",
                "list",
                "--project-id",
                &board.project_id,
                "--column-id",
                &board.columns[0],
            ],
        );
        let indices: Vec<i64> = source["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["order_index"].as_i64().unwrap())
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_task_move_without_target_is_noop() {
        let (board, tasks) = board_with_tasks();
        let json = run_ok(&board.file, &["task", "move", "--id", &tasks[0]]);
        assert_eq!(json["data"]["changed"], false);
    }

    #[test]
    fn test_task_reorder() {
        let (board, tasks) = board_with_tasks();
        let ids = format!("{},{},{}", tasks[2], tasks[0], tasks[1]);

        run_ok(
            &board.file,
            &["task", "reorder", "--column-id", &board.columns[0], "--ids", &ids],
        );
        assert_eq!(
            titles_in(&board.file, &board.project_id, &board.columns[0]),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn test_task_update_and_delete() {
        let (board, tasks) = board_with_tasks();

        let json = run_ok(
            &board.file,
            &[
                "task",
                "update",
                "--id",
                &tasks[1],
                "--title",
                "b2",
                "--status",
                "in-progress",
                "--priority",
                "high",
                "--due-date",
                "2025-03-01",
            ],
        );
        assert_eq!(json["data"]["title"], "b2");
        assert_eq!(json["data"]["status"], "in_progress");
        assert_eq!(json["data"]["priority"], "high");
        assert_eq!(json["data"]["due_date"], "2025-03-01");

        run_ok(&board.file, &["task", "delete", "--id", &tasks[0]]);
        assert_eq!(
            titles_in(&board.file, &board.project_id, &board.columns[0]),
            vec!["b2", "c"]
        );
    }

    #[test]
    fn test_task_update_keeps_unnamed_fields() {
        let (board, _) = board_with_tasks();
        let created = run_ok(
            &board.file,
            &[
                "task",
                "create",
                "--project-id",
                &board.project_id,
                "--column-id",
                &board.columns[1],
                "--title",
                "notes",
                "--description",
                "keep me",
            ],
        );
        let id = extract_id(&created);

        let json = run_ok(&board.file, &["task", "update", "--id", &id, "--title", "renamed"]);
        assert_eq!(json["data"]["description"], "keep me");

        let json = run_ok(
            &board.file,
            &["task", "update", "--id", &id, "--clear-description"],
        );
        assert!(json["data"]["description"].is_null());
    }

    #[test]
    fn test_board_show() {
        let (board, tasks) = board_with_tasks();
        let json = run_ok(
            &board.file,
            &["board", "show", "--project-id", &board.project_id],
        );

        let columns = json["data"]["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0]["tasks"].as_array().unwrap().len(), 3);
        assert_eq!(columns[0]["tasks"][0]["task"]["id"], tasks[0]);
        assert_eq!(columns[0]["tasks"][0]["is_dragging"], false);
    }

    #[test]
    fn test_reconcile_clean_file() {
        let (board, _) = board_with_tasks();
        let json = run_ok(
            &board.file,
            &["reconcile", "--project-id", &board.project_id],
        );
        assert_eq!(json["data"]["columns_changed"], 0);
        assert_eq!(json["data"]["tasks_changed"], 0);
    }
}

mod permission_tests {
    use super::*;

    #[test]
    fn test_viewer_cannot_move() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);
        let task_id = create_task(&file, &project_id, &columns[0], "a");

        taskboard()
            .arg("--file")
            .arg(&file)
            .args([
                "--role",
                "viewer",
                "task",
                "move",
                "--id",
                &task_id,
                "--onto-column",
                &columns[1],
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("\"success\":false"))
            .stderr(predicate::str::contains("Permission denied"));

        assert_eq!(titles_in(&file, &project_id, &columns[0]), vec!["a"]);
    }

    #[test]
    fn test_member_cannot_delete_columns() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let project_id = create_project(&file);
        let columns = column_ids(&file, &project_id);

        taskboard()
            .arg("--file")
            .arg(&file)
            .args(["--role", "member", "column", "delete", "--id", &columns[0]])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Permission denied"));
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_missing_required_args() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        taskboard()
            .arg("--file")
            .arg(&file)
            .args(["project", "create"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--name"));
    }

    #[test]
    fn test_invalid_uuid() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        taskboard()
            .arg("--file")
            .arg(&file)
            .args(["board", "show", "--project-id", "not-a-uuid"])
            .assert()
            .failure();
    }

    #[test]
    fn test_nonexistent_project() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        taskboard()
            .arg("--file")
            .arg(&file)
            .args([
                "board",
                "show",
                "--project-id",
                "00000000-0000-0000-0000-000000000000",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("\"success\":false"))
            .stderr(predicate::str::contains("Not found"));
    }

    #[test]
    fn test_onto_task_conflicts_with_onto_column() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");
        let id = "00000000-0000-0000-0000-000000000000";

        taskboard()
            .arg("--file")
            .arg(&file)
            .args([
                "task",
                "move",
                "--id",
                id,
                "--onto-task",
                id,
                "--onto-column",
                id,
            ])
            .assert()
            .failure();
    }

    #[test]
    fn test_unknown_role() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("board.json");

        taskboard()
            .arg("--file")
            .arg(&file)
            .args(["--role", "intern", "project", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown role"));
    }
}
