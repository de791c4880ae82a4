use assert_cmd::Command;
use boxmind_ai::{ContentBlock, Message, Role, SessionWorkspace};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::{Value, json};
use tempfile::TempDir;

fn boxmind(root: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("boxmind"));
    cmd.arg("--root")
        .arg(root.path())
        .arg("--config")
        .arg(root.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .env_remove("BOXMIND_COMPRESSION_THRESHOLD")
        .env_remove("BOXMIND_COMPRESSION_KEEP_RECENT")
        .env_remove("BOXMIND_COMPRESSION_MODEL")
        .env_remove("BOXMIND_MAX_SEARCH_RESULTS");
    cmd
}

fn seed_box(root: &TempDir, turns: usize) -> SessionWorkspace {
    let ws = SessionWorkspace::open(root.path(), "lame", "10.10.10.3").unwrap();
    let mut history = vec![Message::user("Enumerate 10.10.10.3 and find a foothold")];
    history.push(Message::with_blocks(
        Role::Assistant,
        vec![ContentBlock::tool_use("scan", "nmap", json!({"command": "nmap -sV 10.10.10.3"}))],
    ));
    history.push(Message::with_blocks(
        Role::User,
        vec![ContentBlock::tool_result(
            "scan",
            "21/tcp open ftp vsftpd 2.3.4\n445/tcp open netbios-ssn Samba smbd 3.0.20-Debian",
        )],
    ));
    for i in 0..turns {
        history.push(Message::user(format!("continue with step {i} of the enumeration plan")));
        history.push(Message::assistant(format!("step {i} finished without new findings")));
    }
    ws.save_history(&history).unwrap();
    ws
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("boxmind"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("Boxmind"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("boxmind"));
    cmd.arg("--version").assert().success();
}

#[test]
fn test_unknown_box_fails() {
    let root = TempDir::new().unwrap();
    boxmind(&root)
        .args(["stats", "ghost"])
        .assert()
        .failure()
        .stderr(contains("No workspace for box 'ghost'"));
}

#[test]
fn test_index_then_search() {
    let root = TempDir::new().unwrap();
    let ws = seed_box(&root, 2);

    boxmind(&root)
        .args(["index", "lame"])
        .assert()
        .success()
        .stdout(contains("Indexed 7 messages from lame"));
    assert!(ws.memory_path().exists());

    boxmind(&root)
        .args(["search", "lame", "samba 3.0.20-debian"])
        .assert()
        .success()
        .stdout(contains("Result: nmap").and(contains("tool_result")));

    let output = boxmind(&root)
        .args(["search", "lame", "vsftpd", "--limit", "1", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let hits: Value = serde_json::from_slice(&output.stdout).unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["chunk"]["type"], "tool_result");
    assert_eq!(hits[0]["chunk"]["source"], "nmap");
    assert!(hits[0]["score"].as_f64().unwrap() > 0.01);
}

#[test]
fn test_reindex_adds_nothing_new() {
    let root = TempDir::new().unwrap();
    let ws = SessionWorkspace::open(root.path(), "lame", "10.10.10.3").unwrap();
    let history: Vec<Message> = (0..40)
        .map(|i| Message::user(format!("note alpha{i} about target service")))
        .collect();
    ws.save_history(&history).unwrap();

    let index = |root: &TempDir| -> Value {
        let output = boxmind(root)
            .args(["index", "lame", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    };

    let first = index(&root);
    assert_eq!(first["added"], 40);
    assert_eq!(first["chunks"], 40);

    let second = index(&root);
    assert_eq!(second["added"], 0);
    assert_eq!(second["chunks"], 40);
}

#[test]
fn test_search_no_hits() {
    let root = TempDir::new().unwrap();
    seed_box(&root, 0);

    boxmind(&root)
        .args(["search", "lame", "kerberos"])
        .assert()
        .success()
        .stdout(contains("No matching memory"));
}

#[test]
fn test_context_prints_rag_block() {
    let root = TempDir::new().unwrap();
    seed_box(&root, 0);
    boxmind(&root).args(["index", "lame"]).assert().success();

    boxmind(&root)
        .args(["context", "lame", "ftp vsftpd"])
        .assert()
        .success()
        .stdout(contains("## Retrieved context (long-term memory)").and(contains("vsftpd 2.3.4")));
}

#[test]
fn test_compact_under_budget_is_noop() {
    let root = TempDir::new().unwrap();
    let ws = seed_box(&root, 2);

    boxmind(&root)
        .args(["compact", "lame"])
        .assert()
        .success()
        .stdout(contains("within budget"));
    assert_eq!(ws.load_history().len(), 7);
}

#[test]
fn test_compact_truncates_long_history() {
    let root = TempDir::new().unwrap();
    let ws = seed_box(&root, 30); // 63 messages

    boxmind(&root)
        .args(["compact", "lame"])
        .assert()
        .success()
        .stdout(contains("63 -> 12 messages"))
        .stderr(contains("Summary failed").not().and(contains("WARN").not()));

    let history = ws.load_history();
    assert_eq!(history.len(), 12);
    assert_eq!(
        history[0],
        Message::user(
            "[History truncated: 53 older messages dropped. Consult notes.md for the full context.]"
        )
    );
    assert!(!ws.dir().join("history.json.tmp").exists());

    let backups = std::fs::read_dir(ws.dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("history-backup-"))
        .count();
    assert_eq!(backups, 1);

    boxmind(&root)
        .args(["search", "lame", "samba"])
        .assert()
        .success()
        .stdout(contains("Result: nmap"));
}

#[test]
fn test_compact_force_json() {
    let root = TempDir::new().unwrap();
    seed_box(&root, 5);

    let output = boxmind(&root)
        .args(["compact", "lame", "--force", "--keep-recent", "4", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["compacted"], true);
    assert_eq!(report["messages_before"], 13);
    assert_eq!(report["messages_after"], 6);
    assert_eq!(report["retired"], 9);
}

#[test]
fn test_stats_json() {
    let root = TempDir::new().unwrap();
    seed_box(&root, 1);
    boxmind(&root).args(["index", "lame"]).assert().success();

    let output = boxmind(&root)
        .args(["stats", "lame", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["history_messages"], 5);
    assert_eq!(stats["compression_threshold"], 40000);
    assert!(stats["chunks"].as_u64().unwrap() >= 2);
    assert_eq!(stats["chunks_by_type"]["tool_result"], 1);
}

#[test]
fn test_invalid_config_file_values_fall_back() {
    let root = TempDir::new().unwrap();
    seed_box(&root, 0);
    std::fs::write(
        root.path().join("config.toml"),
        "[compression]\nthreshold = 5\n",
    )
    .unwrap();

    boxmind(&root)
        .args(["stats", "lame"])
        .assert()
        .success()
        .stdout(contains("threshold 40000"));
}
