//! Integration tests for the translate and load commands.

use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::TempDir;

fn dump2sqlite() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dump2sqlite"))
}

const MYSQL_DUMP: &str = r#"-- MySQL dump 10.13
/*!40101 SET NAMES utf8mb4 */;

DROP TABLE IF EXISTS `products`;
CREATE TABLE `products` (
  `id` INT(11) NOT NULL AUTO_INCREMENT,
  `name` VARCHAR(255) NOT NULL,
  `price` DECIMAL(10,2) NOT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;



LOCK TABLES `products` WRITE;
INSERT INTO `products` VALUES (1,'Widget',9.99),(2,'Gadget',24.50);
UNLOCK TABLES;
"#;

fn write_dump(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, MYSQL_DUMP).unwrap();
    path
}

#[test]
fn test_translate_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");

    let output = dump2sqlite()
        .args(["translate", input.to_str().unwrap(), "--no-header"])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("`id` INTEGER PRIMARY KEY AUTOINCREMENT,"));
    assert!(!stdout.contains("PRIMARY KEY (`id`)"));
    assert!(!stdout.contains("LOCK TABLES"));
    assert!(!stdout.contains("ENGINE="));
    assert!(!stdout.contains("\n\n\n"));
    assert!(!stdout.starts_with("-- Translated"));
}

#[test]
fn test_translate_to_file_with_header() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");
    let output_file = dir.path().join("out").join("sqlite.sql");

    let output = dump2sqlite()
        .args([
            "translate",
            input.to_str().unwrap(),
            "-o",
            output_file.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    let result = fs::read_to_string(&output_file).unwrap();
    assert!(result.starts_with("-- Translated by dump2sqlite\n"));
    assert!(result.contains("INSERT INTO `products` VALUES"));
}

#[test]
fn test_translate_gzip_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dump.sql.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        fs::File::create(&input).unwrap(),
        flate2::Compression::default(),
    );
    encoder.write_all(MYSQL_DUMP.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let output = dump2sqlite()
        .args(["translate", input.to_str().unwrap(), "--no-header"])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("AUTOINCREMENT"));
}

#[test]
fn test_translate_dry_run_prints_statistics() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");
    let output_file = dir.path().join("out.sql");

    let output = dump2sqlite()
        .args([
            "translate",
            input.to_str().unwrap(),
            "-o",
            output_file.to_str().unwrap(),
            "--dry-run",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(!output_file.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Statements stripped: 2"));
    assert!(stderr.contains("Tables rewritten: 1"));
    assert!(stderr.contains("Dry run"));
}

#[test]
fn test_translate_strict_accepts_stock_dump() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");

    let output = dump2sqlite()
        .args(["translate", input.to_str().unwrap(), "--strict", "--dry-run"])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Table options dropped: 1"));
}

#[test]
fn test_translate_strict_fails_on_warnings() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dump.sql");
    fs::write(
        &input,
        "CREATE TABLE `t` (\n  `id` bigint NOT NULL AUTO_INCREMENT,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB;\n",
    )
    .unwrap();

    let output = dump2sqlite()
        .args(["translate", input.to_str().unwrap(), "--strict", "--dry-run"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Strict mode: 1 warnings"));
    assert!(stderr.contains("AUTO_INCREMENT left unchanged"));
}

#[test]
fn test_translate_glob_requires_output_dir() {
    let dir = TempDir::new().unwrap();
    write_dump(&dir, "a.sql");
    write_dump(&dir, "b.sql");
    let pattern = dir.path().join("*.sql");

    let output = dump2sqlite()
        .args(["translate", pattern.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Output directory required"));
}

#[test]
fn test_translate_glob_to_directory() {
    let dir = TempDir::new().unwrap();
    write_dump(&dir, "a.sql");
    write_dump(&dir, "b.sql");
    let pattern = dir.path().join("*.sql");
    let out_dir = dir.path().join("translated");

    let output = dump2sqlite()
        .args([
            "translate",
            pattern.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    for name in ["a.sql", "b.sql"] {
        let result = fs::read_to_string(out_dir.join(name)).unwrap();
        assert!(result.contains("AUTOINCREMENT"), "{name}");
    }
    assert!(String::from_utf8_lossy(&output.stderr).contains("Succeeded: 2"));
}

#[test]
fn test_translate_missing_file() {
    let output = dump2sqlite()
        .args(["translate", "/nonexistent/dump.sql"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_load_default_database_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");

    let output = dump2sqlite()
        .args(["load", input.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    let db = dir.path().join("db.sqlite");
    assert!(db.is_file());

    let conn = rusqlite::Connection::open(&db).unwrap();
    let name: String = conn
        .query_row("SELECT name FROM products WHERE id = 2", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Gadget");
}

#[test]
fn test_load_json_success() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");
    let db = dir.path().join("shop.db");

    let output = dump2sqlite()
        .args([
            "load",
            input.to_str().unwrap(),
            "-o",
            db.to_str().unwrap(),
            "--json",
            "--keep-sql",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Failed to parse JSON ({e}): {stdout}"));

    assert_eq!(json["success"], true);
    assert_eq!(json["db_file"], "shop.db");
    assert_eq!(json["engine"], "embedded");
    assert_eq!(json["tables"], 1);
    assert!(json["warnings"].is_array());
    assert!(db.is_file());
    assert!(dir.path().join("shop.db.sql").is_file());
}

#[test]
fn test_load_keep_sql_never_overwrites_input() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "db.sql");

    let output = dump2sqlite()
        .args(["load", input.to_str().unwrap(), "--keep-sql"])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(fs::read_to_string(&input).unwrap(), MYSQL_DUMP);
    let script = fs::read_to_string(dir.path().join("db.sqlite.sql")).unwrap();
    assert!(script.contains("AUTOINCREMENT"));
    assert!(dir.path().join("db.sqlite").is_file());
}

#[test]
fn test_load_refuses_input_as_output() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");

    let output = dump2sqlite()
        .args(["load", input.to_str().unwrap(), "-o", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is the input dump"));

    // `-o dump` would keep its script as dump.sql
    let db = dir.path().join("dump");
    let output = dump2sqlite()
        .args([
            "load",
            input.to_str().unwrap(),
            "-o",
            db.to_str().unwrap(),
            "--keep-sql",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!db.exists());
    assert_eq!(fs::read_to_string(&input).unwrap(), MYSQL_DUMP);
}

#[test]
fn test_load_json_failure() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.sql");
    fs::write(&input, "CREATE TABLE t (a int;\n").unwrap();
    let db = dir.path().join("db.sqlite");

    let output = dump2sqlite()
        .args(["load", input.to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("embedded failed"));
    assert!(!db.exists());
}

#[test]
fn test_load_with_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");
    let config = dir.path().join("config.yaml");
    fs::write(&config, "engine: sqlite3\nsqlite3_bin: dump2sqlite-missing-shell\n").unwrap();

    let output = dump2sqlite()
        .args([
            "load",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("dump2sqlite-missing-shell"));

    // Command-line flags win over the config file
    let output = dump2sqlite()
        .args([
            "load",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--engine",
            "embedded",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
}

#[test]
fn test_load_unknown_engine() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "dump.sql");

    let output = dump2sqlite()
        .args(["load", input.to_str().unwrap(), "--engine", "duckdb"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown engine"));
}

#[test]
fn test_completions() {
    let output = dump2sqlite().args(["completions", "bash"]).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("dump2sqlite"));
}
