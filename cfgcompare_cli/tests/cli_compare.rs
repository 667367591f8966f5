use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Temp workspace holding config files plus isolated config/cache dirs
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        TestFixture {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    fn run(&self, args: &[&str]) -> Output {
        let home = self.home();
        Command::new(env!("CARGO_BIN_EXE_cfgcompare"))
            .args(args)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_CACHE_HOME", home.join("cache"))
            .env("APPDATA", home.join("config"))
            .env("LOCALAPPDATA", home.join("cache"))
            .env("HOME", &home)
            .env("RUST_LOG", "warn")
            .output()
            .expect("failed to run cfgcompare")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "command failed: {}\n{}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).expect("stdout not utf-8");
        serde_json::from_str(&stdout).expect("invalid json output")
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("non utf-8 temp path")
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected array")
        .iter()
        .map(|v| v.as_str().expect("expected string").to_string())
        .collect()
}

#[test]
fn test_compare_json_report() {
    let fixture = TestFixture::new();
    let source = fixture.create_file(
        "uat.json",
        r#"{"database": {"host": "uat", "port": 5432, "debug": true}}"#,
    );
    let target = fixture.create_file(
        "prod.yaml",
        "database:\n  host: prod\n  port: \"5432\"\n",
    );

    let report = fixture.run_json(&["compare", path_arg(&source), path_arg(&target), "--json"]);

    assert_eq!(report["source_format"], "json");
    assert_eq!(report["target_format"], "yaml");
    assert_eq!(strings(&report["only_in_source"]), vec!["database.debug"]);
    assert!(strings(&report["only_in_target"]).is_empty());
    assert_eq!(
        strings(&report["common"]),
        vec!["database.host", "database.port"]
    );

    let diffs = report["value_differences"].as_array().unwrap();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0]["key"], "database.host");
    assert_eq!(diffs[0]["source_value"], "uat");
    assert_eq!(diffs[0]["target_value"], "prod");

    assert_eq!(report["summary"]["matching"], 1);
    assert_eq!(report["summary"]["identical"], false);
}

#[test]
fn test_compare_text_output() {
    let fixture = TestFixture::new();
    let source = fixture.create_file("a.properties", "server.port=8080\nserver.name=api\n");
    let target = fixture.create_file("b.toml", "[server]\nport = 8081\nname = \"api\"\n");

    let output = fixture.run(&[
        "compare",
        path_arg(&source),
        path_arg(&target),
        "--no-color",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration Comparison Summary"));
    assert!(stdout.contains("(PROPERTIES)"));
    assert!(stdout.contains("(TOML)"));
    assert!(stdout.contains("Different values: 1"));
    assert!(stdout.contains("server.port: 8080 -> 8081"));
}

#[test]
fn test_compare_with_ignored_keys() {
    let fixture = TestFixture::new();
    let source = fixture.create_file("a.json", r#"{"app": {"version": "1.0", "name": "x"}}"#);
    let target = fixture.create_file("b.json", r#"{"app": {"version": "2.0", "name": "x"}}"#);

    let report = fixture.run_json(&[
        "compare",
        path_arg(&source),
        path_arg(&target),
        "--ignore-key",
        r"\.version$",
        "--json",
    ]);

    assert_eq!(report["summary"]["identical"], true);
    assert_eq!(strings(&report["common"]), vec!["app.name"]);
}

#[test]
fn test_compare_undetectable_file_fails() {
    let fixture = TestFixture::new();
    let source = fixture.create_file("x.unknownext", "not json and not anything else @#$");
    let target = fixture.create_file("b.json", r#"{"a": 1}"#);

    let output = fixture.run(&["compare", path_arg(&source), path_arg(&target)]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("x.unknownext"), "stderr: {}", stderr);
}

#[test]
fn test_compare_missing_file_fails() {
    let fixture = TestFixture::new();
    let target = fixture.create_file("b.json", r#"{"a": 1}"#);
    let missing = fixture.temp_dir.path().join("missing.json");

    let output = fixture.run(&["compare", path_arg(&missing), path_arg(&target)]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_detect_command() {
    let fixture = TestFixture::new();
    let ini = fixture.create_file("legacy.cfg", "[db]\nhost = localhost\n");
    let empty = fixture.create_file("empty.yml", "");
    let unknown = fixture.create_file("notes.txt", "just words");

    let output = fixture.run(&[
        "detect",
        path_arg(&ini),
        path_arg(&empty),
        path_arg(&unknown),
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(": ini"));
    assert!(lines[1].ends_with(": yaml (by extension)"));
    assert!(lines[2].ends_with(": unknown"));
}

#[test]
fn test_flatten_command_json() {
    let fixture = TestFixture::new();
    let file = fixture.create_file(
        "app.xml",
        r#"<app env="prod"><hosts><host>a</host><host>b</host></hosts></app>"#,
    );

    let flat = fixture.run_json(&["flatten", path_arg(&file), "--json"]);
    assert_eq!(flat["app.@_env"], "prod");
    assert_eq!(flat["app.hosts.host[0]"], "a");
    assert_eq!(flat["app.hosts.host[1]"], "b");
}

#[test]
fn test_flatten_command_text_with_separator() {
    let fixture = TestFixture::new();
    let file = fixture.create_file("app.json", r#"{"a": {"b": [1, null]}}"#);

    let output = fixture.run(&["flatten", path_arg(&file), "--separator", "/"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["a/b[0] = 1", "a/b[1] = null"]);
}

#[test]
fn test_config_init_writes_defaults() {
    let fixture = TestFixture::new();

    let output = fixture.run(&["config", "--init"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(stdout.trim());
    assert!(path.ends_with("cfgcompare.toml"));
    let written = fs::read_to_string(&path).expect("config file written");
    assert!(written.contains("separator = \".\""));
}
