//! Runs the compiled `paper-index` binary against a scratch config.

mod common;

use common::{exists, pdf_with_pages, Fixture};
use std::path::{Path, PathBuf};
use std::process::Command;

fn binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("paper-index");
    path
}

fn run(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn fixture() -> Fixture {
    let fx = Fixture::new();
    fx.doc(
        "20230114_0930_invoice",
        vec![
            ("doc.pdf", pdf_with_pages(2, None)),
            ("labels", b"work,red\n".to_vec()),
        ],
    );
    fx.doc(
        "20230115_1000",
        vec![("paper.1.jpg", vec![7; 20]), ("notes.odt", vec![0; 3])],
    );
    tokio::runtime::Runtime::new().unwrap().block_on(fx.tracking(&[
        ("20230114_0930_invoice", "invoice", 100),
        ("20230115_1000", "letter", 200),
    ]));
    fx
}

#[test]
fn build_creates_database() {
    let fx = fixture();
    let config = fx.write_config_file(&[("work", "index")]);

    let (stdout, stderr, success) = run(&config, &["build"]);
    assert!(success, "build failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Found 2 documents"));
    assert!(stdout.contains("Saving in"));
    assert!(stdout.contains("ok"));
    assert!(exists(&fx.result_db));

    // Unknown file types are reported on stderr through the log.
    assert!(stderr.contains("notes.odt"), "stderr={}", stderr);
}

#[test]
fn build_is_the_default_command() {
    let fx = fixture();
    let config = fx.write_config_file(&[]);

    let (stdout, stderr, success) = run(&config, &[]);
    assert!(success, "run failed: stdout={}, stderr={}", stdout, stderr);
    assert!(exists(&fx.result_db));
}

#[test]
fn scan_json_reports_levels() {
    let fx = fixture();
    let config = fx.write_config_file(&[("work", "data")]);

    let (stdout, stderr, success) = run(&config, &["scan", "--json"]);
    assert!(success, "scan failed: stdout={}, stderr={}", stdout, stderr);
    assert!(!exists(&fx.result_db));

    let json_start = stdout.find("\n{").expect("json summary in stdout") + 1;
    let summary: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    assert_eq!(summary["documents"], 2);
    assert_eq!(summary["by_level"]["data"], 1);
    assert_eq!(summary["by_level"]["full"], 1);
    assert_eq!(summary["warnings"]["unknown_file_type"], 1);
}

#[test]
fn bad_level_exits_with_error() {
    let fx = fixture();
    let config = fx.write_config_file(&[("work", "secret")]);

    let (_, stderr, success) = run(&config, &["build"]);
    assert!(!success);
    assert!(stderr.contains("secret"), "stderr={}", stderr);
    assert!(!exists(&fx.result_db));
}
