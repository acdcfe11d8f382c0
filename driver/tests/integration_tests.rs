use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use driver::{CompileError, DEFAULT_RUNTIME, compile};
use model::TargetConfig;
use regex_lite::Regex;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expected {
    Ok,
    ParseError,
    SemanticError,
}

fn workspace_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest_dir).parent().expect("Failed to get workspace root").to_path_buf()
}

fn parse_expected(source: &str) -> Option<Expected> {
    for line in source.lines() {
        if let Some(rest) = line.trim().strip_prefix("// EXPECT:") {
            return match rest.trim() {
                "ok" => Some(Expected::Ok),
                "parse-error" => Some(Expected::ParseError),
                "semantic-error" => Some(Expected::SemanticError),
                _ => None,
            };
        }
    }
    None
}

fn outcome(result: &Result<String, CompileError>) -> Expected {
    match result {
        Ok(_) => Expected::Ok,
        Err(CompileError::Parse(_)) => Expected::ParseError,
        Err(CompileError::Semantic(_)) => Expected::SemanticError,
    }
}

#[test]
fn run_all_mpl_tests() {
    let testing_dir = workspace_root().join("testing");

    let mut tests_failed = 0;
    let mut tests_run = 0;

    let mut paths: Vec<PathBuf> = fs::read_dir(&testing_dir)
        .expect("Failed to read testing dir")
        .map(|entry| entry.expect("Failed to read entry").path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("mpl"))
        .collect();
    paths.sort();

    for path in paths {
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        let source = fs::read_to_string(&path).expect("Failed to read source");
        let Some(expected) = parse_expected(&source) else {
            println!("Skipping {} (no // EXPECT annotation)", file_name);
            continue;
        };

        tests_run += 1;
        let result = compile(&source, DEFAULT_RUNTIME, &TargetConfig::default());
        let actual = outcome(&result);
        if actual == expected {
            println!("Passed {}", file_name);
        } else {
            println!("Failed {}: expected {:?}, got {:?}", file_name, expected, actual);
            if let Err(err) = &result {
                for diagnostic in err.diagnostics() {
                    println!("    {}", diagnostic);
                }
            }
            tests_failed += 1;
        }
    }

    println!("{} tests run, {} failed", tests_run, tests_failed);
    assert!(tests_run > 0, "no annotated programs found");
    assert_eq!(tests_failed, 0, "{} of {} tests failed", tests_failed, tests_run);
}

fn compile_fixture(name: &str) -> String {
    let source = fs::read_to_string(workspace_root().join("testing").join(name)).expect("Failed to read fixture");
    compile(&source, DEFAULT_RUNTIME, &TargetConfig::default()).expect("fixture should compile")
}

fn assert_matches(wat: &str, pattern: &str) {
    let re = Regex::new(pattern).expect("valid pattern");
    assert!(re.is_match(wat), "pattern {:?} not found in:\n{}", pattern, wat);
}

#[test]
fn factorial_module_shape() {
    let wat = compile_fixture("factorial.mpl");
    assert_matches(&wat, r#"\(func \$fn\.fact \(param \$n i32\) \(result i32\)"#);
    assert_matches(&wat, r#"\(func \$main \(export "main"\)"#);
    assert_matches(&wat, r"call \$fn\.fact\s+local\.get \$i\s+call \$fn\.loop_fact\s+i32\.eq");
    assert_matches(&wat, r"block \$while_exit_0\s+loop \$while_head_0");
    assert_matches(&wat, r"call \$assert_failed");
}

#[test]
fn arrays_module_shape() {
    let wat = compile_fixture("arrays.mpl");
    assert_matches(&wat, r"i32\.const 8\s+call \$alloc_array");
    assert_matches(&wat, r"f64\.store offset=4");
    assert_matches(&wat, r#"\(data \(i32\.const 1024\) "\\05\\00\\00\\00"\)"#);
}

#[test]
fn strings_module_shape() {
    let wat = compile_fixture("strings.mpl");
    assert_matches(&wat, r"i32\.const 252\s+call \$read_string");
    assert_matches(&wat, r"call \$string_concat");
    assert_matches(&wat, r"call \$string_compare\s+i32\.const 0\s+i32\.ne");
}

#[test]
fn module_embeds_runtime_once() {
    let wat = compile_fixture("empty.mpl");
    assert_eq!(wat.matches("(global $heap_ptr").count(), 1);
    assert_eq!(wat.matches("(memory ").count(), 1);
    assert_matches(&wat, r#"\(memory \(export "memory"\) 1\)"#);
}

#[test]
fn cli_scan_trace() {
    let output = Command::new(env!("CARGO_BIN_EXE_minipl"))
        .arg("-s")
        .arg(workspace_root().join("testing").join("empty.mpl"))
        .output()
        .expect("Failed to run minipl");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("   1 COMMENT      '// EXPECT: ok' "), "{}", stdout);
    assert!(stdout.contains("   2 PROGRAM      'program' "));
}

#[test]
fn cli_writes_module() {
    let out_path = std::env::temp_dir().join(format!("minipl-hello-{}.wat", std::process::id()));
    let status = Command::new(env!("CARGO_BIN_EXE_minipl"))
        .arg(workspace_root().join("testing").join("hello.mpl"))
        .arg("-o")
        .arg(&out_path)
        .arg("--entry")
        .arg("_start")
        .status()
        .expect("Failed to run minipl");
    assert!(status.success());
    let wat = fs::read_to_string(&out_path).expect("module written");
    let _ = fs::remove_file(&out_path);
    assert!(wat.contains("(export \"_start\")"));
    assert!(wat.contains("call $write_newline"));
}

#[test]
fn cli_reports_parse_error() {
    let out_path = std::env::temp_dir().join(format!("minipl-missing-{}.wat", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_minipl"))
        .arg(workspace_root().join("testing").join("missing_dot.mpl"))
        .arg("-o")
        .arg(&out_path)
        .output()
        .expect("Failed to run minipl");
    assert!(!output.status.success());
    assert!(!out_path.exists());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "PARSE ERROR, NO OUTPUT");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error at end: Expect '.' after program body."), "{}", stderr);
}
