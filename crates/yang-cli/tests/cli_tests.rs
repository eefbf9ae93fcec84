use std::path::Path;
use std::process::{Command, Output};

const MODULE: &str = r#"module inventory {
  namespace "urn:example:inventory";
  prefix inv;

  grouping item {
    leaf sku { type string; }
  }

  container inventory {
    list part {
      key "sku";
      uses item;
      leaf count { type uint32; default 0; }
    }
  }
}
"#;

fn yangc(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yangc"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn project(dir: &Path, module: &str) {
    std::fs::create_dir_all(dir.join("yang")).unwrap();
    std::fs::write(dir.join("yang.toml"), "[compiler]\nmodel_id = \"org.example.inventory\"\n").unwrap();
    std::fs::write(dir.join("yang/inventory.yang"), module).unwrap();
}

#[test]
fn test_tree_prints_expanded_groupings() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), MODULE);

    let output = yangc(&["tree"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "module: inventory\n  container inventory\n    list part [sku]\n      leaf count: uint32 = 0\n      leaf sku: string\n"
    );
}

#[test]
fn test_compile_writes_into_overridden_directories() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), MODULE);

    let output = yangc(&["compile", "--out-dir", "out", "--metadata-dir", "meta"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("out/inventory.tree").is_file());
    assert!(dir.path().join("meta/yang-model.toml").is_file());
    assert!(dir.path().join("meta/inventory.ysnp").is_file());
}

#[test]
fn test_link_errors_fail_with_location() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), &MODULE.replace("uses item;", "uses missing;"));

    let output = yangc(&["check"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DB-COMPILE-001"), "{stderr}");
    assert!(stderr.contains("\"missing\""), "{stderr}");
    assert!(!dir.path().join("target").exists());
}

#[test]
fn test_unknown_module_lists_the_available_ones() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), MODULE);

    let output = yangc(&["tree", "nope"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("inventory"));
}
