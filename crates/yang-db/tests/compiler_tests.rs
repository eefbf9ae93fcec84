use std::path::{Path, PathBuf};

use expect_test::expect;
use yang_db::{
    read_snapshot, render_tree, CompilerError, Compiler, ModelManifest, RecordingEmitter,
    TreeWriter, MANIFEST_FILE_NAME,
};
use yang_schema::NodeId;
use yang_source::CompilerConfig;

const TYPES: &str = r#"module types {
  namespace "urn:example:types";
  prefix t;
  revision 2024-03-01;

  typedef percent {
    type uint8;
  }

  grouping counters {
    leaf in-octets { type uint64; }
    leaf ratio { type percent; }
  }
}
"#;

const APP: &str = r#"module app {
  namespace "urn:example:app";
  prefix app;
  import types { prefix t; }

  container stats {
    uses t:counters;
    leaf load { type t:percent; }
  }
}
"#;

fn write(dir: &Path, relative: &str, text: &str) {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

fn project(dir: &Path, config: &str, files: &[(&str, &str)]) -> Compiler {
    write(dir, "yang.toml", config);
    for (name, text) in files {
        write(dir, &format!("yang/{name}"), text);
    }
    Compiler::new(dir).unwrap()
}

fn root_named(compilation: &yang_db::Compilation, name: &str) -> NodeId {
    compilation
        .graph
        .roots()
        .iter()
        .copied()
        .find(|root| compilation.graph.node(*root).name == name)
        .unwrap_or_else(|| panic!("no root {name}"))
}

#[test]
fn test_compile_writes_snapshots_manifest_and_trees() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = project(
        dir.path(),
        "[compiler]\nmodel_id = \"org.example.types\"\n",
        &[("types.yang", TYPES)],
    );
    let mut writer = TreeWriter::new(compiler.code_gen_dir());
    let summary = compiler.compile(&mut writer).unwrap();

    assert_eq!(summary.modules, 1);
    assert_eq!(summary.manifest, dir.path().join("target/metadata").join(MANIFEST_FILE_NAME));

    let manifest = ModelManifest::load(&summary.manifest).unwrap();
    assert_eq!(manifest.model_id, "org.example.types");
    assert_eq!(manifest.modules.len(), 1);
    let entry = &manifest.modules[0];
    assert_eq!(entry.name, "types");
    assert_eq!(entry.revision.as_deref(), Some("2024-03-01"));
    assert_eq!(entry.source, PathBuf::from("yang/types.yang"));
    assert_eq!(entry.blob, PathBuf::from("types@2024-03-01.ysnp"));

    let snapshot = read_snapshot(&dir.path().join("target/metadata").join(&entry.blob)).unwrap();
    assert_eq!(snapshot.name, "types");
    assert!(snapshot.nodes.len() >= 3);

    assert_eq!(writer.written(), &[dir.path().join("target/generated/types.tree")]);
    let tree = std::fs::read_to_string(&writer.written()[0]).unwrap();
    assert_eq!(tree, "module: types\n");
}

#[test]
fn test_dependent_compilation_links_against_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let types = project(
        &dir.path().join("types"),
        "[compiler]\nmodel_id = \"org.example.types\"\n",
        &[("types.yang", TYPES)],
    );
    types.compile(&mut RecordingEmitter::default()).unwrap();

    let app = project(
        &dir.path().join("app"),
        "[dependencies]\ntypes = { path = \"../types\" }\n",
        &[("app.yang", APP)],
    );
    let compilation = app.check().unwrap();
    assert_eq!(compilation.dependencies.len(), 1);
    assert_eq!(compilation.sources.len(), 1);

    let dep = root_named(&compilation, "types");
    assert!(!compilation.graph.node(dep).module_info().unwrap().to_translate);

    let root = root_named(&compilation, "app");
    expect![[r#"
        module: app
          container stats
            leaf load: t:percent
            leaf in-octets: uint64
            leaf ratio: percent
    "#]]
    .assert_eq(&render_tree(&compilation.graph, root));

    let mut emitter = RecordingEmitter::default();
    app.compile(&mut emitter).unwrap();
    assert_eq!(emitter.modules, vec!["app"]);
}

#[test]
fn test_manifest_dependency_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let types = project(
        &dir.path().join("types"),
        "[compiler]\nmetadata_gen_dir = \"meta\"\n",
        &[("types.yang", TYPES)],
    );
    types.compile(&mut RecordingEmitter::default()).unwrap();

    let app = project(
        &dir.path().join("app"),
        "[dependencies]\ntypes = \"../types/meta/yang-model.toml\"\n",
        &[("app.yang", APP)],
    );
    assert!(app.check().is_ok());
}

#[test]
fn test_missing_dependency_fails_the_import() {
    let dir = tempfile::tempdir().unwrap();
    let app = project(dir.path(), "", &[("app.yang", APP)]);
    let CompilerError::Diagnostics { count, diagnostics } = app.check().unwrap_err() else {
        panic!("expected diagnostics");
    };
    assert_eq!(count, diagnostics.len());
    assert!(diagnostics[0].to_string().contains("Unable to find module \"types\""));
}

#[test]
fn test_parse_errors_are_aggregated_and_nothing_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let compiler = project(
        dir.path(),
        "",
        &[
            ("a.yang", "module a { namespace \"urn:a\"; prefix a; contianer c { } }"),
            (
                "b.yang",
                "module b {\n  namespace \"urn:b\";\n  prefix b;\n  leaf x { type string; }\n  leaf-list x { type string; }\n}\n",
            ),
            ("c.yang", "module c { namespace \"urn:c\"; prefix c; }"),
        ],
    );

    let err = compiler.compile(&mut RecordingEmitter::default()).unwrap_err();
    let CompilerError::Diagnostics { count, diagnostics } = err else {
        panic!("expected diagnostics");
    };
    assert_eq!(count, 2);
    assert!(diagnostics[1].to_string().contains("line: 5"));
    assert!(!compiler.metadata_dir().exists());
}

#[test]
fn test_project_without_sources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("yang")).unwrap();
    let compiler = Compiler::with_config(dir.path(), CompilerConfig::default());
    assert!(matches!(compiler.check(), Err(CompilerError::NoSources(_))));
}

#[test]
fn test_missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(Compiler::new(dir.path()), Err(CompilerError::Source(_))));
}

#[test]
fn test_emission_follows_imports() {
    let dir = tempfile::tempdir().unwrap();
    // "app" sorts before "types" on disk
    let compiler = project(dir.path(), "", &[("app.yang", APP), ("types.yang", TYPES)]);
    let mut emitter = RecordingEmitter::default();
    let summary = compiler.compile(&mut emitter).unwrap();
    assert_eq!(emitter.modules, vec!["types", "app"]);
    assert!(summary.report.passes >= 1);

    let manifest = ModelManifest::load(&summary.manifest).unwrap();
    let names: Vec<&str> = manifest.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["types", "app"]);
}
