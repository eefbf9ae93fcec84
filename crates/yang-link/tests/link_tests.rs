use expect_test::expect;
use yang_link::{
    emission_order, link, FilePhase, LinkError, LinkMode, Linker, ReferenceKind, Resolvable, Site,
};
use yang_parse::parse_str;
use yang_schema::{
    DataModelError, LeafId, NodeId, NodeKind, ResolvableStatus, SchemaGraph, SchemaNodeIdentifier,
    SchemaRef, TypeBody,
};

fn child(graph: &SchemaGraph, holder: NodeId, name: &str) -> NodeId {
    graph
        .children(holder)
        .find(|c| graph.node(*c).name == name)
        .unwrap_or_else(|| panic!("no child {name}"))
}

fn leaf(graph: &SchemaGraph, holder: NodeId, name: &str) -> LeafId {
    graph
        .all_leaves(holder)
        .find(|l| graph.leaf(*l).name == name)
        .unwrap_or_else(|| panic!("no leaf {name}"))
}

fn outline(graph: &SchemaGraph, id: NodeId, depth: usize, out: &mut String) {
    let node = graph.node(id);
    out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), node.construct(), node.name));
    for leaf in graph.all_leaves(id) {
        let leaf = graph.leaf(leaf);
        out.push_str(&format!(
            "{}{} {}: {}\n",
            "  ".repeat(depth + 1),
            leaf.construct(),
            leaf.name,
            leaf.ty.name
        ));
    }
    for child in graph.children(id) {
        outline(graph, child, depth + 1, out);
    }
}

fn uses_status(graph: &SchemaGraph, id: NodeId) -> ResolvableStatus {
    graph.node(id).uses_info().unwrap().status
}

fn typedef_status(graph: &SchemaGraph, id: NodeId) -> ResolvableStatus {
    graph.node(id).typedef_info().unwrap().ty.status
}

fn link_err(files: &[(&str, &str)]) -> Vec<LinkError> {
    let mut graph = SchemaGraph::new();
    for (path, text) in files {
        parse_str(&mut graph, path, text).unwrap();
    }
    link(&mut graph).unwrap_err()
}

#[test]
fn test_uses_clones_grouping_leaf_into_holder() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  grouping g1 { leaf x { type string; } }
  container c { uses g1; }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let c = child(&graph, m, "c");
    let x = leaf(&graph, c, "x");
    assert_eq!(graph.leaf(x).contained_in, c);
    assert_eq!(graph.leaf(x).namespace.as_deref(), Some("urn:m"));
    assert_eq!(uses_status(&graph, child(&graph, c, "g1")), ResolvableStatus::Resolved);

    let entry = graph.node(c).child_schemas.get(&SchemaNodeIdentifier::new("x", Some("urn:m".into())));
    assert_eq!(entry.map(|e| e.schema), Some(SchemaRef::Leaf(x)));

    // the grouping's own leaf stays a template
    let g1 = child(&graph, m, "g1");
    assert_eq!(graph.leaf(leaf(&graph, g1, "x")).namespace, None);
}

#[test]
fn test_nested_uses_expand_inner_first() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  grouping address { leaf ip { type string; } leaf port { type uint16; } }
  grouping endpoint {
    container local { uses address; }
    leaf name { type string; }
  }
  container server { uses endpoint; container extra; }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let mut out = String::new();
    outline(&graph, child(&graph, m, "server"), 0, &mut out);
    expect![[r#"
        container server
          leaf name: string
          uses endpoint
          container extra
          container local
            leaf ip: string
            leaf port: uint16
    "#]]
    .assert_eq(&out);
}

#[test]
fn test_cross_module_typedef_waits_for_dependency() {
    let mut graph = SchemaGraph::new();
    let mut linker = Linker::new(&mut graph);

    let a = parse_str(
        linker.graph_mut(),
        "a.yang",
        r#"module a {
  namespace "urn:a";
  prefix a;
  import b { prefix b; }
  typedef t { type b:sometype; }
  leaf l { type t; }
}"#,
    )
    .unwrap();
    linker.resolve_self_file_linking(a).unwrap();
    assert_eq!(linker.phase(a), Some(FilePhase::SelfLinked));
    let t = child(linker.graph(), a, "t");
    let l = leaf(linker.graph(), a, "l");
    assert_eq!(typedef_status(linker.graph(), t), ResolvableStatus::Unresolved);
    assert_eq!(linker.graph().leaf(l).ty.typedef, Some(t));
    assert_eq!(linker.graph().leaf(l).ty.status, ResolvableStatus::IntraFileResolved);

    let b = parse_str(
        linker.graph_mut(),
        "b.yang",
        r#"module b {
  namespace "urn:b";
  prefix b;
  typedef sometype { type string; }
}"#,
    )
    .unwrap();
    linker.resolve_self_file_linking(b).unwrap();
    let report = linker.resolve_dependencies().unwrap();
    assert!(report.resolved >= 2);

    let graph = linker.graph();
    assert_eq!(typedef_status(graph, t), ResolvableStatus::Resolved);
    assert_eq!(
        graph.node(t).typedef_info().unwrap().ty.typedef,
        Some(child(graph, b, "sometype"))
    );
    assert_eq!(graph.leaf(l).ty.status, ResolvableStatus::Resolved);
    assert_eq!(linker.phase(a), Some(FilePhase::CrossLinked));
}

#[test]
fn test_resolving_resolved_sites_changes_nothing() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  typedef counter { type uint32; }
  grouping stats { leaf hits { type counter; } }
  container c { uses stats; leaf total { type counter; } }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();
    let linked = graph.clone();

    let c = child(&graph, m, "c");
    let mut sites = vec![
        Site::Uses(child(&graph, c, "stats")),
        Site::TypedefType(child(&graph, m, "counter")),
    ];
    sites.extend(graph.all_leaves(c).map(Site::LeafType));
    for site in sites {
        assert!(site.status(&graph).is_resolved(), "{site:?}");
        assert!(!site.resolve(&mut graph, LinkMode::CrossFile).unwrap());
    }
    assert_eq!(graph, linked);
}

#[test]
fn test_acyclic_chain_terminates_within_file_count() {
    let files = [
        (
            "c.yang",
            r#"module c { namespace "urn:c"; prefix c; import b { prefix b; }
  typedef tc { type b:tb; }
  leaf value { type tc; } }"#,
        ),
        (
            "b.yang",
            r#"module b { namespace "urn:b"; prefix b; import a { prefix a; }
  typedef tb { type a:ta; } }"#,
        ),
        (
            "a.yang",
            r#"module a { namespace "urn:a"; prefix a;
  typedef ta { type int64; } }"#,
        ),
    ];
    let mut graph = SchemaGraph::new();
    let roots: Vec<_> = files
        .iter()
        .map(|(path, text)| parse_str(&mut graph, path, text).unwrap())
        .collect();
    let report = link(&mut graph).unwrap();
    assert!(report.passes <= files.len(), "{report:?}");

    let value = leaf(&graph, roots[0], "value");
    assert!(graph.leaf(value).ty.status.is_resolved());
}

#[test]
fn test_copies_keep_declaration_scope() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  typedef t { type int32; }
  grouping g {
    typedef local { type string; }
    leaf a { type local; }
    container inner { leaf b { type t; mandatory true; } }
  }
  container c1 {
    typedef local { type int8; }
    uses g;
  }
}"#,
    )
    .unwrap();
    let before = graph.clone();
    let mut linker = Linker::new(&mut graph);
    linker.resolve_self_file_linking(m).unwrap();
    let graph = linker.graph();

    let g = child(graph, m, "g");
    let c1 = child(graph, m, "c1");
    let original = leaf(graph, g, "a");
    let copy = leaf(graph, c1, "a");
    assert_eq!(graph.leaf(copy).ty.typedef, Some(child(graph, g, "local")));
    assert_eq!(
        yang_schema::Leaf {
            contained_in: g,
            ..graph.leaf(copy).clone()
        },
        *graph.leaf(original)
    );

    let inner = child(graph, g, "inner");
    let inner_copy = child(graph, c1, "inner");
    assert_ne!(inner, inner_copy);
    assert_eq!(graph.node(inner_copy).parent, Some(c1));
    let b = graph.leaf(leaf(graph, inner_copy, "b"));
    assert_eq!(b.contained_in, inner_copy);
    assert_eq!(b.ty.typedef, Some(child(graph, m, "t")));
    assert!(b.mandatory);

    // neither the grouping nor its nodes were touched by expansion
    for id in std::iter::once(g).chain(before.walk(g)) {
        assert_eq!(graph.node(id), before.node(id));
    }
    // nested definitions are not instantiated
    assert_eq!(graph.children(c1).filter(|id| graph.node(*id).name == "local").count(), 1);
}

#[test]
fn test_self_using_grouping_is_a_cycle() {
    let errors = link_err(&[(
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  grouping G { uses G; }
  container c { uses G; }
}"#,
    )]);
    assert_eq!(errors.len(), 2);
    for err in &errors {
        assert!(matches!(err, LinkError::GroupingCycle { name, .. } if name == "G"), "{err:?}");
    }
    assert_eq!(
        errors[0].to_string(),
        "YANG file error: Grouping \"G\" is used within its own expansion in file: m.yang at line: 4 at position: 15"
    );
}

#[test]
fn test_mutually_recursive_groupings_are_a_cycle() {
    let errors = link_err(&[(
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  grouping a { container x { uses b; } }
  grouping b { leaf y { type string; } uses a; }
}"#,
    )]);
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|err| matches!(err, LinkError::GroupingCycle { .. })));
}

#[test]
fn test_rpc_input_output_stay_nested() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  rpc reset {
    input { leaf delay { type uint32; mandatory true; } leaf mode { type string; default "soft"; } }
    output { leaf status { type string; } }
  }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let rpc = child(&graph, m, "reset");
    let input = child(&graph, rpc, "input");
    let output = child(&graph, rpc, "output");
    assert_eq!(graph.node(input).parent, Some(rpc));
    assert_eq!(graph.node(output).parent, Some(rpc));

    let schemas = &graph.node(rpc).child_schemas;
    assert_eq!(schemas.mandatory_count, 0);
    assert!(schemas.defaults.is_empty());
    let keys: Vec<_> = schemas.map.keys().map(|k| k.name.as_str()).collect();
    assert_eq!(keys, vec!["input", "output"]);

    let input_schemas = &graph.node(input).child_schemas;
    assert_eq!(input_schemas.mandatory_count, 1);
    assert_eq!(input_schemas.defaults.len(), 1);
}

#[test]
fn test_choice_children_are_recorded_in_the_enclosing_holder() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  container transport {
    choice protocol {
      mandatory true;
      case tcp { leaf port { type uint16; } }
      case udp { container udp-options { leaf checksum { type boolean; } } }
    }
  }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let transport = child(&graph, m, "transport");
    let schemas = &graph.node(transport).child_schemas;
    let keys: Vec<_> = schemas.map.keys().map(|k| k.name.as_str()).collect();
    assert_eq!(keys, vec!["port", "udp-options"]);
    assert_eq!(schemas.mandatory_count, 1);
    let tcp = child(&graph, child(&graph, transport, "protocol"), "tcp");
    let port = schemas.map.get(&SchemaNodeIdentifier::new("port", Some("urn:m".into()))).unwrap();
    assert_eq!(port.parent, tcp);
}

#[test]
fn test_augment_binds_across_modules() {
    let mut graph = SchemaGraph::new();
    let a = parse_str(
        &mut graph,
        "a.yang",
        r#"module a {
  namespace "urn:a";
  prefix a;
  container interfaces { list interface { key name; leaf name { type string; } } }
}"#,
    )
    .unwrap();
    let b = parse_str(
        &mut graph,
        "b.yang",
        r#"module b {
  namespace "urn:b";
  prefix b;
  import a { prefix a; }
  augment "/a:interfaces/a:interface" { leaf mtu { type uint16; } }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let interface = child(&graph, child(&graph, a, "interfaces"), "interface");
    let augment = graph.children(b).find(|id| matches!(graph.node(*id).kind, NodeKind::Augment(_))).unwrap();
    match &graph.node(augment).kind {
        NodeKind::Augment(info) => {
            assert_eq!(info.target, Some(interface));
            assert_eq!(info.status, ResolvableStatus::Resolved);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(graph.node(interface).augmented_by, vec![augment]);

    let mtu = leaf(&graph, augment, "mtu");
    let key = SchemaNodeIdentifier::new("mtu", Some("urn:b".into()));
    let entry = graph.node(interface).child_schemas.get(&key).unwrap();
    assert_eq!(entry.schema, SchemaRef::Leaf(mtu));
    assert_eq!(entry.parent, augment);
}

#[test]
fn test_augment_collision_is_reported() {
    let errors = link_err(&[(
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  container system { leaf hostname { type string; } }
  augment "/system" { leaf hostname { type string; } }
}"#,
    )]);
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        LinkError::DataModel(DataModelError::DuplicateIdentifier { name, location, .. }) => {
            assert_eq!(name, "hostname");
            assert_eq!(location.line, 5);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_augment_collides_with_content_of_nested_uses() {
    let errors = link_err(&[
        (
            "c.yang",
            r#"module c {
  namespace "urn:c";
  prefix c;
  grouping h { leaf x { type string; } }
}"#,
        ),
        (
            "b.yang",
            r#"module b {
  namespace "urn:b";
  prefix b;
  import c { prefix c; }
  container top { uses g; }
  grouping g { uses c:h; }
}"#,
        ),
        (
            "a.yang",
            r#"module a {
  namespace "urn:a";
  prefix a;
  import b { prefix b; }
  augment "/b:top" { leaf x { type string; } }
}"#,
        ),
    ]);
    assert_eq!(errors.len(), 1, "{errors:?}");
    match &errors[0] {
        LinkError::DataModel(DataModelError::DuplicateIdentifier { name, .. }) => {
            assert_eq!(name, "x");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_relative_augment_path_is_invalid() {
    let errors = link_err(&[(
        "m.yang",
        r#"module m { namespace "urn:m"; prefix m;
  container system { }
  augment "system" { leaf extra { type string; } } }"#,
    )]);
    assert!(matches!(&errors[..], [LinkError::InvalidPath { .. }]));
}

#[test]
fn test_leafref_paths_bind_to_leaves() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  container interfaces {
    list interface { key name; leaf name { type string; } leaf mtu { type uint16; } }
  }
  container pick {
    leaf ifname { type leafref { path "/m:interfaces/m:interface/m:name"; } }
    leaf same { type leafref { path "../ifname"; } }
    leaf mtu { type leafref { path "/interfaces/interface[name = current()/../ifname]/mtu"; } }
  }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let interface = child(&graph, child(&graph, m, "interfaces"), "interface");
    let pick = child(&graph, m, "pick");
    let target = |name: &str| match &graph.leaf(leaf(&graph, pick, name)).ty.body {
        TypeBody::Leafref { target, status, .. } => {
            assert_eq!(*status, ResolvableStatus::Resolved);
            *target
        }
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(target("ifname"), Some(leaf(&graph, interface, "name")));
    assert_eq!(target("same"), Some(leaf(&graph, pick, "ifname")));
    assert_eq!(target("mtu"), Some(leaf(&graph, interface, "mtu")));
}

#[test]
fn test_leafref_in_imported_grouping_uses_declaring_prefixes() {
    let mut graph = SchemaGraph::new();
    let b = parse_str(
        &mut graph,
        "b.yang",
        r#"module b {
  namespace "urn:b";
  prefix b;
  container top { leaf id { type string; } }
  grouping g { leaf ref { type leafref { path "/b:top/b:id"; } } }
}"#,
    )
    .unwrap();
    let a = parse_str(
        &mut graph,
        "a.yang",
        r#"module a {
  namespace "urn:a";
  prefix a;
  import b { prefix bb; }
  container c { uses bb:g; }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let id = leaf(&graph, child(&graph, b, "top"), "id");
    let copy = leaf(&graph, child(&graph, a, "c"), "ref");
    match &graph.leaf(copy).ty.body {
        TypeBody::Leafref { target, status, .. } => {
            assert_eq!(*status, ResolvableStatus::Resolved);
            assert_eq!(*target, Some(id));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_missing_references_are_aggregated() {
    let errors = link_err(&[(
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  leaf speed { type bandwidth; }
  container c { uses missing; }
  leaf peer { type leafref { path "../nowhere"; } }
}"#,
    )]);
    let kinds: Vec<_> = errors
        .iter()
        .map(|err| match err {
            LinkError::ReferenceNotFound { kind, .. } => *kind,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![ReferenceKind::Typedef, ReferenceKind::Grouping, ReferenceKind::LeafrefTarget]
    );
    assert_eq!(
        errors[0].to_string(),
        "YANG file error: Unable to find typedef \"bandwidth\" in file: m.yang at line: 4 at position: 15"
    );
}

#[test]
fn test_unknown_import_is_reported() {
    let errors = link_err(&[(
        "m.yang",
        r#"module m { namespace "urn:m"; prefix m; import nope { prefix n; } }"#,
    )]);
    assert!(matches!(
        &errors[..],
        [LinkError::ReferenceNotFound { kind: ReferenceKind::Module, name, .. }] if name == "nope"
    ));
}

#[test]
fn test_submodule_shares_module_namespace() {
    let mut graph = SchemaGraph::new();
    let m = parse_str(
        &mut graph,
        "m.yang",
        r#"module m {
  namespace "urn:m";
  prefix m;
  include s;
  container c { uses sg; }
}"#,
    )
    .unwrap();
    let s = parse_str(
        &mut graph,
        "s.yang",
        r#"submodule s {
  belongs-to m { prefix m; }
  grouping sg { leaf y { type m:label; } }
  typedef label { type string; }
  container sc { leaf z { type string; } }
}"#,
    )
    .unwrap();
    link(&mut graph).unwrap();

    let c = child(&graph, m, "c");
    let y = graph.leaf(leaf(&graph, c, "y"));
    assert_eq!(y.ty.typedef, Some(child(&graph, s, "label")));
    let sc = child(&graph, s, "sc");
    assert_eq!(graph.node(sc).namespace.as_deref(), Some("urn:m"));
    assert_eq!(emission_order(&graph), vec![s, m]);
}

#[test]
fn test_emission_order_follows_imports() {
    let mut graph = SchemaGraph::new();
    let app = parse_str(
        &mut graph,
        "app.yang",
        r#"module app { namespace "urn:app"; prefix app; import base { prefix b; }
  leaf id { type b:ident; } }"#,
    )
    .unwrap();
    let base = parse_str(
        &mut graph,
        "base.yang",
        r#"module base { namespace "urn:base"; prefix b; typedef ident { type string; } }"#,
    )
    .unwrap();
    link(&mut graph).unwrap();
    assert_eq!(emission_order(&graph), vec![base, app]);
}
