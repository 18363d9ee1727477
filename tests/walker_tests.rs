mod common;

use common::*;
use complexmap::{javascript, walk, Error, Node, NodeKind, RuleDescriptor, Span, Visitor};
use pretty_assertions::assert_eq;

/// Visitor that records traversal events as readable strings.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Visitor for Recorder {
    fn visit_node(&mut self, node: &Node, _rule: &RuleDescriptor) {
        self.events.push(format!("node {:?}", node.kind));
    }

    fn enter_scope(&mut self, name: String, _span: Option<Span>, params: usize) {
        self.events.push(format!("enter {name}/{params}"));
    }

    fn exit_scope(&mut self) {
        self.events.push("exit".to_string());
    }
}

fn record(tree: &Node) -> Vec<String> {
    let mut recorder = Recorder::default();
    walk(javascript::shared(), tree, &mut recorder).unwrap();
    recorder.events
}

#[test]
fn roots_without_a_body_sequence_are_rejected() {
    let mut recorder = Recorder::default();
    let rootless = Node::new(NodeKind::Program);
    assert!(matches!(
        walk(javascript::shared(), &rootless, &mut recorder),
        Err(Error::InvalidTree(_))
    ));

    // A body that is a single node rather than a sequence is just as bad.
    let malformed = Node::new(NodeKind::Program).with_child("body", stmt(1, string("x")));
    assert!(matches!(
        walk(javascript::shared(), &malformed, &mut recorder),
        Err(Error::InvalidTree(_))
    ));
    assert!(recorder.events.is_empty());
}

#[test]
fn unsupported_kinds_are_skipped_with_their_whole_subtree() {
    let hidden = Node::new(NodeKind::Unsupported)
        .with_child("argument", if_stmt(1, boolean(true), block(vec![]), None));
    let tree = program(2, vec![hidden, stmt(2, string("seen"))]);

    let events = record(&tree);
    assert_eq!(
        events,
        vec!["node ExpressionStatement", "node Literal"]
    );
}

#[test]
fn scopes_nest_in_source_order() {
    // function outer (a) { var inner = function () {}; }
    let inner = var_decl(
        2,
        "var",
        vec![declarator("inner", Some(function_expr(2, 2, &[], vec![])))],
    );
    let tree = program(3, vec![function_decl(1, 3, "outer", &["a"], vec![inner])]);

    let events = record(&tree);
    assert_eq!(
        events,
        vec![
            "node FunctionDeclaration",
            "enter outer/1",
            "node Identifier",
            "node BlockStatement",
            "node VariableDeclaration",
            "node VariableDeclarator",
            "node Identifier",
            "node FunctionExpression",
            "enter inner/0",
            "node BlockStatement",
            "exit",
            "exit",
        ]
    );
}

#[test]
fn functions_prefer_their_own_name_over_the_assigned_one() {
    // var renamed = function original () {};
    let named = Node::new(NodeKind::FunctionExpression)
        .with_span(1, 1)
        .with_child("id", ident("original"))
        .with_list("params", vec![])
        .with_child("body", block(vec![]));
    let tree = program(
        1,
        vec![var_decl(1, "var", vec![declarator("renamed", Some(named))])],
    );

    let events = record(&tree);
    assert!(events.contains(&"enter original/0".to_string()));
}

#[test]
fn unassigned_functions_are_anonymous() {
    let tree = program(1, vec![stmt(1, function_expr(1, 1, &["a", "b"], vec![]))]);
    let events = record(&tree);
    assert!(events.contains(&"enter <anonymous>/2".to_string()));
}

#[test]
fn assigned_names_reach_only_the_immediate_child() {
    // var foo = function () { (function () {}); };
    let nested = stmt(1, function_expr(1, 1, &[], vec![]));
    let outer = function_expr(1, 1, &[], vec![nested]);
    let tree = program(1, vec![var_decl(1, "var", vec![declarator("foo", Some(outer))])]);

    let events = record(&tree);
    let enters: Vec<&String> = events.iter().filter(|e| e.starts_with("enter")).collect();
    assert_eq!(enters, vec!["enter foo/0", "enter <anonymous>/0"]);
}

#[test]
fn child_fields_visit_in_declared_order() {
    // for (init; test; update) body — rule order, not node-map order.
    let for_stmt = Node::new(NodeKind::ForStatement)
        .with_span(1, 1)
        .with_child("body", block(vec![]))
        .with_child("update", ident("u"))
        .with_child("test", ident("t"))
        .with_child("init", ident("i"));
    let tree = program(1, vec![for_stmt]);

    let mut recorder = Recorder::default();
    walk(javascript::shared(), &tree, &mut recorder).unwrap();
    let names: Vec<&String> = recorder
        .events
        .iter()
        .filter(|e| e.contains("Identifier") || e.contains("BlockStatement"))
        .collect();
    assert_eq!(names.len(), 4);
    // init, test, update precede the body.
    assert!(recorder.events.iter().position(|e| e == "node BlockStatement").unwrap() > 3);
}
