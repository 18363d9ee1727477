//! Hand-built syntax-tree fixtures shared by the integration tests.
//!
//! Builders mirror the shape an ES5 parser would emit: statements carry the
//! line they start on, expressions only carry fields the rules consult.

#![allow(dead_code)]

use complexmap::{Node, NodeKind};

/// Initialize test logging once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn program(end_line: usize, body: Vec<Node>) -> Node {
    Node::new(NodeKind::Program)
        .with_span(1, end_line)
        .with_list("body", body)
}

pub fn unlocated_program(body: Vec<Node>) -> Node {
    Node::new(NodeKind::Program).with_list("body", body)
}

pub fn stmt(line: usize, expression: Node) -> Node {
    Node::new(NodeKind::ExpressionStatement)
        .with_span(line, line)
        .with_child("expression", expression)
}

pub fn ident(name: &str) -> Node {
    Node::new(NodeKind::Identifier).with_str("name", name)
}

pub fn string(value: &str) -> Node {
    Node::new(NodeKind::Literal).with_str("value", value)
}

pub fn number(value: f64) -> Node {
    Node::new(NodeKind::Literal).with_num("value", value)
}

pub fn boolean(value: bool) -> Node {
    Node::new(NodeKind::Literal).with_bool("value", value)
}

pub fn block(body: Vec<Node>) -> Node {
    Node::new(NodeKind::BlockStatement).with_list("body", body)
}

pub fn call(line: usize, callee: Node, arguments: Vec<Node>) -> Node {
    Node::new(NodeKind::CallExpression)
        .with_span(line, line)
        .with_child("callee", callee)
        .with_list("arguments", arguments)
}

pub fn require(line: usize, path: &str) -> Node {
    call(line, ident("require"), vec![string(path)])
}

pub fn require_stmt(line: usize, path: &str) -> Node {
    stmt(line, require(line, path))
}

pub fn function_decl(line: usize, end: usize, name: &str, params: &[&str], body: Vec<Node>) -> Node {
    Node::new(NodeKind::FunctionDeclaration)
        .with_span(line, end)
        .with_child("id", ident(name))
        .with_list("params", params.iter().map(|p| ident(p)).collect())
        .with_child("body", block(body))
}

pub fn function_expr(line: usize, end: usize, params: &[&str], body: Vec<Node>) -> Node {
    Node::new(NodeKind::FunctionExpression)
        .with_span(line, end)
        .with_list("params", params.iter().map(|p| ident(p)).collect())
        .with_child("body", block(body))
}

pub fn if_stmt(line: usize, test: Node, consequent: Node, alternate: Option<Node>) -> Node {
    let node = Node::new(NodeKind::IfStatement)
        .with_span(line, line)
        .with_child("test", test)
        .with_child("consequent", consequent);
    match alternate {
        Some(alternate) => node.with_child("alternate", alternate),
        None => node,
    }
}

pub fn while_stmt(line: usize, test: Node, body: Node) -> Node {
    Node::new(NodeKind::WhileStatement)
        .with_span(line, line)
        .with_child("test", test)
        .with_child("body", body)
}

pub fn binary(operator: &str, left: Node, right: Node) -> Node {
    Node::new(NodeKind::BinaryExpression)
        .with_str("operator", operator)
        .with_child("left", left)
        .with_child("right", right)
}

pub fn logical(operator: &str, left: Node, right: Node) -> Node {
    Node::new(NodeKind::LogicalExpression)
        .with_str("operator", operator)
        .with_child("left", left)
        .with_child("right", right)
}

pub fn assignment(left: Node, right: Node) -> Node {
    Node::new(NodeKind::AssignmentExpression)
        .with_str("operator", "=")
        .with_child("left", left)
        .with_child("right", right)
}

pub fn member(object: Node, property: Node) -> Node {
    Node::new(NodeKind::MemberExpression)
        .with_child("object", object)
        .with_child("property", property)
}

pub fn var_decl(line: usize, kind: &str, declarators: Vec<Node>) -> Node {
    Node::new(NodeKind::VariableDeclaration)
        .with_span(line, line)
        .with_str("kind", kind)
        .with_list("declarations", declarators)
}

pub fn declarator(name: &str, init: Option<Node>) -> Node {
    let node = Node::new(NodeKind::VariableDeclarator).with_child("id", ident(name));
    match init {
        Some(init) => node.with_child("init", init),
        None => node,
    }
}

pub fn object(properties: Vec<Node>) -> Node {
    Node::new(NodeKind::ObjectExpression).with_list("properties", properties)
}

pub fn property(key: Node, value: Node) -> Node {
    Node::new(NodeKind::Property)
        .with_child("key", key)
        .with_child("value", value)
}

pub fn array(elements: Vec<Node>) -> Node {
    Node::new(NodeKind::ArrayExpression).with_list("elements", elements)
}

pub fn switch_stmt(line: usize, discriminant: Node, cases: Vec<Node>) -> Node {
    Node::new(NodeKind::SwitchStatement)
        .with_span(line, line)
        .with_child("discriminant", discriminant)
        .with_list("cases", cases)
}

pub fn switch_case(test: Option<Node>, consequent: Vec<Node>) -> Node {
    let node = Node::new(NodeKind::SwitchCase).with_list("consequent", consequent);
    match test {
        Some(test) => node.with_child("test", test),
        None => node,
    }
}

pub fn break_stmt(line: usize) -> Node {
    Node::new(NodeKind::BreakStatement).with_span(line, line)
}

pub fn return_stmt(line: usize, argument: Option<Node>) -> Node {
    let node = Node::new(NodeKind::ReturnStatement).with_span(line, line);
    match argument {
        Some(argument) => node.with_child("argument", argument),
        None => node,
    }
}

pub fn try_stmt(line: usize, body: Node, handler: Node) -> Node {
    Node::new(NodeKind::TryStatement)
        .with_span(line, line)
        .with_child("block", body)
        .with_child("handler", handler)
}

pub fn catch_clause(param: &str, body: Node) -> Node {
    Node::new(NodeKind::CatchClause)
        .with_child("param", ident(param))
        .with_child("body", body)
}

pub fn for_in_stmt(line: usize, left: Node, right: Node, body: Node) -> Node {
    Node::new(NodeKind::ForInStatement)
        .with_span(line, line)
        .with_child("left", left)
        .with_child("right", right)
        .with_child("body", body)
}
