//! Rule table for ES5 JavaScript syntax.
//!
//! Covers statement and expression kinds, their logical-line and
//! decision-point contributions, Halstead symbol identities, and CommonJS /
//! AMD dependency extraction including `require.config` path aliases.

use once_cell::sync::Lazy;

use super::{BranchCounter, Counter, PathAliases, Registry, RuleDescriptor, SymbolId, SymbolRule};
use crate::core::ast::{safe_name, Field, Node, NodeKind};
use crate::core::{Dependency, DependencyKind, DependencyPath};

static ES5: Lazy<Registry> = Lazy::new(registry);

/// Shared instance of the ES5 registry.
pub fn shared() -> &'static Registry {
    &ES5
}

/// Build a fresh ES5 registry. Prefer [`shared`] unless the table is going
/// to be customized.
pub fn registry() -> Registry {
    let mut rules = Registry::new();
    rules.insert(NodeKind::ArrayExpression, array_expression());
    rules.insert(NodeKind::AssignmentExpression, assignment_expression());
    rules.insert(NodeKind::BinaryExpression, binary_expression());
    rules.insert(NodeKind::BlockStatement, block_statement());
    rules.insert(NodeKind::BreakStatement, break_statement());
    rules.insert(NodeKind::CallExpression, call_expression());
    rules.insert(NodeKind::CatchClause, catch_clause());
    rules.insert(NodeKind::ConditionalExpression, conditional_expression());
    rules.insert(NodeKind::ContinueStatement, continue_statement());
    rules.insert(NodeKind::DebuggerStatement, RuleDescriptor::default());
    rules.insert(NodeKind::DoWhileStatement, do_while_statement());
    rules.insert(NodeKind::EmptyStatement, RuleDescriptor::default());
    rules.insert(NodeKind::ExpressionStatement, expression_statement());
    rules.insert(NodeKind::ForInStatement, for_in_statement());
    rules.insert(NodeKind::ForStatement, for_statement());
    rules.insert(NodeKind::FunctionDeclaration, function_declaration());
    rules.insert(NodeKind::FunctionExpression, function_expression());
    rules.insert(NodeKind::Identifier, identifier());
    rules.insert(NodeKind::IfStatement, if_statement());
    rules.insert(NodeKind::LabeledStatement, RuleDescriptor::default());
    rules.insert(NodeKind::Literal, literal());
    rules.insert(NodeKind::LogicalExpression, logical_expression());
    rules.insert(NodeKind::MemberExpression, member_expression());
    rules.insert(NodeKind::NewExpression, new_expression());
    rules.insert(NodeKind::ObjectExpression, object_expression());
    rules.insert(NodeKind::Property, property());
    rules.insert(NodeKind::ReturnStatement, return_statement());
    rules.insert(NodeKind::SequenceExpression, sequence_expression());
    rules.insert(NodeKind::SwitchCase, switch_case());
    rules.insert(NodeKind::SwitchStatement, switch_statement());
    rules.insert(NodeKind::ThisExpression, this_expression());
    rules.insert(NodeKind::ThrowStatement, throw_statement());
    rules.insert(NodeKind::TryStatement, try_statement());
    rules.insert(NodeKind::UnaryExpression, unary_expression());
    rules.insert(NodeKind::UpdateExpression, update_expression());
    rules.insert(NodeKind::VariableDeclaration, variable_declaration());
    rules.insert(NodeKind::VariableDeclarator, variable_declarator());
    rules.insert(NodeKind::WhileStatement, while_statement());
    rules.insert(NodeKind::WithStatement, with_statement());
    rules
}

fn array_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::text("[]")],
        operands: vec![SymbolRule::from_node(|node| safe_name(Some(node), None))],
        children: vec!["elements"],
        ..Default::default()
    }
}

fn assignment_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::from_node(operator_text)],
        children: vec!["left", "right"],
        assignable_name: Some(assignment_target_name),
        ..Default::default()
    }
}

fn binary_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::from_node(operator_text)],
        children: vec!["left", "right"],
        ..Default::default()
    }
}

fn block_statement() -> RuleDescriptor {
    RuleDescriptor {
        children: vec!["body"],
        ..Default::default()
    }
}

fn break_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("break")],
        children: vec!["label"],
        ..Default::default()
    }
}

fn call_expression() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::FromNode(immediate_function_lloc),
        operators: vec![SymbolRule::text("()")],
        children: vec!["arguments", "callee"],
        dependencies: Some(call_dependencies),
        ..Default::default()
    }
}

fn catch_clause() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        cyclomatic: BranchCounter::FromNode(|_, settings| u32::from(settings.trycatch)),
        operators: vec![SymbolRule::text("catch")],
        children: vec!["param", "body"],
        ..Default::default()
    }
}

fn conditional_expression() -> RuleDescriptor {
    RuleDescriptor {
        cyclomatic: BranchCounter::Fixed(1),
        operators: vec![SymbolRule::text(":?")],
        children: vec!["test", "consequent", "alternate"],
        ..Default::default()
    }
}

fn continue_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("continue")],
        children: vec!["label"],
        ..Default::default()
    }
}

fn do_while_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(2),
        cyclomatic: BranchCounter::FromNode(|node, _| u32::from(node.has("test"))),
        operators: vec![SymbolRule::text("dowhile")],
        children: vec!["test", "body"],
        ..Default::default()
    }
}

fn expression_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        children: vec!["expression"],
        ..Default::default()
    }
}

fn for_in_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        cyclomatic: BranchCounter::FromNode(|_, settings| u32::from(settings.forin)),
        operators: vec![SymbolRule::text("forin")],
        children: vec!["left", "right", "body"],
        ..Default::default()
    }
}

fn for_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        cyclomatic: BranchCounter::FromNode(|node, _| u32::from(node.has("test"))),
        operators: vec![SymbolRule::text("for")],
        children: vec!["init", "test", "update", "body"],
        ..Default::default()
    }
}

fn function_declaration() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("function")],
        operands: vec![SymbolRule::from_node(|node| safe_name(node.child("id"), None))],
        children: vec!["params", "body"],
        new_scope: true,
        ..Default::default()
    }
}

fn function_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::text("function")],
        operands: vec![SymbolRule::from_node(|node| safe_name(node.child("id"), None))],
        children: vec!["params", "body"],
        new_scope: true,
        ..Default::default()
    }
}

fn identifier() -> RuleDescriptor {
    RuleDescriptor {
        operands: vec![SymbolRule::from_node(|node| {
            node.text("name").unwrap_or_default().to_string()
        })],
        ..Default::default()
    }
}

fn if_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::FromNode(|node| if node.has("alternate") { 2 } else { 1 }),
        cyclomatic: BranchCounter::Fixed(1),
        operators: vec![
            SymbolRule::text("if"),
            SymbolRule::filtered("else", |node| node.has("alternate")),
        ],
        children: vec!["test", "consequent", "alternate"],
        ..Default::default()
    }
}

fn literal() -> RuleDescriptor {
    RuleDescriptor {
        operands: vec![SymbolRule::from_node(literal_operand)],
        ..Default::default()
    }
}

fn logical_expression() -> RuleDescriptor {
    RuleDescriptor {
        cyclomatic: BranchCounter::FromNode(|node, settings| {
            let operator = node.text("operator").unwrap_or_default();
            let counts = operator == "&&" || (settings.logicalor && operator == "||");
            u32::from(counts)
        }),
        operators: vec![SymbolRule::from_node(operator_text)],
        children: vec!["left", "right"],
        ..Default::default()
    }
}

fn member_expression() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::FromNode(|node| {
            let wraps_literal_object = matches!(
                node.child("object").map(|object| object.kind),
                Some(NodeKind::ObjectExpression)
                    | Some(NodeKind::ArrayExpression)
                    | Some(NodeKind::FunctionExpression)
            );
            u32::from(wraps_literal_object)
        }),
        operators: vec![SymbolRule::text(".")],
        children: vec!["object", "property"],
        ..Default::default()
    }
}

fn new_expression() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::FromNode(immediate_function_lloc),
        operators: vec![SymbolRule::text("new")],
        children: vec!["arguments", "callee"],
        ..Default::default()
    }
}

fn object_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::text("{}")],
        operands: vec![SymbolRule::from_node(|node| safe_name(Some(node), None))],
        children: vec!["properties"],
        ..Default::default()
    }
}

fn property() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text(":")],
        children: vec!["key", "value"],
        assignable_name: Some(|node| safe_name(node.child("key"), None)),
        ..Default::default()
    }
}

fn return_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("return")],
        children: vec!["argument"],
        ..Default::default()
    }
}

fn sequence_expression() -> RuleDescriptor {
    RuleDescriptor {
        children: vec!["expressions"],
        ..Default::default()
    }
}

fn switch_case() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        cyclomatic: BranchCounter::FromNode(|node, settings| {
            u32::from(settings.switchcase && node.has("test"))
        }),
        operators: vec![SymbolRule {
            identifier: SymbolId::FromNode(|node| {
                if node.has("test") { "case" } else { "default" }.to_string()
            }),
            filter: None,
        }],
        children: vec!["test", "consequent"],
        ..Default::default()
    }
}

fn switch_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("switch")],
        children: vec!["discriminant", "cases"],
        ..Default::default()
    }
}

fn this_expression() -> RuleDescriptor {
    RuleDescriptor {
        operands: vec![SymbolRule::text("this")],
        ..Default::default()
    }
}

fn throw_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("throw")],
        children: vec!["argument"],
        ..Default::default()
    }
}

fn try_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        children: vec!["block", "handler"],
        ..Default::default()
    }
}

fn unary_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::from_node(fixity_operator_text)],
        children: vec!["argument"],
        ..Default::default()
    }
}

fn update_expression() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::from_node(fixity_operator_text)],
        children: vec!["argument"],
        ..Default::default()
    }
}

fn variable_declaration() -> RuleDescriptor {
    RuleDescriptor {
        operators: vec![SymbolRule::from_node(|node| {
            node.text("kind").unwrap_or_default().to_string()
        })],
        children: vec!["declarations"],
        ..Default::default()
    }
}

fn variable_declarator() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::filtered("=", |node| node.has("init"))],
        children: vec!["id", "init"],
        assignable_name: Some(|node| safe_name(node.child("id"), None)),
        ..Default::default()
    }
}

fn while_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        cyclomatic: BranchCounter::FromNode(|node, _| u32::from(node.has("test"))),
        operators: vec![SymbolRule::text("while")],
        children: vec!["test", "body"],
        ..Default::default()
    }
}

fn with_statement() -> RuleDescriptor {
    RuleDescriptor {
        lloc: Counter::Fixed(1),
        operators: vec![SymbolRule::text("with")],
        children: vec!["object", "body"],
        ..Default::default()
    }
}

fn operator_text(node: &Node) -> String {
    node.text("operator").unwrap_or_default().to_string()
}

/// `!x` and `x++` style operators are distinguished by fixity.
fn fixity_operator_text(node: &Node) -> String {
    let operator = node.text("operator").unwrap_or_default();
    let fixity = if matches!(node.field("prefix"), Some(Field::Bool(true))) {
        "pre"
    } else {
        "post"
    };
    format!("{operator} ({fixity}fix)")
}

/// Immediately-invoked function expressions count as a logical line.
fn immediate_function_lloc(node: &Node) -> u32 {
    let immediate = node
        .child("callee")
        .is_some_and(|callee| callee.kind == NodeKind::FunctionExpression);
    u32::from(immediate)
}

fn assignment_target_name(node: &Node) -> String {
    match node.child("left") {
        Some(left) if left.kind == NodeKind::MemberExpression => {
            let object = safe_name(left.child("object"), None);
            let property = left
                .child("property")
                .and_then(|property| property.text("name"))
                .unwrap_or_default();
            format!("{object}.{property}")
        }
        Some(left) => safe_name(left.child("id"), None),
        None => safe_name(None, None),
    }
}

/// String literals are quoted so they stay distinct from identifiers of the
/// same spelling in the operand tallies.
fn literal_operand(node: &Node) -> String {
    match node.field("value") {
        Some(Field::Str(value)) => format!("\"{value}\""),
        Some(Field::Num(value)) => number_text(*value),
        Some(Field::Bool(value)) => value.to_string(),
        _ => "null".to_string(),
    }
}

fn number_text(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn literal_text(node: &Node) -> Option<String> {
    if node.kind != NodeKind::Literal {
        return None;
    }
    match node.field("value") {
        Some(Field::Str(value)) => Some(value.clone()),
        Some(Field::Num(value)) => Some(number_text(*value)),
        Some(Field::Bool(value)) => Some(value.to_string()),
        _ => None,
    }
}

/// Dependency extractor attached to call expressions. The alias table is
/// cleared exactly once per module, before the first dependency-bearing node
/// is processed.
fn call_dependencies(node: &Node, clear_aliases: bool, aliases: &mut PathAliases) -> Vec<Dependency> {
    if clear_aliases {
        aliases.clear();
    }
    let Some(callee) = node.child("callee") else {
        return Vec::new();
    };
    if callee.kind == NodeKind::Identifier && callee.text("name") == Some("require") {
        return require_dependencies(node, aliases);
    }
    if is_require_config(callee) {
        register_path_aliases(node, aliases);
    }
    Vec::new()
}

fn require_dependencies(node: &Node, aliases: &PathAliases) -> Vec<Dependency> {
    let line = node.start_line().unwrap_or(0);
    let arguments = node.list("arguments").unwrap_or_default();
    match arguments {
        [target] => vec![Dependency {
            line,
            kind: DependencyKind::CommonJs,
            path: dependency_path(target, DependencyPath::Dynamic, aliases),
        }],
        [targets, _factory] if targets.kind == NodeKind::ArrayExpression => targets
            .list("elements")
            .unwrap_or_default()
            .iter()
            .map(|target| Dependency {
                line,
                kind: DependencyKind::Amd,
                path: dependency_path(target, DependencyPath::Dynamic, aliases),
            })
            .collect(),
        [target, _factory] => vec![Dependency {
            line,
            kind: DependencyKind::Amd,
            path: dependency_path(target, DependencyPath::DynamicList, aliases),
        }],
        _ => Vec::new(),
    }
}

fn dependency_path(target: &Node, fallback: DependencyPath, aliases: &PathAliases) -> DependencyPath {
    match literal_text(target) {
        Some(path) => DependencyPath::Literal(aliases.get(&path).cloned().unwrap_or(path)),
        None => fallback,
    }
}

fn is_require_config(callee: &Node) -> bool {
    callee.kind == NodeKind::MemberExpression
        && callee.child("object").is_some_and(|object| {
            object.kind == NodeKind::Identifier && object.text("name") == Some("require")
        })
        && callee.child("property").is_some_and(|property| {
            property.kind == NodeKind::Identifier && property.text("name") == Some("config")
        })
}

/// `require.config({paths: {alias: "target"}})` registers aliases consulted
/// by later literal lookups.
fn register_path_aliases(node: &Node, aliases: &mut PathAliases) {
    let arguments = node.list("arguments").unwrap_or_default();
    let [config] = arguments else {
        return;
    };
    if config.kind != NodeKind::ObjectExpression {
        return;
    }
    for property in config.list("properties").unwrap_or_default() {
        let is_paths = property.child("key").is_some_and(|key| {
            key.kind == NodeKind::Identifier && key.text("name") == Some("paths")
        });
        let Some(value) = property.child("value") else {
            continue;
        };
        if !is_paths || value.kind != NodeKind::ObjectExpression {
            continue;
        }
        for alias in value.list("properties").unwrap_or_default() {
            let name = alias.child("key").filter(|key| key.kind == NodeKind::Identifier);
            let target = alias.child("value").filter(|value| value.kind == NodeKind::Literal);
            if let (Some(name), Some(target)) = (name, target) {
                if let (Some(name), Some(path)) = (name.text("name"), literal_text(target)) {
                    aliases.insert(name.to_string(), path);
                }
            }
        }
    }
}
