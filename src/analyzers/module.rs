//! Per-module metric accumulation.
//!
//! One walker pass feeds every counter: logical lines, cyclomatic
//! complexity and Halstead symbols land on the innermost active function
//! scope and on the module aggregate; dependency records land on the module.

use log::debug;

use crate::config::Settings;
use crate::core::ast::{Node, Span};
use crate::core::errors::Result;
use crate::core::{Dependency, ModuleReport, ScopeReport};
use crate::metrics::maintainability::maintainability_index;
use crate::rules::{PathAliases, Registry, RuleDescriptor};
use crate::walker::{self, Visitor};

/// Analyze a single module syntax tree.
pub fn analyze(tree: &Node, registry: &Registry, settings: &Settings) -> Result<ModuleReport> {
    let mut analyzer = ModuleAnalyzer::new(tree, settings);
    walker::walk(registry, tree, &mut analyzer)?;
    analyzer.finish()
}

struct ModuleAnalyzer<'a> {
    settings: &'a Settings,
    aggregate: ScopeReport,
    functions: Vec<ScopeReport>,
    dependencies: Vec<Dependency>,
    /// Indices into `functions`; the last entry is the active scope. Empty
    /// at module level, where contributions land only on the aggregate.
    scope_stack: Vec<usize>,
    aliases: PathAliases,
    clear_aliases: bool,
}

impl<'a> ModuleAnalyzer<'a> {
    fn new(tree: &Node, settings: &'a Settings) -> Self {
        Self {
            settings,
            aggregate: ScopeReport::new(None, tree.span, 0),
            functions: Vec::new(),
            dependencies: Vec::new(),
            scope_stack: Vec::new(),
            aliases: PathAliases::new(),
            clear_aliases: true,
        }
    }

    fn add_lloc(&mut self, amount: u32) {
        self.aggregate.sloc.logical += amount;
        if let Some(&active) = self.scope_stack.last() {
            self.functions[active].sloc.logical += amount;
        }
    }

    fn add_cyclomatic(&mut self, amount: u32) {
        self.aggregate.cyclomatic += amount;
        if let Some(&active) = self.scope_stack.last() {
            self.functions[active].cyclomatic += amount;
        }
    }

    fn record_operator(&mut self, identifier: String) {
        if let Some(&active) = self.scope_stack.last() {
            self.functions[active].halstead.operators.record(identifier.clone());
        }
        self.aggregate.halstead.operators.record(identifier);
    }

    fn record_operand(&mut self, identifier: String) {
        if let Some(&active) = self.scope_stack.last() {
            self.functions[active].halstead.operands.record(identifier.clone());
        }
        self.aggregate.halstead.operands.record(identifier);
    }

    fn finish(mut self) -> Result<ModuleReport> {
        let mut sums = MetricSums::default();
        for function in &mut self.functions {
            function.finish();
        }
        self.aggregate.finish();
        for function in &self.functions {
            sums.add(function);
        }
        let mut count = self.functions.len();
        if count == 0 {
            // Modules without any function scope are averaged over the
            // aggregate itself so the means stay meaningful.
            sums.add(&self.aggregate);
            count = 1;
        }
        let loc = sums.loc / count as f64;
        let cyclomatic = sums.cyclomatic / count as f64;
        let effort = sums.effort / count as f64;
        let params = sums.params / count as f64;
        let maintainability = maintainability_index(effort, cyclomatic, loc, self.settings.newmi)?;
        debug!(
            "module analyzed: {} function scope(s), {} dependencies, maintainability {maintainability:.2}",
            self.functions.len(),
            self.dependencies.len(),
        );
        Ok(ModuleReport {
            path: String::new(),
            aggregate: self.aggregate,
            functions: self.functions,
            dependencies: self.dependencies,
            maintainability,
            loc,
            cyclomatic,
            effort,
            params,
        })
    }
}

impl Visitor for ModuleAnalyzer<'_> {
    fn visit_node(&mut self, node: &Node, rule: &RuleDescriptor) {
        self.add_lloc(rule.lloc.amount(node));
        self.add_cyclomatic(rule.cyclomatic.amount(node, self.settings));
        for symbol in &rule.operators {
            if symbol.applies(node) {
                self.record_operator(symbol.identifier.resolve(node));
            }
        }
        for symbol in &rule.operands {
            if symbol.applies(node) {
                self.record_operand(symbol.identifier.resolve(node));
            }
        }
        if let Some(extract) = rule.dependencies {
            let found = extract(node, self.clear_aliases, &mut self.aliases);
            self.clear_aliases = false;
            self.dependencies.extend(found);
        }
    }

    fn enter_scope(&mut self, name: String, span: Option<Span>, params: usize) {
        self.aggregate.params += params;
        self.functions.push(ScopeReport::new(Some(name), span, params));
        self.scope_stack.push(self.functions.len() - 1);
    }

    fn exit_scope(&mut self) {
        self.scope_stack.pop();
    }
}

#[derive(Default)]
struct MetricSums {
    loc: f64,
    cyclomatic: f64,
    effort: f64,
    params: f64,
}

impl MetricSums {
    fn add(&mut self, scope: &ScopeReport) {
        self.loc += f64::from(scope.sloc.logical);
        self.cyclomatic += f64::from(scope.cyclomatic);
        self.effort += scope.halstead.effort;
        self.params += scope.params as f64;
    }
}
