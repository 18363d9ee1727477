//! Rule descriptors driving the tree walker.
//!
//! A `Registry` maps node kinds to `RuleDescriptor`s; the walker consults it
//! for every node and skips kinds that have no entry. Descriptors are plain
//! data plus fn pointers, so a registry is `Send + Sync` and can be shared
//! across parallel module analyses.

pub mod javascript;

use std::collections::HashMap;

use crate::config::Settings;
use crate::core::ast::{Node, NodeKind};
use crate::core::Dependency;

/// Logical-line contribution of a node.
#[derive(Debug, Clone, Copy)]
pub enum Counter {
    Fixed(u32),
    FromNode(fn(&Node) -> u32),
}

impl Counter {
    pub fn amount(&self, node: &Node) -> u32 {
        match self {
            Self::Fixed(amount) => *amount,
            Self::FromNode(amount_of) => amount_of(node),
        }
    }
}

/// Decision-point contribution of a node; may consult the settings.
#[derive(Debug, Clone, Copy)]
pub enum BranchCounter {
    Fixed(u32),
    FromNode(fn(&Node, &Settings) -> u32),
}

impl BranchCounter {
    pub fn amount(&self, node: &Node, settings: &Settings) -> u32 {
        match self {
            Self::Fixed(amount) => *amount,
            Self::FromNode(amount_of) => amount_of(node, settings),
        }
    }
}

/// How a symbol occurrence names itself in the Halstead tallies.
#[derive(Debug, Clone, Copy)]
pub enum SymbolId {
    Text(&'static str),
    FromNode(fn(&Node) -> String),
}

impl SymbolId {
    pub fn resolve(&self, node: &Node) -> String {
        match self {
            Self::Text(identifier) => (*identifier).to_string(),
            Self::FromNode(identifier_of) => identifier_of(node),
        }
    }
}

/// One operator or operand recorded by a node, with an optional guard.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRule {
    pub identifier: SymbolId,
    pub filter: Option<fn(&Node) -> bool>,
}

impl SymbolRule {
    pub fn text(identifier: &'static str) -> Self {
        Self {
            identifier: SymbolId::Text(identifier),
            filter: None,
        }
    }

    pub fn from_node(identifier_of: fn(&Node) -> String) -> Self {
        Self {
            identifier: SymbolId::FromNode(identifier_of),
            filter: None,
        }
    }

    pub fn filtered(identifier: &'static str, filter: fn(&Node) -> bool) -> Self {
        Self {
            identifier: SymbolId::Text(identifier),
            filter: Some(filter),
        }
    }

    pub fn applies(&self, node: &Node) -> bool {
        self.filter.map_or(true, |passes| passes(node))
    }
}

/// Path-alias table for AMD-style dependency resolution. Owned by the module
/// analyzer and handed to extractors by mutable reference, so alias state
/// never outlives a single module analysis.
pub type PathAliases = HashMap<String, String>;

/// Dependency extractor: receives the node, a flag that is true only before
/// the first dependency-bearing node of the module, and the module's alias
/// table.
pub type DependencyExtractor = fn(&Node, bool, &mut PathAliases) -> Vec<Dependency>;

/// Everything the walker and accumulator need to know about one node kind.
#[derive(Debug, Clone)]
pub struct RuleDescriptor {
    pub lloc: Counter,
    pub cyclomatic: BranchCounter,
    pub operators: Vec<SymbolRule>,
    pub operands: Vec<SymbolRule>,
    /// Field names recursed into, in order.
    pub children: Vec<&'static str>,
    /// Name given to anonymous functions assigned through this node.
    pub assignable_name: Option<fn(&Node) -> String>,
    pub new_scope: bool,
    pub dependencies: Option<DependencyExtractor>,
}

impl Default for RuleDescriptor {
    fn default() -> Self {
        Self {
            lloc: Counter::Fixed(0),
            cyclomatic: BranchCounter::Fixed(0),
            operators: Vec::new(),
            operands: Vec::new(),
            children: Vec::new(),
            assignable_name: None,
            new_scope: false,
            dependencies: None,
        }
    }
}

/// Rule table consulted by the walker. Kinds without an entry are skipped
/// together with their entire subtree.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: HashMap<NodeKind, RuleDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: NodeKind, rule: RuleDescriptor) {
        self.rules.insert(kind, rule);
    }

    pub fn get(&self, kind: NodeKind) -> Option<&RuleDescriptor> {
        self.rules.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
