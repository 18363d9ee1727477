//! Common report types produced by the analyzers.

pub mod ast;
pub mod errors;

use serde::{Deserialize, Serialize};

use crate::metrics::halstead::HalsteadReport;
use self::ast::Span;

/// Sentinel path for a dependency whose target expression is not a literal.
pub const DYNAMIC_DEPENDENCY: &str = "* dynamic dependency *";

/// Sentinel path for a dependency list whose expression is not a literal
/// array.
pub const DYNAMIC_DEPENDENCIES: &str = "* dynamic dependencies *";

/// Module system a dependency was declared through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    #[serde(rename = "CommonJS")]
    CommonJs,
    #[serde(rename = "AMD")]
    Amd,
}

/// Target of a dependency declaration. Non-literal targets are kept as
/// explicit sentinels, never guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DependencyPath {
    Literal(String),
    Dynamic,
    DynamicList,
}

impl DependencyPath {
    /// The literal path, if this dependency has one.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(path) => Some(path),
            _ => None,
        }
    }
}

impl From<DependencyPath> for String {
    fn from(path: DependencyPath) -> Self {
        match path {
            DependencyPath::Literal(path) => path,
            DependencyPath::Dynamic => DYNAMIC_DEPENDENCY.to_string(),
            DependencyPath::DynamicList => DYNAMIC_DEPENDENCIES.to_string(),
        }
    }
}

impl From<String> for DependencyPath {
    fn from(path: String) -> Self {
        match path.as_str() {
            DYNAMIC_DEPENDENCY => Self::Dynamic,
            DYNAMIC_DEPENDENCIES => Self::DynamicList,
            _ => Self::Literal(path),
        }
    }
}

impl std::fmt::Display for DependencyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(path) => f.write_str(path),
            Self::Dynamic => f.write_str(DYNAMIC_DEPENDENCY),
            Self::DynamicList => f.write_str(DYNAMIC_DEPENDENCIES),
        }
    }
}

/// One dependency declared by a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub line: usize,
    pub path: DependencyPath,
    pub kind: DependencyKind,
}

/// Physical and logical source-line counts for one scope. Physical lines
/// are omitted when the tree carries no location metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sloc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical: Option<usize>,
    pub logical: u32,
}

/// Metrics accumulated for one scope: a function, or the module-level
/// aggregate (which has no name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub params: usize,
    pub sloc: Sloc,
    pub cyclomatic: u32,
    pub cyclomatic_density: f64,
    pub halstead: HalsteadReport,
}

impl ScopeReport {
    pub(crate) fn new(name: Option<String>, span: Option<Span>, params: usize) -> Self {
        Self {
            name,
            line: span.map(|s| s.start),
            params,
            sloc: Sloc {
                physical: span.map(|s| s.lines()),
                logical: 0,
            },
            cyclomatic: 1,
            cyclomatic_density: 0.0,
            halstead: HalsteadReport::default(),
        }
    }

    /// Compute the derived per-scope metrics once traversal is complete.
    /// Zero logical lines yield a non-finite density; that is accepted
    /// output, not an error.
    pub(crate) fn finish(&mut self) {
        self.cyclomatic_density = f64::from(self.cyclomatic) / f64::from(self.sloc.logical) * 100.0;
        self.halstead.derive();
    }
}

/// Full report for one module. `loc`, `cyclomatic`, `effort` and `params`
/// are means across the function scopes (or the aggregate, for a module
/// without functions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
    pub path: String,
    pub aggregate: ScopeReport,
    pub functions: Vec<ScopeReport>,
    pub dependencies: Vec<Dependency>,
    pub maintainability: f64,
    pub loc: f64,
    pub cyclomatic: f64,
    pub effort: f64,
    pub params: f64,
}

/// Project-level report: per-module reports ordered by path depth then
/// lexically, the dependency design-structure matrices, and project means.
///
/// The visibility matrix, change cost and core size are absent when the
/// graph phase was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub reports: Vec<ModuleReport>,
    pub adjacency_matrix: Vec<Vec<u8>>,
    pub first_order_density: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_matrix: Option<Vec<Vec<u8>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_size: Option<f64>,
    pub loc: f64,
    pub cyclomatic: f64,
    pub effort: f64,
    pub params: f64,
    pub maintainability: f64,
}
