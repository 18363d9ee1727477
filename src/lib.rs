// Export modules for library usage
pub mod analyzers;
pub mod config;
pub mod core;
pub mod metrics;
pub mod rules;
pub mod walker;

// Re-export commonly used types
pub use crate::analyzers::project::{self, ModuleSource};
pub use crate::config::Settings;
pub use crate::core::ast::{safe_name, Field, Node, NodeKind, Span, ANONYMOUS};
pub use crate::core::errors::{Error, Result};
pub use crate::core::{
    Dependency, DependencyKind, DependencyPath, ModuleReport, ProjectReport, ScopeReport, Sloc,
};
pub use crate::metrics::halstead::{HalsteadReport, SymbolTally};
pub use crate::metrics::maintainability::{maintainability_index, MAX_MAINTAINABILITY};
pub use crate::rules::{javascript, PathAliases, Registry, RuleDescriptor};
pub use crate::walker::{walk, Visitor};

/// Analyze a single module syntax tree.
pub fn analyze_module(
    tree: &Node,
    registry: &Registry,
    settings: &Settings,
) -> Result<ModuleReport> {
    analyzers::module::analyze(tree, registry, settings)
}

/// Analyze a set of modules and derive the project dependency metrics.
pub fn analyze_project(
    modules: &[ModuleSource],
    registry: &Registry,
    settings: &Settings,
) -> Result<ProjectReport> {
    analyzers::project::analyze(modules, registry, settings)
}

/// Re-derive project metrics from cached per-module reports. `skip_graph`
/// omits the O(N³) visibility and core-size step.
pub fn derive_metrics(reports: Vec<ModuleReport>, skip_graph: bool) -> ProjectReport {
    analyzers::project::derive_metrics(reports, skip_graph)
}
