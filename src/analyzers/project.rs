//! Project-level dependency-graph analysis.
//!
//! Runs the module analyzer over a module set (in parallel; module analysis
//! is pure and owns all of its state), then builds the dependency
//! design-structure matrices: direct adjacency, transitive visibility via an
//! O(N³) Floyd–Warshall relaxation, and the derived density, change-cost and
//! core-size figures.

use std::cmp::Ordering;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::module;
use crate::config::Settings;
use crate::core::ast::Node;
use crate::core::errors::{Error, Result};
use crate::core::{Dependency, DependencyKind, ModuleReport, ProjectReport};
use crate::rules::Registry;

/// One module submitted for project analysis: a virtual absolute path and
/// its parsed syntax tree. Paths are never touched as filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSource {
    pub path: String,
    pub tree: Node,
}

/// Analyze a module set and derive every project metric.
pub fn analyze(
    modules: &[ModuleSource],
    registry: &Registry,
    settings: &Settings,
) -> Result<ProjectReport> {
    Ok(derive_metrics(analyze_raw(modules, registry, settings)?, false))
}

/// First phase only: per-module reports, no graph or aggregate work. For
/// callers that cache raw reports and re-derive later.
///
/// The first failing module aborts the batch, its error annotated with the
/// module path; there are no partial results.
pub fn analyze_raw(
    modules: &[ModuleSource],
    registry: &Registry,
    settings: &Settings,
) -> Result<Vec<ModuleReport>> {
    modules
        .par_iter()
        .map(|source| {
            if source.path.is_empty() {
                return Err(Error::InvalidPath);
            }
            module::analyze(&source.tree, registry, settings)
                .map(|mut report| {
                    report.path = source.path.clone();
                    report
                })
                .map_err(|error| error.for_module(&source.path))
        })
        .collect()
}

/// Second phase: everything derived from cached per-module reports. With
/// `skip_graph` the O(N³) visibility/core-size step — the only non-linear
/// cost in the pipeline — is omitted.
pub fn derive_metrics(mut reports: Vec<ModuleReport>, skip_graph: bool) -> ProjectReport {
    reports.sort_by(|lhs, rhs| compare_paths(&lhs.path, &rhs.path));
    let modules = reports.len();
    let adjacency_matrix = adjacency_matrix(&reports);
    let edges: usize = adjacency_matrix
        .iter()
        .map(|row| row.iter().filter(|&&cell| cell == 1).count())
        .sum();
    let first_order_density = percentify(edges as f64, modules * modules);
    debug!("project graph: {modules} modules, {edges} direct edges");

    let (visibility_matrix, change_cost, core_size) = if skip_graph {
        (None, None, None)
    } else {
        let (visibility, change_cost) = visibility_matrix(&adjacency_matrix);
        let core = core_size(&visibility, first_order_density);
        (Some(visibility), Some(change_cost), Some(core))
    };

    let averages = Averages::of(&reports);
    ProjectReport {
        reports,
        adjacency_matrix,
        first_order_density,
        visibility_matrix,
        change_cost,
        core_size,
        loc: averages.loc,
        cyclomatic: averages.cyclomatic,
        effort: averages.effort,
        params: averages.params,
        maintainability: averages.maintainability,
    }
}

/// Report order: path depth first, then lexical. Externally observable
/// through the report list and both matrices.
fn compare_paths(lhs: &str, rhs: &str) -> Ordering {
    let depth = |path: &str| path.split('/').count();
    depth(lhs).cmp(&depth(rhs)).then_with(|| lhs.cmp(rhs))
}

fn adjacency_matrix(reports: &[ModuleReport]) -> Vec<Vec<u8>> {
    (0..reports.len())
        .map(|x| {
            (0..reports.len())
                .map(|y| u8::from(x != y && depends_on(&reports[x], &reports[y])))
                .collect()
        })
        .collect()
}

fn depends_on(from: &ModuleReport, to: &ModuleReport) -> bool {
    from.dependencies
        .iter()
        .any(|dependency| resolves_to(&from.path, dependency, &to.path))
}

/// Whether `dependency`, declared in module `from`, names module `to`.
///
/// CommonJS dependencies are internal only when they start with `./` or
/// `../`; bare names are external packages and never resolve. AMD
/// dependencies resolve without that restriction. Extension-less literals
/// first probe a directory-style `index.<ext>` import, then have the
/// target's extension appended.
fn resolves_to(from: &str, dependency: &Dependency, to: &str) -> bool {
    let Some(literal) = dependency.path.as_literal() else {
        return false;
    };
    if dependency.kind == DependencyKind::CommonJs && !is_relative(literal) {
        return false;
    }
    let mut resolved = resolve(dirname(from), literal);
    if extname(literal).is_empty() {
        if format!("{resolved}/index{}", extname(to)) == to {
            return true;
        }
        resolved.push_str(extname(to));
    }
    resolved == to
}

fn is_relative(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../")
}

fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => ".",
    }
}

/// Lexically join and normalize; `.` and `..` are resolved without touching
/// any filesystem.
fn resolve(base: &str, relative: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for part in base.split('/').chain(relative.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            name => stack.push(name),
        }
    }
    format!("/{}", stack.join("/"))
}

fn extname(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    if base == "." || base == ".." {
        return "";
    }
    match base.rfind('.') {
        Some(index) if index > 0 => &base[index..],
        _ => "",
    }
}

/// All-pairs reachability over the adjacency matrix. Non-edges start at
/// infinity and the diagonal at distance one, so every module reaches
/// itself; self-reachability counts toward change cost while the emitted
/// matrix keeps a zero diagonal.
fn visibility_matrix(adjacency: &[Vec<u8>]) -> (Vec<Vec<u8>>, f64) {
    let n = adjacency.len();
    let mut dist: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j || adjacency[i][j] == 1 {
                        1.0
                    } else {
                        f64::INFINITY
                    }
                })
                .collect()
        })
        .collect();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if dist[i][j] > dist[i][k] + dist[k][j] {
                    dist[i][j] = dist[i][k] + dist[k][j];
                }
            }
        }
    }

    let mut reachable = 0usize;
    let visibility = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if dist[i][j].is_finite() {
                        reachable += 1;
                        u8::from(i != j)
                    } else {
                        0
                    }
                })
                .collect()
        })
        .collect();
    (visibility, percentify(reachable as f64, n * n))
}

/// Share of modules whose fan-in and fan-out both sit at or above the
/// median boundary; zero when the project has no direct edges at all.
fn core_size(visibility: &[Vec<u8>], first_order_density: f64) -> f64 {
    if first_order_density == 0.0 {
        return 0.0;
    }
    let n = visibility.len();
    let fan_in: Vec<u32> = (0..n)
        .map(|i| (0..n).map(|j| u32::from(visibility[i][j])).sum())
        .collect();
    let fan_out: Vec<u32> = (0..n)
        .map(|j| (0..n).map(|i| u32::from(visibility[i][j])).sum())
        .collect();
    let fan_in_boundary = median(fan_in.clone());
    let fan_out_boundary = median(fan_out.clone());
    let core = (0..n)
        .filter(|&i| {
            f64::from(fan_in[i]) >= fan_in_boundary && f64::from(fan_out[i]) >= fan_out_boundary
        })
        .count();
    percentify(core as f64, n)
}

/// Median over an even-length list averages the two middle values.
fn median(mut values: Vec<u32>) -> f64 {
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        f64::from(values[n / 2])
    } else {
        (f64::from(values[n / 2 - 1]) + f64::from(values[n / 2])) / 2.0
    }
}

fn percentify(value: f64, limit: usize) -> f64 {
    if limit == 0 {
        0.0
    } else {
        value / limit as f64 * 100.0
    }
}

struct Averages {
    loc: f64,
    cyclomatic: f64,
    effort: f64,
    params: f64,
    maintainability: f64,
}

impl Averages {
    /// Means across module reports; the divisor stays one for an empty set
    /// so every average is zero rather than NaN.
    fn of(reports: &[ModuleReport]) -> Self {
        let divisor = if reports.is_empty() {
            1.0
        } else {
            reports.len() as f64
        };
        let mut sums = Self {
            loc: 0.0,
            cyclomatic: 0.0,
            effort: 0.0,
            params: 0.0,
            maintainability: 0.0,
        };
        for report in reports {
            sums.loc += report.loc;
            sums.cyclomatic += report.cyclomatic;
            sums.effort += report.effort;
            sums.params += report.params;
            sums.maintainability += report.maintainability;
        }
        Self {
            loc: sums.loc / divisor,
            cyclomatic: sums.cyclomatic / divisor,
            effort: sums.effort / divisor,
            params: sums.params / divisor,
            maintainability: sums.maintainability / divisor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DependencyPath;

    fn dependency(kind: DependencyKind, path: &str) -> Dependency {
        Dependency {
            line: 1,
            kind,
            path: DependencyPath::Literal(path.to_string()),
        }
    }

    #[test]
    fn paths_order_by_depth_before_lexical_rank() {
        assert_eq!(compare_paths("/a.js", "/a/b.js"), Ordering::Less);
        assert_eq!(compare_paths("/a/b.js", "/d.js"), Ordering::Greater);
        assert_eq!(compare_paths("/a.js", "/d.js"), Ordering::Less);
        assert_eq!(compare_paths("/mod/a.js", "/mod/index.js"), Ordering::Less);
    }

    #[test]
    fn lexical_resolution_normalizes_dot_segments() {
        assert_eq!(resolve("/a", "./b"), "/a/b");
        assert_eq!(resolve("/a/b", "../c"), "/a/c");
        assert_eq!(resolve("/", "./mod"), "/mod");
        assert_eq!(resolve("/a/b/c", "../../d"), "/a/d");
        assert_eq!(resolve("/", "../up"), "/up");
    }

    #[test]
    fn extnames_come_from_the_final_segment() {
        assert_eq!(extname("/a/b.js"), ".js");
        assert_eq!(extname("./mod"), "");
        assert_eq!(extname("../b.js"), ".js");
        assert_eq!(extname(".."), "");
        assert_eq!(extname("./.config"), "");
    }

    #[test]
    fn bare_commonjs_names_never_resolve() {
        assert!(!resolves_to(
            "/a.js",
            &dependency(DependencyKind::CommonJs, "lodash"),
            "/lodash.js"
        ));
        assert!(resolves_to(
            "/a.js",
            &dependency(DependencyKind::Amd, "lodash"),
            "/lodash.js"
        ));
    }

    #[test]
    fn extensionless_imports_probe_index_then_append_the_target_extension() {
        let inner = dependency(DependencyKind::CommonJs, "./mod");
        assert!(resolves_to("/b.js", &inner, "/mod/index.js"));
        assert!(resolves_to("/b.js", &inner, "/mod.js"));
        assert!(!resolves_to("/b.js", &inner, "/mod/other.js"));
    }

    #[test]
    fn dynamic_sentinels_resolve_nothing() {
        let dynamic = Dependency {
            line: 1,
            kind: DependencyKind::CommonJs,
            path: DependencyPath::Dynamic,
        };
        assert!(!resolves_to("/a.js", &dynamic, "/b.js"));
    }

    #[test]
    fn median_averages_the_middle_pair() {
        assert_eq!(median(vec![5, 1, 2, 0, 1, 0]), 1.0);
        assert_eq!(median(vec![0, 1, 1, 2, 2, 3]), 1.5);
        assert_eq!(median(vec![3, 1, 2]), 2.0);
    }

    #[test]
    fn visibility_counts_self_reachability_but_emits_a_zero_diagonal() {
        // 0 -> 1, nothing else.
        let adjacency = vec![vec![0, 1], vec![0, 0]];
        let (visibility, change_cost) = visibility_matrix(&adjacency);
        assert_eq!(visibility, vec![vec![0, 1], vec![0, 0]]);
        // Three reachable cells of four: both diagonals and the edge.
        assert_eq!(change_cost, 75.0);
    }

    #[test]
    fn percentify_guards_the_empty_project() {
        assert_eq!(percentify(0.0, 0), 0.0);
        assert_eq!(percentify(5.0, 16), 31.25);
    }
}
