//! Per-framework dependency graph.
//!
//! The direct dependencies of a framework are cross-referenced against its
//! target section and the library table, with each requirement checked
//! against the resolved version. The closure is then walked over the target
//! section's own dependency edges.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Walker};

use crate::assets::{
    LibraryEntry, ProjectAssetsDocument, ProjectFileDependencyGroup, ProjectFrameworkSection,
    ReferenceInfo, TargetSection,
};
use crate::core::framework::TargetFrameworkMoniker;
use crate::core::version::{VersionRequirement, VersionedText};
use crate::resolver::errors::{GraphError, RequirementOrigin};

/// Whether an empty target section is retried with a fallback framework.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Report the empty result as is.
    #[default]
    Disabled,
    /// Retry once with the first framework listed in `imports`.
    FirstImport,
}

/// Validated direct dependencies of one framework.
#[derive(Debug, Clone)]
pub struct FrameworkResolution<'a> {
    requested: TargetFrameworkMoniker,
    effective: TargetFrameworkMoniker,
    libraries: Vec<&'a LibraryEntry>,
}

impl<'a> FrameworkResolution<'a> {
    /// The framework the caller asked for.
    pub fn requested(&self) -> &TargetFrameworkMoniker {
        &self.requested
    }

    /// The framework whose target section was used.
    pub fn effective(&self) -> &TargetFrameworkMoniker {
        &self.effective
    }

    pub fn used_fallback(&self) -> bool {
        self.requested != self.effective
    }

    pub fn libraries(&self) -> &[&'a LibraryEntry] {
        &self.libraries
    }

    pub fn into_libraries(self) -> Vec<&'a LibraryEntry> {
        self.libraries
    }
}

/// Resolve and validate the direct dependencies of `framework`.
///
/// Every dependency declared for the framework, and every entry of its
/// authored dependency group, must name a library of the target section whose
/// version satisfies the requirement. An empty target section yields an
/// empty list so the caller can decide whether to fall back.
pub fn resolve_framework_dependencies<'a>(
    doc: &'a ProjectAssetsDocument,
    framework: &TargetFrameworkMoniker,
) -> Result<Vec<&'a LibraryEntry>, GraphError> {
    resolve_with_fallback(doc, framework, FallbackPolicy::Disabled).map(|r| r.into_libraries())
}

/// Like [`resolve_framework_dependencies`], applying `policy` when the
/// framework's target section is empty.
pub fn resolve_with_fallback<'a>(
    doc: &'a ProjectAssetsDocument,
    framework: &TargetFrameworkMoniker,
    policy: FallbackPolicy,
) -> Result<FrameworkResolution<'a>, GraphError> {
    let section = doc
        .project_framework(framework)
        .ok_or_else(|| GraphError::UndeclaredFramework {
            framework: framework.to_string(),
        })?;
    let group = doc.dependency_group(framework);
    let target = require_target(doc, framework)?;

    let libraries = resolve_against(doc, section, group, target)?;
    if !libraries.is_empty() || policy == FallbackPolicy::Disabled {
        return Ok(FrameworkResolution {
            requested: framework.clone(),
            effective: framework.clone(),
            libraries,
        });
    }

    let Some(fallback) = fallback_candidates(doc, framework).first() else {
        return Ok(FrameworkResolution {
            requested: framework.clone(),
            effective: framework.clone(),
            libraries,
        });
    };

    tracing::info!(
        "No libraries resolved for {}, retrying with fallback {}",
        framework,
        fallback
    );
    let fallback_target = require_target(doc, fallback)?;
    let libraries = resolve_against(doc, section, group, fallback_target)?;

    Ok(FrameworkResolution {
        requested: framework.clone(),
        effective: fallback.clone(),
        libraries,
    })
}

/// Fallback frameworks of `framework`, in retry order.
pub fn fallback_candidates<'a>(
    doc: &'a ProjectAssetsDocument,
    framework: &TargetFrameworkMoniker,
) -> &'a [TargetFrameworkMoniker] {
    doc.project_framework(framework)
        .map(ProjectFrameworkSection::imports)
        .unwrap_or_default()
}

fn require_target<'a>(
    doc: &'a ProjectAssetsDocument,
    framework: &TargetFrameworkMoniker,
) -> Result<&'a TargetSection, GraphError> {
    doc.target(framework)
        .ok_or_else(|| GraphError::UnknownFramework {
            framework: framework.to_string(),
        })
}

fn resolve_against<'a>(
    doc: &'a ProjectAssetsDocument,
    section: &ProjectFrameworkSection,
    group: Option<&ProjectFileDependencyGroup>,
    target: &'a TargetSection,
) -> Result<Vec<&'a LibraryEntry>, GraphError> {
    if target.is_empty() {
        return Ok(Vec::new());
    }

    let declared = section
        .dependencies()
        .iter()
        .map(|dep| (dep.name(), dep.requirement(), RequirementOrigin::Declared));
    let authored = group
        .into_iter()
        .flat_map(ProjectFileDependencyGroup::requirements)
        .map(|req| (req.name(), req.requirement(), RequirementOrigin::Authored));

    let mut seen = HashSet::new();
    let mut libraries = Vec::new();
    for (name, requirement, origin) in declared.chain(authored) {
        let library = check_requirement(doc, target, name, requirement, origin)?;
        if seen.insert(library.key()) {
            libraries.push(library);
        }
    }

    Ok(libraries)
}

fn check_requirement<'a>(
    doc: &'a ProjectAssetsDocument,
    target: &'a TargetSection,
    name: &str,
    requirement: &VersionRequirement,
    origin: RequirementOrigin,
) -> Result<&'a LibraryEntry, GraphError> {
    let missing = || GraphError::MissingLibrary {
        name: name.to_string(),
        framework: target.key().to_string(),
        origin,
    };

    let (key, _) = target.find_by_name(name).ok_or_else(missing)?;
    // Presence in the library table is checked when the document is parsed
    let library = doc.library(key).ok_or_else(missing)?;

    if !requirement.matches(library.version()) {
        return Err(GraphError::ConstraintViolation {
            name: name.to_string(),
            requirement: requirement.to_string(),
            actual: library.version().to_string(),
            framework: target.key().to_string(),
            origin,
        });
    }

    tracing::debug!("{} {} satisfied by {}", name, requirement, library.key());
    Ok(library)
}

/// A library together with how it was resolved for one framework.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLibrary<'a> {
    pub library: &'a LibraryEntry,
    pub info: &'a ReferenceInfo,
}

/// Dependency graph of one framework's target section.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    doc: &'a ProjectAssetsDocument,
    resolution: FrameworkResolution<'a>,
    graph: DiGraph<ResolvedLibrary<'a>, ()>,
    nodes: HashMap<&'a VersionedText, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph for `framework`, validating its direct dependencies.
    pub fn build(
        doc: &'a ProjectAssetsDocument,
        framework: &TargetFrameworkMoniker,
        policy: FallbackPolicy,
    ) -> Result<Self, GraphError> {
        let resolution = resolve_with_fallback(doc, framework, policy)?;
        let target = require_target(doc, resolution.effective())?;

        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for (key, info) in target.entries() {
            let Some(library) = doc.library(key) else {
                continue;
            };
            let node = graph.add_node(ResolvedLibrary { library, info });
            nodes.insert(key, node);
        }

        for (key, info) in target.entries() {
            let Some(&from) = nodes.get(key) else {
                continue;
            };
            for dep in info.dependencies() {
                let Some((dep_key, _)) = target.find_by_name(dep.name()) else {
                    tracing::warn!(
                        "{} depends on {} which is not part of {}",
                        key,
                        dep.name(),
                        target.key()
                    );
                    continue;
                };
                if !dep.requirement().matches(dep_key.version()) {
                    tracing::warn!(
                        "{} requires {} but {} was resolved",
                        key,
                        dep,
                        dep_key
                    );
                }
                if let Some(&to) = nodes.get(dep_key) {
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        let roots = resolution
            .libraries()
            .iter()
            .filter_map(|library| nodes.get(library.key()).copied())
            .collect();

        Ok(DependencyGraph {
            doc,
            resolution,
            graph,
            nodes,
            roots,
        })
    }

    pub fn document(&self) -> &'a ProjectAssetsDocument {
        self.doc
    }

    pub fn resolution(&self) -> &FrameworkResolution<'a> {
        &self.resolution
    }

    /// Validated direct dependencies.
    pub fn direct(&self) -> Vec<ResolvedLibrary<'a>> {
        self.roots.iter().map(|&node| self.graph[node]).collect()
    }

    /// Everything reachable from the direct dependencies, in discovery order.
    pub fn closure(&self) -> Vec<ResolvedLibrary<'a>> {
        let mut visited = HashSet::new();
        let mut closure = Vec::new();

        for &root in &self.roots {
            for node in Bfs::new(&self.graph, root).iter(&self.graph) {
                if visited.insert(node) {
                    closure.push(self.graph[node]);
                }
            }
        }

        closure
    }

    /// Immediate dependencies of `key` within this framework.
    pub fn dependencies_of(&self, key: &VersionedText) -> Vec<&'a LibraryEntry> {
        let Some(&node) = self.nodes.get(key) else {
            return Vec::new();
        };
        let mut deps: Vec<_> = self
            .graph
            .neighbors(node)
            .map(|n| self.graph[n].library)
            .collect();
        deps.sort_by(|a, b| a.key().cmp(b.key()));
        deps
    }

    /// Libraries that depend directly on `key`.
    pub fn dependents_of(&self, key: &VersionedText) -> Vec<&'a LibraryEntry> {
        let Some(&node) = self.nodes.get(key) else {
            return Vec::new();
        };
        let mut dependents: Vec<_> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].library)
            .collect();
        dependents.sort_by(|a, b| a.key().cmp(b.key()));
        dependents
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
