// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! DAG (Directed Acyclic Graph) builder for activity dependencies
//!
//! Builds and validates the dependency graph of one activity scope, and of
//! the pipeline-to-pipeline graph used when loading manifests.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

use crate::activity::Activity;
use crate::errors::{AdflowError, AdflowResult};
use crate::pipeline::PipelineRegistry;

/// Builder for dependency DAGs.
///
/// Node weights are positions in the input order, so results can be mapped
/// back onto the original slice.
pub struct DagBuilder {
    graph: DiGraph<usize, ()>,
    name_to_index: HashMap<String, NodeIndex>,
    names: Vec<String>,
    labels: Vec<String>,
}

impl DagBuilder {
    /// Create a new DAG builder
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_index: HashMap::new(),
            names: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Build a DAG from one activity scope.
    ///
    /// Nested children of composite activities live in their own scopes and
    /// are not part of this graph.
    pub fn build(activities: &[Activity]) -> AdflowResult<Self> {
        let nodes = activities.iter().map(|activity| Node {
            name: activity.name(),
            label: activity.kind().type_name(),
            edges: activity.depends_on().names().collect(),
        });

        Self::from_nodes(nodes, |activity, dependency| AdflowError::DanglingDependency {
            activity: activity.to_string(),
            dependency: dependency.to_string(),
        })
    }

    /// Build the pipeline dependency DAG of a registry
    pub fn for_registry(registry: &PipelineRegistry) -> AdflowResult<Self> {
        let nodes = registry.iter().map(|pipeline| Node {
            name: pipeline.name(),
            label: if pipeline.schedule().is_some() {
                "scheduled"
            } else {
                "pipeline"
            },
            edges: pipeline.depends_on_pipelines().map(|p| p.name()).collect(),
        });

        Self::from_nodes(nodes, |pipeline, dependency| AdflowError::UnknownPipeline {
            pipeline: pipeline.to_string(),
            dependency: dependency.to_string(),
        })
    }

    /// Build a DAG from named nodes and their predecessors
    pub(crate) fn from_nodes<'a, I, F>(nodes: I, missing: F) -> AdflowResult<Self>
    where
        I: IntoIterator<Item = Node<'a>>,
        F: Fn(&str, &str) -> AdflowError,
    {
        let mut builder = Self::new();
        let nodes: Vec<Node<'a>> = nodes.into_iter().collect();

        for (idx, node) in nodes.iter().enumerate() {
            if builder.name_to_index.contains_key(node.name) {
                return Err(AdflowError::DuplicateNode {
                    name: node.name.to_string(),
                });
            }
            let index = builder.graph.add_node(idx);
            builder.name_to_index.insert(node.name.to_string(), index);
            builder.names.push(node.name.to_string());
            builder.labels.push(node.label.to_string());
        }

        // Add dependency edges
        for node in &nodes {
            let target = builder.name_to_index[node.name];
            for &dep_name in &node.edges {
                let source = builder
                    .name_to_index
                    .get(dep_name)
                    .ok_or_else(|| missing(node.name, dep_name))?;

                if !builder.graph.contains_edge(*source, target) {
                    builder.graph.add_edge(*source, target, ());
                }
            }
        }

        builder.validate_acyclic()?;

        Ok(builder)
    }

    fn name(&self, node: NodeIndex) -> &str {
        &self.names[node.index()]
    }

    /// Validate that the graph is acyclic
    fn validate_acyclic(&self) -> AdflowResult<()> {
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| AdflowError::CircularDependency {
                members: self.find_cycle_members(cycle.node_id()),
            })
    }

    /// Names of the strongly connected component containing `start`
    fn find_cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let component = tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| component.contains(&start))
            .unwrap_or_else(|| vec![start]);

        let mut members: Vec<String> = component
            .into_iter()
            .map(|node| self.name(node).to_string())
            .collect();
        members.sort();

        // Close the loop so the message reads a → b → a
        if let Some(first) = members.first().cloned() {
            members.push(first);
        }
        members
    }

    /// Get topologically sorted input positions
    pub fn topological_order(&self) -> AdflowResult<Vec<usize>> {
        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|n| self.graph[n]).collect())
            .map_err(|cycle| AdflowError::CircularDependency {
                members: self.find_cycle_members(cycle.node_id()),
            })
    }

    /// Get topologically sorted names
    pub fn topological_order_names(&self) -> AdflowResult<Vec<String>> {
        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|n| self.name(n).to_string()).collect())
            .map_err(|cycle| AdflowError::CircularDependency {
                members: self.find_cycle_members(cycle.node_id()),
            })
    }

    /// Get dependencies of a node (nodes that must run before it)
    pub fn dependencies(&self, name: &str) -> Option<Vec<String>> {
        let node = self.name_to_index.get(name)?;
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(*node, Direction::Incoming)
            .map(|n| self.name(n).to_string())
            .collect();
        out.sort();
        Some(out)
    }

    /// Generate Mermaid diagram of the DAG
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for node in self.graph.node_indices() {
            out.push_str(&format!(
                "    n{}[\"{}\"]\n",
                node.index(),
                self.name(node)
            ));
        }

        for edge in self.graph.raw_edges() {
            out.push_str(&format!(
                "    n{} --> n{}\n",
                edge.source().index(),
                edge.target().index()
            ));
        }

        out
    }

    /// Generate DOT diagram of the DAG
    pub fn to_dot(&self, title: &str) -> String {
        let mut out = format!("digraph \"{}\" {{\n", title);
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for edge in self.graph.raw_edges() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                self.name(edge.source()),
                self.name(edge.target())
            ));
        }

        // Isolated nodes have no edge to declare them
        for node in self.graph.node_indices() {
            if self.graph.neighbors_undirected(node).count() == 0 {
                out.push_str(&format!("    \"{}\";\n", self.name(node)));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Generate text representation of run order
    pub fn to_text(&self) -> AdflowResult<String> {
        let order = toposort(&self.graph, None).map_err(|cycle| AdflowError::CircularDependency {
            members: self.find_cycle_members(cycle.node_id()),
        })?;
        let mut out = String::new();

        for (i, node) in order.into_iter().enumerate() {
            let name = self.name(node);
            let deps = self.dependencies(name).unwrap_or_default();

            out.push_str(&format!("{}. {} ({})", i + 1, name, self.labels[node.index()]));

            if !deps.is_empty() {
                out.push_str(&format!(" [depends: {}]", deps.join(", ")));
            }

            out.push('\n');
        }

        Ok(out)
    }
}

impl Default for DagBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A node handed to [`DagBuilder::from_nodes`]
pub(crate) struct Node<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub edges: Vec<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scope(activities: Vec<(&str, Vec<&str>)>) -> Vec<Activity> {
        activities
            .into_iter()
            .map(|(name, deps)| {
                let mut activity = Activity::wait(name, 1);
                for dep in deps {
                    activity.add_dependency(dep, &[]);
                }
                activity
            })
            .collect()
    }

    #[test]
    fn test_linear_dag() {
        let scope = make_scope(vec![("c", vec!["b"]), ("a", vec![]), ("b", vec!["a"])]);

        let dag = DagBuilder::build(&scope).unwrap();
        assert_eq!(dag.topological_order_names().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(dag.topological_order().unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_diamond_dag() {
        let scope = make_scope(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec!["b", "c"]),
        ]);

        let dag = DagBuilder::build(&scope).unwrap();
        let order = dag.topological_order_names().unwrap();

        // a must come first, d must come last
        assert_eq!(order[0], "a");
        assert_eq!(order[3], "d");
        assert_eq!(dag.dependencies("d").unwrap(), vec!["b", "c"]);
        assert!(dag.dependencies("a").unwrap().is_empty());
        assert!(dag.dependencies("missing").is_none());
    }

    #[test]
    fn test_circular_dependency_detection() {
        let scope = make_scope(vec![("a", vec!["b"]), ("b", vec!["a"]), ("c", vec![])]);

        match DagBuilder::build(&scope) {
            Err(AdflowError::CircularDependency { members }) => {
                assert_eq!(members, vec!["a", "b", "a"]);
            }
            other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let scope = make_scope(vec![("a", vec!["a"])]);
        assert!(matches!(
            DagBuilder::build(&scope),
            Err(AdflowError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_dangling_dependency() {
        let scope = make_scope(vec![("a", vec!["nonexistent"])]);

        match DagBuilder::build(&scope) {
            Err(AdflowError::DanglingDependency { activity, dependency }) => {
                assert_eq!(activity, "a");
                assert_eq!(dependency, "nonexistent");
            }
            other => panic!("expected a dangling dependency, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_repeated_name_is_rejected() {
        let scope = make_scope(vec![("a", vec![]), ("b", vec![]), ("a", vec!["b"])]);

        match DagBuilder::build(&scope) {
            Err(AdflowError::DuplicateNode { name }) => assert_eq!(name, "a"),
            other => panic!("expected a duplicate node, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_render_formats() {
        let scope = make_scope(vec![("load data", vec![]), ("b", vec!["load data"]), ("lonely", vec![])]);
        let dag = DagBuilder::build(&scope).unwrap();

        let mermaid = dag.to_mermaid();
        assert!(mermaid.starts_with("graph TD"));
        assert!(mermaid.contains("n0[\"load data\"]"));
        assert!(mermaid.contains("n0 --> n1"));

        let dot = dag.to_dot("ingest");
        assert!(dot.contains("digraph \"ingest\""));
        assert!(dot.contains("\"load data\" -> \"b\";"));
        assert!(dot.contains("    \"lonely\";"));

        let text = dag.to_text().unwrap();
        assert!(text.contains("(Wait)"));
        assert!(text.contains("b (Wait) [depends: load data]"));
    }

    #[test]
    fn test_registry_graph() {
        use crate::pipeline::Pipeline;
        use std::sync::Arc;

        let base = Arc::new(Pipeline::new("base"));
        let mut registry = PipelineRegistry::new();
        registry
            .register(Pipeline::new("ingest").depends_on(base.clone()).with_schedule("@daily"))
            .unwrap();
        registry.register(Pipeline::clone(&base)).unwrap();

        let dag = DagBuilder::for_registry(&registry).unwrap();
        assert_eq!(dag.topological_order_names().unwrap(), vec!["base", "ingest"]);
        assert!(dag.to_text().unwrap().contains("ingest (scheduled) [depends: base]"));
    }

    #[test]
    fn test_registry_graph_with_unregistered_dependency() {
        use crate::pipeline::Pipeline;
        use std::sync::Arc;

        let mut registry = PipelineRegistry::new();
        registry
            .register(Pipeline::new("ingest").depends_on(Arc::new(Pipeline::new("outside"))))
            .unwrap();

        assert!(matches!(
            DagBuilder::for_registry(&registry),
            Err(AdflowError::UnknownPipeline { .. })
        ));
    }
}
