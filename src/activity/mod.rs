// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Activities and dependency wiring
//!
//! An [`Activity`] is one step of a pipeline. Ordering between activities is
//! expressed with the chaining methods instead of editing dependency maps by
//! hand:
//!
//! ```
//! use adflow::Activity;
//!
//! let extract = Activity::set_variable("extract", "select 1");
//! let mut ingest = Activity::databricks_spark_python("ingest", "ingest.py");
//! let mut archive = Activity::wait("archive", 5);
//!
//! // extract → ingest → archive
//! extract.then(&mut ingest).then(&mut archive);
//!
//! assert!(ingest.depends_on().contains("extract"));
//! assert!(archive.depends_on().contains("ingest"));
//! ```
//!
//! None of the wiring methods check that the referenced activity exists;
//! that happens when the owning pipeline is emitted.

mod dependency;
mod kind;

pub use dependency::{Dependencies, DependencyCondition};
pub use kind::ActivityKind;

use serde::Deserialize;

/// A named unit of work plus the activities it waits on
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawActivity")]
pub struct Activity {
    name: String,
    depends_on: Dependencies,
    kind: ActivityKind,
}

/// Manifest shape of an activity, routed through [`Activity::new`] so the
/// for-each chaining policy also applies to parsed definitions
#[derive(Deserialize)]
struct RawActivity {
    name: String,
    #[serde(default)]
    depends_on: Dependencies,
    #[serde(flatten)]
    kind: ActivityKind,
}

impl From<RawActivity> for Activity {
    fn from(raw: RawActivity) -> Self {
        let mut activity = Activity::new(raw.name, raw.kind);
        for (name, conditions) in raw.depends_on.iter() {
            activity.add_dependency(name, conditions);
        }
        activity
    }
}

impl Activity {
    /// Create an activity of the given kind with no dependencies
    pub fn new(name: impl Into<String>, mut kind: ActivityKind) -> Self {
        kind.link_children();
        Self {
            name: name.into(),
            depends_on: Dependencies::new(),
            kind,
        }
    }

    pub fn copy(
        name: impl Into<String>,
        input_dataset: impl Into<String>,
        output_dataset: impl Into<String>,
        source: impl Into<String>,
        sink: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            ActivityKind::Copy {
                input_dataset: input_dataset.into(),
                output_dataset: output_dataset.into(),
                source: source.into(),
                sink: sink.into(),
            },
        )
    }

    pub fn delete(
        name: impl Into<String>,
        dataset: impl Into<String>,
        recursive: bool,
        wildcard: Option<String>,
    ) -> Self {
        Self::new(
            name,
            ActivityKind::Delete {
                dataset: dataset.into(),
                recursive,
                wildcard,
            },
        )
    }

    pub fn databricks_spark_python(name: impl Into<String>, python_file: impl Into<String>) -> Self {
        Self::new(
            name,
            ActivityKind::DatabricksSparkPython {
                python_file: python_file.into(),
                parameters: vec![],
            },
        )
    }

    pub fn lookup(name: impl Into<String>, dataset: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(
            name,
            ActivityKind::Lookup {
                dataset: dataset.into(),
                source: source.into(),
            },
        )
    }

    pub fn stored_procedure(
        name: impl Into<String>,
        stored_procedure_name: impl Into<String>,
        linked_service: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            ActivityKind::SqlServerStoredProcedure {
                stored_procedure_name: stored_procedure_name.into(),
                linked_service: linked_service.into(),
            },
        )
    }

    pub fn execute_pipeline(name: impl Into<String>, pipeline: impl Into<String>) -> Self {
        Self::new(
            name,
            ActivityKind::ExecutePipeline {
                pipeline: pipeline.into(),
            },
        )
    }

    pub fn set_variable(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            name,
            ActivityKind::SetVariable {
                variable_name: None,
                value: value.into(),
            },
        )
    }

    pub fn if_condition(
        name: impl Into<String>,
        expression: impl Into<String>,
        if_true_activities: Vec<Activity>,
        if_false_activities: Vec<Activity>,
    ) -> Self {
        Self::new(
            name,
            ActivityKind::IfCondition {
                expression: expression.into(),
                if_true_activities,
                if_false_activities,
            },
        )
    }

    /// Create a for-each activity.
    ///
    /// When more than one child is given, every child after the first is made
    /// to depend on the one before it.
    pub fn for_each(name: impl Into<String>, items: impl Into<String>, activities: Vec<Activity>) -> Self {
        Self::new(
            name,
            ActivityKind::ForEach {
                items: items.into(),
                activities,
            },
        )
    }

    pub fn wait(name: impl Into<String>, seconds: u32) -> Self {
        Self::new(name, ActivityKind::Wait { seconds })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ActivityKind {
        &self.kind
    }

    pub fn depends_on(&self) -> &Dependencies {
        &self.depends_on
    }

    /// Wait on `activity_name` reaching one of `conditions`.
    ///
    /// Replaces any conditions previously set for that name; an empty slice
    /// means `[Succeeded]`.
    pub fn add_dependency(
        &mut self,
        activity_name: impl Into<String>,
        conditions: &[DependencyCondition],
    ) -> &mut Self {
        self.depends_on.insert(activity_name, conditions);
        self
    }

    /// Apply [`Activity::add_dependency`] for every entry, in order
    pub fn add_dependencies<I, S>(&mut self, dependencies: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, Vec<DependencyCondition>)>,
        S: Into<String>,
    {
        for (name, conditions) in dependencies {
            self.add_dependency(name, &conditions);
        }
        self
    }

    /// `next` runs after `self`. Returns `next` so calls compose left to right.
    pub fn then<'a>(&self, next: &'a mut Activity) -> &'a mut Activity {
        next.add_dependency(self.name.as_str(), &[]);
        next
    }

    /// Every target runs after `self` (fan-out). Returns the targets.
    pub fn then_all<'a, I>(&self, targets: I) -> Vec<&'a mut Activity>
    where
        I: IntoIterator<Item = &'a mut Activity>,
    {
        targets
            .into_iter()
            .map(|target| {
                target.add_dependency(self.name.as_str(), &[]);
                target
            })
            .collect()
    }

    /// `self` runs after `previous`. Returns `previous`, mirroring [`Activity::then`].
    pub fn after<'a>(&mut self, previous: &'a mut Activity) -> &'a mut Activity {
        self.add_dependency(previous.name.as_str(), &[]);
        previous
    }

    /// `self` runs after every activity in `previous` (fan-in). Returns `self`.
    pub fn after_all<'a, I>(&mut self, previous: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        for activity in previous {
            self.add_dependency(activity.name.as_str(), &[]);
        }
        self
    }

    /// Every target runs after `self`. Returns `self`, unlike [`Activity::then_all`].
    pub fn before_all<'a, I>(&self, targets: I) -> &Self
    where
        I: IntoIterator<Item = &'a mut Activity>,
    {
        for target in targets {
            target.add_dependency(self.name.as_str(), &[]);
        }
        self
    }

    /// Nested activity lists, if this is a composite activity
    pub fn child_scopes(&self) -> Vec<&[Activity]> {
        self.kind.child_scopes()
    }

    /// Depth-first walk over this activity and all nested children
    pub fn walk(&self) -> Vec<&Activity> {
        let mut out = vec![self];
        for scope in self.kind.child_scopes() {
            for child in scope {
                out.extend(child.walk());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DependencyCondition::*;

    fn act(name: &str) -> Activity {
        Activity::wait(name, 1)
    }

    #[test]
    fn test_then_chain() {
        let a = act("a");
        let mut b = act("b");
        let mut c = act("c");

        a.then(&mut b).then(&mut c);

        assert_eq!(b.depends_on().len(), 1);
        assert_eq!(b.depends_on().get("a"), Some(&[Succeeded][..]));
        assert_eq!(c.depends_on().len(), 1);
        assert_eq!(c.depends_on().get("b"), Some(&[Succeeded][..]));
        assert!(a.depends_on().is_empty());
    }

    #[test]
    fn test_then_all_fan_out() {
        let a = act("a");
        let mut b = act("b");
        let mut c = act("c");

        let targets = a.then_all([&mut b, &mut c]);
        assert_eq!(targets.len(), 2);

        assert_eq!(b.depends_on().get("a"), Some(&[Succeeded][..]));
        assert_eq!(c.depends_on().get("a"), Some(&[Succeeded][..]));
    }

    #[test]
    fn test_after_is_mirror_of_then() {
        let mut a = act("a");
        let mut b = act("b");

        let returned = a.after(&mut b);
        assert_eq!(returned.name(), "b");

        assert_eq!(a.depends_on().get("b"), Some(&[Succeeded][..]));
        assert!(b.depends_on().is_empty());
    }

    #[test]
    fn test_after_chain() {
        let mut a = act("a");
        let mut b = act("b");
        let mut c = act("c");

        a.after(&mut b).after(&mut c);

        assert!(a.depends_on().contains("b"));
        assert!(b.depends_on().contains("c"));
        assert!(c.depends_on().is_empty());
    }

    #[test]
    fn test_after_all_fan_in() {
        let a = act("a");
        let b = act("b");
        let mut c = act("c");
        let mut d = act("d");

        c.after_all([&a, &b]).then(&mut d);

        assert_eq!(c.depends_on().names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(d.depends_on().contains("c"));
    }

    #[test]
    fn test_before_all_returns_self() {
        let c = act("c");
        let mut a = act("a");
        let mut b = act("b");
        let mut d = act("d");

        c.before_all([&mut a, &mut b]).then(&mut d);

        assert!(a.depends_on().contains("c"));
        assert!(b.depends_on().contains("c"));
        assert!(d.depends_on().contains("c"));
    }

    #[test]
    fn test_add_dependency_overwrites() {
        let mut a = act("a");
        a.add_dependency("foo", &[Succeeded]);
        a.add_dependency("foo", &[Failed]);

        assert_eq!(a.depends_on().len(), 1);
        assert_eq!(a.depends_on().get("foo"), Some(&[Failed][..]));
    }

    #[test]
    fn test_add_dependencies_in_order() {
        let mut a = act("a");
        a.add_dependencies([
            ("toLanding", vec![Succeeded, Skipped]),
            ("toArchive", vec![Succeeded, Skipped]),
        ]);

        assert_eq!(
            a.depends_on().names().collect::<Vec<_>>(),
            vec!["toLanding", "toArchive"]
        );
        assert_eq!(a.depends_on().get("toArchive"), Some(&[Succeeded, Skipped][..]));
    }

    #[test]
    fn test_for_each_single_child_is_untouched() {
        let activity = Activity::for_each("loop", "@variables('foo')", vec![act("only")]);
        let scopes = activity.child_scopes();
        assert!(scopes[0][0].depends_on().is_empty());
    }

    #[test]
    fn test_for_each_chains_children_linearly() {
        let activity = Activity::for_each(
            "loop",
            "@variables('foo')",
            vec![act("first"), act("second"), act("third")],
        );
        let children = activity.child_scopes()[0];

        assert!(children[0].depends_on().is_empty());
        assert_eq!(children[1].depends_on().get("first"), Some(&[Succeeded][..]));
        assert_eq!(children[2].depends_on().get("second"), Some(&[Succeeded][..]));
        assert_eq!(children[2].depends_on().len(), 1);
    }

    #[test]
    fn test_if_condition_children_keep_their_dependencies() {
        let mut yes = act("yes");
        yes.add_dependency("elsewhere", &[Completed]);
        let activity = Activity::if_condition("branch", "@true", vec![yes, act("yes2")], vec![]);

        let scopes = activity.child_scopes();
        assert_eq!(scopes[0][0].depends_on().get("elsewhere"), Some(&[Completed][..]));
        assert!(scopes[0][1].depends_on().is_empty());
    }

    #[test]
    fn test_walk_visits_nested_children() {
        let inner = Activity::if_condition("if", "@true", vec![act("t")], vec![act("f")]);
        let outer = Activity::for_each("loop", "@items", vec![inner, act("after")]);

        let names: Vec<_> = outer.walk().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["loop", "if", "t", "f", "after"]);
    }

    #[test]
    fn test_parse_activity_applies_for_each_policy() {
        let yaml = r#"
name: fetch
type: for_each
items: "@variables('tables')"
depends_on: [lookup]
activities:
  - name: one
    type: wait
    seconds: 1
  - name: two
    type: set_variable
    value: bar
"#;
        let activity: Activity = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(activity.name(), "fetch");
        assert!(activity.depends_on().contains("lookup"));

        let children = activity.child_scopes()[0];
        assert_eq!(children[1].depends_on().get("one"), Some(&[Succeeded][..]));
    }
}
