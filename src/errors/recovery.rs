// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions for recovering from errors.

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest splitting a schedule that restricts both month days and week days
    pub fn split_schedule(expression: &str) -> Self {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let (by_month_day, by_week_day) = match fields.as_slice() {
            [minute, hour, dom, month, dow] => (
                format!("{} {} {} {} *", minute, hour, dom, month),
                format!("{} {} * {} {}", minute, hour, month, dow),
            ),
            _ => (String::new(), String::new()),
        };

        let mut commands = vec!["# Check each half on its own:".to_string()];
        if !by_month_day.is_empty() {
            commands.push(format!("adflow schedule '{}'", by_month_day));
            commands.push(format!("adflow schedule '{}'", by_week_day));
        }

        Self {
            action: "Split the schedule into two pipelines".into(),
            steps: vec![
                format!("'{}' restricts both day-of-month and day-of-week", expression),
                "A trigger recurrence supports month days or week days, not both".into(),
                "Schedule one pipeline by month day and another by week day".into(),
            ],
            commands,
        }
    }

    /// Suggest fixing a circular dependency
    pub fn fix_circular_dependency(members: &[String]) -> Self {
        Self {
            action: "Remove circular dependency".into(),
            steps: vec![
                format!("Detected cycle: {}", members.join(" → ")),
                "Review activity and pipeline dependencies".into(),
                "Ensure they form a directed acyclic graph (DAG)".into(),
            ],
            commands: vec![
                "# Visualize the pipeline:".into(),
                "adflow graph --format mermaid --pipeline <name>".into(),
            ],
        }
    }

    /// Suggest fixing a dependency on an activity that does not exist
    pub fn fix_dangling_dependency(activity: &str, dependency: &str) -> Self {
        Self {
            action: format!("Define '{}' or drop the dependency", dependency),
            steps: vec![
                format!("Activity '{}' waits on '{}'", activity, dependency),
                "Dependencies only resolve within the same pipeline".into(),
                "Activities nested in for-each or if-condition only see their siblings".into(),
            ],
            commands: vec!["adflow validate".into()],
        }
    }

    /// Suggest creating a manifest
    pub fn create_manifest() -> Self {
        Self {
            action: "Create a pipeline manifest".into(),
            steps: vec![
                "No adflow.yaml found at the given path".into(),
                "Initialize a new project or point at a manifest directory".into(),
            ],
            commands: vec![
                "# Initialize with an example manifest:".into(),
                "adflow init".into(),
            ],
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_schedule_builds_both_halves() {
        let suggestion = RecoverySuggestion::split_schedule("5 5 5 * 5");
        assert!(suggestion.commands.iter().any(|c| c.contains("'5 5 5 * *'")));
        assert!(suggestion.commands.iter().any(|c| c.contains("'5 5 * * 5'")));
    }

    #[test]
    fn test_display_lists_steps() {
        let text = RecoverySuggestion::fix_dangling_dependency("ingest", "extract").to_string();
        assert!(text.starts_with("→ Define 'extract'"));
        assert!(text.contains("Activity 'ingest' waits on 'extract'"));
    }
}
