// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Activity dependency sets
//!
//! An activity waits on zero or more predecessors, each with the list of
//! completion states that release it.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion state a dependency can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyCondition {
    #[serde(alias = "succeeded")]
    Succeeded,
    #[serde(alias = "failed")]
    Failed,
    #[serde(alias = "skipped")]
    Skipped,
    #[serde(alias = "completed")]
    Completed,
}

impl DependencyCondition {
    /// Conditions used when none are given
    pub const DEFAULT: &'static [DependencyCondition] = &[DependencyCondition::Succeeded];
}

impl fmt::Display for DependencyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Skipped => write!(f, "Skipped"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Insertion-ordered mapping from predecessor name to required conditions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    entries: Vec<(String, Vec<DependencyCondition>)>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the conditions for `activity`, replacing any previous entry in place.
    ///
    /// Empty `conditions` fall back to [`DependencyCondition::DEFAULT`].
    pub fn insert(&mut self, activity: impl Into<String>, conditions: &[DependencyCondition]) {
        let activity = activity.into();
        let conditions = if conditions.is_empty() {
            DependencyCondition::DEFAULT.to_vec()
        } else {
            conditions.to_vec()
        };

        match self.entries.iter_mut().find(|(name, _)| *name == activity) {
            Some((_, existing)) => *existing = conditions,
            None => self.entries.push((activity, conditions)),
        }
    }

    /// Conditions required of `activity`, if it is a predecessor
    pub fn get(&self, activity: &str) -> Option<&[DependencyCondition]> {
        self.entries
            .iter()
            .find(|(name, _)| name == activity)
            .map(|(_, conditions)| conditions.as_slice())
    }

    pub fn contains(&self, activity: &str) -> bool {
        self.get(activity).is_some()
    }

    /// Predecessor names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DependencyCondition])> {
        self.entries
            .iter()
            .map(|(name, conditions)| (name.as_str(), conditions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<DependencyCondition>)> for Dependencies {
    fn from_iter<I: IntoIterator<Item = (S, Vec<DependencyCondition>)>>(iter: I) -> Self {
        let mut deps = Dependencies::new();
        for (name, conditions) in iter {
            deps.insert(name, &conditions);
        }
        deps
    }
}

/// One element of the list form in a manifest
#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyEntry {
    Name(String),
    Full {
        activity: String,
        #[serde(default)]
        conditions: Vec<DependencyCondition>,
    },
}

/// Accepts either a list (`[a, {activity: b, conditions: [Failed]}]`) or an
/// ordered map (`{a: [Succeeded], b: [Failed, Skipped]}`).
impl<'de> Deserialize<'de> for Dependencies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DependenciesVisitor;

        impl<'de> Visitor<'de> for DependenciesVisitor {
            type Value = Dependencies;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of activity names or a map of activity name to conditions")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Dependencies::new())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut deps = Dependencies::new();
                while let Some(entry) = seq.next_element::<DependencyEntry>()? {
                    match entry {
                        DependencyEntry::Name(name) => deps.insert(name, &[]),
                        DependencyEntry::Full { activity, conditions } => {
                            deps.insert(activity, &conditions)
                        }
                    }
                }
                Ok(deps)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut deps = Dependencies::new();
                while let Some((name, conditions)) =
                    map.next_entry::<String, Option<Vec<DependencyCondition>>>()?
                {
                    deps.insert(name, &conditions.unwrap_or_default());
                }
                Ok(deps)
            }
        }

        deserializer.deserialize_any(DependenciesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DependencyCondition::*;

    #[test]
    fn test_insert_defaults_to_succeeded() {
        let mut deps = Dependencies::new();
        deps.insert("foo", &[]);
        assert_eq!(deps.get("foo"), Some(&[Succeeded][..]));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut deps = Dependencies::new();
        deps.insert("a", &[]);
        deps.insert("b", &[]);
        deps.insert("a", &[Failed, Skipped]);

        assert_eq!(deps.len(), 2);
        assert_eq!(deps.get("a"), Some(&[Failed, Skipped][..]));
        assert_eq!(deps.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_deserialize_list_form() {
        let yaml = r#"
- extract
- activity: lookup
  conditions: [Failed]
"#;
        let deps: Dependencies = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(deps.get("extract"), Some(&[Succeeded][..]));
        assert_eq!(deps.get("lookup"), Some(&[Failed][..]));
    }

    #[test]
    fn test_deserialize_map_form_keeps_order() {
        let yaml = r#"
zeta: [Succeeded, Skipped]
alpha:
mid: [completed]
"#;
        let deps: Dependencies = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(deps.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(deps.get("alpha"), Some(&[Succeeded][..]));
        assert_eq!(deps.get("mid"), Some(&[Completed][..]));
    }
}
