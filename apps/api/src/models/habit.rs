use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::models::{clamp_count, merge, Resource};
use crate::store::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// A tracked habit. `completions` counts how many times the habit was done
/// on each calendar day; `target` is the count that makes a day complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target: u32,
    pub frequency: Frequency,
    pub completions: BTreeMap<NaiveDate, u32>,
    pub created_at: DateTime<Utc>,
}

impl Default for Habit {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            target: 1,
            frequency: Frequency::default(),
            completions: BTreeMap::new(),
            created_at: DateTime::<Utc>::default(),
        }
    }
}

/// Completion counts are merged per date; dates absent from the patch keep
/// their stored counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HabitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<BTreeMap<NaiveDate, i64>>,
    /// Server-managed; accepted so a fetched record can be sent back whole, then dropped.
    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<IgnoredAny>,
}

impl Habit {
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.completions.get(&date).copied().unwrap_or(0)
    }

    pub fn is_complete_on(&self, date: NaiveDate) -> bool {
        self.count_on(date) >= self.target.max(1)
    }
}

impl Resource for Habit {
    const COLLECTION: &'static str = "habits";
    const LABEL: &'static str = "Habit";

    type Patch = HabitPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, patch: HabitPatch, now: DateTime<Utc>) -> Self {
        let mut habit = Habit {
            id,
            created_at: now,
            ..Default::default()
        };
        habit.apply(patch, now);
        habit
    }

    fn apply(&mut self, patch: HabitPatch, _now: DateTime<Utc>) {
        merge(&mut self.name, patch.name);
        merge(&mut self.description, patch.description);
        merge(&mut self.target, patch.target.map(clamp_count));
        merge(&mut self.frequency, patch.frequency);
        for (date, count) in patch.completions.unwrap_or_default() {
            self.completions.insert(date, clamp_count(count));
        }
    }

    fn collection(doc: &Document) -> &Vec<Self> {
        &doc.habits
    }

    fn collection_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.habits
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_new_habit_has_empty_completions() {
        let habit = Habit::create("1".into(), HabitPatch::default(), Utc::now());
        assert!(habit.completions.is_empty());
        assert_eq!(habit.target, 1);
        assert_eq!(habit.frequency, Frequency::Daily);
    }

    #[test]
    fn test_completions_merge_per_date() {
        let mut habit = Habit::create(
            "123".into(),
            HabitPatch {
                target: Some(8),
                completions: Some(BTreeMap::from([(day(1), 3), (day(2), 8)])),
                ..Default::default()
            },
            Utc::now(),
        );
        habit.apply(
            HabitPatch {
                completions: Some(BTreeMap::from([(day(3), 5)])),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(habit.count_on(day(1)), 3);
        assert_eq!(habit.count_on(day(2)), 8);
        assert_eq!(habit.count_on(day(3)), 5);
        assert_eq!(habit.target, 8);
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let mut habit = Habit::create("1".into(), HabitPatch::default(), Utc::now());
        habit.apply(
            HabitPatch {
                completions: Some(BTreeMap::from([(day(1), -2)])),
                target: Some(-1),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(habit.count_on(day(1)), 0);
        assert_eq!(habit.target, 0);
    }

    #[test]
    fn test_is_complete_on_uses_target() {
        let habit = Habit::create(
            "1".into(),
            HabitPatch {
                target: Some(2),
                completions: Some(BTreeMap::from([(day(1), 2), (day(2), 1)])),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(habit.is_complete_on(day(1)));
        assert!(!habit.is_complete_on(day(2)));
        assert!(!habit.is_complete_on(day(3)));
    }

    #[test]
    fn test_completions_serialize_with_iso_keys() {
        let habit = Habit::create(
            "1".into(),
            HabitPatch {
                completions: Some(BTreeMap::from([(day(3), 5)])),
                ..Default::default()
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["completions"]["2024-06-03"], 5);
    }
}
