use serde::{Deserialize, Serialize};

use crate::models::{clamp_count, merge, Singleton};
use crate::store::Document;

/// Daily summary counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeSummary {
    pub pending_tasks: u32,
    pub habits_today: u32,
    pub appointments: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HomePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_tasks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habits_today: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<i64>,
}

impl Singleton for HomeSummary {
    const KEY: &'static str = "home";

    type Patch = HomePatch;

    fn apply(&mut self, patch: HomePatch) {
        merge(&mut self.pending_tasks, patch.pending_tasks.map(clamp_count));
        merge(&mut self.habits_today, patch.habits_today.map(clamp_count));
        merge(&mut self.appointments, patch.appointments.map(clamp_count));
    }

    fn get(doc: &Document) -> &Self {
        &doc.home
    }

    fn get_mut(doc: &mut Document) -> &mut Self {
        &mut doc.home
    }
}
