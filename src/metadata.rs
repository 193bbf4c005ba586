use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    /// Calendar date of day 0, used to print offsets as dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_start_date: Option<NaiveDate>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            project_description: "No description".to_string(),
            project_start_date: None,
        }
    }
}

impl ProjectMetadata {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Calendar date of a day offset, when the start date is known and the
    /// offset lands inside chrono's date range.
    pub fn date_at(&self, offset: f64) -> Option<NaiveDate> {
        if !offset.is_finite() {
            return None;
        }
        let start = self.project_start_date?;
        start.checked_add_signed(TimeDelta::try_days(offset.floor() as i64)?)
    }
}
