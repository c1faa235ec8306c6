// View models returned to the presentation layer (JSON, camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobColor {
    Blue,
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStyle {
    pub color: JobColor,
    pub weight: FontWeight,
}

impl JobStyle {
    /// Inline CSS, e.g. `color: red; font-weight: bold`.
    pub fn css(&self) -> String {
        let color = match self.color {
            JobColor::Blue => "blue",
            JobColor::Green => "green",
            JobColor::Red => "red",
        };
        let weight = match self.weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        };
        format!("color: {}; font-weight: {}", color, weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub sequence_number: usize,
    pub elapsed_display: String,
    pub etc_display: String,
    pub short_name: String,
    pub link: String,
    pub style: JobStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeView {
    pub sequence_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<usize>,
    pub total_wait_display: String,
    pub id: String,
    pub url: Option<String>,
    pub project: String,
    pub user_display: String,
    pub jobs: Vec<JobView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateCounts {
    pub running: u64,
    pub queued: u64,
    pub complete: u64,
    pub active: u64,
    pub total: u64,
}

impl AggregateCounts {
    pub fn add_running(&mut self) {
        self.running += 1;
        self.sync_totals();
    }

    pub fn add_queued(&mut self) {
        self.queued += 1;
        self.sync_totals();
    }

    pub fn add_complete(&mut self) {
        self.complete += 1;
        self.sync_totals();
    }

    fn sync_totals(&mut self) {
        self.active = self.running + self.queued;
        self.total = self.active + self.complete;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// Requested queue name, or "all".
    pub queue_name: String,
    pub changes: Vec<ChangeView>,
    pub counts: AggregateCounts,
    /// Largest known job ETC in the view: time until the visible queue drains.
    pub drain_display: String,
    pub generated_at: DateTime<Utc>,
}
