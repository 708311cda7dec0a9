use serde::{Deserialize, Serialize};

/// A MOCO activity, i.e. a booked time entry, in the shape expected by `POST /activities/bulk`.
///
/// `billable` is only ever set to `Some(false)` and is left out of the JSON otherwise, in which
/// case MOCO uses the billability of the project and task.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub project_id: u64,
    pub task_id: u64,
    /// The calendar day in `YYYY-MM-DD` form.
    pub date: String,
    pub seconds: u64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

impl Activity {
    /// Formats `seconds` as `H:MM`.
    pub fn duration(&self) -> String {
        let minutes = self.seconds / 60;
        format!("{}:{:02}", minutes / 60, minutes % 60)
    }
}
