//! Merges activities that were booked on the same day, for the same project, with the same
//! description.

use crate::model::Activity;
use std::collections::HashMap;
use tracing::trace;

/// Drops absent activities and merges the rest by `(date, project_id, description)`.
///
/// The first activity seen for a key is kept and the seconds of later ones are added to it. The
/// output is ordered by the first appearance of each key, so running this on its own output
/// changes nothing.
pub fn summarize<I>(activities: I) -> Vec<Activity>
where
    I: IntoIterator<Item = Option<Activity>>,
{
    let mut summarized: Vec<Activity> = Vec::new();
    let mut index: HashMap<(String, u64, String), usize> = HashMap::new();

    for activity in activities.into_iter().flatten() {
        let key = (
            activity.date.clone(),
            activity.project_id,
            activity.description.clone(),
        );
        match index.get(&key) {
            Some(&ix) => {
                trace!(
                    "Merging {}s into '{}'",
                    activity.seconds,
                    activity.description
                );
                summarized[ix].seconds += activity.seconds;
            }
            None => {
                index.insert(key, summarized.len());
                summarized.push(activity);
            }
        }
    }
    summarized
}
