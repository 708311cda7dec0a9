use serde::{Deserialize, Serialize};

/// One interval exactly as it appears in the Timewarrior JSON export.
///
/// A running interval has no `end` and an untagged interval has no `tags`; both default to empty.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawInterval {
    pub id: u64,
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An interval whose first tag has been split into a project and a description.
///
/// The first tag is expected to look like `acme app: Fix the login form`. When it does not, both
/// `project` and `description` are empty and the transformer will reject the interval.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    id: u64,
    start: String,
    end: String,
    project: String,
    description: String,
    tags: Vec<String>,
    /// The first tag as it was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Interval {
    pub fn new<S1, S2, S3, S4, S5>(
        id: u64,
        start: S1,
        end: S2,
        project: S3,
        description: S4,
        tags: impl IntoIterator<Item = S5>,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
        S5: Into<String>,
    {
        Self {
            id,
            start: start.into(),
            end: end.into(),
            project: project.into(),
            description: description.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            label: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_times(mut self, start: &str, end: &str) -> Self {
        self.start = start.to_string();
        self.end = end.to_string();
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// The lowercased project name from the first tag.
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The tags after the first one.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Every tag as it was recorded, including the first.
    pub fn recorded_tags(&self) -> Vec<&str> {
        self.label
            .iter()
            .chain(self.tags.iter())
            .map(String::as_str)
            .collect()
    }
}

impl From<RawInterval> for Interval {
    fn from(raw: RawInterval) -> Self {
        let mut tags = raw.tags.into_iter();
        let label = tags.next();
        let (project, description) = label
            .as_deref()
            .and_then(split_label)
            .unwrap_or_default();
        Self {
            id: raw.id,
            start: raw.start,
            end: raw.end,
            project,
            description,
            tags: tags.collect(),
            label,
        }
    }
}

/// Splits `Project Name: some description` into the lowercased project and the trimmed
/// description. The project may not contain a colon and both parts must be non-empty.
fn split_label(label: &str) -> Option<(String, String)> {
    let (project, description) = label.split_once(':')?;
    let description = description.trim();
    if project.is_empty() || description.is_empty() {
        return None;
    }
    Some((project.to_lowercase(), description.to_string()))
}
