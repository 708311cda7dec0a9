use crate::error::{ErrorType, IntoResult, Res};
use crate::search::Searchable;
use crate::Result;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A MOCO project the user is assigned to, as returned by `GET /projects/assigned`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl Project {
    pub fn new(id: u64, name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            tasks,
            ..Default::default()
        }
    }

    /// The tasks that time can currently be booked on.
    pub fn active_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.active).collect()
    }
}

impl Searchable for Project {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(self.name.as_str()),
            "identifier" => self.identifier.as_deref(),
            "customer" => self.customer.as_ref().map(|c| c.name.as_str()),
            _ => None,
        }
    }
}

/// A task within a MOCO project, e.g. "Software Engineering".
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

impl Task {
    pub fn new(id: u64, name: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            active,
            billable: None,
        }
    }
}

impl Searchable for Task {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(self.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
}

/// The read-only set of projects, and their tasks, that intervals are matched against.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<Project>);

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self(projects)
    }

    /// Parses a catalog from the JSON that MOCO returns for assigned projects.
    ///
    /// # Errors
    /// - Returns an `ErrorType::Config` error if `json` is not an array of projects.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .context("The project catalog must be a JSON array of projects")
            .pub_result(ErrorType::Config)
    }

    pub fn projects(&self) -> &[Project] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Project ids must be unique for activities to be attributable.
    pub(crate) fn validate(&self) -> Res<()> {
        let mut seen = HashSet::new();
        for project in &self.0 {
            ensure!(
                seen.insert(project.id),
                "The catalog contains more than one project with id {}",
                project.id
            );
        }
        Ok(())
    }
}

impl From<Vec<Project>> for Catalog {
    fn from(projects: Vec<Project>) -> Self {
        Self(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::catalog;

    #[test]
    fn test_from_json() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        let acme = &catalog.projects()[0];
        assert_eq!(acme.id, 944934716);
        assert_eq!(acme.field("name"), Some("Acme App"));
        assert_eq!(acme.field("customer"), Some("Acme Corp"));
        assert_eq!(acme.field("nope"), None);
        assert_eq!(acme.active_tasks().len(), 2);
    }

    #[test]
    fn test_from_json_not_an_array() {
        let err = Catalog::from_json(r#"{"id": 1, "name": "x"}"#).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        let err = Catalog::from_json("not json").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[test]
    fn test_missing_optional_fields() {
        let catalog = Catalog::from_json(r#"[{"id": 1, "name": "Bare"}]"#).unwrap();
        let bare = &catalog.projects()[0];
        assert!(!bare.active);
        assert!(bare.tasks.is_empty());
        assert_eq!(bare.identifier, None);
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let catalog = Catalog::new(vec![
            Project::new(1, "One", vec![]),
            Project::new(1, "Also one", vec![]),
        ]);
        assert!(catalog.validate().is_err());
        assert!(Catalog::new(vec![Project::new(1, "One", vec![])])
            .validate()
            .is_ok());
    }
}
