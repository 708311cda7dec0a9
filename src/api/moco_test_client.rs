//! Implements the `Moco` trait in memory for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a MOCO account.

use crate::api::Moco;
use crate::error::Res;
use crate::model::{Activity, Catalog};
use tracing::info;

/// An implementation of the `Moco` trait that keeps its catalog in memory and records submitted
/// activities instead of sending them anywhere. By default it is seeded with `SEED_CATALOG`.
pub(crate) struct TestMoco {
    catalog: Catalog,
    submitted: Vec<Activity>,
}

impl TestMoco {
    pub(crate) fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            submitted: Vec::new(),
        }
    }

    /// Every activity passed to `create_activities` so far.
    #[cfg(test)]
    pub(crate) fn submitted(&self) -> &[Activity] {
        &self.submitted
    }
}

impl Default for TestMoco {
    fn default() -> Self {
        // The seed is a compile-time constant that is covered by tests.
        let catalog = serde_json::from_str(SEED_CATALOG).unwrap_or_default();
        Self::new(catalog)
    }
}

#[async_trait::async_trait]
impl Moco for TestMoco {
    async fn assigned_projects(&mut self, active_only: bool) -> Res<Catalog> {
        let projects = self
            .catalog
            .projects()
            .iter()
            .filter(|p| !active_only || p.active)
            .cloned()
            .collect::<Vec<_>>();
        Ok(Catalog::new(projects))
    }

    async fn create_activities(&mut self, activities: &[Activity]) -> Res<()> {
        info!("Test mode: recording {} activities", activities.len());
        self.submitted.extend_from_slice(activities);
        Ok(())
    }
}

/// Seed project data, in the shape returned by `GET /projects/assigned`.
pub(crate) const SEED_CATALOG: &str = r##"[
  {
    "id": 944934716,
    "identifier": "AA-01",
    "name": "Acme App",
    "active": true,
    "billable": true,
    "customer": { "id": 1001, "name": "Acme Corp" },
    "tasks": [
      { "id": 3281058, "name": "Software Engineering", "active": true, "billable": true },
      { "id": 3281059, "name": "Project Management", "active": true, "billable": true },
      { "id": 3281060, "name": "Legacy Support", "active": false, "billable": true }
    ]
  },
  {
    "id": 944959964,
    "identifier": "LD-07",
    "name": "Laufbahndiagnostik",
    "active": true,
    "billable": true,
    "customer": { "id": 1002, "name": "Career Lab" },
    "tasks": [
      { "id": 3492148, "name": "Software Engineering", "active": true, "billable": true },
      { "id": 3492153, "name": "Support, Maintenance & Operations", "active": true, "billable": true },
      { "id": 3492154, "name": "Consulting", "active": true, "billable": false }
    ]
  },
  {
    "id": 944970001,
    "identifier": "DW-02",
    "name": "Dormant Website",
    "active": true,
    "billable": false,
    "customer": { "id": 1001, "name": "Acme Corp" },
    "tasks": [
      { "id": 3500001, "name": "Design", "active": false, "billable": false }
    ]
  },
  {
    "id": 944980000,
    "identifier": "ES-01",
    "name": "Empty Shell",
    "active": true,
    "billable": false,
    "customer": { "id": 1003, "name": "Initech" },
    "tasks": []
  },
  {
    "id": 944990000,
    "identifier": "RI-99",
    "name": "Retired Intranet",
    "active": false,
    "billable": true,
    "customer": { "id": 1003, "name": "Initech" },
    "tasks": [
      { "id": 3600001, "name": "Software Engineering", "active": true, "billable": true }
    ]
  }
]"##;
