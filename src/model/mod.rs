//! Types that represent the MOCO side of the data model: the project catalog and activities.
mod activity;
mod project;

pub use activity::Activity;
pub use project::{Catalog, Customer, Project, Task};
