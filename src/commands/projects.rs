use crate::api::{self, Moco};
use crate::args::Common;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Catalog;
use crate::timew::ReportConfig;
use crate::{Config, Mode, Result};

/// Lists the active projects the user is assigned to, with their tasks. Useful for finding the
/// names to put in the first tag of an interval.
pub async fn projects(common: &Common, mode: Mode) -> Result<Out<Catalog>> {
    let config = Config::resolve(common, &ReportConfig::default())?;
    let mut moco = api::moco(&config, mode).pub_result(ErrorType::Config)?;
    projects_with(moco.as_mut()).await
}

pub(crate) async fn projects_with(moco: &mut (dyn Moco + Send)) -> Result<Out<Catalog>> {
    let catalog = moco
        .assigned_projects(true)
        .await
        .pub_result(ErrorType::Service)?;
    if catalog.is_empty() {
        return Ok(Out::new("You are not assigned to any active projects", catalog));
    }

    let mut message = format!("You are assigned to {} active projects:", catalog.len());
    for project in catalog.projects() {
        message.push_str(&format!("\n{} ({})", project.name, project.id));
        if let Some(customer) = &project.customer {
            message.push_str(&format!(" for {}", customer.name));
        }
        for task in &project.tasks {
            let inactive = if task.active { "" } else { ", inactive" };
            message.push_str(&format!("\n  - {} ({}{inactive})", task.name, task.id));
        }
    }
    Ok(Out::new(message, catalog))
}
