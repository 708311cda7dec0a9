//! Turns Timewarrior intervals into MOCO activities.
//!
//! The project is found by fuzzy matching the interval's project name against the catalog, the
//! task by ranking the project's active tasks against the interval's tags.

use crate::error::{Error, ErrorType, IntoResult, Res};
use crate::model::{Activity, Catalog, Project, Task};
use crate::search::Matcher;
use crate::timew::{parse_compact, Interval};
use crate::Result;
use anyhow::{anyhow, ensure, Context};
use tracing::{debug, warn};

/// Tags that mark an interval as not billable.
pub const NON_BILLABLE_TAGS: &[&str] = &[
    "vacation",
    "holiday",
    "sick",
    "illness",
    "ill",
    "non-billabe",
    "nobi",
    "nobill",
    "no-bill",
    "unbillable",
    "unbill",
    "un-bill",
    "nonbillable",
    "nonbill",
    "non-bill",
    "non-billable",
];

/// The context tag that Taskwarrior adds to every interval. It says nothing about the task.
const CONTEXT_TAG: &str = "work";

/// Searched for when an interval has no tags that could name a task.
const DEFAULT_TASK: &str = "software engineering";

const NAME: &[&str] = &["name"];

/// What to do when the matched project has no active task to book on.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, clap::ValueEnum)]
pub enum MissingTaskPolicy {
    /// Log a warning and produce no activity for the interval.
    #[default]
    Skip,
    /// Fail the interval with a `NotFound` error.
    Fail,
}

/// Converts intervals into activities using a fixed, read-only catalog.
#[derive(Debug)]
pub struct IntervalTransformer {
    catalog: Catalog,
    matcher: Matcher,
    missing_task: MissingTaskPolicy,
}

impl IntervalTransformer {
    /// Creates a transformer for `catalog`. An empty catalog is allowed but every interval will
    /// then fail to find its project.
    ///
    /// # Errors
    /// - Returns an `ErrorType::Config` error if the catalog is not well-formed.
    pub fn new(catalog: impl Into<Catalog>) -> Result<Self> {
        let catalog = catalog.into();
        catalog
            .validate()
            .context("Unable to use the project catalog")
            .pub_result(ErrorType::Config)?;
        if catalog.is_empty() {
            warn!("No projects provided to the interval transformer");
        }
        Ok(Self {
            catalog,
            matcher: Matcher::default(),
            missing_task: MissingTaskPolicy::default(),
        })
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_missing_task_policy(mut self, policy: MissingTaskPolicy) -> Self {
        self.missing_task = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Transforms one interval into an activity.
    ///
    /// Returns `Ok(None)` when the project was found but has no active tasks and the
    /// `MissingTaskPolicy` is `Skip`.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if start, end or project is missing, a timestamp cannot be parsed,
    ///   or the interval ends before it starts.
    /// - `ErrorType::NotFound` if no project matches well enough, or if there is no active task and
    ///   the policy is `Fail`.
    /// - `ErrorType::Config` if the matched project has no tasks at all.
    pub fn to_activity(&self, interval: &Interval) -> Result<Option<Activity>> {
        validate(interval)
            .with_context(|| format!("Interval {} is invalid", interval.id()))
            .pub_result(ErrorType::Validation)?;

        let project = self.find_project(interval.project())?;
        let Some(task) = self.find_task(interval, project)? else {
            return Ok(None);
        };

        let (date, seconds) = elapsed(interval)
            .with_context(|| {
                format!(
                    "Unable to calculate the duration of interval {}",
                    interval.id()
                )
            })
            .pub_result(ErrorType::Validation)?;

        let billable = if interval.tags().iter().any(|t| is_non_billable(t)) {
            Some(false)
        } else {
            None
        };

        debug!(
            "Interval {} -> project '{}' ({}), task '{}' ({}), {seconds}s on {date}",
            interval.id(),
            project.name,
            project.id,
            task.name,
            task.id
        );

        Ok(Some(Activity {
            project_id: project.id,
            task_id: task.id,
            date,
            seconds,
            description: interval.description().to_string(),
            billable,
        }))
    }

    fn find_project(&self, name: &str) -> Result<&Project> {
        let project = self
            .matcher
            .find_best(self.catalog.projects(), name, NAME)
            .ok_or_else(|| {
                Error::new(
                    ErrorType::NotFound,
                    anyhow!(
                        "No matching project for interval with project name '{name}' \
                        (similarity threshold {})",
                        self.matcher.threshold()
                    ),
                )
            })?;
        if project.tasks.is_empty() {
            return Err(Error::new(
                ErrorType::Config,
                anyhow!(
                    "Project '{}' (ID: {}) has no tasks defined",
                    project.name,
                    project.id
                ),
            ));
        }
        Ok(project)
    }

    fn find_task<'p>(
        &self,
        interval: &Interval,
        project: &'p Project,
    ) -> Result<Option<&'p Task>> {
        let terms = search_terms(interval.tags());
        let active = project.active_tasks();
        if active.is_empty() {
            return match self.missing_task {
                MissingTaskPolicy::Skip => {
                    warn!(
                        "No active tasks found for project '{}', skipping interval {}",
                        project.name,
                        interval.id()
                    );
                    Ok(None)
                }
                MissingTaskPolicy::Fail => Err(Error::new(
                    ErrorType::NotFound,
                    anyhow!(
                        "No active tasks found for project '{}' (interval {})",
                        project.name,
                        interval.id()
                    ),
                )),
            };
        }
        let ranked = self.matcher.rank(&active, &terms, NAME);
        Ok(ranked.first().map(|r| *r.item))
    }
}

/// Whether `tag` is one of the `NON_BILLABLE_TAGS`.
pub fn is_non_billable(tag: &str) -> bool {
    NON_BILLABLE_TAGS.contains(&tag)
}

/// The tags that may name a task: everything except the context tag and non-billable markers.
fn search_terms(tags: &[String]) -> Vec<&str> {
    let terms: Vec<&str> = tags
        .iter()
        .map(String::as_str)
        .filter(|t| *t != CONTEXT_TAG && !is_non_billable(t))
        .collect();
    if terms.is_empty() {
        vec![DEFAULT_TASK]
    } else {
        terms
    }
}

fn validate(interval: &Interval) -> Res<()> {
    ensure!(
        !interval.start().is_empty() && !interval.end().is_empty(),
        "Interval must have start and end dates"
    );
    ensure!(
        !interval.project().is_empty(),
        "Interval must have a project name"
    );
    Ok(())
}

/// Returns the UTC date of the start and the elapsed seconds.
fn elapsed(interval: &Interval) -> Res<(String, u64)> {
    let start = parse_compact(interval.start()).context("Invalid start")?;
    let end = parse_compact(interval.end()).context("Invalid end")?;
    ensure!(
        end >= start,
        "End date {} is before start date {}",
        interval.end(),
        interval.start()
    );
    let seconds = u64::try_from((end - start).num_seconds())?;
    Ok((start.date_naive().format("%Y-%m-%d").to_string(), seconds))
}
