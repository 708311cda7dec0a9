use crate::api::{self, Moco};
use crate::args::{Common, ReportArgs};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Activity, Catalog};
use crate::summarize::summarize;
use crate::timew::Report;
use crate::transform::IntervalTransformer;
use crate::{utils, Config, Mode, Result};
use serde::Serialize;
use tracing::{info, warn};

/// What the `report` command produced.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ReportOutput {
    /// The merged activities, in the order their first interval appeared.
    pub activities: Vec<Activity>,
    /// Intervals that did not become an activity.
    pub skipped: Vec<Skipped>,
    /// Whether the activities were created in MOCO.
    pub submitted: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Skipped {
    pub interval: u64,
    pub reason: String,
}

/// Reads a Timewarrior report, converts its intervals into activities and, if `args.submit()`,
/// creates them in MOCO.
pub async fn report(common: &Common, args: &ReportArgs, mode: Mode) -> Result<Out<ReportOutput>> {
    let input = match args.input() {
        Some(path) => utils::read(path).await,
        None => utils::read_stdin().await,
    }
    .pub_result(ErrorType::Io)?;

    let report = Report::parse(&input)?;
    if report.config().debug() {
        info!("Timewarrior configuration: {:?}", report.config());
    }
    let config = Config::resolve(common, report.config())?;

    if report.intervals().is_empty() {
        return Ok(Out::new(
            "There are no intervals in the report",
            ReportOutput::default(),
        ));
    }

    let mut moco = api::moco(&config, mode).pub_result(ErrorType::Config)?;
    report_with(moco.as_mut(), &config, &report, args).await
}

pub(crate) async fn report_with(
    moco: &mut (dyn Moco + Send),
    config: &Config,
    report: &Report,
    args: &ReportArgs,
) -> Result<Out<ReportOutput>> {
    let catalog = moco
        .assigned_projects(true)
        .await
        .pub_result(ErrorType::Service)?;
    let transformer = IntervalTransformer::new(catalog)?
        .with_matcher(config.matcher())
        .with_missing_task_policy(args.missing_task_policy());

    let mut drafts = Vec::with_capacity(report.intervals().len());
    let mut skipped = Vec::new();
    for interval in report.intervals() {
        match transformer.to_activity(interval) {
            Ok(Some(activity)) => drafts.push(Some(activity)),
            Ok(None) => skipped.push(Skipped {
                interval: interval.id(),
                reason: format!("No active task for project '{}'", interval.project()),
            }),
            Err(e) if args.strict() => return Err(e),
            Err(e) => {
                warn!("Skipping interval {}: {e}", interval.id());
                skipped.push(Skipped {
                    interval: interval.id(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let activities = summarize(drafts);
    let submitted = args.submit() && !activities.is_empty();
    if submitted {
        moco.create_activities(&activities)
            .await
            .pub_result(ErrorType::Service)?;
    }

    let mut message = if activities.is_empty() {
        "No activities to create".to_string()
    } else if submitted {
        format!("Created {} activities in MOCO:", activities.len())
    } else {
        format!(
            "{} activities are ready, pass --submit to create them in MOCO:",
            activities.len()
        )
    };
    for activity in &activities {
        message.push('\n');
        message.push_str(&describe(activity, transformer.catalog()));
    }
    if !skipped.is_empty() {
        message.push_str(&format!("\nSkipped {} interval(s)", skipped.len()));
    }

    Ok(Out::new(
        message,
        ReportOutput {
            activities,
            skipped,
            submitted,
        },
    ))
}

/// One line per activity, e.g. `2025-02-28  1:15  Acme App / Software Engineering  Fix login`.
fn describe(activity: &Activity, catalog: &Catalog) -> String {
    let project = catalog
        .projects()
        .iter()
        .find(|p| p.id == activity.project_id);
    let task = project.and_then(|p| p.tasks.iter().find(|t| t.id == activity.task_id));
    let project = project.map_or("?", |p| p.name.as_str());
    let task = task.map_or("?", |t| t.name.as_str());
    let mut line = format!(
        "{}  {:>5}  {project} / {task}  {}",
        activity.date,
        activity.duration(),
        activity.description
    );
    if activity.billable == Some(false) {
        line.push_str("  (not billable)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestMoco;
    use crate::test::REPORT_INPUT;
    use crate::transform::MissingTaskPolicy;
    use tracing_subscriber::filter::LevelFilter;

    fn common() -> Common {
        Common::new(LevelFilter::INFO, None, None, None)
    }

    fn config() -> Config {
        Config::new("acme", "key")
    }

    fn args(submit: bool, strict: bool) -> ReportArgs {
        ReportArgs::new(None, submit, strict, MissingTaskPolicy::Skip)
    }

    fn report_of(intervals: &str) -> Report {
        Report::parse(&format!("verbose: 1\n\n[{intervals}]")).unwrap()
    }

    #[tokio::test]
    async fn test_dry_run() {
        let mut moco = TestMoco::default();
        let report = Report::parse(REPORT_INPUT).unwrap();
        let out = report_with(&mut moco, &config(), &report, &args(false, false))
            .await
            .unwrap();
        let output = out.structure().unwrap();

        assert!(!output.submitted);
        assert!(moco.submitted().is_empty());
        assert_eq!(output.activities.len(), 2);

        let acme = &output.activities[0];
        assert_eq!(acme.project_id, 944934716);
        assert_eq!(acme.task_id, 3281058);
        assert_eq!(acme.date, "2025-02-28");
        assert_eq!(acme.seconds, 4500);
        assert_eq!(acme.description, "Get all tests running again!");
        assert_eq!(acme.billable, None);

        let career = &output.activities[1];
        assert_eq!(career.project_id, 944959964);
        assert_eq!(career.task_id, 3492148);
        assert_eq!(career.seconds, 2700);
        assert_eq!(career.billable, Some(false));

        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].interval, 2);

        assert!(out.message().contains("pass --submit"));
        assert!(out
            .message()
            .contains("Acme App / Software Engineering  Get all tests running again!"));
        assert!(out.message().contains("(not billable)"));
        assert!(out.message().contains("Skipped 1 interval(s)"));
    }

    #[tokio::test]
    async fn test_submit() {
        let mut moco = TestMoco::default();
        let report = Report::parse(REPORT_INPUT).unwrap();
        let out = report_with(&mut moco, &config(), &report, &args(true, false))
            .await
            .unwrap();
        let output = out.structure().unwrap();
        assert!(output.submitted);
        assert_eq!(moco.submitted(), output.activities.as_slice());
        assert!(out.message().starts_with("Created 2 activities in MOCO"));
    }

    #[tokio::test]
    async fn test_strict_stops_at_first_failure() {
        let mut moco = TestMoco::default();
        let report = Report::parse(REPORT_INPUT).unwrap();
        let err = report_with(&mut moco, &config(), &report, &args(true, true))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert!(moco.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_project_without_active_tasks() {
        let report = report_of(
            r#"{"id":9,"start":"20250228T063000Z","end":"20250228T070000Z","tags":["Dormant Website: Refresh"]}"#,
        );

        let mut moco = TestMoco::default();
        let out = report_with(&mut moco, &config(), &report, &args(true, false))
            .await
            .unwrap();
        let output = out.structure().unwrap();
        assert!(output.activities.is_empty());
        assert!(!output.submitted);
        assert_eq!(output.skipped[0].interval, 9);
        assert_eq!(out.message(), "No activities to create\nSkipped 1 interval(s)");

        let fail = ReportArgs::new(None, true, false, MissingTaskPolicy::Fail);
        let out = report_with(&mut moco, &config(), &report, &fail)
            .await
            .unwrap();
        let skipped = &out.structure().unwrap().skipped;
        assert!(skipped[0].reason.starts_with("not_found error"), "{skipped:?}");

        let strict = ReportArgs::new(None, true, true, MissingTaskPolicy::Fail);
        let err = report_with(&mut moco, &config(), &report, &strict)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_interval_is_skipped() {
        let report = report_of(
            r#"{"id":5,"start":"20250228T063000Z","tags":["Acme App: Still running"]},
               {"id":6,"start":"20250228T070000Z","end":"20250228T063000Z","tags":["Acme App: Backwards"]},
               {"id":7,"start":"20250228T063000Z","end":"20250228T064500Z","tags":["Acme App: Fine","project management"]}"#,
        );
        let mut moco = TestMoco::default();
        let out = report_with(&mut moco, &config(), &report, &args(false, false))
            .await
            .unwrap();
        let output = out.structure().unwrap();
        let skipped: Vec<u64> = output.skipped.iter().map(|s| s.interval).collect();
        assert_eq!(skipped, vec![5, 6]);
        assert_eq!(output.activities.len(), 1);
        assert_eq!(output.activities[0].task_id, 3281059);
        assert_eq!(output.activities[0].seconds, 900);
    }

    #[tokio::test]
    async fn test_report_from_file_in_test_mode() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        tokio::fs::write(&path, REPORT_INPUT).await.unwrap();

        let args = ReportArgs::new(Some(path), true, false, MissingTaskPolicy::Skip);
        let out = report(&common(), &args, Mode::Test).await.unwrap();
        let output = out.structure().unwrap();
        assert!(output.submitted);
        assert_eq!(output.activities.len(), 2);
    }

    #[tokio::test]
    async fn test_report_without_intervals() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        tokio::fs::write(&path, "moco.domain: acme\n\n[]").await.unwrap();

        let args = ReportArgs::new(Some(path), true, false, MissingTaskPolicy::Skip);
        // Mode::Moco would fail without an API key, so no client is created for an empty report.
        let out = report(&common(), &args, Mode::Moco).await.unwrap();
        assert_eq!(out.message(), "There are no intervals in the report");
        assert!(out.structure().unwrap().activities.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        tokio::fs::write(&path, REPORT_INPUT).await.unwrap();

        let args = ReportArgs::new(Some(path), false, false, MissingTaskPolicy::Skip);
        let err = report(&common(), &args, Mode::Moco).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = ReportArgs::new(
            Some(dir.path().join("nope.txt")),
            false,
            false,
            MissingTaskPolicy::Skip,
        );
        let err = report(&common(), &args, Mode::Test).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }

    #[test]
    fn test_describe_unknown_project() {
        let activity = Activity {
            project_id: 1,
            task_id: 2,
            date: "2025-02-28".into(),
            seconds: 3600,
            description: "Something".into(),
            billable: None,
        };
        assert_eq!(
            describe(&activity, &Catalog::default()),
            "2025-02-28   1:00  ? / ?  Something"
        );
    }
}
