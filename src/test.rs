//! Fixtures shared by the unit tests.

use crate::api::SEED_CATALOG;
use crate::model::Catalog;
use crate::timew::Interval;

/// The seeded projects that are still active, which is what `GET /projects/assigned?active=true`
/// returns.
pub(crate) fn catalog() -> Catalog {
    let all = Catalog::from_json(SEED_CATALOG).unwrap();
    Catalog::new(
        all.projects()
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect(),
    )
}

/// A half-hour interval on the morning of 2025-02-28.
pub(crate) fn interval(project: &str, description: &str, tags: &[&str]) -> Interval {
    Interval::new(
        1,
        "20250228T063000Z",
        "20250228T070000Z",
        project,
        description,
        tags.iter().copied(),
    )
}

/// A Timewarrior report as it arrives on stdin. The third interval has an unknown project and the
/// fourth one is tagged as not billable.
pub(crate) const REPORT_INPUT: &str = r#"color: on
debug: off
moco.domain: acme
reports.moco.range: :week
temp.report.start: 20250224T000000Z
temp.report.end: 20250303T000000Z
verbose: on

[
{"id":4,"start":"20250228T063000Z","end":"20250228T070000Z","tags":["Acme App: Get all tests running again!","work"]},
{"id":3,"start":"20250228T073000Z","end":"20250228T081500Z","tags":["Acme App: Get all tests running again!","work"]},
{"id":2,"start":"20250228T090000Z","end":"20250228T100000Z","tags":["Globex: Quarterly planning","work"]},
{"id":1,"start":"20250228T120000Z","end":"20250228T124500Z","tags":["Laufbahndiagnostik: Support call","work","nobill"]}
]"#;
