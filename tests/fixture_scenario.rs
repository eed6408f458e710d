use std::sync::Arc;

use skillgap_roi::acquisition::{AcquisitionController, AcquisitionState, DataOrigin, OfflineSource};
use skillgap_roi::analysis::{run_analysis, AnalysisReport, AnalysisRun};
use skillgap_roi::coverage::build_coverage_matrix;
use skillgap_roi::fixture::OpportunityFixture;
use skillgap_roi::roi::{compute_roi_report, evaluate_investment, RoiReportEntry, RoiTier};
use skillgap_roi::types::AnalysisRequest;

const EPS: f64 = 1e-6;

async fn offline_report() -> AnalysisReport {
    let mut controller =
        AcquisitionController::new(Arc::new(OfflineSource), OpportunityFixture::bundled());
    let run = run_analysis(&mut controller, &AnalysisRequest::new("demo-user", 5)).await;
    assert_eq!(controller.state(), AcquisitionState::Fallback);
    match run {
        AnalysisRun::Completed(report) => report,
        AnalysisRun::Exhausted { diagnostic } => panic!("fixture should resolve: {diagnostic}"),
    }
}

fn entry<'a>(report: &'a [RoiReportEntry], skill: &str) -> &'a RoiReportEntry {
    report
        .iter()
        .find(|e| e.skill == skill)
        .unwrap_or_else(|| panic!("missing entry for {skill}"))
}

#[tokio::test]
async fn transport_fault_yields_fixture_report() {
    let report = offline_report().await;
    assert_eq!(report.origin, DataOrigin::Fixture);
    assert!(report.last_error.is_some());
    assert_eq!(report.opportunities_considered, 5);
    assert_eq!(report.roi.len(), 6);
    assert_eq!(report.coverage.len(), 11);
}

#[tokio::test]
async fn fixture_tiers_and_premiums() {
    let report = offline_report().await;
    let roi = &report.roi;

    let ml = entry(roi, "Machine Learning");
    assert_eq!((ml.count_with_skill, ml.total_jobs), (1, 5));
    assert!((ml.opportunity_weight() - 0.2).abs() < EPS);
    assert_eq!(ml.tier, RoiTier::NiceToHave);
    assert_eq!(ml.priority, 4);
    assert!((ml.avg_salary_with_skill - 115_000.0).abs() < EPS);
    assert!((ml.salary_premium - 23_000.0).abs() < EPS);
    assert!((ml.opportunity_increase - 20.0).abs() < EPS);

    let stats = entry(roi, "Advanced Statistics");
    assert_eq!(stats.count_with_skill, 2);
    assert!((stats.opportunity_weight() - 0.4).abs() < EPS);
    assert_eq!(stats.tier, RoiTier::StrategicValue);
    assert_eq!(stats.priority, 3);
    // (88,000 + 115,000) / 2 = 101,500; * 0.4
    assert!((stats.avg_salary_with_skill - 101_500.0).abs() < EPS);
    assert!((stats.salary_premium - 40_600.0).abs() < EPS);

    let tableau = entry(roi, "Tableau");
    assert_eq!(tableau.tier, RoiTier::Mandatory);
    // (72 + 88 + 81 + 115 + 104) * 1000 / 5
    assert!((tableau.avg_salary_with_skill - 92_000.0).abs() < EPS);
    assert!((tableau.salary_premium - 92_000.0).abs() < EPS);

    let cloud = entry(roi, "Cloud Platforms");
    assert_eq!(cloud.tier, RoiTier::HighPriority);
    assert!((cloud.avg_salary_with_skill - 89_000.0).abs() < EPS);
    assert!((cloud.salary_premium - 71_200.0).abs() < EPS);
}

#[tokio::test]
async fn fixture_order_is_priority_then_first_seen() {
    let report = offline_report().await;
    let order = report
        .roi
        .iter()
        .map(|e| (e.skill.as_str(), e.priority))
        .collect::<Vec<_>>();
    assert_eq!(
        order,
        vec![
            ("Tableau", 1),
            ("Cloud Platforms", 2),
            ("Advanced Statistics", 3),
            ("Data Warehousing", 3),
            ("Machine Learning", 4),
            ("dbt", 4),
        ]
    );
}

#[test]
fn fixture_coverage_matrix() {
    let response = OpportunityFixture::bundled().load(5).expect("fixture");
    let matrix = build_coverage_matrix(&response);
    assert_eq!(
        matrix.labels,
        vec![
            "Python",
            "SQL",
            "Data Analysis",
            "Excel",
            "PowerBI",
            "Tableau",
            "Cloud Platforms",
            "Advanced Statistics",
            "Data Warehousing",
            "Machine Learning",
            "dbt",
        ]
    );
    assert_eq!(matrix.user_series, vec![5, 5, 5, 5, 5, 0, 0, 0, 0, 0, 0]);
    assert_eq!(matrix.demand_series, vec![5, 5, 5, 5, 5, 5, 4, 2, 2, 1, 1]);
    assert_eq!(matrix.labels.len(), matrix.user_series.len());
    assert_eq!(matrix.labels.len(), matrix.demand_series.len());
}

#[test]
fn computations_do_not_disturb_each_other() {
    let response = OpportunityFixture::bundled().load(5).expect("fixture");
    let report_first = compute_roi_report(&response);
    let matrix = build_coverage_matrix(&response);
    let report_second = compute_roi_report(&response);
    assert_eq!(report_first, report_second);
    assert_eq!(matrix, build_coverage_matrix(&response));
}

#[test]
fn investment_on_fixture_skill() {
    let response = OpportunityFixture::bundled().load(5).expect("fixture");
    let report = compute_roi_report(&response);
    let roi = evaluate_investment(&report, "Machine Learning", 4_600.0).expect("roi");
    assert!((roi.expected_return - 23_000.0).abs() < EPS);
    assert!((roi.roi_percentage - 400.0).abs() < EPS);
}

#[tokio::test]
async fn malformed_fixture_reaches_exhaustion() {
    let mut controller = AcquisitionController::new(
        Arc::new(OfflineSource),
        OpportunityFixture::from_json(r#"{"top_opportunities": "nope"}"#),
    );
    let run = run_analysis(&mut controller, &AnalysisRequest::new("demo-user", 5)).await;
    let AnalysisRun::Exhausted { diagnostic } = run else {
        panic!("expected exhaustion");
    };
    assert!(diagnostic.contains("offline"));
    assert_eq!(controller.state(), AcquisitionState::Exhausted);
    assert_eq!(controller.last_error(), Some(diagnostic.as_str()));
}
