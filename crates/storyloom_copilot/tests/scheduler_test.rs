//! Tests for debounced narrative analysis, on tokio's paused clock.

mod test_utils;

use std::time::Duration;
use storyloom_copilot::{AnalysisScheduler, AnalysisStatus, ModelAnalyzer};
use storyloom_error::AgentTransportErrorKind;
use storyloom_interface::NarrativeAnalyzer;
use test_utils::{MockDriver, MockResponse};

const ANALYSIS_REPLY: &str = r#"{
    "summary": "A fox outwits a hunter.",
    "pacing": [{"scene": "ACT I", "tension": 3, "note": "slow open"}],
    "characterVoice": [{"character": "Fox", "consistency": 8}],
    "themes": [{"theme": "cunning", "coverage": 9}]
}"#;

const QUIET: Duration = Duration::from_millis(500);

#[tokio::test]
async fn test_model_analyzer_parses_report() -> anyhow::Result<()> {
    let driver = MockDriver::replying(ANALYSIS_REPLY);
    let analyzer = ModelAnalyzer::new(driver.clone()).with_model("gemini-2.5-flash-lite");

    let analysis = analyzer.analyze("ACT I\nThe fox waits.").await?;

    assert_eq!(analysis.summary, "A fox outwits a hunter.");
    assert_eq!(analysis.pacing[0].tension, 3);
    assert_eq!(analysis.character_voice[0].note, "");
    assert_eq!(analysis.themes[0].theme, "cunning");

    let request = &driver.requests()[0];
    assert_eq!(request.model().as_deref(), Some("gemini-2.5-flash-lite"));
    assert!(request.response_schema().is_some());
    Ok(())
}

#[tokio::test]
async fn test_blank_script_skips_model() -> anyhow::Result<()> {
    let driver = MockDriver::replying(ANALYSIS_REPLY);
    let analysis = ModelAnalyzer::new(driver.clone()).analyze("  \n").await?;
    assert!(analysis.is_empty());
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_analyze_once_with_last_script() -> anyhow::Result<()> {
    let driver = MockDriver::replying(ANALYSIS_REPLY);
    let scheduler = AnalysisScheduler::new(ModelAnalyzer::new(driver.clone()), QUIET);
    let mut status = scheduler.subscribe();

    scheduler.schedule("draft one");
    tokio::time::advance(Duration::from_millis(200)).await;
    scheduler.schedule("draft two");
    tokio::time::advance(Duration::from_millis(200)).await;
    scheduler.schedule("draft three");
    assert_eq!(scheduler.status(), AnalysisStatus::Pending);

    let latest = status
        .wait_for(|s| matches!(s, AnalysisStatus::Ready(_)))
        .await?
        .clone();

    assert!(matches!(latest, AnalysisStatus::Ready(ref a) if a.themes.len() == 1));
    assert_eq!(driver.call_count(), 1);
    assert!(driver.requests()[0].message().contains("draft three"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_nothing_runs_before_quiet_period() {
    let driver = MockDriver::replying(ANALYSIS_REPLY);
    let scheduler = AnalysisScheduler::new(ModelAnalyzer::new(driver.clone()), QUIET);

    scheduler.schedule("draft");
    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(driver.call_count(), 0);

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_published() -> anyhow::Result<()> {
    let driver = MockDriver::new(vec![MockResponse::Transport(
        AgentTransportErrorKind::Http {
            status_code: 500,
            message: "boom".to_string(),
        },
    )]);
    let scheduler = AnalysisScheduler::new(ModelAnalyzer::new(driver), QUIET);
    let mut status = scheduler.subscribe();

    scheduler.schedule("draft");
    let latest = status
        .wait_for(|s| matches!(s, AnalysisStatus::Failed(_)))
        .await?
        .clone();

    assert!(matches!(latest, AnalysisStatus::Failed(ref message) if message.contains("500")));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_aborts_pending_run() {
    let driver = MockDriver::replying(ANALYSIS_REPLY);
    let scheduler = AnalysisScheduler::new(ModelAnalyzer::new(driver.clone()), QUIET);

    scheduler.schedule("draft");
    scheduler.cancel();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(driver.call_count(), 0);
    assert_eq!(scheduler.status(), AnalysisStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_drop_aborts_pending_run() {
    let driver = MockDriver::replying(ANALYSIS_REPLY);
    let scheduler = AnalysisScheduler::new(ModelAnalyzer::new(driver.clone()), QUIET);

    scheduler.schedule("draft");
    drop(scheduler);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(driver.call_count(), 0);
}
