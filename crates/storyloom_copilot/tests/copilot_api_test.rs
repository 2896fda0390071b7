//! End-to-end co-pilot turns against the real Gemini API.
//!
//! Run with `--features api` and GEMINI_API_KEY set.

use storyloom_copilot::{
    ConversationController, Copilot, ModelAnalyzer, Session, SessionHandle, SubmitOutcome,
};
use storyloom_interface::NarrativeAnalyzer;
use storyloom_models::GeminiClient;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_real_turn_edits_script() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let copilot = Copilot::new(GeminiClient::new()?).with_temperature(0.2);
    let session = SessionHandle::new(Session::new(""));
    let controller = ConversationController::new(copilot, session.clone());

    let outcome = controller
        .submit("Replace the script with a single line of dialogue for a fox named Reed.")
        .await;

    assert!(matches!(outcome, SubmitOutcome::Applied(_)), "outcome: {outcome:?}");
    assert!(!session.script_text().trim().is_empty());
    assert_eq!(session.messages().len(), 2);
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_real_analysis() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let analyzer = ModelAnalyzer::new(GeminiClient::new()?);
    let analysis = analyzer
        .analyze("INT. DEN - NIGHT\nREED (a fox) paces.\nREED: They'll come at dawn.")
        .await?;

    assert!(!analysis.summary.is_empty());
    Ok(())
}
