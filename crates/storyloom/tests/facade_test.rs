//! End-to-end session flow through the facade re-exports.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;
use storyloom::{
    ActionExecutor, AgentAction, AgentResponse, AssetQueue, AssetType, ConversationController,
    ConversationMessage, CopilotAgent, CursorSelection, Role, Session, SessionHandle,
    StoryloomConfig, StoryloomResult, SubmitOutcome,
};

/// Agent that replays canned responses in order.
struct ScriptedAgent {
    responses: Mutex<Vec<AgentResponse>>,
}

impl ScriptedAgent {
    fn new(mut responses: Vec<AgentResponse>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl CopilotAgent for ScriptedAgent {
    async fn send_turn(
        &self,
        _user_text: &str,
        _script_snapshot: &str,
        _history: &[ConversationMessage],
    ) -> StoryloomResult<AgentResponse> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| AgentResponse::new("(no more replies)", vec![])))
    }
}

#[tokio::test]
async fn test_drafting_session() -> anyhow::Result<()> {
    let agent = ScriptedAgent::new(vec![
        AgentResponse::new(
            "Here's an opening.",
            vec![AgentAction::ScriptReplace {
                content: "EXT. MEADOW - DAWN".to_string(),
            }],
        ),
        AgentResponse::new(
            "Added the fox.",
            vec![AgentAction::ScriptAppend {
                content: "A red fox watches the farmhouse.".to_string(),
            }],
        ),
        AgentResponse::new(
            "Tightened the heading.",
            vec![AgentAction::ScriptInsertAtCursor {
                content: "EARLY ".to_string(),
            }],
        ),
    ]);
    let session = SessionHandle::new(Session::with_welcome("", "Welcome!"));
    let controller = ConversationController::new(agent, session.clone());

    controller.submit("Open on a meadow").await;
    controller.submit("Introduce the fox").await;
    assert_eq!(
        session.script_text(),
        "EXT. MEADOW - DAWN\nA red fox watches the farmhouse."
    );

    // Insert before "DAWN"
    session.set_cursor(Some(CursorSelection::caret(14)));
    let outcome = controller.submit("Make it early dawn").await;
    assert!(matches!(outcome, SubmitOutcome::Applied(_)));
    assert_eq!(
        session.script_text(),
        "EXT. MEADOW - EARLY DAWN\nA red fox watches the farmhouse."
    );

    assert!(session.undo());
    assert_eq!(
        session.script_text(),
        "EXT. MEADOW - DAWN\nA red fox watches the farmhouse."
    );

    // welcome + three user/model pairs
    assert_eq!(session.messages().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_session_wired_from_config_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(
        b"[copilot]\nasset_queue = \"unresolved\"\nwelcome_message = \"Ready when you are.\"\n",
    )?;
    let config = StoryloomConfig::from_file(file.path())?;
    assert_eq!(*config.copilot().asset_queue(), AssetQueue::Unresolved);

    let welcome = config
        .copilot()
        .welcome_message()
        .clone()
        .ok_or_else(|| anyhow::anyhow!("welcome message not loaded"))?;
    let session = SessionHandle::new(Session::with_welcome("INT. DINER - NIGHT", welcome));
    let agent = ScriptedAgent::new(vec![AgentResponse::new(
        "Meet the waitress.",
        vec![AgentAction::AssetCreateSuggestion {
            asset_name: "Dolores".to_string(),
            asset_type: AssetType::Character,
            description: "Night-shift waitress".to_string(),
        }],
    )]);
    let controller = ConversationController::new(agent, session.clone())
        .with_executor(ActionExecutor::with_asset_queue(*config.copilot().asset_queue()));

    let outcome = controller.submit("Who works here?").await;
    assert!(matches!(outcome, SubmitOutcome::Applied(_)));

    let messages = session.messages();
    assert_eq!(messages[0].role, Role::Model);
    assert_eq!(messages[0].content, "Ready when you are.");

    let document = session.document();
    assert!(document.discovered_assets().is_empty());
    assert_eq!(document.unresolved_assets().len(), 1);
    let queued = &document.unresolved_assets()[0];
    assert_eq!(queued.suggestion().asset_name, "Dolores");
    assert_eq!(
        session.resolve_unresolved(*queued.id()).map(|asset| *asset.id()),
        Some(*queued.id())
    );
    assert!(session.document().unresolved_assets().is_empty());
    Ok(())
}
