#![cfg(feature = "gemini")]

// Live Gemini calls. Run with `--features gemini,api` and GEMINI_API_KEY set.

use serde_json::json;
use std::time::Duration;
use storyloom_core::{ConversationMessage, GenerateRequest};
use storyloom_interface::TextDriver;
use storyloom_models::GeminiClient;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_plain_generation() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let client = GeminiClient::new()?;

    let request = GenerateRequest::builder()
        .message("Reply with the single word: ready")
        .max_output_tokens(10_u32)
        .build()?;

    let response = client.generate(&request).await?;
    assert!(!response.text.trim().is_empty());
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_structured_generation_returns_json() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let client = GeminiClient::new()?.with_timeout(Duration::from_secs(60));

    let schema = json!({
        "type": "OBJECT",
        "properties": { "displayText": { "type": "STRING" } },
        "required": ["displayText"]
    });

    let request = GenerateRequest::builder()
        .system_instruction("You are terse.")
        .history(vec![
            ConversationMessage::user("Remember the word 'lantern'."),
            ConversationMessage::model("Noted."),
        ])
        .message("What word did I ask you to remember?")
        .response_schema(schema)
        .build()?;

    let response = client.generate(&request).await?;
    let value: serde_json::Value = serde_json::from_str(&response.text)?;
    assert!(value["displayText"].is_string());
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_tiny_timeout_is_transport_error() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let client = GeminiClient::new()?.with_timeout(Duration::from_millis(1));

    let request = GenerateRequest::builder()
        .message("Write a long poem about foxes")
        .build()?;

    let err = client.generate(&request).await.unwrap_err();
    assert!(err.is_transport());
    Ok(())
}
