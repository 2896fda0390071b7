//! The `chat` command: a REPL over one editing session.

use super::repl::{HELP, ReplCommand};
use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use storyloom::{
    ActionExecutor, AnalysisScheduler, AnalysisStatus, ConversationController, Copilot,
    DocumentState, ExecutionResult, GeminiClient, ModelAnalyzer, NarrativeAnalysis, Session,
    SessionHandle, StoryloomConfig, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Run the interactive chat loop until `/quit` or end of input.
pub async fn run_chat(script: Option<&Path>, config: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = match config {
        Some(path) => StoryloomConfig::from_file(path)?,
        None => StoryloomConfig::load()?,
    };

    let script_text = match script {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => String::new(),
    };

    let client = Arc::new(GeminiClient::new()?.with_timeout(config.copilot().timeout()));
    let agent = Copilot::from_config(Arc::clone(&client), config.copilot());

    let session = SessionHandle::new(match config.copilot().welcome_message() {
        Some(welcome) => Session::with_welcome(script_text, welcome.clone()),
        None => Session::new(script_text),
    });
    info!(session_id = %session.id(), "Chat session started");

    let controller = ConversationController::new(agent, session.clone())
        .with_executor(ActionExecutor::with_asset_queue(*config.copilot().asset_queue()));

    let scheduler = config.analysis().enabled().then(|| {
        let mut analyzer = ModelAnalyzer::new(Arc::clone(&client));
        if let Some(model) = config.analysis().model() {
            analyzer = analyzer.with_model(model.clone());
        }
        AnalysisScheduler::new(analyzer, config.analysis().quiet_period())
    });

    if let Some(welcome) = session.messages().first() {
        println!("co-pilot: {}", welcome.content);
    }
    println!("Type /help for commands.");
    schedule_analysis(scheduler.as_ref(), &session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Submit(text) => {
                let outcome = controller.submit(&text).await;
                report_outcome(&session, &outcome);
                if outcome.execution().is_some_and(|r| r.script_modified) {
                    schedule_analysis(scheduler.as_ref(), &session);
                }
            }
            ReplCommand::Undo => {
                if session.undo() {
                    println!("Undone.");
                    schedule_analysis(scheduler.as_ref(), &session);
                } else {
                    println!("Nothing to undo.");
                }
            }
            ReplCommand::Script => print_script(&session.script_text()),
            ReplCommand::Assets => print_assets(&session.document()),
            ReplCommand::Resolve(name) => match session.resolve_asset(&name) {
                Some(asset) => println!("Resolved {}.", asset.asset_name),
                None => println!("No suggested asset named {name}."),
            },
            ReplCommand::Cursor(selection) => {
                session.set_cursor(selection);
                match selection {
                    Some(s) if s.is_collapsed() => println!("Cursor at {}.", s.start()),
                    Some(s) => println!("Selected {}..{}.", s.start(), s.end()),
                    None => println!("Cursor cleared."),
                }
            }
            ReplCommand::Save(path) => match tokio::fs::write(&path, session.script_text()).await {
                Ok(()) => println!("Saved to {}.", path.display()),
                Err(e) => println!("Could not save to {}: {e}", path.display()),
            },
            ReplCommand::Analysis => match &scheduler {
                Some(scheduler) => print_analysis(&scheduler.status()),
                None => println!("Analysis is disabled; set [analysis] enabled = true."),
            },
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Invalid(hint) => println!("{hint}"),
            ReplCommand::Quit => break,
        }
    }

    session.close();
    if let Some(scheduler) = &scheduler {
        scheduler.cancel();
    }
    info!(session_id = %session.id(), "Chat session closed");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

fn schedule_analysis(scheduler: Option<&AnalysisScheduler>, session: &SessionHandle) {
    if let Some(scheduler) = scheduler {
        let script = session.script_text();
        if !script.trim().is_empty() {
            debug!(script_len = script.len(), "Scheduling analysis");
            scheduler.schedule(script);
        }
    }
}

fn report_outcome(session: &SessionHandle, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Applied(result) => {
            if let Some(reply) = session.messages().last() {
                println!("co-pilot: {}", reply.content);
            }
            report_execution(result);
            if result.new_assets_count > 0 {
                print_assets(&session.document());
            }
        }
        SubmitOutcome::Failed => {
            if let Some(reply) = session.messages().last() {
                println!("co-pilot: {}", reply.content);
            }
        }
        SubmitOutcome::Rejected(reason) => println!("(not sent: {reason})"),
        SubmitOutcome::Discarded => {}
    }
}

fn report_execution(result: &ExecutionResult) {
    if result.script_modified {
        println!("(script updated; /script to view, /undo to revert)");
    }
    for highlight in &result.highlights {
        println!("  >> {highlight}");
    }
    for warning in &result.warnings {
        println!("  ! {warning}");
    }
}

fn print_script(script: &str) {
    if script.is_empty() {
        println!("(script is empty)");
    } else {
        println!("{script}");
    }
}

fn print_assets(doc: &DocumentState) {
    if doc.discovered_assets().is_empty() && doc.unresolved_assets().is_empty() {
        println!("No suggested assets.");
        return;
    }
    println!("Suggested assets:");
    for asset in doc.discovered_assets() {
        println!(
            "  [{}] {}: {}",
            asset.asset_type, asset.asset_name, asset.description
        );
    }
    for asset in doc.unresolved_assets() {
        let suggestion = asset.suggestion();
        println!(
            "  #{} [{}] {}: {}",
            asset.id(),
            suggestion.asset_type,
            suggestion.asset_name,
            suggestion.description
        );
    }
}

fn print_analysis(status: &AnalysisStatus) {
    match status {
        AnalysisStatus::Idle => println!("No analysis yet."),
        AnalysisStatus::Pending => println!("Analysis pending..."),
        AnalysisStatus::Failed(message) => println!("Analysis failed: {message}"),
        AnalysisStatus::Ready(analysis) => print_report(analysis),
    }
}

fn print_report(analysis: &NarrativeAnalysis) {
    if analysis.is_empty() {
        println!("Nothing to analyze yet.");
        return;
    }
    println!("{}", analysis.summary);
    if !analysis.pacing.is_empty() {
        println!("Pacing:");
        for scene in &analysis.pacing {
            println!("  {:<24} {:>2}/10  {}", scene.scene, scene.tension, scene.note);
        }
    }
    if !analysis.character_voice.is_empty() {
        println!("Character voice:");
        for voice in &analysis.character_voice {
            println!(
                "  {:<24} {:>2}/10  {}",
                voice.character, voice.consistency, voice.note
            );
        }
    }
    if !analysis.themes.is_empty() {
        println!("Themes:");
        for theme in &analysis.themes {
            println!("  {:<24} {:>2}/10", theme.theme, theme.coverage);
        }
    }
}
