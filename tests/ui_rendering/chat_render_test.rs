use anyhow::Result;
use campuschat::chat::pipeline::DEFAULT_REPLIES;

use crate::ui_rendering::common::{
    new_harness, status_snapshot, submit_line, timeline_snapshot, type_text,
};

#[tokio::test]
async fn initial_render_shows_welcome_and_status_with_session() -> Result<()> {
    let harness = new_harness("ui-welcome", 100, 24)?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Welcome to UTAR Kampar!"));

    let status = status_snapshot(&harness)?;
    assert!(status.contains("campuschat | Session: ui-welcome"));
    assert!(status.contains("Assistant: offline"));

    Ok(())
}

#[tokio::test]
async fn prompt_changes_between_chat_and_command_input() -> Result<()> {
    let mut harness = new_harness("ui-prompt", 100, 24)?;

    assert_eq!(harness.ui_state_view().prompt, "you> ");

    type_text(&mut harness, "/trace").await?;
    assert_eq!(harness.ui_state_view().prompt, "cmd> ");

    Ok(())
}

#[tokio::test]
async fn rule_answer_renders_in_the_timeline() -> Result<()> {
    let mut harness = new_harness("ui-rule", 100, 24)?;

    submit_line(&mut harness, "Where is the library located?").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("you> Where is the library located?"));
    assert!(timeline.contains("The main library is at Block G."));

    Ok(())
}

#[tokio::test]
async fn unmatched_input_without_provider_draws_a_default_reply() -> Result<()> {
    let mut harness = new_harness("ui-default", 120, 24)?;

    submit_line(&mut harness, "what is the meaning of it all").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("you> what is the meaning of it all"));
    assert!(
        DEFAULT_REPLIES
            .iter()
            .any(|reply| timeline.contains(reply)),
        "timeline should contain a default reply:\n{timeline}"
    );

    Ok(())
}

#[tokio::test]
async fn help_command_lists_available_commands() -> Result<()> {
    let mut harness = new_harness("ui-help", 100, 24)?;

    submit_line(&mut harness, "/help").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("cmd> /help"));
    assert!(timeline.contains("Available commands:"));
    assert!(timeline.contains("/suggest [n]"));

    Ok(())
}

#[tokio::test]
async fn history_command_replays_the_conversation_in_order() -> Result<()> {
    let mut harness = new_harness("ui-history", 100, 24)?;

    submit_line(&mut harness, "Where is the library located?").await?;
    submit_line(&mut harness, "/history").await?;

    let timeline = timeline_snapshot(&harness)?;
    let question_idx = timeline
        .find("you: Where is the library located?")
        .expect("history user turn");
    let answer_idx = timeline
        .find("bot: The main library is at Block G.")
        .expect("history assistant turn");
    assert!(question_idx < answer_idx);

    Ok(())
}

#[tokio::test]
async fn history_command_limit_shows_only_the_tail() -> Result<()> {
    let mut harness = new_harness("ui-history-limit", 100, 24)?;

    submit_line(&mut harness, "Where is the library located?").await?;
    submit_line(&mut harness, "How do I get a parking permit?").await?;
    submit_line(&mut harness, "/history 2").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("you: How do I get a parking permit?"));
    assert!(!timeline.contains("you: Where is the library located?"));

    Ok(())
}

#[tokio::test]
async fn suggest_command_lists_numbered_questions_and_submits_one() -> Result<()> {
    let mut harness = new_harness("ui-suggest", 100, 24)?;

    submit_line(&mut harness, "/suggest").await?;
    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("1. Where is the library located?"));
    assert!(timeline.contains("8. Where is career services located?"));

    submit_line(&mut harness, "/suggest 6").await?;
    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("you> How do I get a parking permit?"));
    assert!(timeline.contains("Campus Security"));

    Ok(())
}

#[tokio::test]
async fn clear_command_returns_to_the_welcome_state() -> Result<()> {
    let mut harness = new_harness("ui-clear", 100, 24)?;

    submit_line(&mut harness, "Where is the library located?").await?;
    submit_line(&mut harness, "/clear").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Welcome to UTAR Kampar!"));
    assert!(!timeline.contains("Block G"));

    Ok(())
}
