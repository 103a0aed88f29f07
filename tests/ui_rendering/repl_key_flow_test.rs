use anyhow::Result;

use crate::ui_rendering::common::{
    input_snapshot, new_harness, press_backspace, press_down, press_enter, press_up, submit_line,
    timeline_snapshot, type_text,
};

#[tokio::test]
async fn up_down_navigates_submission_history() -> Result<()> {
    let mut harness = new_harness("keys-history-nav", 100, 24)?;

    submit_line(&mut harness, "Where is the library located?").await?;
    submit_line(&mut harness, "/help").await?;

    press_up(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "/help");
    press_up(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "Where is the library located?");
    press_down(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "/help");
    press_down(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "");

    Ok(())
}

#[tokio::test]
async fn backspace_edits_the_pending_input() -> Result<()> {
    let mut harness = new_harness("keys-backspace", 100, 24)?;

    type_text(&mut harness, "wifii").await?;
    press_backspace(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "wifi");

    let input = input_snapshot(&harness)?;
    assert!(input.contains("you> wifi"));
    assert!(!input.contains("wifii"));

    press_enter(&mut harness).await?;
    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Campus-Net"));

    Ok(())
}

#[tokio::test]
async fn empty_submission_is_ignored() -> Result<()> {
    let mut harness = new_harness("keys-empty", 100, 24)?;

    press_enter(&mut harness).await?;
    submit_line(&mut harness, "   ").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Welcome to UTAR Kampar!"));

    Ok(())
}

#[tokio::test]
async fn command_error_does_not_prevent_the_next_submission() -> Result<()> {
    let mut harness = new_harness("keys-recovery", 100, 24)?;

    submit_line(&mut harness, "/bogus").await?;
    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("unknown command '/bogus'. Try /help"));

    submit_line(&mut harness, "How do I register for exams?").await?;
    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Exam Registration"));

    Ok(())
}
