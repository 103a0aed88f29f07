use anyhow::Result;

use crate::ui_rendering::common::{new_harness, scroll_down, scroll_up, timeline_snapshot};

#[tokio::test]
async fn mouse_wheel_scroll_only_applies_inside_timeline_region() -> Result<()> {
    let mut harness = new_harness("mouse-area", 100, 24)?;

    for i in 0..24 {
        harness.seed_completed_turn(&format!("question_{i}"), "answered");
    }
    harness.render()?;

    let regions = harness.regions()?;

    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    scroll_up(&mut harness, regions.input.x + 1, regions.input.y)?;
    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    let after_timeline_up = harness.ui_state_view().timeline_scroll;
    assert!(after_timeline_up > 0);

    scroll_down(&mut harness, regions.status.x + 1, regions.status.y)?;
    assert_eq!(harness.ui_state_view().timeline_scroll, after_timeline_up);

    scroll_down(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    assert!(harness.ui_state_view().timeline_scroll < after_timeline_up);

    Ok(())
}

#[tokio::test]
async fn timeline_scroll_clamps_to_valid_bounds() -> Result<()> {
    let mut harness = new_harness("mouse-clamp", 100, 24)?;

    for i in 0..32 {
        harness.seed_completed_turn(&format!("question_{i}"), "answered");
    }
    harness.render()?;

    let regions = harness.regions()?;
    for _ in 0..200 {
        scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    }

    let max_reached = harness.ui_state_view().timeline_scroll;
    assert!(max_reached > 0);

    scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    assert_eq!(harness.ui_state_view().timeline_scroll, max_reached);

    for _ in 0..200 {
        scroll_down(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    }

    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    Ok(())
}

#[tokio::test]
async fn scrolled_up_view_shows_older_turns() -> Result<()> {
    let mut harness = new_harness("mouse-window", 100, 24)?;

    for i in 0..30 {
        harness.seed_completed_turn(&format!("question_{i}"), "answered");
    }
    harness.render()?;

    let bottom = timeline_snapshot(&harness)?;
    assert!(bottom.contains("you> question_29"));
    assert!(!bottom.contains("you> question_0\n"));

    let regions = harness.regions()?;
    for _ in 0..40 {
        scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    }

    let top = timeline_snapshot(&harness)?;
    assert!(top.contains("you> question_0"));
    assert!(!top.contains("you> question_29"));

    Ok(())
}
