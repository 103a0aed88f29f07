//! Deterministic UI harness for integration tests: drives the REPL over a
//! ratatui `TestBackend` without a real terminal, credential, or network.

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::chat::history::Conversation;
use crate::chat::pipeline::{Responder, ResponderConfig};
use crate::cli::repl::{AppState, Regions, Repl, UiStateView};
use crate::config::ThemeConfig;
use crate::rules::RuleTable;
use crate::trace::SessionTrace;

/// App state with no provider configured: only the rule-table and
/// default-reply paths are reachable, so rendering is reproducible.
pub fn deterministic_app_state(session_id: &str) -> Result<AppState> {
    let trace_dir = std::env::temp_dir().join("campuschat-ui-tests");
    let trace = SessionTrace::create_in_temp_dir(session_id, &trace_dir)?;

    Ok(AppState {
        session_id: session_id.to_string(),
        responder: Responder::new(
            RuleTable::campus_defaults(),
            None,
            ResponderConfig::default(),
        ),
        conversation: Conversation::new(),
        theme_config: ThemeConfig::default(),
        colors_enabled: false,
        trace,
    })
}

pub struct UiHarness {
    repl: Repl<TestBackend>,
}

impl UiHarness {
    pub fn new(width: u16, height: u16, state: AppState) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        Ok(Self {
            repl: Repl::new(terminal, state),
        })
    }

    pub fn render(&mut self) -> Result<()> {
        self.repl.render()
    }

    pub async fn send_key(&mut self, key: KeyEvent) -> Result<()> {
        self.repl.send_key(key).await
    }

    pub fn send_mouse(&mut self, event: MouseEvent) -> Result<()> {
        self.repl.send_mouse(event)
    }

    pub fn ui_state_view(&self) -> UiStateView {
        self.repl.ui_state_view()
    }

    pub fn regions(&self) -> Result<Regions> {
        self.repl.regions()
    }

    pub fn seed_completed_turn(&mut self, question: &str, reply_text: &str) {
        self.repl.seed_completed_turn(question, reply_text);
    }

    pub fn buffer_lines(&self) -> Vec<String> {
        let buffer = self.repl.terminal().backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
                    .collect::<String>()
            })
            .collect()
    }
}
