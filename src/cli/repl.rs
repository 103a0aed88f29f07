use std::io;

use anyhow::Result;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::chat::SUGGESTED_QUESTIONS;
use crate::chat::history::{Conversation, Role, Turn};
use crate::chat::pipeline::{ReplySource, Responder};
use crate::cli::commands::{Command, HELP_TEXT, is_command_line, parse_command};
use crate::cli::theme::Theme;
use crate::cli::timeline::{ChatTurnState, OutputKind, Timeline};
use crate::config::{ThemeConfig, ThemeToken};
use crate::llm::gemini::GeminiClient;
use crate::trace::SessionTrace;

const HEADER_TITLE: &str = "Campus Life Assistant";
const HEADER_SUBTITLE: &str = "Ask me anything about UTAR Kampar campus life, courses, and more!";
const SCROLL_STEP: usize = 3;

pub struct AppState {
    pub session_id: String,
    pub responder: Responder<GeminiClient>,
    pub conversation: Conversation,
    pub theme_config: ThemeConfig,
    pub colors_enabled: bool,
    pub trace: SessionTrace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStateView {
    pub prompt: String,
    pub input: String,
    pub timeline_scroll: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub timeline: Rect,
    pub input: Rect,
    pub status: Rect,
}

pub(crate) fn layout_regions(area: Rect) -> Regions {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    Regions {
        header: chunks[0],
        timeline: chunks[1],
        input: chunks[2],
        status: chunks[3],
    }
}

struct UiState {
    theme: Theme,
    timeline: Timeline,
    input: String,
    cursor: usize,
    history: Vec<String>,
    history_cursor: Option<usize>,
    timeline_scroll: usize,
    should_exit: bool,
}

pub(crate) struct Repl<B: Backend> {
    terminal: Terminal<B>,
    app: AppState,
    ui: UiState,
}

impl<B: Backend> Repl<B> {
    pub(crate) fn new(terminal: Terminal<B>, app: AppState) -> Self {
        let theme = Theme::from_config(app.colors_enabled, &app.theme_config);
        Self {
            terminal,
            app,
            ui: UiState {
                theme,
                timeline: Timeline::new(),
                input: String::new(),
                cursor: 0,
                history: Vec::new(),
                history_cursor: None,
                timeline_scroll: 0,
                should_exit: false,
            },
        }
    }

    pub(crate) fn render(&mut self) -> Result<()> {
        let app = &self.app;
        let ui = &mut self.ui;
        self.terminal.draw(|frame| draw_ui(frame, app, ui))?;
        Ok(())
    }

    pub(crate) fn should_exit(&self) -> bool {
        self.ui.should_exit
    }

    pub(crate) fn ui_state_view(&self) -> UiStateView {
        UiStateView {
            prompt: prompt_for_input(&self.ui.input).to_string(),
            input: self.ui.input.clone(),
            timeline_scroll: self.ui.timeline_scroll,
        }
    }

    pub(crate) fn regions(&self) -> Result<Regions> {
        let size = self.terminal.size()?;
        Ok(layout_regions(Rect::new(0, 0, size.width, size.height)))
    }

    pub(crate) async fn send_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => {
                    self.ui.should_exit = true;
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }

        match key.code {
            KeyCode::Char(ch) => {
                let at = byte_index(&self.ui.input, self.ui.cursor);
                self.ui.input.insert(at, ch);
                self.ui.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.ui.cursor > 0 {
                    let at = byte_index(&self.ui.input, self.ui.cursor - 1);
                    self.ui.input.remove(at);
                    self.ui.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.ui.cursor < self.ui.input.chars().count() {
                    let at = byte_index(&self.ui.input, self.ui.cursor);
                    self.ui.input.remove(at);
                }
            }
            KeyCode::Left => self.ui.cursor = self.ui.cursor.saturating_sub(1),
            KeyCode::Right => {
                let max = self.ui.input.chars().count();
                if self.ui.cursor < max {
                    self.ui.cursor += 1;
                }
            }
            KeyCode::Home => self.ui.cursor = 0,
            KeyCode::End => self.ui.cursor = self.ui.input.chars().count(),
            KeyCode::Up => self.history_prev(),
            KeyCode::Down => self.history_next(),
            KeyCode::PageUp => self.ui.timeline_scroll += SCROLL_STEP,
            KeyCode::PageDown => {
                self.ui.timeline_scroll = self.ui.timeline_scroll.saturating_sub(SCROLL_STEP);
            }
            KeyCode::Enter => self.submit_current_input().await?,
            _ => {}
        }

        if self.ui.should_exit {
            return Ok(());
        }
        self.render()
    }

    pub(crate) fn send_mouse(&mut self, ev: MouseEvent) -> Result<()> {
        let regions = self.regions()?;
        if regions
            .timeline
            .contains(Position::new(ev.column, ev.row))
        {
            match ev.kind {
                MouseEventKind::ScrollUp => self.ui.timeline_scroll += SCROLL_STEP,
                MouseEventKind::ScrollDown => {
                    self.ui.timeline_scroll =
                        self.ui.timeline_scroll.saturating_sub(SCROLL_STEP);
                }
                _ => {}
            }
        }
        self.render()
    }

    async fn submit_current_input(&mut self) -> Result<()> {
        let line = self.ui.input.trim().to_string();
        self.ui.input.clear();
        self.ui.cursor = 0;
        self.ui.history_cursor = None;
        if line.is_empty() {
            return Ok(());
        }

        self.ui.history.push(line.clone());

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            self.ui.should_exit = true;
            return Ok(());
        }

        if is_command_line(&line) {
            self.handle_command_line(&line).await?;
        } else {
            self.run_chat_turn(line).await?;
        }
        self.ui.timeline_scroll = 0;
        Ok(())
    }

    async fn run_chat_turn(&mut self, question: String) -> Result<()> {
        self.app.trace.log_chat_input(&question);
        self.app.conversation.append(Turn::user(question.clone()));
        let index = self.ui.timeline.push_chat_turn(question.clone());
        self.ui.timeline_scroll = 0;
        // Show the in-flight marker while the provider call runs.
        self.render()?;

        let reply = {
            let mut rng = rand::thread_rng();
            self.app.responder.respond(&question, &mut rng).await
        };

        self.app
            .trace
            .log_output(trace_kind_for(reply.source), &reply.text);
        self.app
            .conversation
            .append(Turn::assistant(reply.text.clone()));
        if let Some(turn) = self.ui.timeline.chat_turn_mut(index) {
            turn.state = ChatTurnState::Completed(reply);
        }
        Ok(())
    }

    async fn handle_command_line(&mut self, line: &str) -> Result<()> {
        self.app.trace.log_command(line);
        self.ui.timeline.push_user_input_command(line);

        match parse_command(line) {
            Ok(Command::Help) => self.push_info(HELP_TEXT),
            Ok(Command::Clear) => {
                self.ui.timeline.clear();
                self.ui.timeline_scroll = 0;
            }
            Ok(Command::History(limit)) => self.show_history(limit),
            Ok(Command::Suggest(None)) => self.show_suggestions(),
            Ok(Command::Suggest(Some(n))) => match SUGGESTED_QUESTIONS.get(n - 1) {
                Some(question) => self.run_chat_turn((*question).to_string()).await?,
                None => self.push_error(&format!(
                    "no suggested question #{n}; /suggest lists {} entries",
                    SUGGESTED_QUESTIONS.len()
                )),
            },
            Ok(Command::Trace) => {
                let path = self.app.trace.file_path().display().to_string();
                self.push_info(&path);
            }
            Err(err) => self.push_error(err.message()),
        }
        Ok(())
    }

    fn push_info(&mut self, text: &str) {
        self.app.trace.log_output("sys", text);
        self.ui.timeline.push_output(OutputKind::SystemInfo, text);
    }

    fn push_error(&mut self, text: &str) {
        self.app.trace.log_output("sys", text);
        self.ui.timeline.push_output(OutputKind::SystemError, text);
    }

    fn show_history(&mut self, limit: Option<usize>) {
        if self.app.conversation.is_empty() {
            self.push_info("No conversation yet.");
            return;
        }

        let turns = self.app.conversation.turns();
        let start = limit.map_or(0, |n| turns.len().saturating_sub(n));
        let rendered = turns[start..]
            .iter()
            .map(|turn| match turn.role {
                Role::User => format!("you: {}", turn.content),
                Role::Assistant => format!("bot: {}", turn.content),
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.push_info(&rendered);
    }

    fn show_suggestions(&mut self) {
        let rendered = SUGGESTED_QUESTIONS
            .iter()
            .enumerate()
            .map(|(index, question)| format!("{}. {question}", index + 1))
            .collect::<Vec<_>>()
            .join("\n");
        self.push_info(&rendered);
    }

    fn history_prev(&mut self) {
        if self.ui.history.is_empty() {
            return;
        }

        let next = match self.ui.history_cursor {
            None => self.ui.history.len() - 1,
            Some(0) => 0,
            Some(index) => index - 1,
        };
        self.ui.history_cursor = Some(next);
        self.ui.input = self.ui.history[next].clone();
        self.ui.cursor = self.ui.input.chars().count();
    }

    fn history_next(&mut self) {
        let Some(index) = self.ui.history_cursor else {
            return;
        };

        if index + 1 < self.ui.history.len() {
            self.ui.history_cursor = Some(index + 1);
            self.ui.input = self.ui.history[index + 1].clone();
        } else {
            self.ui.history_cursor = None;
            self.ui.input.clear();
        }
        self.ui.cursor = self.ui.input.chars().count();
    }

    #[cfg(any(test, feature = "test-support"))]
    pub(crate) fn seed_completed_turn(&mut self, question: &str, reply_text: &str) {
        use crate::chat::pipeline::ChatReply;

        self.app.conversation.append(Turn::user(question));
        self.app.conversation.append(Turn::assistant(reply_text));
        let index = self.ui.timeline.push_chat_turn(question.to_string());
        if let Some(turn) = self.ui.timeline.chat_turn_mut(index) {
            turn.state = ChatTurnState::Completed(ChatReply {
                text: reply_text.to_string(),
                source: ReplySource::Rule,
            });
        }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

fn draw_ui(frame: &mut Frame<'_>, app: &AppState, ui: &mut UiState) {
    let regions = layout_regions(frame.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            HEADER_TITLE,
            ui.theme.style(ThemeToken::HeaderTitle),
        )),
        Line::from(Span::styled(
            HEADER_SUBTITLE,
            ui.theme.style(ThemeToken::HeaderSubtitle),
        )),
    ]);
    frame.render_widget(header, regions.header);

    let lines = ui.timeline.render_lines(&ui.theme);
    let total = lines.len();
    let height = regions.timeline.height as usize;
    let max_scroll = total.saturating_sub(height);
    if ui.timeline_scroll > max_scroll {
        ui.timeline_scroll = max_scroll;
    }
    let top_offset = max_scroll.saturating_sub(ui.timeline_scroll);
    let timeline = Paragraph::new(lines).scroll((top_offset as u16, 0));
    frame.render_widget(timeline, regions.timeline);

    let prompt = prompt_for_input(&ui.input);
    let prompt_token = if is_command_line(&ui.input) {
        ThemeToken::CommandPrompt
    } else {
        ThemeToken::UserPrompt
    };
    let input_line = Line::from(vec![
        Span::styled(prompt, ui.theme.style(prompt_token)),
        Span::styled(ui.input.clone(), ui.theme.style(ThemeToken::UserInput)),
    ]);
    let input = Paragraph::new(input_line).style(ui.theme.style(ThemeToken::InputBlock));
    frame.render_widget(input, regions.input);

    let availability = if app.responder.fallback_available() {
        "online"
    } else {
        "offline"
    };
    let status = Paragraph::new(Line::from(Span::styled(
        format!(
            "campuschat | Session: {} | Assistant: {availability}",
            app.session_id
        ),
        ui.theme.style(ThemeToken::Status),
    )));
    frame.render_widget(status, regions.status);

    let cursor_x = regions.input.x + prompt.len() as u16 + ui.cursor as u16;
    frame.set_cursor_position(Position::new(
        cursor_x.min(regions.input.right().saturating_sub(1)),
        regions.input.y,
    ));
}

pub(crate) fn prompt_for_input(input: &str) -> &'static str {
    if is_command_line(input) { "cmd> " } else { "you> " }
}

fn trace_kind_for(source: ReplySource) -> &'static str {
    match source {
        ReplySource::Rule => "rule.out",
        ReplySource::Model => "ai.out",
        ReplySource::ModelFailure => "ai.err",
        ReplySource::Default => "default.out",
    }
}

fn byte_index(input: &str, char_idx: usize) -> usize {
    input
        .char_indices()
        .nth(char_idx)
        .map(|(index, _)| index)
        .unwrap_or(input.len())
}

pub async fn run_repl(state: AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut repl = Repl::new(terminal, state);
    let result = run_event_loop(&mut repl).await;

    let restore = restore_terminal(&mut repl);
    result.and(restore)
}

async fn run_event_loop<B: Backend>(repl: &mut Repl<B>) -> Result<()> {
    repl.render()?;
    while !repl.should_exit() {
        let event = tokio::task::spawn_blocking(crossterm::event::read).await??;
        match event {
            Event::Key(key) => repl.send_key(key).await?,
            Event::Mouse(ev) => repl.send_mouse(ev)?,
            Event::Resize(..) => repl.render()?,
            _ => {}
        }
    }
    Ok(())
}

fn restore_terminal(repl: &mut Repl<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        repl.terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    Ok(())
}
