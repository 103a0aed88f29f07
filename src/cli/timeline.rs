use crate::chat::pipeline::{ChatReply, ReplySource};
use crate::cli::theme::Theme;
use crate::config::ThemeToken;
use ratatui::text::{Line, Span};

pub(crate) const WELCOME_LINES: [&str; 2] = [
    "Welcome to UTAR Kampar! How can I help you?",
    "Ask a question about campus life, or type /help for the command list.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputKind {
    SystemInfo,
    SystemError,
}

#[derive(Debug, Clone)]
pub(crate) enum TimelineEntry {
    UserInputCommand(String),
    OutputLine { kind: OutputKind, text: String },
    ChatTurn(ChatTurn),
}

#[derive(Debug, Clone)]
pub(crate) struct ChatTurn {
    pub(crate) question: String,
    pub(crate) state: ChatTurnState,
}

#[derive(Debug, Clone)]
pub(crate) enum ChatTurnState {
    InFlight,
    Completed(ChatReply),
}

/// Render model for the conversation pane: an append-only list of entries,
/// re-rendered in full each frame.
#[derive(Debug, Clone, Default)]
pub(crate) struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_output(&mut self, kind: OutputKind, text: &str) {
        for line in split_output_lines(text) {
            self.entries.push(TimelineEntry::OutputLine {
                kind,
                text: line.to_string(),
            });
        }
    }

    pub(crate) fn push_user_input_command(&mut self, text: &str) {
        for line in split_output_lines(text) {
            self.entries
                .push(TimelineEntry::UserInputCommand(line.to_string()));
        }
    }

    pub(crate) fn push_chat_turn(&mut self, question: String) -> usize {
        let index = self.entries.len();
        self.entries.push(TimelineEntry::ChatTurn(ChatTurn {
            question,
            state: ChatTurnState::InFlight,
        }));
        index
    }

    pub(crate) fn chat_turn_mut(&mut self, index: usize) -> Option<&mut ChatTurn> {
        match self.entries.get_mut(index) {
            Some(TimelineEntry::ChatTurn(turn)) => Some(turn),
            _ => None,
        }
    }

    pub(crate) fn render_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.entries.is_empty() {
            return WELCOME_LINES
                .iter()
                .map(|text| {
                    Line::from(Span::styled(
                        *text,
                        theme.style(output_token_for(OutputKind::SystemInfo)),
                    ))
                })
                .collect();
        }

        let mut lines = Vec::new();
        for entry in &self.entries {
            widget_for_entry(entry).render(theme, &mut lines);
        }

        lines
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

trait TimelineWidget {
    fn render(&self, theme: &Theme, lines: &mut Vec<Line<'static>>);
}

struct CommandInputWidget<'a> {
    text: &'a str,
}

impl TimelineWidget for CommandInputWidget<'_> {
    fn render(&self, theme: &Theme, lines: &mut Vec<Line<'static>>) {
        lines.push(Line::from(vec![
            Span::styled("cmd> ", theme.style(ThemeToken::CommandPrompt)),
            Span::styled(self.text.to_string(), theme.style(ThemeToken::UserInput)),
        ]));
    }
}

struct OutputLineWidget<'a> {
    kind: OutputKind,
    text: &'a str,
}

impl TimelineWidget for OutputLineWidget<'_> {
    fn render(&self, theme: &Theme, lines: &mut Vec<Line<'static>>) {
        lines.push(Line::from(Span::styled(
            self.text.to_string(),
            theme.style(output_token_for(self.kind)),
        )));
    }
}

struct ChatTurnWidget<'a> {
    turn: &'a ChatTurn,
}

impl TimelineWidget for ChatTurnWidget<'_> {
    fn render(&self, theme: &Theme, lines: &mut Vec<Line<'static>>) {
        lines.push(Line::from(vec![
            Span::styled("you> ", theme.style(ThemeToken::UserPrompt)),
            Span::styled(
                self.turn.question.clone(),
                theme.style(ThemeToken::UserInput),
            ),
        ]));

        match &self.turn.state {
            ChatTurnState::InFlight => {
                lines.push(Line::from(Span::styled(
                    "  Thinking...",
                    theme.style(ThemeToken::AssistantWaiting),
                )));
            }
            ChatTurnState::Completed(reply) => {
                let token = match reply.source {
                    ReplySource::ModelFailure => ThemeToken::SystemError,
                    _ => ThemeToken::AssistantText,
                };
                for line in split_output_lines(&reply.text) {
                    lines.push(Line::from(Span::styled(
                        line.to_string(),
                        theme.style(token),
                    )));
                }
            }
        }
    }
}

fn widget_for_entry(entry: &TimelineEntry) -> Box<dyn TimelineWidget + '_> {
    match entry {
        TimelineEntry::UserInputCommand(text) => Box::new(CommandInputWidget { text }),
        TimelineEntry::OutputLine { kind, text } => {
            Box::new(OutputLineWidget { kind: *kind, text })
        }
        TimelineEntry::ChatTurn(turn) => Box::new(ChatTurnWidget { turn }),
    }
}

fn split_output_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    text.lines().collect()
}

fn output_token_for(kind: OutputKind) -> ThemeToken {
    match kind {
        OutputKind::SystemInfo => ThemeToken::SystemInfo,
        OutputKind::SystemError => ThemeToken::SystemError,
    }
}
