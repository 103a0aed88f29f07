#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Clear,
    History(Option<usize>),
    Suggest(Option<usize>),
    Trace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) const HELP_TEXT: &str = "Available commands:\n  /help            Show this command list\n  /clear           Clear the conversation view\n  /history [n]     Show the conversation log (or the last n turns)\n  /suggest [n]     List suggested questions, or ask the n-th one\n  /trace           Show path to the current trace file";

pub(crate) fn parse_command(line: &str) -> Result<Command, ParseError> {
    if !line.starts_with('/') {
        return Err(ParseError::new("not a command"));
    }

    let trimmed = line.trim();
    if trimmed == "/" {
        return Err(ParseError::new("empty command. Try /help"));
    }

    let command_text = &trimmed[1..];
    let mut parts = command_text.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    if name.is_empty() {
        return Err(ParseError::new("empty command. Try /help"));
    }
    let rest = parts.next().map(str::trim).unwrap_or("");

    match name.as_str() {
        "help" => expect_no_args(rest, Command::Help, "usage: /help"),
        "clear" => expect_no_args(rest, Command::Clear, "usage: /clear"),
        "history" => parse_optional_count(rest, "/history").map(Command::History),
        "suggest" => parse_optional_count(rest, "/suggest").map(Command::Suggest),
        "trace" => expect_no_args(rest, Command::Trace, "usage: /trace"),
        _ => Err(ParseError::new(format!(
            "unknown command '/{name}'. Try /help"
        ))),
    }
}

pub(crate) fn is_command_line(line: &str) -> bool {
    line.starts_with('/')
}

fn expect_no_args(rest: &str, command: Command, usage: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::new(usage))
    }
}

fn parse_optional_count(rest: &str, name: &str) -> Result<Option<usize>, ParseError> {
    if rest.is_empty() {
        return Ok(None);
    }

    let value = rest
        .parse::<usize>()
        .map_err(|_| ParseError::new(format!("usage: {name} [n]")))?;
    if value == 0 {
        return Err(ParseError::new(format!("usage: {name} [n] (n must be >= 1)")));
    }

    Ok(Some(value))
}
