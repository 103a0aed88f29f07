use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateInput {
    pub prompt: String,
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    MissingApiKey,
    HttpStatus { status: u16, body: String },
    Transport(String),
    Parse(String),
    EmptyResponse,
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing GEMINI_API_KEY"),
            Self::HttpStatus { status, body } => {
                write!(f, "provider request failed with status {status}: {body}")
            }
            Self::Transport(msg) => write!(f, "provider transport error: {msg}"),
            Self::Parse(msg) => write!(f, "provider parse error: {msg}"),
            Self::EmptyResponse => write!(f, "provider returned empty response text"),
        }
    }
}

impl Error for ProviderError {}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// One question in, generated text or a typed failure out. Implementations
/// make exactly one attempt per call; retries are a caller decision.
pub trait TextProvider {
    fn generate(
        &self,
        input: GenerateInput,
    ) -> impl std::future::Future<Output = ProviderResult<GenerateOutput>> + Send;
}
