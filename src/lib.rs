pub mod chat;
pub mod cli;
pub mod config;
pub mod http;
pub mod llm;
pub mod rules;
pub mod trace;

use anyhow::Result;
use chat::history::Conversation;
use chat::pipeline::{Responder, ResponderConfig};
use cli::{AppState, CliArgs, run_repl};
use config::AppConfig;
use http::HttpClient;
use http::debug::HttpDebugConfig;
use llm::gemini::GeminiClient;
use rules::RuleTable;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use trace::SessionTrace;

pub async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load_with_path(args.config.as_deref())?;
    let session_id = generate_session_id();
    let trace = SessionTrace::create(&session_id)?;
    let http = HttpClient::new(
        reqwest::Client::new(),
        HttpDebugConfig::from_verbose(args.verbose),
    )
    .with_trace(trace.clone());

    // A missing credential leaves the provider out entirely; the responder
    // then answers from rules and default replies only.
    let provider = GeminiClient::new(
        http,
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
    )
    .ok();

    let state = AppState {
        session_id,
        responder: Responder::new(
            RuleTable::campus_defaults(),
            provider,
            ResponderConfig::default(),
        ),
        conversation: Conversation::new(),
        theme_config: config.theme.clone(),
        colors_enabled: env::var_os("NO_COLOR").is_none(),
        trace,
    };

    run_repl(state).await
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}
