//! Startup helpers for the Art Historian terminal client.
//!
//! Wires the session controller to an HTTP gateway, a JSON state file, and
//! a line-oriented terminal renderer.

use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::controller::SessionController;
use crate::chat::core::config::ChatConfig;
use crate::chat::core::errors::ChatResult;
use crate::chat::core::ids::MessageId;
use crate::chat::core::language::Language;
use crate::chat::core::message::{ArtworkDetails, MessageRecord};
use crate::chat::gateway::HttpBackendGateway;
use crate::chat::render::{FeedbackUiState, Renderer};
use crate::chat::storage::JsonFileStore;
use crate::chat::voice::UnsupportedVoiceCapture;

/// Run the terminal client (used by the `art-historian` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on a clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Art Historian client v{}", env!("CARGO_PKG_VERSION"));

    let config = config_from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        return ExitCode::from(1);
    }
    tracing::info!("Backend endpoint: {}", config.backend_base_url);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_client(config)) {
        tracing::error!("Client error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Build the configuration from environment variables, with defaults for
/// anything unset.
#[must_use]
pub fn config_from_env() -> ChatConfig {
    let mut config = ChatConfig::default();
    if let Ok(url) = std::env::var("ART_HISTORIAN_BACKEND_URL") {
        config = config.with_backend_url(url);
    }
    if let Ok(path) = std::env::var("ART_HISTORIAN_STATE_PATH") {
        config = config.with_state_path(path);
    }
    if let Ok(tag) = std::env::var("ART_HISTORIAN_LANGUAGE") {
        config = config.with_default_language(Language::from_stored(&tag));
    }
    config
}

/// Drive the session over stdin until `/quit` or end of input.
async fn run_client(config: ChatConfig) -> ChatResult<()> {
    let store = Arc::new(JsonFileStore::open(&config.state_path));
    let gateway = Arc::new(HttpBackendGateway::new(&config)?);
    let renderer = Arc::new(TerminalRenderer::new(config.default_language));
    let voice = Arc::new(UnsupportedVoiceCapture);

    let mut controller =
        SessionController::new(&config, store, gateway, renderer.clone(), voice);
    renderer.set_language(controller.language());

    println!("Commands: /new  /lang <en|hi|es|fr>  /image <path>  /yes  /no [reason]  /quit");
    controller.start();
    println!("{}", controller.language().input_placeholder());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let outcome = match input {
            "/quit" | "/exit" => break,
            "/new" => {
                controller.start_new_chat();
                Ok(())
            }
            "/yes" => controller.record_feedback(true, None).await,
            "/voice" => controller.toggle_voice().await,
            _ if input.starts_with("/no") => {
                let reason = input.trim_start_matches("/no").trim();
                let reason = (!reason.is_empty()).then_some(reason);
                controller.record_feedback(false, reason).await
            }
            _ if input.starts_with("/lang") => {
                let tag = input.trim_start_matches("/lang").trim();
                match tag.parse::<Language>() {
                    Ok(language) => {
                        controller.change_language(language);
                        renderer.set_language(language);
                        println!("{}", language.input_placeholder());
                    }
                    Err(e) => println!("({e}; current: {})", controller.language()),
                }
                Ok(())
            }
            _ if input.starts_with("/image") => {
                let path = input.trim_start_matches("/image").trim();
                match std::fs::read(path) {
                    Ok(bytes) => {
                        controller
                            .run_image_turn(mime_for_path(Path::new(path)), &bytes)
                            .await
                    }
                    Err(e) => {
                        println!("(could not read {path}: {e})");
                        Ok(())
                    }
                }
            }
            text => controller.run_user_turn(text).await,
        };

        if let Err(err) = outcome {
            println!("({err})");
        }
    }

    Ok(())
}

/// Guess the attachment MIME type from a file extension.
///
/// Unknown extensions fall through to a non-image type so the controller's
/// validation message fires.
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Line-oriented renderer for the terminal.
///
/// Tracks the interface language so the typing indicator and feedback
/// prompt come out localized, like the rest of the UI strings.
struct TerminalRenderer {
    language: Mutex<Language>,
}

impl TerminalRenderer {
    fn new(language: Language) -> Self {
        Self {
            language: Mutex::new(language),
        }
    }

    fn set_language(&self, language: Language) {
        if let Ok(mut current) = self.language.lock() {
            *current = language;
        }
    }

    fn language(&self) -> Language {
        self.language.lock().map(|l| *l).unwrap_or_default()
    }
}

impl Renderer for TerminalRenderer {
    fn render_message(&self, record: &MessageRecord) {
        println!("[{}] {}: {}", record.timestamp, record.role, record.content);
    }

    fn render_artwork_details(&self, _id: &MessageId, details: &ArtworkDetails) {
        println!("  [{}]", details.display_title());
        println!("  artist: {}", details.display_artist());
        println!("  period: {}", details.display_period());
        println!("  style:  {}", details.display_style());
        if let Some(url) = &details.image_url {
            println!("  image:  {url}");
        }
    }

    fn set_typing_indicator_visible(&self, visible: bool) {
        if visible {
            println!("{}", self.language().typing_text());
        }
    }

    fn set_feedback_ui_state(&self, state: FeedbackUiState) {
        match state {
            FeedbackUiState::PromptVisible => {
                println!("({} /yes or /no <reason>)", self.language().feedback_prompt());
            }
            FeedbackUiState::ReasonFormVisible => {
                println!("(Tell us what went wrong: /no <reason>)");
            }
            FeedbackUiState::Hidden => {}
        }
    }

    fn clear_messages(&self) {
        println!("----------------------------------------");
    }
}
