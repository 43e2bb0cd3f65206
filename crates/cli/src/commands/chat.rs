//! `campusbot chat`: interactive or single-message chat mode.

use std::io::Write;

use campusbot_agent::{ConversationContext, ReplyEvent, SessionInitiator, stream_reply};
use campusbot_config::AppConfig;
use campusbot_core::campus::{self, QUICK_PROMPTS};
use campusbot_core::message::Message;
use futures::{Stream, StreamExt};
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq)]
pub enum Input {
    /// Nothing to send.
    Empty,
    /// Leave the chat.
    Exit,
    /// Drop the current conversation and start over.
    NewSession,
    /// Send this text to the assistant.
    Send(String),
    /// A slash command that matched nothing.
    Unknown(String),
}

/// Interpret one line of user input.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
        return Input::Exit;
    }
    if line == "/new" {
        return Input::NewSession;
    }
    if let Some(rest) = line.strip_prefix('/') {
        return match rest.parse::<usize>().ok().and_then(campus::quick_prompt) {
            Some(prompt) => Input::Send(prompt.prompt.to_string()),
            None => Input::Unknown(line.to_string()),
        };
    }
    Input::Send(line.to_string())
}

/// Write a reply to `out` as it streams in and return the finished message.
///
/// Text is flushed per fragment. Sources are listed once the stream ends.
pub async fn render_reply<S, W>(events: S, out: &mut W) -> std::io::Result<Message>
where
    S: Stream<Item = ReplyEvent>,
    W: Write,
{
    let mut message = Message::streaming_placeholder();
    let mut events = std::pin::pin!(events);

    while let Some(event) = events.next().await {
        write!(out, "{}", event.display_text())?;
        out.flush()?;
        event.apply_to(&mut message);
    }
    message.finish();

    writeln!(out)?;
    if !message.grounding_urls.is_empty() {
        writeln!(out, "\n  Sources:")?;
        for url in &message.grounding_urls {
            match source_host(url) {
                Some(host) => writeln!(out, "    - {host} ({url})")?,
                None => writeln!(out, "    - {url}")?,
            }
        }
    }
    out.flush()?;

    Ok(message)
}

/// The host a source link points at, as shown next to it.
fn source_host(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()?
        .host_str()
        .map(str::to_string)
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early and give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        for var in campusbot_config::API_KEY_VARS {
            eprintln!("    export {var}='...'");
        }
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let initiator = SessionInitiator::from_config(&config)?;
    let mut context = initiator.create_session();
    let mut stdout = std::io::stdout();

    if let Some(msg) = message {
        // Single message mode
        match parse_input(&msg) {
            Input::Send(text) => {
                render_reply(stream_reply(&mut context, &text), &mut stdout).await?;
            }
            Input::Empty => return Err("Message is empty".into()),
            _ => return Err(format!("'{}' is not a message", msg.trim()).into()),
        }
        return Ok(());
    }

    // Interactive mode
    let settings = initiator.settings();
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        CampusBot: {:<27}║", settings.assistant_name);
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:        {}", settings.model);
    println!(
        "  Live search:  {}",
        if settings.live_search { "on" } else { "off" }
    );
    println!();
    println!("  {}", campus::WELCOME_MESSAGE);
    println!();
    println!("  Quick prompts:");
    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
        println!("    /{}  {} {}", i + 1, prompt.icon, prompt.label);
    }
    println!();
    println!("  Type '/new' for a fresh conversation, 'exit' or Ctrl+D to quit.");
    println!("  {}", campus::DISCLAIMER);
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  You > ");
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Exit => break,
            Input::NewSession => {
                let previous = std::mem::replace(&mut context, initiator.create_session());
                tracing::debug!(
                    previous = %previous.id(),
                    session = %context.id(),
                    turns = previous.history().len(),
                    "Started a new conversation"
                );
                println!("  Started a new conversation.\n");
            }
            Input::Unknown(cmd) => {
                println!("  Unknown command '{cmd}'. Use /1 to /{}.\n", QUICK_PROMPTS.len());
            }
            Input::Send(text) => {
                send(&mut context, &text, &mut stdout).await?;
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

async fn send(
    context: &mut ConversationContext,
    text: &str,
    stdout: &mut std::io::Stdout,
) -> std::io::Result<()> {
    println!();
    print!("  {} > ", context.assistant_name());
    render_reply(stream_reply(context, text), stdout).await?;
    println!();
    Ok(())
}
