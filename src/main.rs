//! Demo REPL — drives a session from stdin/stdout.

use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use eco_assist::config::{QuickAction, SessionConfig};
use eco_assist::messages::MessageOrigin;
use eco_assist::profile::UserProfile;
use eco_assist::session::{InputMode, MediaHandle, Session, SessionEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    eprintln!("🌱 Eco Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Type a message and press Enter.");
    eprintln!("   /voice, /stop, /upload <name>, /discard, /mode <text|voice|image>");
    eprintln!("   /qa <key>, /log, /quit");
    eprintln!(
        "   Quick action keys: {}\n",
        QuickAction::all()
            .iter()
            .map(|a| a.key())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let handle = Session::spawn(SessionConfig::default(), UserProfile::default());

    // Print session events as they arrive.
    let mut events = handle.event_stream();
    tokio::spawn(async move {
        while let Some(Ok(event)) = events.next().await {
            match event {
                SessionEvent::MessageAppended(msg) => match msg.origin {
                    MessageOrigin::Bot => {
                        let tags = if msg.capability_tags.is_empty() {
                            String::new()
                        } else {
                            format!("  [{}]", msg.capability_tags.join(", "))
                        };
                        println!("\n🤖 {}{}\n", msg.content, tags);
                        eprint!("> ");
                    }
                    MessageOrigin::User => {}
                },
                SessionEvent::ComposingChanged(true) => eprintln!("⏳ CarbonBot is typing..."),
                SessionEvent::ComposingChanged(false) => {}
                SessionEvent::ListeningChanged(true) => eprintln!("🎤 Listening..."),
                SessionEvent::ListeningChanged(false) => eprintln!("🎤 Stopped listening"),
                SessionEvent::InputModeChanged(mode) => eprintln!("ℹ️  Input mode: {mode}"),
                SessionEvent::MediaPending(Some(media)) => {
                    eprintln!("🖼️  Analyzing {}...", media.label)
                }
                SessionEvent::MediaPending(None) => {}
            }
        }
    });

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            ("/quit", _) => break,
            ("/voice", _) => handle.start_voice_capture(),
            ("/stop", _) => handle.stop_voice_capture(),
            ("/upload", name) => {
                let name = if name.is_empty() { "upload.png" } else { name };
                handle.upload_media(MediaHandle::new(name));
            }
            ("/discard", _) => handle.discard_media(),
            ("/mode", m) => match m {
                "text" => handle.set_input_mode(InputMode::Text),
                "voice" => handle.set_input_mode(InputMode::Voice),
                "image" => handle.set_input_mode(InputMode::Image),
                other => eprintln!("❌ Unknown mode: {other}"),
            },
            ("/qa", key) => match key.parse::<QuickAction>() {
                Ok(action) => handle.invoke_quick_action(action),
                Err(e) => eprintln!("❌ {e}"),
            },
            ("/log", _) => {
                let messages = handle.messages().await;
                println!("{}", serde_json::to_string_pretty(&messages)?);
                eprint!("> ");
            }
            _ if line.is_empty() => eprint!("> "),
            _ => handle.submit_text(line),
        }
    }

    Ok(())
}
