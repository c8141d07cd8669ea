//! Terminal front end for chatdraw.
//!
//! Reads commands from stdin, prints controller events to stdout and
//! logs to stderr. Run with `--help` for flags and type `help` for
//! commands.

mod command;

use chatdraw::prelude::*;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::command::{ConsoleCommand, HELP, parse};

#[derive(Parser, Debug)]
#[command(name = "chatdraw-console", version)]
#[command(about = "Run chat giveaways from the terminal")]
struct Args {
    /// Channel URL or name to start on immediately.
    #[arg(long)]
    channel: Option<String>,

    /// Trigger keyword participants type in chat.
    #[arg(long, env = "CHATDRAW_KEYWORD", default_value = chatdraw::DEFAULT_KEYWORD)]
    keyword: String,

    /// Chat relay endpoint.
    #[arg(long, env = "CHATDRAW_RELAY_URL", default_value = "wss://irc-ws.chat.twitch.tv:443")]
    relay_url: String,

    /// Start sessions in observe mode (read chat, no giveaway).
    #[arg(long)]
    observe: bool,

    /// Print events as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    /// Seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn mode(&self, observe: Option<bool>) -> EngagementMode {
        if observe.unwrap_or(self.observe) {
            EngagementMode::Observe
        } else {
            EngagementMode::Engagement
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut builder = ControllerBuilder::new()
        .relay_url(args.relay_url.clone())
        .keyword(args.keyword.clone());
    if let Some(seed) = args.seed {
        builder = builder.rng_seed(seed);
    }
    let controller = builder.build(WebSocketDialer::new());

    let printer = tokio::spawn(print_events(controller.subscribe(), args.json));

    if let Some(channel) = &args.channel {
        start(&controller, channel, args.mode(None)).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        match run(&controller, &args, command).await {
            Ok(()) => {}
            Err(ChatdrawError::Unavailable) => return Err(ChatdrawError::Unavailable.into()),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    controller.shutdown().await?;
    printer.abort();
    Ok(())
}

async fn start(
    controller: &ControllerHandle,
    raw: &str,
    mode: EngagementMode,
) -> Result<(), ChatdrawError> {
    let channel = controller.start(raw, mode).await?;
    tracing::info!(%channel, %mode, "started");
    println!("watching {} ({mode})", channel.display_name());
    Ok(())
}

async fn run(
    controller: &ControllerHandle,
    args: &Args,
    command: ConsoleCommand,
) -> Result<(), ChatdrawError> {
    match command {
        ConsoleCommand::Start { channel, observe } => {
            start(controller, &channel, args.mode(observe)).await?;
        }
        ConsoleCommand::Stop => controller.stop().await?,
        ConsoleCommand::Keyword(keyword) => {
            controller.set_keyword(&keyword).await?;
            println!("keyword for the next start: {}", keyword.trim());
        }
        ConsoleCommand::Winner => {
            controller.select_winner().await?;
        }
        ConsoleCommand::Clear => controller.clear_participants().await?,
        ConsoleCommand::WheelAdd(entry) => {
            controller.add_wheel_entry(&entry).await?;
        }
        ConsoleCommand::WheelRemove(index) => {
            if controller.remove_wheel_entry(index).await?.is_none() {
                eprintln!("no wheel entry #{}", index + 1);
            }
        }
        ConsoleCommand::WheelSpin => {
            controller.spin_wheel().await?;
        }
        ConsoleCommand::Spin(entries) => {
            controller.spin(entries).await?;
        }
        ConsoleCommand::Flip => {
            controller.flip().await?;
        }
        ConsoleCommand::Export => export(controller).await?,
        ConsoleCommand::Status => {
            let snapshot = controller.snapshot().await?;
            print_status(&snapshot);
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}

/// Writes the participant list next to the working directory.
async fn export(controller: &ControllerHandle) -> Result<(), ChatdrawError> {
    let snapshot = controller.snapshot().await?;
    if snapshot.participants.is_empty() {
        eprintln!("no participants to export");
        return Ok(());
    }
    let channel = snapshot
        .channel
        .as_ref()
        .map_or("unknown", ChannelHandle::as_str);
    let file_name = export_file_name(channel, chrono::Local::now().date_naive());
    let body = format_participants(&snapshot.participants);

    match tokio::fs::write(&file_name, body).await {
        Ok(()) => {
            tracing::info!(file = %file_name, count = snapshot.participants.len(), "exported participants");
            println!("wrote {} participants to {file_name}", snapshot.participants.len());
        }
        Err(e) => eprintln!("could not write {file_name}: {e}"),
    }
    Ok(())
}

fn print_status(snapshot: &ControllerSnapshot) {
    let channel = snapshot
        .channel
        .as_ref()
        .map_or_else(|| "-".to_string(), ChannelHandle::display_name);
    println!("channel:      {channel}");
    println!("connection:   {}", snapshot.connection);
    println!("mode:         {}", snapshot.mode);
    println!("keyword:      {}", snapshot.keyword);
    println!("history:      {}/{}", snapshot.history.len(), snapshot.history_limit);
    println!("participants: {}", snapshot.participants.len());
    if let Some(winner) = &snapshot.last_winner {
        println!("last winner:  {winner}");
    }
    for (i, entry) in snapshot.wheel.iter().enumerate() {
        println!("wheel #{}:     {entry}", i + 1);
    }
}

// ---------------------------------------------------------------------------
// Event output
// ---------------------------------------------------------------------------

async fn print_events(mut events: broadcast::Receiver<ControllerEvent>, json: bool) {
    let mut printed: Option<ChatEvent> = None;
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer fell behind");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        };

        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "could not encode event"),
            }
            continue;
        }

        match event {
            ControllerEvent::ConnectionChanged { state, channel, error } => {
                let channel = channel.map(|c| format!(" #{c}")).unwrap_or_default();
                match error {
                    Some(error) => println!("[{state}]{channel}: {error}"),
                    None => println!("[{state}]{channel}"),
                }
            }
            ControllerEvent::HistoryChanged { history } => {
                for line in unseen(&history, printed.as_ref()) {
                    print_chat(line);
                }
                printed = history.last().cloned();
            }
            ControllerEvent::ParticipantsChanged { participants } => {
                println!("[participants] {}", participants.len());
            }
            ControllerEvent::WheelChanged { entries } => {
                println!("[wheel] {}", entries.join(" | "));
            }
            ControllerEvent::Selection { result } => {
                let label = match result.kind {
                    SelectionKind::Winner => "winner",
                    SelectionKind::WheelPick => "wheel",
                    SelectionKind::CoinFlip => "coin",
                };
                println!("[{label}] {}", result.value);
            }
        }
    }
}

/// The events in `history` after the last one already printed.
fn unseen<'a>(history: &'a [ChatEvent], printed: Option<&ChatEvent>) -> &'a [ChatEvent] {
    let start = printed
        .and_then(|last| history.iter().rposition(|e| e == last))
        .map_or(0, |i| i + 1);
    &history[start..]
}

fn print_chat(event: &ChatEvent) {
    let time = event.received_at.format("%H:%M:%S");
    if event.is_system_notice {
        println!("{time} * {}", event.text);
    } else if event.is_triggered {
        println!("{time} <{}> {}  [entered]", event.identity, event.text);
    } else {
        println!("{time} <{}> {}", event.identity, event.text);
    }
}
