//! Parsing of the commands typed on stdin.

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Start a session; `observe` overrides the `--observe` default.
    Start { channel: String, observe: Option<bool> },
    Stop,
    Keyword(String),
    Winner,
    Clear,
    WheelAdd(String),
    WheelRemove(usize),
    WheelSpin,
    /// Spin a one-off comma-separated list.
    Spin(Vec<String>),
    Flip,
    Export,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start <channel>       start a giveaway (engagement mode)
  watch <channel>       just read chat (observe mode)
  stop                  disconnect
  keyword <text>        keyword for the next start
  winner                draw a winner from the participants
  clear                 forget all participants
  wheel add <entry>     add a wheel entry
  wheel rm <index>      remove a wheel entry (1-based)
  wheel spin            spin the wheel
  spin a, b, c          spin a one-off list
  flip                  flip a coin
  export                write the participant list to a file
  status                print the current state
  quit                  exit";

/// Parses one input line. Blank lines parse to `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "start" => ConsoleCommand::Start {
            channel: required(rest, "start <channel>")?,
            observe: None,
        },
        "watch" => ConsoleCommand::Start {
            channel: required(rest, "watch <channel>")?,
            observe: Some(true),
        },
        "stop" => ConsoleCommand::Stop,
        "keyword" => ConsoleCommand::Keyword(required(rest, "keyword <text>")?),
        "winner" => ConsoleCommand::Winner,
        "clear" => ConsoleCommand::Clear,
        "wheel" => parse_wheel(rest)?,
        "spin" => {
            let entries: Vec<String> = rest
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect();
            ConsoleCommand::Spin(entries)
        }
        "flip" => ConsoleCommand::Flip,
        "export" => ConsoleCommand::Export,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(Some(command))
}

fn parse_wheel(rest: &str) -> Result<ConsoleCommand, String> {
    let (action, arg) = match rest.split_once(char::is_whitespace) {
        Some((action, arg)) => (action, arg.trim()),
        None => (rest, ""),
    };
    match action {
        "add" => Ok(ConsoleCommand::WheelAdd(required(arg, "wheel add <entry>")?)),
        "rm" | "remove" => {
            let index: usize = arg
                .parse()
                .map_err(|_| "usage: wheel rm <index>".to_string())?;
            if index == 0 {
                return Err("wheel entries are numbered from 1".to_string());
            }
            Ok(ConsoleCommand::WheelRemove(index - 1))
        }
        "spin" => Ok(ConsoleCommand::WheelSpin),
        _ => Err("usage: wheel add <entry> | wheel rm <index> | wheel spin".to_string()),
    }
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(arg.to_string())
    }
}
