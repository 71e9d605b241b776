//! Transport commands read from stdin

use std::str::FromStr;
use thiserror::Error;

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Play a track by its 0-based queue index (typed 1-based)
    Play(usize),
    Toggle,
    Next,
    Previous,
    Shuffle,
    Repeat,
    /// Seek to a fraction of the current track
    Seek(f64),
    Volume(f32),
    /// Let the simulated clock run for some seconds
    Tick(f64),
    /// Reject the next play request
    Fail,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument for `{command}`: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

pub const HELP: &str = "\
commands:
  play <n>        play track n (1-based)
  toggle          play/pause
  next, prev      skip forward/back
  shuffle         toggle shuffle
  repeat          cycle repeat mode (off, all, one)
  seek <ratio>    seek to a fraction of the track, 0..1
  volume <ratio>  set volume, 0..1
  tick <secs>     advance the clock
  fail            reject the next play request
  status          show the player
  quit";

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?;
        let arg = words.next();

        let command = match name.to_ascii_lowercase().as_str() {
            "play" | "p" => {
                let position: usize = parse_arg("play", arg)?;
                if position == 0 {
                    return Err(ParseError::InvalidArgument {
                        command: "play",
                        value: "0".to_string(),
                    });
                }
                Command::Play(position - 1)
            }
            "toggle" | "t" | "space" => Command::Toggle,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "b" => Command::Previous,
            "shuffle" | "s" => Command::Shuffle,
            "repeat" | "r" => Command::Repeat,
            "seek" => Command::Seek(parse_arg("seek", arg)?),
            "volume" | "vol" => Command::Volume(parse_arg("volume", arg)?),
            "tick" => Command::Tick(parse_arg("tick", arg)?),
            "fail" => Command::Fail,
            "status" | "st" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn parse_arg<T: FromStr>(command: &'static str, arg: Option<&str>) -> Result<T, ParseError> {
    let value = arg.ok_or(ParseError::MissingArgument(command))?;
    value.parse().map_err(|_| ParseError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}
