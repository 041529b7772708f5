//! Line protocol spoken over the gesture socket.
//!
//! ```text
//! drag <index> <phase> [<dx> <dy>]
//! press <index> <phase>
//! mode <clockwise|counterclockwise|manual>
//! query
//! ```

use crate::events::AppEvent;
use carousel::{DragPhase, Gesture, Mode, Point, PressPhase};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Gesture(Gesture),
    SetMode(Mode),
    Query,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("invalid {what} '{value}'")]
    Invalid { what: &'static str, value: String },
    #[error("unexpected argument '{0}'")]
    Trailing(String),
}

impl Command {
    /// The event the driver should see, if any. Queries are answered by the server.
    pub fn into_event(self) -> Option<AppEvent> {
        match self {
            Self::Gesture(g) => Some(AppEvent::Gesture(g)),
            Self::SetMode(m) => Some(AppEvent::SetMode(m)),
            Self::Query => None,
        }
    }
}

struct Args<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next<T: FromStr>(&mut self, what: &'static str) -> Result<T, CommandError> {
        let raw = self.inner.next().ok_or(CommandError::Missing(what))?;
        Self::parse(raw, what)
    }

    fn optional<T: FromStr>(&mut self, what: &'static str) -> Result<Option<T>, CommandError> {
        self.inner.next().map(|raw| Self::parse(raw, what)).transpose()
    }

    fn parse<T: FromStr>(raw: &str, what: &'static str) -> Result<T, CommandError> {
        raw.parse().map_err(|_| CommandError::Invalid {
            what,
            value: raw.to_string(),
        })
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.inner.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(()),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let mut args = Args { inner: words };

        let command = match verb.to_ascii_lowercase().as_str() {
            "drag" => {
                let index = args.next("index")?;
                let phase: DragPhase = args.next("drag phase")?;
                let translation = match args.optional::<f64>("dx")? {
                    Some(x) => Point::new(x, args.next("dy")?),
                    None if phase == DragPhase::Changed => return Err(CommandError::Missing("dx")),
                    None => Point::default(),
                };
                Self::Gesture(Gesture::Drag {
                    index,
                    phase,
                    translation,
                })
            }
            "press" => {
                let index = args.next("index")?;
                let phase: PressPhase = args.next("press phase")?;
                Self::Gesture(Gesture::Press { index, phase })
            }
            "mode" => Self::SetMode(args.next("mode")?),
            "query" => Self::Query,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };

        args.finish()?;
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gesture(Gesture::Drag {
                index,
                phase,
                translation,
            }) => write!(f, "drag {} {} {} {}", index, phase, translation.x, translation.y),
            Self::Gesture(Gesture::Press { index, phase }) => write!(f, "press {} {}", index, phase),
            Self::SetMode(mode) => write!(f, "mode {}", mode),
            Self::Query => write!(f, "query"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drag() {
        let cmd: Command = "drag 2 changed 10.5 -3".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Gesture(Gesture::Drag {
                index: 2,
                phase: DragPhase::Changed,
                translation: Point::new(10.5, -3.0),
            })
        );

        let cmd: Command = "  DRAG 0 begin ".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Gesture(Gesture::Drag {
                index: 0,
                phase: DragPhase::Began,
                translation: Point::default(),
            })
        );
    }

    #[test]
    fn test_parse_press_mode_query() {
        assert_eq!(
            "press 4 ended".parse::<Command>().unwrap(),
            Command::Gesture(Gesture::Press {
                index: 4,
                phase: PressPhase::Ended,
            })
        );
        assert_eq!(
            "mode ccw".parse::<Command>().unwrap(),
            Command::SetMode(Mode::CounterClockwise)
        );
        assert_eq!("query".parse::<Command>().unwrap(), Command::Query);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>().unwrap_err(), CommandError::Empty);
        assert_eq!(
            "spin 3".parse::<Command>().unwrap_err(),
            CommandError::Unknown("spin".to_string())
        );
        assert_eq!(
            "drag 1 changed".parse::<Command>().unwrap_err(),
            CommandError::Missing("dx")
        );
        assert_eq!(
            "drag 1 changed 4".parse::<Command>().unwrap_err(),
            CommandError::Missing("dy")
        );
        assert_eq!(
            "drag -1 began".parse::<Command>().unwrap_err(),
            CommandError::Invalid {
                what: "index",
                value: "-1".to_string()
            }
        );
        assert_eq!(
            "press 1 move".parse::<Command>().unwrap_err(),
            CommandError::Invalid {
                what: "press phase",
                value: "move".to_string()
            }
        );
        assert_eq!(
            "query now".parse::<Command>().unwrap_err(),
            CommandError::Trailing("now".to_string())
        );
    }

    #[test]
    fn test_display_parses_back() {
        let commands = [
            Command::Gesture(Gesture::Drag {
                index: 1,
                phase: DragPhase::Changed,
                translation: Point::new(-0.25, 12.0),
            }),
            Command::Gesture(Gesture::Press {
                index: 0,
                phase: PressPhase::Cancelled,
            }),
            Command::SetMode(Mode::Manual),
            Command::Query,
        ];
        for cmd in commands {
            assert_eq!(cmd.to_string().parse::<Command>().unwrap(), cmd);
        }
    }

    #[test]
    fn test_into_event() {
        assert!(Command::Query.into_event().is_none());
        assert!(matches!(
            Command::SetMode(Mode::Manual).into_event(),
            Some(AppEvent::SetMode(Mode::Manual))
        ));
    }
}
