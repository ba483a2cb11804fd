use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::tracking_config::{DistanceMetric, FaceModel};

/// User-input events the session reacts to.
pub enum Command {
    /// Replace the live source; `None` stops the stream.
    SwitchSource(Option<Box<dyn FrameSource>>),
    LoadImage(PathBuf),
    Capture,
    Detect,
    Select(usize),
    StartTracking,
    StopTracking,
    SetModel(FaceModel),
    SetMetric(DistanceMetric),
    Quit,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SwitchSource(Some(source)) => {
                write!(f, "SwitchSource({})", source.descriptor().label)
            }
            Command::SwitchSource(None) => write!(f, "SwitchSource(none)"),
            Command::LoadImage(path) => write!(f, "LoadImage({})", path.display()),
            Command::Capture => write!(f, "Capture"),
            Command::Detect => write!(f, "Detect"),
            Command::Select(i) => write!(f, "Select({i})"),
            Command::StartTracking => write!(f, "StartTracking"),
            Command::StopTracking => write!(f, "StopTracking"),
            Command::SetModel(m) => write!(f, "SetModel({m})"),
            Command::SetMetric(m) => write!(f, "SetMetric({m})"),
            Command::Quit => write!(f, "Quit"),
        }
    }
}

/// Parses one line of the text command protocol:
/// `capture`, `detect`, `select <n>`, `start`, `stop`, `model <name>`,
/// `metric <name>`, `load <path>`, `quit`.
///
/// Source switching has no text form.
impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };
        match word {
            "capture" => Ok(Command::Capture),
            "detect" => Ok(Command::Detect),
            "start" => Ok(Command::StartTracking),
            "stop" => Ok(Command::StopTracking),
            "quit" | "exit" => Ok(Command::Quit),
            "select" => required(word, arg, "a face index")?
                .parse()
                .map(Command::Select)
                .map_err(|_| format!("not a face index: '{arg}'")),
            "model" => required(word, arg, "a model name")?.parse().map(Command::SetModel),
            "metric" => required(word, arg, "a metric name")?.parse().map(Command::SetMetric),
            "load" => Ok(Command::LoadImage(PathBuf::from(required(word, arg, "a path")?))),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

fn required<'a>(word: &str, arg: &'a str, what: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("'{word}' needs {what}"))
    } else {
        Ok(arg)
    }
}
