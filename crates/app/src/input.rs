/// A line typed by the learner, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Start,
    Next,
    Speech(bool),
    Trace,
    Status,
    Help,
    Quit,
    /// Anything else is treated as an answer to the current problem.
    Answer(String),
    /// Blank lines are never submitted.
    Empty,
}

impl HostCommand {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "start" | "s" => Self::Start,
            "next" | "n" => Self::Next,
            "speech on" => Self::Speech(true),
            "speech off" => Self::Speech(false),
            "trace" | "t" => Self::Trace,
            "status" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Answer(trimmed.to_owned()),
        }
    }
}
