//! Keyword commands recognized in user text and postback data.

use std::fmt;

/// A recognized keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    RichText,
    Image,
    RichCard,
    Carousel,
    LiveAgent,
    Survey,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::RichText,
        Command::Image,
        Command::RichCard,
        Command::Carousel,
        Command::LiveAgent,
        Command::Survey,
    ];

    /// The normalized text that selects this command.
    pub fn keyword(self) -> &'static str {
        match self {
            Command::RichText => "rich text",
            Command::Image => "image",
            Command::RichCard => "rich card",
            Command::Carousel => "carousel",
            Command::LiveAgent => "live agent",
            Command::Survey => "survey",
        }
    }

    /// Match already-normalized input against the keyword table.
    pub fn parse(value: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.keyword() == value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Lowercase and trim user input before keyword lookup.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
