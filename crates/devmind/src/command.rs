//! Parsing of the lines typed at the prompt.

/// A slash command understood by the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the usage hints.
    Tips,
    /// Print the declared capabilities.
    Capabilities,
    /// Print the whole conversation again.
    History,
    /// Start a new conversation.
    Reset,
    /// Print the list of commands.
    Help,
    /// Leave the program.
    Quit,
}

impl Command {
    /// Every command with its description, in help order.
    pub const ALL: &[(Command, &str)] = &[
        (Command::Tips, "show quick tips"),
        (Command::Capabilities, "show the active capabilities"),
        (Command::History, "print the conversation so far"),
        (Command::Reset, "start a new conversation"),
        (Command::Help, "show this list"),
        (Command::Quit, "exit"),
    ];

    /// Returns the name typed after the slash.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Tips => "tips",
            Command::Capabilities => "capabilities",
            Command::History => "history",
            Command::Reset => "reset",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Command::Quit),
            _ => Command::ALL
                .iter()
                .map(|(cmd, _)| *cmd)
                .find(|cmd| cmd.name() == name),
        }
    }
}

/// One line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Nothing but whitespace.
    Empty,
    /// A known slash command.
    Command(Command),
    /// A slash followed by something that is not a command.
    UnknownCommand(String),
    /// Text for the model.
    Message(String),
}

impl Input {
    /// Classifies a line read from the terminal.
    ///
    /// Messages are trimmed. A line starting with `//` is sent as a message
    /// with one slash removed, so text can still start with a slash.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }
        if let Some(escaped) = line.strip_prefix("//") {
            return Input::Message(format!("/{escaped}"));
        }
        let Some(name) = line.strip_prefix('/') else {
            return Input::Message(line.to_owned());
        };
        let name = name.trim().to_ascii_lowercase();
        match Command::from_name(&name) {
            Some(cmd) => Input::Command(cmd),
            None => Input::UnknownCommand(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Input::parse("   \n"), Input::Empty);
        assert_eq!(
            Input::parse(" How do I read a file?\n"),
            Input::Message("How do I read a file?".to_owned())
        );
        assert_eq!(Input::parse("/TIPS"), Input::Command(Command::Tips));
        assert_eq!(Input::parse("/exit"), Input::Command(Command::Quit));
        assert_eq!(
            Input::parse("/dance"),
            Input::UnknownCommand("dance".to_owned())
        );
        assert_eq!(
            Input::parse("//usr/bin is where?"),
            Input::Message("/usr/bin is where?".to_owned())
        );
    }

    #[test]
    fn test_every_command_round_trips() {
        for (cmd, _) in Command::ALL {
            let line = format!("/{}", cmd.name());
            assert_eq!(Input::parse(&line), Input::Command(*cmd));
        }
    }
}
