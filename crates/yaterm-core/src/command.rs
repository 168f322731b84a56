//! Command dispatcher.
//!
//! A line starting with the command marker `/` is split on whitespace into a
//! verb and positional arguments (no quoting). The verb is looked up in a
//! [`CommandRegistry`] of plain function pointers; handlers act on the
//! [`Session`] and report failures as [`CommandError`]s, which the session
//! turns into error segments.

use std::fmt;

use crate::{CommandError, Session, Transport};

/// Prefix that marks a line as a command.
pub const COMMAND_MARKER: char = '/';

/// Command handler. Synchronous, never blocks.
pub type Handler<T> = fn(&mut Session<T>, &[&str]) -> Result<(), CommandError>;

/// Registered command with its help descriptor.
pub struct CommandSpec<T> {
    /// Verb including the marker, e.g. `/connect`.
    pub verb: &'static str,
    /// Argument placeholder shown in usage, may be empty.
    pub placeholder: &'static str,
    /// One-line description.
    pub description: &'static str,
    handler: Handler<T>,
}

impl<T> CommandSpec<T> {
    /// Usage line, e.g. `Usage: /connect portName`.
    pub fn usage(&self) -> String {
        if self.placeholder.is_empty() {
            format!("Usage: {}", self.verb)
        } else {
            format!("Usage: {} {}", self.verb, self.placeholder)
        }
    }

    /// Summary line used by `/help`.
    pub fn summary(&self) -> String {
        format!("{} — {}", self.verb, self.description)
    }
}

/// Verb to handler table. Fixed after construction, iterated in
/// registration order.
pub struct CommandRegistry<T> {
    commands: Vec<CommandSpec<T>>,
}

impl<T: Transport> CommandRegistry<T> {
    /// Registry with the built-in commands.
    pub fn builtin() -> Self {
        Self {
            commands: vec![
                CommandSpec {
                    verb: "/clear",
                    placeholder: "",
                    description: "Clear the screen",
                    handler: clear,
                },
                CommandSpec {
                    verb: "/connect",
                    placeholder: "portName",
                    description: "Connect to port",
                    handler: connect,
                },
                CommandSpec {
                    verb: "/disconnect",
                    placeholder: "",
                    description: "Disconnect from port",
                    handler: disconnect,
                },
                CommandSpec {
                    verb: "/help",
                    placeholder: "[command]",
                    description: "Get help",
                    handler: help,
                },
                CommandSpec { verb: "/quit", placeholder: "", description: "Quit", handler: quit },
            ],
        }
    }
}

impl<T> CommandRegistry<T> {
    /// Command registered under exactly `verb`.
    pub fn get(&self, verb: &str) -> Option<&CommandSpec<T>> {
        self.commands.iter().find(|spec| spec.verb == verb)
    }

    /// Command for a help topic, given with or without the marker.
    pub fn find_topic(&self, topic: &str) -> Option<&CommandSpec<T>> {
        let bare = topic.strip_prefix(COMMAND_MARKER).unwrap_or(topic);
        self.commands.iter().find(|spec| spec.verb.strip_prefix(COMMAND_MARKER) == Some(bare))
    }

    /// Handler registered for `verb`.
    pub fn handler(&self, verb: &str) -> Option<Handler<T>> {
        self.get(verb).map(|spec| spec.handler)
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &CommandSpec<T>> {
        self.commands.iter()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<T> fmt::Debug for CommandRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.iter().map(|spec| spec.verb)).finish()
    }
}

/// Execute a command line against the session.
///
/// The line is echoed as a command segment first. An empty line does nothing
/// further. Failures become error segments; the connection state is never
/// touched by a failed command.
pub fn process<T: Transport>(session: &mut Session<T>, line: &str) {
    session.echo_command(line);

    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return;
    };
    let args: Vec<&str> = tokens.collect();

    let handler = session.commands().handler(verb);
    let result = match handler {
        Some(handler) => handler(session, &args),
        None => Err(CommandError::InvalidCommand { verb: verb.to_string() }),
    };

    if let Err(err) = result {
        tracing::debug!("Command {verb} failed: {err:?}");
        session.report_error(&err.to_string());
    }
}

fn clear<T: Transport>(session: &mut Session<T>, _args: &[&str]) -> Result<(), CommandError> {
    session.clear_display();
    Ok(())
}

fn connect<T: Transport>(session: &mut Session<T>, args: &[&str]) -> Result<(), CommandError> {
    // Arguments after the port are ignored.
    let Some(port) = args.first() else {
        return Err(CommandError::WrongArgumentCount { verb: "/connect" });
    };

    session.disconnect();
    // Open failures are reported by the session itself.
    let _ = session.set_port(port);
    let _ = session.connect();
    Ok(())
}

fn disconnect<T: Transport>(session: &mut Session<T>, _args: &[&str]) -> Result<(), CommandError> {
    session.disconnect();
    Ok(())
}

fn help<T: Transport>(session: &mut Session<T>, args: &[&str]) -> Result<(), CommandError> {
    let lines: Vec<String> = match args.first() {
        None => session.commands().iter().map(CommandSpec::summary).collect(),
        Some(topic) => {
            let spec = session
                .commands()
                .find_topic(topic)
                .ok_or_else(|| CommandError::UnknownHelpTopic { topic: (*topic).to_string() })?;
            vec![spec.usage(), spec.description.to_string()]
        },
    };

    for line in lines {
        session.respond(&line);
    }
    Ok(())
}

fn quit<T: Transport>(session: &mut Session<T>, _args: &[&str]) -> Result<(), CommandError> {
    session.quit();
    Ok(())
}
