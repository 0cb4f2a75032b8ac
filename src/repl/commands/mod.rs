//! # Command Pattern Implementation
//!
//! Each REPL command is a small stateless type implementing [`Command`].
//! The registry parses an input line, finds the command owning its verb,
//! checks that it applies to the current interaction, and returns the
//! [`CommandEvent`]s it produces. The controller applies those events.

pub mod app;
pub mod context;
pub mod delete;
pub mod events;
pub mod form;
pub mod list;

pub use app::{HelpCommand, QuitCommand};
pub use context::{CommandContext, ViewModelSnapshot};
pub use delete::{CancelDeleteCommand, ConfirmDeleteCommand, DeleteCommand};
pub use events::CommandEvent;
pub use form::{
    AddCommand, CancelFormCommand, EditCommand, SetFieldCommand, ShowFormCommand, SubmitCommand,
};
pub use list::{
    CriteriaCommand, NextPageCommand, PageCommand, PreviousPageCommand, RefreshCommand,
    SearchCommand,
};

use crate::repl::view_models::Interaction;
use anyhow::Result;

/// One parsed input line: a lowercase verb and the untouched remainder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInput {
    pub verb: String,
    pub args: String,
}

impl CommandInput {
    /// Split a line into verb and arguments; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let (verb, args) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        Some(Self {
            verb: verb.to_ascii_lowercase(),
            args: args.trim().to_string(),
        })
    }
}

/// Trait for REPL commands.
///
/// Commands are stateless: they read the [`CommandContext`] and describe
/// what should happen as [`CommandEvent`]s.
pub trait Command: Send + Sync {
    /// Verbs this command answers to
    fn verbs(&self) -> &'static [&'static str];

    /// Whether the command applies to the current interaction
    fn is_relevant(&self, context: &CommandContext) -> bool {
        let _ = context;
        true
    }

    /// Execute the command and produce events; malformed arguments are errors
    fn execute(&self, input: &CommandInput, context: &CommandContext) -> Result<Vec<CommandEvent>>;

    /// Whether the command may run while a fetch or save is still running.
    /// Other commands wait until the view model is idle.
    fn runs_while_busy(&self) -> bool {
        false
    }

    /// Get command name for debugging
    fn name(&self) -> &'static str;
}

/// Type alias for the boxed command list
type CommandCollection = Vec<Box<dyn Command>>;

/// Registry for managing REPL commands
pub struct CommandRegistry {
    commands: CommandCollection,
}

impl CommandRegistry {
    /// Create a new registry with all default commands
    pub fn new() -> Self {
        let commands: CommandCollection = vec![
            Box::new(RefreshCommand),
            Box::new(PageCommand),
            Box::new(NextPageCommand),
            Box::new(PreviousPageCommand),
            Box::new(SearchCommand),
            Box::new(CriteriaCommand),
            Box::new(AddCommand),
            Box::new(EditCommand),
            Box::new(SetFieldCommand),
            Box::new(ShowFormCommand),
            Box::new(SubmitCommand),
            Box::new(CancelFormCommand),
            Box::new(DeleteCommand),
            Box::new(ConfirmDeleteCommand),
            Box::new(CancelDeleteCommand),
            Box::new(HelpCommand),
            Box::new(QuitCommand),
        ];

        Self { commands }
    }

    /// Whether `line` names a command that may run while the view is busy
    pub fn runs_while_busy(&self, line: &str) -> bool {
        CommandInput::parse(line)
            .and_then(|input| self.find(&input.verb))
            .is_some_and(|command| command.runs_while_busy())
    }

    fn find(&self, verb: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|command| command.verbs().contains(&verb))
            .map(|command| &**command)
    }

    /// Parse and execute one input line
    pub fn process_line(&self, line: &str, context: &CommandContext) -> Vec<CommandEvent> {
        let Some(input) = CommandInput::parse(line) else {
            return vec![];
        };

        let Some(command) = self.find(&input.verb) else {
            tracing::warn!("Unknown command: {}", input.verb);
            return vec![CommandEvent::invalid(format!(
                "Unknown command '{}'. Type help for the list of commands",
                input.verb
            ))];
        };

        if !command.is_relevant(context) {
            tracing::debug!(
                "{} not available while {:?}",
                command.name(),
                context.interaction()
            );
            return vec![CommandEvent::invalid(unavailable_message(context.interaction()))];
        }

        tracing::debug!("Command '{}' handled by {}", input.verb, command.name());
        match command.execute(&input, context) {
            Ok(events) => events,
            Err(e) => vec![CommandEvent::invalid(e.to_string())],
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable_message(interaction: Interaction) -> String {
    match interaction {
        Interaction::Browsing => "No form is open; use add or edit ID first".to_string(),
        Interaction::EditingForm => "Finish the form with submit or cancel first".to_string(),
        Interaction::ConfirmingDelete(id) => format!("Delete user {id}? Answer yes or no"),
    }
}
