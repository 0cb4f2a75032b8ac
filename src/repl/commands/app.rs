//! # Application Control Commands
//!
//! Commands available in every interaction, even while a request is running:
//! help and quit.

use anyhow::Result;

use super::{Command, CommandContext, CommandEvent, CommandInput};

/// Print the command list (`help`)
pub struct HelpCommand;

impl Command for HelpCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["help", "?"]
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::HelpRequested])
    }

    fn runs_while_busy(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "HelpCommand"
    }
}

/// Terminate application (`quit`)
pub struct QuitCommand;

impl Command for QuitCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["quit", "exit", "q"]
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::QuitRequested])
    }

    fn runs_while_busy(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "QuitCommand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::commands::ViewModelSnapshot;
    use crate::repl::view_models::Interaction;

    #[test]
    fn quit_should_be_relevant_in_every_interaction() {
        for interaction in [
            Interaction::Browsing,
            Interaction::EditingForm,
            Interaction::ConfirmingDelete(1),
        ] {
            let context = CommandContext::new(ViewModelSnapshot {
                interaction,
                ..ViewModelSnapshot::default()
            });
            assert!(QuitCommand.is_relevant(&context));
            assert!(HelpCommand.is_relevant(&context));
        }
        assert!(QuitCommand.runs_while_busy());
        assert!(HelpCommand.runs_while_busy());
    }

    #[test]
    fn quit_should_produce_quit_event() {
        let context = CommandContext::new(ViewModelSnapshot::default());
        let input = CommandInput::parse("exit").unwrap();
        assert_eq!(
            QuitCommand.execute(&input, &context).unwrap(),
            vec![CommandEvent::QuitRequested]
        );
    }
}
