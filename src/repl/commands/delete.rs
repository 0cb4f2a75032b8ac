//! # Delete Commands
//!
//! The two-step delete: `delete ID` asks for confirmation, `yes`/`no` answers.

use anyhow::{anyhow, Result};

use super::{Command, CommandContext, CommandEvent, CommandInput};

/// Ask to delete a record (`delete ID`)
pub struct DeleteCommand;

impl Command for DeleteCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["delete", "rm"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let id = input
            .args
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| anyhow!("Usage: delete ID"))?;
        Ok(vec![CommandEvent::DeleteRequested { id }])
    }

    fn name(&self) -> &'static str {
        "DeleteCommand"
    }
}

/// Confirm the pending delete (`yes`)
pub struct ConfirmDeleteCommand;

impl Command for ConfirmDeleteCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["yes", "y"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_confirming_delete()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::DeleteConfirmed])
    }

    fn name(&self) -> &'static str {
        "ConfirmDeleteCommand"
    }
}

/// Drop the pending delete (`no`)
pub struct CancelDeleteCommand;

impl Command for CancelDeleteCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["no"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_confirming_delete()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::DeleteCancelled])
    }

    fn name(&self) -> &'static str {
        "CancelDeleteCommand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::commands::ViewModelSnapshot;
    use crate::repl::view_models::Interaction;

    #[test]
    fn delete_should_parse_id() {
        let context = CommandContext::new(ViewModelSnapshot::default());
        let input = CommandInput::parse("delete 7").unwrap();
        assert_eq!(
            DeleteCommand.execute(&input, &context).unwrap(),
            vec![CommandEvent::DeleteRequested { id: 7 }]
        );
        let input = CommandInput::parse("delete seven").unwrap();
        assert!(DeleteCommand.execute(&input, &context).is_err());
    }

    #[test]
    fn answers_should_only_apply_while_confirming() {
        let browsing = CommandContext::new(ViewModelSnapshot::default());
        let confirming = CommandContext::new(ViewModelSnapshot {
            interaction: Interaction::ConfirmingDelete(7),
            ..ViewModelSnapshot::default()
        });

        assert!(!ConfirmDeleteCommand.is_relevant(&browsing));
        assert!(ConfirmDeleteCommand.is_relevant(&confirming));
        assert!(CancelDeleteCommand.is_relevant(&confirming));
        assert!(!DeleteCommand.is_relevant(&confirming));
    }
}
