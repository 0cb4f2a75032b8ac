//! # Form Commands
//!
//! Opening the add/edit modal and driving its form.

use anyhow::{anyhow, bail, Result};

use super::{Command, CommandContext, CommandEvent, CommandInput};
use crate::repl::view_models::FormField;

fn parse_id(args: &str, usage: &str) -> Result<i64> {
    args.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| anyhow!("Usage: {usage}"))
}

/// Open the empty create form (`add`)
pub struct AddCommand;

impl Command for AddCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["add", "new"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::AddModalRequested])
    }

    fn name(&self) -> &'static str {
        "AddCommand"
    }
}

/// Open the edit form for a loaded record (`edit ID`)
pub struct EditCommand;

impl Command for EditCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["edit"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let id = parse_id(&input.args, "edit ID")?;
        Ok(vec![CommandEvent::EditRequested { id }])
    }

    fn name(&self) -> &'static str {
        "EditCommand"
    }
}

/// Set one form field (`set FIELD VALUE`); the value may contain spaces
pub struct SetFieldCommand;

impl Command for SetFieldCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["set"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_editing()
    }

    fn execute(&self, input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let (name, value) = input
            .args
            .split_once(char::is_whitespace)
            .unwrap_or((input.args.as_str(), ""));
        if name.is_empty() {
            bail!("Usage: set FIELD VALUE");
        }
        let field = name.parse::<FormField>()?;
        Ok(vec![CommandEvent::FieldChangeRequested {
            field,
            value: value.trim().to_string(),
        }])
    }

    fn name(&self) -> &'static str {
        "SetFieldCommand"
    }
}

/// Print the open form (`show`)
pub struct ShowFormCommand;

impl Command for ShowFormCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["show", "form"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_editing()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::ShowFormRequested])
    }

    fn name(&self) -> &'static str {
        "ShowFormCommand"
    }
}

/// Validate and persist the open form (`submit`)
pub struct SubmitCommand;

impl Command for SubmitCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["submit", "save"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_editing()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::FormSubmitRequested])
    }

    fn name(&self) -> &'static str {
        "SubmitCommand"
    }
}

/// Close the open form without saving (`cancel`)
pub struct CancelFormCommand;

impl Command for CancelFormCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["cancel", "close"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_editing()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::ModalCloseRequested])
    }

    fn runs_while_busy(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "CancelFormCommand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::commands::ViewModelSnapshot;
    use crate::repl::view_models::Interaction;

    fn editing() -> CommandContext {
        CommandContext::new(ViewModelSnapshot {
            interaction: Interaction::EditingForm,
            ..ViewModelSnapshot::default()
        })
    }

    fn input(line: &str) -> CommandInput {
        CommandInput::parse(line).unwrap()
    }

    #[test]
    fn edit_should_require_positive_id() {
        let context = CommandContext::new(ViewModelSnapshot::default());
        assert_eq!(
            EditCommand.execute(&input("edit 12"), &context).unwrap(),
            vec![CommandEvent::EditRequested { id: 12 }]
        );
        assert!(EditCommand.execute(&input("edit"), &context).is_err());
        assert!(EditCommand.execute(&input("edit -1"), &context).is_err());
    }

    #[test]
    fn set_should_accept_field_aliases_and_blank_values() {
        assert_eq!(
            SetFieldCommand.execute(&input("set name bob"), &editing()).unwrap(),
            vec![CommandEvent::FieldChangeRequested {
                field: FormField::Username,
                value: "bob".to_string(),
            }]
        );
        assert_eq!(
            SetFieldCommand.execute(&input("set email"), &editing()).unwrap(),
            vec![CommandEvent::FieldChangeRequested {
                field: FormField::Email,
                value: String::new(),
            }]
        );
    }

    #[test]
    fn set_should_reject_unknown_fields() {
        let err = SetFieldCommand
            .execute(&input("set phone 555"), &editing())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown field 'phone'");
        assert!(SetFieldCommand.execute(&input("set"), &editing()).is_err());
    }

    #[test]
    fn form_commands_should_only_apply_while_editing() {
        let browsing = CommandContext::new(ViewModelSnapshot::default());
        assert!(!SubmitCommand.is_relevant(&browsing));
        assert!(!CancelFormCommand.is_relevant(&browsing));
        assert!(SubmitCommand.is_relevant(&editing()));
        assert!(!AddCommand.is_relevant(&editing()));
    }
}
