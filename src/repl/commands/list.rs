//! # List Commands
//!
//! Refreshing, paging and searching the profile table.

use anyhow::{anyhow, Result};

use super::{Command, CommandContext, CommandEvent, CommandInput};
use crate::repl::models::SearchCriteria;

/// Refetch the current page (`list`, `refresh`)
pub struct RefreshCommand;

impl Command for RefreshCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["list", "ls", "refresh"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, _input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::RefreshRequested])
    }

    fn name(&self) -> &'static str {
        "RefreshCommand"
    }
}

/// Jump to page N (`page N`)
pub struct PageCommand;

impl Command for PageCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["page"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let page = input
            .args
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| anyhow!("Usage: page N (N >= 1)"))?;
        Ok(vec![CommandEvent::PageRequested { page }])
    }

    fn name(&self) -> &'static str {
        "PageCommand"
    }
}

/// Move one page forward (`next`)
pub struct NextPageCommand;

impl Command for NextPageCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["next", "n"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, _input: &CommandInput, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        if context.state.current_page >= context.state.page_count {
            return Ok(vec![CommandEvent::invalid("Already on the last page")]);
        }
        Ok(vec![CommandEvent::NextPageRequested])
    }

    fn name(&self) -> &'static str {
        "NextPageCommand"
    }
}

/// Move one page back (`prev`)
pub struct PreviousPageCommand;

impl Command for PreviousPageCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["prev", "previous", "p"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, _input: &CommandInput, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        if context.state.current_page <= 1 {
            return Ok(vec![CommandEvent::invalid("Already on the first page")]);
        }
        Ok(vec![CommandEvent::PreviousPageRequested])
    }

    fn name(&self) -> &'static str {
        "PreviousPageCommand"
    }
}

/// Submit search text (`search [TEXT]`); no text clears the filter
pub struct SearchCommand;

impl Command for SearchCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["search", "find"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::SearchRequested {
            text: input.args.clone(),
        }])
    }

    fn name(&self) -> &'static str {
        "SearchCommand"
    }
}

/// Choose the searched field (`criteria username|age|hometown`)
pub struct CriteriaCommand;

impl Command for CriteriaCommand {
    fn verbs(&self) -> &'static [&'static str] {
        &["criteria", "by"]
    }

    fn is_relevant(&self, context: &CommandContext) -> bool {
        context.is_browsing()
    }

    fn execute(&self, input: &CommandInput, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let criteria = input.args.parse::<SearchCriteria>()?;
        Ok(vec![CommandEvent::CriteriaChangeRequested { criteria }])
    }

    fn name(&self) -> &'static str {
        "CriteriaCommand"
    }
}
