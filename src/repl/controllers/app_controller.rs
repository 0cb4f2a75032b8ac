//! # REPL Application Controller
//!
//! The controller orchestrates the REPL components and manages the event loop.
//! It connects input lines to commands, applies the resulting events to the
//! view model, feeds it background events, and drives the renderer.
//!
//! Fetches and saves run in the background, so the loop keeps reading input
//! and drawing while they are outstanding. A line that arrives while the view
//! is busy waits in a queue until it is idle, unless its command may run
//! while busy (`help`, `quit`, `cancel`). Scripted input keeps its order, so
//! such a command only skips the queue there when nothing is queued ahead.

use crate::repl::{
    commands::{CommandContext, CommandEvent, CommandRegistry, ViewModelSnapshot},
    events::BackgroundEvent,
    io::{LineSource, StdinLineSource},
    models::Notification,
    services::{HttpProfileService, QueryCache, Services},
    view_models::ListViewModel,
    views::{TableRenderer, ViewRenderer},
};
use crate::{
    cmd_args::CommandLineArgs,
    config::{self, AppProfile, IniProfileStore},
};
use anyhow::Result;
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::sync::Arc;

/// What woke the event loop
enum LoopInput {
    Line(Result<Option<String>>),
    Background(BackgroundEvent),
}

/// The main application controller that orchestrates the MVVM pattern
pub struct AppController<LS: LineSource, W: Write> {
    view_model: ListViewModel,
    view_renderer: TableRenderer<W>,
    command_registry: CommandRegistry,
    line_source: LS,
    /// Lines read while busy, run in order once the view is idle
    deferred_lines: VecDeque<String>,
    should_quit: bool,
}

impl AppController<StdinLineSource, Stdout> {
    /// Create the controller for a terminal session
    pub fn new(cmd_args: CommandLineArgs) -> Result<Self> {
        Self::with_io_streams(cmd_args, StdinLineSource::new(), io::stdout())
    }
}

impl<LS: LineSource, W: Write> AppController<LS, W> {
    /// Create new application controller with injected I/O streams (dependency injection)
    pub fn with_io_streams(cmd_args: CommandLineArgs, line_source: LS, writer: W) -> Result<Self> {
        // Load profile from configuration
        let profile_name = cmd_args.profile();
        let profile_path = config::get_profile_path();
        let profile = Self::load_profile(profile_name, &profile_path)?
            .with_overrides(cmd_args.base_url(), cmd_args.page_size());

        let api = HttpProfileService::new(&profile.base_url, Some(profile.timeout))?;
        let cache = QueryCache::new(profile.stale_time, profile.timeout);
        let services = Services::new(Arc::new(api), cache);

        let mut controller = Self::with_services(services, profile.page_size, line_source, writer);
        controller
            .view_model
            .set_profile_info(profile_name.to_string(), profile_path);
        Ok(controller)
    }

    /// Create a controller over already-built services
    pub fn with_services(services: Services, page_size: u32, line_source: LS, writer: W) -> Self {
        let use_color = line_source.is_interactive();
        Self {
            view_model: ListViewModel::new(services, page_size),
            view_renderer: TableRenderer::new(writer, use_color),
            command_registry: CommandRegistry::new(),
            line_source,
            deferred_lines: VecDeque::new(),
            should_quit: false,
        }
    }

    /// Load profile from INI file or return blank profile if not found
    fn load_profile(profile_name: &str, profile_path: &str) -> Result<AppProfile> {
        tracing::debug!("Loading profile '{}' from '{}'", profile_name, profile_path);

        let ini_store = IniProfileStore::new(profile_path);
        let profile = match ini_store.get_profile(profile_name)? {
            Some(p) => {
                tracing::debug!("Profile loaded successfully, server: {}", p.base_url);
                p
            }
            None => {
                tracing::debug!("Profile '{}' not found, using blank profile", profile_name);
                config::get_blank_profile()
            }
        };

        Ok(profile)
    }

    pub fn view_model(&self) -> &ListViewModel {
        &self.view_model
    }

    /// Run the main application loop until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        if self.line_source.is_interactive() {
            let status = self.view_model.status_line();
            let message = format!(
                "Profile '{}' ({}). Type help for commands.",
                status.profile_name(),
                status.profile_path()
            );
            self.view_model.notify(Notification::info(message));
        }

        // Initial load; a failure is shown by the list view
        self.view_model.refresh();
        self.settle_and_render()?;

        let mut input_open = true;
        while !self.should_quit {
            if !self.view_model.is_busy() {
                if let Some(line) = self.deferred_lines.pop_front() {
                    self.handle_line(&line)?;
                    self.settle_and_render()?;
                    continue;
                }
                if !input_open {
                    break;
                }
                if self.line_source.is_interactive() {
                    self.view_renderer.render_prompt(&self.view_model)?;
                }
            }

            let input = tokio::select! {
                line = self.line_source.next_line(), if input_open => LoopInput::Line(line),
                Some(event) = self.view_model.next_background_event() => {
                    LoopInput::Background(event)
                }
                else => break,
            };

            match input {
                LoopInput::Line(line) => match line? {
                    Some(line) => self.accept_line(line)?,
                    None => {
                        tracing::debug!("Input exhausted");
                        input_open = false;
                    }
                },
                LoopInput::Background(event) => {
                    tracing::debug!("Background event: {:?}", event);
                    self.view_model.process_background_event(event);
                }
            }

            self.settle_and_render()?;
        }

        self.view_renderer.flush()?;
        Ok(())
    }

    /// Run a line now, or queue it until the view is idle
    fn accept_line(&mut self, line: String) -> Result<()> {
        let may_skip_queue =
            self.deferred_lines.is_empty() || self.line_source.is_interactive();
        let runs_now = !self.view_model.is_busy()
            || (may_skip_queue && self.command_registry.runs_while_busy(&line));
        if runs_now {
            self.handle_line(&line)
        } else {
            tracing::debug!("Deferring '{}' until the current request finishes", line.trim());
            self.deferred_lines.push_back(line);
            Ok(())
        }
    }

    /// Translate one input line into command events and apply them
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        let context = CommandContext::new(ViewModelSnapshot::from_view_model(&self.view_model));
        let events = self.command_registry.process_line(line, &context);
        tracing::debug!("Command events generated: {:?}", events);

        for event in events {
            self.apply_command_event(event)?;
        }
        Ok(())
    }

    /// Apply a command event to the view model
    fn apply_command_event(&mut self, event: CommandEvent) -> Result<()> {
        match event {
            CommandEvent::RefreshRequested => self.view_model.refresh(),
            CommandEvent::PageRequested { page } => self.view_model.go_to_page(page),
            CommandEvent::NextPageRequested => self.view_model.next_page(),
            CommandEvent::PreviousPageRequested => self.view_model.previous_page(),
            CommandEvent::SearchRequested { text } => self.view_model.submit_search(&text),
            CommandEvent::CriteriaChangeRequested { criteria } => {
                self.view_model.set_search_criteria(criteria)
            }
            CommandEvent::AddModalRequested => self.view_model.open_add_modal(),
            CommandEvent::EditRequested { id } => {
                self.view_model.select_for_edit(id);
            }
            CommandEvent::FieldChangeRequested { field, value } => {
                if let Err(e) = self.view_model.set_form_field(field, &value) {
                    self.view_model.notify(Notification::warning(e.to_string()));
                }
            }
            CommandEvent::ShowFormRequested => {
                self.view_renderer.render_form(&self.view_model)?;
            }
            CommandEvent::FormSubmitRequested => {
                // Failures are already surfaced as notifications
                if let Err(e) = self.view_model.submit_form() {
                    tracing::debug!("Form submission did not start: {e}");
                }
            }
            CommandEvent::ModalCloseRequested => {
                let saving = self
                    .view_model
                    .form()
                    .is_some_and(|form| form.is_submitting());
                self.view_model.close_modal();
                let message = if saving {
                    "Form closed; the save already sent will still complete"
                } else {
                    "Form closed without saving"
                };
                self.view_model.notify(Notification::info(message));
            }
            CommandEvent::DeleteRequested { id } => self.view_model.request_delete(id),
            CommandEvent::DeleteConfirmed => self.view_model.confirm_delete(),
            CommandEvent::DeleteCancelled => self.view_model.cancel_delete(),
            CommandEvent::HelpRequested => self.view_renderer.render_help()?,
            CommandEvent::QuitRequested => {
                tracing::debug!("Quit requested");
                self.should_quit = true;
            }
            CommandEvent::InvalidInput { message } => {
                self.view_model.notify(Notification::warning(message));
            }
        }
        Ok(())
    }

    /// Catch up with queued cache events, then draw what changed
    fn settle_and_render(&mut self) -> Result<()> {
        self.view_model.sync_with_cache();

        let view_events = self.view_model.collect_pending_view_events();
        for event in &view_events {
            self.view_renderer
                .handle_view_event(event, &self.view_model)?;
        }

        let notifications = self.view_model.take_notifications();
        self.view_renderer.render_notifications(&notifications)?;
        self.view_renderer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::io::{ScriptedLineSource, SharedOutput};
    use crate::repl::testing::{ApiCall, FakeProfileApi};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Yields each line after its own delay, like a person typing
    struct TypedLines {
        lines: VecDeque<(Duration, &'static str)>,
    }

    #[async_trait]
    impl LineSource for TypedLines {
        async fn next_line(&mut self) -> Result<Option<String>> {
            let Some((delay, _)) = self.lines.front() else {
                return Ok(None);
            };
            tokio::time::sleep(*delay).await;
            Ok(self.lines.pop_front().map(|(_, line)| line.to_string()))
        }

        fn is_interactive(&self) -> bool {
            true
        }
    }

    fn controller(
        api: FakeProfileApi,
        lines: &[&str],
    ) -> (
        Arc<FakeProfileApi>,
        SharedOutput,
        AppController<ScriptedLineSource, SharedOutput>,
    ) {
        let api = Arc::new(api);
        let services = Services::new(api.clone(), QueryCache::default());
        let output = SharedOutput::new();
        let controller = AppController::with_services(
            services,
            6,
            ScriptedLineSource::new(lines.iter().copied()),
            output.clone(),
        );
        (api, output, controller)
    }

    #[tokio::test]
    async fn run_should_load_first_page_and_stop_at_end_of_input() {
        let (api, output, mut app) = controller(FakeProfileApi::seeded(8), &[]);

        app.run().await.unwrap();

        assert_eq!(api.list_calls().len(), 1);
        let text = output.contents();
        assert!(text.contains("user1"));
        assert!(text.contains("Page 1 of 2 (8 users)"));
    }

    #[tokio::test]
    async fn quit_should_stop_before_remaining_lines() {
        let (api, _, mut app) = controller(FakeProfileApi::seeded(8), &["quit", "next"]);

        app.run().await.unwrap();

        assert!(api.list_calls().iter().all(|query| query.page == 1));
        assert_eq!(app.view_model().state().current_page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_backend_should_show_loading_and_still_honour_quit() {
        let api = FakeProfileApi::seeded(3);
        api.set_list_delay(Duration::from_secs(3600));
        let (_, output, mut app) = controller(api, &["quit"]);
        let started = Instant::now();

        tokio::time::timeout(Duration::from_secs(10), app.run())
            .await
            .expect("quit should not wait for the fetch")
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(output.contents().contains("Loading..."));
        assert!(app.view_model().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn input_should_be_read_while_a_fetch_is_outstanding() {
        let api = Arc::new(FakeProfileApi::seeded(3));
        api.set_list_delay(Duration::from_secs(3600));
        let services = Services::new(api.clone(), QueryCache::default());
        let output = SharedOutput::new();
        let lines = TypedLines {
            lines: VecDeque::from([
                (Duration::from_secs(2), "next"),
                (Duration::from_secs(2), "help"),
                (Duration::from_secs(2), "quit"),
            ]),
        };
        let mut app = AppController::with_services(services, 6, lines, output.clone());
        let started = Instant::now();

        app.run().await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        let text = output.contents();
        assert!(text.starts_with("Loading...\n"));
        assert!(text.contains("delete ID"));
        // Typed while loading, so it was still queued at quit
        assert_eq!(app.view_model().state().current_page, 1);
        assert_eq!(api.list_calls().len(), 1);
    }

    #[tokio::test]
    async fn lines_typed_while_loading_should_run_once_idle() {
        let api = FakeProfileApi::seeded(8);
        api.set_list_delay(Duration::from_millis(50));
        let (api, output, mut app) = controller(api, &["next"]);

        app.run().await.unwrap();

        let pages: Vec<u32> = api.list_calls().iter().map(|query| query.page).collect();
        assert_eq!(pages, vec![1, 2]);
        assert!(output.contents().contains("Page 2 of 2 (8 users)"));
    }

    #[tokio::test]
    async fn page_navigation_should_render_each_page_once() {
        let (_, output, mut app) = controller(FakeProfileApi::seeded(8), &["next"]);

        app.run().await.unwrap();

        let text = output.contents();
        assert_eq!(text.matches("Page 2 of 2 (8 users)").count(), 1);
        assert!(text.contains("user7"));
    }

    #[tokio::test]
    async fn add_flow_should_create_user_and_show_it() {
        let (api, output, mut app) = controller(
            FakeProfileApi::seeded(0),
            &[
                "add",
                "set username alice",
                "set email alice@example.com",
                "set age 30",
                "set hometown Lyon",
                "set gender F",
                "submit",
            ],
        );

        app.run().await.unwrap();

        assert!(api
            .calls()
            .iter()
            .any(|call| matches!(call, ApiCall::Create(r) if r.user.username == "alice")));
        let text = output.contents();
        assert!(text.contains("[ok] User added successfully"));
        assert!(text.contains("alice@example.com"));
        assert!(!app.view_model().is_modal_visible());
    }

    #[tokio::test]
    async fn delete_flow_should_ask_then_delete() {
        let (api, output, mut app) =
            controller(FakeProfileApi::seeded(3), &["delete 2", "next", "yes"]);

        app.run().await.unwrap();

        let text = output.contents();
        assert!(text.contains("Delete user 2? (yes/no)"));
        assert!(text.contains("[warn] Delete user 2? Answer yes or no"));
        assert!(text.contains("[ok] User deleted successfully"));
        assert!(api.calls().contains(&ApiCall::Delete(2)));
        assert_eq!(app.view_model().rows().len(), 2);
    }

    #[tokio::test]
    async fn unknown_and_malformed_commands_should_warn() {
        let (_, output, mut app) =
            controller(FakeProfileApi::seeded(3), &["dance", "page zero", "set age 3"]);

        app.run().await.unwrap();

        let text = output.contents();
        assert!(text.contains("[warn] Unknown command 'dance'"));
        assert!(text.contains("[warn] Usage: page N (N >= 1)"));
        assert!(text.contains("[warn] No form is open"));
    }

    #[tokio::test]
    async fn failed_initial_load_should_not_stop_the_loop() {
        let api = FakeProfileApi::seeded(3);
        api.set_fail_list(true);
        let (api, output, mut app) = controller(api, &["help"]);

        app.run().await.unwrap();

        let text = output.contents();
        assert!(text.contains("Error: Failed to fetch users"));
        assert!(text.contains("delete ID"));
        assert!(api.list_calls().len() >= 1);
    }
}
