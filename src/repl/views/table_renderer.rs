//! # Table Renderer
//!
//! Writes the profile table, pagination line, modal form, delete prompt and
//! notifications to any [`Write`] sink. The controller decides what to draw
//! from the view events queued by the view model.

use crate::repl::events::ViewEvent;
use crate::repl::models::{Notification, NotificationLevel, ProfileRecord};
use crate::repl::services::QueryStatus;
use crate::repl::view_models::{FormField, Interaction, ListViewModel};
use crate::repl::views::ansi_escape_codes::{
    paint, BOLD, DIM, FG_CYAN, FG_GREEN, FG_RED, FG_YELLOW,
};
use anyhow::Result;
use std::io::Write;

const HEADERS: [&str; 6] = ["ID", "Username", "Email", "Age", "Hometown", "Gender"];
const COLUMN_GAP: &str = "  ";

/// Commands listed by `help`, with their description
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("list | refresh", "reload the current page"),
    ("page N", "go to page N"),
    ("next | prev", "move one page forward or back"),
    ("search [TEXT]", "filter by TEXT; no text clears the filter"),
    ("criteria FIELD", "search by username, age or hometown"),
    ("add", "open the form for a new user"),
    ("edit ID", "open the form for a user on this page"),
    ("set FIELD VALUE", "set a form field"),
    ("show", "print the open form"),
    ("submit | cancel", "save or discard the open form"),
    ("delete ID", "delete a user (asks for confirmation)"),
    ("yes | no", "answer the delete confirmation"),
    ("help", "show this list"),
    ("quit", "leave rosterline"),
];

/// Trait for rendering views
pub trait ViewRenderer {
    /// Render the table and pagination line
    fn render_list(&mut self, view_model: &ListViewModel) -> Result<()>;

    /// Render the open form, if any
    fn render_form(&mut self, view_model: &ListViewModel) -> Result<()>;

    /// Render the delete confirmation prompt, if one is pending
    fn render_confirmation(&mut self, view_model: &ListViewModel) -> Result<()>;

    /// Render transient notifications
    fn render_notifications(&mut self, notifications: &[Notification]) -> Result<()>;

    /// Render the command list
    fn render_help(&mut self) -> Result<()>;

    /// Render the input prompt for the current interaction
    fn render_prompt(&mut self, view_model: &ListViewModel) -> Result<()>;

    /// Handle view events
    fn handle_view_event(&mut self, event: &ViewEvent, view_model: &ListViewModel) -> Result<()>;
}

/// Line-oriented renderer over any writer
pub struct TableRenderer<W: Write> {
    writer: W,
    use_color: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(writer: W, use_color: bool) -> Self {
        Self { writer, use_color }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}")?;
        Ok(())
    }

    fn render_table(&mut self, rows: &[ProfileRecord]) -> Result<()> {
        let cells: Vec<[String; 6]> = rows.iter().map(row_cells).collect();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = join_padded(&HEADERS.map(String::from), &widths);
        let header = paint(&header, BOLD, self.use_color);
        self.line(&header)?;
        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        self.line(&rule)?;
        for row in &cells {
            let text = join_padded(row, &widths);
            self.line(&text)?;
        }
        Ok(())
    }
}

fn row_cells(record: &ProfileRecord) -> [String; 6] {
    [
        record.id.to_string(),
        record.user.username.clone(),
        record.user.email.clone(),
        record.age.to_string(),
        record.hometown.clone(),
        record.gender.label().to_string(),
    ]
}

fn join_padded(cells: &[String; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

fn level_style(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => FG_GREEN,
        NotificationLevel::Info => FG_CYAN,
        NotificationLevel::Warning => FG_YELLOW,
        NotificationLevel::Error => FG_RED,
    }
}

impl<W: Write> ViewRenderer for TableRenderer<W> {
    fn render_list(&mut self, view_model: &ListViewModel) -> Result<()> {
        let snapshot = view_model.snapshot();

        if view_model.is_loading() {
            return self.line("Loading...");
        }

        let error = snapshot
            .error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "Failed to fetch users".to_string());

        if view_model.page().is_none() {
            let message = match snapshot.status {
                QueryStatus::Error => paint(&format!("Error: {error}"), FG_RED, self.use_color),
                _ => "No data loaded yet; type list to load users".to_string(),
            };
            return self.line(&message);
        }

        let rows = view_model.rows();
        if rows.is_empty() {
            self.line("No users found")?;
        } else {
            self.render_table(rows)?;
        }

        if view_model.is_error() {
            let stale = format!("Showing previous results: {error}");
            let stale = paint(&stale, FG_YELLOW, self.use_color);
            self.line(&stale)?;
        }

        let pagination = view_model.pagination();
        let mut footer = format!(
            "Page {} of {} ({} users)",
            pagination.current_page,
            pagination.page_count(),
            pagination.total
        );
        let state = view_model.state();
        if !state.search_text.is_empty() {
            footer.push_str(&format!(
                ", {} matching '{}'",
                state.search_criteria.label(),
                state.search_text
            ));
        }
        let footer = paint(&footer, DIM, self.use_color);
        self.line(&footer)
    }

    fn render_form(&mut self, view_model: &ListViewModel) -> Result<()> {
        let Some(form) = view_model.form() else {
            return Ok(());
        };

        let title = paint(form.title(), BOLD, self.use_color);
        self.line(&title)?;
        for field in FormField::ALL {
            let text = format!("  {:<9}: {}", field.label(), form.values().get(field));
            self.line(&text)?;
            for error in form.errors().iter().filter(|e| e.field == field) {
                let text = paint(&format!("    ! {}", error.message), FG_RED, self.use_color);
                self.line(&text)?;
            }
        }
        if form.is_submitting() {
            return self.line(&paint("Saving...", DIM, self.use_color));
        }
        let hint = paint("(set FIELD VALUE, submit, cancel)", DIM, self.use_color);
        self.line(&hint)
    }

    fn render_confirmation(&mut self, view_model: &ListViewModel) -> Result<()> {
        if let Some(id) = view_model.pending_delete() {
            let text = format!("Delete user {id}? (yes/no)");
            let text = paint(&text, FG_YELLOW, self.use_color);
            self.line(&text)?;
        }
        Ok(())
    }

    fn render_notifications(&mut self, notifications: &[Notification]) -> Result<()> {
        for notification in notifications {
            let text = format!("[{}] {}", notification.level.tag(), notification.message);
            let text = paint(&text, level_style(notification.level), self.use_color);
            self.line(&text)?;
        }
        Ok(())
    }

    fn render_help(&mut self) -> Result<()> {
        let width = HELP_ENTRIES
            .iter()
            .map(|(usage, _)| usage.len())
            .max()
            .unwrap_or(0);
        for (usage, description) in HELP_ENTRIES {
            let text = format!("  {usage:<width$}  {description}");
            self.line(&text)?;
        }
        Ok(())
    }

    fn render_prompt(&mut self, view_model: &ListViewModel) -> Result<()> {
        let prompt = match view_model.interaction() {
            Interaction::Browsing => "rosterline> ",
            Interaction::EditingForm => "form> ",
            Interaction::ConfirmingDelete(_) => "confirm> ",
        };
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn handle_view_event(&mut self, event: &ViewEvent, view_model: &ListViewModel) -> Result<()> {
        match event {
            ViewEvent::ListRedrawRequired => self.render_list(view_model)?,
            ViewEvent::ModalChanged => self.render_form(view_model)?,
            ViewEvent::ConfirmationRequired => self.render_confirmation(view_model)?,
            // Notifications are drained and rendered by the controller
            ViewEvent::StatusBarUpdateRequired => {}
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::Gender;
    use crate::repl::services::{QueryCache, Services};
    use crate::repl::testing::{record, settle, FakeProfileApi, MockWriter};
    use std::sync::Arc;

    fn view_model(api: FakeProfileApi) -> (Arc<FakeProfileApi>, ListViewModel) {
        let api = Arc::new(api);
        let services = Services::new(api.clone(), QueryCache::default());
        (api, ListViewModel::new(services, 6))
    }

    async fn load(vm: &mut ListViewModel) {
        vm.refresh();
        settle(vm).await;
    }

    fn renderer() -> TableRenderer<MockWriter> {
        TableRenderer::new(MockWriter::new(), false)
    }

    fn two_users() -> FakeProfileApi {
        FakeProfileApi::with_records(vec![
            record(1, "alice", 30, "Lyon", Gender::Female),
            record(2, "bob", 41, "Nantes", Gender::Male),
        ])
    }

    #[tokio::test]
    async fn list_should_render_aligned_table_and_footer() {
        let (_, mut vm) = view_model(two_users());
        load(&mut vm).await;
        let mut renderer = renderer();

        renderer.render_list(&vm).unwrap();

        let output = renderer.writer().get_output();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "ID  Username  Email              Age  Hometown  Gender");
        assert!(lines[1].starts_with("--  --------"));
        assert_eq!(lines[2], "1   alice     alice@example.com  30   Lyon      Female");
        assert_eq!(lines[3], "2   bob       bob@example.com    41   Nantes    Male");
        assert_eq!(lines[4], "Page 1 of 1 (2 users)");
    }

    #[tokio::test]
    async fn footer_should_mention_active_search() {
        let (_, mut vm) = view_model(two_users());
        vm.submit_search("ali");
        settle(&mut vm).await;
        let mut renderer = renderer();

        renderer.render_list(&vm).unwrap();

        assert!(renderer
            .writer()
            .get_output()
            .contains("Page 1 of 1 (1 users), Name matching 'ali'"));
    }

    #[tokio::test]
    async fn failed_first_load_should_render_error_line() {
        let (api, mut vm) = view_model(two_users());
        api.set_fail_list(true);
        load(&mut vm).await;
        let mut renderer = renderer();

        renderer.render_list(&vm).unwrap();

        assert_eq!(
            renderer.writer().get_output(),
            "Error: Failed to fetch users\n"
        );
    }

    #[tokio::test]
    async fn empty_result_should_say_so() {
        let (_, mut vm) = view_model(FakeProfileApi::seeded(0));
        load(&mut vm).await;
        let mut renderer = renderer();

        renderer.render_list(&vm).unwrap();

        assert!(renderer.writer().get_output().starts_with("No users found\n"));
    }

    #[test]
    fn unloaded_list_should_hint_at_list_command() {
        let (_, vm) = view_model(two_users());
        let mut renderer = renderer();

        renderer.render_list(&vm).unwrap();

        assert!(renderer.writer().get_output().contains("type list"));
    }

    #[tokio::test]
    async fn form_should_render_values_and_errors() {
        let (_, mut vm) = view_model(two_users());
        vm.open_add_modal();
        vm.set_form_field(FormField::Username, "carol").unwrap();
        let _ = vm.submit_form();
        let mut renderer = renderer();

        renderer.render_form(&vm).unwrap();

        let output = renderer.writer().get_output();
        assert!(output.starts_with("Add user\n"));
        assert!(output.contains("  Username : carol\n"));
        assert!(output.contains("    ! Please input email!\n"));
        assert!(!output.contains("Please input username!"));
    }

    #[tokio::test]
    async fn list_should_say_loading_while_first_fetch_runs() {
        let (api, mut vm) = view_model(two_users());
        api.set_list_delay(std::time::Duration::from_secs(60));
        vm.refresh();
        let mut renderer = renderer();

        renderer.render_list(&vm).unwrap();

        assert_eq!(renderer.writer().get_output(), "Loading...\n");
    }

    #[tokio::test]
    async fn form_should_show_saving_while_submit_runs() {
        let (_, mut vm) = view_model(two_users());
        vm.open_add_modal();
        for (field, value) in [
            (FormField::Username, "carol"),
            (FormField::Email, "carol@example.com"),
            (FormField::Age, "28"),
            (FormField::Hometown, "Nice"),
            (FormField::Gender, "F"),
        ] {
            vm.set_form_field(field, value).unwrap();
        }
        vm.submit_form().unwrap();
        let mut renderer = renderer();

        renderer.render_form(&vm).unwrap();

        let output = renderer.writer().get_output();
        assert!(output.ends_with("Saving...\n"));
        assert!(!output.contains("(set FIELD VALUE"));
    }

    #[test]
    fn notifications_should_be_tagged_by_level() {
        let mut renderer = renderer();
        renderer
            .render_notifications(&[
                Notification::success("User added successfully"),
                Notification::error("Failed to add user"),
            ])
            .unwrap();

        assert_eq!(
            renderer.writer().get_output(),
            "[ok] User added successfully\n[error] Failed to add user\n"
        );
    }

    #[tokio::test]
    async fn prompt_should_follow_interaction() {
        let (_, mut vm) = view_model(two_users());
        load(&mut vm).await;
        let mut renderer = renderer();

        renderer.render_prompt(&vm).unwrap();
        vm.request_delete(2);
        renderer.handle_view_event(&ViewEvent::ConfirmationRequired, &vm).unwrap();
        renderer.render_prompt(&vm).unwrap();

        assert_eq!(
            renderer.writer().get_output(),
            "rosterline> Delete user 2? (yes/no)\nconfirm> "
        );
    }

    #[test]
    fn help_should_list_every_entry() {
        let mut renderer = renderer();
        renderer.render_help().unwrap();
        let output = renderer.writer().get_output();
        assert_eq!(output.lines().count(), HELP_ENTRIES.len());
        assert!(output.contains("delete ID"));
    }
}
