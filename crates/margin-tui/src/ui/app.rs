use super::{
    chat::render_chat, footer::render_footer, header::render_header,
    metrics_form::render_metrics_form, settings_modal::render_settings_modal,
    transcript::Transcript,
};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use margin_core::{
    client::{ApiClient, ApiError},
    report::{AnalysisReport, MetricsInput},
    settings::{Settings, TEMPERATURE_STEP},
    theme::Theme,
};
use ratatui::{
    layout::Position,
    prelude::{Constraint, CrosstermBackend, Direction, Frame, Layout, Rect, Terminal},
    widgets::Clear,
};
use std::io::Stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Delay between a successful save and the modal closing on its own.
const SETTINGS_CLOSE_DELAY: Duration = Duration::from_millis(1500);

const PENDING_TEXT: &str = "Analyzing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Metrics,
    Settings,
    EditingProviderUrl,
    EditingModelName,
}

/// Outcome display for the most recent settings-save attempt. The states are
/// mutually exclusive; opening the modal resets to Idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsFeedback {
    Idle,
    Saving,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsField {
    #[default]
    DailyRevenue,
    DailyCost,
    DailyCustomers,
    PrevRevenue,
    PrevCost,
    PrevCustomers,
}

impl MetricsField {
    pub fn next(&self) -> Self {
        match self {
            Self::DailyRevenue => Self::DailyCost,
            Self::DailyCost => Self::DailyCustomers,
            Self::DailyCustomers => Self::PrevRevenue,
            Self::PrevRevenue => Self::PrevCost,
            Self::PrevCost => Self::PrevCustomers,
            Self::PrevCustomers => Self::DailyRevenue, // Loop back to the top
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::DailyRevenue => Self::PrevCustomers, // Loop back to the bottom
            Self::DailyCost => Self::DailyRevenue,
            Self::DailyCustomers => Self::DailyCost,
            Self::PrevRevenue => Self::DailyCustomers,
            Self::PrevCost => Self::PrevRevenue,
            Self::PrevCustomers => Self::PrevCost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSelection {
    #[default]
    ProviderUrl,
    ModelName,
    Temperature,
    Save,
}

impl SettingsSelection {
    pub fn next(&self) -> Self {
        match self {
            Self::ProviderUrl => Self::ModelName,
            Self::ModelName => Self::Temperature,
            Self::Temperature => Self::Save,
            Self::Save => Self::ProviderUrl, // Loop back to the top
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::ProviderUrl => Self::Save, // Loop back to the bottom
            Self::ModelName => Self::ProviderUrl,
            Self::Temperature => Self::ModelName,
            Self::Save => Self::Temperature,
        }
    }
}

/// Results of spawned HTTP requests, delivered back to the event loop.
#[derive(Debug)]
pub enum AppMessage {
    SettingsSaved(Result<String, ApiError>),
    AnalysisDone {
        request: u64,
        result: Result<AnalysisReport, ApiError>,
    },
}

pub struct App {
    should_quit: bool,
    theme: Theme,
    mode: AppMode,
    settings: Settings,
    client: ApiClient,
    form: MetricsInput,
    field: MetricsField,
    selection: SettingsSelection,
    edit_buffer: String,
    feedback: SettingsFeedback,
    close_modal_at: Option<Instant>,
    transcript: Transcript,
    next_request: u64,
    spinner_tick: usize,
    modal_rect: Option<Rect>,
    tx: UnboundedSender<AppMessage>,
    rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let theme = Theme::new(settings.theme);
        let client = ApiClient::new(&settings.server);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            should_quit: false,
            theme,
            mode: AppMode::Metrics,
            settings,
            client,
            form: MetricsInput::default(),
            field: MetricsField::default(),
            selection: SettingsSelection::default(),
            edit_buffer: String::new(),
            feedback: SettingsFeedback::Idle,
            close_modal_at: None,
            transcript: Transcript::default(),
            next_request: 0,
            spinner_tick: 0,
            modal_rect: None,
            tx,
            rx,
        }
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.drain_messages();
            self.tick();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();

        let app_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, app_chunks[0], &self.theme, &self.settings);
        render_footer(frame, app_chunks[2], &self.theme, self.mode);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(app_chunks[1]);

        render_metrics_form(
            frame,
            main_chunks[0],
            &self.theme,
            &self.form,
            self.field,
            self.mode == AppMode::Metrics,
        );
        render_chat(
            frame,
            main_chunks[1],
            &self.theme,
            &self.transcript,
            self.spinner_tick,
        );

        if self.modal_open() {
            let area = modal_area(frame.size());
            frame.render_widget(Clear, area); // clears the backdrop content
            render_settings_modal(
                frame,
                area,
                &self.settings,
                &self.theme,
                self.selection,
                self.mode,
                &self.edit_buffer,
                &self.feedback,
            );
            self.modal_rect = Some(area);
        } else {
            self.modal_rect = None;
        }
    }

    fn modal_open(&self) -> bool {
        matches!(
            self.mode,
            AppMode::Settings | AppMode::EditingProviderUrl | AppMode::EditingModelName
        )
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
        }
    }

    fn apply_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::SettingsSaved(Ok(message)) => {
                tracing::info!("settings saved");
                self.feedback = SettingsFeedback::Success(message);
                self.close_modal_at = Some(Instant::now() + SETTINGS_CLOSE_DELAY);
            }
            AppMessage::SettingsSaved(Err(error)) => {
                tracing::warn!(%error, "settings save failed");
                self.feedback = SettingsFeedback::Error(error.to_string());
                self.close_modal_at = None;
            }
            AppMessage::AnalysisDone { request, result } => {
                // The pending placeholder comes out before any replacement
                // message is appended, on every path.
                self.transcript.remove_pending(request);
                match result {
                    Ok(report) => self.transcript.push_report(report),
                    Err(error) => {
                        tracing::warn!(%error, "analyze request failed");
                        self.transcript.push_agent(format!("Error: {}", error));
                    }
                }
            }
        }
    }

    fn tick(&mut self) {
        if self.transcript.has_pending() || self.feedback == SettingsFeedback::Saving {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
        if let Some(deadline) = self.close_modal_at {
            if Instant::now() >= deadline {
                self.close_modal_at = None;
                if self.modal_open() {
                    self.close_settings();
                }
            }
        }
    }

    fn open_settings(&mut self) {
        self.mode = AppMode::Settings;
        self.selection = SettingsSelection::default();
        // No success/error styling lingers from a previous attempt
        self.feedback = SettingsFeedback::Idle;
        self.close_modal_at = None;
    }

    fn close_settings(&mut self) {
        self.mode = AppMode::Metrics;
        self.close_modal_at = None;
    }

    /// Sends the current metrics fields to the analyzer. Submissions are not
    /// coordinated: each in-flight request owns its pending placeholder and
    /// completions land in whatever order the network returns.
    fn submit_metrics(&mut self) {
        let input = self.form.clone();
        let request = self.next_request;
        self.next_request += 1;

        self.transcript.push_user(input.summary());
        self.transcript
            .push_pending(PENDING_TEXT.to_string(), request);

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.analyze(&input).await;
            let _ = tx.send(AppMessage::AnalysisDone { request, result });
        });
    }

    fn save_settings(&mut self) {
        let payload = self.settings.llm();
        self.feedback = SettingsFeedback::Saving;
        self.close_modal_at = None;
        // Persist the client's own copy alongside the server update
        self.settings.save().unwrap_or_default();

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.update_settings(&payload).await;
            let _ = tx.send(AppMessage::SettingsSaved(result));
        });
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        self.on_mouse_down(mouse.column, mouse.row);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            AppMode::Metrics => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') => self.open_settings(),
                KeyCode::Char('t') => {
                    self.theme.toggle();
                    self.settings.theme = self.theme.variant();
                    self.settings.save().unwrap_or_default();
                }
                KeyCode::Tab | KeyCode::Down => self.field = self.field.next(),
                KeyCode::BackTab | KeyCode::Up => self.field = self.field.previous(),
                KeyCode::Enter => self.submit_metrics(),
                KeyCode::Backspace => {
                    self.focused_field_mut().pop();
                }
                // The form controls accept numeric text only; values are
                // otherwise sent verbatim.
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                    self.focused_field_mut().push(c);
                }
                _ => {}
            },
            AppMode::Settings => match key.code {
                KeyCode::Esc => self.close_settings(),
                KeyCode::Up => self.selection = self.selection.previous(),
                KeyCode::Down => self.selection = self.selection.next(),
                KeyCode::Left => {
                    if self.selection == SettingsSelection::Temperature {
                        self.settings.nudge_temperature(-TEMPERATURE_STEP);
                    }
                }
                KeyCode::Right => {
                    if self.selection == SettingsSelection::Temperature {
                        self.settings.nudge_temperature(TEMPERATURE_STEP);
                    }
                }
                KeyCode::Char('s') => self.save_settings(),
                KeyCode::Enter => match self.selection {
                    SettingsSelection::ProviderUrl => {
                        self.edit_buffer = self.settings.provider_url.clone();
                        self.mode = AppMode::EditingProviderUrl;
                    }
                    SettingsSelection::ModelName => {
                        self.edit_buffer = self.settings.model_name.clone();
                        self.mode = AppMode::EditingModelName;
                    }
                    SettingsSelection::Temperature => {}
                    SettingsSelection::Save => self.save_settings(),
                },
                _ => {}
            },
            AppMode::EditingProviderUrl | AppMode::EditingModelName => match key.code {
                KeyCode::Enter => {
                    let value = std::mem::take(&mut self.edit_buffer);
                    match self.mode {
                        AppMode::EditingProviderUrl => self.settings.provider_url = value,
                        _ => self.settings.model_name = value,
                    }
                    self.mode = AppMode::Settings;
                }
                KeyCode::Esc => {
                    self.edit_buffer.clear();
                    self.mode = AppMode::Settings;
                }
                KeyCode::Backspace => {
                    self.edit_buffer.pop();
                }
                KeyCode::Char(c) => self.edit_buffer.push(c),
                _ => {}
            },
        }
    }

    /// Backdrop semantics: a click whose target is outside the dialog closes
    /// it; a click inside the dialog body does not.
    fn on_mouse_down(&mut self, column: u16, row: u16) {
        if !self.modal_open() {
            return;
        }
        if let Some(rect) = self.modal_rect {
            if !rect.contains(Position::new(column, row)) {
                self.close_settings();
            }
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.field {
            MetricsField::DailyRevenue => &mut self.form.daily_revenue,
            MetricsField::DailyCost => &mut self.form.daily_cost,
            MetricsField::DailyCustomers => &mut self.form.daily_customers,
            MetricsField::PrevRevenue => &mut self.form.prev_revenue,
            MetricsField::PrevCost => &mut self.form.prev_cost,
            MetricsField::PrevCustomers => &mut self.form.prev_customers,
        }
    }
}

/// Modal size: 70% of the terminal, but at least 40x10 and at most 80x16.
fn modal_area(size: Rect) -> Rect {
    let modal_width = (((size.width as f32) * 0.7).round() as u16)
        .clamp(40, 80)
        .min(size.width);
    let modal_height = (((size.height as f32) * 0.5).round() as u16)
        .clamp(10, 16)
        .min(size.height);
    Rect::new(
        (size.width.saturating_sub(modal_width)) / 2,
        (size.height.saturating_sub(modal_height)) / 2,
        modal_width,
        modal_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::transcript::ChatEntry;

    fn app() -> App {
        App::new(Settings::default())
    }

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            profit_loss_status: "Profitable".to_string(),
            alerts_or_warnings: vec![],
            decision_making_recommendations: vec!["Continue monitoring.".to_string()],
        }
    }

    #[tokio::test]
    async fn submit_creates_one_user_and_one_pending_bubble() {
        let mut app = app();
        app.form.daily_revenue = "100".to_string();
        app.form.prev_revenue = "90".to_string();

        app.submit_metrics();

        let entries = app.transcript.entries();
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], ChatEntry::User { text, .. }
            if text.contains("Today:\n- Revenue: $100")));
        assert!(matches!(
            &entries[1],
            ChatEntry::Pending { request: 0, .. }
        ));
    }

    #[tokio::test]
    async fn each_submission_gets_its_own_request_id() {
        let mut app = app();
        app.submit_metrics();
        app.submit_metrics();

        let pendings: Vec<u64> = app
            .transcript
            .entries()
            .iter()
            .filter_map(|e| match e {
                ChatEntry::Pending { request, .. } => Some(*request),
                _ => None,
            })
            .collect();
        assert_eq!(pendings, vec![0, 1]);
    }

    #[tokio::test]
    async fn analysis_success_replaces_pending_with_report() {
        let mut app = app();
        app.submit_metrics();

        app.apply_message(AppMessage::AnalysisDone {
            request: 0,
            result: Ok(sample_report()),
        });

        let entries = app.transcript.entries();
        assert_eq!(entries.len(), 2);
        assert!(!app.transcript.has_pending());
        assert!(matches!(&entries[1], ChatEntry::Report { .. }));
    }

    #[tokio::test]
    async fn analysis_failure_replaces_pending_with_error_bubble() {
        let mut app = app();
        app.submit_metrics();

        app.apply_message(AppMessage::AnalysisDone {
            request: 0,
            result: Err(ApiError::Api("HTTP error! Status: 500".to_string())),
        });

        let entries = app.transcript.entries();
        assert!(!app.transcript.has_pending());
        assert!(matches!(&entries[1], ChatEntry::Agent { text, .. }
            if text == "Error: HTTP error! Status: 500"));
    }

    #[tokio::test]
    async fn out_of_order_completions_resolve_independently() {
        let mut app = app();
        app.submit_metrics();
        app.submit_metrics();

        // The later request resolves first
        app.apply_message(AppMessage::AnalysisDone {
            request: 1,
            result: Ok(sample_report()),
        });
        assert!(app.transcript.has_pending());

        app.apply_message(AppMessage::AnalysisDone {
            request: 0,
            result: Err(ApiError::Api("boom".to_string())),
        });
        assert!(!app.transcript.has_pending());
    }

    #[test]
    fn settings_success_sets_feedback_and_close_deadline() {
        let mut app = app();
        app.open_settings();

        app.apply_message(AppMessage::SettingsSaved(Ok(
            "Settings updated successfully!".to_string(),
        )));

        assert_eq!(
            app.feedback,
            SettingsFeedback::Success("Settings updated successfully!".to_string())
        );
        assert!(app.close_modal_at.is_some());
        assert_eq!(app.mode, AppMode::Settings);
    }

    #[test]
    fn settings_failure_keeps_modal_open() {
        let mut app = app();
        app.open_settings();

        app.apply_message(AppMessage::SettingsSaved(Err(ApiError::Api(
            "Failed to save settings.".to_string(),
        ))));

        assert_eq!(
            app.feedback,
            SettingsFeedback::Error("Failed to save settings.".to_string())
        );
        assert!(app.close_modal_at.is_none());
        assert_eq!(app.mode, AppMode::Settings);
    }

    #[test]
    fn elapsed_close_deadline_closes_the_modal() {
        let mut app = app();
        app.open_settings();
        app.close_modal_at = Some(Instant::now() - Duration::from_millis(1));

        app.tick();

        assert_eq!(app.mode, AppMode::Metrics);
        assert!(app.close_modal_at.is_none());
    }

    #[test]
    fn opening_settings_resets_feedback() {
        let mut app = app();
        app.feedback = SettingsFeedback::Error("old failure".to_string());

        app.open_settings();

        assert_eq!(app.feedback, SettingsFeedback::Idle);
        assert_eq!(app.selection, SettingsSelection::ProviderUrl);
    }

    #[test]
    fn backdrop_click_closes_but_inner_click_does_not() {
        let mut app = app();
        app.open_settings();
        app.modal_rect = Some(Rect::new(10, 5, 40, 12));

        app.on_mouse_down(12, 6); // inside the dialog
        assert_eq!(app.mode, AppMode::Settings);

        app.on_mouse_down(0, 0); // backdrop
        assert_eq!(app.mode, AppMode::Metrics);
    }

    #[test]
    fn temperature_arrows_only_move_the_slider_row() {
        let mut app = app();
        app.open_settings();
        let before = app.settings.temperature;

        app.on_key(KeyEvent::from(KeyCode::Right));
        assert!((app.settings.temperature - before).abs() < f32::EPSILON);

        app.selection = SettingsSelection::Temperature;
        app.on_key(KeyEvent::from(KeyCode::Right));
        assert!((app.settings.temperature - (before + TEMPERATURE_STEP)).abs() < 1e-6);
    }

    #[test]
    fn metrics_fields_accept_numeric_text_only() {
        let mut app = app();
        for key in ['1', '2', '.', '5', 'x'] {
            app.on_key(KeyEvent::from(KeyCode::Char(key)));
        }
        assert_eq!(app.form.daily_revenue, "12.5");
    }

    #[test]
    fn editing_model_name_commits_on_enter() {
        let mut app = app();
        app.open_settings();
        app.selection = SettingsSelection::ModelName;

        app.on_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::EditingModelName);
        for c in "gpt-4o".chars() {
            app.on_key(KeyEvent::from(KeyCode::Char(c)));
        }
        app.on_key(KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.mode, AppMode::Settings);
        assert_eq!(app.settings.model_name, "gpt-4o");
    }

    #[test]
    fn modal_area_is_centered_and_clamped() {
        let area = modal_area(Rect::new(0, 0, 120, 40));
        assert!(area.width >= 40 && area.width <= 80);
        assert!(area.height >= 10 && area.height <= 16);
        assert_eq!(area.x, (120 - area.width) / 2);
    }
}
