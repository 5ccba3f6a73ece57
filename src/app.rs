//! Application state and key handling around a running wizard

use crate::draft::DraftStatus;
use crate::gateway::SubmissionSink;
use crate::platform::SHORTCUT_MODIFIER;
use crate::state::{AppState, FieldKind, Phase, SubmitError, Transition, View, Wizard};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Main application struct
pub struct App {
    /// UI-only state
    pub state: AppState,
    /// The wizard being filled in
    pub wizard: Wizard,
    /// Where finished submissions are delivered
    sink: Arc<dyn SubmissionSink>,
    /// Outcome of the delivery currently in flight
    pending: Option<oneshot::Receiver<anyhow::Result<()>>>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    pub fn new(wizard: Wizard, sink: Arc<dyn SubmissionSink>) -> Self {
        tracing::info!(wizard = wizard.id(), sink = sink.name(), "starting");
        Self {
            state: AppState::default(),
            wizard,
            sink,
            pending: None,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    pub fn is_delivering(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Error dialog is modal
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return;
        }

        if key.modifiers.contains(SHORTCUT_MODIFIER) && key.code == KeyCode::Char('q') {
            self.close();
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.save_draft();
            return;
        }

        if key.code == KeyCode::F(1) {
            self.state.toggle_help();
            return;
        }

        self.state.status_message = None;

        match self.state.current_view {
            View::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.state.toggle_help();
                }
            }
            View::Wizard => match self.wizard.phase() {
                Phase::Submitted(_) => self.handle_submitted_key(key),
                _ => self.handle_wizard_key(key),
            },
        }
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(c @ '1'..='9') = key.code {
                let index = (c as usize) - ('1' as usize);
                self.navigate(|w| w.jump_to(index));
                return;
            }
        }

        let Some(key_name) = self.wizard.active_field_key() else {
            return;
        };
        let (kind, multiline) = match self.wizard.field(key_name) {
            Some(field) => (field.kind.clone(), field.is_multiline()),
            None => return,
        };

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.wizard.focus_next();
                self.state.option_cursor = 0;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.wizard.focus_prev();
                self.state.option_cursor = 0;
            }
            KeyCode::PageDown => self.advance(),
            KeyCode::PageUp => self.navigate(Wizard::back),
            KeyCode::Enter if multiline => {
                self.wizard.edit_field(key_name, |f| f.push_char('\n'));
            }
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => {
                if self.wizard.step_index() == 0 {
                    self.close();
                } else {
                    self.navigate(Wizard::back);
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match kind {
                    FieldKind::Choice(_) => {
                        self.wizard
                            .edit_field(key_name, |f| f.cycle_choice(forward));
                    }
                    FieldKind::MultiSelect(options) => {
                        self.state.move_option_cursor(forward, options.len());
                    }
                    _ => {}
                }
            }
            KeyCode::Char(' ') if kind == FieldKind::Flag => {
                let current = self.wizard.field(key_name).is_some_and(|f| f.as_flag());
                self.wizard.set_flag(key_name, !current);
            }
            KeyCode::Char(' ') if matches!(kind, FieldKind::MultiSelect(_)) => {
                if let Some(option) = kind.options().get(self.state.option_cursor) {
                    self.wizard.toggle_member(key_name, option);
                }
            }
            KeyCode::Char(c) if matches!(kind, FieldKind::ShortText | FieldKind::LongText) => {
                self.wizard.edit_field(key_name, |f| f.push_char(c));
            }
            KeyCode::Backspace => {
                self.wizard.edit_field(key_name, |f| f.pop_char());
            }
            _ => {}
        }
    }

    fn handle_submitted_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                let offer = self.wizard.offer().cloned();
                self.wizard.reopen(offer);
                self.state.option_cursor = 0;
                self.state.set_status("Started a new form");
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.close(),
            _ => {}
        }
    }

    /// Next step, or submit when already on the last one
    fn advance(&mut self) {
        if self.wizard.is_last_step() {
            self.start_submission();
        } else {
            self.navigate(Wizard::next);
        }
    }

    fn navigate(&mut self, step: impl FnOnce(&mut Wizard) -> Transition) {
        match step(&mut self.wizard) {
            Transition::Moved { .. } => self.state.option_cursor = 0,
            Transition::Blocked { errors, .. } => {
                self.state.option_cursor = 0;
                self.state
                    .set_status(format!("{} field(s) need attention", errors.len()));
            }
            Transition::Unchanged if self.is_delivering() => {
                self.state.set_status("Submission in progress");
            }
            Transition::Unchanged => {}
        }
    }

    fn save_draft(&mut self) {
        match self.wizard.save_draft() {
            DraftStatus::Failed(reason) => {
                self.state.set_status(format!("Draft not saved: {reason}"));
            }
            _ => self.state.set_status("Draft saved"),
        }
    }

    /// Freeze the record and hand it to the sink on a background task
    fn start_submission(&mut self) {
        let record = match self.wizard.prepare_submission() {
            Ok(record) => record,
            Err(SubmitError::Invalid(errors)) => {
                self.state
                    .set_status(format!("{} field(s) need attention", errors.len()));
                return;
            }
            Err(e) => {
                self.state.set_status(e.to_string());
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let outcome = sink.deliver(&record).await;
            let _ = tx.send(outcome);
        });
        self.pending = Some(rx);
        self.state.set_status("Submitting...");
    }

    /// Settle the in-flight delivery once the sink has answered
    pub fn poll_submission(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(anyhow::anyhow!("delivery task ended without a result"))
            }
        };
        self.pending = None;
        self.wizard.complete_submission(outcome);
        match self.wizard.phase() {
            Phase::Submitted(_) => self.state.set_status("Thank you! Your submission was sent"),
            Phase::Failed(reason) => {
                let message = format!("Submission failed: {reason}");
                self.push_error(message);
            }
            _ => {}
        }
    }

    /// Wait for an in-flight delivery so quitting never drops a submission
    pub async fn finish_delivery(&mut self) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        let outcome = rx
            .await
            .unwrap_or_else(|_| Err(anyhow::anyhow!("delivery task ended without a result")));
        self.wizard.complete_submission(outcome);
    }

    fn close(&mut self) {
        self.wizard.dismiss();
        self.quit = true;
    }
}
