//! Interactive booking wizard REPL
//!
//! Drives one `BookingWizard` instance from the terminal: date, time slot,
//! contact details, submit. Backing up a step and retrying a failed
//! submission map onto the wizard's own transitions.

use std::sync::Arc;

use bw_api::BookingApiClient;
use bw_wizard::{BookingWizard, SubmitOutcome, WizardState};
use nu_ansi_term::{Color, Style};
use reedline::{Reedline, Signal};

/// Prompt showing the current wizard step
struct StepPrompt {
    label: String,
    style: Style,
}

impl StepPrompt {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: Color::Cyan.bold(),
        }
    }
}

impl reedline::Prompt for StepPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.style.paint(format!("{} > ", self.label)).to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(
        &self,
        _prompt_mode: reedline::PromptEditMode,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }
}

/// Whether an input line is the step-back command rather than a value.
fn is_back(input: &str) -> bool {
    input.eq_ignore_ascii_case("back")
}

/// Read one trimmed line; None means the user bailed out (Ctrl+C/Ctrl+D).
fn read_input(editor: &mut Reedline, label: &str) -> anyhow::Result<Option<String>> {
    let prompt = StepPrompt::new(label);
    match editor.read_line(&prompt)? {
        Signal::Success(line) => Ok(Some(line.trim().to_string())),
        Signal::CtrlC | Signal::CtrlD => Ok(None),
    }
}

/// Run the interactive booking wizard against the live API.
pub async fn run_wizard(client: Arc<BookingApiClient>) -> anyhow::Result<()> {
    let mut wizard = BookingWizard::new(client);
    let mut editor = Reedline::create();

    println!("Bookwise booking wizard. Type `back` to go a step back, Ctrl+D to quit.\n");

    'wizard: loop {
        match wizard.state().clone() {
            WizardState::SelectingDate => {
                let Some(input) = read_input(&mut editor, "date (YYYY-MM-DD)")? else {
                    break;
                };
                if input.is_empty() && wizard.draft().selected_date.is_some() {
                    // Keep the previously chosen date
                    wizard.resume()?;
                    continue;
                }
                let date = match input.parse() {
                    Ok(date) => date,
                    Err(_) => {
                        eprintln!("Not a date: {}", input);
                        continue;
                    }
                };
                if let Err(e) = wizard.choose_date(date) {
                    eprintln!("{}", e);
                }
            }
            WizardState::SelectingTimeSlot => {
                if let Err(e) = wizard.refresh_availability().await {
                    eprintln!("Could not load availability: {}", e);
                    wizard.back()?;
                    continue;
                }
                let slots = wizard.selectable_slots();
                if slots.is_empty() {
                    println!("No free slots on that date, pick another.");
                    wizard.back()?;
                    continue;
                }
                println!("Available slots:");
                for slot in &slots {
                    println!(
                        "  {}  ({} of {} taken)",
                        slot.interval(),
                        slot.current_bookings,
                        slot.max_bookings
                    );
                }
                let Some(input) = read_input(&mut editor, "slot (HH:MM-HH:MM)")? else {
                    break;
                };
                if is_back(&input) {
                    wizard.back()?;
                    continue;
                }
                if let Err(e) = wizard.choose_slot(&input) {
                    eprintln!("{}", e);
                }
            }
            WizardState::EnteringContactInfo => {
                if let Err(e) = wizard.load_custom_fields().await {
                    // Without the field definitions required-field validation
                    // cannot run; return to slot selection instead of taking
                    // a contact form we cannot validate.
                    eprintln!("Could not load form fields: {}", e);
                    wizard.back()?;
                    continue;
                }
                let Some(name) = read_input(&mut editor, "name")? else { break };
                if is_back(&name) {
                    wizard.back()?;
                    continue;
                }
                let Some(email) = read_input(&mut editor, "email")? else { break };
                if is_back(&email) {
                    wizard.back()?;
                    continue;
                }
                let Some(phone) = read_input(&mut editor, "phone (optional)")? else {
                    break;
                };
                if is_back(&phone) {
                    wizard.back()?;
                    continue;
                }
                let phone = if phone.is_empty() { None } else { Some(phone) };
                wizard.set_contact(name, email, phone)?;

                for field in wizard.fields().to_vec() {
                    let label = if field.required {
                        format!("{} (required)", field.label)
                    } else {
                        field.label.clone()
                    };
                    let Some(value) = read_input(&mut editor, &label)? else {
                        break 'wizard;
                    };
                    if !value.is_empty() {
                        wizard.set_custom_value(field.id.clone(), value)?;
                    }
                }

                match wizard.submit().await {
                    Ok(SubmitOutcome::Completed { booking_id }) => {
                        println!("\nBooking confirmed: {}\n", booking_id);
                        break;
                    }
                    Ok(SubmitOutcome::SlotTaken) => {
                        println!("\nThat slot just filled up, please pick another.\n");
                    }
                    Ok(SubmitOutcome::Failed { message }) => {
                        eprintln!("\nSubmission failed: {}", message);
                        let Some(answer) = read_input(&mut editor, "retry? (y/n)")? else {
                            break;
                        };
                        if answer.eq_ignore_ascii_case("y") {
                            match wizard.retry().await? {
                                SubmitOutcome::Completed { booking_id } => {
                                    println!("\nBooking confirmed: {}\n", booking_id);
                                    break;
                                }
                                SubmitOutcome::SlotTaken => {
                                    println!("\nThat slot just filled up, please pick another.\n");
                                }
                                SubmitOutcome::Failed { message } => {
                                    eprintln!("\nStill failing: {}\n", message);
                                    break;
                                }
                            }
                        } else {
                            break;
                        }
                    }
                    Err(e) => {
                        // Validation error: stay on the contact step
                        eprintln!("{}", e);
                    }
                }
            }
            WizardState::Submitting
            | WizardState::Completed { .. }
            | WizardState::Failed { .. } => break,
        }
    }

    Ok(())
}
