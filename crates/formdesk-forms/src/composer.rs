//! Form composer
//!
//! Hosts one [`FormSchema`], tracks the values entered so far and runs the
//! submit cycle:
//!
//! ```text
//! Idle ──submit──▶ Validating ──invalid──▶ Idle (error banner, no request)
//!                       │
//!                       └──valid──▶ Submitting ──ok──▶ Idle (reset, dialog closes)
//!                                        │
//!                                        └──err──▶ Idle (values kept, dialog stays)
//! ```

use formdesk_common::{FieldError, FieldSchema, FormSchema, FormdeskError, FormdeskResult, Payload, Record};
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dates::DateFormat;
use crate::render::{render_field, validate_field, WidgetToolkit};
use crate::value::{FieldValue, FormValues};

/// Banner shown when validation fails
pub const INVALID_FORM_MESSAGE: &str = "There are errors in the form. Please correct before saving.";

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Accepting input
    Idle,
    /// Checking constraints
    Validating,
    /// Waiting for the submit callback
    Submitting,
}

/// Alert shown under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    /// Validation failed
    InvalidForm,
    /// The save request failed
    SaveFailed(String),
}

impl Banner {
    /// Text of the alert
    pub fn message(&self) -> String {
        match self {
            Self::InvalidForm => INVALID_FORM_MESSAGE.to_string(),
            Self::SaveFailed(reason) => format!("Could not save: {reason}"),
        }
    }
}

/// Why a submit did not start
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitBlocked {
    /// Validation failed
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
    /// A submit is already in flight
    #[error("a submit is already in flight")]
    InFlight,
}

/// Result of a full submit cycle
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Validation failed, nothing was sent
    Invalid(Vec<FieldError>),
    /// Another submit was still in flight
    InFlight,
    /// The callback succeeded; the form was reset
    Submitted(T),
    /// The callback failed; values are kept
    Failed(FormdeskError),
}

impl<T> SubmitOutcome<T> {
    /// True when the hosting dialog should close
    pub fn closes_dialog(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Dynamic form bound to a schema
#[derive(Debug, Clone)]
pub struct FormComposer {
    schema: FormSchema,
    dates: DateFormat,
    initial: FormValues,
    kept_ranges: BTreeMap<String, (String, String)>,
    initial_kept_ranges: BTreeMap<String, (String, String)>,
    values: FormValues,
    errors: BTreeMap<String, String>,
    phase: FormPhase,
    banner: Option<Banner>,
}

impl FormComposer {
    /// Empty form
    pub fn new(schema: FormSchema, dates: DateFormat) -> Self {
        Self::with_initial(schema, dates, FormValues::new())
    }

    /// Form pre-filled with `initial`; reset returns to these values
    pub fn with_initial(schema: FormSchema, dates: DateFormat, initial: FormValues) -> Self {
        Self {
            schema,
            dates,
            values: initial.clone(),
            initial,
            kept_ranges: BTreeMap::new(),
            initial_kept_ranges: BTreeMap::new(),
            errors: BTreeMap::new(),
            phase: FormPhase::Idle,
            banner: None,
        }
    }

    /// Form pre-filled from an existing record, for editing.
    ///
    /// Stored dates that do not parse are sent back unchanged unless the
    /// range is set or cleared.
    pub fn for_record(schema: FormSchema, dates: DateFormat, record: &Record) -> Self {
        let initial = FormValues::from_record(&schema, record, &dates);
        let kept = FormValues::unparsed_ranges(&schema, record, &dates);
        let mut form = Self::with_initial(schema, dates, initial);
        form.kept_ranges = kept.clone();
        form.initial_kept_ranges = kept;
        form
    }

    /// The schema
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Date format used for the payload
    pub fn date_format(&self) -> &DateFormat {
        &self.dates
    }

    /// Current values
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value under `key`
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Set the value of the field with logical key `key`.
    ///
    /// Fails for unknown keys and for values of the wrong shape.
    pub fn set_value(&mut self, key: &str, value: FieldValue) -> FormdeskResult<()> {
        let field = self.field(key)?;
        if !value.fits(field) {
            return Err(FormdeskError::Validation(vec![FieldError::new(
                key,
                format!("{} cannot hold this kind of value", field.label()),
            )]));
        }
        self.values.insert(key, value);
        self.kept_ranges.remove(key);
        self.errors.remove(key);
        Ok(())
    }

    /// Parse raw text for `key` and set it
    pub fn set_input(&mut self, key: &str, raw: &str) -> FormdeskResult<()> {
        let value = FieldValue::parse_input(self.field(key)?, raw, &self.dates)?;
        self.set_value(key, value)
    }

    /// Unset the value under `key`
    pub fn clear_value(&mut self, key: &str) -> FormdeskResult<()> {
        self.field(key)?;
        self.values.remove(key);
        self.kept_ranges.remove(key);
        Ok(())
    }

    /// Field errors from the last validation, keyed by logical key
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Error for one field
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Current alert
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Submit cycle position
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Loading indicator on the confirm control
    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Confirm control disabled
    pub fn confirm_disabled(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Draw every field in schema order
    pub fn render<W: WidgetToolkit>(&self, toolkit: &mut W) -> Vec<W::Output> {
        self.schema
            .fields()
            .iter()
            .map(|field| render_field(field, &self.values, &self.errors, toolkit))
            .collect()
    }

    /// Validate every field, recording errors and the banner.
    pub fn validate(&mut self) -> Result<(), Vec<FieldError>> {
        let previous = self.phase;
        self.phase = FormPhase::Validating;

        let failures: Vec<FieldError> = self
            .schema
            .fields()
            .iter()
            .filter_map(|field| validate_field(field, self.values.get(&field.key())))
            .collect();

        self.phase = previous;
        self.errors = failures
            .iter()
            .map(|e| (e.key.clone(), e.message.clone()))
            .collect();

        if failures.is_empty() {
            self.banner = None;
            Ok(())
        } else {
            debug!(count = failures.len(), "form validation failed");
            self.banner = Some(Banner::InvalidForm);
            Err(failures)
        }
    }

    /// Normalized payload for the current values.
    ///
    /// Unset fields become `""`; a date range becomes two formatted dates
    /// under its start and end names.
    pub fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        for field in self.schema.fields() {
            let value = self.values.get(&field.key());
            match field {
                FieldSchema::Text { name, .. }
                | FieldSchema::TextArea { name, .. }
                | FieldSchema::Select { name, .. } => {
                    let text = value.and_then(FieldValue::as_text).unwrap_or_default();
                    payload.insert(name.clone(), text.to_string());
                }
                FieldSchema::DateRange { name: (start, end), .. } => {
                    let (from, to) = match value.and_then(FieldValue::as_range) {
                        Some((from, to)) => (self.dates.format(from), self.dates.format(to)),
                        None => self.kept_ranges.get(&field.key()).cloned().unwrap_or_default(),
                    };
                    payload.insert(start.clone(), from);
                    payload.insert(end.clone(), to);
                }
            }
        }
        payload
    }

    /// Validate and enter `Submitting`, returning the payload to send.
    pub fn begin_submit(&mut self) -> Result<Payload, SubmitBlocked> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitBlocked::InFlight);
        }
        self.validate().map_err(SubmitBlocked::Invalid)?;
        self.phase = FormPhase::Submitting;
        Ok(self.payload())
    }

    /// Leave `Submitting` with the callback's result.
    pub fn finish_submit<T>(&mut self, result: FormdeskResult<T>) -> SubmitOutcome<T> {
        self.phase = FormPhase::Idle;
        match result {
            Ok(value) => {
                self.reset();
                SubmitOutcome::Submitted(value)
            }
            Err(err) => {
                warn!(error = %err, "form submit failed");
                self.banner = Some(Banner::SaveFailed(err.to_string()));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Run a whole submit cycle with `on_submit` as the request.
    pub async fn submit<F, Fut, T>(&mut self, on_submit: F) -> SubmitOutcome<T>
    where
        F: FnOnce(Payload) -> Fut,
        Fut: Future<Output = FormdeskResult<T>>,
    {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(SubmitBlocked::Invalid(errors)) => return SubmitOutcome::Invalid(errors),
            Err(SubmitBlocked::InFlight) => return SubmitOutcome::InFlight,
        };
        let result = on_submit(payload).await;
        self.finish_submit(result)
    }

    /// Back to the initial values, no errors, no banner
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.kept_ranges = self.initial_kept_ranges.clone();
        self.errors.clear();
        self.banner = None;
        self.phase = FormPhase::Idle;
    }

    fn field(&self, key: &str) -> FormdeskResult<&FieldSchema> {
        self.schema.field(key).ok_or_else(|| {
            FormdeskError::Validation(vec![FieldError::new(key, format!("unknown field '{key}'"))])
        })
    }
}
