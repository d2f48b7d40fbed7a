//! Field renderer
//!
//! Maps each [`FieldSchema`] variant onto a bound control and draws it
//! through a [`WidgetToolkit`]. The match in [`render_field`] and
//! [`validate_field`] is exhaustive on purpose: a new variant does not
//! compile until both know how to handle it.

use chrono::NaiveDate;
use formdesk_common::{FieldError, FieldSchema, SelectOption};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::dates::DateFormat;
use crate::value::{FieldValue, FormValues};

/// Per-control state handed to the toolkit
#[derive(Debug, Clone, Copy)]
pub struct BoundControl<'a> {
    /// Schema entry being drawn
    pub field: &'a FieldSchema,
    /// Logical key the value is bound to
    pub key: &'a str,
    /// Label
    pub label: &'a str,
    /// Show the required marker
    pub required: bool,
    /// Validation message from the last submit
    pub error: Option<&'a str>,
}

/// Generic input-widget library
pub trait WidgetToolkit {
    /// What one drawn control turns into
    type Output;

    /// Single-line text input
    fn text_input(&mut self, control: &BoundControl<'_>, value: &str) -> Self::Output;

    /// Multi-line text input
    fn text_area(&mut self, control: &BoundControl<'_>, value: &str) -> Self::Output;

    /// Closed choice. `selected` is the option matching the current value.
    fn select(
        &mut self,
        control: &BoundControl<'_>,
        options: &[SelectOption],
        selected: Option<&SelectOption>,
    ) -> Self::Output;

    /// Paired date inputs
    fn date_range(
        &mut self,
        control: &BoundControl<'_>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Self::Output;
}

/// Draw one field bound to its current value and error.
pub fn render_field<W: WidgetToolkit>(
    field: &FieldSchema,
    values: &FormValues,
    errors: &BTreeMap<String, String>,
    toolkit: &mut W,
) -> W::Output {
    let key = field.key();
    let value = values.get(&key);
    let control = BoundControl {
        field,
        key: &key,
        label: field.label(),
        required: field.is_required(),
        error: errors.get(&key).map(String::as_str),
    };
    let text = value.and_then(FieldValue::as_text).unwrap_or_default();

    match field {
        FieldSchema::Text { .. } => toolkit.text_input(&control, text),
        FieldSchema::TextArea { .. } => toolkit.text_area(&control, text),
        FieldSchema::Select { options, .. } => {
            let selected = options.iter().find(|o| o.value == text);
            toolkit.select(&control, options, selected)
        }
        FieldSchema::DateRange { .. } => {
            toolkit.date_range(&control, value.and_then(FieldValue::as_range))
        }
    }
}

/// Check one field's value against its constraints.
pub fn validate_field(field: &FieldSchema, value: Option<&FieldValue>) -> Option<FieldError> {
    let key = field.key();
    let text = value.and_then(FieldValue::as_text).unwrap_or_default();

    match field {
        FieldSchema::Text { label, required, .. } => (*required && text.trim().is_empty())
            .then(|| FieldError::new(key, format!("{label} is required"))),
        FieldSchema::TextArea { .. } => None,
        FieldSchema::Select { label, options, .. } => (!text.is_empty()
            && !options.iter().any(|o| o.value == text))
        .then(|| FieldError::new(key, format!("{label} must be one of the listed options"))),
        FieldSchema::DateRange { label, .. } => match value.and_then(FieldValue::as_range) {
            Some((start, end)) if end < start => Some(FieldError::new(
                key,
                format!("{label} ends before it starts"),
            )),
            _ => None,
        },
    }
}

/// Toolkit that draws a form as plain text, one line per control
/// (plus one for an error).
#[derive(Debug, Default)]
pub struct TextToolkit {
    dates: DateFormat,
}

impl TextToolkit {
    /// Toolkit writing dates with `dates`
    pub fn new(dates: DateFormat) -> Self {
        Self { dates }
    }

    fn line(control: &BoundControl<'_>, widget: String) -> String {
        let marker = if control.required { " *" } else { "" };
        let mut out = format!("{:<16} {}", format!("{}{}", control.label, marker), widget);
        if let Some(error) = control.error {
            let _ = write!(out, "\n{:<16} ! {}", "", error);
        }
        out
    }
}

impl WidgetToolkit for TextToolkit {
    type Output = String;

    fn text_input(&mut self, control: &BoundControl<'_>, value: &str) -> String {
        Self::line(control, format!("[{value:<24}]"))
    }

    fn text_area(&mut self, control: &BoundControl<'_>, value: &str) -> String {
        let shown = value.replace('\n', " ⏎ ");
        Self::line(control, format!("[[{shown:<23}]]"))
    }

    fn select(
        &mut self,
        control: &BoundControl<'_>,
        options: &[SelectOption],
        selected: Option<&SelectOption>,
    ) -> String {
        let choices = options
            .iter()
            .map(|o| {
                let mark = if selected == Some(o) { "(•)" } else { "( )" };
                format!("{mark} {}", o.label)
            })
            .collect::<Vec<_>>()
            .join("  ");
        Self::line(control, choices)
    }

    fn date_range(
        &mut self,
        control: &BoundControl<'_>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> String {
        let widget = match range {
            Some((start, end)) => format!(
                "[{}] → [{}]",
                self.dates.format(start),
                self.dates.format(end)
            ),
            None => "[  start  ] → [   end   ]".to_string(),
        };
        Self::line(control, widget)
    }
}
