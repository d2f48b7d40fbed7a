//! Raw form values

use chrono::NaiveDate;
use formdesk_common::{FieldError, FieldSchema, FormSchema, FormdeskError, FormdeskResult, Record};
use std::collections::BTreeMap;

use crate::dates::DateFormat;

/// Current value of one control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text, text area and select values
    Text(String),
    /// Both ends of a date range
    Range {
        /// First day
        start: NaiveDate,
        /// Last day
        end: NaiveDate,
    },
}

impl FieldValue {
    /// Text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Date range value
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Range { start, end }
    }

    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Range { .. } => None,
        }
    }

    /// Both dates, if this is a range value
    pub fn as_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::Range { start, end } => Some((*start, *end)),
            Self::Text(_) => None,
        }
    }

    /// Whether this value has the shape `field` expects
    pub fn fits(&self, field: &FieldSchema) -> bool {
        match field {
            FieldSchema::Text { .. } | FieldSchema::TextArea { .. } | FieldSchema::Select { .. } => {
                matches!(self, Self::Text(_))
            }
            FieldSchema::DateRange { .. } => matches!(self, Self::Range { .. }),
        }
    }

    /// Parse command-line style input for `field`.
    ///
    /// Date ranges are written `start,end`; each end in ISO or the display format.
    pub fn parse_input(field: &FieldSchema, raw: &str, dates: &DateFormat) -> FormdeskResult<Self> {
        match field {
            FieldSchema::Text { .. } | FieldSchema::TextArea { .. } | FieldSchema::Select { .. } => {
                Ok(Self::Text(raw.to_string()))
            }
            FieldSchema::DateRange { label, .. } => {
                let invalid = || {
                    FormdeskError::Validation(vec![FieldError::new(
                        field.key(),
                        format!("{label} expects two dates separated by a comma"),
                    )])
                };
                let (start, end) = raw.split_once(',').ok_or_else(invalid)?;
                let start = dates.parse(start).ok_or_else(invalid)?;
                let end = dates.parse(end).ok_or_else(invalid)?;
                Ok(Self::Range { start, end })
            }
        }
    }
}

/// Values keyed by logical field key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    /// No values
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill values for editing `record`. Fields the record lacks, and
    /// dates that do not parse, are left unset.
    pub fn from_record(schema: &FormSchema, record: &Record, dates: &DateFormat) -> Self {
        let mut values = Self::new();
        for field in schema.fields() {
            match field {
                FieldSchema::Text { name, .. }
                | FieldSchema::TextArea { name, .. }
                | FieldSchema::Select { name, .. } => {
                    if let Some(v) = record.get(name) {
                        values.insert(field.key(), FieldValue::text(v));
                    }
                }
                FieldSchema::DateRange { name: (start, end), .. } => {
                    let parsed = record
                        .get(start)
                        .and_then(|s| dates.parse(s))
                        .zip(record.get(end).and_then(|e| dates.parse(e)));
                    if let Some((start, end)) = parsed {
                        values.insert(field.key(), FieldValue::range(start, end));
                    }
                }
            }
        }
        values
    }

    /// Stored start and end strings of the ranges in `record` that
    /// [`from_record`](Self::from_record) could not parse, by logical key.
    pub fn unparsed_ranges(
        schema: &FormSchema,
        record: &Record,
        dates: &DateFormat,
    ) -> BTreeMap<String, (String, String)> {
        let prefilled = Self::from_record(schema, record, dates);
        schema
            .fields()
            .iter()
            .filter_map(|field| match field {
                FieldSchema::DateRange { name: (start, end), .. } => {
                    let key = field.key();
                    let raw = (record.get_or_empty(start), record.get_or_empty(end));
                    let stored = !raw.0.is_empty() || !raw.1.is_empty();
                    (stored && prefilled.get(&key).is_none())
                        .then(|| (key, (raw.0.to_string(), raw.1.to_string())))
                }
                _ => None,
            })
            .collect()
    }

    /// Value under `key`
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Set a value
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.values.insert(key.into(), value);
    }

    /// Unset a value
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.values.remove(key)
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    /// Number of set values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdesk_common::{user_plan_schema, Payload};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_record_prefills_every_kind() {
        let schema = FormSchema::new(user_plan_schema()).unwrap();
        let record = Record::new(
            "3",
            Payload::from([
                ("user".into(), "Ada".into()),
                ("title".into(), "Conference".into()),
                ("type".into(), "generic".into()),
                ("startDate".into(), "2024-02-01".into()),
                ("endDate".into(), "2/3/2024".into()),
            ]),
        );
        let values = FormValues::from_record(&schema, &record, &DateFormat::default());

        assert_eq!(values.get("title"), Some(&FieldValue::text("Conference")));
        assert_eq!(
            values.get("startDate:endDate"),
            Some(&FieldValue::range(date(2024, 2, 1), date(2024, 2, 3)))
        );
        assert!(values.get("description").is_none());
    }

    #[test]
    fn test_unparseable_range_left_unset() {
        let schema = FormSchema::new(user_plan_schema()).unwrap();
        let record = Record::new(
            "3",
            Payload::from([
                ("startDate".into(), "soon".into()),
                ("endDate".into(), "2024-01-01".into()),
            ]),
        );
        let values = FormValues::from_record(&schema, &record, &DateFormat::default());
        assert!(values.get("startDate:endDate").is_none());
    }

    #[test]
    fn test_parse_range_input() {
        let field = FieldSchema::date_range("from", "to", "Period");
        let fmt = DateFormat::default();
        assert_eq!(
            FieldValue::parse_input(&field, "2024-01-01,1/4/2024", &fmt).unwrap(),
            FieldValue::range(date(2024, 1, 1), date(2024, 1, 4))
        );
        assert!(FieldValue::parse_input(&field, "2024-01-01", &fmt).is_err());
    }

    #[test]
    fn test_fits() {
        let text = FieldSchema::text("a", "A", false);
        let range = FieldSchema::date_range("s", "e", "R");
        assert!(FieldValue::text("x").fits(&text));
        assert!(!FieldValue::text("x").fits(&range));
        assert!(FieldValue::range(date(2024, 1, 1), date(2024, 1, 1)).fits(&range));
    }
}
