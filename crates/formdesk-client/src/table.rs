//! Record table view model

use formdesk_common::{FieldSchema, FormSchema, Record, SelectOption};
use formdesk_forms::DateFormat;

/// Title of the trailing actions column
pub const ACTIONS_TITLE: &str = "Actions";

/// Rows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How a column turns a stored value into a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Value shown as stored
    Plain,
    /// Value replaced by its option label
    Choice(Vec<SelectOption>),
    /// Value re-formatted as a display date
    Date,
}

/// One data column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header
    pub title: String,
    /// Record field read by this column
    pub field: String,
    /// Cell rendering
    pub kind: ColumnKind,
}

/// Per-row action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Open the form pre-filled with this row
    Edit,
    /// Delete this row
    Delete,
}

impl RowAction {
    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Record id the actions apply to
    pub id: String,
    /// One cell per data column
    pub cells: Vec<String>,
    /// Offered actions
    pub actions: Vec<RowAction>,
}

/// What the table is given to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// Records in display order
    pub records: Vec<Record>,
    /// A fetch is in flight
    pub is_loading: bool,
    /// Last fetch failed
    pub error: Option<String>,
    /// Requested page, 1-based
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            is_loading: false,
            error: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableState {
    /// Number of pages; an empty table still has one
    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size.max(1)).max(1)
    }

    /// Page actually shown: the requested one, clamped to `1..=page_count`
    pub fn current_page(&self) -> usize {
        self.page.clamp(1, self.page_count())
    }

    /// Records on the shown page, in stored order
    pub fn page_records(&self) -> &[Record] {
        let size = self.page_size.max(1);
        let start = (self.current_page() - 1) * size;
        let end = (start + size).min(self.records.len());
        &self.records[start.min(end)..end]
    }
}

/// Rendered table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// Fetch failed; only the message is shown
    Error(String),
    /// Normal table
    Rows {
        /// Headers, actions column last
        headers: Vec<String>,
        /// Rows of the shown page, in the order given
        rows: Vec<Row>,
        /// Loading overlay
        loading: bool,
        /// Shown page, 1-based
        page: usize,
        /// Number of pages
        page_count: usize,
        /// Records across all pages
        total: usize,
    },
}

/// Builds table views with columns derived from the form schema
#[derive(Debug, Clone)]
pub struct RecordTable {
    columns: Vec<Column>,
    dates: DateFormat,
}

impl RecordTable {
    /// One column per field; date ranges get a start and an end column
    pub fn new(schema: &FormSchema, dates: DateFormat) -> Self {
        let mut columns = Vec::new();
        for field in schema.fields() {
            match field {
                FieldSchema::Text { name, label, .. } | FieldSchema::TextArea { name, label } => {
                    columns.push(Column {
                        title: label.clone(),
                        field: name.clone(),
                        kind: ColumnKind::Plain,
                    });
                }
                FieldSchema::Select { name, label, options } => columns.push(Column {
                    title: label.clone(),
                    field: name.clone(),
                    kind: ColumnKind::Choice(options.clone()),
                }),
                FieldSchema::DateRange { name: (start, end), label } => {
                    columns.push(Column {
                        title: format!("{label} start"),
                        field: start.clone(),
                        kind: ColumnKind::Date,
                    });
                    columns.push(Column {
                        title: format!("{label} end"),
                        field: end.clone(),
                        kind: ColumnKind::Date,
                    });
                }
            }
        }
        Self { columns, dates }
    }

    /// Data columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Render one page of `state`. Records keep their given order.
    pub fn render(&self, state: &TableState) -> TableView {
        if let Some(error) = &state.error {
            return TableView::Error(format!("Error: {error}"));
        }

        let mut headers: Vec<String> = self.columns.iter().map(|c| c.title.clone()).collect();
        headers.push(ACTIONS_TITLE.to_string());

        let rows = state
            .page_records()
            .iter()
            .map(|record| Row {
                id: record.id.clone(),
                cells: self.columns.iter().map(|c| self.cell(c, record)).collect(),
                actions: vec![RowAction::Edit, RowAction::Delete],
            })
            .collect();

        TableView::Rows {
            headers,
            rows,
            loading: state.is_loading,
            page: state.current_page(),
            page_count: state.page_count(),
            total: state.records.len(),
        }
    }

    /// Text of one cell
    pub fn cell(&self, column: &Column, record: &Record) -> String {
        let raw = record.get_or_empty(&column.field);
        match &column.kind {
            ColumnKind::Plain => raw.to_string(),
            ColumnKind::Choice(options) => options
                .iter()
                .find(|o| o.value == raw)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| raw.to_string()),
            ColumnKind::Date => self
                .dates
                .parse(raw)
                .map(|d| self.dates.format(d))
                .unwrap_or_else(|| raw.to_string()),
        }
    }
}
