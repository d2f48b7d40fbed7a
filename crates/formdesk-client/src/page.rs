//! Admin page controller
//!
//! Holds the search term, the table state and the create/edit dialog, and
//! re-reads the table after every successful mutation.

use formdesk_common::{FormSchema, FormdeskError, FormdeskResult, Record};
use formdesk_forms::{DateFormat, FormComposer, SubmitOutcome};
use tracing::{debug, warn};

use crate::collection::RemoteCollectionClient;
use crate::schema::SchemaFetcher;
use crate::table::{RecordTable, TableState, TableView};
use crate::transport::CollectionTransport;

/// Record field used to name a record in notices
pub const TITLE_FIELD: &str = "title";

/// What the open dialog will do on save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    /// Create a new record
    Create,
    /// Update the record with this id
    Edit(String),
}

/// Modal hosting a form
#[derive(Debug, Clone)]
pub struct Dialog {
    /// Create or edit
    pub mode: DialogMode,
    /// The form
    pub form: FormComposer,
}

impl Dialog {
    /// Dialog title
    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Create new user",
            DialogMode::Edit(_) => "Edit user",
        }
    }
}

/// Toast shown after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Action succeeded
    Success(String),
    /// Action failed
    Failure(String),
}

/// Controller for the records page
pub struct AdminPage<T> {
    client: RemoteCollectionClient<T>,
    schema: SchemaFetcher,
    dates: DateFormat,
    search_term: String,
    table: TableState,
    dialog: Option<Dialog>,
    notice: Option<Notice>,
}

impl<T: CollectionTransport> AdminPage<T> {
    /// Page over `client`
    pub fn new(client: RemoteCollectionClient<T>, dates: DateFormat) -> Self {
        Self {
            client,
            schema: SchemaFetcher::new(),
            dates,
            search_term: String::new(),
            table: TableState::default(),
            dialog: None,
            notice: None,
        }
    }

    /// The collection client
    pub fn client(&self) -> &RemoteCollectionClient<T> {
        &self.client
    }

    /// Fetch the schema and the first page of records
    pub async fn load(&mut self) -> FormdeskResult<()> {
        self.schema().await?;
        self.refresh_table().await;
        Ok(())
    }

    /// The form schema, fetched on first use
    pub async fn schema(&self) -> FormdeskResult<&FormSchema> {
        self.schema.get(&self.client).await
    }

    /// Re-read the current query into the table.
    ///
    /// Failures are stored on the table state rather than returned.
    pub async fn refresh_table(&mut self) {
        self.table.is_loading = true;
        match self.client.search_latest(&self.search_term).await {
            Ok(Some(records)) => {
                self.table.records = records;
                self.table.error = None;
            }
            Ok(None) => debug!("superseded table read ignored"),
            Err(err) => {
                warn!(error = %err, "table read failed");
                self.table.error = Some(err.to_string());
            }
        }
        self.table.is_loading = false;
    }

    /// Change the search term, go back to the first page and re-read
    pub async fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.table.page = 1;
        self.refresh_table().await;
    }

    /// Show page `page` (1-based) of the current results
    pub fn set_page(&mut self, page: usize) {
        self.table.page = page;
    }

    /// Change the rows per page and go back to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.table.page_size = page_size.max(1);
        self.table.page = 1;
    }

    /// Empty the search box and re-read
    pub async fn clear_search(&mut self) {
        self.set_search_term("").await;
    }

    /// Current search term
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Table input
    pub fn table_state(&self) -> &TableState {
        &self.table
    }

    /// Rendered table; needs the schema for its columns
    pub async fn table_view(&self) -> FormdeskResult<TableView> {
        let schema = self.schema().await?;
        Ok(RecordTable::new(schema, self.dates.clone()).render(&self.table))
    }

    /// Open an empty create dialog
    pub async fn open_create(&mut self) -> FormdeskResult<&mut Dialog> {
        let schema = self.schema().await?.clone();
        let form = FormComposer::new(schema, self.dates.clone());
        Ok(self.dialog.insert(Dialog {
            mode: DialogMode::Create,
            form,
        }))
    }

    /// Open the edit dialog pre-filled from the row with `id`
    pub async fn open_edit(&mut self, id: &str) -> FormdeskResult<&mut Dialog> {
        let schema = self.schema().await?.clone();
        let record = self
            .table
            .records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| FormdeskError::NotFound(id.to_string()))?;
        let form = FormComposer::for_record(schema, self.dates.clone(), record);
        Ok(self.dialog.insert(Dialog {
            mode: DialogMode::Edit(id.to_string()),
            form,
        }))
    }

    /// The open dialog
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// The open dialog, for entering values
    pub fn dialog_mut(&mut self) -> Option<&mut Dialog> {
        self.dialog.as_mut()
    }

    /// Close the dialog, discarding its values
    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    /// Submit the open dialog. `None` when no dialog is open.
    ///
    /// On success the dialog closes, a notice is set and the table is
    /// re-read. On failure the dialog stays open with its values.
    pub async fn submit_dialog(&mut self) -> Option<SubmitOutcome<Record>> {
        let client = &self.client;
        let dialog = self.dialog.as_mut()?;

        let outcome = match &dialog.mode {
            DialogMode::Create => {
                dialog
                    .form
                    .submit(|payload| async move { client.create(&payload).await })
                    .await
            }
            DialogMode::Edit(id) => {
                let id = id.clone();
                dialog
                    .form
                    .submit(|payload| async move { client.update(&id, &payload).await })
                    .await
            }
        };

        match &outcome {
            SubmitOutcome::Submitted(record) => {
                let verb = match dialog.mode {
                    DialogMode::Create => "created",
                    DialogMode::Edit(_) => "edited",
                };
                self.notice = Some(Notice::Success(format!(
                    "{} successfully {verb}",
                    display_name(record)
                )));
                self.dialog = None;
                self.refresh_table().await;
            }
            SubmitOutcome::Failed(err) => {
                self.notice = Some(Notice::Failure(format!("Save failed: {err}")));
            }
            SubmitOutcome::Invalid(_) | SubmitOutcome::InFlight => {}
        }
        Some(outcome)
    }

    /// Delete the row with `id` and re-read
    pub async fn delete(&mut self, id: &str) -> FormdeskResult<()> {
        let name = self
            .table
            .records
            .iter()
            .find(|r| r.id == id)
            .map(display_name)
            .unwrap_or_else(|| id.to_string());

        match self.client.delete(id).await {
            Ok(()) => {
                self.notice = Some(Notice::Success(format!("{name} successfully deleted")));
                self.refresh_table().await;
                Ok(())
            }
            Err(err) => {
                warn!(id, error = %err, "delete failed");
                self.notice = Some(Notice::Failure(format!("Delete failed: {err}")));
                Err(err)
            }
        }
    }

    /// Last notice
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

fn display_name(record: &Record) -> String {
    match record.get(TITLE_FIELD) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => record.id.clone(),
    }
}
