//! Output formatting

use clap::ValueEnum;
use formdesk_client::TableView;
use formdesk_common::{FormdeskError, FormdeskResult, Record};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print structured data. Table falls back to pretty JSON.
    pub fn print<T: Serialize>(&self, data: &T) -> FormdeskResult<()> {
        let text = match self {
            OutputFormat::Yaml => serde_yaml::to_string(data).map_err(encode_error)?,
            OutputFormat::Json | OutputFormat::Table => {
                serde_json::to_string_pretty(data).map_err(encode_error)?
            }
        };
        println!("{}", text);
        Ok(())
    }

    /// Print one page of records; as a table when the format is Table
    pub fn print_records(&self, records: &[Record], view: &TableView) -> FormdeskResult<()> {
        match self {
            OutputFormat::Table => {
                println!("{}", render_table(view));
                Ok(())
            }
            _ => self.print(&records),
        }
    }
}

/// Draw a table view with an id column in place of the actions column
pub fn render_table(view: &TableView) -> String {
    match view {
        TableView::Error(message) => message.clone(),
        TableView::Rows {
            headers,
            rows,
            page,
            page_count,
            total,
            ..
        } => {
            let mut builder = Builder::default();
            let data_columns = headers.len().saturating_sub(1);
            builder.push_record(
                std::iter::once("ID".to_string())
                    .chain(headers.iter().take(data_columns).cloned()),
            );
            for row in rows {
                builder.push_record(std::iter::once(row.id.clone()).chain(row.cells.iter().cloned()));
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            format!("{table}\nPage {page} of {page_count} ({total} records)")
        }
    }
}

fn encode_error(err: impl std::fmt::Display) -> FormdeskError {
    FormdeskError::Config(format!("cannot encode output: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdesk_client::{Row, RowAction, ACTIONS_TITLE};

    #[test]
    fn test_table_swaps_actions_for_id() {
        let view = TableView::Rows {
            headers: vec!["Title".into(), ACTIONS_TITLE.into()],
            rows: vec![Row {
                id: "7".into(),
                cells: vec!["Ski week".into()],
                actions: vec![RowAction::Edit, RowAction::Delete],
            }],
            loading: false,
            page: 2,
            page_count: 2,
            total: 11,
        };
        let out = render_table(&view);
        assert!(out.ends_with("Page 2 of 2 (11 records)"));
        assert!(out.contains("ID"));
        assert!(out.contains("Ski week"));
        assert!(!out.contains(ACTIONS_TITLE));
    }

    #[test]
    fn test_error_view_prints_message() {
        assert_eq!(render_table(&TableView::Error("Error: down".into())), "Error: down");
    }
}
