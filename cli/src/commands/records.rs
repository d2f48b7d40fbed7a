//! Record commands

use colored::Colorize;
use formdesk_client::{AdminPage, CollectionTransport, Notice};
use formdesk_common::{FormdeskError, FormdeskResult};
use formdesk_forms::{FormComposer, SubmitOutcome, TextToolkit};

use super::connect;
use crate::config::Settings;
use crate::output::OutputFormat;
use crate::RecordCommands;

pub async fn handle(action: RecordCommands, settings: &Settings) -> FormdeskResult<()> {
    let mut page = connect(settings)?;
    run(action, &mut page, settings).await
}

async fn run<T: CollectionTransport>(
    action: RecordCommands,
    page: &mut AdminPage<T>,
    settings: &Settings,
) -> FormdeskResult<()> {
    match action {
        RecordCommands::Schema => {
            let schema = page.schema().await?.clone();
            match settings.format {
                OutputFormat::Table => {
                    let form = FormComposer::new(schema, settings.dates()?);
                    let mut toolkit = TextToolkit::new(settings.dates()?);
                    for line in form.render(&mut toolkit) {
                        println!("{}", line);
                    }
                }
                format => format.print(&schema)?,
            }
        }
        RecordCommands::List { page: number } => {
            page.load().await?;
            page.set_page(number);
            print_table(page, settings.format).await?;
        }
        RecordCommands::Search { term, page: number } => {
            page.set_search_term(&term).await;
            page.set_page(number);
            print_table(page, settings.format).await?;
        }
        RecordCommands::Create { values } => {
            let dialog = page.open_create().await?;
            fill(&mut dialog.form, &values)?;
            submit(page, settings.format).await?;
        }
        RecordCommands::Edit { id, values } => {
            page.load().await?;
            let dialog = page.open_edit(&id).await?;
            fill(&mut dialog.form, &values)?;
            submit(page, settings.format).await?;
        }
        RecordCommands::Delete { id } => {
            page.load().await?;
            page.delete(&id).await?;
            print_notice(page.notice());
        }
    }
    Ok(())
}

async fn print_table<T: CollectionTransport>(
    page: &AdminPage<T>,
    format: OutputFormat,
) -> FormdeskResult<()> {
    let state = page.table_state();
    if let Some(error) = &state.error {
        return Err(FormdeskError::Transport(error.clone()));
    }
    let view = page.table_view().await?;
    format.print_records(state.page_records(), &view)
}

/// Apply `key=value` assignments to the form
fn fill(form: &mut FormComposer, assignments: &[String]) -> FormdeskResult<()> {
    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            FormdeskError::Config(format!("expected KEY=VALUE, got `{}`", assignment))
        })?;
        form.set_input(key.trim(), value)?;
    }
    Ok(())
}

async fn submit<T: CollectionTransport>(
    page: &mut AdminPage<T>,
    format: OutputFormat,
) -> FormdeskResult<()> {
    match page.submit_dialog().await {
        Some(SubmitOutcome::Submitted(record)) => match format {
            OutputFormat::Table => {
                print_notice(page.notice());
                println!("id: {}", record.id);
                Ok(())
            }
            _ => format.print(&record),
        },
        Some(SubmitOutcome::Invalid(errors)) => {
            if let Some(banner) = page.dialog().and_then(|d| d.form.banner()) {
                eprintln!("{}", banner.message().yellow());
            }
            for error in &errors {
                eprintln!("  {} {}", format!("{}:", error.key).bold(), error.message);
            }
            Err(FormdeskError::Validation(errors))
        }
        Some(SubmitOutcome::Failed(err)) => Err(err),
        Some(SubmitOutcome::InFlight) | None => Ok(()),
    }
}

fn print_notice(notice: Option<&Notice>) {
    match notice {
        Some(Notice::Success(message)) => println!("{}", message.green()),
        Some(Notice::Failure(message)) => eprintln!("{}", message.red()),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use formdesk_client::{InMemoryTransport, RemoteCollectionClient};
    use formdesk_common::{user_plan_schema, Payload, RecordStore};
    use formdesk_forms::DateFormat;
    use std::sync::Arc;

    fn page() -> (AdminPage<InMemoryTransport>, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::new());
        let transport = InMemoryTransport::new(store.clone(), user_plan_schema());
        let page = AdminPage::new(RemoteCollectionClient::new(transport), DateFormat::default());
        (page, store)
    }

    fn settings() -> Settings {
        Config::default().resolve(None, Some(OutputFormat::Json))
    }

    fn sets(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_with_range() {
        let (mut page, store) = page();
        let action = RecordCommands::Create {
            values: sets(&[
                "user=Maria",
                "title=Ski week",
                "type=holiday",
                "startDate:endDate=2024-01-01,2024-01-05",
            ]),
        };
        run(action, &mut page, &settings()).await.unwrap();

        let records = store.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("title"), Some("Ski week"));
        assert_eq!(records[0].get("startDate"), Some("1/1/2024"));
        assert_eq!(records[0].get("endDate"), Some("1/5/2024"));
    }

    #[tokio::test]
    async fn test_invalid_create_sends_nothing() {
        let (mut page, store) = page();
        let action = RecordCommands::Create {
            values: sets(&["user=Maria"]),
        };
        let err = run(action, &mut page, &settings()).await.unwrap_err();
        assert!(matches!(err, FormdeskError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_assignment() {
        let (mut page, _) = page();
        let action = RecordCommands::Create {
            values: sets(&["title"]),
        };
        let err = run(action, &mut page, &settings()).await.unwrap_err();
        assert!(matches!(err, FormdeskError::Config(_)));
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let (mut page, store) = page();
        let record = store.create(Payload::from([
            ("user".to_string(), "Kim".to_string()),
            ("title".to_string(), "Old".to_string()),
        ]));

        let action = RecordCommands::Edit {
            id: record.id.clone(),
            values: sets(&["title=New"]),
        };
        run(action, &mut page, &settings()).await.unwrap();
        assert_eq!(store.list()[0].get("title"), Some("New"));

        let action = RecordCommands::Delete { id: record.id };
        run(action, &mut page, &settings()).await.unwrap();
        assert!(store.is_empty());

        let action = RecordCommands::Delete {
            id: "missing-id".into(),
        };
        let err = run(action, &mut page, &settings()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_pages() {
        let (mut page, store) = page();
        for i in 0..12 {
            store.create(Payload::from([("title".to_string(), format!("plan {i}"))]));
        }

        run(RecordCommands::List { page: 2 }, &mut page, &settings()).await.unwrap();
        let state = page.table_state();
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.page_records().len(), 2);

        let action = RecordCommands::Search {
            term: "plan 1".into(),
            page: 7,
        };
        run(action, &mut page, &settings()).await.unwrap();
        assert_eq!(page.table_state().current_page(), 1);
        assert_eq!(page.table_state().page_records().len(), 3);
    }
}
