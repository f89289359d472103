//! Subcommand handlers.

use crate::{CollectionCommand, Commands};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use linklit_core::{
    describe_reminder, Collection, CollectionDraft, CollectionService, CompletionFilter,
    DefaultSeeder, KeyValueStore, Link, LinkDraft, LinkService, LogOnlyScheduler, QuickReminder,
    RecordStore, ReminderStats, SaveOutcome, TransferService,
};
use std::fs;

pub fn dispatch<S: KeyValueStore>(command: Commands, store: &RecordStore<S>) -> Result<()> {
    match command {
        Commands::Add {
            url,
            title,
            description,
            collection,
            remind_at,
            remind,
        } => {
            let draft = LinkDraft {
                url,
                title: title.unwrap_or_default(),
                description: description.unwrap_or_default(),
                collection_id: collection,
                reminder: parse_reminder(remind_at.as_deref(), remind.as_deref())?,
            };
            let link = LinkService::new(store, LogOnlyScheduler).create_link(&draft)?;
            println!("Saved {}", link.id);
            print_link(&link);
        }
        Commands::Edit {
            id,
            url,
            title,
            description,
            collection,
            no_collection,
            remind_at,
            remind,
            clear_reminder,
        } => {
            let links = LinkService::new(store, LogOnlyScheduler);
            let current = links.get_link(&id)?;
            let Some(url) = url.or_else(|| current.as_ref().map(|link| link.url.clone())) else {
                bail!("link {id} no longer exists; pass --url to save it again");
            };

            let reminder = if clear_reminder {
                None
            } else {
                match parse_reminder(remind_at.as_deref(), remind.as_deref())? {
                    Some(at) => Some(at),
                    None => current.as_ref().and_then(|link| link.reminder),
                }
            };
            let collection_id = if no_collection {
                None
            } else {
                collection.or_else(|| current.as_ref().and_then(|link| link.collection_id.clone()))
            };
            let draft = LinkDraft {
                url,
                title: title.unwrap_or_default(),
                description: description
                    .or_else(|| current.as_ref().and_then(|link| link.description.clone()))
                    .unwrap_or_default(),
                collection_id,
                reminder,
            };

            match links.edit_link(&id, &draft)? {
                SaveOutcome::Updated(link) => {
                    println!("Updated {}", link.id);
                    print_link(&link);
                }
                SaveOutcome::Created(link) => {
                    println!("Link {id} was gone; saved as new link {}", link.id);
                    print_link(&link);
                }
            }
        }
        Commands::List { filter } => {
            let filter = parse_filter(&filter)?;
            let links = LinkService::new(store, LogOnlyScheduler).list_links(filter);
            if links.is_empty() {
                println!("{}", empty_links_message(filter));
                return Ok(());
            }

            let stats = ReminderStats::collect(&links, Utc::now());
            if filter == CompletionFilter::Active && stats.total() > 0 {
                println!(
                    "{} overdue, {} upcoming. Links with reminders appear first.",
                    stats.overdue, stats.upcoming
                );
            }
            for link in &links {
                print_link(link);
            }
        }
        Commands::Show { id } => {
            let Some(link) = LinkService::new(store, LogOnlyScheduler).get_link(&id)? else {
                bail!("link not found: {id}");
            };
            print_link(&link);
            println!("  created {}", link.created_at.with_timezone(&Local).to_rfc2822());
            println!("  updated {}", link.updated_at.with_timezone(&Local).to_rfc2822());
            if let Some(favicon) = &link.favicon {
                println!("  favicon {favicon}");
            }
        }
        Commands::Toggle { id } => {
            let Some(link) = LinkService::new(store, LogOnlyScheduler).toggle_complete(&id)? else {
                bail!("link not found: {id}");
            };
            let state = if link.is_completed { "done" } else { "active" };
            println!("Marked {} as {state}", link.id);
        }
        Commands::Remove { id } => {
            if !LinkService::new(store, LogOnlyScheduler).delete_link(&id)? {
                bail!("link not found: {id}");
            }
            println!("Deleted {id}");
        }
        Commands::Collections { filter } => {
            let filter = parse_filter(&filter)?;
            let collections = CollectionService::new(store).list_collections(filter);
            if collections.is_empty() {
                println!("No collections");
            }
            for collection in &collections {
                print_collection(collection);
            }
        }
        Commands::Collection(command) => collection_command(command, store)?,
        Commands::Export { output } => {
            let json = TransferService::new(store, LogOnlyScheduler).export_json(Utc::now())?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write: {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Import { file, yes } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read: {}", file.display()))?;
            if !yes {
                bail!("import replaces all current data; re-run with --yes to confirm");
            }
            let summary =
                TransferService::new(store, LogOnlyScheduler).import_json(&raw, Utc::now())?;
            println!(
                "Imported {} links and {} collections ({} reminders rescheduled)",
                summary.links, summary.collections, summary.rescheduled_reminders
            );
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("this permanently deletes all links and collections; re-run with --yes");
            }
            TransferService::new(store, LogOnlyScheduler).clear_all()?;
            println!("All data has been cleared.");
        }
        Commands::Welcome { dismiss } => {
            if dismiss {
                store.set_welcome_dismissed()?;
                println!("Welcome card dismissed");
            } else {
                let visible = DefaultSeeder::new(store).should_show_welcome();
                println!("Welcome card {}", if visible { "visible" } else { "hidden" });
            }
        }
    }
    Ok(())
}

fn collection_command<S: KeyValueStore>(
    command: CollectionCommand,
    store: &RecordStore<S>,
) -> Result<()> {
    let service = CollectionService::new(store);
    match command {
        CollectionCommand::Add {
            name,
            description,
            color,
        } => {
            let collection = service.create_collection(&CollectionDraft {
                name,
                description: description.unwrap_or_default(),
                color,
            })?;
            println!("Created collection {}", collection.id);
        }
        CollectionCommand::Edit {
            id,
            name,
            description,
            color,
        } => {
            let Some(current) = service.get_collection(&id)? else {
                bail!("collection not found: {id}");
            };
            let collection = service.edit_collection(
                &id,
                &CollectionDraft {
                    name: name.unwrap_or(current.name),
                    description: description
                        .or(current.description)
                        .unwrap_or_default(),
                    color: color.unwrap_or(current.color),
                },
            )?;
            print_collection(&collection);
        }
        CollectionCommand::Toggle { id } => {
            let collection = service.toggle_complete(&id)?;
            let state = if collection.is_completed { "done" } else { "active" };
            println!("Marked collection {} as {state}", collection.id);
        }
        CollectionCommand::Remove { id } => {
            let detached = service.delete_collection(&id)?;
            println!("Deleted collection {id}; {detached} links are now uncategorized");
        }
        CollectionCommand::Show { id } => {
            let detail = service.collection_detail(&id, Utc::now())?;
            print_collection(&detail.collection);
            println!(
                "  {} active, {} completed, {} overdue, {} upcoming",
                detail.active_count,
                detail.completed_count,
                detail.reminder_stats.overdue,
                detail.reminder_stats.upcoming
            );
            for link in &detail.links {
                print_link(link);
            }
        }
    }
    Ok(())
}

fn parse_filter(value: &str) -> Result<CompletionFilter> {
    CompletionFilter::parse(value)
        .with_context(|| format!("unknown filter `{value}`; expected active, completed or all"))
}

fn parse_reminder(at: Option<&str>, quick: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    if let Some(preset) = quick {
        let preset = QuickReminder::parse(preset).with_context(|| {
            format!("unknown reminder `{preset}`; expected hour, tomorrow or week")
        })?;
        let at = preset
            .resolve(&Local::now())
            .context("reminder time does not exist in the local time zone")?;
        return Ok(Some(at));
    }

    let Some(raw) = at else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M")
        .with_context(|| format!("invalid reminder time `{raw}`"))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("reminder time `{raw}` does not exist in the local time zone"))?;
    Ok(Some(local.with_timezone(&Utc)))
}

fn empty_links_message(filter: CompletionFilter) -> &'static str {
    match filter {
        CompletionFilter::Active => "No active links",
        CompletionFilter::Completed => "No completed links",
        CompletionFilter::All => "No links saved yet",
    }
}

fn print_link(link: &Link) {
    let mark = if link.is_completed { "x" } else { " " };
    println!("[{mark}] {}  <{}>  ({})", link.title, link.url, link.id);
    if let Some(description) = &link.description {
        println!("      {description}");
    }
    if let Some(collection_id) = &link.collection_id {
        println!("      in {collection_id}");
    }
    if let Some(reminder) = link.reminder {
        println!("      {}", describe_reminder(reminder, &Local::now()));
    }
}

fn print_collection(collection: &Collection) {
    let mark = if collection.is_completed { "x" } else { " " };
    println!(
        "[{mark}] {} {}  {} links  ({})",
        collection.color, collection.name, collection.link_count, collection.id
    );
    if let Some(description) = &collection.description {
        println!("      {description}");
    }
}
