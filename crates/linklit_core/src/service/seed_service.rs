//! Starter-pack seeding and reconciliation.
//!
//! # Responsibility
//! - Insert the bundled starter collection and links on first run.
//! - Add starter links shipped after a previous run without duplicating any.
//! - Leave starter links the user deleted alone.
//! - Decide whether the welcome card is shown.
//!
//! # Invariants
//! - Starter links are inserted wholesale only when none is present.
//! - Reconciliation only restores links marked `added_later`.
//! - A second pass right after the first is a no-op.
//! - Seeding failures never block startup; `seed_defaults` logs and returns.

use crate::kv::KeyValueStore;
use crate::model::collection::{Collection, CollectionPatch, DEFAULT_COLLECTION_COLOR};
use crate::model::link::Link;
use crate::repo::record_store::{RecordStore, RepoResult};
use chrono::{DateTime, Duration, Utc};
use log::{error, info};
use std::collections::HashSet;

pub const STARTER_COLLECTION_ID: &str = "default-bolt-hackathon";
pub const STARTER_LINK_ID_PREFIX: &str = "default-link-";

struct StarterLink {
    id: &'static str,
    url: &'static str,
    title: &'static str,
    description: &'static str,
    favicon_domain: &'static str,
    /// Shipped after the first release; restored by reconciliation when
    /// missing from an existing install.
    added_later: bool,
}

const STARTER_LINKS: &[StarterLink] = &[
    StarterLink {
        id: "default-link-1",
        url: "https://worldslargesthackathon.devpost.com/",
        title: "World's Largest Hackathon - Main Page",
        description: "The official homepage for the World's Largest Hackathon. Find all the details about the event, prizes, and how to participate.",
        favicon_domain: "devpost.com",
        added_later: false,
    },
    StarterLink {
        id: "default-link-2",
        url: "https://worldslargesthackathon.devpost.com/resources",
        title: "Hackathon Resources & Tools",
        description: "Essential resources, APIs, tools, and documentation to help you build your hackathon project. Everything you need in one place.",
        favicon_domain: "devpost.com",
        added_later: false,
    },
    StarterLink {
        id: "default-link-3",
        url: "https://discord.com/channels/364486390102097930/671536649301131325",
        title: "Hackathon Discord Community",
        description: "Join the official Discord community to connect with other participants, get help, share ideas, and stay updated on announcements.",
        favicon_domain: "discord.com",
        added_later: false,
    },
    StarterLink {
        id: "default-link-4",
        url: "https://app.getriver.io/bolt",
        title: "Bolt by StackBlitz - Build & Deploy",
        description: "The AI-powered development platform that lets you build, edit, and deploy full-stack web applications directly in your browser.",
        favicon_domain: "getriver.io",
        added_later: false,
    },
    StarterLink {
        id: "default-link-5",
        url: "https://www.youtube.com/watch?v=SM8nkwdHMu4",
        title: "Bolt Tutorial - Build Apps with AI",
        description: "Learn how to use Bolt to build full-stack applications with AI assistance. Perfect tutorial for hackathon participants.",
        favicon_domain: "youtube.com",
        added_later: true,
    },
    StarterLink {
        id: "default-link-6",
        url: "https://x.com/boltdotnew",
        title: "Bolt on X (Twitter)",
        description: "Follow @boltdotnew for the latest updates, tips, and community highlights. Stay connected with the Bolt community.",
        favicon_domain: "x.com",
        added_later: true,
    },
];

/// Builds the starter collection stamped at `now`.
pub fn starter_collection(now: DateTime<Utc>) -> Collection {
    let mut collection = Collection::new(
        STARTER_COLLECTION_ID,
        "Bolt Hackathon",
        DEFAULT_COLLECTION_COLOR,
        now,
    );
    collection.description = Some(
        "Everything you need for the World's Largest Hackathon! Resources, community, and tools to build amazing projects."
            .to_string(),
    );
    collection.link_count = starter_link_count();
    collection
}

/// Builds the starter links. Link `k` of `n` is created `n - k` days before
/// `now`, so the last one is the newest.
pub fn starter_links(now: DateTime<Utc>) -> Vec<Link> {
    let newest = STARTER_LINKS.len() as i64;
    STARTER_LINKS
        .iter()
        .zip(1_i64..)
        .map(|(starter, position)| {
            let created_at = now - Duration::days(newest - position);
            let mut link = Link::new(starter.id, starter.url, starter.title, created_at);
            link.description = Some(starter.description.to_string());
            link.collection_id = Some(STARTER_COLLECTION_ID.to_string());
            link.favicon = Some(format!(
                "https://www.google.com/s2/favicons?domain={}&sz=32",
                starter.favicon_domain
            ));
            link
        })
        .collect()
}

pub fn starter_link_count() -> u32 {
    STARTER_LINKS.len() as u32
}

pub fn is_starter_link_id(id: &str) -> bool {
    id.starts_with(STARTER_LINK_ID_PREFIX)
}

/// What a seeding pass changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// First run, or the starter collection or every starter link was gone.
    Created {
        collection_created: bool,
        links_added: usize,
    },
    /// Starter links shipped since a previous run were added.
    Reconciled { added: Vec<String> },
    Unchanged,
}

/// Idempotent starter-pack seeder over an injected record store.
pub struct DefaultSeeder<'s, S: KeyValueStore> {
    store: &'s RecordStore<S>,
}

impl<'s, S: KeyValueStore> DefaultSeeder<'s, S> {
    pub fn new(store: &'s RecordStore<S>) -> Self {
        Self { store }
    }

    /// Best-effort seeding for startup. Errors are logged and swallowed.
    pub fn seed_defaults(&self) -> Option<SeedOutcome> {
        match self.try_seed_at(Utc::now()) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!("event=seed_defaults module=seed status=error error={}", err);
                None
            }
        }
    }

    /// Runs one reconciliation pass using `now` for new timestamps.
    pub fn try_seed_at(&self, now: DateTime<Utc>) -> RepoResult<SeedOutcome> {
        let collections = self.store.load::<Collection>()?;
        let links = self.store.load::<Link>()?;

        let has_collection = collections
            .iter()
            .any(|collection| collection.id == STARTER_COLLECTION_ID);
        let present: HashSet<&str> = links
            .iter()
            .map(|link| link.id.as_str())
            .filter(|id| is_starter_link_id(id))
            .collect();

        if !has_collection || present.is_empty() {
            if !has_collection {
                self.store.add(starter_collection(now))?;
            }
            let mut links_added = 0;
            if present.is_empty() {
                for link in starter_links(now) {
                    self.store.add(link)?;
                    links_added += 1;
                }
            }

            info!(
                "event=seed_defaults module=seed status=created collection_created={} links_added={}",
                !has_collection, links_added
            );
            return Ok(SeedOutcome::Created {
                collection_created: !has_collection,
                links_added,
            });
        }

        let missing: Vec<Link> = starter_links(now)
            .into_iter()
            .zip(STARTER_LINKS)
            .filter(|(link, starter)| starter.added_later && !present.contains(link.id.as_str()))
            .map(|(link, _)| link)
            .collect();
        if missing.is_empty() {
            return Ok(SeedOutcome::Unchanged);
        }

        let added: Vec<String> = missing.iter().map(|link| link.id.clone()).collect();
        for link in missing {
            self.store.add(link)?;
        }
        self.store.update::<Collection>(
            STARTER_COLLECTION_ID,
            &CollectionPatch::link_count(starter_link_count()),
        )?;

        info!(
            "event=seed_defaults module=seed status=reconciled links_added={}",
            added.len()
        );
        Ok(SeedOutcome::Reconciled { added })
    }

    /// The welcome card shows until dismissed, and only while the starter
    /// collection exists and the user has saved no links of their own.
    pub fn should_show_welcome(&self) -> bool {
        if self.store.is_welcome_dismissed() {
            return false;
        }

        let has_starter_collection = self
            .store
            .collections()
            .iter()
            .any(|collection| collection.id == STARTER_COLLECTION_ID);
        let has_own_links = self
            .store
            .links()
            .iter()
            .any(|link| !is_starter_link_id(&link.id));
        has_starter_collection && !has_own_links
    }
}
