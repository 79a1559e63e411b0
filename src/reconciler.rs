use actix_web::ResponseError;
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::db::models::NewJobItem;
use crate::feed::{FeedClient, FeedEntry};
use crate::media::MediaStore;
use crate::notifier::Notify;
use crate::prelude::*;

#[derive(Debug)]
pub enum Error {
    Feed(&'static str),
    Entry(&'static str),
    Database(db::Error),
}

impl ResponseError for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Feed(msg) | Self::Entry(msg) => write!(f, "{}", msg),
            Self::Database(e) => write!(f, "{}", e),
        }
    }
}

impl From<db::Error> for Error {
    fn from(e: db::Error) -> Self {
        Error::Database(e)
    }
}


/// Folds feed entries into the store: companies and job items are created
/// on first sight, never updated, and every new job item fires a desktop
/// notification.
#[derive(Clone)]
pub struct Reconciler {
    db: db::Helper,
    feed: FeedClient,
    media: MediaStore,
    notifier: Arc<dyn Notify>,
    feed_url: String,
}

impl Reconciler {
    pub fn new(
        db: db::Helper,
        feed: FeedClient,
        media: MediaStore,
        notifier: Arc<dyn Notify>,
        feed_url: String,
    ) -> Self {
        Reconciler {
            db,
            feed,
            media,
            notifier,
            feed_url,
        }
    }

    /// Fetch the feed and reconcile all of its entries.
    pub async fn sync(&self) -> Result<usize, Error> {
        let entries = self.feed.fetch(&self.feed_url).await.map_err(Error::Feed)?;

        self.reconcile(entries).await
    }

    /// Returns the number of newly created job items. An entry that fails
    /// conversion aborts the rest of the batch; entries already processed
    /// stay committed.
    pub async fn reconcile(&self, entries: Vec<FeedEntry>) -> Result<usize, Error> {
        let mut created = 0;

        for entry in &entries {
            if self.reconcile_entry(entry).await? {
                created += 1;
            }
        }

        if created > 0 {
            log::info!("Found {} new job postings", created);
        } else {
            log::debug!("No new job postings");
        }

        Ok(created)
    }

    async fn reconcile_entry(&self, entry: &FeedEntry) -> Result<bool, Error> {
        let author = entry.author.as_deref().ok_or_else(|| {
            log::error!("Feed entry {} has no author", entry.id);
            Error::Entry("Missing author")
        })?;

        let company = self.db.clone().get_or_create_company(author.to_owned()).await?;

        if let (Some(url), None) = (&entry.logo_url, &company.logo) {
            match self.media.attach_from_url(company.id, url).await {
                Ok(path) => {
                    self.db.clone().set_company_logo(company.id, path).await?;
                }
                // The logo is cosmetic: keep the company without one.
                Err(e) => log::warn!("Could not fetch logo for {}: {}", company.name, e),
            }
        }

        let new_job = NewJobItem::try_from(entry, &company).map_err(|e| {
            log::error!("{}", e);
            log::debug!("{:#?}", entry);
            Error::Entry(e)
        })?;

        let (job, created) = self.db.clone().get_or_create_job_item(new_job).await?;

        if created {
            self.notifier.notify(
                &format!("New Larajob: {}", job.title),
                &job.notification_message(&company),
            );
        }

        Ok(created)
    }
}
