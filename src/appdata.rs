use actix::prelude::*;
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::feed::FeedClient;
use crate::media::MediaStore;
use crate::notifier::DesktopNotifier;
use crate::prelude::*;
use crate::reconciler::Reconciler;

pub struct AppData {
    pub cfg: Config,
    pub db: db::Helper,
    pub reconciler: Reconciler,
}

impl AppData {
    pub fn new(cfg: Config) -> Result<Self, StartupError> {
        // Test the DB connection and migrate before the workers start.
        let mut probe = db::Executor::connect(&cfg.sqlite_db).map_err(StartupError::Connection)?;
        probe.run_migrations().map_err(StartupError::Migration)?;
        drop(probe);

        let sqlite_db = cfg.sqlite_db.clone();
        let db_pool = SyncArbiter::start(2, move || {
            db::Executor::connect(&sqlite_db).expect("DB connection failed")
        });

        let db = db::Helper::new(db_pool);
        let reconciler = Reconciler::new(
            db.clone(),
            FeedClient::new(),
            MediaStore::new(cfg.media_dir.clone().into()),
            Arc::new(DesktopNotifier),
            cfg.feed_url.clone(),
        );

        Ok(AppData {
            cfg,
            db,
            reconciler,
        })
    }
}

#[cfg(test)]
impl AppData {
    pub fn for_tests(media_root: std::path::PathBuf) -> Self {
        let cfg = Config {
            http_host: "127.0.0.1".to_owned(),
            http_port: 0,
            sqlite_db: ":memory:".to_owned(),
            media_dir: media_root.display().to_string(),
            feed_url: "http://127.0.0.1:1/feed".to_owned(),
            poll_secs: 30,
        };

        let db_pool = SyncArbiter::start(1, || {
            let mut executor = db::Executor::connect(":memory:").expect("DB connection failed");
            executor.run_migrations().expect("migrations failed");
            executor
        });

        let db = db::Helper::new(db_pool);
        let reconciler = Reconciler::new(
            db.clone(),
            FeedClient::new(),
            MediaStore::new(media_root),
            Arc::new(crate::notifier::Recorder::default()),
            cfg.feed_url.clone(),
        );

        AppData {
            cfg,
            db,
            reconciler,
        }
    }
}


#[derive(Debug)]
pub enum StartupError {
    Connection(diesel::ConnectionError),
    Migration(Box<dyn std::error::Error + Send + Sync>),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "Could not open the database: {}", e),
            Self::Migration(e) => write!(f, "Could not run migrations: {}", e),
        }
    }
}
