mod models;
mod schema;

use crate::cfg::DbConfig;
pub use models::{NewCheckedInVideo, PUBLISH_DATE_FORMAT, PendingVideo, PlaylistEntry, Video};

use deadpool_diesel::{Manager, Pool};
use diesel::{connection::SimpleConnection, prelude::*, sqlite::SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Pool error: {0:?}")]
    Pool(#[from] deadpool_diesel::PoolError),
    #[error("Build error: {0:?}")]
    Build(#[from] deadpool_diesel::sqlite::BuildError),
    #[error("Diesel error: {0:?}")]
    Diesel(#[from] diesel::result::Error),
    #[error("Background DB thread failed: {0}")]
    Interact(String),
    #[error("Migration error")]
    Migration,
    #[error("Invalid publish date: {0:?}")]
    InvalidPublishDate(String),
    #[error("Invalid check-in time: {0:?}")]
    InvalidCheckinTime(String),
}

pub type Result<T> = core::result::Result<T, Error>;

pub struct Database {
    pool: Pool<Manager<SqliteConnection>>,
}

impl Database {
    pub async fn open(config: DbConfig) -> Result<Self> {
        let url = config.db_path();
        let url = url.to_string_lossy();
        let manager = Manager::new(url, deadpool_diesel::Runtime::Tokio1);
        let pool: Pool<Manager<_>> = Pool::builder(manager)
            .max_size(config.pool_size)
            .post_create(deadpool_diesel::sqlite::Hook::sync_fn(move |c, _m| {
                let mut c = c.lock().expect("poisoned mutex");
                c.batch_execute(
                    "PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;",
                )
                .expect("Unable to configure journal mode on sqlite DB connection");
                c.batch_execute(&format!(
                    "PRAGMA busy_timeout = {};",
                    config.busy_timeout.as_millis()
                ))
                .expect("Unable to set busy timeout on DB connection");
                Ok(())
            }))
            .build()?;

        Ok(Self { pool })
    }

    /// Runs `f` with a pooled connection on a background thread.
    async fn interact<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let connection = self.pool.get().await?;
        connection
            .interact(f)
            .await
            .map_err(|e| Error::Interact(e.to_string()))?
    }

    pub async fn apply_pending_migrations(&self) -> Result<()> {
        self.interact(move |conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|_| Error::Migration)?;
            Ok(())
        })
        .await
    }

    pub async fn find_video(&self, req_file_id: &str) -> Result<Video> {
        let req_file_id = req_file_id.to_string();

        self.interact(move |conn| {
            use schema::videos::dsl;

            dsl::videos
                .filter(dsl::file_id.eq(&req_file_id))
                .select(models::VideoInner::as_select())
                .get_result::<models::VideoInner>(conn)?
                .try_into()
        })
        .await
    }

    /// Looks up a video by the SHA-256 checksum of its content.
    pub async fn find_video_by_checksum(&self, req_checksum: &str) -> Result<Option<Video>> {
        let req_checksum = req_checksum.to_string();

        self.interact(move |conn| {
            use schema::videos::dsl;

            dsl::videos
                .filter(dsl::checksum.eq(&req_checksum))
                .select(models::VideoInner::as_select())
                .first::<models::VideoInner>(conn)
                .optional()?
                .map(Video::try_from)
                .transpose()
        })
        .await
    }

    /// Inserts the `videos` and `hdd` rows of a checked-in file in a single transaction.
    /// Returns the id of the new video.
    pub async fn insert_checked_in(&self, video: &NewCheckedInVideo) -> Result<i64> {
        let new_video = models::NewVideo::from(video);
        let folder_path = video.folder_path.to_string_lossy().into_owned();
        let file_name = video.file_name.clone();

        self.interact(move |conn| {
            conn.transaction::<_, Error, _>(|c| {
                let video_id: i64 = diesel::insert_into(schema::videos::table)
                    .values(new_video)
                    .returning(schema::videos::id)
                    .get_result(c)?;

                diesel::insert_into(schema::hdd::table)
                    .values(models::NewHddLocation {
                        video_id,
                        folder_path,
                        file_name,
                    })
                    .execute(c)?;
                Ok(video_id)
            })
        })
        .await
    }

    /// Lists the videos stored on disk that have no playlist entry, oldest first.
    pub async fn list_pending_playlist(&self) -> Result<Vec<PendingVideo>> {
        self.interact(move |conn| {
            use schema::{hdd, playlist, videos};

            let pending: Vec<models::PendingVideoInner> = videos::table
                .inner_join(hdd::table)
                .left_join(playlist::table)
                .filter(playlist::id.nullable().is_null())
                .order(videos::id.asc())
                .select((
                    videos::id,
                    videos::title,
                    videos::original_filename,
                    videos::checkin_time,
                    hdd::folder_path,
                    hdd::file_name,
                ))
                .load(conn)?;

            pending.into_iter().map(PendingVideo::try_from).collect()
        })
        .await
    }

    pub async fn insert_playlist_entry(
        &self,
        video_id: i64,
        title: &str,
        thumbnail: &str,
    ) -> Result<()> {
        let entry = models::NewPlaylistEntry {
            video_id,
            title: title.to_string(),
            thumbnail: thumbnail.to_string(),
        };

        self.interact(move |c| {
            diesel::insert_into(schema::playlist::table)
                .values(entry)
                .execute(c)?;
            Ok(())
        })
        .await
    }

    /// Lists the playlist, newest entry first.
    pub async fn list_playlist(&self) -> Result<Vec<PlaylistEntry>> {
        self.interact(move |conn| {
            use schema::{playlist, videos};

            Ok(playlist::table
                .inner_join(videos::table)
                .order(playlist::id.desc())
                .select((playlist::title, videos::author, playlist::thumbnail))
                .load(conn)?)
        })
        .await
    }
}
