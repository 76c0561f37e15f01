pub mod checkin;
pub mod filename;
pub mod naming;
pub mod playlist;
pub mod thumbnail;

use std::{path::PathBuf, sync::Arc};

use crate::{cfg::LibraryConfig, db::Database};
use thumbnail::{FfmpegThumbnailer, Thumbnailer};

use tokio::sync::mpsc::UnboundedReceiver;

/// Commands received from users
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UserCommand {
    /// User request to check in the waiting files and add them to the playlist
    CheckIn,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Db(#[from] crate::db::Error),
    #[error("File name is not valid UTF-8: {0:?}")]
    InvalidFileName(PathBuf),
}

#[derive(Clone)]
pub struct LibraryContext {
    pub config: Arc<LibraryConfig>,
    pub db: Arc<Database>,
    pub thumbnailer: Arc<dyn Thumbnailer>,
}

impl LibraryContext {
    pub fn new(config: LibraryConfig, db: Arc<Database>) -> Self {
        let thumbnailer = Arc::new(FfmpegThumbnailer::new(
            &config.ffmpeg_path,
            config.frame_offset,
        ));
        Self {
            config: Arc::new(config),
            db,
            thumbnailer,
        }
    }
}

/// Checks in the waiting files, then registers every unlisted video in the playlist.
#[tracing::instrument(name = "check_in_and_register", skip(ctx))]
pub async fn check_in_and_register(ctx: &LibraryContext) -> Result<(), Error> {
    let outcomes = checkin::check_in_all(ctx).await?;
    for outcome in &outcomes {
        tracing::info!("Check-in result: {outcome:?}");
    }

    let registered = playlist::register_playlist(ctx).await?;
    tracing::info!("Added {} videos to the playlist", registered.len());
    Ok(())
}

/// Serves user commands until the sender side is closed.
#[tracing::instrument(name = "run_library", skip(ctx, cmd_receiver))]
pub async fn run_library(
    ctx: LibraryContext,
    mut cmd_receiver: UnboundedReceiver<UserCommand>,
) -> anyhow::Result<()> {
    while let Some(cmd) = cmd_receiver.recv().await {
        match cmd {
            UserCommand::CheckIn => {
                tracing::info!("Handling user-requested check-in");
                // A failed run is reported and the service keeps waiting for the next request
                if let Err(e) = check_in_and_register(&ctx).await {
                    tracing::error!("Check-in failed: {e}");
                }
            }
        }
    }

    tracing::info!("Command channel closed, stopping library service");
    Ok(())
}

#[cfg(test)]
pub mod test {
    use std::{path::Path, time::Duration};

    use crate::{cfg::LibraryConfig, db::test::create_dbconfig};

    use googletest::prelude::*;

    use super::*;

    pub struct TestContext {
        pub thumbnailer: Arc<DummyThumbnailer>,
        pub library_ctx: LibraryContext,

        // We need to keep these to make sure the dirs are not removed from the fs
        _library_path: tempfile::TempDir,
        _runtime_path: tempfile::TempDir,
    }

    pub async fn create_context() -> TestContext {
        let library_path = tempfile::TempDir::new().unwrap();
        let library_config = LibraryConfig {
            checkin_path: library_path.path().join("checkin"),
            media_path: library_path.path().join("media"),
            thumbnail_path: library_path.path().join("thumbnail"),
            video_extensions: vec!["mp4".to_string(), "mkv".to_string()],
            ffmpeg_path: "/Invalid".into(),
            frame_offset: Duration::from_secs(10),
        };
        std::fs::create_dir(&library_config.checkin_path).unwrap();

        let runtime_path = tempfile::TempDir::new().unwrap();
        let db = Arc::new(
            Database::open(create_dbconfig(runtime_path.path()))
                .await
                .unwrap(),
        );
        db.apply_pending_migrations().await.unwrap();

        let thumbnailer = Arc::new(DummyThumbnailer::default());

        let library_ctx = LibraryContext {
            config: Arc::new(library_config),
            db,
            thumbnailer: thumbnailer.clone(),
        };

        TestContext {
            thumbnailer,
            library_ctx,
            _library_path: library_path,
            _runtime_path: runtime_path,
        }
    }

    /// Writes a fixed payload as thumbnail, fails for some video file names, or reports success
    /// without writing anything for others.
    #[derive(Default)]
    pub struct DummyThumbnailer {
        failing: tokio::sync::Mutex<Vec<String>>,
        silent: tokio::sync::Mutex<Vec<String>>,
        requests: tokio::sync::Mutex<Vec<PathBuf>>,
    }

    impl DummyThumbnailer {
        pub async fn fail_for(&self, file_name: &str) {
            self.failing.lock().await.push(file_name.to_string());
        }

        pub async fn write_nothing_for(&self, file_name: &str) {
            self.silent.lock().await.push(file_name.to_string());
        }

        pub async fn requests(&self) -> Vec<PathBuf> {
            self.requests.lock().await.clone()
        }
    }

    #[async_trait::async_trait]
    impl Thumbnailer for DummyThumbnailer {
        async fn create_thumbnail(
            &self,
            video: &Path,
            output: &Path,
        ) -> std::result::Result<(), thumbnail::Error> {
            self.requests.lock().await.push(video.to_path_buf());

            let file_name = video
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.failing.lock().await.contains(&file_name) {
                return Err(thumbnail::Error::IoError(std::io::Error::other(
                    "thumbnail failure",
                )));
            }

            if self.silent.lock().await.contains(&file_name) {
                return Ok(());
            }

            tokio::fs::write(output, b"png").await?;
            Ok(())
        }
    }

    #[tokio::test]
    #[googletest::test]
    async fn test_run_library_handles_check_in() -> googletest::Result<()> {
        let test_ctx = create_context().await;
        let ctx = test_ctx.library_ctx.clone();
        std::fs::write(ctx.config.checkin_path.join("clip.mp4"), b"clip").or_fail()?;

        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        sender.send(UserCommand::CheckIn).or_fail()?;
        drop(sender);

        run_library(ctx.clone(), receiver).await.or_fail()?;

        let playlist = ctx.db.list_playlist().await.or_fail()?;
        expect_that!(playlist, len(eq(1)));
        expect_that!(ctx.config.checkin_path.join("clip.mp4").exists(), eq(false));
        Ok(())
    }
}
