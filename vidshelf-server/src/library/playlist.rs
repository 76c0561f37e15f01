use std::path::PathBuf;

use super::{Error, LibraryContext, thumbnail};

/// A video that has just been added to the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredEntry {
    pub video_id: i64,
    pub title: String,
    /// Thumbnail location relative to the thumbnail folder, if one could be generated
    pub thumbnail: Option<PathBuf>,
}

/// Adds every catalogued video that is not in the playlist yet, generating its thumbnail.
///
/// Videos whose thumbnail cannot be generated are still added, without a thumbnail.
#[tracing::instrument(name = "register_playlist", skip(ctx))]
pub async fn register_playlist(ctx: &LibraryContext) -> Result<Vec<RegisteredEntry>, Error> {
    let pending = ctx.db.list_pending_playlist().await?;
    tracing::info!("{} videos pending playlist registration", pending.len());

    let mut registered = Vec::with_capacity(pending.len());
    for video in pending {
        let relative = thumbnail::thumbnail_relative_path(&video.checkin_time, &video.file_name);
        let output = ctx.config.thumbnail_path.join(&relative);
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let created = match ctx
            .thumbnailer
            .create_thumbnail(&video.file_path, &output)
            .await
        {
            Ok(()) => thumbnail::check_output(&output).await,
            Err(e) => Err(e),
        };
        let thumbnail = match created {
            Ok(()) => {
                tracing::info!("Created thumbnail {output:?} for video {}", video.video_id);
                Some(relative)
            }
            Err(e) => {
                tracing::error!(
                    "Error creating thumbnail for {:?}: {e}. Registering it without one",
                    video.file_path
                );
                None
            }
        };

        let stored_thumbnail = thumbnail
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        ctx.db
            .insert_playlist_entry(video.video_id, &video.title, &stored_thumbnail)
            .await?;

        registered.push(RegisteredEntry {
            video_id: video.video_id,
            title: video.title,
            thumbnail,
        });
    }

    Ok(registered)
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::db::test::checked_in_video;
    use crate::library::test::create_context;

    use googletest::prelude::*;

    #[tokio::test]
    #[googletest::test]
    async fn test_register_playlist() -> googletest::Result<()> {
        let test_ctx = create_context().await;
        let ctx = &test_ctx.library_ctx;

        let first = ctx
            .db
            .insert_checked_in(&checked_in_video("a1", "c1"))
            .await
            .or_fail()?;
        let second = ctx
            .db
            .insert_checked_in(&checked_in_video("a2", "c2"))
            .await
            .or_fail()?;
        let third = ctx
            .db
            .insert_checked_in(&checked_in_video("a3", "c3"))
            .await
            .or_fail()?;
        test_ctx.thumbnailer.fail_for("a2.mp4").await;
        test_ctx.thumbnailer.write_nothing_for("a3.mp4").await;

        let registered = register_playlist(ctx).await.or_fail()?;
        expect_that!(
            registered,
            elements_are![
                eq(&RegisteredEntry {
                    video_id: first,
                    title: "My video".to_string(),
                    thumbnail: Some(PathBuf::from("2025/12/a1.mp4.png")),
                }),
                eq(&RegisteredEntry {
                    video_id: second,
                    title: "My video".to_string(),
                    thumbnail: None,
                }),
                eq(&RegisteredEntry {
                    video_id: third,
                    title: "My video".to_string(),
                    thumbnail: None,
                }),
            ]
        );

        expect_that!(
            ctx.config.thumbnail_path.join("2025/12/a1.mp4.png").exists(),
            eq(true)
        );
        expect_that!(
            test_ctx.thumbnailer.requests().await,
            elements_are![
                eq(&PathBuf::from("/srv/media/2025/12/20/a1.mp4")),
                eq(&PathBuf::from("/srv/media/2025/12/20/a2.mp4")),
                eq(&PathBuf::from("/srv/media/2025/12/20/a3.mp4")),
            ]
        );

        let thumbnails: Vec<String> = ctx
            .db
            .list_playlist()
            .await
            .or_fail()?
            .into_iter()
            .map(|entry| entry.thumbnail)
            .collect();
        expect_that!(
            thumbnails,
            eq(&vec![
                "".to_string(),
                "".to_string(),
                "2025/12/a1.mp4.png".to_string()
            ])
        );

        // Everything is registered now
        expect_that!(register_playlist(ctx).await.or_fail()?, is_empty());
        Ok(())
    }
}
