use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use sha2::Digest;
use tokio::io::AsyncReadExt;

use super::{Error, LibraryContext, filename, naming};
use crate::db::NewCheckedInVideo;

/// What happened to a single file of the check-in folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinOutcome {
    /// The file was moved into the media folder and catalogued.
    Registered {
        original: PathBuf,
        stored: PathBuf,
        file_id: String,
    },
    /// A file with the same content is already catalogued. The file is left in place.
    Duplicate { original: PathBuf, checksum: String },
    /// The file could not be checked in. It is left in (or moved back to) the check-in folder.
    Failed { original: PathBuf, message: String },
}

/// Lists the video files directly inside `dir`, sorted by name.
pub async fn collect_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, Error> {
    let is_video = |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(e)))
    };

    let mut files = vec![];
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_video(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Computes the lowercase hex SHA-256 of the file content.
pub async fn compute_sha256(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = sha2::Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}

/// Moves a file, falling back to copy and delete when a rename is not possible (e.g.: across
/// file systems).
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    copy_then_remove(from, to, |source| tokio::fs::remove_file(source)).await
}

/// Copies `from` to `to`, then removes the source with `remove_source`. On failure the copy at
/// `to` is deleted again, so the file only ever exists at one of the two locations.
async fn copy_then_remove<F, Fut>(
    from: &Path,
    to: &Path,
    remove_source: F,
) -> std::io::Result<()>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let result = match tokio::fs::copy(from, to).await {
        Ok(_) => remove_source(from.to_path_buf()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        match tokio::fs::remove_file(to).await {
            Ok(()) => {}
            Err(cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
            Err(cleanup) => tracing::error!("Error removing partial copy {to:?}: {cleanup}"),
        }
        return Err(e);
    }
    Ok(())
}

/// Checks in a single file: catalogues it and moves it under `<media>/YYYY/MM/DD` as
/// `<timestamp name><extension>`.
#[tracing::instrument(name = "check_in_file", skip(ctx, names, now))]
pub async fn check_in_file(
    ctx: &LibraryContext,
    names: &mut naming::NameGenerator,
    path: &Path,
    now: DateTime<FixedOffset>,
) -> Result<CheckinOutcome, Error> {
    let original_filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidFileName(path.to_path_buf()))?
        .to_string();

    let parsed = filename::parse_file_name(&original_filename);
    tracing::debug!("Parsed file name: {parsed:?}");

    let checksum = compute_sha256(path).await?;
    if ctx.db.find_video_by_checksum(&checksum).await?.is_some() {
        tracing::info!("Content with checksum {checksum} is already registered, skipping");
        return Ok(CheckinOutcome::Duplicate {
            original: path.to_path_buf(),
            checksum,
        });
    }

    let file_id = names.next_name(&now.naive_local());
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let folder = ctx
        .config
        .media_path
        .join(now.format("%Y").to_string())
        .join(now.format("%m").to_string())
        .join(now.format("%d").to_string());
    tokio::fs::create_dir_all(&folder).await?;

    let target =
        naming::unique_target_path(&folder.join(format!("{file_id}{extension}"))).await?;
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::info!("Moving {path:?} to {target:?}");
    move_file(path, &target).await?;

    let new_video = NewCheckedInVideo {
        file_id: file_id.clone(),
        title: parsed.title,
        author: parsed.author,
        publish_date: parsed.publish_date,
        checkin_time: now,
        original_filename,
        checksum,
        folder_path: folder,
        file_name,
    };

    if let Err(e) = ctx.db.insert_checked_in(&new_video).await {
        tracing::error!("Error registering {path:?}: {e}. Moving the file back");
        let message = match move_file(&target, path).await {
            Ok(()) => e.to_string(),
            Err(move_err) => {
                tracing::error!("Error moving {target:?} back to {path:?}: {move_err}");
                format!("{e}. The file remains at {target:?}: {move_err}")
            }
        };
        return Ok(CheckinOutcome::Failed {
            original: path.to_path_buf(),
            message,
        });
    }

    Ok(CheckinOutcome::Registered {
        original: path.to_path_buf(),
        stored: target,
        file_id,
    })
}

/// Checks in every video file waiting in the check-in folder.
///
/// A failure on one file is reported in its outcome and does not stop the others.
#[tracing::instrument(name = "check_in_all", skip(ctx))]
pub async fn check_in_all(ctx: &LibraryContext) -> Result<Vec<CheckinOutcome>, Error> {
    let files = collect_files(&ctx.config.checkin_path, &ctx.config.video_extensions).await?;
    if files.is_empty() {
        tracing::info!("No files to check in at {:?}", ctx.config.checkin_path);
        return Ok(vec![]);
    }

    let mut names = naming::NameGenerator::default();
    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let now = chrono::Local::now().fixed_offset();
        let outcome = match check_in_file(ctx, &mut names, &path, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Error checking in {path:?}: {e}");
                CheckinOutcome::Failed {
                    original: path.clone(),
                    message: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
