use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use chrono::{DateTime, FixedOffset};
use tokio::process::Command;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error running ffmpeg: {0}")]
    IoError(#[from] std::io::Error),
    #[error("No thumbnail was written to {0:?}")]
    NothingWritten(PathBuf),
    #[error("ffmpeg exited with {status}: {stderr}")]
    Ffmpeg {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

#[async_trait::async_trait]
pub trait Thumbnailer: Send + Sync {
    /// Writes a thumbnail image of `video` to `output`. The parent folder of `output` exists.
    async fn create_thumbnail(&self, video: &Path, output: &Path) -> Result<(), Error>;
}

/// Location of a thumbnail relative to the thumbnail folder: `YYYY/MM/<file name>.png`, using
/// the year and month of the check-in.
pub fn thumbnail_relative_path(checkin_time: &DateTime<FixedOffset>, file_name: &str) -> PathBuf {
    PathBuf::from(checkin_time.format("%Y").to_string())
        .join(checkin_time.format("%m").to_string())
        .join(format!("{file_name}.png"))
}

/// Fails unless a non-empty file exists at `output`.
///
/// ffmpeg exits successfully without writing anything when the frame offset is past the end of
/// the video.
pub async fn check_output(output: &Path) -> Result<(), Error> {
    match tokio::fs::metadata(output).await {
        Ok(metadata) if metadata.len() > 0 => Ok(()),
        Ok(_) => Err(Error::NothingWritten(output.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::NothingWritten(output.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Thumbnails generated by an external ffmpeg executable.
///
/// The embedded cover image is copied out when the video has one. Otherwise a single frame is
/// grabbed at `frame_offset`.
pub struct FfmpegThumbnailer {
    ffmpeg: PathBuf,
    frame_offset: Duration,
}

impl FfmpegThumbnailer {
    pub fn new(ffmpeg: &Path, frame_offset: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.to_path_buf(),
            frame_offset,
        }
    }

    /// ffmpeg lists the streams of its input on stderr. Covers show up as `(attached pic)`.
    async fn has_cover_image(&self, video: &Path) -> Result<bool, Error> {
        let output = Command::new(&self.ffmpeg)
            .arg("-hide_banner")
            .arg("-i")
            .arg(video)
            .stdin(Stdio::null())
            .output()
            .await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(stderr.contains("attached pic"))
    }

    async fn run(&self, command: &mut Command) -> Result<(), Error> {
        let output = command.stdin(Stdio::null()).output().await?;
        if !output.status.success() {
            return Err(Error::Ffmpeg {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

fn format_offset(offset: Duration) -> String {
    let secs = offset.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

#[async_trait::async_trait]
impl Thumbnailer for FfmpegThumbnailer {
    #[tracing::instrument(name = "create_thumbnail", skip(self))]
    async fn create_thumbnail(&self, video: &Path, output: &Path) -> Result<(), Error> {
        let mut command = Command::new(&self.ffmpeg);
        command.args(["-hide_banner", "-y"]);

        if self.has_cover_image(video).await? {
            tracing::info!("Extracting embedded cover image");
            command
                .arg("-i")
                .arg(video)
                .args(["-map", "disp:attached_pic", "-c", "copy"]);
        } else {
            tracing::info!("No cover image, grabbing a frame");
            command
                .arg("-ss")
                .arg(format_offset(self.frame_offset))
                .arg("-i")
                .arg(video)
                .args(["-frames:v", "1"]);
        }
        command.arg(output);

        self.run(&mut command).await
    }
}
