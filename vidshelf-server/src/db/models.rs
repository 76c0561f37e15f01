use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate};
use diesel::prelude::*;

use super::schema;

/// Storage format of `videos.publish_date`.
pub const PUBLISH_DATE_FORMAT: &str = "%Y%m%d";

/// A catalogued video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: i64,
    pub file_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub on_disk: bool,
    pub on_removable_media: bool,
    pub checkin_time: DateTime<FixedOffset>,
    pub original_filename: String,
    pub checksum: String,
}

impl TryFrom<VideoInner> for Video {
    type Error = super::Error;
    fn try_from(value: VideoInner) -> Result<Self, super::Error> {
        let publish_date = value
            .publish_date
            .map(|date| {
                NaiveDate::parse_from_str(&date, PUBLISH_DATE_FORMAT)
                    .map_err(|_| super::Error::InvalidPublishDate(date))
            })
            .transpose()?;
        let checkin_time = DateTime::parse_from_rfc3339(&value.checkin_time)
            .map_err(|_| super::Error::InvalidCheckinTime(value.checkin_time.clone()))?;
        Ok(Self {
            id: value.id,
            file_id: value.file_id,
            title: value.title,
            author: value.author,
            publish_date,
            on_disk: value.hdd_flag,
            on_removable_media: value.rmb_flag,
            checkin_time,
            original_filename: value.original_filename,
            checksum: value.checksum,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schema::videos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VideoInner {
    pub id: i64,
    pub file_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<String>,
    pub hdd_flag: bool,
    pub rmb_flag: bool,
    pub checkin_time: String,
    pub original_filename: String,
    pub checksum: String,
}

/// Everything recorded about a file when it is checked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckedInVideo {
    pub file_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub checkin_time: DateTime<FixedOffset>,
    pub original_filename: String,
    pub checksum: String,
    /// Folder the file was moved to
    pub folder_path: PathBuf,
    /// Name of the file inside `folder_path`
    pub file_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::videos)]
pub struct NewVideo {
    pub file_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<String>,
    pub hdd_flag: bool,
    pub rmb_flag: bool,
    pub checkin_time: String,
    pub original_filename: String,
    pub checksum: String,
}

impl From<&NewCheckedInVideo> for NewVideo {
    fn from(value: &NewCheckedInVideo) -> Self {
        Self {
            file_id: value.file_id.clone(),
            title: value.title.clone(),
            author: value.author.clone(),
            publish_date: value
                .publish_date
                .map(|d| d.format(PUBLISH_DATE_FORMAT).to_string()),
            hdd_flag: true,
            rmb_flag: false,
            checkin_time: value.checkin_time.to_rfc3339(),
            original_filename: value.original_filename.clone(),
            checksum: value.checksum.clone(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = schema::hdd)]
pub struct NewHddLocation {
    pub video_id: i64,
    pub folder_path: String,
    pub file_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::playlist)]
pub struct NewPlaylistEntry {
    pub video_id: i64,
    pub title: String,
    pub thumbnail: String,
}

/// A video stored on disk that has not been added to the playlist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVideo {
    pub video_id: i64,
    /// The parsed title, or the original file name when no title was found
    pub title: String,
    pub checkin_time: DateTime<FixedOffset>,
    pub file_path: PathBuf,
    pub file_name: String,
}

#[derive(Queryable)]
pub struct PendingVideoInner {
    pub video_id: i64,
    pub title: Option<String>,
    pub original_filename: String,
    pub checkin_time: String,
    pub folder_path: String,
    pub file_name: String,
}

impl TryFrom<PendingVideoInner> for PendingVideo {
    type Error = super::Error;
    fn try_from(value: PendingVideoInner) -> Result<Self, super::Error> {
        let checkin_time = DateTime::parse_from_rfc3339(&value.checkin_time)
            .map_err(|_| super::Error::InvalidCheckinTime(value.checkin_time.clone()))?;
        Ok(Self {
            video_id: value.video_id,
            title: value.title.unwrap_or(value.original_filename),
            checkin_time,
            file_path: PathBuf::from(value.folder_path).join(&value.file_name),
            file_name: value.file_name,
        })
    }
}

/// A playlist row joined with the uploader of its video.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct PlaylistEntry {
    pub title: String,
    pub channel: Option<String>,
    /// Path relative to the thumbnail folder, empty if there is no thumbnail
    pub thumbnail: String,
}
