//! Common data types used by the APIs

/// A single entry of the video library, as listed by `GET api/videos`.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize, PartialEq, Eq, Clone)]
pub struct VideoDescriptor {
    /// Human-readable title of the video
    pub title: String,
    /// Uploader of the video, when known
    #[serde(default)]
    pub channel: Option<String>,
    /// Server path of the thumbnail image, when one exists
    #[serde(default)]
    pub thumbnail_path: Option<String>,
}

impl VideoDescriptor {
    /// Returns the thumbnail path, or `placeholder` if it is missing or empty.
    pub fn thumbnail_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.thumbnail_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => placeholder,
        }
    }

    /// Returns the channel name, or an empty string if it is unknown.
    pub fn channel_or_empty(&self) -> &str {
        self.channel.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use googletest::prelude::*;

    #[googletest::test]
    fn test_deserialize_missing_optional_fields() -> googletest::Result<()> {
        let descriptor: VideoDescriptor =
            serde_json::from_str(r#"{"title": "Only a title"}"#).or_fail()?;

        expect_that!(
            descriptor,
            eq(&VideoDescriptor {
                title: "Only a title".to_string(),
                channel: None,
                thumbnail_path: None,
            })
        );
        Ok(())
    }

    #[googletest::test]
    fn test_deserialize_null_fields() -> googletest::Result<()> {
        let descriptor: VideoDescriptor = serde_json::from_str(
            r#"{"title": "Nulls", "channel": null, "thumbnail_path": null}"#,
        )
        .or_fail()?;

        expect_that!(descriptor.channel, none());
        expect_that!(descriptor.thumbnail_path, none());
        Ok(())
    }

    #[googletest::test]
    fn test_title_is_required() {
        let result = serde_json::from_str::<VideoDescriptor>(r#"{"channel": "someone"}"#);
        expect_that!(result, err(anything()));
    }

    #[googletest::test]
    fn test_thumbnail_fallback() {
        let mut descriptor = VideoDescriptor {
            title: "t".to_string(),
            ..Default::default()
        };
        expect_that!(descriptor.thumbnail_or("noimage.png"), eq("noimage.png"));

        descriptor.thumbnail_path = Some(String::new());
        expect_that!(descriptor.thumbnail_or("noimage.png"), eq("noimage.png"));

        descriptor.thumbnail_path = Some("/thumbnails/2025/12/a.mp4.png".to_string());
        expect_that!(
            descriptor.thumbnail_or("noimage.png"),
            eq("/thumbnails/2025/12/a.mp4.png")
        );
    }

    #[googletest::test]
    fn test_channel_fallback() {
        let mut descriptor = VideoDescriptor::default();
        expect_that!(descriptor.channel_or_empty(), eq(""));

        descriptor.channel = Some("ゆっくりオカルトQ@occultQ".to_string());
        expect_that!(descriptor.channel_or_empty(), eq("ゆっくりオカルトQ@occultQ"));
    }
}
