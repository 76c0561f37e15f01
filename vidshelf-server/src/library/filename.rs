//! Metadata encoded in downloaded file names.
//!
//! Downloads are named `<title>(<display name>@<handle>,<YYYYMMDD>).<ext>`, for example
//! `Tunguska[vhX7bJ37ukA](ゆっくりオカルトQ@occultQ,20240521).mp4`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::db::PUBLISH_DATE_FORMAT;

static PUBLISH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("valid publish date regex"));

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<NaiveDate>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_publish_date(s: &str) -> Option<NaiveDate> {
    if !PUBLISH_DATE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, PUBLISH_DATE_FORMAT).ok()
}

pub fn parse_file_name(file_name: &str) -> ParsedName {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name,
    };

    let Some((title, tail)) = stem.split_once('(') else {
        return ParsedName {
            title: non_empty(stem),
            ..Default::default()
        };
    };

    let tail = tail.trim();
    let tail = tail.strip_suffix(')').unwrap_or(tail);

    let (author, publish_date) = match tail.rsplit_once(',') {
        Some((author, date)) => (non_empty(author), parse_publish_date(date.trim())),
        None if tail.contains('@') => (non_empty(tail), None),
        None => (None, None),
    };

    ParsedName {
        title: non_empty(title),
        author,
        publish_date,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use googletest::prelude::*;

    #[googletest::test]
    fn test_full_name() {
        let parsed = parse_file_name("Tunguska[vhX7bJ37ukA](ゆっくりオカルトQ@occultQ,20240521).mp4");
        expect_that!(
            parsed,
            eq(&ParsedName {
                title: Some("Tunguska[vhX7bJ37ukA]".to_string()),
                author: Some("ゆっくりオカルトQ@occultQ".to_string()),
                publish_date: NaiveDate::from_ymd_opt(2024, 5, 21),
            })
        );
    }

    #[googletest::test]
    fn test_plain_name_is_title() {
        expect_that!(
            parse_file_name("holiday.mkv"),
            eq(&ParsedName {
                title: Some("holiday".to_string()),
                ..Default::default()
            })
        );
    }

    #[googletest::test]
    fn test_only_last_extension_is_removed() {
        expect_that!(
            parse_file_name("part.1.mp4").title,
            some(eq("part.1"))
        );
    }

    #[googletest::test]
    fn test_author_without_date() {
        let parsed = parse_file_name("Song(singer@handle).webm");
        expect_that!(parsed.title, some(eq("Song")));
        expect_that!(parsed.author, some(eq("singer@handle")));
        expect_that!(parsed.publish_date, none());
    }

    #[googletest::test]
    fn test_parenthesis_without_handle_is_not_an_author() {
        let parsed = parse_file_name("Song (live).mp4");
        expect_that!(parsed.title, some(eq("Song")));
        expect_that!(parsed.author, none());
    }

    #[googletest::test]
    fn test_invalid_date_is_dropped() {
        let parsed = parse_file_name("Clip(someone@x,2024052).mp4");
        expect_that!(parsed.author, some(eq("someone@x")));
        expect_that!(parsed.publish_date, none());

        let parsed = parse_file_name("Clip(someone@x,20241340).mp4");
        expect_that!(parsed.publish_date, none());
    }

    #[googletest::test]
    fn test_split_uses_last_comma() {
        let parsed = parse_file_name("Clip(a, b@c,20240101).mp4");
        expect_that!(parsed.author, some(eq("a, b@c")));
        expect_that!(parsed.publish_date, eq(NaiveDate::from_ymd_opt(2024, 1, 1)));
    }

    #[googletest::test]
    fn test_empty_parts_are_absent() {
        let parsed = parse_file_name("(,20240101).mp4");
        expect_that!(parsed.title, none());
        expect_that!(parsed.author, none());
        expect_that!(parsed.publish_date, eq(NaiveDate::from_ymd_opt(2024, 1, 1)));
    }
}
