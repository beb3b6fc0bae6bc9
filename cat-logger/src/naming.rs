//! Date-derived log file names: `cat_<year>_<month:02>_<day:02>.log`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

pub const LOG_FILE_PREFIX: &str = "cat_";
pub const LOG_FILE_SUFFIX: &str = ".log";

pub fn log_file_name(date: NaiveDate) -> String {
    format!(
        "{LOG_FILE_PREFIX}{}_{:02}_{:02}{LOG_FILE_SUFFIX}",
        date.year(),
        date.month(),
        date.day()
    )
}

pub fn log_file_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(log_file_name(date))
}

/// Recover the date encoded in a log file name.
///
/// Month and day must be exactly two digits; `cat_2024_7_3.log` is rejected.
pub fn parse_log_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_suffix(LOG_FILE_SUFFIX)?;
    let mut parts = stem.splitn(3, '_');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;

    if month.len() != 2 || day.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Newest dated log file in `log_dir`, if any. A missing directory yields `None`.
pub fn latest_log_file(log_dir: &Path) -> io::Result<Option<(NaiveDate, PathBuf)>> {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };

    let mut latest: Option<(NaiveDate, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let Some(date) = entry.file_name().to_str().and_then(parse_log_file_name) else {
            continue;
        };
        if latest.as_ref().map_or(true, |(best, _)| date > *best) {
            latest = Some((date, entry.path()));
        }
    }
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn name_is_zero_padded() {
        assert_eq!(log_file_name(date(2024, 7, 3)), "cat_2024_07_03.log");
        assert_eq!(log_file_name(date(2024, 12, 31)), "cat_2024_12_31.log");
    }

    #[test]
    fn generated_name_parses_back_to_same_date() {
        let day = date(2024, 7, 3);
        let name = log_file_name(day);
        assert!(!name.contains("_7_3_"));
        assert_eq!(parse_log_file_name(&name), Some(day));
    }

    #[rstest]
    #[case("cat_2024_7_3.log")]
    #[case("cat_2024_07_03.txt")]
    #[case("dog_2024_07_03.log")]
    #[case("cat_2024_02_30.log")]
    #[case("cat_2024_07.log")]
    #[case("cat_+2024_07_03.log")]
    fn malformed_names_are_rejected(#[case] name: &str) {
        assert_eq!(parse_log_file_name(name), None, "{name}");
    }

    #[test]
    fn latest_log_file_picks_newest_date_and_ignores_strangers() {
        let dir = TempDir::new().unwrap();
        for name in [
            "cat_2024_01_31.log",
            "cat_2024_02_01.log",
            "cat_2023_12_31.log",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let (day, path) = latest_log_file(dir.path()).unwrap().unwrap();
        assert_eq!(day, date(2024, 2, 1));
        assert!(path.ends_with("cat_2024_02_01.log"));
    }

    #[test]
    fn latest_log_file_on_missing_dir_is_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(latest_log_file(&missing).unwrap().is_none());
    }
}
