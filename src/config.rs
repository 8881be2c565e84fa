//! Application settings resolved from the command line and environment.

use std::path::PathBuf;

use time::UtcOffset;

use crate::{Error, stores::DEFAULT_STORAGE_KEY, timezone::get_local_offset};

/// The timezone used when none is configured, East Africa Time.
pub const DEFAULT_TIMEZONE: &str = "Africa/Nairobi";

/// The database file used when none is configured.
pub const DEFAULT_DB_PATH: &str = "savings.db";

/// Validated settings for opening a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the SQLite database lives.
    pub db_path: PathBuf,
    /// The canonical name of the timezone dates are shown in.
    pub timezone: String,
    /// The offset of `timezone`.
    pub local_offset: UtcOffset,
    /// The key the goals are saved under.
    pub storage_key: String,
}

impl Config {
    /// Check the raw settings and resolve the timezone.
    ///
    /// Blank values fall back to [DEFAULT_DB_PATH], [DEFAULT_TIMEZONE] and
    /// [DEFAULT_STORAGE_KEY].
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezoneError] if `timezone` is not a
    /// canonical timezone name.
    pub fn new(
        db_path: Option<PathBuf>,
        timezone: Option<&str>,
        storage_key: Option<&str>,
    ) -> Result<Self, Error> {
        let timezone = non_blank(timezone).unwrap_or(DEFAULT_TIMEZONE);
        let local_offset = get_local_offset(timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(timezone.to_owned()))?;

        let db_path = db_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Ok(Self {
            db_path,
            timezone: timezone.to_owned(),
            local_offset,
            storage_key: non_blank(storage_key)
                .unwrap_or(DEFAULT_STORAGE_KEY)
                .to_owned(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod config_tests {
    use std::path::PathBuf;

    use time::macros::offset;

    use crate::{
        Error,
        config::{Config, DEFAULT_DB_PATH, DEFAULT_TIMEZONE},
        stores::DEFAULT_STORAGE_KEY,
    };

    #[test]
    fn uses_defaults() {
        let config = Config::new(None, None, Some("  ")).unwrap();

        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.local_offset, offset!(+3));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn keeps_given_values() {
        let config = Config::new(
            Some(PathBuf::from("/tmp/goals.db")),
            Some("Asia/Tokyo"),
            Some("my_goals"),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/goals.db"));
        assert_eq!(config.local_offset, offset!(+9));
        assert_eq!(config.storage_key, "my_goals");
    }

    #[test]
    fn fails_on_unknown_timezone() {
        assert_eq!(
            Config::new(None, Some("Nowhere/Special"), None),
            Err(Error::InvalidTimezoneError("Nowhere/Special".to_owned()))
        );
    }
}
