//! Resolves canonical timezone names into UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The offset of `canonical_timezone`, e.g. "Africa/Nairobi", right now.
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod get_local_offset_tests {
    use time::macros::offset;

    use super::get_local_offset;

    #[test]
    fn resolves_fixed_offset_zone() {
        // East Africa Time does not observe daylight saving time.
        assert_eq!(get_local_offset("Africa/Nairobi"), Some(offset!(+3)));
    }

    #[test]
    fn unknown_name_gives_none() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
    }
}
