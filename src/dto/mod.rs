use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod health;
pub mod score;
pub mod session;
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::format_system_time;

    #[test]
    fn formats_epoch_offsets_as_rfc3339() {
        let stamp = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_system_time(stamp), "2023-11-14T22:13:20Z");
    }
}
