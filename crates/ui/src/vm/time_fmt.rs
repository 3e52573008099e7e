use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_core::time::fixed_now;

    #[test]
    fn formats_fixed_timestamp() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13 UTC");
        assert_eq!(format_date(fixed_now()), "2023-11-14");
    }
}
