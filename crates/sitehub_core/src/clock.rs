use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock pinned to a single instant, for deterministic transformations.
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub fn timestamp(clock: &dyn Clock) -> Result<String, AppError> {
    clock
        .now()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn today(clock: &dyn Clock) -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    clock
        .now()
        .to_offset(offset)
        .date()
        .format(&DATE_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn parse_date(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    time::Date::parse(trimmed, &DATE_FORMAT)
        .map_err(|_| AppError::invalid_input("date must be YYYY-MM-DD"))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, parse_date, timestamp, today};
    use time::macros::datetime;

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        let clock = FixedClock(datetime!(2026-03-01 08:30:00 UTC));
        assert_eq!(clock.now(), datetime!(2026-03-01 08:30:00 UTC));
    }

    #[test]
    fn timestamp_formats_rfc3339() {
        let clock = FixedClock(datetime!(2026-03-01 08:30:00 UTC));
        assert_eq!(timestamp(&clock).unwrap(), "2026-03-01T08:30:00Z");
    }

    #[test]
    fn today_formats_calendar_date() {
        let clock = FixedClock(datetime!(2026-03-01 08:30:00 UTC));
        let date = today(&clock).unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(parse_date(&date).unwrap(), date);
    }

    #[test]
    fn parse_date_accepts_iso_date() {
        assert_eq!(parse_date(" 2026-03-01 ").unwrap(), "2026-03-01");
    }

    #[test]
    fn parse_date_rejects_malformed_input() {
        let err = parse_date("01/03/2026").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
