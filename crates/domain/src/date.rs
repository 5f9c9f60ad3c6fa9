use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;

/// The calendar date `at` falls on for a wall clock in `tz`
pub fn local_date(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Resolves a wall clock time in `tz` to a single instant.
///
/// When the wall time is ambiguous (clocks turned back) the earliest instant is used.
/// When the wall time does not exist (clocks turned forward) it is moved past the gap,
/// so 02:30 on a night where 02:00 jumps to 03:00 becomes 03:30.
pub fn resolve_local(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// First and last millisecond of `date` in `tz`, both inclusive
pub fn day_bounds(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = resolve_local(date.and_time(NaiveTime::MIN), tz);
    let next_day = date.succ_opt().unwrap_or(NaiveDate::MAX);
    let end = resolve_local(next_day.and_time(NaiveTime::MIN), tz) - Duration::milliseconds(1);
    (start, end)
}

pub fn format_local(at: &DateTime<Utc>, tz: &Tz) -> String {
    at.with_timezone(tz).format("%a %-d %b %H:%M").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::{Europe::Oslo, UTC};

    fn utc(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ts).unwrap()
    }

    #[test]
    fn local_date_follows_the_timezone() {
        // 2021-02-17 23:30 UTC is already Thursday in Oslo
        let at = Utc.with_ymd_and_hms(2021, 2, 17, 23, 30, 0).unwrap();
        assert_eq!(local_date(&at, &UTC), NaiveDate::from_ymd_opt(2021, 2, 17).unwrap());
        assert_eq!(local_date(&at, &Oslo), NaiveDate::from_ymd_opt(2021, 2, 18).unwrap());
    }

    #[test]
    fn day_bounds_cover_the_local_day() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 17).unwrap();
        let (start, end) = day_bounds(date, &Oslo);
        assert_eq!(start, utc(1613516400000));
        assert_eq!(end, utc(1613602800000 - 1));
    }

    #[test]
    fn day_bounds_handle_short_days() {
        // Clocks are turned forward in Oslo on 2021-03-28, the day lasts 23 hours
        let date = NaiveDate::from_ymd_opt(2021, 3, 28).unwrap();
        let (start, end) = day_bounds(date, &Oslo);
        assert_eq!(
            end.timestamp_millis() - start.timestamp_millis() + 1,
            23 * 60 * 60 * 1000
        );
    }

    #[test]
    fn resolves_nonexistent_wall_time_past_the_gap() {
        let naive = NaiveDate::from_ymd_opt(2021, 3, 28)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(resolve_local(naive, &Oslo), utc(1616895000000));
    }

    #[test]
    fn resolves_ambiguous_wall_time_to_earliest() {
        let naive = NaiveDate::from_ymd_opt(2021, 10, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(resolve_local(naive, &Oslo), utc(1635640200000));
    }

    #[test]
    fn formats_in_local_time() {
        let at = utc(1613581200000);
        assert_eq!(format_local(&at, &Oslo), "Wed 17 Feb 18:00");
        assert_eq!(format_local(&at, &UTC), "Wed 17 Feb 17:00");
    }
}
