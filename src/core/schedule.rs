use chrono::{Datelike, Timelike};
use crate::models::{DayKey, Pharmacy, WeeklySchedule};

/// Minutes elapsed since midnight for a wall-clock instant
#[inline]
pub fn minutes_of_day<T: Timelike>(at: &T) -> u16 {
    // hour() < 24 and minute() < 60, so this always fits
    (at.hour() * 60 + at.minute()) as u16
}

/// Check whether a schedule has a window covering `minutes` on `day`
///
/// Windows are tested independently and bounds are inclusive. A window that
/// closes before it opens (spanning midnight) never matches.
#[inline]
pub fn is_open_on(schedule: &WeeklySchedule, day: DayKey, minutes: u16) -> bool {
    schedule
        .windows(day)
        .iter()
        .any(|window| window.contains(minutes))
}

/// Check whether a pharmacy is open at the given local instant
///
/// On-duty pharmacies are always open. Otherwise the instant's weekday picks
/// the day's windows; a missing or empty day means closed.
pub fn is_open<T>(pharmacy: &Pharmacy, at: &T) -> bool
where
    T: Datelike + Timelike,
{
    if pharmacy.on_duty {
        return true;
    }

    let day = DayKey::from_weekday(at.weekday());
    is_open_on(&pharmacy.schedule, day, minutes_of_day(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PharmacyId, TimeWindow};
    use chrono::{NaiveDate, NaiveDateTime};

    fn create_test_pharmacy(on_duty: bool, schedule: WeeklySchedule) -> Pharmacy {
        Pharmacy {
            id: PharmacyId::from(1),
            name: "Pharmacie du Vieux-Marché".to_string(),
            address: "12 Place du Vieux-Marché".to_string(),
            city: "Rouen".to_string(),
            postal_code: "76000".to_string(),
            latitude: 49.4430,
            longitude: 1.0880,
            phone: "02 35 70 00 00".to_string(),
            on_duty,
            schedule,
        }
    }

    // 2024-01-15 is a Monday
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn weekday_schedule() -> WeeklySchedule {
        WeeklySchedule::new().with_weekdays(vec![
            TimeWindow::from_hm(8, 30, 12, 30),
            TimeWindow::from_hm(14, 0, 19, 30),
        ])
    }

    #[test]
    fn test_open_inside_window() {
        let pharmacy = create_test_pharmacy(false, weekday_schedule());
        assert!(is_open(&pharmacy, &monday_at(10, 0)));
        assert!(is_open(&pharmacy, &monday_at(15, 45)));
    }

    #[test]
    fn test_closed_during_lunch_break() {
        let pharmacy = create_test_pharmacy(false, weekday_schedule());
        assert!(!is_open(&pharmacy, &monday_at(13, 0)));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let pharmacy = create_test_pharmacy(false, weekday_schedule());

        assert!(is_open(&pharmacy, &monday_at(8, 30)));
        assert!(is_open(&pharmacy, &monday_at(19, 30)));
        assert!(!is_open(&pharmacy, &monday_at(8, 29)));
        assert!(!is_open(&pharmacy, &monday_at(19, 31)));
    }

    #[test]
    fn test_closed_on_missing_day() {
        // 2024-01-14 is a Sunday, not in the weekday schedule
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 14)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let pharmacy = create_test_pharmacy(false, weekday_schedule());
        assert!(!is_open(&pharmacy, &sunday));
    }

    #[test]
    fn test_closed_on_empty_day() {
        let schedule = WeeklySchedule::new().with_day(DayKey::Monday, vec![]);
        let pharmacy = create_test_pharmacy(false, schedule);
        assert!(!is_open(&pharmacy, &monday_at(10, 0)));
    }

    #[test]
    fn test_on_duty_overrides_empty_schedule() {
        let pharmacy = create_test_pharmacy(true, WeeklySchedule::new());
        assert!(is_open(&pharmacy, &monday_at(3, 0)));
    }

    #[test]
    fn test_midnight_window_never_matches() {
        let schedule = WeeklySchedule::new()
            .with_day(DayKey::Monday, vec![TimeWindow::from_hm(20, 0, 2, 0)]);
        let pharmacy = create_test_pharmacy(false, schedule);

        assert!(!is_open(&pharmacy, &monday_at(22, 0)));
        assert!(!is_open(&pharmacy, &monday_at(1, 0)));
    }

    #[test]
    fn test_minutes_of_day() {
        assert_eq!(minutes_of_day(&monday_at(0, 0)), 0);
        assert_eq!(minutes_of_day(&monday_at(8, 30)), 510);
        assert_eq!(minutes_of_day(&monday_at(23, 59)), 1439);
    }
}
