use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::Checkin;

/// Engagement counters shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckinStats {
    pub total: usize,
    /// Consecutive days with a check-in, ending today or yesterday.
    pub streak_days: u32,
    /// Check-ins in the ISO week containing `today`.
    pub this_week: usize,
}

impl CheckinStats {
    pub fn compute(checkins: &[Checkin], today: NaiveDate) -> Self {
        let days: BTreeSet<NaiveDate> = checkins
            .iter()
            .map(|checkin| checkin.created_at.date_naive())
            .collect();

        let mut cursor = if days.contains(&today) {
            Some(today)
        } else {
            today.pred_opt().filter(|yesterday| days.contains(yesterday))
        };

        let mut streak_days = 0;
        while let Some(day) = cursor.filter(|day| days.contains(day)) {
            streak_days += 1;
            cursor = day.pred_opt();
        }

        let week = today.iso_week();
        let this_week = checkins
            .iter()
            .filter(|checkin| checkin.created_at.date_naive().iso_week() == week)
            .count();

        Self {
            total: checkins.len(),
            streak_days,
            this_week,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::workflows::checkin::{CheckinId, EnergyLevel, Mood};

    fn checkin_on(year: i32, month: u32, day: u32) -> Checkin {
        Checkin {
            id: CheckinId(format!("chk-{year}{month:02}{day:02}")),
            created_at: Utc
                .with_ymd_and_hms(year, month, day, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
            mood: Mood::NEUTRAL,
            energy: EnergyLevel::Medium,
            note: None,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn streak_counts_consecutive_days_through_today() {
        let checkins = vec![
            checkin_on(2025, 10, 13),
            checkin_on(2025, 10, 12),
            checkin_on(2025, 10, 12),
            checkin_on(2025, 10, 11),
            checkin_on(2025, 10, 9),
        ];

        let stats = CheckinStats::compute(&checkins, date(2025, 10, 13));
        assert_eq!(stats.total, 5);
        assert_eq!(stats.streak_days, 3);
    }

    #[test]
    fn streak_survives_until_end_of_next_day() {
        let checkins = vec![checkin_on(2025, 10, 12), checkin_on(2025, 10, 11)];

        assert_eq!(
            CheckinStats::compute(&checkins, date(2025, 10, 13)).streak_days,
            2
        );
        assert_eq!(
            CheckinStats::compute(&checkins, date(2025, 10, 14)).streak_days,
            0
        );
    }

    #[test]
    fn this_week_uses_iso_weeks() {
        // 2025-10-13 is a Monday.
        let checkins = vec![
            checkin_on(2025, 10, 15),
            checkin_on(2025, 10, 13),
            checkin_on(2025, 10, 12),
        ];

        let stats = CheckinStats::compute(&checkins, date(2025, 10, 15));
        assert_eq!(stats.this_week, 2);
    }

    #[test]
    fn empty_history_has_no_streak() {
        let stats = CheckinStats::compute(&[], date(2025, 10, 15));
        assert_eq!(stats, CheckinStats { total: 0, streak_days: 0, this_week: 0 });
    }
}
