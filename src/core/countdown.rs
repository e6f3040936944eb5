use chrono::{DateTime, Utc};
use serde::Serialize;

/// Time remaining until a pass begins, broken into display fields. Clamps to
/// all zeroes once the target instant has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub const ZERO: Countdown = Countdown {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> Countdown {
        let remaining = (target - now).num_seconds();
        if remaining <= 0 {
            return Countdown::ZERO;
        }
        Countdown {
            days: remaining / 86_400,
            hours: (remaining % 86_400) / 3_600,
            minutes: (remaining % 3_600) / 60,
            seconds: remaining % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Countdown::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::Countdown;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn breaks_down_remaining_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let target = now + Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);
        assert_eq!(
            Countdown::until(now, target),
            Countdown {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
    }

    #[test]
    fn sub_day_pass_has_no_day_component() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let target = now + Duration::hours(2);
        let countdown = Countdown::until(now, target);
        assert_eq!(countdown.days, 0);
        assert_eq!(countdown.hours, 2);
    }

    #[test]
    fn past_target_clamps_to_zero() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let countdown = Countdown::until(now, now - Duration::minutes(10));
        assert!(countdown.is_zero());
    }
}
