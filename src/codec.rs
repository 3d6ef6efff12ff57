use crate::digits::{Digits, DIGIT_COUNT};

pub const CENTIS_PER_SECOND: u64 = 100;
pub const CENTIS_PER_MINUTE: u64 = 60 * CENTIS_PER_SECOND;
pub const CENTIS_PER_HOUR: u64 = 60 * CENTIS_PER_MINUTE;

/// Largest value `from_centiseconds` can spell: 99:59:59.99
pub const MAX_DISPLAY_CENTIS: u64 = 99 * CENTIS_PER_HOUR + 59 * CENTIS_PER_MINUTE + 5999;

/// Each two-digit field is taken at face value, so "99" minutes is 99 * 6000.
pub fn to_centiseconds(digits: &Digits) -> u64 {
    digits.field(0) * CENTIS_PER_HOUR
        + digits.field(2) * CENTIS_PER_MINUTE
        + digits.field(4) * CENTIS_PER_SECOND
        + digits.field(6)
}

/// Normalized HHMMSSCC spelling of `value`. Saturates at 99:59:59.99.
pub fn from_centiseconds(value: u64) -> Digits {
    let value = value.min(MAX_DISPLAY_CENTIS);

    let hours = value / CENTIS_PER_HOUR;
    let minutes = value % CENTIS_PER_HOUR / CENTIS_PER_MINUTE;
    let seconds = value % CENTIS_PER_MINUTE / CENTIS_PER_SECOND;
    let centis = value % CENTIS_PER_SECOND;

    let mut values = [0u8; DIGIT_COUNT];
    for (i, field) in [hours, minutes, seconds, centis].into_iter().enumerate() {
        values[i * 2] = (field / 10) as u8;
        values[i * 2 + 1] = (field % 10) as u8;
    }
    Digits::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Digits {
        s.parse().unwrap()
    }

    #[test]
    fn test_to_centiseconds_five_minutes() {
        assert_eq!(to_centiseconds(&d("00050000")), 30_000);
    }

    #[test]
    fn test_to_centiseconds_all_fields() {
        assert_eq!(
            to_centiseconds(&d("01020304")),
            360_000 + 2 * 6000 + 3 * 100 + 4
        );
        assert_eq!(to_centiseconds(&Digits::ZERO), 0);
    }

    #[test]
    fn test_denormalized_fields_are_not_carried() {
        assert_eq!(to_centiseconds(&d("00990000")), 99 * 6000);
        assert_eq!(to_centiseconds(&d("00009900")), 9900);
    }

    #[test]
    fn test_from_centiseconds_pads_each_field() {
        assert_eq!(from_centiseconds(0).to_string(), "00000000");
        assert_eq!(from_centiseconds(5).to_string(), "00000005");
        assert_eq!(from_centiseconds(30_000).to_string(), "00050000");
        assert_eq!(from_centiseconds(366_304).to_string(), "01010304");
    }

    #[test]
    fn test_from_centiseconds_normalizes() {
        let ninety_nine_minutes = to_centiseconds(&d("00990000"));
        assert_eq!(from_centiseconds(ninety_nine_minutes).to_string(), "01390000");
    }

    #[test]
    fn test_from_centiseconds_saturates() {
        let max = to_centiseconds(&d("99999999"));
        assert_eq!(from_centiseconds(max).to_string(), "99595999");
        assert_eq!(from_centiseconds(MAX_DISPLAY_CENTIS).to_string(), "99595999");
    }

    #[test]
    fn test_round_trip_over_normalized_durations() {
        for hours in [0u8, 1, 9, 42, 99] {
            for minutes in [0u8, 1, 30, 59] {
                for seconds in [0u8, 7, 59] {
                    for centis in [0u8, 1, 50, 99] {
                        let s = format!("{hours:02}{minutes:02}{seconds:02}{centis:02}");
                        let digits = d(&s);
                        assert_eq!(from_centiseconds(to_centiseconds(&digits)), digits, "{s}");
                    }
                }
            }
        }
    }
}
