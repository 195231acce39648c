//! Lunar almanac: label tables, the solar→lunar approximation and the
//! per-day favorable/unfavorable advisory lookup.
//!
//! The conversion here is a fixed arithmetic offset (lunar month assumed two
//! months behind the solar month, lunar day cycling over a flat 30-day month).
//! It is deliberately NOT an astronomical conversion — no leap months, no
//! 29-day months — and the advisory text derived from it is decorative.

use chrono::{Datelike, NaiveDate};

/// Traditional lunar month names, index 0 = 正月.
pub const LUNAR_MONTHS: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];

/// Traditional lunar day names, index 0 = 初一.
pub const LUNAR_DAYS: [&str; 30] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十",
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
    "廿一", "廿二", "廿三", "廿四", "廿五", "廿六", "廿七", "廿八", "廿九", "三十",
];

/// Offset (in months) the approximation assumes between solar and lunar months.
const LUNAR_MONTH_OFFSET: u32 = 2;

/// Approximate lunar date: month and day labels from the fixed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub month_label: &'static str,
    pub day_label: &'static str,
}

impl LunarDate {
    /// Combined label as displayed in calendar cells, e.g. "十月廿五".
    pub fn label(&self) -> String {
        format!("{}{}", self.month_label, self.day_label)
    }
}

/// Advisory pair for one day. Slices point into the static dictionaries and
/// are recomputed per lookup, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceEntry {
    pub favorable: &'static [&'static str],
    pub unfavorable: &'static [&'static str],
}

// Favorable phrases keyed by lunar day label. Only a subset of the 30 labels
// is populated; the rest fall back to DEFAULT_FAVORABLE.
const FAVORABLE: &[(&str, &[&str])] = &[
    ("初一", &["宜：祭祀", "宜：祈福", "宜：斋醮", "宜：会亲友"]),
    ("初二", &["宜：祈福", "宜：嫁娶", "宜：纳采", "宜：订盟"]),
    ("初三", &["宜：出行", "宜：祭祀", "宜：祈福", "宜：斋醮"]),
    ("初四", &["宜：祭祀", "宜：祈福", "宜：求嗣", "宜：斋醮"]),
    ("初五", &["宜：嫁娶", "宜：祭祀", "宜：祈福", "宜：出行"]),
    ("初六", &["宜：嫁娶", "宜：纳采", "宜：订盟", "宜：祭祀"]),
    ("初七", &["宜：祭祀", "宜：祈福", "宜：求嗣", "宜：斋醮"]),
    ("初八", &["宜：嫁娶", "宜：祭祀", "宜：祈福", "宜：求嗣"]),
    ("初九", &["宜：祭祀", "宜：祈福", "宜：斋醮", "宜：出行"]),
    ("初十", &["宜：祭祀", "宜：祈福", "宜：斋醮", "宜：会亲友"]),
    ("十五", &["宜：祭祀", "宜：祈福", "宜：斋醮", "宜：嫁娶"]),
    ("廿八", &["宜：嫁娶", "宜：纳采", "宜：订盟", "宜：祭祀"]),
    ("三十", &["宜：祭祀", "宜：祈福", "宜：斋醮", "宜：会亲友"]),
];

// Unfavorable phrases, same keys as FAVORABLE.
const UNFAVORABLE: &[(&str, &[&str])] = &[
    ("初一", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初二", &["忌：开市", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初三", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初四", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初五", &["忌：开市", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初六", &["忌：开市", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初七", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初八", &["忌：开市", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初九", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
    ("初十", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
    ("十五", &["忌：开市", "忌：安葬", "忌：破土", "忌：动土"]),
    ("廿八", &["忌：开市", "忌：安葬", "忌：破土", "忌：动土"]),
    ("三十", &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]),
];

/// Fallback pair for day labels absent from the dictionaries.
pub const DEFAULT_FAVORABLE: &[&str] = &["宜：祈福", "宜：出行", "宜：祭祀"];
pub const DEFAULT_UNFAVORABLE: &[&str] = &["忌：动土", "忌：破土", "忌：安葬"];

/// Map a solar date onto the approximate lunar labels.
///
/// `lunar month index = (solar month index - 2) mod 12`,
/// `lunar day index = (solar day - 1) mod 30`; both indices are guaranteed in
/// range for any valid calendar date.
pub fn approximate_lunar_date(date: NaiveDate) -> LunarDate {
    let month0 = date.month0(); // 0-based solar month
    let month_index = ((month0 + 12 - LUNAR_MONTH_OFFSET) % 12) as usize;
    let day_index = ((date.day() - 1) % 30) as usize;
    LunarDate {
        month_label: LUNAR_MONTHS[month_index],
        day_label: LUNAR_DAYS[day_index],
    }
}

fn phrases_for(
    table: &'static [(&'static str, &'static [&'static str])],
    label: &str,
) -> Option<&'static [&'static str]> {
    table.iter().find(|(key, _)| *key == label).map(|(_, v)| *v)
}

/// Advisory pair for a solar date, derived via the lunar day label.
pub fn advice_for(date: NaiveDate) -> AdviceEntry {
    let lunar = approximate_lunar_date(date);
    AdviceEntry {
        favorable: phrases_for(FAVORABLE, lunar.day_label).unwrap_or(DEFAULT_FAVORABLE),
        unfavorable: phrases_for(UNFAVORABLE, lunar.day_label).unwrap_or(DEFAULT_UNFAVORABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn conversion_is_pure_and_in_range() {
        let a = approximate_lunar_date(date(2025, 12, 25));
        let b = approximate_lunar_date(date(2025, 12, 25));
        assert_eq!(a, b);
        // Every day of a long and a short month resolves to valid labels.
        for (m, last) in [(1u32, 31u32), (2, 28)] {
            for d in 1..=last {
                let l = approximate_lunar_date(date(2025, m, d));
                assert!(LUNAR_MONTHS.contains(&l.month_label));
                assert!(LUNAR_DAYS.contains(&l.day_label));
            }
        }
    }

    #[test]
    fn december_offset_maps_to_tenth_month() {
        let l = approximate_lunar_date(date(2025, 12, 25));
        assert_eq!(l.month_label, "十月");
        assert_eq!(l.day_label, "廿五");
        assert_eq!(l.label(), "十月廿五");
    }

    #[test]
    fn day_31_wraps_back_to_first_label() {
        let l = approximate_lunar_date(date(2025, 1, 31));
        assert_eq!(l.day_label, "初一");
    }

    #[test]
    fn populated_day_uses_table_entry() {
        // 2025-01-01 -> day label 初一, which is a populated key.
        let advice = advice_for(date(2025, 1, 1));
        assert_eq!(advice.favorable, &["宜：祭祀", "宜：祈福", "宜：斋醮", "宜：会亲友"]);
        assert_eq!(advice.unfavorable, &["忌：嫁娶", "忌：安葬", "忌：破土", "忌：动土"]);
    }

    #[test]
    fn unpopulated_day_falls_back_to_default_pair() {
        // 廿五 is not in the dictionaries.
        let advice = advice_for(date(2025, 12, 25));
        assert_eq!(advice.favorable, DEFAULT_FAVORABLE);
        assert_eq!(advice.unfavorable, DEFAULT_UNFAVORABLE);
        assert_eq!(advice.favorable.len(), 3);
        assert_eq!(advice.unfavorable.len(), 3);
    }
}
