// Dataset invariants for the almanac tables and the translation tables.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use chrono::NaiveDate;
use soulbit::almanac::{self, DEFAULT_FAVORABLE, DEFAULT_UNFAVORABLE, LUNAR_DAYS, LUNAR_MONTHS};
use soulbit::i18n::{Locale, Translator};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn lunar_label_tables_are_unique_and_nonempty() {
    let mut seen = HashSet::new();
    for label in LUNAR_MONTHS {
        assert!(!label.is_empty());
        assert!(seen.insert(label), "duplicate month label '{label}'");
    }
    let mut seen = HashSet::new();
    for label in LUNAR_DAYS {
        assert!(!label.is_empty());
        assert!(seen.insert(label), "duplicate day label '{label}'");
    }
    assert_eq!(LUNAR_MONTHS.len(), 12);
    assert_eq!(LUNAR_DAYS.len(), 30);
}

#[test]
fn advisory_phrases_carry_their_prefixes() {
    // January 2025 has 31 days, so days 1..=30 walk every day label once.
    for day in 1..=30 {
        let advice = almanac::advice_for(date(2025, 1, day));
        assert!(advice.favorable.len() >= 3, "day {day}");
        assert!(advice.unfavorable.len() >= 3, "day {day}");
        for item in advice.favorable {
            assert!(item.starts_with("宜："), "favorable '{item}' on day {day}");
        }
        for item in advice.unfavorable {
            assert!(item.starts_with("忌："), "unfavorable '{item}' on day {day}");
        }
    }
}

#[test]
fn thirteen_day_labels_are_populated_rest_fall_back() {
    let populated = (1..=30)
        .filter(|&day| {
            let advice = almanac::advice_for(date(2025, 1, day));
            advice.favorable != DEFAULT_FAVORABLE || advice.unfavorable != DEFAULT_UNFAVORABLE
        })
        .count();
    assert_eq!(populated, 13);
}

// Every key the views use, asserted present in all three locales so a missing
// translation shows up here instead of as a raw key on screen.
const UI_KEYS: &[&str] = &[
    "nav.chat",
    "nav.calendar",
    "nav.game",
    "nav.settings",
    "game.title",
    "game.description",
    "game.fiveElements",
    "game.fiveElementsDesc",
    "game.fortuneTelling",
    "game.fortuneTellingDesc",
    "game.startGame",
    "game.back",
    "game.score",
    "game.time",
    "game.round",
    "game.whatGenerates",
    "game.whatConquers",
    "game.correct",
    "game.incorrect",
    "game.gameOver",
    "game.finalScore",
    "game.timeRemaining",
    "game.correctAnswers",
    "game.seconds",
    "game.playAgain",
    "game.backToMenu",
    "game.analysisTitle",
    "game.analysisExample1",
    "game.analysisExample2",
    "game.analysisExample3",
    "settings.title",
    "settings.theme",
    "settings.darkMode",
    "settings.language",
    "settings.notifications",
    "settings.receiveNotifications",
    "settings.api",
    "settings.apiUrl",
    "settings.about",
    "settings.version",
    "settings.description",
    "settings.copyright",
    "chat.title",
    "chat.inputPlaceholder",
    "chat.send",
    "chat.connectionStatus",
    "chat.connected",
    "chat.disconnected",
    "chat.connecting",
    "chat.loading",
    "chat.serviceStatus",
    "chat.connectionFailed",
    "chat.errorConnection",
    "chat.errorNotConnected",
    "chat.errorParse",
    "chat.errorBusy",
    "calendar.title",
    "calendar.today",
    "calendar.favorable",
    "calendar.unfavorable",
    "calendar.loading",
    "calendar.day.0",
    "calendar.day.1",
    "calendar.day.2",
    "calendar.day.3",
    "calendar.day.4",
    "calendar.day.5",
    "calendar.day.6",
];

#[test]
fn every_locale_covers_every_ui_key() {
    for locale in Locale::ALL {
        let t = Translator::new(locale);
        for key in UI_KEYS {
            assert_ne!(
                t.t(key),
                *key,
                "key '{key}' missing in locale {}",
                locale.as_tag()
            );
        }
    }
}

#[test]
fn question_templates_take_the_element_variable() {
    for locale in Locale::ALL {
        let t = Translator::new(locale);
        for key in ["game.whatGenerates", "game.whatConquers"] {
            let text = t.t_with(key, &[("element", "火")]);
            assert!(text.contains('火'), "{key} in {}", locale.as_tag());
            assert!(!text.contains("{{"), "{key} in {}", locale.as_tag());
        }
    }
}
