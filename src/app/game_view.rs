//! Game panel: paints the quiz state machine and drives its two timers
//! (one-second countdown while playing, 1.5 s result delay between rounds).

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::{App, render_all, with_app};
use crate::game::{Element as Wuxing, GameSession, GameStatus, MAX_ROUNDS, QuestionKind};

/// Delay before the next round replaces the shown result.
const RESULT_DELAY_MS: i32 = 1_500;

/// Menu card selection. Only the five-elements quiz is playable; the
/// fortune-telling card is a menu teaser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameType {
    FiveElements,
    FortuneTelling,
}

pub(crate) struct GamePanel {
    pub session: GameSession,
    pub selected: GameType,
    interval: Option<i32>,
    /// Kept alive across interval clears; replaced on the next start. Dropping
    /// it inside its own tick would tear the executing closure down.
    tick_closure: Option<Closure<dyn FnMut()>>,
}

impl GamePanel {
    pub(crate) fn new() -> Self {
        Self {
            session: GameSession::new(),
            selected: GameType::FiveElements,
            interval: None,
            tick_closure: None,
        }
    }
}

pub(crate) fn build(doc: &Document) -> Result<Element, JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_id("sb-page-game");
    panel.set_class_name("game-page");

    let content = doc.create_element("div")?;
    content.set_id("sb-game-content");
    content.set_class_name("game-content");
    panel.append_child(&content)?;

    // Everything inside the panel is rebuilt per render; a single delegated
    // listener routes clicks via data-action.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(holder) = target.closest("[data-action]").ok().flatten() else {
                return;
            };
            let Some(action) = holder.get_attribute("data-action") else {
                return;
            };
            with_app(|app| dispatch(app, &action));
        }) as Box<dyn FnMut(_)>);
        panel.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(panel)
}

fn dispatch(app: &mut App, action: &str) {
    match action {
        "type:five-elements" => app.game.selected = GameType::FiveElements,
        "type:fortune-telling" => app.game.selected = GameType::FortuneTelling,
        "start" | "restart" => start_game(app),
        "menu" => {
            stop_countdown(&mut app.game);
            app.game.session.return_to_menu();
        }
        other => {
            if let Some(label) = other.strip_prefix("answer:") {
                answer(app, label);
                // render happens below; the round advances on a timer
            }
        }
    }
    render_all(app);
}

fn start_game(app: &mut App) {
    let mut rng = rand::thread_rng();
    app.game.session.start(&mut rng);
    start_countdown(&mut app.game);
}

fn answer(app: &mut App, label: &str) {
    let Some(choice) = Wuxing::ALL.iter().copied().find(|e| e.label() == label) else {
        return;
    };
    if app.game.session.answer(choice).is_none() {
        return;
    }
    // Let the result linger, then advance (or finish after the last round).
    let callback = Closure::once_into_js(move || {
        with_app(|app| {
            let mut rng = rand::thread_rng();
            app.game.session.advance(&mut rng);
            if app.game.session.status != GameStatus::Playing {
                stop_countdown(&mut app.game);
            }
            render_all(app);
        });
    });
    if let Some(window) = web_sys::window() {
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                RESULT_DELAY_MS,
            )
            .ok();
    }
}

fn start_countdown(game: &mut GamePanel) {
    stop_countdown(game);
    let closure = Closure::wrap(Box::new(move || {
        with_app(|app| {
            app.game.session.tick();
            if app.game.session.status != GameStatus::Playing {
                stop_countdown(&mut app.game);
            }
            render_all(app);
        });
    }) as Box<dyn FnMut()>);
    if let Some(window) = web_sys::window() {
        if let Ok(handle) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1_000,
        ) {
            game.interval = Some(handle);
        }
    }
    game.tick_closure = Some(closure);
}

/// Cancel the interval. The closure object stays parked until the next start.
fn stop_countdown(game: &mut GamePanel) {
    if let Some(handle) = game.interval.take() {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(handle);
        }
    }
}

/// Leaving the panel cancels the countdown; an in-progress game is abandoned
/// back to the menu rather than left frozen mid-round.
pub(crate) fn leave(app: &mut App) {
    stop_countdown(&mut app.game);
    if app.game.session.status == GameStatus::Playing {
        app.game.session.return_to_menu();
    }
}

pub(crate) fn render(app: &App, doc: &Document) {
    let Some(content) = doc.get_element_by_id("sb-game-content") else {
        return;
    };
    let html = match app.game.session.status {
        GameStatus::Menu => menu_html(app),
        GameStatus::Playing => playing_html(app),
        GameStatus::Finished => finished_html(app),
    };
    content.set_inner_html(&html);
}

fn menu_html(app: &App) -> String {
    let t = &app.translator;
    let card = |action: &str, selected: bool, name: String, desc: String| {
        let class = if selected {
            "game-type-card selected"
        } else {
            "game-type-card"
        };
        format!(
            "<div class=\"{class}\" data-action=\"{action}\">\
             <h3 class=\"game-type-title\">{name}</h3>\
             <p class=\"game-type-description\">{desc}</p></div>"
        )
    };
    format!(
        "<div class=\"game-menu\">\
         <h2 class=\"game-title\">{title}</h2>\
         <p class=\"game-description\">{desc}</p>\
         <div class=\"game-types\">{card_a}{card_b}</div>\
         <button class=\"game-start-button\" data-action=\"start\">{start}</button>\
         </div>",
        title = t.t("game.title"),
        desc = t.t("game.description"),
        card_a = card(
            "type:five-elements",
            app.game.selected == GameType::FiveElements,
            t.t("game.fiveElements"),
            t.t("game.fiveElementsDesc"),
        ),
        card_b = card(
            "type:fortune-telling",
            app.game.selected == GameType::FortuneTelling,
            t.t("game.fortuneTelling"),
            t.t("game.fortuneTellingDesc"),
        ),
        start = t.t("game.startGame"),
    )
}

fn playing_html(app: &App) -> String {
    let t = &app.translator;
    let session = &app.game.session;
    let Some(round) = &session.current else {
        return String::new();
    };

    let question = match round.kind {
        QuestionKind::Generate => t.t_with("game.whatGenerates", &[("element", round.element.label())]),
        QuestionKind::Conquer => t.t_with("game.whatConquers", &[("element", round.element.label())]),
    };

    let mut options = String::new();
    for option in round.options {
        let mut class = String::from("game-option");
        if session.selected == Some(option) {
            class.push_str(" selected");
        }
        if session.show_result {
            if option == round.correct {
                class.push_str(" correct");
            } else if session.selected == Some(option) {
                class.push_str(" incorrect");
            }
        }
        options.push_str(&format!(
            "<div class=\"{class}\" data-action=\"answer:{label}\" \
             style=\"background-color:{color}\">{label}</div>",
            label = option.label(),
            color = option.color(),
        ));
    }

    let result = if session.show_result {
        let (class, key) = if session.last_correct == Some(true) {
            ("result-message correct", "game.correct")
        } else {
            ("result-message incorrect", "game.incorrect")
        };
        format!("<div class=\"{class}\">{}</div>", t.t(key))
    } else {
        String::new()
    };

    format!(
        "<div class=\"five-elements-game\">\
         <div class=\"game-header\">\
         <div class=\"game-info\">\
         <div class=\"game-score\">{score_label}: {score}</div>\
         <div class=\"game-time\">{time_label}: {time}</div>\
         <div class=\"game-round\">{round_label}: {round}/{max_rounds}</div>\
         </div>\
         <button class=\"game-back-button\" data-action=\"menu\">{back}</button>\
         </div>\
         <div class=\"game-question\">\
         <div class=\"element-display\" style=\"background-color:{color}\">{element}</div>\
         <div class=\"question-text\">{question}</div>\
         </div>\
         <div class=\"game-options\">{options}</div>\
         {result}\
         </div>",
        score_label = t.t("game.score"),
        score = session.score,
        time_label = t.t("game.time"),
        time = session.time_left,
        round_label = t.t("game.round"),
        round = session.round,
        max_rounds = MAX_ROUNDS,
        back = t.t("game.back"),
        color = round.element.color(),
        element = round.element.label(),
    )
}

fn finished_html(app: &App) -> String {
    let t = &app.translator;
    let session = &app.game.session;
    format!(
        "<div class=\"game-finished\">\
         <h2 class=\"game-result-title\">{over}</h2>\
         <div class=\"game-result\">\
         <div class=\"final-score\">{score_label}: {score}</div>\
         <div class=\"final-time\">{time_label}: {time} {seconds}</div>\
         <div class=\"correct-answers\">{answers_label}: {answers}/{max_rounds}</div>\
         </div>\
         <div class=\"game-actions\">\
         <button class=\"game-restart-button\" data-action=\"restart\">{again}</button>\
         <button class=\"game-menu-button\" data-action=\"menu\">{to_menu}</button>\
         </div>\
         <div class=\"fortune-analysis\">\
         <h3 class=\"analysis-title\">{analysis}</h3>\
         <div class=\"analysis-content\"><p>{a1}</p><p>{a2}</p><p>{a3}</p></div>\
         </div>\
         </div>",
        over = t.t("game.gameOver"),
        score_label = t.t("game.finalScore"),
        score = session.score,
        time_label = t.t("game.timeRemaining"),
        time = session.time_left,
        seconds = t.t("game.seconds"),
        answers_label = t.t("game.correctAnswers"),
        answers = session.correct_answers(),
        max_rounds = MAX_ROUNDS,
        again = t.t("game.playAgain"),
        to_menu = t.t("game.backToMenu"),
        analysis = t.t("game.analysisTitle"),
        a1 = t.t("game.analysisExample1"),
        a2 = t.t("game.analysisExample2"),
        a3 = t.t("game.analysisExample3"),
    )
}
