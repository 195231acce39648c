//! Five-elements (wuxing) matching quiz: round generation and the
//! menu → playing → finished state machine. Purely local, no persistence.

use rand::Rng;
use rand::seq::SliceRandom;

/// Points awarded per correct answer.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Countdown length in seconds.
pub const ROUND_SECONDS: u32 = 60;

/// Rounds per game.
pub const MAX_ROUNDS: u32 = 10;

/// Answer options shown per round (one correct, three decoys).
pub const OPTIONS_PER_ROUND: usize = 4;

/// The five elements. Generation cycle: 金→水→木→火→土→金;
/// conquest cycle: 金→木, 木→土, 土→水, 水→火, 火→金.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    /// Hanzi label shown on cards and options.
    pub fn label(self) -> &'static str {
        match self {
            Element::Metal => "金",
            Element::Wood => "木",
            Element::Water => "水",
            Element::Fire => "火",
            Element::Earth => "土",
        }
    }

    /// Display color for the element card.
    pub fn color(self) -> &'static str {
        match self {
            Element::Metal => "#FFFFFF",
            Element::Wood => "#00FF00",
            Element::Water => "#0000FF",
            Element::Fire => "#FF0000",
            Element::Earth => "#FFFF00",
        }
    }

    /// The element this one generates (相生).
    pub fn generates(self) -> Element {
        match self {
            Element::Metal => Element::Water,
            Element::Wood => Element::Fire,
            Element::Water => Element::Wood,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
        }
    }

    /// The element this one conquers (相克).
    pub fn conquers(self) -> Element {
        match self {
            Element::Metal => Element::Wood,
            Element::Wood => Element::Earth,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
            Element::Earth => Element::Water,
        }
    }
}

/// Which relation the round asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Generate,
    Conquer,
}

impl QuestionKind {
    /// Translation key of the question template ("{{element}}生什么？" etc.).
    pub fn question_key(self) -> &'static str {
        match self {
            QuestionKind::Generate => "game.whatGenerates",
            QuestionKind::Conquer => "game.whatConquers",
        }
    }
}

/// One quiz round. Regenerated every round, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRound {
    pub element: Element,
    pub kind: QuestionKind,
    pub correct: Element,
    /// Four distinct options in display order, one of them `correct`.
    pub options: [Element; OPTIONS_PER_ROUND],
}

/// Generate a fresh round: random prompt element, random relation, the
/// correct answer plus three distinct decoys, shuffled.
pub fn generate_round(rng: &mut impl Rng) -> GameRound {
    let element = Element::ALL[rng.gen_range(0..Element::ALL.len())];
    let kind = if rng.gen_bool(0.5) {
        QuestionKind::Generate
    } else {
        QuestionKind::Conquer
    };
    let correct = match kind {
        QuestionKind::Generate => element.generates(),
        QuestionKind::Conquer => element.conquers(),
    };

    let mut options = vec![correct];
    while options.len() < OPTIONS_PER_ROUND {
        let candidate = Element::ALL[rng.gen_range(0..Element::ALL.len())];
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    options.shuffle(rng);

    let options = [options[0], options[1], options[2], options[3]];
    GameRound {
        element,
        kind,
        correct,
        options,
    }
}

/// Session status. Menu and Finished are idle; the countdown only runs while
/// Playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Finished,
}

/// Quiz session state. The countdown tick and the answer/advance flow race to
/// Finished; both land in the same terminal state so ordering does not matter.
#[derive(Debug, Default)]
pub struct GameSession {
    pub status: GameStatus,
    pub score: u32,
    pub time_left: u32,
    pub round: u32,
    pub current: Option<GameRound>,
    pub selected: Option<Element>,
    pub last_correct: Option<bool>,
    pub show_result: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Menu → Playing. Resets score, countdown and round counter and deals
    /// the first round. Also used for restart from the finished screen.
    pub fn start(&mut self, rng: &mut impl Rng) {
        self.score = 0;
        self.time_left = ROUND_SECONDS;
        self.round = 1;
        self.status = GameStatus::Playing;
        self.selected = None;
        self.last_correct = None;
        self.show_result = false;
        self.current = Some(generate_round(rng));
    }

    /// Back to the menu from any state; clears everything.
    pub fn return_to_menu(&mut self) {
        *self = Self::new();
    }

    /// Record an answer for the current round. Returns whether it was correct;
    /// ignored (None) outside Playing or while the result is already shown.
    pub fn answer(&mut self, choice: Element) -> Option<bool> {
        if self.status != GameStatus::Playing || self.show_result {
            return None;
        }
        let round = self.current.as_ref()?;
        let correct = choice == round.correct;
        self.selected = Some(choice);
        self.last_correct = Some(correct);
        self.show_result = true;
        if correct {
            self.score += POINTS_PER_CORRECT;
        }
        Some(correct)
    }

    /// Advance past the result display: next round, or Finished after the
    /// last one. No-op unless a result is currently shown.
    pub fn advance(&mut self, rng: &mut impl Rng) {
        if self.status != GameStatus::Playing || !self.show_result {
            return;
        }
        self.selected = None;
        self.last_correct = None;
        self.show_result = false;
        if self.round < MAX_ROUNDS {
            self.round += 1;
            self.current = Some(generate_round(rng));
        } else {
            self.status = GameStatus::Finished;
        }
    }

    /// One second of countdown. Forces Finished when time runs out.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.status = GameStatus::Finished;
        }
    }

    /// Correct answers derived from the score, as shown on the result screen.
    pub fn correct_answers(&self) -> u32 {
        self.score / POINTS_PER_CORRECT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn generation_and_conquest_cycles_close() {
        // Following generates() five times visits every element once.
        let mut seen = vec![Element::Metal];
        let mut cur = Element::Metal;
        for _ in 0..4 {
            cur = cur.generates();
            assert!(!seen.contains(&cur));
            seen.push(cur);
        }
        assert_eq!(cur.generates(), Element::Metal);
        // Same closure property for conquers().
        let mut cur = Element::Metal;
        for _ in 0..5 {
            cur = cur.conquers();
        }
        assert_eq!(cur, Element::Metal);
    }

    #[test]
    fn rounds_have_four_distinct_options_including_correct() {
        let mut rng = rng();
        for _ in 0..50 {
            let round = generate_round(&mut rng);
            assert!(round.options.contains(&round.correct));
            for i in 0..round.options.len() {
                for j in i + 1..round.options.len() {
                    assert_ne!(round.options[i], round.options[j]);
                }
            }
            let expected = match round.kind {
                QuestionKind::Generate => round.element.generates(),
                QuestionKind::Conquer => round.element.conquers(),
            };
            assert_eq!(round.correct, expected);
        }
    }

    #[test]
    fn start_resets_session() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        game.score = 40;
        game.time_left = 3;
        game.start(&mut rng);
        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.score, 0);
        assert_eq!(game.time_left, ROUND_SECONDS);
        assert_eq!(game.round, 1);
        assert!(game.current.is_some());
    }

    #[test]
    fn correct_answer_scores_ten() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        let correct = game.current.as_ref().unwrap().correct;
        assert_eq!(game.answer(correct), Some(true));
        assert_eq!(game.score, POINTS_PER_CORRECT);
        assert_eq!(game.last_correct, Some(true));
        assert!(game.show_result);
    }

    #[test]
    fn wrong_answer_leaves_score_unchanged() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        let round = game.current.as_ref().unwrap();
        let wrong = *round
            .options
            .iter()
            .find(|o| **o != round.correct)
            .unwrap();
        assert_eq!(game.answer(wrong), Some(false));
        assert_eq!(game.score, 0);
        assert_eq!(game.last_correct, Some(false));
    }

    #[test]
    fn second_answer_during_result_is_ignored() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        let correct = game.current.as_ref().unwrap().correct;
        game.answer(correct);
        assert_eq!(game.answer(correct), None);
        assert_eq!(game.score, POINTS_PER_CORRECT, "not scored twice");
    }

    #[test]
    fn advancing_past_last_round_finishes() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        for expected_round in 1..=MAX_ROUNDS {
            assert_eq!(game.round, expected_round);
            assert_eq!(game.status, GameStatus::Playing);
            let correct = game.current.as_ref().unwrap().correct;
            game.answer(correct);
            game.advance(&mut rng);
        }
        assert_eq!(game.status, GameStatus::Finished);
        assert_eq!(game.score, MAX_ROUNDS * POINTS_PER_CORRECT);
        assert_eq!(game.correct_answers(), MAX_ROUNDS);
    }

    #[test]
    fn countdown_forces_finish() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        for _ in 0..ROUND_SECONDS {
            game.tick();
        }
        assert_eq!(game.time_left, 0);
        assert_eq!(game.status, GameStatus::Finished);
        // Ticks after the terminal state change nothing.
        game.tick();
        assert_eq!(game.status, GameStatus::Finished);
    }

    #[test]
    fn menu_reset_clears_everything() {
        let mut rng = rng();
        let mut game = GameSession::new();
        game.start(&mut rng);
        let correct = game.current.as_ref().unwrap().correct;
        game.answer(correct);
        game.return_to_menu();
        assert_eq!(game.status, GameStatus::Menu);
        assert_eq!(game.score, 0);
        assert!(game.current.is_none());
        assert!(game.selected.is_none());
    }
}
