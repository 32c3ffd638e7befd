use crate::board::{Board, PointSet};
use crate::config::Settings;
use crate::flip::play;
use crate::legality::legal_points;
use crate::selector::{GreedySelector, MoveSelector};
use crate::types::{GameResult, Intent, PhaseTag, Player, Point, RuleVariant, Snapshot};

/// Cursor position at the start of a game and after a forced pass.
pub const DEFAULT_CURSOR: Point = Point::new(3, 3);

/// Where the session is, with only the data that phase needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    TitleScreen,
    /// A human is choosing a point.
    AwaitingPlacement { cursor: Point, legal: PointSet },
    /// The computer moves on the next acknowledgment.
    ComputerTurn { legal: PointSet },
    /// A disk was placed; waiting for acknowledgment before handing over.
    PlacementConfirmed { placed: Point, flipped: PointSet },
    /// The current player has no legal point and must pass.
    ForcedPass,
    ConfirmingQuit { resume: Box<GamePhase> },
    GameOver,
}

impl GamePhase {
    pub fn tag(&self) -> PhaseTag {
        match self {
            Self::TitleScreen => PhaseTag::TitleScreen,
            Self::AwaitingPlacement { .. } => PhaseTag::AwaitingPlacement,
            Self::ComputerTurn { .. } => PhaseTag::ComputerTurn,
            Self::PlacementConfirmed { .. } => PhaseTag::PlacementConfirmed,
            Self::ForcedPass => PhaseTag::ForcedPass,
            Self::ConfirmingQuit { .. } => PhaseTag::ConfirmingQuit,
            Self::GameOver => PhaseTag::GameOver,
        }
    }
}

/// Whole session state. Each transition produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    settings: Settings,
    board: Board,
    current: Player,
    phase: GamePhase,
}

/// Result of feeding one intent to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(GameState),
    Exit,
}

impl GameState {
    /// A fresh session sitting on the title screen.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            board: Board::new(settings.variant),
            current: Player::First,
            phase: GamePhase::TitleScreen,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn snapshot(&self) -> Snapshot {
        let score = self.board.score_tally();

        let active = match &self.phase {
            GamePhase::ConfirmingQuit { resume } => resume.as_ref(),
            phase => phase,
        };
        let (selected, legal) = match active {
            GamePhase::AwaitingPlacement { cursor, legal } => (Some(*cursor), *legal),
            GamePhase::ComputerTurn { legal } => (None, *legal),
            _ => (None, PointSet::EMPTY),
        };
        let flipped = match &self.phase {
            GamePhase::PlacementConfirmed { flipped, .. } => *flipped,
            _ => PointSet::EMPTY,
        };
        let result = (self.phase == GamePhase::GameOver).then(|| GameResult {
            winner: score.leader(),
            score,
        });

        Snapshot {
            board: self.board.to_array().to_vec(),
            phase: self.phase.tag(),
            current_player: self.current,
            selected,
            selection_legal: selected.is_some_and(|point| legal.contains(point)),
            legal: legal.to_vec(),
            flipped: flipped.to_vec(),
            score,
            variant: self.settings.variant,
            mode: self.settings.mode,
            result,
        }
    }

    fn with_phase(mut self, phase: GamePhase) -> Self {
        self.phase = phase;
        self
    }

    /// Hands the move to `self.current` with a freshly computed legal set.
    fn begin_turn(self, cursor: Point) -> Self {
        let legal = legal_points(&self.board, self.current, self.settings.variant);
        let phase = if self.settings.is_computer(self.current) {
            GamePhase::ComputerTurn { legal }
        } else {
            GamePhase::AwaitingPlacement { cursor, legal }
        };
        self.with_phase(phase)
    }

    fn start_game(settings: Settings) -> Self {
        tracing::debug!(?settings, "starting game");
        Self::new(settings).begin_turn(DEFAULT_CURSOR)
    }

    fn place(mut self, point: Point) -> Self {
        let flipped = play(&mut self.board, point, self.current);
        tracing::debug!(
            player = ?self.current,
            ?point,
            flipped = flipped.len(),
            "disk placed"
        );
        self.with_phase(GamePhase::PlacementConfirmed {
            placed: point,
            flipped,
        })
    }

    fn hand_over(mut self, placed: Point) -> Self {
        let mover = self.current;
        let next = mover.opponent();
        let variant = self.settings.variant;
        let next_stuck = legal_points(&self.board, next, variant).is_empty();
        let mover_stuck = legal_points(&self.board, mover, variant).is_empty();

        self.current = next;
        match (next_stuck, mover_stuck, variant) {
            (false, _, _) => self.begin_turn(placed),
            (true, true, _) | (true, false, RuleVariant::Historical) => {
                let score = self.board.score_tally();
                tracing::info!(first = score.first, second = score.second, "game over");
                self.with_phase(GamePhase::GameOver)
            }
            (true, false, RuleVariant::Modern) => {
                tracing::debug!(player = ?next, "forced pass");
                self.with_phase(GamePhase::ForcedPass)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        settings: Settings,
        board: Board,
        current: Player,
        phase: GamePhase,
    ) -> Self {
        Self {
            settings,
            board,
            current,
            phase,
        }
    }
}

/// Applies one intent. Never mutates `state`.
pub fn transition(state: &GameState, intent: Intent, selector: &dyn MoveSelector) -> Step {
    let next = state.clone();

    let next = match (&state.phase, intent) {
        (GamePhase::TitleScreen, Intent::ToggleRuleVariant) => {
            let mut settings = state.settings;
            settings.variant = settings.variant.toggled();
            GameState::new(settings)
        }
        (GamePhase::TitleScreen, Intent::TogglePlayerMode) => {
            let mut settings = state.settings;
            settings.mode = settings.mode.toggled();
            GameState::new(settings)
        }
        (GamePhase::TitleScreen, _) => GameState::start_game(state.settings),

        (GamePhase::AwaitingPlacement { cursor, legal }, intent) => match intent {
            Intent::Move(direction) => next.with_phase(GamePhase::AwaitingPlacement {
                cursor: cursor.step(direction),
                legal: *legal,
            }),
            Intent::Select if legal.contains(*cursor) => next.place(*cursor),
            Intent::Quit => next.with_phase(GamePhase::ConfirmingQuit {
                resume: Box::new(state.phase.clone()),
            }),
            _ => next,
        },

        (GamePhase::ComputerTurn { legal }, intent) => match intent {
            Intent::Acknowledge | Intent::Select => {
                match selector.select_point(&state.board, state.current, *legal) {
                    Some(point) if legal.contains(point) => next.place(point),
                    chosen => {
                        tracing::warn!(?chosen, "selector returned no legal point");
                        next
                    }
                }
            }
            Intent::Quit => next.with_phase(GamePhase::ConfirmingQuit {
                resume: Box::new(state.phase.clone()),
            }),
            _ => next,
        },

        (GamePhase::PlacementConfirmed { placed, .. }, Intent::Acknowledge) => {
            next.hand_over(*placed)
        }
        (GamePhase::PlacementConfirmed { .. }, _) => next,

        (GamePhase::ForcedPass, Intent::Acknowledge) => {
            let mut next = next;
            next.current = next.current.opponent();
            next.begin_turn(DEFAULT_CURSOR)
        }
        (GamePhase::ForcedPass, _) => next,

        (GamePhase::ConfirmingQuit { .. }, Intent::Acknowledge) => return Step::Exit,
        (GamePhase::ConfirmingQuit { resume }, _) => next.with_phase(resume.as_ref().clone()),

        (GamePhase::GameOver, Intent::Acknowledge) => GameState::new(state.settings),
        (GamePhase::GameOver, _) => return Step::Exit,
    };

    if next.phase.tag() != state.phase.tag() {
        tracing::debug!(
            from = ?state.phase.tag(),
            to = ?next.phase.tag(),
            player = ?next.current,
            "phase changed"
        );
    }
    Step::Continue(next)
}

/// Whether the session is still alive after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated,
}

/// Owns the single mutable state slot and the computer's selector.
pub struct Session {
    state: GameState,
    selector: Box<dyn MoveSelector>,
    terminated: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_selector(settings, Box::new(GreedySelector))
    }

    pub fn with_selector(settings: Settings, selector: Box<dyn MoveSelector>) -> Self {
        Self {
            state: GameState::new(settings),
            selector,
            terminated: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Feeds one intent. After termination every intent is ignored.
    pub fn dispatch(&mut self, intent: Intent) -> Status {
        if self.terminated {
            return Status::Terminated;
        }

        match transition(&self.state, intent, self.selector.as_ref()) {
            Step::Continue(next) => {
                self.state = next;
                Status::Running
            }
            Step::Exit => {
                self.terminated = true;
                Status::Terminated
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, PlayerMode, Score};

    struct FixedSelector {
        point: Point,
    }

    impl MoveSelector for FixedSelector {
        fn select_point(&self, _board: &Board, _player: Player, _legal: PointSet) -> Option<Point> {
            Some(self.point)
        }
    }

    fn p(col: u8, row: u8) -> Point {
        Point::new(col, row)
    }

    fn mask(points: &[(u8, u8)]) -> u64 {
        points
            .iter()
            .fold(0, |acc, &(c, r)| acc | (1u64 << p(c, r).index()))
    }

    fn settings(variant: RuleVariant, mode: PlayerMode) -> Settings {
        Settings {
            variant,
            mode,
            computer_player: Player::Second,
        }
    }

    fn started(settings: Settings) -> Session {
        let mut session = Session::new(settings);
        assert_eq!(session.dispatch(Intent::Acknowledge), Status::Running);
        session
    }

    fn step(state: &GameState, intent: Intent) -> GameState {
        match transition(state, intent, &GreedySelector) {
            Step::Continue(next) => next,
            Step::Exit => panic!("unexpected exit on {intent:?}"),
        }
    }

    /// Only first can move, at (3,0). Four disks, so past the historical opening.
    fn second_stuck_board() -> Board {
        Board::from_bitboards(mask(&[(0, 0), (1, 0), (7, 7)]), mask(&[(2, 0)]))
    }

    #[test]
    fn title_toggles_settings_without_starting() {
        let mut session = Session::new(Settings::default());

        session.dispatch(Intent::ToggleRuleVariant);
        session.dispatch(Intent::TogglePlayerMode);
        let snap = session.snapshot();

        assert_eq!(snap.phase, PhaseTag::TitleScreen);
        assert_eq!(snap.variant, RuleVariant::Historical);
        assert_eq!(snap.mode, PlayerMode::VersusComputer);
        assert_eq!(snap.score.total(), 0);
    }

    #[test]
    fn any_other_intent_starts_game_for_first_player() {
        let session = started(Settings::default());
        let snap = session.snapshot();

        assert_eq!(snap.phase, PhaseTag::AwaitingPlacement);
        assert_eq!(snap.current_player, Player::First);
        assert_eq!(snap.selected, Some(DEFAULT_CURSOR));
        assert_eq!(snap.legal, vec![p(3, 2), p(2, 3), p(5, 4), p(4, 5)]);
        assert!(!snap.selection_legal);
    }

    #[test]
    fn opening_placement_flips_and_confirms() {
        let mut session = started(Settings::default());

        session.dispatch(Intent::Move(Direction::Left));
        assert!(session.snapshot().selection_legal);
        session.dispatch(Intent::Select);
        let snap = session.snapshot();

        assert_eq!(snap.phase, PhaseTag::PlacementConfirmed);
        assert_eq!(snap.flipped, vec![p(3, 3)]);
        assert_eq!(snap.score, Score { first: 4, second: 1 });
        assert_eq!(snap.current_player, Player::First);
    }

    #[test]
    fn illegal_select_is_a_no_op() {
        let mut session = started(Settings::default());
        let before = session.state().clone();

        session.dispatch(Intent::Select);

        assert_eq!(session.state(), &before);
    }

    #[test]
    fn acknowledge_hands_over_with_fresh_legal_set() {
        let mut session = started(Settings::default());
        session.dispatch(Intent::Move(Direction::Left));
        session.dispatch(Intent::Select);
        session.dispatch(Intent::Acknowledge);
        let snap = session.snapshot();

        assert_eq!(snap.phase, PhaseTag::AwaitingPlacement);
        assert_eq!(snap.current_player, Player::Second);
        assert_eq!(snap.selected, Some(p(2, 3)));
        assert_eq!(snap.legal, vec![p(2, 2), p(4, 2), p(2, 4)]);
        assert!(snap.flipped.is_empty());
    }

    #[test]
    fn placement_confirmation_ignores_other_intents() {
        let mut session = started(Settings::default());
        session.dispatch(Intent::Move(Direction::Left));
        session.dispatch(Intent::Select);
        let before = session.state().clone();

        session.dispatch(Intent::Select);
        session.dispatch(Intent::Move(Direction::Up));

        assert_eq!(session.state(), &before);
    }

    #[test]
    fn computer_turn_uses_selector_after_acknowledgment() {
        let mut session = started(settings(RuleVariant::Modern, PlayerMode::VersusComputer));
        session.dispatch(Intent::Move(Direction::Left));
        session.dispatch(Intent::Select);
        session.dispatch(Intent::Acknowledge);
        assert_eq!(session.snapshot().phase, PhaseTag::ComputerTurn);
        assert_eq!(session.snapshot().selected, None);

        session.dispatch(Intent::Acknowledge);

        // All three replies flip one disk; (2,2) is first row-major.
        match session.state().phase() {
            GamePhase::PlacementConfirmed { placed, flipped } => {
                assert_eq!(*placed, p(2, 2));
                assert_eq!(flipped.to_vec(), vec![p(3, 3)]);
            }
            other => panic!("expected confirmation, got {other:?}"),
        }
        assert_eq!(session.snapshot().current_player, Player::Second);
    }

    fn computer_to_move() -> Session {
        let mut session = started(settings(RuleVariant::Modern, PlayerMode::VersusComputer));
        session.dispatch(Intent::Move(Direction::Left));
        session.dispatch(Intent::Select);
        session.dispatch(Intent::Acknowledge);
        assert_eq!(session.snapshot().phase, PhaseTag::ComputerTurn);
        session
    }

    #[test]
    fn quit_from_computer_turn_cancels_back_to_it() {
        let mut session = computer_to_move();
        let before = session.state().clone();

        session.dispatch(Intent::Quit);
        let snap = session.snapshot();
        assert_eq!(snap.phase, PhaseTag::ConfirmingQuit);
        assert_eq!(snap.selected, None);
        assert_eq!(snap.legal, vec![p(2, 2), p(4, 2), p(2, 4)]);

        session.dispatch(Intent::Move(Direction::Up));
        assert_eq!(session.state(), &before);
        assert_eq!(session.snapshot().phase, PhaseTag::ComputerTurn);
    }

    #[test]
    fn quit_from_computer_turn_can_terminate() {
        let mut session = computer_to_move();

        session.dispatch(Intent::Quit);

        assert_eq!(session.dispatch(Intent::Acknowledge), Status::Terminated);
    }

    #[test]
    fn select_also_triggers_computer_move() {
        let mut session = computer_to_move();

        session.dispatch(Intent::Select);

        assert_eq!(
            session.state().phase(),
            &GamePhase::PlacementConfirmed {
                placed: p(2, 2),
                flipped: [p(3, 3)].into_iter().collect(),
            }
        );
    }

    #[test]
    fn computer_turn_ignores_cursor_moves() {
        let mut session = computer_to_move();
        let before = session.state().clone();

        session.dispatch(Intent::Move(Direction::Right));
        session.dispatch(Intent::TogglePlayerMode);

        assert_eq!(session.state(), &before);
    }

    #[test]
    fn computer_move_outside_legal_set_is_rejected() {
        let mut session = Session::with_selector(
            settings(RuleVariant::Modern, PlayerMode::VersusComputer),
            Box::new(FixedSelector { point: p(0, 0) }),
        );
        session.dispatch(Intent::Acknowledge);
        session.dispatch(Intent::Move(Direction::Left));
        session.dispatch(Intent::Select);
        session.dispatch(Intent::Acknowledge);
        let before = session.state().clone();

        session.dispatch(Intent::Acknowledge);

        assert_eq!(session.state(), &before);
    }

    #[test]
    fn computer_can_open_as_first_player() {
        let config = Settings {
            computer_player: Player::First,
            ..settings(RuleVariant::Modern, PlayerMode::VersusComputer)
        };
        let session = started(config);

        assert_eq!(session.snapshot().phase, PhaseTag::ComputerTurn);
    }

    #[test]
    fn modern_forced_pass_returns_turn_to_mover() {
        let board = second_stuck_board();
        let state = GameState::from_parts(
            Settings::default(),
            board,
            Player::First,
            GamePhase::PlacementConfirmed {
                placed: p(1, 0),
                flipped: PointSet::EMPTY,
            },
        );

        let passed = step(&state, Intent::Acknowledge);
        assert_eq!(passed.phase(), &GamePhase::ForcedPass);
        assert_eq!(passed.current_player(), Player::Second);
        assert_eq!(passed.snapshot().selected, None);

        let resumed = step(&passed, Intent::Acknowledge);
        assert_eq!(resumed.current_player(), Player::First);
        assert_eq!(resumed.board(), &board);
        assert_eq!(
            resumed.phase(),
            &GamePhase::AwaitingPlacement {
                cursor: DEFAULT_CURSOR,
                legal: [p(3, 0)].into_iter().collect(),
            }
        );
    }

    #[test]
    fn forced_pass_waits_for_acknowledgment() {
        let state = GameState::from_parts(
            Settings::default(),
            second_stuck_board(),
            Player::Second,
            GamePhase::ForcedPass,
        );

        assert_eq!(step(&state, Intent::Select), state);
    }

    #[test]
    fn historical_variant_ends_instead_of_passing() {
        let state = GameState::from_parts(
            settings(RuleVariant::Historical, PlayerMode::TwoPlayer),
            second_stuck_board(),
            Player::First,
            GamePhase::PlacementConfirmed {
                placed: p(1, 0),
                flipped: PointSet::EMPTY,
            },
        );

        let next = step(&state, Intent::Acknowledge);

        assert_eq!(next.phase(), &GamePhase::GameOver);
    }

    #[test]
    fn both_players_stuck_ends_game_in_either_variant() {
        for variant in [RuleVariant::Modern, RuleVariant::Historical] {
            let state = GameState::from_parts(
                settings(variant, PlayerMode::TwoPlayer),
                Board::from_bitboards(mask(&[(0, 0), (1, 0), (2, 0), (3, 0)]), 0),
                Player::First,
                GamePhase::PlacementConfirmed {
                    placed: p(1, 0),
                    flipped: PointSet::EMPTY,
                },
            );

            let next = step(&state, Intent::Acknowledge);
            let snap = next.snapshot();

            assert_eq!(next.phase(), &GamePhase::GameOver);
            assert_eq!(
                snap.result,
                Some(GameResult {
                    winner: Some(Player::First),
                    score: Score { first: 4, second: 0 },
                })
            );
        }
    }

    #[test]
    fn quit_confirmation_cancels_back_to_same_state() {
        let mut session = started(Settings::default());
        session.dispatch(Intent::Move(Direction::Down));
        let before = session.state().clone();

        session.dispatch(Intent::Quit);
        assert_eq!(session.snapshot().phase, PhaseTag::ConfirmingQuit);
        assert_eq!(session.snapshot().selected, Some(p(3, 4)));
        session.dispatch(Intent::Move(Direction::Up));

        assert_eq!(session.state(), &before);
    }

    #[test]
    fn quit_confirmation_acknowledged_terminates() {
        let mut session = started(Settings::default());

        session.dispatch(Intent::Quit);
        assert_eq!(session.dispatch(Intent::Acknowledge), Status::Terminated);
        assert!(session.is_terminated());
        assert_eq!(session.dispatch(Intent::Select), Status::Terminated);
    }

    #[test]
    fn game_over_acknowledge_restarts_with_same_settings() {
        let config = settings(RuleVariant::Historical, PlayerMode::VersusComputer);
        let state = GameState::from_parts(
            config,
            Board::from_bitboards(u64::MAX, 0),
            Player::Second,
            GamePhase::GameOver,
        );

        let next = step(&state, Intent::Acknowledge);

        assert_eq!(next, GameState::new(config));
        assert_eq!(next.board().disk_count(), 0);
    }

    #[test]
    fn game_over_other_intent_exits() {
        let state = GameState::from_parts(
            Settings::default(),
            Board::from_bitboards(u64::MAX, 0),
            Player::Second,
            GamePhase::GameOver,
        );

        assert_eq!(
            transition(&state, Intent::Quit, &GreedySelector),
            Step::Exit
        );
    }

    #[test]
    fn historical_opening_fills_centre_without_flips() {
        let mut session = started(settings(RuleVariant::Historical, PlayerMode::TwoPlayer));
        assert_eq!(
            session.snapshot().legal,
            vec![p(3, 3), p(4, 3), p(3, 4), p(4, 4)]
        );

        let route = [
            (None, Player::First),
            (Some(Direction::Right), Player::Second),
            (Some(Direction::Down), Player::First),
            (Some(Direction::Left), Player::Second),
        ];
        for (movement, player) in route {
            if let Some(direction) = movement {
                session.dispatch(Intent::Move(direction));
            }
            assert_eq!(session.snapshot().current_player, player);
            session.dispatch(Intent::Select);
            assert!(session.snapshot().flipped.is_empty());
            session.dispatch(Intent::Acknowledge);
        }

        let snap = session.snapshot();
        assert_eq!(snap.score, Score { first: 2, second: 2 });
        assert_eq!(snap.phase, PhaseTag::AwaitingPlacement);
        assert_eq!(snap.current_player, Player::First);
        assert_eq!(snap.legal.len(), 4);
    }
}
