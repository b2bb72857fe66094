use std::{collections::VecDeque, time::Duration};

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{Board, EngineError, InvalidTransform, Piece, PieceKind, RotationDirection};

use super::{
    action::{Action, SessionEvent},
    config::EngineConfig,
    ghost,
    hold::HoldSlot,
    line_clear,
    lock_delay::{GroundCheck, LockDelay, LockStatus},
    piece_queue::{PieceGenerator, PieceQueue, SevenBag},
    snapshot::{BoardView, SessionSnapshot},
    timer::IntervalTimer,
    validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Work item in the session's command queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Action(Action),
    /// Gravity timer expired.
    Gravity,
    /// Lock countdown expired.
    LockTimeout,
}

/// A running game: the single owner of the board, the active piece, the queue
/// and the hold slot.
///
/// Player actions and timer expiries go through one FIFO command queue and are
/// executed strictly in order, so nothing mutates the game behind the caller's
/// back. [`Self::push_action`] only enqueues; [`Self::apply_action`] enqueues
/// and runs the queue; [`Self::tick`] runs the queue, advances the timers and
/// runs the timer commands they produced.
///
/// The `try_*`, [`Self::hold`] and [`Self::hard_drop`] methods act immediately
/// and report their outcome. They are what the command queue executes.
///
/// The active piece is never written into the board until it locks.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{
///     Action, EngineConfig, GameSession, PieceKind, ScriptedGenerator, SessionEvent,
/// };
///
/// let generator = ScriptedGenerator::cycling(vec![PieceKind::I]);
/// let mut session = GameSession::with_generator(EngineConfig::default(), Box::new(generator))
///     .unwrap();
///
/// session.push_action(Action::HardDrop);
/// session.tick(Duration::from_millis(16)).unwrap();
///
/// let events = session.drain_events();
/// assert!(matches!(events[0], SessionEvent::Spawned { .. }));
/// assert!(matches!(events[1], SessionEvent::Locked { .. }));
/// ```
#[derive(Debug)]
pub struct GameSession {
    config: EngineConfig,
    board: Board,
    active: Option<Piece>,
    queue: PieceQueue,
    hold: HoldSlot,
    lock: LockDelay,
    gravity: IntervalTimer,
    state: SessionState,
    commands: VecDeque<Command>,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Starts a session fed by a 7-bag randomizer.
    ///
    /// Uses `config.seed` when present, otherwise a random seed.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("7-bag seed: {seed}");
        Self::with_generator(config, Box::new(SevenBag::with_seed(seed)))
    }

    /// Starts a session fed by the given piece generator.
    pub fn with_generator(
        config: EngineConfig,
        generator: Box<dyn PieceGenerator>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::with_reserved_rows(
            config.board_width,
            config.board_height,
            config.reserved_rows,
        );
        let queue = PieceQueue::new(generator, config.min_lookahead)?;
        let mut session = Self {
            board,
            active: None,
            queue,
            hold: HoldSlot::new(),
            lock: LockDelay::new(config.lock_delay(), config.lock_reset_limit),
            gravity: IntervalTimer::new(config.gravity_interval()),
            state: SessionState::Playing,
            commands: VecDeque::new(),
            events: Vec::new(),
            config,
        };
        session.spawn_next()?;
        Ok(session)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Locked cells only; the active piece is not part of the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<Piece> {
        self.active
    }

    /// Where the active piece would land if hard-dropped.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        self.active.map(|piece| ghost::project(&self.board, &piece))
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.hold.held()
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.hold.can_hold()
    }

    #[must_use]
    pub fn lock_status(&self) -> LockStatus {
        self.lock.status()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.upcoming()
    }

    /// Number of commands waiting to be executed.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Takes every event reported since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enqueues an action without executing it.
    pub fn push_action(&mut self, action: Action) {
        self.commands.push_back(Command::Action(action));
    }

    /// Enqueues an action and runs the command queue.
    ///
    /// Rejected moves and rotations are not errors; only a failing piece
    /// generator is.
    pub fn apply_action(&mut self, action: Action) -> Result<(), EngineError> {
        self.push_action(action);
        self.run_commands()
    }

    /// Advances the session clock by `elapsed`.
    ///
    /// Queued actions run first. Then time advances from one timer expiry to
    /// the next, and each expiry runs before the clock moves on. The result
    /// does not depend on how time is split across calls. Nothing advances
    /// while paused or after game over.
    pub fn tick(&mut self, elapsed: Duration) -> Result<(), EngineError> {
        self.run_commands()?;
        if !self.state.is_playing() {
            return Ok(());
        }
        if self.active.is_none() {
            // An earlier spawn failed on an exhausted generator.
            self.spawn_next()?;
        }

        let mut remaining = elapsed;
        while self.state.is_playing() && self.active.is_some() {
            // Gravity cannot move a grounded piece, and nothing can lift it
            // before the next player action, so only the lock countdown
            // matters until then.
            let grounded = self.lock.status().is_grounded();
            let mut step = remaining;
            if let Some(lock_left) = self.lock.remaining() {
                step = step.min(lock_left);
            }
            if !grounded && let Some(gravity_left) = self.gravity.until_next() {
                step = step.min(gravity_left);
            }
            remaining -= step;

            let fell = self.gravity.advance(step) > 0;
            if fell && !grounded {
                self.commands.push_back(Command::Gravity);
            }
            if self.lock.advance(step) {
                self.commands.push_back(Command::LockTimeout);
            }
            if self.commands.is_empty() {
                break;
            }
            self.run_commands()?;
        }
        Ok(())
    }

    /// Renders the current frame.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let ghost = self.ghost_piece();
        let next_pieces = self
            .queue
            .upcoming()
            .take(self.config.next_preview_len())
            .collect::<Vec<_>>();
        SessionSnapshot {
            state: self.state,
            main: BoardView::main(&self.board, self.active.as_ref(), ghost.as_ref()),
            hold: BoardView::preview(self.config.hold_board, self.hold.held()),
            next: BoardView::preview(self.config.next_board, next_pieces.iter().copied()),
            active: self.active,
            ghost,
            held: self.hold.held(),
            can_hold: self.hold.can_hold(),
            next_pieces,
        }
    }

    fn run_commands(&mut self) -> Result<(), EngineError> {
        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::Action(action) => self.perform(action)?,
                Command::Gravity => self.apply_gravity(),
                Command::LockTimeout => self.lock_timeout()?,
            }
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) -> Result<(), EngineError> {
        let transformed = match action {
            Action::MoveLeft => self.try_move_left(),
            Action::MoveRight => self.try_move_right(),
            Action::SoftDrop => self.try_soft_drop(),
            Action::RotateCw => self.try_rotate(RotationDirection::Clockwise),
            Action::RotateCcw => self.try_rotate(RotationDirection::CounterClockwise),
            Action::Rotate180 => self.try_rotate(RotationDirection::Half),
            Action::Hold => return self.hold().map(|_| ()),
            Action::HardDrop => return self.hard_drop(),
            Action::Pause => {
                self.toggle_pause();
                return Ok(());
            }
            Action::Reset => return self.reset(),
        };
        if transformed.is_err() {
            log::trace!("{action} rejected");
        }
        Ok(())
    }

    /// The active piece, if it may currently be manipulated.
    fn controllable(&self) -> Option<Piece> {
        self.active.filter(|_| self.state.is_playing())
    }

    fn set_active(&mut self, piece: Piece, cause: GroundCheck) {
        self.active = Some(piece);
        let grounded = validator::is_grounded(&self.board, &piece);
        self.lock.reevaluate(grounded, cause);
    }

    fn try_translate(&mut self, dx: i32, dy: i32) -> Result<(), InvalidTransform> {
        let piece = self.controllable().ok_or(InvalidTransform)?;
        let moved = validator::try_move(&self.board, &piece, dx, dy)?;
        self.set_active(moved, GroundCheck::Transform);
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), InvalidTransform> {
        self.try_translate(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), InvalidTransform> {
        self.try_translate(1, 0)
    }

    /// Moves the active piece down one row. Fails when it is grounded; it
    /// never locks.
    pub fn try_soft_drop(&mut self) -> Result<(), InvalidTransform> {
        self.try_translate(0, 1)
    }

    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), InvalidTransform> {
        let piece = self.controllable().ok_or(InvalidTransform)?;
        let rotated = validator::try_rotate(&self.board, &piece, direction)?;
        if rotated.kick_index > 0 {
            log::debug!(
                "{piece} rotated {direction:?} with kick #{} to {}",
                rotated.kick_index,
                rotated.piece
            );
        }
        self.set_active(rotated.piece, GroundCheck::Transform);
        Ok(())
    }

    /// Swaps the active piece with the hold slot.
    ///
    /// Returns `Ok(false)` without changing anything when the slot was already
    /// used for this piece or no piece is in play. The incoming piece spawns at
    /// the spawn position in spawn rotation.
    pub fn hold(&mut self) -> Result<bool, EngineError> {
        let Some(active) = self.controllable() else {
            return Ok(false);
        };
        if !self.hold.can_hold() {
            log::trace!("hold already used for this piece");
            return Ok(false);
        }
        // Take from the queue before touching the slot so an underflow leaves
        // the hold state as it was.
        let incoming = match self.hold.held() {
            Some(kind) => kind,
            None => self.queue.consume()?,
        };
        self.hold.swap(active.kind());
        log::debug!("held {:?}, bringing in {incoming:?}", active.kind());
        self.events.push(SessionEvent::Held {
            held: active.kind(),
            spawned: incoming,
        });
        self.spawn(incoming);
        Ok(true)
    }

    /// Drops the active piece to its resting place and locks it at once.
    pub fn hard_drop(&mut self) -> Result<(), EngineError> {
        let Some(piece) = self.controllable() else {
            return Ok(());
        };
        self.active = Some(ghost::project(&self.board, &piece));
        self.lock.force_lock();
        self.commit_lock()
    }

    /// Switches between playing and paused. Has no effect after game over.
    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Playing => {
                log::info!("session paused");
                self.state = SessionState::Paused;
                self.events.push(SessionEvent::Paused);
            }
            SessionState::Paused => {
                log::info!("session resumed");
                self.state = SessionState::Playing;
                self.events.push(SessionEvent::Resumed);
            }
            SessionState::GameOver => {}
        }
    }

    /// Starts a new game: empty board and hold slot, fresh queue, new piece.
    ///
    /// Commands queued behind the reset still run afterwards.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        log::info!("session reset");
        self.board.clear();
        self.hold.clear();
        self.active = None;
        self.lock.reset();
        self.gravity.restart();
        self.state = SessionState::Playing;
        self.events.push(SessionEvent::Reset);
        self.queue.reset()?;
        self.spawn_next()
    }

    fn apply_gravity(&mut self) {
        let Some(piece) = self.controllable() else {
            return;
        };
        if let Ok(moved) = validator::try_move(&self.board, &piece, 0, 1) {
            self.set_active(moved, GroundCheck::Gravity);
        }
    }

    fn lock_timeout(&mut self) -> Result<(), EngineError> {
        if self.controllable().is_none() || !self.lock.is_expired() {
            return Ok(());
        }
        log::debug!("lock delay expired");
        self.lock.force_lock();
        self.commit_lock()
    }

    /// Merges the active piece into the board, clears full rows, re-arms the
    /// hold slot and brings in the next piece.
    fn commit_lock(&mut self) -> Result<(), EngineError> {
        let Some(piece) = self.active.take() else {
            return Ok(());
        };
        self.board.fill_piece(&piece)?;
        log::debug!("locked {piece}");
        self.events.push(SessionEvent::Locked { piece });

        let rows = line_clear::clear_full_rows(&mut self.board);
        if !rows.is_empty() {
            log::info!("cleared {} line(s): {rows:?}", rows.len());
            self.events.push(SessionEvent::LinesCleared { rows });
        }

        self.hold.unlock();
        self.spawn_next()
    }

    fn spawn_next(&mut self) -> Result<(), EngineError> {
        let kind = self.queue.consume()?;
        self.spawn(kind);
        Ok(())
    }

    /// Puts a fresh piece of `kind` into play, or ends the game if it does not
    /// fit.
    fn spawn(&mut self, kind: PieceKind) {
        let piece = Piece::spawn(kind, self.board.width());
        self.lock.reset();
        self.gravity.restart();
        if validator::collides(&self.board, &piece) {
            log::info!("game over: {kind:?} cannot spawn");
            self.active = None;
            self.state = SessionState::GameOver;
            self.events.push(SessionEvent::GameOver);
            return;
        }
        log::debug!("spawned {piece}");
        self.events.push(SessionEvent::Spawned { piece });
        self.set_active(piece, GroundCheck::Spawn);
    }
}
