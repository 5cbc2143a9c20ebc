//! Lifecycle controller
//!
//! [`Game`] is the single owned game instance a driver holds. It turns
//! activate actions and tick outcomes into phase transitions:
//!
//! - `Start | GameOver` + activate: new run
//! - `Playing` + activate: flap
//! - `Playing` + crash: game over, best score, commentary request
//!
//! Commentary requests are queued for the driver to dispatch; results come
//! back through [`Game::resolve_commentary`] and are dropped if the run they
//! belong to is no longer current.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::commentary::{Commentary, CommentaryError, CommentaryRequest, SessionId, resolve_text};
use crate::highscores::BestScore;
use crate::sim::{Bird, GameEvent, GamePhase, GameState, Obstacle, tick};

/// What an activate action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new run began
    Started(SessionId),
    /// The bird flapped
    Flapped,
}

/// The game: world state plus everything that outlives a single run
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    best: BestScore,
    commentary: Commentary,
    session: SessionId,
    rng: Pcg32,
    /// Request issued at game over, waiting for the driver
    outbox: Option<CommentaryRequest>,
}

impl Game {
    /// Create a game on the start screen
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(),
            best: BestScore::new(),
            commentary: Commentary::default(),
            session: SessionId::default(),
            rng: Pcg32::seed_from_u64(seed),
            outbox: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn bird(&self) -> &Bird {
        &self.state.bird
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.state.obstacles
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.best.best()
    }

    pub fn scores(&self) -> &BestScore {
        &self.best
    }

    pub fn commentary(&self) -> &Commentary {
        &self.commentary
    }

    /// Current run's identifier
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The single input entry point (click, tap, Space)
    pub fn activate(&mut self, now_ms: f64) -> Activation {
        match self.state.phase {
            GamePhase::Playing => {
                self.state.bird.flap();
                Activation::Flapped
            }
            GamePhase::Start | GamePhase::GameOver => {
                self.start(now_ms);
                Activation::Started(self.session)
            }
        }
    }

    fn start(&mut self, now_ms: f64) {
        self.session = self.session.next();
        self.state.reset(now_ms);
        self.commentary.clear();
        // An undispatched request from the last run is no longer wanted
        self.outbox = None;
        log::info!("Run {} started", self.session);
    }

    /// Run one simulation tick. Does nothing unless playing.
    pub fn step(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return Vec::new();
        }

        let outcome = tick(&mut self.state, now_ms, &mut self.rng);
        for event in &outcome.events {
            log::trace!("{:?}", event);
        }
        if let Some(cause) = outcome.crash {
            log::info!("Run {} crashed ({:?})", self.session, cause);
            self.game_over();
        }
        outcome.events
    }

    fn game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        let score = self.state.score;
        if self.best.record(score) {
            log::info!("New best score: {}", score);
        }
        log::info!(
            "Game over: score {} (best {})",
            score,
            self.best.best()
        );

        self.commentary.text.clear();
        self.commentary.pending = true;
        self.outbox = Some(CommentaryRequest {
            session: self.session,
            score,
        });
    }

    /// Take the pending commentary request, if any, for dispatch
    pub fn take_commentary_request(&mut self) -> Option<CommentaryRequest> {
        self.outbox.take()
    }

    /// Apply a finished commentary request.
    ///
    /// Failures become the fallback line. Returns false (and changes nothing)
    /// when the request belongs to an earlier run.
    pub fn resolve_commentary(
        &mut self,
        session: SessionId,
        result: Result<String, CommentaryError>,
    ) -> bool {
        if session != self.session || self.state.phase != GamePhase::GameOver {
            log::info!(
                "Discarding commentary for run {} (current run {})",
                session,
                self.session
            );
            return false;
        }
        self.commentary.text = resolve_text(result);
        self.commentary.pending = false;
        true
    }
}
