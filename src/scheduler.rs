use cozy_chess::Square;
use log::{debug, info, warn};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::board::{LegalMove, MoveRequest};
use crate::config::SessionConfig;
use crate::error::{MoveError, PositionError};
use crate::session::{ClickOutcome, OpponentOutcome, Session};

pub type SharedSession = Arc<Mutex<Session>>;

fn lock(shared: &SharedSession) -> MutexGuard<'_, Session> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Interruptible cancellation flag shared by every task spawned for one session.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) {
        let (flag, cv) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner()) = true;
        cv.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleeps for `dur` unless cancelled first. Returns true when cancelled.
    pub fn wait(&self, dur: Duration) -> bool {
        let (flag, cv) = &*self.inner;
        let deadline = Instant::now() + dur;
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline { break; }
            let (g, _) = cv.wait_timeout(cancelled, deadline - now).unwrap_or_else(|e| e.into_inner());
            cancelled = g;
        }
        *cancelled
    }
}

/// Runs the opponent's reply as a delayed background task.
pub struct OpponentScheduler {
    token: CancelToken,
    task: Option<(JoinHandle<OpponentOutcome>, SharedSession)>,
}

impl Default for OpponentScheduler {
    fn default() -> Self { Self::new() }
}

impl OpponentScheduler {
    pub fn new() -> Self { Self { token: CancelToken::new(), task: None } }

    /// Spawns the reply. The task re-reads the session when it wakes, so it
    /// always plays on the latest position, and it bails out if the token was
    /// cancelled or the session was reset in the meantime.
    pub fn schedule(&mut self, shared: &SharedSession, delay: Duration) {
        // Player input stays closed until a reply lands, so any previous task is done.
        if let Some((prev, prev_shared)) = self.task.take() { settle(prev, &prev_shared); }
        let generation = {
            let mut s = lock(shared);
            s.mark_pending();
            s.generation()
        };
        let task_shared = Arc::clone(shared);
        let token = self.token.clone();
        debug!("opponent scheduled in {}ms", delay.as_millis());
        let handle = thread::spawn(move || {
            if token.wait(delay) { return OpponentOutcome::Cancelled; }
            let mut s = lock(&task_shared);
            if token.is_cancelled() || s.generation() != generation {
                return OpponentOutcome::Cancelled;
            }
            s.opponent_move()
        });
        self.task = Some((handle, Arc::clone(shared)));
    }

    /// Blocks until the scheduled reply (if any) finishes.
    pub fn join(&mut self) -> Option<OpponentOutcome> {
        let (handle, shared) = self.task.take()?;
        settle(handle, &shared)
    }

    /// Cancels outstanding work and arms a fresh token for later tasks.
    pub fn cancel(&mut self) {
        self.token.cancel();
        if let Some((handle, shared)) = self.task.take() { settle(handle, &shared); }
        self.token = CancelToken::new();
    }
}

/// Joins a reply task. A task that panicked left the session pending, so the
/// flag is cleared here to reopen player input.
fn settle(handle: JoinHandle<OpponentOutcome>, shared: &SharedSession) -> Option<OpponentOutcome> {
    match handle.join() {
        Ok(outcome) => Some(outcome),
        Err(_) => {
            warn!("opponent task panicked; reopening player input");
            lock(shared).clear_pending();
            None
        }
    }
}

/// Owner of a shared session. Dropping it cancels a pending opponent move so
/// a discarded game is never mutated.
pub struct SessionHandle {
    shared: SharedSession,
    scheduler: OpponentScheduler,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self { shared: Arc::new(Mutex::new(session)), scheduler: OpponentScheduler::new() }
    }

    pub fn from_config(cfg: &SessionConfig) -> Result<Self, PositionError> {
        Ok(Self::new(Session::new(cfg)?))
    }

    pub fn shared(&self) -> &SharedSession { &self.shared }

    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = lock(&self.shared);
        f(&*guard)
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = lock(&self.shared);
        f(&mut *guard)
    }

    fn delay(&self) -> Duration { self.with(|s| s.delay()) }

    /// Drag-drop style input: `on_interact(origin, destination)`.
    pub fn player_move(&mut self, req: MoveRequest) -> Result<LegalMove, MoveError> {
        let lm = self.with_mut(|s| s.player_move(req))?;
        let delay = self.delay();
        self.scheduler.schedule(&self.shared, delay);
        Ok(lm)
    }

    pub fn on_interact(&mut self, from: Square, to: Square) -> Result<LegalMove, MoveError> {
        self.player_move(MoveRequest::new(from, to))
    }

    pub fn click(&mut self, sq: Square) -> ClickOutcome {
        let outcome = self.with_mut(|s| s.click(sq));
        if let ClickOutcome::Moved(_) = outcome {
            let delay = self.delay();
            self.scheduler.schedule(&self.shared, delay);
        }
        outcome
    }

    /// Schedules the opponent when it is its turn, e.g. a player on black at move one.
    pub fn kick_opponent(&mut self) -> bool {
        if !self.with(|s| s.needs_opponent()) { return false; }
        let delay = self.delay();
        self.scheduler.schedule(&self.shared, delay);
        true
    }

    pub fn wait_opponent(&mut self) -> Option<OpponentOutcome> { self.scheduler.join() }

    pub fn new_game(&mut self, fen: Option<&str>) -> Result<(), PositionError> {
        self.scheduler.cancel();
        self.with_mut(|s| s.reset(fen))
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.with(|s| s.is_pending()) { info!("session closed with opponent move pending; cancelling"); }
        self.scheduler.cancel();
    }
}
