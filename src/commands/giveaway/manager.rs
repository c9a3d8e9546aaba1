use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serenity::async_trait;
use serenity::model::id::{MessageId, RoleId, UserId};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::commands::giveaway::eligibility::Eligibility;
use crate::commands::giveaway::models::{
    Decision, GiveawayRecord, GiveawayStatus, JoinReceipt, NewGiveaway, Reroll,
};
use crate::commands::giveaway::strategies::{DrawOptions, DrawStrategy, UniformDrawStrategy};
use crate::error::{Error, GiveawayError, Result};
use crate::scheduler::{CancelHandle, ScheduledTask, Scheduler};

pub const MIN_GIVEAWAY_DURATION: Duration = Duration::from_secs(60);

// Receives decisions made when the countdown runs out, so they can be
// delivered without anybody invoking a command.
#[async_trait]
pub trait DecisionListener: Send + Sync {
    async fn on_decided(&self, decision: &Decision);
}

struct ManagerState {
    // The only giveaway in the OPEN state, if any.
    active: Option<GiveawayRecord>,
    // Countdown of the active giveaway.
    timer: Option<Box<dyn CancelHandle>>,
    // The most recently decided giveaway, kept for rerolls.
    last: Option<Decision>,
    rng: Box<dyn RngCore + Send>,
}

impl ManagerState {
    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

fn is_active(state: &ManagerState, id: Uuid) -> bool {
    state
        .active
        .as_ref()
        .map(|record| record.id() == id)
        .unwrap_or(false)
}

// Owns the giveaway lifecycle. Every operation runs inside one critical
// section, so entries, the draw and the countdown never interleave.
pub struct GiveawayManager {
    state: Mutex<ManagerState>,
    scheduler: Arc<dyn Scheduler>,
    strategy: Arc<dyn DrawStrategy>,
    // Role every entrant must hold, regardless of the giveaway settings.
    entry_role: Option<RoleId>,
    listener: Option<Arc<dyn DecisionListener>>,
}

impl GiveawayManager {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        GiveawayManager {
            state: Mutex::new(ManagerState {
                active: None,
                timer: None,
                last: None,
                rng: Box::new(StdRng::from_entropy()),
            }),
            scheduler,
            strategy: Arc::new(UniformDrawStrategy::new()),
            entry_role: None,
            listener: None,
        }
    }

    pub fn with_entry_role(mut self, role: Option<RoleId>) -> Self {
        self.entry_role = role;
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn DrawStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.rng = Box::new(rng);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn DecisionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    fn state(&self) -> Result<MutexGuard<'_, ManagerState>> {
        Ok(self.state.lock()?)
    }

    // Returns a snapshot of the running giveaway.
    pub fn active(&self) -> Result<Option<GiveawayRecord>> {
        Ok(self.state()?.active.clone())
    }

    // Returns a snapshot of the most recently decided giveaway.
    pub fn last(&self) -> Result<Option<GiveawayRecord>> {
        let state = self.state()?;
        Ok(state.last.as_ref().map(|decision| decision.record.clone()))
    }

    // Returns the most recent decision together with its winners.
    pub fn last_decision(&self) -> Result<Option<Decision>> {
        Ok(self.state()?.last.clone())
    }

    // Opens a new giveaway and arms its countdown. The returned record is not
    // accepting entries until `publish` links the announcement message.
    #[instrument(skip(self, request), fields(prize = %request.prize))]
    pub fn start(self: &Arc<Self>, request: NewGiveaway) -> Result<GiveawayRecord> {
        let mut state = self.state()?;

        if state.active.is_some() {
            let message =
                "A giveaway is already running! End it first with `/giveaway_end`.".to_string();
            return Err(Error::from(GiveawayError::Conflict(message)));
        }

        if request.duration < MIN_GIVEAWAY_DURATION {
            let message = "Duration must be at least 1 minute.".to_string();
            return Err(Error::from(GiveawayError::Validation(message)));
        }

        if request.winner_count < 1 {
            let message = "Winner count must be at least 1.".to_string();
            return Err(Error::from(GiveawayError::Validation(message)));
        }

        let delay = chrono::Duration::from_std(request.duration).map_err(|_| {
            let message = "Duration is too long.".to_string();
            Error::from(GiveawayError::Validation(message))
        })?;
        let end_at = self
            .scheduler
            .now()
            .checked_add_signed(delay)
            .ok_or_else(|| {
                let message = "Duration is too long.".to_string();
                Error::from(GiveawayError::Validation(message))
            })?;

        let duration = request.duration;
        let record = GiveawayRecord::open(request, end_at);
        let timer = self
            .scheduler
            .schedule(duration, self.countdown(record.id()));

        info!(
            "Giveaway {} started by '{}', ends at {}",
            record.id(),
            record.host().get_username(),
            record.end_at()
        );
        state.active = Some(record.clone());
        state.timer = Some(timer);
        Ok(record)
    }

    // The task executed when the countdown of the given giveaway runs out.
    fn countdown(self: &Arc<Self>, id: Uuid) -> ScheduledTask {
        let manager: Weak<Self> = Arc::downgrade(self);
        Box::pin(async move {
            let Some(manager) = manager.upgrade() else {
                return;
            };

            match manager.expire(id) {
                Ok(Some(decision)) => {
                    if let Some(listener) = &manager.listener {
                        listener.on_decided(&decision).await;
                    }
                }
                Ok(None) => debug!("Timer of giveaway {} fired after it was closed", id),
                Err(err) => error!("Can't finish giveaway {} on timer: {}", id, err.to_string()),
            }
        })
    }

    // Links the posted announcement to the giveaway, which opens it for entries.
    #[instrument(skip(self))]
    pub fn publish(&self, id: Uuid, message_id: MessageId) -> Result<GiveawayRecord> {
        let mut state = self.state()?;

        match state.active.as_mut() {
            Some(record) if record.id() == id => {
                record.set_message_id(message_id);
                Ok(record.clone())
            }
            _ => {
                let message = "The giveaway has already finished.".to_string();
                Err(Error::from(GiveawayError::Conflict(message)))
            }
        }
    }

    #[instrument(skip(self, eligibility))]
    pub fn join(&self, user_id: UserId, eligibility: &dyn Eligibility) -> Result<JoinReceipt> {
        let mut state = self.state()?;

        let record = match state.active.as_mut() {
            Some(record) if record.is_published() => record,
            _ => return Err(Error::from(GiveawayError::NoActiveGiveaway)),
        };

        if let Some(role_id) = self.entry_role {
            if !eligibility.has_role(user_id, role_id) {
                return Err(Error::from(GiveawayError::NotVerified));
            }
        }

        if let Some(role_id) = record.required_role() {
            if !eligibility.has_role(user_id, role_id) {
                return Err(Error::from(GiveawayError::IneligibleRole(role_id)));
            }
        }

        if !record.add_participant(user_id) {
            return Err(Error::from(GiveawayError::AlreadyJoined));
        }

        debug!("User {} joined giveaway {}", user_id, record.id());
        Ok(JoinReceipt {
            participants: record.participants_count(),
            record: record.clone(),
        })
    }

    // Finishes the running giveaway ahead of time. Returns None when there
    // is nothing to finish, e.g. the countdown has already done it.
    #[instrument(skip(self))]
    pub fn end(&self) -> Result<Option<Decision>> {
        let mut state = self.state()?;
        state.disarm();
        Ok(self.decide(&mut state))
    }

    // Finishes the giveaway with the given id when its countdown runs out.
    // A stale timer never touches a newer giveaway.
    pub fn expire(&self, id: Uuid) -> Result<Option<Decision>> {
        let mut state = self.state()?;
        if !is_active(&state, id) {
            return Ok(None);
        }

        // Dropping the handle keeps the running timer task alive.
        state.timer.take();
        Ok(self.decide(&mut state))
    }

    fn decide(&self, state: &mut ManagerState) -> Option<Decision> {
        let mut record = state.active.take()?;

        let winners = match record.participants().is_empty() {
            true => Vec::new(),
            false => {
                let options =
                    DrawOptions::new(record.participants(), record.winner_count() as usize);
                self.strategy.draw(&options, state.rng.as_mut())
            }
        };

        record.close(GiveawayStatus::Decided);
        info!(
            "Giveaway {} decided with {} winner(s) out of {} participant(s)",
            record.id(),
            winners.len(),
            record.participants_count()
        );
        let decision = Decision { record, winners };
        state.last = Some(decision.clone());
        Some(decision)
    }

    // Stops the running giveaway without a draw. Cancelled giveaways can't
    // be rerolled, so the previous decision stays available.
    #[instrument(skip(self))]
    pub fn cancel(&self) -> Result<GiveawayRecord> {
        let mut state = self.state()?;
        self.discard(&mut state)
            .ok_or_else(|| Error::from(GiveawayError::NoActiveGiveaway))
    }

    // Cancels the giveaway only if it is still the given one. Used when the
    // announcement could not be posted.
    #[instrument(skip(self))]
    pub fn withdraw(&self, id: Uuid) -> Result<Option<GiveawayRecord>> {
        let mut state = self.state()?;
        match is_active(&state, id) {
            true => Ok(self.discard(&mut state)),
            false => Ok(None),
        }
    }

    fn discard(&self, state: &mut ManagerState) -> Option<GiveawayRecord> {
        let mut record = state.active.take()?;
        state.disarm();
        record.close(GiveawayStatus::Cancelled);

        info!("Giveaway {} was cancelled", record.id());
        Some(record)
    }

    // Draws one more winner from everyone who entered the last decided
    // giveaway. Previous winners stay in the pool and can win again.
    #[instrument(skip(self))]
    pub fn reroll(&self) -> Result<Reroll> {
        let mut state = self.state()?;
        let state = &mut *state;

        let record = state
            .last
            .as_ref()
            .map(|decision| &decision.record)
            .ok_or_else(|| Error::from(GiveawayError::NoPriorGiveaway))?;

        if record.participants().is_empty() {
            return Err(Error::from(GiveawayError::NoParticipants));
        }

        let options = DrawOptions::new(record.participants(), 1);
        let winner = self
            .strategy
            .draw(&options, state.rng.as_mut())
            .into_iter()
            .next()
            .ok_or_else(|| Error::from(GiveawayError::NoParticipants))?;

        info!("Giveaway {} rerolled, new winner {}", record.id(), winner);
        Ok(Reroll {
            record: record.clone(),
            winner,
        })
    }

    // Disarms the countdown when the bot goes down. The giveaway itself is
    // not decided.
    pub fn shutdown(&self) -> Result<()> {
        self.state()?.disarm();
        Ok(())
    }
}
