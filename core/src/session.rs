use alloc::rc::Rc;

use crate::*;

/// Result of driving a wave forward by one scheduled step.
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    /// A generation ran and the next one is scheduled under `ticket`.
    Scheduled {
        ticket: WaveTicket,
        report: GenerationReport,
    },
    /// The wave subsided and the game now has this status.
    Finished(GameStatus),
    /// The ticket belongs to a wave that no longer exists.
    Stale,
}

#[derive(Debug)]
struct InFlight {
    wave: Wave,
    ticket: WaveTicket,
    task: TaskId,
}

/// Owns one game: the snapshot store, the propagation engine, and the
/// scheduler that paces waves. All mutation goes through here.
#[derive(Debug)]
pub struct Session<S: Scheduler> {
    config: GameConfig,
    engine: PropagationEngine,
    store: GridStore,
    scheduler: S,
    epoch: u32,
    in_flight: Option<InFlight>,
}

impl<S: Scheduler> Session<S> {
    pub fn new(config: impl Into<GameConfig>, scheduler: S) -> Self {
        let config = config.into();
        Self {
            engine: PropagationEngine::from_config(&config),
            store: GridStore::new(config.size, config.bombs),
            config,
            scheduler,
            epoch: 0,
            in_flight: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current(&self) -> Rc<GameState> {
        self.store.current()
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Rc<GameState>) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn is_wave_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_ticket(&self) -> Option<WaveTicket> {
        self.in_flight.as_ref().map(|in_flight| in_flight.ticket)
    }

    /// Whether a click on `coords` would be accepted right now.
    pub fn can_place_at(&self, coords: Coord2) -> bool {
        !self.is_wave_in_flight()
            && self
                .engine
                .check_placement(&self.store.current(), coords)
                .is_ok()
    }

    /// Places a bomb and runs the first generation right away. Rejected
    /// placements leave the current snapshot untouched.
    pub fn place_bomb(&mut self, coords: Coord2) -> Result<Progress> {
        if self.in_flight.is_some() {
            log::debug!("placement at {:?} rejected, wave in flight", coords);
            return Err(GameError::WaveInFlight);
        }

        let (armed, wave) = self
            .engine
            .place_bomb(&self.store.current(), coords)
            .inspect_err(|err| log::debug!("placement at {:?} rejected: {}", coords, err))?;

        self.store.replace(armed);
        Ok(self.run_generation(wave))
    }

    /// Runs the generation `ticket` was scheduled for.
    pub fn on_timer(&mut self, ticket: WaveTicket) -> Progress {
        match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket == ticket => self.run_generation(in_flight.wave),
            other => {
                log::trace!("ignoring stale ticket {:?}", ticket);
                self.in_flight = other;
                Progress::Stale
            }
        }
    }

    /// Abandons any wave in flight and starts a fresh game.
    pub fn reset(&mut self, config: impl Into<GameConfig>) {
        if let Some(in_flight) = self.in_flight.take() {
            self.scheduler.cancel(in_flight.task);
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.config = config.into();
        self.engine = PropagationEngine::from_config(&self.config);
        self.store.initialize(self.config.size, self.config.bombs);
        log::info!(
            "new game: size {}, {} bombs",
            self.config.size,
            self.config.bombs
        );
    }

    fn run_generation(&mut self, wave: Wave) -> Progress {
        let mut wave = wave;
        loop {
            let current = self.store.current();
            match self.engine.step(&current, wave) {
                Step::Advanced {
                    state, wave: next, ..
                } if next.has_subsided() => {
                    let done = self.engine.step(&state, next).into_state();
                    return self.finish(done);
                }
                Step::Advanced {
                    state,
                    wave: next,
                    report,
                } => {
                    self.store.replace(state);
                    if self.config.generation_delay_ms == 0 {
                        wave = next;
                        continue;
                    }
                    let ticket = WaveTicket {
                        epoch: self.epoch,
                        generation: next.generation(),
                    };
                    let task = self
                        .scheduler
                        .schedule(self.config.generation_delay_ms, ticket);
                    self.in_flight = Some(InFlight {
                        wave: next,
                        ticket,
                        task,
                    });
                    return Progress::Scheduled { ticket, report };
                }
                Step::Subsided(state) => return self.finish(state),
            }
        }
    }

    fn finish(&mut self, state: GameState) -> Progress {
        let status = state.status;
        self.store.replace(state);
        if let Some(message) = status.message() {
            log::info!("{}", message);
        }
        Progress::Finished(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(tier: Tier) -> Session<ManualScheduler> {
        Session::new(tier, ManualScheduler::new())
    }

    #[test]
    fn placement_schedules_next_generation() {
        let mut session = session(Tier::Easy);

        let progress = session.place_bomb((0, 0)).unwrap();

        let Progress::Scheduled { ticket, report } = progress else {
            panic!("expected a scheduled generation, got {:?}", progress);
        };
        assert_eq!(ticket.generation, 1);
        assert_eq!(report.armed.len(), 2);
        assert_eq!(session.scheduler().pending(), 1);
        assert_eq!(session.current().score, 20);
        assert_eq!(session.scheduler().next_due_in(), Some(400));
    }

    #[test]
    fn second_placement_is_rejected_while_wave_in_flight() {
        let mut session = session(Tier::Easy);
        session.place_bomb((0, 0)).unwrap();
        let before = session.current();

        assert_eq!(session.place_bomb((3, 3)), Err(GameError::WaveInFlight));
        assert!(Rc::ptr_eq(&before, &session.current()));
        assert!(!session.can_place_at((3, 3)));
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut session = session(Tier::Easy);
        session.place_bomb((0, 0)).unwrap();
        let pending = session.pending_ticket().unwrap();
        let bogus = WaveTicket {
            epoch: pending.epoch + 1,
            ..pending
        };

        assert_eq!(session.on_timer(bogus), Progress::Stale);
        assert_eq!(session.pending_ticket(), Some(pending));
    }

    #[test]
    fn zero_delay_runs_wave_to_completion() {
        let config = Tier::Easy.config().with_generation_delay(0);
        let mut session = Session::new(config, ManualScheduler::new());

        let progress = session.place_bomb((1, 2)).unwrap();

        assert_eq!(progress, Progress::Finished(GameStatus::Won));
        assert!(session.scheduler().is_idle());
        assert_eq!(session.current().score, 150);
    }

    #[test]
    fn observers_see_every_installed_snapshot() {
        use alloc::vec::Vec;
        use core::cell::RefCell;

        let mut session = Session::new(
            Tier::Easy.config().with_generation_delay(0),
            ManualScheduler::new(),
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |state| sink.borrow_mut().push(state.generation));

        session.place_bomb((0, 0)).unwrap();

        // armed snapshot, then one per generation that armed something, then
        // the verdict
        let seen = seen.borrow();
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.len(), 1 + 6 + 1);
    }
}
