use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Observer = Box<dyn FnMut(&Rc<GameState>)>;

/// Holds the authoritative game snapshot and tells subscribers whenever a new
/// one is installed.
///
/// Snapshots are immutable once installed: producing the next state means
/// cloning the current one, editing the clone, and handing it to [`replace`].
/// A renderer holding an older `Rc` never observes a half-finished update.
///
/// [`replace`]: GridStore::replace
pub struct GridStore {
    current: Rc<GameState>,
    revision: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u32,
}

impl GridStore {
    pub fn new(size: Coord, bomb_budget: CellCount) -> Self {
        Self {
            current: Rc::new(GameState::new(size, bomb_budget)),
            revision: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Back to a fresh game: all cells safe, full budget, no score.
    pub fn initialize(&mut self, size: Coord, bomb_budget: CellCount) {
        self.replace(GameState::new(size, bomb_budget));
    }

    pub fn replace(&mut self, state: GameState) {
        self.install(Rc::new(state));
    }

    pub fn install(&mut self, state: Rc<GameState>) {
        self.current = state;
        self.revision = self.revision.wrapping_add(1);
        let snapshot = &self.current;
        for (_, observer) in self.observers.iter_mut() {
            observer(snapshot);
        }
    }

    pub fn current(&self) -> Rc<GameState> {
        Rc::clone(&self.current)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Rc<GameState>) + 'static,
    ) -> SubscriptionId {
        self.next_subscription = self.next_subscription.wrapping_add(1);
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("current", &self.current)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}
