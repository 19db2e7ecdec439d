use std::{mem, vec::IntoIter};

use facade_shared::PeerId;

use crate::{connection::connection::ConnectionKey, FacadeServerError};

/// Everything that happened since the last call to `Server::receive`
pub struct Events {
    joins: Vec<(ConnectionKey, bool)>,
    disconnections: Vec<(ConnectionKey, PeerId)>,
    errors: Vec<FacadeServerError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            joins: Vec::new(),
            disconnections: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: Event>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_join(&mut self, key: &ConnectionKey, capable: bool) {
        self.joins.push((*key, capable));
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, key: &ConnectionKey, peer: PeerId) {
        self.disconnections.push((*key, peer));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: FacadeServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait Event {
    type Iter;

    fn iter(events: &mut Events) -> Self::Iter;

    fn has(events: &Events) -> bool;
}

// JoinEvent
/// A connection finished the join handshake. Carries whether it may receive
/// virtualization packets.
pub struct JoinEvent;
impl Event for JoinEvent {
    type Iter = IntoIter<(ConnectionKey, bool)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.joins);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.joins.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl Event for DisconnectEvent {
    type Iter = IntoIter<(ConnectionKey, PeerId)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.disconnections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.disconnections.is_empty()
    }
}

// ErrorEvent
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<FacadeServerError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
