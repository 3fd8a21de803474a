//! Listener registry shared by the presentation components.
//!
//! Components own an `EventEmitter` and expose it through `Observable`
//! instead of inheriting from a dispatcher.

/// An event that can be filtered by kind
pub trait Event {
    type Kind: Copy + Eq;

    fn kind(&self) -> Self::Kind;
}

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Listener<E: Event> {
    id: SubscriptionId,
    kind: E::Kind,
    handler: Box<dyn FnMut(&E)>,
}

/// Owned list of listeners, invoked synchronously in subscription order
pub struct EventEmitter<E: Event> {
    next_id: u64,
    listeners: Vec<Listener<E>>,
}

impl<E: Event> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns false when the token was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        let kind = event.kind();
        for listener in self.listeners.iter_mut().filter(|l| l.kind == kind) {
            (listener.handler)(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything that lets callers listen for its events
pub trait Observable<E: Event> {
    fn emitter(&mut self) -> &mut EventEmitter<E>;

    fn subscribe<F>(&mut self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        self.emitter().subscribe(kind, handler)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.emitter().unsubscribe(id)
    }
}
