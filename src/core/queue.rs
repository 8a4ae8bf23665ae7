//! Event Queue
//!
//! A bounded multi-producer queue between the frame loop (which posts) and
//! the application worker (which blocks polling). Posting never blocks: a
//! full queue drops the event. Closing wakes every blocked poller.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::event::Event;

/// Maximum number of undelivered events
pub const EVENT_QUEUE_CAPACITY: usize = 128;

#[derive(Debug)]
struct QueueState {
    events: VecDeque<Event>,
    open: bool,
}

/// Outcome of [`EventQueue::pop_timeout`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    Event(Event),
    Timeout,
    Closed,
}

/// Bounded event queue, created closed
#[derive(Debug)]
pub struct EventQueue {
    state: Mutex<QueueState>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                events: VecDeque::with_capacity(EVENT_QUEUE_CAPACITY),
                open: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open for posting. Any stale events are discarded.
    pub fn open(&self) {
        let mut state = self.lock();
        state.events.clear();
        state.open = true;
    }

    /// Close the queue, discard undelivered events and wake all waiters
    pub fn close(&self) {
        let mut state = self.lock();
        state.open = false;
        state.events.clear();
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Post without blocking. Returns `false` if the event was dropped
    /// because the queue is full or closed.
    pub fn try_push(&self, event: Event) -> bool {
        let mut state = self.lock();
        if !state.open {
            return false;
        }
        if state.events.len() >= EVENT_QUEUE_CAPACITY {
            tracing::trace!(?event, "event queue full, dropping event");
            return false;
        }
        state.events.push_back(event);
        drop(state);
        self.not_empty.notify_one();
        true
    }

    /// Post, blocking while the queue is full
    ///
    /// Deadlocks if called from the only thread that drains the queue.
    #[deprecated(note = "blocks while the queue is full; use try_push")]
    pub fn push_wait(&self, event: Event) -> bool {
        let mut state = self.lock();
        while state.open && state.events.len() >= EVENT_QUEUE_CAPACITY {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        if !state.open {
            return false;
        }
        state.events.push_back(event);
        drop(state);
        self.not_empty.notify_one();
        true
    }

    /// Block until an event is available. `None` once the queue is closed.
    pub fn pop(&self) -> Option<Event> {
        let mut state = self.lock();
        loop {
            if !state.open {
                return None;
            }
            if let Some(event) = state.events.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(event);
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Like [`pop`](Self::pop) but gives up after `timeout`
    pub fn pop_timeout(&self, timeout: Duration) -> Poll {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if !state.open {
                return Poll::Closed;
            }
            if let Some(event) = state.events.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Poll::Event(event);
            }
            let now = Instant::now();
            if now >= deadline {
                return Poll::Timeout;
            }
            state = self
                .not_empty
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .0;
        }
    }

    /// Take an event if one is ready
    pub fn try_pop(&self) -> Option<Event> {
        let mut state = self.lock();
        if !state.open {
            return None;
        }
        let event = state.events.pop_front();
        drop(state);
        if event.is_some() {
            self.not_full.notify_one();
        }
        event
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
