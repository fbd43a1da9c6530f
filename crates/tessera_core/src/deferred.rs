//! # Deferred Call Queue
//!
//! Time-ordered one-shot callbacks, polled once per frame.
//!
//! Anything that would mutate a container while it is being iterated
//! (closing a menu during input dispatch, removing an element from inside
//! its own event) is posted here and applied by the frame's drain step.
//!
//! ## Drain semantics
//!
//! - A call is removed from the queue **before** it is invoked.
//! - Calls posted while a drain is running are not eligible in that drain,
//!   even with zero delay. They fire on the next poll.
//! - Calls due in the same poll fire in insertion order.
//! - A delay counts from the time the call was posted, not from the last
//!   poll. Callers that do not know the current time use
//!   [`DeferredQueue::post_on_next_poll`], whose delay starts at the next poll.
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::DeferredQueue;
//!
//! let mut queue: DeferredQueue<Vec<u32>, u32> = DeferredQueue::new();
//! queue.post(|log, value| log.push(value), 7, 1_000, 0);
//!
//! let mut log = Vec::new();
//! assert_eq!(queue.drain(1_000, &mut log), 1);
//! assert_eq!(log, vec![7]);
//! ```

use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    At(u64),
    AfterNextPoll(u64),
}

/// A one-shot callback with its payload and fire time.
pub struct DeferredCall<C, P = ()> {
    callback: Box<dyn FnOnce(&mut C, P)>,
    payload: P,
    due: Due,
    sequence: u64,
}

impl<C, P> DeferredCall<C, P> {
    /// Absolute time (in queue clock milliseconds) this call becomes due.
    ///
    /// `None` while the call waits for the poll that starts its delay.
    #[inline]
    #[must_use]
    pub const fn fire_at_ms(&self) -> Option<u64> {
        match self.due {
            Due::At(at) => Some(at),
            Due::AfterNextPoll(_) => None,
        }
    }

    const fn is_due(&self, pass: DrainPass) -> bool {
        match self.due {
            Due::At(at) => self.sequence < pass.horizon && at <= pass.now_ms,
            Due::AfterNextPoll(_) => false,
        }
    }

    /// Invokes the callback, consuming the call.
    pub fn fire(self, context: &mut C) {
        (self.callback)(context, self.payload);
    }
}

impl<C, P> fmt::Debug for DeferredCall<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCall")
            .field("due", &self.due)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Marks one poll of the queue.
///
/// Only calls posted before the pass started, and due at `now_ms`, are
/// handed out by [`DeferredQueue::pop_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainPass {
    now_ms: u64,
    horizon: u64,
}

impl DrainPass {
    /// The time this pass polls at.
    #[inline]
    #[must_use]
    pub const fn now_ms(self) -> u64 {
        self.now_ms
    }
}

/// Ordered queue of one-shot deferred calls.
///
/// `C` is the context a callback receives mutably when it fires, `P` the
/// payload stored alongside it.
///
/// The queue keeps its own clock: the time of the most recent poll. A call
/// posted at `now_ms` with `delay_ms` becomes due at `now_ms + delay_ms`.
pub struct DeferredQueue<C, P = ()> {
    calls: VecDeque<DeferredCall<C, P>>,
    clock_ms: u64,
    next_sequence: u64,
}

impl<C, P> DeferredQueue<C, P> {
    /// Creates an empty queue with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: VecDeque::with_capacity(16),
            clock_ms: 0,
            next_sequence: 0,
        }
    }

    /// Posts a callback to fire once `delay_ms` has elapsed after `now_ms`.
    ///
    /// A zero delay still waits for the next poll; nothing fires synchronously.
    /// A `now_ms` behind the queue clock is read as the clock.
    pub fn post(
        &mut self,
        callback: impl FnOnce(&mut C, P) + 'static,
        payload: P,
        now_ms: u64,
        delay_ms: u64,
    ) {
        let posted_at = self.clock_ms.max(now_ms);
        self.push(callback, payload, Due::At(posted_at.saturating_add(delay_ms)));
    }

    /// Posts a callback whose `delay_ms` starts at the next poll.
    ///
    /// For callers outside the polling loop that have no current time.
    pub fn post_on_next_poll(
        &mut self,
        callback: impl FnOnce(&mut C, P) + 'static,
        payload: P,
        delay_ms: u64,
    ) {
        self.push(callback, payload, Due::AfterNextPoll(delay_ms));
    }

    fn push(&mut self, callback: impl FnOnce(&mut C, P) + 'static, payload: P, due: Due) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.calls.push_back(DeferredCall {
            callback: Box::new(callback),
            payload,
            due,
            sequence,
        });
    }

    /// Number of calls still waiting.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns true if nothing is waiting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// The queue clock (time of the latest poll).
    #[inline]
    #[must_use]
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Starts a poll at `now_ms`. The clock never runs backwards.
    ///
    /// Calls posted with [`post_on_next_poll`](Self::post_on_next_poll) start
    /// their delay here.
    pub fn begin_pass(&mut self, now_ms: u64) -> DrainPass {
        self.clock_ms = self.clock_ms.max(now_ms);
        for call in &mut self.calls {
            if let Due::AfterNextPoll(delay_ms) = call.due {
                call.due = Due::At(self.clock_ms.saturating_add(delay_ms));
            }
        }
        DrainPass {
            now_ms: self.clock_ms,
            horizon: self.next_sequence,
        }
    }

    /// Removes and returns the first call that is due in `pass`.
    ///
    /// The caller invokes it; the queue no longer holds it, so whatever the
    /// callback posts lands behind the pass horizon.
    pub fn pop_due(&mut self, pass: DrainPass) -> Option<DeferredCall<C, P>> {
        let position = self
            .calls
            .iter()
            .position(|call| call.is_due(pass))?;
        self.calls.remove(position)
    }

    /// Polls the queue at `now_ms`, firing every due call against `context`.
    ///
    /// Returns the number of calls fired.
    pub fn drain(&mut self, now_ms: u64, context: &mut C) -> usize {
        let pass = self.begin_pass(now_ms);
        let mut fired = 0;

        while let Some(call) = self.pop_due(pass) {
            call.fire(context);
            fired += 1;
        }

        if fired > 0 {
            tracing::trace!(fired, pending = self.calls.len(), "deferred calls drained");
        }
        fired
    }
}

impl<C, P> Default for DeferredQueue<C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, P> fmt::Debug for DeferredQueue<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.calls.len())
            .field("clock_ms", &self.clock_ms)
            .finish()
    }
}
