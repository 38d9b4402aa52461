//! Single-slot event channel from the renderer back into the controller.
//!
//! The renderer keeps a [`SignalSender`] and pushes the handle of a reaction
//! animation when it completes. The controller drains the slot once per
//! processing step. A push that lands before the previous one was drained
//! replaces it.

use std::{cell::Cell, fmt, rc::Rc};

/// Identity of one started reaction animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct Signal {
    slot: Rc<Cell<Option<AnimationHandle>>>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> SignalSender {
        SignalSender {
            slot: Rc::clone(&self.slot),
        }
    }

    pub fn drain(&self) -> Option<AnimationHandle> {
        self.slot.take()
    }
}

#[derive(Clone, Debug)]
pub struct SignalSender {
    slot: Rc<Cell<Option<AnimationHandle>>>,
}

impl SignalSender {
    pub fn notify(&self, handle: AnimationHandle) {
        if let Some(prev) = self.slot.replace(Some(handle)) {
            tracing::debug!(%prev, %handle, "undrained animation signal replaced");
        }
    }
}
