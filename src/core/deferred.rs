//! Single-assignment deferred values.
//!
//! A [`Resolver`] and a [`Deferred`] share one slot. The resolver side writes
//! the value exactly once; every observer registered on the deferred side
//! (wakers from `.await` and `on_resolve` callbacks) is then notified in the
//! order it was attached.
//!
//! Everything here is single-threaded (`Rc<RefCell<_>>`); resolution happens
//! synchronously from inside the controller's transition methods.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

type Callback<T> = Box<dyn FnOnce(&T)>;

enum Slot<T> {
    Pending {
        wakers: Vec<Waker>,
        callbacks: Vec<Callback<T>>,
    },
    Ready(T),
}

/// Read side of a single-assignment value. Cloning shares the same slot.
pub struct Deferred<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

/// Write side of a single-assignment value.
pub struct Resolver<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

/// Create a connected resolver/deferred pair.
pub fn channel<T>() -> (Resolver<T>, Deferred<T>) {
    let slot = Rc::new(RefCell::new(Slot::Pending {
        wakers: Vec::new(),
        callbacks: Vec::new(),
    }));
    (Resolver { slot: slot.clone() }, Deferred { slot })
}

impl<T> Deferred<T> {
    /// An already-resolved deferred.
    pub fn ready(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::Ready(value))),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Ready(_))
    }
}

impl<T: Clone> Deferred<T> {
    /// Run `f` once the value is available (immediately if it already is).
    ///
    /// `f` runs with no borrow held, so it may peek at or observe this slot.
    pub fn on_resolve<F>(&self, f: F)
    where
        F: FnOnce(&T) + 'static,
    {
        let ready = {
            let mut slot = self.slot.borrow_mut();
            match &mut *slot {
                Slot::Pending { callbacks, .. } => {
                    callbacks.push(Box::new(f));
                    return;
                }
                Slot::Ready(value) => value.clone(),
            }
        };
        f(&ready);
    }

    /// Current value, if resolved.
    pub fn peek(&self) -> Option<T> {
        match &*self.slot.borrow() {
            Slot::Ready(value) => Some(value.clone()),
            Slot::Pending { .. } => None,
        }
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone> Future for Deferred<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut slot = self.slot.borrow_mut();
        match &mut *slot {
            Slot::Ready(value) => Poll::Ready(value.clone()),
            Slot::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

impl<T: Clone> Resolver<T> {
    /// Store the value and notify every observer.
    ///
    /// Observers run after the slot is released; one attached while they run
    /// sees the value right away.
    pub fn resolve(self, value: T) {
        let previous = std::mem::replace(&mut *self.slot.borrow_mut(), Slot::Ready(value.clone()));

        if let Slot::Pending { wakers, callbacks } = previous {
            for cb in callbacks {
                cb(&value);
            }
            for waker in wakers {
                waker.wake();
            }
        }
    }
}

impl<T> Resolver<T> {
    /// A new deferred observing this resolver's slot.
    pub fn subscribe(&self) -> Deferred<T> {
        Deferred {
            slot: self.slot.clone(),
        }
    }
}
