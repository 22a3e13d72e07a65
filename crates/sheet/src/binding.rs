//! Shared state handles with change notification.
//!
//! Widgets live in a persistent tree, so the host app cannot reach into them
//! to flip a flag or bump a counter. Instead both sides hold a clone of the
//! same handle. All handles are single-threaded (`Rc`) because layout and
//! rendering happen on the event loop task only.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Observer<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<Observer<T>>>,
}

/// A shared, observable value.
///
/// Cloning a `Binding` yields another handle to the same value. Observers are
/// called after every `set` that actually changes the value.
///
/// # Example
///
/// ```
/// use sheet::Binding;
///
/// let count = Binding::new(2usize);
/// let reader = count.clone();
/// count.set(5);
/// assert_eq!(reader.get(), 5);
/// ```
pub struct Binding<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Binding<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Store a new value. Returns true (and notifies observers) only if it
    /// differs from the current one.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.shared.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.notify(&value);
        true
    }

    /// Compute a new value from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.shared.value.borrow());
        self.set(next)
    }

    /// Register an observer called with the new value after each change.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) {
        self.shared.observers.borrow_mut().push(Rc::new(observer));
    }

    fn notify(&self, value: &T) {
        // Snapshot the list so observers may subscribe or set without a
        // double borrow.
        let observers: Vec<Observer<T>> = self.shared.observers.borrow().clone();
        for observer in observers {
            observer(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.shared.value.borrow()).finish()
    }
}

/// Whether a sheet is shown, shared between the host app and the sheet.
///
/// Write access is split by direction:
/// - the host turns the flag on with [`present`](Self::present);
/// - only the sheet turns it off. The host asks for that with
///   [`request_dismiss`](Self::request_dismiss), and the sheet performs the
///   write during its next layout pass.
#[derive(Clone)]
pub struct PresentationBinding {
    presented: Binding<bool>,
    dismiss_requested: Rc<Cell<bool>>,
}

impl Default for PresentationBinding {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PresentationBinding {
    pub fn new(presented: bool) -> Self {
        Self {
            presented: Binding::new(presented),
            dismiss_requested: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_presented(&self) -> bool {
        self.presented.get()
    }

    /// Show the sheet. Cancels any dismissal the sheet has not processed yet.
    pub fn present(&self) {
        self.dismiss_requested.set(false);
        if self.presented.set(true) {
            log::info!("sheet presented");
        }
    }

    /// Ask the sheet to close on its next layout pass.
    ///
    /// Does nothing if the sheet is not presented.
    pub fn request_dismiss(&self) {
        if self.is_presented() {
            self.dismiss_requested.set(true);
        }
    }

    /// Present when hidden, request dismissal when shown.
    pub fn toggle(&self) {
        if self.is_presented() && !self.dismiss_requested.get() {
            self.request_dismiss();
        } else {
            self.present();
        }
    }

    /// True while a host dismissal request is waiting for the sheet.
    pub fn is_dismiss_pending(&self) -> bool {
        self.dismiss_requested.get()
    }

    /// Register an observer called with the new flag after each change.
    pub fn subscribe(&self, observer: impl Fn(bool) + 'static) {
        self.presented.subscribe(move |presented| observer(*presented));
    }

    /// Takes a pending dismissal request. Called by the sheet.
    pub(crate) fn take_dismiss_request(&self) -> bool {
        self.dismiss_requested.replace(false)
    }

    /// Turns the flag off. Called by the sheet only.
    pub(crate) fn dismiss(&self) -> bool {
        self.dismiss_requested.set(false);
        self.presented.set(false)
    }
}

impl fmt::Debug for PresentationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationBinding")
            .field("presented", &self.is_presented())
            .field("dismiss_requested", &self.dismiss_requested.get())
            .finish()
    }
}
