//! Callback abstraction for widget event handlers.
//!
//! Widgets that report a value to the application (a field that changed, a
//! selection that completed) hold a `Callback<T, M>` that turns the value
//! into an application message. Instead of writing
//! `Option<Box<dyn Fn(T) -> M>>` everywhere:
//!
//! ```ignore
//! use roi_ui::Callback;
//!
//! struct Field<M> {
//!     on_change: Callback<i64, M>,
//! }
//!
//! impl<M> Field<M> {
//!     fn changed(&self, value: i64) -> Option<M> {
//!         self.on_change.call(value)
//!     }
//! }
//! ```

use std::fmt;

/// An optional event handler producing messages of type `M` from values of
/// type `T`.
pub struct Callback<T, M> {
    f: Option<Box<dyn Fn(T) -> M>>,
}

impl<T, M> Callback<T, M> {
    /// Create a new callback from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T) -> M + 'static,
    {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// Create an empty callback (no handler).
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the callback with a value, if it exists.
    ///
    /// Returns `None` if no callback is registered.
    pub fn call(&self, value: T) -> Option<M> {
        self.f.as_ref().map(|f| f(value))
    }

    /// Check if the callback is set.
    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }
}

impl<T, M> Default for Callback<T, M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T, M> fmt::Debug for Callback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("set", &self.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_callback_produces_nothing() {
        let cb: Callback<i64, String> = Callback::none();
        assert!(cb.call(3).is_none());
        assert!(!cb.is_some());
    }

    #[test]
    fn test_callback_maps_value() {
        let cb = Callback::new(|v: i64| format!("value={}", v));
        assert_eq!(cb.call(7).as_deref(), Some("value=7"));
    }
}
