//! Locale and internationalization core for the recipe application.
//!
//! - [`i18n`]: the locale registry and per-locale value types
//! - [`units`]: metric/imperial conversions
//! - [`translation`]: translation bundle providers with caching and fallback
//! - [`controller`]: the current-locale state machine
//! - [`format`]: currency, number and date formatting bound to the controller
//! - [`context`]: the surface UI components consume

pub mod config;
pub mod context;
pub mod controller;
pub mod environment;
pub mod error;
pub mod format;
pub mod i18n;
pub mod retry;
pub mod storage;
pub mod translation;
pub mod units;

pub use context::LocaleContext;
pub use controller::{LocaleController, LocaleStatus, ReconcileOutcome, Subscription};
pub use error::{LocaleError, StorageError};
pub use format::Formatter;
pub use i18n::{LocaleConfig, LocaleRegistry};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a panicking thread poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
