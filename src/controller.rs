//! Locale controller: owns the current locale.
//!
//! ```text
//! Uninitialized -> Initializing -> Ready(locale) <-> Transitioning(locale) -> Ready(new)
//! ```
//!
//! The controller is an ordinary value (not a global) so independent
//! instances can coexist. Its collaborators, the preference store and the
//! environment, are injected. Storage failures never escape: the preference
//! simply stays in memory for the session.

use crate::environment::Environment;
use crate::error::LocaleError;
use crate::i18n::{LocaleConfig, LocaleRegistry};
use crate::lock;
use crate::storage::{PreferenceStore, LOCALE_STORAGE_KEY};
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info, warn};

/// Lifecycle state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleStatus {
    Uninitialized,
    Initializing,
    Ready(&'static str),
    Transitioning(&'static str),
}

/// Outcome of [`LocaleController::reconcile_external_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The reported code already is the current locale
    Unchanged,
    /// The controller switched to the reported locale
    Adopted,
    /// The reported code is not supported; state is untouched
    Ignored,
}

type Listener = Arc<dyn Fn(&LocaleConfig) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl Subscribers {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

struct ControllerState {
    status: LocaleStatus,
    current: LocaleConfig,
    persistence_degraded: bool,
}

/// Handle returned by [`LocaleController::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "dropping a Subscription does not unsubscribe; keep it to call unsubscribe()"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    /// Remove the listener. Safe to call from inside a listener callback.
    pub fn unsubscribe(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            lock(&subscribers)
                .entries
                .retain(|(entry_id, _)| *entry_id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

pub struct LocaleController {
    registry: Arc<LocaleRegistry>,
    store: Arc<dyn PreferenceStore>,
    environment: Arc<dyn Environment>,
    state: Mutex<ControllerState>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl LocaleController {
    /// Create an uninitialized controller whose current locale is the
    /// registry default until [`initialize`](Self::initialize) runs.
    pub fn new(
        registry: Arc<LocaleRegistry>,
        store: Arc<dyn PreferenceStore>,
        environment: Arc<dyn Environment>,
    ) -> Self {
        let current = registry.default_config().clone();
        Self {
            registry,
            store,
            environment,
            state: Mutex::new(ControllerState {
                status: LocaleStatus::Uninitialized,
                current,
                persistence_degraded: false,
            }),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    /// Start in `Ready(code)` without consulting storage or the environment.
    pub fn with_initial_locale(self, code: &str) -> Result<Self, LocaleError> {
        let config = self
            .registry
            .find(code)
            .cloned()
            .ok_or_else(|| LocaleError::UnknownLocale(code.to_string()))?;
        {
            let mut state = lock(&self.state);
            state.status = LocaleStatus::Ready(config.code);
            state.current = config;
        }
        Ok(self)
    }

    /// Resolve the starting locale and move to `Ready`.
    ///
    /// Order: persisted preference (if supported), then environment
    /// detection, then the registry default. Translation loading is not
    /// part of this and never delays it.
    pub fn initialize(&self) -> LocaleConfig {
        self.set_status(LocaleStatus::Initializing);

        let code = match self.store.read(LOCALE_STORAGE_KEY) {
            Ok(Some(stored)) => match self.registry.find(&stored) {
                Some(config) => {
                    debug!("Using persisted locale {}", config.code);
                    config.code
                }
                None => {
                    warn!("Ignoring unsupported persisted locale '{}'", stored);
                    self.detect()
                }
            },
            Ok(None) => self.detect(),
            Err(e) => {
                warn!("Locale preference unavailable, detecting instead: {}", e);
                lock(&self.state).persistence_degraded = true;
                self.detect()
            }
        };

        let config = self.registry.get_config(code).clone();
        self.apply_environment(&config);
        {
            let mut state = lock(&self.state);
            state.current = config.clone();
            state.status = LocaleStatus::Ready(config.code);
        }

        info!("Locale initialized: {}", config.code);
        config
    }

    /// Switch to `code`, persist it, apply environment attributes and
    /// notify subscribers in subscription order.
    ///
    /// # Errors
    /// Returns `LocaleError::UnknownLocale` for codes outside the registry;
    /// the current state is left untouched.
    pub fn change_locale(&self, code: &str) -> Result<LocaleConfig, LocaleError> {
        let config = match self.registry.find(code) {
            Some(config) => config.clone(),
            None => {
                warn!("Rejected change to unknown locale '{}'", code);
                return Err(LocaleError::UnknownLocale(code.to_string()));
            }
        };

        self.transition_to(&config);
        Ok(config)
    }

    /// Follow a language change reported by an external translation engine.
    ///
    /// The engine's own change method is never called back, which breaks the
    /// notification cycle between the two.
    pub fn reconcile_external_change(&self, code: &str) -> ReconcileOutcome {
        if self.current_locale().code == code {
            return ReconcileOutcome::Unchanged;
        }

        match self.registry.find(code) {
            Some(config) => {
                let config = config.clone();
                debug!("Adopting externally reported locale {}", config.code);
                self.transition_to(&config);
                ReconcileOutcome::Adopted
            }
            None => {
                warn!("Ignoring externally reported locale '{}'", code);
                ReconcileOutcome::Ignored
            }
        }
    }

    /// Register a listener invoked after every successful locale change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LocaleConfig) + Send + Sync + 'static,
    {
        let mut subscribers = lock(&self.subscribers);
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).entries.len()
    }

    pub fn current_locale(&self) -> LocaleConfig {
        lock(&self.state).current.clone()
    }

    pub fn status(&self) -> LocaleStatus {
        lock(&self.state).status
    }

    /// Whether the preference store failed this session.
    pub fn is_persistence_degraded(&self) -> bool {
        lock(&self.state).persistence_degraded
    }

    pub fn registry(&self) -> &Arc<LocaleRegistry> {
        &self.registry
    }

    fn detect(&self) -> &'static str {
        let languages = self.environment.preferred_languages();
        let code = self.registry.detect_from_environment_tags(&languages);
        debug!("Detected locale {} from {:?}", code, languages);
        code
    }

    fn transition_to(&self, config: &LocaleConfig) {
        self.set_status(LocaleStatus::Transitioning(config.code));

        // Written before the in-memory update; read back only at the next initialize
        if let Err(e) = self.store.write(LOCALE_STORAGE_KEY, config.code) {
            warn!(
                "Could not persist locale {}, keeping it for this session only: {}",
                config.code, e
            );
            lock(&self.state).persistence_degraded = true;
        }

        self.apply_environment(config);

        let previous = {
            let mut state = lock(&self.state);
            let previous = state.current.code;
            state.current = config.clone();
            state.status = LocaleStatus::Ready(config.code);
            previous
        };
        info!("Locale changed from {} to {}", previous, config.code);

        self.notify(config);
    }

    fn apply_environment(&self, config: &LocaleConfig) {
        self.environment.apply_direction(config.direction);
        self.environment.apply_language_tag(config.code);
    }

    fn set_status(&self, status: LocaleStatus) {
        lock(&self.state).status = status;
    }

    /// Call listeners outside the lock, skipping any removed mid-notification.
    fn notify(&self, config: &LocaleConfig) {
        let snapshot: Vec<(u64, Listener)> = lock(&self.subscribers)
            .entries
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if lock(&self.subscribers).contains(id) {
                listener(config);
            }
        }
    }
}
