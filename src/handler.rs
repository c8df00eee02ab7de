//! Error handlers and the process-wide handler slot used by [`load_config`].
//!
//! [`load_config`]: crate::load_config

use crate::error::ConfigError;
use colored::Colorize;
use std::sync::{Arc, PoisonError, RwLock};

/// Receives each error at the moment the loader reports it.
///
/// Implemented for every `FnMut(&ConfigError)`, so a closure pushing into a
/// `Vec` is enough to collect errors.
pub trait ErrorHandler {
    fn handle(&mut self, error: &ConfigError);
}

impl<F> ErrorHandler for F
where
    F: FnMut(&ConfigError),
{
    fn handle(&mut self, error: &ConfigError) {
        self(error)
    }
}

/// A handler that can be installed process-wide
pub type SharedHandler = Arc<dyn Fn(&ConfigError) + Send + Sync>;

static HANDLER: RwLock<Option<SharedHandler>> = RwLock::new(None);

/// Builds the built-in handler: print the error to stderr tagged `envconf:` and exit with status 1.
pub fn default_error_handler() -> SharedHandler {
    Arc::new(|error: &ConfigError| {
        eprintln!("{} {}", "envconf:".red().bold(), error);
        std::process::exit(1);
    })
}

/// Replaces the process-wide handler. The latest call wins.
pub fn set_error_handler<F>(handler: F)
where
    F: Fn(&ConfigError) + Send + Sync + 'static,
{
    let mut slot = HANDLER.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Arc::new(handler));
}

/// Restores the built-in handler
pub fn reset_error_handler() {
    let mut slot = HANDLER.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}

pub(crate) fn current_handler() -> SharedHandler {
    let slot = HANDLER.read().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(handler) => Arc::clone(handler),
        None => default_error_handler(),
    }
}

/// Forwards to whatever handler is installed process-wide when the error is reported
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalHandler;

impl ErrorHandler for GlobalHandler {
    fn handle(&mut self, error: &ConfigError) {
        // Clone the Arc out so the lock is not held while the handler runs.
        let handler = current_handler();
        handler(error);
    }
}
