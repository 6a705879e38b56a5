//! Single-instance coordination.
//!
//! The first process to take the named lock becomes the owner and keeps the
//! lock until it exits. Later launches tell the user, hand focus to the
//! running instance and exit.

mod activation;

pub use activation::{Activation, ProcessServices, WindowHandle, forward_activation};

use crate::{
    error::PlatformError,
    notice::{Notice, Notifier, Severity, notify_best_effort},
};

/// Exit code of a launch that found another instance running.
pub const EXIT_ALREADY_RUNNING: i32 = 0;

/// An OS handle to an acquired named lock.
pub trait LockHandle {
    fn release(&mut self) -> Result<(), PlatformError>;
}

#[derive(Debug)]
pub enum LockAttempt<H> {
    Acquired(H),
    Contended,
}

/// A system-wide exclusive lock addressed by name.
pub trait NamedLock {
    type Handle: LockHandle;

    fn try_acquire(&self, name: &str) -> Result<LockAttempt<Self::Handle>, PlatformError>;
}

/// Ownership of the instance lock. Releases on drop.
#[derive(Debug)]
pub struct InstanceOwner<H: LockHandle> {
    name: String,
    handle: Option<H>,
}

impl<H: LockHandle> InstanceOwner<H> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// Releases the lock. Calling it again is a no-op.
    pub fn release(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        match handle.release() {
            Ok(()) => tracing::debug!(name = %self.name, "instance lock released"),
            Err(e) => tracing::warn!(name = %self.name, error = %e, "failed to release instance lock"),
        }
    }
}

impl<H: LockHandle> Drop for InstanceOwner<H> {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Debug)]
pub enum Acquisition<H: LockHandle> {
    Acquired(InstanceOwner<H>),
    AlreadyRunning,
}

impl<H: LockHandle> Acquisition<H> {
    #[must_use]
    pub fn is_acquired(&self) -> bool {
        matches!(self, Acquisition::Acquired(_))
    }
}

pub struct InstanceGuard<L> {
    lock: L,
    name: String,
}

impl<L: NamedLock> InstanceGuard<L> {
    pub fn new(lock: L, name: impl Into<String>) -> Self {
        Self {
            lock,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn acquire(&self) -> Result<Acquisition<L::Handle>, PlatformError> {
        match self.lock.try_acquire(&self.name)? {
            LockAttempt::Acquired(handle) => {
                tracing::info!(name = %self.name, "instance lock acquired");
                Ok(Acquisition::Acquired(InstanceOwner {
                    name: self.name.clone(),
                    handle: Some(handle),
                }))
            }
            LockAttempt::Contended => {
                tracing::info!(name = %self.name, "another instance holds the lock");
                Ok(Acquisition::AlreadyRunning)
            }
        }
    }
}

#[must_use]
pub fn already_running_notice(app_name: &str) -> Notice {
    Notice::new(
        app_name,
        format!("{app_name} is already running. This launch will be closed and the open window brought to the front."),
        Severity::Warning,
    )
    .with_confirm_label("OK")
}

/// Handles a launch that lost the lock: tells the user, then tries to bring
/// the running instance forward. Returns the exit code the caller should
/// terminate with.
pub fn abort_duplicate_launch(
    app_name: &str,
    notifier: &dyn Notifier,
    services: &dyn ProcessServices,
) -> i32 {
    notify_best_effort(notifier, &already_running_notice(app_name));

    match forward_activation(services) {
        Ok(Activation::Activated { pid, .. }) => {
            tracing::info!(pid, "activated running instance");
        }
        Ok(outcome) => tracing::debug!(?outcome, "no running instance window to activate"),
        Err(e) => tracing::warn!(error = %e, "failed to activate running instance"),
    }

    EXIT_ALREADY_RUNNING
}
