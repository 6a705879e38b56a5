//! Last-chance handling for panics that escape the UI thread.
//!
//! The first panic is shown to the user and followed by an abnormal exit with
//! [`EXIT_UNHANDLED`]. If that exit cannot be performed, or a second panic
//! arrives while the first is being handled, the previously installed hook
//! runs and the default panic behavior continues.

use std::{
    any::Any,
    panic::PanicHookInfo,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    error::PlatformError,
    notice::{Notice, Notifier, Severity, notify_best_effort},
};

/// Exit code used after an unhandled panic.
pub const EXIT_UNHANDLED: i32 = 2;

/// Terminates the process. Only returns if termination could not be started.
pub trait Shutdown {
    fn shutdown(&self, exit_code: i32) -> Result<(), PlatformError>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PanicDisposition {
    ShutDown,
    PassThrough,
}

pub struct UnhandledPanicHandler<N, S> {
    app_name: String,
    notifier: N,
    shutdown: S,
    intercepted: AtomicBool,
}

impl<N, S> UnhandledPanicHandler<N, S>
where
    N: Notifier,
    S: Shutdown,
{
    pub fn new(app_name: impl Into<String>, notifier: N, shutdown: S) -> Self {
        Self {
            app_name: app_name.into(),
            notifier,
            shutdown,
            intercepted: AtomicBool::new(false),
        }
    }

    pub fn handle(&self, message: &str) -> PanicDisposition {
        if self.intercepted.swap(true, Ordering::SeqCst) {
            return PanicDisposition::PassThrough;
        }

        tracing::error!(%message, "unhandled panic");

        let notice = Notice::new(
            format!("{} error", self.app_name),
            format!("An unexpected error occurred and {} will close.\n\n{message}", self.app_name),
            Severity::Error,
        );
        notify_best_effort(&self.notifier, &notice);

        match self.shutdown.shutdown(EXIT_UNHANDLED) {
            Ok(()) => PanicDisposition::ShutDown,
            Err(e) => {
                tracing::error!(error = %e, "abnormal shutdown failed");
                PanicDisposition::PassThrough
            }
        }
    }
}

/// Extracts the human-readable message carried by a panic payload.
#[must_use]
pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn hook_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(location) = info.location() {
        tracing::debug!(file = location.file(), line = location.line(), "panic location");
    }
    payload_message(info.payload())
}

/// Installs `handler` as the process panic hook, chaining to the hook that
/// was installed before it.
pub fn install<N, S>(handler: Arc<UnhandledPanicHandler<N, S>>)
where
    N: Notifier + Send + Sync + 'static,
    S: Shutdown + Send + Sync + 'static,
{
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if handler.handle(&hook_message(info)) == PanicDisposition::PassThrough {
            previous(info);
        }
    }));
}

#[cfg(test)]
mod tests {
    use std::{panic, sync::Mutex};

    use tracing_test::traced_test;

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        shown: Mutex<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) -> Result<(), PlatformError> {
            self.shown.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    struct FakeShutdown {
        fail: bool,
        codes: Mutex<Vec<i32>>,
    }

    impl FakeShutdown {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                codes: Mutex::new(Vec::new()),
            }
        }
    }

    impl Shutdown for FakeShutdown {
        fn shutdown(&self, exit_code: i32) -> Result<(), PlatformError> {
            self.codes.lock().unwrap().push(exit_code);
            if self.fail {
                Err(PlatformError::call("ExitProcess", "refused"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn first_panic_is_shown_then_shuts_down() {
        let handler =
            UnhandledPanicHandler::new("Modkeep", RecordingNotifier::default(), FakeShutdown::new(false));

        assert_eq!(handler.handle("index out of bounds"), PanicDisposition::ShutDown);

        let shown = handler.notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].severity, Severity::Error);
        assert!(shown[0].body.contains("index out of bounds"));
        assert_eq!(*handler.shutdown.codes.lock().unwrap(), vec![EXIT_UNHANDLED]);
    }

    #[test]
    fn later_panics_pass_through_without_notice() {
        let handler =
            UnhandledPanicHandler::new("Modkeep", RecordingNotifier::default(), FakeShutdown::new(false));

        handler.handle("first");
        assert_eq!(handler.handle("second"), PanicDisposition::PassThrough);
        assert_eq!(handler.notifier.shown.lock().unwrap().len(), 1);
        assert_eq!(handler.shutdown.codes.lock().unwrap().len(), 1);
    }

    #[traced_test]
    #[test]
    fn failed_shutdown_passes_through() {
        let handler =
            UnhandledPanicHandler::new("Modkeep", RecordingNotifier::default(), FakeShutdown::new(true));

        assert_eq!(handler.handle("boom"), PanicDisposition::PassThrough);
        assert!(logs_contain("abnormal shutdown failed"));
    }

    #[test]
    fn payload_message_handles_common_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(payload_message(s.as_ref()), "static str");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(payload_message(owned.as_ref()), "owned");

        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(payload_message(other.as_ref()), "unknown panic payload");
    }

    // The panic hook is process-wide.
    static HOOK_LOCK: Mutex<()> = Mutex::new(());
    static PREVIOUS_HOOK_RAN: AtomicBool = AtomicBool::new(false);

    #[test]
    fn installed_hook_shows_notice_and_chains_when_shutdown_fails() {
        let _lock = HOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        panic::set_hook(Box::new(|_| PREVIOUS_HOOK_RAN.store(true, Ordering::SeqCst)));
        let handler = Arc::new(UnhandledPanicHandler::new(
            "Modkeep",
            RecordingNotifier::default(),
            FakeShutdown::new(true),
        ));
        install(Arc::clone(&handler));

        let result = panic::catch_unwind(|| panic!("worker exploded"));
        let _ = panic::take_hook();

        assert!(result.is_err());
        assert!(PREVIOUS_HOOK_RAN.load(Ordering::SeqCst));

        let shown = handler.notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].body.contains("worker exploded"));
        assert_eq!(*handler.shutdown.codes.lock().unwrap(), vec![EXIT_UNHANDLED]);
    }
}
