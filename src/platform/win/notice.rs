use modkeep_core::{
    PlatformError,
    notice::{Notice, Notifier, Severity},
};
use windows::{
    Win32::UI::WindowsAndMessaging::{
        MB_ICONERROR, MB_ICONINFORMATION, MB_ICONWARNING, MB_OK, MB_SETFOREGROUND, MB_TOPMOST,
        MESSAGEBOX_STYLE, MessageBoxW,
    },
    core::HSTRING,
};

use super::winutil::{last_error, to_platform};

/// Modal notices shown with `MessageBoxW`.
///
/// A message box offers a single "OK" button; a custom confirm label is
/// logged but cannot be displayed.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBoxNotifier;

fn icon(severity: Severity) -> MESSAGEBOX_STYLE {
    match severity {
        Severity::Info => MB_ICONINFORMATION,
        Severity::Warning => MB_ICONWARNING,
        Severity::Error => MB_ICONERROR,
    }
}

impl Notifier for MessageBoxNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), PlatformError> {
        if let Some(label) = notice.confirm_label.as_deref()
            && label != "OK"
        {
            tracing::trace!(%label, "message box cannot relabel its button");
        }

        let r = unsafe {
            MessageBoxW(
                None,
                &HSTRING::from(notice.body.as_str()),
                &HSTRING::from(notice.title.as_str()),
                MB_OK | MB_SETFOREGROUND | MB_TOPMOST | icon(notice.severity),
            )
        };

        if r.0 == 0 {
            return Err(to_platform("MessageBoxW", &last_error()));
        }
        Ok(())
    }
}
