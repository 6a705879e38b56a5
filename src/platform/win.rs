//! Win32 side of the application: the instance lock, the notices, the main
//! window and its message loop.

mod notice;
mod process;
mod single_instance;
mod state;
mod themes;
mod window;
mod winutil;

use std::sync::Arc;

use modkeep_core::{
    instance::{Acquisition, InstanceGuard, InstanceOwner, abort_duplicate_launch},
    panic_guard::{self, UnhandledPanicHandler},
};
use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::UpdateWindow,
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Input::KeyboardAndMouse::VK_F5,
            WindowsAndMessaging::{
                DefWindowProcW, GWLP_USERDATA, GetWindowLongPtrW, PostMessageW, PostQuitMessage,
                SW_SHOWNORMAL, SetWindowLongPtrW, ShowWindow, WM_APP, WM_DESTROY, WM_ERASEBKGND,
                WM_KEYDOWN, WM_NCDESTROY, WS_OVERLAPPEDWINDOW,
            },
        },
    },
    core::{PCWSTR, Result, w},
};

pub use self::{
    notice::MessageBoxNotifier,
    process::{ProcessExit, Win32Processes},
    single_instance::{MutexHandle, Win32NamedMutex},
};
use self::{
    state::with_state_mut,
    themes::{on_erase_background, repaint},
    window::{create_main_window, message_loop, register_main_class},
};
use crate::{
    app::{APP_NAME, AppState, INSTANCE_LOCK_NAME},
    config::ConfigThemeProvider,
};

/// Posted to the main window to re-read the configuration and swap the
/// theme live.
pub const WM_APP_APPLY_THEME: u32 = WM_APP + 1;

/// Routes the first panic to a message box followed by an abnormal exit.
pub fn install_panic_handler() {
    let handler = UnhandledPanicHandler::new(APP_NAME, MessageBoxNotifier, ProcessExit);
    panic_guard::install(Arc::new(handler));
}

/// Acquire the single instance mutex.
///
/// If another instance owns it, the user is told, the running instance is
/// brought to the front and this process exits. On success the returned
/// owner releases the mutex when dropped.
pub fn single_instance_guard() -> Result<InstanceOwner<MutexHandle>> {
    let guard = InstanceGuard::new(Win32NamedMutex, INSTANCE_LOCK_NAME);

    match guard.acquire() {
        Ok(Acquisition::Acquired(owner)) => Ok(owner),
        Ok(Acquisition::AlreadyRunning) => {
            let code = abort_duplicate_launch(APP_NAME, &MessageBoxNotifier, &Win32Processes);
            std::process::exit(code);
        }
        Err(e) => {
            tracing::error!(error = %e, "single instance check failed");
            Err(winutil::from_platform(&e))
        }
    }
}

/// Asks the main window to reload its theme from configuration.
pub fn request_theme_reload(hwnd: HWND) -> Result<()> {
    unsafe { PostMessageW(Some(hwnd), WM_APP_APPLY_THEME, WPARAM(0), LPARAM(0)) }
}

/// Start the main window and enter the message loop.
///
/// Called from `main` after the single instance guard has been acquired.
/// The theme is applied before the window is first shown.
pub fn run(provider: ConfigThemeProvider) -> Result<()> {
    let state = Box::new(AppState::start(provider));

    unsafe {
        let class_name: PCWSTR = w!("ModkeepMainWindow");
        let hinstance = GetModuleHandleW(PCWSTR::null())?.into();

        register_main_class(class_name, hinstance)?;
        let hwnd = create_main_window(class_name, hinstance, APP_NAME, WS_OVERLAPPEDWINDOW)?;

        // Owned by the window from here on; freed in WM_NCDESTROY.
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);

        let _ = ShowWindow(hwnd, SW_SHOWNORMAL);
        let _ = UpdateWindow(hwnd);

        message_loop()
    }
}

fn on_apply_theme(hwnd: HWND) -> LRESULT {
    if with_state_mut(hwnd, |state| state.reload_theme()).is_some() {
        repaint(hwnd);
    }
    LRESULT(0)
}

unsafe fn on_ncdestroy(hwnd: HWND) -> LRESULT {
    let p = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut AppState;
    if !p.is_null() {
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(p));
        }
    }
    LRESULT(0)
}

/// The window procedure. Unhandled messages go to the default procedure.
pub extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_ERASEBKGND => on_erase_background(hwnd, wparam, lparam),
        WM_APP_APPLY_THEME => on_apply_theme(hwnd),
        WM_KEYDOWN if wparam.0 == usize::from(VK_F5.0) => {
            if let Err(e) = request_theme_reload(hwnd) {
                tracing::warn!(error = ?e, "PostMessageW(WM_APP_APPLY_THEME) failed");
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        WM_NCDESTROY => unsafe { on_ncdestroy(hwnd) },
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
