//! Paints the main window with the active theme.

use windows::Win32::{
    Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM},
    Graphics::Gdi::{
        COLOR_WINDOW, CreateSolidBrush, DeleteObject, FillRect, GetSysColorBrush, HDC, HGDIOBJ,
        InvalidateRect,
    },
    UI::WindowsAndMessaging::GetClientRect,
};

use super::state::with_state;
use crate::app::colorref_value;

/// `WM_ERASEBKGND`: fills the client area with the theme background, or the
/// system window color when no theme is active.
pub fn on_erase_background(hwnd: HWND, wparam: WPARAM, _lparam: LPARAM) -> LRESULT {
    let hdc = HDC(wparam.0 as *mut core::ffi::c_void);
    let mut rect = RECT::default();

    unsafe {
        let _ = GetClientRect(hwnd, &raw mut rect);
    }

    match with_state(hwnd, |state| state.background()).flatten() {
        Some(color) => unsafe {
            let brush = CreateSolidBrush(COLORREF(colorref_value(color)));
            FillRect(hdc, &raw const rect, brush);
            let _ = DeleteObject(HGDIOBJ::from(brush));
        },
        None => unsafe {
            FillRect(hdc, &raw const rect, GetSysColorBrush(COLOR_WINDOW));
        },
    }

    LRESULT(1)
}

/// Forces a full repaint after the theme changed.
pub fn repaint(hwnd: HWND) {
    unsafe {
        let _ = InvalidateRect(Some(hwnd), None, true);
    }
}
