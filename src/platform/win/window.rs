use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, RECT},
        UI::WindowsAndMessaging::{
            AdjustWindowRectEx, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, CreateWindowExW,
            DispatchMessageW, GetMessageW, HCURSOR, IDC_ARROW, LoadCursorW, MSG, RegisterClassExW,
            TranslateMessage, WINDOW_EX_STYLE, WINDOW_STYLE, WNDCLASSEXW,
        },
    },
    core::{HSTRING, PCWSTR, Result},
};

use super::winutil::last_error;

pub(crate) fn register_main_class(class_name: PCWSTR, hinstance: HINSTANCE) -> Result<()> {
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or(HCURSOR::default());

    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(super::wndproc),
        lpszClassName: class_name,
        hInstance: hinstance,
        hCursor: cursor,
        ..Default::default()
    };

    unsafe {
        if RegisterClassExW(&raw const wc) == 0 {
            return Err(last_error());
        }
    }
    Ok(())
}

pub(crate) fn compute_window_size(style: WINDOW_STYLE) -> Result<(i32, i32)> {
    const CLIENT_W: i32 = 1100;
    const CLIENT_H: i32 = 700;

    let mut rect = RECT {
        left: 0,
        top: 0,
        right: CLIENT_W,
        bottom: CLIENT_H,
    };

    unsafe { AdjustWindowRectEx(&raw mut rect, style, false, WINDOW_EX_STYLE(0))? };

    Ok((rect.right - rect.left, rect.bottom - rect.top))
}

pub(crate) fn create_main_window(
    class_name: PCWSTR,
    hinstance: HINSTANCE,
    title: &str,
    style: WINDOW_STYLE,
) -> Result<HWND> {
    let (window_w, window_h) = compute_window_size(style)?;

    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class_name,
            &HSTRING::from(title),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_w,
            window_h,
            None,
            None,
            Some(hinstance),
            None,
        )
    }
}

pub(crate) fn message_loop() -> Result<()> {
    unsafe {
        let mut msg = MSG::default();
        loop {
            let r = GetMessageW(&raw mut msg, None, 0, 0);
            if r.0 == -1 {
                return Err(last_error());
            }
            if r.0 == 0 {
                break;
            }
            let _ = TranslateMessage(&raw const msg);
            DispatchMessageW(&raw const msg);
        }
    }
    Ok(())
}
