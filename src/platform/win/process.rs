//! Process enumeration and window activation for handing focus to the
//! instance that is already running.

use modkeep_core::{
    PlatformError,
    instance::{ProcessServices, WindowHandle},
    panic_guard::Shutdown,
};
use windows::{
    Win32::{
        Foundation::{CloseHandle, HWND, LPARAM},
        System::{
            Diagnostics::ToolHelp::{
                CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
                TH32CS_SNAPPROCESS,
            },
            Threading::GetCurrentProcessId,
        },
        UI::WindowsAndMessaging::{
            EnumWindows, GW_OWNER, GetWindow, GetWindowThreadProcessId, IsIconic, IsWindowVisible,
            SW_RESTORE, SetForegroundWindow, ShowWindow,
        },
    },
    core::BOOL,
};

use super::winutil::{last_error, to_platform};

#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Processes;

fn exe_name(entry: &PROCESSENTRY32W) -> String {
    let len = entry
        .szExeFile
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(entry.szExeFile.len());
    String::from_utf16_lossy(&entry.szExeFile[..len])
}

fn hwnd_of(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut core::ffi::c_void)
}

struct WindowSearch {
    pid: u32,
    found: Option<HWND>,
}

/// Stops at the first visible, unowned top-level window of `WindowSearch::pid`.
unsafe extern "system" fn find_main_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let search = unsafe { &mut *(lparam.0 as *mut WindowSearch) };

    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&raw mut pid)) };
    if pid != search.pid {
        return BOOL(1);
    }

    let unowned = unsafe { GetWindow(hwnd, GW_OWNER) }.is_err();
    if unowned && unsafe { IsWindowVisible(hwnd) }.as_bool() {
        search.found = Some(hwnd);
        return BOOL(0);
    }

    BOOL(1)
}

impl ProcessServices for Win32Processes {
    fn current_process_id(&self) -> u32 {
        unsafe { GetCurrentProcessId() }
    }

    fn current_executable_name(&self) -> Result<String, PlatformError> {
        let exe = std::env::current_exe()
            .map_err(|e| PlatformError::call("current_exe", e.to_string()))?;

        exe.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| PlatformError::call("current_exe", "path has no file name"))
    }

    fn processes_named(&self, executable_name: &str) -> Result<Vec<u32>, PlatformError> {
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| to_platform("CreateToolhelp32Snapshot", &e))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut pids = Vec::new();
        let mut more = unsafe { Process32FirstW(snapshot, &raw mut entry) }.is_ok();
        while more {
            if exe_name(&entry).eq_ignore_ascii_case(executable_name) {
                pids.push(entry.th32ProcessID);
            }
            more = unsafe { Process32NextW(snapshot, &raw mut entry) }.is_ok();
        }

        let _ = unsafe { CloseHandle(snapshot) };
        Ok(pids)
    }

    fn main_window(&self, pid: u32) -> Result<Option<WindowHandle>, PlatformError> {
        let mut search = WindowSearch { pid, found: None };

        // EnumWindows reports failure when the callback stops early.
        let _ = unsafe {
            EnumWindows(
                Some(find_main_window),
                LPARAM((&raw mut search) as isize),
            )
        };

        Ok(search.found.map(|hwnd| WindowHandle(hwnd.0 as isize)))
    }

    fn restore(&self, window: WindowHandle) -> Result<(), PlatformError> {
        let hwnd = hwnd_of(window);
        if unsafe { IsIconic(hwnd) }.as_bool() {
            // ShowWindow returns the previous visibility, not an error.
            let _ = unsafe { ShowWindow(hwnd, SW_RESTORE) };
        }
        Ok(())
    }

    fn bring_to_foreground(&self, window: WindowHandle) -> Result<(), PlatformError> {
        if unsafe { SetForegroundWindow(hwnd_of(window)) }.as_bool() {
            Ok(())
        } else {
            Err(to_platform("SetForegroundWindow", &last_error()))
        }
    }
}

/// Ends the process immediately with the given exit code.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Shutdown for ProcessExit {
    fn shutdown(&self, exit_code: i32) -> Result<(), PlatformError> {
        std::process::exit(exit_code)
    }
}
