//! Named Win32 mutex backing the single-instance guard.

use modkeep_core::{
    PlatformError,
    instance::{LockAttempt, LockHandle, NamedLock},
};
use windows::{
    Win32::{
        Foundation::{CloseHandle, ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, GetLastError, HANDLE},
        System::Threading::{CreateMutexW, ReleaseMutex},
    },
    core::HSTRING,
};

use super::winutil::to_platform;

#[derive(Debug, Default, Clone, Copy)]
pub struct Win32NamedMutex;

/// Owned mutex handle. Release unlocks the mutex and closes the handle.
#[derive(Debug)]
pub struct MutexHandle(HANDLE);

impl LockHandle for MutexHandle {
    fn release(&mut self) -> Result<(), PlatformError> {
        if self.0.is_invalid() {
            return Ok(());
        }

        let handle = std::mem::take(&mut self.0);
        let released = unsafe { ReleaseMutex(handle) };
        let closed = unsafe { CloseHandle(handle) };

        released.map_err(|e| to_platform("ReleaseMutex", &e))?;
        closed.map_err(|e| to_platform("CloseHandle", &e))
    }
}

impl NamedLock for Win32NamedMutex {
    type Handle = MutexHandle;

    fn try_acquire(&self, name: &str) -> Result<LockAttempt<MutexHandle>, PlatformError> {
        let name = HSTRING::from(name);

        let handle = match unsafe { CreateMutexW(None, true, &name) } {
            Ok(h) => h,
            // A mutex created by another user session is visible but not openable.
            Err(e) if e.code() == ERROR_ACCESS_DENIED.to_hresult() => {
                return Ok(LockAttempt::Contended);
            }
            Err(e) => return Err(to_platform("CreateMutexW", &e)),
        };

        if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
            // Opened the existing mutex without owning it.
            let _ = unsafe { CloseHandle(handle) };
            return Ok(LockAttempt::Contended);
        }

        Ok(LockAttempt::Acquired(MutexHandle(handle)))
    }
}
