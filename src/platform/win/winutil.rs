use modkeep_core::PlatformError;
use windows::{
    Win32::Foundation::GetLastError,
    core::{Error, HRESULT},
};

/// Retrieve the last OS error as a `windows::core::Error`.
pub fn last_error() -> Error {
    Error::from_hresult(HRESULT::from_win32(unsafe { GetLastError() }.0))
}

/// Converts a Win32 failure into the error type used at the core trait seams.
pub fn to_platform(operation: &'static str, e: &Error) -> PlatformError {
    PlatformError::call(operation, format!("{e} ({:#010x})", e.code().0))
}

/// Converts a core error into a Win32 error so it can leave `main`.
pub fn from_platform(e: &PlatformError) -> Error {
    Error::new(HRESULT(0x8000_4005_u32.cast_signed()), e.to_string())
}
