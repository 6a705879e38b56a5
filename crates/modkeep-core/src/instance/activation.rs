//! Best-effort hand-off of focus to an instance that is already running.

use crate::error::PlatformError;

/// Opaque top-level window handle as reported by the OS.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Process and window services needed to activate another instance.
pub trait ProcessServices {
    fn current_process_id(&self) -> u32;

    /// File name of the running executable, e.g. `modkeep.exe`.
    fn current_executable_name(&self) -> Result<String, PlatformError>;

    fn processes_named(&self, executable_name: &str) -> Result<Vec<u32>, PlatformError>;

    fn main_window(&self, pid: u32) -> Result<Option<WindowHandle>, PlatformError>;

    fn restore(&self, window: WindowHandle) -> Result<(), PlatformError>;

    fn bring_to_foreground(&self, window: WindowHandle) -> Result<(), PlatformError>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Activation {
    Activated { pid: u32, window: WindowHandle },
    NoPeerProcess,
    NoPeerWindow,
}

/// Finds the first other process with the same executable name that owns a
/// top-level window, then restores and foregrounds that window.
pub fn forward_activation(services: &dyn ProcessServices) -> Result<Activation, PlatformError> {
    let own_pid = services.current_process_id();
    let exe = services.current_executable_name()?;

    let peers: Vec<u32> = services
        .processes_named(&exe)?
        .into_iter()
        .filter(|pid| *pid != own_pid)
        .collect();

    if peers.is_empty() {
        return Ok(Activation::NoPeerProcess);
    }

    let target = peers.iter().find_map(|&pid| match services.main_window(pid) {
        Ok(Some(window)) if !window.is_null() => Some((pid, window)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(pid, error = %e, "skipping peer without readable window");
            None
        }
    });

    let Some((pid, window)) = target else {
        return Ok(Activation::NoPeerWindow);
    };

    services.restore(window)?;
    services.bring_to_foreground(window)?;

    Ok(Activation::Activated { pid, window })
}
