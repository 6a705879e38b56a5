#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![cfg_attr(not(windows), allow(dead_code))]

use crate::utils::tracing::init_tracing;

mod app;
mod config;
mod platform;
mod utils;

#[cfg(windows)]
fn main() -> windows::core::Result<()> {
    init_tracing();
    platform::win::install_panic_handler();

    let mut instance = platform::win::single_instance_guard()?;

    let result = platform::win::run(config::ConfigThemeProvider::new());

    instance.release();
    result
}

#[cfg(not(windows))]
fn main() {
    init_tracing();
    tracing::error!("{} only runs on Windows", app::APP_NAME);
    std::process::exit(1);
}
