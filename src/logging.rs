use log::LevelFilter;

/// "debug", "warn", ... ; anything unrecognized means info.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

#[cfg(target_arch = "wasm32")]
fn install(filter: LevelFilter) {
    let level = filter.to_level().unwrap_or(log::Level::Error);
    if console_log::init_with_level(level).is_err() {
        log::debug!("Logger already installed");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install(_filter: LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Trace)
        .try_init();
}

/// Install the browser console logger on wasm, `env_logger` elsewhere.
/// Later calls only change the level.
pub fn init(filter: LevelFilter) {
    install(filter);
    log::set_max_level(filter);
}
