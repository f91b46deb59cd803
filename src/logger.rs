use log::LevelFilter;

/// Map a `-v` count to a level: warnings by default, then info, then debug.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install `env_logger` on stderr for this crate's own log output.
pub fn init(verbosity: u8) {
    env_logger::Builder::new()
        .filter_module(env!("CARGO_CRATE_NAME"), level_for(verbosity))
        .format_timestamp(None)
        .init();
}
