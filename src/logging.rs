use env_logger::Env;
use log::LevelFilter;

/// Install env_logger. Records are filtered through `log::max_level`, which
/// `set_verbose` adjusts once the stored settings are known.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .format_timestamp_millis()
        .init();
}

/// Debug output when verbose, warnings only otherwise. An explicit
/// `RUST_LOG` always wins.
pub fn set_verbose(verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}
