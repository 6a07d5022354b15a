use log::{Level, LevelFilter};

/// Unknown names fall back to `info`.
pub(crate) fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Route the `log` macros to the browser devtools console.
///
/// `off` has no console level of its own; it keeps the logger installed and
/// silences it through the global max level instead.
pub(crate) fn init(level: &str) {
    let filter = parse_level(level);
    wasm_logger::init(wasm_logger::Config::new(filter.to_level().unwrap_or(Level::Info)));
    log::set_max_level(filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_any_case() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }

    #[test]
    fn test_off_still_maps_to_a_console_level() {
        assert_eq!(parse_level("off").to_level(), None);
        assert_eq!(parse_level("trace").to_level(), Some(Level::Trace));
    }
}
