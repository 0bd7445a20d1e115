//! Base data directory resolution. Threaded through as a single explicit
//! value from here on, per the core's "pass it as a dependency" rule — this
//! module's only job is reading the one process-global environment
//! variable that names it.

use std::path::PathBuf;

const ENV_VAR: &str = "CALC_DATA_DIR";
const DEFAULT_DIR: &str = "data";

pub fn base_dir() -> PathBuf {
    std::env::var(ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DIR))
}
