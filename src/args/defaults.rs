pub(crate) const DEFAULT_USER_AGENT: &str = concat!("barrage/", env!("CARGO_PKG_VERSION"));

/// Default config filenames checked in the working directory.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["barrage.toml", "barrage.json"];
