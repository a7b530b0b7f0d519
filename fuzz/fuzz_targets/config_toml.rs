#![no_main]

use libfuzzer_sys::fuzz_target;
use barrage::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let parsed: Option<ConfigFile> = toml::from_str(input).ok();
        let applied = barrage::fuzzing::apply_config_from_toml(input);
        if applied.is_ok() {
            if let Some(config) = parsed {
                debug_assert!(config.data.is_none() || config.data_lines.is_none());
                if let Some(concurrency) = config.concurrency {
                    debug_assert!(concurrency >= 1);
                }
            }
        }
    }
});
