#![no_main]

use libfuzzer_sys::fuzz_target;
use barrage::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let parsed: Option<ConfigFile> = serde_json::from_slice(data).ok();
    let applied = barrage::fuzzing::apply_config_from_json(data);
    if applied.is_ok() {
        if let Some(config) = parsed {
            debug_assert!(config.data.is_none() || config.data_lines.is_none());
            if let Some(concurrency) = config.concurrency {
                debug_assert!(concurrency >= 1);
            }
        }
    }
});
