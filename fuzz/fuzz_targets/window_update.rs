#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let entries: Vec<Option<u16>> = data
        .chunks(3)
        .take(4096)
        .map(|chunk| match chunk {
            [flag, high, low] if flag % 4 != 0 => Some(u16::from_be_bytes([*high, *low])),
            _ => None,
        })
        .collect();
    let (observed, errors, latencies) = barrage::fuzzing::record_window_input(&entries);
    debug_assert_eq!(observed, entries.len() as u64);
    debug_assert_eq!(errors + latencies as u64, observed);
});
