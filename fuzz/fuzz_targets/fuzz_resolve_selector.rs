#![no_main]

use fieldcheck::Value;
use fieldcheck::primitives::{resolve_selector, resolve_simple_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split between selector and JSON data.
    let split = data[0] as usize % data.len().max(1);
    let (selector_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let selector = String::from_utf8_lossy(selector_bytes);

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(value_bytes) {
        let value = Value::from(value);
        let _ = resolve_simple_path(&selector, &value);
        let targets = resolve_selector(&selector, &value);
        if !selector.contains('*') {
            assert_eq!(targets.len(), 1);
        }
    }
});
