//! Fuzz target for manifest (JSON Lines) parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run manifest_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use gt2coco::manifest::read_manifest;

fuzz_target!(|data: &[u8]| {
    // Manifests of many megabytes exist, but larger inputs add nothing here.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(records) = read_manifest(data) {
        for record in &records {
            let _ = record.source_ref();
        }
    }
});
