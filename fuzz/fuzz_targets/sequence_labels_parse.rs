//! Fuzz target for video sequence label files.
//!
//! Run with:
//!   cargo +nightly fuzz run sequence_labels_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use gt2coco::manifest::read_sequence_labels;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(labels) = read_sequence_labels(data, "fuzz") {
        for frame in &labels.frames {
            for object in &frame.annotations {
                let _ = object.label();
            }
        }
    }
});
