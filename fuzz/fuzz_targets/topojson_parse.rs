//! Fuzz target for TopoJSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the TopoJSON reader,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use topopack::ir::io_topojson::from_topojson_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_topojson_slice(data);
});
