#![allow(dead_code)]

use opsem_flat::{FlatBus, FlatBusOptions};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn bus(size: usize) -> FlatBus {
    init_tracing();
    FlatBus::new(size).unwrap()
}

pub fn recording_bus(size: usize) -> FlatBus {
    init_tracing();
    FlatBus::with_options(FlatBusOptions {
        size,
        record_intrinsics: true,
        ..FlatBusOptions::default()
    })
    .unwrap()
}
