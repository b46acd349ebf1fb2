#![no_main]

use game_protocol::protocol::dispatcher::Dispatcher;
use game_protocol::protocol::registry::RegistryBuilder;
use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let dispatcher = DISPATCHER.get_or_init(|| {
        let registry = RegistryBuilder::with_standard_packets().unwrap().build();
        Dispatcher::new(Arc::new(registry))
    });

    // Anything that decodes must re-encode, and the minimal encoding is a fixed point
    if let Ok(packet) = dispatcher.dispatch(data) {
        let bytes = dispatcher.encode(&packet).unwrap();
        let again = dispatcher.dispatch(&bytes).unwrap();
        assert_eq!(dispatcher.encode(&again).unwrap(), bytes);
    }
});
