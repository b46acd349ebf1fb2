#![no_main]

use game_protocol::core::codec::CodecLimits;
use game_protocol::core::field::FieldKind;
use game_protocol::Endian;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Hostile length prefixes must fail cleanly, never allocate unbounded
    let limits = CodecLimits::default();
    let kinds = [
        FieldKind::String,
        FieldKind::array(FieldKind::ZigZong),
        FieldKind::array(FieldKind::array(FieldKind::Float32(Endian::Big))),
        FieldKind::BlockPosition,
        FieldKind::Vector3f,
        FieldKind::VarLong,
    ];
    for kind in &kinds {
        let mut cursor = data;
        let _ = kind.decode(&mut cursor, &limits);
    }
});
