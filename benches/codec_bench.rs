use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use game_protocol::core::codec::{Array, Codec, Endian, Float32, Utf8String, VarLong, Vector3, ZigZong};
use game_protocol::core::types::Vec3f;

#[allow(clippy::unwrap_used)]
fn bench_varints(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    let samples: [(&str, u64); 4] = [
        ("1b", 100),
        ("3b", 100_000),
        ("5b", u32::MAX as u64),
        ("10b", u64::MAX),
    ];

    for (label, value) in samples {
        let mut encoded = BytesMut::new();
        VarLong.encode(&value, &mut encoded).unwrap();

        group.bench_function(format!("encode_{label}"), |b| {
            let mut buf = BytesMut::with_capacity(16);
            b.iter(|| {
                buf.clear();
                VarLong.encode(black_box(&value), &mut buf).unwrap();
            })
        });
        group.bench_function(format!("decode_{label}"), |b| {
            b.iter(|| {
                let mut cursor = &encoded[..];
                VarLong.decode(black_box(&mut cursor)).unwrap()
            })
        });
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_composites(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");

    let position = Vec3f::new(128.5, 64.0, -900.25);
    group.bench_function("vector3_roundtrip", |b| {
        let mut buf = BytesMut::with_capacity(12);
        b.iter(|| {
            buf.clear();
            Vector3.encode(black_box(&position), &mut buf).unwrap();
            Vector3.decode(&mut &buf[..]).unwrap()
        })
    });

    let floats = Array::new(Float32(Endian::Big));
    let samples: Vec<f32> = (0..1024).map(|i| i as f32 * 0.25).collect();
    group.throughput(Throughput::Elements(samples.len() as u64));
    group.bench_function("array_f32_1024_roundtrip", |b| {
        let mut buf = BytesMut::with_capacity(4 * 1024 + 4);
        b.iter(|| {
            buf.clear();
            floats.encode(black_box(&samples), &mut buf).unwrap();
            floats.decode(&mut &buf[..]).unwrap()
        })
    });

    let deltas = Array::new(ZigZong);
    let ticks: Vec<i64> = (0..1024).map(|i| if i % 2 == 0 { i } else { -i }).collect();
    group.bench_function("array_zigzong_1024_roundtrip", |b| {
        let mut buf = BytesMut::new();
        b.iter(|| {
            buf.clear();
            deltas.encode(black_box(&ticks), &mut buf).unwrap();
            deltas.decode(&mut &buf[..]).unwrap()
        })
    });

    let text = "chat message ".repeat(64);
    let strings = Utf8String::default();
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("string_832b_roundtrip", |b| {
        let mut buf = BytesMut::new();
        b.iter(|| {
            buf.clear();
            strings.encode(black_box(&text), &mut buf).unwrap();
            strings.decode(&mut &buf[..]).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_varints, bench_composites);
criterion_main!(benches);
