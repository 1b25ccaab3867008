//! # Links Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | link-crypto | secp256k1 verify, address derivation |
//! | codec | envelope encode/decode |
//! | receive | full self-link and connection validation + store |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ibc_links::{
    build_connection_packet, build_link_packet, Height, IbcModule, InMemoryKVStore,
    InMemorySubstrate, LinksConfig, LinksModule, LinksPacketData, Packet, PacketCodec,
};
use link_crypto::{derive_address, verify, Secp256k1KeyPair};
use std::time::Duration;

fn inbound(codec: &PacketCodec, data: &LinksPacketData, sequence: u64) -> Packet {
    Packet {
        sequence,
        source_port: "links".to_string(),
        source_channel: "channel-0".to_string(),
        destination_port: "links".to_string(),
        destination_channel: "channel-0".to_string(),
        data: codec.encode_packet(data).unwrap(),
        timeout_height: Height::zero(),
        timeout_timestamp: 1,
    }
}

fn bench_crypto(c: &mut Criterion) {
    let mut group = c.benchmark_group("link-crypto");
    group.measurement_time(Duration::from_secs(5));

    let keypair = Secp256k1KeyPair::generate();
    let public_key = keypair.public_key();
    let message = derive_address(&public_key, "cosmos").unwrap();
    let signature = keypair.sign(message.as_bytes());

    group.bench_function("verify", |b| {
        b.iter(|| verify(black_box(&public_key), message.as_bytes(), signature.as_bytes()))
    });
    group.bench_function("derive_address", |b| {
        b.iter(|| derive_address(black_box(&public_key), "cosmos"))
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = PacketCodec::new();

    let source = Secp256k1KeyPair::generate();
    let destination = Secp256k1KeyPair::generate();
    let packets: Vec<(&str, LinksPacketData)> = vec![
        ("link", build_link_packet(&source, "cosmos").unwrap().into()),
        (
            "connection",
            build_connection_packet(&source, "cosmos", &destination, "desmos")
                .unwrap()
                .into(),
        ),
    ];

    for (name, data) in &packets {
        let bytes = codec.encode_packet(data).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", name), data, |b, data| {
            b.iter(|| codec.encode_packet(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("decode", name), &bytes, |b, bytes| {
            b.iter(|| codec.decode_packet(black_box(bytes)))
        });
    }

    group.finish();
}

fn bench_receive(c: &mut Criterion) {
    let mut group = c.benchmark_group("receive");
    group.measurement_time(Duration::from_secs(10));
    let codec = PacketCodec::new();

    group.bench_function("self_link", |b| {
        b.iter_batched(
            || {
                let chain = InMemorySubstrate::new();
                let module = LinksModule::new(
                    LinksConfig::default(),
                    codec,
                    chain.substrate(),
                    InMemoryKVStore::new(),
                )
                .unwrap();
                let data: LinksPacketData =
                    build_link_packet(&Secp256k1KeyPair::generate(), "cosmos")
                        .unwrap()
                        .into();
                (module, inbound(&codec, &data, 1))
            },
            |(mut module, packet)| module.on_recv_packet(&packet),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("connection", |b| {
        b.iter_batched(
            || {
                let chain = InMemorySubstrate::new();
                let source = Secp256k1KeyPair::generate();
                let destination = Secp256k1KeyPair::generate();
                let data =
                    build_connection_packet(&source, "cosmos", &destination, "desmos").unwrap();
                chain
                    .accounts
                    .set_account(&data.destination_address, Some(destination.public_key()));
                let module = LinksModule::new(
                    LinksConfig::default(),
                    codec,
                    chain.substrate(),
                    InMemoryKVStore::new(),
                )
                .unwrap();
                (module, inbound(&codec, &data.into(), 1))
            },
            |(mut module, packet)| module.on_recv_packet(&packet),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_crypto, bench_codec, bench_receive);
criterion_main!(benches);
