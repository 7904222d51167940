use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use shardnet::config::{BLOCK_SIZE, PROTOCOL_VERSION};
use shardnet::crypto::{RecvCipher, SendCipher};

#[allow(clippy::unwrap_used)]
fn bench_cipher_encrypt_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("cipher_encrypt_decrypt");
    let frame_sizes = [16usize, 64, 512, 4096, 65536];

    for &size in &frame_sizes {
        let mut frame = vec![0u8; size];
        frame[0] = 0x01; // opcode prefix

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encrypt_{size}b"), |b| {
            let mut send = SendCipher::new(PROTOCOL_VERSION, 0x1234_5678, BLOCK_SIZE);
            b.iter(|| send.encrypt(&frame))
        });
        group.bench_function(format!("decrypt_{size}b"), |b| {
            let mut send = SendCipher::new(PROTOCOL_VERSION, 0x1234_5678, BLOCK_SIZE);
            let wire = send.encrypt(&frame);
            let body = wire[6..].to_vec();
            // Fresh generation-zero state and body copy per iteration, built
            // outside the timed closure so only the keystream is measured.
            b.iter_batched(
                || {
                    (
                        RecvCipher::new(PROTOCOL_VERSION, 0x1234_5678, BLOCK_SIZE),
                        body.clone(),
                    )
                },
                |(mut cipher, mut body)| {
                    cipher.decrypt(&mut body);
                    body
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cipher_encrypt_decrypt);
criterion_main!(benches);
