use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::io::AsyncReadExt;
use tokio_multipart::multipart::Reader;
use tokio_multipart::parse_media_type;

const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

fn build_document(num_parts: usize, body_len: usize) -> Vec<u8> {
    let body = "x".repeat(body_len);
    let mut data = String::new();
    for i in 0..num_parts {
        data.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"field{i}\"; filename=\"f{i}.bin\"\r\n\r\n{body}\r\n"
        ));
    }
    data.push_str(&format!("--{BOUNDARY}--\r\n"));
    data.into_bytes()
}

// Benchmark Content-Disposition parsing
fn bench_parse_media_type(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_media_type");

    let test_cases = vec![
        ("bare", "form-data"),
        ("with_name", "form-data; name=\"field1\""),
        ("with_filename", "form-data; name=\"upload\"; filename=\"my document (draft).txt\""),
    ];

    for (name, input) in test_cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, &input| {
            b.iter(|| parse_media_type(black_box(input)));
        });
    }

    group.finish();
}

// Benchmark streaming part bodies through the reader
fn bench_multipart_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("multipart_read");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for body_len in [1_024usize, 102_400, 1_048_576] {
        let data = build_document(4, body_len);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("read_bodies", body_len), &data, |b, data| {
            b.to_async(&rt).iter(|| async move {
                let mut reader = Reader::new(black_box(&data[..]), BOUNDARY);
                let mut buf = vec![0u8; 8192];
                let mut total = 0;
                while let Some(mut part) = reader.next_part().await.unwrap() {
                    loop {
                        let n = part.read(&mut buf).await.unwrap();
                        if n == 0 {
                            break;
                        }
                        total += n;
                    }
                }
                total
            });
        });

        group.bench_with_input(BenchmarkId::new("skip_bodies", body_len), &data, |b, data| {
            b.to_async(&rt).iter(|| async move {
                let mut reader = Reader::new(black_box(&data[..]), BOUNDARY);
                let mut parts = 0;
                while let Some(_part) = reader.next_part().await.unwrap() {
                    parts += 1;
                }
                parts
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_media_type, bench_multipart_read);

criterion_main!(benches);
