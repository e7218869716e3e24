use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jls_convert::image_pipeline::{
    ChannelOrder, ChannelReorderer, EncodeOrchestrator, JpeglsEncoder, PixelBuffer,
    raster::dib::dib_stride,
};

fn generate_mock_buffer(width: usize, height: usize) -> PixelBuffer {
    let stride = dib_stride(width);
    let mut data = vec![0u8; stride * height];
    for y in 0..height {
        for x in 0..width {
            let base = y * stride + x * 3;
            data[base] = ((x + y) % 256) as u8;
            data[base + 1] = (x % 256) as u8;
            data[base + 2] = (y % 256) as u8;
        }
    }
    PixelBuffer {
        width,
        height,
        stride: stride as isize,
        channel_order: ChannelOrder::Bgr,
        data,
    }
}

fn benchmark_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder_by_size");

    let sizes = vec![
        (100, 100, "100x100"),
        (501, 501, "501x501"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let mut buffer = generate_mock_buffer(width, height);
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| ChannelReorderer::reorder_to_target_color_order(black_box(&mut buffer)));
        });
    }

    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpegls_encode_by_size");
    let orchestrator = EncodeOrchestrator::new(JpeglsEncoder);

    for (width, height, label) in [(100, 100, "100x100"), (500, 500, "500x500")] {
        let buffer = generate_mock_buffer(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &buffer, |b, buffer| {
            b.iter(|| orchestrator.encode(black_box(buffer)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_reorder, benchmark_encode);
criterion_main!(benches);
