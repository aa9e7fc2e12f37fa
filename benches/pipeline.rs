use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motion_diff::capture::{CaptureConfig, FrameSource, MockCamera, PipelineConfig};
use motion_diff::processing::{FrameDecoder, Pipeline};

fn bench_pipeline(c: &mut Criterion) {
    let mut camera = MockCamera::new();
    camera
        .open(&CaptureConfig::with_dimensions(640, 480))
        .expect("mock camera opens");
    let frames: Vec<_> = (0..8)
        .map(|_| camera.capture().expect("mock camera captures"))
        .collect();

    c.bench_function("decode_640x480", |b| {
        let decoder = FrameDecoder::default();
        b.iter(|| decoder.decode(black_box(&frames[0])))
    });

    c.bench_function("pipeline_640x480", |b| {
        let mut pipeline = Pipeline::new(&PipelineConfig::default());
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % frames.len();
            pipeline.process(black_box(&frames[i]))
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
