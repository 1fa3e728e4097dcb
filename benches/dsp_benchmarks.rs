//! Benchmarks for the effect modules and the full pipeline.
//!
//! Run with: cargo bench
//!
//! At 44.1 kHz a 64-frame buffer leaves a 1.45 ms deadline.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pedalboard::dsp::{
    Delay, DelayParams, Distortion, DriveParams, Effect, Filter, FilterParams, FilterType, PitchShiftParams,
    PitchShifter,
};
use pedalboard::engine::{AudioBuffer, Pipeline, SignalFormat};
use pedalboard::source::{Oscillator, OscillatorConfig, Waveform};

const BUFFER_SIZES: &[usize] = &[64, 256, 1024];

fn sine_buffer(size: usize) -> AudioBuffer {
    let mut buffer = AudioBuffer::new(size, 2);
    for ch in 0..2 {
        for (i, s) in buffer.channel_mut(ch).iter_mut().enumerate() {
            *s = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin();
        }
    }
    buffer
}

fn bench_module(c: &mut Criterion, group_name: &str, mut build: impl FnMut(SignalFormat) -> Box<dyn Effect>) {
    let mut group = c.benchmark_group(group_name);
    for &size in BUFFER_SIZES {
        let format = SignalFormat::stereo(44100, size).unwrap();
        let input = sine_buffer(size);
        let mut buffer = input.clone();
        let mut effect = build(format);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from(&input);
                effect.process(black_box(&mut buffer));
            })
        });
    }
    group.finish();
}

fn bench_distortion(c: &mut Criterion) {
    bench_module(c, "dsp/distortion", |format| {
        Box::new(Distortion::new(format, DriveParams::new(12.0)))
    });
}

fn bench_filter(c: &mut Criterion) {
    bench_module(c, "dsp/filter_lp12", |format| {
        Box::new(Filter::new(format, FilterParams::new(FilterType::LowPass, 3000.0, 1.14, 12)).unwrap())
    });
    bench_module(c, "dsp/filter_lp24", |format| {
        Box::new(Filter::new(format, FilterParams::new(FilterType::LowPass, 3000.0, 1.14, 24)).unwrap())
    });
}

fn bench_delay(c: &mut Criterion) {
    bench_module(c, "dsp/delay", |format| {
        Box::new(Delay::new(format, DelayParams::new(250.0, 0.5)).unwrap())
    });
}

fn bench_pitch_shift(c: &mut Criterion) {
    bench_module(c, "dsp/pitch_shift", |format| {
        Box::new(PitchShifter::new(format, PitchShiftParams::new(1.5, true)).unwrap())
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pipeline");
    for &size in BUFFER_SIZES {
        let format = SignalFormat::new(44100, 16, 1, size).unwrap();
        let osc = Oscillator::new(OscillatorConfig::new(Waveform::Sine, 1000.0), format).unwrap();
        let mut pipeline = Pipeline::new(osc);
        pipeline.add_module(Distortion::new(format, DriveParams::new(12.0))).unwrap();
        pipeline
            .add_module(Filter::new(format, FilterParams::new(FilterType::LowPass, 3000.0, 1.14, 12)).unwrap())
            .unwrap();

        group.bench_with_input(BenchmarkId::new("distortion_filter", size), &size, |b, _| {
            b.iter(|| black_box(pipeline.run()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_distortion,
    bench_filter,
    bench_delay,
    bench_pitch_shift,
    bench_pipeline
);
criterion_main!(benches);
