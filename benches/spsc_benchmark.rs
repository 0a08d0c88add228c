/// RingBuffer performance benchmark
///
/// 对比内联存储的 RingBuffer 与 rtrb 的性能
///
/// 重点测试：
/// 1. new() 创建性能（内联存储无堆分配）
/// 2. push/pop 吞吐性能
/// 3. 跨线程生产者-消费者吞吐
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use staticring::{RingBuffer, spsc};
use std::hint::black_box;
use std::time::Duration;

/// Benchmark: RingBuffer creation performance
///
/// 对比不同容量下的 new() 性能
fn benchmark_creation(c: &mut Criterion) {
    fn bench<const C: usize>(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
        group.bench_with_input(BenchmarkId::new("staticring", C), &C, |b, _| {
            b.iter(|| black_box(RingBuffer::<u64, C>::new()));
        });

        group.bench_with_input(BenchmarkId::new("rtrb", C), &C, |b, &cap| {
            b.iter(|| black_box(rtrb::RingBuffer::<u64>::new(black_box(cap - 1))));
        });
    }

    let mut group = c.benchmark_group("ringbuf_creation");
    bench::<8>(&mut group);
    bench::<32>(&mut group);
    bench::<128>(&mut group);
    group.finish();
}

/// Benchmark: Single-threaded push/pop throughput
///
/// 单线程 push/pop 吞吐量测试
fn benchmark_single_thread_throughput(c: &mut Criterion) {
    const OPERATIONS: u64 = 10_000;

    fn bench<const C: usize>(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
        group.bench_with_input(BenchmarkId::new("staticring", C), &C, |b, _| {
            b.iter(|| {
                let mut buffer = RingBuffer::<u64, C>::new();
                let (mut producer, mut consumer) = buffer.split();

                for i in 0..OPERATIONS {
                    let _ = producer.try_push(black_box(i));
                    let _ = consumer.try_pop();
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("rtrb", C), &C, |b, &cap| {
            b.iter(|| {
                let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(cap - 1);

                for i in 0..OPERATIONS {
                    let _ = producer.push(black_box(i));
                    let _ = consumer.pop();
                }
            });
        });
    }

    let mut group = c.benchmark_group("ringbuf_single_thread");
    group.throughput(Throughput::Elements(OPERATIONS));
    bench::<8>(&mut group);
    bench::<32>(&mut group);
    bench::<128>(&mut group);
    group.finish();
}

/// Benchmark: Batch push/pop operations
///
/// 批量 push/pop 操作性能
fn benchmark_batch_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ringbuf_batch_ops");
    let data: Vec<u64> = (0..32).collect();

    group.bench_function("staticring_single_ops", |b| {
        b.iter(|| {
            let mut buffer = RingBuffer::<u64, 64>::new();
            let (mut producer, mut consumer) = buffer.split();

            for &value in &data {
                producer.try_push(black_box(value)).unwrap();
            }
            for _ in 0..data.len() {
                black_box(consumer.try_pop().unwrap());
            }
        });
    });

    group.bench_function("staticring_slice_ops", |b| {
        b.iter(|| {
            let mut buffer = RingBuffer::<u64, 64>::new();
            let (mut producer, mut consumer) = buffer.split();
            let mut out = [0u64; 32];

            assert_eq!(producer.push_slice(black_box(&data[..])), data.len());
            assert_eq!(consumer.pop_slice(&mut out), data.len());
            black_box(out);
        });
    });

    group.bench_function("rtrb_single_ops", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(63);

            for &value in &data {
                producer.push(black_box(value)).unwrap();
            }
            for _ in 0..data.len() {
                black_box(consumer.pop().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmark: Multi-threaded producer-consumer
///
/// 多线程生产者-消费者性能
fn benchmark_concurrent(c: &mut Criterion) {
    const MESSAGES: u64 = 10_000;

    let mut group = c.benchmark_group("ringbuf_concurrent");
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(MESSAGES));

    group.bench_function("staticring_concurrent", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = spsc::channel::<u64, 128>();

            let producer_handle = std::thread::spawn(move || {
                for i in 0..MESSAGES {
                    while producer.try_push(black_box(i)).is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            let consumer_handle = std::thread::spawn(move || {
                let mut count = 0;
                while count < MESSAGES {
                    if consumer.try_pop().is_some() {
                        count += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });

            producer_handle.join().unwrap();
            consumer_handle.join().unwrap();
        });
    });

    group.bench_function("rtrb_concurrent", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = rtrb::RingBuffer::<u64>::new(127);

            let producer_handle = std::thread::spawn(move || {
                for i in 0..MESSAGES {
                    while producer.push(black_box(i)).is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            let consumer_handle = std::thread::spawn(move || {
                let mut count = 0;
                while count < MESSAGES {
                    if consumer.pop().is_ok() {
                        count += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });

            producer_handle.join().unwrap();
            consumer_handle.join().unwrap();
        });
    });

    group.finish();
}

/// Benchmark: Pop performance
///
/// Pop 性能测试
fn benchmark_pop_only(c: &mut Criterion) {
    const ITEMS: u64 = 50;

    let mut group = c.benchmark_group("ringbuf_pop");

    group.bench_function("staticring_pop", |b| {
        b.iter_batched(
            || {
                let (mut producer, consumer) = spsc::channel::<u64, 64>();
                for i in 0..ITEMS {
                    producer.try_push(i).unwrap();
                }
                (producer, consumer)
            },
            |(_producer, mut consumer)| {
                for _ in 0..ITEMS {
                    black_box(consumer.try_pop().unwrap());
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("rtrb_pop", |b| {
        b.iter_batched(
            || {
                let (mut producer, consumer) = rtrb::RingBuffer::<u64>::new(63);
                for i in 0..ITEMS {
                    producer.push(i).unwrap();
                }
                consumer
            },
            |mut consumer| {
                for _ in 0..ITEMS {
                    black_box(consumer.pop().unwrap());
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_creation,
    benchmark_single_thread_throughput,
    benchmark_batch_operations,
    benchmark_concurrent,
    benchmark_pop_only,
);

criterion_main!(benches);
