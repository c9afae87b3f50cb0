//! Benchmark tests for the scanner module

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spelunk::config::ScannerConfig;
use spelunk::scanner::{CancelToken, ScanProgress, Scanner};
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

/// Create a benchmark directory with the given number of files and directories
fn create_benchmark_dir(file_count: usize, dir_count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let files_per_dir = if dir_count > 0 {
        file_count / dir_count
    } else {
        file_count
    };

    for d in 0..dir_count {
        let subdir = root.join(format!("dir{}", d));
        fs::create_dir(&subdir).unwrap();

        for f in 0..files_per_dir {
            let mut file = File::create(subdir.join(format!("file{}.txt", f))).unwrap();
            file.write_all(&vec![b'x'; 1024]).unwrap();
        }
    }

    // Create remaining files in root if needed
    let remaining = file_count - (files_per_dir * dir_count);
    for f in 0..remaining {
        let mut file = File::create(root.join(format!("root_file{}.txt", f))).unwrap();
        file.write_all(&vec![b'y'; 1024]).unwrap();
    }

    dir
}

fn scanner_with_fan_out(fan_out: usize) -> Scanner {
    let config = ScannerConfig {
        fan_out,
        ..ScannerConfig::default()
    };
    Scanner::new(&config).unwrap()
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for size in [100, 500, 1000].iter() {
        let dir = create_benchmark_dir(*size, 10);

        for fan_out in [1usize, 4, 8] {
            let scanner = scanner_with_fan_out(fan_out);
            let progress = ScanProgress::new();
            let cancel = CancelToken::new();

            group.bench_with_input(
                BenchmarkId::new(format!("fan_out_{}", fan_out), size),
                size,
                |b, _| {
                    b.iter(|| {
                        progress.reset();
                        scanner.scan(black_box(dir.path()), &progress, &cancel)
                    })
                },
            );
        }
    }

    group.finish();
}

fn benchmark_deep_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_scan");

    // Create a deeply nested structure, 5 levels with 10 files each
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let mut current = root.to_path_buf();
    for level in 0..5 {
        current = current.join(format!("level{}", level));
        fs::create_dir(&current).unwrap();

        for f in 0..10 {
            let mut file = File::create(current.join(format!("file{}.txt", f))).unwrap();
            file.write_all(&vec![b'z'; 512]).unwrap();
        }
    }

    for fan_out in [1usize, 8] {
        let scanner = scanner_with_fan_out(fan_out);
        let progress = ScanProgress::new();
        let cancel = CancelToken::new();

        group.bench_function(format!("fan_out_{}", fan_out), |b| {
            b.iter(|| {
                progress.reset();
                scanner.scan(black_box(dir.path()), &progress, &cancel)
            })
        });
    }

    group.finish();
}

fn benchmark_wide_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_scan");

    // Many sibling directories, the shape fan-out is meant for
    let dir = create_benchmark_dir(2000, 100);

    for fan_out in [1usize, 4, 8, 16] {
        let scanner = scanner_with_fan_out(fan_out);
        let progress = ScanProgress::new();
        let cancel = CancelToken::new();

        group.bench_function(format!("fan_out_{}", fan_out), |b| {
            b.iter(|| {
                progress.reset();
                scanner.scan(black_box(dir.path()), &progress, &cancel)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_scan,
    benchmark_deep_scan,
    benchmark_wide_scan
);
criterion_main!(benches);
