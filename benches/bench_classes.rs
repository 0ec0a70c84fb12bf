use criterion::{
  BenchmarkId,
  Criterion,
  criterion_group,
  criterion_main,
};
use std::hint::black_box;
use superbin_classes::{
  BinTable,
  WasteTarget,
  bin_index,
};

/// Every sub-bucket boundary from 8 bytes up to 256 MiB, plus the size one
/// byte past it, which rounds up to the next bin.
fn band_sweep(target: &WasteTarget) -> Vec<u64> {
  let parts = u64::from(target.sub_bucket_count());
  let mut sizes = Vec::new();
  let mut band = 8u64;
  while band <= 256 << 20 {
    for part in 0..parts {
      let boundary = band + part * (band / parts);
      sizes.push(boundary);
      sizes.push(boundary + 1);
    }
    band <<= 1;
  }
  sizes
}

fn bench_bin_index(c: &mut Criterion) {
  let mut group = c.benchmark_group("bin_index");
  group.sample_size(50);

  for (name, target) in [
    ("percent10", WasteTarget::percent10()),
    ("percent25", WasteTarget::percent25()),
  ] {
    let sizes = band_sweep(&target);
    group.bench_with_input(BenchmarkId::new("sweep", name), &sizes, |b, sizes| {
      b.iter(|| {
        for &size in sizes {
          black_box(bin_index(black_box(size), &target));
        }
      });
    });
  }

  group.finish();
}

fn bench_build_table(c: &mut Criterion) {
  let mut group = c.benchmark_group("build_table");
  group.sample_size(50);

  for (name, target) in [
    ("percent10", WasteTarget::percent10()),
    ("percent25", WasteTarget::percent25()),
  ] {
    group.bench_function(name, |b| {
      b.iter(|| BinTable::build(black_box(256 << 20), &target).unwrap());
    });
  }

  group.finish();
}

criterion_group!(
  benches,
  bench_bin_index,
  bench_build_table
);
criterion_main!(benches);
