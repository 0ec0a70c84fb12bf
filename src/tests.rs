use superbin_bitmap::BinMapGeometry;
use superbin_classes::WasteTarget;
use superbin_sys::prelude::*;

use super::*;
use crate::config::parse_size;

fn run_to_string(config: &Config) -> String {
  let mut out = Vec::new();
  run(config, &mut out).unwrap();
  String::from_utf8(out).unwrap()
}

#[test]
fn test_default_config() {
  let config = Config::default();
  assert_eq!(config.waste_target, WasteTarget::percent25());
  assert_eq!(config.max_alloc_size, mb(256));
  assert_eq!(config.page_size, 4096);
  assert_eq!(config.chunk_sizes.len(), 15);
  assert_eq!(config.chunk_sizes.first(), Some(&kb(16)));
  assert_eq!(config.chunk_sizes.last(), Some(&gb(1)));
  assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_config_validate() {
  let config = Config {
    max_alloc_size: 4,
    ..Config::default()
  };
  assert!(matches!(
    config.validate(),
    Err(ClassError::MaxAllocSize { size: 4, .. })
  ));

  let config = Config {
    chunk_sizes: vec![kb(64), kb(16)],
    ..Config::default()
  };
  assert!(matches!(config.validate(), Err(ClassError::ChunkOrder { .. })));
}

#[test]
fn test_parse_size() {
  assert_eq!(parse_size("4096").unwrap(), 4096);
  assert_eq!(parse_size("4K").unwrap(), kb(4));
  assert_eq!(parse_size("16kb").unwrap(), kb(16));
  assert_eq!(parse_size("256M").unwrap(), mb(256));
  assert_eq!(parse_size("1 GiB").unwrap(), gb(1));
  assert_eq!(parse_size("12B").unwrap(), 12);

  assert!(matches!(parse_size(""), Err(PlanError::InvalidSize(_))));
  assert!(matches!(parse_size("K"), Err(PlanError::InvalidSize(_))));
  assert!(matches!(parse_size("12T"), Err(PlanError::InvalidSize(_))));
  assert!(matches!(parse_size("-1"), Err(PlanError::InvalidSize(_))));
  assert!(matches!(
    parse_size("99999999999999999999G"),
    Err(PlanError::InvalidSize(_))
  ));
  assert!(matches!(
    parse_size("17179869184G"),
    Err(PlanError::InvalidSize(_))
  ));
}

#[test]
fn test_generate_default_plan() {
  let plan = Plan::generate(&Config::default()).unwrap();
  let table = plan.table();
  let assignment = plan.assignment();

  assert_eq!(table.len(), 112);
  assert_eq!(assignment.allocators().len(), 15);

  for (alloc_index, alloc) in assignment.allocators().iter().enumerate() {
    for &pos in alloc.bins() {
      let bin = &table.bins()[pos];
      assert_eq!(bin.alloc_index(), Some(alloc_index));
      if bin.uses_bin_map() {
        let expected = BinMapGeometry::for_count(alloc.chunk_size() / bin.size());
        assert_eq!(bin.bin_map(), expected);
      } else {
        assert_eq!(bin.bin_map(), BinMapGeometry::default());
      }
    }
  }

  // Everything up to the largest bin fits some chunk of the default list.
  assert!(assignment.unplaced().is_empty());
}

#[test]
fn test_generate_percent10_plan() {
  let config = Config {
    waste_target: WasteTarget::percent10(),
    ..Config::default()
  };
  let plan = Plan::generate(&config).unwrap();
  assert_eq!(plan.table().len(), 216);

  let placed: usize = plan
    .assignment()
    .allocators()
    .iter()
    .map(|alloc| alloc.bins().len())
    .sum();
  assert_eq!(
    placed + plan.assignment().unplaced().len(),
    plan.table().bins().len()
  );
}

#[test]
fn test_run_output_shape() {
  let text = run_to_string(&Config::default());

  assert!(text.starts_with("AllocSize: 8 B, Bin: 8\n"));
  assert!(text.contains("static const s32        c_num_bins = 112;\n"));
  assert!(text.contains("static const s32    c_num_allocators = 15;\n"));
  assert!(text.contains("    superalloc_t(1073741824),\n"));
  assert!(!text.contains("Exception:"));
  assert!(text.ends_with("};\nDone...\n"));

  let superbins = text.lines().filter(|line| line.starts_with("superbin_t(")).count();
  assert_eq!(superbins, 112);
}

#[test]
fn test_run_is_deterministic() {
  let config = Config {
    waste_target: WasteTarget::percent10(),
    ..Config::default()
  };
  assert_eq!(run_to_string(&config), run_to_string(&config));
}

#[test]
fn test_run_reports_bad_chunks() {
  let config = Config {
    chunk_sizes: vec![kb(48)],
    ..Config::default()
  };
  assert_eq!(
    run_to_string(&config),
    "Exception: chunk size 49152 is not a power of two\nDone...\n"
  );
}

#[test]
fn test_run_reports_remap_outside_table() {
  let config = Config {
    max_alloc_size: 8,
    ..Config::default()
  };
  // The enumerated bins are already out when the remap fails.
  assert_eq!(
    run_to_string(&config),
    "AllocSize: 8 B, Bin: 8\n\
     AllocSize: 10 B, Bin: 9\n\
     AllocSize: 12 B, Bin: 10\n\
     AllocSize: 14 B, Bin: 11\n\
     Exception: remap of size 16 hits bin 12, table holds 12\n\
     Done...\n"
  );
}

#[test]
fn test_emit_returns_writer() {
  let config = Config {
    max_alloc_size: kb(64),
    chunk_sizes: vec![kb(16), kb(64), kb(128)],
    ..Config::default()
  };
  let plan = Plan::generate(&config).unwrap();
  let out = plan.emit(Vec::new()).unwrap();
  let text = String::from_utf8(out).unwrap();
  assert!(text.contains("c_num_allocators = 3;"));
  assert!(text.contains("1:53 AllocSize:20 kB, AllocCount:3, ChunkSize:64 kB, UsedPagesPerChunk:15"));
}
