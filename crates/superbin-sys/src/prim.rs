pub const KB: u64 = 1024;
pub const MB: u64 = KB * 1024;
pub const GB: u64 = MB * 1024;

/// Granularity in which chunk memory is committed.
pub const DEFAULT_PAGE_SIZE: u64 = kb(4);

pub const fn kb(value: u64) -> u64 {
  value * KB
}

pub const fn mb(value: u64) -> u64 {
  value * MB
}

pub const fn gb(value: u64) -> u64 {
  value * GB
}
