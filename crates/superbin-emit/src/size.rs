use core::fmt;

use superbin_sys::prim::{
  GB,
  KB,
  MB,
};

/// Human-readable byte count, 1024 based, two decimals unless whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (unit, suffix) = match self.0 {
      v if v >= GB => (GB, "GB"),
      v if v >= MB => (MB, "MB"),
      v if v >= KB => (KB, "kB"),
      _ => (1, "B"),
    };

    if self.0 % unit == 0 {
      return write!(f, "{} {}", self.0 / unit, suffix);
    }

    // Round to hundredths in integer space.
    let hundredths = (self.0 as u128 * 100 + unit as u128 / 2) / unit as u128;
    write!(f, "{}.{:02} {}", hundredths / 100, hundredths % 100, suffix)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_whole_units() {
    assert_eq!(ByteSize(0).to_string(), "0 B");
    assert_eq!(ByteSize(8).to_string(), "8 B");
    assert_eq!(ByteSize(1023).to_string(), "1023 B");
    assert_eq!(ByteSize(1024).to_string(), "1 kB");
    assert_eq!(ByteSize(16384).to_string(), "16 kB");
    assert_eq!(ByteSize(MB * 256).to_string(), "256 MB");
    assert_eq!(ByteSize(GB).to_string(), "1 GB");
  }

  #[test]
  fn test_fractional_units() {
    assert_eq!(ByteSize(5462).to_string(), "5.33 kB");
    assert_eq!(ByteSize(1280).to_string(), "1.25 kB");
    assert_eq!(ByteSize(1536).to_string(), "1.50 kB");
    assert_eq!(ByteSize(MB * 5 / 4).to_string(), "1.25 MB");
    assert_eq!(ByteSize(MB + 1).to_string(), "1.00 MB");
  }
}
