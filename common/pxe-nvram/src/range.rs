// Licensed under the Apache-2.0 license

//! Absolute byte ranges over the logical image and the fixed ranges the
//! format uses.

use core::fmt;

use crate::error::{NvramError, Result};

/// `length` bytes starting at the absolute offset `start`.
///
/// Offsets are counted from the first header byte, so the data blob starts
/// at [`crate::HEADER_SIZE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: u32,
    pub length: u32,
}

impl Range {
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// Exclusive end offset, or an out-of-bounds error if it does not fit in
    /// 32 bits.
    pub fn end(&self) -> Result<u32> {
        self.start
            .checked_add(self.length)
            .ok_or(NvramError::OutOfBounds {
                start: self.start,
                length: self.length,
                size: u32::MAX,
            })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}..{:#x}",
            self.start,
            self.start as u64 + self.length as u64
        )
    }
}

/// Directory bytes covered by the 8-bit directory checksum.
pub const DIRECTORY_CHECKSUM_RANGE: Range = Range::new(20, 96);

/// Stored 8-bit directory checksum.
pub const DIRECTORY_CHECKSUM_LOCATION: Range = Range::new(117, 1);

/// Window covered by the VPD CRC-32: the reserved byte, the directory
/// checksum and the VPD bytes.
pub const VPD_CHECKSUM_RANGE: Range = Range::new(116, 136);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Header, HEADER_SIZE};
    use core::mem::offset_of;

    #[test]
    fn test_named_ranges_match_header_layout() {
        assert_eq!(
            DIRECTORY_CHECKSUM_RANGE.start as usize,
            offset_of!(Header, directory)
        );
        assert_eq!(
            DIRECTORY_CHECKSUM_RANGE.end().unwrap() as usize,
            offset_of!(Header, reserved_byte)
        );
        assert_eq!(
            DIRECTORY_CHECKSUM_LOCATION.start as usize,
            offset_of!(Header, directory_checksum)
        );
        assert_eq!(
            VPD_CHECKSUM_RANGE.start as usize,
            offset_of!(Header, reserved_byte)
        );
        assert_eq!(
            VPD_CHECKSUM_RANGE.end().unwrap() as usize,
            offset_of!(Header, checksum)
        );
        assert!(VPD_CHECKSUM_RANGE.end().unwrap() as usize <= HEADER_SIZE);
    }

    #[test]
    fn test_end_overflow() {
        assert_eq!(Range::new(4, 8).end().unwrap(), 12);
        assert!(matches!(
            Range::new(u32::MAX, 2).end(),
            Err(NvramError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(DIRECTORY_CHECKSUM_RANGE.to_string(), "0x14..0x74");
    }
}
