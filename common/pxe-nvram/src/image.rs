// Licensed under the Apache-2.0 license

use core::fmt;
use std::io::{Read, Write};

use zerocopy::IntoBytes;

use crate::directory::{Header, HEADER_SIZE};
use crate::error::{NvramError, Result};
use crate::range::Range;

/// A decoded NVRAM image: the header followed by the data blob.
///
/// Absolute offsets address the concatenation of the encoded header and
/// `data`. Header fields are changed directly on [`NvramImage::header`];
/// [`NvramImage::set_range`] only writes into the data blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NvramImage {
    pub header: Header,
    pub data: Vec<u8>,
}

impl NvramImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, data) = Header::parse(bytes)?;
        Ok(Self {
            header,
            data: data.to_vec(),
        })
    }

    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_size());
        bytes.extend_from_slice(self.header.as_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.header.as_bytes())?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    pub fn total_size(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    /// Returns the bytes of `range`.
    ///
    /// A range either lies entirely within the header or starts at or after
    /// the end of it.
    pub fn get_range(&self, range: Range) -> Result<&[u8]> {
        let end = self.check_bounds(range)? as usize;
        let start = range.start as usize;

        if start < HEADER_SIZE {
            if end > HEADER_SIZE {
                return Err(NvramError::SpansHeader {
                    start: range.start,
                    end: end as u32,
                    header_size: HEADER_SIZE as u32,
                });
            }
            return Ok(&self.header.as_bytes()[start..end]);
        }

        Ok(&self.data[start - HEADER_SIZE..end - HEADER_SIZE])
    }

    /// Overwrites the bytes of `range` in the data blob with `bytes`.
    pub fn set_range(&mut self, range: Range, bytes: &[u8]) -> Result<()> {
        if range.length as usize != bytes.len() {
            return Err(NvramError::LengthMismatch {
                expected: range.length,
                actual: bytes.len(),
            });
        }

        let end = self.check_bounds(range)? as usize;
        let start = range.start as usize;

        if start < HEADER_SIZE {
            return Err(NvramError::HeaderWrite { start: range.start });
        }

        self.data[start - HEADER_SIZE..end - HEADER_SIZE].copy_from_slice(bytes);
        Ok(())
    }

    fn check_bounds(&self, range: Range) -> Result<u32> {
        let size = self.total_size();
        let out_of_bounds = NvramError::OutOfBounds {
            start: range.start,
            length: range.length,
            size: u32::try_from(size).unwrap_or(u32::MAX),
        };
        match range.end() {
            Ok(end) if end as usize <= size => Ok(end),
            _ => Err(out_of_bounds),
        }
    }
}

impl fmt::Display for NvramImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = &self.header;
        writeln!(f, "Magic: {:08x}", header.magic.get())?;
        writeln!(f, "Size: {:#x} ({} data bytes)", self.total_size(), self.data.len())?;
        for (index, entry) in header.directory.entries.iter().enumerate() {
            writeln!(f, "Entry {index}: {entry}")?;
        }
        writeln!(f, "Directory checksum: {:02x}", header.directory_checksum)?;
        write!(f, "VPD checksum: {:08x}", header.checksum.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{DIRECTORY_CHECKSUM_LOCATION, DIRECTORY_CHECKSUM_RANGE};

    fn sample_image(data_len: usize) -> Vec<u8> {
        (0..HEADER_SIZE + data_len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_round_trip() {
        let bytes = sample_image(100);
        let image = NvramImage::from_bytes(&bytes).unwrap();
        assert_eq!(image.data.len(), 100);
        assert_eq!(image.to_bytes(), bytes);

        let mut written = Vec::new();
        image.write_to(&mut written).unwrap();
        assert_eq!(written, bytes);
    }

    #[test]
    fn test_from_reader() {
        let bytes = sample_image(7);
        let image = NvramImage::from_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(image.to_bytes(), bytes);

        let short = &bytes[..HEADER_SIZE - 10];
        assert!(matches!(
            NvramImage::from_reader(&mut &short[..]),
            Err(NvramError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn test_get_range_header() {
        let bytes = sample_image(16);
        let image = NvramImage::from_bytes(&bytes).unwrap();
        assert_eq!(image.get_range(DIRECTORY_CHECKSUM_RANGE).unwrap(), &bytes[20..116]);
        assert_eq!(image.get_range(DIRECTORY_CHECKSUM_LOCATION).unwrap(), &[bytes[117]]);
        assert_eq!(
            image.get_range(Range::new(0, HEADER_SIZE as u32)).unwrap(),
            &bytes[..HEADER_SIZE]
        );
    }

    #[test]
    fn test_get_range_reflects_header_changes() {
        let mut image = NvramImage::from_bytes(&sample_image(0)).unwrap();
        image.header.directory_checksum = 0x5a;
        assert_eq!(image.get_range(DIRECTORY_CHECKSUM_LOCATION).unwrap(), &[0x5a]);
    }

    #[test]
    fn test_get_range_data() {
        let bytes = sample_image(32);
        let image = NvramImage::from_bytes(&bytes).unwrap();
        let range = Range::new(HEADER_SIZE as u32 + 4, 8);
        assert_eq!(image.get_range(range).unwrap(), &bytes[HEADER_SIZE + 4..HEADER_SIZE + 12]);
        let tail = Range::new(HEADER_SIZE as u32 + 24, 8);
        assert_eq!(image.get_range(tail).unwrap(), &bytes[HEADER_SIZE + 24..]);
        assert!(image.get_range(Range::new(HEADER_SIZE as u32 + 32, 0)).is_ok());
    }

    #[test]
    fn test_get_range_out_of_bounds() {
        let image = NvramImage::from_bytes(&sample_image(32)).unwrap();
        let total = (HEADER_SIZE + 32) as u32;

        for range in [
            Range::new(total, 1),
            Range::new(total - 4, 5),
            Range::new(0, total + 1),
            Range::new(u32::MAX, 2),
        ] {
            match image.get_range(range) {
                Err(NvramError::OutOfBounds { size, .. }) => assert_eq!(size, total),
                other => panic!("{range}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_get_range_spanning_header() {
        let image = NvramImage::from_bytes(&sample_image(32)).unwrap();
        for range in [
            Range::new(HEADER_SIZE as u32 - 1, 2),
            Range::new(0, HEADER_SIZE as u32 + 1),
        ] {
            assert!(matches!(
                image.get_range(range),
                Err(NvramError::SpansHeader { .. })
            ));
        }
    }

    #[test]
    fn test_set_range() {
        let bytes = sample_image(32);
        let mut image = NvramImage::from_bytes(&bytes).unwrap();
        let range = Range::new(HEADER_SIZE as u32 + 8, 4);
        image.set_range(range, &[0xaa, 0xbb, 0xcc, 0xdd]).unwrap();
        assert_eq!(image.get_range(range).unwrap(), &[0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(image.data.len(), 32);
        assert_eq!(image.data[..8], bytes[HEADER_SIZE..HEADER_SIZE + 8]);
        assert_eq!(image.data[12..], bytes[HEADER_SIZE + 12..]);
    }

    #[test]
    fn test_set_range_rejections() {
        let bytes = sample_image(32);
        let mut image = NvramImage::from_bytes(&bytes).unwrap();
        let total = (HEADER_SIZE + 32) as u32;

        assert!(matches!(
            image.set_range(Range::new(HEADER_SIZE as u32, 4), &[0; 3]),
            Err(NvramError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            image.set_range(Range::new(total - 2, 4), &[0; 4]),
            Err(NvramError::OutOfBounds { .. })
        ));
        assert!(matches!(
            image.set_range(Range::new(117, 1), &[0]),
            Err(NvramError::HeaderWrite { start: 117 })
        ));
        assert!(matches!(
            image.set_range(Range::new(HEADER_SIZE as u32 - 2, 4), &[0; 4]),
            Err(NvramError::HeaderWrite { .. })
        ));
        assert_eq!(image.to_bytes(), bytes);
    }

    #[test]
    fn test_display_lists_entries() {
        let image = NvramImage::from_bytes(&sample_image(0)).unwrap();
        let text = image.to_string();
        assert!(text.starts_with("Magic: 00010203"));
        assert_eq!(text.matches("Entry ").count(), 8);
    }
}
