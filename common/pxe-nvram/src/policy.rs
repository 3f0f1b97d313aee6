// Licensed under the Apache-2.0 license

//! Validation and recomputation of the image checksums, and installation of
//! a new option ROM.
//!
//! Every policy works through the public contract of [`NvramImage`]: header
//! fields are read through [`NvramImage::get_range`] and written directly on
//! the header, data-region bytes are written through
//! [`NvramImage::set_range`].

use log::debug;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::FromBytes;

use crate::checksum::{checksum8, crc32, reverse_bytes32};
use crate::error::{ChecksumKind, NvramError, Result};
use crate::image::NvramImage;
use crate::range::{
    Range, DIRECTORY_CHECKSUM_LOCATION, DIRECTORY_CHECKSUM_RANGE, VPD_CHECKSUM_RANGE,
};

/// Size of the CRC-32 stored at the end of the option ROM region.
const ROM_CHECKSUM_SIZE: u32 = 4;

/// Read-only validation of an image.
pub trait Check {
    fn check(&self, image: &NvramImage) -> Result<()>;
}

/// Mutation of an image.
pub trait Set {
    fn set(&self, image: &mut NvramImage) -> Result<()>;
}

/// 8-bit checksum over the directory, stored in the header byte after the
/// reserved byte.
pub struct DirectoryChecksum;

impl DirectoryChecksum {
    fn compute(image: &NvramImage) -> Result<u8> {
        let directory = image.get_range(DIRECTORY_CHECKSUM_RANGE)?;
        Ok(checksum8(directory))
    }
}

impl Check for DirectoryChecksum {
    fn check(&self, image: &NvramImage) -> Result<()> {
        let stored = image.get_range(DIRECTORY_CHECKSUM_LOCATION)?[0];
        let computed = Self::compute(image)?;
        debug!("directory checksum: stored {stored:#04x}, computed {computed:#04x}");
        if stored != computed {
            return Err(NvramError::ChecksumMismatch {
                kind: ChecksumKind::Directory,
                stored: stored.into(),
                computed: computed.into(),
            });
        }
        Ok(())
    }
}

impl Set for DirectoryChecksum {
    fn set(&self, image: &mut NvramImage) -> Result<()> {
        let computed = Self::compute(image)?;
        debug!("setting directory checksum to {computed:#04x}");
        image.header.directory_checksum = computed;
        Ok(())
    }
}

/// Byte-reversed CRC-32 over the VPD window, stored in the last header word.
pub struct VpdChecksum;

impl VpdChecksum {
    fn compute(image: &NvramImage) -> Result<u32> {
        let vpd = image.get_range(VPD_CHECKSUM_RANGE)?;
        Ok(reverse_bytes32(crc32(vpd)))
    }
}

impl Check for VpdChecksum {
    fn check(&self, image: &NvramImage) -> Result<()> {
        let stored = image.header.checksum.get();
        let computed = Self::compute(image)?;
        debug!("VPD checksum: stored {stored:#010x}, computed {computed:#010x}");
        if stored != computed {
            return Err(NvramError::ChecksumMismatch {
                kind: ChecksumKind::Vpd,
                stored,
                computed,
            });
        }
        Ok(())
    }
}

impl Set for VpdChecksum {
    fn set(&self, image: &mut NvramImage) -> Result<()> {
        let computed = Self::compute(image)?;
        debug!("setting VPD checksum to {computed:#010x}");
        image.header.checksum.set(computed);
        Ok(())
    }
}

/// Byte-reversed CRC-32 over the option ROM, stored big-endian in the last
/// four bytes of the ROM region itself.
pub struct RomChecksum;

impl RomChecksum {
    /// Returns the region of the option ROM, checksum slot included.
    fn rom_range(image: &NvramImage) -> Result<Range> {
        let entry = image
            .header
            .directory
            .rom_entry()
            .ok_or(NvramError::MissingRegion)?;
        debug!("option ROM entry: {entry}");
        Ok(Range::new(entry.offset.get(), entry.type_size.size() * 4))
    }

    /// Returns the computed and the stored checksum.
    fn compute(image: &NvramImage, range: Range) -> Result<(u32, u32)> {
        let rom = image.get_range(range)?;
        let (body, stored) =
            U32::<BigEndian>::read_from_suffix(rom).map_err(|_| NvramError::OutOfBounds {
                start: range.start,
                length: ROM_CHECKSUM_SIZE,
                size: range.length,
            })?;
        Ok((reverse_bytes32(crc32(body)), stored.get()))
    }
}

impl Check for RomChecksum {
    fn check(&self, image: &NvramImage) -> Result<()> {
        let range = Self::rom_range(image)?;
        let (computed, stored) = Self::compute(image, range)?;
        debug!("option ROM checksum over {range}: stored {stored:#010x}, computed {computed:#010x}");
        if stored != computed {
            return Err(NvramError::ChecksumMismatch {
                kind: ChecksumKind::OptionRom,
                stored,
                computed,
            });
        }
        Ok(())
    }
}

impl Set for RomChecksum {
    fn set(&self, image: &mut NvramImage) -> Result<()> {
        let range = Self::rom_range(image)?;
        let (computed, _) = Self::compute(image, range)?;
        let slot = Range::new(range.start + range.length - ROM_CHECKSUM_SIZE, ROM_CHECKSUM_SIZE);
        debug!("setting option ROM checksum at {slot} to {computed:#010x}");
        image.set_range(slot, &computed.to_be_bytes())
    }
}

/// Writes a new option ROM over the region of the option ROM entry and
/// updates the entry size.
///
/// The entry offset is kept and the data blob is not grown, so the new ROM
/// has to fit in the image. Its last four bytes are the checksum slot that
/// [`RomChecksum`] fills in.
pub struct RomInstall<'a> {
    pub rom: &'a [u8],
}

impl<'a> RomInstall<'a> {
    pub fn new(rom: &'a [u8]) -> Self {
        Self { rom }
    }
}

impl Set for RomInstall<'_> {
    fn set(&self, image: &mut NvramImage) -> Result<()> {
        let entry = *image
            .header
            .directory
            .rom_entry()
            .ok_or(NvramError::MissingRegion)?;

        if self.rom.is_empty() || self.rom.len() % 4 != 0 {
            return Err(NvramError::InvalidPayload(self.rom.len()));
        }
        let length = u32::try_from(self.rom.len())
            .map_err(|_| NvramError::InvalidPayload(self.rom.len()))?;

        // Validate the new size before touching the data blob.
        let mut type_size = entry.type_size;
        type_size.set_size(length / 4)?;

        let range = Range::new(entry.offset.get(), length);
        debug!("installing {length:#x} byte option ROM at {range}");
        image.set_range(range, self.rom)?;

        image
            .header
            .directory
            .rom_entry_mut()
            .ok_or(NvramError::MissingRegion)?
            .type_size = type_size;
        Ok(())
    }
}
