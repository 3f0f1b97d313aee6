// Licensed under the Apache-2.0 license

//! On-wire layout of the NVRAM header and its region directory.
//!
//! All multi-byte fields are big-endian. The structures derive the
//! `zerocopy` traits so that the header is decoded and re-encoded byte-exact,
//! including the fields whose meaning is unknown.

use core::fmt;
use core::mem::size_of;

use bitfield::bitfield;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{NvramError, Result};

pub const DIRECTORY_ENTRIES: usize = 8;
pub const VPD_SIZE: usize = 134;
pub const HEADER_SIZE: usize = size_of::<Header>();

/// Region type tag of the option ROM.
pub const OPTION_ROM_TYPE: u8 = 0;

const _: () = assert!(size_of::<Entry>() == 12);
const _: () = assert!(HEADER_SIZE == 256);

bitfield! {
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    struct TypeSizeBits(u32);
    u32;
    size, set_size: 23, 0;
    u8, region_type, set_region_type: 31, 24;
}

/// Region type in the top byte, region size in 4-byte units in the low 24
/// bits.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct TypeSize(U32<BigEndian>);

impl TypeSize {
    pub const MAX_SIZE: u32 = 0x00ff_ffff;

    pub fn new(region_type: u8, size: u32) -> Result<Self> {
        let mut type_size = Self::default();
        type_size.set_region_type(region_type);
        type_size.set_size(size)?;
        Ok(type_size)
    }

    pub fn raw(&self) -> u32 {
        self.0.get()
    }

    pub fn region_type(&self) -> u8 {
        self.bits().region_type()
    }

    pub fn size(&self) -> u32 {
        self.bits().size()
    }

    /// Replaces the size, leaving the type untouched. Sizes that do not fit
    /// in 24 bits are rejected and the field keeps its previous value.
    pub fn set_size(&mut self, size: u32) -> Result<()> {
        if size > Self::MAX_SIZE {
            return Err(NvramError::SizeOverflow(size));
        }
        let mut bits = self.bits();
        bits.set_size(size);
        self.0.set(bits.0);
        Ok(())
    }

    pub fn set_region_type(&mut self, region_type: u8) {
        let mut bits = self.bits();
        bits.set_region_type(region_type);
        self.0.set(bits.0);
    }

    fn bits(&self) -> TypeSizeBits {
        TypeSizeBits(self.0.get())
    }
}

impl From<u32> for TypeSize {
    fn from(raw: u32) -> Self {
        Self(raw.into())
    }
}

impl fmt::Debug for TypeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSize")
            .field("region_type", &self.region_type())
            .field("size", &self.size())
            .finish()
    }
}

/// One directory slot.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct Entry {
    pub padding: U32<BigEndian>,
    pub type_size: TypeSize,
    /// Absolute offset of the region within the image.
    pub offset: U32<BigEndian>,
}

impl Entry {
    /// The option ROM lives in the first region of type 0 with a non-zero
    /// size.
    pub fn is_option_rom(&self) -> bool {
        self.type_size.region_type() == OPTION_ROM_TYPE && self.type_size.size() != 0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeSize: {:08x} (type {:#x}, size {:#x}), Offset: {:x}",
            self.type_size.raw(),
            self.type_size.region_type(),
            self.type_size.size(),
            self.offset.get()
        )
    }
}

#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct Directory {
    pub entries: [Entry; DIRECTORY_ENTRIES],
}

impl Directory {
    pub fn rom_entry(&self) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.is_option_rom())
    }

    pub fn rom_entry_mut(&mut self) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.is_option_rom())
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Header {
    pub magic: U32<BigEndian>,
    pub reserved: [U32<BigEndian>; 4],
    pub directory: Directory,
    pub reserved_byte: u8,
    pub directory_checksum: u8,
    pub vpd: [u8; VPD_SIZE],
    /// Byte-reversed CRC-32 of the VPD window.
    pub checksum: U32<BigEndian>,
}

impl Header {
    /// Decodes the header from the start of `bytes`, returning it together
    /// with the bytes that follow.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        Header::read_from_prefix(bytes).map_err(|_| NvramError::TruncatedHeader {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        })
    }
}
