// Licensed under the Apache-2.0 license

//! Reader and patcher for the NVRAM image of the PXE option-ROM subsystem.
//!
//! The image is a fixed 256-byte big-endian header (magic, a directory of
//! eight region descriptors, vendor product data and two checksums) followed
//! by a data blob that is addressed through absolute byte offsets. This crate
//! decodes the image, validates or recomputes the three checksums and can
//! install a new option ROM into the region the directory designates.
//!
//! ```no_run
//! use pxe_nvram::{check_image, NvramImage};
//!
//! let bytes = std::fs::read("nvram.bin").unwrap();
//! let image = NvramImage::from_bytes(&bytes).unwrap();
//! check_image(&image).unwrap();
//! ```

pub mod checksum;
pub mod directory;
pub mod error;
pub mod image;
pub mod policy;
pub mod range;
pub mod workflow;

pub use directory::{Directory, Entry, Header, TypeSize, DIRECTORY_ENTRIES, HEADER_SIZE};
pub use error::{ChecksumKind, NvramError, Result};
pub use image::NvramImage;
pub use policy::{Check, DirectoryChecksum, RomChecksum, RomInstall, Set, VpdChecksum};
pub use range::Range;
pub use workflow::{check_image, write_option_rom};
