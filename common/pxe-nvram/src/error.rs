// Licensed under the Apache-2.0 license

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NvramError>;

/// The three checksums stored in an NVRAM image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecksumKind {
    Directory,
    Vpd,
    OptionRom,
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumKind::Directory => write!(f, "directory"),
            ChecksumKind::Vpd => write!(f, "VPD"),
            ChecksumKind::OptionRom => write!(f, "option ROM"),
        }
    }
}

/// Errors produced while decoding, validating or patching an NVRAM image.
#[derive(Error, Debug)]
pub enum NvramError {
    #[error("range start ({start:#x}) + length ({length:#x}) exceeds NVRAM size ({size:#x})")]
    OutOfBounds { start: u32, length: u32, size: u32 },
    #[error("range {start:#x}..{end:#x} starts within the header and must end within it ({header_size:#x})")]
    SpansHeader {
        start: u32,
        end: u32,
        header_size: u32,
    },
    #[error("range at {start:#x} touches the header, which must be modified directly")]
    HeaderWrite { start: u32 },
    #[error("range length ({expected}) does not match buffer length ({actual})")]
    LengthMismatch { expected: u32, actual: usize },
    #[error("image too small to contain the NVRAM header: expected {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },
    #[error("existing {kind} checksum ({stored:#x}) does not match calculated checksum ({computed:#x})")]
    ChecksumMismatch {
        kind: ChecksumKind,
        stored: u32,
        computed: u32,
    },
    #[error("no entry of type 0 with size != 0 found")]
    MissingRegion,
    #[error("size {0:#x} cannot be larger than 24 bits")]
    SizeOverflow(u32),
    #[error("option ROM length ({0}) must be a non-zero multiple of 4")]
    InvalidPayload(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
