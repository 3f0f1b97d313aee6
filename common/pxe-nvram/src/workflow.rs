// Licensed under the Apache-2.0 license

use log::info;

use crate::error::Result;
use crate::image::NvramImage;
use crate::policy::{Check, DirectoryChecksum, RomChecksum, RomInstall, Set, VpdChecksum};

/// Validates the directory, VPD and option ROM checksums, in that order.
pub fn check_image(image: &NvramImage) -> Result<()> {
    let checks: [(&str, &dyn Check); 3] = [
        ("directory checksum", &DirectoryChecksum),
        ("VPD checksum", &VpdChecksum),
        ("option ROM checksum", &RomChecksum),
    ];

    for (name, check) in checks {
        check.check(image)?;
        info!("{name}: OK");
    }
    Ok(())
}

/// Installs `rom` into the option ROM region and recomputes every checksum.
///
/// The directory checksum covers the updated entry size and the VPD checksum
/// covers the directory checksum byte, so the order is fixed. On error the
/// image may be partially updated and should be discarded.
pub fn write_option_rom(image: &mut NvramImage, rom: &[u8]) -> Result<()> {
    let install = RomInstall::new(rom);
    let sets: [(&str, &dyn Set); 4] = [
        ("install option ROM", &install),
        ("directory checksum", &DirectoryChecksum),
        ("VPD checksum", &VpdChecksum),
        ("option ROM checksum", &RomChecksum),
    ];

    for (name, set) in sets {
        set.set(image)?;
        info!("{name}: updated");
    }
    Ok(())
}
