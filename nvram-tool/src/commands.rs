// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use log::{debug, info as log_info};
use pxe_nvram::NvramImage;
use std::fs;
use std::path::Path;

fn load_image(path: &Path) -> Result<NvramImage> {
    let bytes =
        fs::read(path).with_context(|| format!("Cannot open NVRAM image '{}'", path.display()))?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    NvramImage::from_bytes(&bytes)
        .with_context(|| format!("Cannot read NVRAM image '{}'", path.display()))
}

/// Reads the option ROM, zero-padded to a multiple of 4 bytes.
fn load_option_rom(path: &Path) -> Result<Vec<u8>> {
    let mut rom =
        fs::read(path).with_context(|| format!("Cannot read option ROM '{}'", path.display()))?;
    let padding = rom.len().next_multiple_of(4) - rom.len();
    if padding != 0 {
        debug!("padding option ROM with {padding} zero bytes");
        rom.resize(rom.len() + padding, 0);
    }
    Ok(rom)
}

pub(crate) fn check(input: &Path) -> Result<()> {
    let image = load_image(input)?;
    pxe_nvram::check_image(&image).context("check failed")?;
    println!("OK");
    Ok(())
}

pub(crate) fn write_option_rom(input: &Path, output: &Path, option_rom: &Path) -> Result<()> {
    let rom = load_option_rom(option_rom)?;
    let mut image = load_image(input)?;

    pxe_nvram::write_option_rom(&mut image, &rom).context("could not run setter")?;

    fs::write(output, image.to_bytes())
        .with_context(|| format!("Cannot write NVRAM image '{}'", output.display()))?;
    log_info!("wrote {} bytes to {}", image.total_size(), output.display());
    println!("OK");
    Ok(())
}

pub(crate) fn info(input: &Path) -> Result<()> {
    let image = load_image(input)?;
    println!("{image}");
    Ok(())
}
