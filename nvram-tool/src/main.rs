// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(version, about = "Checks and patches PXE option ROM NVRAM images", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the directory, VPD and option ROM checksums of an NVRAM image
    Check {
        /// Path of the NVRAM binary dump
        #[arg(short, long, value_name = "NVRAM")]
        input: PathBuf,
    },
    /// Install an option ROM into an NVRAM image and recompute its checksums
    WriteOptionRom {
        /// Path of the input NVRAM binary dump
        #[arg(short, long, value_name = "NVRAM")]
        input: PathBuf,

        /// Path of the output NVRAM binary dump
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Path of the option ROM binary to write to the NVRAM image
        #[arg(short = 'r', long, value_name = "OPTION_ROM")]
        option_rom: PathBuf,
    },
    /// Print the header and directory of an NVRAM image
    Info {
        /// Path of the NVRAM binary dump
        #[arg(short, long, value_name = "NVRAM")]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let result = match &cli.command {
        Commands::Check { input } => commands::check(input),
        Commands::WriteOptionRom {
            input,
            output,
            option_rom,
        } => commands::write_option_rom(input, output, option_rom),
        Commands::Info { input } => commands::info(input),
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    });
}
