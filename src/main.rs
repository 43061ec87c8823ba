//! # Voxel Terrain Entry Point
//!
//! This is the main entry point for the headless streaming demo. It simply
//! calls into the library's `run()` function, passing the optional
//! configuration file named on the command line.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- world.json
//! ```

use std::{path::PathBuf, process::ExitCode};

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    match voxel_terrain::run(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("voxel-terrain: {e}");
            ExitCode::FAILURE
        }
    }
}
