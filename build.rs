//! Build script for scoutlist.
//!
//! Copies `.env.example` and `scout.example.json` into the local data
//! directory (`~/.local/share/scoutlist` on Linux) so users find
//! configuration templates where the binary looks for its configuration.
//! Missing templates or an unwritable data directory only produce a cargo
//! warning.

use std::{env, fs, path::PathBuf};

const TEMPLATES: [&str; 2] = [".env.example", "scout.example.json"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for template in TEMPLATES {
        println!("cargo:rerun-if-changed={}", template);
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("scoutlist");
    if let Err(e) = fs::create_dir_all(&out_dir) {
        // read-only home directories (CI, sandboxes) must not break the build
        println!("cargo:warning=cannot create {}: {}", out_dir.display(), e);
        return Ok(());
    }

    for template in TEMPLATES {
        let source = manifest_dir.join(template);
        if !source.is_file() {
            println!("cargo:warning={} not found at {}", template, source.display());
            continue;
        }
        if let Err(e) = fs::copy(&source, out_dir.join(template)) {
            println!("cargo:warning=cannot copy {}: {}", template, e);
        }
    }

    Ok(())
}
