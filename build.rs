//! Build script for GPU Portal
//!
//! When the `ui` feature is enabled, checks that Trunk is available and that
//! the Leptos UI has been built into `ui/dist`.

fn main() {
    // Re-run this script if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "ui")]
    {
        check_trunk();
        check_dist();
        println!("cargo:rerun-if-changed=ui/dist/");
        println!("cargo:rerun-if-changed=ui/src/");
        println!("cargo:rerun-if-changed=ui/index.html");
        println!("cargo:rerun-if-changed=ui/Cargo.toml");
    }
}

/// Trunk builds the wasm bundle; warn when it is missing.
#[cfg(feature = "ui")]
fn check_trunk() {
    use std::process::Command;

    match Command::new("trunk").arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            println!("cargo:warning=GPU Portal UI: found {}", version.trim());
        }
        _ => {
            println!("cargo:warning=GPU Portal UI: `trunk` not found");
            println!("cargo:warning=  Install it with: cargo install trunk");
            println!("cargo:warning=  and add the target: rustup target add wasm32-unknown-unknown");
        }
    }
}

#[cfg(feature = "ui")]
fn check_dist() {
    if !std::path::Path::new("ui/dist/index.html").exists() {
        println!("cargo:warning=GPU Portal UI: ui/dist/index.html is missing");
        println!("cargo:warning=  Run `trunk build --release` in ui/ before building with --features ui");
    }
}
