// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=HOLOFRINGE_VERSION");

    // Packagers can pin the version string without a git checkout
    let version = match std::env::var("HOLOFRINGE_VERSION") {
        Ok(v) => v,
        Err(_) => describe_version(),
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `<crate version>-<short hash>` when built from git, plain crate version otherwise
fn describe_version() -> String {
    let crate_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());

    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
            format!("{}-{}", crate_version, hash)
        }
        _ => crate_version,
    }
}
