use std::process::Command;

/// Short HEAD of the checkout being built, if it is a git checkout.
fn short_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let hash = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn main() {
    // Release packaging pins BOOTSHIM_VERSION; local builds stamp the short HEAD
    // of this checkout, or "dev" outside a repository.
    println!("cargo:rerun-if-env-changed=BOOTSHIM_VERSION");

    let version = std::env::var("BOOTSHIM_VERSION").unwrap_or_else(|_| {
        short_head().map_or_else(|| "dev".to_string(), |hash| format!("version-{hash}"))
    });
    println!("cargo:rustc-env=BOOTSHIM_VERSION={version}");
}
