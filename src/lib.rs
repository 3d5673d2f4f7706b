pub mod config;
pub mod log;
pub mod revision;
pub mod shim;
pub mod state;

/// Version string baked in at compile time by `build.rs`.
/// Format: `version-<7-char-commit-hash>` (e.g., `version-abc1234`), or `dev`.
pub const VERSION: &str = env!("BOOTSHIM_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        // build.rs should always set BOOTSHIM_VERSION
        assert!(!VERSION.is_empty());
    }
}
