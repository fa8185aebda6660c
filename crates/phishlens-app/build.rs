use std::fs;
use std::path::Path;

// Exposes the root VERSION file as PHISHLENS_VERSION and derives the HTTP
// user agent from it.
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir");
    let version_path = Path::new(&manifest_dir).join("../../VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let raw = fs::read_to_string(&version_path)
        .unwrap_or_else(|error| panic!("read {}: {error}", version_path.display()));
    let version = raw.trim();

    let well_formed = version.split('.').count() == 3
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit()));
    assert!(well_formed, "VERSION must be MAJOR.MINOR.PATCH, got {version:?}");

    println!("cargo:rustc-env=PHISHLENS_VERSION={version}");
    println!("cargo:rustc-env=PHISHLENS_USER_AGENT=phishlens/{version}");
}
