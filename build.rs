// build.rs: stamp the toolchain version and target triple into the binary.
//
// `GO_VERSION` selects the bundled toolchain version at build time, so the
// cache directory of a launcher is tied to the payload it carries. Without
// it the package version is used.

fn main() {
    println!("cargo:rerun-if-env-changed=GO_VERSION");

    let version = std::env::var("GO_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=GO_APE_VERSION={}", version.trim());

    let target = std::env::var("TARGET")
        .expect("TARGET env var not set by Cargo. This should never happen in a normal build.");
    println!("cargo:rustc-env=TARGET={target}");
}
