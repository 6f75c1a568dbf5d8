//! Link a CBLAS provider when the `blas` feature is on.
//!
//! `OPENBLAS_LIB_DIR` adds a search path; `KERNELS_CBLAS_LIB` replaces the
//! library name (default `openblas`), e.g. `cblas` or `blis`.

fn main() {
    println!("cargo:rerun-if-env-changed=OPENBLAS_LIB_DIR");
    println!("cargo:rerun-if-env-changed=KERNELS_CBLAS_LIB");
    if std::env::var_os("CARGO_FEATURE_BLAS").is_none() {
        return;
    }

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let search_dirs: Vec<String> = match std::env::var("OPENBLAS_LIB_DIR") {
        Ok(dir) => vec![dir],
        // Homebrew on Apple Silicon, then Intel
        Err(_) if target_os == "macos" => vec![
            "/opt/homebrew/opt/openblas/lib".into(),
            "/usr/local/opt/openblas/lib".into(),
        ],
        Err(_) => Vec::new(),
    };
    for dir in search_dirs {
        println!("cargo:rustc-link-search=native={dir}");
    }

    let lib = std::env::var("KERNELS_CBLAS_LIB").unwrap_or_else(|_| "openblas".into());
    println!("cargo:rustc-link-lib={lib}");
}
