// Records where the shipped catalogs live so the binaries find `data/`
// without CAMPUS_PERKS_ROOT when run from this checkout.
use std::env;
use std::path::Path;

const HINT_VAR: &str = "CAMPUS_PERKS_ROOT_HINT";

fn main() {
    println!("cargo:rerun-if-env-changed={HINT_VAR}");
    println!("cargo:rerun-if-changed=data/catalogs.json");

    let Some(root) = env::var(HINT_VAR)
        .or_else(|_| env::var("CARGO_MANIFEST_DIR"))
        .ok()
    else {
        return;
    };
    let root = Path::new(&root);
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    println!("cargo:rustc-env={HINT_VAR}={}", root.display());
}
