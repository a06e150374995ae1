use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=CMDHUB_EXEC_PATH_HINT");

    let hint = env::var("CMDHUB_EXEC_PATH_HINT").ok();

    if let Some(raw_hint) = hint {
        let candidate = PathBuf::from(raw_hint);
        let canonical = candidate.canonicalize().unwrap_or(candidate);

        println!(
            "cargo:rustc-env=CMDHUB_EXEC_PATH_HINT={}",
            canonical.display()
        );
    }
}
