//! Tinymoe entry point.

#[cfg(feature = "cli")]
fn main() {
    if let Err(e) = tinymoe::cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("tinymoe was built without the \"cli\" feature");
    std::process::exit(1);
}
