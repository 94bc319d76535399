//! ants-dbm CLI entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = ants_dbm::run() {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
