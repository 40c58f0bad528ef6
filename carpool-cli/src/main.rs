//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = carpool_cli::logging::init().and_then(|()| carpool_cli::run()) {
        eprintln!("carpool: {err}");
        std::process::exit(1);
    }
}
