//! chatscope CLI binary entrypoint.

fn main() {
    if let Err(err) = chatscope_cli::app::run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
