fn main() {
    if let Err(e) = bootkit_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
