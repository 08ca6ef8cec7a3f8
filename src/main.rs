fn main() {
    env_logger::init();
    if let Err(e) = kalang::cli::run_cli() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
