fn main() {
    std::process::exit(programme_site::cli::run_from_env());
}
