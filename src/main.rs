fn main() {
    if let Err(err) = decision_path_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
