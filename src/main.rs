fn main() {
    if let Err(err) = shortcut_coach_lib::run() {
        eprintln!("shortcut-coach: {err:#}");
        std::process::exit(1);
    }
}
