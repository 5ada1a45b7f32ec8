fn main() {
    if let Err(err) = readfocus_lib::run() {
        eprintln!("readfocus: {err:#}");
        std::process::exit(1);
    }
}
