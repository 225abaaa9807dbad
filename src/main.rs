fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let exit_code = rbc::run(&argv);
    std::process::exit(exit_code);
}
