use clap::Parser;

fn main() {
    let cfg = passkey_probe::config::Config::parse();
    if let Err(e) = passkey_probe::run(cfg) {
        eprintln!("Error: {e:#}");
        std::process::exit(-1);
    }
}
