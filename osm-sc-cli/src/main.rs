//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(err) = osm_sc_cli::run() {
        report(&err);
        std::process::exit(1);
    }
}

#[expect(clippy::print_stderr, reason = "fatal errors are reported on stderr")]
fn report(err: &osm_sc_cli::CliError) {
    eprintln!("osm-sc: {err}");
}
