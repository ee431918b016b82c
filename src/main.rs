mod app;
mod cli;
mod interactive;

use std::process;

fn main() {
    let cli = cli::parse();
    ffkit::logging::init(cli.verbose);

    if let Err(e) = app::run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
