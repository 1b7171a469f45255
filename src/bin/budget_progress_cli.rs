use std::{env, process};

use budget_progress::cli::{output, run_cli};

fn main() {
    if let Err(err) = run_cli(env::args().skip(1).collect()) {
        output::error(&err);
        process::exit(1);
    }
}
