//! verdocs binary entry point.

use verdocs::cli;
use verdocs::ui::output;

fn main() {
    if let Err(err) = cli::run() {
        // {:#} renders the whole anyhow context chain on one line.
        output::error(format_args!("{:#}", err));
        std::process::exit(1);
    }
}
