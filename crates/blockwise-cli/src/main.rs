//! blockwise - block-cipher mode encryption from the command line

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        cli::exit_with_error(e);
    }
}
