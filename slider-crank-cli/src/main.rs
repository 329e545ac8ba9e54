//! Command line front-end of the slider-crank kinematic solver.
mod cli;

fn main() -> std::process::ExitCode {
    cli::Entry::main()
}
