//! Command-line interface for the `skillgap` workforce-planning engine.

mod app;
mod cli;

fn main() -> std::process::ExitCode {
    app::run()
}
