use std::process::ExitCode;

fn main() -> ExitCode {
    match grid_size_fit::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(code = err.exit_code(), "exiting with error");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
