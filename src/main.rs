use std::process::ExitCode;

fn main() -> ExitCode {
    match bot_or_top::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
