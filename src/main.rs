use std::process::ExitCode;

fn main() -> ExitCode {
    match git_user::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("git-user: {err:#}");
            ExitCode::FAILURE
        }
    }
}
