use std::process::ExitCode;

fn main() -> ExitCode {
    order_cleanse_lib::run()
}
