use std::process::ExitCode;

use soop_driver::{Argument, Parser};

fn main() -> ExitCode {
    let argument = Argument::parse();
    soop_driver::run(argument)
}
