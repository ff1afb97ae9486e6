use std::process::ExitCode;

fn main() -> ExitCode {
    pseu_drv::main()
}
