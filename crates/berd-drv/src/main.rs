use std::path::PathBuf;

use anyhow::Result;

use berd_drv::exit_code;

fn main() {
    let code = match real_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_code::ERROR
        }
    };
    std::process::exit(code);
}

fn real_main() -> Result<i32> {
    let mut args = std::env::args_os().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("usage: berd <file>");
        return Ok(exit_code::USAGE);
    };
    berd_drv::run_file(&PathBuf::from(path))
}
