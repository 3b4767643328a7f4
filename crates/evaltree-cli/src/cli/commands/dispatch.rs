use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Summary(args) => super::summary::run(args),
        Command::Tree(args) => super::tree::run(args),
        Command::Record(args) => super::record::run(args),
        Command::Records(args) => super::records::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
