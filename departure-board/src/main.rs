use std::process::ExitCode;

use clap::Parser;

use departure_board::app::run_board;
use departure_board::cli::{BoardArgs, init_tracing};
use departure_board::config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = BoardArgs::parse();
    init_tracing(args.debug);

    run_board(args, Settings::load()).await.into()
}
