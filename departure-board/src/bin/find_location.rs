use std::process::ExitCode;

use clap::Parser;

use departure_board::app::run_locate;
use departure_board::cli::{LocateArgs, init_tracing};
use departure_board::config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = LocateArgs::parse();
    init_tracing(args.debug);

    run_locate(args, Settings::load()).await.into()
}
