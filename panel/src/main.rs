use clap::Parser;
use std::error::Error;

use comment_panel::cli::{handle_command, Args};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    handle_command(args).await
}
