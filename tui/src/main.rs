use clap::Parser;
use shellchat_tui::Cli;
use shellchat_tui::run_main;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli).await
}
