use clap::Parser;

use employee_rs::cli::{self, Cli, Outcome};
use employee_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    let log_handle = cli::init_logger_from_settings(&settings)?;

    let outcome = cli::execute_command(&cli, settings.clone()).await?;
    match outcome {
        Outcome::StartServer => {
            Server::new(settings)
                .with_log_reload(log_handle, move || {
                    Ok(cli::load_and_merge_config(&cli)?.logger.level)
                })
                .run()
                .await
        }
        Outcome::Done => Ok(()),
    }
}
