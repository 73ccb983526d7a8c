use torbox_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_download, run_list};
use torbox_lib::error::TorboxError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), TorboxError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::List(params) => run_list(params).await?,
        ResolvedCommand::Download(params) => run_download(params).await?,
    }

    Ok(())
}
