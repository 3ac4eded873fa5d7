mod commands;
mod server;
mod terminal;

use commands::{CommandLine, Commands, scan, serve};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose, commands.quiet);

    match commands.command {
        Commands::Serve { server, scan } => {
            print::banner();
            serve::serve(server.to_config(), &scan.to_config()).await
        }
        Commands::Scan {
            ip_prefix,
            port,
            credentials,
            scan,
        } => {
            if !commands.quiet {
                print::banner();
                print::header("getting ready to sweep");
            }
            scan::scan(&ip_prefix, port, &credentials, &scan.to_config()).await
        }
    }
}
