use clap::Parser;

use payroll_cli::{Cli, logging, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}
