mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;
use kmpgen::report::ErrorPayload;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    kmpgen::logging::init(cli.verbose);

    let ctx = Context {
        template_root: cli.template_root,
        config: cli.config,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Generate {
            project_name,
            package_name,
            output,
            bundle_id,
        } => commands::generate::run(&ctx, project_name, package_name, output, bundle_id),
        Commands::Validate { path } => commands::validate::run(&ctx, path),
        Commands::Deps => commands::deps::run(&ctx),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if ctx.json => {
            commands::print_json(&ErrorPayload::from(&e));
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
