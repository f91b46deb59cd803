use clap::Parser;

use postbook::cli::{self, Cli, Commands};
use postbook::{logger, settings};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let data_dir = settings::get_data_dir(cli.data_dir.as_deref());

    let result = match &cli.command {
        Commands::Init => cli::init::run(cli.data_dir.as_deref()),
        Commands::Import { file, category } => cli::import::run(&data_dir, file, *category),
        Commands::List {
            category,
            from,
            to,
            name,
            status,
        } => cli::list::run(
            &data_dir,
            *category,
            from.as_deref(),
            to.as_deref(),
            name.as_deref(),
            status.as_deref(),
        ),
        Commands::Post(args) => cli::mark::run(&data_dir, args, true),
        Commands::Unpost(args) => cli::mark::run(&data_dir, args, false),
        Commands::Delete(args) => cli::delete::run(&data_dir, args),
        Commands::Export { path } => cli::export::run(&data_dir, path),
        Commands::Status => cli::status::run(&data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
