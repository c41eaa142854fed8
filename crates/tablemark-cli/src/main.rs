mod cli;
mod debug_cmd;
mod info_cmd;
mod intersect_cmd;
mod session_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Session {
            ref file,
            ref script,
            dpi,
            ref password,
        } => session_cmd::run(file.as_deref(), script.as_deref(), dpi, password.as_deref()),
        cli::Commands::Intersect {
            ref columns,
            ref rows,
            page,
            ref format,
        } => intersect_cmd::run(columns, rows, page, format),
        cli::Commands::Info {
            ref file,
            dpi,
            ref format,
            ref password,
        } => info_cmd::run(file, dpi, format, password.as_deref()),
        cli::Commands::Debug {
            ref file,
            ref columns,
            ref rows,
            page,
            dpi,
            ref output,
            no_cells,
            ref password,
        } => debug_cmd::run(
            file,
            columns,
            rows,
            page,
            dpi,
            output.as_deref(),
            no_cells,
            password.as_deref(),
        ),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
