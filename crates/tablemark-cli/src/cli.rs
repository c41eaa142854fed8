use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Annotate table columns and rows on PDF pages and derive cell boxes.
#[derive(Debug, Parser)]
#[command(name = "tablemark", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run an annotation session, reading one action per line
    Session {
        /// Path to the PDF file to load at start
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read actions from this file instead of stdin
        #[arg(long)]
        script: Option<PathBuf>,

        /// Page image resolution in dots per inch
        #[arg(long, default_value_t = 72.0, value_parser = parse_dpi)]
        dpi: f64,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,
    },

    /// Intersect saved column and row shapes without a document
    Intersect {
        /// Canvas JSON file holding the column shapes
        #[arg(long, value_name = "PATH")]
        columns: PathBuf,

        /// Canvas JSON file holding the row shapes
        #[arg(long, value_name = "PATH")]
        rows: PathBuf,

        /// Page number recorded in the result (1-based)
        #[arg(long, default_value_t = 1, value_parser = parse_page)]
        page: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Json)]
        format: TextFormat,
    },

    /// Display page count and page image sizes
    Info {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page image resolution in dots per inch
        #[arg(long, default_value_t = 72.0, value_parser = parse_dpi)]
        dpi: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,
    },

    /// Render columns, rows and cells of one page as SVG
    Debug {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Canvas JSON file holding the column shapes
        #[arg(long, value_name = "PATH")]
        columns: PathBuf,

        /// Canvas JSON file holding the row shapes
        #[arg(long, value_name = "PATH")]
        rows: PathBuf,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1, value_parser = parse_page)]
        page: usize,

        /// Page image resolution in dots per inch
        #[arg(long, default_value_t = 72.0, value_parser = parse_dpi)]
        dpi: f64,

        /// Write the SVG here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Leave intersection cells out of the drawing
        #[arg(long)]
        no_cells: bool,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TextFormat {
    Text,
    Json,
}

/// Resolution must be a finite, positive number of dots per inch.
fn parse_dpi(s: &str) -> Result<f64, String> {
    let dpi: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if dpi.is_finite() && dpi > 0.0 {
        Ok(dpi)
    } else {
        Err(format!("dpi must be a positive number, got '{s}'"))
    }
}

/// 1-based page number.
fn parse_page(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("page numbers start at 1".to_string()),
        Ok(page) => Ok(page),
        Err(_) => Err(format!("'{s}' is not a page number")),
    }
}
