//! CLI module for Agri Predict
//!
//! - `serve`: HTTP API server (default)
//! - `detect`: run disease detection on local image files

pub mod detect;
pub mod serve;

use clap::{Parser, Subcommand};

/// Agri Predict - crop, disease and fertilizer predictions for farmers
#[derive(Parser)]
#[command(name = "agri-predict")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Detect leaf disease in image files and print one JSON line per file
    Detect(detect::DetectArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["agri-predict"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_detect_requires_files() {
        assert!(Cli::try_parse_from(["agri-predict", "detect"]).is_err());

        let cli = Cli::try_parse_from(["agri-predict", "detect", "a.jpg", "b.png"]).unwrap();
        match cli.command {
            Some(Command::Detect(args)) => assert_eq!(args.files.len(), 2),
            _ => panic!("expected detect command"),
        }
    }
}
