use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use wine_scraper::{Site, SiteConfig};

#[derive(Parser)]
#[command(name = "wine_scraper")]
#[command(version, about = "Scrape wine listings into staged JSON batches and condense them", long_about = None)]
pub struct Cli {
    /// Store to scrape
    #[arg(value_enum)]
    pub site: Site,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory for per-page batch files
    #[arg(long, global = true)]
    pub staging_dir: Option<PathBuf>,

    /// Directory the combined file is written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a page range, then condense the staged batches
    Scrape {
        /// First page (defaults to the site's first page)
        #[arg(long)]
        start: Option<u32>,

        /// Last page, inclusive (defaults to the site's last page)
        #[arg(long)]
        end: Option<u32>,

        /// Keep batches staged by earlier runs
        #[arg(long)]
        keep_staged: bool,

        /// Leave the batches staged without condensing them
        #[arg(long)]
        no_condense: bool,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Merge whatever is staged into the combined file
    Condense,

    /// Remove staged batches and the combined file
    Clean,
}

impl Cli {
    pub fn site_config(&self) -> SiteConfig {
        let mut config = self.site.config();
        if let Some(dir) = &self.staging_dir {
            config.staging_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Commands::Scrape {
            timeout_secs: Some(secs),
            ..
        } = self.command
        {
            config.timeout = Some(Duration::from_secs(secs));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scrape() {
        let cli = Cli::parse_from([
            "wine_scraper",
            "everything-wine",
            "scrape",
            "--start",
            "2",
            "--end",
            "5",
            "--keep-staged",
            "--timeout-secs",
            "30",
        ]);
        assert_eq!(cli.site, Site::EverythingWine);
        let config = cli.site_config();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        match cli.command {
            Commands::Scrape {
                start,
                end,
                keep_staged,
                no_condense,
                ..
            } => {
                assert_eq!((start, end), (Some(2), Some(5)));
                assert!(keep_staged);
                assert!(!no_condense);
            }
            _ => panic!("expected scrape"),
        }
    }

    #[test]
    fn test_dir_overrides() {
        let cli = Cli::parse_from([
            "wine_scraper",
            "bcliquor",
            "condense",
            "--staging-dir",
            "/tmp/stage",
            "--output-dir",
            "/tmp/out",
        ]);
        let config = cli.site_config();
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/stage"));
        assert_eq!(
            config.combined_output_path(),
            PathBuf::from("/tmp/out/bcliquor_data.json")
        );
    }
}
