mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use wine_scraper::{Condenser, ScrapeJob, http_fetcher, logger, scrape_site};

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet));

    let config = cli.site_config();
    let condenser = Condenser::for_site(&config);

    match cli.command {
        Commands::Scrape {
            start,
            end,
            keep_staged,
            no_condense,
            ..
        } => {
            let (first, last) = config.default_pages;
            let job = ScrapeJob::new(start.unwrap_or(first), end.unwrap_or(last), !keep_staged)?;
            let fetcher = http_fetcher(config.timeout).context("Failed to build HTTP client")?;

            let summary = scrape_site(cli.site, config, job, fetcher).context("Scrape aborted")?;
            info!(
                "Staged {} records from {} pages ({} products skipped)",
                summary.records, summary.pages, summary.skipped
            );

            if !no_condense {
                condenser.condense().context("Failed to condense staged batches")?;
            }
        }
        Commands::Condense => {
            condenser.condense().context("Failed to condense staged batches")?;
        }
        Commands::Clean => {
            condenser.clear_all().context("Failed to remove scraped data")?;
            info!("Removed staged batches and combined output.");
        }
    }

    Ok(())
}
