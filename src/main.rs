use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use konbini_scrape::config::Config;
use konbini_scrape::models::{Category, Site};
use konbini_scrape::pipeline::{Pipeline, PipelineSettings};
use konbini_scrape::scrapers::adapter_for;
use konbini_scrape::seeds::{read_url_list, write_url_list};
use konbini_scrape::storage::CsvSink;
use konbini_scrape::utils::http::create_client;

#[derive(Debug, Parser)]
#[command(name = "konbini-scrape", version, about = "Scrape convenience-store products into CSV")]
struct Cli {
    /// Settings file; `konbini.toml` is used when present
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrape every category listed in the seed file
    Scrape {
        #[arg(long, value_parser = parse_site)]
        site: Site,

        #[arg(long, value_name = "FILE", default_value = "urls_category.txt")]
        seeds: PathBuf,

        /// Defaults to `<site>.csv`; rows are appended to an existing file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Save the product URLs of every seed category as `urls_<category>.txt`
    Collect {
        #[arg(long, value_parser = parse_site)]
        site: Site,

        #[arg(long, value_name = "FILE", default_value = "urls_all.txt")]
        seeds: PathBuf,

        #[arg(long, value_name = "DIR", default_value = "urls")]
        out_dir: PathBuf,
    },

    /// Scrape detail pages from saved `urls_<category>.txt` lists
    Details {
        #[arg(long, value_parser = parse_site)]
        site: Site,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(value_name = "URL_LIST", required = true)]
        lists: Vec<PathBuf>,
    },
}

fn parse_site(key: &str) -> Result<Site, String> {
    Site::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = Site::ALL.iter().map(|s| s.key()).collect();
        format!("unknown site '{}' (expected one of: {})", key, known.join(", "))
    })
}

fn default_output(site: Site) -> PathBuf {
    PathBuf::from(format!("{}.csv", site.key()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("konbini_scrape=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Scrape { site, seeds, output } => {
            let output = output.unwrap_or_else(|| default_output(site));
            scrape(&config, site, &seeds, &output).await
        }
        Command::Collect { site, seeds, out_dir } => collect(&config, site, &seeds, &out_dir).await,
        Command::Details { site, output, lists } => {
            let output = output.unwrap_or_else(|| default_output(site));
            details(&config, site, &lists, &output).await
        }
    }
}

async fn scrape(config: &Config, site: Site, seeds: &Path, output: &Path) -> Result<()> {
    // Seeds are validated before the output file is touched.
    let seeds = read_url_list(seeds)?;
    let adapter = adapter_for(site, config)?;
    let client = create_client(config)?;
    let pipeline = Pipeline::new(&client, adapter.as_ref(), PipelineSettings::from_config(config));

    info!(
        "Scraping {} categories from {}",
        seeds.len(),
        adapter.site_config().name
    );

    let mut sink = CsvSink::open_append(output)
        .with_context(|| format!("Cannot open {}", output.display()))?;
    let summary = pipeline.run(&seeds, &mut sink).await?;
    sink.finish()?;

    if !summary.failed.is_empty() {
        warn!("{} categories failed: {:?}", summary.failed.len(), summary.failed);
    }
    info!(
        "Saved {} rows from {} categories to {}",
        summary.rows,
        summary.categories,
        output.display()
    );

    Ok(())
}

async fn collect(config: &Config, site: Site, seeds: &Path, out_dir: &Path) -> Result<()> {
    let seeds = read_url_list(seeds)?;
    let adapter = adapter_for(site, config)?;
    let client = create_client(config)?;
    let pipeline = Pipeline::new(&client, adapter.as_ref(), PipelineSettings::from_config(config));

    info!("Collecting product URLs for {} categories", seeds.len());

    let mut saved = 0;
    for seed in &seeds {
        match pipeline.collect_product_urls(seed).await {
            Ok((category, urls)) if urls.is_empty() => {
                warn!("{}: no product URLs found at {}", category, seed);
            }
            Ok((category, urls)) => {
                let path = write_url_list(out_dir, &category, &urls)?;
                info!("{}: {} URLs saved to {}", category, urls.len(), path.display());
                saved += 1;
            }
            Err(e) if e.is_category_scoped() => warn!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Wrote {} URL lists to {}", saved, out_dir.display());
    Ok(())
}

async fn details(config: &Config, site: Site, lists: &[PathBuf], output: &Path) -> Result<()> {
    let mut batches = Vec::new();
    for list in lists {
        batches.push((Category::from_url_list(list), read_url_list(list)?));
    }

    let adapter = adapter_for(site, config)?;
    let client = create_client(config)?;
    let pipeline = Pipeline::new(&client, adapter.as_ref(), PipelineSettings::from_config(config));

    let mut sink = CsvSink::open_append(output)
        .with_context(|| format!("Cannot open {}", output.display()))?;

    for (category, urls) in &batches {
        info!("{}: {} detail pages", category, urls.len());
        let rows = pipeline.scrape_detail_urls(category, urls, &mut sink).await?;
        if rows == 0 {
            warn!("{}: no rows written", category);
        }
    }

    let rows = sink.rows();
    sink.finish()?;
    info!("Saved {} rows to {}", rows, output.display());

    Ok(())
}
