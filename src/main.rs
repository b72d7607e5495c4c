use clap::Parser;
use sitesnap::results::ScrapedSite;
use sitesnap::{ScrapeConfig, ScrapeOptions, summarize};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    println!("Note: local scraping requires a WebDriver server (e.g. ChromeDriver).");
    println!(
        "Set the WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    // Load configuration and apply CLI overrides
    let mut config = match &args.config {
        Some(path) => match ScrapeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration: {}", e);
                std::process::exit(1);
            }
        },
        None => ScrapeConfig::default(),
    };
    config.max_concurrency = args.concurrency;
    let config = config.with_env_overrides();

    let options = ScrapeOptions {
        prefer_cloud: args.cloud,
    };

    let urls: Vec<String> = args
        .urls
        .iter()
        .map(|url| sitesnap::utils::normalize_input_url(url))
        .collect();

    ::log::info!("Starting snapshot run for {} URL(s)", urls.len());
    let start_time = std::time::Instant::now();

    // Scrape through the bounded worker pool and handle results as they land
    let mut rx = sitesnap::scrape_many(config, urls, options);

    let mut succeeded = 0;
    let mut failed = 0;
    while let Some((url, result)) = rx.recv().await {
        match result {
            Ok(site) => {
                succeeded += 1;
                if let Err(e) = emit_snapshot(&args, &url, &site) {
                    ::log::error!("Failed to write snapshot for {}: {}", url, e);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("FAILED {url}: {e}");
            }
        }
    }

    ::log::info!(
        "Snapshot run complete: {} succeeded, {} failed in {:.2} seconds",
        succeeded,
        failed,
        start_time.elapsed().as_secs_f64()
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Print or persist one snapshot according to the CLI flags
fn emit_snapshot(args: &Args, url: &str, site: &ScrapedSite) -> std::io::Result<()> {
    if args.summary {
        let summary = summarize(site);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let json = serde_json::to_string_pretty(site)?;
    match &args.output {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let filename = format!("{}.json", sitesnap::utils::sanitize_filename(url));
            let path = dir.join(filename);
            std::fs::write(&path, json)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
