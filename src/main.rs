//! scrape-search CLI - search the web by scraping search engine result pages.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use scrape_search::{
    engines::EngineContext,
    proxy::{ProxyConfig, ProxyPolicy, ProxyPool, ProxyProtocol},
    Engine, PremiumSearch, Search, SearchOptions, SearchQuery, SearchResult, Settings,
};

/// scrape-search - resilient multi-engine web search
#[derive(Parser)]
#[command(name = "scrape-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, falling back through the engines in the given order
    Search(SearchArgs),

    /// Paid search through the SERP proxy (Google only)
    Premium(PremiumArgs),

    /// List available search engines
    Engines,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Engines to try, in order (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "bing,ddg_html,yahoo")]
    engines: Vec<String>,

    /// File extensions to drop from the results (comma-separated, e.g. pdf,doc)
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Engines to allow even if restricted (comma-separated)
    #[arg(long, value_delimiter = ',')]
    force_allow: Vec<String>,

    /// Locale / target country (e.g. de)
    #[arg(long)]
    locale: Option<String>,

    /// Maximum number of results to display
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Fetch timeout in seconds (overrides SCRAPE_SEARCH_TIMEOUT_SECS)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Proxy URL (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080)
    #[arg(short, long)]
    proxy: Option<String>,
}

#[derive(Parser)]
struct PremiumArgs {
    /// Search query
    query: String,

    /// Country the results should be localized for (e.g. de)
    #[arg(short, long)]
    country: Option<String>,

    /// Accept that every call may be billed by the proxy provider
    #[arg(long)]
    accept_usage: bool,

    /// Maximum number of results to display
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Proxy URL of the SERP proxy
    #[arg(short, long)]
    proxy: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Premium(args) => run_premium(args).await,
        Commands::Engines => list_engines(),
    }
}

fn list_engines() -> Result<()> {
    let (context, _) = build_context(&Settings::from_env(), None)?;
    let search = Search::with_default_engines(context)?;

    println!("Available search engines:\n");
    for shortcut in search.available_engines() {
        print_engine(&search, &shortcut);
    }
    println!();
    println!("Restricted (require --force-allow):\n");
    for shortcut in search.restricted_engines() {
        print_engine(&search, &shortcut);
    }
    println!();
    println!("Usage: scrape-search search \"query\" -e bing,ddg_html -x pdf");
    Ok(())
}

fn print_engine(search: &Search, shortcut: &str) {
    if let Some(engine) = search.engine(shortcut) {
        println!("    {:<10} - {}", shortcut, engine.name());
    }
}

/// Builds the engine context and the proxy policy from settings and flags.
fn build_context(settings: &Settings, proxy_url: Option<&str>) -> Result<(EngineContext, bool)> {
    let (pool, proxy_enabled) = match proxy_url {
        Some(url) => (ProxyPool::with_proxies(vec![parse_proxy_url(url)?]), true),
        None => (ProxyPool::new(), settings.proxy_enabled),
    };
    let context = EngineContext::from_settings(settings, Arc::new(pool))?;
    Ok((context, proxy_enabled))
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let mut settings = Settings::from_env();
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }

    let (context, proxy_enabled) = build_context(&settings, args.proxy.as_deref())?;
    if proxy_enabled && matches!(args.format, OutputFormat::Text) {
        if let Some(proxy_url) = &args.proxy {
            eprintln!("Using proxy: {}", proxy_url);
        }
    }

    let search = Search::with_default_engines(context)?;

    let mut query = SearchQuery::new(&args.query);
    if let Some(locale) = &args.locale {
        query = query.with_locale(locale);
    }

    let proxy = if proxy_enabled {
        ProxyPolicy::enabled()
    } else {
        ProxyPolicy::disabled()
    };
    let options = SearchOptions::new()
        .with_proxy(proxy)
        .with_excluded_extensions(args.exclude)
        .with_force_allow(args.force_allow);

    let results = search.search(&query, &args.engines, options).await?;
    print_results(&args.query, &results, args.limit, args.format)
}

async fn run_premium(args: PremiumArgs) -> Result<()> {
    let settings = Settings::from_env();
    let (context, proxy_enabled) = build_context(&settings, args.proxy.as_deref())?;
    let cache = context.cache.clone();
    let search = Arc::new(Search::with_default_engines(context)?);

    let premium = PremiumSearch::new(search, cache)
        .with_proxy_enabled(proxy_enabled)
        .with_accept_usage(args.accept_usage);

    let results = premium.search(&args.query, args.country.as_deref()).await?;
    print_results(&args.query, &results, args.limit, args.format)
}

fn print_results(
    searched: &str,
    results: &[SearchResult],
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!(
                "\nSearch results for \"{}\" ({} results):\n",
                searched,
                results.len()
            );

            for (i, result) in results.iter().take(limit).enumerate() {
                println!("{}. {}", i + 1, result.title);
                println!("   URL: {}", result.link);
                if let Some(description) = &result.description {
                    let short: String = description.chars().take(150).collect();
                    if short.len() < description.len() {
                        println!("   {}...", short);
                    } else {
                        println!("   {}", short);
                    }
                }
                println!("   Engine: {}", result.engine_url);
                println!();
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = results.iter().take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Compact => {
            for result in results.iter().take(limit) {
                println!("{}\t{}", result.title, result.link);
            }
        }
    }

    Ok(())
}

fn parse_proxy_url(url: &str) -> Result<ProxyConfig> {
    let url = url::Url::parse(url)?;

    let protocol = match url.scheme() {
        "http" => ProxyProtocol::Http,
        "https" => ProxyProtocol::Https,
        "socks5" => ProxyProtocol::Socks5,
        scheme => anyhow::bail!("Unsupported proxy protocol: {}", scheme),
    };

    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("Missing proxy host"))?;
    let port = url.port().unwrap_or(match protocol {
        ProxyProtocol::Http | ProxyProtocol::Https => 8080,
        ProxyProtocol::Socks5 => 1080,
    });

    let mut config = ProxyConfig::new(host, port).with_protocol(protocol);

    if let Some(password) = url.password() {
        config = config.with_auth(url.username(), password);
    }

    Ok(config)
}
