mod error;
mod fetch;
mod parser;
mod profile;
mod store;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use fetch::HeroLink;
use parser::HeroTips;
use profile::{Lang, LanguageProfile};
use store::HeroStore;

/// Pages handed to the extraction pool per batch.
const EXTRACT_CHUNK: usize = 32;

#[derive(Parser)]
#[command(name = "hero_tips", about = "Dota 2 wiki hero guide extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every hero guide, update the JSON store and write the HTML report
    Run {
        /// Wiki edition(s) to process
        #[arg(short, long, value_enum, default_value_t = LangChoice::All)]
        lang: LangChoice,
        /// Max heroes per edition (default: all listed on the home page)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Directory holding heroes-<lang>.json and heroes-<lang>.html
        #[arg(long, env = "HERO_TIPS_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Fetch a single hero guide (e.g. /Abaddon) and print its tips
    Hero {
        path: String,
        #[arg(short, long, value_enum, default_value_t = Lang::En)]
        lang: Lang,
    },
    /// Extract tips from a saved guide page
    Parse {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Lang::En)]
        lang: Lang,
        /// Hero alias recorded in the output (default: file stem)
        #[arg(long)]
        alias: Option<String>,
        /// Print the full hero record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LangChoice {
    En,
    Ru,
    All,
}

impl LangChoice {
    fn langs(self) -> Vec<Lang> {
        match self {
            LangChoice::En => vec![Lang::En],
            LangChoice::Ru => vec![Lang::Ru],
            LangChoice::All => vec![Lang::En, Lang::Ru],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { lang, limit, data_dir } => {
            let client = fetch::client()?;
            let (client, data_dir) = (&client, data_dir.as_path());
            run_languages(&lang.langs(), move |lang| {
                run_language(client, lang, limit, data_dir)
            })
            .await
        }
        Commands::Hero { path, lang } => {
            let client = fetch::client()?;
            let profile = LanguageProfile::for_lang(lang);
            let path = if path.starts_with('/') { path } else { format!("/{path}") };
            let link = HeroLink::new(&profile, &path);
            let html = fetch::fetch_html(&client, &link.url).await?;
            let hero = parser::process_page(&link.alias, &link.url, &html, &profile);
            print_hero(&hero, false)
        }
        Commands::Parse { file, lang, alias, json } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let alias = alias.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let profile = LanguageProfile::for_lang(lang);
            let hero = parser::process_page(&alias, &file.display().to_string(), &html, &profile);
            print_hero(&hero, json)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

#[derive(Debug, Default)]
struct RunCounts {
    heroes: usize,
    fetched: usize,
    fetch_errors: usize,
    section_failures: usize,
    updated: usize,
    avg_latency_ms: u64,
}

impl RunCounts {
    fn print(&self) {
        println!(
            "{} heroes: {} fetched ({} errors, avg {} ms), {} sections skipped, {} records updated.",
            self.heroes,
            self.fetched,
            self.fetch_errors,
            self.avg_latency_ms,
            self.section_failures,
            self.updated,
        );
    }
}

/// Run each edition in turn. A failed edition is logged and the next one
/// still runs; the error is reported once all of them are done.
async fn run_languages<F, Fut>(langs: &[Lang], mut run: F) -> anyhow::Result<()>
where
    F: FnMut(Lang) -> Fut,
    Fut: Future<Output = anyhow::Result<RunCounts>>,
{
    let mut failed = Vec::new();
    for &lang in langs {
        let t_lang = Instant::now();
        info!("Started parsing tips for {} language.", lang);
        match run(lang).await {
            Ok(counts) => {
                info!("Finished parsing tips for {} language.", lang);
                println!("[{}] done in {}", lang, format_duration(t_lang.elapsed()));
                counts.print();
            }
            Err(e) => {
                error!(%lang, "Failed parsing tips for {} language: {:#}", lang, e);
                failed.push(lang.to_string());
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} languages failed: {}", failed.len(), langs.len(), failed.join(", "));
    }
    Ok(())
}

/// Enumerate, fetch, extract and persist one wiki edition.
async fn run_language(
    client: &reqwest::Client,
    lang: Lang,
    limit: Option<usize>,
    data_dir: &Path,
) -> anyhow::Result<RunCounts> {
    let profile = LanguageProfile::for_lang(lang);
    let mut store = HeroStore::open(&store::json_path(data_dir, lang))?;

    let mut links = fetch::fetch_hero_links(client, &profile).await?;
    if let Some(limit) = limit {
        links.truncate(limit);
    }
    let heroes = links.len();

    println!("[{}] Fetching {} hero guides...", lang, heroes);
    let pages = fetch::fetch_guides(client, links).await?;

    let mut fetched = Vec::with_capacity(pages.len());
    let mut fetch_errors = 0usize;
    let mut latency_total = 0u64;
    for page in pages {
        latency_total += page.latency_ms;
        match page.html {
            Ok(html) => fetched.push((page.link, html)),
            Err(e) => {
                fetch_errors += 1;
                error!(
                    hero = %page.link.alias,
                    path = %page.link.path,
                    url = %page.link.url,
                    "Error fetching hero page: {:#}",
                    e
                );
            }
        }
    }

    println!("[{}] Extracting {} pages...", lang, fetched.len());
    let extracted = extract_pages(&profile, &fetched)?;

    let mut updated = 0usize;
    let mut section_failures = 0usize;
    for hero in &extracted {
        section_failures += hero.failures.len();
        if store.merge_tips(&hero.alias, &hero.tips) {
            updated += 1;
        }
        info!("Finished parsing hero: {}", hero.alias);
    }

    store.save()?;
    store::write_html(&store::html_path(data_dir, lang), &extracted)?;

    Ok(RunCounts {
        heroes,
        fetched: fetched.len(),
        fetch_errors,
        section_failures,
        updated,
        avg_latency_ms: latency_total.checked_div(heroes as u64).unwrap_or(0),
    })
}

/// Extract every fetched page; each worker parses its own document.
fn extract_pages(
    profile: &LanguageProfile,
    pages: &[(HeroLink, String)],
) -> anyhow::Result<Vec<HeroTips>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let mut heroes = Vec::with_capacity(pages.len());
    for chunk in pages.chunks(EXTRACT_CHUNK) {
        let results: Vec<HeroTips> = chunk
            .par_iter()
            .map(|(link, html)| parser::process_page(&link.alias, &link.url, html, profile))
            .collect();
        heroes.extend(results);
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(heroes)
}

fn print_hero(hero: &HeroTips, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(hero)?);
        return Ok(());
    }
    println!("{}", hero.tips);
    for failure in &hero.failures {
        eprintln!("skipped {}: {}", failure.section, failure.reason);
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
