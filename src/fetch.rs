use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use percent_encoding::percent_decode_str;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::profile::LanguageProfile;

const HOME_PATH: &str = "/Dota_2_Wiki";
const GUIDE_PATH: &str = "/Guide";
const USER_AGENT: &str = concat!("hero_tips/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONCURRENCY: usize = 4;
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;

static HERO_ENTRY: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".heroentry").unwrap());
static HREF: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// A hero listed on the wiki home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroLink {
    /// Link path as it appears on the home page, e.g. `/Nature%27s_Prophet`.
    pub path: String,
    pub alias: String,
    /// Decoded URL of the hero's guide page.
    pub url: String,
}

impl HeroLink {
    pub fn new(profile: &LanguageProfile, path: &str) -> Self {
        Self {
            path: path.to_string(),
            alias: hero_alias(path),
            url: decode(&format!("{}{}{}", profile.base_url, path, GUIDE_PATH)),
        }
    }
}

/// A guide page download; failures stay per hero.
pub struct FetchedPage {
    pub link: HeroLink,
    pub html: Result<String>,
    pub latency_ms: u64,
}

/// Key under which a hero is stored: `/Nature%27s_Prophet` → `natures_prophet`.
pub fn hero_alias(path: &str) -> String {
    let decoded = decode(path).replace(['\'', '-'], "");
    decoded
        .strip_prefix('/')
        .unwrap_or(&decoded)
        .to_lowercase()
}

fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Hero links from the home page: the first link inside each `.heroentry`.
pub fn hero_links(home_html: &str, profile: &LanguageProfile) -> Vec<HeroLink> {
    let document = Html::parse_document(home_html);
    document
        .select(&HERO_ENTRY)
        .filter_map(|entry| {
            let href = entry.select(&HREF).next()?.value().attr("href")?;
            Some(HeroLink::new(profile, href))
        })
        .collect()
}

pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch the home page of the profile's edition and list its heroes.
pub async fn fetch_hero_links(
    client: &Client,
    profile: &LanguageProfile,
) -> Result<Vec<HeroLink>> {
    let url = format!("{}{}", profile.base_url, HOME_PATH);
    info!("Fetching home page: {}", url);
    let html = fetch_html(client, &url)
        .await
        .with_context(|| format!("Failed to fetch home page {url}"))?;
    let links = hero_links(&html, profile);
    info!("Heroes listed on home page: {}", links.len());
    Ok(links)
}

/// Fetch one page, retrying rate limits and server errors with backoff.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    for attempt in 0..=MAX_RETRIES {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;
        let status = response.status();
        if status.is_success() {
            return response
                .text()
                .await
                .with_context(|| format!("Failed to read body of {url}"));
        }

        let should_retry = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
        if !should_retry || attempt == MAX_RETRIES {
            bail!("{url} returned {status}");
        }

        let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
        warn!(
            "{} on {} (attempt {}/{}), backing off {:.1}s",
            status,
            url,
            attempt + 1,
            MAX_RETRIES,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
    }

    bail!("{url}: retries exhausted")
}

/// Download every guide page with bounded concurrency.
/// The result keeps the order of `links`.
pub async fn fetch_guides(client: &Client, links: Vec<HeroLink>) -> Result<Vec<FetchedPage>> {
    let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
    let total = links.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, FetchedPage)>(CONCURRENCY * 2);

    for (index, link) in links.iter().cloned().enumerate() {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = match sem.acquire().await {
                Ok(permit) => permit,
                Err(_) => return,
            };
            let start = Instant::now();
            let html = fetch_html(&client, &link.url).await;
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!(hero = %link.alias, latency_ms, ok = html.is_ok(), "Fetched guide");
            let _ = tx.send((index, FetchedPage { link, html, latency_ms })).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut slots: Vec<Option<FetchedPage>> = links.iter().map(|_| None).collect();
    while let Some((index, page)) = rx.recv().await {
        pb.set_message(page.link.alias.clone());
        slots[index] = Some(page);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(in_link_order(links, slots))
}

/// One page per link, in link order. A task that ended without sending
/// (it panicked) becomes a failed page so every hero stays accounted for.
fn in_link_order(links: Vec<HeroLink>, slots: Vec<Option<FetchedPage>>) -> Vec<FetchedPage> {
    let lost = slots.iter().filter(|slot| slot.is_none()).count();
    if lost > 0 {
        warn!("{} of {} fetch tasks ended without a result", lost, links.len());
    }
    links
        .into_iter()
        .zip(slots)
        .map(|(link, slot)| {
            slot.unwrap_or_else(|| {
                warn!(hero = %link.alias, url = %link.url, "Fetch task lost");
                FetchedPage {
                    link,
                    html: Err(anyhow!("fetch task ended without a result")),
                    latency_ms: 0,
                }
            })
        })
        .collect()
}
