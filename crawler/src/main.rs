use anyhow::{anyhow, Context, Result};
use clap::Parser;
use moviesearch_core::MovieRecord;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

const DOMAIN: &str = "https://www.imdb.com";

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Crawl IMDB top-1000 movie pages to an id->record JSON file")]
struct Cli {
    /// Output JSON file path
    #[arg(long, default_value = "./data/movies.json")]
    output: String,
    /// Total number of movies in the catalog
    #[arg(long, default_value_t = 1000)]
    total: usize,
    /// Movies per list page
    #[arg(long, default_value_t = 50)]
    per_page: usize,
    /// Concurrent requests per batch
    #[arg(long, default_value_t = 5)]
    batch: usize,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent string to crawl with
    #[arg(
        long,
        default_value = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36"
    )]
    user_agent: String,
}

/// Pre-parsed CSS selectors, cloned into each fetch task.
#[derive(Clone)]
struct PageSelectors {
    list_anchor: Selector,
    title_block: Selector,
    year_anchor: Selector,
    credit_item: Selector,
    anchor: Selector,
    genre_anchor: Selector,
    cast_row: Selector,
    cast_label: Selector,
    actor_anchor: Selector,
    character_anchor: Selector,
}

impl PageSelectors {
    fn new() -> Self {
        let sel = |s: &str| Selector::parse(s).expect("valid selector");
        Self {
            list_anchor: sel(
                "div.lister-item.mode-simple .lister-item-content .col-title .lister-item-header a[href]",
            ),
            title_block: sel(".title_wrapper > h1"),
            year_anchor: sel("a"),
            credit_item: sel(".credit_summary_item"),
            anchor: sel("a"),
            genre_anchor: sel(r#"div.see-more.inline.canwrap a[href*="genres"]"#),
            cast_row: sel("table.cast_list tr"),
            cast_label: sel(".castlist_label"),
            actor_anchor: sel(r#"a[href*="name"]"#),
            character_anchor: sel(r#"a[href*="character"]"#),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    if let Some(dir) = std::path::Path::new(&args.output).parent() {
        fs::create_dir_all(dir).ok();
    }

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let sels = PageSelectors::new();

    let links = crawl_list_pages(&client, &sels, &args).await?;
    tracing::info!(num_links = links.len(), "movie links parsed");

    let records = crawl_movie_pages(&client, &sels, &args, &links).await?;
    tracing::info!(num_records = records.len(), "movie details parsed");

    let f = BufWriter::new(File::create(&args.output)?);
    serde_json::to_writer_pretty(f, &records)?;
    tracing::info!(output = %args.output, "movie data written");
    Ok(())
}

/// Fetches the top-1000 list pages and returns (movie_id, movie_url) pairs.
async fn crawl_list_pages(
    client: &Client,
    sels: &PageSelectors,
    args: &Cli,
) -> Result<Vec<(String, Url)>> {
    let num_pages = args.total.div_ceil(args.per_page);
    let urls: Vec<String> = (0..num_pages)
        .map(|page| {
            format!(
                "{DOMAIN}/search/title/?groups=top_1000&view=simple&sort=user_rating,desc&start={}&ref_=adv_nxt",
                page * args.per_page + 1
            )
        })
        .collect();

    let mut links = Vec::new();
    for chunk in urls.chunks(args.batch) {
        let mut handles = Vec::new();
        for url in chunk {
            let client = client.clone();
            let sels = sels.clone();
            let url = url.clone();
            handles.push(tokio::spawn(async move {
                let body = client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                parse_list_page(&body, &sels)
            }));
        }
        for h in handles {
            match h.await? {
                Ok(page_links) => links.extend(page_links),
                Err(err) => tracing::warn!(%err, "list page skipped"),
            }
        }
        tracing::info!(parsed = links.len(), total = args.total, "list crawl progress");
    }
    Ok(links)
}

/// Extracts movie ids and absolute detail-page links from a list page.
fn parse_list_page(body: &str, sels: &PageSelectors) -> Result<Vec<(String, Url)>> {
    let doc = Html::parse_document(body);
    let base = Url::parse(DOMAIN)?;
    let mut links = Vec::new();
    for anchor in doc.select(&sels.list_anchor) {
        let href = match anchor.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        // href looks like /title/tt0111161/?ref_=...
        let movie_id = match href.split('/').nth(2) {
            Some(id) if id.starts_with("tt") => id.to_string(),
            _ => continue,
        };
        let movie_url = base.join(href)?;
        links.push((movie_id, movie_url));
    }
    Ok(links)
}

/// Fetches detail and full-credits pages per movie, `batch` at a time.
/// A failed or unparsable page drops that movie only.
async fn crawl_movie_pages(
    client: &Client,
    sels: &PageSelectors,
    args: &Cli,
    links: &[(String, Url)],
) -> Result<HashMap<String, MovieRecord>> {
    let mut records: HashMap<String, MovieRecord> = HashMap::new();
    for chunk in links.chunks(args.batch) {
        let mut handles = Vec::new();
        for (movie_id, movie_url) in chunk {
            let client = client.clone();
            let sels = sels.clone();
            let movie_id = movie_id.clone();
            let movie_url = movie_url.clone();
            handles.push(tokio::spawn(fetch_movie(client, sels, movie_id, movie_url)));
        }
        for h in handles {
            match h.await? {
                Ok((movie_id, record)) => {
                    records.insert(movie_id, record);
                }
                Err(err) => tracing::warn!(%err, "movie skipped"),
            }
        }
        tracing::info!(fetched = records.len(), total = links.len(), "detail crawl progress");
    }
    Ok(records)
}

async fn fetch_movie(
    client: Client,
    sels: PageSelectors,
    movie_id: String,
    movie_url: Url,
) -> Result<(String, MovieRecord)> {
    let credits_url = format!("{DOMAIN}/title/{movie_id}/fullcredits?ref_=tt_cl_sm#cast");
    let movie_body = client
        .get(movie_url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let credits_body = client
        .get(&credits_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let mut record = parse_movie_page(&movie_body, &sels)
        .with_context(|| format!("parsing detail page for {movie_id}"))?;
    record.casts = parse_credits_page(&credits_body, &sels);
    Ok((movie_id, record))
}

/// Parses title, year, directors and genres from a movie detail page.
fn parse_movie_page(body: &str, sels: &PageSelectors) -> Result<MovieRecord> {
    let doc = Html::parse_document(body);
    let block = doc
        .select(&sels.title_block)
        .next()
        .ok_or_else(|| anyhow!("no title block"))?;
    let title = block
        .text()
        .next()
        .map(|t| t.replace('\u{a0}', "").trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("empty title"))?;
    let year = block
        .select(&sels.year_anchor)
        .next()
        .map(|a| a.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    let directors = doc
        .select(&sels.credit_item)
        .next()
        .map(|item| {
            item.select(&sels.anchor)
                .map(|a| a.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let genres = doc
        .select(&sels.genre_anchor)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(MovieRecord { title, year, directors, genres, casts: Vec::new() })
}

/// Parses (actor, character) pairs from a full-credits page, skipping
/// section-label rows and rows with neither name.
fn parse_credits_page(body: &str, sels: &PageSelectors) -> Vec<(String, String)> {
    let doc = Html::parse_document(body);
    let mut casts = Vec::new();
    for row in doc.select(&sels.cast_row) {
        if row.select(&sels.cast_label).next().is_some() {
            continue;
        }
        // The first name anchor wraps the headshot; the second holds the text.
        let actor = row
            .select(&sels.actor_anchor)
            .nth(1)
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let character = row
            .select(&sels.character_anchor)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if actor.is_empty() && character.is_empty() {
            continue;
        }
        casts.push((actor, character));
    }
    casts
}
