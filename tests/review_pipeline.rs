//! Review extraction engine tests.
//!
//! Every review URL goes through the real registry and source rules; only
//! the network is replaced by an in-memory fetcher that counts requests.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use wafer::error::{FetchError, ReviewError};
use wafer::fetch::PageFetcher;
use wafer::review::ReviewEngine;
use wafer::sources::SourceRegistry;

// ─── Test Fetcher ───────────────────────────────────────────────────

enum Canned {
    Page(&'static str),
    Timeout,
    Status(u16),
    Refused,
}

/// Real transport error from a connection to a port nobody listens on.
async fn refused_connection() -> reqwest::Error {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    reqwest::get(format!("http://127.0.0.1:{}/", port))
        .await
        .unwrap_err()
}

/// Serves canned pages by URL and counts every fetch.
struct CountingFetcher {
    pages: HashMap<String, Canned>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn with(mut self, url: &str, canned: Canned) -> Self {
        self.pages.insert(url.to_string(), canned);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(Canned::Page(body)) => Ok(body.to_string()),
            Some(Canned::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(Canned::Refused) => Err(FetchError::Transport {
                url: url.to_string(),
                source: refused_connection().await,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn accessed() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

// ─── Fixtures ───────────────────────────────────────────────────────

const KAAOSZINE: &str = r#"
<html><head>
<meta property="article:published_time" content="2023-03-04T09:15:00+02:00">
</head><body>
<h1 class="article-title">Parasitario – Everything Belongs to Death</h1>
<div class="author-and-date"><strong>Matti Meikäläinen</strong> - 4.3.2023</div>
<div class="rating">
  <div class="one"></div><div class="one"></div><div class="one"></div>
  <div class="one"></div><div class="zero"></div>
</div>
</body></html>"#;

const KAAOSZINE_UNRATED: &str = r#"
<h1 class="article-title">Haastattelu</h1>
<div class="author-and-date"><strong>Matti Meikäläinen</strong></div>"#;

const SOUNDI: &str = r#"
<article>
<h1 class="entry-title">Bändi – Levy</h1>
<span class="review-author">Anna Virtanen</span>
<span class="issue">Soundi 3/2023</span>
<div class="review-rating">
  <i class="fa fa-star"></i><i class="fa fa-star"></i><i class="fa fa-star"></i>
  <i class="fa fa-star-half-o"></i><i class="fa fa-star-o"></i>
</div>
</article>"#;

const METALLILUOLA: &str = r#"
<h1 class="entry-title">Levyarvio: Yhtye – Albumi</h1>
<div class="entry-meta"><span class="author"><a href="/author/x">Pekka Peltola</a></span>
<time class="entry-date" datetime="2022-10-07T12:00:00+03:00">7.10.2022</time></div>
<div class="arvosana"><img src="https://metalliluola.fi/wp-content/uploads/arvio-40.png"></div>"#;

const BLABBERMOUTH: &str = r#"
<div class="review-header"><h1>BAND – "Album"</h1></div>
<div class="byline">by <a href="/reviews/author/x">Jay H. Gorania</a></div>
<time datetime="2024-05-02">May 2, 2024</time>
<div class="rating">8.5/10</div>"#;

const METALINJECTION: &str = r#"
<meta property="article:published_time" content="2023-12-01T15:30:00+00:00">
<h1 class="entry-title">Album Review: BAND Album</h1>
<span class="author-name">Greg Kennelty</span>
<div class="review-score">7 / 10</div>"#;

const METALSUCKS: &str = r#"
<h1 class="entry-title">BAND's New Album Rips</h1>
<span class="author"><a href="/author/axl">Axl Rosenberg</a></span>
<div class="horns"><span class="horn-full"></span><span class="horn-full"></span>
<span class="horn-full"></span><span class="horn-full"></span><span class="horn-half"></span></div>"#;

// ─── Per-source citations ───────────────────────────────────────────

async fn cite(url: &str, body: &'static str) -> String {
    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new().with(url, Canned::Page(body));
    let engine = ReviewEngine::new(&registry, &fetcher).with_access_date(accessed());
    engine
        .extract(url)
        .await
        .unwrap()
        .expect("review should be cited")
        .render()
}

#[tokio::test]
async fn test_kaaoszine_citation() {
    let url = "https://kaaoszine.fi/levyarvio/parasitario/";
    assert_eq!(
        cite(url, KAAOSZINE).await,
        "* [[Kaaoszine]]: {{Arvostelutähdet|4|5}}<ref>{{Verkkoviite | \
         Osoite = https://kaaoszine.fi/levyarvio/parasitario/ | \
         Nimeke = Parasitario – Everything Belongs to Death | \
         Tekijä = Meikäläinen, Matti | Sivusto = Kaaoszine | Ajankohta = 4.3.2023 | \
         Viitattu = 1.6.2024 }}</ref>"
    );
}

#[tokio::test]
async fn test_soundi_citation_uses_issue_label() {
    let text = cite("https://www.soundi.fi/levyarviot/bandi-levy/", SOUNDI).await;
    assert!(text.starts_with("* [[Soundi]]: {{Arvostelutähdet|3.5|5}}<ref>"));
    assert!(text.contains("| Tekijä = Virtanen, Anna |"));
    assert!(text.contains("| Ajankohta = Maaliskuu 2023 |"));
    assert!(!text.contains("Kieli"));
}

#[tokio::test]
async fn test_metalliluola_citation_decodes_filename() {
    let text = cite("https://metalliluola.fi/levyarvio-yhtye-albumi/", METALLILUOLA).await;
    assert!(text.starts_with("* [[Metalliluola]]: {{Arvostelutähdet|4|5}}"));
    assert!(text.contains("| Ajankohta = 7.10.2022 |"));
}

#[tokio::test]
async fn test_blabbermouth_citation_is_english_on_ten_scale() {
    let text = cite("https://blabbermouth.net/reviews/band-album", BLABBERMOUTH).await;
    assert!(text.starts_with("* [[Blabbermouth]]: {{Arvostelutähdet|8.5|10}}"));
    assert!(text.contains("| Sivusto = Blabbermouth |"));
    assert!(text.ends_with("| Viitattu = 1.6.2024 | Kieli = {{en}} }}</ref>"));
}

#[tokio::test]
async fn test_metalinjection_citation() {
    let text = cite("https://metalinjection.net/reviews/band-album", METALINJECTION).await;
    assert!(text.starts_with("* [[Metal Injection]]: {{Arvostelutähdet|7|10}}"));
    assert!(text.contains("| Tekijä = Kennelty, Greg |"));
    assert!(text.contains("| Ajankohta = 1.12.2023 |"));
}

#[tokio::test]
async fn test_metalsucks_citation_has_empty_date() {
    let text = cite("https://www.metalsucks.net/2024/01/10/review/", METALSUCKS).await;
    assert!(text.starts_with("* [[MetalSucks]]: {{Arvostelutähdet|4.5|5}}"));
    assert!(text.contains("| Tekijä = Axl Rosenberg |"));
    assert!(text.contains("| Ajankohta =  |"));
    assert!(text.contains("Kieli = {{en}}"));
}

// ─── Engine behavior ────────────────────────────────────────────────

#[tokio::test]
async fn test_mixed_submission_keeps_order_and_drops_failures() {
    let u1 = "https://kaaoszine.fi/levyarvio/parasitario/";
    let u2 = "https://example.com/review/1";
    let u3 = "https://kaaoszine.fi/haastattelu/";

    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new()
        .with(u1, Canned::Page(KAAOSZINE))
        .with(u3, Canned::Page(KAAOSZINE_UNRATED));
    let engine = ReviewEngine::new(&registry, &fetcher).with_access_date(accessed());

    let fragments = engine.extract_all(&[u1, u2, u3]).await.unwrap();
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].reference.contains(u1));
    // The unsupported URL is never fetched.
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_order_follows_submission_not_source() {
    let first = "https://www.metalsucks.net/2024/01/10/review/";
    let second = "https://kaaoszine.fi/levyarvio/parasitario/";

    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new()
        .with(first, Canned::Page(METALSUCKS))
        .with(second, Canned::Page(KAAOSZINE));
    let engine = ReviewEngine::new(&registry, &fetcher).with_access_date(accessed());

    let fragments = engine.extract_all(&[first, second]).await.unwrap();
    assert_eq!(fragments.len(), 2);
    assert!(fragments[0].render().starts_with("* [[MetalSucks]]"));
    assert!(fragments[1].render().starts_with("* [[Kaaoszine]]"));
}

#[tokio::test]
async fn test_unsupported_domains_are_not_fetched() {
    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new();
    let engine = ReviewEngine::new(&registry, &fetcher);

    let urls = [
        "https://example.com/review",
        "https://soundi.fi/levyarviot/x/",
        "not a url",
        "ftp://kaaoszine.fi/x",
    ];
    let fragments = engine.extract_all(&urls).await.unwrap();
    assert!(fragments.is_empty());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_unrated_review_cited_when_allowed() {
    let url = "https://kaaoszine.fi/haastattelu/";
    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new().with(url, Canned::Page(KAAOSZINE_UNRATED));
    let engine = ReviewEngine::new(&registry, &fetcher)
        .with_access_date(accessed())
        .cite_unrated(true);

    let fragment = engine.extract(url).await.unwrap().unwrap();
    assert_eq!(fragment.rating_line, None);
    assert!(fragment.render().starts_with("<ref>{{Verkkoviite | Osoite = "));
}

#[tokio::test]
async fn test_error_status_skips_review() {
    let url = "https://blabbermouth.net/reviews/gone";
    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new().with(url, Canned::Status(503));
    let engine = ReviewEngine::new(&registry, &fetcher);

    assert_eq!(engine.extract(url).await.unwrap(), None);
}

#[tokio::test]
async fn test_timeout_aborts_remaining_reviews() {
    let slow = "https://blabbermouth.net/reviews/slow";
    let after = "https://kaaoszine.fi/levyarvio/parasitario/";
    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new()
        .with(slow, Canned::Timeout)
        .with(after, Canned::Page(KAAOSZINE));
    let engine = ReviewEngine::new(&registry, &fetcher);

    let err = engine.extract_all(&[slow, after]).await.unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Network(FetchError::Timeout { .. })
    ));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_transport_failure_skips_review() {
    let down = "https://www.soundi.fi/levyarviot/palvelin-alhaalla/";
    let after = "https://kaaoszine.fi/levyarvio/parasitario/";
    let registry = SourceRegistry::builtin();
    let fetcher = CountingFetcher::new()
        .with(down, Canned::Refused)
        .with(after, Canned::Page(KAAOSZINE));
    let engine = ReviewEngine::new(&registry, &fetcher).with_access_date(accessed());

    let fragments = engine.extract_all(&[down, after]).await.unwrap();
    assert_eq!(fragments.len(), 1);
    assert!(fragments[0].reference.contains(after));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_every_source_cites_url_and_today() {
    let pages: [(&str, &'static str); 6] = [
        ("https://kaaoszine.fi/levyarvio/parasitario/", KAAOSZINE),
        ("https://www.soundi.fi/levyarviot/bandi-levy/", SOUNDI),
        ("https://metalliluola.fi/levyarvio-yhtye-albumi/", METALLILUOLA),
        ("https://blabbermouth.net/reviews/band-album", BLABBERMOUTH),
        ("https://metalinjection.net/reviews/band-album", METALINJECTION),
        ("https://www.metalsucks.net/2024/01/10/review/", METALSUCKS),
    ];
    let registry = SourceRegistry::builtin();
    let fetcher = pages
        .iter()
        .fold(CountingFetcher::new(), |f, &(url, body)| f.with(url, Canned::Page(body)));
    let engine = ReviewEngine::new(&registry, &fetcher);
    let today = wafer::extract::day_month_year(Local::now().date_naive());

    for (url, _) in pages {
        let fragment = engine
            .extract(url)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("no citation for {}", url));
        assert!(
            fragment.reference.contains(&format!("Osoite = {} |", url)),
            "{}",
            fragment.reference
        );
        assert!(
            fragment.reference.contains(&format!("Viitattu = {} }}", today)),
            "{}",
            fragment.reference
        );
    }
}
