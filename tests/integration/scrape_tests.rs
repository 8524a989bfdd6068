//! End-to-end scraping against a mock catalog

use pricecharting_scraper::config::{Config, OutputConfig, RateLimitConfig, ScraperConfig};
use pricecharting_scraper::{GameRecord, PriceCategory, PriceChartingScraper};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no request spacing
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        scraper: ScraperConfig {
            user_agent: "TestAgent/1.0".to_string(),
            timeout: 5,
            base_url: base_url.to_string(),
        },
        rate_limit: RateLimitConfig {
            delay: 0.0,
            variant_delay: 0.0,
            jitter_min: 0.0,
            jitter_max: 0.0,
        },
        output: OutputConfig {
            file_age: 86_400,
            json_dir: dir.join("json"),
            image_dir: dir.join("products"),
        },
    }
}

/// Builds a product page for `id`
fn product_page(id: u64, title: &str, variants: &[(u64, &str)]) -> String {
    let variant_row = if variants.is_empty() {
        String::new()
    } else {
        let links: Vec<String> = variants
            .iter()
            .map(|(vid, name)| format!(r#"<a href="/game/pal-xbox-360/v/{}">{}</a>"#, vid, name))
            .collect();
        format!(
            r#"<tr><td class="title">Variants:</td><td class="details">{}</td></tr>"#,
            links.join(" ")
        )
    };

    format!(
        r#"<html>
<head>
  <link rel="canonical" href="https://www.pricecharting.com/game/pal-xbox-360/{id}">
  <script>VGPC.product = {{ id: {id} }};</script>
</head>
<body>
  <h1 class="chart_title">{title} <a href="/console/pal-xbox-360">PAL Xbox 360</a></h1>
  <div id="full-prices"><table>
    <tr><td>Loose</td><td class="price js-price">$9.99</td></tr>
    <tr><td>New</td><td class="price js-price">--</td></tr>
  </table></div>
  <table id="attribute">
    <tr><td class="title">Genre:</td><td class="details">Sports</td></tr>
    <tr><td class="title">PEGI Rating:</td><td class="details">PEGI 12</td></tr>
    {variant_row}
  </table>
</body>
</html>"#
    )
}

async fn mount_page(server: &MockServer, id: u64, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/game/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn write_cached(dir: &Path, record: &GameRecord, age: Duration) {
    let json_dir = dir.join("json");
    std::fs::create_dir_all(&json_dir).unwrap();
    let file = json_dir.join(format!("{}.json", record.id.unwrap()));
    std::fs::write(&file, serde_json::to_string_pretty(record).unwrap()).unwrap();
    std::fs::File::options()
        .write(true)
        .open(&file)
        .unwrap()
        .set_modified(SystemTime::now() - age)
        .unwrap();
}

fn read_record(dir: &Path, id: u64) -> GameRecord {
    let content = std::fs::read_to_string(dir.join("json").join(format!("{}.json", id))).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn cached_record(id: u64) -> GameRecord {
    let mut record = GameRecord::new(id);
    record.product_name = Some("Cached Title".to_string());
    record
}

#[tokio::test]
async fn test_fetch_saves_record() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, 100, product_page(100, "kinect sports", &[]), 1).await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, false).await.unwrap();

    assert!(record.success);
    assert_eq!(record.id, Some(100));
    assert_eq!(record.product_name.as_deref(), Some("Kinect Sports"));
    assert_eq!(record.prices[&PriceCategory::Loose], Some(9.99));
    assert_eq!(record.prices[&PriceCategory::New], None);
    assert_eq!(record.details.rating.as_deref(), Some("PEGI 12"));

    assert_eq!(read_record(dir.path(), 100), record);
    assert_eq!(scraper.store().saved_files().len(), 1);
    assert!(scraper.store().cached_files().is_empty());
}

#[tokio::test]
async fn test_fresh_cache_makes_no_requests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut cached = cached_record(100);
    cached.image_url = Some(format!("{}/img.png", server.uri()));
    write_cached(dir.path(), &cached, Duration::from_secs(60));

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, false).await.unwrap();

    assert_eq!(record, cached);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!dir.path().join("products").join("100").join("100.webp").exists());
    assert_eq!(scraper.store().cached_files().len(), 1);
    assert!(scraper.store().saved_files().is_empty());
}

#[tokio::test]
async fn test_stale_cache_fetches_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_cached(dir.path(), &cached_record(100), Duration::from_secs(3 * 86_400));
    mount_page(&server, 100, product_page(100, "Fresh Title", &[]), 1).await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, false).await.unwrap();

    assert_eq!(record.product_name.as_deref(), Some("Fresh Title"));
    assert_eq!(
        read_record(dir.path(), 100).product_name.as_deref(),
        Some("Fresh Title")
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/game/100");
}

#[tokio::test]
async fn test_http_error_persists_error_record() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/game/100"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, false).await.unwrap();

    assert!(!record.success);
    assert!(record.prices.is_empty());
    assert_eq!(read_record(dir.path(), 100), GameRecord::error(100));
}

#[tokio::test]
async fn test_page_for_other_id_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, 100, product_page(999, "Wrong Game", &[]), 1).await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, false).await.unwrap();

    assert!(!record.success);
    assert!(!read_record(dir.path(), 100).success);
}

#[tokio::test]
async fn test_error_keeps_fresh_cache() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_cached(dir.path(), &cached_record(100), Duration::from_secs(60));
    Mock::given(method("GET"))
        .and(path("/game/100"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, true).await.unwrap();

    assert!(!record.success);
    assert_eq!(read_record(dir.path(), 100), cached_record(100));
}

#[tokio::test]
async fn test_variants_fetched_after_parent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(
        &server,
        100,
        product_page(100, "Halo 3", &[(201, "limited edition"), (202, "essentials")]),
        1,
    )
    .await;
    mount_page(&server, 201, product_page(201, "Halo 3", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/game/202"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, true).await.unwrap();

    assert!(record.success);
    assert_eq!(record.variant_name, None);

    let variant = read_record(dir.path(), 201);
    assert!(variant.success);
    assert_eq!(variant.variant_name.as_deref(), Some("Limited Edition"));
    assert_eq!(
        variant.combined_name.as_deref(),
        Some("Halo 3 (Limited Edition)")
    );

    assert!(!read_record(dir.path(), 202).success);

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/game/100", "/game/201", "/game/202"]);
}

#[tokio::test]
async fn test_cached_parent_still_discovers_variants() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_cached(dir.path(), &cached_record(100), Duration::from_secs(60));
    write_cached(dir.path(), &cached_record(202), Duration::from_secs(60));
    mount_page(
        &server,
        100,
        product_page(100, "Halo 3", &[(201, "limited edition"), (202, "essentials")]),
        1,
    )
    .await;
    mount_page(&server, 201, product_page(201, "Halo 3", &[]), 1).await;
    mount_page(&server, 202, product_page(202, "Halo 3", &[]), 0).await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let record = scraper.fetch_game_data(100, true).await.unwrap();

    assert_eq!(record, cached_record(100));
    assert_eq!(read_record(dir.path(), 100), cached_record(100));
    assert_eq!(
        read_record(dir.path(), 201).variant_name.as_deref(),
        Some("Limited Edition")
    );
}

#[tokio::test]
async fn test_resolve_id_from_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/game/pal-xbox-360/kinect-sports"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table><tr><td>PriceCharting ID:</td><td>4242</td></tr></table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 4242, product_page(4242, "Kinect Sports", &[]), 1).await;

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    let url = format!("{}/game/pal-xbox-360/kinect-sports", server.uri());
    let record = scraper.process(&url, false).await.unwrap();

    assert!(record.success);
    assert_eq!(record.id, Some(4242));
}

#[tokio::test]
async fn test_unresolvable_input() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut scraper = PriceChartingScraper::new(create_test_config(&server.uri(), dir.path())).unwrap();
    assert!(scraper.process("kinect sports", false).await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}
