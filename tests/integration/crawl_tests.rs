//! End-to-end crawl tests
//!
//! These use wiremock to serve both the index page and the payroll files,
//! then run the coordinator against it with a temporary output directory.

use std::time::Duration;
use tempfile::TempDir;
use tjpb_crawler::config::{CollisionPolicy, Config};
use tjpb_crawler::crawler::{crawl, Category, Coordinator};
use tjpb_crawler::period::Period;
use tjpb_crawler::CrawlerError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = format!("{}/folha", server.uri());
    config.crawler.output_dir = output_dir.path().to_string_lossy().into_owned();
    config.crawler.request_timeout_secs = 5;
    config
}

async fn mount_index(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/folha"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_file(server: &MockServer, file_path: &str, body: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn period(month: u32, year: u32) -> Period {
    Period::new(month, year).unwrap()
}

fn saved_names(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_legacy_layout_end_to_end() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<html><body>
        <h2>2012</h2>
        <ul id="arquivos-2012">
            <li><a href="/arquivos/servidores/fev-2012.pdf">Fevereiro 2012</a></li>
            <li><a href="/arquivos/servidores/x.pdf">Março 2012</a></li>
            <li><a href="/arquivos/servidores/abr-2012.pdf">Abril 2012</a></li>
        </ul>
        </body></html>"#,
    )
    .await;
    mount_file(&mock_server, "/arquivos/servidores/x.pdf", b"%PDF-1.4 marco", 1).await;
    mount_file(&mock_server, "/arquivos/servidores/fev-2012.pdf", b"", 0).await;
    mount_file(&mock_server, "/arquivos/servidores/abr-2012.pdf", b"", 0).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    let report = crawl(config, period(3, 2012)).await.expect("crawl should succeed");

    assert_eq!(report.period, period(3, 2012));
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].category, Category::ServerStaff);
    assert_eq!(
        report.files[0].name.as_str(),
        "remuneracoes-servidores-tjpb-03-2012"
    );

    let saved = output_dir
        .path()
        .join("remuneracoes-servidores-tjpb-03-2012.pdf");
    assert_eq!(report.files[0].path, saved);
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.4 marco");
}

#[tokio::test]
async fn test_month_container_layout_end_to_end() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<html><body>
        <div id="arquivos-2021-mes-02">
            <a href="/files/magistrados/2021-02.pdf">Magistrados</a>
        </div>
        <div id="arquivos-2021-mes-03">
            <a href="/files/magistrados/2021-03.pdf">Magistrados</a>
            <a href="/files/servidores/2021-03.pdf">Servidores</a>
            <a href="/files/pensionistas/2021-03.pdf">Pensionistas</a>
        </div>
        </body></html>"#,
    )
    .await;
    mount_file(&mock_server, "/files/magistrados/2021-03.pdf", b"mag", 1).await;
    mount_file(&mock_server, "/files/servidores/2021-03.pdf", b"serv", 1).await;
    mount_file(&mock_server, "/files/pensionistas/2021-03.pdf", b"other", 1).await;
    mount_file(&mock_server, "/files/magistrados/2021-02.pdf", b"", 0).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    let report = crawl(config, period(3, 2021)).await.unwrap();

    let categories: Vec<Category> = report.files.iter().map(|f| f.category).collect();
    assert_eq!(
        categories,
        vec![
            Category::Magistrates,
            Category::ServerStaff,
            Category::Unclassified
        ]
    );
    assert_eq!(
        saved_names(&output_dir),
        vec![
            "remuneracoes-magistrados-tjpb-03-2021.pdf",
            "remuneracoes-servidores-tjpb-03-2021.pdf",
            "remuneracoes-tjpb-03-2021.pdf",
        ]
    );
    assert_eq!(
        std::fs::read(output_dir.path().join("remuneracoes-tjpb-03-2021.pdf")).unwrap(),
        b"other"
    );
}

#[tokio::test]
async fn test_period_without_links_is_not_found() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<html><body><div id="arquivos-2021-mes-03"></div></body></html>"#,
    )
    .await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    let result = crawl(config, period(4, 2021)).await;

    match result {
        Err(CrawlerError::NotFound { period: p }) => assert_eq!(p, period(4, 2021)),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(saved_names(&output_dir).is_empty());
}

#[tokio::test]
async fn test_index_page_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folha"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    let result = crawl(config, period(3, 2021)).await;
    assert!(matches!(
        result,
        Err(CrawlerError::HttpStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_empty_index_page_is_parse_error() {
    let mock_server = MockServer::start().await;
    mount_index(&mock_server, "").await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    let result = crawl(config, period(3, 2021)).await;
    assert!(matches!(result, Err(CrawlerError::HtmlParse { .. })));
}

#[tokio::test]
async fn test_failed_download_stops_run() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<div id="arquivos-2020-mes-07">
            <a href="/magistrados/jul.pdf">1</a>
            <a href="/servidores/jul.pdf">2</a>
            <a href="/outros/jul.pdf">3</a>
        </div>"#,
    )
    .await;
    mount_file(&mock_server, "/magistrados/jul.pdf", b"first", 1).await;
    Mock::given(method("GET"))
        .and(path("/servidores/jul.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_file(&mock_server, "/outros/jul.pdf", b"never", 0).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    let result = crawl(config, period(7, 2020)).await;

    assert!(matches!(
        result,
        Err(CrawlerError::HttpStatus { status: 404, .. })
    ));
    // Earlier files are kept, the failed one is cleaned up
    assert_eq!(
        saved_names(&output_dir),
        vec!["remuneracoes-magistrados-tjpb-07-2020.pdf"]
    );
}

#[tokio::test]
async fn test_suffix_policy_keeps_every_file() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<div id="arquivos-2019-mes-12">
            <a href="/servidores/ativos.pdf">Ativos</a>
            <a href="/servidores/inativos.pdf">Inativos</a>
        </div>"#,
    )
    .await;
    mount_file(&mock_server, "/servidores/ativos.pdf", b"ativos", 1).await;
    mount_file(&mock_server, "/servidores/inativos.pdf", b"inativos", 1).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server, &output_dir);

    crawl(config, period(12, 2019)).await.unwrap();

    let dir = output_dir.path();
    assert_eq!(
        std::fs::read(dir.join("remuneracoes-servidores-tjpb-12-2019.pdf")).unwrap(),
        b"ativos"
    );
    assert_eq!(
        std::fs::read(dir.join("remuneracoes-servidores-tjpb-12-2019-2.pdf")).unwrap(),
        b"inativos"
    );
}

#[tokio::test]
async fn test_overwrite_policy_last_file_wins() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<div id="arquivos-2019-mes-12">
            <a href="/servidores/ativos.pdf">Ativos</a>
            <a href="/servidores/inativos.pdf">Inativos</a>
        </div>"#,
    )
    .await;
    mount_file(&mock_server, "/servidores/ativos.pdf", b"ativos", 1).await;
    mount_file(&mock_server, "/servidores/inativos.pdf", b"inativos", 1).await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server, &output_dir);
    config.crawler.collision_policy = CollisionPolicy::Overwrite;

    let report = crawl(config, period(12, 2019)).await.unwrap();

    assert_eq!(report.files.len(), 2);
    assert_eq!(
        saved_names(&output_dir),
        vec!["remuneracoes-servidores-tjpb-12-2019.pdf"]
    );
    assert_eq!(
        std::fs::read(output_dir.path().join("remuneracoes-servidores-tjpb-12-2019.pdf")).unwrap(),
        b"inativos"
    );
}

#[tokio::test]
async fn test_error_policy_downloads_nothing() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<div id="arquivos-2019-mes-12">
            <a href="/servidores/ativos.pdf">Ativos</a>
            <a href="/servidores/inativos.pdf">Inativos</a>
        </div>"#,
    )
    .await;
    mount_file(&mock_server, "/servidores/ativos.pdf", b"", 0).await;
    mount_file(&mock_server, "/servidores/inativos.pdf", b"", 0).await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server, &output_dir);
    config.crawler.collision_policy = CollisionPolicy::Error;

    let result = crawl(config, period(12, 2019)).await;

    assert!(matches!(result, Err(CrawlerError::NameCollision { .. })));
    assert!(saved_names(&output_dir).is_empty());
}

#[tokio::test]
async fn test_plan_does_not_download() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        r#"<ul id="arquivos-2010"><li><a href="/magistrados/jan.pdf">Janeiro 2010</a></li></ul>"#,
    )
    .await;
    mount_file(&mock_server, "/magistrados/jan.pdf", b"", 0).await;

    let output_dir = tempfile::tempdir().unwrap();
    let coordinator = Coordinator::new(create_test_config(&mock_server, &output_dir)).unwrap();

    let planned = coordinator.plan(period(1, 2010)).await.unwrap();

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].name.as_str(), "remuneracoes-magistrados-tjpb-01-2010");
    assert_eq!(
        planned[0].link.url.as_str(),
        format!("{}/magistrados/jan.pdf", mock_server.uri())
    );
    assert!(saved_names(&output_dir).is_empty());
}

#[tokio::test]
async fn test_index_page_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folha"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body></body></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server, &output_dir);
    config.crawler.request_timeout_secs = 1;

    let result = crawl(config, period(3, 2021)).await;

    match result {
        Err(CrawlerError::Network { url, source }) => {
            assert_eq!(url, format!("{}/folha", mock_server.uri()));
            assert!(source.is_timeout(), "expected timeout, got {}", source);
        }
        other => panic!("expected Network, got {:?}", other),
    }
    assert!(saved_names(&output_dir).is_empty());
}

#[tokio::test]
async fn test_index_page_connection_refused_is_network_error() {
    // Bind then drop a listener so the port is known to be closed
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.crawler.base_url = format!("http://{}/folha", addr);
    config.crawler.output_dir = output_dir.path().to_string_lossy().into_owned();
    config.crawler.request_timeout_secs = 5;

    let result = crawl(config, period(3, 2021)).await;

    assert!(matches!(result, Err(CrawlerError::Network { .. })));
    assert!(saved_names(&output_dir).is_empty());
}
