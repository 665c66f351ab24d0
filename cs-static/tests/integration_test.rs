//! Integration tests for the static responder.

use cs_static::*;
use http::Method;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INDEX: &str = "<html><body>home</body></html>";
const NESTED_INDEX: &str = "<html><body>nested</body></html>";
const JPEG_HEADER: [u8; 6] = [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.html", INDEX.as_bytes());
    write(dir.path(), "css/test.css", b"body { color: black; }");
    write(dir.path(), "js/test.js", b"console.log('hi');");
    write(dir.path(), "img/theodolite.jpg", &JPEG_HEADER);
    write(dir.path(), "nested/index.html", NESTED_INDEX.as_bytes());
    dir
}

fn load(dir: &TempDir) -> StaticAssets {
    StaticAssets::load_directory_tree(dir.path(), dir.path(), "index.html").unwrap()
}

fn get(assets: &StaticAssets, path: &str) -> StaticResponse {
    assets
        .lookup(&Method::GET, path)
        .unwrap_or_else(|| panic!("no asset for {path:?}"))
}

#[test]
fn test_index_html() {
    let dir = site();
    let response = get(&load(&dir), "/index.html");

    assert_eq!(response.status, 200);
    assert!(!response.is_binary);
    assert_eq!(response.header_value("Content-Type"), Some("text/html; charset=utf-8"));
    assert_eq!(response.header_value("Cache-Control"), Some(CACHE_CONTROL));
    assert_eq!(response.body, INDEX.as_bytes());
}

#[test]
fn test_css_and_js_are_text() {
    let dir = site();
    let assets = load(&dir);

    let css = get(&assets, "/css/test.css");
    assert!(!css.is_binary);
    assert_eq!(css.header_value("content-type"), Some("text/css; charset=utf-8"));

    let js = get(&assets, "/js/test.js");
    assert_eq!(js.status, 200);
    assert!(js.header_value("content-type").unwrap().contains("javascript"));
}

#[test]
fn test_jpg_is_binary() {
    let dir = site();
    let response = get(&load(&dir), "/img/theodolite.jpg");

    assert!(response.is_binary);
    assert_eq!(response.header_value("content-type"), Some("image/jpeg"));

    let alb = response.to_alb();
    assert!(alb.is_base64_encoded);
    assert_eq!(alb.body, "/9j/4AAQ");
}

#[test]
fn test_root_serves_index() {
    let dir = site();
    let assets = load(&dir);

    for path in ["/", ""] {
        let response = get(&assets, path);
        assert_eq!(response.body, INDEX.as_bytes(), "{path:?}");
        assert_eq!(response.header_value("content-type"), Some("text/html; charset=utf-8"));
    }
}

#[test]
fn test_nested_index() {
    let dir = site();
    let assets = load(&dir);

    for path in ["/nested/", "/nested", "/nested/index.html"] {
        let response = get(&assets, path);
        assert_eq!(response.body, NESTED_INDEX.as_bytes(), "{path:?}");
        assert!(!response.is_binary);
    }
}

#[test]
fn test_registered_paths() {
    let dir = site();
    let assets = load(&dir);

    assert_eq!(
        assets.paths(),
        vec![
            "",
            "/",
            "/css/test.css",
            "/img/theodolite.jpg",
            "/index.html",
            "/js/test.js",
            "/nested",
            "/nested/",
            "/nested/index.html",
        ]
    );
}

#[test]
fn test_prefix_is_stripped() {
    let dir = site();
    let assets = StaticAssets::load_directory_tree(dir.path().join("css"), dir.path(), "index.html").unwrap();

    assert_eq!(assets.paths(), vec!["/css/test.css"]);
}

#[test]
fn test_only_get_is_served() {
    let dir = site();
    let assets = load(&dir);

    assert!(assets.lookup(&Method::POST, "/index.html").is_none());
    assert!(assets.lookup(&Method::PUT, "/").is_none());
    assert!(assets.lookup(&Method::GET, "/missing.html").is_none());
}

#[test]
fn test_missing_directory() {
    let err = StaticAssets::load_directory_tree("/definitely/not/here", "/", "index.html").unwrap_err();
    assert!(matches!(err, StaticError::Walk(_)));
}

#[tokio::test]
async fn test_runtime_serves_assets_first() {
    let dir = site();
    let runtime = StaticRuntime::new(load(&dir));

    let response = runtime.handle(StaticRequest::new(Method::GET, "/css/test.css")).await;
    assert_eq!(response.status, 200);

    let response = runtime.handle(StaticRequest::new(Method::GET, "/api/users")).await;
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn test_runtime_fallback_handler() {
    let dir = site();
    let runtime = StaticRuntime::new(load(&dir))
        .fallback(|request: StaticRequest| async move {
            StaticResponse::ok(format!("{} {}", request.method, request.path))
        })
        .with_config(StaticConfig::default().base_path("/prod"));

    let response = runtime.handle(StaticRequest::new(Method::POST, "/prod/index.html")).await;
    assert_eq!(response.body, "POST /index.html".as_bytes());

    let response = runtime.handle(StaticRequest::new(Method::GET, "/prod")).await;
    assert_eq!(response.body, INDEX.as_bytes());
}
