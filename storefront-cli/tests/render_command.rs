use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    fs::write(path, contents).expect("write fixture");
}

fn site() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(root, "content/settings.json", r#"{"title":"Shop"}"#);
    write(root, "content/blog/hello.json", r#"{"title":"Hello blog"}"#);
    write(root, "store.json", r#"{"banner":"Big sale"}"#);
    write(
        root,
        "routes.json",
        r#"{"/shoe":{"resource":"products","slug":"shoe","content":{"name":"Runner"}}}"#,
    );
    write(
        root,
        "pages/index.html",
        "<h1>{{ settings.title }}</h1><p>{{ banner | default(value='none') }}</p><b>{{ store_id }}</b>",
    );
    write(
        root,
        "pages/#products.html",
        "{% set p = resolve_route() %}<h2>{{ p.name }}</h2>",
    );
    write(root, "pages/#brands.html", "{{ nope.deeper }}");
    write(
        root,
        "pages/#cms/blog.html",
        "{% set entry = resolve_route() %}<article>{{ entry.content.title }}</article>",
    );
    dir
}

// Subcommand first, then the shared `--root` flag.
fn run(root: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("storefront"));
    cmd.env_remove("STOREFRONT_ENV")
        .env_remove("ECOM_STORE_ID")
        .env("RUST_LOG", "warn")
        .args(args)
        .arg("--root")
        .arg(root);
    cmd
}

#[test]
fn renders_home_page_with_defaults() {
    let dir = site();
    run(dir.path(), &["render", "/"])
        .assert()
        .success()
        .stdout(contains("<h1>Shop</h1><p>none</p><b>1011</b>"));
}

#[test]
fn store_data_and_routes_files_feed_the_render() {
    let dir = site();
    let store = dir.path().join("store.json");
    let routes = dir.path().join("routes.json");

    run(dir.path(), &["render", "/"])
        .arg("--store-data")
        .arg(&store)
        .assert()
        .success()
        .stdout(contains("<p>Big sale</p>"));

    run(dir.path(), &["render", "/shoe"])
        .arg("--routes")
        .arg(&routes)
        .assert()
        .success()
        .stdout(contains("<h2>Runner</h2>"));
}

#[test]
fn static_urls_are_reported_on_stderr() {
    let dir = site();
    run(dir.path(), &["render", "/assets/app.js"])
        .assert()
        .success()
        .stdout("")
        .stderr(contains("not a content route"));
}

#[test]
fn template_errors_fail_the_command() {
    let dir = site();
    run(dir.path(), &["render", "/nike", "--route", r#"{"path":"/nike","resource":"brands"}"#])
        .assert()
        .failure()
        .stderr(contains("rendering /nike failed"));
}

#[test]
fn prerender_writes_html_files() {
    let dir = site();
    let out = dir.path().join("dist");
    run(dir.path(), &["prerender"])
        .arg("--routes")
        .arg(dir.path().join("routes.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("prerendered 3 page(s), 0 skipped"));

    let index = fs::read_to_string(out.join("index.html")).expect("index.html");
    assert!(index.contains("<h1>Shop</h1>"), "got: {index}");
    let shoe = fs::read_to_string(out.join("shoe.html")).expect("shoe.html");
    assert_eq!(shoe, "<h2>Runner</h2>");
    let post = fs::read_to_string(out.join("blog/hello.html")).expect("blog/hello.html");
    assert_eq!(post, "<article>Hello blog</article>");
}

#[test]
fn prerender_skips_fall_through_urls() {
    let dir = site();
    let out = dir.path().join("dist");
    run(dir.path(), &["prerender", "/", "/missing", "/logo.png"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("prerendered 1 page(s), 2 skipped"));
    assert!(out.join("index.html").is_file());
    assert!(!out.join("missing.html").exists());
}

#[test]
fn routes_lists_keys_and_pages() {
    let dir = site();
    run(dir.path(), &["routes", "--production"])
        .assert()
        .success()
        .stdout(contains("products"))
        .stdout(contains("precompiled"))
        .stdout(contains("collections"))
        .stdout(contains("missing"))
        .stdout(contains("/index"));
}
