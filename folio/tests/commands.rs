#![allow(clippy::unwrap_used, reason = "Fine in tests")]
use std::fs;

use folio::commands::{self, render::RenderArgs};
use folio_config::{Config, OutputFormat};
use tempfile::TempDir;

fn plain_config() -> Config {
  let mut config = Config::default();
  config.apply_override("highlight.enable", "false").unwrap();
  config.jobs = Some(2);
  config
}

fn write_tree(dir: &TempDir) {
  fs::create_dir_all(dir.path().join("guide")).unwrap();
  fs::write(
    dir.path().join("index.html"),
    r#"<h1>Home</h1><p>Read <a href="doc:setup">setup</a>.</p>"#,
  )
  .unwrap();
  fs::write(
    dir.path().join("guide/setup.htm"),
    "<h1>Setup</h1><h2>Install Steps</h2>",
  )
  .unwrap();
  fs::write(dir.path().join("guide/notes.txt"), "not html").unwrap();
}

#[test]
fn test_render_directory_writes_one_output_per_document() {
  let input = TempDir::new().unwrap();
  let output = TempDir::new().unwrap();
  write_tree(&input);

  let mut config = plain_config();
  config.output_dir = Some(output.path().to_path_buf());

  let mut stdout = Vec::new();
  commands::render::run(&config, &[input.path().to_path_buf()], &mut stdout)
    .unwrap();

  assert!(stdout.is_empty());
  let index = fs::read_to_string(output.path().join("index.html")).unwrap();
  let setup =
    fs::read_to_string(output.path().join("guide/setup.html")).unwrap();

  assert!(index.contains(r#"id="home""#));
  assert!(index.contains(r#"data-doc-id="setup""#));
  assert!(setup.contains(r#"id="install-steps""#));
  assert!(!output.path().join("guide/notes.html").exists());
  assert!(!output.path().join("highlight.css").exists());
}

#[test]
fn test_render_rejects_colliding_outputs() {
  let input = TempDir::new().unwrap();
  let output = TempDir::new().unwrap();
  fs::create_dir_all(input.path().join("a")).unwrap();
  fs::create_dir_all(input.path().join("b")).unwrap();
  let alpha = input.path().join("a/index.html");
  let beta = input.path().join("b/index.html");
  fs::write(&alpha, "<h1>Alpha</h1>").unwrap();
  fs::write(&beta, "<h1>Beta</h1>").unwrap();

  let mut config = plain_config();
  config.output_dir = Some(output.path().to_path_buf());

  let mut stdout = Vec::new();
  let err = commands::render::run(&config, &[alpha, beta], &mut stdout)
    .unwrap_err()
    .to_string();

  assert!(err.contains("a/index.html"));
  assert!(err.contains("b/index.html"));
  assert!(!output.path().join("index.html").exists());
}

#[test]
fn test_render_rejects_html_and_htm_twins() {
  let input = TempDir::new().unwrap();
  let output = TempDir::new().unwrap();
  fs::write(input.path().join("page.html"), "<h1>One</h1>").unwrap();
  fs::write(input.path().join("page.htm"), "<h1>Two</h1>").unwrap();

  let mut config = plain_config();
  config.output_dir = Some(output.path().to_path_buf());

  let mut stdout = Vec::new();
  let result = commands::render::run(
    &config,
    &[input.path().to_path_buf()],
    &mut stdout,
  );
  assert!(result.is_err());
}

#[test]
fn test_same_names_are_fine_on_stdout() {
  let input = TempDir::new().unwrap();
  fs::create_dir_all(input.path().join("a")).unwrap();
  fs::create_dir_all(input.path().join("b")).unwrap();
  let alpha = input.path().join("a/index.html");
  let beta = input.path().join("b/index.html");
  fs::write(&alpha, "<h1>Alpha</h1>").unwrap();
  fs::write(&beta, "<h1>Beta</h1>").unwrap();

  let mut stdout = Vec::new();
  commands::render::run(&plain_config(), &[alpha, beta], &mut stdout)
    .unwrap();

  let text = String::from_utf8(stdout).unwrap();
  assert!(text.contains("Alpha"));
  assert!(text.contains("Beta"));
}

#[test]
fn test_render_to_stdout_keeps_input_order() {
  let input = TempDir::new().unwrap();
  let first = input.path().join("b.html");
  let second = input.path().join("a.html");
  fs::write(&first, "<h2>Bee</h2>").unwrap();
  fs::write(&second, "<h2>Ay</h2>").unwrap();

  let mut stdout = Vec::new();
  commands::render::run(&plain_config(), &[first, second], &mut stdout)
    .unwrap();

  let text = String::from_utf8(stdout).unwrap();
  assert_eq!(text, "<h2 id=\"bee\">Bee</h2>\n<h2 id=\"ay\">Ay</h2>\n");
}

#[test]
fn test_render_json_output() {
  let input = TempDir::new().unwrap();
  let path = input.path().join("doc.html");
  fs::write(&path, r#"<h1>Doc</h1><a href="doc:7">seven</a>"#).unwrap();

  let mut config = plain_config();
  config.format = Some(OutputFormat::Json);

  let mut stdout = Vec::new();
  commands::render::run(&config, &[path], &mut stdout).unwrap();

  let json: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
  assert_eq!(json["title"], "Doc");
  assert_eq!(json["outline"][0]["id"], "doc");
  assert_eq!(json["links"][0]["document_id"], "7");
}

#[test]
fn test_render_missing_input_fails() {
  let input = TempDir::new().unwrap();
  let mut stdout = Vec::new();
  let result = commands::render::run(
    &plain_config(),
    &[input.path().join("missing.html")],
    &mut stdout,
  );
  assert!(result.is_err());
}

#[test]
fn test_render_args_override_config() {
  let mut config = Config::default();
  let args = RenderArgs {
    output_dir: Some("site".into()),
    format: Some("json".to_string()),
    no_highlight: true,
    theme: Some("base16-ocean.dark".to_string()),
    ..Default::default()
  };

  args.apply_to(&mut config).unwrap();

  assert_eq!(config.output_dir, Some("site".into()));
  assert_eq!(config.output_format(), OutputFormat::Json);
  assert!(!config.is_highlight_enabled());
  assert_eq!(config.highlight_theme(), Some("base16-ocean.dark"));
}

#[test]
fn test_highlighted_render_writes_stylesheet() {
  let input = TempDir::new().unwrap();
  let output = TempDir::new().unwrap();
  fs::write(
    input.path().join("code.html"),
    r#"<pre><code class="language-rust">fn main() {}</code></pre>"#,
  )
  .unwrap();

  let mut config = Config::default();
  config.output_dir = Some(output.path().to_path_buf());

  let mut stdout = Vec::new();
  commands::render::run(&config, &[input.path().to_path_buf()], &mut stdout)
    .unwrap();

  let html = fs::read_to_string(output.path().join("code.html")).unwrap();
  let css = fs::read_to_string(output.path().join("highlight.css")).unwrap();
  assert!(html.contains("highlighted"));
  assert!(css.contains(".hl-"));
}

#[test]
fn test_outline_command() {
  let input = TempDir::new().unwrap();
  let path = input.path().join("doc.html");
  fs::write(&path, "<h1>Guide</h1><h2>Setup</h2><h3>Linux</h3>").unwrap();

  let mut text = Vec::new();
  commands::outline::run(&plain_config(), &path, false, &mut text).unwrap();
  assert_eq!(
    String::from_utf8(text).unwrap(),
    "- Guide (#guide)\n  - Setup (#setup)\n    - Linux (#linux)\n"
  );

  let mut json = Vec::new();
  commands::outline::run(&plain_config(), &path, true, &mut json).unwrap();
  let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
  assert_eq!(value[2]["level"], 3);
}

#[test]
fn test_css_command() {
  let mut css = Vec::new();
  commands::css::run(&Config::default(), None, &mut css).unwrap();
  assert!(!css.is_empty());

  let mut sink = Vec::new();
  assert!(
    commands::css::run(&Config::default(), Some("no-such-theme"), &mut sink)
      .is_err()
  );
}

#[test]
fn test_init_refuses_to_overwrite() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("nested/folio.toml");

  commands::init::run(&path, "toml", false).unwrap();
  assert_eq!(Config::from_file(&path).unwrap(), Config::documented());

  assert!(commands::init::run(&path, "toml", false).is_err());
  commands::init::run(&path, "toml", true).unwrap();
}
