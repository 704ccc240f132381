use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use thumbfall::dom::resolve_against_base;
use thumbfall::Document;
use thumbfall::Page;
use thumbfall::RecordingConsole;
use thumbfall::THUMBNAIL_CLASS;

/// Replay the thumbnail fallback script against a static HTML document.
#[derive(Parser, Debug)]
#[command(name = "thumbfall", version, about)]
struct Args {
  /// HTML file to load
  input: PathBuf,

  /// Mark the image with this `src` as failing to load (repeatable).
  /// Every other image is treated as loading successfully.
  #[arg(long = "fail", value_name = "SRC")]
  fail: Vec<String>,

  /// Base URL used to resolve reported image sources
  #[arg(long)]
  base: Option<String>,

  /// Emit the final per-thumbnail report as JSON
  #[arg(long)]
  json: bool,
}

#[derive(Serialize)]
struct ThumbnailReport {
  src: String,
  resolved_src: Option<String>,
  hidden: bool,
  complete: bool,
  listeners: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
  let args = Args::parse();

  let html = fs::read_to_string(&args.input)?;
  let document = Document::parse_html(&html)?;
  let console = Rc::new(RecordingConsole::new());
  let mut page = Page::new(document, console.clone());
  thumbfall::install(&mut page);

  let images = page.document.elements_with_tag("img");
  let (failing, succeeding): (Vec<_>, Vec<_>) = images.into_iter().partition(|&img| {
    page
      .document
      .get_attribute(img, "src")
      .is_some_and(|src| args.fail.iter().any(|f| f == src))
  });

  // Successful loads settle before the ready scan; failures surface after
  // it. This mirrors the usual cached-page interleaving, where the scan can
  // read either value of `complete`.
  for img in succeeding {
    page.complete_image(img);
  }
  page.ready();
  for img in failing {
    page.fail_image(img);
  }

  for line in console.lines() {
    println!("{line}");
  }

  let report: Vec<ThumbnailReport> = page
    .document
    .elements_with_class(THUMBNAIL_CLASS)
    .into_iter()
    .map(|node| {
      let src = page
        .document
        .get_attribute(node, "src")
        .unwrap_or_default()
        .to_string();
      ThumbnailReport {
        resolved_src: args
          .base
          .as_deref()
          .and_then(|base| resolve_against_base(base, &src)),
        hidden: page.document.is_hidden(node),
        complete: page.is_complete(node),
        listeners: page.events.listener_count(node),
        src,
      }
    })
    .collect();

  if args.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    for entry in &report {
      let shown = entry.resolved_src.as_deref().unwrap_or(&entry.src);
      println!(
        "{shown} hidden={} complete={} listeners={}",
        entry.hidden, entry.complete, entry.listeners
      );
    }
  }

  Ok(())
}
