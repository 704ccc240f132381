use std::rc::Rc;
use thumbfall::dom::Document;
use thumbfall::dom::NodeId;
use thumbfall::events::EventKind;
use thumbfall::page::Page;
use thumbfall::script;
use thumbfall::RecordingConsole;
use thumbfall::PLACEHOLDER_SRC;

fn page_with(html: &str) -> (Page, Rc<RecordingConsole>) {
  let document = Document::parse_html(html).expect("parse html");
  let console = Rc::new(RecordingConsole::new());
  let mut page = Page::new(document, console.clone());
  script::install(&mut page);
  (page, console)
}

fn img_by_id(page: &Page, id: &str) -> NodeId {
  page
    .document
    .elements_with_tag("img")
    .into_iter()
    .find(|&img| page.document.get_attribute(img, "id") == Some(id))
    .expect("img element")
}

#[test]
fn failed_thumbnail_is_hidden_unbound_and_swapped() {
  let (mut page, console) = page_with(r#"<img id="t" class="thumbnail" src="/thumbs/t.jpg">"#);
  let img = img_by_id(&page, "t");

  page.ready();
  page.fail_image(img);

  assert!(page.document.is_hidden(img), "failed thumbnail should be hidden");
  assert_eq!(page.events.listener_count(img), 0, "all listeners removed");
  assert_eq!(page.document.get_attribute(img, "src"), Some(PLACEHOLDER_SRC));
  assert_eq!(console.lines(), vec!["proc1", "false", "proc"]);
}

#[test]
fn second_error_on_fallback_applied_element_is_a_noop() {
  let (mut page, console) = page_with(r#"<img id="t" class="thumbnail" src="/thumbs/t.jpg">"#);
  let img = img_by_id(&page, "t");

  page.ready();
  page.fail_image(img);
  let style_after_first = page.document.get_attribute(img, "style").map(str::to_string);

  // The placeholder itself failing to load is the same dispatch: no listener
  // remains, so nothing further happens.
  page.fail_image(img);

  let proc_count = console.lines().iter().filter(|l| *l == "proc").count();
  assert_eq!(proc_count, 1, "fallback applies at most once");
  assert_eq!(page.document.get_attribute(img, "src"), Some(PLACEHOLDER_SRC));
  assert_eq!(
    page.document.get_attribute(img, "style").map(str::to_string),
    style_after_first
  );
}

#[test]
fn fallback_unbinds_listeners_from_other_sources_too() {
  let (mut page, _console) = page_with(r#"<img id="t" class="thumbnail" src="/thumbs/t.jpg">"#);
  let img = img_by_id(&page, "t");
  page.events.bind(img, EventKind::Load, Rc::new(|_: &mut Page, _| {}));

  page.ready();
  page.fail_image(img);

  assert_eq!(page.events.listener_count(img), 0, "unbind covers every kind");
}

#[test]
fn non_thumbnail_images_are_never_mutated() {
  let (mut page, console) = page_with(r#"<img id="plain" src="/banner.png">"#);
  let img = img_by_id(&page, "plain");

  page.ready();
  page.fail_image(img);

  assert_eq!(page.document.get_attribute(img, "src"), Some("/banner.png"));
  assert!(!page.document.is_hidden(img));
  assert_eq!(console.lines(), vec!["proc1"], "no scan line, no proc");
}

#[test]
fn errors_before_ready_are_not_handled() {
  let (mut page, console) = page_with(r#"<img id="t" class="thumbnail" src="/thumbs/t.jpg">"#);
  let img = img_by_id(&page, "t");

  // Handler only exists once the ready event has run.
  page.fail_image(img);
  assert!(!page.document.is_hidden(img));
  assert_eq!(page.document.get_attribute(img, "src"), Some("/thumbs/t.jpg"));

  page.ready();
  // The scan reads the flag the environment reports at that instant: the
  // image failed earlier, so `complete` is false.
  assert_eq!(console.lines(), vec!["proc1", "false"]);
}

#[test]
fn mixed_page_logs_scan_then_fallback_in_order() {
  let (mut page, console) = page_with(
    r#"<img id="a" class="thumbnail" src="/thumbs/a.jpg">
       <img id="b" class="thumbnail" src="/thumbs/b.jpg">"#,
  );
  let a = img_by_id(&page, "a");
  let b = img_by_id(&page, "b");

  // A is cached and completes before the ready scan; B fails afterwards.
  page.complete_image(a);
  page.ready();
  page.fail_image(b);

  assert_eq!(console.lines(), vec!["proc1", "true", "false", "proc"]);

  assert_eq!(page.document.get_attribute(a, "src"), Some("/thumbs/a.jpg"));
  assert!(!page.document.is_hidden(a), "A is untouched");
  assert_eq!(page.events.listener_count(a), 1, "A keeps its error handler");

  assert_eq!(page.document.get_attribute(b, "src"), Some(PLACEHOLDER_SRC));
  assert!(page.document.is_hidden(b));
  assert_eq!(page.events.listener_count(b), 0);
}

#[test]
fn scan_logs_complete_flags_in_dom_order() {
  let (mut page, console) = page_with(
    r#"<div><img id="a" class="thumbnail" src="/thumbs/a.jpg"></div>
       <img id="b" class="thumbnail" src="/thumbs/b.jpg">
       <img id="c" class="thumbnail" src="/thumbs/c.jpg">"#,
  );
  let b = img_by_id(&page, "b");
  page.complete_image(b);

  page.ready();
  assert_eq!(console.lines(), vec!["proc1", "false", "true", "false"]);
}

#[test]
fn page_without_thumbnails_logs_proc1_only() {
  let (mut page, console) = page_with(r#"<p>no images here</p>"#);
  page.ready();
  assert_eq!(console.lines(), vec!["proc1"]);
}

#[test]
fn ready_fires_at_most_once() {
  let (mut page, console) = page_with(r#"<img id="t" class="thumbnail" src="/thumbs/t.jpg">"#);
  page.ready();
  page.ready();

  let proc1_count = console.lines().iter().filter(|l| *l == "proc1").count();
  assert_eq!(proc1_count, 1);
  let img = img_by_id(&page, "t");
  assert_eq!(page.events.listener_count(img), 1, "handler bound once");
}
