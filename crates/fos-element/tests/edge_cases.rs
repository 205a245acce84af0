//! Edge case tests for fos-element
//!
//! Wrapper identity, event multiplexing against native dispatch, mapped
//! values and lifecycle corner cases.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{dispatch_event, run_pending_events, DomError, DomEvent};
use fos_element::{
    Callback, Codec, Content, Document, ElementError, EventData, Mapped, Mapping, Registry,
    Selection, UrlCodec, Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn counter() -> (Rc<RefCell<u32>>, Callback) {
    let hits = Rc::new(RefCell::new(0));
    let sink = hits.clone();
    let callback = Callback::new(move |_| {
        *sink.borrow_mut() += 1;
        Ok(None)
    });
    (hits, callback)
}

fn parsed(html: &str) -> Registry {
    Registry::new(fos_html::parse(html).into_shared())
}

// ============================================================================
// IDENTITY CACHE
// ============================================================================

#[test]
fn test_query_twice_yields_identical_wrappers() {
    let registry = parsed("<ul><li>a</li><li>b</li><li>c</li></ul>");

    let first = registry.query("li").unwrap().into_vec();
    let second = registry.query("li").unwrap().into_vec();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    assert_eq!(registry.cache_len(), 3);
}

#[test]
fn test_single_match_is_one() {
    let registry = parsed("<p id='only'>x</p>");
    assert!(matches!(registry.query("#only"), Some(Selection::One(_))));
}

#[test]
fn test_invalid_or_empty_selector_is_none() {
    let registry = parsed("<p>x</p>");
    assert!(registry.query("p[").is_none());
    assert!(registry.query("").is_none());
    assert!(registry.query("section").is_none());
}

#[test]
fn test_direct_construction_over_cached_node() {
    let registry = parsed("<div id='app'></div>");
    let cached = registry.query("#app").unwrap().first().unwrap().clone();

    let direct_a = registry.from(cached.node(), None).unwrap();
    let direct_b = registry.from(cached.node(), None).unwrap();

    assert_ne!(direct_a, cached);
    assert_ne!(direct_a, direct_b);
    assert_eq!(registry.cache_len(), 1);
    assert_eq!(registry.cached(cached.node()), Some(cached));
}

#[test]
fn test_element_query_is_scoped() {
    let registry = parsed("<section><p>in</p></section><p>out</p>");
    let section = registry.query("section").unwrap().first().unwrap().clone();

    let inner = section.query("p").unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(registry.query("p").unwrap().len(), 2);
    assert_eq!(registry.query("p").unwrap().first(), inner.first());
}

#[test]
fn test_independent_registries() {
    let a = parsed("<p>a</p>");
    let b = parsed("<p>b</p>");
    let pa = a.query("p").unwrap().first().unwrap().clone();
    let pb = b.query("p").unwrap().first().unwrap().clone();

    assert_ne!(pa, pb);
    assert_eq!(a.cache_len(), 1);
    assert_eq!(b.cache_len(), 1);
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_emit_delegates_to_native_method() {
    init_tracing();
    let registry = parsed("<input id='name' value='hello'>");
    let input = registry.query("#name").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    input.on("select", &callback);

    let emission = input.emit("select", vec![]);
    assert!(emission.is_delegated());
    assert!(emission.value().is_none());
    assert_eq!(*hits.borrow(), 0);
    assert_eq!(registry.document().borrow().selection(input.node()), Some((0, 5)));

    // The native method's own event reaches the subscriber afterwards
    assert_eq!(run_pending_events(registry.document()), 1);
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn test_emit_with_args_skips_native_method() {
    let registry = parsed("<input id='name' value='hello'>");
    let input = registry.query("#name").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    input.on("select", &callback);

    let emission = input.emit("select", vec![EventData::Text("manual".into())]);
    assert!(!emission.is_delegated());
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(registry.document().borrow().pending_events(), 0);
}

#[test]
fn test_emit_without_listener_does_not_delegate() {
    let registry = parsed("<input id='name' value='hello'>");
    let input = registry.query("#name").unwrap().first().unwrap().clone();

    let emission = input.emit("select", vec![]);
    assert!(!emission.is_delegated());
    assert_eq!(registry.document().borrow().selection(input.node()), None);
}

#[test]
fn test_once_fires_once() {
    let registry = parsed("<div id='box'></div>");
    let div = registry.query("#box").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    div.once("ping", &callback);

    div.emit("ping", vec![]);
    div.emit("ping", vec![]);
    assert_eq!(*hits.borrow(), 1);
    assert!(!div.has_listener("ping"));

    dispatch_event(registry.document(), div.node(), DomEvent::new("ping", true, false));
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(registry.document().borrow().listeners().count(div.node(), "ping"), 0);
}

#[test]
fn test_once_through_native_dispatch() {
    let registry = parsed("<button id='go'>Go</button>");
    let button = registry.query("#go").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    button.once("click", &callback);

    let doc = registry.document();
    dispatch_event(doc, button.node(), DomEvent::new("click", true, true));
    dispatch_event(doc, button.node(), DomEvent::new("click", true, true));

    assert_eq!(*hits.borrow(), 1);
    assert_eq!(doc.borrow().listeners().count(button.node(), "click"), 0);
}

#[test]
fn test_off_all_removes_listener() {
    let registry = parsed("<div id='box'></div>");
    let div = registry.query("#box").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    div.on("ping", &callback);
    div.on("ping", &callback);

    assert!(div.off("ping", None));
    assert!(!div.has_listener("ping"));

    let emission = div.emit("ping", vec![]);
    assert!(emission.value().is_none());
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn test_bubbling_reaches_ancestor_wrapper() {
    let registry = parsed("<form><button>Send</button></form>");
    let form = registry.query("form").unwrap().first().unwrap().clone();
    let button = registry.query("button").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    form.on("click", &callback);

    assert!(!button.emit("click", vec![]).is_delegated());
    assert!(fos_dom::invoke_native_method(registry.document(), button.node(), "click"));
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn test_disabled_button_swallows_delegated_click() {
    let registry = parsed("<button>Send</button>");
    let button = registry.query("button").unwrap().first().unwrap().clone();
    let (hits, callback) = counter();
    button.on("click", &callback);
    button.set_state("disabled").unwrap();

    assert!(button.emit("click", vec![]).is_delegated());
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn test_subscriber_added_during_emit() {
    let registry = parsed("<div id='box'></div>");
    let div = registry.query("#box").unwrap().first().unwrap().clone();
    let (late_hits, late) = counter();
    let adder = {
        let div = div.clone();
        Callback::new(move |_| {
            div.on("ping", &late);
            Ok(None)
        })
    };
    div.once("ping", &adder);

    div.emit("ping", vec![EventData::Bool(true)]);
    assert_eq!(*late_hits.borrow(), 1);
    assert_eq!(div.subscriber_count("ping"), 1);
}

// ============================================================================
// VALUES
// ============================================================================

#[test]
fn test_url_textarea_round_trip() {
    let registry = parsed("<textarea data-map='URL'></textarea>");
    let textarea = registry.query("textarea").unwrap().first().unwrap().clone();
    let records = vec![
        Mapping::Url.parse("https://www.example.com/a?b=1"),
        Mapping::Url.parse("http://10.0.0.1:8080/status"),
    ];

    textarea.set_value(records.clone()).unwrap();
    assert_eq!(textarea.value(), Some(Value::Records(records)));
}

#[test]
fn test_url_textarea_keeps_scheme_less_ports() {
    let registry = parsed("<textarea data-map='URL'></textarea>");
    let textarea = registry.query("textarea").unwrap().first().unwrap().clone();

    textarea.set_value("example.com/a\nexample.com:8080/b\n42").unwrap();
    let records = textarea.value().unwrap().into_records();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].as_url().and_then(|r| r.port), Some(8080));
    assert_eq!(records[1].render(), "example.com:8080/b");
}

#[test]
fn test_url_textarea_drops_malformed_lines() {
    let registry = parsed("<textarea data-map='URL'></textarea>");
    let textarea = registry.query("textarea").unwrap().first().unwrap().clone();

    textarea.set_value("https://a.example.org/x\n\n   \nnot a url\n  http://10.0.0.1:8080/ ").unwrap();
    let records = textarea.value().unwrap().into_records();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].as_url().and_then(|r| r.subdomain.as_deref()), Some("a"));
    assert_eq!(records[1].as_url().and_then(|r| r.host.as_deref()), Some("10.0.0.1"));
}

#[test]
fn test_mapped_input_keeps_failed_parse() {
    let registry = parsed("<input data-map='URL' value='   '>");
    let input = registry.query("input").unwrap().first().unwrap().clone();

    let value = input.value().unwrap();
    let record = value.as_record().unwrap();
    assert!(!record.is_valid());
    assert_eq!(record, &Mapped::Url(UrlCodec::parse("")));
}

#[test]
fn test_data_val_overrides_mapping() {
    let registry = parsed("<div data-val='raw' data-map='IP'>10.0.0.1</div>");
    let div = registry.query("div").unwrap().first().unwrap().clone();

    assert_eq!(div.value(), Some(Value::Text("raw".into())));
    div.set_value(Mapping::Ip.parse("::1")).unwrap();
    assert_eq!(div.value(), Some(Value::Text("::1".into())));
    assert_eq!(fos_html::inner_html(registry.document().borrow().tree(), div.node()), "10.0.0.1");
}

#[test]
fn test_textarea_rejects_nodes() {
    let registry = parsed("<textarea></textarea>");
    let textarea = registry.query("textarea").unwrap().first().unwrap().clone();
    let span = registry.from("span", None).unwrap();

    let err = textarea.set_value(Content::Nodes(vec![span])).unwrap_err();
    assert!(matches!(err, ElementError::UnsupportedContent { kind: "node list", .. }));
}

#[test]
fn test_container_value_is_trimmed_markup() {
    let registry = parsed("<div>\n   <em>hi</em>  \n</div>");
    let div = registry.query("div").unwrap().first().unwrap().clone();
    assert_eq!(div.value().unwrap().as_text(), Some("<em>hi</em>"));
}

// ============================================================================
// STATE
// ============================================================================

#[test]
fn test_disabled_input_vs_div() {
    let registry = parsed("<input><div></div>");
    let input = registry.query("input").unwrap().first().unwrap().clone();
    let div = registry.query("div").unwrap().first().unwrap().clone();

    input.set_state("disabled").unwrap();
    div.set_state("disabled").unwrap();

    let doc = registry.document().borrow();
    assert_eq!(input.state().as_deref(), Some("disabled"));
    assert!(doc.has_attribute(input.node(), "disabled"));
    assert_eq!(doc.class_name(input.node()), "");

    assert_eq!(div.state().as_deref(), Some("disabled"));
    assert!(!doc.has_attribute(div.node(), "disabled"));
    assert_eq!(doc.class_name(div.node()), "disabled");
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_render_then_erase() {
    let registry = Registry::new(Document::default().into_shared());
    let body = registry.document().borrow().body();
    let p = registry.from("p", None).unwrap();

    p.render(body).unwrap();
    assert_eq!(registry.query("p").unwrap().first(), Some(&p));

    p.erase(body).unwrap();
    assert_eq!(registry.cache_len(), 0);
    assert!(registry.query("p").is_none());
    assert_eq!(registry.document().borrow().tree().parent(p.node()), None);
}

#[test]
fn test_render_into_non_element() {
    let registry = Registry::new(Document::default().into_shared());
    let text = registry.document().borrow_mut().tree_mut().create_text("t");
    let p = registry.from("p", None).unwrap();

    assert!(matches!(p.render(text), Err(ElementError::NotAnElement(_))));
}

#[test]
fn test_erase_from_wrong_parent() {
    let registry = parsed("<div id='a'><p>x</p></div><div id='b'></div>");
    let p = registry.query("p").unwrap().first().unwrap().clone();
    let b = registry.query("#b").unwrap().first().unwrap().clone();

    let err = p.erase(b.node()).unwrap_err();
    assert!(matches!(err, ElementError::Dom(DomError::NotAChild { .. })));
    assert_eq!(registry.cache_len(), 2);
}

#[test]
fn test_erase_through_unregistered_wrapper_keeps_cache() {
    init_tracing();
    let registry = parsed("<ul><li>a</li></ul>");
    let ul = registry.query("ul").unwrap().first().unwrap().clone();
    let cached = registry.query("li").unwrap().first().unwrap().clone();
    let direct = registry.from(cached.node(), None).unwrap();

    direct.erase(ul.node()).unwrap();

    assert_eq!(registry.document().borrow().tree().parent(cached.node()), None);
    assert_eq!(registry.cache_len(), 2);
    assert_eq!(registry.cached(cached.node()), Some(cached));
}

#[test]
fn test_url_codec_via_public_trait() {
    let record = UrlCodec::parse("example.com");
    assert!(UrlCodec::is_valid(&record));
    assert_eq!(record.protocol, None);
}
