//! Integration tests for selector compilation and matching over parsed trees.

use sift_dom::{DomTree, NodeId};
use sift_html::parse_html;
use sift_select::{Checker, Selector, compile, select, select_one};

/// Id attribute of a node, for readable assertions.
fn id_of(tree: &DomTree, node: NodeId) -> &str {
    tree.get(node).map_or("", |n| n.id.as_str())
}

fn ids(tree: &DomTree, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&n| id_of(tree, n).to_string()).collect()
}

fn select_one_id(tree: &DomTree, selector: &str) -> Option<String> {
    select_one(tree, tree.root(), selector).map(|n| id_of(tree, n).to_string())
}

const MAIN_IMG: &str = r#"<div id="main" class="main test"><img id="img" src="img.png"/></div>"#;

const THREE_IMGS: &str =
    r#"<div id="wrap"><img id="img"/><img id="img1"/><img id="img2"/></div>"#;

#[test]
fn test_child_combinator() {
    let tree = parse_html(MAIN_IMG);
    assert_eq!(select_one_id(&tree, "#main > #img").as_deref(), Some("img"));
}

#[test]
fn test_descendant_combinator() {
    let tree = parse_html(MAIN_IMG);
    assert_eq!(select_one_id(&tree, "#main #img").as_deref(), Some("img"));
    assert_eq!(select_one_id(&tree, "#other #img"), None);
}

#[test]
fn test_descendant_reaches_past_parent() {
    let tree = parse_html(r#"<div id="a"><p><span id="s"></span></p></div>"#);
    assert_eq!(select_one_id(&tree, "#a #s").as_deref(), Some("s"));
    assert_eq!(select_one_id(&tree, "#a > #s"), None);
    assert_eq!(select_one_id(&tree, "#a > p > #s").as_deref(), Some("s"));
}

#[test]
fn test_general_sibling_combinator() {
    let tree = parse_html(THREE_IMGS);
    assert_eq!(select_one_id(&tree, "#img ~ #img2").as_deref(), Some("img2"));
    assert_eq!(select_one_id(&tree, "#img3 ~ #img1"), None);
    assert_eq!(select_one_id(&tree, "#img2 ~ #img"), None);
}

#[test]
fn test_adjacent_sibling_combinator() {
    let tree = parse_html(THREE_IMGS);
    assert_eq!(select_one_id(&tree, "#img1 + #img2").as_deref(), Some("img2"));
    assert_eq!(select_one_id(&tree, "#img + #img2"), None);
}

#[test]
fn test_sibling_combinators_see_text_runs() {
    let tree = parse_html(r#"<div><b id="b"></b>text<i id="i"></i></div>"#);
    assert_eq!(select_one_id(&tree, "#b + #i"), None);
    assert_eq!(select_one_id(&tree, "#b ~ #i").as_deref(), Some("i"));
}

#[test]
fn test_combinator_chain() {
    let tree = parse_html(
        r#"<div id="root"><ul id="list"><li id="one"></li><li id="two"><a id="link"></a></li></ul></div>"#,
    );
    assert_eq!(
        select_one_id(&tree, "#root > ul li + li > a").as_deref(),
        Some("link")
    );
    assert_eq!(select_one_id(&tree, "#root > li a"), None);
}

#[test]
fn test_empty_pseudo_class() {
    let tree = parse_html(r#"<div id="outer"><div id="empty"></div><div id="full">x</div></div>"#);
    assert_eq!(select_one_id(&tree, "div:empty").as_deref(), Some("empty"));
}

#[test]
fn test_last_child_pseudo_class() {
    let tree = parse_html(r#"<div id="outer"><div id="empty"></div><div id="full">x</div></div>"#);
    assert_eq!(select_one_id(&tree, "div:last-child").as_deref(), Some("full"));
    assert_eq!(select_one_id(&tree, "div:first-child").as_deref(), Some("empty"));
}

#[test]
fn test_structural_pseudo_classes_count_text() {
    let tree = parse_html(r#"<p id="p">lead<b id="b"></b></p>"#);
    assert_eq!(select_one_id(&tree, "b:first-child"), None);
    assert_eq!(select_one_id(&tree, "b:last-child").as_deref(), Some("b"));
    assert_eq!(select_one_id(&tree, "b:only-child"), None);
    assert_eq!(select_one_id(&tree, "p:empty"), None);
}

#[test]
fn test_only_child() {
    let tree = parse_html(r#"<div><section id="s"><em id="e"></em></section><hr id="h"/></div>"#);
    assert_eq!(select_one_id(&tree, ":only-child").as_deref(), Some("e"));
}

#[test]
fn test_root_is_never_first_or_only_child() {
    let tree = parse_html(r#"<div id="root"></div>"#);
    assert_eq!(select_one_id(&tree, "div:first-child"), None);
    assert_eq!(select_one_id(&tree, "div:only-child"), None);
    assert_eq!(select_one_id(&tree, "div:empty").as_deref(), Some("root"));
}

#[test]
fn test_has_and_contains() {
    let tree = parse_html(
        r#"<body><div id="main"><img id="img"/></div><div id="text">SomeText</div></body>"#,
    );
    assert_eq!(select_one_id(&tree, "div:has(#img)").as_deref(), Some("main"));
    assert_eq!(select_one_id(&tree, "div:contains(Some)").as_deref(), Some("text"));
    assert_eq!(select_one_id(&tree, "div:contains('Text')").as_deref(), Some("text"));
    assert_eq!(select_one_id(&tree, "div:contains(Missing)"), None);
}

#[test]
fn test_has_looks_below_direct_children() {
    let tree = parse_html(r#"<div id="a"><p><span class="deep"></span></p></div>"#);
    assert_eq!(select_one_id(&tree, "div:has(.deep)").as_deref(), Some("a"));
    // The node itself is not one of its own children.
    assert!(select(&tree, tree.root(), "span:has(.deep)").is_empty());
}

#[test]
fn test_has_with_combinator_argument() {
    let tree = parse_html(r#"<div id="a"><ul><li><b></b></li></ul></div>"#);
    assert_eq!(select_one_id(&tree, "div:has(li > b)").as_deref(), Some("a"));
    assert_eq!(select_one_id(&tree, "div:has(ul > b)"), None);
}

#[test]
fn test_contains_uses_inner_text() {
    let tree = parse_html(r#"<div id="d"><span>Some</span><span>Text</span></div>"#);
    assert_eq!(select_one_id(&tree, "div:contains(SomeText)").as_deref(), Some("d"));
}

#[test]
fn test_attribute_operators_on_img() {
    let tree = parse_html(r#"<div id="wrap"><img id="img" src="img.png"/></div>"#);
    for selector in [
        "[src]",
        "[src='img.png']",
        "[src*='png']",
        "[src^='img']",
        "[src$='png']",
        "[src!='png']",
    ] {
        assert_eq!(
            select_one_id(&tree, selector).as_deref(),
            Some("img"),
            "{selector}"
        );
    }
    assert_eq!(select_one_id(&tree, "[src!='img.png']"), None);
    assert_eq!(select_one_id(&tree, "[src='png']"), None);
    assert_eq!(select_one_id(&tree, "[alt]"), None);
}

#[test]
fn test_attribute_token_and_dash_match() {
    let tree = parse_html(
        r#"<div id="wrap"><p id="a" data-tags="red green" lang="en-GB"></p><p id="b" data-tags="greenish"></p></div>"#,
    );
    let hits = select(&tree, tree.root(), "[data-tags~=green]");
    assert_eq!(ids(&tree, &hits), vec!["a"]);
    assert_eq!(select_one_id(&tree, "[lang|=en]").as_deref(), Some("a"));
    assert_eq!(select_one_id(&tree, "[lang|=e]"), None);
}

#[test]
fn test_double_quoted_attribute_value() {
    let tree = parse_html(r#"<a id="l" title="x y"></a>"#);
    assert_eq!(select_one_id(&tree, r#"a[title="x y"]"#).as_deref(), Some("l"));
}

#[test]
fn test_class_and_compound() {
    let tree = parse_html(
        r#"<div id="wrap"><p id="a" class="x"></p><p id="b" class="x y"></p><span id="c" class="x y"></span></div>"#,
    );
    let hits = select(&tree, tree.root(), "p.x.y");
    assert_eq!(ids(&tree, &hits), vec!["b"]);
    let hits = select(&tree, tree.root(), ".y.x");
    assert_eq!(ids(&tree, &hits), vec!["b", "c"]);
}

#[test]
fn test_selector_list_is_union_in_document_order() {
    let tree = parse_html(
        r#"<div id="wrap"><span id="s"></span><p id="p"><em id="e"></em></p></div>"#,
    );
    let hits = select(&tree, tree.root(), "p em, span");
    assert_eq!(ids(&tree, &hits), vec!["s", "e"]);
}

#[test]
fn test_universal_matches_root_and_text() {
    let tree = parse_html("<div><p>x</p></div>");
    // div, p and the text run
    assert_eq!(select(&tree, tree.root(), "*").len(), 3);
}

#[test]
fn test_list_order_does_not_matter_with_stray_characters_in_arguments() {
    let tree = parse_html(r#"<div><p id="p">[</p><span id="s">s</span></div>"#);
    for selector in ["p:contains([), span", "span, p:contains([)"] {
        assert_eq!(ids(&tree, &select(&tree, tree.root(), selector)), vec!["p", "s"], "{selector}");
    }

    let tree = parse_html(r#"<div><p id="p">it's</p><span id="s">s</span></div>"#);
    for selector in ["p:contains(it's), span", "span, p:contains(it's)"] {
        assert_eq!(ids(&tree, &select(&tree, tree.root(), selector)), vec!["p", "s"], "{selector}");
    }
}

#[test]
fn test_fragment_root_is_never_matched() {
    let tree = parse_html(r#"<p id="a">x</p><p id="b">y</p>"#);
    assert_eq!(tree.root(), NodeId::SYNTHETIC_ROOT);

    let all = select(&tree, tree.root(), "*");
    assert_eq!(all.len(), 4);
    assert!(!all.contains(&tree.root()));

    assert!(select(&tree, tree.root(), "* > p").is_empty());
    assert!(select(&tree, tree.root(), "* p").is_empty());
    assert!(select(&tree, tree.root(), "p:first-child").is_empty());
    assert_eq!(ids(&tree, &select(&tree, tree.root(), "p + p")), vec!["b"]);
}

#[test]
fn test_select_includes_root() {
    let tree = parse_html(r#"<div id="main"><div id="inner"></div></div>"#);
    let hits = select(&tree, tree.root(), "div");
    assert_eq!(ids(&tree, &hits), vec!["main", "inner"]);
    let inner = hits[1];
    assert_eq!(select(&tree, inner, "div"), vec![inner]);
}

#[test]
fn test_scoped_query_still_sees_ancestors() {
    let tree = parse_html(r#"<div id="main"><p id="p"><b id="b"></b></p></div>"#);
    let p = select_one(&tree, tree.root(), "p").expect("p");
    assert_eq!(
        select_one(&tree, p, "#main b").map(|n| id_of(&tree, n).to_string()).as_deref(),
        Some("b")
    );
}

#[test]
fn test_unknown_pseudo_class_matches_nothing() {
    let tree = parse_html(r#"<a id="a" href="/"></a>"#);
    assert!(select(&tree, tree.root(), "a:hover").is_empty());
    assert!(select(&tree, tree.root(), ":nth-child(1)").is_empty());
    assert!(select(&tree, tree.root(), "a::before").is_empty());
}

#[test]
fn test_leading_combinator_never_matches() {
    let tree = parse_html(THREE_IMGS);
    assert!(select(&tree, tree.root(), "> img").is_empty());
    assert!(select(&tree, tree.root(), "+ #img1").is_empty());
    assert!(select(&tree, tree.root(), "~ img").is_empty());
}

#[test]
fn test_combinators_against_root_never_match() {
    let tree = parse_html(r#"<img id="img"/>"#);
    assert_eq!(select_one_id(&tree, "* + #img"), None);
    assert_eq!(select_one_id(&tree, "* ~ #img"), None);
    assert_eq!(select_one_id(&tree, "* > #img"), None);
    assert_eq!(select_one_id(&tree, "* #img"), None);
    assert_eq!(select_one_id(&tree, "#img").as_deref(), Some("img"));
}

#[test]
fn test_first_child_has_no_previous_sibling() {
    let tree = parse_html(THREE_IMGS);
    assert_eq!(select_one_id(&tree, "* + #img"), None);
    assert_eq!(select_one_id(&tree, "* + #img1").as_deref(), Some("img1"));
}

#[test]
fn test_trailing_combinator_and_empty_selector() {
    let tree = parse_html(THREE_IMGS);
    assert!(select(&tree, tree.root(), "img >").is_empty());
    assert!(select(&tree, tree.root(), "").is_empty());
    assert_eq!(select(&tree, tree.root(), "#img1,").len(), 1);
}

#[test]
fn test_extra_whitespace_is_ignored() {
    let tree = parse_html(MAIN_IMG);
    assert_eq!(
        select_one_id(&tree, "  #main\n >\t#img  ").as_deref(),
        Some("img")
    );
}

#[test]
fn test_tag_match_is_exact() {
    let tree = parse_html("<div></div>");
    assert!(select(&tree, tree.root(), "DIV").is_empty());
    assert!(select(&tree, tree.root(), "di").is_empty());
}

#[test]
fn test_selector_reuse() {
    let tree = parse_html(THREE_IMGS);
    let selector = Selector::compile("img");
    assert_eq!(selector.source(), "img");
    assert_eq!(selector.to_string(), "img");
    assert_eq!(selector.checker(), &Checker::Tag("img".to_string()));
    let root = tree.root();
    assert_eq!(selector.select(&tree, root).len(), 3);
    assert_eq!(selector.select_one(&tree, root), selector.select(&tree, root).first().copied());
    assert!(!selector.matches(&tree, root));

    let parsed: Selector = "img".parse().expect("infallible");
    assert_eq!(parsed, selector);
}

#[test]
fn test_compile_is_deterministic() {
    for selector in ["#main > #img", "div:has(p, span)", "a[href^='http'] ~ b", ":hover"] {
        assert_eq!(compile(selector), compile(selector));
    }
}
