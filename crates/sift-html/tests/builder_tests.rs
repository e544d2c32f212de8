//! Integration tests for tag-stream tree construction.

use sift_dom::{DomTree, Node, NodeId};
use sift_html::{Attribute, Token, TreeBuilder, build_tree, is_void_element, parse_html};

/// Helper to get a node reference
fn get_node(tree: &DomTree, id: NodeId) -> &Node {
    tree.get(id).expect("Node not found")
}

/// Tags of the children of `id`, text nodes shown as `#text`.
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&c| {
            let node = get_node(tree, c);
            if node.is_text() {
                "#text".to_string()
            } else {
                node.tag.clone()
            }
        })
        .collect()
}

#[test]
fn test_single_root_is_promoted() {
    let tree = parse_html("<html><head></head><body></body></html>");
    let root = tree.root();
    assert_ne!(root, NodeId::SYNTHETIC_ROOT);
    assert_eq!(get_node(&tree, root).tag, "html");
    assert_eq!(tree.parent(root), None);
    assert_eq!(child_tags(&tree, root), vec!["head", "body"]);
}

#[test]
fn test_promoted_root_has_no_ancestors() {
    let tree = parse_html("<div><p>x</p></div>");
    let root = tree.root();
    assert!(tree.ancestors(root).is_empty());
    let p = tree.find_by_tag(root, "p").expect("p");
    assert_eq!(tree.ancestors(p), vec![root]);
}

#[test]
fn test_fragment_keeps_synthetic_root() {
    let tree = parse_html("<p>a</p><p>b</p>");
    assert_eq!(tree.root(), NodeId::SYNTHETIC_ROOT);
    assert_eq!(child_tags(&tree, tree.root()), vec!["p", "p"]);
}

#[test]
fn test_empty_input_is_bare_synthetic_root() {
    let tree = parse_html("");
    assert_eq!(tree.root(), NodeId::SYNTHETIC_ROOT);
    assert!(!tree.has_children(tree.root()));
}

#[test]
fn test_attributes_classes_and_id() {
    let tree = parse_html(r#"<div id="main" class="main test" data-x="1"></div>"#);
    let div = get_node(&tree, tree.root());
    assert_eq!(div.id, "main");
    assert_eq!(div.classes, vec!["main", "test"]);
    assert_eq!(div.attribute("data-x"), Some("1"));
    assert_eq!(div.attributes.len(), 3);
}

#[test]
fn test_no_class_attribute_means_no_classes() {
    let tree = parse_html("<span></span>");
    let span = get_node(&tree, tree.root());
    assert!(span.classes.is_empty());
    assert!(span.id.is_empty());
}

#[test]
fn test_class_split_on_single_spaces() {
    let tree = parse_html(r#"<b class="a  b"></b>"#);
    assert_eq!(get_node(&tree, tree.root()).classes, vec!["a", "", "b"]);
}

#[test]
fn test_void_start_tag_does_not_descend() {
    let tree = parse_html("<div><img src=a.png><span>t</span></div>");
    let root = tree.root();
    assert_eq!(child_tags(&tree, root), vec!["img", "span"]);
    let img = tree.find_by_tag(root, "img").expect("img");
    assert!(!tree.has_children(img));
}

#[test]
fn test_void_elements_table() {
    for tag in ["br", "img", "input", "meta", "wbr", "keygen", "command"] {
        assert!(is_void_element(tag), "{tag} should be void");
    }
    assert!(!is_void_element("div"));
    assert!(!is_void_element("IMG"));
}

#[test]
fn test_self_closing_does_not_descend() {
    let tree = parse_html("<div><widget/><p></p></div>");
    assert_eq!(child_tags(&tree, tree.root()), vec!["widget", "p"]);
}

#[test]
fn test_text_is_normalized() {
    let tree = parse_html("<p>\n   Some\t\ttext \n here  </p>");
    let p = tree.root();
    let text = tree.first_child(p).expect("text child");
    assert_eq!(get_node(&tree, text).text, "Some text here");
    assert!(get_node(&tree, text).tag.is_empty());
}

#[test]
fn test_whitespace_only_text_is_dropped() {
    let tree = parse_html("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
    assert_eq!(child_tags(&tree, tree.root()), vec!["li", "li"]);
}

#[test]
fn test_mixed_content_order() {
    let tree = parse_html("<p>one <b>two</b> three</p>");
    let p = tree.root();
    assert_eq!(child_tags(&tree, p), vec!["#text", "b", "#text"]);
    assert_eq!(tree.inner_text(p), "onetwothree");
}

#[test]
fn test_end_tag_pops_without_name_check() {
    // </span> closes the <b>, so <i> lands beside it under <p>.
    let tree = parse_html("<p><b>x</span><i>y</i></p>");
    let p = tree.root();
    assert_eq!(child_tags(&tree, p), vec!["b", "i"]);
}

#[test]
fn test_end_tag_never_leaves_body() {
    let tree = parse_html("<html><body><div></div></body></html><p></p>");
    let root = tree.root();
    let body = tree.find_by_tag(root, "body").expect("body");
    // The closing tags after <div> stall at body, so <p> is placed inside it.
    assert_eq!(child_tags(&tree, body), vec!["div", "p"]);
}

#[test]
fn test_excess_end_tags_stay_at_root() {
    let tree = parse_html("</div></div><p>x</p>");
    assert_eq!(get_node(&tree, tree.root()).tag, "p");
}

#[test]
fn test_comments_and_doctype_are_skipped() {
    let tree = parse_html("<!DOCTYPE html><!-- c --><div><!-- d -->x</div>");
    let div = tree.root();
    assert_eq!(get_node(&tree, div).tag, "div");
    assert_eq!(child_tags(&tree, div), vec!["#text"]);
}

#[test]
fn test_character_references_reach_the_tree() {
    let tree = parse_html(r#"<a title="x &amp; y">1 &lt; 2</a>"#);
    let a = tree.root();
    assert_eq!(get_node(&tree, a).attribute("title"), Some("x & y"));
    assert_eq!(tree.inner_text(a), "1 < 2");
}

#[test]
fn test_script_text_kept_verbatim() {
    let tree = parse_html("<div><script>if (a<b) {}</script></div>");
    let script = tree.find_by_tag(tree.root(), "script").expect("script");
    assert_eq!(tree.inner_text(script), "if (a<b) {}");
}

#[test]
fn test_unclosed_elements_nest() {
    let tree = parse_html("<div><p>a<p>b");
    let div = tree.root();
    let first_p = tree.first_child(div).expect("p");
    assert_eq!(child_tags(&tree, first_p), vec!["#text", "p"]);
}

#[test]
fn test_builder_from_hand_built_tokens() {
    let tokens = vec![
        Token::start_tag("div", vec![Attribute::new("id", "main")]),
        Token::self_closing_tag("img", vec![Attribute::new("id", "img")]),
        Token::text("hello"),
        Token::end_tag("div"),
        Token::EndOfFile,
    ];
    let tree = build_tree(&tokens);
    let root = tree.root();
    assert_eq!(get_node(&tree, root).id, "main");
    assert_eq!(child_tags(&tree, root), vec!["img", "#text"]);
}

#[test]
fn test_duplicate_attributes_in_tokens_first_wins() {
    let tokens = [Token::start_tag(
        "p",
        vec![Attribute::new("id", "first"), Attribute::new("id", "second")],
    )];
    let tree = build_tree(&tokens);
    assert_eq!(get_node(&tree, tree.root()).id, "first");
}

#[test]
fn test_builder_cursor_tracks_nesting() {
    let mut builder = TreeBuilder::new();
    assert_eq!(builder.current_node(), NodeId::SYNTHETIC_ROOT);
    builder.process(&Token::start_tag("div", vec![]));
    let div = builder.current_node();
    assert_ne!(div, NodeId::SYNTHETIC_ROOT);
    builder.process(&Token::start_tag("br", vec![]));
    assert_eq!(builder.current_node(), div);
    builder.process(&Token::text("t"));
    assert_eq!(builder.current_node(), div);
    builder.process(&Token::end_tag("div"));
    assert_eq!(builder.current_node(), NodeId::SYNTHETIC_ROOT);
}
