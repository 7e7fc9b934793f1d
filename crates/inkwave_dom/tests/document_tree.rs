//! Integration tests for the headless document

use inkwave_core::events::event_types;
use inkwave_core::Rect;
use inkwave_dom::{Document, DomError, InlineStyle};

/// body > card > (header > title, action)
fn card_document() -> (Document, [inkwave_core::NodeId; 4]) {
    let mut doc = Document::new();
    let card = doc.create_element("section");
    let header = doc.create_element("header");
    let title = doc.create_element("h2");
    let action = doc.create_element("button");

    doc.append_child(doc.root(), card).unwrap();
    doc.append_child(card, header).unwrap();
    doc.append_child(header, title).unwrap();
    doc.append_child(card, action).unwrap();
    (doc, [card, header, title, action])
}

#[test]
fn test_ancestor_walk_reaches_root() {
    let (doc, [card, header, title, _]) = card_document();

    let chain: Vec<_> = doc.ancestors(title).collect();
    assert_eq!(chain, vec![title, header, card, doc.root()]);
    assert!(doc.is_connected(title));
}

#[test]
fn test_unmount_drops_subtree_and_disconnects() {
    let (mut doc, [card, header, title, action]) = card_document();
    let before = doc.len();

    doc.remove_node(header).unwrap();

    assert_eq!(doc.len(), before - 2);
    assert!(!doc.contains(header));
    assert!(!doc.contains(title));
    assert_eq!(doc.children(card), &[action]);
    assert!(doc.ancestors(title).next().is_none());
}

#[test]
fn test_detached_node_is_not_connected() {
    let (mut doc, [card, header, title, _]) = card_document();

    doc.detach(header).unwrap();

    assert!(doc.contains(title));
    assert!(!doc.is_connected(title));
    assert!(!doc.children(card).contains(&header));
    assert_eq!(doc.parent(header), None);
}

#[test]
fn test_prepend_and_move() {
    let (mut doc, [card, header, _, action]) = card_document();

    doc.prepend_child(card, action).unwrap();
    assert_eq!(doc.children(card), &[action, header]);

    doc.append_child(header, action).unwrap();
    assert_eq!(doc.children(card), &[header]);
    assert_eq!(doc.parent(action), Some(header));
}

#[test]
fn test_structural_errors() {
    let (mut doc, [card, header, title, action]) = card_document();

    assert!(matches!(
        doc.remove_child(card, title),
        Err(DomError::NotAChild { .. })
    ));
    assert!(matches!(
        doc.append_child(title, card),
        Err(DomError::HierarchyCycle { .. })
    ));
    assert!(matches!(doc.detach(doc.root()), Err(DomError::RootDetach)));
    assert!(matches!(
        doc.insert_before(card, title, Some(action)),
        Ok(())
    ));
    assert_eq!(doc.children(card), &[header, title, action]);

    doc.remove_node(action).unwrap();
    assert!(matches!(
        doc.set_attribute(action, "role", "button"),
        Err(DomError::NodeNotFound(_))
    ));
}

#[test]
fn test_attributes_classes_and_style() {
    let (mut doc, [_, _, _, action]) = card_document();

    doc.set_attribute(action, "data-ink-target", "").unwrap();
    assert!(doc.has_attribute(action, "data-ink-target"));
    assert_eq!(
        doc.remove_attribute(action, "data-ink-target").unwrap(),
        Some(String::new())
    );

    doc.add_class(action, "ink").unwrap();
    doc.add_class(action, "active").unwrap();
    doc.add_class(action, "ink").unwrap();
    assert_eq!(doc.get(action).unwrap().class_name(), "ink active");

    doc.set_frame(action, Rect::new(10.0, 20.0, 80.0, 30.0)).unwrap();
    doc.set_style(action, InlineStyle::from_rect(Rect::new(-5.0, 0.0, 90.0, 90.0)))
        .unwrap();
    assert_eq!(doc.frame(action), Some(Rect::new(10.0, 20.0, 80.0, 30.0)));
    assert_eq!(
        doc.style(action).unwrap().to_css(),
        "left:-5px;top:0px;width:90px;height:90px"
    );
}

#[test]
fn test_listener_registry() {
    let mut doc = Document::new();
    let id = doc
        .listeners_mut()
        .subscribe(&[event_types::POINTER_DOWN, event_types::KEY_UP]);

    assert_eq!(doc.listeners().len(), 1);
    assert!(doc.listeners().is_subscribed(event_types::KEY_UP));
    assert!(!doc.listeners().is_subscribed(event_types::TOUCH_START));

    assert!(doc.listeners_mut().unsubscribe(id));
    assert!(!doc.listeners_mut().unsubscribe(id));
    assert!(doc.listeners().is_empty());
}
