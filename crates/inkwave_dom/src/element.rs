//! Element nodes and inline styles

use inkwave_core::{NodeId, Rect};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Write;

/// Inline pixel styles set directly on an element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InlineStyle {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl InlineStyle {
    /// Position and size taken from a rect
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            left: Some(rect.x()),
            top: Some(rect.y()),
            width: Some(rect.width()),
            height: Some(rect.height()),
        }
    }

    /// Render as CSS declarations, e.g. `left:1px;top:2px;width:3px;height:4px`
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        let props = [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ];
        for (name, value) in props {
            if let Some(value) = value {
                if !css.is_empty() {
                    css.push(';');
                }
                let _ = write!(css, "{name}:{value}px");
            }
        }
        css
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// A node in the element tree
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: FxHashMap<String, String>,
    pub(crate) classes: SmallVec<[String; 2]>,
    pub(crate) style: InlineStyle,
    /// Page-space frame assigned by the host
    pub(crate) frame: Rect,
}

impl Element {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            parent: None,
            children: Vec::new(),
            attributes: FxHashMap::default(),
            classes: SmallVec::new(),
            style: InlineStyle::default(),
            frame: Rect::ZERO,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Space-separated class list
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_text() {
        let style = InlineStyle::from_rect(Rect::new(-20.5, 4.0, 141.0, 141.0));
        assert_eq!(style.to_css(), "left:-20.5px;top:4px;width:141px;height:141px");
    }

    #[test]
    fn test_css_skips_unset() {
        let style = InlineStyle {
            width: Some(10.0),
            ..Default::default()
        };
        assert_eq!(style.to_css(), "width:10px");
        assert!(InlineStyle::default().is_empty());
    }
}
