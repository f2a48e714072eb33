//! Scene graph abstraction and an in-memory SVG implementation.
//!
//! The binder, tick handler and gesture controllers only talk to the
//! [`Scene`] and [`RenderedElement`] traits. [`SvgScene`] is the arena-backed
//! implementation used by the CLI and the tests; a browser host would provide
//! its own implementation over DOM nodes.

use std::fmt::Write as _;

/// Handle to an element inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Attribute and content writes on a single scene element.
pub trait RenderedElement {
    /// Element tag name (e.g. `path`, `foreignObject`)
    fn tag(&self) -> &str;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: String);

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Replace the element's inner HTML.
    fn set_html(&mut self, html: &str);

    fn html(&self) -> Option<&str>;
}

/// A tree of rendered elements under a single root.
pub trait Scene {
    type Element: RenderedElement;

    /// The scene root (the `<svg>` element)
    fn root(&self) -> ElementId;

    /// Create a new element of `tag` as the last child of `parent`.
    fn append(&mut self, parent: ElementId, tag: &str) -> ElementId;

    fn element(&self, id: ElementId) -> Option<&Self::Element>;

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Self::Element>;

    fn children(&self, id: ElementId) -> &[ElementId];

    /// Groups that are direct children of the root (`svg > g`).
    fn top_level_groups(&self) -> Vec<ElementId> {
        self.children(self.root())
            .iter()
            .copied()
            .filter(|id| self.element(*id).is_some_and(|el| el.tag() == "g"))
            .collect()
    }

    /// Set an attribute on the root element.
    fn set_root_attribute(&mut self, name: &str, value: String) {
        let root = self.root();
        if let Some(el) = self.element_mut(root) {
            el.set_attribute(name, value);
        }
    }
}

/// An element stored in an [`SvgScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    tag: String,
    attributes: Vec<(String, String)>,
    html: Option<String>,
    children: Vec<ElementId>,
}

impl SvgElement {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            html: None,
            children: Vec::new(),
        }
    }

    /// Attributes in first-write order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

impl RenderedElement for SvgElement {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_html(&mut self, html: &str) {
        self.html = Some(html.to_string());
    }

    fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }
}

/// Arena-backed SVG scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgScene {
    elements: Vec<SvgElement>,
}

impl SvgScene {
    /// Create a scene containing only the `<svg>` root.
    pub fn new() -> Self {
        let mut root = SvgElement::new("svg");
        root.set_attribute("xmlns", "http://www.w3.org/2000/svg".to_string());
        Self {
            elements: vec![root],
        }
    }

    /// Create a scene whose first child is a `<style>` element.
    pub fn with_stylesheet(css: &str) -> Self {
        let mut scene = Self::new();
        let style = scene.append(scene.root(), "style");
        if let Some(el) = scene.element_mut(style) {
            el.set_html(css);
        }
        scene
    }

    /// Number of elements, root included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the whole tree as SVG markup.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_element(&mut out, self.root());
        out
    }

    fn write_element(&self, out: &mut String, id: ElementId) {
        let Some(el) = self.elements.get(id.0) else {
            return;
        };

        let _ = write!(out, "<{}", el.tag);
        for (name, value) in &el.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
        }

        if el.children.is_empty() && el.html.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(html) = &el.html {
            out.push_str(html);
        }
        for child in &el.children {
            self.write_element(out, *child);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

impl Default for SvgScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SvgScene {
    type Element = SvgElement;

    fn root(&self) -> ElementId {
        ElementId(0)
    }

    fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(SvgElement::new(tag));
        match self.elements.get_mut(parent.0) {
            Some(p) => p.children.push(id),
            None => {
                debug_assert!(false, "append to unknown parent {:?}", parent);
                self.elements[0].children.push(id);
            }
        }
        id
    }

    fn element(&self, id: ElementId) -> Option<&SvgElement> {
        self.elements.get(id.0)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut SvgElement> {
        self.elements.get_mut(id.0)
    }

    fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(id.0)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
