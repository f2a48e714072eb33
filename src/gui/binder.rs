//! Binding of mind-map records to scene elements.
//!
//! Each bound element carries the id of the record it renders. Attribute
//! writes are computed from that id, so a selection can be re-applied after
//! the records change without rebuilding the scene.

use super::scene::{ElementId, RenderedElement, Scene};
use super::theme::class;
use crate::models::{ConnectionId, MindMap, NodeId};

/// A scene element paired with the record it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound<D> {
    pub element: ElementId,
    pub datum: D,
}

/// An ordered set of bound elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<D> {
    bound: Vec<Bound<D>>,
}

impl<D: Copy> Selection<D> {
    pub fn new(bound: Vec<Bound<D>>) -> Self {
        Self { bound }
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bound<D>> {
        self.bound.iter()
    }

    /// The bound records, in element order
    pub fn data(&self) -> impl Iterator<Item = D> + '_ {
        self.bound.iter().map(|b| b.datum)
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.bound.iter().map(|b| b.element)
    }

    /// Set `name` on every element to `value(datum)`.
    pub fn attr<S, F>(&self, scene: &mut S, name: &str, value: F) -> &Self
    where
        S: Scene,
        F: Fn(D) -> String,
    {
        self.attr_with(scene, name, |d| Some(value(d)))
    }

    /// Like [`Selection::attr`], leaving elements untouched where `value` is `None`.
    pub fn attr_with<S, F>(&self, scene: &mut S, name: &str, value: F) -> &Self
    where
        S: Scene,
        F: Fn(D) -> Option<String>,
    {
        for b in &self.bound {
            let Some(v) = value(b.datum) else {
                continue;
            };
            if let Some(el) = scene.element_mut(b.element) {
                el.set_attribute(name, v);
            }
        }
        self
    }

    /// Set the inner HTML of every element to `value(datum)`.
    pub fn html<S, F>(&self, scene: &mut S, value: F) -> &Self
    where
        S: Scene,
        F: Fn(D) -> String,
    {
        for b in &self.bound {
            if let Some(el) = scene.element_mut(b.element) {
                el.set_html(&value(b.datum));
            }
        }
        self
    }
}

/// Create a group under the root, then one `tag` element per datum.
pub fn bind_data<S, D, I>(scene: &mut S, data: I, tag: &str) -> Selection<D>
where
    S: Scene,
    D: Copy,
    I: IntoIterator<Item = D>,
{
    let group = scene.append(scene.root(), "g");
    append_all(scene, group, data, tag)
}

fn append_all<S, D, I>(scene: &mut S, parent: ElementId, data: I, tag: &str) -> Selection<D>
where
    S: Scene,
    D: Copy,
    I: IntoIterator<Item = D>,
{
    let bound = data
        .into_iter()
        .map(|datum| Bound {
            element: scene.append(parent, tag),
            datum,
        })
        .collect();
    Selection::new(bound)
}

/// Bind every connection of `graph` to a `path` element.
pub fn bind_connections<S: Scene>(scene: &mut S, graph: &MindMap) -> Selection<ConnectionId> {
    let selection = bind_data(scene, graph.connection_ids(), "path");
    selection.attr(scene, "class", |_| class::CONNECTION.to_string());
    selection
}

/// Primary and subnodes elements, index-aligned with the node store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSelections {
    pub nodes: Selection<NodeId>,
    pub subnodes: Selection<NodeId>,
}

/// Bind every node of `graph` to a pair of `foreignObject` elements.
///
/// Both sets share one group. All primary boxes are appended before the
/// subnodes boxes, so subnodes paint on top.
pub fn bind_nodes<S: Scene>(scene: &mut S, graph: &MindMap) -> NodeSelections {
    let group = scene.append(scene.root(), "g");

    let nodes = append_all(scene, group, graph.node_ids(), "foreignObject");
    nodes
        .attr(scene, "class", |_| class::NODE.to_string())
        .attr_with(scene, "width", |id| {
            graph.node(id).map(|n| (n.width + 4.0).to_string())
        })
        .attr_with(scene, "height", |id| {
            graph.node(id).map(|n| n.height.to_string())
        })
        .html(scene, |id| {
            graph.node(id).map(|n| n.html.clone()).unwrap_or_default()
        });

    let subnodes = append_all(scene, group, graph.node_ids(), "foreignObject");
    subnodes
        .attr(scene, "class", |_| class::SUBNODES.to_string())
        .attr_with(scene, "width", |id| {
            graph.node(id).map(|n| (n.nodes_width + 4.0).to_string())
        })
        .attr_with(scene, "height", |id| {
            graph.node(id).map(|n| n.nodes_height.to_string())
        })
        .html(scene, |id| {
            graph
                .node(id)
                .map(|n| n.nodes_html.clone())
                .unwrap_or_default()
        });

    NodeSelections { nodes, subnodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::scene::SvgScene;
    use crate::models::{Connection, Node};

    fn sample_map() -> MindMap {
        let mut map = MindMap::new();
        let a = map.add_node(
            Node::new("a")
                .with_label("<p>A</p>", 40.0, 20.0)
                .with_subnodes("<ul><li>a1</li></ul>", 30.0, 12.0),
        );
        let b = map.add_node(Node::new("b").with_label("<p>B</p>", 50.0, 22.0));
        map.connect(Connection::new(a, b)).unwrap();
        map
    }

    #[test]
    fn test_bind_data_creates_group_and_children() {
        let mut scene = SvgScene::new();
        let sel = bind_data(&mut scene, [1u8, 2, 3], "circle");
        assert_eq!(sel.len(), 3);
        assert_eq!(scene.top_level_groups().len(), 1);
        let group = scene.top_level_groups()[0];
        assert_eq!(scene.children(group), sel.elements().collect::<Vec<_>>());
        assert_eq!(sel.data().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_bind_data_empty() {
        let mut scene = SvgScene::new();
        let sel = bind_data(&mut scene, Vec::<NodeId>::new(), "path");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_bind_connections_sets_class() {
        let map = sample_map();
        let mut scene = SvgScene::new();
        let conns = bind_connections(&mut scene, &map);
        assert_eq!(conns.len(), 1);
        let el = scene.element(conns.elements().next().unwrap()).unwrap();
        assert_eq!(el.tag(), "path");
        assert_eq!(el.attribute("class"), Some("mindmap-connection"));
    }

    #[test]
    fn test_bind_nodes_counts_and_alignment() {
        let map = sample_map();
        let mut scene = SvgScene::new();
        let bound = bind_nodes(&mut scene, &map);
        assert_eq!(bound.nodes.len(), map.nodes.len());
        assert_eq!(bound.subnodes.len(), map.nodes.len());
        let ids: Vec<_> = map.node_ids().collect();
        assert_eq!(bound.nodes.data().collect::<Vec<_>>(), ids);
        assert_eq!(bound.subnodes.data().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_bind_nodes_sizes_and_html() {
        let map = sample_map();
        let mut scene = SvgScene::new();
        let bound = bind_nodes(&mut scene, &map);

        let first = scene.element(bound.nodes.elements().next().unwrap()).unwrap();
        assert_eq!(first.attribute("class"), Some("mindmap-node"));
        assert_eq!(first.attribute("width"), Some("44"));
        assert_eq!(first.attribute("height"), Some("20"));
        assert_eq!(first.html(), Some("<p>A</p>"));

        let sub = scene
            .element(bound.subnodes.elements().next().unwrap())
            .unwrap();
        assert_eq!(sub.attribute("class"), Some("mindmap-subnodes"));
        assert_eq!(sub.attribute("width"), Some("34"));
        assert_eq!(sub.attribute("height"), Some("12"));
        assert_eq!(sub.html(), Some("<ul><li>a1</li></ul>"));
    }

    #[test]
    fn test_bind_nodes_paint_order() {
        let map = sample_map();
        let mut scene = SvgScene::new();
        let bound = bind_nodes(&mut scene, &map);
        let group = scene.top_level_groups()[0];
        let mut expected: Vec<_> = bound.nodes.elements().collect();
        expected.extend(bound.subnodes.elements());
        assert_eq!(scene.children(group), expected);
    }

    #[test]
    fn test_html_passed_verbatim() {
        let mut map = MindMap::new();
        map.add_node(Node::new("x").with_label("<p>unclosed", 1.0, 1.0));
        let mut scene = SvgScene::new();
        let bound = bind_nodes(&mut scene, &map);
        let el = scene.element(bound.nodes.elements().next().unwrap()).unwrap();
        assert_eq!(el.html(), Some("<p>unclosed"));
    }
}
