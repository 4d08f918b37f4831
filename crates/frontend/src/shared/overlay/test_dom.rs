//! In-memory document used by the coordinator tests.
//!
//! Supports compound selectors made of a tag, `.class`, `[attr]` and
//! `[attr="value"]` parts, comma-separated groups, bubbling listeners, a
//! manual clock for deferred tasks and observer-style mutation recording.

use super::host::{Handler, HostEvent, OverlayHost, Task};
use super::watcher::MutationBatch;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestNode(usize);

#[derive(Default)]
struct NodeData {
    tag: String,
    parent: Option<usize>,
    children: Vec<usize>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
}

struct Listener {
    node: Option<usize>,
    event: String,
    handler: Rc<RefCell<Handler>>,
}

struct Timer {
    due: u64,
    seq: u64,
    task: Task,
}

struct DomState {
    nodes: Vec<NodeData>,
    root: usize,
    body: usize,
    viewport_width: f64,
    scroll_y: f64,
    listeners: Vec<Listener>,
    dispatched: Vec<(TestNode, String)>,
    now: u64,
    seq: u64,
    timers: Vec<Timer>,
    pending: MutationBatch<TestNode>,
}

#[derive(Clone)]
pub struct TestDom {
    state: Rc<RefCell<DomState>>,
}

fn initial_computed(property: &str) -> &'static str {
    match property {
        "position" => "static",
        "overflow" => "visible",
        "top" | "left" | "right" | "bottom" | "height" | "width" => "auto",
        _ => "",
    }
}

impl TestDom {
    pub fn new(viewport_width: f64) -> Self {
        let root = NodeData {
            tag: "html".to_string(),
            children: vec![1],
            ..NodeData::default()
        };
        let body = NodeData {
            tag: "body".to_string(),
            parent: Some(0),
            ..NodeData::default()
        };
        Self {
            state: Rc::new(RefCell::new(DomState {
                nodes: vec![root, body],
                root: 0,
                body: 1,
                viewport_width,
                scroll_y: 0.0,
                listeners: Vec::new(),
                dispatched: Vec::new(),
                now: 0,
                seq: 0,
                timers: Vec::new(),
                pending: MutationBatch::default(),
            })),
        }
    }

    pub fn body_node(&self) -> TestNode {
        TestNode(self.state.borrow().body)
    }

    pub fn set_viewport(&self, width: f64) {
        self.state.borrow_mut().viewport_width = width;
    }

    pub fn set_scroll(&self, y: f64) {
        self.state.borrow_mut().scroll_y = y;
    }

    /// Detached element, not yet part of any tree.
    pub fn create(&self, tag: &str, classes: &[&str]) -> TestNode {
        let mut state = self.state.borrow_mut();
        state.nodes.push(NodeData {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..NodeData::default()
        });
        TestNode(state.nodes.len() - 1)
    }

    pub fn attach(&self, parent: &TestNode, child: &TestNode) {
        let mut state = self.state.borrow_mut();
        state.nodes[parent.0].children.push(child.0);
        state.nodes[child.0].parent = Some(parent.0);
        if state.is_connected(parent.0) {
            state.pending.added.push(*child);
        }
    }

    pub fn append(&self, parent: &TestNode, tag: &str, classes: &[&str]) -> TestNode {
        let child = self.create(tag, classes);
        self.attach(parent, &child);
        child
    }

    pub fn remove(&self, node: &TestNode) {
        let mut state = self.state.borrow_mut();
        let was_connected = state.is_connected(node.0);
        if let Some(parent) = state.nodes[node.0].parent.take() {
            state.nodes[parent].children.retain(|c| *c != node.0);
        }
        if was_connected {
            state.pending.removed.push(*node);
        }
    }

    /// Everything recorded since the last call, like one observer callback.
    pub fn take_mutations(&self) -> MutationBatch<TestNode> {
        std::mem::take(&mut self.state.borrow_mut().pending)
    }

    pub fn children(&self, node: &TestNode) -> Vec<TestNode> {
        self.state.borrow().nodes[node.0]
            .children
            .iter()
            .map(|c| TestNode(*c))
            .collect()
    }

    pub fn style(&self, node: &TestNode, property: &str) -> Option<String> {
        self.state.borrow().nodes[node.0].styles.get(property).cloned()
    }

    pub fn has_class(&self, node: &TestNode, class: &str) -> bool {
        self.state.borrow().nodes[node.0]
            .classes
            .iter()
            .any(|c| c == class)
    }

    pub fn listener_count(&self, node: &TestNode, event: &str) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.node == Some(node.0) && l.event == event)
            .count()
    }

    pub fn dispatched(&self, event: &str) -> Vec<TestNode> {
        self.state
            .borrow()
            .dispatched
            .iter()
            .filter(|(_, name)| name == event)
            .map(|(node, _)| *node)
            .collect()
    }

    pub fn click(&self, node: &TestNode) {
        self.fire(node, "click");
    }

    pub fn press_key(&self, key: &str) {
        let handlers: Vec<_> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.node.is_none() && l.event == "keydown")
            .map(|l| Rc::clone(&l.handler))
            .collect();
        let event = HostEvent {
            key: Some(key.to_string()),
            on_self: false,
        };
        for handler in handlers {
            (handler.borrow_mut())(&event);
        }
    }

    /// Deliver `event` to listeners on `node` and its ancestors.
    pub fn fire(&self, node: &TestNode, event: &str) {
        let handlers: Vec<_> = {
            let state = self.state.borrow();
            let mut path = vec![node.0];
            let mut current = state.nodes[node.0].parent;
            while let Some(parent) = current {
                path.push(parent);
                current = state.nodes[parent].parent;
            }
            path.iter()
                .flat_map(|id| {
                    state
                        .listeners
                        .iter()
                        .filter(move |l| l.node == Some(*id) && l.event == event)
                        .map(move |l| (Rc::clone(&l.handler), *id == node.0))
                })
                .collect()
        };
        for (handler, on_self) in handlers {
            (handler.borrow_mut())(&HostEvent { key: None, on_self });
        }
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Move the clock forward, running due tasks in order.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now + ms;
        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let timer = state.timers.remove(index);
                        state.now = timer.due;
                        timer.task
                    }
                    None => break,
                }
            };
            task();
        }
        self.state.borrow_mut().now = target;
    }
}

impl DomState {
    fn is_connected(&self, mut id: usize) -> bool {
        loop {
            if id == self.root {
                return true;
            }
            match self.nodes[id].parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn descendants(&self, id: usize, out: &mut Vec<usize>) {
        for child in &self.nodes[id].children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn attribute(&self, id: usize, name: &str) -> Option<String> {
        let node = &self.nodes[id];
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn matches(&self, id: usize, selector: &str) -> bool {
        selector
            .split(',')
            .any(|compound| self.matches_compound(id, compound.trim()))
    }

    fn matches_compound(&self, id: usize, selector: &str) -> bool {
        let node = &self.nodes[id];
        let tag_end = selector.find(['.', '[']).unwrap_or(selector.len());
        let tag = &selector[..tag_end];
        if !tag.is_empty() && tag != "*" && tag != node.tag {
            return false;
        }

        let mut rest = &selector[tag_end..];
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                if !node.classes.iter().any(|c| c == &after[..end]) {
                    return false;
                }
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').expect("unterminated attribute selector");
                let matched = match after[..end].split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim_matches(|c| c == '"' || c == '\'');
                        self.attribute(id, name).as_deref() == Some(value)
                    }
                    None => self.attribute(id, &after[..end]).is_some(),
                };
                if !matched {
                    return false;
                }
                rest = &after[end + 1..];
            } else {
                panic!("unsupported selector `{selector}`");
            }
        }
        true
    }
}

impl OverlayHost for TestDom {
    type Node = TestNode;

    fn body(&self) -> Option<TestNode> {
        Some(self.body_node())
    }

    fn document_root(&self) -> Option<TestNode> {
        Some(TestNode(self.state.borrow().root))
    }

    fn parent(&self, node: &TestNode) -> Option<TestNode> {
        self.state.borrow().nodes[node.0].parent.map(TestNode)
    }

    fn matches(&self, node: &TestNode, selector: &str) -> bool {
        self.state.borrow().matches(node.0, selector)
    }

    fn query(&self, scope: &TestNode, selector: &str) -> Option<TestNode> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn query_all(&self, scope: &TestNode, selector: &str) -> Vec<TestNode> {
        let state = self.state.borrow();
        let mut ids = Vec::new();
        state.descendants(scope.0, &mut ids);
        ids.into_iter()
            .filter(|id| state.matches(*id, selector))
            .map(TestNode)
            .collect()
    }

    fn attribute(&self, node: &TestNode, name: &str) -> Option<String> {
        self.state.borrow().attribute(node.0, name)
    }

    fn set_attribute(&self, node: &TestNode, name: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, node: &TestNode, name: &str) {
        self.state.borrow_mut().nodes[node.0].attributes.remove(name);
    }

    fn add_class(&self, node: &TestNode, class: &str) {
        let mut state = self.state.borrow_mut();
        let classes = &mut state.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &TestNode, class: &str) {
        self.state.borrow_mut().nodes[node.0]
            .classes
            .retain(|c| c != class);
    }

    fn set_style(&self, node: &TestNode, property: &str, value: &str) {
        self.state.borrow_mut().nodes[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn computed_style(&self, node: &TestNode, property: &str) -> String {
        self.style(node, property)
            .unwrap_or_else(|| initial_computed(property).to_string())
    }

    fn prepend_element(&self, parent: &TestNode, class: &str) -> Option<TestNode> {
        let child = self.create("div", &[class]);
        let mut state = self.state.borrow_mut();
        state.nodes[parent.0].children.insert(0, child.0);
        state.nodes[child.0].parent = Some(parent.0);
        if state.is_connected(parent.0) {
            state.pending.added.push(child);
        }
        Some(child)
    }

    fn viewport_width(&self) -> f64 {
        self.state.borrow().viewport_width
    }

    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn scroll_to(&self, y: f64) {
        self.set_scroll(y);
    }

    fn listen(&self, node: &TestNode, event: &str, handler: Handler) {
        self.state.borrow_mut().listeners.push(Listener {
            node: Some(node.0),
            event: event.to_string(),
            handler: Rc::new(RefCell::new(handler)),
        });
    }

    fn listen_document(&self, event: &str, handler: Handler) {
        self.state.borrow_mut().listeners.push(Listener {
            node: None,
            event: event.to_string(),
            handler: Rc::new(RefCell::new(handler)),
        });
    }

    fn release_document_listeners(&self) {
        self.state.borrow_mut().listeners.retain(|l| l.node.is_some());
    }

    fn dispatch(&self, node: &TestNode, event: &str) {
        self.state
            .borrow_mut()
            .dispatched
            .push((*node, event.to_string()));
        self.fire(node, event);
    }

    fn defer(&self, delay_ms: u32, task: Task) {
        let mut state = self.state.borrow_mut();
        state.seq += 1;
        let timer = Timer {
            due: state.now + u64::from(delay_ms),
            seq: state.seq,
            task,
        };
        state.timers.push(timer);
    }
}
