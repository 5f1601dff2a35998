//! Canvas document and observable document state.

use crate::error::{EditorError, EditorResult};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Default z-index for blocks that omit it.
fn default_z_index() -> i64 {
    1
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The container as a rectangle anchored at the canvas origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, Size::new(self.width, self.height))
    }
}

/// A positioned, typed element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Component type identifier, resolved through the component registry.
    pub key: String,
    pub top: f64,
    pub left: f64,
    #[serde(default = "default_z_index")]
    pub z_index: i64,
    /// Rendered width, zero until the block has been measured.
    #[serde(default)]
    pub width: f64,
    /// Rendered height, zero until the block has been measured.
    #[serde(default)]
    pub height: f64,
    /// Transient selection flag.
    #[serde(default)]
    pub focus: bool,
    /// One-shot flag: recentre on the drop point at first layout.
    #[serde(default)]
    pub align_center: bool,
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
    /// Logical slot name to form field name.
    #[serde(default)]
    pub model: BTreeMap<String, String>,
}

impl Block {
    /// Create an unmeasured, unfocused block.
    pub fn new(key: impl Into<String>, top: f64, left: f64) -> Self {
        Self {
            key: key.into(),
            top,
            left,
            z_index: default_z_index(),
            width: 0.0,
            height: 0.0,
            focus: false,
            align_center: false,
            props: BTreeMap::new(),
            model: BTreeMap::new(),
        }
    }

    /// Builder-style size setter.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style z-index setter.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    /// Builder-style focus setter.
    pub fn focused(mut self) -> Self {
        self.focus = true;
        self
    }

    /// Top-left corner in container coordinates.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Bounding box in container coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), Size::new(self.width, self.height))
    }
}

/// The canonical editor state: a container plus an ordered sequence of blocks.
///
/// Values are never mutated once published; every change produces a new
/// document so that history snapshots stay valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub container: Container,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document with the given container.
    pub fn new(container: Container) -> Self {
        Self {
            container,
            blocks: Vec::new(),
        }
    }

    /// Replace the block sequence, keeping the container.
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            container: self.container,
            blocks,
        }
    }

    /// Replace the container, keeping the blocks.
    pub fn with_container(&self, container: Container) -> Self {
        Self {
            container,
            blocks: self.blocks.clone(),
        }
    }

    /// Get a block by index.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks sorted by paint order (z-index, sequence order breaks ties).
    pub fn blocks_painted(&self) -> Vec<&Block> {
        let mut ordered: Vec<&Block> = self.blocks.iter().collect();
        ordered.sort_by_key(|block| block.z_index);
        ordered
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the document to indented JSON.
    pub fn to_json_pretty(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::MalformedImport(e.to_string()))
    }
}

/// Identifier returned by [`DocumentModel::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(&Rc<Document>)>;

struct ModelInner {
    current: Rc<Document>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

/// Observable holder of the current document.
///
/// Cloning the model clones the handle, not the state. Readers get the
/// published `Rc<Document>` and must treat it as immutable.
#[derive(Clone)]
pub struct DocumentModel {
    inner: Rc<RefCell<ModelInner>>,
}

impl fmt::Debug for DocumentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DocumentModel")
            .field("current", &inner.current)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl DocumentModel {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ModelInner {
                current: Rc::new(document),
                observers: Vec::new(),
                next_observer: 0,
            })),
        }
    }

    /// The currently published document.
    pub fn current(&self) -> Rc<Document> {
        Rc::clone(&self.inner.borrow().current)
    }

    /// Install a complete replacement document and notify observers.
    pub(crate) fn publish(&self, document: impl Into<Rc<Document>>) {
        let document = document.into();
        let observers: Vec<Observer> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = Rc::clone(&document);
            inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect()
        };
        for observer in observers {
            observer(&document);
        }
    }

    /// Register a callback invoked after every publish.
    pub fn observe(&self, observer: impl Fn(&Rc<Document>) + 'static) -> ObserverId {
        let mut inner = self.inner.borrow_mut();
        let id = ObserverId(inner.next_observer);
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unobserve(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.observers.len();
        inner.observers.retain(|(oid, _)| *oid != id);
        inner.observers.len() != before
    }
}
