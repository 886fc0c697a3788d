//! Graph collections stored as JSON files.
//!
//! A dataset is a directory holding one JSON file per graph plus a collection
//! descriptor listing them:
//!
//! ```json
//! {"graphs": [{"file": "g0.json", "class": "active"}, {"file": "g1.json"}]}
//! ```
//!
//! Graph files list nodes with an `id` and an `attrs` object, and edges by the
//! `id`s of their endpoints. Node indices follow the order of the `nodes`
//! array. Scalar attribute values are stringified; `null` is dropped. Keys and
//! values must not contain `=` or `;`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use gedpath_common::label::first_unencodable;
use gedpath_common::{AttrMap, AttributedGraph};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::DriverError;

/// One entry of a collection descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEntry {
    /// Graph file, relative to the dataset directory
    pub file: PathBuf,
    /// Optional class label of the graph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// Ordered list of graphs making up a dataset. Graph `i` is `graphs[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Graph entries in index order
    pub graphs: Vec<GraphEntry>,
}

impl Collection {
    /// Read a collection descriptor.
    pub fn from_path(path: &Path) -> Result<Self, DriverError> {
        let file = File::open(path).map_err(|e| DriverError::read(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| DriverError::parse(path, e))
    }

    /// Number of graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns true if the collection lists no graphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: Value,
    #[serde(default)]
    attrs: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: Value,
    target: Value,
    #[serde(default)]
    attrs: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

/// Stringify a scalar JSON value. `None` for values that carry no attribute.
fn scalar_text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Bool(b) => Some(Some(b.to_string())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn attr_map(path: &Path, attrs: &Map<String, Value>) -> Result<AttrMap, DriverError> {
    let mut map = AttrMap::new();
    for (key, value) in attrs {
        let text = scalar_text(value).ok_or_else(|| DriverError::UnsupportedAttribute {
            path: path.to_path_buf(),
            key: key.clone(),
        })?;
        if let Some(text) = text {
            map.insert(key.clone(), text);
        }
    }
    if let Some(key) = first_unencodable(&map) {
        return Err(DriverError::UnencodableAttribute {
            path: path.to_path_buf(),
            key: key.to_owned(),
        });
    }
    Ok(map)
}

fn node_id(path: &Path, id: &Value) -> Result<String, DriverError> {
    match scalar_text(id) {
        Some(Some(text)) => Ok(text),
        _ => Err(DriverError::UnknownNodeId {
            path: path.to_path_buf(),
            id: id.to_string(),
        }),
    }
}

/// Parse a graph document. `path` is only used in error messages.
pub fn parse_graph<R: Read>(reader: R, path: &Path) -> Result<AttributedGraph, DriverError> {
    let document: GraphDocument =
        serde_json::from_reader(reader).map_err(|e| DriverError::parse(path, e))?;

    let mut graph = AttributedGraph::new();
    let mut index_of: HashMap<String, usize> = HashMap::with_capacity(document.nodes.len());
    for node in &document.nodes {
        let id = node_id(path, &node.id)?;
        let index = graph.add_node(attr_map(path, &node.attrs)?);
        if index_of.insert(id.clone(), index).is_some() {
            return Err(DriverError::DuplicateNodeId {
                path: path.to_path_buf(),
                id,
            });
        }
    }

    for edge in &document.edges {
        let mut endpoints = [0usize; 2];
        for (slot, end) in endpoints.iter_mut().zip([&edge.source, &edge.target]) {
            let id = node_id(path, end)?;
            *slot = *index_of.get(&id).ok_or_else(|| DriverError::UnknownNodeId {
                path: path.to_path_buf(),
                id,
            })?;
        }
        graph
            .add_edge(endpoints[0], endpoints[1], attr_map(path, &edge.attrs)?)
            .map_err(|source| DriverError::Graph {
                path: path.to_path_buf(),
                source,
            })?;
    }

    Ok(graph)
}

/// Caches loaded graphs by absolute path.
#[derive(Debug, Clone)]
pub struct Driver {
    registry: Arc<RwLock<HashMap<PathBuf, Arc<AttributedGraph>>>>,
    root_path: PathBuf,
}

impl Driver {
    /// Create a driver resolving relative paths against `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, DriverError> {
        let root = root.as_ref();
        Ok(Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
            root_path: std::fs::canonicalize(root).map_err(|e| DriverError::read(root, e))?,
        })
    }

    /// Canonical dataset directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root_path
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_path.join(path)
        }
    }

    /// Get a graph from the registry, loading it if necessary.
    pub fn get_or_load_graph<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Arc<AttributedGraph>, DriverError> {
        let absolute_path = self.resolve(path.as_ref());

        if let Some(graph) = self.get_graph(&absolute_path) {
            return Ok(graph);
        }

        let file = File::open(&absolute_path).map_err(|e| DriverError::read(&absolute_path, e))?;
        let graph = Arc::new(parse_graph(BufReader::new(file), &absolute_path)?);
        debug!(
            "loaded {} ({} nodes, {} edges)",
            absolute_path.display(),
            graph.num_nodes(),
            graph.num_edges()
        );

        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(registry
            .entry(absolute_path)
            .or_insert(graph)
            .clone())
    }

    /// Get a graph from the registry (returns None if not loaded)
    pub fn get_graph(&self, path: &Path) -> Option<Arc<AttributedGraph>> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.get(&self.resolve(path)).cloned()
    }

    /// Number of graphs currently cached.
    pub fn loaded_len(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A collection together with the driver that loads its graphs.
#[derive(Debug, Clone)]
pub struct Dataset {
    driver: Driver,
    collection: Collection,
}

impl Dataset {
    /// Open `collection` (a descriptor path, relative to `dataset_dir` unless absolute).
    pub fn open<P: AsRef<Path>, C: AsRef<Path>>(
        dataset_dir: P,
        collection: C,
    ) -> Result<Self, DriverError> {
        let driver = Driver::new(dataset_dir)?;
        let descriptor = driver.resolve(collection.as_ref());
        let collection = Collection::from_path(&descriptor)?;
        info!(
            "opened collection {} with {} graphs",
            descriptor.display(),
            collection.len()
        );
        Ok(Self { driver, collection })
    }

    /// Wrap an already parsed collection.
    #[must_use]
    pub const fn with_collection(driver: Driver, collection: Collection) -> Self {
        Self { driver, collection }
    }

    /// Number of graphs in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Returns true if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// The collection descriptor.
    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    /// The driver caching the graphs.
    #[must_use]
    pub const fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Check that `index` names a graph of the collection.
    #[contracts::debug_ensures(ret.is_ok() == (index < self.len()))]
    pub fn check_index(&self, index: usize) -> Result<(), DriverError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(DriverError::index_out_of_range(index, self.len()))
        }
    }

    /// Graph `index` of the collection.
    pub fn graph(&self, index: usize) -> Result<Arc<AttributedGraph>, DriverError> {
        self.check_index(index)?;
        self.driver
            .get_or_load_graph(&self.collection.graphs[index].file)
    }
}
