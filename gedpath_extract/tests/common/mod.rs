#![allow(dead_code)]

use std::sync::Once;

use gedpath_common::{AttrMap, AttributedGraph};

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One attribute, or none when `value` is empty.
pub fn single(key: &str, value: &str) -> AttrMap {
    if value.is_empty() {
        AttrMap::new()
    } else {
        AttrMap::from([(key.to_string(), value.to_string())])
    }
}

/// Graph whose nodes carry a `color` and whose edges carry a `weight`.
pub fn colored_graph(colors: &[&str], edges: &[(usize, usize, &str)]) -> AttributedGraph {
    let mut g = AttributedGraph::new();
    for color in colors {
        g.add_node(single("color", color));
    }
    for &(a, b, weight) in edges {
        g.add_edge(a, b, single("weight", weight))
            .expect("test edge must be valid");
    }
    g
}
