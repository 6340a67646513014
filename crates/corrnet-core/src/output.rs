//! JSON serialisation of a finished network build.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::config::{Network, NetworkConfig, NetworkResult};
use crate::error::Result;
use crate::graph::network_graph::NetworkGraph;

/// Build the NetworkResult envelope around a finished network.
pub fn build_result(
    config: &NetworkConfig,
    network: Network,
    row_count: usize,
    unparsable_rows: usize,
    timings: &HashMap<String, f64>,
    total_ms: f64,
) -> NetworkResult {
    let graph = NetworkGraph::from_network(&network);
    let largest_group = network
        .groups
        .iter()
        .map(|g| g.members.len())
        .max()
        .unwrap_or(0);

    // Build metadata
    let mut metadata = HashMap::new();
    metadata.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata.insert(
        "corrnet_version".to_string(),
        serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );
    metadata.insert("threshold".to_string(), serde_json::json!(config.threshold));
    metadata.insert(
        "label_format".to_string(),
        serde_json::Value::String(config.label_format.as_str().to_string()),
    );
    metadata.insert(
        "source".to_string(),
        config
            .input_path
            .as_ref()
            .map(|p| serde_json::Value::String(p.clone()))
            .unwrap_or(serde_json::Value::Null),
    );
    metadata.insert(
        "duration_ms".to_string(),
        serde_json::json!(((total_ms * 10.0).round() / 10.0)),
    );
    metadata.insert(
        "phase_timings".to_string(),
        serde_json::to_value(timings).unwrap_or_default(),
    );

    // Build stats
    let mut stats = HashMap::new();
    stats.insert("rows".to_string(), serde_json::json!(row_count));
    stats.insert(
        "unparsable_rows".to_string(),
        serde_json::json!(unparsable_rows),
    );
    stats.insert("nodes".to_string(), serde_json::json!(network.nodes.len()));
    stats.insert("links".to_string(), serde_json::json!(network.links.len()));
    stats.insert("groups".to_string(), serde_json::json!(network.groups.len()));
    stats.insert(
        "isolated_nodes".to_string(),
        serde_json::json!(network.isolated_count()),
    );
    stats.insert("largest_group".to_string(), serde_json::json!(largest_group));
    stats.insert(
        "components".to_string(),
        serde_json::json!(graph.component_count()),
    );

    NetworkResult {
        metadata,
        stats,
        nodes: network.nodes,
        links: network.links,
        groups: network.groups,
        ..Default::default()
    }
}

fn write_json<T: Serialize>(value: &T, output_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

/// Write the full result envelope as pretty JSON.
pub fn write_output(result: &NetworkResult, output_path: &str) -> Result<()> {
    write_json(result, output_path)
}

/// Write only the `{nodes, links}` graph a renderer consumes.
pub fn write_graph(result: &NetworkResult, output_path: &str) -> Result<()> {
    write_json(&result.graph(), output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Group, Link, Node};

    fn sample_network() -> Network {
        let mut a = Node::new("a", 0);
        a.color = Some("#f08080".to_string());
        a.group = Some("cluster0".to_string());
        let mut b = Node::new("b", 1);
        b.color = Some("#a0f0a0".to_string());
        b.group = Some("cluster0".to_string());
        Network {
            nodes: vec![a, b, Node::new("c", 2)],
            links: vec![Link {
                source: 0,
                target: 1,
            }],
            groups: vec![Group {
                name: "cluster0".to_string(),
                tooltip: "a<br>b".to_string(),
                members: vec![0, 1],
            }],
        }
    }

    #[test]
    fn build_result_basic() {
        let config = NetworkConfig::default();
        let result = build_result(&config, sample_network(), 2, 0, &HashMap::new(), 1.0);

        assert_eq!(result.version, "1.0");
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.stats["groups"], serde_json::json!(1));
        assert_eq!(result.stats["isolated_nodes"], serde_json::json!(1));
        assert_eq!(result.stats["largest_group"], serde_json::json!(2));
        assert_eq!(result.stats["components"], serde_json::json!(2));
    }

    #[test]
    fn json_roundtrip_preserves_all_fields() {
        let config = NetworkConfig {
            input_path: Some("data/corr.sif".to_string()),
            ..Default::default()
        };
        let result = build_result(&config, sample_network(), 2, 1, &HashMap::new(), 12.34);

        let json = serde_json::to_string_pretty(&result).unwrap();
        let parsed: NetworkResult = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.nodes, result.nodes);
        assert_eq!(parsed.groups, result.groups);
        assert_eq!(parsed.metadata["source"], serde_json::json!("data/corr.sif"));
        assert_eq!(parsed.metadata["duration_ms"], serde_json::json!(12.3));
        assert!(parsed.metadata.contains_key("generated_at"));
        assert!(parsed.metadata.contains_key("corrnet_version"));
    }

    #[test]
    fn stats_keys_present() {
        let result = build_result(
            &NetworkConfig::default(),
            Network::default(),
            0,
            0,
            &HashMap::new(),
            0.0,
        );
        let expected_keys = [
            "rows",
            "unparsable_rows",
            "nodes",
            "links",
            "groups",
            "isolated_nodes",
            "largest_group",
            "components",
        ];
        for key in &expected_keys {
            assert!(result.stats.contains_key(*key), "Missing stat key: {key}");
        }
    }

    #[test]
    fn graph_output_drops_envelope() {
        let result = build_result(
            &NetworkConfig::default(),
            sample_network(),
            2,
            0,
            &HashMap::new(),
            0.0,
        );
        let json = serde_json::to_value(result.graph()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["nodes"][0]["group"], serde_json::json!("cluster0"));
        assert!(json["nodes"][2].get("color").is_none());
        assert_eq!(json["links"][0]["target"], serde_json::json!(1));
    }
}
