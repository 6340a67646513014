//! Sequential phase orchestrator with timing.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::config::{
    Group, LabelFormat, Link, Network, NetworkConfig, NetworkResult, Node, Palette, RawRecord,
    Row,
};
use crate::error::{NetworkError, Result};
use crate::input;
use crate::output::build_result;
use crate::phases;
use crate::phases::clusters::ClusterRegistry;
use crate::phases::nodes::NodeTable;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("rows", "Parsing correlation rows"),
    ("nodes", "Indexing entities"),
    ("clusters", "Linking and clustering"),
    ("decorate", "Decorating groups"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// Working state threaded through the phases.
#[derive(Default)]
struct BuildState {
    rows: Vec<Row>,
    table: NodeTable,
    links: Vec<Link>,
    registry: Option<ClusterRegistry>,
    nodes: Vec<Node>,
    groups: Vec<Group>,
}

/// Type alias for phase function closures to keep signatures readable.
type PhaseFn<'a> = Box<dyn FnOnce(&NetworkConfig, &mut BuildState) + 'a>;

/// Build a network from already-typed rows, without timings or stats.
///
/// `threshold` must not be NaN (a NaN threshold links nothing).
pub fn compute_network(
    rows: &[Row],
    threshold: f64,
    palette: &Palette,
    format: LabelFormat,
) -> Network {
    let table = phases::nodes::run_nodes_phase(rows);
    let clustered = phases::clusters::run_clusters_phase(rows, &table, threshold);
    let mut nodes = table.to_nodes();
    let groups =
        phases::decorate::run_decorate_phase(&mut nodes, clustered.registry, palette, format);
    Network {
        nodes,
        links: clustered.links,
        groups,
    }
}

/// Execute the four-phase build over raw records and return the result.
pub fn run_pipeline(
    records: &[RawRecord],
    config: &NetworkConfig,
    mut progress_callback: Option<ProgressCallback>,
) -> Result<NetworkResult> {
    config.validate()?;

    let mut state = BuildState::default();
    let mut timings: HashMap<String, f64> = HashMap::new();
    let total_start = Instant::now();

    let phase_fns: Vec<(&str, PhaseFn<'_>)> = vec![
        (
            "rows",
            Box::new(|_config, state| {
                state.rows = phases::rows::run_rows_phase(records);
            }),
        ),
        (
            "nodes",
            Box::new(|_config, state| {
                state.table = phases::nodes::run_nodes_phase(&state.rows);
            }),
        ),
        (
            "clusters",
            Box::new(|config, state| {
                let out = phases::clusters::run_clusters_phase(
                    &state.rows,
                    &state.table,
                    config.threshold,
                );
                state.links = out.links;
                state.registry = Some(out.registry);
            }),
        ),
        (
            "decorate",
            Box::new(|config, state| {
                state.nodes = state.table.to_nodes();
                let registry = state
                    .registry
                    .take()
                    .unwrap_or_else(|| ClusterRegistry::new(state.table.len()));
                state.groups = phases::decorate::run_decorate_phase(
                    &mut state.nodes,
                    registry,
                    &config.palette,
                    config.label_format,
                );
            }),
        ),
    ];

    for (name, phase_fn) in phase_fns {
        // Report progress
        if let Some(ref mut cb) = progress_callback {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }

        let start = Instant::now();
        phase_fn(config, &mut state);
        timings.insert(name.to_string(), start.elapsed().as_secs_f64());
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

    let unparsable = phases::rows::count_unparsable(&state.rows);
    if unparsable > 0 {
        warn!("{unparsable} row(s) had an unparsable correlation and were never linked");
    }

    let network = Network {
        nodes: state.nodes,
        links: state.links,
        groups: state.groups,
    };
    info!(
        "built network: {} nodes, {} links, {} groups",
        network.nodes.len(),
        network.links.len(),
        network.groups.len()
    );

    Ok(build_result(
        config,
        network,
        state.rows.len(),
        unparsable,
        &timings,
        total_ms,
    ))
}

/// Read the table named by `config.input_path` and run the pipeline on it.
pub fn run_from_path(
    config: &NetworkConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<NetworkResult> {
    config.validate()?;
    let path = config.input_path.as_deref().ok_or_else(|| {
        NetworkError::InvalidConfig("no input path configured".to_string())
    })?;
    let records = input::read_rows(Path::new(path), config.delimiter)?;
    run_pipeline(&records, config, progress_callback)
}
