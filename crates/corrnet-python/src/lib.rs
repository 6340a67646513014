//! PyO3 bindings for the corrnet network engine.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use corrnet_core::config::{LabelFormat, NetworkConfig, Palette, RawRecord, Row};
use corrnet_core::{pipeline, NetworkError};

/// Python-visible network configuration.
#[pyclass]
#[derive(Clone)]
struct PyNetworkConfig {
    #[pyo3(get, set)]
    threshold: f64,
    #[pyo3(get, set)]
    palette: Option<Vec<String>>,
    #[pyo3(get, set)]
    label_format: String,
    #[pyo3(get, set)]
    delimiter: char,
    #[pyo3(get, set)]
    verbose: bool,
}

#[pymethods]
impl PyNetworkConfig {
    #[new]
    #[pyo3(signature = (
        threshold = 0.0,
        palette = None,
        label_format = "html".to_string(),
        delimiter = '\t',
        verbose = false,
    ))]
    fn new(
        threshold: f64,
        palette: Option<Vec<String>>,
        label_format: String,
        delimiter: char,
        verbose: bool,
    ) -> Self {
        Self {
            threshold,
            palette,
            label_format,
            delimiter,
            verbose,
        }
    }
}

impl TryFrom<PyNetworkConfig> for NetworkConfig {
    type Error = PyErr;

    fn try_from(py_config: PyNetworkConfig) -> PyResult<Self> {
        let label_format = LabelFormat::from_str_value(&py_config.label_format).ok_or_else(|| {
            PyValueError::new_err(format!(
                "unknown label_format {:?} (expected \"html\" or \"plain\")",
                py_config.label_format
            ))
        })?;
        let palette = match py_config.palette {
            Some(colors) => Palette::new(colors).map_err(to_py_err)?,
            None => Palette::default(),
        };
        Ok(NetworkConfig {
            threshold: py_config.threshold,
            palette,
            label_format,
            delimiter: py_config.delimiter,
            verbose: py_config.verbose,
            ..Default::default()
        })
    }
}

fn to_py_err(e: NetworkError) -> PyErr {
    match e {
        NetworkError::InvalidConfig(msg) => PyValueError::new_err(msg),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

fn resolve_config(config: Option<PyNetworkConfig>) -> PyResult<NetworkConfig> {
    match config {
        Some(c) => c.try_into(),
        None => Ok(NetworkConfig::default()),
    }
}

/// Parse serialized JSON into a Python dict.
fn json_to_py_dict(py: Python<'_>, json_str: String) -> PyResult<Py<PyDict>> {
    let json_module = py.import("json")?;
    json_module
        .call_method1("loads", (json_str,))?
        .extract::<Py<PyDict>>()
}

/// Build a network from `(file_a, file_b, corr)` tuples and return
/// `{nodes, links, groups}` as a Python dict.
///
/// `corr` may be a float or text; text that does not parse never links.
#[pyfunction]
#[pyo3(signature = (rows, threshold = None, config = None))]
fn compute_network(
    py: Python<'_>,
    rows: Vec<(String, String, PyObject)>,
    threshold: Option<f64>,
    config: Option<PyNetworkConfig>,
) -> PyResult<Py<PyDict>> {
    let mut cfg = resolve_config(config)?;
    if let Some(t) = threshold {
        cfg.threshold = t;
    }
    cfg.validate().map_err(to_py_err)?;

    let mut typed = Vec::with_capacity(rows.len());
    for (file_a, file_b, corr) in rows {
        let corr = match corr.extract::<f64>(py) {
            Ok(v) => v,
            Err(_) => corr
                .extract::<String>(py)
                .map(|s| corrnet_core::phases::rows::parse_correlation(&s))
                .unwrap_or(f64::NAN),
        };
        typed.push(Row {
            file_a,
            file_b,
            corr,
        });
    }

    let network =
        corrnet_core::compute_network(&typed, cfg.threshold, &cfg.palette, cfg.label_format);
    let json_str = serde_json::to_string(&network)
        .map_err(|e: serde_json::Error| PyRuntimeError::new_err(e.to_string()))?;
    json_to_py_dict(py, json_str)
}

/// Run the full pipeline over in-memory records or a table on disk.
///
/// `source` is either a path to a delimited table or a list of dicts with
/// `FileA`, `FileB`, `pcorValues` keys.
#[pyfunction]
#[pyo3(signature = (source, config = None, progress = None))]
fn build_network(
    py: Python<'_>,
    source: &Bound<'_, PyAny>,
    config: Option<PyNetworkConfig>,
    progress: Option<PyObject>,
) -> PyResult<Py<PyDict>> {
    let mut cfg = resolve_config(config)?;

    // Wrap the Python callable as a Rust ProgressCallback
    let progress_callback = progress.map(|py_cb| -> pipeline::ProgressCallback {
        Box::new(move |phase: &str, label: &str| {
            Python::with_gil(|py| {
                let _ = py_cb.call1(py, (phase, label));
            });
        })
    });

    let outcome = if let Ok(path) = source.extract::<String>() {
        cfg.input_path = Some(path);
        pipeline::run_from_path(&cfg, progress_callback)
    } else {
        let mut records = Vec::new();
        for item in source.try_iter()? {
            let dict = item?.downcast_into::<PyDict>()?;
            let field = |key: &str| -> PyResult<String> {
                match dict.get_item(key)? {
                    Some(v) => Ok(v.str()?.to_string()),
                    None => Err(PyValueError::new_err(format!("record missing {key:?}"))),
                }
            };
            records.push(RawRecord {
                file_a: field("FileA")?,
                file_b: field("FileB")?,
                pcor_values: field("pcorValues")?,
            });
        }
        pipeline::run_pipeline(&records, &cfg, progress_callback)
    };
    let result = outcome.map_err(to_py_err)?;

    let json_str = serde_json::to_string(&result)
        .map_err(|e: serde_json::Error| PyRuntimeError::new_err(e.to_string()))?;
    json_to_py_dict(py, json_str)
}

/// Return the corrnet engine version.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Corrnet Rust network engine.
#[pymodule]
fn _corrnet_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_network, m)?)?;
    m.add_function(wrap_pyfunction!(build_network, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PyNetworkConfig>()?;
    Ok(())
}
