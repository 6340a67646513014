//! Core data types and configuration for a network build.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{NetworkError, Result};

/// One record of the correlation table, exactly as read from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "FileA")]
    pub file_a: String,
    #[serde(rename = "FileB")]
    pub file_b: String,
    #[serde(rename = "pcorValues", default)]
    pub pcor_values: String,
}

impl RawRecord {
    pub fn new(file_a: &str, file_b: &str, pcor_values: &str) -> Self {
        Self {
            file_a: file_a.to_string(),
            file_b: file_b.to_string(),
            pcor_values: pcor_values.to_string(),
        }
    }
}

/// A typed correlation row. `corr` is NaN when the source text did not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub file_a: String,
    pub file_b: String,
    pub corr: f64,
}

impl Row {
    pub fn new(file_a: &str, file_b: &str, corr: f64) -> Self {
        Self {
            file_a: file_a.to_string(),
            file_b: file_b.to_string(),
            corr,
        }
    }
}

/// An entity in the network.
///
/// `color` and `group` are either both set (the node took part in at least one
/// above-threshold link) or both unset (isolated node). `group` holds the name
/// of the [`Group`] the node belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Node {
    pub fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
            color: None,
            group: None,
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.group.is_none()
    }
}

/// An above-threshold link between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// The display decoration shared by every member of a surviving cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub tooltip: String,
    #[serde(default)]
    pub members: Vec<usize>,
}

/// A finished network: nodes, links in row order, and groups in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Network {
    /// Look up the group a node belongs to.
    pub fn group_of(&self, node: &Node) -> Option<&Group> {
        let name = node.group.as_deref()?;
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn isolated_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_isolated()).count()
    }
}

// ---------------------------------------------------------------------------
// Palette and label format
// ---------------------------------------------------------------------------

const DEFAULT_PALETTE: &[&str] = &[
    "#f08080", "#a0f0a0", "#a0a0f0", "#a0f0f0", "#f0a0f0", "#f0f0a0", "#60f020", "#a040a0",
    "#f0a080", "#80f0a0", "#20f0f0", "#f0f020", "#b0b040", "#40b0f0",
];

/// Fixed, non-empty table of member colors. Positions past the end wrap around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette(Vec<String>);

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self> {
        if colors.is_empty() {
            return Err(NetworkError::InvalidConfig(
                "palette must contain at least one color".to_string(),
            ));
        }
        Ok(Self(colors))
    }

    /// Color for the member at `position` within its cluster.
    pub fn color_for(&self, position: usize) -> &str {
        &self.0[position % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = NetworkError;

    fn try_from(colors: Vec<String>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

/// How a group's tooltip label renders each member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// `<span style="color:#xxxxxx">name</span>` joined by `<br>`.
    #[default]
    Html,
    /// `name (#xxxxxx)` joined by newlines.
    Plain,
}

impl LabelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Plain => "plain",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "html" => Some(Self::Html),
            "plain" => Some(Self::Plain),
            _ => None,
        }
    }

    pub fn format_member(&self, name: &str, color: &str) -> String {
        match self {
            Self::Html => format!("<span style=\"color:{color}\">{name}</span>"),
            Self::Plain => format!("{name} ({color})"),
        }
    }

    pub fn separator(&self) -> &'static str {
        match self {
            Self::Html => "<br>",
            Self::Plain => "\n",
        }
    }
}

impl std::fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Configuration for a network build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// A row links its endpoints only when `corr > threshold`.
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub label_format: LabelFormat,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub quiet: bool,
}

fn default_delimiter() -> char {
    '\t'
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            palette: Palette::default(),
            label_format: LabelFormat::default(),
            delimiter: default_delimiter(),
            input_path: None,
            output_path: None,
            verbose: false,
            quiet: false,
        }
    }
}

impl NetworkConfig {
    /// Reject settings the phases cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() {
            return Err(NetworkError::InvalidConfig(
                "threshold must be a number".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(NetworkError::InvalidConfig(format!(
                "delimiter {:?} is not a single-byte character",
                self.delimiter
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Result of a network build, shaped like the JSON output schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkResult {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub stats: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for NetworkResult {
    fn default() -> Self {
        Self {
            version: default_version(),
            metadata: HashMap::new(),
            stats: HashMap::new(),
            nodes: Vec::new(),
            links: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl NetworkResult {
    /// The bare `{nodes, links}` graph a layout/rendering step consumes.
    pub fn graph(&self) -> GraphOutput {
        GraphOutput {
            nodes: self.nodes.clone(),
            links: self.links.clone(),
        }
    }
}

/// Renderer-facing graph without the result envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOutput {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}
