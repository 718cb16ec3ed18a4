//! Strongly-typed records describing dashboard blocks and the data they draw from.

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::registry::RegistryError;

/// Section of the dashboard a block belongs to. Each category is one tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Geographic,
    Demographic,
    Economic,
    Social,
    Environmental,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Category; 5] = [
        Category::Geographic,
        Category::Demographic,
        Category::Economic,
        Category::Social,
        Category::Environmental,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Geographic => "geographic",
            Category::Demographic => "demographic",
            Category::Economic => "economic",
            Category::Social => "social",
            Category::Environmental => "environmental",
        }
    }

    /// Heading shown above the category's section.
    pub fn title(self) -> &'static str {
        match self {
            Category::Geographic => "Geographic Data",
            Category::Demographic => "Demographic Data",
            Category::Economic => "Economic Data",
            Category::Social => "Social Data",
            Category::Environmental => "Environmental Data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| RegistryError::UnknownCategory(s.to_string()))
    }
}

/// One displayable unit on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Stable key, never reused for a different visual.
    pub id: String,
    pub category: Category,
    /// Human-readable name shown in selection controls and headings.
    pub display_label: String,
    pub content: BlockContent,
    /// Minimum vertical space (pixels) the content needs to avoid clipping.
    #[serde(default)]
    pub declared_min_height: u32,
}

impl BlockDescriptor {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        display_label: impl Into<String>,
        content: BlockContent,
        declared_min_height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            display_label: display_label.into(),
            content,
            declared_min_height,
        }
    }
}

/// What a block shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockContent {
    /// Inline third-party markup, embedded as-is.
    Fragment { markup: String },
    /// Markup fetched at render time from a [`crate::source::FragmentSource`].
    ExternalFragment { path: Utf8PathBuf },
    /// A chart drawn from a named dataset.
    Chart { table: String, chart: ChartDirective },
}

impl BlockContent {
    pub fn kind_name(&self) -> &'static str {
        match self {
            BlockContent::Fragment { .. } => "fragment",
            BlockContent::ExternalFragment { .. } => "external_fragment",
            BlockContent::Chart { .. } => "chart",
        }
    }
}

/// A single table cell: numeric or free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(t) => t.trim().parse().ok(),
        }
    }

    /// Text used when the cell acts as a group key.
    pub fn label(&self) -> String {
        match self {
            Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(t) => t.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// A small in-memory table, one row per survey record or pre-aggregated group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builder-style row append.
    pub fn with_row<I, C>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Named tables that chart blocks refer to.
pub type Datasets = IndexMap<String, DataTable>;

/// Kind of chart to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

/// How to turn a [`DataTable`] into a chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartDirective {
    pub kind: ChartKind,
    /// Column providing the category axis / slice labels.
    pub x: String,
    /// Column summed per `x` group. When absent, rows are counted instead.
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Named colour or `#rrggbb`; see [`crate::color::parse_color`].
    #[serde(default)]
    pub color: Option<String>,
}

impl ChartDirective {
    pub fn new(kind: ChartKind, x: impl Into<String>) -> Self {
        Self {
            kind,
            x: x.into(),
            y: None,
            title: None,
            color: None,
        }
    }

    pub fn sum_of(mut self, y: impl Into<String>) -> Self {
        self.y = Some(y.into());
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn colored(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
