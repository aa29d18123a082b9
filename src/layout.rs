//! Adjacency matrix layout.
//!
//! The layout places `N` nodes along both axes of a `width × height` area and
//! turns every occupied `(source, target)` pair of the adjacency into a
//! [`LayoutCell`]: a rectangle of `width / N × height / N` positioned by two
//! linear scales mapping `[0, N]` onto `[0, width]` and `[0, height]`.
//!
//! The adjacency can be given as
//!
//! * a dense weight grid ([`from_grid`](AdjacencyMatrixLayout::from_grid)),
//!   producing `N × N` cells,
//! * a sparse list of weighted edges between node identities
//!   ([`from_edges`](AdjacencyMatrixLayout::from_edges)), producing one cell
//!   per distinct pair,
//! * a [`Graph`] ([`from_graph`](AdjacencyMatrixLayout::from_graph)), or a
//!   graph restricted to a traversal order
//!   ([`from_order`](AdjacencyMatrixLayout::from_order)).
//!
//! Axis ticks ([`LayoutResult::x_ticks`]) are computed by the very same scales
//! as the cells, so label positions match cell coordinates exactly.
//!
//! # Examples
//!
//! ```
//! use callmap::layout::AdjacencyMatrixLayout;
//!
//! let nodes = ["main", "parse", "eval"];
//! let edges = [("main", "parse", 12.0), ("main", "eval", 30.0), ("eval", "eval", 4.0)];
//!
//! let layout = AdjacencyMatrixLayout::new(300.0, 300.0)
//!     .from_edges(&nodes, |n| n.to_string(), edges)
//!     .unwrap();
//!
//! assert_eq!(layout.len(), 3);
//! assert_eq!(layout.node_width(), 100.0);
//!
//! let cell = layout.cell(2, 2).unwrap();
//! assert_eq!(cell.id, "eval-eval");
//! assert_eq!((cell.x, cell.y), (200.0, 200.0));
//! ```

mod scale;

pub use scale::LinearScale;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    common::Comparator,
    core::VertexKey,
    graph::Graph,
};

/// The error encountered when the adjacency does not fit the node list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidGraphShapeError {
    /// The weight grid does not have one row per node.
    #[error("weight grid has {rows} rows, expected {expected}")]
    NotSquare { rows: usize, expected: usize },

    /// A row of the weight grid does not have one column per node.
    #[error("row {row} of weight grid has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// An edge or an ordering references a node absent from the node list.
    #[error("node {0:?} is not in the node list")]
    UnknownNode(String),

    /// Two nodes share the same identity.
    #[error("node {0:?} appears more than once")]
    DuplicateNode(String),

    /// The layout size is negative, infinite or NaN.
    #[error("layout size {width}x{height} is not a finite non-negative size")]
    InvalidSize { width: f64, height: f64 },

    /// The cell padding is negative, infinite or NaN.
    #[error("cell padding {0} is not a finite non-negative number")]
    InvalidPadding(f64),
}

/// A positioned, sized cell of the adjacency matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCell {
    /// `"{source identity}-{target identity}"`.
    pub id: String,
    pub source_index: usize,
    pub target_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// Position of a node label along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub label: String,
    pub index: usize,
    /// Start of the node band, equal to the coordinate of the cells in the
    /// corresponding row or column when no padding is configured.
    pub position: f64,
    /// Middle of the node band.
    pub center: f64,
}

/// Layout settings in a form that can be received as JSON from a client.
///
/// ```
/// use callmap::layout::{AdjacencyMatrixLayout, LayoutConfig};
///
/// let config: LayoutConfig =
///     serde_json::from_str(r#"{"size": [640, 480], "padding": 1}"#).unwrap();
/// let layout = AdjacencyMatrixLayout::<&str>::from(config);
///
/// assert_eq!(layout.size(), (640.0, 480.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub size: [f64; 2],
    #[serde(default)]
    pub padding: f64,
    #[serde(default)]
    pub directed: bool,
}

/// Builder of the adjacency matrix layout. See [module](self) documentation
/// for an example.
///
/// `N` is the type of the nodes, relevant only when an [order](Self::order_by)
/// is configured. Borrowed nodes are fine as long as no order is set.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrixLayout<N> {
    width: f64,
    height: f64,
    directed: bool,
    padding: f64,
    order: Option<Comparator<N>>,
}

impl<N> AdjacencyMatrixLayout<N> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            directed: true,
            padding: 0.0,
            order: None,
        }
    }

    /// Records whether the adjacency is directed. The flag is carried into the
    /// result as metadata only; symmetrizing an undirected adjacency is up to
    /// the caller.
    pub fn directed(self, directed: bool) -> Self {
        Self { directed, ..self }
    }

    /// Shrinks every cell by `padding` in both dimensions, keeping it centered
    /// in its band. Negative or non-finite padding fails the layout with
    /// [`InvalidGraphShapeError::InvalidPadding`].
    pub fn padding(self, padding: f64) -> Self {
        Self { padding, ..self }
    }

    /// Arranges the nodes along the axes in the order of the comparator. The
    /// sort is stable, so equal nodes keep their input order.
    pub fn order_by(self, order: Comparator<N>) -> Self
    where
        N: 'static,
    {
        Self {
            order: Some(order),
            ..self
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Lays out a dense weight grid, where `grid[i][j]` is the weight of the
    /// edge from `nodes[i]` to `nodes[j]`. Every pair becomes a cell.
    pub fn from_grid<I, R>(
        &self,
        nodes: &[N],
        identity: I,
        grid: &[R],
    ) -> Result<LayoutResult, InvalidGraphShapeError>
    where
        I: Fn(&N) -> String,
        R: AsRef<[f64]>,
    {
        let n = nodes.len();

        if grid.len() != n {
            return Err(InvalidGraphShapeError::NotSquare {
                rows: grid.len(),
                expected: n,
            });
        }

        if let Some((row, len)) = grid
            .iter()
            .map(|row| row.as_ref().len())
            .enumerate()
            .find(|(_, len)| *len != n)
        {
            return Err(InvalidGraphShapeError::RaggedRow {
                row,
                len,
                expected: n,
            });
        }

        let labels = nodes.iter().map(&identity).collect::<Vec<_>>();
        let axis = self.axis(nodes, &labels)?;

        // Emit the cells row-major in axis order.
        let entries = axis.iter().flat_map(|&i| {
            axis.iter().map(move |&j| (i, j, grid[i].as_ref()[j]))
        });

        self.build(labels, &axis, entries)
    }

    /// Lays out a sparse list of `(source identity, target identity, weight)`
    /// edges. Repeated pairs are merged into one cell whose weight is the sum.
    pub fn from_edges<I, E, S>(
        &self,
        nodes: &[N],
        identity: I,
        edges: E,
    ) -> Result<LayoutResult, InvalidGraphShapeError>
    where
        I: Fn(&N) -> String,
        E: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let labels = nodes.iter().map(&identity).collect::<Vec<_>>();
        let axis = self.axis(nodes, &labels)?;

        let lookup = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect::<FxHashMap<_, _>>();

        let entries = edges
            .into_iter()
            .map(|(source, target, weight)| {
                let index = |id: &str| {
                    lookup
                        .get(id)
                        .copied()
                        .ok_or_else(|| InvalidGraphShapeError::UnknownNode(id.to_string()))
                };
                Ok((index(source.as_ref())?, index(target.as_ref())?, weight))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.build(labels, &axis, entries)
    }

    /// Lays out all vertices of the graph in the order of insertion (unless an
    /// [order](Self::order_by) is configured) with one cell per edge.
    pub fn from_graph<V, I>(
        &self,
        graph: &Graph<N, V>,
        identity: I,
    ) -> Result<LayoutResult, InvalidGraphShapeError>
    where
        N: VertexKey,
        I: Fn(&N) -> String,
    {
        let nodes = graph.keys().cloned().collect::<Vec<_>>();
        let labels = nodes.iter().map(&identity).collect::<Vec<_>>();
        let axis = self.axis(&nodes, &labels)?;

        // Vertex ids are positions in the node list.
        let entries = graph.edges().filter_map(|edge| {
            let source = graph.id(edge.source)?.as_usize();
            let target = graph.id(edge.target)?.as_usize();
            Some((source, target, edge.weight))
        });

        self.build(labels, &axis, entries)
    }

    /// Lays out the vertices listed in `order` (typically the result of a
    /// traversal) in that order, with one cell per edge between listed
    /// vertices. Edges leading outside of the listed vertices are ignored.
    pub fn from_order<'a, V, O, I>(
        &self,
        graph: &Graph<N, V>,
        order: O,
        identity: I,
    ) -> Result<LayoutResult, InvalidGraphShapeError>
    where
        N: VertexKey + 'a,
        O: IntoIterator<Item = &'a N>,
        I: Fn(&N) -> String,
    {
        let mut position = vec![None; graph.vertex_count()];
        let mut nodes = Vec::new();

        for key in order {
            let id = graph
                .id(key)
                .ok_or_else(|| InvalidGraphShapeError::UnknownNode(identity(key)))?;

            if position[id.as_usize()].is_some() {
                return Err(InvalidGraphShapeError::DuplicateNode(identity(key)));
            }

            position[id.as_usize()] = Some(nodes.len());
            nodes.push(key.clone());
        }

        let labels = nodes.iter().map(&identity).collect::<Vec<_>>();
        let axis = self.axis(&nodes, &labels)?;

        let entries = graph.edges().filter_map(|edge| {
            let source = position[graph.id(edge.source)?.as_usize()]?;
            let target = position[graph.id(edge.target)?.as_usize()]?;
            Some((source, target, edge.weight))
        });

        self.build(labels, &axis, entries)
    }

    // Returns node indices in the order of their positions along the axes.
    fn axis(&self, nodes: &[N], labels: &[String]) -> Result<Vec<usize>, InvalidGraphShapeError> {
        let mut seen = FxHashSet::default();
        if let Some(label) = labels.iter().find(|label| !seen.insert(label.as_str())) {
            return Err(InvalidGraphShapeError::DuplicateNode(label.clone()));
        }

        let mut axis = (0..nodes.len()).collect::<Vec<_>>();
        if let Some(order) = &self.order {
            axis.sort_by(|&a, &b| order.compare(&nodes[a], &nodes[b]));
        }

        Ok(axis)
    }

    fn build<E>(
        &self,
        labels: Vec<String>,
        axis: &[usize],
        entries: E,
    ) -> Result<LayoutResult, InvalidGraphShapeError>
    where
        E: IntoIterator<Item = (usize, usize, f64)>,
    {
        let (width, height) = (self.width, self.height);
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(InvalidGraphShapeError::InvalidSize { width, height });
        }

        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(InvalidGraphShapeError::InvalidPadding(self.padding));
        }

        let n = labels.len();

        let mut position = vec![0; n];
        for (p, &i) in axis.iter().enumerate() {
            position[i] = p;
        }

        let labels = axis.iter().map(|&i| labels[i].clone()).collect::<Vec<_>>();

        let x_scale = LinearScale::new([0.0, n as f64], [0.0, width]);
        let y_scale = LinearScale::new([0.0, n as f64], [0.0, height]);
        let (node_width, node_height) = if n == 0 {
            (0.0, 0.0)
        } else {
            (width / n as f64, height / n as f64)
        };

        let cell_width = (node_width - self.padding).max(0.0);
        let cell_height = (node_height - self.padding).max(0.0);
        let offset_x = (node_width - cell_width) / 2.0;
        let offset_y = (node_height - cell_height) / 2.0;

        // Keyed by occupied pairs only, so sparse inputs stay proportional to
        // the number of edges.
        let mut slots: FxHashMap<(usize, usize), usize> = FxHashMap::default();
        let mut cells: Vec<LayoutCell> = Vec::new();

        for (i, j, weight) in entries {
            let (p, q) = (position[i], position[j]);

            if let Some(&slot) = slots.get(&(p, q)) {
                cells[slot].weight += weight;
                continue;
            }

            slots.insert((p, q), cells.len());
            cells.push(LayoutCell {
                id: format!("{}-{}", labels[p], labels[q]),
                source_index: p,
                target_index: q,
                x: x_scale.apply(p as f64) + offset_x,
                y: y_scale.apply(q as f64) + offset_y,
                width: cell_width,
                height: cell_height,
                weight,
            });
        }

        debug!(
            nodes = n,
            cells = cells.len(),
            width,
            height,
            "adjacency matrix layout computed"
        );

        Ok(LayoutResult {
            cells,
            labels,
            x_scale,
            y_scale,
            node_width,
            node_height,
            directed: self.directed,
            slots,
        })
    }
}

impl<N> From<LayoutConfig> for AdjacencyMatrixLayout<N> {
    fn from(config: LayoutConfig) -> Self {
        let [width, height] = config.size;
        Self::new(width, height)
            .padding(config.padding)
            .directed(config.directed)
    }
}

/// The result of an [adjacency matrix layout](AdjacencyMatrixLayout).
///
/// Cell indices (`source_index`, `target_index`) are positions along the axes,
/// which coincide with the node indices of the input unless an
/// [order](AdjacencyMatrixLayout::order_by) was configured. The label at each
/// position is available through [`labels`](Self::labels).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    cells: Vec<LayoutCell>,
    labels: Vec<String>,
    x_scale: LinearScale,
    y_scale: LinearScale,
    node_width: f64,
    node_height: f64,
    directed: bool,
    #[serde(skip)]
    slots: FxHashMap<(usize, usize), usize>,
}

impl LayoutResult {
    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<LayoutCell> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Node identities in the order of their positions along the axes.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    pub fn node_width(&self) -> f64 {
        self.node_width
    }

    pub fn node_height(&self) -> f64 {
        self.node_height
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_occupied(&self, source: usize, target: usize) -> bool {
        self.slots.contains_key(&(source, target))
    }

    pub fn cell(&self, source: usize, target: usize) -> Option<&LayoutCell> {
        let slot = *self.slots.get(&(source, target))?;
        Some(&self.cells[slot])
    }

    /// Occupied `(source, target)` positions in row-major order.
    pub fn occupied(&self) -> impl ExactSizeIterator<Item = (usize, usize)> {
        let mut pairs = self.slots.keys().copied().collect::<Vec<_>>();
        pairs.sort_unstable();
        pairs.into_iter()
    }

    /// Decodes the cells back into `(source, target, weight)` triples, in the
    /// order of the cells.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (usize, usize, f64)> + '_ {
        self.cells
            .iter()
            .map(|cell| (cell.source_index, cell.target_index, cell.weight))
    }

    pub fn x_ticks(&self) -> Vec<Tick> {
        Self::ticks(&self.labels, &self.x_scale, self.node_width)
    }

    pub fn y_ticks(&self) -> Vec<Tick> {
        Self::ticks(&self.labels, &self.y_scale, self.node_height)
    }

    fn ticks(labels: &[String], scale: &LinearScale, band: f64) -> Vec<Tick> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let position = scale.apply(index as f64);
                Tick {
                    label: label.clone(),
                    index,
                    position,
                    center: position + band / 2.0,
                }
            })
            .collect()
    }
}
