//! Sparse matrix utilities for assembly, partitioning and factorization
//!
//! Stiffness matrices go through two phases: an append-only coordinate
//! accumulator during assembly, then compressed-column blocks that are
//! partitioned, factorized and multiplied but never mutated in place.

use std::collections::{BTreeSet, BinaryHeap, VecDeque};
use std::cmp::Reverse;
use std::fmt;

use log::debug;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use serde::{Deserialize, Serialize};

use crate::analysis::{DofMap, DofSlot};
use crate::error::{FEAError, FEAResult};

/// Sparse matrix builder using COO format
///
/// Duplicate entries are summed when the builder is converted.
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new square sparse matrix builder
    pub fn new(size: usize) -> Self {
        // 6 DOFs per node, ~10 connections per node
        let estimated_nnz = size * 60;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Matrix dimension
    pub fn size(&self) -> usize {
        self.size
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter-add a dense element matrix through its global DOF list
    pub fn add_element_matrix(&mut self, dofs: &[usize], k_elem: &DMatrix<f64>) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Convert to CSC format, summing duplicates
    pub fn to_csc(&self) -> CscMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CscMatrix::from(&coo)
    }

    /// Number of stored triplets (before duplicates are summed)
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Sparse matrix-vector product `y = A x` for a CSC matrix
pub fn csc_matvec(csc: &CscMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let mut y = DVector::zeros(csc.nrows());

    let col_offsets = csc.col_offsets();
    let row_indices = csc.row_indices();
    let values = csc.values();

    for col in 0..csc.ncols() {
        let xc = x[col];
        if xc == 0.0 {
            continue;
        }
        for idx in col_offsets[col]..col_offsets[col + 1] {
            y[row_indices[idx]] += values[idx] * xc;
        }
    }

    y
}

/// The four blocks of a stiffness matrix split by free and fixed DOFs
#[derive(Debug, Clone)]
pub struct PartitionedStiffness {
    pub kff: CscMatrix<f64>,
    pub kfs: CscMatrix<f64>,
    pub ksf: CscMatrix<f64>,
    pub kss: CscMatrix<f64>,
}

impl PartitionedStiffness {
    /// Split a global CSC stiffness matrix through the DOF permutation maps
    ///
    /// `kff` is built from the lower triangle and mirrored so its pattern is
    /// exactly symmetric.
    pub fn from_global(k: &CscMatrix<f64>, map: &DofMap) -> Self {
        let nf = map.free_count();
        let ns = map.fixed_count();

        let mut kff = CooMatrix::new(nf, nf);
        let mut kfs = CooMatrix::new(nf, ns);
        let mut ksf = CooMatrix::new(ns, nf);
        let mut kss = CooMatrix::new(ns, ns);

        for (row, col, &val) in k.triplet_iter() {
            match (map.slot(row), map.slot(col)) {
                (DofSlot::Free(i), DofSlot::Free(j)) => {
                    if i > j {
                        kff.push(i, j, val);
                        kff.push(j, i, val);
                    } else if i == j {
                        kff.push(i, i, val);
                    }
                }
                (DofSlot::Free(i), DofSlot::Fixed(j)) => kfs.push(i, j, val),
                (DofSlot::Fixed(i), DofSlot::Free(j)) => ksf.push(i, j, val),
                (DofSlot::Fixed(i), DofSlot::Fixed(j)) => kss.push(i, j, val),
            }
        }

        Self {
            kff: CscMatrix::from(&kff),
            kfs: CscMatrix::from(&kfs),
            ksf: CscMatrix::from(&ksf),
            kss: CscMatrix::from(&kss),
        }
    }
}

/// Fill-reducing column ordering applied before factorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnOrdering {
    /// Keep the assembly order
    Natural,
    /// Bandwidth reduction
    ReverseCuthillMcKee,
    /// Minimum degree on the symmetric pattern
    #[default]
    MinimumDegree,
}

impl ColumnOrdering {
    /// Permutation `perm` with `perm[new] = old`
    pub fn permutation(&self, a: &CscMatrix<f64>) -> Vec<usize> {
        match self {
            Self::Natural => (0..a.ncols()).collect(),
            Self::ReverseCuthillMcKee => reverse_cuthill_mckee(a),
            Self::MinimumDegree => minimum_degree(a),
        }
    }
}

fn adjacency(a: &CscMatrix<f64>) -> Vec<BTreeSet<usize>> {
    let mut adj = vec![BTreeSet::new(); a.ncols()];
    for (row, col, _) in a.triplet_iter() {
        if row != col {
            adj[row].insert(col);
            adj[col].insert(row);
        }
    }
    adj
}

/// Minimum degree ordering of a symmetric sparsity pattern
///
/// Eliminates the vertex of least current degree, turning its neighbours
/// into a clique, until the graph is empty. Ties go to the lowest index.
pub fn minimum_degree(a: &CscMatrix<f64>) -> Vec<usize> {
    let n = a.ncols();
    let mut adj = adjacency(a);
    let mut eliminated = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut heap: BinaryHeap<Reverse<(usize, usize)>> =
        (0..n).map(|v| Reverse((adj[v].len(), v))).collect();

    while let Some(Reverse((degree, v))) = heap.pop() {
        // Stale heap entries are skipped
        if eliminated[v] || degree != adj[v].len() {
            continue;
        }

        eliminated[v] = true;
        order.push(v);

        let neighbors: Vec<usize> = std::mem::take(&mut adj[v]).into_iter().collect();
        for &p in &neighbors {
            adj[p].remove(&v);
            for &q in &neighbors {
                if p != q {
                    adj[p].insert(q);
                }
            }
        }
        for &p in &neighbors {
            heap.push(Reverse((adj[p].len(), p)));
        }
    }

    order
}

/// Bandwidth reduction using Reverse Cuthill-McKee algorithm
///
/// Returns a permutation vector that reorders DOFs to minimize bandwidth
pub fn reverse_cuthill_mckee(a: &CscMatrix<f64>) -> Vec<usize> {
    let n = a.ncols();
    if n == 0 {
        return vec![];
    }

    let adj: Vec<Vec<usize>> = adjacency(a)
        .into_iter()
        .map(|set| set.into_iter().collect())
        .collect();
    let degrees: Vec<usize> = adj.iter().map(|v| v.len()).collect();

    let mut visited = vec![false; n];
    let mut result = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    while result.len() < n {
        // Start each component from its lowest-degree vertex
        let start = (0..n)
            .filter(|&i| !visited[i])
            .min_by_key(|&i| degrees[i])
            .unwrap_or(0);
        queue.push_back(start);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            result.push(node);

            let mut neighbors: Vec<usize> =
                adj[node].iter().copied().filter(|&m| !visited[m]).collect();
            neighbors.sort_by_key(|&m| degrees[m]);
            for neighbor in neighbors {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    result.reverse();
    result
}

/// Create inverse permutation
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (new_idx, &old_idx) in perm.iter().enumerate() {
        inv[old_idx] = new_idx;
    }
    inv
}

/// Symmetric permutation `P A Pᵗ` with `perm[new] = old`
pub fn permute_symmetric(a: &CscMatrix<f64>, perm: &[usize]) -> CscMatrix<f64> {
    let inv = inverse_permutation(perm);
    let mut coo = CooMatrix::new(a.nrows(), a.ncols());
    for (row, col, &val) in a.triplet_iter() {
        coo.push(inv[row], inv[col], val);
    }
    CscMatrix::from(&coo)
}

/// Sparse Cholesky factorization of a symmetric positive definite matrix
///
/// Factorizes `P A Pᵗ = L Lᵗ` once; every call to [`solve`](Self::solve)
/// reuses the factor.
pub struct SparseCholeskySolver {
    size: usize,
    permutation: Vec<usize>,
    factor: Option<CscCholesky<f64>>,
}

impl SparseCholeskySolver {
    /// Factorize `a` after reordering its columns with `ordering`
    pub fn factorize(a: &CscMatrix<f64>, ordering: ColumnOrdering) -> FEAResult<Self> {
        let size = a.nrows();
        if size == 0 {
            return Ok(Self {
                size,
                permutation: Vec::new(),
                factor: None,
            });
        }

        let permutation = ordering.permutation(a);
        let permuted = permute_symmetric(a, &permutation);
        let factor = CscCholesky::factor(&permuted).map_err(|_| {
            FEAError::NonPositiveDefinite(
                "sparse Cholesky factorization of the free-free block failed; \
                 the model is under-constrained or contains a mechanism"
                    .to_string(),
            )
        })?;

        debug!(
            "Cholesky factor ({:?} ordering): {} non-zeros in L for {} non-zeros in A",
            ordering,
            factor.l().nnz(),
            a.nnz()
        );

        Ok(Self {
            size,
            permutation,
            factor: Some(factor),
        })
    }

    /// Dimension of the factorized system
    pub fn size(&self) -> usize {
        self.size
    }

    /// Non-zeros of the triangular factor
    pub fn factor_nnz(&self) -> usize {
        self.factor.as_ref().map_or(0, |f| f.l().nnz())
    }

    /// Solve A x = b with the cached factor
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let Some(factor) = &self.factor else {
            return DVector::zeros(self.size);
        };

        let permuted = DMatrix::from_fn(self.size, 1, |k, _| b[self.permutation[k]]);
        let x = factor.solve(&permuted);

        let mut out = DVector::zeros(self.size);
        for (k, &old) in self.permutation.iter().enumerate() {
            out[old] = x[(k, 0)];
        }
        out
    }
}

impl fmt::Debug for SparseCholeskySolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseCholeskySolver")
            .field("size", &self.size)
            .field("factor_nnz", &self.factor_nnz())
            .finish()
    }
}
