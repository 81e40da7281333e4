//! FE Model - nodes, elements and the static linear solve

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info, warn};
use nalgebra_sparse::CscMatrix;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::{AnalysisResult, CaseSolution, DofMap, DofSlot, SolverConfiguration};
use crate::elements::{Dof, Element, Node};
use crate::error::{FEAError, FEAResult};
use crate::loads::{ElementLoad, LoadCase, NodalLoad, Settlement};
use crate::math::{Mat, PartitionedStiffness, SparseCholeskySolver, SparseMatrixBuilder, Vec};
use crate::results::{AnalysisSummary, Displacement, Force, StressTensor};

/// The finite element model
///
/// Nodes and elements are kept in insertion order; a node's position in
/// that order is its index, and global DOF `6 * index + dof` belongs to it.
#[derive(Debug, Default)]
pub struct Model {
    nodes: std::vec::Vec<Node>,
    elements: std::vec::Vec<Element>,
    /// Lowercase node label -> position
    node_lookup: HashMap<String, usize>,
    /// Lowercase element label -> position
    element_lookup: HashMap<String, usize>,
    last_result: Option<AnalysisResult>,
    factorization_count: usize,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Whether `label` is free for a new node or element (case-insensitive)
    pub fn is_valid_label(&self, label: &str) -> bool {
        let key = label.to_lowercase();
        !label.trim().is_empty()
            && !self.node_lookup.contains_key(&key)
            && !self.element_lookup.contains_key(&key)
    }

    fn check_label(&self, label: &str) -> FEAResult<()> {
        if self.is_valid_label(label) {
            Ok(())
        } else {
            Err(FEAError::DuplicateLabel(label.to_string()))
        }
    }

    /// Add a node, returning its index
    pub fn add_node(&mut self, label: &str, mut node: Node) -> FEAResult<usize> {
        self.check_label(label)?;
        let index = self.nodes.len();
        node.label = label.to_string();
        node.index = None;
        self.node_lookup.insert(label.to_lowercase(), index);
        self.nodes.push(node);
        self.last_result = None;
        Ok(index)
    }

    /// Add an element, resolving its node labels
    pub fn add_element(&mut self, label: &str, mut element: Element) -> FEAResult<usize> {
        self.check_label(label)?;

        let expected = element.kind.node_count();
        if element.nodes().len() != expected {
            return Err(FEAError::InvalidTopology(format!(
                "{} element '{}' needs {} nodes, got {}",
                element.kind.family_name(),
                label,
                expected,
                element.nodes().len()
            )));
        }
        element.node_indices = element
            .nodes()
            .iter()
            .map(|n| self.node_position(n))
            .collect::<FEAResult<_>>()?;

        let index = self.elements.len();
        element.label = label.to_string();
        self.element_lookup.insert(label.to_lowercase(), index);
        self.elements.push(element);
        self.last_result = None;
        Ok(index)
    }

    /// Add a load directly on a node
    pub fn add_nodal_load(&mut self, node_label: &str, load: NodalLoad) -> FEAResult<()> {
        let i = self.node_position(node_label)?;
        self.nodes[i].loads.push(load);
        self.last_result = None;
        Ok(())
    }

    /// Add a prescribed settlement on a node's fixed DOFs
    pub fn add_settlement(&mut self, node_label: &str, settlement: Settlement) -> FEAResult<()> {
        let i = self.node_position(node_label)?;
        self.nodes[i].settlements.push(settlement);
        self.last_result = None;
        Ok(())
    }

    /// Add a load on an element
    pub fn add_element_load(
        &mut self,
        element_label: &str,
        load: impl Into<ElementLoad>,
    ) -> FEAResult<()> {
        let i = self.element_position(element_label)?;
        self.elements[i].loads.push(load.into());
        self.last_result = None;
        Ok(())
    }

    // ========================
    // Accessors
    // ========================

    fn node_position(&self, label: &str) -> FEAResult<usize> {
        self.node_lookup
            .get(&label.to_lowercase())
            .copied()
            .ok_or_else(|| FEAError::NodeNotFound(label.to_string()))
    }

    fn element_position(&self, label: &str) -> FEAResult<usize> {
        self.element_lookup
            .get(&label.to_lowercase())
            .copied()
            .ok_or_else(|| FEAError::ElementNotFound(label.to_string()))
    }

    pub fn node(&self, label: &str) -> FEAResult<&Node> {
        Ok(&self.nodes[self.node_position(label)?])
    }

    /// Mutable node access; discards the current result
    pub fn node_mut(&mut self, label: &str) -> FEAResult<&mut Node> {
        let i = self.node_position(label)?;
        self.last_result = None;
        Ok(&mut self.nodes[i])
    }

    pub fn element(&self, label: &str) -> FEAResult<&Element> {
        Ok(&self.elements[self.element_position(label)?])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Solve the default load case
    pub fn solve(&mut self) -> FEAResult<()> {
        self.solve_with(&SolverConfiguration::default())
    }

    /// Solve the listed load cases
    pub fn solve_cases(&mut self, cases: &[LoadCase]) -> FEAResult<()> {
        self.solve_with(&SolverConfiguration::new(cases))
    }

    /// Assemble, factorize once and solve every configured load case
    ///
    /// On success the new result replaces the previous one; on failure the
    /// previous result is kept.
    pub fn solve_with(&mut self, config: &SolverConfiguration) -> FEAResult<()> {
        if self.nodes.is_empty() {
            return Err(FEAError::InvalidInput("model has no nodes".to_string()));
        }
        info!(
            "Solving model: {} nodes, {} elements, {} load case(s)",
            self.nodes.len(),
            self.elements.len(),
            config.load_cases.len()
        );
        let start = Instant::now();

        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.index = Some(i);
        }

        let phase = Instant::now();
        let k = self.global_stiffness()?;
        debug!(
            "Assembled {}x{} stiffness ({} non-zeros) in {:?}",
            k.nrows(),
            k.ncols(),
            k.nnz(),
            phase.elapsed()
        );

        let phase = Instant::now();
        let fixity: std::vec::Vec<bool> = self
            .nodes
            .iter()
            .flat_map(|n| n.constraints.fixity())
            .collect();
        let dof_map = DofMap::new(&fixity);
        let blocks = PartitionedStiffness::from_global(&k, &dof_map);
        debug!(
            "Extracted kff/kfs/ksf/kss ({} free, {} fixed DOFs) in {:?}",
            dof_map.free_count(),
            dof_map.fixed_count(),
            phase.elapsed()
        );

        let phase = Instant::now();
        self.check_free_stiffness(&blocks, &dof_map)?;
        let cholesky = SparseCholeskySolver::factorize(&blocks.kff, config.ordering)?;
        let nf = dof_map.free_count().max(1) as f64;
        debug!(
            "Cholesky factorization in {:?}; kff has {} non-zeros (~{:.4}%)",
            phase.elapsed(),
            blocks.kff.nnz(),
            100.0 * blocks.kff.nnz() as f64 / (nf * nf)
        );

        let settlements =
            self.settlement_vector(&dof_map, config.settlements_load_case.as_ref());
        let mut result = AnalysisResult::new(
            cholesky,
            blocks,
            dof_map,
            settlements,
            config.settlements_load_case.clone(),
        );

        let phase = Instant::now();
        for (case, solution) in self.solve_load_cases(&result, &config.load_cases)? {
            result.insert_case(case, solution);
        }
        debug!("Solved load cases in {:?}", phase.elapsed());

        self.last_result = Some(result);
        self.factorization_count += 1;
        self.rebuild_connectivity();

        info!("Analysis finished in {:?}", start.elapsed());
        Ok(())
    }

    /// Global stiffness matrix assembled from every element
    pub fn global_stiffness(&self) -> FEAResult<CscMatrix<f64>> {
        let mut builder = SparseMatrixBuilder::new(6 * self.nodes.len());
        for (dofs, k) in self.element_stiffnesses()? {
            builder.add_element_matrix(&dofs, &k);
        }
        Ok(builder.to_csc())
    }

    fn element_stiffnesses(&self) -> FEAResult<std::vec::Vec<(std::vec::Vec<usize>, Mat)>> {
        #[cfg(feature = "parallel")]
        let elements = self.elements.par_iter();
        #[cfg(not(feature = "parallel"))]
        let elements = self.elements.iter();

        elements
            .map(|element| Ok((element.global_dofs(), element.global_stiffness(&self.nodes)?)))
            .collect()
    }

    /// Report a free DOF without stiffness by node and DOF
    fn check_free_stiffness(&self, blocks: &PartitionedStiffness, map: &DofMap) -> FEAResult<()> {
        for (i, &dof) in map.free_dofs().iter().enumerate() {
            let diagonal = blocks.kff.get_entry(i, i).map_or(0.0, |e| e.into_value());
            if diagonal <= 0.0 {
                let node = &self.nodes[dof / 6];
                return Err(FEAError::NonPositiveDefinite(format!(
                    "node '{}' has no stiffness in {:?}",
                    node.label,
                    Dof::ALL[dof % 6]
                )));
            }
        }
        Ok(())
    }

    /// Prescribed displacements of the fixed DOFs
    fn settlement_vector(&self, map: &DofMap, case: Option<&LoadCase>) -> Vec {
        let mut ds = Vec::zeros(map.fixed_count());
        let Some(case) = case else {
            return ds;
        };

        for (i, node) in self.nodes.iter().enumerate() {
            for settlement in node.settlements.iter().filter(|s| &s.case == case) {
                for dof in Dof::ALL {
                    let value = settlement.displacement.get(dof);
                    match map.slot(6 * i + dof.index()) {
                        DofSlot::Fixed(j) => ds[j] += value,
                        DofSlot::Free(_) if value != 0.0 => warn!(
                            "Settlement of node '{}' in {:?} ignored: the DOF is free",
                            node.label, dof
                        ),
                        DofSlot::Free(_) => {}
                    }
                }
            }
        }
        ds
    }

    /// Global load vector of one case: nodal loads plus element equivalent loads
    fn load_vector(&self, case: &LoadCase) -> FEAResult<Vec> {
        let mut f = Vec::zeros(6 * self.nodes.len());

        for (i, node) in self.nodes.iter().enumerate() {
            for load in node.loads.iter().filter(|l| &l.case == case) {
                for (d, value) in load.force.as_array().iter().enumerate() {
                    f[6 * i + d] += value;
                }
            }
        }

        for element in &self.elements {
            if !element.loads().iter().any(|l| l.case() == case) {
                continue;
            }
            let fe = element.global_equivalent_nodal_loads(&self.nodes, case)?;
            for (k, dof) in element.global_dofs().into_iter().enumerate() {
                f[dof] += fe[k];
            }
        }
        Ok(f)
    }

    fn solve_load_cases(
        &self,
        result: &AnalysisResult,
        cases: &[LoadCase],
    ) -> FEAResult<std::vec::Vec<(LoadCase, CaseSolution)>> {
        #[cfg(feature = "parallel")]
        let cases = cases.par_iter();
        #[cfg(not(feature = "parallel"))]
        let cases = cases.iter();

        cases
            .map(|case| {
                let load = self.load_vector(case)?;
                Ok((case.clone(), result.solve_load(&load)))
            })
            .collect()
    }

    fn rebuild_connectivity(&mut self) {
        for node in &mut self.nodes {
            node.connected_elements.clear();
        }
        for (e, element) in self.elements.iter().enumerate() {
            for &n in &element.node_indices {
                if !self.nodes[n].connected_elements.contains(&e) {
                    self.nodes[n].connected_elements.push(e);
                }
            }
        }
    }

    // ========================
    // Results Methods
    // ========================

    /// Result of the last successful solve
    pub fn last_result(&self) -> FEAResult<&AnalysisResult> {
        self.last_result.as_ref().ok_or(FEAError::NotAnalyzed)
    }

    pub fn is_analyzed(&self) -> bool {
        self.last_result.is_some()
    }

    /// Number of successful solves, one Cholesky factorization each
    pub fn factorization_count(&self) -> usize {
        self.factorization_count
    }

    fn displacements_of(&self, indices: &[usize], case: &LoadCase) -> FEAResult<std::vec::Vec<Displacement>> {
        let d = self.last_result()?.displacement_vector(case)?;
        Ok(indices
            .iter()
            .map(|&i| Displacement::from_array(std::array::from_fn(|k| d[6 * i + k])))
            .collect())
    }

    /// Displacement of a node in global coordinates
    pub fn node_displacement(&self, label: &str, case: &LoadCase) -> FEAResult<Displacement> {
        let i = self.node_position(label)?;
        let mut disps = self.displacements_of(&[i], case)?;
        Ok(disps.remove(0))
    }

    /// Support reaction of a node in global coordinates (zero on free DOFs)
    pub fn node_reaction(&self, label: &str, case: &LoadCase) -> FEAResult<Force> {
        let i = self.node_position(label)?;
        let result = self.last_result()?;
        let reactions = result.reactions_vector(case)?;
        let map = result.dof_map();
        Ok(Force::from_array(std::array::from_fn(|k| {
            match map.slot(6 * i + k) {
                DofSlot::Fixed(j) => reactions[j],
                DofSlot::Free(_) => 0.0,
            }
        })))
    }

    /// Internal force of an element at an isoparametric point (local frame)
    pub fn element_internal_force_at(
        &self,
        label: &str,
        iso: &[f64],
        case: &LoadCase,
    ) -> FEAResult<Force> {
        let element = self.element(label)?;
        let global = self.displacements_of(&element.node_indices, case)?;
        element.internal_force_at(&self.nodes, &global, iso, case)
    }

    /// Displacement of an element at an isoparametric point (local frame)
    pub fn element_displacement_at(
        &self,
        label: &str,
        iso: &[f64],
        case: &LoadCase,
    ) -> FEAResult<Displacement> {
        let element = self.element(label)?;
        let global = self.displacements_of(&element.node_indices, case)?;
        element.displacement_at(&self.nodes, &global, iso, case)
    }

    /// Stress of an element at an isoparametric point (local frame)
    pub fn element_stress_at(
        &self,
        label: &str,
        iso: &[f64],
        case: &LoadCase,
    ) -> FEAResult<StressTensor> {
        let element = self.element(label)?;
        let global = self.displacements_of(&element.node_indices, case)?;
        element.stress_at(&self.nodes, &global, iso, case)
    }

    /// Get analysis summary
    pub fn summary(&self) -> FEAResult<AnalysisSummary> {
        let result = self.last_result()?;
        let map = result.dof_map();

        let mut cases: std::vec::Vec<&LoadCase> = result.load_cases().collect();
        cases.sort_by(|a, b| a.name.cmp(&b.name));

        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            total_dofs: map.total(),
            free_dofs: map.free_count(),
            fixed_dofs: map.fixed_count(),
            kff_nnz: result.kff_nnz(),
            factor_nnz: result.factor_nnz(),
            factorizations: self.factorization_count,
            load_cases: cases.iter().map(|c| c.name.clone()).collect(),
            ..Default::default()
        };

        for case in cases {
            let d = result.displacement_vector(case)?;
            for (i, node) in self.nodes.iter().enumerate() {
                let disp = Displacement::from_array(std::array::from_fn(|k| d[6 * i + k]));
                let magnitude = disp.translation_magnitude();
                if magnitude > summary.max_displacement {
                    summary.max_displacement = magnitude;
                    summary.max_disp_node = node.label.clone();
                }
            }
        }

        Ok(summary)
    }
}
