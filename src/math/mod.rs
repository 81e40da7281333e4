//! Mathematical utilities for FEA calculations

pub mod gauss;
pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::error::{FEAError, FEAResult};

// Re-export sparse utilities
pub use sparse::{
    minimum_degree, reverse_cuthill_mckee, ColumnOrdering, PartitionedStiffness,
    SparseCholeskySolver, SparseMatrixBuilder,
};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// Compute the direction cosine matrix of a two-node frame element
///
/// Rows of the returned matrix are the local x, y and z axes expressed in
/// global coordinates, so `local = lambda * global`.
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
/// * `rotation` - Web rotation about the longitudinal axis (radians)
///
/// Axis conventions:
/// - vertical members: y in the XY plane (-X pointing up, +X pointing down), z = global Z
/// - horizontal members: y = global Y, z = x cross y
/// - inclined members: z horizontal and perpendicular to x, y = z cross x
pub fn frame_lambda(i_node: &Vec3, j_node: &Vec3, rotation: f64) -> FEAResult<Mat3> {
    let d = j_node - i_node;
    let length = d.norm();

    if length < 1e-10 {
        return Err(FEAError::InvalidTopology(format!(
            "frame element has zero length between ({}, {}, {}) and ({}, {}, {})",
            i_node.x, i_node.y, i_node.z, j_node.x, j_node.y, j_node.z
        )));
    }

    let x = d / length;

    let (y, z) = if x.x.abs() < 1e-10 && x.z.abs() < 1e-10 {
        if x.y > 0.0 {
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0))
        } else {
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0))
        }
    } else if d.y.abs() < 1e-10 {
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y).normalize();
        (y, z)
    } else {
        // Projection of the member on the global XZ plane
        let proj = Vec3::new(d.x, 0.0, d.z);
        let z = if x.y > 0.0 {
            proj.cross(&x)
        } else {
            x.cross(&proj)
        }
        .normalize();
        let y = z.cross(&x).normalize();
        (y, z)
    };

    let (y, z) = if rotation.abs() > 1e-10 {
        let (sin_r, cos_r) = rotation.sin_cos();
        (y * cos_r + z * sin_r, -y * sin_r + z * cos_r)
    } else {
        (y, z)
    };

    Ok(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
}

/// Direction cosine matrix of a flat three-node element
///
/// Local x runs from node 0 to node 1, local z is the plane normal
/// following the node winding.
pub fn triangle_lambda(p0: &Vec3, p1: &Vec3, p2: &Vec3) -> FEAResult<Mat3> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let normal = e1.cross(&e2);

    let scale = e1.norm().max(e2.norm());
    if e1.norm() < 1e-10 || normal.norm() <= 1e-12 * scale * scale {
        return Err(FEAError::InvalidTopology(
            "triangle nodes are coincident or collinear".to_string(),
        ));
    }

    let x = e1.normalize();
    let z = normal.normalize();
    let y = z.cross(&x);

    Ok(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
}

/// Block-diagonal transformation with `blocks` copies of `lambda`
///
/// With six DOFs per node an element of `n` nodes needs `2 * n` blocks
/// (one for the translations and one for the rotations of each node).
pub fn block_transformation(lambda: &Mat3, blocks: usize) -> Mat {
    let mut t = Mat::zeros(3 * blocks, 3 * blocks);
    for b in 0..blocks {
        let offset = 3 * b;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(lambda);
    }
    t
}

/// Split the indices of an `n`-sized space into kept and released lists
fn split_released(n: usize, released: &[usize]) -> (std::vec::Vec<usize>, std::vec::Vec<usize>) {
    let kept = (0..n).filter(|i| !released.contains(i)).collect();
    let mut released = released.to_vec();
    released.sort_unstable();
    released.dedup();
    (kept, released)
}

fn released_block_inverse(k: &Mat, released: &[usize]) -> FEAResult<Mat> {
    let k22 = k.select_rows(released).select_columns(released);
    k22.try_inverse().ok_or_else(|| {
        FEAError::InvalidTopology(
            "released degrees of freedom have no stiffness to condense".to_string(),
        )
    })
}

/// Static condensation of released DOFs out of a stiffness matrix
///
/// Returns a matrix of the same size with zero rows and columns at the
/// released DOFs: `k11 - k12 * inv(k22) * k21` on the kept DOFs.
pub fn condense_stiffness(k: &Mat, released: &[usize]) -> FEAResult<Mat> {
    if released.is_empty() {
        return Ok(k.clone());
    }

    let (kept, released) = split_released(k.nrows(), released);
    let k22_inv = released_block_inverse(k, &released)?;

    let k11 = k.select_rows(&kept).select_columns(&kept);
    let k12 = k.select_rows(&kept).select_columns(&released);
    let k21 = k.select_rows(&released).select_columns(&kept);
    let condensed = &k11 - &k12 * &k22_inv * &k21;

    let mut result = Mat::zeros(k.nrows(), k.ncols());
    for (i, &ki) in kept.iter().enumerate() {
        for (j, &kj) in kept.iter().enumerate() {
            result[(ki, kj)] = condensed[(i, j)];
        }
    }
    Ok(result)
}

/// Static condensation of a nodal load vector: `f1 - k12 * inv(k22) * f2`
///
/// Works for equivalent nodal loads and fixed end reactions alike.
pub fn condense_loads(f: &Vec, k: &Mat, released: &[usize]) -> FEAResult<Vec> {
    if released.is_empty() {
        return Ok(f.clone());
    }

    let (kept, released) = split_released(k.nrows(), released);
    let k22_inv = released_block_inverse(k, &released)?;

    let k12 = k.select_rows(&kept).select_columns(&released);
    let f1 = f.select_rows(&kept);
    let f2 = f.select_rows(&released);
    let condensed = &f1 - &k12 * &k22_inv * &f2;

    let mut result = Vec::zeros(f.len());
    for (i, &ki) in kept.iter().enumerate() {
        result[ki] = condensed[i];
    }
    Ok(result)
}

/// Recover the released DOFs of a condensed element
///
/// Given the element displacements `u` (released entries ignored) and the
/// fixed end reactions `fer` of the loads on the element, the released DOFs
/// satisfy `k21 u1 + k22 u2 + fer2 = 0`.
pub fn recover_released(u: &Vec, k: &Mat, fer: &Vec, released: &[usize]) -> FEAResult<Vec> {
    if released.is_empty() {
        return Ok(u.clone());
    }

    let (kept, released) = split_released(k.nrows(), released);
    let k22_inv = released_block_inverse(k, &released)?;

    let k21 = k.select_rows(&released).select_columns(&kept);
    let u1 = u.select_rows(&kept);
    let fer2 = fer.select_rows(&released);
    let u2 = -(&k22_inv * (&k21 * &u1 + &fer2));

    let mut result = u.clone();
    for (i, &ri) in released.iter().enumerate() {
        result[ri] = u2[i];
    }
    Ok(result)
}
