//! Gauss-Legendre quadrature over the isoparametric reference domains
//!
//! Lines use ξ ∈ [-1, 1]. Triangles and tetrahedra are integrated over the
//! unit simplex by collapsing a unit square/cube onto it (Duffy mapping),
//! so every domain is served by the same one-dimensional rule family:
//!
//! - triangle: ξ = u, η = v (1 - u), dA = (1 - u) du dv
//! - tetrahedron: ξ = u, η = v (1 - u), ζ = w (1 - u)(1 - v),
//!   dV = (1 - u)^2 (1 - v) du dv dw

use std::f64::consts::PI;

use super::Mat;
use crate::error::FEAResult;

/// Reference domain of an isoparametric element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationDomain {
    /// ξ ∈ [-1, 1]
    Line,
    /// Unit triangle (0,0), (1,0), (0,1)
    Triangle,
    /// Unit tetrahedron (0,0,0), (1,0,0), (0,1,0), (0,0,1)
    Tetrahedron,
}

impl IntegrationDomain {
    /// Number of isoparametric coordinates
    pub fn dimension(&self) -> usize {
        match self {
            Self::Line => 1,
            Self::Triangle => 2,
            Self::Tetrahedron => 3,
        }
    }
}

/// Number of Gauss points that integrates a polynomial of `order` exactly
#[inline]
pub fn points_for_order(order: usize) -> usize {
    order / 2 + 1
}

/// 1D Gauss-Legendre points and weights on [-1, 1], in ascending order
pub fn gauss_legendre(n: usize) -> Vec<(f64, f64)> {
    match n {
        0 | 1 => vec![(0.0, 2.0)],
        2 => {
            let p = 1.0 / 3.0_f64.sqrt();
            vec![(-p, 1.0), (p, 1.0)]
        }
        3 => {
            let p = (3.0 / 5.0_f64).sqrt();
            vec![(-p, 5.0 / 9.0), (0.0, 8.0 / 9.0), (p, 5.0 / 9.0)]
        }
        _ => newton_legendre(n),
    }
}

/// Legendre polynomial P_n and its derivative at `x`
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let kf = k as f64;
        let p_next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = p_next;
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

fn newton_legendre(n: usize) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre(n, x);
        points.push((x, 2.0 / ((1.0 - x * x) * dp * dp)));
    }
    points.reverse();
    points
}

/// Gauss points mapped to [0, 1]
fn unit_interval(n: usize) -> Vec<(f64, f64)> {
    gauss_legendre(n)
        .into_iter()
        .map(|(x, w)| ((x + 1.0) / 2.0, w / 2.0))
        .collect()
}

/// Quadrature points `(iso coordinates, weight)` over a reference domain
///
/// `orders` holds the polynomial order of the integrand in each
/// isoparametric direction; only the first `domain.dimension()` entries are
/// used. For simplices the highest order governs every direction and the
/// Duffy Jacobian raises the order of the collapsed directions.
pub fn quadrature(domain: IntegrationDomain, orders: [usize; 3]) -> Vec<(Vec<f64>, f64)> {
    match domain {
        IntegrationDomain::Line => gauss_legendre(points_for_order(orders[0]))
            .into_iter()
            .map(|(xi, w)| (vec![xi], w))
            .collect(),
        IntegrationDomain::Triangle => {
            let p = orders[0].max(orders[1]);
            let us = unit_interval(points_for_order(p + 1));
            let vs = unit_interval(points_for_order(p));
            let mut points = Vec::with_capacity(us.len() * vs.len());
            for &(u, wu) in &us {
                for &(v, wv) in &vs {
                    points.push((vec![u, v * (1.0 - u)], wu * wv * (1.0 - u)));
                }
            }
            points
        }
        IntegrationDomain::Tetrahedron => {
            let p = orders.iter().copied().max().unwrap_or(0);
            let us = unit_interval(points_for_order(p + 2));
            let vs = unit_interval(points_for_order(p + 1));
            let ws = unit_interval(points_for_order(p));
            let mut points = Vec::with_capacity(us.len() * vs.len() * ws.len());
            for &(u, wu) in &us {
                for &(v, wv) in &vs {
                    for &(w, ww) in &ws {
                        let iso = vec![u, v * (1.0 - u), w * (1.0 - u) * (1.0 - v)];
                        let jac = (1.0 - u) * (1.0 - u) * (1.0 - v);
                        points.push((iso, wu * wv * ww * jac));
                    }
                }
            }
            points
        }
    }
}

/// Integrate a matrix-valued function over a reference domain
///
/// The integrand is evaluated at every quadrature point and may fail, in
/// which case the first error is returned.
pub fn integrate<F>(domain: IntegrationDomain, orders: [usize; 3], mut integrand: F) -> FEAResult<Mat>
where
    F: FnMut(&[f64]) -> FEAResult<Mat>,
{
    let mut sum: Option<Mat> = None;
    for (iso, weight) in quadrature(domain, orders) {
        let value = integrand(&iso)? * weight;
        sum = Some(match sum {
            Some(acc) => acc + value,
            None => value,
        });
    }
    Ok(sum.unwrap_or_else(|| Mat::zeros(0, 0)))
}
