//! Derivative-free minimisation for smoothing coefficients
//!
//! Contains:
//! - Coarse grid search, used to pick a starting point
//! - Box-bounded Nelder-Mead simplex search

use crate::{MathError, Result};

/// Best point found by a search
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Coordinates of the best point
    pub point: Vec<f64>,
    /// Objective value at the best point
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
}

/// Evaluate `objective` on the cartesian product of `axes` and keep the best point
pub fn grid_search<F>(objective: F, axes: &[Vec<f64>]) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    if axes.is_empty() || axes.iter().any(|axis| axis.is_empty()) {
        return Err(MathError::InvalidInput(
            "Grid axes must be non-empty".to_string(),
        ));
    }

    let mut best: Option<Minimum> = None;
    let mut indices = vec![0usize; axes.len()];
    let mut evaluations = 0;

    loop {
        let point: Vec<f64> = indices.iter().zip(axes).map(|(&i, axis)| axis[i]).collect();
        let value = finite_or_max(objective(&point));
        evaluations += 1;

        if best.as_ref().map_or(true, |b| value < b.value) {
            best = Some(Minimum {
                point,
                value,
                iterations: evaluations,
            });
        }

        // Odometer-style advance over the grid
        let mut dim = 0;
        loop {
            indices[dim] += 1;
            if indices[dim] < axes[dim].len() {
                break;
            }
            indices[dim] = 0;
            dim += 1;
            if dim == axes.len() {
                let mut found = best.ok_or_else(|| {
                    MathError::CalculationError("Grid search evaluated no points".to_string())
                })?;
                found.iterations = evaluations;
                return Ok(found);
            }
        }
    }
}

/// Nelder-Mead simplex search restricted to a box
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    tolerance: f64,
    initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

impl NelderMead {
    /// Create a new search with the given iteration cap and convergence tolerance
    pub fn new(max_iterations: usize, tolerance: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(MathError::InvalidInput(
                "Iteration cap must be greater than zero".to_string(),
            ));
        }
        if tolerance <= 0.0 || !tolerance.is_finite() {
            return Err(MathError::InvalidInput(
                "Tolerance must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            max_iterations,
            tolerance,
            ..Self::default()
        })
    }

    /// Minimise `objective` from `start`, keeping every coordinate inside `bounds`
    pub fn minimize<F>(&self, objective: F, start: &[f64], bounds: &[(f64, f64)]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = start.len();
        if n == 0 {
            return Err(MathError::InvalidInput(
                "Start point must have at least one dimension".to_string(),
            ));
        }
        if bounds.len() != n {
            return Err(MathError::InvalidInput(format!(
                "Bounds length ({}) doesn't match start point length ({})",
                bounds.len(),
                n
            )));
        }
        if bounds.iter().any(|(lo, hi)| !(lo <= hi)) {
            return Err(MathError::InvalidInput(
                "Each lower bound must not exceed its upper bound".to_string(),
            ));
        }

        let clamp = |p: Vec<f64>| -> Vec<f64> {
            p.into_iter()
                .zip(bounds)
                .map(|(x, &(lo, hi))| x.clamp(lo, hi))
                .collect()
        };
        let eval = |p: &[f64]| finite_or_max(objective(p));

        // Initial simplex: start plus one step along each axis, stepping
        // inwards when the outward step would leave the box.
        let origin = clamp(start.to_vec());
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((origin.clone(), eval(&origin)));
        for dim in 0..n {
            let mut vertex = origin.clone();
            let (lo, hi) = bounds[dim];
            vertex[dim] = if vertex[dim] + self.initial_step <= hi {
                vertex[dim] + self.initial_step
            } else {
                (vertex[dim] - self.initial_step).max(lo)
            };
            let value = eval(&vertex);
            simplex.push((vertex, value));
        }

        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            let best = simplex[0].1;
            let worst = simplex[n].1;
            if (worst - best).abs() <= self.tolerance * (1.0 + best.abs()) {
                break;
            }

            let centroid: Vec<f64> = (0..n)
                .map(|d| simplex[..n].iter().map(|(p, _)| p[d]).sum::<f64>() / n as f64)
                .collect();
            let worst_point = simplex[n].0.clone();
            let along = |coef: f64| -> Vec<f64> {
                clamp(
                    centroid
                        .iter()
                        .zip(&worst_point)
                        .map(|(c, w)| c + coef * (c - w))
                        .collect(),
                )
            };

            let reflected = along(1.0);
            let reflected_value = eval(&reflected);

            if reflected_value < best {
                let expanded = along(2.0);
                let expanded_value = eval(&expanded);
                simplex[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < simplex[n - 1].1 {
                simplex[n] = (reflected, reflected_value);
                continue;
            }

            let contracted = if reflected_value < worst {
                along(0.5)
            } else {
                along(-0.5)
            };
            let contracted_value = eval(&contracted);
            if contracted_value < reflected_value.min(worst) {
                simplex[n] = (contracted, contracted_value);
                continue;
            }

            // Shrink towards the best vertex
            let anchor = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk: Vec<f64> = anchor
                    .iter()
                    .zip(&vertex.0)
                    .map(|(a, v)| a + 0.5 * (v - a))
                    .collect();
                let value = eval(&shrunk);
                *vertex = (shrunk, value);
            }
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (point, value) = simplex.swap_remove(0);

        if value == f64::MAX {
            return Err(MathError::CalculationError(
                "Objective is not finite anywhere on the search path".to_string(),
            ));
        }

        Ok(Minimum {
            point,
            value,
            iterations,
        })
    }
}

fn finite_or_max(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::MAX
    }
}
