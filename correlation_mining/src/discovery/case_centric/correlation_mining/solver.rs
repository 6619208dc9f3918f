//! Linear programming capability used by the causality resolver
//!
//! The resolver only needs "maximize a linear objective under upper-bounded linear
//! constraints with non-negative variables". [`LinearSolver`] abstracts this so that an
//! exact solver ([`SimplexSolver`]) and a heuristic one ([`GreedySolver`]) can be swapped
//! without touching the rest of the pipeline.

use std::fmt::Debug;

use nalgebra::{DMatrix, DVector};

/// Values with a smaller magnitude are treated as zero
pub(crate) const EPSILON: f64 = 1e-9;

/// Errors of a [`LinearSolver`]
///
/// These are recovered by the causality resolver (which falls back to thresholding), they
/// never surface from the public discovery functions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// The objective can be increased without limit
    #[error("linear program is unbounded")]
    Unbounded,
    /// No feasible starting point (e.g., a negative upper bound)
    #[error("linear program is infeasible: {0}")]
    Infeasible(String),
    /// The solver gave up after the given number of pivots
    #[error("no optimum found within {limit} iterations")]
    IterationLimit {
        /// Iteration limit that was hit
        limit: usize,
    },
    /// NaN or infinite values in the input or the solution
    #[error("non-finite value encountered")]
    NonFinite,
    /// A constraint refers to a variable that does not exist
    #[error("constraint {constraint} refers to variable {variable}, but there are only {num_variables} variables")]
    DimensionMismatch {
        /// Constraint index
        constraint: usize,
        /// Variable index used by the constraint
        variable: usize,
        /// Number of variables of the program
        num_variables: usize,
    },
    /// The program is outside the class the solver can handle
    #[error("unsupported linear program: {0}")]
    Unsupported(String),
}

/// A constraint `Σ coefficient * x[variable] <= upper_bound`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Sparse `(variable, coefficient)` pairs
    pub coefficients: Vec<(usize, f64)>,
    /// Right-hand side
    pub upper_bound: f64,
}

/// Maximize `objective · x` subject to all `constraints` and `x >= 0`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearProgram {
    /// Objective coefficient per variable
    pub objective: Vec<f64>,
    /// Upper-bounded constraints
    pub constraints: Vec<LinearConstraint>,
}

impl LinearProgram {
    /// Number of variables
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Check that all values are finite, all variable indices exist and all bounds are non-negative
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(SolverError::NonFinite);
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.upper_bound.is_finite() {
                return Err(SolverError::NonFinite);
            }
            if constraint.upper_bound < 0.0 {
                return Err(SolverError::Infeasible(format!(
                    "constraint {index} has negative upper bound {}",
                    constraint.upper_bound
                )));
            }
            for &(variable, coefficient) in &constraint.coefficients {
                if variable >= self.num_variables() {
                    return Err(SolverError::DimensionMismatch {
                        constraint: index,
                        variable,
                        num_variables: self.num_variables(),
                    });
                }
                if !coefficient.is_finite() {
                    return Err(SolverError::NonFinite);
                }
            }
        }
        Ok(())
    }
}

/// Capability: "given linear constraints and an objective, return an optimal (or at least feasible) assignment"
pub trait LinearSolver: Debug {
    /// Short name (used in logs)
    fn name(&self) -> &'static str;
    /// Solve `program`, returning one value per variable
    fn maximize(&self, program: &LinearProgram) -> Result<Vec<f64>, SolverError>;
}

///
/// Exact solver: primal simplex on a dense tableau
///
/// Starts from the all-slack basis (feasible since all bounds are non-negative) and uses
/// Bland's rule, so it always terminates and the result is deterministic.
///
#[derive(Debug, Clone, Default)]
pub struct SimplexSolver {
    /// Maximum number of pivots (derived from the problem size if `None`)
    pub max_iterations: Option<usize>,
}

impl SimplexSolver {
    fn iteration_limit(&self, num_rows: usize, num_cols: usize) -> usize {
        self.max_iterations
            .unwrap_or(1_000 + 50 * (num_rows + num_cols))
    }
}

/// Gauss-Jordan step making column `col` the unit vector of row `row`
///
/// Eliminates column by column, as the tableau is stored column-major.
fn pivot(tableau: &mut DMatrix<f64>, row: usize, col: usize) {
    let pivot_value = tableau[(row, col)];
    for c in 0..tableau.ncols() {
        tableau[(row, c)] /= pivot_value;
    }
    let factors: DVector<f64> = tableau.column(col).clone_owned();
    for c in 0..tableau.ncols() {
        let scale = tableau[(row, c)];
        if scale == 0.0 {
            continue;
        }
        let mut column = tableau.column_mut(c);
        column.axpy(-scale, &factors, 1.0);
        column[row] = scale;
        for v in column.iter_mut() {
            if v.abs() < EPSILON {
                *v = 0.0;
            }
        }
    }
}

impl LinearSolver for SimplexSolver {
    fn name(&self) -> &'static str {
        "simplex"
    }

    fn maximize(&self, program: &LinearProgram) -> Result<Vec<f64>, SolverError> {
        program.validate()?;
        let k = program.num_variables();
        let m = program.constraints.len();
        if k == 0 {
            return Ok(Vec::new());
        }
        // Layout: [structural | slack | rhs], objective row last
        let rhs = k + m;
        let mut tableau = DMatrix::<f64>::zeros(m + 1, k + m + 1);
        for (row, constraint) in program.constraints.iter().enumerate() {
            for &(variable, coefficient) in &constraint.coefficients {
                tableau[(row, variable)] += coefficient;
            }
            tableau[(row, k + row)] = 1.0;
            tableau[(row, rhs)] = constraint.upper_bound;
        }
        for (variable, &c) in program.objective.iter().enumerate() {
            tableau[(m, variable)] = -c;
        }
        let mut basis: Vec<usize> = (k..k + m).collect();

        let limit = self.iteration_limit(m, k);
        for _ in 0..limit {
            let Some(entering) = (0..k + m).find(|&col| tableau[(m, col)] < -EPSILON) else {
                let mut solution = vec![0.0; k];
                for (row, &variable) in basis.iter().enumerate() {
                    if variable < k {
                        solution[variable] = tableau[(row, rhs)].max(0.0);
                    }
                }
                if solution.iter().any(|v| !v.is_finite()) {
                    return Err(SolverError::NonFinite);
                }
                return Ok(solution);
            };

            let mut leaving: Option<(usize, f64)> = None;
            for row in 0..m {
                let a = tableau[(row, entering)];
                if a <= EPSILON {
                    continue;
                }
                let ratio = tableau[(row, rhs)] / a;
                leaving = match leaving {
                    Some((best, best_ratio))
                        if ratio > best_ratio + EPSILON
                            || (ratio >= best_ratio - EPSILON && basis[row] > basis[best]) =>
                    {
                        Some((best, best_ratio))
                    }
                    _ => Some((row, ratio)),
                };
            }
            let Some((pivot_row, _)) = leaving else {
                return Err(SolverError::Unbounded);
            };
            pivot(&mut tableau, pivot_row, entering);
            basis[pivot_row] = entering;
            // Only the pivot row and the right-hand side can pick up a division by a tiny pivot
            if tableau.row(pivot_row).iter().any(|v| !v.is_finite())
                || tableau.column(rhs).iter().any(|v| !v.is_finite())
            {
                return Err(SolverError::NonFinite);
            }
        }
        Err(SolverError::IterationLimit { limit })
    }
}

///
/// Heuristic solver for packing programs (non-negative constraint coefficients)
///
/// Variables are visited by descending objective coefficient (ties by index) and each is
/// raised as far as the remaining capacity of its constraints allows. Runs in
/// `O(v log v + nnz)`, yields a feasible (not necessarily optimal) assignment.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl LinearSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn maximize(&self, program: &LinearProgram) -> Result<Vec<f64>, SolverError> {
        program.validate()?;
        let k = program.num_variables();
        let mut constraints_of: Vec<Vec<(usize, f64)>> = vec![Vec::new(); k];
        for (index, constraint) in program.constraints.iter().enumerate() {
            for &(variable, coefficient) in &constraint.coefficients {
                if coefficient < 0.0 {
                    return Err(SolverError::Unsupported(format!(
                        "negative coefficient in constraint {index}"
                    )));
                }
                if coefficient > 0.0 {
                    constraints_of[variable].push((index, coefficient));
                }
            }
        }

        let mut remaining: Vec<f64> = program
            .constraints
            .iter()
            .map(|c| c.upper_bound)
            .collect();
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| {
            program.objective[b]
                .total_cmp(&program.objective[a])
                .then(a.cmp(&b))
        });

        let mut solution = vec![0.0; k];
        for variable in order {
            if program.objective[variable] <= 0.0 {
                break;
            }
            let value = constraints_of[variable]
                .iter()
                .map(|&(index, coefficient)| remaining[index] / coefficient)
                .min_by(f64::total_cmp)
                .ok_or(SolverError::Unbounded)?;
            if value <= EPSILON {
                continue;
            }
            for &(index, coefficient) in &constraints_of[variable] {
                remaining[index] = (remaining[index] - coefficient * value).max(0.0);
            }
            solution[variable] = value;
        }
        Ok(solution)
    }
}
