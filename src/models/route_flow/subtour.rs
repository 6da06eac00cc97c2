//! Subtour-elimination strategies.
//!
//! The Dantzig-Fulkerson-Johnson family has one constraint per truck per
//! non-empty customer subset, which grows as `2^|J| - 1` per truck. The
//! strategy trait lets callers choose between materializing all of them
//! upfront and separating violated cuts lazily between solver iterations.

use itertools::{iproduct, Itertools};
use log::{debug, trace};

use crate::milp::{Constr, ExprSum, Model, EPSILON};

use super::model::Variables;
use super::sets_and_parameters::Sets;

pub trait SubtourElimination {
    /// Append the strategy's upfront constraints to the model.
    fn attach(&self, sets: &Sets, vars: &Variables, model: &mut Model);

    /// Violated DFJ cuts for an incumbent assignment, to be appended by the
    /// caller and resolved. Empty when the incumbent contains no subtour.
    fn separate(&self, sets: &Sets, vars: &Variables, assignment: &[f64]) -> Vec<Constr>;
}

/// The reference baseline: every subset constraint, generated upfront.
pub struct DfjEnumeration;

impl SubtourElimination for DfjEnumeration {
    fn attach(&self, sets: &Sets, vars: &Variables, model: &mut Model) {
        for &h in &sets.H {
            let subsets = sets
                .J
                .iter()
                .copied()
                .powerset()
                .filter(|w| !w.is_empty());
            for (n, w) in subsets.enumerate() {
                let lhs = iproduct!(&w, &w)
                    .map(|(&j1, &j2)| vars.edge(h, sets.customer_loc(j1), sets.customer_loc(j2)))
                    .total();
                model.add_constr(Constr::le(
                    format!("subtour_{}_{}", h, n),
                    lhs,
                    w.len() as f64 - 1.0,
                ));
            }
        }
        trace!("attached all subset constraints for {} trucks", sets.H.len());
    }

    fn separate(&self, _sets: &Sets, _vars: &Variables, _assignment: &[f64]) -> Vec<Constr> {
        // The full family is already in the model.
        Vec::new()
    }
}

/// Lazy separation: no upfront constraints. The caller solves, feeds the
/// incumbent assignment back through [`SubtourElimination::separate`],
/// appends the returned cuts, and repeats until none are violated.
pub struct LazyDfj;

impl SubtourElimination for LazyDfj {
    fn attach(&self, _sets: &Sets, _vars: &Variables, _model: &mut Model) {}

    fn separate(&self, sets: &Sets, vars: &Variables, assignment: &[f64]) -> Vec<Constr> {
        let mut cuts = Vec::new();
        if sets.J.is_empty() {
            return cuts;
        }

        for &h in &sets.H {
            // Connected components of the selected customer-customer edges.
            let mut uf = partitions::partition_vec![(); sets.J.len()];
            for (&j1, &j2) in iproduct!(&sets.J, &sets.J) {
                if j1 == j2 {
                    continue;
                }
                let edge = vars.edge(h, sets.customer_loc(j1), sets.customer_loc(j2));
                if assignment[edge.index()] > 0.5 {
                    uf.union(j1, j2);
                }
            }

            for set in uf.all_sets() {
                let mut members: Vec<usize> = Vec::new();
                for (index, _) in set {
                    members.push(index);
                }
                let weight: f64 = iproduct!(&members, &members)
                    .map(|(&j1, &j2)| {
                        let edge =
                            vars.edge(h, sets.customer_loc(j1), sets.customer_loc(j2));
                        assignment[edge.index()]
                    })
                    .sum();

                // A component confined to customers carries |W| internal
                // edges; a depot-anchored path carries at most |W| - 1.
                if weight > members.len() as f64 - 1.0 + EPSILON {
                    let lhs = iproduct!(&members, &members)
                        .map(|(&j1, &j2)| {
                            vars.edge(h, sets.customer_loc(j1), sets.customer_loc(j2))
                        })
                        .total();
                    debug!(
                        "violated subtour for truck {} over {} customers",
                        h,
                        members.len()
                    );
                    cuts.push(Constr::le(
                        format!("subtour_cut_{}_{}", h, cuts.len()),
                        lhs,
                        members.len() as f64 - 1.0,
                    ));
                }
            }
        }

        cuts
    }
}
