//! The route-flow MILP formulation of the multi-depot VRP.
//!
//! `sets_and_parameters` normalizes a validated [`crate::problem::Problem`]
//! into index sets and dense parameters; `model` builds the variables,
//! objective, and constraint families; `subtour` holds the pluggable
//! subtour-elimination strategies.

pub mod model;
pub mod sets_and_parameters;
pub mod subtour;
