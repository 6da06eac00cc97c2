//! A solver-independent representation of a mixed-integer linear program.
//!
//! The formulation engine assembles one [`Model`] holding the variable
//! registry, the objective, and the constraint list in construction order.
//! The artifact is handed to an external solver as-is, either through the
//! in-memory structures or through [`Model::write_lp`].

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Tolerance used when checking constraints against a candidate assignment.
pub const EPSILON: f64 = 1e-5;

/// Handle to a variable in a [`Model`]. The wrapped value is the position of
/// the variable in the model's registry, so handles double as indices into a
/// solver's assignment vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(usize);

impl Var {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Binary,
    Integer,
    Continuous,
}

/// Metadata for a single registered variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    vtype: VarType,
    lb: f64,
    ub: f64,
}

impl Variable {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn vtype(&self) -> VarType {
        self.vtype
    }

    pub fn lb(&self) -> f64 {
        self.lb
    }

    pub fn ub(&self) -> f64 {
        self.ub
    }
}

/// A linear expression over registered variables.
///
/// Terms are kept in a `BTreeMap` keyed on the variable handle, so iteration
/// order is deterministic and two expressions built from the same inputs
/// compare equal term-for-term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: BTreeMap<Var, f64>,
    constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(coeff: f64, var: Var) -> Self {
        let mut expr = Self::new();
        expr.add_term(coeff, var);
        expr
    }

    /// Accumulate `coeff * var` into the expression.
    pub fn add_term(&mut self, coeff: f64, var: Var) {
        *self.terms.entry(var).or_insert(0.0) += coeff;
    }

    pub fn coeff(&self, var: Var) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.constant == 0.0
    }

    /// Evaluate the expression under an assignment indexed by `Var::index`.
    pub fn value(&self, assignment: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(v, c)| c * assignment[v.index()])
                .sum::<f64>()
    }
}

impl From<Var> for LinExpr {
    fn from(var: Var) -> Self {
        LinExpr::term(1.0, var)
    }
}

impl Mul<Var> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: Var) -> LinExpr {
        LinExpr::term(self, rhs)
    }
}

impl Mul<LinExpr> for f64 {
    type Output = LinExpr;

    fn mul(self, mut rhs: LinExpr) -> LinExpr {
        for coeff in rhs.terms.values_mut() {
            *coeff *= self;
        }
        rhs.constant *= self;
        rhs
    }
}

impl AddAssign for LinExpr {
    fn add_assign(&mut self, rhs: Self) {
        for (var, coeff) in rhs.terms {
            *self.terms.entry(var).or_insert(0.0) += coeff;
        }
        self.constant += rhs.constant;
    }
}

impl SubAssign for LinExpr {
    fn sub_assign(&mut self, rhs: Self) {
        for (var, coeff) in rhs.terms {
            *self.terms.entry(var).or_insert(0.0) -= coeff;
        }
        self.constant -= rhs.constant;
    }
}

impl Add for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: Self) -> LinExpr {
        self += rhs;
        self
    }
}

impl Sub for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: Self) -> LinExpr {
        self -= rhs;
        self
    }
}

impl Sum for LinExpr {
    fn sum<I: Iterator<Item = LinExpr>>(iter: I) -> Self {
        let mut total = LinExpr::new();
        for expr in iter {
            total += expr;
        }
        total
    }
}

/// Sum an iterator of expressions (or bare variables) into one expression.
pub trait ExprSum {
    fn total(self) -> LinExpr;
}

impl<I, E> ExprSum for I
where
    I: IntoIterator<Item = E>,
    E: Into<LinExpr>,
{
    fn total(self) -> LinExpr {
        let mut sum = LinExpr::new();
        for expr in self {
            sum += expr.into();
        }
        sum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstrSense {
    Le,
    Ge,
    Eq,
}

/// A linear constraint `expr (<=|>=|=) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constr {
    name: String,
    expr: LinExpr,
    sense: ConstrSense,
    rhs: f64,
}

impl Constr {
    pub fn le(name: impl Into<String>, expr: LinExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense: ConstrSense::Le,
            rhs,
        }
    }

    pub fn ge(name: impl Into<String>, expr: LinExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense: ConstrSense::Ge,
            rhs,
        }
    }

    pub fn eq(name: impl Into<String>, expr: LinExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense: ConstrSense::Eq,
            rhs,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn expr(&self) -> &LinExpr {
        &self.expr
    }

    pub fn sense(&self) -> ConstrSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Whether the assignment satisfies the constraint, up to [`EPSILON`].
    pub fn satisfied_by(&self, assignment: &[f64]) -> bool {
        let lhs = self.expr.value(assignment);
        match self.sense {
            ConstrSense::Le => lhs <= self.rhs + EPSILON,
            ConstrSense::Ge => lhs >= self.rhs - EPSILON,
            ConstrSense::Eq => (lhs - self.rhs).abs() <= EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

/// The assembled model: variable registry, objective, and constraints in
/// construction order. Immutable once handed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    vars: Vec<Variable>,
    objective: LinExpr,
    sense: ObjectiveSense,
    constrs: Vec<Constr>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            objective: LinExpr::new(),
            sense: ObjectiveSense::Minimize,
            constrs: Vec::new(),
        }
    }

    pub fn add_var(&mut self, name: String, vtype: VarType, lb: f64, ub: f64) -> Var {
        let var = Var(self.vars.len());
        self.vars.push(Variable {
            name,
            vtype,
            lb,
            ub,
        });
        var
    }

    pub fn add_constr(&mut self, constr: Constr) {
        self.constrs.push(constr);
    }

    pub fn set_objective(&mut self, expr: LinExpr, sense: ObjectiveSense) {
        self.objective = expr;
        self.sense = sense;
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, var: Var) -> &Variable {
        &self.vars[var.index()]
    }

    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn constrs(&self) -> &[Constr] {
        &self.constrs
    }

    pub fn objective_value(&self, assignment: &[f64]) -> f64 {
        self.objective.value(assignment)
    }

    /// Whether the assignment satisfies every constraint and every variable
    /// bound. Integrality is not checked.
    pub fn is_feasible(&self, assignment: &[f64]) -> bool {
        let bounds_ok = self.vars.iter().enumerate().all(|(i, v)| {
            assignment[i] >= v.lb - EPSILON && assignment[i] <= v.ub + EPSILON
        });
        bounds_ok && self.constrs.iter().all(|c| c.satisfied_by(assignment))
    }

    /// Write the model in CPLEX LP format.
    pub fn write_lp<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\\ Problem: {}", self.name)?;
        match self.sense {
            ObjectiveSense::Minimize => writeln!(out, "Minimize")?,
            ObjectiveSense::Maximize => writeln!(out, "Maximize")?,
        }
        write!(out, " obj:")?;
        write_expr(out, &self.objective, &self.vars)?;
        writeln!(out)?;

        writeln!(out, "Subject To")?;
        for constr in &self.constrs {
            write!(out, " {}:", constr.name)?;
            write_expr(out, &constr.expr, &self.vars)?;
            let op = match constr.sense {
                ConstrSense::Le => "<=",
                ConstrSense::Ge => ">=",
                ConstrSense::Eq => "=",
            };
            writeln!(out, " {} {}", op, constr.rhs - constr.expr.constant())?;
        }

        writeln!(out, "Bounds")?;
        for var in &self.vars {
            if var.vtype == VarType::Binary {
                continue;
            }
            match (var.lb, var.ub) {
                (lb, ub) if lb == f64::NEG_INFINITY && ub == f64::INFINITY => {
                    writeln!(out, " {} free", var.name)?
                }
                (lb, ub) if ub == f64::INFINITY => writeln!(out, " {} >= {}", var.name, lb)?,
                (lb, ub) => writeln!(out, " {} <= {} <= {}", lb, var.name, ub)?,
            }
        }

        let generals: Vec<_> = self
            .vars
            .iter()
            .filter(|v| v.vtype == VarType::Integer)
            .collect();
        if !generals.is_empty() {
            writeln!(out, "Generals")?;
            for var in generals {
                writeln!(out, " {}", var.name)?;
            }
        }

        let binaries: Vec<_> = self
            .vars
            .iter()
            .filter(|v| v.vtype == VarType::Binary)
            .collect();
        if !binaries.is_empty() {
            writeln!(out, "Binaries")?;
            for var in binaries {
                writeln!(out, " {}", var.name)?;
            }
        }

        writeln!(out, "End")
    }
}

fn write_expr<W: Write>(out: &mut W, expr: &LinExpr, vars: &[Variable]) -> io::Result<()> {
    let mut first = true;
    for (var, coeff) in expr.terms() {
        if coeff == 0.0 {
            continue;
        }
        let sign = if coeff < 0.0 {
            "-"
        } else if first {
            ""
        } else {
            "+"
        };
        write!(out, " {} {} {}", sign, coeff.abs(), vars[var.index()].name)?;
        first = false;
    }
    if first {
        write!(out, " 0")?;
    }
    Ok(())
}
