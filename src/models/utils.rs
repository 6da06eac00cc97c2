use crate::milp::{Model, Var, VarType};
use std::ops::Range;

/// Allocate a family of variables shaped after a tuple of dimensions.
///
/// `(trucks, customers, products).integer(&mut model, "u")` registers one
/// integer variable per index triple and returns them as nested `Vec`s, so
/// a variable is addressable as `u[h][j][k]` in O(1).
pub trait AddVars {
    type Out;

    /// Create a variable for any type
    fn vars(
        &self,
        model: &mut Model,
        base_name: &str,
        vtype: VarType,
        bounds: &Range<f64>,
    ) -> Self::Out;

    /// Binary variables
    fn binary(&self, model: &mut Model, base_name: &str) -> Self::Out {
        self.vars(model, base_name, VarType::Binary, &(0.0..1.0))
    }

    /// Non-negative integer variables without an upper bound
    fn integer(&self, model: &mut Model, base_name: &str) -> Self::Out {
        self.vars(model, base_name, VarType::Integer, &(0.0..f64::INFINITY))
    }

    /// A continuous non-negative variable
    fn cont(&self, model: &mut Model, base_name: &str) -> Self::Out {
        self.vars(model, base_name, VarType::Continuous, &(0.0..f64::INFINITY))
    }
}

impl AddVars for usize {
    type Out = Vec<Var>;

    fn vars(
        &self,
        model: &mut Model,
        base_name: &str,
        vtype: VarType,
        bounds: &Range<f64>,
    ) -> Self::Out {
        let mut vec = Vec::with_capacity(*self);
        for i in 0..*self {
            vec.push(model.add_var(
                format!("{}_{}", base_name, i),
                vtype,
                bounds.start,
                bounds.end,
            ));
        }

        vec
    }
}

impl AddVars for (usize, usize) {
    type Out = Vec<<usize as AddVars>::Out>;

    fn vars(
        &self,
        model: &mut Model,
        base_name: &str,
        vtype: VarType,
        bounds: &Range<f64>,
    ) -> Self::Out {
        let mut out = Vec::with_capacity(self.0);
        for i in 0..self.0 {
            out.push(
                self.1
                    .vars(model, &format!("{}_{}", base_name, i), vtype, bounds),
            )
        }

        out
    }
}

impl AddVars for (usize, usize, usize) {
    type Out = Vec<<(usize, usize) as AddVars>::Out>;

    fn vars(
        &self,
        model: &mut Model,
        base_name: &str,
        vtype: VarType,
        bounds: &Range<f64>,
    ) -> Self::Out {
        let mut out = Vec::with_capacity(self.0);
        for i in 0..self.0 {
            out.push((self.1, self.2).vars(
                model,
                &format!("{}_{}", base_name, i),
                vtype,
                bounds,
            ))
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::Model;

    #[test]
    fn nested_shapes_and_names() {
        let mut model = Model::new("vars");
        let u = (2usize, 3usize, 2usize).integer(&mut model, "u");
        assert_eq!(u.len(), 2);
        assert_eq!(u[0].len(), 3);
        assert_eq!(u[0][0].len(), 2);
        assert_eq!(model.num_vars(), 12);
        assert_eq!(model.var(u[1][2][0]).name(), "u_1_2_0");
        assert_eq!(model.var(u[1][2][0]).vtype(), VarType::Integer);
        assert_eq!(model.var(u[0][0][0]).lb(), 0.0);
    }

    #[test]
    fn binary_bounds() {
        let mut model = Model::new("vars");
        let x = 4usize.binary(&mut model, "x");
        assert_eq!(model.var(x[3]).vtype(), VarType::Binary);
        assert_eq!(model.var(x[3]).ub(), 1.0);
    }
}
