//! [`CpModel`] implementation backed by the `cp_sat` crate, which binds
//! Google's CP-SAT solver.
//!
//! None of this workspace's other routing crates talk to a CP/ILP engine
//! directly; they solve via local search instead. This backend exists
//! because the constraint model this crate implements is defined in terms
//! of CP primitives (bounded int domains, `element`, reified implications,
//! linear minimization) that only a real CP engine provides.

use std::time::Duration;

use cp_sat::builder::{BoolVar as SatBoolVar, CpModelBuilder, IntVar as SatIntVar, LinearExpr};

use crate::{CpModel, Expr, Lit, SolveOutcome, SolveStatus};

pub struct CpSatModel {
    builder: CpModelBuilder,
}

impl Default for CpSatModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSatModel {
    pub fn new() -> Self {
        CpSatModel {
            builder: CpModelBuilder::new(),
        }
    }

    fn lower(&self, expr: &Expr<SatIntVar>) -> LinearExpr {
        match expr {
            Expr::Var(v) => LinearExpr::from(*v),
            Expr::Const(c) => LinearExpr::constant(*c),
            Expr::Sum(terms) => terms
                .iter()
                .map(|t| self.lower(t))
                .fold(LinearExpr::constant(0), |acc, t| acc + t),
            Expr::Scaled(factor, inner) => self.lower(inner) * *factor,
        }
    }

    fn lower_lit(&self, lit: &Lit<SatBoolVar>) -> SatBoolVar {
        match lit {
            Lit::Pos(b) => *b,
            Lit::Neg(b) => b.not(),
        }
    }
}

impl CpModel for CpSatModel {
    type IntVar = SatIntVar;
    type BoolVar = SatBoolVar;

    fn new_int_var(&mut self, lo: i64, hi: i64, name: &str) -> SatIntVar {
        self.builder.new_int_var_with_name(lo, hi, name)
    }

    fn new_bool_var(&mut self, name: &str) -> SatBoolVar {
        self.builder.new_bool_var_with_name(name)
    }

    fn new_constant(&mut self, value: i64) -> SatIntVar {
        self.builder.new_constant(value)
    }

    fn add_eq(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>) {
        self.builder.add_eq(self.lower(&lhs), self.lower(&rhs));
    }

    fn add_le(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>) {
        self.builder.add_le(self.lower(&lhs), self.lower(&rhs));
    }

    fn add_ge(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>) {
        self.builder.add_ge(self.lower(&lhs), self.lower(&rhs));
    }

    fn add_ne(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>) {
        self.builder.add_ne(self.lower(&lhs), self.lower(&rhs));
    }

    fn add_implication(&mut self, a: Lit<SatBoolVar>, b: Lit<SatBoolVar>) {
        self.builder
            .add_implication(self.lower_lit(&a), self.lower_lit(&b));
    }

    fn add_bool_and_onlyif(&mut self, lits: &[Lit<SatBoolVar>], onlyif: Lit<SatBoolVar>) {
        let lits: Vec<SatBoolVar> = lits.iter().map(|l| self.lower_lit(l)).collect();
        self.builder
            .add_bool_and(&lits)
            .only_enforce_if(&[self.lower_lit(&onlyif)]);
    }

    fn add_bool_or_onlyif(&mut self, lits: &[Lit<SatBoolVar>], onlyif: Lit<SatBoolVar>) {
        let lits: Vec<SatBoolVar> = lits.iter().map(|l| self.lower_lit(l)).collect();
        self.builder
            .add_bool_or(&lits)
            .only_enforce_if(&[self.lower_lit(&onlyif)]);
    }

    fn add_eq_onlyif(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>, onlyif: Lit<SatBoolVar>) {
        self.builder
            .add_eq(self.lower(&lhs), self.lower(&rhs))
            .only_enforce_if(&[self.lower_lit(&onlyif)]);
    }

    fn add_le_onlyif(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>, onlyif: Lit<SatBoolVar>) {
        self.builder
            .add_le(self.lower(&lhs), self.lower(&rhs))
            .only_enforce_if(&[self.lower_lit(&onlyif)]);
    }

    fn add_ge_onlyif(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>, onlyif: Lit<SatBoolVar>) {
        self.builder
            .add_ge(self.lower(&lhs), self.lower(&rhs))
            .only_enforce_if(&[self.lower_lit(&onlyif)]);
    }

    fn add_ne_onlyif(&mut self, lhs: Expr<SatIntVar>, rhs: Expr<SatIntVar>, onlyif: Lit<SatBoolVar>) {
        self.builder
            .add_ne(self.lower(&lhs), self.lower(&rhs))
            .only_enforce_if(&[self.lower_lit(&onlyif)]);
    }

    fn add_min_eq(&mut self, target: SatIntVar, of: &[SatIntVar]) {
        self.builder.add_min_equality(target, of);
    }

    fn add_max_eq(&mut self, target: SatIntVar, of: &[SatIntVar]) {
        self.builder.add_max_equality(target, of);
    }

    fn add_element(&mut self, index: SatIntVar, table: &[i64], target: SatIntVar) {
        self.builder.add_element(index, table, target);
    }

    fn add_multiplication_eq(&mut self, target: SatIntVar, a: SatIntVar, b: SatIntVar) {
        self.builder.add_multiplication_equality(target, &[a, b]);
    }

    fn minimize(&mut self, objective: Expr<SatIntVar>) {
        let expr = self.lower(&objective);
        self.builder.minimize(expr);
    }

    fn solve(&mut self, deadline: Duration, workers: u32) -> SolveOutcome<SatIntVar, SatBoolVar> {
        let response = self
            .builder
            .solve_with_parameters(|params| {
                params.max_time_in_seconds = deadline.as_secs_f64();
                params.num_workers = workers as i32;
            });

        let status = match response.status() {
            cp_sat::proto::CpSolverStatus::Optimal => SolveStatus::Optimal,
            cp_sat::proto::CpSolverStatus::Feasible => SolveStatus::Feasible,
            cp_sat::proto::CpSolverStatus::Infeasible => SolveStatus::Infeasible,
            _ => SolveStatus::Unknown,
        };

        let response_for_int = response.clone();
        let int_values: Box<dyn Fn(SatIntVar) -> i64> =
            Box::new(move |v: SatIntVar| response_for_int.value(v));
        let bool_values: Box<dyn Fn(SatBoolVar) -> bool> =
            Box::new(move |v: SatBoolVar| response.bool_value(v));

        SolveOutcome {
            status,
            int_values,
            bool_values,
        }
    }
}
