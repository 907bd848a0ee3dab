//! A tiny, exhaustive constraint solver used in place of a real CP engine
//! for unit tests over hand-built, small instances. It is intentionally
//! simple: chronological backtracking with no propagation beyond checking
//! each constraint as soon as every variable it mentions is assigned. This
//! is sufficient for the toy scenarios exercised in `vrp_core`'s test
//! suite; it is not a substitute for the real `cp_sat` backend on anything
//! resembling a production-sized instance.

use std::time::Duration;

use tracing::debug;

use crate::{CpModel, Expr, Lit, SolveOutcome, SolveStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

#[derive(Clone)]
enum Constraint {
    Eq(Expr<VarId>, Expr<VarId>),
    Le(Expr<VarId>, Expr<VarId>),
    Ge(Expr<VarId>, Expr<VarId>),
    Ne(Expr<VarId>, Expr<VarId>),
    Implication(Lit<VarId>, Lit<VarId>),
    BoolAndOnlyIf(Vec<Lit<VarId>>, Lit<VarId>),
    BoolOrOnlyIf(Vec<Lit<VarId>>, Lit<VarId>),
    EqOnlyIf(Expr<VarId>, Expr<VarId>, Lit<VarId>),
    LeOnlyIf(Expr<VarId>, Expr<VarId>, Lit<VarId>),
    GeOnlyIf(Expr<VarId>, Expr<VarId>, Lit<VarId>),
    NeOnlyIf(Expr<VarId>, Expr<VarId>, Lit<VarId>),
    MinEq(VarId, Vec<VarId>),
    MaxEq(VarId, Vec<VarId>),
    Element(VarId, Vec<i64>, VarId),
    MultEq(VarId, VarId, VarId),
}

/// Maximum number of leaf assignments explored before giving up and
/// reporting `Unknown`. Kept small: this backend only targets the toy
/// fixtures in the test suite.
const NODE_BUDGET: u64 = 5_000_000;

pub struct FakeCpModel {
    domains: Vec<(i64, i64)>,
    names: Vec<String>,
    constraints: Vec<Constraint>,
    objective: Option<Expr<VarId>>,
}

impl Default for FakeCpModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCpModel {
    pub fn new() -> Self {
        FakeCpModel {
            domains: Vec::new(),
            names: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    fn referenced_vars_expr(expr: &Expr<VarId>, out: &mut Vec<VarId>) {
        match expr {
            Expr::Var(v) => out.push(*v),
            Expr::Const(_) => {}
            Expr::Sum(terms) => terms.iter().for_each(|t| Self::referenced_vars_expr(t, out)),
            Expr::Scaled(_, inner) => Self::referenced_vars_expr(inner, out),
        }
    }

    fn referenced_vars_lit(lit: &Lit<VarId>, out: &mut Vec<VarId>) {
        out.push(match lit {
            Lit::Pos(v) => *v,
            Lit::Neg(v) => *v,
        });
    }

    fn referenced_vars(constraint: &Constraint) -> Vec<VarId> {
        let mut out = Vec::new();
        match constraint {
            Constraint::Eq(a, b)
            | Constraint::Le(a, b)
            | Constraint::Ge(a, b)
            | Constraint::Ne(a, b) => {
                Self::referenced_vars_expr(a, &mut out);
                Self::referenced_vars_expr(b, &mut out);
            }
            Constraint::Implication(a, b) => {
                Self::referenced_vars_lit(a, &mut out);
                Self::referenced_vars_lit(b, &mut out);
            }
            Constraint::BoolAndOnlyIf(lits, onlyif) | Constraint::BoolOrOnlyIf(lits, onlyif) => {
                lits.iter().for_each(|l| Self::referenced_vars_lit(l, &mut out));
                Self::referenced_vars_lit(onlyif, &mut out);
            }
            Constraint::EqOnlyIf(a, b, onlyif)
            | Constraint::LeOnlyIf(a, b, onlyif)
            | Constraint::GeOnlyIf(a, b, onlyif)
            | Constraint::NeOnlyIf(a, b, onlyif) => {
                Self::referenced_vars_expr(a, &mut out);
                Self::referenced_vars_expr(b, &mut out);
                Self::referenced_vars_lit(onlyif, &mut out);
            }
            Constraint::MinEq(t, of) | Constraint::MaxEq(t, of) => {
                out.push(*t);
                out.extend(of.iter().copied());
            }
            Constraint::Element(index, _, target) => {
                out.push(*index);
                out.push(*target);
            }
            Constraint::MultEq(t, a, b) => {
                out.push(*t);
                out.push(*a);
                out.push(*b);
            }
        }
        out
    }

    fn eval_expr(expr: &Expr<VarId>, assignment: &[Option<i64>]) -> Option<i64> {
        match expr {
            Expr::Var(v) => assignment[v.0],
            Expr::Const(c) => Some(*c),
            Expr::Sum(terms) => {
                let mut total = 0i64;
                for t in terms {
                    total += Self::eval_expr(t, assignment)?;
                }
                Some(total)
            }
            Expr::Scaled(factor, inner) => Self::eval_expr(inner, assignment).map(|v| v * factor),
        }
    }

    fn eval_lit(lit: &Lit<VarId>, assignment: &[Option<i64>]) -> Option<bool> {
        match lit {
            Lit::Pos(v) => assignment[v.0].map(|v| v != 0),
            Lit::Neg(v) => assignment[v.0].map(|v| v == 0),
        }
    }

    /// Checks a single constraint; returns `None` if it cannot yet be
    /// evaluated (some referenced variable is unassigned), `Some(true)` if
    /// satisfied, `Some(false)` if violated.
    fn check(constraint: &Constraint, assignment: &[Option<i64>]) -> Option<bool> {
        use Constraint::*;
        match constraint {
            Eq(a, b) => Some(Self::eval_expr(a, assignment)? == Self::eval_expr(b, assignment)?),
            Le(a, b) => Some(Self::eval_expr(a, assignment)? <= Self::eval_expr(b, assignment)?),
            Ge(a, b) => Some(Self::eval_expr(a, assignment)? >= Self::eval_expr(b, assignment)?),
            Ne(a, b) => Some(Self::eval_expr(a, assignment)? != Self::eval_expr(b, assignment)?),
            Implication(a, b) => {
                let av = Self::eval_lit(a, assignment)?;
                let bv = Self::eval_lit(b, assignment)?;
                Some(!av || bv)
            }
            BoolAndOnlyIf(lits, onlyif) => {
                let ov = Self::eval_lit(onlyif, assignment)?;
                if !ov {
                    return Some(true);
                }
                let mut all = true;
                for l in lits {
                    all &= Self::eval_lit(l, assignment)?;
                }
                Some(all)
            }
            BoolOrOnlyIf(lits, onlyif) => {
                let ov = Self::eval_lit(onlyif, assignment)?;
                if !ov {
                    return Some(true);
                }
                let mut any = false;
                for l in lits {
                    any |= Self::eval_lit(l, assignment)?;
                }
                Some(any)
            }
            EqOnlyIf(a, b, onlyif) => {
                let ov = Self::eval_lit(onlyif, assignment)?;
                if !ov {
                    return Some(true);
                }
                Some(Self::eval_expr(a, assignment)? == Self::eval_expr(b, assignment)?)
            }
            LeOnlyIf(a, b, onlyif) => {
                let ov = Self::eval_lit(onlyif, assignment)?;
                if !ov {
                    return Some(true);
                }
                Some(Self::eval_expr(a, assignment)? <= Self::eval_expr(b, assignment)?)
            }
            GeOnlyIf(a, b, onlyif) => {
                let ov = Self::eval_lit(onlyif, assignment)?;
                if !ov {
                    return Some(true);
                }
                Some(Self::eval_expr(a, assignment)? >= Self::eval_expr(b, assignment)?)
            }
            NeOnlyIf(a, b, onlyif) => {
                let ov = Self::eval_lit(onlyif, assignment)?;
                if !ov {
                    return Some(true);
                }
                Some(Self::eval_expr(a, assignment)? != Self::eval_expr(b, assignment)?)
            }
            MinEq(target, of) => {
                let t = assignment[target.0]?;
                let mut m = i64::MAX;
                for v in of {
                    m = m.min(assignment[v.0]?);
                }
                Some(t == m)
            }
            MaxEq(target, of) => {
                let t = assignment[target.0]?;
                let mut m = i64::MIN;
                for v in of {
                    m = m.max(assignment[v.0]?);
                }
                Some(t == m)
            }
            Element(index, table, target) => {
                let i = assignment[index.0]?;
                let t = assignment[target.0]?;
                Some(table[i as usize] == t)
            }
            MultEq(target, a, b) => {
                let t = assignment[target.0]?;
                let av = assignment[a.0]?;
                let bv = assignment[b.0]?;
                Some(t == av * bv)
            }
        }
    }

    fn search(&self) -> (SolveStatus, Option<Vec<i64>>) {
        let n = self.domains.len();
        let mut assignment: Vec<Option<i64>> = vec![None; n];
        let mut best: Option<(i64, Vec<i64>)> = None;
        let mut nodes: u64 = 0;
        let mut exhausted = true;

        // constraints indexed by the last variable they need to become
        // fully assigned in declaration order, so we check eagerly.
        let mut per_var_constraints: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (ci, c) in self.constraints.iter().enumerate() {
            if let Some(max_var) = Self::referenced_vars(c).iter().map(|v| v.0).max() {
                per_var_constraints[max_var].push(ci);
            }
        }

        fn backtrack(
            this: &FakeCpModel,
            idx: usize,
            assignment: &mut Vec<Option<i64>>,
            per_var_constraints: &[Vec<usize>],
            nodes: &mut u64,
            exhausted: &mut bool,
            best: &mut Option<(i64, Vec<i64>)>,
        ) {
            if *nodes > NODE_BUDGET {
                *exhausted = false;
                return;
            }
            if idx == assignment.len() {
                *nodes += 1;
                let obj = this
                    .objective
                    .as_ref()
                    .and_then(|o| FakeCpModel::eval_expr(o, assignment))
                    .unwrap_or(0);
                if best.as_ref().map(|(b, _)| obj < *b).unwrap_or(true) {
                    let values: Vec<i64> = assignment.iter().map(|v| v.unwrap()).collect();
                    *best = Some((obj, values));
                }
                return;
            }

            let (lo, hi) = this.domains[idx];
            for value in lo..=hi {
                *nodes += 1;
                if *nodes > NODE_BUDGET {
                    *exhausted = false;
                    return;
                }
                assignment[idx] = Some(value);
                let mut ok = true;
                for &ci in &per_var_constraints[idx] {
                    if FakeCpModel::check(&this.constraints[ci], assignment) == Some(false) {
                        ok = false;
                        break;
                    }
                }
                if ok {
                    backtrack(
                        this,
                        idx + 1,
                        assignment,
                        per_var_constraints,
                        nodes,
                        exhausted,
                        best,
                    );
                }
                assignment[idx] = None;
                if !*exhausted {
                    return;
                }
            }
        }

        backtrack(
            self,
            0,
            &mut assignment,
            &per_var_constraints,
            &mut nodes,
            &mut exhausted,
            &mut best,
        );

        debug!(nodes, exhausted, found = best.is_some(), "fake CP search finished");

        match (exhausted, best) {
            (true, Some((_, values))) => (SolveStatus::Optimal, Some(values)),
            (true, None) => (SolveStatus::Infeasible, None),
            (false, Some((_, values))) => (SolveStatus::Feasible, Some(values)),
            (false, None) => (SolveStatus::Unknown, None),
        }
    }
}

impl CpModel for FakeCpModel {
    type IntVar = VarId;
    type BoolVar = VarId;

    fn new_int_var(&mut self, lo: i64, hi: i64, name: &str) -> VarId {
        self.domains.push((lo, hi));
        self.names.push(name.to_string());
        VarId(self.domains.len() - 1)
    }

    fn new_bool_var(&mut self, name: &str) -> VarId {
        self.new_int_var(0, 1, name)
    }

    fn new_constant(&mut self, value: i64) -> VarId {
        self.new_int_var(value, value, "const")
    }

    fn add_eq(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>) {
        self.constraints.push(Constraint::Eq(lhs, rhs));
    }

    fn add_le(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>) {
        self.constraints.push(Constraint::Le(lhs, rhs));
    }

    fn add_ge(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>) {
        self.constraints.push(Constraint::Ge(lhs, rhs));
    }

    fn add_ne(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>) {
        self.constraints.push(Constraint::Ne(lhs, rhs));
    }

    fn add_implication(&mut self, a: Lit<VarId>, b: Lit<VarId>) {
        self.constraints.push(Constraint::Implication(a, b));
    }

    fn add_bool_and_onlyif(&mut self, lits: &[Lit<VarId>], onlyif: Lit<VarId>) {
        self.constraints
            .push(Constraint::BoolAndOnlyIf(lits.to_vec(), onlyif));
    }

    fn add_bool_or_onlyif(&mut self, lits: &[Lit<VarId>], onlyif: Lit<VarId>) {
        self.constraints
            .push(Constraint::BoolOrOnlyIf(lits.to_vec(), onlyif));
    }

    fn add_eq_onlyif(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>, onlyif: Lit<VarId>) {
        self.constraints.push(Constraint::EqOnlyIf(lhs, rhs, onlyif));
    }

    fn add_le_onlyif(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>, onlyif: Lit<VarId>) {
        self.constraints.push(Constraint::LeOnlyIf(lhs, rhs, onlyif));
    }

    fn add_ge_onlyif(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>, onlyif: Lit<VarId>) {
        self.constraints.push(Constraint::GeOnlyIf(lhs, rhs, onlyif));
    }

    fn add_ne_onlyif(&mut self, lhs: Expr<VarId>, rhs: Expr<VarId>, onlyif: Lit<VarId>) {
        self.constraints.push(Constraint::NeOnlyIf(lhs, rhs, onlyif));
    }

    fn add_min_eq(&mut self, target: VarId, of: &[VarId]) {
        self.constraints.push(Constraint::MinEq(target, of.to_vec()));
    }

    fn add_max_eq(&mut self, target: VarId, of: &[VarId]) {
        self.constraints.push(Constraint::MaxEq(target, of.to_vec()));
    }

    fn add_element(&mut self, index: VarId, table: &[i64], target: VarId) {
        self.constraints
            .push(Constraint::Element(index, table.to_vec(), target));
    }

    fn add_multiplication_eq(&mut self, target: VarId, a: VarId, b: VarId) {
        self.constraints.push(Constraint::MultEq(target, a, b));
    }

    fn minimize(&mut self, objective: Expr<VarId>) {
        self.objective = Some(objective);
    }

    fn solve(&mut self, _deadline: Duration, _workers: u32) -> SolveOutcome<VarId, VarId> {
        let (status, values) = self.search();
        let values = std::rc::Rc::new(values.unwrap_or_default());
        let values_for_int = values.clone();
        let int_values: Box<dyn Fn(VarId) -> i64> =
            Box::new(move |v: VarId| values_for_int.get(v.0).copied().unwrap_or(0));
        let bool_values: Box<dyn Fn(VarId) -> bool> =
            Box::new(move |v: VarId| values.get(v.0).copied().unwrap_or(0) != 0);
        SolveOutcome {
            status,
            int_values,
            bool_values,
        }
    }
}
