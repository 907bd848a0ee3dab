//! Reified-Boolean composition helpers.
//!
//! Every "A and B" over Booleans must be posted as a pair: the implicant
//! half (`A ∧ B → z`) and the contrapositive (`¬z → ¬A ∨ ¬B`). Each helper
//! here emits both halves from one call, which is the fix the source's
//! `lifo.py`/`time.py` modules hand-roll at every call site — and
//! occasionally get wrong in only one direction.

use vrp_cp::{CpModel, Expr, Lit};

pub fn reify_and<M: CpModel>(m: &mut M, terms: &[Lit<M::BoolVar>], name: &str) -> M::BoolVar {
    let z = m.new_bool_var(name);
    m.add_bool_and_onlyif(terms, Lit::Pos(z));
    let negated: Vec<Lit<M::BoolVar>> = terms.iter().map(|t| t.not()).collect();
    m.add_bool_or_onlyif(&negated, Lit::Neg(z));
    z
}

pub fn reify_or<M: CpModel>(m: &mut M, terms: &[Lit<M::BoolVar>], name: &str) -> M::BoolVar {
    let z = m.new_bool_var(name);
    m.add_bool_or_onlyif(terms, Lit::Pos(z));
    let negated: Vec<Lit<M::BoolVar>> = terms.iter().map(|t| t.not()).collect();
    m.add_bool_and_onlyif(&negated, Lit::Neg(z));
    z
}

/// `z ⇔ (lhs == rhs)`.
pub fn reify_eq<M: CpModel>(
    m: &mut M,
    lhs: Expr<M::IntVar>,
    rhs: Expr<M::IntVar>,
    name: &str,
) -> M::BoolVar {
    let z = m.new_bool_var(name);
    m.add_eq_onlyif(lhs.clone(), rhs.clone(), Lit::Pos(z));
    m.add_ne_onlyif(lhs, rhs, Lit::Neg(z));
    z
}

/// `z ⇔ (lhs <= rhs)`.
pub fn reify_le<M: CpModel>(
    m: &mut M,
    lhs: Expr<M::IntVar>,
    rhs: Expr<M::IntVar>,
    name: &str,
) -> M::BoolVar {
    let z = m.new_bool_var(name);
    m.add_le_onlyif(lhs.clone(), rhs.clone(), Lit::Pos(z));
    m.add_ge_onlyif(lhs, rhs.plus(Expr::Const(1)), Lit::Neg(z));
    z
}

/// `z ⇔ (lhs >= rhs)`.
pub fn reify_ge<M: CpModel>(
    m: &mut M,
    lhs: Expr<M::IntVar>,
    rhs: Expr<M::IntVar>,
    name: &str,
) -> M::BoolVar {
    let z = m.new_bool_var(name);
    m.add_ge_onlyif(lhs.clone(), rhs.clone(), Lit::Pos(z));
    m.add_le_onlyif(lhs, rhs.minus(Expr::Const(1)), Lit::Neg(z));
    z
}

/// `z ⇔ (lhs < rhs)`.
pub fn reify_lt<M: CpModel>(
    m: &mut M,
    lhs: Expr<M::IntVar>,
    rhs: Expr<M::IntVar>,
    name: &str,
) -> M::BoolVar {
    reify_le(m, lhs.plus(Expr::Const(1)), rhs, name)
}

/// `z ⇔ (lhs > rhs)`.
pub fn reify_gt<M: CpModel>(
    m: &mut M,
    lhs: Expr<M::IntVar>,
    rhs: Expr<M::IntVar>,
    name: &str,
) -> M::BoolVar {
    reify_ge(m, lhs, rhs.plus(Expr::Const(1)), name)
}

/// `z ⇔ (lhs != rhs)`.
pub fn reify_ne<M: CpModel>(
    m: &mut M,
    lhs: Expr<M::IntVar>,
    rhs: Expr<M::IntVar>,
    name: &str,
) -> M::BoolVar {
    let eq = reify_eq(m, lhs, rhs, name);
    let z = m.new_bool_var(name);
    bool_iff(m, Lit::Pos(z), Lit::Neg(eq));
    z
}

/// Posts both directions of `a ⇔ b`, so either literal can be used to fix
/// the other without recomputing the pair at each call site.
pub fn bool_iff<M: CpModel>(m: &mut M, a: Lit<M::BoolVar>, b: Lit<M::BoolVar>) {
    m.add_implication(a, b);
    m.add_implication(b, a);
}

/// Pins a literal to hold unconditionally, via the standard SAT trick of
/// making its negation self-contradictory.
pub fn fix_true<M: CpModel>(m: &mut M, b: M::BoolVar) {
    m.add_implication(Lit::Neg(b), Lit::Pos(b));
}

pub fn fix_false<M: CpModel>(m: &mut M, b: M::BoolVar) {
    m.add_implication(Lit::Pos(b), Lit::Neg(b));
}

/// A variable whose value is `value_if_true` when `cond` holds and
/// `value_if_false` otherwise, posted as a pair of gated equalities. Used
/// everywhere a cost term or derived quantity is "this expression, or zero":
/// the LIFO blocker terms and the per-edge cost terms both lean on it.
#[allow(clippy::too_many_arguments)]
pub fn gated_value<M: CpModel>(
    m: &mut M,
    lo: i64,
    hi: i64,
    cond: Lit<M::BoolVar>,
    value_if_true: Expr<M::IntVar>,
    value_if_false: Expr<M::IntVar>,
    name: &str,
) -> M::IntVar {
    let v = m.new_int_var(lo, hi, name);
    m.add_eq_onlyif(Expr::var(v), value_if_true, cond);
    m.add_eq_onlyif(Expr::var(v), value_if_false, cond.not());
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrp_cp::backend::fake::FakeCpModel;
    use vrp_cp::SolveStatus;

    #[test]
    fn reify_eq_tracks_equality() {
        let mut m = FakeCpModel::new();
        let a = m.new_int_var(0, 2, "a");
        let b = m.new_int_var(0, 2, "b");
        let z = reify_eq(&mut m, Expr::var(a), Expr::var(b), "z");
        m.add_eq(Expr::var(a), Expr::Const(1));
        m.add_eq(Expr::var(b), Expr::Const(1));
        m.minimize(Expr::Const(0));
        let outcome = m.solve(std::time::Duration::from_secs(1), 1);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.bool_values)(z));
    }

    #[test]
    fn reify_ne_is_negation_of_eq() {
        let mut m = FakeCpModel::new();
        let a = m.new_int_var(0, 2, "a");
        let b = m.new_int_var(0, 2, "b");
        let z = reify_ne(&mut m, Expr::var(a), Expr::var(b), "z");
        m.add_eq(Expr::var(a), Expr::Const(0));
        m.add_eq(Expr::var(b), Expr::Const(1));
        m.minimize(Expr::Const(0));
        let outcome = m.solve(std::time::Duration::from_secs(1), 1);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.bool_values)(z));
    }

    #[test]
    fn fix_true_and_fix_false_pin_values() {
        let mut m = FakeCpModel::new();
        let a = m.new_bool_var("a");
        let b = m.new_bool_var("b");
        fix_true(&mut m, a);
        fix_false(&mut m, b);
        m.minimize(Expr::Const(0));
        let outcome = m.solve(std::time::Duration::from_secs(1), 1);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.bool_values)(a));
        assert!(!(outcome.bool_values)(b));
    }
}
