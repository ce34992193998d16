//! Purely syntactic rewriting of `if`/`if-else` statements so that, by the
//! time the translator emits code for one, its condition is guaranteed to be
//! `Eq` or `Lt` — the only two comparisons the target machine can branch on.
//!
//! `while` loops are normalized separately in `translate.rs`, since a loop
//! has no `else` branch to duplicate into (see `DESIGN.md`).

use turtle_ast::{Cond, CompareOp, Position, Stmt};

/// Rewrites an `if`/`if-else` statement until its condition is `Eq` or `Lt`.
/// Statements that aren't conditionals are returned unchanged.
pub fn rewrite(stmt: &Stmt) -> Stmt {
    match stmt {
        Stmt::If { cond, then, pos } => rewrite_if(cond.clone(), then.clone(), None, *pos),
        Stmt::IfElse {
            cond,
            then,
            else_,
            pos,
        } => rewrite_if(cond.clone(), then.clone(), Some(else_.clone()), *pos),
        other => other.clone(),
    }
}

fn make_if(cond: Cond, then: Vec<Stmt>, else_: Option<Vec<Stmt>>, pos: Position) -> Stmt {
    match else_ {
        Some(else_) => Stmt::new_if_else(cond, then, else_, pos),
        None => Stmt::new_if(cond, then, pos),
    }
}

fn rewrite_if(cond: Cond, then: Vec<Stmt>, else_: Option<Vec<Stmt>>, pos: Position) -> Stmt {
    match cond.op {
        CompareOp::Eq | CompareOp::Lt => make_if(cond, then, else_, pos),

        // `a != b`: swap the then/else branches and test for equality. An
        // absent else becomes an empty then, with the original then moved
        // to the else branch.
        CompareOp::Neq => {
            let swapped = Cond::new(CompareOp::Eq, cond.left, cond.right, cond.pos);
            let new_then = else_.unwrap_or_default();
            rewrite(&Stmt::new_if_else(swapped, new_then, then, pos))
        }

        // `a > b` is `b < a`.
        CompareOp::Gt => {
            let swapped = Cond::new(CompareOp::Lt, cond.right, cond.left, cond.pos);
            rewrite(&make_if(swapped, then, else_, pos))
        }

        // `a <= b`: duplicate the then-branch into a nested `if (a == b)`,
        // tried only once the `a < b` branch has failed.
        CompareOp::Leq => {
            let lt = Cond::new(CompareOp::Lt, cond.left.clone(), cond.right.clone(), cond.pos);
            let eq = Cond::new(CompareOp::Eq, cond.left, cond.right, cond.pos);
            let inner = rewrite(&make_if(eq, then.clone(), else_, pos));
            Stmt::new_if_else(lt, then, vec![inner], pos)
        }

        // `a >= b` is `b <= a`.
        CompareOp::Geq => {
            let swapped = Cond::new(CompareOp::Leq, cond.right, cond.left, cond.pos);
            rewrite(&make_if(swapped, then, else_, pos))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use turtle_ast::Exp;

    fn int(v: i32) -> Exp {
        Exp::new_int(v, Position::new(1, 1))
    }

    #[test]
    fn eq_and_lt_pass_through_unchanged() {
        let pos = Position::new(1, 1);
        let stmt = Stmt::new_if(
            Cond::new(CompareOp::Eq, int(1), int(2), pos),
            vec![],
            pos,
        );
        assert_eq!(stmt, rewrite(&stmt));
    }

    #[test]
    fn neq_without_else_swaps_then_into_else() {
        let pos = Position::new(1, 1);
        let then = vec![Stmt::Up(pos)];
        let stmt = Stmt::new_if(
            Cond::new(CompareOp::Neq, int(1), int(2), pos),
            then.clone(),
            pos,
        );

        match rewrite(&stmt) {
            Stmt::IfElse {
                cond, then: t, else_, ..
            } => {
                assert_eq!(CompareOp::Eq, cond.op);
                assert!(t.is_empty());
                assert_eq!(then, else_);
            }
            other => panic!("expected if-else, got {:?}", other),
        }
    }

    #[test]
    fn gt_swaps_operands_and_becomes_lt() {
        let pos = Position::new(1, 1);
        let stmt = Stmt::new_if(
            Cond::new(CompareOp::Gt, int(1), int(2), pos),
            vec![],
            pos,
        );

        match rewrite(&stmt) {
            Stmt::If { cond, .. } => {
                assert_eq!(CompareOp::Lt, cond.op);
                assert_eq!(int(2), cond.left);
                assert_eq!(int(1), cond.right);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn leq_nests_an_eq_check_inside_the_lt_branch() {
        let pos = Position::new(1, 1);
        let then = vec![Stmt::Up(pos)];
        let stmt = Stmt::new_if(
            Cond::new(CompareOp::Leq, int(1), int(2), pos),
            then.clone(),
            pos,
        );

        match rewrite(&stmt) {
            Stmt::IfElse {
                cond, then: t, else_, ..
            } => {
                assert_eq!(CompareOp::Lt, cond.op);
                assert_eq!(then, t);
                assert_eq!(1, else_.len());
                match &else_[0] {
                    Stmt::If { cond, then: inner_then, .. } => {
                        assert_eq!(CompareOp::Eq, cond.op);
                        assert_eq!(&then, inner_then);
                    }
                    other => panic!("expected nested if, got {:?}", other),
                }
            }
            other => panic!("expected if-else, got {:?}", other),
        }
    }

    #[test]
    fn geq_rewrites_via_leq_down_to_lt() {
        let pos = Position::new(1, 1);
        let stmt = Stmt::new_if(
            Cond::new(CompareOp::Geq, int(1), int(2), pos),
            vec![],
            pos,
        );

        match rewrite(&stmt) {
            Stmt::IfElse { cond, .. } => assert_eq!(CompareOp::Lt, cond.op),
            other => panic!("expected if-else, got {:?}", other),
        }
    }

    #[test]
    fn rewriting_twice_is_idempotent() {
        let pos = Position::new(1, 1);
        let stmt = Stmt::new_if(
            Cond::new(CompareOp::Neq, int(1), int(2), pos),
            vec![Stmt::Up(pos)],
            pos,
        );
        let once = rewrite(&stmt);
        let twice = rewrite(&once);
        assert_eq!(once, twice);
    }
}
