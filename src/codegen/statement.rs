/*
Copyright 2025 The mincc Authors

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::ast::{BinaryOp, Expr, Stmt};
use crate::codegen::emitter::Emitter;
use crate::codegen::expression::{generate_expression, scratch_register};
use crate::codegen::frame::FrameLayout;
use crate::errors::CompileError;

/// Lower one statement. Control either falls through to the next line or
/// branches to a label within the current function; no useful value is left
/// in x0.
pub fn generate_statement(
    stmt: &Stmt,
    frame: &FrameLayout,
    return_label: &str,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    match stmt {
        Stmt::Empty => Ok(()),
        Stmt::Expr(expr) => {
            // Evaluated for its side effects; the value in x0 is discarded.
            generate_expression(expr, 0, frame, emitter)
        }
        Stmt::Return(expr) => {
            generate_expression(expr, 0, frame, emitter)?;
            emitter.emit(format!("b {}", return_label));
            Ok(())
        }
        Stmt::Break => {
            let target = emitter.break_target()?;
            emitter.emit(format!("b {}", target));
            Ok(())
        }
        Stmt::Continue => {
            let target = emitter.continue_target()?;
            emitter.emit(format!("b {}", target));
            Ok(())
        }
        Stmt::Compound { stmts, .. } => {
            // Declarations were already picked up by the frame layout.
            for stmt in stmts {
                generate_statement(stmt, frame, return_label, emitter)?;
            }
            Ok(())
        }
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let else_label = emitter.fresh_label("else");
            let end_label = emitter.fresh_label("endif");

            generate_expression(cond, 0, frame, emitter)?;
            emitter.emit("cmp x0, #0");
            emitter.emit(format!("beq {}", else_label));
            generate_statement(then_branch, frame, return_label, emitter)?;
            emitter.emit(format!("b {}", end_label));
            emitter.label(&else_label);
            if let Some(else_branch) = else_branch {
                generate_statement(else_branch, frame, return_label, emitter)?;
            }
            emitter.label(&end_label);
            Ok(())
        }
        Stmt::While { cond, body } => {
            let loop_label = emitter.fresh_label("loop");
            let end_label = emitter.fresh_label("endloop");
            emitter.enter_loop(end_label.clone(), loop_label.clone());

            // `continue` re-enters at the top, so the condition is
            // re-evaluated on every path around the loop.
            emitter.label(&loop_label);
            generate_loop_condition(cond, &end_label, frame, emitter)?;
            generate_statement(body, frame, return_label, emitter)?;
            emitter.emit(format!("b {}", loop_label));
            emitter.label(&end_label);

            emitter.exit_loop()
        }
    }
}

// Compare-branch peephole: a comparison condition branches on the inverted
// condition code straight off the flags instead of materializing 0/1 with
// cset and re-testing.
fn generate_loop_condition(
    cond: &Expr,
    end_label: &str,
    frame: &FrameLayout,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    if let Some((op, lhs, rhs)) = as_comparison(cond) {
        let scratch = scratch_register(0);
        generate_expression(lhs, 1, frame, emitter)?;
        emitter.emit(format!("mov {}, x0", scratch));
        generate_expression(rhs, 1, frame, emitter)?;
        emitter.emit(format!("cmp {}, x0", scratch));
        emitter.emit(format!("{} {}", inverted_branch(op), end_label));
        return Ok(());
    }

    generate_expression(cond, 0, frame, emitter)?;
    emitter.emit("cmp x0, #0");
    emitter.emit(format!("beq {}", end_label));
    Ok(())
}

// Parentheses are transparent, so see through them to the comparison.
fn as_comparison(expr: &Expr) -> Option<(BinaryOp, &Expr, &Expr)> {
    match expr {
        Expr::Paren(inner) => as_comparison(inner),
        Expr::Binary(op, lhs, rhs) if is_comparison(*op) => Some((*op, lhs.as_ref(), rhs.as_ref())),
        _ => None,
    }
}

fn is_comparison(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
    )
}

/// Branch taken when the comparison is false.
fn inverted_branch(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Lt => "bge",
        BinaryOp::Gt => "ble",
        BinaryOp::Le => "bgt",
        BinaryOp::Ge => "blt",
        BinaryOp::Eq => "bne",
        BinaryOp::Ne => "beq",
        other => unreachable!("not a comparison operator: {:?}", other),
    }
}
