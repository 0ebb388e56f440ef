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

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::codegen::emitter::Emitter;
use crate::codegen::frame::{FrameLayout, REGISTER_ARGS, STACK_ARG_SIZE};
use crate::errors::CompileError;

// x8 is the indirect-result-location register in AAPCS64, so the scratch
// pool starts at x9 and stops before the intra-procedure-call registers.
const SCRATCH_BASE: usize = 9;
const SCRATCH_LAST: usize = 15;

// add/sub take a 12-bit unsigned immediate.
const IMM12_MAX: i64 = 4095;

/// Scratch register holding a saved left operand at the given nesting depth.
/// Past seven live levels the choice saturates; such programs are out of
/// contract.
pub(super) fn scratch_register(depth: usize) -> String {
    format!("x{}", (SCRATCH_BASE + depth).min(SCRATCH_LAST))
}

/// Lower an expression so that its value ends up in x0.
///
/// May clobber x0..x7 and the scratch pool x9..x15; x29 and sp are restored
/// to their prior values by the time the expression is done. `depth` counts
/// the binary-operator nesting level and selects the scratch register.
pub fn generate_expression(
    expr: &Expr,
    depth: usize,
    frame: &FrameLayout,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    match expr {
        Expr::IntLiteral(value) => {
            load_immediate("x0", *value, emitter);
            Ok(())
        }
        Expr::Id(name) => {
            let offset = frame.offset_of(name)?;
            emitter.emit(format!("ldr x0, [x29, #{}]", offset));
            Ok(())
        }
        Expr::Paren(inner) => generate_expression(inner, depth, frame, emitter),
        Expr::Assign(target, value) => {
            let Expr::Id(name) = target.as_ref() else {
                return Err(CompileError::InvalidAssignTarget);
            };
            generate_expression(value, depth + 1, frame, emitter)?;
            let offset = frame.offset_of(name)?;
            emitter.emit(format!("str x0, [x29, #{}]", offset));
            // The stored value stays in x0 as the expression's result.
            Ok(())
        }
        Expr::Unary(op, operand) => {
            generate_expression(operand, depth + 1, frame, emitter)?;
            match op {
                UnaryOp::Neg => emitter.emit("neg x0, x0"),
                UnaryOp::Not => {
                    emitter.emit("cmp x0, #0");
                    emitter.emit("cset x0, eq");
                }
            }
            Ok(())
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            generate_logical_and(lhs, rhs, depth, frame, emitter)
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            generate_logical_or(lhs, rhs, depth, frame, emitter)
        }
        Expr::Binary(op, lhs, rhs) => generate_binary(*op, lhs, rhs, depth, frame, emitter),
        Expr::Call(callee, args) => generate_call(callee, args, depth, frame, emitter),
    }
}

/// Two-operand protocol: left into the depth's scratch, right into x0, then
/// combine. The right operand only ever touches scratches at higher depths,
/// so the saved left survives.
fn generate_binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    depth: usize,
    frame: &FrameLayout,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    let scratch = scratch_register(depth);

    // Immediate-operand peephole: a literal right operand skips the save.
    if let Expr::IntLiteral(value) = rhs {
        match op {
            BinaryOp::Add if (0..=IMM12_MAX).contains(value) => {
                generate_expression(lhs, depth + 1, frame, emitter)?;
                emitter.emit(format!("add x0, x0, #{}", value));
                return Ok(());
            }
            BinaryOp::Sub if (0..=IMM12_MAX).contains(value) => {
                generate_expression(lhs, depth + 1, frame, emitter)?;
                emitter.emit(format!("sub x0, x0, #{}", value));
                return Ok(());
            }
            BinaryOp::Mul => {
                generate_expression(lhs, depth + 1, frame, emitter)?;
                load_immediate(&scratch, *value, emitter);
                emitter.emit(format!("mul x0, x0, {}", scratch));
                return Ok(());
            }
            BinaryOp::Div => {
                generate_expression(lhs, depth + 1, frame, emitter)?;
                load_immediate(&scratch, *value, emitter);
                emitter.emit(format!("sdiv x0, x0, {}", scratch));
                return Ok(());
            }
            _ => {}
        }
    }

    generate_expression(lhs, depth + 1, frame, emitter)?;
    emitter.emit(format!("mov {}, x0", scratch));
    generate_expression(rhs, depth + 1, frame, emitter)?;

    match op {
        BinaryOp::Add => emitter.emit(format!("add x0, {}, x0", scratch)),
        BinaryOp::Sub => emitter.emit(format!("sub x0, {}, x0", scratch)),
        BinaryOp::Mul => emitter.emit(format!("mul x0, {}, x0", scratch)),
        BinaryOp::Div => emitter.emit(format!("sdiv x0, {}, x0", scratch)),
        BinaryOp::Rem => {
            // r = l - (l / r) * r, with the quotient built in the next
            // scratch up; the right operand is done with it by now.
            let quotient = scratch_register(depth + 1);
            emitter.emit(format!("sdiv {}, {}, x0", quotient, scratch));
            emitter.emit(format!("mul {}, {}, x0", quotient, quotient));
            emitter.emit(format!("sub x0, {}, {}", scratch, quotient));
        }
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne => {
            emitter.emit(format!("cmp {}, x0", scratch));
            emitter.emit(format!("cset x0, {}", condition_code(op)));
        }
        BinaryOp::And | BinaryOp::Or => {
            unreachable!("short-circuit operators are lowered separately")
        }
    }
    Ok(())
}

/// Condition code selecting a true comparison result.
fn condition_code(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Lt => "lt",
        BinaryOp::Gt => "gt",
        BinaryOp::Le => "le",
        BinaryOp::Ge => "ge",
        BinaryOp::Eq => "eq",
        BinaryOp::Ne => "ne",
        other => unreachable!("not a comparison operator: {:?}", other),
    }
}

// a && b: the right operand is reachable only when the left was non-zero.
fn generate_logical_and(
    lhs: &Expr,
    rhs: &Expr,
    depth: usize,
    frame: &FrameLayout,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    let false_label = emitter.fresh_label("false");
    let end_label = emitter.fresh_label("end");

    generate_expression(lhs, depth + 1, frame, emitter)?;
    emitter.emit("cmp x0, #0");
    emitter.emit(format!("beq {}", false_label));
    generate_expression(rhs, depth + 1, frame, emitter)?;
    emitter.emit("cmp x0, #0");
    emitter.emit(format!("beq {}", false_label));
    emitter.emit("mov x0, #1");
    emitter.emit(format!("b {}", end_label));
    emitter.label(&false_label);
    emitter.emit("mov x0, #0");
    emitter.label(&end_label);
    Ok(())
}

// a || b, symmetric to &&.
fn generate_logical_or(
    lhs: &Expr,
    rhs: &Expr,
    depth: usize,
    frame: &FrameLayout,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    let true_label = emitter.fresh_label("true");
    let end_label = emitter.fresh_label("end");

    generate_expression(lhs, depth + 1, frame, emitter)?;
    emitter.emit("cmp x0, #0");
    emitter.emit(format!("bne {}", true_label));
    generate_expression(rhs, depth + 1, frame, emitter)?;
    emitter.emit("cmp x0, #0");
    emitter.emit(format!("bne {}", true_label));
    emitter.emit("mov x0, #0");
    emitter.emit(format!("b {}", end_label));
    emitter.label(&true_label);
    emitter.emit("mov x0, #1");
    emitter.label(&end_label);
    Ok(())
}

/// Lower a call. Arguments are evaluated right to left and pushed in aligned
/// 16-byte units, so the leftmost ends up on top; the first eight are then
/// popped into the argument registers and any surplus stays on the stack for
/// the callee.
fn generate_call(
    callee: &Expr,
    args: &[Expr],
    depth: usize,
    frame: &FrameLayout,
    emitter: &mut Emitter,
) -> Result<(), CompileError> {
    for arg in args.iter().rev() {
        generate_expression(arg, depth + 1, frame, emitter)?;
        emitter.emit(format!("str x0, [sp, #-{}]!", STACK_ARG_SIZE));
    }

    for index in 0..args.len().min(REGISTER_ARGS) {
        emitter.emit(format!("ldr x{}, [sp], #{}", index, STACK_ARG_SIZE));
    }

    let surplus = args.len().saturating_sub(REGISTER_ARGS) as i64;
    if surplus > 0 {
        emitter.emit(format!("sub sp, sp, #{}", STACK_ARG_SIZE * surplus));
    }

    if let Expr::Id(name) = callee {
        emitter.emit(format!("bl {}", name));
    } else {
        // Not reachable from the MinC grammar (there are no function-pointer
        // values), but the AST schema allows an arbitrary callee expression.
        generate_expression(callee, depth + 1, frame, emitter)?;
        emitter.emit("blr x0");
    }

    if surplus > 0 {
        emitter.emit(format!("add sp, sp, #{}", STACK_ARG_SIZE * surplus));
    }
    Ok(())
}

/// Materialize a 64-bit signed immediate into `register`.
///
/// Values the mov alias is sure to accept go out directly; anything wider is
/// synthesized 16 bits at a time with movz/movk over the two's-complement
/// representation.
pub(super) fn load_immediate(register: &str, value: i64, emitter: &mut Emitter) {
    if (-65536..=65535).contains(&value) {
        emitter.emit(format!("mov {}, #{}", register, value));
        return;
    }

    let bits = value as u64;
    emitter.emit(format!("movz {}, #{}", register, bits & 0xFFFF));
    for shift in [16, 32, 48] {
        let chunk = (bits >> shift) & 0xFFFF;
        if chunk != 0 {
            emitter.emit(format!("movk {}, #{}, lsl {}", register, chunk, shift));
        }
    }
}
