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

use crate::ast::{Declaration, Param, Stmt};
use crate::errors::CompileError;
use std::collections::HashMap;

// Every variable slot holds one 64-bit value.
const SLOT_SIZE: i64 = 8;
// Stack-passed call arguments each occupy one aligned 16-byte unit.
pub const STACK_ARG_SIZE: i64 = 16;
// The frame record pushed below the caller's stack arguments.
pub const FRAME_RECORD_SIZE: i64 = 16;

const FRAME_ALIGN: i64 = 16;
// How many arguments travel in registers (x0..x7) before the stack is used.
pub const REGISTER_ARGS: usize = 8;

/// Collect every declaration reachable in a function body, depth first and
/// left to right; the result order is the frame slot assignment order.
pub fn collect_declarations(stmt: &Stmt) -> Vec<Declaration> {
    let mut decls = Vec::new();
    collect_into(stmt, &mut decls);
    decls
}

fn collect_into(stmt: &Stmt, decls: &mut Vec<Declaration>) {
    match stmt {
        Stmt::Compound {
            decls: own, stmts, ..
        } => {
            decls.extend(own.iter().cloned());
            for stmt in stmts {
                collect_into(stmt, decls);
            }
        }
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect_into(then_branch, decls);
            if let Some(else_branch) = else_branch {
                collect_into(else_branch, decls);
            }
        }
        Stmt::While { body, .. } => collect_into(body, decls),
        _ => {}
    }
}

// The per-function mapping from variable name to its x29-relative slot.
// Parameters come first, locals after, all at negative 8-byte offsets; a
// duplicate name overwrites the earlier slot.
pub struct FrameLayout {
    offsets: HashMap<String, i64>,
    params: Vec<String>,
    frame_size: i64,
}

impl FrameLayout {
    pub fn build(params: &[Param], decls: &[Declaration]) -> Self {
        let mut offsets = HashMap::new();
        let mut offset = 0i64;

        let names = params
            .iter()
            .map(|p| p.name.as_str())
            .chain(decls.iter().map(|d| d.name.as_str()));
        for name in names {
            offset -= SLOT_SIZE;
            offsets.insert(name.to_string(), offset);
        }

        let frame_size = round_up(-offset, FRAME_ALIGN).max(FRAME_ALIGN);

        Self {
            offsets,
            params: params.iter().map(|p| p.name.clone()).collect(),
            frame_size,
        }
    }

    /// Size of the local area allocated by `sub sp, sp, #F`; 16-aligned,
    /// at least 16.
    pub fn frame_size(&self) -> i64 {
        self.frame_size
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Resolve a name to its x29-relative byte offset.
    ///
    /// Parameters past the eighth are never spilled; they are read from the
    /// caller's frame, above our frame record, in the 16-byte slots our own
    /// call sequence leaves there.
    pub fn offset_of(&self, name: &str) -> Result<i64, CompileError> {
        if let Some(index) = self.params.iter().position(|p| p == name) {
            if index >= REGISTER_ARGS {
                let surplus = (self.params.len() - REGISTER_ARGS) as i64;
                let position = (index - REGISTER_ARGS) as i64;
                return Ok(FRAME_RECORD_SIZE + STACK_ARG_SIZE * (surplus + position));
            }
        }

        self.offsets
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnknownVariable {
                name: name.to_string(),
            })
    }
}

fn round_up(value: i64, align: i64) -> i64 {
    (value + align - 1) / align * align
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Type};

    fn param(name: &str) -> Param {
        Param {
            ty: Type::Long,
            name: name.to_string(),
        }
    }

    fn decl(name: &str) -> Declaration {
        Declaration {
            ty: Type::Long,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_collect_declarations_depth_first() {
        // { long a; if (1) { long b; } else { long c; } while (1) { long d; } long e; }
        let body = Stmt::Compound {
            decls: vec![decl("a")],
            stmts: vec![
                Stmt::If {
                    cond: Expr::IntLiteral(1),
                    then_branch: Box::new(Stmt::Compound {
                        decls: vec![decl("b")],
                        stmts: vec![],
                    }),
                    else_branch: Some(Box::new(Stmt::Compound {
                        decls: vec![decl("c")],
                        stmts: vec![],
                    })),
                },
                Stmt::While {
                    cond: Expr::IntLiteral(1),
                    body: Box::new(Stmt::Compound {
                        decls: vec![decl("d")],
                        stmts: vec![],
                    }),
                },
                Stmt::Compound {
                    decls: vec![decl("e")],
                    stmts: vec![],
                },
            ],
        };

        let names: Vec<String> = collect_declarations(&body)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_offsets_params_then_locals() {
        let frame = FrameLayout::build(&[param("a"), param("b")], &[decl("x")]);
        assert_eq!(frame.offset_of("a").unwrap(), -8);
        assert_eq!(frame.offset_of("b").unwrap(), -16);
        assert_eq!(frame.offset_of("x").unwrap(), -24);
    }

    #[test]
    fn test_frame_size_is_16_aligned_with_a_minimum() {
        assert_eq!(FrameLayout::build(&[], &[]).frame_size(), 16);
        assert_eq!(FrameLayout::build(&[param("a")], &[]).frame_size(), 16);
        assert_eq!(
            FrameLayout::build(&[param("a"), param("b")], &[decl("x")]).frame_size(),
            32
        );
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let frame = FrameLayout::build(&[], &[]);
        assert_eq!(
            frame.offset_of("ghost"),
            Err(CompileError::UnknownVariable {
                name: "ghost".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_declaration_overwrites_earlier_slot() {
        let frame = FrameLayout::build(&[], &[decl("x"), decl("y"), decl("x")]);
        assert_eq!(frame.offset_of("x").unwrap(), -24);
        assert_eq!(frame.offset_of("y").unwrap(), -16);
    }

    #[test]
    fn test_stack_parameters_resolve_above_the_frame_record() {
        let params: Vec<Param> = (0..10).map(|i| param(&format!("p{}", i))).collect();
        let frame = FrameLayout::build(&params, &[]);
        // Two stack parameters: the call sequence leaves them at
        // sp + 16·surplus, and the frame record adds another 16.
        assert_eq!(frame.offset_of("p8").unwrap(), 48);
        assert_eq!(frame.offset_of("p9").unwrap(), 64);
        // Register parameters keep their negative slots.
        assert_eq!(frame.offset_of("p0").unwrap(), -8);
        assert_eq!(frame.offset_of("p7").unwrap(), -64);
    }
}
