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

mod emitter;
mod expression;
mod frame;
mod function;
mod statement;

use crate::ast::Program;
use crate::errors::CompileError;
use emitter::Emitter;

// REGISTERS:
//
// x0        - expression results and the return value
// x0..x7    - argument registers
// x9..x15   - depth-indexed scratch pool for saved left operands
// x29       - frame pointer, the sole base for variable access
// x30       - link register, spilled in the frame record
// see: https://en.wikipedia.org/wiki/Calling_convention#ARM_(A64)

/// Translate a program into a single GNU-assembler translation unit, one
/// labeled procedure per function definition.
pub fn generate_program(program: &Program) -> Result<String, CompileError> {
    let mut emitter = Emitter::new();

    emitter.emit(".arch armv8-a");
    emitter.emit(".text");
    emitter.emit(".align 2");

    for def in &program.defs {
        function::generate_function(def, &mut emitter)?;
    }

    emitter.emit(".section .note.GNU-stack,\"\",@progbits");

    Ok(emitter.finish())
}
