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

use crate::ast::FunctionDef;
use crate::codegen::emitter::Emitter;
use crate::codegen::frame::{FrameLayout, REGISTER_ARGS, collect_declarations};
use crate::codegen::statement::generate_statement;
use crate::errors::CompileError;

// STACK, after the prologue:
//
// $sp          [locals, one 8-byte slot each, params first]
//              [ ...pad to 16... ]
// $fp == x29   [previous fp] | frame record
//   + 0x08     [previous lr] |
//   + 0x10     [caller stack arguments, 16 bytes each, when present]

/// Lower one function definition: symbol directives, frame setup, parameter
/// spill, body, epilogue.
pub fn generate_function(def: &FunctionDef, emitter: &mut Emitter) -> Result<(), CompileError> {
    let decls = collect_declarations(&def.body);
    let frame = FrameLayout::build(&def.params, &decls);
    let return_label = format!(".L_epilogue_{}", def.name);

    emitter.emit(format!(".global {}", def.name));
    emitter.emit(format!(".type {}, %function", def.name));
    emitter.label(&def.name);
    emitter.emit(".cfi_startproc");

    // Frame record first, so calls out of this function cannot lose x30;
    // x29 then stays pinned just above the local area for the whole body.
    emitter.emit("stp x29, x30, [sp, #-16]!");
    emitter.emit("mov x29, sp");
    emitter.emit(format!("sub sp, sp, #{}", frame.frame_size()));

    // Spill the register-passed parameters into their slots.
    for index in 0..def.params.len().min(REGISTER_ARGS) {
        emitter.emit(format!("str x{}, [x29, #-{}]", index, 8 * index + 8));
    }

    generate_statement(&def.body, &frame, &return_label, emitter)?;

    emitter.label(&return_label);
    emitter.emit(format!("add sp, sp, #{}", frame.frame_size()));
    emitter.emit("ldp x29, x30, [sp], #16");
    emitter.emit("ret");
    emitter.emit(".cfi_endproc");
    emitter.emit(format!(".size {0}, .-{0}", def.name));
    Ok(())
}
