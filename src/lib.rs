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

pub mod ast;
pub mod codegen;
pub mod errors;
pub mod parser;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

extern crate pest;
extern crate pest_derive;

/// Compile MinC source text into one AArch64 assembly translation unit.
pub fn compile(source: &str) -> Result<String> {
    let program = parser::parse_program(source).context("Failed during parsing stage")?;

    let assembly =
        codegen::generate_program(&program).context("Failed during code generation stage")?;

    Ok(assembly)
}

/// Compile a MinC source file.
pub fn compile_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;

    compile(&source)
}
