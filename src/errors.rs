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

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CompileError {
    #[error("Syntax Error: {0}")]
    PestError(#[from] pest::error::Error<crate::parser::Rule>),

    #[error("Semantic Error: integer literal out of range: {literal}")]
    LiteralOutOfRange { literal: String },

    #[error("Semantic Error: unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Semantic Error: left side of an assignment must be a variable name")]
    InvalidAssignTarget,

    #[error("Semantic Error: 'break' statement outside of a loop")]
    BreakOutsideLoop,

    #[error("Semantic Error: 'continue' statement outside of a loop")]
    ContinueOutsideLoop,

    #[error("Internal Error: loop label stack underflow")]
    LoopStackUnderflow,
}
