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

use serde::Serialize;

// The only value type in MinC; every expression is a 64-bit signed integer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum Type {
    Long,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum UnaryOp {
    Neg, // -e
    Not, // !e
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum BinaryOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Rem, // %
    Lt,  // <
    Gt,  // >
    Le,  // <=
    Ge,  // >=
    Eq,  // ==
    Ne,  // !=
    And, // &&, short-circuit
    Or,  // ||, short-circuit
}

// --- Expressions ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    IntLiteral(i64),
    Id(String),
    Paren(Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    // The target must be an identifier; that is checked during lowering.
    Assign(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
}

// --- Statements ---

// A local variable declaration at the head of a compound statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub ty: Type,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Empty,
    Break,
    Continue,
    Expr(Expr),
    Return(Expr),
    Compound {
        decls: Vec<Declaration>,
        stmts: Vec<Stmt>,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
}

// --- Definitions ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub ty: Type,
    pub name: String,
}

// A single function definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub defs: Vec<FunctionDef>,
}
