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

use crate::ast::{Declaration, Stmt, Type};
use crate::errors::CompileError;
use crate::parser::Rule;
use crate::parser::ast_builder::AstBuilder;

impl<'a> AstBuilder<'a> {
    // Build a statement from a pest `stmt` pair.
    pub fn build_stmt(mut self) -> Result<Stmt, CompileError> {
        let inner = self.pairs.next().unwrap();
        match inner.as_rule() {
            Rule::empty_stmt => Ok(Stmt::Empty),
            Rule::break_stmt => Ok(Stmt::Break),
            Rule::continue_stmt => Ok(Stmt::Continue),
            Rule::return_stmt => {
                let mut pairs = inner.into_inner();
                pairs.next(); // kw_return
                let expr = AstBuilder::new(pairs.next().unwrap()).build_expr()?;
                Ok(Stmt::Return(expr))
            }
            Rule::if_stmt => AstBuilder::new(inner).build_if(),
            Rule::while_stmt => AstBuilder::new(inner).build_while(),
            Rule::compound => AstBuilder::new(inner).build_compound(),
            Rule::expr_stmt => {
                let expr_pair = inner.into_inner().next().unwrap();
                Ok(Stmt::Expr(AstBuilder::new(expr_pair).build_expr()?))
            }
            _ => unreachable!("Unknown statement rule: {:?}", inner.as_rule()),
        }
    }

    // Declarations come first in the grammar, so one pass splits them off
    // from the statements that follow.
    pub fn build_compound(self) -> Result<Stmt, CompileError> {
        let mut decls = Vec::new();
        let mut stmts = Vec::new();

        for pair in self.pairs {
            match pair.as_rule() {
                Rule::declaration => {
                    let mut inner = pair.into_inner();
                    inner.next(); // kw_long
                    decls.push(Declaration {
                        ty: Type::Long,
                        name: inner.next().unwrap().as_str().to_string(),
                    });
                }
                Rule::stmt => stmts.push(AstBuilder::new(pair).build_stmt()?),
                _ => {}
            }
        }

        Ok(Stmt::Compound { decls, stmts })
    }

    fn build_if(mut self) -> Result<Stmt, CompileError> {
        self.pairs.next(); // kw_if
        let cond = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;
        let then_branch = Box::new(AstBuilder::new(self.pairs.next().unwrap()).build_stmt()?);

        let mut else_branch = None;
        if self.pairs.next().is_some() {
            // kw_else, followed by the else statement
            else_branch = Some(Box::new(
                AstBuilder::new(self.pairs.next().unwrap()).build_stmt()?,
            ));
        }

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn build_while(mut self) -> Result<Stmt, CompileError> {
        self.pairs.next(); // kw_while
        let cond = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;
        let body = Box::new(AstBuilder::new(self.pairs.next().unwrap()).build_stmt()?);

        Ok(Stmt::While { cond, body })
    }
}
