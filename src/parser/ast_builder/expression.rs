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
use crate::errors::CompileError;
use crate::parser::Rule;
use crate::parser::ast_builder::AstBuilder;

impl<'a> AstBuilder<'a> {
    // Build an expression from any pair in the expression tier hierarchy.
    pub fn build_expr(mut self) -> Result<Expr, CompileError> {
        match self.rule {
            Rule::expr | Rule::primary => {
                AstBuilder::new(self.pairs.next().unwrap()).build_expr()
            }
            Rule::assignment => self.build_assignment(),
            Rule::logical_or
            | Rule::logical_and
            | Rule::equality
            | Rule::relational
            | Rule::additive
            | Rule::multiplicative => self.build_binary_chain(),
            Rule::unary => self.build_unary(),
            Rule::postfix => self.build_postfix(),
            Rule::paren_expr => {
                let inner = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            Rule::int_literal => {
                let value =
                    self.text
                        .parse::<i64>()
                        .map_err(|_| CompileError::LiteralOutOfRange {
                            literal: self.text.to_string(),
                        })?;
                Ok(Expr::IntLiteral(value))
            }
            Rule::ident => Ok(Expr::Id(self.text.to_string())),
            _ => unreachable!("Unknown expression rule: {:?}", self.rule),
        }
    }

    // assignment = logical_or ("=" assignment)?, right associative
    fn build_assignment(mut self) -> Result<Expr, CompileError> {
        let target = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;

        if self.pairs.next().is_some() {
            // assign_op, followed by the nested assignment
            let value = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;
            return Ok(Expr::Assign(Box::new(target), Box::new(value)));
        }

        Ok(target)
    }

    // Fold an `operand (op operand)*` tier left associatively.
    fn build_binary_chain(mut self) -> Result<Expr, CompileError> {
        let mut expr = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;

        while let Some(op_pair) = self.pairs.next() {
            let op = binary_op_from_symbol(op_pair.as_str());
            let rhs = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;
            expr = Expr::Binary(op, Box::new(expr), Box::new(rhs));
        }

        Ok(expr)
    }

    fn build_unary(mut self) -> Result<Expr, CompileError> {
        let first = self.pairs.next().unwrap();
        match first.as_rule() {
            Rule::unary_op => {
                let op = match first.as_str() {
                    "-" => UnaryOp::Neg,
                    "!" => UnaryOp::Not,
                    other => unreachable!("Unknown unary operator: {}", other),
                };
                let operand = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;
                Ok(Expr::Unary(op, Box::new(operand)))
            }
            Rule::postfix => AstBuilder::new(first).build_expr(),
            other => unreachable!("Unknown unary rule: {:?}", other),
        }
    }

    // postfix = primary arg_list*; each argument list wraps the expression
    // built so far in another call.
    fn build_postfix(mut self) -> Result<Expr, CompileError> {
        let mut expr = AstBuilder::new(self.pairs.next().unwrap()).build_expr()?;

        for arg_list in self.pairs {
            let mut args = Vec::new();
            for arg in arg_list.into_inner() {
                args.push(AstBuilder::new(arg).build_expr()?);
            }
            expr = Expr::Call(Box::new(expr), args);
        }

        Ok(expr)
    }
}

fn binary_op_from_symbol(symbol: &str) -> BinaryOp {
    match symbol {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Rem,
        "<" => BinaryOp::Lt,
        ">" => BinaryOp::Gt,
        "<=" => BinaryOp::Le,
        ">=" => BinaryOp::Ge,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "&&" => BinaryOp::And,
        "||" => BinaryOp::Or,
        other => unreachable!("Unknown binary operator: {}", other),
    }
}
