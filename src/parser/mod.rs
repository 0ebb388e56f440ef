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

mod ast_builder;

use crate::ast::Program;
use crate::errors::CompileError;
use ast_builder::AstBuilder;
use pest::Parser;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct MinCParser;

// Main parsing function that takes the entire source code string.
pub fn parse_program(source: &str) -> Result<Program, CompileError> {
    let pairs = MinCParser::parse(Rule::program, source)?;
    let mut defs = Vec::new();

    for pair in pairs.flatten().filter(|p| p.as_rule() == Rule::def) {
        defs.push(AstBuilder::new(pair).build_def()?);
    }

    Ok(Program { defs })
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn parse_single_def(source: &str) -> FunctionDef {
        let program = parse_program(source).unwrap();
        assert_eq!(program.defs.len(), 1);
        program.defs.into_iter().next().unwrap()
    }

    fn body_stmts(def: FunctionDef) -> Vec<Stmt> {
        match def.body {
            Stmt::Compound { stmts, .. } => stmts,
            other => panic!("expected a compound body, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_function() {
        let def = parse_single_def("long f() {}\n");
        assert_eq!(def.name, "f");
        assert_eq!(def.params, vec![]);
        assert_eq!(def.return_type, Type::Long);
        assert_eq!(
            def.body,
            Stmt::Compound {
                decls: vec![],
                stmts: vec![],
            }
        );
    }

    #[test]
    fn test_parse_parameters() {
        let def = parse_single_def("long f(long a, long b) {}\n");
        assert_eq!(
            def.params,
            vec![
                Param {
                    ty: Type::Long,
                    name: "a".to_string(),
                },
                Param {
                    ty: Type::Long,
                    name: "b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_declarations() {
        let def = parse_single_def("long f() { long x; long y; }\n");
        match def.body {
            Stmt::Compound { decls, .. } => {
                assert_eq!(decls.len(), 2);
                assert_eq!(decls[0].name, "x");
                assert_eq!(decls[1].name, "y");
            }
            other => panic!("expected a compound body, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_return_literal() {
        let stmts = body_stmts(parse_single_def("long f() { return 42; }\n"));
        assert_eq!(stmts, vec![Stmt::Return(Expr::IntLiteral(42))]);
    }

    #[test]
    fn test_parse_precedence() {
        // 1 + 2 * 3 must parse as 1 + (2 * 3).
        let stmts = body_stmts(parse_single_def("long f() { return 1 + 2 * 3; }\n"));
        assert_eq!(
            stmts,
            vec![Stmt::Return(Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::IntLiteral(1)),
                Box::new(Expr::Binary(
                    BinaryOp::Mul,
                    Box::new(Expr::IntLiteral(2)),
                    Box::new(Expr::IntLiteral(3)),
                )),
            ))]
        );
    }

    #[test]
    fn test_parse_left_associativity() {
        // 1 - 2 - 3 must parse as (1 - 2) - 3.
        let stmts = body_stmts(parse_single_def("long f() { return 1 - 2 - 3; }\n"));
        assert_eq!(
            stmts,
            vec![Stmt::Return(Expr::Binary(
                BinaryOp::Sub,
                Box::new(Expr::Binary(
                    BinaryOp::Sub,
                    Box::new(Expr::IntLiteral(1)),
                    Box::new(Expr::IntLiteral(2)),
                )),
                Box::new(Expr::IntLiteral(3)),
            ))]
        );
    }

    #[test]
    fn test_parse_comparison_and_logic() {
        let stmts = body_stmts(parse_single_def("long f(long a) { return a < 3 && a != 0; }\n"));
        assert_eq!(
            stmts,
            vec![Stmt::Return(Expr::Binary(
                BinaryOp::And,
                Box::new(Expr::Binary(
                    BinaryOp::Lt,
                    Box::new(Expr::Id("a".to_string())),
                    Box::new(Expr::IntLiteral(3)),
                )),
                Box::new(Expr::Binary(
                    BinaryOp::Ne,
                    Box::new(Expr::Id("a".to_string())),
                    Box::new(Expr::IntLiteral(0)),
                )),
            ))]
        );
    }

    #[test]
    fn test_parse_assignment_is_right_associative() {
        let stmts = body_stmts(parse_single_def("long f() { long a; long b; a = b = 1; }\n"));
        assert_eq!(
            stmts,
            vec![Stmt::Expr(Expr::Assign(
                Box::new(Expr::Id("a".to_string())),
                Box::new(Expr::Assign(
                    Box::new(Expr::Id("b".to_string())),
                    Box::new(Expr::IntLiteral(1)),
                )),
            ))]
        );
    }

    #[test]
    fn test_parse_unary() {
        let stmts = body_stmts(parse_single_def("long f(long a) { return -!a; }\n"));
        assert_eq!(
            stmts,
            vec![Stmt::Return(Expr::Unary(
                UnaryOp::Neg,
                Box::new(Expr::Unary(
                    UnaryOp::Not,
                    Box::new(Expr::Id("a".to_string())),
                )),
            ))]
        );
    }

    #[test]
    fn test_parse_call() {
        let stmts = body_stmts(parse_single_def("long f() { return g(1, 2); }\n"));
        assert_eq!(
            stmts,
            vec![Stmt::Return(Expr::Call(
                Box::new(Expr::Id("g".to_string())),
                vec![Expr::IntLiteral(1), Expr::IntLiteral(2)],
            ))]
        );
    }

    #[test]
    fn test_parse_if_else() {
        let stmts = body_stmts(parse_single_def(
            "long f(long x) { if (x) return 1; else return 2; }\n",
        ));
        assert_eq!(
            stmts,
            vec![Stmt::If {
                cond: Expr::Id("x".to_string()),
                then_branch: Box::new(Stmt::Return(Expr::IntLiteral(1))),
                else_branch: Some(Box::new(Stmt::Return(Expr::IntLiteral(2)))),
            }]
        );
    }

    #[test]
    fn test_parse_while_with_break_and_continue() {
        let stmts = body_stmts(parse_single_def(
            "long f() { while (1) { break; continue; } }\n",
        ));
        assert_eq!(
            stmts,
            vec![Stmt::While {
                cond: Expr::IntLiteral(1),
                body: Box::new(Stmt::Compound {
                    decls: vec![],
                    stmts: vec![Stmt::Break, Stmt::Continue],
                }),
            }]
        );
    }

    #[test]
    fn test_parse_keyword_prefixed_identifier() {
        // "breaker" must parse as an identifier, not as a break statement.
        let stmts = body_stmts(parse_single_def("long f(long breaker) { return breaker; }\n"));
        assert_eq!(stmts, vec![Stmt::Return(Expr::Id("breaker".to_string()))]);
    }

    #[test]
    fn test_parse_comments_are_skipped() {
        let def = parse_single_def(
            "// leading comment\nlong f() { /* inside */ return 0; }\n",
        );
        assert_eq!(def.name, "f");
    }

    #[test]
    fn test_parse_literal_out_of_range() {
        let result = parse_program("long f() { return 99999999999999999999; }\n");
        assert_eq!(
            result,
            Err(CompileError::LiteralOutOfRange {
                literal: "99999999999999999999".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_syntax_error() {
        let result = parse_program("long f( { }\n");
        assert!(matches!(result, Err(CompileError::PestError(_))));
    }
}
