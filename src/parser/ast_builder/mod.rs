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

mod expression;
mod statement;

use crate::ast::{FunctionDef, Param, Type};
use crate::errors::CompileError;
use crate::parser::Rule;
use pest::iterators::{Pair, Pairs};

pub struct AstBuilder<'a> {
    rule: Rule,
    text: &'a str,
    pairs: Pairs<'a, Rule>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(pair: Pair<'a, Rule>) -> Self {
        Self {
            rule: pair.as_rule(),
            text: pair.as_str(),
            pairs: pair.into_inner(),
        }
    }

    // Helper to build a function definition from a pest `def` pair.
    pub fn build_def(mut self) -> Result<FunctionDef, CompileError> {
        self.pairs.next(); // kw_long
        let name = self.pairs.next().unwrap().as_str().to_string();

        let mut params = Vec::new();
        let mut body = None;
        for pair in self.pairs {
            match pair.as_rule() {
                Rule::param_list => {
                    for param in pair.into_inner() {
                        params.push(build_param(param));
                    }
                }
                Rule::compound => {
                    body = Some(AstBuilder::new(pair).build_compound()?);
                }
                _ => {}
            }
        }

        Ok(FunctionDef {
            name,
            params,
            return_type: Type::Long,
            // The grammar guarantees every definition carries a compound body.
            body: body.unwrap(),
        })
    }
}

fn build_param(pair: Pair<Rule>) -> Param {
    let mut inner = pair.into_inner();
    inner.next(); // kw_long
    Param {
        ty: Type::Long,
        name: inner.next().unwrap().as_str().to_string(),
    }
}
