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

use anyhow::{Context, Result};
use clap::Parser as clap_parser;
use mincc::compile_file;
use mincc::parser::parse_program;
use std::fs;
use std::path::PathBuf;

#[derive(clap_parser)]
#[clap(version = "0.1.0")]
struct Opts {
    #[clap(short, long)]
    input: PathBuf,
    /// Write the assembly here instead of standard output.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Print the parsed AST as JSON and exit without compiling.
    #[clap(long)]
    dump_ast: bool,
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    if opts.dump_ast {
        let source = fs::read_to_string(&opts.input)
            .with_context(|| format!("Failed to read source file: {}", opts.input.display()))?;
        let program = parse_program(&source).context("Failed during parsing stage")?;
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let assembly = compile_file(&opts.input)?;

    match &opts.output {
        Some(path) => {
            fs::write(path, &assembly)?;
            println!(
                "Successfully compiled {} to {}",
                opts.input.display(),
                path.display()
            );
        }
        None => print!("{}", assembly),
    }

    Ok(())
}
