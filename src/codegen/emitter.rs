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

use crate::errors::CompileError;

// Owns all mutable state of one translation: the output line buffer, the
// label counter, and the loop-label stacks. Created fresh per translation,
// so the output is deterministic.
pub struct Emitter {
    lines: Vec<String>,
    label_counter: usize,
    break_labels: Vec<String>,
    continue_labels: Vec<String>,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            label_counter: 0,
            break_labels: Vec::new(),
            continue_labels: Vec::new(),
        }
    }

    /// Append one instruction or directive line, tab indented.
    pub fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(format!("\t{}", line.into()));
    }

    /// Define a label at column 0.
    pub fn label(&mut self, name: &str) {
        self.lines.push(format!("{}:", name));
    }

    /// Produce a fresh local label, textually unique within this translation.
    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!(".L{}_{}", prefix, self.label_counter);
        self.label_counter += 1;
        label
    }

    /// Enter a loop: record where `break` and `continue` branch to.
    pub fn enter_loop(&mut self, break_label: String, continue_label: String) {
        self.break_labels.push(break_label);
        self.continue_labels.push(continue_label);
    }

    pub fn exit_loop(&mut self) -> Result<(), CompileError> {
        if self.break_labels.pop().is_none() || self.continue_labels.pop().is_none() {
            return Err(CompileError::LoopStackUnderflow);
        }
        Ok(())
    }

    pub fn break_target(&self) -> Result<String, CompileError> {
        self.break_labels
            .last()
            .cloned()
            .ok_or(CompileError::BreakOutsideLoop)
    }

    pub fn continue_target(&self) -> Result<String, CompileError> {
        self.continue_labels
            .last()
            .cloned()
            .ok_or(CompileError::ContinueOutsideLoop)
    }

    /// Join the accumulated lines into the final translation unit.
    pub fn finish(self) -> String {
        let mut output = self.lines.join("\n");
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_labels_count_up() {
        let mut emitter = Emitter::new();
        assert_eq!(emitter.fresh_label("loop"), ".Lloop_0");
        assert_eq!(emitter.fresh_label("endloop"), ".Lendloop_1");
        assert_eq!(emitter.fresh_label("loop"), ".Lloop_2");
    }

    #[test]
    fn test_loop_targets_track_innermost_loop() {
        let mut emitter = Emitter::new();
        assert_eq!(emitter.break_target(), Err(CompileError::BreakOutsideLoop));
        assert_eq!(
            emitter.continue_target(),
            Err(CompileError::ContinueOutsideLoop)
        );

        emitter.enter_loop(".Lendloop_0".to_string(), ".Lloop_1".to_string());
        emitter.enter_loop(".Lendloop_2".to_string(), ".Lloop_3".to_string());
        assert_eq!(emitter.break_target().unwrap(), ".Lendloop_2");
        assert_eq!(emitter.continue_target().unwrap(), ".Lloop_3");

        emitter.exit_loop().unwrap();
        assert_eq!(emitter.break_target().unwrap(), ".Lendloop_0");
        assert_eq!(emitter.continue_target().unwrap(), ".Lloop_1");
    }

    #[test]
    fn test_exit_loop_underflow() {
        let mut emitter = Emitter::new();
        assert_eq!(emitter.exit_loop(), Err(CompileError::LoopStackUnderflow));
    }

    #[test]
    fn test_finish_indents_instructions_but_not_labels() {
        let mut emitter = Emitter::new();
        emitter.emit("mov x0, #1");
        emitter.label(".Lend_0");
        assert_eq!(emitter.finish(), "\tmov x0, #1\n.Lend_0:\n");
    }
}
