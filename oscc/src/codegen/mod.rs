pub mod emitter;

use crate::grammer::ast::{AstNode, NodeKind};
use arch::{Addr, Inst, Operand, Reg};
use chrono::{DateTime, Utc};
use emitter::Emitter;
use itertools::chain;

/// Exit syscall number of the host kernel
const SYS_EXIT: u64 = 1;
const SVC_IMM: u16 = 0x80;

pub struct Generator {
    timestamp: DateTime<Utc>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now())
    }

    pub fn with_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    pub fn generate(&self, ast: &AstNode) -> Emitter {
        let mut emitter = Emitter::new();
        emitter.comment(format!(
            "Generated file on {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        emitter.directive(".global _start");
        emitter.directive(".align 2");
        emitter.blank();

        emitter.label("_start");
        emitter.insts([
            Inst::BL(label("main")),
            Inst::MOV(Reg::SYSCALL, Operand::Imm(SYS_EXIT)),
            Inst::SVC(SVC_IMM),
        ]);
        emitter.blank();

        let procs: Vec<_> = ast.children_of(NodeKind::Procedure).collect();
        for proc in &procs {
            emitter.label(label(&proc.value));
            emitter.insts(chain!(prologue(), body(proc), epilogue()));
            emitter.blank();
        }

        // The entry point always needs a `_main` to link against
        if !procs.iter().any(|proc| proc.value == "main") {
            emitter.label(label("main"));
            emitter.insts(chain!(prologue(), epilogue()));
            emitter.blank();
        }
        emitter
    }
}

/// `print-line` => `_print_line`
pub fn label(name: &str) -> String {
    format!("_{}", name.replace('-', "_"))
}

fn prologue() -> Vec<Inst> {
    vec![
        Inst::STP(Reg::LR, Reg::FP, Addr::PreIndex(Reg::SP, -16)),
        Inst::MOV(Reg::FP, Operand::Reg(Reg::SP)),
    ]
}

fn epilogue() -> Vec<Inst> {
    vec![
        Inst::MOV(Reg::SP, Operand::Reg(Reg::FP)),
        Inst::LDP(Reg::LR, Reg::FP, Addr::PostIndex(Reg::SP, 16)),
        Inst::RET(),
    ]
}

/// Lower the statements of a procedure. Only calls produce code so far.
fn body(proc: &AstNode) -> Vec<Inst> {
    let mut insts = Vec::new();
    for child in &proc.children {
        calls(child, &mut insts);
    }
    insts
}

fn calls(node: &AstNode, insts: &mut Vec<Inst>) {
    for child in &node.children {
        calls(child, insts);
    }
    if node.is(NodeKind::ProcedureCall) {
        insts.push(Inst::BL(label(&node.value)));
    }
}
