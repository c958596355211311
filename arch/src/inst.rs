use crate::reg::Reg;
use color_print::cformat;
use std::fmt;

/// Second operand of data processing instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(u64),
}

/// Addressing modes of load/store instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    /// `[base, #offset]!` : base is updated before the access
    PreIndex(Reg, i64),
    /// `[base], #offset` : base is updated after the access
    PostIndex(Reg, i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    MOV(Reg, Operand),

    LDP(Reg, Reg, Addr),
    STP(Reg, Reg, Addr),

    BL(String),
    RET(),
    SVC(u16),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::Imm(imm) => write!(f, "#{}", imm),
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::PreIndex(base, off) => write!(f, "[{}, #{}]!", base, off),
            Addr::PostIndex(base, off) => write!(f, "[{}], #{}", base, off),
        }
    }
}

impl Inst {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Inst::MOV(..) => "mov",
            Inst::LDP(..) => "ldp",
            Inst::STP(..) => "stp",
            Inst::BL(..) => "bl",
            Inst::RET() => "ret",
            Inst::SVC(..) => "svc",
        }
    }

    pub fn operands(&self) -> String {
        match self {
            Inst::MOV(rd, op) => format!("{}, {}", rd, op),
            Inst::LDP(rt1, rt2, addr) | Inst::STP(rt1, rt2, addr) => {
                format!("{}, {}, {}", rt1, rt2, addr)
            }
            Inst::BL(label) => label.clone(),
            Inst::SVC(imm) => format!("#0x{:x}", imm),
            Inst::RET() => String::new(),
        }
    }

    pub fn cformat(&self) -> String {
        match self {
            Inst::BL(label) => {
                cformat!("<r>{:<6}</><m>{}</>", self.mnemonic(), label)
            }
            Inst::SVC(imm) => cformat!("<r>{:<6}</><y>#0x{:x}</>", self.mnemonic(), imm),
            _ => cformat!("<r>{:<6}</><b>{}</>", self.mnemonic(), self.operands()),
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            write!(f, "{}", self.mnemonic())
        } else {
            write!(f, "{}\t{}", self.mnemonic(), operands)
        }
    }
}
