use strum::Display;

/// General purpose registers of AArch64 plus the stack pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    X0,
    X1,
    X2,
    X3,
    X4,
    X5,
    X6,
    X7,
    X8,
    X9,
    X10,
    X11,
    X12,
    X13,
    X14,
    X15,
    X16,
    X17,
    X18,
    X19,
    X20,
    X21,
    X22,
    X23,
    X24,
    X25,
    X26,
    X27,
    X28,
    X29,
    X30,
    SP,
}

impl Reg {
    /// Frame pointer
    pub const FP: Reg = Reg::X29;
    /// Link register
    pub const LR: Reg = Reg::X30;
    /// Holds the syscall number for `svc`
    pub const SYSCALL: Reg = Reg::X16;
}
