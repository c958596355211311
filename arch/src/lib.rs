pub mod inst;
pub mod reg;

pub use inst::{Addr, Inst, Operand};
pub use reg::Reg;
