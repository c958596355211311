use crate::codegen::emitter::Emitter;
use crate::error::{Error, Warning};
use color_print::cprintln;
use itertools::Itertools;
use std::path::PathBuf;

pub fn error(err: &Error) {
    cprintln!("<r,s>[ERROR]</> {}", err);
}

pub fn warning(warn: &Warning) {
    cprintln!("<y,s>[WARNING]</> {}", warn);
}

pub fn artifacts(paths: &[PathBuf]) {
    let list = paths.iter().map(|path| path.display()).join(", ");
    cprintln!("<g,s>[DONE]</> wrote {}", list);
}

/// Print the generated assembly with line numbers
pub fn listing(asm: &Emitter) {
    println!("+------+------------------------------------------------------------------------");
    for (idx, line) in asm.lines().iter().enumerate() {
        cprintln!("| <c>{:>4}</> | {}", idx + 1, line.cformat());
    }
    println!("+------+------------------------------------------------------------------------");
}
