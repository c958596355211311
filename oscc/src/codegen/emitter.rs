use arch::Inst;
use color_print::cformat;
use std::fmt;

/// A line of assembly output
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Assembler directive, e.g. `.align 2`
    Directive(String),
    /// Label definition
    Label(String),
    Inst(Inst),
    Comment(String),
    Blank,
}

impl Line {
    pub fn cformat(&self) -> String {
        match self {
            Line::Directive(text) => cformat!("<c>{}</>", text),
            Line::Label(name) => cformat!("<m>{}</>:", name),
            Line::Inst(inst) => format!("    {}", inst.cformat()),
            Line::Comment(text) => cformat!("<g>; {}</>", text),
            Line::Blank => String::new(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Directive(text) => write!(f, "{}", text),
            Line::Label(name) => write!(f, "{}:", name),
            Line::Inst(inst) => write!(f, "\t{}", inst),
            Line::Comment(text) => write!(f, "; {}", text),
            Line::Blank => Ok(()),
        }
    }
}

/// Append-only buffer of assembly lines
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    lines: Vec<Line>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directive(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Directive(text.into()));
    }

    pub fn label(&mut self, name: impl Into<String>) {
        self.lines.push(Line::Label(name.into()));
    }

    pub fn inst(&mut self, inst: Inst) {
        self.lines.push(Line::Inst(inst));
    }

    pub fn insts(&mut self, insts: impl IntoIterator<Item = Inst>) {
        self.lines.extend(insts.into_iter().map(Line::Inst));
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Comment(text.into()));
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::Blank);
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Assembly source text, one line each
    pub fn render(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }

    /// Colored listing for the terminal
    pub fn listing(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}\n", line.cformat()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{Operand, Reg};

    #[test]
    fn render_lines() {
        let mut emitter = Emitter::new();
        emitter.comment("hello");
        emitter.directive(".align 2");
        emitter.blank();
        emitter.label("_start");
        emitter.inst(Inst::MOV(Reg::X16, Operand::Imm(1)));
        assert_eq!(
            emitter.render(),
            "; hello\n.align 2\n\n_start:\n\tmov\tx16, #1\n"
        );
        assert_eq!(emitter.lines().len(), 5);
    }
}
