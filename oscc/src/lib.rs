pub mod analyze;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod grammer;
pub mod util;

pub use analyze::{Analysis, Analyzer};
pub use codegen::Generator;
pub use driver::{compile, Options};
pub use error::{Error, Warning};
pub use grammer::ast::{AstNode, NodeKind};
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::Parser;
pub use grammer::token::{Token, TokenKind};

pub fn tokenize<'a>(file: &'a str, source: &str) -> Result<Vec<Token<'a>>, Error> {
    Lexer::new(file, source).tokenize()
}

pub fn parse(tokens: Vec<Token>) -> Result<AstNode, Error> {
    Parser::new(tokens).parse()
}

pub fn analyze(ast: AstNode) -> Result<Analysis, Error> {
    Analyzer::new().analyze(ast)
}

pub fn generate(ast: &AstNode) -> String {
    Generator::new().generate(ast).render()
}
