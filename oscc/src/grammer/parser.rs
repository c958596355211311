use super::ast::{AstNode, NodeKind};
use super::parsercore::Parser;
use super::token::{Token, TokenKind::*};
use crate::error::Error;
use crate::{check, expect, optional, repeat};

impl<'a> Parser<'a> {
    pub fn parse(mut self) -> Result<AstNode, Error> {
        self.parse_program()
    }
}

impl<'a> Parser<'a> {
    /// program = { directive | declaration } EOF
    fn parse_program(&mut self) -> Result<AstNode, Error> {
        let mut items = Vec::new();
        loop {
            let token = self.peek().ok_or(Error::UnexpectedEOF)?;
            match token.kind {
                Dot => items.push(self.parse_directive()?),
                Declare => items.push(self.parse_declaration()?),
                Eof => break,
                _ => return Err(self.unexpected(token, "Dot | Declare | Eof")),
            }
        }
        Ok(AstNode::new(NodeKind::Root, "").with_children(items))
    }

    /// directive = "." ( "module" | "import" ) text
    fn parse_directive(&mut self) -> Result<AstNode, Error> {
        expect!(self, Dot)?;
        let name = expect!(self, Ident)?;
        match name.value.to_lowercase().as_str() {
            "module" | "import" => {
                let arg = expect!(self, Text)?;
                Ok(AstNode::new(NodeKind::Directive, name.value)
                    .with_children(vec![AstNode::new(NodeKind::Argument, arg.value)]))
            }
            _ => Err(Error::InvalidDirective(name.value, (&name.pos).into())),
        }
    }

    /// declaration = "declare" { modifier } ( structure | procedure | global )
    fn parse_declaration(&mut self) -> Result<AstNode, Error> {
        expect!(self, Declare)?;
        let modifiers = repeat!(self, self.parse_modifier(), Struct | LBracket | Eof);

        let token = self.peek().ok_or(Error::UnexpectedEOF)?;
        let mut node = match token.kind {
            Struct => self.parse_structure()?,
            LBracket => {
                let ty = self.parse_type()?;
                if check!(self, DoubleColon) {
                    self.parse_procedure(ty)?
                } else {
                    // global = type ident ":" rhs
                    let name = self.parse_ident()?;
                    expect!(self, Colon)?;
                    let value = self.parse_rhs()?;
                    let target = AstNode::new(NodeKind::Variable, name).typed_as(&ty);
                    AstNode::new(NodeKind::Declaration, "").with_children(vec![target, value])
                }
            }
            _ => return Err(self.unexpected(token, "Struct | LBracket")),
        };
        node.children.extend(modifiers);
        Ok(node)
    }

    /// modifier = "public" | "private"
    fn parse_modifier(&mut self) -> Result<AstNode, Error> {
        let token = expect!(self, Modifier)?;
        Ok(AstNode::new(NodeKind::Modifier, token.value))
    }

    /// type = "[" ( ident | "struct" ) [ "(" number ")" ] [ "*" ] "]"
    fn parse_type(&mut self) -> Result<AstNode, Error> {
        expect!(self, LBracket)?;
        let name = expect!(self, Ident | Struct)?;
        let mut ty = AstNode::new(NodeKind::Type, name.value.to_string());
        ty.value_size = optional!(self, LParen, {
            let size = self.parse_number()?;
            expect!(self, RParen)?;
            size
        });
        ty.is_pointer = optional!(self, Asterisk).is_some();
        expect!(self, RBracket)?;
        Ok(ty)
    }

    /// structure = "struct" ident { field } "end"
    fn parse_structure(&mut self) -> Result<AstNode, Error> {
        expect!(self, Struct)?;
        let name = self.parse_ident()?;
        let fields = repeat!(self, self.parse_field(&name), End | Eof);
        expect!(self, End)?;
        Ok(AstNode::new(NodeKind::Structure, name).with_children(fields))
    }

    /// field = type ident
    ///       | "[struct]" ident "begin" { field } "end"
    fn parse_field(&mut self, parent: &str) -> Result<AstNode, Error> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        if !ty.value.eq_ignore_ascii_case("struct") {
            return Ok(AstNode::new(NodeKind::Field, name).with_children(vec![ty]));
        }

        // Implicit structure, named by its path from the outermost structure
        let path = format!("{}::{}", parent, name);
        expect!(self, Begin)?;
        let fields = repeat!(self, self.parse_field(&path), End | Eof);
        expect!(self, End)?;
        let mut node = AstNode::new(NodeKind::Structure, name).with_children(fields);
        node.path = Some(path);
        Ok(node)
    }

    /// procedure = type "::" ident "(" [ param { "," param } ] ")" { statement } "end"
    fn parse_procedure(&mut self, returns: AstNode) -> Result<AstNode, Error> {
        expect!(self, DoubleColon)?;
        let name = self.parse_ident()?;
        expect!(self, LParen)?;
        let params = repeat!(self, self.parse_parameter(), Comma, RParen);
        expect!(self, RParen)?;
        let body = repeat!(self, self.parse_statement(), End | Eof);
        expect!(self, End)?;

        let mut children = vec![returns];
        children.extend(params);
        children.extend(body);
        Ok(AstNode::new(NodeKind::Procedure, name).with_children(children))
    }

    /// param = type ident
    fn parse_parameter(&mut self) -> Result<AstNode, Error> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        Ok(AstNode::new(NodeKind::Argument, name)
            .typed_as(&ty)
            .with_children(vec![ty]))
    }

    /// statement = "declare" type ident ":" rhs
    ///           | path ":" rhs
    ///           | "ret" [ rhs ]
    ///           | "print" rhs
    ///           | call
    fn parse_statement(&mut self) -> Result<AstNode, Error> {
        let token = self.peek().ok_or(Error::UnexpectedEOF)?;
        match token.kind {
            Declare => {
                expect!(self, Declare)?;
                let ty = self.parse_type()?;
                let name = self.parse_ident()?;
                expect!(self, Colon)?;
                let value = self.parse_rhs()?;
                let target = AstNode::new(NodeKind::Variable, name).typed_as(&ty);
                Ok(AstNode::new(NodeKind::Declaration, "").with_children(vec![target, value]))
            }
            Ident => {
                let target = self.parse_path()?;
                expect!(self, Colon)?;
                let value = self.parse_rhs()?;
                Ok(AstNode::new(NodeKind::Assignment, "").with_children(vec![target, value]))
            }
            Ret => {
                expect!(self, Ret)?;
                let mut node = AstNode::new(NodeKind::Return, "");
                if !check!(self, End) {
                    node.children.push(self.parse_rhs()?);
                }
                Ok(node)
            }
            Print => {
                expect!(self, Print)?;
                let value = self.parse_rhs()?;
                Ok(AstNode::new(NodeKind::Print, "").with_children(vec![value]))
            }
            Call => self.parse_call(),
            _ => Err(self.unexpected(token, "Declare | Ident | Ret | Print | Call")),
        }
    }

    /// rhs = "init" type | number | text | path | "*" ident | anon | call
    fn parse_rhs(&mut self) -> Result<AstNode, Error> {
        let token = self.peek().ok_or(Error::UnexpectedEOF)?;
        match token.kind {
            Init => {
                expect!(self, Init)?;
                let ty = self.parse_type()?;
                Ok(AstNode::new(NodeKind::Allocation, "").typed_as(&ty))
            }
            Number => {
                let token = expect!(self, Number)?;
                number(&token)?;
                Ok(AstNode::new(NodeKind::Scalar, token.value).with_type("int"))
            }
            Text => {
                let token = expect!(self, Text)?;
                let mut node = AstNode::new(NodeKind::Scalar, token.value).with_type("string");
                node.value_size = Some(node.value.len() as u64);
                Ok(node)
            }
            Ident => self.parse_path(),
            Asterisk => {
                expect!(self, Asterisk)?;
                let mut node = AstNode::new(NodeKind::Variable, self.parse_ident()?);
                node.is_pointer = true;
                Ok(node)
            }
            Declare => self.parse_anon(),
            Call => self.parse_call(),
            _ => Err(self.unexpected(token, "Init | Number | Text | Ident | Asterisk | Declare | Call")),
        }
    }

    /// call = "call" ident "(" [ rhs { "," rhs } ] ")"
    fn parse_call(&mut self) -> Result<AstNode, Error> {
        expect!(self, Call)?;
        let name = self.parse_ident()?;
        expect!(self, LParen)?;
        let args = repeat!(
            self,
            self.parse_rhs()
                .map(|value| AstNode::new(NodeKind::Argument, "").with_children(vec![value])),
            Comma,
            RParen
        );
        expect!(self, RParen)?;
        Ok(AstNode::new(NodeKind::ProcedureCall, name).with_children(args))
    }

    /// anon = "declare" "anon" { ident ":" rhs | ident } "end"
    fn parse_anon(&mut self) -> Result<AstNode, Error> {
        expect!(self, Declare)?;
        expect!(self, Anon)?;
        let members = repeat!(self, self.parse_anon_member(), End | Eof);
        expect!(self, End)?;
        Ok(AstNode::new(NodeKind::Structure, "").with_children(members))
    }

    fn parse_anon_member(&mut self) -> Result<AstNode, Error> {
        let explicit = self.is_at_sequence(&[Ident, Colon]);
        let name = self.parse_ident()?;
        let field = AstNode::new(NodeKind::Field, name.clone());
        let value = if explicit {
            expect!(self, Colon)?;
            self.parse_rhs()?
        } else {
            // Shorthand: `first-name` is `first-name : first-name`
            AstNode::new(NodeKind::Variable, name)
        };
        Ok(AstNode::new(NodeKind::Assignment, "").with_children(vec![field, value]))
    }

    /// path = ident { "::" ident [ "(" ( number | path ) ")" ] }
    fn parse_path(&mut self) -> Result<AstNode, Error> {
        let base = self.parse_ident()?;
        let mut prefix = base.clone();
        let mut segments = Vec::new();
        while optional!(self, DoubleColon).is_some() {
            let name = self.parse_ident()?;
            prefix = format!("{}::{}", prefix, name);
            let mut segment = AstNode::new(NodeKind::Field, name);
            segment.path = Some(prefix.clone());
            if optional!(self, LParen).is_some() {
                if check!(self, Number) {
                    segment.offset = self.parse_number()?;
                } else if check!(self, Ident) {
                    let mut offset = self.parse_path()?;
                    offset.kind = NodeKind::DynOffset;
                    segment.children.push(offset);
                } else {
                    let token = self.peek().ok_or(Error::UnexpectedEOF)?;
                    return Err(self.unexpected(token, "Number | Ident"));
                }
                expect!(self, RParen)?;
            }
            segments.push(segment);
        }

        // a::b::c => Variable a { Field b { Field c } }
        let chain = segments.into_iter().rev().fold(None, |inner, mut segment| {
            segment.children.extend(inner);
            Some(segment)
        });
        Ok(AstNode::new(NodeKind::Variable, base).with_children(chain.into_iter().collect()))
    }

    fn parse_ident(&mut self) -> Result<String, Error> {
        Ok(expect!(self, Ident)?.value)
    }

    fn parse_number(&mut self) -> Result<u64, Error> {
        let token = expect!(self, Number)?;
        number(&token)
    }
}

fn number(token: &Token) -> Result<u64, Error> {
    token
        .value
        .parse::<u64>()
        .map_err(|_| Error::InvalidNumber(token.value.clone(), (&token.pos).into()))
}
