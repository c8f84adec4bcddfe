use crate::ast::{Document, Node, Prop, Value};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek().clone() {
            Token::Ident(s) => {
                self.advance();
                Ok(s)
            }
            tok => Err(self.err(format!("expected a name, got {tok:?}"))),
        }
    }

    fn at_prop(&self) -> bool {
        matches!(self.peek(), Token::Ident(_)) && self.peek_ahead(1) == &Token::Colon
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let root = self.parse_node()?;
        match self.peek() {
            Token::Eof => Ok(Document { root }),
            tok => Err(self.err(format!("unexpected {tok:?} after the root node"))),
        }
    }

    // ── Node ──────────────────────────────────────────────────────────────

    /// `name args? header-props? block?`
    ///
    /// Arguments start with a literal (number, string, expression, color);
    /// further arguments follow commas. Properties written right after the
    /// arguments belong to this node, not to the enclosing block.
    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let (line, col) = self.current_pos();
        let name = self.expect_ident()?;

        let mut args = Vec::new();
        if matches!(self.peek(), Token::Number(_) | Token::Str(_) | Token::Expr(_) | Token::Color(_)) {
            args = self.parse_values()?;
        }

        let mut props = Vec::new();
        while self.at_prop() {
            props.push(self.parse_prop()?);
        }

        let mut children = Vec::new();
        if self.peek() == &Token::LBrace {
            self.parse_block(&mut props, &mut children)?;
        }

        Ok(Node { name, args, props, children, line, col })
    }

    // ── Block ─────────────────────────────────────────────────────────────

    /// `{ item* }` where each item is a `key: value` property or a child node.
    ///
    /// `Ident ":"` starts a property; any other `Ident` starts a child.
    fn parse_block(&mut self, props: &mut Vec<Prop>, children: &mut Vec<Node>) -> Result<(), ParseError> {
        let (line, col) = self.current_pos();
        self.advance(); // `{`

        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    return Ok(());
                }
                Token::Eof => return Err(ParseError::new("unclosed '{' block", line, col)),
                Token::Ident(_) => {
                    if self.at_prop() {
                        props.push(self.parse_prop()?);
                    } else {
                        children.push(self.parse_node()?);
                    }
                }
                tok => {
                    return Err(self.err(format!(
                        "unexpected {tok:?} inside block, expected a property (key: value) or a node name"
                    )));
                }
            }
        }
    }

    // ── Prop ──────────────────────────────────────────────────────────────

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        let key = self.expect_ident()?;
        self.advance(); // `:`
        let values = self.parse_values()?;
        Ok(Prop { key, values })
    }

    // ── Value ─────────────────────────────────────────────────────────────

    /// `value (, value)*`
    fn parse_values(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut values = vec![self.parse_value()?];
        while self.peek() == &Token::Comma {
            self.advance();
            values.push(self.parse_value()?);
        }
        Ok(values)
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let value = match self.peek() {
            Token::Str(s) => Value::Str(s.clone()),
            Token::Number(n) => Value::Number(*n),
            Token::Expr(e) => Value::Expr(e.clone()),
            Token::Color(c) => Value::Color(c.clone()),
            Token::Ident(s) if self.peek_ahead(1) != &Token::Colon => Value::Ident(s.clone()),
            tok => return Err(self.err(format!("expected a value, got {tok:?}"))),
        };
        self.advance();
        Ok(value)
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse a `.graph` source string into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
