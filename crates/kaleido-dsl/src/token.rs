use logos::Logos;

/// Tokens produced by the Kaleido DSL lexer.
///
/// Spaces, tabs and form feeds are skipped. Line breaks (`\n`, `\r\n` or a
/// lone `\r`) are significant because each field sits on its own line.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f]+")]
pub enum Token {
    // -- Keywords --
    #[token("model")]
    Model,

    // -- Punctuation --
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"\r\n|\r|\n")]
    Newline,

    // -- Attributes --
    /// `@name` or `@name(args)`. Arguments stop at the first `)` and never
    /// cross a line break. A missing `)` is reported by the lexer.
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*(\([^)\r\n]*\)?)?")]
    Attribute,

    /// `#` to end of line.
    #[regex(r"#[^\r\n]*")]
    Comment,

    // -- Identifiers --
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// Any other single non-whitespace character.
    #[regex(r"[^ \t\r\f\n]", priority = 0)]
    Other,
}

impl Token {
    /// Returns a human-readable description of this token kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Model => "'model'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Newline => "newline",
            Self::Attribute => "attribute",
            Self::Comment => "comment",
            Self::Ident => "identifier",
            Self::Other => "character",
        }
    }

    /// Identifiers, plus the `model` keyword where a name is expected.
    pub fn is_name(&self) -> bool {
        matches!(self, Self::Ident | Self::Model)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Token::lexer(input).map(|r| r.expect("lex error")).collect()
    }

    fn slices(input: &str) -> Vec<&str> {
        let mut lexer = Token::lexer(input);
        let mut out = Vec::new();
        while let Some(result) = lexer.next() {
            result.expect("lex error");
            out.push(lexer.slice());
        }
        out
    }

    #[test]
    fn keyword_and_identifiers() {
        assert_eq!(
            lex("model models Model _x1"),
            vec![Token::Model, Token::Ident, Token::Ident, Token::Ident]
        );
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            lex("{ } : , ( )"),
            vec![
                Token::LBrace,
                Token::RBrace,
                Token::Colon,
                Token::Comma,
                Token::LParen,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn newlines_are_tokens() {
        assert_eq!(
            lex("a\r\n\nb"),
            vec![Token::Ident, Token::Newline, Token::Newline, Token::Ident]
        );
    }

    #[test]
    fn carriage_returns_break_lines() {
        assert_eq!(slices("a\rb\r\nc"), vec!["a", "\r", "b", "\r\n", "c"]);
        assert_eq!(slices("# note\rb"), vec!["# note", "\r", "b"]);
        assert_eq!(slices("@default(x\ry"), vec!["@default(x", "\r", "y"]);
    }

    #[test]
    fn attributes_are_single_tokens() {
        assert_eq!(
            slices("@unique @default('a b') @nullable(x)"),
            vec!["@unique", "@default('a b')", "@nullable(x)"]
        );
        assert_eq!(lex("@default(1)"), vec![Token::Attribute]);
    }

    #[test]
    fn attribute_arguments_end_at_first_paren() {
        assert_eq!(slices("@default(f(x))"), vec!["@default(f(x)", ")"]);
    }

    #[test]
    fn unterminated_attribute_stops_at_newline() {
        assert_eq!(slices("@default(abc\nx"), vec!["@default(abc", "\n", "x"]);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(slices("a # note { }\nb"), vec!["a", "# note { }", "\n", "b"]);
    }

    #[test]
    fn stray_characters_are_other() {
        assert_eq!(lex("@ ; é"), vec![Token::Other, Token::Other, Token::Other]);
    }
}
