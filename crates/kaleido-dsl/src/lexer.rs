use logos::Logos;

use crate::error::{DslError, Span};
use crate::token::Token;

/// A token paired with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

/// Lazy tokenizer over DSL source text.
///
/// Yields tokens in source order and skips comments. After the first error
/// the iterator is exhausted.
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, Token>,
    line: usize,
    line_start: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            line: 1,
            line_start: 0,
            finished: false,
        }
    }

    fn column(&self, offset: usize) -> usize {
        self.source[self.line_start..offset].chars().count() + 1
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<SpannedToken, DslError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            let Some(result) = self.inner.next() else {
                self.finished = true;
                return None;
            };
            let range = self.inner.span();
            let span = Span::new(range.start, range.end);
            let line = self.line;
            let column = self.column(range.start);
            let text = self.inner.slice();

            let token = match result {
                Ok(token) => token,
                Err(()) => {
                    self.finished = true;
                    return Some(Err(DslError::InvalidToken { line, column, span }));
                }
            };

            match token {
                Token::Comment => continue,
                Token::Newline => {
                    self.line += 1;
                    self.line_start = range.end;
                }
                Token::Attribute if text.contains('(') && !text.ends_with(')') => {
                    self.finished = true;
                    return Some(Err(DslError::UnterminatedAttribute {
                        line,
                        column,
                        text: text.to_string(),
                        span,
                    }));
                }
                _ => {}
            }

            return Some(Ok(SpannedToken {
                token,
                span,
                text: text.to_string(),
                line,
                column,
            }));
        }
    }
}

/// Tokenizes DSL source text into a sequence of spanned tokens.
///
/// # Errors
///
/// Returns the first lexical error: input matching no rule, or an
/// attribute whose argument list is not closed on its line.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, DslError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn tokenize_model_header() {
        let tokens = tokenize("model User {").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token, Token::Model);
        assert_eq!(tokens[1].token, Token::Ident);
        assert_eq!(tokens[1].text, "User");
        assert_eq!(tokens[1].span, Span::new(6, 10));
        assert_eq!(tokens[2].token, Token::LBrace);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("model A {\n  name: string\n}").unwrap();
        let name = tokens.iter().find(|t| t.text == "name").unwrap();
        assert_eq!((name.line, name.column), (2, 3));
        let close = tokens.last().unwrap();
        assert_eq!(close.token, Token::RBrace);
        assert_eq!((close.line, close.column), (3, 1));
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        let tokens = tokenize("model A {\r  x: string\r\n  y: integer\r}").unwrap();
        let y = tokens.iter().find(|t| t.text == "y").unwrap();
        assert_eq!((y.line, y.column), (3, 3));
        assert_eq!(tokens.last().unwrap().line, 4);
    }

    #[test]
    fn columns_count_characters() {
        let tokens = tokenize("é x").unwrap();
        assert_eq!(tokens[1].column, 3);
        assert_eq!(tokens[1].span, Span::new(3, 4));
    }

    #[test]
    fn comments_are_discarded() {
        assert_eq!(
            kinds("# heading\nname: string # trailing\n"),
            vec![
                Token::Newline,
                Token::Ident,
                Token::Colon,
                Token::Ident,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn unterminated_attribute_is_an_error() {
        let err = tokenize("model A {\n  x: string @default(abc\n}").unwrap_err();
        match err {
            DslError::UnterminatedAttribute {
                line, column, text, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 13);
                assert_eq!(text, "@default(abc");
            }
            other => panic!("expected UnterminatedAttribute, got {other:?}"),
        }
    }

    #[test]
    fn lexer_is_lazy_and_stops_after_error() {
        let mut lexer = Lexer::new("a @x(1\nb c");
        assert!(matches!(lexer.next(), Some(Ok(SpannedToken { token: Token::Ident, .. }))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \t \x0c").unwrap().is_empty());
    }
}
