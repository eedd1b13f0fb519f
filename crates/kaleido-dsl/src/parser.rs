use kaleido_core::types::{
    Attribute, AttributeSet, Field, FieldName, FieldType, Model, ModelName, PrimitiveType,
    SchemaDocument,
};

use crate::error::{DslError, DslWarning, Span};
use crate::lexer::{tokenize, SpannedToken};
use crate::token::Token;

const TIMESTAMPS: &str = "timestamps";
const BELONGS_TO: &str = "belongsTo";

/// A parsed document together with the warnings raised while parsing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub document: SchemaDocument,
    pub warnings: Vec<DslWarning>,
}

/// Line-oriented parser over a flat token list.
///
/// Text outside `model Name { ... }` blocks is ignored. Inside a block each
/// logical line is a field, the `timestamps` shorthand, or an error.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
    warnings: Vec<DslWarning>,
}

/// The model and field a body line belongs to, for error reporting.
struct LineContext<'c> {
    model: &'c str,
    field: &'c str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<SpannedToken>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            warnings: Vec::new(),
        }
    }

    // -- Cursor helpers --

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    /// Index of the next non-newline token at or after `from`.
    fn skip_newlines(&self, from: usize) -> usize {
        let mut i = from;
        while self.tokens.get(i).is_some_and(|t| t.token == Token::Newline) {
            i += 1;
        }
        i
    }

    fn slice(&self, span: &Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    // -- Document --

    fn parse_document(&mut self) -> Result<SchemaDocument, DslError> {
        let mut document = SchemaDocument::new();
        while let Some(tok) = self.peek() {
            if tok.token != Token::Model {
                self.pos += 1;
                continue;
            }
            let Some((name_tok, brace)) = self.model_header() else {
                self.pos += 1;
                continue;
            };
            let model = self.parse_model(self.pos, name_tok, brace)?;
            if document.contains(model.name.as_str()) {
                let name_tok = &self.tokens[name_tok];
                return Err(DslError::DuplicateModel {
                    model: model.name.to_string(),
                    line: name_tok.line,
                    span: name_tok.span.clone(),
                });
            }
            tracing::debug!(model = %model.name, fields = model.len(), "parsed model");
            document.insert(model).map_err(|source| {
                let name_tok = &self.tokens[name_tok];
                DslError::CoreSchemaError {
                    source,
                    line: name_tok.line,
                    span: name_tok.span.clone(),
                }
            })?;
        }
        Ok(document)
    }

    /// Matches `model <Ident> {` at the cursor, newlines allowed in between.
    /// Returns the indices of the name and the opening brace.
    fn model_header(&self) -> Option<(usize, usize)> {
        let name = self.skip_newlines(self.pos + 1);
        if self.tokens.get(name)?.token != Token::Ident {
            return None;
        }
        let brace = self.skip_newlines(name + 1);
        (self.tokens.get(brace)?.token == Token::LBrace).then_some((name, brace))
    }

    /// model = "model" IDENT "{" line* "}"
    ///
    /// The body runs from the first `{` to its matching `}` by depth counting.
    fn parse_model(&mut self, start: usize, name: usize, brace: usize) -> Result<Model, DslError> {
        let name_tok = self.tokens[name].clone();
        let model_name = ModelName::new(&name_tok.text).map_err(|source| {
            DslError::CoreSchemaError {
                source,
                line: name_tok.line,
                span: name_tok.span.clone(),
            }
        })?;

        let mut depth = 0usize;
        let mut close = None;
        for (i, tok) in self.tokens.iter().enumerate().skip(brace) {
            match tok.token {
                Token::LBrace => depth += 1,
                Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            let start_span = &self.tokens[start].span;
            return Err(DslError::UnbalancedBraces {
                model: model_name.to_string(),
                line: self.tokens[start].line,
                span: Span::new(start_span.start, self.source.len()),
            });
        };

        let body: Vec<SpannedToken> = self.tokens[brace + 1..close].to_vec();
        self.pos = close + 1;

        let mut fields: Vec<Field> = Vec::new();
        for line in body.split(|t| t.token == Token::Newline) {
            if line.is_empty() {
                continue;
            }
            for field in self.parse_line(&model_name, line)? {
                if fields.iter().any(|f| f.name == field.name) {
                    return Err(DslError::DuplicateField {
                        model: model_name.to_string(),
                        field: field.name.to_string(),
                        line: line[0].line,
                        span: line_span(line),
                    });
                }
                fields.push(field);
            }
        }

        Model::new(model_name, fields).map_err(|source| DslError::CoreSchemaError {
            source,
            line: name_tok.line,
            span: name_tok.span,
        })
    }

    // -- Body lines --

    fn parse_line(
        &mut self,
        model: &ModelName,
        line: &[SpannedToken],
    ) -> Result<Vec<Field>, DslError> {
        if let [only] = line {
            if only.token == Token::Ident && only.text == TIMESTAMPS {
                return Ok(timestamp_fields());
            }
        }

        match line {
            [name, colon, ty, rest @ ..]
                if name.token.is_name() && colon.token == Token::Colon && ty.token.is_name() =>
            {
                self.parse_field(model, line, name, ty, rest).map(|f| vec![f])
            }
            _ => Err(DslError::MalformedLine {
                model: model.to_string(),
                line: line[0].line,
                content: self.slice(&line_span(line)).to_string(),
                span: line_span(line),
            }),
        }
    }

    /// field = NAME ":" TYPE [ "(" IDENT ")" ] rest
    fn parse_field(
        &mut self,
        model: &ModelName,
        line: &[SpannedToken],
        name: &SpannedToken,
        ty: &SpannedToken,
        rest: &[SpannedToken],
    ) -> Result<Field, DslError> {
        let field_name = FieldName::new(&name.text).map_err(|source| DslError::CoreSchemaError {
            source,
            line: name.line,
            span: name.span.clone(),
        })?;

        let (field_type, rest) = if ty.text == BELONGS_TO {
            match rest {
                [open, target, close, tail @ ..]
                    if open.token == Token::LParen
                        && target.token == Token::Ident
                        && close.token == Token::RParen =>
                {
                    let target = ModelName::new(&target.text).map_err(|source| {
                        DslError::CoreSchemaError {
                            source,
                            line: target.line,
                            span: target.span.clone(),
                        }
                    })?;
                    (FieldType::BelongsTo(target), tail)
                }
                _ => {
                    let span = line_span(line);
                    return Err(DslError::MalformedField {
                        model: model.to_string(),
                        line: name.line,
                        content: self.slice(&span).to_string(),
                        reason: "belongsTo requires a target model, e.g. belongsTo(User)".into(),
                        span,
                    });
                }
            }
        } else {
            (FieldType::from_name(&ty.text), rest)
        };

        let ctx = LineContext {
            model: model.as_str(),
            field: field_name.as_str(),
        };
        let mut attributes = AttributeSet::new();
        for tok in rest {
            if tok.token == Token::Attribute {
                self.apply_attribute(&ctx, tok, &mut attributes)?;
            }
        }

        Ok(Field::with_attributes(field_name, field_type, attributes))
    }

    fn apply_attribute(
        &mut self,
        ctx: &LineContext<'_>,
        tok: &SpannedToken,
        attributes: &mut AttributeSet,
    ) -> Result<(), DslError> {
        let (name, args) = split_attribute(&tok.text);

        if name == "default" {
            let Some(value) = args.filter(|v| !v.is_empty()) else {
                self.warn(DslWarning::MissingDefaultValue {
                    model: ctx.model.to_string(),
                    field: ctx.field.to_string(),
                    line: tok.line,
                    span: tok.span.clone(),
                });
                return Ok(());
            };
            if attributes.default_value().is_some() {
                return Err(DslError::DuplicateDefault {
                    model: ctx.model.to_string(),
                    field: ctx.field.to_string(),
                    line: tok.line,
                    span: tok.span.clone(),
                });
            }
            attributes.insert(Attribute::Default(value.to_string()));
            return Ok(());
        }

        let Some(flag) = Attribute::flag(name) else {
            self.warn(DslWarning::UnknownAttribute {
                model: ctx.model.to_string(),
                field: ctx.field.to_string(),
                attribute: name.to_string(),
                line: tok.line,
                span: tok.span.clone(),
            });
            return Ok(());
        };

        if args.is_some() {
            self.warn(DslWarning::IgnoredArguments {
                model: ctx.model.to_string(),
                field: ctx.field.to_string(),
                attribute: name.to_string(),
                line: tok.line,
                span: tok.span.clone(),
            });
        }
        if !attributes.insert(flag) {
            self.warn(DslWarning::DuplicateAttribute {
                model: ctx.model.to_string(),
                field: ctx.field.to_string(),
                attribute: name.to_string(),
                line: tok.line,
                span: tok.span.clone(),
            });
        }
        Ok(())
    }

    fn warn(&mut self, warning: DslWarning) {
        tracing::warn!(line = warning.line(), "{warning}");
        self.warnings.push(warning);
    }
}

/// Splits `@name(args)` into the name and the trimmed arguments.
fn split_attribute(text: &str) -> (&str, Option<&str>) {
    let body = text.trim_start_matches('@');
    match body.split_once('(') {
        Some((name, rest)) => (name, Some(rest.trim_end_matches(')').trim())),
        None => (body, None),
    }
}

fn line_span(line: &[SpannedToken]) -> Span {
    match (line.first(), line.last()) {
        (Some(first), Some(last)) => first.span.join(&last.span),
        _ => Span::new(0, 0),
    }
}

fn timestamp_fields() -> Vec<Field> {
    ["created_at", "updated_at"]
        .into_iter()
        .filter_map(|name| FieldName::new(name).ok())
        .map(|name| {
            let mut attributes = AttributeSet::new();
            attributes.insert(Attribute::Nullable);
            Field::with_attributes(name, PrimitiveType::Timestamp.into(), attributes)
        })
        .collect()
}

/// Parses DSL source text into a schema document, keeping the warnings.
///
/// # Errors
///
/// Returns the first lexical or structural error. No partial document is
/// produced.
pub fn parse_with_warnings(source: &str) -> Result<Parsed, DslError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(source, tokens);
    let document = parser.parse_document()?;
    tracing::debug!(
        models = document.len(),
        warnings = parser.warnings.len(),
        "parsed schema document"
    );
    Ok(Parsed {
        document,
        warnings: parser.warnings,
    })
}

/// Parses DSL source text into a schema document.
///
/// Warnings are logged and otherwise discarded; use
/// [`parse_with_warnings`] to inspect them.
pub fn parse(source: &str) -> Result<SchemaDocument, DslError> {
    parse_with_warnings(source).map(|parsed| parsed.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Model {
        let doc = parse(source).expect("parse failed");
        assert_eq!(doc.len(), 1);
        let model = doc.models().next().cloned().unwrap();
        model
    }

    fn warnings(source: &str) -> Vec<DslWarning> {
        parse_with_warnings(source).expect("parse failed").warnings
    }

    #[test]
    fn parse_minimal_model() {
        let m = parse_one("model Tag {\n  label: string\n}");
        assert_eq!(m.name.as_str(), "Tag");
        let label = m.field("label").unwrap();
        assert_eq!(label.field_type, PrimitiveType::String.into());
        assert!(label.attributes.is_empty());
    }

    #[test]
    fn carriage_return_line_endings() {
        let m = parse_one("model A {\r  x: string\r  y: integer @unique\r}");
        let names: Vec<&str> = m.field_names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(m.field("y").unwrap().attributes.is_unique());

        let m = parse_one("model A {\r\n  x: string\r\n  timestamps\r\n}\r\n");
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn carriage_return_errors_report_lines() {
        let err = parse("model A {\r  x: string\r  y integer\r}").unwrap_err();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn parse_empty_model() {
        let m = parse_one("model Empty {}");
        assert!(m.is_empty());
    }

    #[test]
    fn header_may_span_lines() {
        let m = parse_one("model\nUser\n{\n  name: string\n}");
        assert_eq!(m.name.as_str(), "User");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn text_outside_blocks_is_ignored() {
        let doc = parse("hello world\nmodel\nmodel A { x: string }\n: stray }").unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.contains("A"));
    }

    #[test]
    fn single_line_model() {
        let m = parse_one("model A { x: integer @primary }");
        assert!(m.field("x").unwrap().attributes.is_primary());
    }

    #[test]
    fn timestamps_expand() {
        let m = parse_one("model A {\n  timestamps\n}");
        let names: Vec<_> = m.field_names().map(FieldName::as_str).collect();
        assert_eq!(names, vec!["created_at", "updated_at"]);
        for f in m.fields() {
            assert_eq!(f.field_type, PrimitiveType::Timestamp.into());
            assert!(f.is_nullable());
            assert_eq!(f.attributes.len(), 1);
        }
    }

    #[test]
    fn model_keyword_is_a_valid_field_name() {
        let m = parse_one("model Car {\n  model: string\n}");
        assert!(m.field("model").is_some());
    }

    #[test]
    fn unknown_types_are_preserved() {
        let m = parse_one("model A {\n  body: text\n  code: varchar(255) @unique\n}");
        assert_eq!(m.field("body").unwrap().field_type, FieldType::Other("text".into()));
        let code = m.field("code").unwrap();
        assert_eq!(code.field_type, FieldType::Other("varchar".into()));
        assert!(code.attributes.is_unique());
    }

    #[test]
    fn belongs_to() {
        let m = parse_one("model Post {\n  author: belongsTo(User) @nullable\n}");
        let author = m.field("author").unwrap();
        assert_eq!(author.relation_target().map(ModelName::as_str), Some("User"));
        assert!(author.is_nullable());
    }

    #[test]
    fn belongs_to_without_target_is_malformed() {
        for src in [
            "model P {\n  author: belongsTo\n}",
            "model P {\n  author: belongsTo()\n}",
            "model P {\n  author: belongsTo(User\n}",
        ] {
            let err = parse(src).unwrap_err();
            assert!(
                matches!(err, DslError::MalformedField { line: 2, .. }),
                "{src}: {err:?}"
            );
        }
    }

    #[test]
    fn default_value_is_raw_text() {
        let m = parse_one("model A {\n  status: string @default( 'draft' )\n}");
        assert_eq!(m.field("status").unwrap().attributes.default_value(), Some("'draft'"));
    }

    #[test]
    fn non_attribute_tokens_are_dropped() {
        let m = parse_one("model A {\n  x: string , @unique ; extra\n}");
        assert!(m.field("x").unwrap().attributes.is_unique());
    }

    #[test]
    fn unknown_attribute_warns() {
        let w = warnings("model A {\n  x: string @index @unique\n}");
        assert!(matches!(
            w.as_slice(),
            [DslWarning::UnknownAttribute { attribute, line: 2, .. }] if attribute == "index"
        ));
    }

    #[test]
    fn repeated_flag_warns_and_is_idempotent() {
        let parsed = parse_with_warnings("model A {\n  x: string @unique @unique\n}").unwrap();
        let x = parsed.document.get("A").unwrap().field("x").unwrap().clone();
        assert_eq!(x.attributes.len(), 1);
        assert!(matches!(
            parsed.warnings.as_slice(),
            [DslWarning::DuplicateAttribute { .. }]
        ));
    }

    #[test]
    fn default_without_value_warns() {
        let parsed = parse_with_warnings("model A {\n  x: string @default\n  y: string @default()\n}")
            .unwrap();
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed
            .warnings
            .iter()
            .all(|w| matches!(w, DslWarning::MissingDefaultValue { .. })));
        let a = parsed.document.get("A").unwrap();
        assert_eq!(a.field("x").unwrap().attributes.default_value(), None);
    }

    #[test]
    fn flag_arguments_warn() {
        let w = warnings("model A {\n  x: string @nullable(true)\n}");
        assert!(matches!(w.as_slice(), [DslWarning::IgnoredArguments { .. }]));
    }

    #[test]
    fn second_default_is_fatal() {
        let err = parse("model A {\n  x: integer @default(1) @default(2)\n}").unwrap_err();
        assert!(matches!(err, DslError::DuplicateDefault { ref field, line: 2, .. } if field == "x"));
    }

    #[test]
    fn duplicate_field_is_fatal() {
        let err = parse("model A {\n  x: string\n  x: integer\n}").unwrap_err();
        assert!(matches!(err, DslError::DuplicateField { ref field, line: 3, .. } if field == "x"));
    }

    #[test]
    fn timestamps_collision_is_fatal() {
        let err = parse("model A {\n  created_at: date\n  timestamps\n}").unwrap_err();
        assert!(
            matches!(err, DslError::DuplicateField { ref field, .. } if field == "created_at")
        );
    }

    #[test]
    fn malformed_line_reports_content() {
        let err = parse("model User {\n  name string\n}").unwrap_err();
        match err {
            DslError::MalformedLine {
                model,
                line,
                content,
                ..
            } => {
                assert_eq!(model, "User");
                assert_eq!(line, 2);
                assert_eq!(content, "name string");
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn nested_brace_line_is_malformed() {
        let err = parse("model A {\n  x: string\n  { }\n}").unwrap_err();
        assert!(matches!(err, DslError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn unbalanced_braces() {
        let err = parse("model A {\n  x: string\n  y: { \n}").unwrap_err();
        assert!(
            matches!(err, DslError::UnbalancedBraces { ref model, line: 1, .. } if model == "A")
        );
    }

    #[test]
    fn comments_are_ignored() {
        let m = parse_one("# users\nmodel A { # the A model\n  # note\n  x: string # trailing\n}");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn empty_source_is_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# nothing here\n").unwrap().is_empty());
    }
}
