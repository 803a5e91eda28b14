//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse a component document into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let doc = document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect::<Vec<_>>())?;

    let mut errors = Vec::new();
    for node in doc.markup() {
        check_closing_tags(node, &mut errors);
    }
    if errors.is_empty() {
        Ok(doc)
    } else {
        Err(errors)
    }
}

/// Report closing tags whose name differs from the opening tag
fn check_closing_tags(node: &Spanned<Node>, errors: &mut Vec<crate::ParseError>) {
    let Node::Element(element) = &node.node else {
        return;
    };
    if let Some(close) = &element.closing_name {
        if close.node != element.name.node {
            errors.push(crate::ParseError::Syntax {
                span: close.span.clone(),
                message: format!(
                    "Closing tag '</{}>' does not match opening tag '<{}>'",
                    close.node, element.name.node
                ),
                expected: vec![format!("identifier '{}'", element.name.node)],
            });
        }
    }
    for child in &element.children {
        check_closing_tags(child, errors);
    }
}

/// Parse a standalone type expression such as `List<int>`
pub fn parse_type(input: &str) -> Option<TypeExpr> {
    let len = input.len();
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    type_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .ok()
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// Parser for type expressions: `int`, `List<T>`, `Dictionary<K, V>`, `T[]`
fn type_parser<'a, I>() -> impl Parser<'a, I, TypeExpr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|ty| {
        let type_args = ty
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::Lt), just(Token::Gt));

        let array_suffix = just(Token::BracketOpen)
            .then(just(Token::BracketClose))
            .repeated()
            .collect::<Vec<_>>();

        select! { Token::Ident(s) => s }
            .then(type_args.or_not())
            .then(array_suffix)
            .map(|((name, args), dims)| {
                let mut ty = TypeExpr::generic(name, args.unwrap_or_default());
                for _ in 0..dims.len() {
                    ty = TypeExpr::array(ty);
                }
                ty
            })
            .boxed()
    })
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Basic token parsers
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let type_expr = type_parser();

    let spanned_type = type_expr
        .clone()
        .map_with(|ty, e| Spanned::new(ty, span_range(&e.span())));

    // ==================== Declarations ====================

    // Type parameter list: <T1, T2>
    let type_params = identifier
        .clone()
        .separated_by(just(Token::Comma))
        .at_least(1)
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::Lt), just(Token::Gt))
        .or_not()
        .map(|opt| opt.unwrap_or_default());

    // Parameter declaration: param Items: List<TItem>
    let param_decl = just(Token::Param)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::Colon))
        .then(spanned_type.clone())
        .map_with(|(name, ty), e| Spanned::new(ParamDecl { name, ty }, span_range(&e.span())));

    // component Name<T> { param ... }
    let component_decl = just(Token::Component)
        .ignore_then(identifier.clone())
        .then(type_params)
        .then(
            param_decl
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
        )
        .map_with(|((name, type_params), params), e| {
            Item::Component(Spanned::new(
                ComponentDecl {
                    name,
                    type_params,
                    params,
                },
                span_range(&e.span()),
            ))
        });

    // let rows: List<string>
    let let_decl = just(Token::Let)
        .ignore_then(identifier.clone())
        .then_ignore(just(Token::Colon))
        .then(spanned_type)
        .map_with(|(name, ty), e| {
            Item::Let(Spanned::new(LetDecl { name, ty }, span_range(&e.span())))
        });

    // ==================== Markup ====================

    let binding = just(Token::At).ignore_then(select! { Token::Ident(s) => Identifier::new(s) });

    let attribute_value = choice((
        select! {
            Token::String(s) => AttributeValue::String(s),
            Token::Integer(n) => AttributeValue::Integer(n),
            Token::Float(n) => AttributeValue::Float(n),
            Token::True => AttributeValue::Bool(true),
            Token::False => AttributeValue::Bool(false),
        },
        binding.clone().map(AttributeValue::Binding),
        type_expr.map(AttributeValue::Path),
    ))
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    // name=value, or a bare name which reads as `name=true`
    let attribute = identifier
        .clone()
        .then(just(Token::Equals).ignore_then(attribute_value).or_not())
        .map_with(|(name, value), e| {
            let value = value
                .unwrap_or_else(|| Spanned::new(AttributeValue::Bool(true), name.span.clone()));
            Spanned::new(Attribute { name, value }, span_range(&e.span()))
        });

    let node = recursive(|node| {
        let open_tag = just(Token::Lt)
            .ignore_then(identifier.clone())
            .then(attribute.clone().repeated().collect::<Vec<_>>());

        let self_closing = just(Token::SelfClose)
            .map(|_| None::<(Vec<Spanned<Node>>, Spanned<Identifier>)>);

        let with_children = just(Token::Gt)
            .ignore_then(node.repeated().collect::<Vec<_>>())
            .then_ignore(just(Token::CloseTagOpen))
            .then(identifier.clone())
            .then_ignore(just(Token::Gt))
            .map(Some);

        let element = open_tag
            .then(choice((self_closing, with_children)))
            .map(|((name, attributes), body)| {
                let (children, closing_name) = match body {
                    Some((children, close)) => (children, Some(close)),
                    None => (Vec::new(), None),
                };
                Node::Element(Element {
                    name,
                    attributes,
                    children,
                    closing_name,
                })
            });

        let text = select! { Token::String(s) => Node::Text(s) };

        let expression = binding.clone().map(Node::Expression);

        choice((element, text, expression))
            .map_with(|n, e| Spanned::new(n, span_range(&e.span())))
            .boxed()
    });

    // Document is a list of items
    choice((component_decl, let_decl, node.map(Item::Markup)))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|items| Document { items })
}
