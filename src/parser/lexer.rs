//! Lexer for component documents using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Declaration keywords
    #[token("component")]
    Component,
    #[token("param")]
    Param,
    #[token("let")]
    Let,

    // Boolean literals
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Markup delimiters (order matters - longer patterns first)
    #[token("</")]
    CloseTagOpen,
    #[token("/>")]
    SelfClose,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("@")]
    At,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_.\-]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    String(String),

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok(), priority = 2)]
    Integer(i64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

/// Strip the surrounding quotes and resolve backslash escapes
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Tokenize input, dropping anything the lexer does not recognise
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_declaration_keywords() {
        assert_eq!(
            tokens("component param let"),
            vec![Token::Component, Token::Param, Token::Let]
        );
    }

    #[test]
    fn test_markup_delimiters() {
        assert_eq!(
            tokens("<a></a><b/>"),
            vec![
                Token::Lt,
                Token::Ident("a".to_string()),
                Token::Gt,
                Token::CloseTagOpen,
                Token::Ident("a".to_string()),
                Token::Gt,
                Token::Lt,
                Token::Ident("b".to_string()),
                Token::SelfClose,
            ]
        );
    }

    #[test]
    fn test_generic_type_tokens() {
        assert_eq!(
            tokens("List<Dictionary<string, int>>"),
            vec![
                Token::Ident("List".to_string()),
                Token::Lt,
                Token::Ident("Dictionary".to_string()),
                Token::Lt,
                Token::Ident("string".to_string()),
                Token::Comma,
                Token::Ident("int".to_string()),
                Token::Gt,
                Token::Gt,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            tokens("components letter"),
            vec![
                Token::Ident("components".to_string()),
                Token::Ident("letter".to_string()),
            ]
        );
    }

    #[test]
    fn test_qualified_and_hyphenated_identifiers() {
        assert_eq!(
            tokens("System.String data-id"),
            vec![
                Token::Ident("System.String".to_string()),
                Token::Ident("data-id".to_string()),
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            tokens(r#"42 -7 2.5 "hi" true false"#),
            vec![
                Token::Integer(42),
                Token::Integer(-7),
                Token::Float(2.5),
                Token::String("hi".to_string()),
                Token::True,
                Token::False,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""say \"hi\"\n""#),
            vec![Token::String("say \"hi\"\n".to_string())]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens("let // trailing\n/* block */ param"),
            vec![Token::Let, Token::Param]
        );
    }

    #[test]
    fn test_parentheses_are_not_tokens() {
        assert_eq!(
            tokens("f(x)"),
            vec![Token::Ident("f".to_string()), Token::Ident("x".to_string())]
        );
    }

    #[test]
    fn test_spans() {
        let spans: Vec<_> = lex("<Grid />").map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..1, 1..5, 6..8]);
    }
}
