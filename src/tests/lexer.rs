use crate::lexer::Lexer;
use crate::tokens::TokenType;
use crate::Options;

fn kinds(source: &str) -> Vec<TokenType> {
    let options = Options::default();
    Lexer::new(source, &options)
        .tokenize()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn basic_token_stream() {
    assert_eq!(
        kinds("# Hi\n\nWorld"),
        vec![
            TokenType::AtxHeading,
            TokenType::BlankLine,
            TokenType::ParagraphLine,
            TokenType::Eof,
        ]
    );
}

#[test]
fn exactly_one_eof_and_it_is_last() {
    for source in ["", "a", "# h\n- 1\n- 2\n\n> q\n", "```\nunterminated\n"] {
        let options = Options::default();
        let tokens = Lexer::new(source, &options).tokenize();
        let eof_count = tokens.iter().filter(|t| t.kind == TokenType::Eof).count();
        assert_eq!(eof_count, 1, "source: {:?}", source);
        assert_eq!(tokens.last().expect("nonempty").kind, TokenType::Eof);
    }
}

#[test]
fn offsets_are_monotonic_for_flat_documents() {
    let source = "# h\n\npara one\npara two\n\n    code\n\n---\n";
    let options = Options::default();
    let tokens = Lexer::new(source, &options).tokenize();
    let mut last = 0;
    for token in &tokens {
        assert!(token.start_offset >= last, "token {:?} went backwards", token);
        assert!(token.start_offset <= token.end_offset);
        assert!(token.end_offset <= source.len());
        last = token.start_offset;
    }
}

#[test]
fn fence_tokens() {
    assert_eq!(
        kinds("```rust\ncode\n```\n"),
        vec![
            TokenType::FencedCodeStart,
            TokenType::FencedCodeContent,
            TokenType::FencedCodeEnd,
            TokenType::Eof,
        ]
    );
}

#[test]
fn fence_start_encodes_indent_and_info() {
    let options = Options::default();
    let tokens = Lexer::new("  ```rust\n", &options).tokenize();
    assert_eq!(tokens[0].kind, TokenType::FencedCodeStart);
    assert_eq!(tokens[0].value, "I2:```rust");
}

#[test]
fn unterminated_fence_keeps_content_tokens() {
    assert_eq!(
        kinds("```\nstill here\n"),
        vec![
            TokenType::FencedCodeStart,
            TokenType::FencedCodeContent,
            TokenType::Eof,
        ]
    );
}

#[test]
fn quote_tokens() {
    assert_eq!(
        kinds("> hello\n"),
        vec![
            TokenType::BlockQuoteMarker,
            TokenType::ParagraphLine,
            TokenType::Eof,
        ]
    );
}

#[test]
fn list_marker_value_encodes_indent() {
    let options = Options::default();
    let tokens = Lexer::new("  - item\n", &options).tokenize();
    assert_eq!(tokens[0].kind, TokenType::ListItemMarker);
    assert_eq!(tokens[0].value, "  - ");
    assert_eq!(tokens[0].line_indent, 2);
}

#[test]
fn directive_token_sequence() {
    assert_eq!(
        kinds(":::{note} Title\n:key: value\nbody\n:::\n"),
        vec![
            TokenType::DirectiveOpen,
            TokenType::DirectiveName,
            TokenType::DirectiveTitle,
            TokenType::DirectiveOption,
            TokenType::ParagraphLine,
            TokenType::DirectiveClose,
            TokenType::Eof,
        ]
    );
}

#[test]
fn link_reference_definition_token() {
    let options = Options::default();
    let tokens = Lexer::new("[label]: /url \"title\"\n", &options).tokenize();
    assert_eq!(tokens[0].kind, TokenType::LinkReferenceDef);
    assert_eq!(tokens[0].value, "label|/url|title");
}

#[test]
fn multiline_link_reference_definition() {
    let options = Options::default();
    let tokens = Lexer::new("[label]:\n  /url\n", &options).tokenize();
    assert_eq!(tokens[0].kind, TokenType::LinkReferenceDef);
    assert_eq!(tokens[0].value, "label|/url|");
}

#[test]
fn html_block_accumulates_until_terminator() {
    let options = Options::default();
    let tokens = Lexer::new("<div>\na\nb\n", &options).tokenize();
    assert_eq!(tokens[0].kind, TokenType::HtmlBlock);
    assert_eq!(tokens[0].value, "<div>\na\nb\n");
}

#[test]
fn tab_indent_expansion() {
    let options = Options::default();
    let tokens = Lexer::new("\tfoo\n", &options).tokenize();
    assert_eq!(tokens[0].kind, TokenType::IndentedCode);
    assert_eq!(tokens[0].value, "foo\n");
    assert_eq!(tokens[0].line_indent, 4);
}

#[test]
fn blank_line_classification() {
    assert_eq!(
        kinds("a\n   \t\nb\n"),
        vec![
            TokenType::ParagraphLine,
            TokenType::BlankLine,
            TokenType::ParagraphLine,
            TokenType::Eof,
        ]
    );
}

#[test]
fn footnote_definition_token() {
    assert_eq!(
        kinds("[^id]: the note\n"),
        vec![TokenType::FootnoteDef, TokenType::Eof]
    );
}
