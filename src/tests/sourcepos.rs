use crate::nodes::Block;
use crate::{parse, Options};

#[test]
fn document_spans_whole_source() {
    let source = "# a\n\npara\n";
    let doc = parse(source, &Options::default());
    assert_eq!(doc.location.offset, 0);
    assert_eq!(doc.location.end_offset, source.len());
}

#[test]
fn block_locations_are_contained_in_document() {
    let source = "# head\n\npara one\n\n- item\n\n> quote\n\n```\ncode\n```\n";
    let doc = parse(source, &Options::default());
    assert!(!doc.children.is_empty());
    for block in &doc.children {
        let location = block.location();
        assert!(
            doc.location.contains(location),
            "block {:?} escapes the document range",
            block
        );
        assert!(location.offset <= location.end_offset);
    }
}

#[test]
fn heading_location_is_line_accurate() {
    let source = "para\n\n## second\n";
    let doc = parse(source, &Options::default());
    match &doc.children[1] {
        Block::Heading(heading) => {
            assert_eq!(heading.location.line, 3);
            assert_eq!(heading.location.column, 1);
            assert_eq!(heading.location.offset, 6);
        }
        other => panic!("expected heading, got {:?}", other),
    }
}

#[test]
fn fenced_code_offsets_within_source() {
    let source = "before\n\n```\nthe code\n```\n";
    let doc = parse(source, &Options::default());
    match &doc.children[1] {
        Block::FencedCode(code) => {
            assert!(code.source_start <= code.source_end);
            assert!(code.source_end <= source.len());
            assert_eq!(&source[code.source_start..code.source_end], "the code\n");
        }
        other => panic!("expected fenced code, got {:?}", other),
    }
}

#[test]
fn inline_locations_fall_inside_their_block() {
    let source = "some *emphasis* here\n";
    let doc = parse(source, &Options::default());
    match &doc.children[0] {
        Block::Paragraph(para) => {
            for inline in &para.children {
                assert!(para.location.contains(inline.location()));
            }
        }
        other => panic!("expected paragraph, got {:?}", other),
    }
}
