use super::{decode_document, load_document, load_title, parse_document, Node};
use crate::corpus::{DirCorpus, MemoryCorpus};
use crate::error::{Error, ParseError};
use crate::fixtures::{corpus, title_1_id, TITLE_1};
use crate::title::TitleId;
use std::fs;

#[test]
fn test_section_count_matches_markers() {
    let outline = load_title(&corpus(), &title_1_id()).unwrap();

    assert_eq!(outline.section_count(), TITLE_1.matches("<Section").count());
    assert_eq!(outline.title.name, "TITLE 1.—GENERAL PROVISIONS");
    assert_eq!(outline.title.source, "memory:1");
}

#[test]
fn test_missing_title_is_load_error() {
    let err = load_title(&corpus(), &TitleId::new("99")).unwrap_err();

    match err {
        Error::Load(load) => {
            assert_eq!(load.title, TitleId::new("99"));
            assert_eq!(load.source.kind(), std::io::ErrorKind::NotFound);
        }
        Error::Parse(other) => panic!("expected load error, got {other}"),
    }
}

#[test]
fn test_unclosed_section_is_parse_error() {
    let corpus = MemoryCorpus::new().with_title(
        TitleId::new("3"),
        "<USCode>\n<Title name=\"TITLE 3\">\n<Chapter name=\"Chapter 1.—X.\">\n<Section name=\"1. Open\">never closed\n</Chapter>\n</Title>\n</USCode>\n",
    );

    let err = load_title(&corpus, &TitleId::new("3")).unwrap_err();

    match err {
        Error::Parse(parse) => {
            let position = parse.position().expect("xml errors carry a position");
            assert!(position.row >= 4, "reported at {position}");
        }
        Error::Load(other) => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn test_invalid_utf8_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Title_1.xml"),
        b"<USCode>\n<Title name=\"caf\xE9\"/></USCode>",
    )
    .unwrap();
    let corpus = DirCorpus::new(dir.path(), "Title_{}.xml");

    let err = load_title(&corpus, &title_1_id()).unwrap_err();

    match err {
        Error::Parse(parse) => {
            assert!(matches!(parse, ParseError::Encoding { .. }));
            let position = parse.position().unwrap();
            assert_eq!((position.row, position.col), (2, 17));
        }
        Error::Load(other) => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn test_decode_reports_column_in_characters() {
    let err = decode_document(&title_1_id(), b"\xC3\xA9t\xC3".to_vec()).unwrap_err();

    assert_eq!(err.position().map(|p| (p.row, p.col)), Some((1, 3)));
    assert_eq!(
        decode_document(&title_1_id(), "État".as_bytes().to_vec()).unwrap(),
        "État"
    );
}

#[test]
fn test_unexpected_root_is_parse_error() {
    let err = parse_document(&title_1_id(), "<html><body/></html>").unwrap_err();

    assert!(matches!(
        err,
        ParseError::UnexpectedRoot { ref element, .. } if element == "html"
    ));
    assert!(err.position().is_none());
}

#[test]
fn test_tree_keeps_document_order() {
    let document = parse_document(
        &title_1_id(),
        "<Title><Section name=\"1. A\">one</Section>text<Section name=\"2. B\"/></Title>",
    )
    .unwrap();

    let kinds: Vec<String> = document
        .root
        .children
        .iter()
        .map(|child| match child {
            Node::Element(element) => element.attribute("name").unwrap().to_string(),
            Node::Text(text) => text.clone(),
        })
        .collect();

    assert_eq!(kinds, vec!["1. A", "text", "2. B"]);
    assert_eq!(document.root.text(), "onetext");
}

#[test]
fn test_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Title_1.xml"), TITLE_1).unwrap();
    let corpus = DirCorpus::new(dir.path(), "Title_{}.xml");

    let document = load_document(&corpus, &title_1_id()).unwrap();
    let outline = load_title(&corpus, &title_1_id()).unwrap();

    assert!(document.source.ends_with("Title_1.xml"));
    assert_eq!(outline.chapters.len(), 2);
    assert_eq!(outline.section_count(), 4);
}
