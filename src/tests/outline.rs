use super::{build_outline, UNGROUPED_LABEL};
use crate::fixtures::{outline_of, title_1, title_1_id};
use crate::loader::parse_document;

#[test]
fn test_chapters_and_sections_in_document_order() {
    let outline = title_1();

    let labels: Vec<&str> = outline.chapters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Chapter 1.—RULES OF CONSTRUCTION.",
            "Chapter 2.—ACTS AND RESOLUTIONS."
        ]
    );
    assert_eq!(outline.chapters[0].number.as_deref(), Some("1"));
    assert_eq!(outline.chapters[1].position, 1);

    let citations: Vec<&str> = outline
        .iter()
        .map(|entry| entry.section.citation.as_str())
        .collect();
    assert_eq!(citations, vec!["101", "102", "201", "202"]);

    let indices: Vec<usize> = outline.iter().map(|entry| entry.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn test_section_name_splits_citation_and_heading() {
    let outline = title_1();
    let section = &outline.chapters[0].sections[0];

    assert_eq!(section.citation, "101");
    assert_eq!(section.heading, "Definitions");
    assert_eq!(section.label(), "101. Definitions");
}

#[test]
fn test_body_lines_become_paragraphs() {
    let outline = title_1();
    let section = &outline.chapters[1].sections[0];

    assert_eq!(section.paragraphs.len(), 2);
    assert_eq!(
        section.paragraphs[1],
        "Territory of the United States, territory of a State."
    );
}

#[test]
fn test_empty_body_section_is_kept() {
    let outline = title_1();
    let repealed = &outline.chapters[1].sections[1];

    assert_eq!(repealed.citation, "202");
    assert!(repealed.is_empty());
}

#[test]
fn test_empty_document_is_empty_outline() {
    let outline = outline_of("<USCode><Title name=\"TITLE 9.—ARBITRATION\"/></USCode>");

    assert!(outline.is_empty());
    assert_eq!(outline.section_count(), 0);
    assert_eq!(outline.title.name, "TITLE 9.—ARBITRATION");
}

#[test]
fn test_orphan_sections_get_implicit_chapters_in_place() {
    let outline = outline_of(
        r#"<USCode><Title>
            <Section name="1. First orphan">a</Section>
            <Section name="2. Second orphan">b</Section>
            <Chapter name="Chapter 1.—GROUPED."><Section name="3. Grouped">c</Section></Chapter>
            <Section name="4. Late orphan">d</Section>
        </Title></USCode>"#,
    );

    let shape: Vec<(&str, bool, usize)> = outline
        .chapters
        .iter()
        .map(|c| (c.label.as_str(), c.implicit, c.sections.len()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (UNGROUPED_LABEL, true, 2),
            ("Chapter 1.—GROUPED.", false, 1),
            (UNGROUPED_LABEL, true, 1),
        ]
    );
    assert_eq!(outline.title.name, "Title 1");
}

#[test]
fn test_chapter_without_sections_is_not_emitted() {
    let outline = outline_of(
        r#"<Title><Chapter name="Chapter 1.—EMPTY."/><Chapter name="Chapter 2.—FULL."><Section name="5. Only">x</Section></Chapter></Title>"#,
    );

    assert_eq!(outline.chapters.len(), 1);
    assert_eq!(outline.chapters[0].number.as_deref(), Some("2"));
    assert_eq!(outline.chapters[0].position, 0);
}

#[test]
fn test_child_element_form() {
    let outline = outline_of(
        r#"<Title><Chapter><Heading>Chapter 4.—PATENTS.</Heading>
            <Section><Num>41.</Num><Heading>Fees</Heading><P>First paragraph.</P><P>Second <i>emphasised</i> paragraph.</P></Section>
        </Chapter></Title>"#,
    );

    let chapter = &outline.chapters[0];
    assert_eq!(chapter.label, "Chapter 4.—PATENTS.");
    assert_eq!(chapter.number.as_deref(), Some("4"));

    let section = &chapter.sections[0];
    assert_eq!(section.citation, "41");
    assert_eq!(section.heading, "Fees");
    assert_eq!(
        section.paragraphs,
        vec!["First paragraph.", "Second emphasised paragraph."]
    );
}

#[test]
fn test_nested_sections_follow_their_parent() {
    let outline = outline_of(
        r#"<Title><Chapter name="Chapter 1.—X."><Section name="1. Outer">outer<Section name="1a. Inner">inner</Section></Section><Section name="2. Next">next</Section></Chapter></Title>"#,
    );

    let citations: Vec<&str> = outline
        .iter()
        .map(|entry| entry.section.citation.as_str())
        .collect();
    assert_eq!(citations, vec!["1", "1a", "2"]);
    assert_eq!(outline.chapters[0].sections[0].paragraphs, vec!["outer"]);
}

#[test]
fn test_nested_chapter_does_not_split_outer_chapter() {
    let outline = outline_of(
        r#"<Title><Chapter name="Chapter 1.—A."><Section name="1. One">a</Section><Chapter name="Chapter 2.—B."><Section name="2. Two">b</Section></Chapter><Section name="3. Three">c</Section></Chapter></Title>"#,
    );

    let labels: Vec<&str> = outline.chapters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Chapter 1.—A."]);
    let citations: Vec<&str> = outline
        .iter()
        .map(|entry| entry.section.citation.as_str())
        .collect();
    assert_eq!(citations, vec!["1", "2", "3"]);
}

#[test]
fn test_heading_without_citation() {
    let outline = outline_of(r#"<Title><Section name="Definitions">body</Section></Title>"#);
    let section = &outline.chapters[0].sections[0];

    assert_eq!(section.citation, "");
    assert_eq!(section.heading, "Definitions");
}

#[test]
fn test_rebuild_is_deterministic() {
    let document = parse_document(&title_1_id(), crate::fixtures::TITLE_1).unwrap();

    assert_eq!(build_outline(&document), build_outline(&document));
}

#[test]
fn test_entry_lookup() {
    let outline = title_1();

    let entry = outline.entry(2).unwrap();
    assert_eq!(entry.chapter_index, 1);
    assert_eq!(entry.section.citation, "201");
    assert!(outline.entry(4).is_none());

    assert_eq!(outline.chapter_start(1), Some(2));
    assert_eq!(outline.chapter_start(2), None);
    assert_eq!(outline.find_section("202"), Some(3));
    assert_eq!(outline.find_section("999"), None);
}
