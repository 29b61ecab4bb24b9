//! DOCX text extraction
//!
//! A .docx file is a zip archive; the document body lives in
//! `word/document.xml`. Paragraph (`w:p`) texts are joined with "\n",
//! which keeps the line structure the field extractors depend on.

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

pub fn extract(content: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(content)).context("docx is not a valid zip archive")?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("docx missing word/document.xml")?
        .read_to_string(&mut xml)
        .context("failed to read document.xml")?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                // Tabs and manual breaks inside a paragraph
                if in_paragraph {
                    match e.name().as_ref() {
                        b"w:tab" => current.push(' '),
                        b"w:br" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if in_text {
                    current.push_str(&t.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e).context("malformed document.xml"),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn make_docx(body_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", FileOptions::default())
                .unwrap();
            writer.write_all(body_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p>
    <w:p><w:r><w:t>Senior </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = extract(&make_docx(xml)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Jane Doe", "jane@example.com", "Senior Engineer"]);
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>R&amp;D Lead</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract(&make_docx(xml)).unwrap();
        assert_eq!(text, "R&D Lead");
    }

    #[test]
    fn not_a_zip_is_error() {
        assert!(extract(b"plain text pretending to be docx").is_err());
    }

    #[test]
    fn zip_without_document_xml_is_error() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer.start_file("other.txt", FileOptions::default()).unwrap();
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }
        assert!(extract(&buf.into_inner()).is_err());
    }
}
