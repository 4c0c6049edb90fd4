//! WordprocessingML part generation

use crate::blocks::{ContentBlock, TextRun};
use crate::{DocumentStyle, ImageFormat};

/// EMUs per pixel at 96 DPI.
const EMU_PER_PX: u64 = 9525;

/// An image extracted from the block sequence, destined for `word/media/`.
pub(crate) struct MediaEntry {
    pub rel_id: String,
    pub file_name: String,
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

/// Escape text for inclusion in XML content or attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn run_xml(run: &TextRun) -> String {
    let mut props = String::new();
    if run.bold {
        props.push_str("<w:b/>");
    }
    if run.italics {
        props.push_str("<w:i/>");
    }
    if let Some(color) = &run.color {
        props.push_str(&format!("<w:color w:val=\"{}\"/>", escape(color)));
    }
    if let Some(size) = run.size {
        props.push_str(&format!(
            "<w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>"
        ));
    }

    let rpr = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };

    // Newlines inside a run become explicit line breaks.
    let mut body = String::new();
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            body.push_str("<w:br/>");
        }
        body.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            escape(line)
        ));
    }

    format!("<w:r>{rpr}{body}</w:r>")
}

fn paragraph_xml(style_id: Option<&str>, runs: &[TextRun]) -> String {
    let ppr = match style_id {
        Some(id) => format!("<w:pPr><w:pStyle w:val=\"{id}\"/></w:pPr>"),
        None => String::new(),
    };
    let body: String = runs.iter().map(run_xml).collect();
    format!("<w:p>{ppr}{body}</w:p>")
}

fn separator_xml() -> String {
    "<w:p><w:pPr><w:pBdr>\
     <w:bottom w:val=\"single\" w:sz=\"6\" w:space=\"1\" w:color=\"auto\"/>\
     </w:pBdr></w:pPr></w:p>"
        .to_string()
}

fn page_break_xml() -> String {
    "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>".to_string()
}

fn image_xml(rel_id: &str, index: usize, width_px: u32, height_px: u32) -> String {
    let cx = width_px as u64 * EMU_PER_PX;
    let cy = height_px as u64 * EMU_PER_PX;
    format!(
        "<w:p><w:r><w:drawing>\
         <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
         <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
         <wp:docPr id=\"{index}\" name=\"Picture {index}\"/>\
         <a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
         <a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:pic xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:nvPicPr><pic:cNvPr id=\"{index}\" name=\"Picture {index}\"/><pic:cNvPicPr/></pic:nvPicPr>\
         <pic:blipFill><a:blip r:embed=\"{rel_id}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
         <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
         </pic:pic></a:graphicData></a:graphic>\
         </wp:inline></w:drawing></w:r></w:p>"
    )
}

/// Render the main document part. Returns the XML plus the media entries the
/// package writer must emit alongside it. Block order is preserved exactly.
pub(crate) fn document_xml(blocks: &[ContentBlock]) -> (String, Vec<MediaEntry>) {
    let mut body = String::new();
    let mut media = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Heading { level, runs } => {
                body.push_str(&paragraph_xml(Some(level.style_id()), runs));
            }
            ContentBlock::Paragraph { runs } => {
                body.push_str(&paragraph_xml(None, runs));
            }
            ContentBlock::Image {
                data,
                format,
                width_px,
                height_px,
            } => {
                // rId1 is reserved for the styles part.
                let index = media.len() + 1;
                let rel_id = format!("rId{}", index + 1);
                body.push_str(&image_xml(&rel_id, index, *width_px, *height_px));
                media.push(MediaEntry {
                    rel_id,
                    file_name: format!("image{}.{}", index, format.extension()),
                    format: *format,
                    data: data.clone(),
                });
            }
            ContentBlock::Separator => body.push_str(&separator_xml()),
            ContentBlock::PageBreak => body.push_str(&page_break_xml()),
        }
    }

    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document \
         xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    );

    (xml, media)
}

pub(crate) fn styles_xml(style: &DocumentStyle) -> String {
    let font = escape(&style.font);
    let size = style.size_half_points;

    let heading = |id: &str, name: &str, size: u32, outline: Option<u32>| {
        let outline_xml = match outline {
            Some(lvl) => format!("<w:outlineLvl w:val=\"{lvl}\"/>"),
            None => String::new(),
        };
        format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"{id}\">\
             <w:name w:val=\"{name}\"/><w:qFormat/>\
             <w:pPr>{outline_xml}</w:pPr>\
             <w:rPr><w:b/><w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/></w:rPr>\
             </w:style>"
        )
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:docDefaults><w:rPrDefault><w:rPr>\
         <w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>\
         <w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>\
         </w:rPr></w:rPrDefault></w:docDefaults>\
         {}{}{}{}\
         </w:styles>",
        heading("Title", "Title", 44, None),
        heading("Heading1", "heading 1", 32, Some(0)),
        heading("Heading2", "heading 2", 28, Some(1)),
        heading("Heading3", "heading 3", 26, Some(2)),
    )
}

pub(crate) fn content_types_xml(media: &[MediaEntry]) -> String {
    let mut defaults = String::from(
        "<Default Extension=\"rels\" \
         ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    );

    let mut seen: Vec<ImageFormat> = Vec::new();
    for entry in media {
        if !seen.contains(&entry.format) {
            defaults.push_str(&format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                entry.format.extension(),
                entry.format.content_type()
            ));
            seen.push(entry.format);
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         {defaults}\
         <Override PartName=\"/word/document.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
         <Override PartName=\"/word/styles.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
         </Types>"
    )
}

pub(crate) fn package_rels_xml() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
     <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
     <Relationship Id=\"rId1\" \
     Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
     Target=\"word/document.xml\"/>\
     </Relationships>"
        .to_string()
}

pub(crate) fn document_rels_xml(media: &[MediaEntry]) -> String {
    let mut rels = String::from(
        "<Relationship Id=\"rId1\" \
         Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" \
         Target=\"styles.xml\"/>",
    );

    for entry in media {
        rels.push_str(&format!(
            "<Relationship Id=\"{}\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" \
             Target=\"media/{}\"/>",
            entry.rel_id, entry.file_name
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {rels}</Relationships>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::HeadingLevel;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_run_newlines_become_breaks() {
        let xml = run_xml(&TextRun::new("one\ntwo"));
        assert_eq!(xml.matches("<w:br/>").count(), 1);
        assert!(xml.contains(">one<"));
        assert!(xml.contains(">two<"));
    }

    #[test]
    fn test_colored_run() {
        let xml = run_xml(&TextRun::new("High").bold().color("FF0000"));
        assert!(xml.contains("<w:color w:val=\"FF0000\"/>"));
        assert!(xml.contains("<w:b/>"));
    }

    #[test]
    fn test_document_preserves_block_order() {
        let blocks = vec![
            ContentBlock::heading(HeadingLevel::Heading1, TextRun::new("First")),
            ContentBlock::text("Second"),
            ContentBlock::text("Third"),
        ];
        let (xml, media) = document_xml(&blocks);
        let first = xml.find("First").expect("first block missing");
        let second = xml.find("Second").expect("second block missing");
        let third = xml.find("Third").expect("third block missing");
        assert!(first < second && second < third);
        assert!(media.is_empty());
    }

    #[test]
    fn test_images_get_sequential_rel_ids() {
        let png = vec![0x89, b'P', b'N', b'G'];
        let blocks = vec![
            ContentBlock::Image {
                data: png.clone(),
                format: ImageFormat::Png,
                width_px: 500,
                height_px: 300,
            },
            ContentBlock::Image {
                data: png,
                format: ImageFormat::Png,
                width_px: 500,
                height_px: 300,
            },
        ];
        let (xml, media) = document_xml(&blocks);
        assert_eq!(media.len(), 2);
        assert_eq!(media[0].rel_id, "rId2");
        assert_eq!(media[1].rel_id, "rId3");
        assert_eq!(media[0].file_name, "image1.png");
        assert!(xml.contains("r:embed=\"rId2\""));
        assert!(xml.contains("r:embed=\"rId3\""));
    }

    #[test]
    fn test_content_types_dedupes_extensions() {
        let media = vec![
            MediaEntry {
                rel_id: "rId2".into(),
                file_name: "image1.png".into(),
                format: ImageFormat::Png,
                data: vec![],
            },
            MediaEntry {
                rel_id: "rId3".into(),
                file_name: "image2.png".into(),
                format: ImageFormat::Png,
                data: vec![],
            },
        ];
        let xml = content_types_xml(&media);
        assert_eq!(xml.matches("Extension=\"png\"").count(), 1);
    }
}
