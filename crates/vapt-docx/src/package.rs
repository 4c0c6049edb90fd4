//! Zip packaging of the generated parts

use crate::blocks::ContentBlock;
use crate::xml;
use crate::{DocumentStyle, DocxError, DocxResult};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Serialize a block sequence into a complete `.docx` byte stream.
///
/// Blocks appear in the document in exactly the order given; images are
/// embedded at their stated dimensions.
pub fn write_document(blocks: &[ContentBlock], style: &DocumentStyle) -> DocxResult<Vec<u8>> {
    let (document, media) = xml::document_xml(blocks);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut put = |writer: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, data: &[u8]| {
        writer
            .start_file(name, options)
            .map_err(|e| DocxError::Zip(e.to_string()))?;
        writer.write_all(data)?;
        Ok::<(), DocxError>(())
    };

    put(
        &mut writer,
        "[Content_Types].xml",
        xml::content_types_xml(&media).as_bytes(),
    )?;
    put(&mut writer, "_rels/.rels", xml::package_rels_xml().as_bytes())?;
    put(&mut writer, "word/document.xml", document.as_bytes())?;
    put(
        &mut writer,
        "word/styles.xml",
        xml::styles_xml(style).as_bytes(),
    )?;
    put(
        &mut writer,
        "word/_rels/document.xml.rels",
        xml::document_rels_xml(&media).as_bytes(),
    )?;

    for entry in &media {
        put(
            &mut writer,
            &format!("word/media/{}", entry.file_name),
            &entry.data,
        )?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| DocxError::Zip(e.to_string()))?;
    Ok(cursor.into_inner())
}
