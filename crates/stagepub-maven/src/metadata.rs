//! Released-version lookup in an artifact-level `maven-metadata.xml`.

use quick_xml::events::Event;
use quick_xml::Reader;

use stagepub_util::errors::StagepubError;

/// Element path of each released version entry.
const VERSION_PATH: [&[u8]; 4] = [b"metadata", b"versioning", b"versions", b"version"];

/// Every `<metadata><versioning><versions><version>` entry, in document order.
pub fn released_versions(xml: &[u8]) -> miette::Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut versions = Vec::new();
    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| StagepubError::Generic {
            message: format!(
                "Invalid maven-metadata.xml at byte {}: {e}",
                reader.buffer_position()
            ),
        })?;
        match event {
            Event::Start(e) => open.push(e.local_name().as_ref().to_vec()),
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) if open.iter().map(Vec::as_slice).eq(VERSION_PATH) => {
                let version = text.unescape().map_err(|e| StagepubError::Generic {
                    message: format!("Invalid <version> text in maven-metadata.xml: {e}"),
                })?;
                versions.push(version.into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(versions)
}
