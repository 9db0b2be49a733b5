// crates/gateway-probe-core/src/fixtures.rs
// ============================================================================
// Module: Upload Fixtures
// Description: In-memory payloads attached to media send probes.
// Purpose: Produce the image and document bytes without touching disk.
// Dependencies: image, time
// ============================================================================

//! ## Overview
//! Fixtures are synthesized per probe execution. The image fixture is a
//! 200x200 solid blue PNG encoded with the `image` crate; the document
//! fixture is a short UTF-8 text file carrying the run timestamp. Nothing is
//! written to the filesystem.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Cursor;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use image::ImageBuffer;
use image::ImageFormat;
use image::Rgb;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Edge length of the synthesized image in pixels.
pub const IMAGE_SIDE_PX: u32 = 200;

/// Fill color of the synthesized image.
const IMAGE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// File name used for the image upload.
pub const IMAGE_FILE_NAME: &str = "test-image.png";

/// File name used for the document upload.
pub const DOCUMENT_FILE_NAME: &str = "test-document.txt";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Fixture construction failures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Image encoding failed.
    #[error("image fixture encoding failed: {0}")]
    Encode(String),
}

/// Named upload payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// MIME type of the part.
    pub mime: &'static str,
    /// Payload bytes.
    pub bytes: Vec<u8>,
}

/// Factory producing a fixture on demand.
pub type FixtureFactory = fn() -> Result<Fixture, FixtureError>;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Encodes a 200x200 solid blue PNG.
///
/// # Errors
///
/// Returns [`FixtureError::Encode`] when PNG encoding fails.
pub fn solid_png() -> Result<Fixture, FixtureError> {
    let img = ImageBuffer::from_pixel(IMAGE_SIDE_PX, IMAGE_SIDE_PX, IMAGE_COLOR);
    let mut bytes: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| FixtureError::Encode(err.to_string()))?;
    Ok(Fixture {
        file_name: IMAGE_FILE_NAME.to_string(),
        mime: "image/png",
        bytes,
    })
}

/// Builds the timestamped text document.
///
/// # Errors
///
/// Never fails; the signature matches [`FixtureFactory`].
pub fn text_document() -> Result<Fixture, FixtureError> {
    let stamp = timestamp();
    let body = format!(
        "Gateway probe document\n\nGenerated at {stamp}.\nThis file verifies document \
         delivery through the messaging gateway API.\n"
    );
    Ok(Fixture {
        file_name: DOCUMENT_FILE_NAME.to_string(),
        mime: "text/plain",
        bytes: body.into_bytes(),
    })
}

/// Returns the current UTC time as RFC 3339.
///
/// Falls back to whole unix seconds if formatting fails.
#[must_use]
pub fn timestamp() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
        secs.to_string()
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use image::GenericImageView;

    use super::solid_png;
    use super::text_document;
    use super::timestamp;

    #[test]
    fn png_fixture_decodes_to_blue_square() {
        let fixture = solid_png().unwrap();
        assert_eq!(fixture.file_name, "test-image.png");
        assert_eq!(fixture.mime, "image/png");
        let decoded = image::load_from_memory(&fixture.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (200, 200));
        assert_eq!(decoded.to_rgb8().get_pixel(199, 0).0, [0, 0, 255]);
    }

    #[test]
    fn document_fixture_is_timestamped_text() {
        let fixture = text_document().unwrap();
        assert_eq!(fixture.file_name, "test-document.txt");
        assert_eq!(fixture.mime, "text/plain");
        let text = String::from_utf8(fixture.bytes).unwrap();
        assert!(text.contains("Generated at "));
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let stamp = timestamp();
        assert!(stamp.contains('T'));
        assert!(stamp.ends_with('Z'));
    }
}
