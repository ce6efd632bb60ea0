use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

/// Decoded illustration bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageHandle {
    /// Wrap raw image bytes.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// MIME type of the image, e.g. `image/jpeg`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the image holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render the image as an embeddable `data:` URI.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

// Image payloads run to hundreds of kilobytes; keep debug output readable.
impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
