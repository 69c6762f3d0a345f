/// How a stored file can be previewed, derived from its mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Text,
    Audio,
    Video,
    Archive,
    Unsupported,
}

impl PreviewKind {
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.trim().to_ascii_lowercase();

        if mime.starts_with("image/") {
            PreviewKind::Image
        } else if mime.contains("pdf") {
            PreviewKind::Pdf
        } else if mime.starts_with("text/") || mime.contains("json") || mime.contains("xml") {
            PreviewKind::Text
        } else if mime.starts_with("audio/") {
            PreviewKind::Audio
        } else if mime.starts_with("video/") {
            PreviewKind::Video
        } else if mime.contains("zip") || mime.contains("archive") {
            PreviewKind::Archive
        } else {
            PreviewKind::Unsupported
        }
    }

    /// Whether the content can be rendered inline rather than only downloaded.
    pub fn is_inline(self) -> bool {
        !matches!(self, PreviewKind::Archive | PreviewKind::Unsupported)
    }
}
