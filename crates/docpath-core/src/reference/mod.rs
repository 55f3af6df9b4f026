//! Document reference parsing.
//!
//! Splits an opaque reference string into the parts strategy selection and
//! resolution look at: scheme, authority, document id, and decoded path.

mod decode;

pub use decode::percent_decode;

use crate::error::ResolveError;
use std::fmt;

/// A parsed document reference.
///
/// `document_id` is present for `/document/<id>` and `/tree/<id>` shaped
/// paths; a tree reference resolves to its root document unless it also
/// names a child document (`/tree/<t>/document/<d>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference {
    raw: String,
    scheme: String,
    authority: String,
    document_id: Option<String>,
    path: String,
    last_segment: Option<String>,
}

impl DocumentReference {
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let parsed = url::Url::parse(raw.trim())
            .map_err(|e| ResolveError::malformed(format!("{raw}: {e}")))?;

        let encoded: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();
        let document_id = document_id_from_segments(&encoded).map(percent_decode);
        let last_segment = encoded.last().map(|s| percent_decode(s));

        Ok(Self {
            raw: raw.trim().to_string(),
            scheme: parsed.scheme().to_string(),
            authority: parsed.host_str().unwrap_or_default().to_string(),
            document_id,
            path: percent_decode(parsed.path()),
            last_segment,
        })
    }

    /// The reference as given by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    /// Document id, or `Malformed` when the path carries none.
    pub fn require_document_id(&self) -> Result<&str, ResolveError> {
        match self.document_id() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ResolveError::malformed(format!(
                "{} has no document id",
                self.raw
            ))),
        }
    }

    /// Percent-decoded path component.
    pub fn raw_path(&self) -> &str {
        &self.path
    }

    /// Last non-empty path segment, percent-decoded.
    pub fn last_path_segment(&self) -> Option<&str> {
        self.last_segment.as_deref()
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn document_id_from_segments<'a>(segments: &[&'a str]) -> Option<&'a str> {
    match segments {
        ["tree", _, "document", doc, ..] => Some(*doc),
        ["tree", tree, ..] => Some(*tree),
        ["document", doc, ..] => Some(*doc),
        _ => None,
    }
}

/// Splits a `type:rest` document id on the first colon.
pub fn split_document_id(id: &str) -> Result<(&str, &str), ResolveError> {
    id.split_once(':')
        .ok_or_else(|| ResolveError::malformed(format!("document id {id:?} has no ':' separator")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_document_reference() {
        let r = DocumentReference::parse(
            "content://com.android.externalstorage.documents/document/primary%3APictures%2Fa.jpg",
        )
        .unwrap();
        assert_eq!(r.scheme(), "content");
        assert_eq!(r.authority(), "com.android.externalstorage.documents");
        assert_eq!(r.document_id(), Some("primary:Pictures/a.jpg"));
        assert_eq!(r.raw_path(), "/document/primary:Pictures/a.jpg");
    }

    #[test]
    fn tree_reference_uses_tree_id() {
        let r = DocumentReference::parse(
            "content://com.android.externalstorage.documents/tree/primary%3ADownload",
        )
        .unwrap();
        assert_eq!(r.document_id(), Some("primary:Download"));
    }

    #[test]
    fn tree_with_child_document_uses_child() {
        let r = DocumentReference::parse(
            "content://com.android.externalstorage.documents/tree/primary%3ADownload/document/primary%3ADownload%2Fb.txt",
        )
        .unwrap();
        assert_eq!(r.document_id(), Some("primary:Download/b.txt"));
    }

    #[test]
    fn authority_case_is_preserved() {
        let r = DocumentReference::parse("CONTENT://Com.WhatsApp.Provider.Media/item/1").unwrap();
        assert_eq!(r.scheme(), "content");
        assert_eq!(r.authority(), "Com.WhatsApp.Provider.Media");
        assert_eq!(r.document_id(), None);
        assert_eq!(r.last_path_segment(), Some("1"));
    }

    #[test]
    fn file_reference_path_is_decoded() {
        let r = DocumentReference::parse("file:///storage/emulated/0/My%20Show.mkv").unwrap();
        assert_eq!(r.scheme(), "file");
        assert_eq!(r.authority(), "");
        assert_eq!(r.raw_path(), "/storage/emulated/0/My Show.mkv");
    }

    #[test]
    fn not_a_uri_is_malformed() {
        let err = DocumentReference::parse("just some text").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn missing_document_id_is_malformed() {
        let r = DocumentReference::parse("content://com.android.providers.media.documents/").unwrap();
        assert_eq!(r.require_document_id().unwrap_err().kind(), ErrorKind::Malformed);
    }

    #[test]
    fn split_on_first_colon() {
        assert_eq!(split_document_id("primary:a:b.txt").unwrap(), ("primary", "a:b.txt"));
        assert_eq!(
            split_document_id("no-separator").unwrap_err().kind(),
            ErrorKind::Malformed
        );
    }
}
