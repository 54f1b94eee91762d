//! Document tray and upload constraints
//!
//! - Slots can only be added for documents the schema requires, once each
//! - Photo and signature slots accept images only; others JPEG, PNG or PDF
//! - Uploads are capped at [`MAX_UPLOAD_BYTES`]

use crate::error::AttachmentError;
use crate::form::{DocumentSlot, FormData};
use crate::validation::FieldErrors;
use ecampus_schema::{DocumentType, FormStructure};
use std::fmt;
use std::path::Path;

/// Largest accepted upload (5 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for non-image documents
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

/// A file selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// Wrap in-memory file contents
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, checking its size before reading
    ///
    /// The MIME type is inferred from the extension.
    ///
    /// # Errors
    /// - `AttachmentError::TooLarge` if the file exceeds [`MAX_UPLOAD_BYTES`]
    /// - `AttachmentError::Io` if the file cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AttachmentError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AttachmentError::io_error(path, e))?;
        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(AttachmentError::TooLarge {
                file_name,
                size: metadata.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AttachmentError::io_error(path, e))?;
        Ok(Self::new(file_name, mime_from_path(path), bytes))
    }

    /// Original file name
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type inferred from the extension
    #[inline]
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File contents
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes
    #[inline]
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// File has no contents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// MIME type for a file extension
///
/// The table is closed: it lists the image formats a browser picker offers
/// for photos and signatures plus PDF. Any other extension maps to
/// `application/octet-stream`, which [`check_upload`] rejects for every
/// document type.
#[must_use]
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Check an upload against the constraints of a document type
///
/// # Errors
/// Returns the first violated constraint.
pub fn check_upload(document: DocumentType, upload: &FileUpload) -> Result<(), AttachmentError> {
    if document.is_image() {
        if !upload.mime_type().starts_with("image/") {
            return Err(AttachmentError::ImageRequired {
                document,
                mime_type: upload.mime_type().to_string(),
            });
        }
    } else if !ACCEPTED_MIME_TYPES.contains(&upload.mime_type()) {
        return Err(AttachmentError::UnsupportedType {
            document,
            mime_type: upload.mime_type().to_string(),
        });
    }

    if upload.size() > MAX_UPLOAD_BYTES {
        return Err(AttachmentError::TooLarge {
            file_name: upload.file_name().to_string(),
            size: upload.size(),
            limit: MAX_UPLOAD_BYTES,
        });
    }
    if upload.is_empty() {
        return Err(AttachmentError::EmptyFile(upload.file_name().to_string()));
    }
    Ok(())
}

/// Error-map key of a document slot
#[inline]
#[must_use]
pub fn slot_key(index: usize) -> String {
    format!("document_{index}")
}

/// Documents the schema requires that have no slot yet
pub fn pending_documents<'a>(
    schema: &'a FormStructure,
    form: &'a FormData,
) -> impl Iterator<Item = DocumentType> + 'a {
    schema
        .required_documents()
        .iter()
        .copied()
        .filter(move |d| !form.documents().iter().any(|s| s.document() == *d))
}

/// Add an empty slot for a required document
///
/// # Errors
/// - `AttachmentError::NotRequired` if the schema does not require it
/// - `AttachmentError::Duplicate` if it already has a slot
/// - `AttachmentError::TrayFull` if every required document has a slot
pub fn add_slot(
    schema: &FormStructure,
    form: &mut FormData,
    document: DocumentType,
) -> Result<usize, AttachmentError> {
    if !schema.requires_document(document) {
        return Err(AttachmentError::NotRequired(document));
    }
    if form.documents().iter().any(|s| s.document() == document) {
        return Err(AttachmentError::Duplicate(document));
    }
    let capacity = schema.required_documents().len();
    if form.documents().len() >= capacity {
        return Err(AttachmentError::TrayFull(capacity));
    }

    let slots = form.documents_mut();
    slots.push(DocumentSlot::new(document));
    Ok(slots.len() - 1)
}

/// Remove a slot and shift the errors of later slots down by one
///
/// # Errors
/// `AttachmentError::NoSuchSlot` if the index is out of range.
pub fn remove_slot(
    form: &mut FormData,
    errors: &mut FieldErrors,
    index: usize,
) -> Result<DocumentSlot, AttachmentError> {
    let slots = form.documents_mut();
    if index >= slots.len() {
        return Err(AttachmentError::NoSuchSlot(index));
    }
    let removed = slots.remove(index);
    let len = slots.len();

    errors.remove(&slot_key(index));
    for later in index + 1..=len {
        errors.rekey(&slot_key(later), slot_key(later - 1));
    }
    Ok(removed)
}

/// Attach a file to a slot after checking its constraints
///
/// A rejected file leaves the slot untouched.
///
/// # Errors
/// `AttachmentError::NoSuchSlot` or the violated upload constraint.
pub fn attach_to_slot(
    form: &mut FormData,
    errors: &mut FieldErrors,
    index: usize,
    upload: FileUpload,
) -> Result<(), AttachmentError> {
    let slot = form
        .documents_mut()
        .get_mut(index)
        .ok_or(AttachmentError::NoSuchSlot(index))?;
    check_upload(slot.document(), &upload)?;
    slot.attach(upload);
    errors.remove(&slot_key(index));
    Ok(())
}
