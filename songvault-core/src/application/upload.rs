use async_trait::async_trait;

use crate::error::Result;

/// One file of an upload batch, as handed over by the request decoder.
///
/// Dropping a part releases whatever staging resource backs it.
#[async_trait]
pub trait UploadPart: Send {
    /// Filename the client supplied, stored verbatim.
    fn display_name(&self) -> &str;

    /// MIME type declared by the client or guessed from the filename.
    fn content_type(&self) -> Option<&str>;

    /// Read the whole payload into memory.
    async fn read_payload(&mut self) -> Result<Vec<u8>>;
}

/// An upload part that already lives in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedPart {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl BufferedPart {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(
        mut self,
        content_type: impl Into<String>,
    ) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[async_trait]
impl UploadPart for BufferedPart {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn read_payload(&mut self) -> Result<Vec<u8>> {
        Ok(std::mem::take(&mut self.bytes))
    }
}
