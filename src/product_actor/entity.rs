//! [`SyncEntity`] implementation for [`Product`].
//!
//! Creation and edits both travel as multipart submissions. An edit also keeps the draft it
//! was encoded from, because the speculative value shown while the upload is in flight is
//! computed from the draft and not from the encoded bytes.

use crate::model::{Product, ProductDraft, ProductId};
use crate::upload::{self, MultipartPayload, UploadError};
use sync_framework::SyncEntity;

/// A validated edit: the form as typed and its encoded submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatch {
    pub draft: ProductDraft,
    pub payload: MultipartPayload,
}

impl ProductPatch {
    pub fn new(draft: ProductDraft) -> Result<Self, UploadError> {
        let payload = upload::encode_draft(&draft)?;
        Ok(Self { draft, payload })
    }
}

impl SyncEntity for Product {
    type Id = ProductId;
    type Create = MultipartPayload;
    type Update = ProductPatch;
    type Action = ();

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn merge(&self, patch: &ProductPatch) -> Self {
        self.merged_with(&patch.draft)
    }
}
