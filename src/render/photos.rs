//! Photo upload list.
//!
//! Uploads append to the existing list. Removing the last photo clears the
//! value instead of leaving an empty list behind.
use super::{ignored_input, BlockInput, BlockRenderer, BlockView, PhotoEntry, ValueChange};
use crate::blocks::{registry, Attachment, Block, BlockType, BlockValue};

pub(super) const ACCEPT: &str = "image/*";

pub(super) struct PhotoRenderer;

fn current_photos(current: Option<&BlockValue>) -> Vec<Attachment> {
    match current {
        Some(BlockValue::Photos(photos)) => photos.clone(),
        _ => Vec::new(),
    }
}

fn is_image(attachment: &Attachment) -> bool {
    attachment
        .mime_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

impl BlockRenderer for PhotoRenderer {
    fn view(&self, block: &Block, block_type: BlockType, current: Option<&BlockValue>) -> BlockView {
        let photos = current_photos(current)
            .into_iter()
            .enumerate()
            .map(|(index, photo)| PhotoEntry {
                index,
                name: photo.name,
                size: photo.size,
                mime_type: photo.mime_type,
            })
            .collect();
        BlockView::Photos {
            label: block.display_label(),
            required: block.is_required(),
            placeholder: block
                .placeholder
                .clone()
                .or_else(|| registry::spec(block_type).placeholder.map(str::to_string)),
            accept: ACCEPT,
            photos,
        }
    }

    fn apply(
        &self,
        _block: &Block,
        block_type: BlockType,
        current: Option<&BlockValue>,
        input: BlockInput,
    ) -> Option<ValueChange> {
        match input {
            BlockInput::AddPhotos(files) => {
                let mut photos = current_photos(current);
                let before = photos.len();
                for file in files {
                    if is_image(&file) {
                        photos.push(file);
                    } else {
                        tracing::warn!(
                            name = %file.name,
                            mime_type = %file.mime_type,
                            "skipping non-image upload"
                        );
                    }
                }
                if photos.len() == before {
                    return None;
                }
                Some(ValueChange::Set(BlockValue::Photos(photos)))
            }
            BlockInput::RemovePhoto(index) => {
                let mut photos = current_photos(current);
                if index >= photos.len() {
                    tracing::debug!(index, count = photos.len(), "photo index out of range");
                    return None;
                }
                photos.remove(index);
                if photos.is_empty() {
                    Some(ValueChange::Clear)
                } else {
                    Some(ValueChange::Set(BlockValue::Photos(photos)))
                }
            }
            BlockInput::Clear => current.map(|_| ValueChange::Clear),
            other => {
                ignored_input(block_type, &other);
                None
            }
        }
    }
}
