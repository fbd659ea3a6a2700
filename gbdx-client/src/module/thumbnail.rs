//! Catalog browse thumbnails.
//!
//! Images are returned encoded, exactly as served.

use std::path::Path;

use crate::constants::{join_url, path_segment};
use crate::error::Result;
use crate::session::HttpSession;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub cat_id: String,
    /// Encoded PNG bytes.
    pub bytes: Vec<u8>,
}

impl Thumbnail {
    pub fn is_png(&self) -> bool {
        self.bytes.starts_with(&PNG_SIGNATURE)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &self.bytes).await?;
        tracing::debug!("Saved thumbnail {} to {:?}", self.cat_id, path);
        Ok(())
    }
}

/// Downloads the medium-size browse image for `cat_id`.
pub async fn get_thumbnail<S>(session: &S, cat_id: &str) -> Result<Thumbnail>
where
    S: HttpSession + ?Sized,
{
    let file = format!("{}.medium.png", path_segment(cat_id));
    let url = join_url(session.base_url(), &["thumbnails", "v1", "browse", &file]);
    tracing::info!("Fetching thumbnail for {}", cat_id);
    let bytes = session.get_bytes(&url).await?;
    Ok(Thumbnail {
        cat_id: cat_id.to_string(),
        bytes,
    })
}
