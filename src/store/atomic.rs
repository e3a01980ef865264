//! Whole-file replacement via write-temp then rename.
//!
//! The target path always holds either the previous content or the new
//! content, never a partial write.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique hidden sibling path used as the staging file for `target`
pub fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map_or_else(|| "unnamed".into(), |n| n.to_string_lossy());
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}

/// Replace `target` with `data`
pub async fn write(target: &Path, data: &[u8]) -> io::Result<()> {
    let temp = temp_sibling(target);

    let result = async {
        let mut file = fs::File::create(&temp).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp, target).await
    }
    .await;

    if result.is_err() {
        // The temp file may not exist if create itself failed
        let _ = fs::remove_file(&temp).await;
    }
    result
}
