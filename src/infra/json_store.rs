use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::model::collection::BookCollection;
use crate::domain::repository::BookRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるBookRepository実装。
/// 1 コレクション = 1 JSONファイル（`{"books": [...]}`）。
pub struct JsonBookRepository {
    path: PathBuf,
}

impl JsonBookRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 書き込み用の一時ファイル。拡張子を置き換えず末尾に `.tmp` を足す
    /// （`books.json` と `books.dat` が同じ一時ファイルを共有しないように）。
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BookRepository for JsonBookRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Option<BookCollection>, Self::Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let collection: BookCollection = serde_json::from_str(&content)?;
        Ok(Some(collection))
    }

    /// 全体を書き直す。一時ファイルに書いてからrenameするので途中で落ちても元ファイルは壊れない。
    fn save(&self, collection: &BookCollection) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = to_pretty_json(collection)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// 4スペースインデントで整形する（手編集しやすい形式）。
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
