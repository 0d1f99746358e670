use serde::{de, Deserialize, Deserializer, Serialize};

use super::isbn::Isbn;

/// 書籍レコード。保存ファイル・HTTPペイロード共通の形。
///
/// 任意フィールドは読み込み時に「欠落」「null」のどちらも受け付け、
/// 書き出し時は常に `null` として出力する。数値項目は範囲を検証しない
/// （負数・0もそのまま通す）。手編集された `"1999"` のような数字文字列も受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    isbn: Isbn,
    title: String,
    author: String,
    description: String,
    #[serde(default)]
    cover_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    year_published: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pages: Option<i64>,
}

impl Book {
    pub fn new(
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            description: description.into(),
            cover_url: None,
            year_published: None,
            pages: None,
        }
    }

    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    pub fn with_year_published(mut self, year: i64) -> Self {
        self.year_published = Some(year);
        self
    }

    pub fn with_pages(mut self, pages: i64) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    pub fn year_published(&self) -> Option<i64> {
        self.year_published
    }

    pub fn pages(&self) -> Option<i64> {
        self.pages
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Text(String),
}

/// 整数、または整数として読める文字列。空文字列は未設定扱い。
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntLike>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntLike::Int(n)) => Ok(Some(n)),
        Some(IntLike::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(IntLike::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}
