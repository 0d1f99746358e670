use crate::domain::model::book::Book;

const COVER_STYLE: &str = r#"      body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
      .book-container { display: flex; gap: 30px; align-items: flex-start; }
      .book-info { flex: 1; }
      .cover { flex-shrink: 0; }
      h1 { color: #333; margin-bottom: 10px; }
      .author { color: #666; font-size: 1.2em; margin-bottom: 20px; }
      .isbn { color: #999; font-size: 0.9em; }
      .description { line-height: 1.6; margin-top: 20px; }
"#;

/// Book → 表示用ドキュメントへの変換
pub struct RenderService;

impl RenderService {
    /// 表紙画像と書誌情報を埋め込んだHTMLページを返す。
    /// 無い任意項目（0・空文字列も含む）は省略。表紙のみプレースホルダ文言。
    pub fn render_cover_html(book: &Book) -> String {
        let title = escape_html(book.title());
        let author = escape_html(book.author());

        let mut buf = String::new();
        buf.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
        buf.push_str("    <meta charset=\"utf-8\">\n");
        buf.push_str(&format!("    <title>{title} by {author}</title>\n"));
        buf.push_str("    <style>\n");
        buf.push_str(COVER_STYLE);
        buf.push_str("    </style>\n  </head>\n  <body>\n");
        buf.push_str("    <div class=\"book-container\">\n");
        buf.push_str("      <div class=\"cover\">\n");
        buf.push_str(&format!("        {}\n", Self::cover_fragment(book)));
        buf.push_str("      </div>\n");
        buf.push_str("      <div class=\"book-info\">\n");

        let year = book
            .year_published()
            .filter(|y| *y != 0)
            .map(|y| format!(" ({y})"))
            .unwrap_or_default();
        buf.push_str(&format!("        <h1>{title}{year}</h1>\n"));
        buf.push_str(&format!("        <p class=\"author\">by {author}</p>\n"));
        buf.push_str(&format!(
            "        <p class=\"isbn\"><strong>ISBN:</strong> {}</p>\n",
            escape_html(book.isbn().as_str())
        ));
        if let Some(pages) = book.pages().filter(|p| *p != 0) {
            buf.push_str(&format!("        <p><strong>Pages:</strong> {pages}</p>\n"));
        }
        buf.push_str("        <div class=\"description\">\n");
        buf.push_str("          <strong>Description:</strong><br>\n");
        buf.push_str(&format!("          {}\n", escape_html(book.description())));
        buf.push_str("        </div>\n");
        buf.push_str("      </div>\n    </div>\n  </body>\n</html>\n");
        buf
    }

    fn cover_fragment(book: &Book) -> String {
        match book.cover_url().filter(|url| !url.is_empty()) {
            Some(url) => format!(
                "<img src=\"{}\" alt=\"book cover\" style=\"max-width:300px; height:auto; border: 1px solid #ddd;\" />",
                escape_html(url)
            ),
            None => "<p>No cover image available</p>".to_string(),
        }
    }
}

/// HTMLテキスト・属性値どちらにも埋め込めるようエスケープする。
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
