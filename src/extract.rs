//! In-page image extraction.
//!
//! Builds the script that runs inside the loaded page's own context, walks
//! the content container for image elements, and maps the returned records
//! into [`PageImage`] values. The script is the only thing that touches the
//! DOM; on this side of the boundary there are just plain records.

use crate::browser::PageSession;
use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};

/// Image-bearing descendants of the chapter's content container, in
/// document order.
pub const CONTENT_SELECTOR: &str = "#pic_container img";

/// Substring identifying the loading-indicator stand-in image. Elements whose
/// source contains it are skipped and do not consume a page number.
pub const PLACEHOLDER_SENTINEL: &str = "ajax-loader2.gif";

/// One surviving image element of the scraped page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    /// Element identifier, taken verbatim; absent when the element has none.
    pub page_id: Option<String>,
    /// The element's image source.
    pub image_url: String,
    /// 1-based position among the surviving elements.
    pub page_number: u32,
}

const EXTRACT_TEMPLATE: &str = r#"(() => {
  const results = [];
  let counter = 1;
  document.querySelectorAll('__SELECTOR__').forEach((el) => {
    const src = el.getAttribute('src');
    const id = el.getAttribute('id');
    if (src && !src.includes('__SENTINEL__')) {
      results.push({ page_id: id, image_url: src, page_number: counter });
      counter++;
    }
  });
  return results;
})()"#;

/// Render the extraction script for a container selector and sentinel.
fn extraction_script(selector: &str, sentinel: &str) -> String {
    EXTRACT_TEMPLATE
        .replace("__SELECTOR__", selector)
        .replace("__SENTINEL__", sentinel)
}

/// Run the extraction script against the loaded page and return the ordered
/// image list. An absent container yields an empty list, which is not an
/// error; a script that cannot run or returns a malformed payload is
/// [`ScrapeError::Extraction`].
pub async fn collect_images(session: &dyn PageSession) -> Result<Vec<PageImage>, ScrapeError> {
    let script = extraction_script(CONTENT_SELECTOR, PLACEHOLDER_SENTINEL);
    let value = session.evaluate(&script).await?;
    serde_json::from_value(value)
        .map_err(|e| ScrapeError::Extraction(format!("malformed extraction payload: {e}")))
}
