//! HTML rendering for the single input/result page

use crate::domain::RecognitionOutcome;

/// What the page shows under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    /// Bare page, nothing submitted yet
    Nothing,
    /// Form was posted without an image URL
    MissingUrl,
    /// The OCR job ran to an outcome
    Recognized(RecognitionOutcome),
    /// The OCR service could not be talked to
    ServiceError,
}

/// Escape text for use inside HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn render_page(image_url: &str, result: &PageResult) -> String {
    let url = escape_html(image_url);

    let section = match result {
        PageResult::Nothing => String::new(),
        PageResult::MissingUrl => error_block("Please enter the URL of an image."),
        PageResult::ServiceError => error_block(
            "The OCR service could not process this request. Please try again later.",
        ),
        PageResult::Recognized(outcome) => match outcome {
            RecognitionOutcome::Text(text) => format!(
                "{}\n    <p id=\"prediction\">{}</p>",
                image_tag(&url),
                escape_html(text)
            ),
            RecognitionOutcome::Empty => format!(
                "{}\n    <p id=\"prediction\"></p>\n    <p class=\"notice\">No text was found in this image.</p>",
                image_tag(&url)
            ),
            RecognitionOutcome::Failed(status) => error_block(&format!(
                "Recognition failed (status: {}). Check that the URL points to a supported image.",
                status
            )),
            RecognitionOutcome::TimedOut { attempts } => error_block(&format!(
                "Recognition did not finish after {} status checks.",
                attempts
            )),
        },
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>readlens - image to text</title>
</head>
<body>
  <h1>Extract text from an image</h1>
  <form action="/submit" method="post">
    <label for="image_url">Image URL</label>
    <input type="url" id="image_url" name="image_url" value="{url}" required>
    <button type="submit">Extract text</button>
  </form>
  <section id="result">
    {section}
  </section>
</body>
</html>
"#
    )
}

fn image_tag(escaped_url: &str) -> String {
    format!(
        "<img id=\"img_path\" src=\"{}\" alt=\"Submitted image\">",
        escaped_url
    )
}

fn error_block(message: &str) -> String {
    format!("<p class=\"error\" id=\"error\">{}</p>", escape_html(message))
}
