//! HTML documents served by the paste view.
//!
//! Pages are rendered client-side: the paste is embedded as a JSON payload
//! and turned into HTML by marked, with Prism highlighting code blocks.

mod transcript;

pub use transcript::{parse_transcript, ChatMessage};

use serde::Serialize;

const DEFAULT_TITLE: &str = "Markdown Viewer";
const CHAT_TITLE: &str = "Chat transcript";
const MAX_TITLE_CHARS: usize = 48;

/// Markdown shown when a paste does not exist.
pub const MISSING_MARKDOWN: &str = "# Error\nContent not found.";
/// Markdown shown when the store could not be read.
pub const UNAVAILABLE_MARKDOWN: &str =
    "# Error\nThis paste is temporarily unavailable. Please try again later.";

/// How stored content is laid out on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    Markdown(&'a str),
    Chat(Vec<ChatMessage>),
}

impl<'a> Document<'a> {
    /// Chat layout when `content` is a transcript, Markdown otherwise.
    pub fn classify(content: &'a str) -> Self {
        match parse_transcript(content) {
            Some(messages) => Self::Chat(messages),
            None => Self::Markdown(content),
        }
    }

    fn title(&self) -> String {
        match self {
            Self::Markdown(text) => {
                markdown_heading(text).unwrap_or_else(|| DEFAULT_TITLE.to_string())
            }
            Self::Chat(_) => CHAT_TITLE.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Payload<'a> {
    Markdown { text: &'a str },
    Chat { messages: &'a [ChatMessage] },
}

fn markdown_heading(text: &str) -> Option<String> {
    text.lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|heading| !heading.is_empty())
        .map(|heading| heading.chars().take(MAX_TITLE_CHARS).collect())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Serialize the payload so it can sit inside a `<script>` element.
fn script_safe_json(payload: &Payload<'_>) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|err| {
        tracing::error!("Failed to encode view payload: {}", err);
        String::from("{\"kind\":\"markdown\",\"text\":\"\"}")
    });
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Render a full HTML page for `document`.
pub fn render_document(document: &Document<'_>) -> String {
    let payload = match document {
        Document::Markdown(text) => Payload::Markdown { text: *text },
        Document::Chat(messages) => Payload::Chat {
            messages: messages.as_slice(),
        },
    };

    let mut page = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + 256);
    page.push_str(PAGE_HEAD);
    page.push_str(&escape_html(&document.title()));
    page.push_str(PAGE_BODY);
    page.push_str(&script_safe_json(&payload));
    page.push_str(PAGE_TAIL);
    page
}

/// Render the stored `content` of a paste.
pub fn render_view(content: &str) -> String {
    render_document(&Document::classify(content))
}

/// Placeholder page for a paste that does not exist.
pub fn render_missing() -> String {
    render_document(&Document::Markdown(MISSING_MARKDOWN))
}

/// Placeholder page for a paste that could not be loaded.
pub fn render_unavailable() -> String {
    render_document(&Document::Markdown(UNAVAILABLE_MARKDOWN))
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>"#;

const PAGE_BODY: &str = r#"</title>
<link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;700&display=swap" rel="stylesheet">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/themes/prism.min.css">
<script src="https://cdnjs.cloudflare.com/ajax/libs/marked/4.3.0/marked.min.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/dompurify/3.0.6/purify.min.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/prism.min.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-python.min.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-rust.min.js"></script>
<style>
body { margin: 0; background: #ffffff; color: #000000; }
.markdown-body { font-family: 'Inter', sans-serif; font-size: 20px; line-height: 1.4; word-wrap: break-word; padding: 20px; box-sizing: border-box; max-width: 100vw; min-height: 100vh; }
pre { font-size: 16px; white-space: pre-wrap; word-wrap: break-word; padding: 10px; border-radius: 5px; position: relative; }
.copy-btn { position: absolute; top: 10px; right: 10px; background: #f0f0f0; border: none; padding: 5px 10px; cursor: pointer; border-radius: 3px; }
.copy-btn:hover { background: #e0e0e0; }
.message { margin: 12px 0; padding: 10px 14px; border-radius: 10px; background: #f4f4f5; }
.message.role-user { background: #e8f0fe; }
.message .role { font-weight: 700; font-size: 14px; text-transform: capitalize; }
</style>
</head>
<body class="markdown-body">
<div id="content"></div>
<script id="paste-data" type="application/json">"#;

const PAGE_TAIL: &str = r#"</script>
<script>
document.addEventListener("DOMContentLoaded", () => {
  const payload = JSON.parse(document.getElementById("paste-data").textContent);
  marked.setOptions({
    highlight: (code, lang) =>
      Prism.highlight(code, Prism.languages[lang] || Prism.languages.javascript, lang),
  });
  const toHtml = (markdown) => DOMPurify.sanitize(marked.parse(markdown));
  const root = document.getElementById("content");
  if (payload.kind === "chat") {
    for (const message of payload.messages) {
      const bubble = document.createElement("div");
      bubble.className = "message role-" + message.role.replace(/[^a-z0-9_-]/gi, "");
      const label = document.createElement("div");
      label.className = "role";
      label.textContent = message.role;
      const body = document.createElement("div");
      body.innerHTML = toHtml(message.content);
      bubble.append(label, body);
      root.appendChild(bubble);
    }
  } else {
    root.innerHTML = toHtml(payload.text);
  }
  document.querySelectorAll("pre").forEach((pre) => {
    const btn = document.createElement("button");
    btn.textContent = "Copy";
    btn.className = "copy-btn";
    btn.addEventListener("click", () => {
      const code = pre.querySelector("code");
      navigator.clipboard.writeText(code ? code.textContent : pre.textContent).then(() => {
        btn.textContent = "Copied!";
        setTimeout(() => { btn.textContent = "Copy"; }, 2000);
      });
    });
    pre.appendChild(btn);
  });
});
</script>
</body>
</html>
"#;
