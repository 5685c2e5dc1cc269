//! Fixed page skeleton with named placeholders.

const TITLE_SLOT: &str = "{{pageTitle}}";
const CONTENT_SLOT: &str = "{{pageContent}}";

const SKELETON: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{pageTitle}}</title>
<style>
body{font-family:sans-serif;max-width:28em;margin:2em auto;padding:0 1em;color:#222}
h1{font-size:1.4em}
label{display:block;margin-top:.8em}
.textbox{width:100%;padding:.4em;box-sizing:border-box}
.button{display:inline-block;margin:.8em .6em 0 0;padding:.5em 1.2em;border:0;border-radius:4px;background:#2b6cb0;color:#fff;text-decoration:none;font-size:1em}
.error{color:#b00020}
</style>
</head>
<body>
<h1>{{pageTitle}}</h1>
{{pageContent}}
</body>
</html>
"#;

/// Substitute `title` (escaped) and `content` (trusted markup) into the skeleton.
///
/// One pass over the skeleton; substituted text is never rescanned.
pub fn render(title: &str, content: &str) -> String {
    let title = html_escape(title);
    let mut out = String::with_capacity(SKELETON.len() + 2 * title.len() + content.len());
    let mut rest = SKELETON;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(TITLE_SLOT) {
            out.push_str(&title);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(CONTENT_SLOT) {
            out.push_str(content);
            rest = after;
        } else {
            out.push_str("{{");
            rest = &tail[2..];
        }
    }
    out.push_str(rest);
    out
}

/// Escape text for element content and double-quoted attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
