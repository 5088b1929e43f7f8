use super::{TemplatePage, tokens};
use base64::{Engine, engine::general_purpose::STANDARD};

/// One page ready to be embedded as a compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionResult {
    pub name: String,
    /// Quoted string literal holding base64 of the substituted html.
    pub encoded_html: String,
}

/// Substitute the placeholders of a page and encode the result.
pub fn process(page: &TemplatePage, version: &str) -> SubstitutionResult {
    SubstitutionResult {
        name: page.name.clone(),
        encoded_html: encode(&substitute(page, version)),
    }
}

/// Replace the placeholder tokens of one page.
///
/// `__VERSION__` is replaced on every page. Pages other than the error page
/// get their stylesheet wrapped in a `<style>` block at `__STYLE__` and
/// their script inlined verbatim at `__SCRIPT__`, in that order.
pub fn substitute(page: &TemplatePage, version: &str) -> String {
    let html = page.raw_html.replace(tokens::VERSION, version);
    if page.is_error_page() {
        return html;
    }

    let style = page.style_text.as_deref().unwrap_or_default();
    let script = page.script_text.as_deref().unwrap_or_default();
    html.replace(tokens::STYLE, &format!("<style>{style}</style>"))
        .replace(tokens::SCRIPT, script)
}

/// Base64 of the utf-8 bytes, rendered as a quoted JSON string literal.
pub fn encode(html: &str) -> String {
    serde_json::Value::String(STANDARD.encode(html.as_bytes())).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(name: &str, html: &str) -> TemplatePage {
        TemplatePage {
            name: name.into(),
            raw_html: html.into(),
            style_text: Some("h1{color:red}".into()),
            script_text: Some("console.log('__STYLE__ is not a token here');".into()),
        }
    }

    fn decode(literal: &str) -> Vec<u8> {
        let inner: String = serde_json::from_str(literal).unwrap();
        STANDARD.decode(inner).unwrap()
    }

    #[test]
    fn test_version_replaced_everywhere() {
        let p = page("panel", "<title>__VERSION__</title><p>v__VERSION__</p>");
        let html = substitute(&p, "1.2.3");

        assert_eq!(html.matches("1.2.3").count(), 2);
        assert!(!html.contains("__VERSION__"));
        assert!(html.starts_with("<title>1.2.3</title><p>v1.2.3</p>"));
    }

    #[test]
    fn test_style_and_script_inlined() {
        let p = TemplatePage {
            script_text: Some("let a = 1 < 2;".into()),
            ..page("login", "<head>__STYLE__</head><script>__SCRIPT__</script>")
        };
        let html = substitute(&p, "1.0.0");

        assert_eq!(
            html,
            "<head><style>h1{color:red}</style></head><script>let a = 1 < 2;</script>"
        );
        assert!(!html.contains("__STYLE__"));
        assert!(!html.contains("__SCRIPT__"));
    }

    #[test]
    fn test_style_replaced_before_script() {
        // A script mentioning the style token keeps it: the style pass ran first
        let p = page("panel", "__STYLE__|__SCRIPT__");
        let html = substitute(&p, "1.0.0");
        assert!(html.ends_with("console.log('__STYLE__ is not a token here');"));
    }

    #[test]
    fn test_error_page_only_versioned() {
        let p = page("error", "<p>__VERSION__</p>__STYLE____SCRIPT__");
        let html = substitute(&p, "2.0.0");
        assert_eq!(html, "<p>2.0.0</p>__STYLE____SCRIPT__");
    }

    #[test]
    fn test_encode_round_trip_utf8() {
        let html = "<p>版本 ✔ \"quoted\" \\ </p>\n";
        let literal = encode(html);

        assert!(literal.starts_with('"') && literal.ends_with('"'));
        assert_eq!(decode(&literal), html.as_bytes());
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(""), "\"\"");
    }

    #[test]
    fn test_process_deterministic() {
        let p = page("panel", "<body>__STYLE____SCRIPT__ __VERSION__</body>");
        let first = process(&p, "1.2.3");
        let second = process(&p, "1.2.3");

        assert_eq!(first, second);
        assert_eq!(first.name, "panel");
        assert_eq!(decode(&first.encoded_html), substitute(&p, "1.2.3").as_bytes());
    }
}
