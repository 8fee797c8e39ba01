//! Latest-version extraction from a store item page.

use once_cell::sync::Lazy;
use regex::Regex;

/// Any `<span ...>inner</span>`, shortest inner text.
static SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<span([^>]*)>(.*?)</span>").expect("span pattern is valid"));

/// Every `class="..."` in an open tag, including `:class` and `data-class`.
static CLASS_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)class="([^"]*)""#).expect("class pattern is valid"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Class tokens that mark the version badge on an item page.
static BADGE_CLASSES: Lazy<[Regex; 3]> = Lazy::new(|| {
    ["animate-glow", "text-white", "bg-green-500"].map(|class| {
        Regex::new(&format!(r"(?i)\b{}\b", regex::escape(class)))
            .expect("class pattern is valid")
    })
});

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Whether any class-like attribute of the tag carries all badge classes.
fn is_badge(attributes: &str) -> bool {
    CLASS_ATTR
        .captures_iter(attributes)
        .filter_map(|caps| caps.get(1))
        .any(|class| BADGE_CLASSES.iter().all(|re| re.is_match(class.as_str())))
}

/// Extract the version text from the first version badge in `html`.
///
/// Returns an empty string when the page has no badge.
pub fn extract_version(html: &str) -> String {
    let mut pos = 0;

    while let Some(caps) = SPAN.captures_at(html, pos) {
        let (Some(whole), Some(attributes), Some(inner)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            break;
        };

        if is_badge(attributes.as_str()) {
            return clean_inner_text(inner.as_str());
        }

        // A badge may sit inside a rejected span; `<` is one byte.
        pos = whole.start() + 1;
    }

    String::new()
}

fn clean_inner_text(inner: &str) -> String {
    let text = TAG.replace_all(inner, "");
    let mut text = text.trim().to_string();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_badge_text() {
        let html = r#"<div><span class="px-2 animate-glow text-white bg-green-500">V 1.4.0</span></div>"#;
        assert_eq!(extract_version(html), "V 1.4.0");
    }

    #[test]
    fn test_class_order_and_case_do_not_matter() {
        let html = r#"<SPAN id="v" CLASS="bg-green-500 Text-White animate-glow animate-glow">
            v2.0b
        </Span>"#;
        assert_eq!(extract_version(html), "v2.0b");
    }

    #[test]
    fn test_missing_class_means_no_match() {
        let html = r#"<span class="animate-glow text-white">V 1.4.0</span>"#;
        assert_eq!(extract_version(html), "");
        assert_eq!(extract_version(""), "");
    }

    #[test]
    fn test_partial_class_names_do_not_count() {
        let html = r#"<span class="xanimate-glow text-white bg-green-5000">V 1</span>"#;
        assert_eq!(extract_version(html), "");
    }

    #[test]
    fn test_first_badge_wins() {
        let html = r#"<span class="animate-glow text-white bg-green-500">1.0</span>
            <span class="animate-glow text-white bg-green-500">2.0</span>"#;
        assert_eq!(extract_version(html), "1.0");
    }

    #[test]
    fn test_badge_nested_in_plain_span() {
        let html = r#"<span class="wrapper"><span class="animate-glow text-white bg-green-500">V 3</span></span>"#;
        assert_eq!(extract_version(html), "V 3");
    }

    #[test]
    fn test_attributes_after_class() {
        let html = r#"<span class="animate-glow text-white bg-green-500" :class="{ 'x': open }">V 1.4.0</span>"#;
        assert_eq!(extract_version(html), "V 1.4.0");

        let html = r#"<span class="animate-glow text-white bg-green-500" data-class="pill">V 2</span>"#;
        assert_eq!(extract_version(html), "V 2");

        let html = r#"<span class="animate-glow text-white bg-green-500" title="latest">V 3</span>"#;
        assert_eq!(extract_version(html), "V 3");
    }

    #[test]
    fn test_class_after_other_attributes() {
        let html = r#"<span data-class="pill" id="ver" x-bind:class="open" class="bg-green-500 animate-glow text-white">V 4</span>"#;
        assert_eq!(extract_version(html), "V 4");
    }

    #[test]
    fn test_badge_tokens_split_across_attributes_do_not_count() {
        let html = r#"<span class="pill" :class="text-white" data-class="animate-glow">V 5</span>"#;
        assert_eq!(extract_version(html), "");
    }

    #[test]
    fn test_inner_tags_and_entities() {
        let html = r#"<span class="animate-glow text-white bg-green-500"> <b>V&nbsp;1.2</b> &amp;lt;rc&gt; </span>"#;
        // `&amp;` is decoded before `&lt;`, so `&amp;lt;` becomes `<`.
        assert_eq!(extract_version(html), "V 1.2 <rc>");
    }
}
