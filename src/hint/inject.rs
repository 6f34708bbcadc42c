//! `<link>` rendering and insertion before `</head>`.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

use super::resolve::ResolvedHint;
use crate::utils::html::escape_attr;

/// Closing head tag, any case, optional whitespace before `>`.
static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

/// `href` of an existing `<link>` tag, double, single or unquoted.
static LINK_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<link\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// Result of injecting into one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Tags were spliced in, with the number of tags added.
    Injected(String, usize),
    /// Nothing to insert; markup is untouched.
    Unchanged,
    /// No `</head>` to insert before; markup is untouched.
    MissingHead,
}

/// Render one hint as a `<link>` tag.
pub fn render_link(hint: &ResolvedHint<'_>) -> String {
    let mut tag = format!(r#"<link rel="{}""#, escape_attr(&hint.rel));
    if let Some(as_) = &hint.as_ {
        tag.push_str(&format!(r#" as="{}""#, escape_attr(as_)));
    }
    if hint.crossorigin {
        tag.push_str(r#" crossorigin="crossorigin""#);
    }
    tag.push_str(&format!(r#" href="{}">"#, escape_attr(&hint.file.public_path)));
    tag
}

/// Hrefs already carried by `<link>` tags, as written in the markup.
fn linked_hrefs(markup: &str) -> FxHashSet<&str> {
    LINK_HREF
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str())
        .collect()
}

/// Insert rendered hints, in order, right before the first `</head>`.
///
/// Files the markup already links to are skipped, so injecting into
/// previously hinted output adds nothing. Existing markup is never removed
/// or reordered.
pub fn inject(markup: &str, hints: &[ResolvedHint<'_>]) -> Injection {
    let linked = linked_hrefs(markup);
    let fresh: Vec<_> = hints
        .iter()
        .filter(|hint| !linked.contains(escape_attr(&hint.file.public_path).as_ref()))
        .collect();
    if fresh.is_empty() {
        return Injection::Unchanged;
    }

    let Some(head) = HEAD_CLOSE.find(markup) else {
        return Injection::MissingHead;
    };

    let tags: String = fresh.iter().map(|hint| render_link(hint)).collect();

    let mut out = String::with_capacity(markup.len() + tags.len());
    out.push_str(&markup[..head.start()]);
    out.push_str(&tags);
    out.push_str(&markup[head.start()..]);
    Injection::Injected(out, fresh.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::output::BuildOutput;

    fn hint<'a>(file: &'a BuildOutput, rel: &str, as_: Option<&str>, cors: bool) -> ResolvedHint<'a> {
        ResolvedHint {
            file,
            rel: rel.to_string(),
            as_: as_.map(str::to_string),
            crossorigin: cors,
        }
    }

    #[test]
    fn test_render_link_variants() {
        let js = BuildOutput::chunk("/chunk.abc123.js", "home", true);
        let font = BuildOutput::chunk("/font.woff2", "home", true);

        assert_eq!(
            render_link(&hint(&js, "preload", Some("script"), false)),
            r#"<link rel="preload" as="script" href="/chunk.abc123.js">"#
        );
        assert_eq!(
            render_link(&hint(&js, "prefetch", None, false)),
            r#"<link rel="prefetch" href="/chunk.abc123.js">"#
        );
        assert_eq!(
            render_link(&hint(&font, "preload", Some("font"), true)),
            r#"<link rel="preload" as="font" crossorigin="crossorigin" href="/font.woff2">"#
        );
    }

    #[test]
    fn test_render_link_escapes_href() {
        let odd = BuildOutput::chunk(r#"/a"b&c.js"#, "x", true);
        assert_eq!(
            render_link(&hint(&odd, "prefetch", None, false)),
            r#"<link rel="prefetch" href="/a&quot;b&amp;c.js">"#
        );
    }

    #[test]
    fn test_inject_before_head_close_in_order() {
        let a = BuildOutput::chunk("/a.js", "x", true);
        let b = BuildOutput::chunk("/b.js", "x", true);
        let markup = "<html><head><title>t</title></head><body></body></html>";

        let result = inject(
            markup,
            &[hint(&a, "prefetch", None, false), hint(&b, "prefetch", None, false)],
        );
        assert_eq!(
            result,
            Injection::Injected(
                r#"<html><head><title>t</title><link rel="prefetch" href="/a.js"><link rel="prefetch" href="/b.js"></head><body></body></html>"#
                    .to_string(),
                2
            )
        );
    }

    #[test]
    fn test_inject_case_insensitive_marker() {
        let a = BuildOutput::chunk("/a.js", "x", true);
        let markup = "<HTML><HEAD></HEAD ></HTML>";
        let Injection::Injected(out, _) = inject(markup, &[hint(&a, "prefetch", None, false)]) else {
            panic!("expected injection");
        };
        assert_eq!(out, r#"<HTML><HEAD><link rel="prefetch" href="/a.js"></HEAD ></HTML>"#);
    }

    #[test]
    fn test_inject_missing_head() {
        let a = BuildOutput::chunk("/a.js", "x", true);
        let result = inject("<body>no head</body>", &[hint(&a, "prefetch", None, false)]);
        assert_eq!(result, Injection::MissingHead);
    }

    #[test]
    fn test_inject_empty_is_unchanged() {
        assert_eq!(inject("<head></head>", &[]), Injection::Unchanged);
        assert_eq!(inject("no head at all", &[]), Injection::Unchanged);
    }

    #[test]
    fn test_inject_only_first_head() {
        let a = BuildOutput::chunk("/a.js", "x", true);
        let markup = "<head></head><template><head></head></template>";
        let Injection::Injected(out, _) = inject(markup, &[hint(&a, "prefetch", None, false)]) else {
            panic!("expected injection");
        };
        assert_eq!(out.matches("<link").count(), 1);
        assert!(out.starts_with(r#"<head><link rel="prefetch" href="/a.js"></head>"#));
    }

    #[test]
    fn test_inject_skips_already_linked() {
        let a = BuildOutput::chunk("/a.js", "x", true);
        let b = BuildOutput::chunk("/b.js", "x", true);
        let hints = [hint(&a, "prefetch", None, false), hint(&b, "prefetch", None, false)];

        let Injection::Injected(once, 2) = inject("<head></head>", &hints) else {
            panic!("expected two tags");
        };
        assert_eq!(inject(&once, &hints), Injection::Unchanged);

        let markup = r#"<head><LINK rel=stylesheet HREF='/a.js'></head>"#;
        let Injection::Injected(out, 1) = inject(markup, &hints) else {
            panic!("expected one tag");
        };
        assert_eq!(out.matches("/a.js").count(), 1);
        assert!(out.contains(r#"<link rel="prefetch" href="/b.js">"#));
    }

    #[test]
    fn test_inject_matches_escaped_href() {
        let odd = BuildOutput::chunk("/a&b.js", "x", true);
        let hints = [hint(&odd, "prefetch", None, false)];
        let Injection::Injected(once, 1) = inject("<head></head>", &hints) else {
            panic!("expected injection");
        };
        assert_eq!(inject(&once, &hints), Injection::Unchanged);
    }

    #[test]
    fn test_script_src_does_not_count_as_linked() {
        let a = BuildOutput::chunk("/a.js", "x", true);
        let markup = r#"<head><script src="/a.js"></script></head>"#;
        assert!(matches!(
            inject(markup, &[hint(&a, "preload", Some("script"), false)]),
            Injection::Injected(_, 1)
        ));
    }
}
