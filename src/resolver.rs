//! Player URL resolution from embed markup
//!
//! A Vimeo embed on a host page carries the playable URL in one of two
//! shapes: a direct `player.vimeo.com/video/<id>` reference, or an Embedly
//! widget iframe whose `src` query parameter wraps the real player URL.
//! Resolution walks these sources in decreasing order of trust and degrades
//! to the caller-supplied embed URL when the markup yields nothing. The
//! markup-derived URL is always preferred: it is what actually renders in
//! the embedding page, whereas the embed URL sometimes serves a
//! "Page not found".

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Host a nested Embedly `src` URL is expected to point at
const PLAYER_HOST: &str = "player.vimeo.com";

#[allow(clippy::expect_used)]
static PLAYER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://player\.vimeo\.com/video/\d+").expect("player URL pattern is valid")
});

#[allow(clippy::expect_used)]
static EMBEDLY_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"src="(//cdn\.embedly\.com/widgets[^"]+)""#).expect("widget pattern is valid")
});

/// Where a resolved URL came from, in decreasing order of trust
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Direct player URL found in the embed markup
    PlayerMarkup,
    /// Player URL unwrapped from an Embedly widget redirect in the markup
    WidgetRedirect,
    /// The caller-supplied embed URL, used when the markup yields nothing
    Fallback,
}

/// An absolute video URL tagged with how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// The URL to hand to the downloader
    pub url: String,
    /// How the URL was obtained
    pub provenance: Provenance,
}

/// Resolve the best-known video URL from embed markup and/or a fallback URL
///
/// Priority order:
/// 1. First direct player URL in the markup
/// 2. First Embedly widget redirect in the markup, unwrapped via its `src`
///    query parameter
/// 3. The fallback URL, unchanged
///
/// Malformed widget URLs are logged and skipped rather than raised, so the
/// function never fails; `None` means no usable URL exists and the caller
/// must treat that as a fatal input error.
#[must_use]
pub fn resolve(markup: Option<&str>, fallback_url: Option<&str>) -> Option<ResolvedUrl> {
    if let Some(markup) = markup.filter(|m| !m.is_empty())
        && let Some(found) = from_markup(markup)
    {
        return Some(found);
    }

    fallback_url
        .filter(|u| !u.is_empty())
        .map(|u| ResolvedUrl {
            url: u.to_string(),
            provenance: Provenance::Fallback,
        })
}

fn from_markup(markup: &str) -> Option<ResolvedUrl> {
    if let Some(found) = PLAYER_URL.find(markup) {
        tracing::info!(url = found.as_str(), "found Vimeo player URL in embed markup");
        return Some(ResolvedUrl {
            url: found.as_str().to_string(),
            provenance: Provenance::PlayerMarkup,
        });
    }

    let widget = EMBEDLY_SRC.captures(markup).map(|caps| caps[1].to_string())?;
    tracing::info!(url = %widget, "found Embedly widget URL in embed markup");
    unwrap_widget(&widget)
}

/// Unwrap the player URL nested in an Embedly widget's `src` query parameter
///
/// The widget URL is protocol-relative and gains an `https:` scheme before
/// parsing. Failure at any stage is a warning, not an error: resolution
/// falls through to the fallback tier.
fn unwrap_widget(widget: &str) -> Option<ResolvedUrl> {
    let widget_url = match Url::parse(&format!("https:{widget}")) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unparsable Embedly widget URL");
            return None;
        }
    };

    let Some(src) = widget_url
        .query_pairs()
        .find(|(key, _)| key == "src")
        .map(|(_, value)| value.into_owned())
    else {
        tracing::warn!("Embedly widget URL carries no src parameter");
        return None;
    };

    let nested = match Url::parse(&src) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(src = %src, error = %e, "ignoring unparsable Embedly src URL");
            return None;
        }
    };

    if nested.host_str() == Some(PLAYER_HOST) {
        tracing::info!(url = %src, "got Vimeo player URL from Embedly src");
    } else {
        // Kept permissive: a non-Vimeo src may still be downloadable.
        tracing::warn!(src = %src, "Embedly src does not point at a Vimeo player URL");
    }

    Some(ResolvedUrl {
        url: src,
        provenance: Provenance::WidgetRedirect,
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_MARKUP: &str = r#"<iframe src="https://player.vimeo.com/video/123456789?h=abc" width="640"></iframe>"#;

    const EMBEDLY_MARKUP: &str = r#"<iframe class="embedly-embed" src="//cdn.embedly.com/widgets/media.html?src=https%3A%2F%2Fplayer.vimeo.com%2Fvideo%2F987654321&display_name=Vimeo" width="640"></iframe>"#;

    #[test]
    fn player_url_is_extracted_from_markup() {
        let resolved = resolve(Some(PLAYER_MARKUP), None).unwrap();
        assert_eq!(resolved.url, "https://player.vimeo.com/video/123456789");
        assert_eq!(resolved.provenance, Provenance::PlayerMarkup);
    }

    #[test]
    fn player_url_wins_over_widget_redirect() {
        let markup = format!("{EMBEDLY_MARKUP}{PLAYER_MARKUP}");
        let resolved = resolve(Some(&markup), Some("https://vimeo.com/fallback")).unwrap();
        assert_eq!(resolved.url, "https://player.vimeo.com/video/123456789");
        assert_eq!(resolved.provenance, Provenance::PlayerMarkup);
    }

    #[test]
    fn widget_redirect_is_unwrapped() {
        let resolved = resolve(Some(EMBEDLY_MARKUP), None).unwrap();
        assert_eq!(resolved.url, "https://player.vimeo.com/video/987654321");
        assert_eq!(resolved.provenance, Provenance::WidgetRedirect);
    }

    #[test]
    fn widget_with_non_vimeo_src_is_still_returned() {
        let markup = r#"<iframe src="//cdn.embedly.com/widgets/media.html?src=https%3A%2F%2Fexample.com%2Fclip"></iframe>"#;
        let resolved = resolve(Some(markup), None).unwrap();
        assert_eq!(resolved.url, "https://example.com/clip");
        assert_eq!(resolved.provenance, Provenance::WidgetRedirect);
    }

    #[test]
    fn widget_without_src_parameter_falls_through_to_fallback() {
        let markup = r#"<iframe src="//cdn.embedly.com/widgets/media.html?display_name=Vimeo"></iframe>"#;
        let resolved = resolve(Some(markup), Some("https://vimeo.com/55")).unwrap();
        assert_eq!(resolved.url, "https://vimeo.com/55");
        assert_eq!(resolved.provenance, Provenance::Fallback);
    }

    #[test]
    fn widget_with_unparsable_src_and_no_fallback_yields_none() {
        let markup = r#"<iframe src="//cdn.embedly.com/widgets/media.html?src=not%20a%20url"></iframe>"#;
        assert!(resolve(Some(markup), None).is_none());
    }

    #[test]
    fn absent_markup_returns_fallback_unchanged() {
        let resolved = resolve(None, Some("https://vimeo.com/123?h=tok")).unwrap();
        assert_eq!(resolved.url, "https://vimeo.com/123?h=tok");
        assert_eq!(resolved.provenance, Provenance::Fallback);
    }

    #[test]
    fn empty_markup_counts_as_absent() {
        let resolved = resolve(Some(""), Some("https://vimeo.com/123")).unwrap();
        assert_eq!(resolved.provenance, Provenance::Fallback);
    }

    #[test]
    fn markup_without_patterns_uses_fallback() {
        let resolved = resolve(Some("<p>nothing embedded here</p>"), Some("https://vimeo.com/9"));
        assert_eq!(resolved.unwrap().provenance, Provenance::Fallback);
    }

    #[test]
    fn nothing_usable_yields_none() {
        assert!(resolve(None, None).is_none());
        assert!(resolve(Some("<p>no urls</p>"), None).is_none());
        assert!(resolve(None, Some("")).is_none());
    }
}
