//! Offline link preview derivation.
//!
//! Derives a display title, description and favicon URL from the URL's host
//! alone. No network access happens here.

use url::Url;

const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";

const KNOWN_DOMAIN_TITLES: &[(&str, &str)] = &[
    ("youtube.com", "YouTube Video"),
    ("youtu.be", "YouTube Video"),
    ("amazon.com", "Amazon Product"),
    ("github.com", "GitHub Repository"),
    ("stackoverflow.com", "Stack Overflow"),
    ("medium.com", "Medium Article"),
    ("twitter.com", "Twitter Post"),
    ("x.com", "X Post"),
    ("linkedin.com", "LinkedIn Post"),
    ("reddit.com", "Reddit Post"),
    ("wikipedia.org", "Wikipedia Article"),
];

/// Preview fields derived for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPreview {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub favicon: Option<String>,
}

/// Derives preview fields for `url`.
///
/// Unparsable URLs or URLs without a host fall back to `title = url` with no
/// description or favicon.
pub fn derive_link_preview(url: &str) -> LinkPreview {
    let Some(domain) = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
    else {
        return LinkPreview {
            url: url.to_string(),
            title: url.to_string(),
            description: None,
            favicon: None,
        };
    };

    LinkPreview {
        url: url.to_string(),
        title: title_for_domain(&domain),
        description: Some(format!("Link from {domain}")),
        favicon: Some(format!("{FAVICON_ENDPOINT}?domain={domain}&sz=32")),
    }
}

fn title_for_domain(domain: &str) -> String {
    if let Some((_, title)) = KNOWN_DOMAIN_TITLES.iter().find(|(known, _)| *known == domain) {
        return (*title).to_string();
    }

    let mut chars = domain.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
