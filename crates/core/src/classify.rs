//! Requester classification.
//!
//! Crawlers and static prerenders wait for the fully-resolved tree before
//! any byte is sent; interactive requesters get the shell as soon as it
//! renders. The predicate is deliberately coarse - a substring scan over
//! the user-agent, matching how non-interactive snapshot agents identify
//! themselves in practice.

/// Completion strategy for one render, chosen before rendering starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyPath {
    /// Respond as soon as the synchronously-renderable shell is ready.
    ShellReady,
    /// Wait for every subtree to resolve before responding.
    AllReady,
}

/// Lowercased user-agent fragments that identify non-interactive requesters.
const CRAWLER_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "crawl",
    "slurp",
    "mediapartners",
    "headless",
    "lighthouse",
    "facebookexternalhit",
    "whatsapp",
    "bingpreview",
    "embedly",
    "pinterest",
    "vkshare",
];

/// Does this user-agent belong to a crawler or snapshot agent?
pub fn is_crawler(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    CRAWLER_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// Select the ready path for a request.
///
/// Crawlers and static prerenders wait for all content; everyone else gets
/// the shell. A missing user-agent is treated as interactive.
pub fn ready_path(user_agent: Option<&str>, static_render: bool) -> ReadyPath {
    if static_render || user_agent.is_some_and(is_crawler) {
        ReadyPath::AllReady
    } else {
        ReadyPath::ShellReady
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_crawlers_detected() {
        assert!(is_crawler("Googlebot/2.1 (+http://www.google.com/bot.html)"));
        assert!(is_crawler("Mozilla/5.0 (compatible; bingbot/2.0)"));
        assert!(is_crawler("facebookexternalhit/1.1"));
        assert!(is_crawler("Mozilla/5.0 HeadlessChrome/120.0"));
    }

    #[test]
    fn test_browsers_not_detected() {
        assert!(!is_crawler(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
        ));
        assert!(!is_crawler("curl/8.4.0"));
    }

    #[test]
    fn test_crawler_selects_all_ready() {
        assert_eq!(
            ready_path(Some("Googlebot/2.1"), false),
            ReadyPath::AllReady
        );
    }

    #[test]
    fn test_interactive_selects_shell_ready() {
        assert_eq!(
            ready_path(Some("Mozilla/5.0 (X11; Linux x86_64)"), false),
            ReadyPath::ShellReady
        );
        assert_eq!(ready_path(None, false), ReadyPath::ShellReady);
    }

    #[test]
    fn test_static_render_forces_all_ready() {
        assert_eq!(ready_path(None, true), ReadyPath::AllReady);
        assert_eq!(
            ready_path(Some("Mozilla/5.0 (X11; Linux x86_64)"), true),
            ReadyPath::AllReady
        );
    }
}
