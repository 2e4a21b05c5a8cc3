use std::{
    io,
    sync::{Arc, Mutex},
};

use shared::domain::Citation;
use tracing::{info, warn};

/// Host capability for opening a URL in a new top-level browsing context.
pub trait LinkOpener: Send + Sync {
    fn open(&self, link: &str) -> io::Result<()>;
}

/// Hands links to the platform's default URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, link: &str) -> io::Result<()> {
        open::that(link)
    }
}

/// Keeps every requested link instead of opening it. Used by headless runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingLinkOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

impl RecordingLinkOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|links| links.clone())
            .unwrap_or_default()
    }
}

impl LinkOpener for RecordingLinkOpener {
    fn open(&self, link: &str) -> io::Result<()> {
        self.opened
            .lock()
            .map_err(|_| io::Error::other("recording opener poisoned"))?
            .push(link.to_string());
        Ok(())
    }
}

/// Fire-and-forget: an opener failure is logged, never returned.
pub fn open_citation(citation: &Citation, opener: &dyn LinkOpener) {
    info!(
        source = %citation.source,
        paragraph = citation.paragraph.as_deref().unwrap_or("-"),
        "opening citation"
    );
    if let Err(err) = opener.open(&citation.link) {
        warn!(source = %citation.source, "failed to open citation link: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenOpener;

    impl LinkOpener for BrokenOpener {
        fn open(&self, _link: &str) -> io::Result<()> {
            Err(io::Error::other("no browser"))
        }
    }

    fn citation(link: &str) -> Citation {
        Citation {
            text: "quoted".to_string(),
            source: "doc.pdf".to_string(),
            link: link.to_string(),
            paragraph: None,
        }
    }

    #[test]
    fn opens_link_verbatim() {
        let link = "https://example.test/a%20b/Doc.pdf?e=TEu4vz&x=%2F#page=7";
        let opener = RecordingLinkOpener::default();
        open_citation(&citation(link), &opener);
        assert_eq!(opener.opened(), vec![link.to_string()]);
    }

    #[test]
    fn opener_failure_is_swallowed() {
        open_citation(&citation("https://example.test/doc.pdf"), &BrokenOpener);
    }
}
