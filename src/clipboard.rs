/// Handle on the system clipboard.
///
/// Obtained once per run through [`Clipboard::detect`]. Headless sessions and
/// builds without the `clipboard` feature get `None`, and callers treat that
/// as "don't copy" for the rest of the run.
pub struct Clipboard {
    #[cfg(feature = "clipboard")]
    inner: arboard::Clipboard,
}

impl Clipboard {
    #[cfg(feature = "clipboard")]
    pub fn detect() -> Option<Self> {
        match arboard::Clipboard::new() {
            Ok(inner) => Some(Self { inner }),
            Err(e) => {
                tracing::debug!("no clipboard available: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "clipboard"))]
    pub fn detect() -> Option<Self> {
        None
    }

    /// Best effort, a failure here never fails the share
    pub fn copy(&mut self, text: &str) {
        #[cfg(feature = "clipboard")]
        {
            match self.inner.set_text(text.to_owned()) {
                Ok(()) => tracing::info!(text, "copied to clipboard"),
                Err(e) => tracing::warn!("failed to copy to clipboard: {}", e),
            }
        }
        #[cfg(not(feature = "clipboard"))]
        let _ = text;
    }
}

impl std::fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clipboard").finish_non_exhaustive()
    }
}
