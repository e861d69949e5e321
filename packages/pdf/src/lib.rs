#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Participant extraction from hackathon registration PDFs.
//!
//! Organizers publish pre-selection results as PDFs: sometimes the list
//! generated by this toolkit ([`inscription_list`]), sometimes a document
//! retyped by hand. This crate turns the text of such a PDF (obtained with
//! [`pdf_extract`]) into [`ExtractedParticipant`] records using a cascade
//! of strategies that assume less and less structure:
//!
//! 1. [`ExtractionTier::DelimitedTable`]: pipe-delimited rows under a `N°`
//!    header ([`table`])
//! 2. [`ExtractionTier::EmailPerLine`]: one email per line with the name
//!    around it ([`email_lines`])
//! 3. [`ExtractionTier::StructuredBlocks`]: one block per record number,
//!    one field per line ([`blocks`])
//! 4. [`ExtractionTier::EmailContext`]: every email in the text plus
//!    whatever surrounds it ([`context`])
//!
//! The first tier that yields at least one participant wins. Extraction
//! never fails: unusable input produces an empty result, and the lines
//! that were skipped are reported in [`ExtractionDiagnostics`].

pub mod blocks;
pub mod context;
pub mod email;
pub mod email_lines;
pub mod inscription_list;
mod names;
pub mod table;

use std::path::Path;

use hackathon_registration_models::ExtractedParticipant;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Errors specific to PDF text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One strategy of the extraction cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionTier {
    /// Pipe-delimited rows under a `N° | Nom | ...` header.
    DelimitedTable,
    /// One email per line, names taken from the rest of the line.
    EmailPerLine,
    /// Record-number blocks with one field per line.
    StructuredBlocks,
    /// Every email in the text, enriched from the surrounding lines.
    EmailContext,
}

impl ExtractionTier {
    /// The full cascade, in evaluation order.
    pub const ALL: &[Self] = &[
        Self::DelimitedTable,
        Self::EmailPerLine,
        Self::StructuredBlocks,
        Self::EmailContext,
    ];

    fn run(
        self,
        document: &Document<'_>,
        diagnostics: &mut ExtractionDiagnostics,
    ) -> Vec<ExtractedParticipant> {
        match self {
            Self::DelimitedTable => table::extract(document, diagnostics),
            Self::EmailPerLine => email_lines::extract(document, diagnostics),
            Self::StructuredBlocks => blocks::extract(document),
            Self::EmailContext => context::extract(document),
        }
    }
}

/// Why a line was skipped by a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// A table row had fewer columns than the layout requires.
    TooFewColumns {
        /// Number of columns found.
        found: usize,
    },
    /// The email column did not hold a plausible address.
    InvalidEmail {
        /// The rejected value.
        value: String,
    },
    /// A line held more than one distinct email.
    AmbiguousEmails {
        /// Number of distinct emails found.
        count: usize,
    },
}

/// A line skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedLine {
    /// Tier that rejected the line.
    pub tier: ExtractionTier,
    /// One-based line number in the extracted text.
    pub line_number: usize,
    /// The trimmed line.
    pub line: String,
    /// Why it was skipped.
    pub reason: RejectReason,
}

/// What happened during one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionDiagnostics {
    /// Number of non-empty lines in the text.
    pub line_count: usize,
    /// Tiers that were run, in order.
    pub attempted: Vec<ExtractionTier>,
    /// Tier whose output was returned, if any produced participants.
    pub tier: Option<ExtractionTier>,
    /// Lines skipped by any attempted tier.
    pub rejected: Vec<RejectedLine>,
}

impl ExtractionDiagnostics {
    pub(crate) fn reject(
        &mut self,
        tier: ExtractionTier,
        line_number: usize,
        line: &str,
        reason: RejectReason,
    ) {
        log::debug!("[{tier}] skipping line {line_number} ({reason:?}): {line}");
        self.rejected.push(RejectedLine {
            tier,
            line_number,
            line: line.to_owned(),
            reason,
        });
    }
}

/// Participants extracted from one document, with diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Extracted participants, in document order.
    pub participants: Vec<ExtractedParticipant>,
    /// How they were obtained.
    pub diagnostics: ExtractionDiagnostics,
}

/// Text under extraction, with its non-empty lines pre-split.
pub(crate) struct Document<'a> {
    /// The full text as handed to the extractor.
    pub text: &'a str,
    /// `(one-based line number, trimmed line)` for every non-empty line.
    pub lines: Vec<(usize, &'a str)>,
}

impl<'a> Document<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        Self { text, lines }
    }
}

/// Runs the extraction cascade over PDF text.
///
/// The extractor holds no state between calls, so one instance can be
/// shared freely and calling it twice on the same text gives the same
/// result.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    tiers: Vec<ExtractionTier>,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor {
    /// Creates an extractor running the full [`ExtractionTier::ALL`]
    /// cascade.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tiers(ExtractionTier::ALL)
    }

    /// Creates an extractor running only `tiers`, in the given order.
    #[must_use]
    pub fn with_tiers(tiers: &[ExtractionTier]) -> Self {
        Self {
            tiers: tiers.to_vec(),
        }
    }

    /// Extracts participants from `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ExtractedParticipant> {
        self.extract_with_diagnostics(text).participants
    }

    /// Extracts participants from `text` and reports how.
    #[must_use]
    pub fn extract_with_diagnostics(&self, text: &str) -> Extraction {
        let document = Document::new(text);
        let mut diagnostics = ExtractionDiagnostics {
            line_count: document.lines.len(),
            ..ExtractionDiagnostics::default()
        };

        log::debug!(
            "Extracting participants from {} characters ({} non-empty lines)",
            text.len(),
            diagnostics.line_count
        );

        for &tier in &self.tiers {
            diagnostics.attempted.push(tier);
            let participants = tier.run(&document, &mut diagnostics);

            if participants.is_empty() {
                log::debug!("[{tier}] no participants, trying next strategy");
                continue;
            }

            log::info!("[{tier}] extracted {} participants", participants.len());
            diagnostics.tier = Some(tier);
            return Extraction {
                participants,
                diagnostics,
            };
        }

        log::info!("No participants found in {} lines", diagnostics.line_count);

        Extraction {
            participants: Vec::new(),
            diagnostics,
        }
    }

    /// Extracts participants from a document on disk, read as text if
    /// [`is_text_document`] and as a PDF otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read. A PDF whose
    /// text cannot be extracted is not an error, see
    /// [`Self::extract_from_pdf`].
    pub fn extract_from_path(&self, path: &Path) -> Result<Extraction, PdfError> {
        if is_text_document(path) {
            let text = std::fs::read_to_string(path)?;
            return Ok(self.extract_with_diagnostics(&text));
        }

        let bytes = std::fs::read(path)?;
        Ok(self.extract_from_pdf(&bytes))
    }

    /// Extracts participants from raw PDF bytes.
    ///
    /// A PDF whose text cannot be extracted is logged and treated as a
    /// document without participants.
    #[must_use]
    pub fn extract_from_pdf(&self, bytes: &[u8]) -> Extraction {
        match extract_text_from_pdf(bytes) {
            Ok(text) => self.extract_with_diagnostics(&text),
            Err(e) => {
                log::warn!("Treating unreadable PDF ({} bytes) as empty: {e}", bytes.len());
                Extraction::default()
            }
        }
    }
}

/// Extracts the text content of a PDF held in memory.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!(
        "Extracted {} characters of text from {} bytes",
        text.len(),
        bytes.len()
    );

    Ok(text)
}

/// Returns `true` for documents stored as plain text (a `.txt` dump of a
/// PDF) rather than as a PDF.
#[must_use]
pub fn is_text_document(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}
