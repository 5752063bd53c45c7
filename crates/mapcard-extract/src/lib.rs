//! Field parsers and the unified parsing facade for business-listing
//! extraction.
//!
//! Four independent parsers (services/prices, schedule, contacts,
//! reviews) each return a [`ParseOutcome`] — success flag, payload,
//! warnings, and a confidence score — and never raise for missing
//! fields. The [`DocumentExtractor`] facade combines them into one
//! validated [`mapcard_core::Enterprise`] per source document.

pub mod contacts;
pub mod extractor;
pub mod outcome;
pub mod reviews;
pub mod schedule;
pub mod sentiment;
pub mod services;

pub use contacts::{ContactInput, ContactParser, ContactsDraft};
pub use extractor::{DocumentExtractor, SourceFragments};
pub use outcome::ParseOutcome;
pub use reviews::ReviewParser;
pub use schedule::ScheduleParser;
pub use sentiment::{classify, lexicon_score, SentimentLabel};
pub use services::{PriceFields, ServiceParser};
