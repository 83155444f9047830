//! Content negotiation: resolving the media types a client accepts and
//! matching them against the representations an entry point can produce.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{http_abstraction::AuthRequest, matcher::RequestMatcher};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    #[error("Invalid media type '{0}'")]
    InvalidMediaType(String),
    #[error("Invalid quality value in '{0}'")]
    InvalidQuality(String),
}

/// A `type/subtype` pair with its quality factor (in thousandths).
///
/// Parameters other than `q` are not retained; equality and compatibility
/// only consider type and subtype.
#[derive(Debug, Clone)]
pub struct MediaType {
    type_: String,
    subtype: String,
    quality: u16,
}

const WILDCARD: &str = "*";

impl MediaType {
    pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_: type_.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            quality: 1000,
        }
    }

    /// `*/*`
    pub fn all() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// `application/json`
    pub fn application_json() -> Self {
        Self::new("application", "json")
    }

    /// Parse a single media range such as `text/html;q=0.8`.
    ///
    /// Parameters may be quoted strings; only `q` is kept.
    pub fn parse(value: &str) -> Result<Self, NegotiationError> {
        let invalid = || NegotiationError::InvalidMediaType(value.to_string());
        let trimmed = value.trim();

        // A lone "*" is a common shorthand for "*/*".
        let mime: mime::Mime = if trimmed == WILDCARD {
            mime::STAR_STAR
        } else {
            trimmed.parse().map_err(|_| invalid())?
        };

        let (type_, subtype) = mime.essence_str().split_once('/').ok_or_else(invalid)?;
        if type_ == WILDCARD && subtype != WILDCARD {
            return Err(invalid());
        }

        let mut media_type = Self::new(type_, subtype);
        if let Some((_, raw)) = mime
            .params()
            .find(|(name, _)| name.as_str().eq_ignore_ascii_case("q"))
        {
            media_type.quality = parse_quality(raw.as_str().trim())
                .ok_or_else(|| NegotiationError::InvalidQuality(value.to_string()))?;
        }

        Ok(media_type)
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Quality factor between 0.0 and 1.0.
    pub fn quality(&self) -> f32 {
        f32::from(self.quality) / 1000.0
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == WILDCARD
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD || self.subtype.starts_with("*+")
    }

    /// Whether this range includes `other`; not symmetric (`text/*` includes
    /// `text/html`, not the other way around).
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.type_ != other.type_ {
            return false;
        }
        if self.subtype == other.subtype || self.subtype == WILDCARD {
            return true;
        }
        // `application/*+json` includes `application/vnd.api+json`
        match (self.subtype.strip_prefix("*+"), other.subtype.rsplit_once('+')) {
            (Some(suffix), Some((_, other_suffix))) => suffix == other_suffix,
            _ => false,
        }
    }

    /// Symmetric variant of [`MediaType::includes`].
    pub fn is_compatible_with(&self, other: &MediaType) -> bool {
        self.includes(other) || other.includes(self)
    }

    fn specificity(&self) -> u8 {
        match (self.is_wildcard_type(), self.is_wildcard_subtype()) {
            (true, _) => 0,
            (false, true) => 1,
            (false, false) => 2,
        }
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.type_ == other.type_ && self.subtype == other.subtype
    }
}

impl Eq for MediaType {}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        if self.quality < 1000 {
            write!(f, ";q={}", self.quality())?;
        }
        Ok(())
    }
}

fn parse_quality(raw: &str) -> Option<u16> {
    let value: f32 = raw.parse().ok()?;
    (0.0..=1.0)
        .contains(&value)
        .then(|| (value * 1000.0).round() as u16)
}

/// Split a header list on commas that are outside quoted strings.
fn split_ranges(header: &str) -> Vec<&str> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (index, c) in header.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                ranges.push(&header[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    ranges.push(&header[start..]);
    ranges
}

/// Parse an `Accept` header into media ranges, most preferred first.
///
/// Ranges with `q=0` are dropped. Ordering is by quality, then specificity,
/// then header position.
pub fn parse_accept(header: &str) -> Result<Vec<MediaType>, NegotiationError> {
    let mut media_types = split_ranges(header)
        .into_iter()
        .map(str::trim)
        .filter(|range| !range.is_empty())
        .map(MediaType::parse)
        .collect::<Result<Vec<_>, _>>()?;

    media_types.retain(|media_type| media_type.quality > 0);
    media_types.sort_by(|a, b| {
        b.quality
            .cmp(&a.quality)
            .then_with(|| b.specificity().cmp(&a.specificity()))
    });
    Ok(media_types)
}

/// Determines which media types a request accepts.
pub trait ContentNegotiationStrategy: Send + Sync {
    fn resolve_media_types(
        &self,
        request: &dyn AuthRequest,
    ) -> Result<Vec<MediaType>, NegotiationError>;
}

/// Reads the `Accept` header; a missing or empty header means `*/*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderContentNegotiationStrategy;

impl ContentNegotiationStrategy for HeaderContentNegotiationStrategy {
    fn resolve_media_types(
        &self,
        request: &dyn AuthRequest,
    ) -> Result<Vec<MediaType>, NegotiationError> {
        match request.header("accept").map(str::trim) {
            None | Some("") => Ok(vec![MediaType::all()]),
            Some(header) => parse_accept(header),
        }
    }
}

/// Always resolves to the same media types, regardless of the request.
#[derive(Debug, Clone)]
pub struct FixedContentNegotiationStrategy(Vec<MediaType>);

impl FixedContentNegotiationStrategy {
    pub fn new(media_types: Vec<MediaType>) -> Self {
        Self(media_types)
    }
}

impl ContentNegotiationStrategy for FixedContentNegotiationStrategy {
    fn resolve_media_types(
        &self,
        _request: &dyn AuthRequest,
    ) -> Result<Vec<MediaType>, NegotiationError> {
        Ok(self.0.clone())
    }
}

/// Matches requests whose negotiated media types are compatible with one of
/// the configured types.
///
/// Requested types included by an ignored type are skipped first, so with
/// `*/*` ignored a client that accepts anything is not treated as preferring
/// JSON. Unparseable `Accept` headers never match.
#[derive(Clone)]
pub struct MediaTypeRequestMatcher {
    strategy: Arc<dyn ContentNegotiationStrategy>,
    matching: Vec<MediaType>,
    ignored: Vec<MediaType>,
    use_equals: bool,
}

impl MediaTypeRequestMatcher {
    pub fn new(strategy: Arc<dyn ContentNegotiationStrategy>, matching: Vec<MediaType>) -> Self {
        Self {
            strategy,
            matching,
            ignored: Vec::new(),
            use_equals: false,
        }
    }

    pub fn with_ignored_media_types(mut self, ignored: Vec<MediaType>) -> Self {
        self.ignored = ignored;
        self
    }

    /// Require exact type/subtype equality instead of compatibility.
    pub fn with_use_equals(mut self, use_equals: bool) -> Self {
        self.use_equals = use_equals;
        self
    }

    fn is_ignored(&self, requested: &MediaType) -> bool {
        self.ignored.iter().any(|ignored| requested.includes(ignored))
    }
}

impl RequestMatcher for MediaTypeRequestMatcher {
    fn matches(&self, request: &dyn AuthRequest) -> bool {
        let requested = match self.strategy.resolve_media_types(request) {
            Ok(requested) => requested,
            Err(_) => return false,
        };

        requested
            .iter()
            .filter(|requested| !self.is_ignored(requested))
            .any(|requested| {
                self.matching.iter().any(|candidate| {
                    if self.use_equals {
                        candidate == requested
                    } else {
                        candidate.is_compatible_with(requested)
                    }
                })
            })
    }
}
