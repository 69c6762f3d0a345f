use chrono::NaiveDate;

use crate::{
    adapters::signal::ListingSignal,
    application::error::ApplicationError,
    domain::models::search::{
        SearchFilters, SizePreset, ANY_SIZE_TOKEN, CUSTOM_SIZE_TOKEN, SIZE_PRESETS,
    },
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which size option the current min/max corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSelection {
    Any,
    Preset(&'static SizePreset),
    Custom,
}

impl SizeSelection {
    pub fn token(&self) -> &'static str {
        match self {
            SizeSelection::Any => ANY_SIZE_TOKEN,
            SizeSelection::Preset(preset) => preset.token,
            SizeSelection::Custom => CUSTOM_SIZE_TOKEN,
        }
    }
}

/// Decodes a `"min-max"` token; an empty side leaves that bound open.
pub fn decode_size_token(token: &str) -> Result<(Option<u64>, Option<u64>), ApplicationError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok((None, None));
    }

    let (min, max) = token
        .split_once('-')
        .ok_or_else(|| ApplicationError::BadRequest(format!("Invalid size range: {}", token)))?;

    let parse = |side: &str| -> Result<Option<u64>, ApplicationError> {
        let side = side.trim();
        if side.is_empty() {
            return Ok(None);
        }
        side.parse::<u64>()
            .map(Some)
            .map_err(|_| ApplicationError::BadRequest(format!("Invalid size range: {}", token)))
    };

    Ok((parse(min)?, parse(max)?))
}

/// Maps a min/max pair back to its preset. Matching is exact on both bounds.
pub fn size_selection_for(min: Option<u64>, max: Option<u64>) -> SizeSelection {
    if min.is_none() && max.is_none() {
        return SizeSelection::Any;
    }
    SIZE_PRESETS
        .iter()
        .find(|p| p.min_size_bytes == min && p.max_size_bytes == max)
        .map(SizeSelection::Preset)
        .unwrap_or(SizeSelection::Custom)
}

/// Raw search form state, normalized into [`SearchFilters`] by [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct SearchFilterBuilder {
    filename: String,
    mime_type: String,
    min_size_bytes: Option<u64>,
    max_size_bytes: Option<u64>,
    start_date: String,
    end_date: String,
    signal: Option<ListingSignal>,
}

impl SearchFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the channel notified when the form is cleared.
    pub fn with_signal(mut self, signal: ListingSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) -> &mut Self {
        self.filename = filename.into();
        self
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) -> &mut Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn set_min_size(&mut self, min: Option<u64>) -> &mut Self {
        self.min_size_bytes = min;
        self
    }

    pub fn set_max_size(&mut self, max: Option<u64>) -> &mut Self {
        self.max_size_bytes = max;
        self
    }

    pub fn set_start_date(&mut self, date: impl Into<String>) -> &mut Self {
        self.start_date = date.into();
        self
    }

    pub fn set_end_date(&mut self, date: impl Into<String>) -> &mut Self {
        self.end_date = date.into();
        self
    }

    /// Replaces both size bounds with those of a preset token (`""` clears them).
    pub fn apply_size_preset(&mut self, token: &str) -> Result<&mut Self, ApplicationError> {
        let (min, max) = decode_size_token(token)?;
        self.min_size_bytes = min;
        self.max_size_bytes = max;
        Ok(self)
    }

    pub fn size_selection(&self) -> SizeSelection {
        size_selection_for(self.min_size_bytes, self.max_size_bytes)
    }

    /// Canonical filters containing only the criteria that were filled in.
    pub fn build(&self) -> Result<SearchFilters, ApplicationError> {
        let start_date = non_empty(&self.start_date);
        let end_date = non_empty(&self.end_date);

        let start = start_date
            .as_deref()
            .map(|d| parse_date(d, "start"))
            .transpose()?;
        let end = end_date
            .as_deref()
            .map(|d| parse_date(d, "end"))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ApplicationError::BadRequest(
                    "Start date is after end date".to_string(),
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_size_bytes, self.max_size_bytes) {
            if min > max {
                return Err(ApplicationError::BadRequest(
                    "Minimum size exceeds maximum size".to_string(),
                ));
            }
        }

        Ok(SearchFilters {
            filename: non_empty(&self.filename),
            mime_type: non_empty(&self.mime_type),
            min_size_bytes: self.min_size_bytes,
            max_size_bytes: self.max_size_bytes,
            start_date,
            end_date,
        })
    }

    /// Resets every field and tells the listing to leave search mode.
    pub fn clear(&mut self) {
        let signal = self.signal.take();
        *self = Self {
            signal,
            ..Self::default()
        };
        if let Some(signal) = &self.signal {
            signal.search_cleared();
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(value: &str, which: &str) -> Result<NaiveDate, ApplicationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ApplicationError::BadRequest(format!("Invalid {} date: {}", which, value)))
}
