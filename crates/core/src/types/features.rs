//! Ordered string lists stored as JSON text.
//!
//! The backend keeps product features and extra gallery images in text
//! columns holding a JSON array. [`JsonStringList`] is the typed view of such
//! a column: it serializes to the encoded string, not to a JSON array, so the
//! wire format matches what the backend expects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors from encoding or decoding a [`JsonStringList`].
#[derive(thiserror::Error, Debug)]
pub enum FeaturesError {
    /// The stored text is not a JSON array of strings.
    #[error("invalid list encoding: {0}")]
    Decode(#[source] serde_json::Error),
    /// The list could not be encoded.
    #[error("failed to encode list: {0}")]
    Encode(#[source] serde_json::Error),
}

/// An ordered list of strings persisted as a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonStringList(Vec<String>);

/// Product selling points, shown in listing order.
pub type Features = JsonStringList;

/// Extra gallery image URLs for a product.
pub type ImageUrls = JsonStringList;

impl JsonStringList {
    /// Create a list from items, keeping their order.
    #[must_use]
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }

    /// Encode as the JSON text stored by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturesError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, FeaturesError> {
        serde_json::to_string(&self.0).map_err(FeaturesError::Encode)
    }

    /// Decode the JSON text stored by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturesError::Decode`] if `raw` is not a JSON array of strings.
    pub fn decode(raw: &str) -> Result<Self, FeaturesError> {
        serde_json::from_str(raw).map(Self).map_err(FeaturesError::Decode)
    }

    /// Build a list from multi-line form input, one item per line.
    ///
    /// Lines are trimmed and blank lines dropped.
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        Self(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Render the list back into multi-line form input.
    #[must_use]
    pub fn to_lines(&self) -> String {
        self.0.join("\n")
    }

    /// `None` for an empty list, so empty lists are sent as `null`.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.0.is_empty() { None } else { Some(self) }
    }

    /// The items in order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.0
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for JsonStringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl From<JsonStringList> for Vec<String> {
    fn from(list: JsonStringList) -> Self {
        list.0
    }
}

impl Serialize for JsonStringList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for JsonStringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(serde::de::Error::custom)
    }
}

/// Read an optional list column, treating text that is not a JSON array as
/// absent.
///
/// Use with `#[serde(default, deserialize_with = "features::lenient")]` on
/// records the backend returns in bulk, so one malformed column does not fail
/// a whole listing. [`JsonStringList::decode`] stays strict.
///
/// # Errors
///
/// Fails only if the value is neither a string nor `null`.
pub fn lenient<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<JsonStringList>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match JsonStringList::decode(&raw) {
        Ok(list) => Ok(Some(list)),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed list column");
            Ok(None)
        }
    }
}
