use std::cell::OnceCell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::error::{WordCloudError, WordCloudResult};
use crate::layout::size::WeightExtent;

/// One entry of a word list.
///
/// JSON accepts the array form `["word", weight, extra...]` (trailing elements become `extra`)
/// and the object form `{"word": .., "weight": .., "attributes": ..}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordItem {
    /// Text to draw.
    #[serde(rename = "word")]
    pub text: String,
    /// Weight mapped onto the size range.
    pub weight: f64,
    /// Opaque caller data carried by the object form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    /// Trailing array elements, handed to the color and font-weight callables.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Value>,
}

impl WordItem {
    /// Item with no attributes or extra data.
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
            attributes: None,
            extra: Vec::new(),
        }
    }

    /// Attach trailing extra data.
    pub fn with_extra(mut self, extra: Vec<Value>) -> Self {
        self.extra = extra;
        self
    }
}

impl<'de> Deserialize<'de> for WordItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr(Vec<Value>),
            Obj {
                word: String,
                weight: f64,
                #[serde(default)]
                attributes: Option<Value>,
                #[serde(default)]
                extra: Vec<Value>,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr(mut items) => {
                if items.len() < 2 {
                    return Err(serde::de::Error::custom(
                        "word array must be [word, weight, extra...]",
                    ));
                }
                let extra = items.split_off(2);
                let text = match &items[0] {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    other => {
                        return Err(serde::de::Error::custom(format!(
                            "word must be a string, got {other}"
                        )));
                    }
                };
                let weight = items[1]
                    .as_f64()
                    .ok_or_else(|| serde::de::Error::custom("word weight must be a number"))?;
                Ok(Self {
                    text,
                    weight,
                    attributes: None,
                    extra,
                })
            }
            Repr::Obj {
                word,
                weight,
                attributes,
                extra,
            } => Ok(Self {
                text: word,
                weight,
                attributes,
                extra,
            }),
        }
    }
}

/// Ordered word list with its weight extent computed once, on first use.
#[derive(Clone, Debug, Default)]
pub struct WordList {
    items: Vec<WordItem>,
    extent: OnceCell<Option<WeightExtent>>,
}

impl WordList {
    /// Wrap `items`, keeping their order.
    pub fn new(items: Vec<WordItem>) -> Self {
        Self {
            items,
            extent: OnceCell::new(),
        }
    }

    /// Convenience constructor from `(text, weight)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(t, w)| WordItem::new(t, w))
                .collect(),
        )
    }

    /// Parse a JSON array of items.
    pub fn from_reader<R: std::io::Read>(r: R) -> WordCloudResult<Self> {
        let items: Vec<WordItem> = serde_json::from_reader(r)
            .map_err(|e| WordCloudError::validation(format!("parse word list JSON: {e}")))?;
        Ok(Self::new(items))
    }

    /// Parse a JSON array of items from a file.
    pub fn from_path(path: impl AsRef<Path>) -> WordCloudResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WordCloudError::validation(format!("open word list JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Items in draw order.
    pub fn items(&self) -> &[WordItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` for an empty list.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(min, max)` weight, or `None` for an empty list.
    pub fn extent(&self) -> Option<WeightExtent> {
        *self
            .extent
            .get_or_init(|| WeightExtent::of(self.items.iter().map(|i| i.weight)))
    }
}

impl From<Vec<WordItem>> for WordList {
    fn from(items: Vec<WordItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/word.rs"]
mod tests;
