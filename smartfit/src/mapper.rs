//! Response mapper
//!
//! Decodes prediction service payloads field by field. The upstream schema
//! changed across versions, so a missing or mistyped field degrades to a
//! placeholder instead of rejecting the document. Only a body that is not a
//! JSON object at all is treated as malformed.

use serde_json::{Map, Value};

use crate::error::{StyleError, StyleResult};
use crate::types::{
    OutfitRecommendation, PaletteShape, PredictionHistoryEntry, Product,
    StyleRecommendationResult, MISSING_ASIN, NOT_AVAILABLE,
};

/// Decode a `style_recommendation` response body
pub fn decode(raw: &str) -> StyleResult<StyleRecommendationResult> {
    let value = parse_document(raw)?;
    let object = expect_object(&value, "style recommendation")?;
    Ok(decode_result(object, "style recommendation"))
}

/// Decode a `get_prediction_history_list` response body
///
/// Returned most-recent-first: the service iterates its map oldest-first.
pub fn decode_history_list(raw: &str) -> StyleResult<Vec<PredictionHistoryEntry>> {
    let value = parse_document(raw)?;
    let object = expect_object(&value, "history list")?;

    let data = match object.get("prediction_data") {
        None | Some(Value::Null) => {
            tracing::debug!("history list has no prediction_data, treating as empty");
            return Ok(Vec::new());
        }
        Some(Value::Object(data)) => data,
        Some(other) => {
            return Err(StyleError::MalformedResponse(format!(
                "prediction_data must be an object, got {}",
                json_type(other)
            )))
        }
    };

    let mut entries: Vec<PredictionHistoryEntry> = data
        .iter()
        .filter_map(|(key, entry)| match entry {
            Value::Object(fields) => Some(decode_entry(key, fields)),
            other => {
                tracing::warn!(
                    prediction_key = %key,
                    kind = json_type(other),
                    "skipping history entry that is not an object"
                );
                None
            }
        })
        .collect();

    entries.reverse();
    Ok(entries)
}

/// Decode a `get_prediction_history_detail` response body
pub fn decode_history_detail(raw: &str, prediction_key: &str) -> StyleResult<PredictionHistoryEntry> {
    let value = parse_document(raw)?;
    let object = expect_object(&value, "history detail")?;

    match object.get("prediction_data") {
        Some(Value::Object(fields)) => Ok(decode_entry(prediction_key, fields)),
        Some(other) => Err(StyleError::MalformedResponse(format!(
            "prediction_data must be an object, got {}",
            json_type(other)
        ))),
        None => Err(StyleError::MalformedResponse(
            "history detail is missing prediction_data".to_string(),
        )),
    }
}

/// Resolve the polymorphic `color_palette` field
///
/// Structured only when it is an object carrying both arrays; anything else
/// is an empty palette. Non-string swatches are dropped.
pub fn decode_palette(value: Option<&Value>) -> PaletteShape {
    let Some(Value::Object(palette)) = value else {
        return PaletteShape::Empty;
    };

    match (palette.get("dark_colors"), palette.get("light_colors")) {
        (Some(Value::Array(dark)), Some(Value::Array(light))) => PaletteShape::Structured {
            dark_colors: string_items(dark),
            light_colors: string_items(light),
        },
        _ => PaletteShape::Empty,
    }
}

fn parse_document(raw: &str) -> StyleResult<Value> {
    if raw.trim().is_empty() {
        return Err(StyleError::MalformedResponse("empty response body".to_string()));
    }
    Ok(serde_json::from_str(raw)?)
}

fn expect_object<'a>(value: &'a Value, what: &str) -> StyleResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        StyleError::MalformedResponse(format!(
            "{} must be a JSON object, got {}",
            what,
            json_type(value)
        ))
    })
}

fn decode_entry(prediction_key: &str, fields: &Map<String, Value>) -> PredictionHistoryEntry {
    let mut reader = FieldReader::new(fields);
    let user_uid = reader.string("user_uid");
    let result = decode_result_with(&mut reader);
    reader.report("history entry");

    PredictionHistoryEntry {
        prediction_key: prediction_key.to_string(),
        user_uid,
        result,
    }
}

fn decode_result(fields: &Map<String, Value>, context: &str) -> StyleRecommendationResult {
    let mut reader = FieldReader::new(fields);
    let result = decode_result_with(&mut reader);
    reader.report(context);
    result
}

fn decode_result_with(reader: &mut FieldReader<'_>) -> StyleRecommendationResult {
    StyleRecommendationResult {
        seasonal_color_label: reader.string("seasonal_color_label"),
        seasonal_description: reader.string("seasonal_description"),
        seasonal_probability: reader.number("seasonal_probability"),
        skin_tone_label: reader.string("skin_tone_label"),
        skin_tone_hex: reader.string("skin_tone_hex"),
        skin_tone_probability: reader.number("skin_tone_probability"),
        timestamp: reader.string("timestamp"),
        clothing_type: reader.string("clothing_type"),
        color_palette: decode_palette(reader.raw("color_palette")),
        outfit_recommendations: reader
            .objects("outfit_recommendations")
            .map(|item| {
                let mut item = FieldReader::new(item);
                OutfitRecommendation {
                    item: item.string("item"),
                    description: item.string("description"),
                }
            })
            .collect(),
        amazon_products: reader
            .objects("amazon_products")
            .map(decode_product)
            .collect(),
    }
}

fn decode_product(fields: &Map<String, Value>) -> Product {
    let mut product = FieldReader::new(fields);
    Product {
        asin: product.string_or("asin", MISSING_ASIN),
        title: product.string("title"),
        description: product.string("description"),
        delivery_info: product.string("delivery"),
        sales_volume: product.string("sales_volume"),
        is_prime: product.boolean("is_prime"),
        picture_url: product.string("pic"),
        detail_url: product.string("detail_url"),
        price: product.optional_text("price"),
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads typed fields out of one JSON object, remembering what was missing
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    missing: Vec<&'static str>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            missing: Vec::new(),
        }
    }

    fn raw(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    fn string(&mut self, name: &'static str) -> String {
        self.string_or(name, NOT_AVAILABLE)
    }

    fn string_or(&mut self, name: &'static str, fallback: &str) -> String {
        match self.fields.get(name) {
            Some(Value::String(s)) => s.clone(),
            _ => {
                self.missing.push(name);
                fallback.to_string()
            }
        }
    }

    /// Nullable text: strings pass through, numbers are rendered, rest is `None`
    fn optional_text(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn number(&mut self, name: &'static str) -> f64 {
        let parsed = match self.fields.get(name) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.unwrap_or_else(|| {
            self.missing.push(name);
            0.0
        })
    }

    fn boolean(&mut self, name: &'static str) -> bool {
        match self.fields.get(name) {
            Some(Value::Bool(b)) => *b,
            _ => {
                self.missing.push(name);
                false
            }
        }
    }

    /// Object items of an array field; absent or non-array means none
    fn objects(&mut self, name: &'static str) -> impl Iterator<Item = &'a Map<String, Value>> {
        let items: &'a [Value] = match self.fields.get(name) {
            Some(Value::Array(items)) => items,
            _ => {
                self.missing.push(name);
                &[]
            }
        };
        items.iter().filter_map(Value::as_object)
    }

    /// Log the degradation once per document
    fn report(&self, context: &str) {
        if !self.missing.is_empty() {
            tracing::warn!(
                context,
                missing = ?self.missing,
                "partial data accepted"
            );
        }
    }
}
