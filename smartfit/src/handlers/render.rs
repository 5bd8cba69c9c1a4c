//! Plain-text rendering of command results

use smartfit::history::HistoryList;
use smartfit::news::NewsResults;
use smartfit::{PredictionHistoryEntry, StyleRecommendationResult};
use smartfit_common::section;

fn percent(probability: f64) -> String {
    format!("{:.2}%", probability)
}

pub fn result_text(result: &StyleRecommendationResult) -> String {
    let mut out = section(
        "Seasonal color",
        &[
            ("label", result.seasonal_color_label.clone()),
            ("confidence", percent(result.seasonal_probability)),
            ("description", result.seasonal_description.clone()),
        ],
    );
    out.push_str(&section(
        "Skin tone",
        &[
            ("label", result.skin_tone_label.clone()),
            ("color", result.skin_tone_color().to_string()),
            ("confidence", percent(result.skin_tone_probability)),
        ],
    ));

    if !result.color_palette.is_empty() {
        out.push_str(&section(
            "Palette",
            &[
                ("dark", result.color_palette.dark_colors().join(" ")),
                ("light", result.color_palette.light_colors().join(" ")),
            ],
        ));
    }

    if !result.outfit_recommendations.is_empty() {
        let rows: Vec<(&str, String)> = result
            .outfit_recommendations
            .iter()
            .map(|o| (o.item.as_str(), o.description.clone()))
            .collect();
        out.push_str(&section("Outfits", &rows));
    }

    for product in &result.amazon_products {
        let mut rows = vec![
            ("asin", product.asin.clone()),
            (
                "price",
                product
                    .price
                    .clone()
                    .unwrap_or_else(|| "unavailable".to_string()),
            ),
            ("delivery", product.delivery_info.clone()),
        ];
        if product.is_prime {
            rows.push(("prime", "yes".to_string()));
        }
        if let Some(url) = product.purchase_url() {
            rows.push(("buy", url.to_string()));
        }
        out.push_str(&section(&product.title, &rows));
    }
    out
}

pub fn entry_text(entry: &PredictionHistoryEntry) -> String {
    let mut out = section(
        "Prediction",
        &[
            ("key", entry.prediction_key.clone()),
            ("user", entry.user_uid.clone()),
            ("taken", entry.result.timestamp.clone()),
            ("clothing", entry.result.clothing_type.clone()),
        ],
    );
    out.push_str(&result_text(&entry.result));
    out
}

pub fn history_text(list: &HistoryList) -> String {
    if list.is_empty() {
        return format!("No predictions for {}\n", list.user_id());
    }
    let rows: Vec<(&str, String)> = list
        .entries()
        .iter()
        .map(|e| {
            (
                e.prediction_key.as_str(),
                format!(
                    "{}  {}  {}",
                    e.result.timestamp, e.result.seasonal_color_label, e.result.clothing_type
                ),
            )
        })
        .collect();
    section(&format!("History for {}", list.user_id()), &rows)
}

pub fn news_text(results: &NewsResults) -> String {
    if results.articles.is_empty() {
        return format!("No articles for \"{}\"\n", results.query);
    }
    let mut out = String::new();
    for article in &results.articles {
        let mut rows = Vec::new();
        if let Some(name) = article.source.as_ref().and_then(|s| s.name.clone()) {
            rows.push(("source", name));
        }
        if let Some(published) = &article.published_at {
            rows.push(("published", published.clone()));
        }
        rows.push(("url", article.url.clone()));
        out.push_str(&section(&article.title, &rows));
    }
    out
}
