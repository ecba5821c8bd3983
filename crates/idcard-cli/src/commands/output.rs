//! Rendering extracted fields as JSON, text or CSV.

use idcard_core::{FieldKey, IdCardFields};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render fields, with the mean confidence appended when given.
pub fn format_fields(
    fields: &IdCardFields,
    confidence: Option<f32>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(fields, confidence),
        OutputFormat::Csv => format_csv(fields, confidence),
        OutputFormat::Text => Ok(format_text(fields, confidence)),
    }
}

fn format_json(fields: &IdCardFields, confidence: Option<f32>) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(fields)?;
    if let (Some(confidence), Some(obj)) = (confidence, value.as_object_mut()) {
        obj.insert("confidence".to_string(), serde_json::json!(confidence));
    }
    Ok(serde_json::to_string(&value)?)
}

fn format_csv(fields: &IdCardFields, confidence: Option<f32>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = FieldKey::ALL.iter().map(|k| k.as_str()).collect();
    let mut row: Vec<String> = FieldKey::ALL
        .iter()
        .map(|k| fields.get(*k).unwrap_or_default().to_string())
        .collect();

    if let Some(confidence) = confidence {
        header.push("confidence");
        row.push(format!("{:.4}", confidence));
    }

    wtr.write_record(&header)?;
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &IdCardFields, confidence: Option<f32>) -> String {
    let mut output = String::new();

    for (key, value) in fields.iter() {
        output.push_str(&format!("{} ({}): {}\n", key.label(), key, value));
    }
    if fields.is_empty() {
        output.push_str("(no fields recognized)\n");
    }
    if let Some(confidence) = confidence {
        output.push_str(&format!("confidence: {:.1}%\n", confidence * 100.0));
    }

    output
}
