use latlonbox::{CentroidMode, Layout};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    BBox,
    Points,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::BBox => "bbox",
            Command::Points => "points",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
    #[cfg(feature = "parquet")]
    Parquet,
}

impl OutputFormat {
    pub fn all() -> Vec<&'static str> {
        let mut formats = vec!["text", "csv", "json"];
        if cfg!(feature = "parquet") {
            formats.push("parquet");
        }
        formats
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            #[cfg(feature = "parquet")]
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            #[cfg(feature = "parquet")]
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(format!(
                "Invalid format: {}. Supported formats: {}",
                s,
                OutputFormat::all().join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub headers: bool,
    pub show_inputs: Option<bool>,
    pub show_unmatched: bool,
}

impl OutputOptions {
    pub fn should_show_inputs(&self) -> bool {
        self.show_inputs.unwrap_or(false)
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            headers: true,
            show_inputs: None,
            show_unmatched: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub layouts: Vec<Layout>,
    pub centroid: CentroidMode,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            layouts: Layout::DEFAULT_ORDER.to_vec(),
            centroid: CentroidMode::Arithmetic,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parameters {
    pub output: OutputOptions,
    pub matching: MatchOptions,
    pub summary: bool,
    pub perf: bool,
}

/// Parses a comma-separated layout list such as `A,C` in priority order.
pub fn parse_layouts(value: &str) -> Result<Vec<Layout>, String> {
    let layouts = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse::<Layout>)
        .collect::<Result<Vec<_>, _>>()?;

    if layouts.is_empty() {
        return Err("Option --layouts requires at least one layout".to_string());
    }
    Ok(layouts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.starts_with("Invalid format: xml"));
    }

    #[test]
    fn test_parse_layouts() {
        assert_eq!(parse_layouts("C,a").unwrap(), vec![Layout::C, Layout::A]);
        assert_eq!(parse_layouts("B").unwrap(), vec![Layout::B]);
        assert!(parse_layouts("").is_err());
        assert!(parse_layouts("A,X").is_err());
    }
}
