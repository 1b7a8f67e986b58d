//! Extract command - find the price in a single page.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use dealdrip_core::models::config::{DealdripConfig, OutputFormat};
use dealdrip_core::{
    extract_structured_price, select_price, FieldExtractor, PriceBounds, PriceCandidate,
    PriceExtractor, SelectionPolicy,
};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (HTML, JSON or plain text), or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, csv or text (default: output.format from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    #[command(flatten)]
    overrides: ExtractionOverrides,
}

/// Command line overrides of the extraction configuration.
#[derive(Args, Clone, Default)]
pub struct ExtractionOverrides {
    /// Lowest plausible price
    #[arg(long)]
    low: Option<f64>,

    /// Highest plausible price
    #[arg(long)]
    high: Option<f64>,

    /// Candidate selection policy (first-match, most-frequent, heuristic)
    #[arg(short, long)]
    policy: Option<SelectionPolicy>,

    /// Skip the JSON-LD structured data pass
    #[arg(long)]
    no_structured: bool,
}

/// Where the selected price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSource {
    StructuredData,
    Rules,
}

impl PriceSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceSource::StructuredData => "structured-data",
            PriceSource::Rules => "rules",
        }
    }
}

/// Result of extracting the price from one page.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub input: String,
    pub price: Option<f64>,
    pub source: Option<PriceSource>,
    pub policy: SelectionPolicy,
    pub bounds: PriceBounds,
    pub candidates: Vec<PriceCandidate>,
    pub extracted_at: DateTime<Utc>,
}

/// Everything needed to turn page text into a report.
pub struct ExtractionSettings {
    pub extractor: PriceExtractor,
    pub policy: SelectionPolicy,
    pub use_structured_data: bool,
}

impl ExtractionSettings {
    pub fn resolve(config: &DealdripConfig, overrides: &ExtractionOverrides) -> anyhow::Result<Self> {
        let mut config = config.clone();
        if let Some(low) = overrides.low {
            config.extraction.bound_low = low;
        }
        if let Some(high) = overrides.high {
            config.extraction.bound_high = high;
        }
        if let Some(policy) = overrides.policy {
            config.extraction.policy = policy;
        }
        if overrides.no_structured {
            config.extraction.use_structured_data = false;
        }

        config.validate()?;

        Ok(Self {
            extractor: config.extractor()?,
            policy: config.extraction.policy,
            use_structured_data: config.extraction.use_structured_data,
        })
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let settings = ExtractionSettings::resolve(&config, &args.overrides)?;
    let format = args.format.unwrap_or(config.output.format);

    let text = read_input(&args.input).await?;
    info!("Processing {} ({} bytes)", args.input, text.len());

    let report = build_report(&args.input, &text, &settings);
    debug!("Extraction took {:?}", start.elapsed());

    // Format output
    let output = format_report(&report, format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if report.price.is_none() {
        eprintln!("{} No confident price found", style("⚠").yellow());
    }

    Ok(())
}

/// Read a page from a file, or from stdin when `input` is "-".
pub async fn read_input(input: &str) -> anyhow::Result<String> {
    let bytes = if input == "-" {
        let mut buffer = Vec::new();
        tokio::io::stdin().read_to_end(&mut buffer).await?;
        buffer
    } else {
        let path = PathBuf::from(input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        tokio::fs::read(&path).await?
    };

    // Scraped pages are not always valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run structured data lookup, then the rules, and pick a price.
pub fn build_report(input: &str, text: &str, settings: &ExtractionSettings) -> PriceReport {
    let bounds = settings.extractor.bounds();

    let structured = if settings.use_structured_data {
        extract_structured_price(text).filter(|price| bounds.contains(*price))
    } else {
        None
    };

    let candidates = settings.extractor.extract_all(text);

    let (price, source) = match structured {
        Some(price) => (Some(price), Some(PriceSource::StructuredData)),
        None => {
            let price = select_price(&candidates, settings.policy);
            (price, price.map(|_| PriceSource::Rules))
        }
    };

    match price {
        Some(price) => info!(
            "Selected price {:.2} from {} candidates ({:?})",
            price,
            candidates.len(),
            source
        ),
        None => info!("No price found in {}", input),
    }

    PriceReport {
        input: input.to_string(),
        price,
        source,
        policy: settings.policy,
        bounds,
        candidates,
        extracted_at: Utc::now(),
    }
}

pub fn format_report(report: &PriceReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            Ok(serde_json::to_string_pretty(report)?)
        }
        OutputFormat::Csv => {
            format_csv(report)
        }
        OutputFormat::Text => {
            Ok(format_text(report))
        }
    }
}

fn format_csv(report: &PriceReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "input",
        "rule_index",
        "category",
        "matched_text",
        "offset",
        "value",
        "selected",
    ])?;

    // Write data
    for candidate in &report.candidates {
        let selected = report.source == Some(PriceSource::Rules)
            && report.price == Some(candidate.value);
        wtr.write_record([
            report.input.as_str(),
            &candidate.rule_index.to_string(),
            candidate.category.as_str(),
            &candidate.matched_text,
            &candidate.offset.to_string(),
            &candidate.value.to_string(),
            if selected { "true" } else { "false" },
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &PriceReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Input: {}\n", report.input));
    match (report.price, report.source) {
        (Some(price), Some(PriceSource::StructuredData)) => {
            output.push_str(&format!("Price: {:.2} (structured data)\n", price));
        }
        (Some(price), _) => {
            output.push_str(&format!("Price: {:.2} ({})\n", price, report.policy));
        }
        (None, _) => output.push_str("Price: none\n"),
    }
    output.push_str(&format!(
        "Bounds: [{}, {}]\n",
        report.bounds.low, report.bounds.high
    ));

    if !report.candidates.is_empty() {
        output.push('\n');
        output.push_str("Candidates:\n");
        for candidate in &report.candidates {
            output.push_str(&format!(
                "  #{:<3} {:<16} {:>12} -> {:.2} @ {}\n",
                candidate.rule_index,
                candidate.category.as_str(),
                candidate.matched_text,
                candidate.value,
                candidate.offset
            ));
        }
    }

    output
}
