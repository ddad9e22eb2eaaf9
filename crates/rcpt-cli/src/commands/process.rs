//! Process command - extract a record from a single receipt.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use rcpt_core::models::config::RcptConfig;
use rcpt_core::models::receipt::{
    ExtractionMode, LenientReceipt, PartialFields, ProcessedReceipt, ReceiptItem, Retailer,
};
use rcpt_core::receipt::rules::format_won;
use rcpt_core::receipt::{ReceiptParser, RuleBasedReceiptParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.txt OCR dump, .json upload payload, or - for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Return whatever fields resolve instead of failing
    #[arg(long)]
    lenient: bool,

    /// Print the normalized OCR text
    #[arg(long)]
    show_normalized: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
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

/// A record from either extraction mode.
#[derive(Serialize)]
#[serde(untagged)]
pub enum Extracted {
    Strict(ProcessedReceipt),
    Lenient(LenientReceipt),
}

impl Extracted {
    pub fn retailer(&self) -> Retailer {
        match self {
            Extracted::Strict(receipt) => receipt.retailer,
            Extracted::Lenient(receipt) => receipt.layout,
        }
    }

    /// Header fields, with strict records widened to optional.
    pub fn fields(&self) -> PartialFields {
        match self {
            Extracted::Strict(receipt) => {
                let fields = receipt.fields.clone();
                PartialFields {
                    store_name: Some(fields.store_name),
                    date: Some(fields.date),
                    total_amount: Some(fields.total_amount),
                    vat_amount: Some(fields.vat_amount),
                    payment_method: Some(fields.payment_method),
                    card_number: Some(fields.card_number),
                }
            }
            Extracted::Lenient(receipt) => receipt.fields.clone(),
        }
    }

    pub fn items(&self) -> &[ReceiptItem] {
        match self {
            Extracted::Strict(receipt) => &receipt.items,
            Extracted::Lenient(receipt) => &receipt.items,
        }
    }

    pub fn processed_text(&self) -> &str {
        match self {
            Extracted::Strict(receipt) => &receipt.processed_text,
            Extracted::Lenient(receipt) => &receipt.processed_text,
        }
    }

    /// Consistency issues for strict records, unresolved fields for lenient ones.
    pub fn issues(&self) -> Vec<String> {
        match self {
            Extracted::Strict(receipt) => receipt.validate(),
            Extracted::Lenient(receipt) => receipt
                .fields
                .missing()
                .into_iter()
                .map(|field| format!("Could not extract {}", field))
                .collect(),
        }
    }
}

/// Run the configured extraction mode, or lenient when forced.
pub fn extract(
    parser: &RuleBasedReceiptParser,
    text: &str,
    lenient: bool,
    config: &RcptConfig,
) -> anyhow::Result<Extracted> {
    if lenient || config.extraction.mode == ExtractionMode::Lenient {
        Ok(Extracted::Lenient(parser.parse_lenient(text)))
    } else {
        Ok(Extracted::Strict(parser.parse(text)?))
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let parser = RuleBasedReceiptParser::from_config(&config)?;

    info!("Processing input: {}", args.input.display());

    let text = super::read_ocr_text(&args.input)?;
    if text.trim().is_empty() {
        anyhow::bail!("No OCR text in {}", args.input.display());
    }

    let extracted = extract(&parser, &text, args.lenient, &config)?;

    // Validate if requested
    if args.validate {
        let issues = extracted.issues();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_receipt(&extracted, args.format)?;

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

    if args.show_normalized {
        eprintln!();
        eprintln!("{}", style("Normalized text:").blue());
        eprintln!("{}", extracted.processed_text());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_receipt(extracted: &Extracted, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(extracted)?),
        OutputFormat::Csv => format_csv(extracted),
        OutputFormat::Text => Ok(format_text(extracted)),
    }
}

fn format_csv(extracted: &Extracted) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let fields = extracted.fields();

    let store_name = fields.store_name.unwrap_or_default();
    let date = fields.date.map(|d| d.to_string()).unwrap_or_default();
    let total = fields.total_amount.map(|a| a.to_string()).unwrap_or_default();
    let vat = fields.vat_amount.map(|a| a.to_string()).unwrap_or_default();
    let payment = fields
        .payment_method
        .map(|p| p.to_string())
        .unwrap_or_default();
    let card = fields.card_number.unwrap_or_default();

    wtr.write_record([
        "store_name",
        "date",
        "total_amount",
        "vat_amount",
        "payment_method",
        "card_number",
        "item_name",
        "price",
        "quantity",
        "subtotal",
    ])?;

    for item in extracted.items() {
        wtr.write_record([
            store_name.as_str(),
            date.as_str(),
            total.as_str(),
            vat.as_str(),
            payment.as_str(),
            card.as_str(),
            item.name.as_str(),
            &item.price.to_string(),
            &item.quantity.to_string(),
            &item.subtotal().to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extracted: &Extracted) -> String {
    let fields = extracted.fields();
    let unknown = || "?".to_string();
    let mut output = String::new();

    output.push_str(&format!(
        "Store: {} ({})\n",
        fields.store_name.clone().unwrap_or_else(unknown),
        extracted.retailer()
    ));
    output.push_str(&format!(
        "Date: {}\n",
        fields.date.map(|d| d.to_string()).unwrap_or_else(unknown)
    ));
    output.push('\n');

    output.push_str("Items:\n");
    for item in extracted.items() {
        output.push_str(&format!(
            "  {} {} x {} = {}\n",
            item.name,
            format_won(item.price),
            item.quantity,
            format_won(item.subtotal())
        ));
    }
    output.push('\n');

    let amount = |a: Option<u64>| a.map(format_won).unwrap_or_else(unknown);
    output.push_str("Summary:\n");
    output.push_str(&format!("  Total: {} KRW\n", amount(fields.total_amount)));
    output.push_str(&format!("  VAT:   {} KRW\n", amount(fields.vat_amount)));

    if let Some(method) = fields.payment_method {
        output.push_str(&format!(
            "\nPaid by {} {}\n",
            method,
            fields.card_number.as_deref().unwrap_or("")
        ));
    }

    output
}
