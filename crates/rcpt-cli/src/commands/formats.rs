//! Formats command - list the retailer formats in recognition order.

use console::style;

use rcpt_core::receipt::RuleBasedReceiptParser;

pub fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let parser = RuleBasedReceiptParser::from_config(&config)?;

    println!("{}", style("Supported formats (in recognition order):").bold());

    for (i, retailer) in parser.registry().retailers().enumerate() {
        let layout = retailer.layout();
        println!(
            "  {}. {:<8} {}",
            i + 1,
            style(retailer.name()).cyan(),
            layout.store_display.unwrap_or(layout.store)
        );
    }

    println!();
    println!(
        "Lenient mode assumes the {} layout.",
        style(config.extraction.lenient_layout).cyan()
    );

    Ok(())
}
