//! Variant listing command implementation.

use anyhow::Result;
use laggard_select::{Bound, Variant};

/// List the strategy presets.
pub(crate) fn list_variants(verbose: bool) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Strategy Variants                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for variant in Variant::ALL {
        let marker = if variant == Variant::default() { " (default)" } else { "" };
        println!("  {:12} - {}{}", variant.name(), variant.description(), marker);

        if verbose {
            let config = variant.config();
            for rule in &config.rules {
                let side = match rule.exclude {
                    Bound::AtOrBelow => "<=",
                    Bound::Below => "<",
                    Bound::AtOrAbove => ">=",
                    Bound::Above => ">",
                };
                println!("      exclude {} {} q{}", rule.field, side, rule.quantile);
            }
            if config.trend_filter {
                println!("      exclude last_close <= sma");
            }
            if config.downtrend_filter {
                println!("      exclude roc_short <= 0");
            }
            println!("      rank by {} ({:?}), cap {}", config.rank_by, config.ranking, config.cap);
            println!();
        }
    }

    if !verbose {
        println!("\nUse --verbose for the full rule sets.\n");
    }
    Ok(())
}
