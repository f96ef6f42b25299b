//! Indicator listing command implementation.

use anyhow::{Result, bail};
use laggard_signals::IndicatorStage;
use laggard_signals::registry::{get_feature_info, indicators_by_stage};

/// List the indicators and features, optionally one stage only.
pub(crate) fn list_indicators(stage: Option<String>, verbose: bool) -> Result<()> {
    let stages = [
        (IndicatorStage::Daily, "Daily"),
        (IndicatorStage::Monthly, "Monthly"),
        (IndicatorStage::Lagged, "Lagged"),
    ];

    if let Some(filter) = &stage
        && !stages.iter().any(|(_, name)| name.eq_ignore_ascii_case(filter))
    {
        bail!("Unknown stage '{filter}' (expected daily, monthly or lagged)");
    }

    for (stage_kind, name) in stages {
        if let Some(filter) = &stage
            && !name.eq_ignore_ascii_case(filter)
        {
            continue;
        }

        println!("{name}: {}", stage_kind.description());
        println!("{}", "-".repeat(60));
        for info in indicators_by_stage(stage_kind) {
            if verbose {
                println!("  {:12} - {} (warm-up: {})", info.name, info.description, info.warmup);
            } else {
                println!("  {}", info.name);
            }
        }
        println!();
    }
    Ok(())
}

/// Describe one lagged feature.
pub(crate) fn describe(name: &str) -> Result<()> {
    let Some(info) = get_feature_info(name) else {
        bail!("Unknown lagged feature '{name}'");
    };
    println!("{} ({:?})", info.name, info.stage);
    println!("  {}", info.description);
    println!("  warm-up: {}", info.warmup);
    Ok(())
}
