use std::fmt::{self, Write};

use crate::models::{AmdPhase, DataPacket, TradeSetup};
use crate::parser::ParsedResponse;

const RULE: &str = "════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────";

/// Plain-text terminal dashboard. Sections whose data is absent are skipped.
pub fn render_dashboard(parsed: &ParsedResponse) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dashboard(&mut out, parsed);
    out
}

fn write_dashboard(out: &mut String, parsed: &ParsedResponse) -> fmt::Result {
    if let Some(packet) = &parsed.data_packet {
        render_packet(out, packet)?;
    }

    let badges = parsed.concepts.labels();
    if !badges.is_empty() {
        writeln!(out, "CONCEPTS: {}", badges.join(" | "))?;
        writeln!(out, "{}", THIN_RULE)?;
    }

    let narrative = parsed.narrative.trim();
    if !narrative.is_empty() {
        writeln!(out, "{}", narrative)?;
    }

    if let Some(setup) = &parsed.trade_setup {
        writeln!(out)?;
        render_setup(out, setup)?;
    }

    Ok(())
}

fn phase_tag(phase: AmdPhase) -> &'static str {
    match phase {
        AmdPhase::Accumulation => "[A]",
        AmdPhase::Manipulation => "[M]",
        AmdPhase::Distribution => "[D]",
        AmdPhase::Retracement => "[R]",
        AmdPhase::Unknown => "[?]",
    }
}

pub fn render_packet(out: &mut String, packet: &DataPacket) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  SESSION (NY TIME)   {}", packet.session)?;
    writeln!(
        out,
        "  ALGO PHASE (AMD)    {} {}",
        phase_tag(packet.amd_phase()),
        packet.phase
    )?;
    writeln!(
        out,
        "  KILLZONE            {}{}",
        packet.killzone,
        if packet.killzone_active() { "  *" } else { "" }
    )?;
    writeln!(out, "{}", THIN_RULE)?;

    if packet.levels.is_empty() {
        writeln!(out, "  No verified institutional levels detected in visual scan.")?;
    } else {
        writeln!(out, "  KEY INSTITUTIONAL REFERENCE POINTS")?;
        for level in &packet.levels {
            writeln!(
                out,
                "  {:<8} {:<28} {}",
                level.level_type, level.label, level.price
            )?;
        }
    }
    writeln!(out, "{}", RULE)
}

pub fn render_setup(out: &mut String, setup: &TradeSetup) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "  {} {}{}    confidence {}%{}",
        setup.direction,
        setup.asset,
        setup
            .timeframe
            .as_deref()
            .map(|tf| format!(" ({})", tf))
            .unwrap_or_default(),
        setup.confidence_score,
        setup
            .status
            .as_deref()
            .map(|s| format!("    [{}]", s))
            .unwrap_or_default()
    )?;
    if let Some(id) = &setup.id {
        writeln!(out, "  ID {}", id)?;
    }
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out, "  ENTRY ZONE   {}", setup.entry_zone)?;
    writeln!(out, "  STOP LOSS    {}", setup.stop_loss)?;
    writeln!(out, "  R:R          {}", setup.risk_reward)?;
    if let Some(size) = &setup.position_size {
        writeln!(out, "  SIZE         {}", size)?;
    }
    if let Some(risk) = &setup.risk_per_trade {
        writeln!(out, "  RISK/TRADE   {}", risk)?;
    }

    for (i, tp) in setup.tp_levels.iter().enumerate() {
        writeln!(
            out,
            "  TP{}          {:<12} {:>5}  {}",
            i + 1,
            tp.level,
            tp.allocation,
            tp.target
        )?;
    }

    if !setup.confluences.is_empty() {
        writeln!(out, "  CONFLUENCES  {}", setup.confluences.join(", "))?;
    }
    if let Some(plan) = &setup.execution_plan {
        writeln!(out, "  EXECUTION PLAN")?;
        for step in plan {
            writeln!(out, "    - {}", step)?;
        }
    }
    for warning in &setup.risk_warnings {
        writeln!(out, "  ! {}", warning)?;
    }
    writeln!(out, "{}", RULE)
}
