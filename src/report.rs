// =============================================================================
// Console Report — box-drawing panels over the analysis results
// =============================================================================
//
// Pure formatting: every panel renders already-computed data, writing to
// stdout with `println!`. The layout mirrors the classic full-cycle report:
// resonance matrix, data panel, phase bars, scenario paths, suggestions and
// the executive summary.

use chrono::Local;

use crate::analysis::CycleAnalysis;
use crate::signal_strength::strength_stars;

const RULE: &str =
    "─────────────────────────────────────────────────────────────────────";

/// Compact human form of a large number: 1.23K / 4.56M / 7.89B.
pub fn format_compact(num: f64) -> String {
    let abs = num.abs();
    if abs >= 1e9 {
        format!("{:.2}B", num / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", num / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", num / 1e3)
    } else {
        format!("{num:.2}")
    }
}

/// Ten-slot score bar for the phase panel (one block per 10 points).
fn score_bar(score: u32) -> String {
    let filled = (score / 10).min(10) as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&" ".repeat(10 - filled));
    bar
}

fn optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "N/A".to_string(),
    }
}

/// Render the complete report for one analysis run.
pub fn render_full(analysis: &CycleAnalysis) {
    render_matrix(analysis);
    render_data_panel(analysis);
    render_phases(analysis);
    render_paths(analysis);
    render_suggestions(analysis);
    render_summary(analysis);
}

/// Multi-timeframe resonance matrix.
pub fn render_matrix(analysis: &CycleAnalysis) {
    println!("┌{RULE}┐");
    println!("│ Multi-timeframe matrix — {}", analysis.symbol);
    println!("├{RULE}┤");
    println!("│ {:<6} {:<6} {:<7} {:<12} {:<24} {:<10}", "TF", "Trend", "RSI", "MACD", "Key levels", "Strength");

    for ia in &analysis.intervals {
        let snap = &ia.snapshot;
        let levels = match &snap.bollinger {
            Some(b) => format!("S:{:.0} R:{:.0}", b.lower, b.upper),
            None => "N/A".to_string(),
        };
        println!(
            "│ {:<6} {:<6} {:<7} {:<12} {:<24} {:<10}",
            ia.interval,
            snap.trend.arrow(),
            optional(snap.rsi, 1),
            snap.cross_state().to_string(),
            levels,
            strength_stars(ia.strength),
        );
    }

    println!("├{RULE}┤");
    println!("│ Resonance: {}", analysis.resonance);
    println!("└{RULE}┘");
}

/// Price / derivatives / indicator data panel for the primary interval.
pub fn render_data_panel(analysis: &CycleAnalysis) {
    let primary = analysis.primary_interval();
    let snap = &primary.snapshot;
    let ctx = &analysis.context;
    let now = Local::now().format("%Y-%m-%d %H:%M");

    println!("┌{RULE}┐");
    println!(
        "│ {} perpetual │ {} │ {}",
        analysis.symbol, primary.interval, now
    );
    println!("├{RULE}┤");
    println!(
        "│ Price: {:.2} │ 24h: {}% │ Volume: {}",
        snap.close,
        optional(snap.change_24_pct, 2),
        format_compact(snap.volume),
    );
    println!("├{RULE}┤");
    let lsr = match ctx.long_short_ratio {
        Some(r) => format!("{r:.4}"),
        None => "N/A".to_string(),
    };
    println!(
        "│ OI: {} │ Funding: {:.4}% │ Top-trader L/S: {}",
        format_compact(ctx.open_interest),
        ctx.funding_rate * 100.0,
        lsr,
    );
    println!("├{RULE}┤");
    let macd_line = match &snap.macd {
        Some(m) => format!("{:.2}/{:.2} [{}]", m.dif, m.dea, m.cross),
        None => "N/A".to_string(),
    };
    println!(
        "│ RSI(14): {} [{}] │ MACD: {} │ ATR(14): {}",
        optional(snap.rsi, 1),
        snap.rsi_status,
        macd_line,
        optional(snap.atr, 2),
    );
    match &snap.bollinger {
        Some(b) => println!(
            "│ Bollinger: {:.0} / {:.0} / {:.0} │ Bandwidth: {:.2}%",
            b.upper, b.mid, b.lower, b.bandwidth_pct
        ),
        None => println!("│ Bollinger: N/A"),
    }
    println!(
        "│ EMA: 20={} │ 50={} │ 200={}",
        optional(snap.ema20, 0),
        optional(snap.ema50, 0),
        optional(snap.ema200, 0),
    );
    println!("│ Trend: {} {}", snap.trend.arrow(), snap.trend);
    println!("└{RULE}┘");
}

/// Phase score bars and the selected phase.
pub fn render_phases(analysis: &CycleAnalysis) {
    println!("┌{RULE}┐");
    println!("│ Market phase");
    println!("├{RULE}┤");
    for (phase, score) in analysis.phase.scores.iter() {
        println!("│ {:<13} {} {}", phase.to_string(), score_bar(score), score);
    }
    println!("├{RULE}┤");
    println!(
        "│ ➤ Current read: {} (confidence {})",
        analysis.phase.selected, analysis.phase.confidence
    );
    println!("└{RULE}┘");
}

/// The three scenario paths for the selected phase.
pub fn render_paths(analysis: &CycleAnalysis) {
    println!("┌{RULE}┐");
    println!("│ Scenario paths — {}", analysis.phase.selected);
    println!("├{RULE}┤");

    for path in &analysis.paths {
        println!(
            "│ {} ({}%, {})",
            path.name, path.probability_pct, path.direction
        );
        let route = path
            .waypoints
            .iter()
            .map(|w| format!("{:.0} ({})", w.level, w.label))
            .collect::<Vec<_>>()
            .join(" → ");
        println!("│   Path: {route}");
        println!("│   Logic: {}", path.rationale);
        println!("│   Squeezes: {}", path.trap_targets);
        println!("│   Confirms at: {:.0}", path.confirmation_level);
        println!("│   Invalidated at: {:.0}", path.invalidation_level);
        println!("│");
    }
    println!("└{RULE}┘");
}

/// Volatility guidance, directional setups and key levels.
pub fn render_suggestions(analysis: &CycleAnalysis) {
    let sugg = &analysis.suggestions;

    println!("┌{RULE}┐");
    println!("│ Suggestions");
    println!("├{RULE}┤");
    println!(
        "│ Environment: {} │ Position: {} │ Leverage: {}",
        sugg.vol_env.label(),
        sugg.vol_env.position_pct(),
        sugg.vol_env.leverage(),
    );
    println!("├{RULE}┤");

    if let Some(long) = &sugg.long {
        println!(
            "│ Long: entry {:.0} | stop {:.0} | T1 {:.0} | T2 {:.0} | R:R {:.1}:1",
            long.entry, long.stop, long.target1, long.target2, long.reward_risk
        );
    }
    if let Some(short) = &sugg.short {
        println!(
            "│ Short: entry {:.0} | stop {:.0} | T1 {:.0} | T2 {:.0} | R:R {:.1}:1",
            short.entry, short.stop, short.target1, short.target2, short.reward_risk
        );
    }
    if sugg.long.is_none() && sugg.short.is_none() {
        println!("│ No directional setup — stand aside until the range resolves");
    }

    println!("├{RULE}┤");
    println!(
        "│ Bull confirmation: {:.0} │ Bear confirmation: {:.0}",
        sugg.levels.bull_confirmation, sugg.levels.bear_confirmation
    );
    println!(
        "│ Stop alerts: {:.0} / {:.0}",
        sugg.levels.stop_alert_low, sugg.levels.stop_alert_high
    );
    println!("└{RULE}┘");
}

/// One-screen executive summary.
pub fn render_summary(analysis: &CycleAnalysis) {
    let summary = &analysis.suggestions.summary;

    println!("┌{RULE}┐");
    println!("│ Executive summary");
    println!("├{RULE}┤");
    println!(
        "│ Core range: {:.0} – {:.0}",
        summary.range_low, summary.range_high
    );
    println!(
        "│ Phase: {} (confidence {})",
        summary.phase, summary.confidence
    );
    println!("│ Thesis: {}", summary.thesis);
    println!("│ Trapped cohort: {}", summary.trapped_cohort);
    println!("│");
    println!("│ 💬 {}", summary.one_liner);
    println!("└{RULE}┘");
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_number_bands() {
        assert_eq!(format_compact(12.345), "12.35");
        assert_eq!(format_compact(1_234.0), "1.23K");
        assert_eq!(format_compact(5_600_000.0), "5.60M");
        assert_eq!(format_compact(7_890_000_000.0), "7.89B");
        assert_eq!(format_compact(-2_500.0), "-2.50K");
    }

    #[test]
    fn score_bar_scales_by_tens() {
        assert_eq!(score_bar(0), " ".repeat(10));
        assert_eq!(score_bar(40), format!("{}{}", "█".repeat(4), " ".repeat(6)));
        assert_eq!(score_bar(70), format!("{}{}", "█".repeat(7), " ".repeat(3)));
        // Scores beyond the scale saturate instead of overflowing.
        assert_eq!(score_bar(400), "█".repeat(10));
    }

    #[test]
    fn optional_formats_absence() {
        assert_eq!(optional(None, 2), "N/A");
        assert_eq!(optional(Some(1.5), 2), "1.50");
    }
}
