//! Plain-text rendering of reports and decks for the terminal.
//!
//! Bars use a Unicode block with an ASCII `#` fallback on Windows consoles
//! that are unlikely to render it.
//!
//! ```rust
//! use draftsim_cli::formatters::bar;
//!
//! assert!(bar(2.0, 4.0, 8).chars().count() == 4);
//! assert_eq!(bar(0.0, 4.0, 8), "");
//! ```

use std::fmt::Write as _;

use draftsim_engine::builder::Deck;
use draftsim_engine::cards::Color;
use draftsim_engine::metrics::{ColorCounts, DeckMetrics};
use draftsim_engine::stats::AggregateReport;

pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

/// A bar of at most `width` cells proportional to `value / max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round() as usize;
    let glyph = if supports_unicode() { "█" } else { "#" };
    glyph.repeat(cells.min(width))
}

/// One row per color, then the colorless and multicolor totals.
fn write_colors(s: &mut String, colors: &ColorCounts) {
    for color in Color::ALL {
        let _ = writeln!(s, "  {}  {:>6}", color.symbol(), colors.get(color));
    }
    let _ = writeln!(
        s,
        "  colorless {}, multicolor {}",
        colors.colorless, colors.multicolor
    );
}

pub struct SummaryHeader<'a> {
    pub set_code: &'a str,
    pub base_seed: u64,
    pub mode: &'a str,
    pub retried: usize,
}

/// Terminal summary of a simulation run.
pub fn format_summary(header: &SummaryHeader<'_>, report: &AggregateReport) -> String {
    let mut s = String::new();
    let _ = writeln!(
        s,
        "Simulated {} decks from {} (seed {}, mode {})",
        report.trials,
        header.set_code.to_ascii_uppercase(),
        header.base_seed,
        header.mode
    );
    if header.retried > 0 {
        let _ = writeln!(s, "Retried trials: {}", header.retried);
    }

    let _ = writeln!(s, "\nTop cards:");
    for (i, card) in report.top_cards.iter().enumerate() {
        let _ = writeln!(
            s,
            "  {:>2}. {:<32} {:>5}/{} decks",
            i + 1,
            card.name,
            card.decks,
            report.trials
        );
    }

    let _ = writeln!(s, "\nColor distribution (spells):");
    write_colors(&mut s, &report.color_distribution);

    let _ = writeln!(s, "\nAverage curve per deck:");
    let curve = report.average_curve();
    let max = curve.values().cloned().fold(0.0, f64::max);
    for (mv, avg) in &curve {
        let _ = writeln!(s, "  {:>2}  {:>5.2}  {}", mv, avg, bar(*avg, max, 30));
    }

    let _ = writeln!(s, "\nArchetypes:");
    for (tag, n) in &report.archetype_distribution {
        let _ = writeln!(s, "  {:<7} {:>5}", tag, n);
    }

    if let Some(tables) = &report.archetypes {
        let _ = writeln!(s, "\nBy archetype:");
        let _ = writeln!(
            s,
            "  {:<7} {:<12} {:>6} {:>7} {:>9}  top card",
            "tag", "name", "decks", "avg mv", "creatures"
        );
        for (tag, summary) in tables {
            let top = summary
                .top_cards
                .first()
                .map(|c| c.name.as_str())
                .unwrap_or("-");
            let _ = writeln!(
                s,
                "  {:<7} {:<12} {:>6} {:>7.2} {:>9.1}  {}",
                tag,
                summary.name,
                summary.trials,
                summary.average_mana_value,
                summary.average_creatures,
                top
            );
        }
    }
    s
}

/// Decklist grouped by mana value, followed by the land split.
pub fn format_deck(deck: &Deck<'_>, metrics: &DeckMetrics) -> String {
    let mut s = String::new();
    let _ = writeln!(
        s,
        "Archetype: {} ({})",
        deck.archetype.tag(),
        deck.archetype.name()
    );
    let _ = writeln!(
        s,
        "Spells: {}  Creatures: {}  Average mana value: {:.2}",
        deck.spells.len(),
        metrics.creature_count,
        metrics.average_mana_value
    );

    let mut spells = deck.spells.clone();
    spells.sort_by(|a, b| a.mana_value.cmp(&b.mana_value).then(a.name.cmp(&b.name)));
    let mut current = None;
    for card in spells {
        if current != Some(card.mana_value) {
            current = Some(card.mana_value);
            let _ = writeln!(s, "\n[{}]", card.mana_value);
        }
        let _ = writeln!(
            s,
            "  {:<32} {:<5} {:<9} {}",
            card.name,
            card.color_identity.to_string(),
            card.rarity.as_str(),
            card.type_line
        );
    }

    let _ = writeln!(s, "\nLands:");
    for (color, n) in deck.lands.iter() {
        let _ = writeln!(s, "  {:>2} {}", n, color.basic_land_name());
    }
    s
}
