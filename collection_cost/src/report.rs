//! Plain-text rendering of pricing results

use crate::cheap_finder::CheapFind;
use crate::database::CacheRow;
use crate::pricing::{CardOutcome, CardStatus};
use crate::service::{PriceReport, ReportSource};

fn cents(amount: i64) -> f64 {
    amount as f64 / 100.0
}

pub fn format_price_report(report: &PriceReport, details: bool) -> String {
    let query = &report.query;
    let result = &report.result;
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} cards{}{}{}{}\n",
        query.rarity,
        query.domain,
        query
            .expansion
            .as_deref()
            .map(|e| format!(" from {e}"))
            .unwrap_or_default(),
        query
            .language
            .as_deref()
            .map(|l| format!(" [{l}]"))
            .unwrap_or_default(),
        if query.foil { " (foil)" } else { "" },
        if query.zero_only { " (Zero only)" } else { "" },
    ));
    output.push_str(&format!(
        "Target: {} cards, {} {} each\n",
        result.cards_matched,
        query.quantity,
        if query.quantity == 1 { "copy" } else { "copies" }
    ));
    output.push_str(&format!(
        "Cards priced: {}/{}\n",
        result.cards_priced, result.cards_matched
    ));
    output.push_str(&format!(
        "Items found: {}/{}\n",
        result.items_fulfilled, result.items_needed
    ));
    output.push_str(&format!(
        "Total Cost: {:.2} {}\n",
        result.total_cost(),
        result.currency
    ));

    match (report.source, report.computed_at.as_deref()) {
        (ReportSource::Cache, Some(at)) => output.push_str(&format!("(cached result from {at})\n")),
        (ReportSource::Fresh, Some(at)) => output.push_str(&format!("(computed {at})\n")),
        _ => output.push_str("(not cached)\n"),
    }

    if details && !result.cards.is_empty() {
        output.push('\n');
        for card in &result.cards {
            output.push_str(&format_card_line(card));
        }
    }

    output
}

fn format_card_line(card: &CardOutcome) -> String {
    let currency = card.currency.as_deref().unwrap_or("");
    match card.status {
        CardStatus::Priced => {
            let mut line = format!(
                "    {}/{} x {} - {:.2} {}\n",
                card.fulfilled,
                card.needed,
                card.name,
                cents(card.cost_cents),
                currency
            );
            if card.fulfilled < card.needed {
                line.push_str(&format!(
                    "        WARNING: Only {} of {} copies available!\n",
                    card.fulfilled, card.needed
                ));
            }
            line
        }
        CardStatus::UnknownExpansion => format!("    {} - unknown expansion\n", card.name),
        CardStatus::Unresolved => format!("    {} - no matching blueprint\n", card.name),
        CardStatus::NoListings => format!("    {} - no listings\n", card.name),
        CardStatus::FetchFailed => format!("    {} - request failed\n", card.name),
    }
}

/// Dashboard-style table of the newest stored result per category
pub fn format_latest_rows(rows: &[CacheRow]) -> String {
    if rows.is_empty() {
        return "No cached results.\n".to_string();
    }

    let mut output = format!(
        "{:<12} {:<10} {:>10} {:>9} {:>8}  {}\n",
        "Rarity", "Domain", "Total", "Items", "Cards", "Computed"
    );
    for row in rows {
        output.push_str(&format!(
            "{:<12} {:<10} {:>6.2} {:<3} {:>4}/{:<4} {:>3}/{:<4}  {}\n",
            row.rarity,
            row.domain,
            row.total_cost,
            row.currency,
            row.items_found,
            row.items_needed,
            row.cards_priced,
            row.total_cards,
            row.computed_at
        ));
    }
    output
}

pub fn format_cheap_finds(finds: &[CheapFind], language: Option<&str>) -> String {
    if finds.is_empty() {
        return "No cheap listings found.\n".to_string();
    }

    let language = language.unwrap_or("Any Lang");
    let mut output = String::new();
    for find in finds {
        output.push_str(&format!("\n[CHEAP FIND] {} ({})\n", find.name, language));
        output.push_str(&format!(
            "  Cheapest: {:.2} {}\n",
            cents(find.gap.cheapest_cents),
            find.currency
        ));
        output.push_str(&format!(
            "  Floor Avg (Next {}): {:.2} {}\n",
            find.gap.pool_size,
            find.gap.floor_avg_cents / 100.0,
            find.currency
        ));
        output.push_str(&format!(
            "  Discount vs Floor: {:.1}%\n",
            find.gap.discount_percent()
        ));
        output.push_str(&format!("  Link: {}\n", find.link));
    }
    output
}
