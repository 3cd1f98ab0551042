//! Text generation for the daily reading: the affirmation statement and the
//! full self-confidence pledge.

use chrono::{Datelike, NaiveDate};
use shared::{AffirmationData, PledgeData};

use crate::domain::validation::parse_deadline;

const SWEDISH_MONTHS: [&str; 12] = [
    "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti", "september", "oktober",
    "november", "december",
];

const NOT_FILLED: &str = "[Ej ifyllt]";

/// Group the whole-krona part of an amount in thousands ("500 000")
///
/// Separators are no-break spaces, as in Swedish number formatting.
pub fn format_amount_sv(amount: &str) -> Option<String> {
    let whole = amount.trim().split(['.', ',']).next()?;
    let value: u64 = whole.parse().ok()?;

    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }
    Some(grouped)
}

/// Long Swedish date, e.g. "15 mars 2026"
pub fn format_date_sv(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        SWEDISH_MONTHS[date.month0() as usize],
        date.year()
    )
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Build the statement read every morning and evening from the wizard answers
pub fn generate_statement(data: &AffirmationData) -> String {
    let amount = format_amount_sv(&data.amount).unwrap_or_else(|| "[belopp]".to_string());
    let deadline = match parse_deadline(&data.deadline) {
        Ok(Some(date)) => format_date_sv(date),
        _ => "[datum]".to_string(),
    };
    let exchange = or_placeholder(&data.exchange, "[vad du ger]");
    let plan = or_placeholder(&data.plan, "[din plan]");

    format!(
        "Jag är fast besluten att samla {amount} kronor senast den {deadline}.

I utbyte mot dessa pengar kommer jag att ge:
{exchange}

Min plan för att uppnå detta är:
{plan}

Jag tror helhjärtat på att jag kommer att uppnå detta mål. Jag ser pengarna framför mig. Jag känner dem i mina händer. De väntar på mig, och jag kommer att ta emot dem."
    )
}

/// Build the full five-principle pledge text
pub fn generate_full_pledge(data: &PledgeData) -> String {
    let p1 = or_placeholder(&data.principle_1, NOT_FILLED);
    let p2 = or_placeholder(&data.principle_2, NOT_FILLED);
    let p3 = or_placeholder(&data.principle_3, NOT_FILLED);
    let p4 = or_placeholder(&data.principle_4, NOT_FILLED);

    format!(
        "MIN PLAN FÖR SJÄLVFÖRTROENDE

1. JAG HAR KRAFTEN ATT LYCKAS
Jag vet att jag har vad som krävs för att nå mina mål. Därför lovar jag mig själv att agera uthålligt och målmedvetet varje dag.

Mitt mål: {p1}

2. MINA TANKAR BLIR MIN VERKLIGHET
Jag förstår att det jag fokuserar på, växer. Därför ska jag varje dag lägga 30 minuter på att visualisera den person jag vill vara.

Min visualisering: {p2}

3. MINA ÖNSKEMÅL SKAPAR MÖJLIGHETER
Jag vet att om jag håller fast vid en idé tillräckligt länge, kommer mitt undermedvetna att hitta vägar att förverkliga den.

Min intention: {p3}

4. JAG HAR ETT TYDLIGT MÅL
Jag har skrivit ner exakt vad jag vill uppnå i livet.

Mitt huvudmål: {p4}

5. MIN FRAMGÅNG BYGGER PÅ INTEGRITET
Jag inser att hållbar framgång bara kan byggas på ärlighet och rättvisa.

Jag skriver under på detta och förbinder mig att leva efter dessa principer."
    )
}
