//! Formatação de valores em reais e geração de códigos de demanda.
//!
//! Valores monetários circulam como centavos (`i64`) para evitar erros de
//! arredondamento; o texto `R$ 1.234,56` só existe na borda.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{DemandasError, Result};

static BRL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?\s*(?:R\$\s*)?(\d{1,3}(?:\.\d{3})+|\d+)(?:,(\d{1,2}))?$")
        .expect("invalid BRL pattern")
});

/// Formats centavos as Brazilian reais: `123456` → `R$ 1.234,56`.
pub fn format_brl(centavos: i64) -> String {
    let abs = centavos.unsigned_abs();
    let reais = (abs / 100).to_string();
    let cents = abs % 100;

    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (i, digit) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if centavos < 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents:02}")
}

/// Parses a reais amount into centavos.
///
/// Accepts `R$ 1.234,56`, `1234,56`, `1.234`, `-R$ 10,5`. Thousand
/// separators must be well placed.
///
/// # Errors
/// [`DemandasError::InvalidCurrency`] when the text does not match or the
/// amount overflows.
pub fn parse_brl(text: &str) -> Result<i64> {
    let invalid = || DemandasError::InvalidCurrency(text.to_string());
    let caps = BRL_PATTERN.captures(text.trim()).ok_or_else(invalid)?;

    let negative = caps.get(1).is_some();
    let reais: i64 = caps[2].replace('.', "").parse().map_err(|_| invalid())?;
    let cents: i64 = match caps.get(3) {
        Some(m) if m.as_str().len() == 1 => m.as_str().parse::<i64>().map_err(|_| invalid())? * 10,
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };

    let total = reais
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(invalid)?;
    Ok(if negative { -total } else { total })
}

/// Builds a demand code such as `DEM-2026-0042`.
pub fn demand_code(prefix: &str, year: i32, seq: u64) -> String {
    format!("{prefix}-{year:04}-{seq:04}")
}

/// Splits `PREFIX-YYYY-NNNN` into year and sequence digits.
fn split_code<'c>(prefix: &str, code: &'c str) -> Option<(i32, &'c str)> {
    let rest = code.strip_prefix(prefix)?.strip_prefix('-')?;
    let (year, seq) = rest.split_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, seq))
}

/// Next free code for `today`'s year.
///
/// Codes with another prefix or year, or that do not parse, are ignored; the
/// sequence restarts at 1 every year.
///
/// # Errors
/// [`DemandasError::CodeSequenceExhausted`] when an existing sequence is too
/// large to be followed by a higher one.
pub fn next_demand_code<'a, I>(prefix: &str, existing: I, today: NaiveDate) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let year = today.year();
    let mut highest: u64 = 0;
    for code in existing {
        let Some((code_year, seq)) = split_code(prefix, code) else {
            continue;
        };
        if code_year != year {
            continue;
        }
        let seq: u64 = seq
            .parse()
            .map_err(|_| DemandasError::CodeSequenceExhausted(code.to_string()))?;
        highest = highest.max(seq);
    }

    let next = highest
        .checked_add(1)
        .ok_or_else(|| DemandasError::CodeSequenceExhausted(demand_code(prefix, year, highest)))?;
    Ok(demand_code(prefix, year, next))
}
