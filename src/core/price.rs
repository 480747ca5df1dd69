use crate::utils::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9.,]*[0-9][0-9.,]*").unwrap());

/// Every group after the first must have exactly three digits (`1,234,567`).
fn is_grouped(integer: &str, separator: char) -> bool {
    let digits = integer.strip_prefix('-').unwrap_or(integer);
    let is_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());

    let mut groups = digits.split(separator);
    let first_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && is_digits(g));

    first_ok && groups.all(|g| g.len() == 3 && is_digits(g))
}

/// Turns scraped price text such as `"£51.77"` or `"1.299,00 €"` into a number.
///
/// The text must hold exactly one number; `"£51.77 £60.00"` is rejected.
/// Separator rules:
/// - a single comma and no dot is a decimal comma (`"12,50"` -> `12.5`)
/// - several commas, or several dots, are thousands separators in 3-digit groups
/// - with both present, whichever comes last is the decimal separator
pub fn normalize_price(raw: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidPrice {
        raw: raw.trim().to_string(),
    };

    let mut numbers = NUMBER.find_iter(raw);
    let (Some(found), None) = (numbers.next(), numbers.next()) else {
        return Err(invalid());
    };

    let mut token = found.as_str().trim_end_matches(|c| c == '.' || c == ',');
    // "Rs.1299": a dot glued to a currency word is not a decimal point
    if raw[..found.start()]
        .chars()
        .next_back()
        .is_some_and(char::is_alphabetic)
    {
        token = token.trim_start_matches(|c| c == '.' || c == ',');
    }

    let commas = token.matches(',').count();
    let dots = token.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) | (0, 1) => token.to_string(),
        (1, 0) => token.replace(',', "."),
        (_, 0) if is_grouped(token, ',') => token.replace(',', ""),
        (0, _) if is_grouped(token, '.') => token.replace('.', ""),
        (0, _) | (_, 0) => return Err(invalid()),
        _ => {
            let (decimal, thousands) = if token.rfind(',') > token.rfind('.') {
                (',', '.')
            } else {
                ('.', ',')
            };
            let (integer, fraction) = token.rsplit_once(decimal).ok_or_else(invalid)?;
            if integer.contains(decimal) || !is_grouped(integer, thousands) {
                return Err(invalid());
            }
            format!("{}.{}", integer.replace(thousands, ""), fraction)
        }
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_symbols_and_whitespace() {
        assert_eq!(normalize_price("£51.77").unwrap(), 51.77);
        assert_eq!(normalize_price("$12.34").unwrap(), 12.34);
        assert_eq!(normalize_price("  € 9.99 \n").unwrap(), 9.99);
        assert_eq!(normalize_price("Price: 120 USD").unwrap(), 120.0);
        assert_eq!(normalize_price("Rs. 1299").unwrap(), 1299.0);
        assert_eq!(normalize_price("Rs.1299").unwrap(), 1299.0);
        assert_eq!(normalize_price("$.99").unwrap(), 0.99);
    }

    #[test]
    fn handles_decimal_comma_and_thousands_separators() {
        assert_eq!(normalize_price("12,50 €").unwrap(), 12.5);
        assert_eq!(normalize_price("$1,299.00").unwrap(), 1299.0);
        assert_eq!(normalize_price("1.299,00 €").unwrap(), 1299.0);
        assert_eq!(normalize_price("1,234,567").unwrap(), 1234567.0);
        assert_eq!(normalize_price("1.234.567").unwrap(), 1234567.0);
        assert_eq!(normalize_price("1.234.567,89").unwrap(), 1234567.89);
    }

    #[test]
    fn rejects_separators_that_are_not_thousands_groups() {
        assert!(normalize_price("51.7760.00").is_err());
        assert!(normalize_price("1.23.456").is_err());
        assert!(normalize_price("12,34,5678").is_err());
        assert!(normalize_price("1,2,3.4.5").is_err());
    }

    #[test]
    fn rejects_text_with_more_than_one_price() {
        assert_eq!(
            normalize_price("£51.77 £60.00"),
            Err(ParseError::InvalidPrice {
                raw: "£51.77 £60.00".to_string()
            })
        );
        assert!(normalize_price("$10.00 $20.00").is_err());
        assert!(normalize_price("12-15 EUR").is_err());
    }

    #[test]
    fn rejects_text_without_a_number() {
        assert_eq!(
            normalize_price("Currently unavailable"),
            Err(ParseError::InvalidPrice {
                raw: "Currently unavailable".to_string()
            })
        );
        assert!(normalize_price("").is_err());
        assert!(normalize_price("£").is_err());
        assert!(normalize_price("--").is_err());
    }
}
