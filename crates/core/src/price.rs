//! Price formatting in the Czech (`cs-CZ`) number convention.
//!
//! Matches what a browser produces for `amount.toLocaleString('cs-CZ')`:
//! digits grouped by three with a no-break space (U+00A0), a decimal comma,
//! and at most three fraction digits with trailing zeros dropped.

/// Group separator used by the `cs-CZ` locale.
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// Decimal separator used by the `cs-CZ` locale.
pub const DECIMAL_SEPARATOR: char = ',';

/// Currency suffix appended to every displayed price.
pub const CURRENCY_SUFFIX: &str = "Kč";

const MAX_FRACTION_DIGITS: usize = 3;

/// Enough decimals to expose the exact binary value at the rounding digit.
const EXACT_DIGITS: usize = 30;

/// Format a bare amount, e.g. `53990.0` → `"53 990"`.
///
/// Rounds half away from zero on the exact value of the double, so
/// `1.0005` (stored as `1.000499…`) formats as `1`. Non-finite input
/// formats as `0`.
pub fn format_amount(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (integer, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(MAX_FRACTION_DIGITS))
        .collect();
    if fraction.as_bytes().get(MAX_FRACTION_DIGITS).is_some_and(|&d| d >= b'5') {
        round_up(&mut digits);
    }
    let fraction_digits = digits.split_off(digits.len() - MAX_FRACTION_DIGITS);

    let mut out = String::new();
    if value < 0.0 && digits.iter().chain(&fraction_digits).any(|&d| d != b'0') {
        out.push('-');
    }
    out.push_str(&group_digits(&digits));

    let fraction = String::from_utf8_lossy(&fraction_digits);
    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(fraction);
    }

    out
}

/// Format an amount with the currency suffix, e.g. `"53 990 Kč"`.
pub fn format_czk(value: f64) -> String {
    format!("{} {}", format_amount(value), CURRENCY_SUFFIX)
}

/// Add one unit in the last place of a string of ASCII digits.
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn group_digits(digits: &[u8]) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * 2);

    for (i, &d) in digits.iter().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(char::from(d));
    }

    out
}
