use serde::{Deserialize, Serialize};
use std::fmt;

/// Length units a host document can display values in.
///
/// Every length in the crate is stored in centimetres; units only matter when
/// a value is turned into an expression string for the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "in")]
    Inch,
}

impl LengthUnit {
    pub const ALL: &'static [LengthUnit] = &[
        LengthUnit::Millimeter,
        LengthUnit::Centimeter,
        LengthUnit::Inch,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Inch => "in",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.symbol() == symbol)
    }

    /// Centimetres per one of this unit.
    pub fn cm_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.1,
            LengthUnit::Centimeter => 1.0,
            LengthUnit::Inch => 2.54,
        }
    }

    pub fn from_cm(self, cm: f64) -> f64 {
        cm / self.cm_per_unit()
    }

    pub fn to_cm(self, value: f64) -> f64 {
        value * self.cm_per_unit()
    }

    /// `"<value> <unit>"` with up to six decimals, trailing zeros trimmed.
    pub fn format_value(self, cm: f64) -> String {
        format!("{} {}", trim_decimals(self.from_cm(cm), 6), self.symbol())
    }

    /// Expression for a length rounded to three decimals in this unit.
    pub fn normalized_expression(self, cm: f64) -> String {
        format!("{} {}", trim_decimals(self.from_cm(cm), 3), self.symbol())
    }

    /// Whether [`normalized_expression`](Self::normalized_expression) writes
    /// this length as zero.
    pub fn rounds_to_zero(self, cm: f64) -> bool {
        trim_decimals(self.from_cm(cm), 3) == "0"
    }

    /// Evaluate a product expression such as `"6 * 5.08 mm"` to centimetres.
    ///
    /// Factors without a unit are plain numbers; when no factor carries a
    /// unit the product is read in `self`. More than one unit is an area, not
    /// a length, and yields `None`.
    pub fn evaluate(self, expression: &str) -> Option<f64> {
        let mut product = 1.0;
        let mut unit = None;
        for factor in expression.split('*') {
            let factor = factor.trim();
            let split = factor
                .find(|c: char| c.is_ascii_alphabetic())
                .unwrap_or(factor.len());
            let (number, symbol) = factor.split_at(split);
            product *= number.trim().parse::<f64>().ok()?;
            let symbol = symbol.trim();
            if !symbol.is_empty() {
                if unit.is_some() {
                    return None;
                }
                unit = Some(Self::from_symbol(symbol)?);
            }
        }
        product.is_finite().then(|| unit.unwrap_or(self).to_cm(product))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    match text {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
