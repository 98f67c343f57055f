//! NUMERIC / DECIMAL / FLOAT wrapper.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::driver::Value;
use crate::error::{DialectError, Result};

use super::{render_plain_literal, TypeWrapper};

/// Numeric wrapper.
///
/// Driver numbers are converted to arbitrary-precision decimals. When a
/// return scale is set, the value is first formatted to exactly that many
/// fractional digits. Float columns convert back to `f64` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabendNumeric {
    pub return_scale: Option<u32>,
    pub as_decimal: bool,
}

impl DatabendNumeric {
    pub fn new(return_scale: Option<u32>) -> Self {
        Self {
            return_scale,
            as_decimal: true,
        }
    }

    pub fn float() -> Self {
        Self {
            return_scale: None,
            as_decimal: false,
        }
    }

    fn to_decimal(&self, value: &Value) -> Result<Option<Decimal>> {
        let decimal = match (value, self.return_scale) {
            (Value::Null, _) => return Ok(None),
            (Value::Float(f), Some(scale)) => parse_decimal(&format!("{:.*}", scale as usize, f))?,
            (Value::Float(f), None) => Decimal::try_from(*f).map_err(|e| {
                DialectError::invalid_value(format!("could not convert {} to decimal: {}", f, e))
            })?,
            (Value::Int(n), _) => Decimal::from(*n),
            (Value::UInt(n), _) => Decimal::from(*n),
            (Value::Decimal(d), _) => *d,
            (Value::String(s), _) => parse_decimal(s.trim())?,
            (other, _) => {
                return Err(DialectError::invalid_value(format!(
                    "could not parse {:?} as a numeric value",
                    other
                )))
            }
        };

        Ok(Some(match self.return_scale {
            Some(scale) => {
                let mut d = decimal.round_dp(scale);
                d.rescale(scale);
                d
            }
            None => decimal,
        }))
    }
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| DialectError::invalid_value(format!("could not parse '{}' as a decimal value", s)))
}

impl TypeWrapper for DatabendNumeric {
    fn process_result(&self, value: Value) -> Result<Value> {
        let Some(decimal) = self.to_decimal(&value)? else {
            return Ok(Value::Null);
        };
        if self.as_decimal {
            return Ok(Value::Decimal(decimal));
        }
        decimal.to_f64().map(Value::Float).ok_or_else(|| {
            DialectError::invalid_value(format!("could not convert {} to float", decimal))
        })
    }

    fn render_literal(&self, value: &Value) -> Result<Option<String>> {
        render_plain_literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_to_decimal_with_scale() {
        let n = DatabendNumeric::new(Some(2));
        assert_eq!(
            n.process_result(Value::Float(3.14159)).unwrap(),
            Value::Decimal(Decimal::from_str("3.14").unwrap())
        );
    }

    #[test]
    fn test_scale_pads_fraction() {
        let n = DatabendNumeric::new(Some(3));
        match n.process_result(Value::Int(5)).unwrap() {
            Value::Decimal(d) => assert_eq!(d.to_string(), "5.000"),
            other => panic!("expected decimal, got {:?}", other),
        }
    }

    #[test]
    fn test_string_to_decimal() {
        let n = DatabendNumeric::new(None);
        assert_eq!(
            n.process_result(Value::String("12.50".into())).unwrap(),
            Value::Decimal(Decimal::from_str("12.50").unwrap())
        );
        assert!(n.process_result(Value::String("abc".into())).is_err());
    }

    #[test]
    fn test_null_passthrough() {
        let n = DatabendNumeric::new(Some(2));
        assert_eq!(n.process_result(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_float_column_stays_float() {
        let n = DatabendNumeric::float();
        assert_eq!(n.process_result(Value::Float(1.5)).unwrap(), Value::Float(1.5));
    }
}
