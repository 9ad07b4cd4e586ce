use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit0, digit1},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("invalid measurement: {0:?}")]
    Parse(String),
    #[error("unknown unit: {0:?} (expected px, cm, mm or pt)")]
    UnknownUnit(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// The length units conversions are defined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Cm,
    Mm,
    Pt,
}

impl LengthUnit {
    /// Units per inch-equivalent.
    pub fn per_inch(self) -> f64 {
        match self {
            LengthUnit::Px => 90.0,
            LengthUnit::Cm => 2.54,
            LengthUnit::Mm => 25.4,
            LengthUnit::Pt => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::Pt => "pt",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "px" => Ok(LengthUnit::Px),
            "cm" => Ok(LengthUnit::Cm),
            "mm" => Ok(LengthUnit::Mm),
            "pt" => Ok(LengthUnit::Pt),
            _ => Err(UnitError::UnknownUnit(s.to_string())),
        }
    }
}

/// A length with its unit tag, e.g. `2.5cm`.
///
/// The tag is kept as parsed; any lowercase token is accepted, and only
/// conversion requires a known unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub value: f64,
    pub unit: String,
}

impl Unit {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Unit {
            value,
            unit: unit.as_str().to_string(),
        }
    }

    /// A bare number is taken as `px`; otherwise the string must start with
    /// digits, an optional fraction and a lowercase unit token. Anything after
    /// the unit token is ignored.
    pub fn parse(measure: &str) -> Result<Self, UnitError> {
        if let Ok(value) = measure.trim().parse::<f64>() {
            return Ok(Unit::new(value, LengthUnit::Px));
        }
        match measurement(measure) {
            Ok((_, (num, unit))) => {
                let value = num
                    .parse::<f64>()
                    .map_err(|_| UnitError::Parse(measure.to_string()))?;
                Ok(Unit {
                    value,
                    unit: unit.to_string(),
                })
            }
            Err(_) => Err(UnitError::Parse(measure.to_string())),
        }
    }

    /// Convert to `unit`, going through the per-inch ratios of both tags.
    pub fn to(&self, unit: &str) -> Result<Unit, UnitError> {
        let from: LengthUnit = self.unit.parse()?;
        let target: LengthUnit = unit.parse()?;
        Ok(Unit::new(
            self.value / from.per_inch() * target.per_inch(),
            target,
        ))
    }

    pub fn scaled_by(&self, factor: f64) -> Unit {
        Unit {
            value: self.value * factor,
            unit: self.unit.clone(),
        }
    }

    pub fn divided_by(&self, divisor: f64) -> Result<Unit, UnitError> {
        if divisor == 0.0 {
            return Err(UnitError::DivisionByZero);
        }
        Ok(self.scaled_by(1.0 / divisor))
    }

    /// Like `Display`, but the magnitude is rounded to `precision` decimals
    /// and trailing zeros are dropped.
    pub fn fmt_precision(&self, precision: usize) -> String {
        let s = format!("{:.*}", precision, self.value);
        let s = if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.')
        } else {
            s.as_str()
        };
        format!("{}{}", s, self.unit)
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit0))))(input)
}

fn unit_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_lowercase())(input)
}

fn measurement(input: &str) -> IResult<&str, (&str, &str)> {
    tuple((number, unit_token))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn bare_number_defaults_to_px() -> Result<(), UnitError> {
        let u = Unit::parse("5")?;
        assert_eq!(u.unit, "px");
        assert_eq!(u.value, 5.0);
        assert_eq!(Unit::parse("-1.5e2")?.value, -150.0);
        Ok(())
    }

    #[test]
    fn number_with_unit() -> Result<(), UnitError> {
        let u: Unit = "2.5cm".parse()?;
        assert_eq!(u, Unit::new(2.5, LengthUnit::Cm));
        assert_eq!(Unit::parse("3.mm")?.value, 3.0);
        // Unknown tags parse, conversion is where they fail.
        assert_eq!(Unit::parse("4em")?.unit, "em");
        Ok(())
    }

    #[test]
    fn malformed_measurements_fail() {
        for bad in ["", "cm", ".5cm", "-2cm", "2CM", "2 cm", " 2cm", "2.5.1mm"] {
            assert_eq!(
                Unit::parse(bad),
                Err(UnitError::Parse(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn trailing_text_after_unit_is_ignored() -> Result<(), UnitError> {
        assert_eq!(Unit::parse("2cm3")?, Unit::new(2.0, LengthUnit::Cm));
        assert_eq!(Unit::parse("2cm ")?, Unit::new(2.0, LengthUnit::Cm));
        assert_eq!(Unit::parse("2.5cm;")?, Unit::new(2.5, LengthUnit::Cm));
        assert_eq!(Unit::parse("12ptX")?.unit, "pt");
        Ok(())
    }

    #[test]
    fn converts_between_units() -> Result<(), UnitError> {
        assert!(close(Unit::parse("1pt")?.to("px")?.value, 90.0));
        assert!(close(Unit::parse("2.54cm")?.to("mm")?.value, 25.4));
        let px = Unit::parse("90")?.to("cm")?;
        assert_eq!(px.unit, "cm");
        assert!(close(px.value, 2.54));
        Ok(())
    }

    #[test]
    fn conversion_round_trips() -> Result<(), UnitError> {
        let units = ["px", "cm", "mm", "pt"];
        for m in [0.1, 1.0, 2.5, 17.0, 1234.5678] {
            for u1 in units {
                for u2 in units {
                    let u = Unit::parse(&format!("{}{}", m, u1))?;
                    let back = u.to(u2)?.to(u1)?;
                    assert!(close(back.value, m), "{m}{u1} -> {u2} -> {}", back);
                    assert_eq!(back.unit, u1);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn unknown_units_fail_conversion() -> Result<(), UnitError> {
        let em = Unit::parse("4em")?;
        assert_eq!(em.to("px"), Err(UnitError::UnknownUnit("em".to_string())));
        let cm = Unit::parse("4cm")?;
        assert_eq!(cm.to("in"), Err(UnitError::UnknownUnit("in".to_string())));
        Ok(())
    }

    #[test]
    fn scaling() -> Result<(), UnitError> {
        let u = Unit::parse("2cm")?.scaled_by(3.0);
        assert_eq!(u, Unit::new(6.0, LengthUnit::Cm));
        let d = Unit::parse("6cm")?.divided_by(3.0)?;
        assert_eq!(d.value, 2.0);
        assert_eq!(d.unit, "cm");
        assert_eq!(
            Unit::parse("6cm")?.divided_by(0.0),
            Err(UnitError::DivisionByZero)
        );
        Ok(())
    }

    #[test]
    fn display_and_precision() -> Result<(), UnitError> {
        assert_eq!(Unit::parse("2.5cm")?.to_string(), "2.5cm");
        assert_eq!(Unit::parse("5")?.to_string(), "5px");
        let mm = Unit::parse("1pt")?.to("mm")?;
        assert_eq!(mm.fmt_precision(2), "25.4mm");
        assert_eq!(Unit::parse("1cm")?.to("pt")?.fmt_precision(4), "0.3937pt");
        assert_eq!(Unit::new(3.0, LengthUnit::Px).fmt_precision(0), "3px");
        Ok(())
    }
}
