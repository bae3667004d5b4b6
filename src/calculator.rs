//! Geometry calculators
//!
//! Each page binds a handful of numeric text inputs to a shape and shows two
//! results formatted to two decimals. Input that does not parse leaves the
//! previously displayed results untouched.

use std::f64::consts::PI;

/// Why a form field could not be used
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("field is empty")]
    Empty,
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Parse the longest numeric prefix of `input`, like the browser's `parseFloat`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12abc"`
/// yields 12.
pub fn parse_number(input: &str) -> Result<f64, InputError> {
    let s = input.trim_start();
    if s.is_empty() {
        return Err(InputError::Empty);
    }

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = &s[end..];
    if rest.starts_with("Infinity") {
        let inf = if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Ok(inf);
    }

    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return Err(InputError::NotANumber(input.to_string()));
    }

    // Exponent only counts when at least one digit follows
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .map_err(|_| InputError::NotANumber(input.to_string()))
}

/// Format a result the way the pages display it
///
/// Two decimals, with exact ties rounded away from zero. `{:.2}` already
/// rounds the exact binary value correctly but breaks ties to even.
pub fn format_result(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // A value halfway between hundredths is exactly an odd number of eighths
    let eighths = value * 8.0;
    if value.abs() < 1.0e12 && eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{:.2}", value)
}

/// Calculator pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    // Flat shapes
    Rectangle,
    Square,
    Triangle,
    Circle,
    // Solids
    Cube,
    Cuboid,
    Cylinder,
    Sphere,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Rectangle,
        Shape::Square,
        Shape::Triangle,
        Shape::Circle,
        Shape::Cube,
        Shape::Cuboid,
        Shape::Cylinder,
        Shape::Sphere,
    ];

    /// Page slug
    pub fn slug(&self) -> &'static str {
        match self {
            Shape::Rectangle => "persegi-panjang",
            Shape::Square => "persegi",
            Shape::Triangle => "segitiga",
            Shape::Circle => "lingkaran",
            Shape::Cube => "kubus",
            Shape::Cuboid => "balok",
            Shape::Cylinder => "tabung",
            Shape::Sphere => "bola",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            Shape::Cube | Shape::Cuboid | Shape::Cylinder | Shape::Sphere
        )
    }

    /// Input field ids, in the order `compute` expects them
    pub fn inputs(&self) -> &'static [&'static str] {
        match self {
            Shape::Rectangle => &["panjang", "lebar"],
            Shape::Square => &["sisi"],
            Shape::Triangle => &["alas", "tinggi", "sisi-a", "sisi-b", "sisi-c"],
            Shape::Circle => &["jari-jari"],
            Shape::Cube => &["sisi"],
            Shape::Cuboid => &["panjang", "lebar", "tinggi"],
            Shape::Cylinder => &["jari-jari", "tinggi"],
            Shape::Sphere => &["jari-jari"],
        }
    }

    /// Output field ids: area/perimeter for flat shapes, volume/surface for solids
    pub fn outputs(&self) -> &'static [&'static str; 2] {
        if self.is_solid() {
            &["volume", "luas-permukaan"]
        } else {
            &["luas", "keliling"]
        }
    }

    /// Evaluate the formulas. `values` must follow `inputs()`.
    pub fn compute(&self, values: &[f64]) -> [f64; 2] {
        let v = |i: usize| values.get(i).copied().unwrap_or(f64::NAN);
        match self {
            Shape::Rectangle => {
                let (p, l) = (v(0), v(1));
                [p * l, 2.0 * (p + l)]
            }
            Shape::Square => {
                let s = v(0);
                [s * s, 4.0 * s]
            }
            Shape::Triangle => {
                let (base, height) = (v(0), v(1));
                [0.5 * base * height, v(2) + v(3) + v(4)]
            }
            Shape::Circle => {
                let r = v(0);
                [PI * r * r, 2.0 * PI * r]
            }
            Shape::Cube => {
                let s = v(0);
                [s * s * s, 6.0 * s * s]
            }
            Shape::Cuboid => {
                let (p, l, t) = (v(0), v(1), v(2));
                [p * l * t, 2.0 * (p * l + p * t + l * t)]
            }
            Shape::Cylinder => {
                let (r, t) = (v(0), v(1));
                [PI * r * r * t, 2.0 * PI * r * (r + t)]
            }
            Shape::Sphere => {
                let r = v(0);
                [4.0 / 3.0 * PI * r * r * r, 4.0 * PI * r * r]
            }
        }
    }
}

/// One calculator page's form state
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    pub shape: Shape,
    inputs: Vec<String>,
    results: [String; 2],
}

impl CalculatorForm {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            inputs: vec![String::new(); shape.inputs().len()],
            results: [String::new(), String::new()],
        }
    }

    /// Update a raw input by field id
    pub fn set_input(&mut self, field: &str, value: &str) -> Result<(), InputError> {
        let index = self
            .shape
            .inputs()
            .iter()
            .position(|id| *id == field)
            .ok_or_else(|| InputError::UnknownField(field.to_string()))?;
        self.inputs[index] = value.to_string();
        Ok(())
    }

    pub fn input(&self, field: &str) -> Option<&str> {
        let index = self.shape.inputs().iter().position(|id| *id == field)?;
        Some(&self.inputs[index])
    }

    /// Recompute the results. On any bad field nothing changes.
    pub fn calculate(&mut self) -> Result<(), InputError> {
        let values = self
            .inputs
            .iter()
            .map(|raw| parse_number(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let [first, second] = self.shape.compute(&values);
        self.results = [format_result(first), format_result(second)];
        Ok(())
    }

    /// Displayed results paired with their output field ids
    pub fn results(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.shape
            .outputs()
            .iter()
            .copied()
            .zip(self.results.iter().map(String::as_str))
    }

    pub fn result(&self, field: &str) -> Option<&str> {
        self.results().find(|(id, _)| *id == field).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rectangle_reference_values() {
        let mut form = CalculatorForm::new(Shape::Rectangle);
        form.set_input("panjang", "5").unwrap();
        form.set_input("lebar", "3").unwrap();
        form.calculate().unwrap();
        assert_eq!(form.result("luas"), Some("15.00"));
        assert_eq!(form.result("keliling"), Some("16.00"));
    }

    #[test]
    fn test_bad_input_keeps_previous_results() {
        let mut form = CalculatorForm::new(Shape::Rectangle);
        form.set_input("panjang", "5").unwrap();
        form.set_input("lebar", "3").unwrap();
        form.calculate().unwrap();

        form.set_input("lebar", "abc").unwrap();
        assert_eq!(
            form.calculate(),
            Err(InputError::NotANumber("abc".to_string()))
        );
        assert_eq!(form.result("luas"), Some("15.00"));
        assert_eq!(form.result("keliling"), Some("16.00"));

        form.set_input("panjang", "").unwrap();
        assert_eq!(form.calculate(), Err(InputError::Empty));
        assert_eq!(form.result("luas"), Some("15.00"));
    }

    #[test]
    fn test_fresh_form_results_are_blank() {
        let mut form = CalculatorForm::new(Shape::Rectangle);
        assert!(form.calculate().is_err());
        assert_eq!(form.result("luas"), Some(""));
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_result(0.125), "0.13");
        assert_eq!(format_result(2.125), "2.13");
        assert_eq!(format_result(0.375), "0.38");
        assert_eq!(format_result(-0.125), "-0.13");
        // Inexact values keep their true rounding
        assert_eq!(format_result(1.005), "1.00");
        assert_eq!(format_result(0.25), "0.25");
        assert_eq!(format_result(f64::INFINITY), "Infinity");

        let mut form = CalculatorForm::new(Shape::Rectangle);
        form.set_input("panjang", "0.5").unwrap();
        form.set_input("lebar", "0.25").unwrap();
        form.calculate().unwrap();
        assert_eq!(form.result("luas"), Some("0.13"));
        assert_eq!(form.result("keliling"), Some("1.50"));

        form.set_input("panjang", "0.0625").unwrap();
        form.set_input("lebar", "1").unwrap();
        form.calculate().unwrap();
        assert_eq!(form.result("luas"), Some("0.06"));
        assert_eq!(form.result("keliling"), Some("2.13"));
    }

    #[test]
    fn test_unknown_field() {
        let mut form = CalculatorForm::new(Shape::Circle);
        assert_eq!(
            form.set_input("panjang", "1"),
            Err(InputError::UnknownField("panjang".to_string()))
        );
        assert_eq!(form.input("jari-jari"), Some(""));
    }

    #[test]
    fn test_parse_number_like_parse_float() {
        assert_eq!(parse_number("5"), Ok(5.0));
        assert_eq!(parse_number("  2.5"), Ok(2.5));
        assert_eq!(parse_number("12abc"), Ok(12.0));
        assert_eq!(parse_number(".5"), Ok(0.5));
        assert_eq!(parse_number("5."), Ok(5.0));
        assert_eq!(parse_number("-3"), Ok(-3.0));
        assert_eq!(parse_number("1e3"), Ok(1000.0));
        // Dangling exponent is ignored
        assert_eq!(parse_number("2e"), Ok(2.0));
        assert_eq!(parse_number("Infinity"), Ok(f64::INFINITY));
        assert_eq!(parse_number("-Infinity"), Ok(f64::NEG_INFINITY));

        assert_eq!(parse_number(""), Err(InputError::Empty));
        assert_eq!(parse_number("   "), Err(InputError::Empty));
        assert!(matches!(parse_number("abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_number("-"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_number("."), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_other_shapes() {
        assert_eq!(Shape::Square.compute(&[4.0]), [16.0, 16.0]);
        assert_eq!(Shape::Triangle.compute(&[6.0, 4.0, 3.0, 4.0, 5.0]), [12.0, 12.0]);
        assert_eq!(Shape::Cube.compute(&[2.0]), [8.0, 24.0]);
        assert_eq!(Shape::Cuboid.compute(&[2.0, 3.0, 4.0]), [24.0, 52.0]);

        let [area, circumference] = Shape::Circle.compute(&[1.0]);
        assert_eq!(format_result(area), "3.14");
        assert_eq!(format_result(circumference), "6.28");

        let [volume, surface] = Shape::Sphere.compute(&[3.0]);
        assert_eq!(format_result(volume), "113.10");
        assert_eq!(format_result(surface), "113.10");

        let [volume, surface] = Shape::Cylinder.compute(&[1.0, 2.0]);
        assert_eq!(format_result(volume), "6.28");
        assert_eq!(format_result(surface), "18.85");
    }

    #[test]
    fn test_slugs() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_slug(shape.slug()), Some(shape));
        }
        assert_eq!(Shape::from_slug("trapesium"), None);
        assert_eq!(Shape::Cube.outputs(), &["volume", "luas-permukaan"]);
    }

    proptest! {
        #[test]
        fn prop_rectangle_formulas(p in 0.01f64..1.0e6, l in 0.01f64..1.0e6) {
            let mut form = CalculatorForm::new(Shape::Rectangle);
            form.set_input("panjang", &p.to_string()).unwrap();
            form.set_input("lebar", &l.to_string()).unwrap();
            form.calculate().unwrap();
            let area = format!("{:.2}", p * l);
            let perimeter = format!("{:.2}", 2.0 * (p + l));
            prop_assert_eq!(form.result("luas"), Some(area.as_str()));
            prop_assert_eq!(form.result("keliling"), Some(perimeter.as_str()));
        }

        #[test]
        fn prop_non_numeric_leaves_results(junk in "[a-zA-HJ-Z ]{0,8}") {
            let mut form = CalculatorForm::new(Shape::Rectangle);
            form.set_input("panjang", "5").unwrap();
            form.set_input("lebar", "3").unwrap();
            form.calculate().unwrap();

            form.set_input("panjang", &junk).unwrap();
            prop_assert!(form.calculate().is_err());
            prop_assert_eq!(form.result("luas"), Some("15.00"));
            prop_assert_eq!(form.result("keliling"), Some("16.00"));
        }
    }
}
