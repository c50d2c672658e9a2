use crate::constants::MAX_PRECISION;
use crate::errors::RuleError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

pub fn fmt_vec_output(v: &[f64]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_precision(precision: usize, parameter: &str) -> Result<(), RuleError> {
    if precision > MAX_PRECISION {
        Err(RuleError::InvalidParameter(
            parameter.to_string(),
            format!("an integer between 0 and {}", MAX_PRECISION),
            precision.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Index of the largest value, ties resolve to the lowest index.
/// NaN entries are never selected. Returns `None` for an empty
/// or all-NaN slice.
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in v.iter().enumerate() {
        if x.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if x <= b => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_tie_break() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(&[5.0, 0.0, 5.0]), Some(0));
        assert_eq!(argmax(&[0.0, 0.0, 7.0]), Some(2));
    }

    #[test]
    fn test_argmax_nan_and_empty() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f64::NAN, f64::NAN]), None);
        assert_eq!(argmax(&[f64::NAN, 2.0, 1.0]), Some(1));
    }

    #[test]
    fn test_validate_precision() {
        assert!(validate_precision(4, "precision").is_ok());
        assert!(validate_precision(MAX_PRECISION, "precision").is_ok());
        let err = validate_precision(MAX_PRECISION + 1, "precision").unwrap_err();
        assert!(matches!(err, RuleError::InvalidParameter(..)));
    }

    #[test]
    fn test_fmt_vec_output() {
        assert_eq!(fmt_vec_output(&[]), "");
        assert_eq!(fmt_vec_output(&[1.0]), "1.0000");
        assert_eq!(fmt_vec_output(&[50.0, 0.5]), "50.0000, 0.5000");
    }
}
