pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[20., 40.]), Some(30.0));
        assert_eq!(mean(&[42.0]), Some(42.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[20., 40.]), Some(10.0));
        assert_eq!(std_dev(&[2., 4., 4., 4., 5., 5., 7., 9.]), Some(2.0));
    }

    #[test]
    fn test_std_dev_single_value() {
        assert_eq!(std_dev(&[55.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty() {
        assert_eq!(std_dev(&[]), None);
    }
}
