use crate::time_series::ProgressPoint;

/// X (session index) and Y (wpm or percent) bounds for the progress chart
pub fn compute_chart_bounds(points: &[ProgressPoint]) -> (f64, f64) {
    let x_max = points.last().map_or(1.0, |p| p.session).max(1.0);

    let highest = points
        .iter()
        .flat_map(|p| [p.wpm, p.accuracy])
        .fold(0.0_f64, f64::max);
    // round up to the next multiple of ten so the top line isn't clipped
    let y_max = ((highest / 10.0).ceil() * 10.0).max(10.0);

    (x_max, y_max)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
