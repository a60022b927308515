/// One point on the progress chart: the n-th charted session and its scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPoint {
    pub session: f64,
    pub wpm: f64,
    pub accuracy: f64,
}

impl ProgressPoint {
    pub fn new(session: f64, wpm: f64, accuracy: f64) -> Self {
        Self {
            session,
            wpm,
            accuracy,
        }
    }

    pub fn wpm_coord(&self) -> (f64, f64) {
        (self.session, self.wpm)
    }

    pub fn accuracy_coord(&self) -> (f64, f64) {
        (self.session, self.accuracy)
    }
}
