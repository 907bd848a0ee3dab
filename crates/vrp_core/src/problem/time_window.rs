/// An inclusive `[start, end]` interval in integer minutes.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn is_satisfied(&self, arrival: i64) -> bool {
        self.start <= arrival && arrival <= self.end
    }

    /// Widen `end` to at least `minimum_end`, extended by `slack` minutes.
    /// Used by the time-paradox pre-check.
    pub fn widened_to(&self, minimum_end: i64, slack: i64) -> TimeWindow {
        if self.end >= minimum_end {
            *self
        } else {
            TimeWindow {
                start: self.start,
                end: minimum_end + slack,
            }
        }
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<i64>,
    end: Option<i64>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> TimeWindow {
        TimeWindow {
            start: self.start.expect("time window start is required"),
            end: self.end.expect("time window end is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_roundtrips() {
        let tw = TimeWindowBuilder::default().with_start(10).with_end(30).build();
        assert_eq!(tw.start(), 10);
        assert_eq!(tw.end(), 30);
    }

    #[test]
    fn widen_only_moves_end_forward() {
        let tw = TimeWindow::new(0, 20);
        let widened = tw.widened_to(50, 100);
        assert_eq!(widened.start(), 0);
        assert_eq!(widened.end(), 150);

        let unchanged = tw.widened_to(10, 100);
        assert_eq!(unchanged.end(), 20);
    }

    #[test]
    fn satisfaction_is_inclusive() {
        let tw = TimeWindow::new(10, 20);
        assert!(tw.is_satisfied(10));
        assert!(tw.is_satisfied(20));
        assert!(!tw.is_satisfied(9));
        assert!(!tw.is_satisfied(21));
    }
}
