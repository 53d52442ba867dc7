/// Position within a running quiz, for progress bars and "Question n of m".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionProgress {
    /// Zero-based index of the question on screen.
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    pub is_last: bool,
}

impl SessionProgress {
    /// `(index + 1) / total`, in `(0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.index + 1) as f64 / self.total as f64
    }

    /// Whole-number percentage as shown next to the bar.
    #[must_use]
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}
